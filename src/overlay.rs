//! Which boxes to draw over the compared images, and the zoom control.

use crate::api::{AnalysisElement, BoundingBox, StageResults};

/// Where the drawn boxes came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlaySource {
    /// Element list reported by the backend.
    Reported,
    /// Fixed regions standing in for missing element data.
    Estimated,
    /// Nothing analysed yet.
    Pending,
}

impl OverlaySource {
    pub fn disclaimer(&self) -> Option<&'static str> {
        match self {
            OverlaySource::Reported => None,
            OverlaySource::Estimated => Some(
                "Detailed element positions were not returned. The highlighted regions are estimates.",
            ),
            OverlaySource::Pending => Some("Element analysis is not available yet."),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub source: OverlaySource,
    pub elements: Vec<AnalysisElement>,
}

const FALLBACK_BOX: BoundingBox = BoundingBox {
    x: 0.0,
    y: 0.0,
    width: 10.0,
    height: 10.0,
};

fn placeholder(id: &str, name: &str, kind: &str, bbox: BoundingBox, changes: &str, impact: &str) -> AnalysisElement {
    AnalysisElement {
        id: id.to_string(),
        name: name.to_string(),
        kind: kind.to_string(),
        position_a: Some(bbox),
        position_b: Some(bbox),
        changes: changes.to_string(),
        impact: impact.to_string(),
        recommendation: None,
    }
}

fn estimated_elements() -> Vec<AnalysisElement> {
    vec![
        placeholder(
            "header",
            "Header",
            "section",
            BoundingBox { x: 0.0, y: 0.0, width: 100.0, height: 10.0 },
            "See the structure analysis for header differences.",
            "Sets the first impression and navigation.",
        ),
        placeholder(
            "main-content",
            "Main content",
            "section",
            BoundingBox { x: 10.0, y: 15.0, width: 80.0, height: 60.0 },
            "See the content analysis for differences in the main area.",
            "Carries the core message and conversion elements.",
        ),
        placeholder(
            "text-elements",
            "Text elements",
            "text",
            BoundingBox { x: 15.0, y: 80.0, width: 70.0, height: 15.0 },
            "See the final report for copy changes.",
            "Affects readability and persuasion.",
        ),
    ]
}

fn pending_elements() -> Vec<AnalysisElement> {
    vec![placeholder(
        "pending",
        "Analysis pending",
        "placeholder",
        BoundingBox { x: 25.0, y: 40.0, width: 50.0, height: 20.0 },
        "Run the analysis to see element changes.",
        "Unknown until the analysis completes.",
    )]
}

/// Reported elements when there are any, estimates when there is stage text
/// to point at, otherwise a single pending box.
pub fn overlay_elements(results: Option<&StageResults>) -> Overlay {
    if let Some(elements) = results.and_then(|r| r.elements.as_ref()).filter(|e| !e.is_empty()) {
        return Overlay {
            source: OverlaySource::Reported,
            elements: elements.clone(),
        };
    }

    if results.is_some_and(StageResults::has_stage_text) {
        Overlay {
            source: OverlaySource::Estimated,
            elements: estimated_elements(),
        }
    } else {
        Overlay {
            source: OverlaySource::Pending,
            elements: pending_elements(),
        }
    }
}

/// Absolute-position style for a box over the image, in percent.
pub fn box_style(bbox: Option<BoundingBox>) -> String {
    let b = bbox.unwrap_or(FALLBACK_BOX);
    format!(
        "left: {}%; top: {}%; width: {}%; height: {}%;",
        b.x, b.y, b.width, b.height
    )
}

pub const ZOOM_MIN: u16 = 50;
pub const ZOOM_MAX: u16 = 200;
pub const ZOOM_STEP: u16 = 25;

/// Zoom level in percent, always within `ZOOM_MIN..=ZOOM_MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zoom(u16);

impl Default for Zoom {
    fn default() -> Self {
        Zoom(100)
    }
}

impl Zoom {
    pub fn percent(&self) -> u16 {
        self.0
    }

    pub fn zoom_in(self) -> Self {
        Zoom((self.0 + ZOOM_STEP).min(ZOOM_MAX))
    }

    pub fn zoom_out(self) -> Self {
        Zoom(self.0.saturating_sub(ZOOM_STEP).max(ZOOM_MIN))
    }

    pub fn can_zoom_in(&self) -> bool {
        self.0 < ZOOM_MAX
    }

    pub fn can_zoom_out(&self) -> bool {
        self.0 > ZOOM_MIN
    }

    pub fn style(&self) -> String {
        format!("transform: scale({}); transform-origin: top left;", f64::from(self.0) / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(id: &str) -> AnalysisElement {
        AnalysisElement {
            id: id.to_string(),
            name: "CTA".to_string(),
            kind: "button".to_string(),
            position_a: None,
            position_b: None,
            changes: String::new(),
            impact: String::new(),
            recommendation: None,
        }
    }

    #[test]
    fn test_reported_elements_win() {
        let results = StageResults {
            stage1: Some("text".into()),
            elements: Some(vec![element("cta")]),
            ..Default::default()
        };
        let overlay = overlay_elements(Some(&results));
        assert_eq!(overlay.source, OverlaySource::Reported);
        assert_eq!(overlay.elements.len(), 1);
        assert_eq!(overlay.elements[0].id, "cta");
        assert!(overlay.source.disclaimer().is_none());
    }

    #[test]
    fn test_estimates_when_stage_text_but_no_elements() {
        let results = StageResults {
            stage2: Some("## Findings".into()),
            elements: Some(Vec::new()),
            ..Default::default()
        };
        let overlay = overlay_elements(Some(&results));
        assert_eq!(overlay.source, OverlaySource::Estimated);
        assert_eq!(overlay.elements.len(), 3);
        assert_eq!(
            overlay.elements[0].position_a,
            Some(BoundingBox { x: 0.0, y: 0.0, width: 100.0, height: 10.0 })
        );
        assert_eq!(
            overlay.elements[2].position_b,
            Some(BoundingBox { x: 15.0, y: 80.0, width: 70.0, height: 15.0 })
        );
        assert!(overlay.source.disclaimer().is_some());
    }

    #[test]
    fn test_pending_without_results() {
        for results in [None, Some(StageResults::default())] {
            let overlay = overlay_elements(results.as_ref());
            assert_eq!(overlay.source, OverlaySource::Pending);
            assert_eq!(overlay.elements.len(), 1);
            assert_eq!(
                overlay.elements[0].position_a,
                Some(BoundingBox { x: 25.0, y: 40.0, width: 50.0, height: 20.0 })
            );
        }
    }

    #[test]
    fn test_box_style_falls_back_for_missing_box() {
        assert_eq!(box_style(None), "left: 0%; top: 0%; width: 10%; height: 10%;");
        let b = BoundingBox { x: 12.5, y: 40.0, width: 20.0, height: 8.0 };
        assert_eq!(box_style(Some(b)), "left: 12.5%; top: 40%; width: 20%; height: 8%;");
    }

    #[test]
    fn test_zoom_stays_in_bounds() {
        let mut zoom = Zoom::default();
        assert_eq!(zoom.percent(), 100);
        for _ in 0..10 {
            zoom = zoom.zoom_in();
        }
        assert_eq!(zoom.percent(), 200);
        assert!(!zoom.can_zoom_in());
        for _ in 0..10 {
            zoom = zoom.zoom_out();
        }
        assert_eq!(zoom.percent(), 50);
        assert!(!zoom.can_zoom_out());
        assert_eq!(zoom.zoom_in().percent(), 75);
    }
}
