//! Wire types shared with the analysis backend.

use serde::{Deserialize, Deserializer, Serialize};

/// Lifecycle of a session as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Draft,
    Processing,
    Completed,
    Failed,
}

impl SessionStatus {
    /// Unknown or missing statuses read as draft.
    pub fn parse(value: &str) -> Self {
        match value {
            "processing" => SessionStatus::Processing,
            "completed" => SessionStatus::Completed,
            "failed" => SessionStatus::Failed,
            _ => SessionStatus::Draft,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionStatus::Draft => "Draft",
            SessionStatus::Processing => "Analyzing",
            SessionStatus::Completed => "Completed",
            SessionStatus::Failed => "Failed",
        }
    }
}

impl<'de> Deserialize<'de> for SessionStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.as_deref().map(SessionStatus::parse).unwrap_or_default())
    }
}

/// Which of the two compared images an upload belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSlot {
    ImageA,
    ImageB,
}

impl ImageSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSlot::ImageA => "image_a",
            ImageSlot::ImageB => "image_b",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ImageSlot::ImageA => "Image A (Original)",
            ImageSlot::ImageB => "Image B (Variation)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Session {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: SessionStatus,
    pub created_at: String,
    #[serde(default)]
    pub image_a_filename: Option<String>,
    #[serde(default)]
    pub image_b_filename: Option<String>,
    #[serde(default)]
    pub results: Option<StageResults>,
    #[serde(default)]
    pub performance_data: Option<PerformanceData>,
}

impl Session {
    pub fn image(&self, slot: ImageSlot) -> Option<&str> {
        let name = match slot {
            ImageSlot::ImageA => self.image_a_filename.as_deref(),
            ImageSlot::ImageB => self.image_b_filename.as_deref(),
        };
        name.filter(|n| !n.is_empty())
    }

    pub fn has_both_images(&self) -> bool {
        self.image(ImageSlot::ImageA).is_some() && self.image(ImageSlot::ImageB).is_some()
    }

    pub fn description_or_default(&self) -> String {
        self.description
            .clone()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| "Landing page analysis".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateSessionRequest {
    pub title: String,
    pub description: String,
}

/// A/B metrics for one image, entered by hand.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct ImageMetrics {
    #[serde(default, deserialize_with = "count_from_number")]
    pub visitors: u64,
    #[serde(default, deserialize_with = "count_from_number")]
    pub conversions: u64,
    #[serde(default)]
    pub conversion_rate: f64,
}

/// The backend stores metrics as floats and echoes `1000.0` back.
fn count_from_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let n = f64::deserialize(deserializer)?;
    Ok(if n.is_finite() && n > 0.0 { n.round() as u64 } else { 0 })
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct PerformanceData {
    pub image_a: ImageMetrics,
    pub image_b: ImageMetrics,
}

impl PerformanceData {
    pub fn metrics(&self, slot: ImageSlot) -> &ImageMetrics {
        match slot {
            ImageSlot::ImageA => &self.image_a,
            ImageSlot::ImageB => &self.image_b,
        }
    }

    pub fn metrics_mut(&mut self, slot: ImageSlot) -> &mut ImageMetrics {
        match slot {
            ImageSlot::ImageA => &mut self.image_a,
            ImageSlot::ImageB => &mut self.image_b,
        }
    }

    /// Whether there is anything worth sending with the start request.
    pub fn has_visitors(&self) -> bool {
        self.image_a.visitors > 0 || self.image_b.visitors > 0
    }

    /// Percentage-point lift of B over A, only when B converts better.
    pub fn improvement(&self) -> Option<f64> {
        let delta = self.image_b.conversion_rate - self.image_a.conversion_rate;
        (delta > 0.0).then_some(delta)
    }
}

pub fn format_improvement(delta: f64) -> String {
    format!("+{:.1}", delta)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartAnalysisRequest {
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance_data: Option<PerformanceData>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StartAnalysisResponse {
    #[serde(default)]
    pub message: String,
    pub session_id: String,
    #[serde(default)]
    pub status: SessionStatus,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadResponse {
    pub filename: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AnalysisStatus {
    pub session_id: String,
    pub status: SessionStatus,
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub current_stage: String,
    #[serde(default)]
    pub results: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub failed_at: Option<String>,
}

/// Bounding box in percent of the rendered image (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct BoundingBox {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AnalysisElement {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub position_a: Option<BoundingBox>,
    #[serde(default)]
    pub position_b: Option<BoundingBox>,
    #[serde(default)]
    pub changes: String,
    #[serde(default)]
    pub impact: String,
    #[serde(default)]
    pub recommendation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct StageResults {
    #[serde(default)]
    pub stage1: Option<String>,
    #[serde(default)]
    pub stage2: Option<String>,
    #[serde(default)]
    pub stage3: Option<String>,
    #[serde(default)]
    pub elements: Option<Vec<AnalysisElement>>,
    #[serde(default)]
    pub structure_summary: Option<String>,
}

impl StageResults {
    /// Markdown for stage 1..=3.
    pub fn stage(&self, number: u8) -> Option<&str> {
        match number {
            1 => self.stage1.as_deref(),
            2 => self.stage2.as_deref(),
            3 => self.stage3.as_deref(),
            _ => None,
        }
    }

    pub fn has_stage_text(&self) -> bool {
        (1..=3).any(|n| self.stage(n).is_some_and(|s| !s.trim().is_empty()))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AnalysisResults {
    pub session_id: String,
    #[serde(default)]
    pub results: StageResults,
    #[serde(default)]
    pub performance_data: Option<PerformanceData>,
    #[serde(default)]
    pub completed_at: Option<String>,
}

/// Results as loaded: the typed view for rendering plus the untouched JSON
/// document for export.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultDocument {
    pub raw: serde_json::Value,
    pub results: AnalysisResults,
}

impl ResultDocument {
    pub fn from_value(raw: serde_json::Value) -> Result<Self, serde_json::Error> {
        let results = serde_json::from_value(raw.clone())?;
        Ok(Self { raw, results })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Render a backend timestamp as `YYYY-MM-DD HH:MM`, or return it unchanged.
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    match raw.parse::<chrono::NaiveDateTime>() {
        Ok(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRAFT_SESSION: &str = r#"{
        "id": "5b0e",
        "title": "Spring campaign",
        "description": "",
        "status": "draft",
        "created_at": "2024-03-01T09:30:12.123456",
        "image_a_filename": "image_a_1.png",
        "image_b_filename": null,
        "results": null
    }"#;

    #[test]
    fn test_session_from_backend_payload() {
        let session: Session = serde_json::from_str(DRAFT_SESSION).unwrap();
        assert_eq!(session.status, SessionStatus::Draft);
        assert_eq!(session.image(ImageSlot::ImageA), Some("image_a_1.png"));
        assert_eq!(session.image(ImageSlot::ImageB), None);
        assert!(!session.has_both_images());
        assert_eq!(session.description_or_default(), "Landing page analysis");
        assert!(session.performance_data.is_none());
    }

    #[test]
    fn test_empty_filename_counts_as_missing() {
        let mut session: Session = serde_json::from_str(DRAFT_SESSION).unwrap();
        session.image_b_filename = Some(String::new());
        assert!(!session.has_both_images());
        session.image_b_filename = Some("b.png".into());
        assert!(session.has_both_images());
    }

    #[test]
    fn test_unknown_status_reads_as_draft() {
        let status: SessionStatus = serde_json::from_str(r#""queued""#).unwrap();
        assert_eq!(status, SessionStatus::Draft);
        let status: SessionStatus = serde_json::from_str(r#""processing""#).unwrap();
        assert_eq!(status, SessionStatus::Processing);
        let status: SessionStatus = serde_json::from_str("null").unwrap();
        assert_eq!(status, SessionStatus::Draft);
        assert_eq!(serde_json::to_string(&SessionStatus::Failed).unwrap(), r#""failed""#);
    }

    #[test]
    fn test_improvement_only_when_b_wins() {
        let mut perf = PerformanceData::default();
        perf.image_a.conversion_rate = 5.0;
        perf.image_b.conversion_rate = 7.5;
        assert_eq!(perf.improvement(), Some(2.5));
        assert_eq!(format_improvement(perf.improvement().unwrap()), "+2.5");

        perf.image_b.conversion_rate = 5.0;
        assert_eq!(perf.improvement(), None);

        perf.image_b.conversion_rate = 3.0;
        assert_eq!(perf.improvement(), None);
    }

    #[test]
    fn test_has_visitors_checks_either_image() {
        let mut perf = PerformanceData::default();
        assert!(!perf.has_visitors());
        perf.image_b.visitors = 10;
        assert!(perf.has_visitors());
        perf.image_b.visitors = 0;
        perf.image_a.visitors = 1;
        assert!(perf.has_visitors());
    }

    #[test]
    fn test_metrics_accept_float_counts() {
        let perf: PerformanceData = serde_json::from_str(
            r#"{"image_a":{"visitors":1000.0,"conversions":50.0,"conversion_rate":5.0},
                "image_b":{"visitors":1000,"conversions":75,"conversion_rate":7.5}}"#,
        )
        .unwrap();
        assert_eq!(perf.image_a.visitors, 1000);
        assert_eq!(perf.image_a.conversions, 50);
        assert_eq!(perf.image_b.conversions, 75);
    }

    #[test]
    fn test_start_request_omits_empty_performance() {
        let req = StartAnalysisRequest {
            session_id: "abc".into(),
            performance_data: None,
        };
        assert_eq!(serde_json::to_string(&req).unwrap(), r#"{"session_id":"abc"}"#);
    }

    #[test]
    fn test_status_with_failure_details() {
        let status: AnalysisStatus = serde_json::from_str(
            r#"{"session_id":"s1","status":"failed","progress":0,
                "current_stage":"Analysis Failed","error":"invalid api key",
                "failed_at":"2024-03-01T10:00:00"}"#,
        )
        .unwrap();
        assert_eq!(status.status, SessionStatus::Failed);
        assert_eq!(status.error.as_deref(), Some("invalid api key"));
        assert!(status.results.is_none());
    }

    #[test]
    fn test_element_type_field_and_missing_boxes() {
        let element: AnalysisElement = serde_json::from_str(
            r#"{"id":"cta","name":"CTA button","type":"button",
                "position_a":{"x":40,"y":70,"width":20,"height":8},
                "changes":"Color changed","impact":"Higher contrast"}"#,
        )
        .unwrap();
        assert_eq!(element.kind, "button");
        assert_eq!(element.position_a.map(|b| b.width), Some(20.0));
        assert!(element.position_b.is_none());
        assert!(element.recommendation.is_none());
    }

    #[test]
    fn test_result_document_keeps_raw_json() {
        let raw: serde_json::Value = serde_json::from_str(
            r##"{"session_id":"s1","results":{"stage1":"# A","stage2":"B","stage3":"C","model":"gpt"},"completed_at":null}"##,
        )
        .unwrap();
        let doc = ResultDocument::from_value(raw.clone()).unwrap();
        assert_eq!(doc.raw, raw);
        assert_eq!(doc.results.results.stage(1), Some("# A"));
        assert!(doc.results.results.has_stage_text());
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp("2024-03-01T09:30:12.123456"), "2024-03-01 09:30");
        assert_eq!(format_timestamp("2024-03-01T09:30:12+09:00"), "2024-03-01 09:30");
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }
}
