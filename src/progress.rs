//! Maps the backend's 0-100 progress value onto the four stages shown while an
//! analysis runs.
//!
//! Nothing here measures time. Stage boundaries sit every 25 points and the
//! "time remaining" copy is a fixed lookup by progress band.

/// Width of each stage's progress band.
pub const STAGE_BAND: u8 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Complexity {
    Medium,
    High,
}

impl Complexity {
    pub fn label(&self) -> &'static str {
        match self {
            Complexity::Medium => "Medium",
            Complexity::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    pub number: u8,
    pub name: &'static str,
    pub description: &'static str,
    pub detail: &'static str,
    pub sub_steps: [&'static str; 5],
    pub estimated_minutes: u8,
    pub complexity: Complexity,
}

pub static STAGES: [Stage; 4] = [
    Stage {
        number: 1,
        name: "Structure & Layout Analysis",
        description: "Page structure and layout in detail",
        detail: "Header, footer and sidebar placement / grid system / responsive design",
        sub_steps: [
            "Reading the semantic page structure",
            "Checking the layout system",
            "Checking responsive breakpoints",
            "Evaluating visual hierarchy and stacking",
            "Detecting accessibility elements",
        ],
        estimated_minutes: 2,
        complexity: Complexity::Medium,
    },
    Stage {
        number: 2,
        name: "Visual & Design Analysis",
        description: "Visual design and aesthetics",
        detail: "Color scheme / typography / image quality / brand consistency",
        sub_steps: [
            "Analyzing the color palette and contrast ratios",
            "Evaluating font families and readability",
            "Checking image resolution and optimization",
            "Checking brand guideline consistency",
            "Weighing the balance of visual elements",
        ],
        estimated_minutes: 2,
        complexity: Complexity::High,
    },
    Stage {
        number: 3,
        name: "UX & Conversion Analysis",
        description: "User experience and conversion optimization",
        detail: "User journey / CTA effectiveness / form design / navigation",
        sub_steps: [
            "Evaluating CTA placement and copy",
            "Finding conversion barriers in forms",
            "Reviewing navigation structure and usability",
            "Estimating the impact of page load speed",
            "Rating mobile UX",
        ],
        estimated_minutes: 2,
        complexity: Complexity::High,
    },
    Stage {
        number: 4,
        name: "Insights & Recommendations",
        description: "Extracting insights and generating improvements",
        detail: "Combined analysis / prioritized improvements / ROI estimate / implementation guide",
        sub_steps: [
            "Identifying critical issues",
            "Prioritizing improvements",
            "Estimating ROI and business impact",
            "Proposing concrete implementation steps",
            "Suggesting follow-up A/B tests",
        ],
        estimated_minutes: 1,
        complexity: Complexity::Medium,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageState {
    Pending,
    Active,
    Completed,
}

impl StageState {
    pub fn css_class(&self) -> &'static str {
        match self {
            StageState::Pending => "stage-pending",
            StageState::Active => "stage-active",
            StageState::Completed => "stage-completed",
        }
    }
}

pub fn clamp_progress(progress: u8) -> u8 {
    progress.min(100)
}

/// Zero-based index of the stage that is running at `progress`.
pub fn active_stage_index(progress: u8) -> usize {
    usize::from(clamp_progress(progress) / STAGE_BAND).min(STAGES.len() - 1)
}

pub fn stage_state(index: usize, progress: u8) -> StageState {
    let progress = clamp_progress(progress);
    let end = band_end(index);
    if progress >= end {
        StageState::Completed
    } else if index == active_stage_index(progress) {
        StageState::Active
    } else {
        StageState::Pending
    }
}

/// How full a stage's own bar is, 0.0 to 100.0.
pub fn stage_fill_percent(index: usize, progress: u8) -> f64 {
    let progress = f64::from(clamp_progress(progress));
    let start = f64::from(band_end(index)) - f64::from(STAGE_BAND);
    ((progress - start) * 100.0 / f64::from(STAGE_BAND)).clamp(0.0, 100.0)
}

fn band_end(index: usize) -> u8 {
    let stage = u8::try_from(index + 1).unwrap_or(u8::MAX);
    stage.saturating_mul(STAGE_BAND)
}

/// Canned copy describing what is "happening" at a given progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Narrative {
    pub active_step: &'static str,
    pub time_remaining: &'static str,
    pub current_operation: &'static str,
}

pub fn narrative(progress: u8) -> Narrative {
    match clamp_progress(progress) {
        0..=24 => Narrative {
            active_step: "Running the initial structure and layout analysis...",
            time_remaining: "About 3-4 minutes remaining",
            current_operation: "Extracting page structure and semantics",
        },
        25..=49 => Narrative {
            active_step: "Analyzing visual elements and design patterns in detail...",
            time_remaining: "About 2-3 minutes remaining",
            current_operation: "Color palette, typography and imagery",
        },
        50..=74 => Narrative {
            active_step: "Evaluating usability and conversion elements...",
            time_remaining: "About 1-2 minutes remaining",
            current_operation: "CTA placement, form design and navigation",
        },
        75..=89 => Narrative {
            active_step: "Generating improvements and applying best practices...",
            time_remaining: "About 30-60 seconds remaining",
            current_operation: "Drafting optimization proposals",
        },
        _ => Narrative {
            active_step: "Preparing the final report and overall scores...",
            time_remaining: "Almost done",
            current_operation: "Report generation and quality checks",
        },
    }
}

/// Possible causes listed when an analysis fails.
pub const FAILURE_CAUSES: [&str; 5] = [
    "The OpenAI API key is invalid or expired",
    "The API usage limit has been reached",
    "An image file is corrupted",
    "Network connection problems",
    "The server is temporarily overloaded",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_10_is_structure_stage() {
        assert_eq!(active_stage_index(10), 0);
        assert_eq!(stage_state(0, 10), StageState::Active);
        assert_eq!(stage_state(1, 10), StageState::Pending);
        assert!(narrative(10).active_step.to_lowercase().contains("structure"));
    }

    #[test]
    fn test_progress_80_is_fourth_stage() {
        assert_eq!(active_stage_index(80), 3);
        assert_eq!(stage_state(3, 80), StageState::Active);
        for i in 0..3 {
            assert_eq!(stage_state(i, 80), StageState::Completed);
        }
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(active_stage_index(0), 0);
        assert_eq!(active_stage_index(24), 0);
        assert_eq!(active_stage_index(25), 1);
        assert_eq!(active_stage_index(49), 1);
        assert_eq!(active_stage_index(50), 2);
        assert_eq!(active_stage_index(75), 3);
        assert_eq!(active_stage_index(100), 3);
    }

    #[test]
    fn test_everything_completed_at_100() {
        for i in 0..STAGES.len() {
            assert_eq!(stage_state(i, 100), StageState::Completed);
        }
    }

    #[test]
    fn test_out_of_range_progress_is_clamped() {
        assert_eq!(active_stage_index(250), 3);
        assert_eq!(stage_state(3, 250), StageState::Completed);
        assert_eq!(narrative(250), narrative(100));
    }

    #[test]
    fn test_stage_fill() {
        assert_eq!(stage_fill_percent(0, 10), 40.0);
        assert_eq!(stage_fill_percent(0, 30), 100.0);
        assert_eq!(stage_fill_percent(1, 10), 0.0);
        assert_eq!(stage_fill_percent(1, 30), 20.0);
        assert_eq!(stage_fill_percent(3, 100), 100.0);
    }

    #[test]
    fn test_narrative_bands() {
        assert_eq!(narrative(30).time_remaining, "About 2-3 minutes remaining");
        assert_eq!(narrative(60).time_remaining, "About 1-2 minutes remaining");
        assert_eq!(narrative(80).time_remaining, "About 30-60 seconds remaining");
        assert_eq!(narrative(89).time_remaining, "About 30-60 seconds remaining");
        assert_eq!(narrative(90).time_remaining, "Almost done");
    }

    #[test]
    fn test_stage_numbers_are_sequential() {
        for (i, stage) in STAGES.iter().enumerate() {
            assert_eq!(usize::from(stage.number), i + 1);
        }
    }
}
