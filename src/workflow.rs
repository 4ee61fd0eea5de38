//! View-state decisions for the session workspace.
//!
//! Kept free of signals and DOM access so the rules for what the workspace
//! shows, and when a start request may be sent, can be tested directly.

use crate::api::{PerformanceData, Session, SessionStatus, StartAnalysisRequest};
use crate::storage::{ApiKeyStore, KeyValueStore};

pub const MISSING_IMAGES_MESSAGE: &str = "Please upload both images before starting the analysis.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkspaceTab {
    #[default]
    Upload,
    Performance,
    Analysis,
    Results,
}

impl WorkspaceTab {
    pub const ALL: [WorkspaceTab; 4] = [
        WorkspaceTab::Upload,
        WorkspaceTab::Performance,
        WorkspaceTab::Analysis,
        WorkspaceTab::Results,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            WorkspaceTab::Upload => "Upload Images",
            WorkspaceTab::Performance => "Performance Data",
            WorkspaceTab::Analysis => "Run Analysis",
            WorkspaceTab::Results => "Results",
        }
    }
}

/// What the analysis tab shows for the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisPanel {
    AwaitingImages,
    ReadyToStart,
    InProgress,
    Failed,
    Completed,
}

impl AnalysisPanel {
    pub fn for_session(session: &Session) -> Self {
        match session.status {
            SessionStatus::Draft if session.has_both_images() => AnalysisPanel::ReadyToStart,
            SessionStatus::Draft => AnalysisPanel::AwaitingImages,
            SessionStatus::Processing => AnalysisPanel::InProgress,
            SessionStatus::Failed => AnalysisPanel::Failed,
            SessionStatus::Completed => AnalysisPanel::Completed,
        }
    }
}

/// Outcome of pressing "Start analysis" (or "Retry").
#[derive(Debug, Clone, PartialEq)]
pub enum StartPlan {
    /// No key stored: open the credential modal, send nothing.
    NeedApiKey,
    /// At least one image slot is empty.
    MissingImages { message: &'static str },
    Start {
        request: StartAnalysisRequest,
        api_key: String,
    },
}

/// Decide what a start click does. The key check comes first so a user
/// without a key is asked for one before anything else.
pub fn plan_start<S: KeyValueStore>(
    session: &Session,
    api_keys: &ApiKeyStore<S>,
    performance: &PerformanceData,
) -> StartPlan {
    let Some(api_key) = api_keys.get() else {
        return StartPlan::NeedApiKey;
    };

    if !session.has_both_images() {
        return StartPlan::MissingImages {
            message: MISSING_IMAGES_MESSAGE,
        };
    }

    StartPlan::Start {
        request: StartAnalysisRequest {
            session_id: session.id.clone(),
            performance_data: performance.has_visitors().then_some(*performance),
        },
        api_key,
    }
}

/// Parse a count field; anything that is not a non-negative integer is zero.
pub fn parse_count(input: &str) -> u64 {
    input.trim().parse().unwrap_or(0)
}

/// Parse a percentage field; anything unparsable or negative is zero.
pub fn parse_rate(input: &str) -> f64 {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|r| r.is_finite() && *r >= 0.0)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn session(status: SessionStatus, a: Option<&str>, b: Option<&str>) -> Session {
        Session {
            id: "sess-1".to_string(),
            title: "Hero test".to_string(),
            description: None,
            status,
            created_at: "2024-03-01T09:30:00".to_string(),
            image_a_filename: a.map(str::to_string),
            image_b_filename: b.map(str::to_string),
            results: None,
            performance_data: None,
        }
    }

    fn keys_with(key: Option<&str>) -> ApiKeyStore<MemoryStore> {
        let keys = ApiKeyStore::new(MemoryStore::new());
        if let Some(k) = key {
            keys.set(k).unwrap();
        }
        keys
    }

    #[test]
    fn test_no_key_asks_for_credential_before_anything() {
        let s = session(SessionStatus::Draft, Some("a.png"), Some("b.png"));
        let plan = plan_start(&s, &keys_with(None), &PerformanceData::default());
        assert_eq!(plan, StartPlan::NeedApiKey);

        // Still the modal even when images are missing.
        let s = session(SessionStatus::Draft, None, None);
        let plan = plan_start(&s, &keys_with(None), &PerformanceData::default());
        assert_eq!(plan, StartPlan::NeedApiKey);
    }

    #[test]
    fn test_saving_a_key_unblocks_the_start() {
        let s = session(SessionStatus::Draft, Some("a.png"), Some("b.png"));
        let keys = keys_with(None);
        assert_eq!(plan_start(&s, &keys, &PerformanceData::default()), StartPlan::NeedApiKey);

        keys.set("sk-abcdefghijklmnopqrstuvwxyz").unwrap();
        match plan_start(&s, &keys, &PerformanceData::default()) {
            StartPlan::Start { request, api_key } => {
                assert_eq!(request.session_id, "sess-1");
                assert_eq!(api_key, "sk-abcdefghijklmnopqrstuvwxyz");
            }
            other => panic!("expected Start, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_images_block_with_message() {
        let keys = keys_with(Some("sk-abcdefghijklmnopqrstuvwxyz"));
        let s = session(SessionStatus::Draft, None, None);
        let plan = plan_start(&s, &keys, &PerformanceData::default());
        assert_eq!(
            plan,
            StartPlan::MissingImages {
                message: MISSING_IMAGES_MESSAGE
            }
        );

        let s = session(SessionStatus::Draft, Some("a.png"), None);
        assert!(matches!(
            plan_start(&s, &keys, &PerformanceData::default()),
            StartPlan::MissingImages { .. }
        ));
    }

    #[test]
    fn test_performance_attached_only_with_visitors() {
        let keys = keys_with(Some("sk-abcdefghijklmnopqrstuvwxyz"));
        let s = session(SessionStatus::Draft, Some("a.png"), Some("b.png"));

        let mut perf = PerformanceData::default();
        perf.image_a.conversion_rate = 4.0;
        match plan_start(&s, &keys, &perf) {
            StartPlan::Start { request, .. } => assert!(request.performance_data.is_none()),
            other => panic!("expected Start, got {:?}", other),
        }

        perf.image_b.visitors = 800;
        match plan_start(&s, &keys, &perf) {
            StartPlan::Start { request, .. } => assert_eq!(request.performance_data, Some(perf)),
            other => panic!("expected Start, got {:?}", other),
        }
    }

    #[test]
    fn test_analysis_panel_follows_status() {
        let both = |st| session(st, Some("a.png"), Some("b.png"));
        assert_eq!(
            AnalysisPanel::for_session(&session(SessionStatus::Draft, Some("a.png"), None)),
            AnalysisPanel::AwaitingImages
        );
        assert_eq!(AnalysisPanel::for_session(&both(SessionStatus::Draft)), AnalysisPanel::ReadyToStart);
        assert_eq!(AnalysisPanel::for_session(&both(SessionStatus::Processing)), AnalysisPanel::InProgress);
        assert_eq!(AnalysisPanel::for_session(&both(SessionStatus::Failed)), AnalysisPanel::Failed);
        assert_eq!(AnalysisPanel::for_session(&both(SessionStatus::Completed)), AnalysisPanel::Completed);
    }

    #[test]
    fn test_tabs_start_on_upload() {
        assert_eq!(WorkspaceTab::default(), WorkspaceTab::Upload);
        assert_eq!(WorkspaceTab::ALL.len(), 4);
    }

    #[test]
    fn test_numeric_inputs_default_to_zero() {
        assert_eq!(parse_count("1000"), 1000);
        assert_eq!(parse_count(" 42 "), 42);
        assert_eq!(parse_count("abc"), 0);
        assert_eq!(parse_count("-5"), 0);
        assert_eq!(parse_rate("7.5"), 7.5);
        assert_eq!(parse_rate(""), 0.0);
        assert_eq!(parse_rate("-1"), 0.0);
        assert_eq!(parse_rate("NaN"), 0.0);
    }
}
