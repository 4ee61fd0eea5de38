use leptos::prelude::*;

use crate::api::SessionStatus;

/// Outcome of one backend status check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Fail,
    Unknown,
}

impl CheckStatus {
    pub fn from_bool(ok: bool) -> Self {
        if ok {
            CheckStatus::Pass
        } else {
            CheckStatus::Fail
        }
    }
}

#[component]
pub fn StatusBadge(
    /// The label text, e.g. "Backend"
    #[prop(into)]
    label: String,
    status: CheckStatus,
    /// Optional detail text, e.g. the configured URL
    #[prop(optional, into)]
    detail: Option<String>,
) -> impl IntoView {
    let (icon, class) = match status {
        CheckStatus::Pass => ("\u{2713}", "status-badge status-pass"),
        CheckStatus::Fail => ("\u{2717}", "status-badge status-fail"),
        CheckStatus::Unknown => ("?", "status-badge status-unknown"),
    };

    view! {
        <div class="health-item">
            <span class=class>{icon}</span>
            <span class="health-name">{label}</span>
            <span class="health-detail">{detail.unwrap_or_default()}</span>
        </div>
    }
}

#[component]
pub fn SessionStatusBadge(status: SessionStatus) -> impl IntoView {
    let class = match status {
        SessionStatus::Draft => "session-status status-draft",
        SessionStatus::Processing => "session-status status-processing",
        SessionStatus::Completed => "session-status status-completed",
        SessionStatus::Failed => "session-status status-failed",
    };
    view! { <span class=class>{status.label()}</span> }
}
