//! Live progress of a running analysis.
//!
//! Polls the status endpoint while mounted. Progress is mapped onto the four
//! display stages in [`crate::progress`]; the narrative text is canned.

use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::api::{use_api, AnalysisStatus, SessionStatus};
use crate::config::AppConfig;
use crate::export::{download_partial_results, render_partial_results};
use crate::polling::use_interval;
use crate::progress::{
    active_stage_index, clamp_progress, narrative, stage_fill_percent, stage_state, FAILURE_CAUSES,
    STAGES,
};

#[component]
pub fn AnalysisProgress(
    #[prop(into)] session_id: String,
    /// Fired once when the backend reports the analysis as completed.
    on_complete: Callback<()>,
    /// Offered on failure when present.
    #[prop(optional)]
    on_retry: Option<Callback<()>>,
) -> impl IntoView {
    let api = use_api();
    let poll_ms = expect_context::<RwSignal<AppConfig>>().get_untracked().status_poll_ms;

    let (status, set_status) = signal::<Option<AnalysisStatus>>(None);
    let (poll_error, set_poll_error) = signal::<Option<String>>(None);
    let (show_raw, set_show_raw) = signal(false);
    let (expanded_stage, set_expanded_stage) = signal::<Option<usize>>(None);
    let session_id_for_export = session_id.clone();
    let finished = StoredValue::new(false);
    let in_flight = StoredValue::new(false);

    use_interval("analysis status", poll_ms, move || {
        if finished.get_value() || in_flight.get_value() {
            return;
        }
        in_flight.set_value(true);
        let api = api.clone();
        let session_id = session_id.clone();
        spawn_local(async move {
            match api.get_status(&session_id).await {
                Ok(s) => {
                    set_poll_error.set(None);
                    match s.status {
                        SessionStatus::Completed => {
                            finished.set_value(true);
                            tracing::info!("Analysis {} completed", session_id);
                            on_complete.run(());
                        }
                        SessionStatus::Failed => {
                            finished.set_value(true);
                            tracing::warn!(
                                "Analysis {} failed: {}",
                                session_id,
                                s.error.as_deref().unwrap_or("no detail")
                            );
                        }
                        _ => {}
                    }
                    set_status.set(Some(s));
                }
                Err(e) => {
                    tracing::warn!("Status poll for {} failed: {}", session_id, e);
                    set_poll_error.set(Some(e.to_string()));
                }
            }
            in_flight.set_value(false);
        });
    });

    let progress = move || status.get().map(|s| clamp_progress(s.progress)).unwrap_or(0);
    let failed = move || status.get().is_some_and(|s| s.status == SessionStatus::Failed);

    view! {
        <div class="analysis-progress">
            <style>{include_str!("analysis_progress.css")}</style>

            {move || if failed() {
                let (error, failed_at) = status.get()
                    .map(|s| (s.error, s.failed_at))
                    .unwrap_or_default();
                view! {
                    <FailurePanel error=error failed_at=failed_at on_retry=on_retry />
                }.into_any()
            } else {
                let n = narrative(progress());
                view! {
                    <div class="progress-overview">
                        <div class="progress-header">
                            <span class="progress-stage-label">
                                {move || status.get()
                                    .map(|s| s.current_stage)
                                    .filter(|c| !c.is_empty())
                                    .unwrap_or_else(|| "Waiting for the analysis to start...".to_string())}
                            </span>
                            <span class="progress-percent">{move || format!("{}%", progress())}</span>
                        </div>
                        <div class="progress-bar">
                            <div class="progress-fill" style:width=move || format!("{}%", progress())></div>
                        </div>
                        <p class="progress-step">{n.active_step}</p>
                        <p class="progress-operation">{n.current_operation}</p>
                        <p class="progress-eta">{n.time_remaining}</p>
                    </div>

                    <div class="stage-list">
                        {STAGES.iter().enumerate().map(|(i, stage)| {
                            let state = move || stage_state(i, progress());
                            let expanded = move || expanded_stage.get() == Some(i);
                            view! {
                                <div
                                    class=move || format!("stage-card {}", state().css_class())
                                    class:stage-current=move || active_stage_index(progress()) == i
                                    on:click=move |_| set_expanded_stage.update(|e| {
                                        *e = if *e == Some(i) { None } else { Some(i) };
                                    })
                                >
                                    <div class="stage-card-header">
                                        <span class="stage-number">{stage.number}</span>
                                        <div class="stage-card-title">
                                            <strong>{stage.name}</strong>
                                            <span class="stage-description">{stage.description}</span>
                                        </div>
                                        <span class="stage-meta">
                                            {format!("~{} min / {}", stage.estimated_minutes, stage.complexity.label())}
                                        </span>
                                    </div>
                                    <div class="stage-bar">
                                        <div
                                            class="stage-bar-fill"
                                            style:width=move || format!("{:.0}%", stage_fill_percent(i, progress()))
                                        ></div>
                                    </div>
                                    <Show when=expanded>
                                        <p class="stage-detail">{stage.detail}</p>
                                        <ul class="stage-steps">
                                            {stage.sub_steps.iter().map(|step| view! { <li>{*step}</li> }).collect::<Vec<_>>()}
                                        </ul>
                                    </Show>
                                </div>
                            }
                        }).collect::<Vec<_>>()}
                    </div>
                }.into_any()
            }}

            {move || poll_error.get().map(|e| view! {
                <p class="status-text status-error">{format!("Could not refresh status: {}", e)}</p>
            })}

            <div class="partial-results">
                <div class="partial-results-header">
                    <h4>"API response"</h4>
                    {move || status.get().and_then(|s| s.results).map(|results| {
                        let session_id = session_id_for_export.clone();
                        view! {
                            <button
                                class="btn btn-small btn-secondary"
                                on:click=move |_| {
                                    if let Err(e) = download_partial_results(&session_id, &results) {
                                        tracing::error!("Saving partial results failed: {}", e);
                                    }
                                }
                            >
                                "Download JSON"
                            </button>
                        }
                    })}
                </div>
                {move || match status.get().and_then(|s| s.results) {
                    Some(results) => view! {
                        <pre class="raw-status-json">
                            {render_partial_results(&results).unwrap_or_default()}
                        </pre>
                    }.into_any(),
                    None => view! {
                        <p class="partial-results-empty">
                            "Waiting for results. Output from each stage appears here as it finishes."
                        </p>
                    }.into_any(),
                }}
            </div>

            <div class="raw-status">
                <button class="btn btn-small btn-secondary" on:click=move |_| set_show_raw.update(|v| *v = !*v)>
                    {move || if show_raw.get() { "Hide raw status" } else { "Show raw status" }}
                </button>
                <Show when=move || show_raw.get()>
                    <pre class="raw-status-json">
                        {move || status.get()
                            .and_then(|s| serde_json::to_string_pretty(&s).ok())
                            .unwrap_or_else(|| "No status received yet.".to_string())}
                    </pre>
                </Show>
            </div>
        </div>
    }
}

#[component]
fn FailurePanel(
    error: Option<String>,
    failed_at: Option<String>,
    on_retry: Option<Callback<()>>,
) -> impl IntoView {
    let reload = move |_| {
        if let Some(window) = web_sys::window() {
            let _ = window.location().reload();
        }
    };

    view! {
        <div class="analysis-failed">
            <h3>"Analysis Failed"</h3>
            {error.map(|e| view! { <p class="failure-detail">{e}</p> })}
            {failed_at.map(|t| view! {
                <p class="failure-time">{format!("Failed at {}", crate::api::format_timestamp(&t))}</p>
            })}
            <p>"Possible causes:"</p>
            <ul class="failure-causes">
                {FAILURE_CAUSES.iter().map(|c| view! { <li>{*c}</li> }).collect::<Vec<_>>()}
            </ul>
            <div class="action-buttons">
                <button class="btn btn-secondary" on:click=reload>"Reload page"</button>
                {on_retry.map(|retry| view! {
                    <button class="btn btn-primary" on:click=move |_| retry.run(())>"Retry"</button>
                })}
            </div>
        </div>
    }
}
