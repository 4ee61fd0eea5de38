//! Final report of a completed analysis.
//!
//! Loads the result document once, then renders the three stage reports, the
//! A/B performance block, the image comparison and the export buttons.

use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::api::{format_improvement, use_api, ImageSlot, PerformanceData, ResultDocument};
use crate::components::image_comparison::ImageComparison;
use crate::export::{download, ExportFormat, STAGE_TITLES};
use crate::markdown::render_markdown;

const STAGE_SUBTITLES: [&str; 3] = [
    "Layout and structure",
    "Content in detail",
    "Overall assessment and recommendations",
];

#[component]
pub fn AnalysisResults(
    #[prop(into)] session_id: String,
    completed: bool,
    image_a_url: Option<String>,
    image_b_url: Option<String>,
) -> impl IntoView {
    let (doc, set_doc) = signal::<Option<ResultDocument>>(None);
    let (loading, set_loading) = signal(completed);
    let (error, set_error) = signal::<Option<String>>(None);
    let (export_error, set_export_error) = signal::<Option<String>>(None);
    let (stage, set_stage) = signal(3u8);

    if completed {
        let api = use_api();
        spawn_local(async move {
            match api.get_results(&session_id).await {
                Ok(d) => set_doc.set(Some(d)),
                Err(e) => {
                    tracing::error!("Loading results for {} failed: {}", session_id, e);
                    set_error.set(Some(e.to_string()));
                }
            }
            set_loading.set(false);
        });
    }

    let export = move |format: ExportFormat| {
        let Some(d) = doc.get_untracked() else {
            return;
        };
        match download(&d, format) {
            Ok(()) => set_export_error.set(None),
            Err(e) => {
                tracing::error!("{} export failed: {}", format.label(), e);
                set_export_error.set(Some(format!("Export failed: {}", e)));
            }
        }
    };

    view! {
        <div class="analysis-results">
            <style>{include_str!("analysis_results.css")}</style>
            {move || {
                if !completed {
                    view! { <p class="results-empty">"Analysis not completed yet"</p> }.into_any()
                } else if loading.get() {
                    view! {
                        <div class="results-skeleton">
                            <div class="skeleton-line wide"></div>
                            <div class="skeleton-line"></div>
                            <div class="skeleton-line"></div>
                        </div>
                    }.into_any()
                } else if let Some(e) = error.get() {
                    view! {
                        <div class="error-message">
                            <h3>"Could not load results"</h3>
                            <p>{e}</p>
                        </div>
                    }.into_any()
                } else if let Some(d) = doc.get() {
                    let results = d.results.results.clone();
                    let performance = d.results.performance_data;
                    let stage_results = results.clone();
                    view! {
                        <div class="results-toolbar">
                            <span class="results-export-label">"Export:"</span>
                            {[ExportFormat::Text, ExportFormat::Json].into_iter().map(|format| view! {
                                <button class="btn btn-small btn-secondary" on:click=move |_| export(format)>
                                    {format.label()}
                                </button>
                            }).collect::<Vec<_>>()}
                        </div>
                        {move || export_error.get().map(|e| view! {
                            <p class="status-text status-error">{e}</p>
                        })}

                        {performance.map(|p| view! { <PerformanceSummary performance=p /> })}

                        <div class="stage-tabs">
                            {(1u8..).zip(STAGE_TITLES).map(|(n, title)| view! {
                                <button
                                    class="stage-tab"
                                    class:stage-tab-active=move || stage.get() == n
                                    on:click=move |_| set_stage.set(n)
                                >
                                    {format!("{}. {}", n, title)}
                                </button>
                            }).collect::<Vec<_>>()}
                        </div>
                        <div class="stage-report">
                            <p class="stage-subtitle">
                                {move || STAGE_SUBTITLES[usize::from(stage.get().clamp(1, 3)) - 1]}
                            </p>
                            <div
                                class="markdown-body"
                                inner_html=move || render_markdown(stage_results.stage(stage.get()).unwrap_or_default())
                            ></div>
                        </div>

                        <h3 class="results-section-title">"Element Comparison"</h3>
                        <ImageComparison
                            image_a_url=image_a_url.clone()
                            image_b_url=image_b_url.clone()
                            results=Some(results)
                        />
                    }.into_any()
                } else {
                    view! { <p class="results-empty">"No results available"</p> }.into_any()
                }
            }}
        </div>
    }
}

#[component]
fn PerformanceSummary(performance: PerformanceData) -> impl IntoView {
    let column = move |slot: ImageSlot| {
        let m = *performance.metrics(slot);
        view! {
            <div class="performance-column">
                <h4>{slot.title()}</h4>
                <p class="performance-rate">{format!("{:.1}%", m.conversion_rate)}</p>
                <p class="performance-counts">
                    {format!("{} conversions / {} visitors", m.conversions, m.visitors)}
                </p>
            </div>
        }
    };

    view! {
        <div class="performance-summary">
            <h3 class="results-section-title">"A/B Test Performance"</h3>
            <div class="performance-columns">
                {column(ImageSlot::ImageA)}
                {column(ImageSlot::ImageB)}
            </div>
            {performance.improvement().map(|delta| view! {
                <div class="improvement-badge">
                    {format!("Variation B improved by {} points", format_improvement(delta))}
                </div>
            })}
        </div>
    }
}
