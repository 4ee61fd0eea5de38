//! Workspace for one comparison session: uploads, performance data, running
//! the analysis and reading the results.

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;
use wasm_bindgen_futures::spawn_local;

use crate::api::{use_api, ImageSlot, PerformanceData, Session};
use crate::components::analysis_progress::AnalysisProgress;
use crate::components::analysis_results::AnalysisResults;
use crate::components::api_key_modal::ApiKeyModal;
use crate::components::image_upload::UploadGrid;
use crate::components::performance_form::PerformanceForm;
use crate::components::status_badge::SessionStatusBadge;
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::polling::use_interval;
use crate::storage::ApiKeyStore;
use crate::workflow::{plan_start, AnalysisPanel, StartPlan, WorkspaceTab};

#[component]
pub fn SessionPage() -> impl IntoView {
    let api = use_api();
    let poll_ms = expect_context::<RwSignal<AppConfig>>().get_untracked().session_poll_ms;
    let session_id = use_params_map()
        .read_untracked()
        .get("id")
        .unwrap_or_default();

    let session = RwSignal::<Option<Session>>::new(None);
    let (load_error, set_load_error) = signal::<Option<ApiError>>(None);
    let (tab, set_tab) = signal(WorkspaceTab::default());
    let performance = RwSignal::new(PerformanceData::default());
    let (start_error, set_start_error) = signal::<Option<String>>(None);
    let (starting, set_starting) = signal(false);
    let (show_key_modal, set_show_key_modal) = signal(false);
    let seeded_performance = StoredValue::new(false);

    let refresh = {
        let api = api.clone();
        let session_id = session_id.clone();
        Callback::new(move |_: ()| {
            let api = api.clone();
            let session_id = session_id.clone();
            spawn_local(async move {
                match api.get_session(&session_id).await {
                    Ok(s) => {
                        if !seeded_performance.get_value() {
                            seeded_performance.set_value(true);
                            if let Some(p) = s.performance_data {
                                performance.set(p);
                            }
                        }
                        set_load_error.set(None);
                        session.set(Some(s));
                    }
                    Err(e) => {
                        tracing::warn!("Fetching session {} failed: {}", session_id, e);
                        set_load_error.set(Some(e));
                    }
                }
            });
        })
    };

    use_interval("session", poll_ms, move || refresh.run(()));

    let start = {
        let api = api.clone();
        Callback::new(move |_: ()| {
            let Some(current) = session.get_untracked() else {
                return;
            };
            set_start_error.set(None);
            match plan_start(&current, &ApiKeyStore::browser(), &performance.get_untracked()) {
                StartPlan::NeedApiKey => set_show_key_modal.set(true),
                StartPlan::MissingImages { message } => set_start_error.set(Some(message.to_string())),
                StartPlan::Start { request, api_key } => {
                    set_starting.set(true);
                    let api = api.clone();
                    spawn_local(async move {
                        match api.start_analysis(&request, &api_key).await {
                            Ok(_) => {
                                set_tab.set(WorkspaceTab::Analysis);
                                refresh.run(());
                            }
                            Err(e) => {
                                tracing::error!("Starting analysis for {} failed: {}", request.session_id, e);
                                set_start_error.set(Some(format!("Failed to start analysis: {}", e)));
                            }
                        }
                        set_starting.set(false);
                    });
                }
            }
        })
    };

    let panel = Memo::new(move |_| session.with(|s| s.as_ref().map(AnalysisPanel::for_session)));
    let image_urls = {
        let api = api.clone();
        Memo::new(move |_| {
            session.with(|s| {
                let url = |slot| {
                    s.as_ref()
                        .and_then(|s| s.image(slot))
                        .map(|f| api.image_url(f))
                };
                (url(ImageSlot::ImageA), url(ImageSlot::ImageB))
            })
        })
    };
    let filename = move |slot: ImageSlot| {
        Signal::derive(move || session.with(|s| s.as_ref().and_then(|s| s.image(slot)).map(str::to_string)))
    };

    let analysis_tab = {
        let session_id = session_id.clone();
        move || match panel.get() {
            None => ().into_any(),
            Some(AnalysisPanel::AwaitingImages) => view! {
                <div class="analysis-panel">
                    <p>"Upload both images before starting the analysis."</p>
                    <button class="btn btn-secondary" on:click=move |_| set_tab.set(WorkspaceTab::Upload)>
                        "Go to uploads"
                    </button>
                </div>
            }.into_any(),
            Some(AnalysisPanel::ReadyToStart) => view! {
                <div class="analysis-panel">
                    <p>"Both images are uploaded. The analysis takes a few minutes."</p>
                    <button
                        class="btn btn-primary"
                        disabled=move || starting.get()
                        on:click=move |_| start.run(())
                    >
                        {move || if starting.get() { "Starting..." } else { "Start analysis" }}
                    </button>
                </div>
            }.into_any(),
            Some(AnalysisPanel::InProgress) | Some(AnalysisPanel::Failed) => view! {
                <AnalysisProgress
                    session_id=session_id.clone()
                    on_complete=Callback::new(move |_| refresh.run(()))
                    on_retry=start
                />
            }.into_any(),
            Some(AnalysisPanel::Completed) => view! {
                <div class="analysis-panel">
                    <p>"The analysis is complete."</p>
                    <button class="btn btn-primary" on:click=move |_| set_tab.set(WorkspaceTab::Results)>
                        "View results"
                    </button>
                </div>
            }.into_any(),
        }
    };

    let results_tab = {
        let session_id = session_id.clone();
        move || {
            let (image_a_url, image_b_url) = image_urls.get();
            view! {
                <AnalysisResults
                    session_id=session_id.clone()
                    completed=panel.get() == Some(AnalysisPanel::Completed)
                    image_a_url=image_a_url
                    image_b_url=image_b_url
                />
            }
        }
    };

    let upload_tab = {
        let session_id = session_id.clone();
        move || view! {
            <UploadGrid
                session_id=session_id.clone()
                filename_a=filename(ImageSlot::ImageA)
                filename_b=filename(ImageSlot::ImageB)
                on_uploaded=refresh
            />
        }
    };

    view! {
        <div class="page session-page">
            {move || match session.get() {
                None if load_error.get().is_some() => view! {
                    <div class="not-found">
                        <h2>
                            {move || match load_error.get().and_then(|e| e.status()) {
                                Some(404) | None => "Session not found",
                                Some(_) => "Could not load session",
                            }}
                        </h2>
                        <p>{move || load_error.get().map(|e| e.to_string()).unwrap_or_default()}</p>
                        <a href="/" class="btn btn-secondary">"Back to sessions"</a>
                    </div>
                }.into_any(),
                None => view! { <p class="loading-text">"Loading session..."</p> }.into_any(),
                Some(s) => view! {
                    <div class="session-header">
                        <a href="/" class="back-link">"\u{2190} Sessions"</a>
                        <div class="session-title-row">
                            <h2>{s.title.clone()}</h2>
                            <SessionStatusBadge status=s.status />
                        </div>
                        <p class="page-description">{s.description_or_default()}</p>
                    </div>
                }.into_any(),
            }}

            <Show when=move || session.with(Option::is_some)>
                {move || load_error.get().map(|e| view! {
                    <div class="alert alert-error">{format!("Could not refresh session: {}", e)}</div>
                })}

                <div class="tab-bar">
                    {WorkspaceTab::ALL.into_iter().map(|t| view! {
                        <button
                            class="tab"
                            class:tab-active=move || tab.get() == t
                            on:click=move |_| set_tab.set(t)
                        >
                            {t.label()}
                        </button>
                    }).collect::<Vec<_>>()}
                </div>

                {move || start_error.get().map(|e| view! {
                    <div class="alert alert-error">
                        <span>{e}</span>
                        <button class="btn-dismiss" on:click=move |_| set_start_error.set(None)>"\u{2715}"</button>
                    </div>
                })}

                <div class="tab-content">
                    {
                        let upload_tab = upload_tab.clone();
                        let analysis_tab = analysis_tab.clone();
                        let results_tab = results_tab.clone();
                        move || match tab.get() {
                            WorkspaceTab::Upload => upload_tab().into_any(),
                            WorkspaceTab::Performance => view! { <PerformanceForm performance=performance /> }.into_any(),
                            WorkspaceTab::Analysis => analysis_tab().into_any(),
                            WorkspaceTab::Results => results_tab().into_any(),
                        }
                    }
                </div>
            </Show>

            <Show when=move || show_key_modal.get()>
                <ApiKeyModal
                    on_saved=Callback::new(move |_| {
                        set_show_key_modal.set(false);
                        start.run(());
                    })
                    on_close=Callback::new(move |_| set_show_key_modal.set(false))
                />
            </Show>
        </div>
    }
}
