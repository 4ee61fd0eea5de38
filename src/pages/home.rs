//! Session list and the form for starting a new comparison.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use wasm_bindgen_futures::spawn_local;

use crate::api::{format_timestamp, use_api, CreateSessionRequest, Session};
use crate::components::api_key_modal::ApiKeyModal;
use crate::components::status_badge::SessionStatusBadge;
use crate::config::AppConfig;
use crate::polling::use_interval;
use crate::storage::ApiKeyStore;

#[component]
pub fn HomePage() -> impl IntoView {
    let api = use_api();
    let poll_ms = expect_context::<RwSignal<AppConfig>>().get_untracked().session_list_poll_ms;
    let navigate = use_navigate();

    let (sessions, set_sessions) = signal::<Option<Vec<Session>>>(None);
    let (list_error, set_list_error) = signal::<Option<String>>(None);
    let (title, set_title) = signal(String::new());
    let (description, set_description) = signal(String::new());
    let (creating, set_creating) = signal(false);
    let (create_error, set_create_error) = signal::<Option<String>>(None);
    let (has_key, set_has_key) = signal(ApiKeyStore::browser().exists());
    let (show_key_modal, set_show_key_modal) = signal(false);

    let list_api = api.clone();
    use_interval("session list", poll_ms, move || {
        let api = list_api.clone();
        spawn_local(async move {
            match api.list_sessions().await {
                Ok(list) => {
                    set_list_error.set(None);
                    set_sessions.set(Some(list));
                }
                Err(e) => {
                    tracing::warn!("Listing sessions failed: {}", e);
                    set_list_error.set(Some(format!("Failed to load sessions: {}", e)));
                }
            }
        });
    });

    let on_create = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let t = title.get_untracked().trim().to_string();
        if t.is_empty() {
            set_create_error.set(Some("Please enter a title".to_string()));
            return;
        }
        let request = CreateSessionRequest {
            title: t,
            description: description.get_untracked().trim().to_string(),
        };
        set_creating.set(true);
        set_create_error.set(None);
        let api = api.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            match api.create_session(&request).await {
                Ok(session) => {
                    navigate(&format!("/analysis/{}", session.id), Default::default());
                }
                Err(e) => {
                    set_create_error.set(Some(format!("Failed to create session: {}", e)));
                    set_creating.set(false);
                }
            }
        });
    };

    view! {
        <div class="page home-page">
            <h2>"Landing Page Analyses"</h2>
            <p class="page-description">
                "Compare two versions of a landing page and get an AI review of what changed and why it matters."
            </p>

            <div class="api-key-banner" class:api-key-missing=move || !has_key.get()>
                <span>
                    {move || if has_key.get() { "OpenAI API key configured" } else { "No OpenAI API key configured" }}
                </span>
                <button class="btn btn-small btn-secondary" on:click=move |_| set_show_key_modal.set(true)>
                    {move || if has_key.get() { "Change Key" } else { "Add Key" }}
                </button>
            </div>

            <section class="card new-session">
                <h3>"New Analysis"</h3>
                <form on:submit=on_create>
                    <div class="form-group">
                        <label for="session-title">"Title"</label>
                        <input
                            id="session-title"
                            type="text"
                            class="input"
                            placeholder="Spring campaign hero test"
                            prop:value=move || title.get()
                            on:input=move |ev| set_title.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form-group">
                        <label for="session-description">"Description (optional)"</label>
                        <textarea
                            id="session-description"
                            class="input"
                            rows="2"
                            prop:value=move || description.get()
                            on:input=move |ev| set_description.set(event_target_value(&ev))
                        ></textarea>
                    </div>
                    <button type="submit" class="btn btn-primary" disabled=move || creating.get()>
                        {move || if creating.get() { "Creating..." } else { "Create Session" }}
                    </button>
                    {move || create_error.get().map(|e| view! {
                        <p class="status-text status-error">{e}</p>
                    })}
                </form>
            </section>

            <section class="session-list">
                <h3>"Sessions"</h3>
                {move || list_error.get().map(|e| view! {
                    <div class="alert alert-error">{e}</div>
                })}
                {move || match sessions.get() {
                    None => view! { <p class="loading-text">"Loading sessions..."</p> }.into_any(),
                    Some(list) if list.is_empty() => view! {
                        <p class="empty-text">"No sessions yet. Create one above to get started."</p>
                    }.into_any(),
                    Some(list) => view! {
                        <div class="card-grid">
                            {list.into_iter().map(|s| view! {
                                <a href=format!("/analysis/{}", s.id) class="card session-card">
                                    <div class="session-card-header">
                                        <h4>{s.title.clone()}</h4>
                                        <SessionStatusBadge status=s.status />
                                    </div>
                                    <p>{s.description_or_default()}</p>
                                    <span class="session-date">{format_timestamp(&s.created_at)}</span>
                                </a>
                            }).collect::<Vec<_>>()}
                        </div>
                    }.into_any(),
                }}
            </section>

            <Show when=move || show_key_modal.get()>
                <ApiKeyModal
                    on_saved=Callback::new(move |_| {
                        set_has_key.set(true);
                        set_show_key_modal.set(false);
                    })
                    on_close=Callback::new(move |_| set_show_key_modal.set(false))
                />
            </Show>
        </div>
    }
}
