use leptos::prelude::*;

use crate::components::api_key_form::ApiKeyForm;
use crate::config::{normalize_base_url, AppConfig, DEFAULT_API_BASE_URL};
use crate::storage::{get_preference, set_preference, BrowserStorage, API_BASE_URL_KEY};
use crate::theme::{save_theme, ThemeContext, THEMES};

#[component]
pub fn SettingsPage() -> impl IntoView {
    let config = expect_context::<RwSignal<AppConfig>>();
    let ThemeContext { theme, set_theme } = expect_context::<ThemeContext>();

    let (api_url, set_api_url) = signal(get_preference(API_BASE_URL_KEY).unwrap_or_default());
    let (url_status, set_url_status) = signal::<Option<String>>(None);

    let save_api_url = move |_| {
        let url = normalize_base_url(&api_url.get());
        match set_preference(API_BASE_URL_KEY, &url) {
            Ok(()) => {
                // Re-resolve so clearing the override falls back to the lower layers.
                let (resolved, problems) = AppConfig::load(&BrowserStorage);
                for problem in problems {
                    tracing::warn!("{}", problem);
                }
                config.set(resolved);
                tracing::info!("Backend URL is now {}", config.get_untracked().api_base_url);
                set_api_url.set(url.clone());
                set_url_status.set(Some(if url.is_empty() {
                    "Override removed".to_string()
                } else {
                    "Backend URL saved".to_string()
                }));
            }
            Err(e) => set_url_status.set(Some(format!("Failed to save: {}", e))),
        }
    };

    view! {
        <div class="page settings-page">
            <h2>"Settings"</h2>

            <section class="settings-section">
                <h3>"API Key"</h3>
                <p class="section-description">
                    "Your OpenAI API key is stored in this browser's local storage and sent only with analysis requests."
                </p>
                <ApiKeyForm label="OpenAI API Key" placeholder="sk-..." />
            </section>

            <section class="settings-section">
                <h3>"Backend"</h3>
                <p class="section-description">
                    {move || format!("Currently using {}", config.get().api_base_url)}
                </p>
                <div class="form-group">
                    <label for="api-url">"Backend URL override"</label>
                    <div class="input-row">
                        <input
                            id="api-url"
                            type="text"
                            placeholder=DEFAULT_API_BASE_URL
                            class="input"
                            prop:value=move || api_url.get()
                            on:input=move |ev| {
                                set_api_url.set(event_target_value(&ev));
                            }
                        />
                        <button class="btn btn-save" on:click=save_api_url>"Save"</button>
                    </div>
                    <Show when=move || url_status.get().is_some()>
                        <span class="status-text">{move || url_status.get().unwrap_or_default()}</span>
                    </Show>
                </div>
            </section>

            <section class="settings-section">
                <h3>"Appearance"</h3>
                <div class="form-group">
                    <label for="theme-select">"Theme"</label>
                    <select
                        id="theme-select"
                        class="input"
                        on:change=move |ev| {
                            let value = event_target_value(&ev);
                            save_theme(&value);
                            set_theme.set(value);
                        }
                    >
                        {THEMES.iter().map(|&(id, label)| view! {
                            <option value=id selected=move || theme.get() == id>{label}</option>
                        }).collect::<Vec<_>>()}
                    </select>
                </div>
            </section>
        </div>
    }
}
