use leptos::prelude::*;

use crate::storage::ApiKeyStore;
use crate::validation::validate_api_key;

/// Save or delete the OpenAI key kept in this browser.
#[component]
pub fn ApiKeyForm(
    /// Display name, e.g. "OpenAI API Key"
    #[prop(into)]
    label: String,
    /// Placeholder text for the input field
    #[prop(into)]
    placeholder: String,
) -> impl IntoView {
    let (key_value, set_key_value) = signal(String::new());
    let (is_saved, set_is_saved) = signal(ApiKeyStore::browser().exists());
    let (error_message, set_error_message) = signal::<Option<String>>(None);

    let save_key = move |_| {
        let key = key_value.get();
        if let Err(e) = validate_api_key(&key) {
            set_error_message.set(Some(e.to_string()));
            return;
        }
        match ApiKeyStore::browser().set(key.trim()) {
            Ok(()) => {
                tracing::info!("API key saved");
                set_is_saved.set(true);
                set_key_value.set(String::new());
                set_error_message.set(None);
            }
            Err(e) => set_error_message.set(Some(format!("Failed to save: {}", e))),
        }
    };

    let delete_key = move |_| match ApiKeyStore::browser().clear() {
        Ok(()) => {
            tracing::info!("API key removed");
            set_is_saved.set(false);
            set_error_message.set(None);
        }
        Err(e) => set_error_message.set(Some(format!("Failed to delete: {}", e))),
    };

    view! {
        <div class="form-group api-key-form">
            <label>{label}</label>
            <div class="input-row">
                <input
                    type="password"
                    placeholder=placeholder
                    class="input input-password"
                    autocomplete="off"
                    prop:value=move || key_value.get()
                    on:input=move |ev| {
                        set_key_value.set(event_target_value(&ev));
                    }
                />
                <button class="btn btn-save" on:click=save_key>
                    "Save"
                </button>
                <button
                    class="btn btn-delete"
                    on:click=delete_key
                    style:display=move || if is_saved.get() { "inline-block" } else { "none" }
                >
                    "Delete"
                </button>
            </div>
            <div class="key-status-row">
                {move || {
                    if let Some(err) = error_message.get() {
                        view! {
                            <span class="status-text status-error">{err}</span>
                        }.into_any()
                    } else if is_saved.get() {
                        view! {
                            <span class="status-text status-saved">"Saved in this browser"</span>
                        }.into_any()
                    } else {
                        view! {
                            <span class="status-text status-not-set">"Not configured"</span>
                        }.into_any()
                    }
                }}
            </div>
        </div>
    }
}
