//! Modal dialog asking for the OpenAI API key.
//!
//! Opened when an analysis is started without a stored key, or from the
//! session list. The key is format-checked and written to local storage; it
//! is never sent anywhere until an analysis starts.

use leptos::prelude::*;

use crate::storage::ApiKeyStore;
use crate::validation::validate_api_key;

#[component]
pub fn ApiKeyModal(
    /// Called after a valid key was stored.
    on_saved: Callback<()>,
    on_close: Callback<()>,
) -> impl IntoView {
    let (key_value, set_key_value) = signal(ApiKeyStore::browser().get().unwrap_or_default());
    let (show_key, set_show_key) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);

    let save = move || {
        let key = key_value.get_untracked();
        if let Err(e) = validate_api_key(&key) {
            set_error.set(Some(e.to_string()));
            return;
        }
        match ApiKeyStore::browser().set(key.trim()) {
            Ok(()) => {
                tracing::info!("API key saved from dialog");
                on_saved.run(());
            }
            Err(e) => set_error.set(Some(format!("Failed to save: {}", e))),
        }
    };

    view! {
        <div class="modal-overlay" on:click=move |_| on_close.run(())>
            <style>{include_str!("api_key_modal.css")}</style>
            <div class="modal-dialog" on:click=|ev| ev.stop_propagation()>
                <h3>"OpenAI API Key"</h3>
                <p class="dialog-subtitle">
                    "The analysis runs on your OpenAI account. The key is kept in this browser only and sent with each analysis request."
                </p>

                <form
                    class="modal-form"
                    on:submit=move |ev| {
                        ev.prevent_default();
                        save();
                    }
                >
                    <div class="input-row">
                        <input
                            type=move || if show_key.get() { "text" } else { "password" }
                            class="input input-password"
                            placeholder="sk-..."
                            autocomplete="off"
                            prop:value=move || key_value.get()
                            on:input=move |ev| {
                                set_key_value.set(event_target_value(&ev));
                                set_error.set(None);
                            }
                        />
                        <button
                            type="button"
                            class="btn btn-secondary"
                            on:click=move |_| set_show_key.update(|s| *s = !*s)
                        >
                            {move || if show_key.get() { "Hide" } else { "Show" }}
                        </button>
                    </div>

                    {move || error.get().map(|e| view! {
                        <p class="status-text status-error">{e}</p>
                    })}

                    <div class="dialog-actions">
                        <button type="button" class="btn btn-secondary" on:click=move |_| on_close.run(())>
                            "Cancel"
                        </button>
                        <button type="submit" class="btn btn-primary">
                            "Save Key"
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
