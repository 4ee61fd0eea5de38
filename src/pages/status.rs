use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::api::{format_timestamp, use_api, HealthResponse};
use crate::components::status_badge::{CheckStatus, StatusBadge};
use crate::storage::ApiKeyStore;

/// Number of checks shown on this page.
const CHECK_COUNT: usize = 2;

#[component]
pub fn StatusPage() -> impl IntoView {
    let api = use_api();
    let base_url = api.base_url().to_string();
    let (checking, set_checking) = signal(false);
    let (health, set_health) = signal::<Option<Result<HealthResponse, String>>>(None);
    let (has_key, set_has_key) = signal(false);

    let run_checks = move || {
        set_checking.set(true);
        set_has_key.set(ApiKeyStore::browser().exists());
        let api = api.clone();
        spawn_local(async move {
            let result = api.health().await.map_err(|e| e.to_string());
            if let Err(e) = &result {
                tracing::warn!("Health check against {} failed: {}", api.base_url(), e);
            }
            set_health.set(Some(result));
            set_checking.set(false);
        });
    };

    // Auto-run on mount
    run_checks();

    view! {
        <div class="page health-page">
            <h2>"Backend Status"</h2>
            <p class="page-description">
                "Check that the analysis backend is reachable and an API key is configured."
            </p>

            <button
                class="btn btn-primary"
                on:click=move |_| run_checks()
                disabled=move || checking.get()
            >
                {move || if checking.get() { "Checking..." } else { "Run Checks" }}
            </button>

            {move || health.get().map(|result| {
                let backend_ok = result.is_ok();
                let backend_detail = match &result {
                    Ok(h) => match &h.timestamp {
                        Some(ts) => format!("{} (reported {})", h.status, format_timestamp(ts)),
                        None => h.status.clone(),
                    },
                    Err(e) => e.clone(),
                };
                let key_ok = has_key.get();
                let passed = [backend_ok, key_ok].iter().filter(|&&v| v).count();
                let summary_class = if passed == CHECK_COUNT {
                    "summary-all-pass"
                } else if passed == 0 {
                    "summary-all-fail"
                } else {
                    "summary-partial"
                };

                view! {
                    <div class="health-results">
                        <StatusBadge label="Backend reachable" status=CheckStatus::from_bool(backend_ok) detail=backend_detail />
                        <StatusBadge
                            label="OpenAI API key"
                            status=CheckStatus::from_bool(key_ok)
                            detail=if key_ok { "Configured" } else { "Not configured" }
                        />
                        <StatusBadge label="Backend URL" status=CheckStatus::Unknown detail=base_url.clone() />

                        <div class={format!("health-summary {}", summary_class)}>
                            {format!("{} of {} checks passed", passed, CHECK_COUNT)}
                        </div>
                    </div>
                }
            })}
        </div>
    }
}
