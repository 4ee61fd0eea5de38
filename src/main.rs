mod api;
mod app;
mod components;
mod config;
mod error;
mod export;
mod logging;
mod markdown;
mod overlay;
mod pages;
mod polling;
mod progress;
mod storage;
mod theme;
mod validation;
mod workflow;

use app::App;
use config::AppConfig;
use leptos::prelude::*;
use storage::BrowserStorage;

fn main() {
    let (config, problems) = AppConfig::load(&BrowserStorage);
    logging::init(&config.log_filter);
    for problem in problems {
        tracing::warn!("{}", problem);
    }
    tracing::info!("Starting against backend {}", config.api_base_url);

    leptos::mount::mount_to_body(move || view! { <App config=config /> });
}
