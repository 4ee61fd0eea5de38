use leptos::prelude::*;
use leptos_router::components::*;
use leptos_router::path;

use crate::components::sidebar::Sidebar;
use crate::config::AppConfig;
use crate::pages::home::HomePage;
use crate::pages::session::SessionPage;
use crate::pages::settings::SettingsPage;
use crate::pages::status::StatusPage;
use crate::theme::{apply_theme, load_theme, ThemeContext};

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    provide_context(RwSignal::new(config));

    let (theme, set_theme) = signal(load_theme());
    provide_context(ThemeContext { theme, set_theme });

    // Apply theme to DOM whenever the signal changes
    Effect::new(move |_| {
        apply_theme(&theme.get());
    });

    view! {
        <Router>
            <div class="app-layout">
                <Sidebar />
                <main class="content">
                    <Routes fallback=|| view! { <p class="not-found">"Page not found"</p> }>
                        <Route path=path!("/") view=HomePage />
                        <Route path=path!("/analysis/:id") view=SessionPage />
                        <Route path=path!("/settings") view=SettingsPage />
                        <Route path=path!("/status") view=StatusPage />
                    </Routes>
                </main>
            </div>
        </Router>
    }
}
