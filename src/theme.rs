use leptos::prelude::*;

use crate::storage::{get_preference, set_preference, THEME_KEY};

#[derive(Clone, Copy)]
pub struct ThemeContext {
    pub theme: ReadSignal<String>,
    pub set_theme: WriteSignal<String>,
}

pub const THEMES: [(&str, &str); 3] = [("system", "System"), ("light", "Light"), ("dark", "Dark")];

/// Stored theme, or "system" when nothing valid is saved.
pub fn load_theme() -> String {
    get_preference(THEME_KEY)
        .filter(|t| THEMES.iter().any(|(id, _)| id == t))
        .unwrap_or_else(|| "system".to_string())
}

pub fn save_theme(theme: &str) {
    let value = if theme == "system" { "" } else { theme };
    if let Err(e) = set_preference(THEME_KEY, value) {
        tracing::warn!("Could not save theme: {}", e);
    }
}

/// Apply the theme by setting or removing the `data-theme` attribute on `<html>`.
/// - "light" → forces light
/// - "dark" → forces dark
/// - anything else ("system") → removes attribute, CSS @media handles it
pub fn apply_theme(theme: &str) {
    let Some(html) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    else {
        return;
    };
    let _ = match theme {
        "light" | "dark" => html.set_attribute("data-theme", theme),
        _ => html.remove_attribute("data-theme"),
    };
}
