//! Client-side export of a loaded result document.

use wasm_bindgen::{JsCast, JsValue};

use crate::api::ResultDocument;

/// Display names of the three stage reports, in order.
pub const STAGE_TITLES: [&str; 3] = ["Structure Analysis", "Content Analysis", "Final Report"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Text,
}

impl ExportFormat {
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Json => "JSON",
            ExportFormat::Text => "Text",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Text => "txt",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Text => "text/plain;charset=utf-8",
        }
    }

    pub fn filename(&self, session_id: &str) -> String {
        format!("analysis-{}.{}", session_id, self.extension())
    }

    pub fn render(&self, doc: &ResultDocument) -> Result<String, serde_json::Error> {
        match self {
            ExportFormat::Json => serde_json::to_string_pretty(&doc.raw),
            ExportFormat::Text => Ok(render_text(doc)),
        }
    }
}

fn render_text(doc: &ResultDocument) -> String {
    let results = &doc.results.results;
    let mut out = String::new();
    for (n, title) in (1u8..).zip(STAGE_TITLES) {
        let Some(content) = results.stage(n).filter(|c| !c.trim().is_empty()) else {
            continue;
        };
        out.push_str(&format!("# Stage {}: {}\n\n{}\n\n", n, title, content));
    }
    out
}

/// Render `doc` and hand it to the browser as a file download.
pub fn download(doc: &ResultDocument, format: ExportFormat) -> Result<(), String> {
    let body = format.render(doc).map_err(|e| e.to_string())?;
    let filename = format.filename(&doc.results.session_id);
    save_file(&filename, &body, format.mime()).map_err(|e| {
        e.as_string()
            .unwrap_or_else(|| format!("Could not save {}", filename))
    })?;
    tracing::info!("Exported {} ({} bytes)", filename, body.len());
    Ok(())
}

/// Name of the download for the partial results reported while an analysis runs.
pub fn partial_results_filename(session_id: &str) -> String {
    format!("analysis-results-{}.json", session_id)
}

pub fn render_partial_results(results: &serde_json::Value) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(results)
}

/// Save the `results` object from a status response as pretty-printed JSON.
pub fn download_partial_results(session_id: &str, results: &serde_json::Value) -> Result<(), String> {
    let body = render_partial_results(results).map_err(|e| e.to_string())?;
    let filename = partial_results_filename(session_id);
    save_file(&filename, &body, ExportFormat::Json.mime()).map_err(|e| {
        e.as_string()
            .unwrap_or_else(|| format!("Could not save {}", filename))
    })?;
    tracing::info!("Exported {} ({} bytes)", filename, body.len());
    Ok(())
}

fn save_file(filename: &str, body: &str, mime: &str) -> Result<(), JsValue> {
    let parts = js_sys::Array::of1(&JsValue::from_str(body));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(mime);
    let blob = web_sys::Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("No document available"))?;
    let anchor: web_sys::HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.click();

    web_sys::Url::revoke_object_url(&url)
}
