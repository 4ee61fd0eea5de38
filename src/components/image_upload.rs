//! Upload widget for one side of the comparison.
//!
//! Files can be dropped onto the zone or picked with the browser dialog. The
//! type and size guard runs before anything is sent.

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

use crate::api::{use_api, ImageSlot};
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::validation::{check_upload, upload_hint};

#[component]
pub fn ImageUpload(
    #[prop(into)] session_id: String,
    side: ImageSlot,
    /// Filename already stored for this side, if any.
    #[prop(into)]
    filename: Signal<Option<String>>,
    /// Called after the backend accepted the file.
    on_uploaded: Callback<()>,
) -> impl IntoView {
    let api = use_api();
    let config = expect_context::<RwSignal<AppConfig>>();
    let (is_over, set_is_over) = signal(false);
    let (uploading, set_uploading) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);
    let input_id = format!("file-input-{}", side.as_str());

    let upload = {
        let api = api.clone();
        move |file: web_sys::File| {
            let limit = config.get_untracked().max_upload_bytes;
            if let Err(rejection) = check_upload(&file.type_(), file.size() as u64, limit) {
                tracing::info!("Rejected {} for {}: {:?}", file.name(), side.as_str(), rejection);
                set_error.set(Some(rejection.to_string()));
                return;
            }

            set_error.set(None);
            set_uploading.set(true);
            let api = api.clone();
            let session_id = session_id.clone();
            spawn_local(async move {
                match api.upload_image(&session_id, side, &file).await {
                    Ok(resp) => {
                        tracing::info!("Stored {} as {}", side.as_str(), resp.filename);
                        on_uploaded.run(());
                    }
                    Err(e) => {
                        tracing::warn!("Upload of {} failed: {}", side.as_str(), e);
                        set_error.set(Some(upload_error_message(&e)));
                    }
                }
                set_uploading.set(false);
            });
        }
    };

    let upload_dropped = upload.clone();
    let on_drop = move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        set_is_over.set(false);
        if uploading.get_untracked() {
            return;
        }
        if let Some(file) = ev
            .data_transfer()
            .and_then(|dt| dt.files())
            .and_then(|files| files.get(0))
        {
            upload_dropped(file);
        }
    };

    let on_input_change = move |ev: web_sys::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };
        if let Some(file) = input.files().and_then(|files| files.get(0)) {
            upload(file);
        }
        // Allow picking the same file again after an error.
        input.set_value("");
    };

    let preview = move || {
        filename.get().map(|name| {
            let src = api.image_url(&name);
            view! {
                <div class="upload-preview">
                    <img src=src class="preview-image" alt=side.title() />
                    <span class="upload-filename">{name}</span>
                </div>
            }
        })
    };

    view! {
        <div class="image-upload">
            <style>{include_str!("image_upload.css")}</style>
            <h3 class="upload-title">{side.title()}</h3>

            {preview}

            <div
                class="drop-zone"
                class:drop-zone-active=move || is_over.get()
                class:drop-zone-loading=move || uploading.get()
                on:dragover=move |ev: web_sys::DragEvent| {
                    ev.prevent_default();
                    set_is_over.set(true);
                }
                on:dragleave=move |_| set_is_over.set(false)
                on:drop=on_drop
            >
                <Show
                    when=move || uploading.get()
                    fallback={
                        let input_id = input_id.clone();
                        move || {
                            let replacing = filename.get().is_some();
                            view! {
                                <div class="drop-zone-content">
                                    <p class="drop-main">
                                        {if replacing { "Drop a new image to replace it" } else { "Drop an image here" }}
                                    </p>
                                    <p class="drop-hint">"or"</p>
                                    <label for=input_id.clone() class="btn btn-secondary">
                                        "Browse Files"
                                    </label>
                                    <input
                                        type="file"
                                        id=input_id.clone()
                                        accept="image/*"
                                        style="display: none"
                                        on:change=on_input_change.clone()
                                    />
                                    <p class="drop-formats">{move || upload_hint(config.get().max_upload_bytes)}</p>
                                </div>
                            }
                        }
                    }
                >
                    <div class="drop-zone-loading-content">
                        <div class="spinner"></div>
                        <p>"Uploading..."</p>
                    </div>
                </Show>
            </div>

            {move || error.get().map(|msg| view! {
                <div class="upload-error">
                    <span>{msg}</span>
                    <button class="btn-dismiss" title="Dismiss" on:click=move |_| set_error.set(None)>
                        "\u{2715}"
                    </button>
                </div>
            })}
        </div>
    }
}

/// Upload widgets for both sides, laid out next to each other.
#[component]
pub fn UploadGrid(
    #[prop(into)] session_id: String,
    #[prop(into)] filename_a: Signal<Option<String>>,
    #[prop(into)] filename_b: Signal<Option<String>>,
    on_uploaded: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="upload-grid">
            <ImageUpload
                session_id=session_id.clone()
                side=ImageSlot::ImageA
                filename=filename_a
                on_uploaded=on_uploaded
            />
            <ImageUpload
                session_id=session_id
                side=ImageSlot::ImageB
                filename=filename_b
                on_uploaded=on_uploaded
            />
        </div>
    }
}

fn upload_error_message(err: &ApiError) -> String {
    match err {
        ApiError::Http { detail, .. } => detail.clone(),
        _ => "Upload failed".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_grid(config: AppConfig, filename_a: Option<&str>) -> String {
        Owner::new().with(|| {
            provide_context(RwSignal::new(config));
            let filename_a = filename_a.map(str::to_string);
            view! {
                <UploadGrid
                    session_id="sess-1"
                    filename_a=Signal::derive(move || filename_a.clone())
                    filename_b=Signal::derive(|| None::<String>)
                    on_uploaded=Callback::new(|_| {})
                />
            }
            .to_html()
        })
    }

    #[test]
    fn test_upload_grid_renders_both_drop_zones() {
        let html = render_grid(AppConfig::default(), None);
        assert!(html.contains("file-input-image_a"), "{}", html);
        assert!(html.contains("file-input-image_b"), "{}", html);
        assert!(html.contains("Image A (Original)"));
        assert!(html.contains("Image B (Variation)"));
        assert_eq!(html.matches("Drop an image here").count(), 2);
    }

    #[test]
    fn test_stored_image_shows_preview_and_replace_hint() {
        let html = render_grid(AppConfig::default(), Some("a.png"));
        assert!(html.contains("http://localhost:8000/uploads/a.png"), "{}", html);
        assert!(html.contains("Drop a new image to replace it"));
        assert_eq!(html.matches("Drop an image here").count(), 1);
    }

    #[test]
    fn test_hint_uses_configured_limit() {
        let config = AppConfig {
            max_upload_bytes: 20 * 1024 * 1024,
            ..AppConfig::default()
        };
        let html = render_grid(config, None);
        assert!(html.contains("up to 20 MB"), "{}", html);
        assert!(!html.contains("up to 100 MB"));
    }

    #[test]
    fn test_upload_error_prefers_backend_detail() {
        let err = ApiError::Http {
            status: 400,
            detail: "Only images are accepted".to_string(),
        };
        assert_eq!(upload_error_message(&err), "Only images are accepted");
        assert_eq!(upload_error_message(&ApiError::Network("offline".into())), "Upload failed");
    }
}
