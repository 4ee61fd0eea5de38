//! Side-by-side view of both images with element boxes drawn over them.

use leptos::prelude::*;

use crate::api::{AnalysisElement, BoundingBox, ImageSlot, StageResults};
use crate::overlay::{box_style, overlay_elements, Zoom};

#[component]
pub fn ImageComparison(
    image_a_url: Option<String>,
    image_b_url: Option<String>,
    results: Option<StageResults>,
) -> impl IntoView {
    let overlay = overlay_elements(results.as_ref());
    let source = overlay.source;
    let elements = StoredValue::new(overlay.elements);
    let (selected, set_selected) = signal::<Option<String>>(None);
    let (zoom, set_zoom) = signal(Zoom::default());

    let toggle = move |id: String| {
        set_selected.update(|s| *s = if s.as_deref() == Some(id.as_str()) { None } else { Some(id) });
    };

    let selected_element = move || {
        let id = selected.get()?;
        elements.with_value(|els| els.iter().find(|e| e.id == id).cloned())
    };

    let pane = move |slot: ImageSlot, url: Option<String>| {
        let pick: fn(&AnalysisElement) -> Option<BoundingBox> = match slot {
            ImageSlot::ImageA => |e| e.position_a,
            ImageSlot::ImageB => |e| e.position_b,
        };
        view! {
            <div class="comparison-pane">
                <h4>{slot.title()}</h4>
                <div class="comparison-viewport">
                    <div class="comparison-canvas" style=move || zoom.get().style()>
                        {match url {
                            Some(src) => view! { <img src=src class="comparison-image" alt=slot.title() /> }.into_any(),
                            None => view! { <div class="comparison-missing">"No image"</div> }.into_any(),
                        }}
                        {elements.get_value().into_iter().map(|el| {
                            let id = el.id.clone();
                            let is_selected = {
                                let id = id.clone();
                                move || selected.get().as_deref() == Some(id.as_str())
                            };
                            view! {
                                <div
                                    class="overlay-box"
                                    class:overlay-selected=is_selected
                                    style=box_style(pick(&el))
                                    title=el.name.clone()
                                    on:click=move |_| toggle(id.clone())
                                >
                                    <span class="overlay-label">{el.name.clone()}</span>
                                </div>
                            }
                        }).collect::<Vec<_>>()}
                    </div>
                </div>
            </div>
        }
    };

    view! {
        <div class="image-comparison">
            <style>{include_str!("image_comparison.css")}</style>

            <div class="comparison-toolbar">
                <button
                    class="btn btn-small btn-secondary"
                    disabled=move || !zoom.get().can_zoom_out()
                    on:click=move |_| set_zoom.update(|z| *z = z.zoom_out())
                >
                    "-"
                </button>
                <span class="zoom-level">{move || format!("{}%", zoom.get().percent())}</span>
                <button
                    class="btn btn-small btn-secondary"
                    disabled=move || !zoom.get().can_zoom_in()
                    on:click=move |_| set_zoom.update(|z| *z = z.zoom_in())
                >
                    "+"
                </button>
                <button class="btn btn-small btn-secondary" on:click=move |_| set_zoom.set(Zoom::default())>
                    "Reset"
                </button>
            </div>

            {source.disclaimer().map(|text| view! { <p class="overlay-disclaimer">{text}</p> })}

            <div class="comparison-panes">
                {pane(ImageSlot::ImageA, image_a_url)}
                {pane(ImageSlot::ImageB, image_b_url)}
            </div>

            <div class="comparison-details">
                <ul class="element-list">
                    {elements.get_value().into_iter().map(|el| {
                        let id = el.id.clone();
                        let is_selected = {
                            let id = id.clone();
                            move || selected.get().as_deref() == Some(id.as_str())
                        };
                        view! {
                            <li
                                class="element-item"
                                class:element-selected=is_selected
                                on:click=move |_| toggle(id.clone())
                            >
                                <strong>{el.name}</strong>
                                <span class="element-kind">{el.kind}</span>
                            </li>
                        }
                    }).collect::<Vec<_>>()}
                </ul>

                {move || match selected_element() {
                    Some(el) => view! {
                        <div class="element-panel">
                            <h4>{el.name}</h4>
                            <dl>
                                <dt>"Changes"</dt>
                                <dd>{el.changes}</dd>
                                <dt>"Impact"</dt>
                                <dd>{el.impact}</dd>
                                {el.recommendation.map(|r| view! {
                                    <dt>"Recommendation"</dt>
                                    <dd>{r}</dd>
                                })}
                            </dl>
                        </div>
                    }.into_any(),
                    None => view! {
                        <p class="element-hint">"Select an element to see what changed."</p>
                    }.into_any(),
                }}
            </div>
        </div>
    }
}
