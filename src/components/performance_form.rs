use leptos::prelude::*;

use crate::api::{format_improvement, ImageMetrics, ImageSlot, PerformanceData};
use crate::workflow::{parse_count, parse_rate};

/// Hand-entered A/B metrics. Sent with the start request when any visitor
/// count is set.
#[component]
pub fn PerformanceForm(performance: RwSignal<PerformanceData>) -> impl IntoView {
    view! {
        <div class="performance-form">
            <p class="section-description">
                "Optional. Enter the results of the live A/B test so the analysis can relate design changes to conversion."
            </p>
            <div class="performance-grid">
                <MetricsFields performance=performance side=ImageSlot::ImageA />
                <MetricsFields performance=performance side=ImageSlot::ImageB />
            </div>
            {move || performance.get().improvement().map(|delta| view! {
                <div class="improvement-badge">
                    {format!("Variation B improved by {} points", format_improvement(delta))}
                </div>
            })}
        </div>
    }
}

#[component]
fn MetricsFields(performance: RwSignal<PerformanceData>, side: ImageSlot) -> impl IntoView {
    // Seeded once; the inputs own their text after that.
    let initial = *performance.get_untracked().metrics(side);
    let write = move |f: fn(&mut ImageMetrics, &str)| {
        move |ev: web_sys::Event| {
            let value = event_target_value(&ev);
            performance.update(|p| f(p.metrics_mut(side), &value));
        }
    };
    let prefix = side.as_str();

    view! {
        <fieldset class="metrics-fields">
            <legend>{side.title()}</legend>
            <div class="form-group">
                <label for=format!("{}-visitors", prefix)>"Visitors"</label>
                <input
                    id=format!("{}-visitors", prefix)
                    type="number"
                    min="0"
                    class="input"
                    prop:value=initial.visitors.to_string()
                    on:input=write(|m, v| m.visitors = parse_count(v))
                />
            </div>
            <div class="form-group">
                <label for=format!("{}-conversions", prefix)>"Conversions"</label>
                <input
                    id=format!("{}-conversions", prefix)
                    type="number"
                    min="0"
                    class="input"
                    prop:value=initial.conversions.to_string()
                    on:input=write(|m, v| m.conversions = parse_count(v))
                />
            </div>
            <div class="form-group">
                <label for=format!("{}-rate", prefix)>"Conversion rate (%)"</label>
                <input
                    id=format!("{}-rate", prefix)
                    type="number"
                    min="0"
                    step="0.1"
                    class="input"
                    prop:value=initial.conversion_rate.to_string()
                    on:input=write(|m, v| m.conversion_rate = parse_rate(v))
                />
            </div>
        </fieldset>
    }
}
