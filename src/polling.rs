//! Interval polling bound to the lifetime of the calling component.

use std::time::Duration;

use leptos::leptos_dom::helpers::set_interval_with_handle;
use leptos::prelude::*;
use tracing::{debug, error};

/// Run `tick` now and then every `period_ms` until the owning component is
/// unmounted.
pub fn use_interval<F>(label: &'static str, period_ms: u32, tick: F)
where
    F: Fn() + 'static,
{
    tick();

    let period = Duration::from_millis(u64::from(period_ms.max(250)));
    match set_interval_with_handle(tick, period) {
        Ok(handle) => {
            debug!("Polling {} every {:?}", label, period);
            on_cleanup(move || {
                debug!("Stopped polling {}", label);
                handle.clear();
            });
        }
        Err(e) => error!("Could not start polling {}: {:?}", label, e),
    }
}
