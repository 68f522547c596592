use std::time::Duration;

use serde_json::{Map, Value};

use bizflow_core::resolve::Layers;
use bizflow_core::workflow::NodeOutput;

/// Upper bound on how long a `delay` node actually sleeps.
pub const MAX_DELAY_MS: u64 = 5000;

/// Milliseconds requested by a `delay` node config (`duration` × `unit`).
///
/// Unknown units count as days. Missing, negative or non-numeric durations
/// request nothing.
pub fn requested_delay_ms(config: &Map<String, Value>) -> u64 {
    let fields = Layers::new().push(config);
    let duration = fields.number("duration").unwrap_or(0.0);
    if !duration.is_finite() || duration <= 0.0 {
        return 0;
    }
    let unit_ms = match fields.string("unit").as_deref() {
        Some("seconds") => 1_000.0,
        Some("minutes") => 60_000.0,
        Some("hours") => 3_600_000.0,
        _ => 86_400_000.0,
    };
    (duration * unit_ms) as u64
}

/// `delay`: sleep for the requested time, capped at [`MAX_DELAY_MS`].
pub async fn delay(config: &Map<String, Value>) -> NodeOutput {
    let requested_ms = requested_delay_ms(config);
    let delayed_ms = requested_ms.min(MAX_DELAY_MS);
    if delayed_ms > 0 {
        tokio::time::sleep(Duration::from_millis(delayed_ms)).await;
    }
    NodeOutput::ok()
        .with("requestedMs", requested_ms)
        .with("delayedMs", delayed_ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::time::Instant;

    fn config(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn test_units() {
        assert_eq!(requested_delay_ms(&config(json!({ "duration": 2, "unit": "seconds" }))), 2_000);
        assert_eq!(requested_delay_ms(&config(json!({ "duration": 3, "unit": "minutes" }))), 180_000);
        assert_eq!(requested_delay_ms(&config(json!({ "duration": 1, "unit": "hours" }))), 3_600_000);
        assert_eq!(requested_delay_ms(&config(json!({ "duration": 1, "unit": "weeks" }))), 86_400_000);
        assert_eq!(requested_delay_ms(&config(json!({ "duration": "1.5", "unit": "seconds" }))), 1_500);
    }

    #[test]
    fn test_bad_durations_request_nothing() {
        assert_eq!(requested_delay_ms(&Map::new()), 0);
        assert_eq!(requested_delay_ms(&config(json!({ "duration": -5, "unit": "seconds" }))), 0);
        assert_eq!(requested_delay_ms(&config(json!({ "duration": "soon" }))), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_long_delay_is_capped() {
        let start = Instant::now();
        let out = delay(&config(json!({ "duration": 100, "unit": "seconds" }))).await;

        assert!(out.success);
        assert_eq!(out.get("requestedMs"), Some(&json!(100_000)));
        assert_eq!(out.get("delayedMs"), Some(&json!(5_000)));
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(MAX_DELAY_MS));
        assert!(elapsed < Duration::from_millis(6_000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_delay_runs_in_full() {
        let start = Instant::now();
        let out = delay(&config(json!({ "duration": 2, "unit": "seconds" }))).await;
        assert_eq!(out.get("delayedMs"), Some(&json!(2_000)));
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(2_000));
        assert!(elapsed < Duration::from_millis(3_000));
    }
}
