use once_cell::sync::Lazy;
use prometheus::{IntCounter, Registry};

/// Tellere for hentingen. Hver instans har sitt eget `Registry`,
/// slik at tester kan telle isolert.
pub struct Metrics {
    pub registry: Registry,
    pub days_fetched: IntCounter,
    pub days_empty: IntCounter,
    pub days_failed: IntCounter,
    pub windows_no_data: IntCounter,
}

fn counter(registry: &Registry, name: &str, help: &str) -> IntCounter {
    let c = IntCounter::new(name, help).expect("static counter name/help is valid");
    registry
        .register(Box::new(c.clone()))
        .expect("counter registered once per registry");
    c
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();
        let days_fetched = counter(
            &registry,
            "hrdist_days_fetched_total",
            "Days with at least one valid heart-rate reading",
        );
        let days_empty = counter(
            &registry,
            "hrdist_days_empty_total",
            "Days that returned no valid readings",
        );
        let days_failed = counter(
            &registry,
            "hrdist_days_failed_total",
            "Days skipped because retrieval failed or timed out",
        );
        let windows_no_data = counter(
            &registry,
            "hrdist_windows_no_data_total",
            "Windows that ended up without any observations",
        );
        Self { registry, days_fetched, days_empty, days_failed, windows_no_data }
    }

    /// Tekstformat for skraping (`/metrics` i verten).
    pub fn render(&self) -> String {
        use prometheus::Encoder;
        let mut buf = Vec::new();
        let encoder = prometheus::TextEncoder::new();
        if encoder.encode(&self.registry.gather(), &mut buf).is_err() {
            return String::new();
        }
        String::from_utf8(buf).unwrap_or_default()
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL: Lazy<Metrics> = Lazy::new(Metrics::new);

/// Prosess-global instans, brukt av JSON/Python-inngangene.
pub fn global() -> &'static Metrics {
    &GLOBAL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_are_isolated_per_instance() {
        let a = Metrics::new();
        let b = Metrics::new();
        a.days_failed.inc();
        assert_eq!(a.days_failed.get(), 1);
        assert_eq!(b.days_failed.get(), 0);
        assert!(a.render().contains("hrdist_days_failed_total 1"));
    }
}
