use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;

/// Counters accumulated across render passes.
#[derive(Debug, Default, Clone)]
pub struct ReconcileMetrics {
    passes: u64,
    skipped: u64,
    cache_hits: u64,
    cache_misses: u64,
    fallbacks: u64,
    detaches: u64,
    hydrations: u64,
    replacements: u64,
    server_renders: u64,
    render_failures: u64,
}

impl ReconcileMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_pass(&mut self) {
        self.passes = self.passes.saturating_add(1);
    }

    pub fn record_skipped(&mut self) {
        self.skipped = self.skipped.saturating_add(1);
    }

    pub fn record_cache_hit(&mut self) {
        self.cache_hits = self.cache_hits.saturating_add(1);
    }

    pub fn record_cache_miss(&mut self) {
        self.cache_misses = self.cache_misses.saturating_add(1);
    }

    pub fn record_fallback(&mut self) {
        self.fallbacks = self.fallbacks.saturating_add(1);
    }

    pub fn record_detach(&mut self) {
        self.detaches = self.detaches.saturating_add(1);
    }

    pub fn record_hydration(&mut self) {
        self.hydrations = self.hydrations.saturating_add(1);
    }

    pub fn record_replacement(&mut self) {
        self.replacements = self.replacements.saturating_add(1);
    }

    pub fn record_server_render(&mut self) {
        self.server_renders = self.server_renders.saturating_add(1);
    }

    pub fn record_render_failure(&mut self) {
        self.render_failures = self.render_failures.saturating_add(1);
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            passes: self.passes,
            skipped: self.skipped,
            cache_hits: self.cache_hits,
            cache_misses: self.cache_misses,
            fallbacks: self.fallbacks,
            detaches: self.detaches,
            hydrations: self.hydrations,
            replacements: self.replacements,
            server_renders: self.server_renders,
            render_failures: self.render_failures,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub passes: u64,
    pub skipped: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub fallbacks: u64,
    pub detaches: u64,
    pub hydrations: u64,
    pub replacements: u64,
    pub server_renders: u64,
    pub render_failures: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "reconcile_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("passes".to_string(), json!(self.passes));
        map.insert("skipped".to_string(), json!(self.skipped));
        map.insert("cache_hits".to_string(), json!(self.cache_hits));
        map.insert("cache_misses".to_string(), json!(self.cache_misses));
        map.insert("fallbacks".to_string(), json!(self.fallbacks));
        map.insert("detaches".to_string(), json!(self.detaches));
        map.insert("hydrations".to_string(), json!(self.hydrations));
        map.insert("replacements".to_string(), json!(self.replacements));
        map.insert("server_renders".to_string(), json!(self.server_renders));
        map.insert("render_failures".to_string(), json!(self.render_failures));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_counters() {
        let mut metrics = ReconcileMetrics::new();
        metrics.record_pass();
        metrics.record_pass();
        metrics.record_cache_hit();
        metrics.record_render_failure();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.passes, 2);
        assert_eq!(snapshot.cache_hits, 1);
        assert_eq!(snapshot.render_failures, 1);

        let event = snapshot.to_log_event("widget_slots::metrics");
        assert_eq!(event.message, "reconcile_metrics");
        assert_eq!(event.field("passes"), Some(&json!(2)));
    }
}
