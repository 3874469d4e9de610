//! Lifecycle audit hooks for `SlotRuntime`.
//!
//! Records carry a stage identifier, the slot involved and structured details
//! so callers can log, buffer or visualize reconciliation without reaching
//! into the reconciler.

use std::sync::Mutex;
use std::time::SystemTime;

use serde_json::Value;

/// Checkpoints emitted by `SlotRuntime`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeAuditStage {
    /// A slot was mounted (or re-mounted) through `on_bind`.
    SlotMounted,
    /// Widget markup was reused, rendered, hydrated or returned.
    SlotReconciled,
    /// Pass gated away: no widget before, none now.
    SlotSkipped,
    /// Widget present but its container is not in the document.
    ContainerMissing,
    /// A bound widget went away and its slot was cleaned.
    SlotDetached,
    /// The slot was unmounted and forgotten.
    SlotUnmounted,
    /// Host sent a descriptor without identity fields.
    ContractViolation,
    /// The widget runtime failed to produce markup.
    RenderFailed,
}

/// Structured audit entry.
#[derive(Debug, Clone)]
pub struct RuntimeAuditEvent {
    pub timestamp: SystemTime,
    pub stage: RuntimeAuditStage,
    pub slot: String,
    pub details: Vec<(String, Value)>,
}

impl RuntimeAuditEvent {
    fn new(stage: RuntimeAuditStage, slot: impl Into<String>) -> Self {
        Self {
            timestamp: SystemTime::now(),
            stage,
            slot: slot.into(),
            details: Vec::new(),
        }
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value)
    }
}

/// Builder helper to append fields ergonomically.
pub struct RuntimeAuditEventBuilder {
    event: RuntimeAuditEvent,
}

impl RuntimeAuditEventBuilder {
    pub fn new(stage: RuntimeAuditStage, slot: impl Into<String>) -> Self {
        Self {
            event: RuntimeAuditEvent::new(stage, slot),
        }
    }

    pub fn detail(mut self, key: impl Into<String>, value: Value) -> Self {
        self.event.details.push((key.into(), value));
        self
    }

    pub fn finish(self) -> RuntimeAuditEvent {
        self.event
    }
}

/// Trait implemented by any audit sink.
pub trait RuntimeAudit: Send + Sync {
    fn record(&self, event: RuntimeAuditEvent);
}

/// Default no-op implementation used when auditing is disabled.
#[derive(Debug, Default)]
pub struct NullRuntimeAudit;

impl RuntimeAudit for NullRuntimeAudit {
    fn record(&self, _event: RuntimeAuditEvent) {}
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingAudit {
    events: Mutex<Vec<RuntimeAuditEvent>>,
}

impl RecordingAudit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RuntimeAuditEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn stages(&self) -> Vec<RuntimeAuditStage> {
        self.events().into_iter().map(|event| event.stage).collect()
    }
}

impl RuntimeAudit for RecordingAudit {
    fn record(&self, event: RuntimeAuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_collects_details() {
        let event = RuntimeAuditEventBuilder::new(RuntimeAuditStage::SlotReconciled, "header")
            .detail("cache", json!("hit"))
            .finish();
        assert_eq!(event.slot, "header");
        assert_eq!(event.detail("cache"), Some(&json!("hit")));
        assert_eq!(event.detail("missing"), None);
    }

    #[test]
    fn recording_audit_keeps_order() {
        let audit = RecordingAudit::new();
        audit.record(RuntimeAuditEventBuilder::new(RuntimeAuditStage::SlotMounted, "a").finish());
        audit.record(RuntimeAuditEventBuilder::new(RuntimeAuditStage::SlotDetached, "a").finish());
        assert_eq!(
            audit.stages(),
            vec![RuntimeAuditStage::SlotMounted, RuntimeAuditStage::SlotDetached]
        );
    }
}
