//! Slot reconciliation and markup caching for embedded widgets.
//!
//! Independently versioned widgets are mounted into named slots of a host
//! page. For every render pass the [`SlotReconciler`] decides whether to reuse
//! cached markup, render fresh markup, fall back to a placeholder, or tear the
//! slot down, touching only the node that owns the slot. [`SlotRuntime`] wraps
//! it for hosts that drive several slots and want logging, metrics and audit
//! hooks.

pub mod cache;
pub mod container;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod reconciler;
pub mod render;
pub mod runtime;
pub mod widget;

pub use cache::{CacheEntry, MarkupCache};
pub use container::{
    Document, ExecutionContext, MemoryDocument, NodeId, Surface, resolve_container,
};
pub use error::{RenderError, Result, SlotError};
pub use logging::{LogEvent, LogFields, LogLevel, Logger, LoggingError, LoggingResult};
pub use metrics::{MetricSnapshot, ReconcileMetrics};
pub use reconciler::{
    CacheStatus, FallbackReason, FnRenderer, ReconcilerConfig, SlotDecision, SlotHtmlRenderer,
    SlotOutput, SlotPhase, SlotReconciler, WidgetRenderer,
};
pub use render::{Applied, RenderSettings, RenderWrapper};
pub use runtime::audit::{
    NullRuntimeAudit, RecordingAudit, RuntimeAudit, RuntimeAuditEvent, RuntimeAuditEventBuilder,
    RuntimeAuditStage,
};
pub use runtime::settings::RuntimeSettings;
pub use runtime::{PassReport, RuntimeConfig, ServerRender, SlotRuntime};
pub use widget::{
    AssetKind, ContractViolation, SlotName, SlotProperties, WidgetAsset, WidgetDescriptor,
    WidgetIdentity, has_widget_changed,
};
