//! Slot reconciliation state machine.
//!
//! For every render pass the reconciler compares the previous and next
//! descriptor of a slot, decides between cached markup, fresh markup, fallback
//! and teardown, and writes through the [`RenderWrapper`](crate::render::RenderWrapper).
//! It owns the markup cache; nothing else reads or writes it.

mod core;
mod decision;
mod renderer;

pub use self::core::{ReconcilerConfig, SlotReconciler};
pub use decision::{CacheStatus, FallbackReason, SlotDecision, SlotOutput, SlotPhase};
pub use renderer::{FnRenderer, SlotHtmlRenderer, WidgetRenderer};
