use crate::render::Applied;
use crate::widget::{ContractViolation, SlotName, WidgetIdentity};

/// Lifecycle phase of a slot after a pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SlotPhase {
    /// No widget assigned.
    #[default]
    Empty,
    /// Widget assigned but its container could not be resolved yet.
    Waiting,
    /// Widget markup written (or returned, on the server).
    Bound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Untouched,
    Hit,
    Miss,
    Invalidated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// Nothing assigned now or before.
    Unassigned,
    /// A previously bound widget went away.
    Detached,
    /// Widget present, container not found on the client.
    ContainerMissing,
}

/// What the host should show for a slot after a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotOutput {
    /// Caller-supplied placeholder; the container was not written.
    Fallback {
        markup: String,
        reason: FallbackReason,
    },
    /// Server pass: markup to embed in the document.
    Markup(String),
    /// Client pass: existing server markup was kept and hydrated.
    Hydrated,
    /// Client pass: container contents replaced.
    Replaced,
}

impl SlotOutput {
    pub(crate) fn from_applied(applied: Applied, fallback: impl FnOnce() -> String) -> Self {
        match applied {
            Applied::Markup(markup) => SlotOutput::Markup(markup),
            Applied::Hydrated => SlotOutput::Hydrated,
            Applied::Replaced => SlotOutput::Replaced,
            Applied::NoContainer => SlotOutput::Fallback {
                markup: fallback(),
                reason: FallbackReason::ContainerMissing,
            },
        }
    }

    /// Markup the host has to place itself, if any.
    pub fn markup(&self) -> Option<&str> {
        match self {
            SlotOutput::Fallback { markup, .. } | SlotOutput::Markup(markup) => Some(markup),
            SlotOutput::Hydrated | SlotOutput::Replaced => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, SlotOutput::Fallback { .. })
    }

    pub fn fallback_reason(&self) -> Option<FallbackReason> {
        match self {
            SlotOutput::Fallback { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

/// Outcome of reconciling one slot for one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotDecision {
    pub slot: SlotName,
    pub phase: SlotPhase,
    pub cache: CacheStatus,
    pub output: SlotOutput,
    /// Identity the slot is bound to after the pass.
    pub identity: Option<WidgetIdentity>,
    /// Data-contract problem found in the incoming descriptor.
    pub violation: Option<ContractViolation>,
    /// Gated pass: nothing before, nothing now, no component invoked.
    pub skipped: bool,
}

impl SlotDecision {
    pub(crate) fn fallback(
        slot: &str,
        markup: String,
        reason: FallbackReason,
        cache: CacheStatus,
    ) -> Self {
        Self {
            slot: slot.to_string(),
            phase: SlotPhase::Empty,
            cache,
            output: SlotOutput::Fallback { markup, reason },
            identity: None,
            violation: None,
            skipped: false,
        }
    }
}
