use std::collections::HashMap;

use crate::cache::MarkupCache;
use crate::container::{Surface, resolve_container};
use crate::error::{Result, SlotError};
use crate::render::{RenderSettings, RenderWrapper};
use crate::widget::{ContractViolation, SlotName, WidgetDescriptor, has_widget_changed};

use super::decision::{CacheStatus, FallbackReason, SlotDecision, SlotOutput, SlotPhase};
use super::renderer::WidgetRenderer;

/// Reconciler parameters supplied by the host.
#[derive(Debug, Clone, Default)]
pub struct ReconcilerConfig {
    /// Placeholder emitted while a slot has no widget.
    pub fallback: String,
    /// Per-slot overrides for `fallback`.
    pub slot_fallbacks: HashMap<SlotName, String>,
    pub render: RenderSettings,
}

impl ReconcilerConfig {
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    pub fn with_slot_fallback(
        mut self,
        slot: impl Into<SlotName>,
        fallback: impl Into<String>,
    ) -> Self {
        self.slot_fallbacks.insert(slot.into(), fallback.into());
        self
    }

    pub fn fallback_for(&self, slot: &str) -> String {
        self.slot_fallbacks
            .get(slot)
            .unwrap_or(&self.fallback)
            .clone()
    }
}

#[derive(Debug, Default)]
struct SlotRecord {
    previous: Option<WidgetDescriptor>,
    phase: SlotPhase,
    /// Markup has been written on the client since the record was created.
    client_written: bool,
}

/// Per-slot reconciliation driven by explicit lifecycle entry points.
///
/// The document is never stored: every call receives the [`Surface`] of the
/// current pass and re-resolves containers from scratch.
pub struct SlotReconciler {
    renderer: Box<dyn WidgetRenderer>,
    wrapper: RenderWrapper,
    cache: MarkupCache,
    slots: HashMap<SlotName, SlotRecord>,
    config: ReconcilerConfig,
}

impl SlotReconciler {
    pub fn new<R>(renderer: R, config: ReconcilerConfig) -> Self
    where
        R: WidgetRenderer + 'static,
    {
        Self {
            renderer: Box::new(renderer),
            wrapper: RenderWrapper::new(config.render.clone()),
            cache: MarkupCache::new(),
            slots: HashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    pub fn cache(&self) -> &MarkupCache {
        &self.cache
    }

    pub fn phase(&self, slot: &str) -> SlotPhase {
        self.slots
            .get(slot)
            .map(|record| record.phase)
            .unwrap_or_default()
    }

    pub fn is_tracked(&self, slot: &str) -> bool {
        self.slots.contains_key(slot)
    }

    /// Mount: start the slot from a fresh record, then reconcile. Remounting a
    /// tracked slot keeps its record, so a bound widget is still detached
    /// (or reused) against what it left in the cache and the document.
    pub fn on_bind(
        &mut self,
        slot: &str,
        descriptor: Option<&WidgetDescriptor>,
        surface: &mut Surface<'_>,
    ) -> Result<SlotDecision> {
        self.slots.entry(slot.to_string()).or_default();
        self.on_update(slot, descriptor, surface)
    }

    /// Subsequent render pass for a mounted slot.
    pub fn on_update(
        &mut self,
        slot: &str,
        next: Option<&WidgetDescriptor>,
        surface: &mut Surface<'_>,
    ) -> Result<SlotDecision> {
        let (next, violation) = narrow(slot, next);
        let had_previous = self
            .slots
            .get(slot)
            .is_some_and(|record| record.previous.is_some());

        let mut decision = match next {
            Some(next) => self.bind(slot, next, surface)?,
            None if had_previous => self.detach(slot, surface),
            None => self.skip(slot),
        };
        decision.violation = violation;
        Ok(decision)
    }

    /// Unmount: clean up whatever the slot holds and forget it. A second call
    /// for the same slot finds nothing left to clean.
    pub fn on_detach(&mut self, slot: &str, surface: &mut Surface<'_>) -> SlotDecision {
        let had_previous = self
            .slots
            .get(slot)
            .is_some_and(|record| record.previous.is_some());

        let decision = if had_previous {
            self.detach(slot, surface)
        } else {
            self.skip(slot)
        };
        self.slots.remove(slot);
        decision
    }

    fn skip(&self, slot: &str) -> SlotDecision {
        SlotDecision {
            skipped: true,
            ..SlotDecision::fallback(
                slot,
                self.config.fallback_for(slot),
                FallbackReason::Unassigned,
                CacheStatus::Untouched,
            )
        }
    }

    fn detach(&mut self, slot: &str, surface: &mut Surface<'_>) -> SlotDecision {
        let record = self.slots.entry(slot.to_string()).or_default();
        let previous = record.previous.take();
        record.phase = SlotPhase::Empty;
        record.client_written = false;

        let cache = match self.cache.invalidate(slot) {
            Some(_) => CacheStatus::Invalidated,
            None => CacheStatus::Untouched,
        };

        if let Some(properties) = previous.as_ref().and_then(|p| p.slot(slot)) {
            let container = resolve_container(surface, &properties.container_selector);
            self.wrapper.clear(surface, container);
        }

        SlotDecision::fallback(
            slot,
            self.config.fallback_for(slot),
            FallbackReason::Detached,
            cache,
        )
    }

    fn bind(
        &mut self,
        slot: &str,
        next: &WidgetDescriptor,
        surface: &mut Surface<'_>,
    ) -> Result<SlotDecision> {
        let Some(properties) = next.slot(slot) else {
            return Ok(self.skip(slot));
        };
        let identity = next.identity();
        let container = resolve_container(surface, &properties.container_selector);

        if !surface.is_server() && container.is_none() {
            let record = self.slots.entry(slot.to_string()).or_default();
            record.previous = Some(next.clone());
            record.phase = SlotPhase::Waiting;
            return Ok(SlotDecision {
                phase: SlotPhase::Waiting,
                identity: Some(identity),
                ..SlotDecision::fallback(
                    slot,
                    self.config.fallback_for(slot),
                    FallbackReason::ContainerMissing,
                    CacheStatus::Untouched,
                )
            });
        }

        let previous = self
            .slots
            .get(slot)
            .and_then(|record| record.previous.as_ref());
        let cached = if has_widget_changed(previous, Some(next)) {
            None
        } else {
            self.cache
                .lookup(slot, &identity)
                .map(|entry| entry.markup.clone())
        };

        let (markup, cache) = match cached {
            Some(markup) => (markup, CacheStatus::Hit),
            None => {
                let markup =
                    self.renderer
                        .render(next, slot)
                        .map_err(|source| SlotError::Render {
                            slot: slot.to_string(),
                            widget: identity.to_string(),
                            source,
                        })?;
                self.cache.put(slot, identity.clone(), markup.clone());
                (markup, CacheStatus::Miss)
            }
        };

        let record = self.slots.entry(slot.to_string()).or_default();
        let applied =
            self.wrapper
                .apply_markup(surface, container, &markup, !record.client_written);
        if !surface.is_server() {
            record.client_written = true;
        }
        record.previous = Some(next.clone());
        record.phase = SlotPhase::Bound;

        let fallback = &self.config;
        let output = SlotOutput::from_applied(applied, || fallback.fallback_for(slot));
        Ok(SlotDecision {
            slot: slot.to_string(),
            phase: SlotPhase::Bound,
            cache,
            output,
            identity: Some(identity),
            violation: None,
            skipped: false,
        })
    }
}

/// Reduce the host's descriptor to what this slot reconciles against.
/// Malformed identities and descriptors without this slot count as absent.
fn narrow<'d>(
    slot: &str,
    next: Option<&'d WidgetDescriptor>,
) -> (Option<&'d WidgetDescriptor>, Option<ContractViolation>) {
    let Some(descriptor) = next else {
        return (None, None);
    };
    match descriptor.validate() {
        Err(violation) => (None, Some(violation)),
        Ok(_) if descriptor.slot(slot).is_some() => (Some(descriptor), None),
        Ok(_) => (None, None),
    }
}
