use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use serde_json::json;

use crate::container::Surface;
use crate::error::{Result, SlotError};
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::{MetricSnapshot, ReconcileMetrics};
use crate::reconciler::{
    CacheStatus, FallbackReason, ReconcilerConfig, SlotDecision, SlotOutput, SlotPhase,
    SlotReconciler, WidgetRenderer,
};
use crate::widget::{SlotName, WidgetAsset, WidgetDescriptor};

pub mod audit;
pub mod settings;

use audit::{NullRuntimeAudit, RuntimeAudit, RuntimeAuditEventBuilder, RuntimeAuditStage};

pub const DEFAULT_LOG_TARGET: &str = "widget_slots::runtime";

/// Configuration knobs for the slot runtime.
#[derive(Clone)]
pub struct RuntimeConfig {
    pub reconciler: ReconcilerConfig,
    /// Optional structured logger used by the runtime.
    pub logger: Option<Logger>,
    /// Metrics accumulator shared with the host.
    pub metrics: Option<Arc<Mutex<ReconcileMetrics>>>,
    /// Target field attached to every log event.
    pub log_target: String,
    pub audit: Arc<dyn RuntimeAudit>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            reconciler: ReconcilerConfig::default(),
            logger: None,
            metrics: None,
            log_target: DEFAULT_LOG_TARGET.to_string(),
            audit: Arc::new(NullRuntimeAudit),
        }
    }
}

impl RuntimeConfig {
    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(ReconcileMetrics::new())));
        }
    }

    /// Disable metrics collection.
    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    /// Access the shared metrics handle if metrics are enabled.
    pub fn metrics_handle(&self) -> Option<Arc<Mutex<ReconcileMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

/// Decisions of one render pass across all mounted slots, in mount order.
#[derive(Debug, Clone, Default)]
pub struct PassReport {
    pub decisions: Vec<SlotDecision>,
}

impl PassReport {
    pub fn decision(&self, slot: &str) -> Option<&SlotDecision> {
        self.decisions.iter().find(|decision| decision.slot == slot)
    }

    pub fn has_violations(&self) -> bool {
        self.decisions
            .iter()
            .any(|decision| decision.violation.is_some())
    }
}

/// Output of a server pass, ready for document assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerRender {
    /// Markup (widget or fallback) per mounted slot.
    pub slots: BTreeMap<SlotName, String>,
    /// Assets of the widget when at least one slot is bound.
    pub assets: Vec<WidgetAsset>,
}

/// Host-facing driver: owns the mounted slot set and reports every decision
/// to the configured logger, metrics and audit sink.
pub struct SlotRuntime {
    reconciler: SlotReconciler,
    mounted: Vec<SlotName>,
    logger: Option<Logger>,
    metrics: Option<Arc<Mutex<ReconcileMetrics>>>,
    log_target: String,
    audit: Arc<dyn RuntimeAudit>,
}

impl SlotRuntime {
    pub fn new<R>(renderer: R, config: RuntimeConfig) -> Self
    where
        R: WidgetRenderer + 'static,
    {
        let RuntimeConfig {
            reconciler,
            logger,
            metrics,
            log_target,
            audit,
        } = config;

        Self {
            reconciler: SlotReconciler::new(renderer, reconciler),
            mounted: Vec::new(),
            logger,
            metrics,
            log_target,
            audit,
        }
    }

    pub fn reconciler(&self) -> &SlotReconciler {
        &self.reconciler
    }

    pub fn mounted_slots(&self) -> &[SlotName] {
        &self.mounted
    }

    /// Mount `slot` and run its first pass.
    pub fn mount(
        &mut self,
        slot: &str,
        descriptor: Option<&WidgetDescriptor>,
        surface: &mut Surface<'_>,
    ) -> Result<SlotDecision> {
        if !self.mounted.iter().any(|mounted| mounted == slot) {
            self.mounted.push(slot.to_string());
        }
        self.record_audit(
            RuntimeAuditEventBuilder::new(RuntimeAuditStage::SlotMounted, slot)
                .detail("context", json!(format!("{:?}", surface.context()))),
        );

        let result = self.reconciler.on_bind(slot, descriptor, surface);
        self.observe(slot, result)
    }

    /// Run one pass of `descriptor` through every mounted slot.
    ///
    /// A render failure stops the pass; slots already reconciled keep their
    /// new state and the failing slot keeps its previous one.
    pub fn render_pass(
        &mut self,
        descriptor: Option<&WidgetDescriptor>,
        surface: &mut Surface<'_>,
    ) -> Result<PassReport> {
        let mut report = PassReport::default();
        for slot in self.mounted.clone() {
            let result = self.reconciler.on_update(&slot, descriptor, surface);
            report.decisions.push(self.observe(&slot, result)?);
        }
        Ok(report)
    }

    /// Server pass returning markup per slot.
    pub fn render_to_string(
        &mut self,
        descriptor: Option<&WidgetDescriptor>,
    ) -> Result<ServerRender> {
        let report = self.render_pass(descriptor, &mut Surface::Server)?;

        let mut render = ServerRender::default();
        for decision in &report.decisions {
            if let Some(markup) = decision.output.markup() {
                render.slots.insert(decision.slot.clone(), markup.to_string());
            }
        }
        let bound = report
            .decisions
            .iter()
            .any(|decision| decision.phase == SlotPhase::Bound);
        if let (true, Some(descriptor)) = (bound, descriptor) {
            render.assets = descriptor.assets.clone();
        }
        Ok(render)
    }

    pub fn unmount(&mut self, slot: &str, surface: &mut Surface<'_>) -> Result<SlotDecision> {
        let position = self
            .mounted
            .iter()
            .position(|mounted| mounted == slot)
            .ok_or_else(|| SlotError::SlotNotMounted(slot.to_string()))?;
        self.mounted.remove(position);

        let decision = self.reconciler.on_detach(slot, surface);
        self.record_decision(&decision);
        self.record_audit(
            RuntimeAuditEventBuilder::new(RuntimeAuditStage::SlotUnmounted, slot)
                .detail("cache", json!(describe_cache(decision.cache))),
        );
        Ok(decision)
    }

    pub fn unmount_all(&mut self, surface: &mut Surface<'_>) -> Vec<SlotDecision> {
        let slots = std::mem::take(&mut self.mounted);
        slots
            .iter()
            .map(|slot| {
                let decision = self.reconciler.on_detach(slot, surface);
                self.record_decision(&decision);
                self.record_audit(RuntimeAuditEventBuilder::new(
                    RuntimeAuditStage::SlotUnmounted,
                    slot.as_str(),
                ));
                decision
            })
            .collect()
    }

    pub fn metrics_snapshot(&self) -> Option<MetricSnapshot> {
        let metrics = self.metrics.as_ref()?;
        metrics.lock().ok().map(|guard| guard.snapshot())
    }

    /// Log the current metrics snapshot, if both metrics and a logger are set.
    pub fn emit_metrics(&self) {
        if let (Some(logger), Some(snapshot)) = (self.logger.as_ref(), self.metrics_snapshot()) {
            let target = format!("{}.metrics", self.log_target);
            let _ = logger.log_event(snapshot.to_log_event(&target));
        }
    }

    fn observe(&mut self, slot: &str, result: Result<SlotDecision>) -> Result<SlotDecision> {
        match result {
            Ok(decision) => {
                self.record_decision(&decision);
                Ok(decision)
            }
            Err(err) => {
                if let SlotError::Render { widget, source, .. } = &err {
                    self.with_metrics(ReconcileMetrics::record_render_failure);
                    self.log(
                        LogLevel::Error,
                        "render_failed",
                        [
                            json_kv("slot", slot),
                            json_kv("widget", widget.as_str()),
                            json_kv("error", source.message()),
                        ],
                    );
                    self.record_audit(
                        RuntimeAuditEventBuilder::new(RuntimeAuditStage::RenderFailed, slot)
                            .detail("widget", json!(widget)),
                    );
                }
                Err(err)
            }
        }
    }

    fn record_decision(&self, decision: &SlotDecision) {
        let slot = decision.slot.as_str();
        self.with_metrics(ReconcileMetrics::record_pass);

        if let Some(violation) = decision.violation.as_ref() {
            self.log(
                LogLevel::Warn,
                "contract_violation",
                [json_kv("slot", slot), json_kv("violation", violation.to_string())],
            );
            self.record_audit(
                RuntimeAuditEventBuilder::new(RuntimeAuditStage::ContractViolation, slot)
                    .detail("violation", json!(violation.to_string())),
            );
        }

        match decision.cache {
            CacheStatus::Hit => self.with_metrics(ReconcileMetrics::record_cache_hit),
            CacheStatus::Miss => self.with_metrics(ReconcileMetrics::record_cache_miss),
            CacheStatus::Invalidated | CacheStatus::Untouched => {}
        }

        match &decision.output {
            SlotOutput::Fallback { reason, .. } => {
                self.with_metrics(ReconcileMetrics::record_fallback);
                self.record_fallback(slot, *reason, decision.skipped);
            }
            SlotOutput::Hydrated => self.with_metrics(ReconcileMetrics::record_hydration),
            SlotOutput::Replaced => self.with_metrics(ReconcileMetrics::record_replacement),
            SlotOutput::Markup(_) => self.with_metrics(ReconcileMetrics::record_server_render),
        }

        if !decision.output.is_fallback() {
            self.log(
                LogLevel::Debug,
                "slot_reconciled",
                [
                    json_kv("slot", slot),
                    json_kv(
                        "widget",
                        decision
                            .identity
                            .as_ref()
                            .map(ToString::to_string)
                            .unwrap_or_default(),
                    ),
                    json_kv("cache", describe_cache(decision.cache)),
                    json_kv("output", describe_output(&decision.output)),
                ],
            );
            self.record_audit(
                RuntimeAuditEventBuilder::new(RuntimeAuditStage::SlotReconciled, slot)
                    .detail("cache", json!(describe_cache(decision.cache)))
                    .detail("output", json!(describe_output(&decision.output))),
            );
        }
    }

    fn record_fallback(&self, slot: &str, reason: FallbackReason, skipped: bool) {
        match reason {
            FallbackReason::Unassigned => {
                if skipped {
                    self.with_metrics(ReconcileMetrics::record_skipped);
                }
                self.record_audit(RuntimeAuditEventBuilder::new(
                    RuntimeAuditStage::SlotSkipped,
                    slot,
                ));
            }
            FallbackReason::ContainerMissing => {
                self.log(
                    LogLevel::Debug,
                    "container_missing",
                    [json_kv("slot", slot)],
                );
                self.record_audit(RuntimeAuditEventBuilder::new(
                    RuntimeAuditStage::ContainerMissing,
                    slot,
                ));
            }
            FallbackReason::Detached => {
                self.with_metrics(ReconcileMetrics::record_detach);
                self.log(LogLevel::Debug, "slot_detached", [json_kv("slot", slot)]);
                self.record_audit(RuntimeAuditEventBuilder::new(
                    RuntimeAuditStage::SlotDetached,
                    slot,
                ));
            }
        }
    }

    fn with_metrics(&self, record: impl FnOnce(&mut ReconcileMetrics)) {
        if let Some(metrics) = self.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                record(&mut *guard);
            }
        }
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.logger.as_ref() {
            let event = event_with_fields(level, &self.log_target, message, fields);
            let _ = logger.log_event(event);
        }
    }

    fn record_audit(&self, builder: RuntimeAuditEventBuilder) {
        self.audit.record(builder.finish());
    }
}

fn describe_cache(status: CacheStatus) -> &'static str {
    match status {
        CacheStatus::Untouched => "untouched",
        CacheStatus::Hit => "hit",
        CacheStatus::Miss => "miss",
        CacheStatus::Invalidated => "invalidated",
    }
}

fn describe_output(output: &SlotOutput) -> &'static str {
    match output {
        SlotOutput::Fallback { .. } => "fallback",
        SlotOutput::Markup(_) => "markup",
        SlotOutput::Hydrated => "hydrated",
        SlotOutput::Replaced => "replaced",
    }
}
