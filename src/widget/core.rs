use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub type SlotName = String;

/// Identity of a widget build. Two descriptors are the same widget iff both
/// fields are equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WidgetIdentity {
    pub name: String,
    pub version: String,
}

impl WidgetIdentity {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Both identity fields are present.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.version.is_empty()
    }
}

impl fmt::Display for WidgetIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// Where a slot's markup lives in the host page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotProperties {
    pub container_selector: String,
    #[serde(default)]
    pub html: Option<String>,
}

impl SlotProperties {
    pub fn new(container_selector: impl Into<String>) -> Self {
        Self {
            container_selector: container_selector.into(),
            html: None,
        }
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Script,
    Stylesheet,
}

/// Static asset a widget needs in the host document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetAsset {
    #[serde(rename = "type")]
    pub kind: AssetKind,
    pub source: String,
}

/// Data-contract problem in a descriptor supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    #[error("widget descriptor is missing `name`")]
    MissingName,
    #[error("widget `{0}` descriptor is missing `version`")]
    MissingVersion(String),
}

/// Desired render of a widget for one pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WidgetDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slots: Option<BTreeMap<SlotName, SlotProperties>>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub state: Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<WidgetAsset>,
}

impl WidgetDescriptor {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// Assign slot properties, creating the slot map if needed.
    pub fn with_slot(mut self, slot: impl Into<SlotName>, properties: SlotProperties) -> Self {
        self.slots
            .get_or_insert_with(BTreeMap::new)
            .insert(slot.into(), properties);
        self
    }

    pub fn with_state(mut self, state: Value) -> Self {
        self.state = state;
        self
    }

    pub fn with_asset(mut self, kind: AssetKind, source: impl Into<String>) -> Self {
        self.assets.push(WidgetAsset {
            kind,
            source: source.into(),
        });
        self
    }

    pub fn identity(&self) -> WidgetIdentity {
        WidgetIdentity::new(self.name.clone(), self.version.clone())
    }

    pub fn validate(&self) -> Result<WidgetIdentity, ContractViolation> {
        if self.name.is_empty() {
            return Err(ContractViolation::MissingName);
        }
        if self.version.is_empty() {
            return Err(ContractViolation::MissingVersion(self.name.clone()));
        }
        Ok(self.identity())
    }

    pub fn slot(&self, slot: &str) -> Option<&SlotProperties> {
        self.slots.as_ref().and_then(|slots| slots.get(slot))
    }
}

/// True iff exactly one side is absent, or `name`/`version` differ.
///
/// All other fields are ignored: markup or state changes without a version
/// bump keep the cached markup alive.
pub fn has_widget_changed(
    prev: Option<&WidgetDescriptor>,
    next: Option<&WidgetDescriptor>,
) -> bool {
    match (prev, next) {
        (None, None) => false,
        (Some(prev), Some(next)) => prev.name != next.name || prev.version != next.version,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nav(version: &str) -> WidgetDescriptor {
        WidgetDescriptor::new("nav", version)
            .with_slot("header", SlotProperties::new("#header").with_html("<nav/>"))
    }

    #[test]
    fn same_descriptor_is_unchanged() {
        let a = nav("1.0.0");
        assert!(!has_widget_changed(Some(&a), Some(&a)));
        assert!(!has_widget_changed(None, None));
    }

    #[test]
    fn version_bump_is_a_change() {
        assert!(has_widget_changed(Some(&nav("1.0.0")), Some(&nav("1.0.1"))));
    }

    #[test]
    fn one_side_absent_is_a_change() {
        let a = nav("1.0.0");
        assert!(has_widget_changed(Some(&a), None));
        assert!(has_widget_changed(None, Some(&a)));
    }

    #[test]
    fn payload_changes_do_not_count() {
        let a = nav("1.0.0");
        let b = nav("1.0.0")
            .with_slot("header", SlotProperties::new("#other").with_html("<b/>"))
            .with_state(json!({ "counter": 3 }));
        assert!(!has_widget_changed(Some(&a), Some(&b)));
    }

    #[test]
    fn comparison_is_case_sensitive() {
        let a = WidgetDescriptor::new("Nav", "1.0.0");
        let b = WidgetDescriptor::new("nav", "1.0.0");
        assert!(has_widget_changed(Some(&a), Some(&b)));
    }

    #[test]
    fn validate_reports_missing_fields() {
        assert_eq!(
            WidgetDescriptor::new("", "1.0.0").validate(),
            Err(ContractViolation::MissingName)
        );
        assert_eq!(
            WidgetDescriptor::new("nav", "").validate(),
            Err(ContractViolation::MissingVersion("nav".to_string()))
        );
        assert_eq!(
            nav("1.0.0").validate(),
            Ok(WidgetIdentity::new("nav", "1.0.0"))
        );
    }

    #[test]
    fn parses_host_json() {
        let raw = r##"{
            "name": "nav",
            "version": "1.0.0",
            "slots": {
                "header": { "containerSelector": "#header", "html": "<nav>a</nav>" },
                "footer": { "containerSelector": ".footer" }
            },
            "state": { "counter": 0 },
            "assets": [
                { "type": "script", "source": "http://localhost:4444/static/widget-client.js" },
                { "type": "stylesheet", "source": "http://localhost:4444/static/widget-client.css" }
            ]
        }"##;
        let descriptor = WidgetDescriptor::from_json(raw).unwrap();

        assert_eq!(descriptor.identity().to_string(), "nav@1.0.0");
        let header = descriptor.slot("header").unwrap();
        assert_eq!(header.container_selector, "#header");
        assert_eq!(header.html.as_deref(), Some("<nav>a</nav>"));
        assert_eq!(descriptor.slot("footer").unwrap().html, None);
        assert!(descriptor.slot("sidebar").is_none());
        assert_eq!(descriptor.assets.len(), 2);
        assert_eq!(descriptor.assets[1].kind, AssetKind::Stylesheet);
    }

    #[test]
    fn missing_slots_means_nothing_assigned() {
        let descriptor = WidgetDescriptor::from_json(r#"{"name":"nav","version":"1"}"#).unwrap();
        assert!(descriptor.slots.is_none());
        assert!(descriptor.slot("header").is_none());
    }
}
