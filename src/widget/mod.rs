//! Widget descriptors and the identity predicate that gates markup reuse.

mod core;

pub use self::core::{
    AssetKind, ContractViolation, SlotName, SlotProperties, WidgetAsset, WidgetDescriptor,
    WidgetIdentity, has_widget_changed,
};
