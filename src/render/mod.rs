//! Markup injection for server output and client containers.

mod core;

pub use self::core::{Applied, RenderSettings, RenderWrapper};
