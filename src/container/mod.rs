//! Container lookup against an injected document capability.
//!
//! The reconciler never talks to a global document. Hosts hand in a
//! [`Surface`] per pass; client surfaces borrow a [`Document`] for the
//! duration of that call only.

mod core;
mod memory;

pub use self::core::{Document, ExecutionContext, NodeId, Surface, resolve_container};
pub use memory::MemoryDocument;
