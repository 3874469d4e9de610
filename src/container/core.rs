/// Opaque handle to a node inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionContext {
    Server,
    Client,
}

/// Minimal DOM capability consumed by the reconciler.
pub trait Document {
    /// First node matching `selector`, if any.
    fn query_selector(&self, selector: &str) -> Option<NodeId>;

    /// Current markup inside `node`. `None` when the node no longer exists.
    fn inner_html(&self, node: NodeId) -> Option<String>;

    /// Replace the contents of `node` wholesale.
    fn set_inner_html(&mut self, node: NodeId, html: &str);

    /// Attach behavior to the existing contents of `node` without touching them.
    fn hydrate(&mut self, node: NodeId);
}

/// Execution surface of a single render pass.
pub enum Surface<'a> {
    Server,
    Client(&'a mut dyn Document),
}

impl<'a> Surface<'a> {
    pub fn client(document: &'a mut dyn Document) -> Self {
        Surface::Client(document)
    }

    pub fn context(&self) -> ExecutionContext {
        match self {
            Surface::Server => ExecutionContext::Server,
            Surface::Client(_) => ExecutionContext::Client,
        }
    }

    pub fn is_server(&self) -> bool {
        matches!(self, Surface::Server)
    }
}

/// Locate the node hosting a slot.
///
/// Server surfaces have no document and always yield `None`. On the client a
/// single lookup is performed; a miss is a normal condition, not an error.
pub fn resolve_container(surface: &Surface<'_>, selector: &str) -> Option<NodeId> {
    match surface {
        Surface::Server => None,
        Surface::Client(document) => document.query_selector(selector),
    }
}
