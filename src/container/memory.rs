use std::collections::HashMap;

use super::core::{Document, NodeId};

#[derive(Debug, Clone)]
struct MemoryNode {
    id: NodeId,
    selector: String,
    html: String,
    hydrations: u32,
}

/// In-memory [`Document`] keyed by exact selector strings.
///
/// Used for server-side tooling, benches and tests. Nodes keep insertion
/// order so `query_selector` returns the first match like a real document.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    nodes: Vec<MemoryNode>,
    next_id: u64,
    writes: u64,
    write_log: HashMap<NodeId, u32>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node reachable through `selector`, pre-filled with `html`.
    pub fn insert(&mut self, selector: impl Into<String>, html: impl Into<String>) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.push(MemoryNode {
            id,
            selector: selector.into(),
            html: html.into(),
            hydrations: 0,
        });
        id
    }

    /// Drop every node matching `selector`. Returns how many were removed.
    pub fn remove(&mut self, selector: &str) -> usize {
        let before = self.nodes.len();
        self.nodes.retain(|node| node.selector != selector);
        before - self.nodes.len()
    }

    /// Swap the first node matching `selector` for a fresh one, the way a host
    /// page re-creates a subtree between passes.
    pub fn replace(&mut self, selector: &str, html: impl Into<String>) -> Option<NodeId> {
        let position = self.nodes.iter().position(|node| node.selector == selector)?;
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes[position] = MemoryNode {
            id,
            selector: selector.to_string(),
            html: html.into(),
            hydrations: 0,
        };
        Some(id)
    }

    pub fn html_of(&self, selector: &str) -> Option<String> {
        self.find(selector).map(|node| node.html.clone())
    }

    pub fn hydrations_of(&self, selector: &str) -> u32 {
        self.find(selector).map(|node| node.hydrations).unwrap_or(0)
    }

    /// Total `set_inner_html` calls across all nodes.
    pub fn write_count(&self) -> u64 {
        self.writes
    }

    pub fn writes_to(&self, node: NodeId) -> u32 {
        self.write_log.get(&node).copied().unwrap_or(0)
    }

    fn find(&self, selector: &str) -> Option<&MemoryNode> {
        self.nodes.iter().find(|node| node.selector == selector)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut MemoryNode> {
        self.nodes.iter_mut().find(|node| node.id == id)
    }
}

impl Document for MemoryDocument {
    fn query_selector(&self, selector: &str) -> Option<NodeId> {
        self.find(selector).map(|node| node.id)
    }

    fn inner_html(&self, node: NodeId) -> Option<String> {
        self.nodes
            .iter()
            .find(|candidate| candidate.id == node)
            .map(|candidate| candidate.html.clone())
    }

    fn set_inner_html(&mut self, node: NodeId, html: &str) {
        if let Some(target) = self.node_mut(node) {
            target.html = html.to_string();
            self.writes += 1;
            *self.write_log.entry(node).or_insert(0) += 1;
        }
    }

    fn hydrate(&mut self, node: NodeId) {
        if let Some(target) = self.node_mut(node) {
            target.hydrations += 1;
        }
    }
}
