use smallvec::SmallVec;

use crate::method::MethodRef;

/// A unique identifier for a CFG node, stable within its [`Cfg`].
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        NodeId(index as u32)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// The classification of a CFG node, decided once by the CFG provider.
///
/// The engine dispatches its transfer functions on this tag only; it never
/// inspects concrete instruction semantics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// A call site targeting the given symbolic reference.
    Call(MethodRef),
    /// A return from the enclosing method.
    Return,
    /// Any node without call or return behavior.
    Other,
}

#[derive(Clone, Debug)]
struct NodeInfo {
    kind: NodeKind,
    succs: SmallVec<[NodeId; 2]>,
    preds: SmallVec<[NodeId; 2]>,
}

/// A control-flow graph over classified nodes.
///
/// The analysis engine requires only what this type exposes: a designated
/// entry, per-node kinds, and successor/predecessor adjacency with stable
/// node identities usable as map keys.
#[derive(Clone, Debug)]
pub struct Cfg {
    nodes: Vec<NodeInfo>,
    entry: NodeId,
}

impl Cfg {
    pub fn builder() -> CfgBuilder {
        CfgBuilder { nodes: Vec::new() }
    }

    pub fn entry(&self) -> NodeId {
        self.entry
    }

    /// The kind of `node`. `node` must belong to this CFG.
    pub fn kind(&self, node: NodeId) -> &NodeKind {
        &self.nodes[node.index()].kind
    }

    pub fn successors(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.index()].succs
    }

    pub fn predecessors(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.index()].preds
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId::new)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Builder for [`Cfg`]. The first node added becomes the entry node.
pub struct CfgBuilder {
    nodes: Vec<NodeInfo>,
}

impl CfgBuilder {
    pub fn node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(NodeInfo {
            kind,
            succs: SmallVec::new(),
            preds: SmallVec::new(),
        });
        id
    }

    /// Shorthand for a call-site node.
    pub fn call(&mut self, target: MethodRef) -> NodeId {
        self.node(NodeKind::Call(target))
    }

    /// Shorthand for a return node.
    pub fn ret(&mut self) -> NodeId {
        self.node(NodeKind::Return)
    }

    /// Shorthand for a node with no call/return behavior.
    pub fn other(&mut self) -> NodeId {
        self.node(NodeKind::Other)
    }

    /// Add a directed control-flow edge.
    pub fn edge(&mut self, from: NodeId, to: NodeId) {
        self.nodes[from.index()].succs.push(to);
        self.nodes[to.index()].preds.push(from);
    }

    /// Finish the graph. At least one node must have been added.
    pub fn build(self) -> Cfg {
        assert!(!self.nodes.is_empty(), "a CFG needs at least one node");
        Cfg {
            nodes: self.nodes,
            entry: NodeId::new(0),
        }
    }
}
