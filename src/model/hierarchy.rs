//! Arena-backed cluster hierarchy.
//!
//! Nodes live in a flat `Vec` and reference each other by index, so the
//! parent back-reference stays acyclic and the whole tree is cheap to clone
//! and serialize. Three tiers: root (key `""`), one node per group column,
//! and value-carrying leaves.

use serde::Serialize;

/// Index of a node within its [`Hierarchy`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HierarchyNode {
    pub key: String,
    /// Name shown in the chart; differs from `key` when a display-name
    /// remapping is configured for a group column.
    pub display: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Aggregate count/sum. Present on leaves only.
    pub value: Option<i64>,
}

/// A bundled edge between two leaves, weighted by the pairwise aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Link {
    pub source: NodeId,
    pub target: NodeId,
    pub value: i64,
}

#[derive(Debug, Clone)]
pub struct Hierarchy {
    nodes: Vec<HierarchyNode>,
}

impl Hierarchy {
    pub const ROOT: NodeId = NodeId(0);

    /// Create a hierarchy holding only the root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![HierarchyNode {
                key: String::new(),
                display: String::new(),
                parent: None,
                children: Vec::new(),
                value: None,
            }],
        }
    }

    /// Append a child under `parent` and return its id.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        key: String,
        display: String,
        value: Option<i64>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(HierarchyNode {
            key,
            display,
            parent: Some(parent),
            children: Vec::new(),
            value,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn get(&self, id: NodeId) -> &HierarchyNode {
        &self.nodes[id.0]
    }

    pub fn root(&self) -> &HierarchyNode {
        &self.nodes[Self::ROOT.0]
    }

    /// Ids of the group-column nodes, in root child order.
    pub fn groups(&self) -> &[NodeId] {
        &self.root().children
    }

    /// All leaf ids under `group`, in child order.
    pub fn leaves_of(&self, group: NodeId) -> &[NodeId] {
        &self.nodes[group.0].children
    }

    /// All leaf ids across every group, group by group.
    pub fn leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.groups()
            .iter()
            .flat_map(|g| self.leaves_of(*g).iter().copied())
    }

    /// Key of the group-column node a leaf belongs to.
    pub fn group_key_of(&self, leaf: NodeId) -> Option<&str> {
        let parent = self.get(leaf).parent?;
        Some(self.get(parent).key.as_str())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the root exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Largest leaf value, or 0 when there are no leaves. Domain max for the
    /// bar length scale.
    pub fn max_leaf_value(&self) -> i64 {
        self.leaves()
            .filter_map(|id| self.get(id).value)
            .max()
            .unwrap_or(0)
    }
}

impl Default for Hierarchy {
    fn default() -> Self {
        Self::new()
    }
}
