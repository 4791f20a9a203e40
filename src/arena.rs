use std::path::{Path, PathBuf};

use smallvec::SmallVec;

use crate::model::{ElementKind, ModelKey};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable handle to a node in a [`NodeArena`].
///
/// Freeing a node bumps the generation of its slot, so an old handle never
/// resolves to a node that later reuses the slot.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    slot: u32,
    generation: u32,
}

/// Variant of a navigator node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Hidden root; wraps no domain object.
    Root,
    /// Top-level node wrapping a whole domain model.
    Model(ModelKey),
    /// Sub-element of a domain model.
    Element { model: ModelKey, kind: ElementKind },
}

impl NodeKind {
    /// Returns the domain model this node belongs to, if any.
    #[inline]
    pub const fn model(&self) -> Option<ModelKey> {
        match self {
            Self::Root => None,
            Self::Model(key) | Self::Element { model: key, .. } => Some(*key),
        }
    }

    /// Returns `true` if the node wraps the model `key` itself (not one of its elements).
    #[inline]
    pub fn wraps_model(&self, key: ModelKey) -> bool {
        matches!(self, Self::Model(own) if *own == key)
    }
}

/// Single tree entry: label, icon and the wrapped object reference.
#[derive(Clone, Debug)]
pub struct Node {
    name: String,
    icon: PathBuf,
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn icon(&self) -> &Path {
        &self.icon
    }

    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Non-owning back-reference; `None` for the root and for detached nodes.
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Slot storage for navigator nodes.
///
/// Parent-to-child edges own the subtree; child-to-parent edges are lookups only.
#[derive(Default)]
pub struct NodeArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of allocated nodes, including detached ones awaiting destruction.
    pub const fn len(&self) -> usize {
        self.live
    }

    pub const fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Returns `true` if `id` still resolves to a node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.slot as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.slot as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    /// Returns the children of `id` (empty for stale handles).
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(Node::children).unwrap_or_default()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::parent)
    }

    /// Returns the position of `id` within its parent's children.
    pub fn row_of(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|child| *child == id)
    }

    /// Allocates a node and appends it to `parent`'s children when the parent resolves.
    pub fn insert(
        &mut self,
        parent: Option<NodeId>,
        name: impl Into<String>,
        icon: impl Into<PathBuf>,
        kind: NodeKind,
    ) -> NodeId {
        let parent = parent.filter(|id| self.contains(*id));
        let node = Node {
            name: name.into(),
            icon: icon.into(),
            kind,
            parent,
            children: Vec::new(),
        };

        let id = if let Some(slot) = self.free.pop() {
            let entry = &mut self.slots[slot as usize];
            entry.node = Some(node);
            NodeId {
                slot,
                generation: entry.generation,
            }
        } else {
            let slot = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId {
                slot,
                generation: 0,
            }
        };
        self.live += 1;

        if let Some(parent_node) = parent.and_then(|parent| self.get_mut(parent)) {
            parent_node.children.push(id);
        }
        id
    }

    /// Unlinks `id` from its parent. The subtree stays allocated until freed.
    pub fn detach(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.parent(id) else {
            return false;
        };
        if let Some(parent_node) = self.get_mut(parent) {
            parent_node.children.retain(|child| *child != id);
        }
        if let Some(node) = self.get_mut(id) {
            node.parent = None;
        }
        true
    }

    /// Destroys `id` and all of its descendants, returning the number of freed nodes.
    ///
    /// The node is unlinked from its parent first if still attached.
    pub fn free_subtree(&mut self, id: NodeId) -> usize {
        if !self.contains(id) {
            return 0;
        }
        self.detach(id);

        let mut freed = 0;
        let mut stack: SmallVec<[NodeId; 16]> = SmallVec::new();
        stack.push(id);
        while let Some(current) = stack.pop() {
            let Some(slot) = self.slots.get_mut(current.slot as usize) else {
                continue;
            };
            if slot.generation != current.generation {
                continue;
            }
            let Some(node) = slot.node.take() else {
                continue;
            };
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(current.slot);
            self.live -= 1;
            freed += 1;
            stack.extend(node.children);
        }
        freed
    }
}
