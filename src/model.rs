use std::fmt;

use crate::arena::NodeId;
use crate::index::{ItemData, ItemRole, ModelIndex};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identity of a domain model loaded into a navigator.
///
/// Keys are handed out by [`NavigatorModel::load_model`](crate::NavigatorModel::load_model)
/// and are never reused by the same navigator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelKey(pub(crate) u64);

impl ModelKey {
    /// Returns the raw key value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ModelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "model#{}", self.0)
    }
}

/// Externally implemented simulation model that the navigator wraps.
///
/// The navigator never inspects the model beyond this trait: physics,
/// rendering and file loading belong to the implementing library.
pub trait DomainModel {
    /// Display name of the model.
    fn name(&self) -> &str;
    /// Synchronous system initialization, called once when the model is loaded.
    fn init_system(&mut self);
    /// Sub-elements shown below the model node (bodies, joints, ...).
    fn elements(&self) -> Vec<ModelElement> {
        Vec::new()
    }
}

/// Category of a model sub-element, used for icons and menus.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Folder-like grouping, e.g. "Bodies".
    Group,
    Body,
    Joint,
    Coordinate,
    Force,
    Marker,
    Other,
}

/// Description of one sub-element of a domain model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelElement {
    pub name: String,
    pub kind: ElementKind,
    pub children: Vec<ModelElement>,
}

impl ModelElement {
    /// Creates a leaf element.
    pub fn new(name: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            name: name.into(),
            kind,
            children: Vec::new(),
        }
    }

    /// Creates an empty group element.
    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, ElementKind::Group)
    }

    /// Appends a child element.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Appends several child elements.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children);
        self
    }
}

/// Hierarchical item-view contract used by the view layer.
///
/// The root node is addressed by [`ModelIndex::invalid`] and is never
/// returned by [`ItemModel::index`]. Invalid indices are a normal outcome,
/// not an error.
pub trait ItemModel {
    /// Returns the index of the child at `row`/`column` below `parent`.
    fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex;
    /// Returns the parent index of `child` (invalid when the parent is the root).
    fn parent(&self, child: &ModelIndex) -> ModelIndex;
    /// Returns the number of children below `parent`.
    fn row_count(&self, parent: &ModelIndex) -> usize;
    /// Returns the number of columns below `parent`.
    fn column_count(&self, _parent: &ModelIndex) -> usize {
        1
    }
    /// Returns the data stored under `role` for `index`.
    fn data(&self, index: &ModelIndex, role: ItemRole) -> ItemData<'_>;
    /// Returns `true` if `row`/`column` addresses an existing child of `parent`.
    fn has_index(&self, row: usize, column: usize, parent: &ModelIndex) -> bool {
        row < self.row_count(parent) && column < self.column_count(parent)
    }
    /// Returns `true` if `index` addresses the row of the current model.
    fn is_current(&self, _index: &ModelIndex) -> bool {
        false
    }
    /// Returns `true` while `id` is still reachable from the root.
    ///
    /// Views use it to forget per-node state (such as expansion) of removed nodes.
    fn contains_node(&self, _id: NodeId) -> bool {
        true
    }
}
