use std::borrow::Cow;
use std::path::Path;

use crate::arena::NodeId;

/// Opaque position handle in the item-view protocol.
///
/// An index is only meaningful for the navigator that issued it, and only
/// until the next structural change signalled to the view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ModelIndex {
    row: usize,
    column: usize,
    id: Option<NodeId>,
}

impl ModelIndex {
    /// Returns the invalid index (addresses the hidden root).
    pub const fn invalid() -> Self {
        Self {
            row: 0,
            column: 0,
            id: None,
        }
    }

    pub(crate) const fn new(row: usize, column: usize, id: NodeId) -> Self {
        Self {
            row,
            column,
            id: Some(id),
        }
    }

    /// Returns `true` if the index addresses a node.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.id.is_some()
    }

    #[inline]
    pub const fn row(&self) -> usize {
        self.row
    }

    #[inline]
    pub const fn column(&self) -> usize {
        self.column
    }

    /// Returns the node handle encoded in the index.
    #[inline]
    pub const fn id(&self) -> Option<NodeId> {
        self.id
    }
}

impl Default for ModelIndex {
    fn default() -> Self {
        Self::invalid()
    }
}

/// Data role requested from [`ItemModel::data`](crate::ItemModel::data).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemRole {
    /// Text shown for the item.
    Display,
    /// Icon resource shown next to the item.
    Decoration,
}

/// Value returned for an index/role pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemData<'a> {
    None,
    Text(Cow<'a, str>),
    Icon(&'a Path),
}

impl<'a> ItemData<'a> {
    /// Returns the text payload, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_ref()),
            _ => None,
        }
    }

    /// Returns the icon payload, if any.
    pub const fn as_icon(&self) -> Option<&'a Path> {
        match self {
            Self::Icon(path) => Some(*path),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}
