use crate::index::ModelIndex;

/// Notification emitted by a navigator for its view.
///
/// Signals are queued in emission order and drained with
/// [`NavigatorModel::take_signals`](crate::NavigatorModel::take_signals).
/// Indices held by the view before a layout or reset pair must not be used
/// after it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewSignal {
    LayoutAboutToBeChanged,
    LayoutChanged,
    BeginReset,
    EndReset,
    /// Request to expand and reveal a freshly loaded model node.
    ExpandIndex(ModelIndex),
}

impl ViewSignal {
    /// Returns `true` for signals after which previously issued indices are stale.
    pub const fn invalidates_indices(&self) -> bool {
        matches!(self, Self::LayoutChanged | Self::EndReset)
    }
}
