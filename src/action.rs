/// Actions that a user or application can initiate on the navigator view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewAction<Custom = ()> {
    /// Move selection to the previous visible row.
    SelectPrev,
    /// Move selection to the next visible row.
    SelectNext,
    /// Move selection to the parent node.
    SelectParent,
    /// Expand the selected node, or step into its first child if already expanded.
    SelectChild,
    /// Toggle expansion for the selected node only.
    ToggleNode,
    /// Toggle expansion recursively for the selected subtree.
    ToggleRecursive,
    /// Expand all nodes in the tree.
    ExpandAll,
    /// Collapse all nodes in the tree.
    CollapseAll,
    /// Toggle drawing of guide lines.
    ToggleGuides,
    /// Select the first visible row.
    SelectFirst,
    /// Select the last visible row.
    SelectLast,
    /// Request making the selected row's model the active one.
    ActivateSelected,
    /// Request closing the active model.
    CloseCurrentModel,
    /// Request closing every open model.
    CloseAllModels,
    /// Request the context menu for the selected row.
    OpenContextMenu,
    /// Custom action forwarded to the caller without internal handling.
    Custom(Custom),
}

/// Result of handling an action or key event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewEvent<Custom = ()> {
    /// The action was handled internally and state was updated.
    Handled,
    /// The action was ignored (e.g., nothing selected / nothing to do).
    Unhandled,
    /// The action is forwarded to the caller, which owns the navigator.
    Action(ViewAction<Custom>),
}
