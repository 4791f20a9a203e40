pub use crate::{
    ActionMenu, DomainModel, ElementKind, ItemData, ItemModel, ItemRole, MenuEntry, ModelElement,
    ModelIndex, ModelKey, NavigatorConfig, NavigatorError, NavigatorLog, NavigatorModel,
    NavigatorStyle, NavigatorView, NavigatorViewState, NodeAction, NodeId, ScrollPolicy, Severity,
    TreeGlyphs, ViewAction, ViewEvent, ViewSignal,
};

#[cfg(feature = "keymap")]
pub use crate::{KeymapProfile, NavigatorKeyBindings};
