//! Model navigator for ratatui: a tree adapter over externally owned domain
//! models, with active-model tracking, context actions and a tree view.
//!
//! [`NavigatorModel`] wraps each loaded [`DomainModel`] in a top-level node
//! and answers the [`ItemModel`] index protocol. [`NavigatorView`] renders it
//! with a [`NavigatorViewState`] that follows the navigator's [`ViewSignal`]s.
//!
//! Feature flags:
//! - `keymap`: crossterm-based key bindings and `NavigatorViewState::handle_key*` helpers.
//! - `serde`: serde support for configuration types and `NavigatorViewSnapshot`.

mod action;
mod arena;
mod config;
mod context;
mod error;
mod glyphs;
mod index;
#[cfg(feature = "keymap")]
mod keymap;
mod log;
mod menu;
mod model;
mod navigator;
pub mod prelude;
mod signal;
mod state;
mod style;
mod widget;

#[cfg(doctest)]
#[doc = include_str!("../Readme.md")]
pub struct ReadmeDoctests;

pub use action::{ViewAction, ViewEvent};
pub use arena::{Node, NodeArena, NodeId, NodeKind};
pub use config::{IconTheme, NavigatorConfig};
pub use context::NavigatorRowContext;
pub use error::{NavigatorError, Result};
pub use glyphs::{TreeGlyphs, navigator_label_line};
pub use index::{ItemData, ItemRole, ModelIndex};
#[cfg(feature = "keymap")]
pub use keymap::{KeymapProfile, NavigatorKeyBindings};
pub use log::{LogEntry, MemoryLog, NavigatorLog, Severity, TracingLog};
pub use menu::{ActionMenu, MenuEntry, NodeAction};
pub use model::{DomainModel, ElementKind, ItemModel, ModelElement, ModelKey};
pub use navigator::{CURRENT_SUFFIX, NavigatorModel};
pub use signal::ViewSignal;
pub use state::{NavigatorViewSnapshot, NavigatorViewState, VisibleRow};
pub use style::{NavigatorStyle, ScrollPolicy};
pub use widget::NavigatorView;
