use ratatui::widgets::TableState;
use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::action::{ViewAction, ViewEvent};
use crate::arena::NodeId;
use crate::index::ModelIndex;
use crate::log::NavigatorLog;
use crate::model::{DomainModel, ItemModel};
use crate::navigator::NavigatorModel;
use crate::signal::ViewSignal;
use crate::style::ScrollPolicy;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "keymap")]
use crate::keymap::NavigatorKeyBindings;
#[cfg(feature = "keymap")]
use crossterm::event::KeyEvent;

/// A visible row with metadata used for rendering and navigation.
#[derive(Clone, Debug)]
pub struct VisibleRow {
    pub(crate) index: ModelIndex,
    pub(crate) level: u16,
    pub(crate) has_children: bool,
    pub(crate) is_tail_stack: SmallVec<[bool; 8]>,
}

impl VisibleRow {
    pub const fn index(&self) -> ModelIndex {
        self.index
    }

    pub const fn level(&self) -> u16 {
        self.level
    }
}

/// View state: expanded nodes, selection and the visible-row cache.
///
/// Rows are produced through the [`ItemModel`] protocol only. The cache is
/// rebuilt after layout or reset signals, never across them.
pub struct NavigatorViewState {
    list_state: TableState,
    expanded: FxHashSet<NodeId>,
    // Cached visible rows to avoid walking the model every render.
    visible_rows: Vec<VisibleRow>,
    // Fast lookup from node id to visible row.
    visible_index: FxHashMap<NodeId, usize>,
    dirty: bool,
    draw_lines: bool,
    // Node selected when the last layout change started.
    held_selection: Option<NodeId>,
    in_reset: bool,
    #[cfg(feature = "keymap")]
    keymap: NavigatorKeyBindings,
}

/// Snapshot of expansion, selection and scroll position.
///
/// With the `serde` feature enabled, this type derives `Serialize`/`Deserialize`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug)]
pub struct NavigatorViewSnapshot {
    pub expanded: Vec<NodeId>,
    pub selected: Option<usize>,
    pub offset: usize,
    pub draw_lines: bool,
}

impl Default for NavigatorViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigatorViewState {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a state with preallocated capacity for the given number of rows.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            list_state: TableState::default(),
            expanded: FxHashSet::with_capacity_and_hasher(capacity, FxBuildHasher),
            visible_rows: Vec::with_capacity(capacity),
            visible_index: FxHashMap::with_capacity_and_hasher(capacity, FxBuildHasher),
            dirty: true,
            draw_lines: true,
            held_selection: None,
            in_reset: false,
            #[cfg(feature = "keymap")]
            keymap: NavigatorKeyBindings::new(),
        }
    }

    #[cfg(feature = "keymap")]
    /// Returns a mutable reference to the key binding set.
    pub const fn keymap_mut(&mut self) -> &mut NavigatorKeyBindings {
        &mut self.keymap
    }

    pub(crate) const fn list_state(&self) -> &TableState {
        &self.list_state
    }

    pub(crate) const fn list_state_mut(&mut self) -> &mut TableState {
        &mut self.list_state
    }

    /// Rows currently visible, in display order.
    pub fn visible_rows(&self) -> &[VisibleRow] {
        &self.visible_rows
    }

    pub const fn visible_len(&self) -> usize {
        self.visible_rows.len()
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.expanded.contains(&id)
    }

    /// Returns `true` between a `BeginReset` and its `EndReset`.
    pub const fn is_resetting(&self) -> bool {
        self.in_reset
    }

    #[inline]
    pub const fn draw_lines(&self) -> bool {
        self.draw_lines
    }

    pub const fn set_draw_lines(&mut self, draw: bool) {
        self.draw_lines = draw;
    }

    /// Marks the visible-row cache as dirty.
    pub const fn invalidate(&mut self) {
        self.dirty = true;
    }

    pub fn snapshot(&self) -> NavigatorViewSnapshot {
        NavigatorViewSnapshot {
            expanded: self.expanded.iter().copied().collect(),
            selected: self.list_state.selected(),
            offset: self.list_state.offset(),
            draw_lines: self.draw_lines,
        }
    }

    pub fn restore(&mut self, snapshot: NavigatorViewSnapshot) {
        self.expanded = snapshot.expanded.into_iter().collect();
        self.draw_lines = snapshot.draw_lines;
        *self.list_state.offset_mut() = snapshot.offset;
        self.list_state.select(snapshot.selected);
        self.dirty = true;
    }

    /// Applies every queued navigator signal, then lets the navigator destroy
    /// the nodes removed during this cycle.
    pub fn sync<M: DomainModel, L: NavigatorLog>(&mut self, navigator: &mut NavigatorModel<M, L>) {
        for signal in navigator.take_signals() {
            self.apply_signal(&*navigator, signal);
        }
        navigator.process_deferred();
    }

    /// Reacts to one structural notification from the model.
    pub fn apply_signal<T: ItemModel>(&mut self, model: &T, signal: ViewSignal) {
        match signal {
            ViewSignal::LayoutAboutToBeChanged => {
                self.held_selection = self.selected_index().id();
            }
            ViewSignal::LayoutChanged => {
                self.expanded.retain(|id| model.contains_node(*id));
                self.update_visible_rows(model);
                let held = self.held_selection.take();
                if let Some(row) = held.and_then(|id| self.visible_index.get(&id).copied()) {
                    self.list_state.select(Some(row));
                }
            }
            ViewSignal::BeginReset => {
                self.in_reset = true;
                self.held_selection = None;
            }
            ViewSignal::EndReset => {
                self.in_reset = false;
                self.expanded.clear();
                self.visible_rows.clear();
                self.visible_index.clear();
                self.list_state.select(None);
                *self.list_state.offset_mut() = 0;
                self.dirty = true;
            }
            ViewSignal::ExpandIndex(index) => {
                self.select_index(model, &index);
            }
        }
    }

    /// Builds the visible rows if the cache is dirty.
    pub fn ensure_visible_rows<T: ItemModel>(&mut self, model: &T) {
        if self.dirty {
            self.update_visible_rows(model);
        }
    }

    fn update_visible_rows<T: ItemModel>(&mut self, model: &T) {
        self.visible_rows.clear();
        self.visible_index.clear();
        let mut is_tail_stack: SmallVec<[bool; 8]> = SmallVec::new();
        self.build_rows(model, &ModelIndex::invalid(), 0, &mut is_tail_stack);
        self.dirty = false;
        self.clamp_selection();
    }

    fn build_rows<T: ItemModel>(
        &mut self,
        model: &T,
        parent: &ModelIndex,
        level: u16,
        is_tail_stack: &mut SmallVec<[bool; 8]>,
    ) {
        let count = model.row_count(parent);
        for row in 0..count {
            let index = model.index(row, 0, parent);
            let Some(id) = index.id() else {
                continue;
            };
            let has_children = model.row_count(&index) > 0;
            if level > 0 {
                is_tail_stack.push(row + 1 == count);
            }
            self.visible_index.insert(id, self.visible_rows.len());
            self.visible_rows.push(VisibleRow {
                index,
                level,
                has_children,
                is_tail_stack: is_tail_stack.clone(),
            });
            if has_children && self.expanded.contains(&id) {
                self.build_rows(model, &index, level + 1, is_tail_stack);
            }
            if level > 0 {
                is_tail_stack.pop();
            }
        }
    }

    /// Index of the selected row (invalid when nothing is selected).
    pub fn selected_index(&self) -> ModelIndex {
        self.list_state
            .selected()
            .and_then(|row| self.visible_rows.get(row))
            .map_or_else(ModelIndex::invalid, |row| row.index)
    }

    pub fn selected_level(&self) -> Option<u16> {
        self.list_state
            .selected()
            .and_then(|row| self.visible_rows.get(row))
            .map(|row| row.level)
    }

    /// Expands all ancestors of `index`, then selects it.
    pub fn select_index<T: ItemModel>(&mut self, model: &T, index: &ModelIndex) -> bool {
        let Some(id) = index.id() else {
            return false;
        };
        self.expand_to(model, index);
        if model.row_count(index) > 0 {
            self.expanded.insert(id);
        }
        self.update_visible_rows(model);
        if let Some(row) = self.visible_index.get(&id).copied() {
            self.list_state.select(Some(row));
            true
        } else {
            false
        }
    }

    /// Expands every ancestor of `index`.
    pub fn expand_to<T: ItemModel>(&mut self, model: &T, index: &ModelIndex) {
        let mut parent = model.parent(index);
        while let Some(id) = parent.id() {
            self.expanded.insert(id);
            parent = model.parent(&parent);
        }
        self.dirty = true;
    }

    pub fn set_expanded(&mut self, id: NodeId, expand: bool) {
        if expand {
            self.expanded.insert(id);
        } else {
            self.expanded.remove(&id);
        }
        self.dirty = true;
    }

    pub fn toggle(&mut self, id: NodeId) {
        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
        self.dirty = true;
    }

    pub fn expand_all<T: ItemModel>(&mut self, model: &T) {
        self.set_expanded_recursive(model, &ModelIndex::invalid(), true);
        self.dirty = true;
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
        self.dirty = true;
    }

    fn set_expanded_recursive<T: ItemModel>(&mut self, model: &T, index: &ModelIndex, expand: bool) {
        let count = model.row_count(index);
        if let Some(id) = index.id() {
            if expand && count > 0 {
                self.expanded.insert(id);
            } else {
                self.expanded.remove(&id);
            }
        }
        for row in 0..count {
            let child = model.index(row, 0, index);
            self.set_expanded_recursive(model, &child, expand);
        }
    }

    pub fn select_first(&mut self) {
        let first = (!self.visible_rows.is_empty()).then_some(0);
        self.list_state.select(first);
    }

    pub fn select_last(&mut self) {
        self.list_state.select(self.visible_rows.len().checked_sub(1));
    }

    pub fn select_prev(&mut self) {
        if self.visible_rows.is_empty() {
            self.list_state.select(None);
            return;
        }
        let selected = self.list_state.selected().unwrap_or(0);
        self.list_state.select(Some(selected.saturating_sub(1)));
    }

    pub fn select_next(&mut self) {
        if self.visible_rows.is_empty() {
            self.list_state.select(None);
            return;
        }
        let next = self
            .list_state
            .selected()
            .map_or(0, |selected| selected + 1)
            .min(self.visible_rows.len() - 1);
        self.list_state.select(Some(next));
    }

    fn select_parent<T: ItemModel>(&mut self, model: &T) {
        let parent = model.parent(&self.selected_index());
        if let Some(row) = parent.id().and_then(|id| self.visible_index.get(&id).copied()) {
            self.list_state.select(Some(row));
        }
    }

    fn select_child<T: ItemModel>(&mut self, model: &T) -> bool {
        let Some(selected) = self.list_state.selected() else {
            return false;
        };
        let Some(row) = self.visible_rows.get(selected) else {
            return false;
        };
        let (Some(id), true) = (row.index.id(), row.has_children) else {
            return false;
        };
        if self.expanded.insert(id) {
            self.update_visible_rows(model);
        } else {
            self.list_state.select(Some(selected + 1));
        }
        true
    }

    /// Adjusts scroll offset so the selection is within the viewport.
    pub fn ensure_selection_visible(&mut self, viewport_height: usize) {
        self.clamp_selection();
        let Some(selected) = self.list_state.selected() else {
            return;
        };
        let viewport_height = viewport_height.max(1);
        let offset = self.list_state.offset();
        if selected < offset {
            *self.list_state.offset_mut() = selected;
        } else if selected >= offset + viewport_height {
            *self.list_state.offset_mut() = selected + 1 - viewport_height;
        }
    }

    pub fn ensure_selection_visible_with_policy(&mut self, viewport_height: usize, policy: ScrollPolicy) {
        match policy {
            ScrollPolicy::KeepInView => self.ensure_selection_visible(viewport_height),
            ScrollPolicy::CenterOnSelect => {
                self.clamp_selection();
                let Some(selected) = self.list_state.selected() else {
                    return;
                };
                let viewport_height = viewport_height.max(1);
                let max_offset = self.visible_rows.len().saturating_sub(viewport_height);
                let offset = selected.saturating_sub(viewport_height / 2).min(max_offset);
                *self.list_state.offset_mut() = offset;
            }
        }
    }

    const fn clamp_selection(&mut self) {
        if self.visible_rows.is_empty() {
            self.list_state.select(None);
            return;
        }
        if let Some(selected) = self.list_state.selected()
            && selected >= self.visible_rows.len()
        {
            self.list_state.select(Some(self.visible_rows.len() - 1));
        }
    }

    /// Handles a view action and returns the resulting event.
    ///
    /// Actions that need to mutate the navigator are forwarded.
    pub fn handle_action<T: ItemModel, C>(&mut self, model: &T, action: ViewAction<C>) -> ViewEvent<C> {
        self.ensure_visible_rows(model);
        if matches!(
            &action,
            ViewAction::ActivateSelected
                | ViewAction::CloseCurrentModel
                | ViewAction::CloseAllModels
                | ViewAction::OpenContextMenu
                | ViewAction::Custom(_)
        ) {
            return ViewEvent::Action(action);
        }

        if self.visible_rows.is_empty() {
            return ViewEvent::Unhandled;
        }

        match action {
            ViewAction::SelectPrev => self.select_prev(),
            ViewAction::SelectNext => self.select_next(),
            ViewAction::SelectParent => self.select_parent(model),
            ViewAction::SelectChild => {
                if !self.select_child(model) {
                    return ViewEvent::Unhandled;
                }
            }
            ViewAction::ToggleNode => {
                let selected = self.selected_index();
                match selected.id() {
                    Some(id) if model.row_count(&selected) > 0 => self.toggle(id),
                    _ => return ViewEvent::Unhandled,
                }
            }
            ViewAction::ToggleRecursive => {
                let selected = self.selected_index();
                match selected.id() {
                    Some(id) if model.row_count(&selected) > 0 => {
                        let expand = !self.expanded.contains(&id);
                        self.set_expanded_recursive(model, &selected, expand);
                        self.dirty = true;
                    }
                    _ => return ViewEvent::Unhandled,
                }
            }
            ViewAction::ExpandAll => self.expand_all(model),
            ViewAction::CollapseAll => self.collapse_all(),
            ViewAction::ToggleGuides => self.draw_lines = !self.draw_lines,
            ViewAction::SelectFirst => self.select_first(),
            ViewAction::SelectLast => self.select_last(),
            ViewAction::ActivateSelected
            | ViewAction::CloseCurrentModel
            | ViewAction::CloseAllModels
            | ViewAction::OpenContextMenu
            | ViewAction::Custom(_) => return ViewEvent::Action(action),
        }
        ViewEvent::Handled
    }

    #[cfg(feature = "keymap")]
    /// Resolves a key event into an action and handles it.
    pub fn handle_key<T: ItemModel>(&mut self, model: &T, key: KeyEvent) -> ViewEvent<()> {
        let Some(action) = self.keymap.resolve(key) else {
            return ViewEvent::Unhandled;
        };
        self.handle_action(model, action)
    }

    #[cfg(feature = "keymap")]
    /// Resolves a key event with a custom mapping and handles it.
    pub fn handle_key_with<T, C, F>(&mut self, model: &T, key: KeyEvent, custom: F) -> ViewEvent<C>
    where
        T: ItemModel,
        F: Fn(KeyEvent) -> Option<C>,
    {
        let Some(action) = self.keymap.resolve_with(key, custom) else {
            return ViewEvent::Unhandled;
        };
        self.handle_action(model, action)
    }
}
