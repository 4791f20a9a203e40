use std::borrow::Cow;

use crate::arena::{Node, NodeArena, NodeId, NodeKind};
use crate::config::NavigatorConfig;
use crate::error::{NavigatorError, Result};
use crate::index::{ItemData, ItemRole, ModelIndex};
use crate::log::{NavigatorLog, Severity, TracingLog};
use crate::model::{DomainModel, ItemModel, ModelElement, ModelKey};
use crate::signal::ViewSignal;

/// Suffix appended to the display text of the active model's node.
pub const CURRENT_SUFFIX: &str = "  [Current]";

struct OpenModel<M> {
    key: ModelKey,
    model: M,
}

/// Tree adapter between open domain models and a view.
///
/// Each open model is one top-level node below a hidden root. One of the
/// open models may be marked active. Structural changes are reported through
/// queued [`ViewSignal`]s, and removed nodes stay allocated until
/// [`process_deferred`](Self::process_deferred) runs.
pub struct NavigatorModel<M: DomainModel, L: NavigatorLog = TracingLog> {
    arena: NodeArena,
    root: NodeId,
    open: Vec<OpenModel<M>>,
    active: Option<ModelKey>,
    next_key: u64,
    pending: Vec<NodeId>,
    signals: Vec<ViewSignal>,
    logger: L,
    config: NavigatorConfig,
}

impl<M: DomainModel> NavigatorModel<M> {
    /// Creates an empty navigator that logs through `tracing`.
    pub fn new() -> Self {
        Self::with_parts(NavigatorConfig::default(), TracingLog)
    }

    pub fn with_config(config: NavigatorConfig) -> Self {
        Self::with_parts(config, TracingLog)
    }
}

impl<M: DomainModel> Default for NavigatorModel<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: DomainModel, L: NavigatorLog> NavigatorModel<M, L> {
    pub fn with_logger(logger: L) -> Self {
        Self::with_parts(NavigatorConfig::default(), logger)
    }

    pub fn with_parts(config: NavigatorConfig, logger: L) -> Self {
        let mut arena = NodeArena::new();
        let root = arena.insert(None, config.root_label.clone(), "", NodeKind::Root);
        Self {
            arena,
            root,
            open: Vec::new(),
            active: None,
            next_key: 0,
            pending: Vec::new(),
            signals: Vec::new(),
            logger,
            config,
        }
    }

    pub const fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    pub const fn logger(&self) -> &L {
        &self.logger
    }

    /// Handle of the hidden root node.
    pub const fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.arena.get(id)
    }

    /// Resolves an index to its node; the invalid index resolves to the root.
    pub fn node_for_index(&self, index: &ModelIndex) -> Option<&Node> {
        self.resolve(index).and_then(|id| self.arena.get(id))
    }

    /// Returns the index addressing `id` (invalid for the root, stale or detached nodes).
    pub fn index_for_node(&self, id: NodeId) -> ModelIndex {
        if id == self.root {
            return ModelIndex::invalid();
        }
        self.arena
            .row_of(id)
            .map_or_else(ModelIndex::invalid, |row| ModelIndex::new(row, 0, id))
    }

    /// Finds the top-level node wrapping `key`.
    pub fn find_node_for_model(&self, key: ModelKey) -> Option<NodeId> {
        self.arena
            .children(self.root)
            .iter()
            .copied()
            .find(|id| self.arena.get(*id).is_some_and(|node| node.kind().wraps_model(key)))
    }

    /// Appends `model`, makes it active and adds its node below the root.
    pub fn load_model(&mut self, mut model: M) -> ModelKey {
        let key = ModelKey(self.next_key);
        self.next_key += 1;

        self.emit(ViewSignal::LayoutAboutToBeChanged);
        model.init_system();

        let name = model.name().to_owned();
        let elements = model.elements();
        self.open.push(OpenModel { key, model });
        self.active = Some(key);

        let icon = self.config.icons.icon_for(&NodeKind::Model(key)).to_path_buf();
        let node = self
            .arena
            .insert(Some(self.root), name, icon, NodeKind::Model(key));
        for element in &elements {
            self.insert_element(node, key, element);
        }

        self.emit(ViewSignal::LayoutChanged);
        self.emit(ViewSignal::ExpandIndex(self.index_for_node(node)));
        tracing::debug!(%key, open = self.open.len(), "model loaded");
        key
    }

    fn insert_element(&mut self, parent: NodeId, model: ModelKey, element: &ModelElement) {
        let kind = NodeKind::Element {
            model,
            kind: element.kind,
        };
        let icon = self.config.icons.icon_for(&kind).to_path_buf();
        let id = self
            .arena
            .insert(Some(parent), element.name.clone(), icon, kind);
        for child in &element.children {
            self.insert_element(id, model, child);
        }
    }

    /// Closes the active model and hands it back to the caller.
    ///
    /// Without an active model this only logs an error. Afterwards the first
    /// remaining open model (if any) becomes active.
    pub fn close_current_model(&mut self) -> Option<M> {
        let Some(active) = self.active.filter(|key| self.is_open(*key)) else {
            self.log("No Current Model to be closed", Severity::Error);
            return None;
        };

        self.emit(ViewSignal::LayoutAboutToBeChanged);
        let closed = self.detach_model(active);
        self.emit(ViewSignal::LayoutChanged);
        self.log("Current Model closed", Severity::Success);
        closed
    }

    /// Closes a specific open model and hands it back to the caller.
    pub fn close_model(&mut self, key: ModelKey) -> Result<M> {
        if !self.is_open(key) {
            return Err(NavigatorError::ModelNotOpen(key));
        }
        self.emit(ViewSignal::LayoutAboutToBeChanged);
        let closed = self.detach_model(key);
        self.emit(ViewSignal::LayoutChanged);
        self.log("Model closed", Severity::Success);
        closed.ok_or(NavigatorError::ModelNotOpen(key))
    }

    /// Closes every open model and drops it.
    pub fn close_all_models(&mut self) {
        self.emit(ViewSignal::LayoutAboutToBeChanged);
        self.detach_all();
        self.emit(ViewSignal::LayoutChanged);
        self.log("All Models are closed", Severity::Success);
    }

    /// Resets the navigator: every model and node is dropped and every
    /// previously issued index becomes stale.
    pub fn clean(&mut self) {
        self.emit(ViewSignal::LayoutAboutToBeChanged);
        self.emit(ViewSignal::BeginReset);
        self.detach_all();
        self.emit(ViewSignal::EndReset);
        self.emit(ViewSignal::LayoutChanged);
        tracing::debug!("navigator reset");
    }

    fn detach_all(&mut self) {
        let top_level = self.arena.children(self.root).to_vec();
        for id in top_level {
            self.schedule_removal(id);
        }
        self.active = None;
        self.open.clear();
    }

    fn detach_model(&mut self, key: ModelKey) -> Option<M> {
        let position = self.open.iter().position(|open| open.key == key)?;
        match self.find_node_for_model(key) {
            Some(node) => self.schedule_removal(node),
            None => self.log("Model node not found", Severity::Warning),
        }
        let closed = self.open.remove(position);
        if self.active == Some(key) {
            self.active = self.open.first().map(|open| open.key);
        }
        tracing::debug!(%key, open = self.open.len(), "model closed");
        Some(closed.model)
    }

    fn schedule_removal(&mut self, id: NodeId) {
        if self.arena.detach(id) {
            self.pending.push(id);
        }
    }

    /// Destroys nodes removed since the last call, returning how many were freed.
    ///
    /// Runs at the end of a dispatch cycle, once the view is done with the
    /// indices it held before the change.
    pub fn process_deferred(&mut self) -> usize {
        let freed: usize = self
            .pending
            .drain(..)
            .map(|id| self.arena.free_subtree(id))
            .sum();
        if freed > 0 {
            tracing::debug!(freed, "deferred nodes destroyed");
        }
        freed
    }

    /// Number of detached subtrees awaiting destruction.
    pub fn pending_removals(&self) -> usize {
        self.pending.len()
    }

    /// Drains view signals in emission order.
    pub fn take_signals(&mut self) -> Vec<ViewSignal> {
        std::mem::take(&mut self.signals)
    }

    pub(crate) fn emit(&mut self, signal: ViewSignal) {
        self.signals.push(signal);
    }

    fn log(&self, message: &str, severity: Severity) {
        self.logger.log(message, &self.config.log_tag, severity);
    }

    pub const fn active_model(&self) -> Option<ModelKey> {
        self.active
    }

    pub fn active_model_ref(&self) -> Option<&M> {
        self.active.and_then(|key| self.model(key))
    }

    /// Marks `key` as the active model, or clears the active model with `None`.
    ///
    /// Keys that are not open are rejected.
    pub fn set_active_model(&mut self, key: Option<ModelKey>) -> Result<()> {
        if let Some(key) = key
            && !self.is_open(key)
        {
            return Err(NavigatorError::ModelNotOpen(key));
        }
        self.active = key;
        Ok(())
    }

    /// Keys of open models in load order.
    pub fn open_models(&self) -> impl ExactSizeIterator<Item = ModelKey> + '_ {
        self.open.iter().map(|open| open.key)
    }

    pub fn open_model_count(&self) -> usize {
        self.open.len()
    }

    pub fn is_open(&self, key: ModelKey) -> bool {
        self.open.iter().any(|open| open.key == key)
    }

    pub fn model(&self, key: ModelKey) -> Option<&M> {
        self.open
            .iter()
            .find(|open| open.key == key)
            .map(|open| &open.model)
    }

    pub fn model_mut(&mut self, key: ModelKey) -> Option<&mut M> {
        self.open
            .iter_mut()
            .find(|open| open.key == key)
            .map(|open| &mut open.model)
    }

    fn resolve(&self, index: &ModelIndex) -> Option<NodeId> {
        match index.id() {
            None => Some(self.root),
            Some(id) => self.arena.contains(id).then_some(id),
        }
    }
}

impl<M: DomainModel, L: NavigatorLog> ItemModel for NavigatorModel<M, L> {
    fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex {
        if column != 0 {
            return ModelIndex::invalid();
        }
        let Some(parent) = self.resolve(parent) else {
            return ModelIndex::invalid();
        };
        self.arena
            .children(parent)
            .get(row)
            .map_or_else(ModelIndex::invalid, |child| {
                ModelIndex::new(row, column, *child)
            })
    }

    fn parent(&self, child: &ModelIndex) -> ModelIndex {
        let Some(parent) = child.id().and_then(|id| self.arena.parent(id)) else {
            return ModelIndex::invalid();
        };
        self.index_for_node(parent)
    }

    fn row_count(&self, parent: &ModelIndex) -> usize {
        self.resolve(parent)
            .map_or(0, |id| self.arena.children(id).len())
    }

    fn data(&self, index: &ModelIndex, role: ItemRole) -> ItemData<'_> {
        let Some(node) = index.id().and_then(|id| self.arena.get(id)) else {
            return ItemData::None;
        };
        match role {
            ItemRole::Display => {
                if self.is_current(index) {
                    ItemData::Text(Cow::Owned(format!("{}{CURRENT_SUFFIX}", node.name())))
                } else {
                    ItemData::Text(Cow::Borrowed(node.name()))
                }
            }
            ItemRole::Decoration => {
                if node.icon().as_os_str().is_empty() {
                    ItemData::None
                } else {
                    ItemData::Icon(node.icon())
                }
            }
        }
    }

    fn is_current(&self, index: &ModelIndex) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        index
            .id()
            .and_then(|id| self.arena.get(id))
            .is_some_and(|node| node.kind().wraps_model(active))
    }

    fn contains_node(&self, id: NodeId) -> bool {
        let mut current = id;
        while current != self.root {
            match self.arena.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::log::MemoryLog;
    use crate::model::ElementKind;

    struct Gait {
        name: &'static str,
        init_calls: usize,
    }

    impl Gait {
        const fn new(name: &'static str) -> Self {
            Self {
                name,
                init_calls: 0,
            }
        }
    }

    impl DomainModel for Gait {
        fn name(&self) -> &str {
            self.name
        }

        fn init_system(&mut self) {
            self.init_calls += 1;
        }

        fn elements(&self) -> Vec<ModelElement> {
            vec![
                ModelElement::group("Bodies")
                    .with_child(ModelElement::new("pelvis", ElementKind::Body))
                    .with_child(ModelElement::new("femur_r", ElementKind::Body)),
                ModelElement::group("Joints")
                    .with_child(ModelElement::new("hip_r", ElementKind::Joint)),
            ]
        }
    }

    fn navigator() -> (NavigatorModel<Gait, MemoryLog>, MemoryLog) {
        let log = MemoryLog::new();
        (NavigatorModel::with_logger(log.clone()), log)
    }

    fn display(nav: &NavigatorModel<Gait, MemoryLog>, index: &ModelIndex) -> String {
        nav.data(index, ItemRole::Display)
            .as_text()
            .unwrap_or_default()
            .to_owned()
    }

    #[test]
    fn load_initializes_once_and_builds_element_subtree() {
        let (mut nav, _) = navigator();
        let key = nav.load_model(Gait::new("gait2392"));

        assert_eq!(nav.model(key).map(|m| m.init_calls), Some(1));
        let model_index = nav.index(0, 0, &ModelIndex::invalid());
        assert_eq!(nav.row_count(&model_index), 2);

        let bodies = nav.index(0, 0, &model_index);
        assert_eq!(display(&nav, &bodies), "Bodies");
        assert_eq!(nav.row_count(&bodies), 2);
        let femur = nav.index(1, 0, &bodies);
        assert_eq!(display(&nav, &femur), "femur_r");
        assert_eq!(nav.parent(&femur), bodies);
        assert_eq!(nav.parent(&bodies), model_index);
    }

    #[test]
    fn load_emits_layout_pair_then_expand_request() {
        let (mut nav, _) = navigator();
        nav.load_model(Gait::new("arm26"));
        let expected = nav.index(0, 0, &ModelIndex::invalid());

        assert_eq!(
            nav.take_signals(),
            vec![
                ViewSignal::LayoutAboutToBeChanged,
                ViewSignal::LayoutChanged,
                ViewSignal::ExpandIndex(expected),
            ]
        );
        assert!(nav.take_signals().is_empty());
    }

    #[test]
    fn only_model_node_of_active_model_is_marked_current() {
        let (mut nav, _) = navigator();
        nav.load_model(Gait::new("a"));
        nav.load_model(Gait::new("b"));
        let root = ModelIndex::invalid();
        let a = nav.index(0, 0, &root);
        let b = nav.index(1, 0, &root);
        let b_bodies = nav.index(0, 0, &b);

        assert_eq!(display(&nav, &a), "a");
        assert_eq!(display(&nav, &b), "b  [Current]");
        assert_eq!(display(&nav, &b_bodies), "Bodies");
    }

    #[test]
    fn decoration_returns_themed_icon_path() {
        let (mut nav, _) = navigator();
        nav.load_model(Gait::new("a"));
        let model_index = nav.index(0, 0, &ModelIndex::invalid());
        let joints = nav.index(1, 0, &model_index);
        let hip = nav.index(0, 0, &joints);

        assert_eq!(
            nav.data(&model_index, ItemRole::Decoration).as_icon(),
            Some(Path::new(":/icons/model.png"))
        );
        assert_eq!(
            nav.data(&hip, ItemRole::Decoration).as_icon(),
            Some(Path::new(":/icons/joint.png"))
        );
        assert!(nav.data(&ModelIndex::invalid(), ItemRole::Decoration).is_none());
    }

    #[test]
    fn empty_icon_theme_yields_no_decoration() {
        let config = NavigatorConfig::default().icons(crate::config::IconTheme::empty());
        let mut nav: NavigatorModel<Gait, MemoryLog> =
            NavigatorModel::with_parts(config, MemoryLog::new());
        nav.load_model(Gait::new("a"));
        let model_index = nav.index(0, 0, &ModelIndex::invalid());

        assert!(nav.data(&model_index, ItemRole::Decoration).is_none());
    }

    #[test]
    fn index_rejects_out_of_range_rows_and_extra_columns() {
        let (mut nav, _) = navigator();
        nav.load_model(Gait::new("a"));
        let root = ModelIndex::invalid();

        assert!(!nav.index(1, 0, &root).is_valid());
        assert!(!nav.index(0, 1, &root).is_valid());
        assert!(nav.has_index(0, 0, &root));
        assert!(!nav.has_index(0, 1, &root));
        assert_eq!(nav.column_count(&root), 1);
    }

    #[test]
    fn removed_nodes_stay_readable_until_deferred_drain() {
        let (mut nav, _) = navigator();
        nav.load_model(Gait::new("a"));
        let held = nav.index(0, 0, &ModelIndex::invalid());

        nav.close_current_model();
        assert_eq!(nav.row_count(&ModelIndex::invalid()), 0);
        assert_eq!(nav.pending_removals(), 1);
        assert_eq!(display(&nav, &held), "a");
        assert!(!nav.parent(&held).is_valid());

        // model node + two groups + three elements
        assert_eq!(nav.process_deferred(), 6);
        assert!(nav.data(&held, ItemRole::Display).is_none());
        assert_eq!(nav.row_count(&held), 0);
        assert!(!nav.index(0, 0, &held).is_valid());
        assert_eq!(nav.process_deferred(), 0);
    }

    #[test]
    fn close_current_returns_model_to_caller() {
        let (mut nav, _) = navigator();
        nav.load_model(Gait::new("a"));

        let closed = nav.close_current_model();
        assert_eq!(closed.map(|m| m.name), Some("a"));
        assert_eq!(nav.active_model(), None);
    }

    #[test]
    fn close_model_keeps_other_active_model() {
        let (mut nav, log) = navigator();
        let a = nav.load_model(Gait::new("a"));
        let b = nav.load_model(Gait::new("b"));

        assert!(nav.close_model(a).is_ok());
        assert_eq!(nav.active_model(), Some(b));
        assert_eq!(nav.open_models().collect::<Vec<_>>(), vec![b]);
        assert_eq!(nav.close_model(a).err(), Some(NavigatorError::ModelNotOpen(a)));
        assert_eq!(log.count(Severity::Success), 1);
    }

    #[test]
    fn closing_active_model_by_key_falls_back_to_first_remaining() {
        let (mut nav, _) = navigator();
        let a = nav.load_model(Gait::new("a"));
        let b = nav.load_model(Gait::new("b"));
        let c = nav.load_model(Gait::new("c"));
        nav.take_signals();

        assert_eq!(nav.close_model(c).map(|model| model.name), Ok("c"));
        assert_eq!(nav.active_model(), Some(a));
        assert_eq!(nav.open_models().collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(
            nav.take_signals(),
            vec![ViewSignal::LayoutAboutToBeChanged, ViewSignal::LayoutChanged]
        );
    }

    #[test]
    fn current_row_follows_active_key_not_display_text() {
        let (mut nav, _) = navigator();
        nav.load_model(Gait::new("fake  [Current]"));
        nav.load_model(Gait::new("real"));
        let root = ModelIndex::invalid();
        let fake = nav.index(0, 0, &root);
        let real = nav.index(1, 0, &root);

        assert!(!nav.is_current(&fake));
        assert!(nav.is_current(&real));
        assert!(!nav.is_current(&nav.index(0, 0, &real)));
        assert!(!nav.is_current(&root));
    }

    #[test]
    fn detached_nodes_are_not_contained_before_drain() {
        let (mut nav, _) = navigator();
        nav.load_model(Gait::new("a"));
        let model = nav.index(0, 0, &ModelIndex::invalid());
        let group = nav.index(0, 0, &model);
        let (Some(model_id), Some(group_id)) = (model.id(), group.id()) else {
            panic!("loaded model must have a node and a group");
        };
        assert!(nav.contains_node(model_id));
        assert!(nav.contains_node(group_id));
        assert!(nav.contains_node(nav.root_id()));

        nav.close_current_model();
        assert!(!nav.contains_node(model_id));
        assert!(!nav.contains_node(group_id));
        nav.process_deferred();
        assert!(!nav.contains_node(group_id));
    }

    #[test]
    fn set_active_model_rejects_keys_that_are_not_open() {
        let (mut nav, _) = navigator();
        let a = nav.load_model(Gait::new("a"));
        let b = nav.load_model(Gait::new("b"));
        nav.close_model(b).ok();

        assert_eq!(
            nav.set_active_model(Some(b)),
            Err(NavigatorError::ModelNotOpen(b))
        );
        assert_eq!(nav.active_model(), Some(a));
        assert_eq!(nav.set_active_model(None), Ok(()));
        assert_eq!(nav.active_model(), None);
        assert_eq!(nav.set_active_model(Some(a)), Ok(()));
        assert_eq!(nav.active_model_ref().map(|m| m.name), Some("a"));
    }

    #[test]
    fn clean_brackets_reset_and_logs_nothing() {
        let (mut nav, log) = navigator();
        nav.load_model(Gait::new("a"));
        nav.take_signals();

        nav.clean();
        assert_eq!(
            nav.take_signals(),
            vec![
                ViewSignal::LayoutAboutToBeChanged,
                ViewSignal::BeginReset,
                ViewSignal::EndReset,
                ViewSignal::LayoutChanged,
            ]
        );
        assert!(log.is_empty());
        assert_eq!(nav.open_model_count(), 0);
    }

    #[test]
    fn keys_are_not_reused_after_close() {
        let (mut nav, _) = navigator();
        let a = nav.load_model(Gait::new("a"));
        nav.close_all_models();
        nav.process_deferred();
        let b = nav.load_model(Gait::new("b"));

        assert_ne!(a, b);
        assert!(nav.find_node_for_model(a).is_none());
        assert!(nav.find_node_for_model(b).is_some());
    }

    #[test]
    fn log_messages_carry_configured_tag() {
        let log = MemoryLog::new();
        let config = NavigatorConfig::default().log_tag("Navigator");
        let mut nav: NavigatorModel<Gait, MemoryLog> = NavigatorModel::with_parts(config, log.clone());

        nav.close_current_model();
        let entry = log.last();
        assert_eq!(entry.as_ref().map(|e| e.tag.as_str()), Some("Navigator"));
        assert_eq!(entry.map(|e| e.severity), Some(Severity::Error));
    }
}
