use crate::arena::{Node, NodeKind};
use crate::error::{NavigatorError, Result};
use crate::index::ModelIndex;
use crate::log::NavigatorLog;
use crate::model::{DomainModel, ModelKey};
use crate::navigator::NavigatorModel;
use crate::signal::ViewSignal;

/// Operation offered by a node's context menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeAction {
    /// Make the model the active one.
    ActivateModel(ModelKey),
    /// Close the model.
    CloseModel(ModelKey),
    /// Close every open model.
    CloseAllModels,
    /// Ask the view to expand the node.
    ExpandSubtree(ModelIndex),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: &'static str,
    pub action: NodeAction,
    pub enabled: bool,
}

/// Ordered list of context actions, filled in place.
#[derive(Clone, Debug, Default)]
pub struct ActionMenu {
    entries: Vec<MenuEntry>,
}

impl ActionMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: &'static str, action: NodeAction) {
        self.push_with_state(label, action, true);
    }

    pub fn push_with_state(&mut self, label: &'static str, action: NodeAction, enabled: bool) {
        self.entries.push(MenuEntry {
            label,
            action,
            enabled,
        });
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the action of the enabled entry at `position`.
    pub fn action_at(&self, position: usize) -> Option<NodeAction> {
        self.entries
            .get(position)
            .filter(|entry| entry.enabled)
            .map(|entry| entry.action)
    }
}

impl Node {
    /// Appends the actions valid for this node variant.
    ///
    /// `index` addresses this node and `active` is the navigator's active model.
    pub fn setup_actions(&self, index: ModelIndex, active: Option<ModelKey>, menu: &mut ActionMenu) {
        match self.kind() {
            NodeKind::Root => menu.push("Close all models", NodeAction::CloseAllModels),
            NodeKind::Model(key) => {
                menu.push_with_state(
                    "Set as current model",
                    NodeAction::ActivateModel(key),
                    active != Some(key),
                );
                menu.push("Close model", NodeAction::CloseModel(key));
                menu.push("Close all models", NodeAction::CloseAllModels);
            }
            NodeKind::Element { model, .. } => {
                menu.push_with_state(
                    "Select owning model",
                    NodeAction::ActivateModel(model),
                    active != Some(model),
                );
                menu.push_with_state(
                    "Expand subtree",
                    NodeAction::ExpandSubtree(index),
                    !self.children().is_empty(),
                );
            }
        }
    }
}

impl<M: DomainModel, L: NavigatorLog> NavigatorModel<M, L> {
    /// Fills `menu` with the context actions of the node at `index`.
    ///
    /// A stale index leaves the menu untouched.
    pub fn actions_for(&self, index: &ModelIndex, menu: &mut ActionMenu) {
        if let Some(node) = self.node_for_index(index) {
            node.setup_actions(*index, self.active_model(), menu);
        }
    }

    /// Runs a context action chosen from a menu.
    ///
    /// Closed models are dropped.
    pub fn trigger(&mut self, action: NodeAction) -> Result<()> {
        match action {
            NodeAction::ActivateModel(key) => self.set_active_model(Some(key)),
            NodeAction::CloseModel(key) => self.close_model(key).map(drop),
            NodeAction::CloseAllModels => {
                self.close_all_models();
                Ok(())
            }
            NodeAction::ExpandSubtree(index) => {
                if index.is_valid() && self.node_for_index(&index).is_some() {
                    self.emit(ViewSignal::ExpandIndex(index));
                    Ok(())
                } else {
                    Err(NavigatorError::StaleIndex)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::MemoryLog;
    use crate::model::{ElementKind, ItemModel, ModelElement};

    struct Arm;

    impl DomainModel for Arm {
        fn name(&self) -> &str {
            "arm26"
        }

        fn init_system(&mut self) {}

        fn elements(&self) -> Vec<ModelElement> {
            vec![
                ModelElement::group("Forces")
                    .with_child(ModelElement::new("TRIlong", ElementKind::Force)),
            ]
        }
    }

    fn labels(menu: &ActionMenu) -> Vec<(&'static str, bool)> {
        menu.entries()
            .iter()
            .map(|entry| (entry.label, entry.enabled))
            .collect()
    }

    #[test]
    fn model_node_offers_close_actions() {
        let mut nav: NavigatorModel<Arm, MemoryLog> = NavigatorModel::with_logger(MemoryLog::new());
        let key = nav.load_model(Arm);
        let index = nav.index(0, 0, &ModelIndex::invalid());
        let mut menu = ActionMenu::new();

        nav.actions_for(&index, &mut menu);

        assert_eq!(
            labels(&menu),
            vec![
                ("Set as current model", false),
                ("Close model", true),
                ("Close all models", true),
            ]
        );
        assert_eq!(menu.action_at(0), None);
        assert_eq!(menu.action_at(1), Some(NodeAction::CloseModel(key)));
    }

    #[test]
    fn element_node_offers_owning_model_actions() {
        let mut nav: NavigatorModel<Arm, MemoryLog> = NavigatorModel::with_logger(MemoryLog::new());
        let first = nav.load_model(Arm);
        nav.load_model(Arm);
        let first_index = nav.index(0, 0, &ModelIndex::invalid());
        let forces = nav.index(0, 0, &first_index);
        let muscle = nav.index(0, 0, &forces);

        let mut menu = ActionMenu::new();
        nav.actions_for(&forces, &mut menu);
        assert_eq!(
            labels(&menu),
            vec![("Select owning model", true), ("Expand subtree", true)]
        );

        menu.clear();
        nav.actions_for(&muscle, &mut menu);
        assert_eq!(
            labels(&menu),
            vec![("Select owning model", true), ("Expand subtree", false)]
        );

        assert_eq!(nav.trigger(NodeAction::ActivateModel(first)), Ok(()));
        assert_eq!(nav.active_model(), Some(first));
    }

    #[test]
    fn invalid_index_targets_root_and_stale_index_adds_nothing() {
        let mut nav: NavigatorModel<Arm, MemoryLog> = NavigatorModel::with_logger(MemoryLog::new());
        nav.load_model(Arm);
        let held = nav.index(0, 0, &ModelIndex::invalid());

        let mut menu = ActionMenu::new();
        nav.actions_for(&ModelIndex::invalid(), &mut menu);
        assert_eq!(labels(&menu), vec![("Close all models", true)]);

        assert_eq!(nav.trigger(NodeAction::CloseAllModels), Ok(()));
        nav.process_deferred();
        menu.clear();
        nav.actions_for(&held, &mut menu);
        assert!(menu.is_empty());
        assert_eq!(
            nav.trigger(NodeAction::ExpandSubtree(held)),
            Err(NavigatorError::StaleIndex)
        );
    }

    #[test]
    fn close_model_action_drops_model_and_emits_layout_pair() {
        let mut nav: NavigatorModel<Arm, MemoryLog> = NavigatorModel::with_logger(MemoryLog::new());
        let key = nav.load_model(Arm);
        nav.take_signals();

        assert_eq!(nav.trigger(NodeAction::CloseModel(key)), Ok(()));
        assert_eq!(nav.open_model_count(), 0);
        assert_eq!(
            nav.take_signals(),
            vec![ViewSignal::LayoutAboutToBeChanged, ViewSignal::LayoutChanged]
        );
        assert_eq!(
            nav.trigger(NodeAction::CloseModel(key)),
            Err(NavigatorError::ModelNotOpen(key))
        );
    }

    #[test]
    fn close_model_action_on_current_model_activates_first_remaining() {
        let mut nav: NavigatorModel<Arm, MemoryLog> = NavigatorModel::with_logger(MemoryLog::new());
        let first = nav.load_model(Arm);
        let second = nav.load_model(Arm);
        let current = nav.load_model(Arm);

        assert_eq!(nav.trigger(NodeAction::CloseModel(current)), Ok(()));
        assert_eq!(nav.active_model(), Some(first));
        assert_eq!(nav.open_models().collect::<Vec<_>>(), vec![first, second]);
    }
}
