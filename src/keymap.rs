use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::ViewAction;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum KeymapProfile {
    #[default]
    Default,
    Vim,
    Arrows,
}

#[derive(Clone, Copy, Debug)]
pub struct NavigatorKeyBindings {
    profile: KeymapProfile,
}

impl Default for NavigatorKeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigatorKeyBindings {
    pub const fn new() -> Self {
        Self {
            profile: KeymapProfile::Default,
        }
    }

    pub const fn with_profile(profile: KeymapProfile) -> Self {
        Self { profile }
    }

    pub const fn profile(&self) -> KeymapProfile {
        self.profile
    }

    pub const fn set_profile(&mut self, profile: KeymapProfile) {
        self.profile = profile;
    }

    pub fn resolve<C>(&self, key: KeyEvent) -> Option<ViewAction<C>> {
        if key.modifiers.contains(KeyModifiers::SHIFT) && key.code == KeyCode::Delete {
            return Some(ViewAction::CloseAllModels);
        }

        let nav_action = match self.profile {
            KeymapProfile::Default => Self::resolve_default_nav(key),
            KeymapProfile::Vim => Self::resolve_vim_nav(key),
            KeymapProfile::Arrows => Self::resolve_arrow_nav(key),
        };
        if nav_action.is_some() {
            return nav_action;
        }

        Self::resolve_common(key)
    }

    pub fn resolve_with<C, F>(&self, key: KeyEvent, custom: F) -> Option<ViewAction<C>>
    where
        F: Fn(KeyEvent) -> Option<C>,
    {
        if let Some(action) = custom(key) {
            return Some(ViewAction::Custom(action));
        }

        self.resolve(key)
    }

    const fn resolve_default_nav<C>(key: KeyEvent) -> Option<ViewAction<C>> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(ViewAction::SelectPrev),
            KeyCode::Down | KeyCode::Char('j') => Some(ViewAction::SelectNext),
            KeyCode::Left | KeyCode::Char('h') => Some(ViewAction::SelectParent),
            KeyCode::Right | KeyCode::Char('l') => Some(ViewAction::SelectChild),
            _ => None,
        }
    }

    const fn resolve_vim_nav<C>(key: KeyEvent) -> Option<ViewAction<C>> {
        match key.code {
            KeyCode::Char('k') => Some(ViewAction::SelectPrev),
            KeyCode::Char('j') => Some(ViewAction::SelectNext),
            KeyCode::Char('h') => Some(ViewAction::SelectParent),
            KeyCode::Char('l') => Some(ViewAction::SelectChild),
            _ => None,
        }
    }

    const fn resolve_arrow_nav<C>(key: KeyEvent) -> Option<ViewAction<C>> {
        match key.code {
            KeyCode::Up => Some(ViewAction::SelectPrev),
            KeyCode::Down => Some(ViewAction::SelectNext),
            KeyCode::Left => Some(ViewAction::SelectParent),
            KeyCode::Right => Some(ViewAction::SelectChild),
            _ => None,
        }
    }

    const fn resolve_common<C>(key: KeyEvent) -> Option<ViewAction<C>> {
        match key.code {
            KeyCode::Char(' ') => Some(ViewAction::ToggleRecursive),
            KeyCode::Enter => Some(ViewAction::ToggleNode),
            KeyCode::Char('c') => Some(ViewAction::ActivateSelected),
            KeyCode::Delete | KeyCode::Char('x') => Some(ViewAction::CloseCurrentModel),
            KeyCode::Char('X') => Some(ViewAction::CloseAllModels),
            KeyCode::Char('m') | KeyCode::Menu => Some(ViewAction::OpenContextMenu),
            KeyCode::Char('g') => Some(ViewAction::ToggleGuides),
            KeyCode::Char('E') => Some(ViewAction::ExpandAll),
            KeyCode::Char('C') => Some(ViewAction::CollapseAll),
            KeyCode::Home => Some(ViewAction::SelectFirst),
            KeyCode::End => Some(ViewAction::SelectLast),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn profiles_differ_on_letter_navigation() {
        let arrows = NavigatorKeyBindings::with_profile(KeymapProfile::Arrows);
        let vim = NavigatorKeyBindings::with_profile(KeymapProfile::Vim);

        assert_eq!(arrows.resolve::<()>(key(KeyCode::Char('j'))), None);
        assert_eq!(vim.resolve::<()>(key(KeyCode::Char('j'))), Some(ViewAction::SelectNext));
        assert_eq!(vim.resolve::<()>(key(KeyCode::Down)), None);
    }

    #[test]
    fn close_keys_map_to_navigator_actions() {
        let bindings = NavigatorKeyBindings::new();

        assert_eq!(bindings.resolve::<()>(key(KeyCode::Char('x'))), Some(ViewAction::CloseCurrentModel));
        assert_eq!(
            bindings.resolve::<()>(KeyEvent::new(KeyCode::Delete, KeyModifiers::SHIFT)),
            Some(ViewAction::CloseAllModels)
        );
    }

    #[test]
    fn custom_mapping_takes_precedence() {
        let bindings = NavigatorKeyBindings::new();
        let action = bindings.resolve_with(key(KeyCode::Char('x')), |event| {
            (event.code == KeyCode::Char('x')).then_some("export")
        });

        assert_eq!(action, Some(ViewAction::Custom("export")));
    }
}
