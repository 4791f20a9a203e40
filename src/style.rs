use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Borders;

/// Политика скролла при изменении выбранной строки.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollPolicy {
    KeepInView,
    CenterOnSelect,
}

/// Визуальные настройки навигатора.
#[derive(Clone)]
pub struct NavigatorStyle<'a> {
    pub title: Option<Line<'a>>,
    pub block_style: Style,
    pub border_style: Style,
    pub highlight_style: Style,
    /// Applied to the row of the active model.
    pub current_style: Style,
    pub line_style: Style,
    pub highlight_symbol: &'a str,
    pub borders: Borders,
    pub virtualize_rows: bool,
    pub scroll_policy: ScrollPolicy,
}

impl Default for NavigatorStyle<'_> {
    fn default() -> Self {
        Self {
            title: Some(Line::from("Navigator")),
            block_style: Style::default(),
            border_style: Style::default(),
            highlight_style: Style::default().add_modifier(Modifier::REVERSED),
            current_style: Style::default().add_modifier(Modifier::BOLD),
            line_style: Style::default(),
            highlight_symbol: ">> ",
            borders: Borders::ALL,
            virtualize_rows: false,
            scroll_policy: ScrollPolicy::KeepInView,
        }
    }
}
