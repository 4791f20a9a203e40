use ratatui::style::Style;

/// Per-row rendering context handed to the label builder.
#[derive(Clone, Copy)]
pub struct NavigatorRowContext<'a> {
    pub level: u16,
    pub is_tail_stack: &'a [bool],
    pub is_expanded: bool,
    pub has_children: bool,
    pub is_current: bool,
    pub draw_lines: bool,
    pub line_style: Style,
}
