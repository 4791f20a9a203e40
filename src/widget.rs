use ratatui::layout::{Constraint, Rect};
use ratatui::prelude::Buffer;
use ratatui::widgets::{
    Block, Borders, Row, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Table,
    TableState,
};

use crate::context::NavigatorRowContext;
use crate::glyphs::{TreeGlyphs, navigator_label_line};
use crate::index::{ItemData, ItemRole};
use crate::model::ItemModel;
use crate::state::{NavigatorViewState, VisibleRow};
use crate::style::NavigatorStyle;

/// Виджет навигатора моделей (table + stateful).
///
/// Renders the single column of any [`ItemModel`] as an indented tree. The
/// row reported by [`ItemModel::is_current`] gets
/// [`NavigatorStyle::current_style`].
pub struct NavigatorView<'a, T: ItemModel> {
    model: &'a T,
    style: NavigatorStyle<'a>,
    glyphs: TreeGlyphs<'a>,
}

impl<'a, T: ItemModel> NavigatorView<'a, T> {
    pub const fn new(model: &'a T, style: NavigatorStyle<'a>) -> Self {
        Self {
            model,
            style,
            glyphs: TreeGlyphs::unicode(),
        }
    }

    #[must_use]
    pub const fn glyphs(mut self, glyphs: TreeGlyphs<'a>) -> Self {
        self.glyphs = glyphs;
        self
    }

    fn build_rows(&self, rows: &[VisibleRow], state: &NavigatorViewState) -> Vec<Row<'a>> {
        let model: &'a T = self.model;
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let text = match model.data(&row.index, ItemRole::Display) {
                ItemData::Text(text) => text,
                _ => "".into(),
            };
            let ctx = NavigatorRowContext {
                level: row.level,
                is_tail_stack: row.is_tail_stack.as_slice(),
                is_expanded: row.index.id().is_some_and(|id| state.is_expanded(id)),
                has_children: row.has_children,
                is_current: model.is_current(&row.index),
                draw_lines: state.draw_lines(),
                line_style: self.style.line_style,
            };
            let mut table_row = Row::new([navigator_label_line(&ctx, text, &self.glyphs)]);
            if ctx.is_current {
                table_row = table_row.style(self.style.current_style);
            }
            out.push(table_row);
        }
        out
    }

    fn render_scrollbar(
        area: Rect,
        buf: &mut Buffer,
        state: &NavigatorViewState,
        inner_height: usize,
        scroll_rows: usize,
    ) {
        let scroll_len = scroll_rows.saturating_add(1);
        let position = state
            .list_state()
            .offset()
            .min(scroll_len.saturating_sub(1));
        let mut scrollbar_state = ScrollbarState::new(scroll_len)
            .position(position)
            .viewport_content_length(inner_height);
        Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .render(area, buf, &mut scrollbar_state);
    }
}

impl<T: ItemModel> StatefulWidget for NavigatorView<'_, T> {
    type State = NavigatorViewState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        state.ensure_visible_rows(self.model);

        let mut block = Block::default().borders(self.style.borders);
        if let Some(title) = self.style.title.clone() {
            block = block.title(title);
        }
        block = block
            .style(self.style.block_style)
            .border_style(self.style.border_style);

        let inner_height = block.inner(area).height as usize;
        state.ensure_selection_visible_with_policy(inner_height, self.style.scroll_policy);

        let total_rows = state.visible_len();
        let (range_start, range_end) = if self.style.virtualize_rows {
            let start = state.list_state().offset().min(total_rows);
            (start, (start + inner_height).min(total_rows))
        } else {
            (0, total_rows)
        };
        let rows = self.build_rows(&state.visible_rows()[range_start..range_end], state);
        let scroll_rows = total_rows.saturating_sub(inner_height);

        let mut local_state = if self.style.virtualize_rows {
            Some(*state.list_state())
        } else {
            None
        };
        let table_state: &mut TableState = local_state.as_mut().map_or_else(
            || state.list_state_mut(),
            |local| {
                *local.offset_mut() = 0;
                if let Some(selected) = local.selected() {
                    if selected < range_start || selected >= range_end {
                        local.select(None);
                    } else {
                        local.select(Some(selected - range_start));
                    }
                }
                local
            },
        );

        let (table_area, table_block, scrollbar_area) = if scroll_rows > 0 {
            let table_area = Rect {
                width: area.width.saturating_sub(1),
                ..area
            };
            let scrollbar_area = Rect {
                x: area.x + area.width.saturating_sub(1),
                y: area.y,
                width: 1,
                height: area.height,
            };
            let mut borders = self.style.borders;
            borders.remove(Borders::RIGHT);
            (table_area, block.borders(borders), Some(scrollbar_area))
        } else {
            (area, block, None)
        };

        let table = Table::new(rows, [Constraint::Fill(1)])
            .style(self.style.block_style)
            .block(table_block)
            .row_highlight_style(self.style.highlight_style)
            .highlight_symbol(self.style.highlight_symbol);
        table.render(table_area, buf, table_state);

        if let Some(scrollbar_area) = scrollbar_area {
            Self::render_scrollbar(scrollbar_area, buf, state, inner_height, scroll_rows);
        }
    }
}
