use std::borrow::Cow;

use ratatui::text::{Line, Span};

use crate::context::NavigatorRowContext;

#[derive(Clone, Copy)]
pub struct TreeGlyphs<'a> {
    pub indent: &'a str,
    pub branch_last: &'a str,
    pub branch: &'a str,
    pub vert: &'a str,
    pub leaf: &'a str,
    pub expanded: &'a str,
    pub collapsed: &'a str,
}

impl TreeGlyphs<'static> {
    pub const fn unicode() -> Self {
        Self {
            indent: "   ",
            branch_last: "└──",
            branch: "├──",
            vert: "│  ",
            leaf: "•",
            expanded: "▼",
            collapsed: "▶",
        }
    }

    pub const fn ascii() -> Self {
        Self {
            indent: "   ",
            branch_last: "`--",
            branch: "|--",
            vert: "|  ",
            leaf: "*",
            expanded: "v",
            collapsed: ">",
        }
    }
}

impl<'a> TreeGlyphs<'a> {
    const fn expander(&self, ctx: &NavigatorRowContext<'_>) -> &'a str {
        if !ctx.has_children {
            self.leaf
        } else if ctx.is_expanded {
            self.expanded
        } else {
            self.collapsed
        }
    }
}

/// Builds the label line of one row: guides, expander and display text.
///
/// Top-level rows (the open models) have no guides; deeper rows get one
/// guide segment per ancestor level when `draw_lines` is on, plain indent
/// otherwise.
pub fn navigator_label_line<'a>(
    ctx: &NavigatorRowContext<'_>,
    text: Cow<'a, str>,
    glyphs: &TreeGlyphs<'a>,
) -> Line<'a> {
    let mut spans: Vec<Span<'a>> = Vec::with_capacity(ctx.is_tail_stack.len() + 4);

    if ctx.level > 0 {
        if ctx.draw_lines {
            let last_level = ctx.is_tail_stack.len().saturating_sub(1);
            for (level, is_last) in ctx.is_tail_stack.iter().copied().enumerate() {
                let part = if level == last_level {
                    if is_last { glyphs.branch_last } else { glyphs.branch }
                } else if is_last {
                    glyphs.indent
                } else {
                    glyphs.vert
                };
                spans.push(Span::styled(part, ctx.line_style));
            }
        } else {
            for _ in 0..ctx.level {
                spans.push(Span::raw(glyphs.indent));
            }
        }
    }

    spans.push(Span::raw(glyphs.expander(ctx)));
    spans.push(Span::raw(" "));
    spans.push(Span::raw(text));
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use ratatui::style::Style;

    use super::*;

    fn ctx(level: u16, tails: &[bool], has_children: bool, draw_lines: bool) -> NavigatorRowContext<'_> {
        NavigatorRowContext {
            level,
            is_tail_stack: tails,
            is_expanded: false,
            has_children,
            is_current: false,
            draw_lines,
            line_style: Style::default(),
        }
    }

    fn plain(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn top_level_row_has_only_expander() {
        let line = navigator_label_line(
            &ctx(0, &[], true, true),
            Cow::Borrowed("gait2392  [Current]"),
            &TreeGlyphs::ascii(),
        );
        assert_eq!(plain(&line), "> gait2392  [Current]");
    }

    #[test]
    fn nested_row_draws_guides_per_level() {
        let line = navigator_label_line(
            &ctx(2, &[false, true], false, true),
            Cow::Borrowed("pelvis"),
            &TreeGlyphs::ascii(),
        );
        assert_eq!(plain(&line), "|  `--* pelvis");
    }

    #[test]
    fn guides_off_falls_back_to_indent() {
        let line = navigator_label_line(
            &ctx(1, &[true], false, false),
            Cow::Borrowed("hip_r"),
            &TreeGlyphs::ascii(),
        );
        assert_eq!(plain(&line), "   * hip_r");
    }
}
