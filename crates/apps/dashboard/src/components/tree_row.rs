//! Tree row component - displays a single line of the JSON tree

use gpui::prelude::*;
use gpui::*;
use gpui_component::ActiveTheme;
use report::tree::{COLLAPSED_INDICATOR, EXPANDED_INDICATOR};
use report::{RowKind, ScalarStyle, TreeRow};

/// Horizontal indent per nesting level
const INDENT_PX: f32 = 20.0;

#[derive(IntoElement)]
pub struct TreeRowItem {
    row: TreeRow,
}

impl TreeRowItem {
    pub fn new(row: TreeRow) -> Self {
        Self { row }
    }
}

fn scalar_color(style: ScalarStyle) -> Rgba {
    match style {
        ScalarStyle::Null => rgb(0x8085e9),
        ScalarStyle::String => rgb(0x8fbf4a),
        ScalarStyle::Literal => rgb(0xd46a9a),
    }
}

impl RenderOnce for TreeRowItem {
    fn render(self, _window: &mut Window, cx: &mut App) -> impl IntoElement {
        let theme = cx.theme();
        let label = self.row.label();
        let TreeRow {
            key, depth, kind, ..
        } = self.row;

        let row = div()
            .flex()
            .items_center()
            .gap_1()
            .py_px()
            .pl(px(depth as f32 * INDENT_PX))
            .text_sm();

        match kind {
            RowKind::Scalar { text, style } => row
                .child(
                    div()
                        .text_color(theme.foreground)
                        .child(format!("{}:", key)),
                )
                .child(div().text_color(scalar_color(style)).child(text)),
            RowKind::Branch {
                container,
                expanded,
                len,
            } => row
                .cursor_pointer()
                .rounded(px(4.))
                .hover(|style| style.bg(theme.list_hover))
                .child(
                    div()
                        .w(px(12.))
                        .text_xs()
                        .text_color(theme.muted_foreground)
                        .child(if expanded {
                            EXPANDED_INDICATOR
                        } else {
                            COLLAPSED_INDICATOR
                        }),
                )
                .child(
                    div()
                        .font_weight(FontWeight::MEDIUM)
                        .text_color(theme.foreground)
                        .child(format!("{}:", key)),
                )
                .child(
                    div()
                        .text_color(theme.muted_foreground)
                        .child(container.type_hint()),
                )
                .when(!expanded, |el| {
                    el.child(
                        div()
                            .text_xs()
                            .text_color(theme.muted_foreground)
                            .child(match len {
                                1 => "1 item".to_string(),
                                n => format!("{} items", n),
                            }),
                    )
                }),
            RowKind::DepthLimit => row
                .italic()
                .text_color(theme.muted_foreground)
                .child(label),
        }
    }
}
