//! JSON tree view - collapsible rendering of the latest results document

use gpui::prelude::*;
use gpui::*;
use gpui_component::button::{Button, ButtonVariants};
use gpui_component::{ActiveTheme, Sizable};
use log::debug;
use report::{ExpansionState, JsonPath, RenderOptions, TreeView, render};
use serde_json::Value;

use crate::components::{Banner, TreeRowItem};

/// Renders a JSON text as an indented tree
///
/// Expansion state is keyed on structural paths and survives `set_json`, so
/// new poll results keep whatever the user had open.
pub struct JsonTreeView {
    json: Option<String>,
    expansion: ExpansionState,
    options: RenderOptions,
}

impl JsonTreeView {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            json: None,
            expansion: ExpansionState::new(),
            options,
        }
    }

    /// Replace the document being shown
    pub fn set_json(&mut self, json: Option<String>, cx: &mut Context<Self>) {
        if self.json != json {
            self.json = json;
            cx.notify();
        }
    }

    pub fn toggle(&mut self, path: JsonPath, cx: &mut Context<Self>) {
        let expanded = self.expansion.toggle(&path);
        debug!(
            "{} node {}",
            if expanded { "Expanded" } else { "Collapsed" },
            path
        );
        cx.notify();
    }

    fn expand_all(&mut self, cx: &mut Context<Self>) {
        let Some(json) = &self.json else {
            return;
        };
        match serde_json::from_str::<Value>(json) {
            Ok(document) => {
                self.expansion
                    .expand_to_depth(&document, self.options.max_depth);
                cx.notify();
            }
            Err(e) => debug!("Nothing to expand: {}", e),
        }
    }

    fn collapse_all(&mut self, cx: &mut Context<Self>) {
        self.expansion.clear();
        cx.notify();
    }

    fn render_rows(&self, json: &str, cx: &mut Context<Self>) -> AnyElement {
        match render(json, &self.expansion, &self.options) {
            TreeView::Tree { rows } => div()
                .flex()
                .flex_col()
                .children(rows.into_iter().enumerate().map(|(ix, row)| {
                    if row.is_branch() {
                        let path = row.path.clone();
                        div()
                            .id(ElementId::Name(format!("json-node-{}", ix).into()))
                            .on_click(cx.listener(move |view, _event, _window, cx| {
                                view.toggle(path.clone(), cx);
                            }))
                            .child(TreeRowItem::new(row))
                            .into_any_element()
                    } else {
                        TreeRowItem::new(row).into_any_element()
                    }
                }))
                .into_any_element(),
            TreeView::ParseError { message, raw } => div()
                .flex()
                .flex_col()
                .gap_2()
                .child(Banner::error(format!("Error parsing JSON: {}", message)))
                .child(
                    div()
                        .text_xs()
                        .text_color(rgb(0x888899))
                        .child("Raw input:"),
                )
                .child(
                    div()
                        .flex()
                        .flex_col()
                        .text_xs()
                        .children(raw.lines().map(|line| line.to_string()).collect::<Vec<_>>()),
                )
                .into_any_element(),
        }
    }
}

impl Render for JsonTreeView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let border = theme.border;
        let fg = theme.foreground;
        let muted_fg = theme.muted_foreground;
        let has_document = self.json.is_some();

        let body = match self.json.clone() {
            Some(json) => self.render_rows(&json, cx),
            None => div()
                .text_sm()
                .text_color(muted_fg)
                .child("No processed data yet")
                .into_any_element(),
        };

        div()
            .flex()
            .flex_col()
            .gap_2()
            .p_4()
            .rounded_lg()
            .border_1()
            .border_color(border)
            .child(
                div()
                    .flex()
                    .items_center()
                    .justify_between()
                    .child(
                        div()
                            .text_sm()
                            .font_weight(FontWeight::SEMIBOLD)
                            .text_color(fg)
                            .child("Processed Data"),
                    )
                    .when(has_document, |el| {
                        el.child(
                            div()
                                .flex()
                                .gap_1()
                                .child(
                                    Button::new("expand-all")
                                        .label("Expand all")
                                        .small()
                                        .ghost()
                                        .on_click(cx.listener(|view, _event, _window, cx| {
                                            view.expand_all(cx);
                                        })),
                                )
                                .child(
                                    Button::new("collapse-all")
                                        .label("Collapse all")
                                        .small()
                                        .ghost()
                                        .on_click(cx.listener(|view, _event, _window, cx| {
                                            view.collapse_all(cx);
                                        })),
                                ),
                        )
                    }),
            )
            .child(body)
    }
}
