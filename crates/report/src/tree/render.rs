//! Flatten a JSON document into displayable tree rows

use serde_json::Value;

use super::expansion::ExpansionState;
use super::path::{JsonPath, PathSegment};

/// Indicator shown on an expanded branch
pub const EXPANDED_INDICATOR: &str = "▼";
/// Indicator shown on a collapsed branch
pub const COLLAPSED_INDICATOR: &str = "▶";
/// Key shown on the placeholder that replaces rows past the depth bound
pub const DEPTH_LIMIT_LABEL: &str = "…";

/// Rendering limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Rows at this depth or deeper are replaced by one placeholder row.
    /// Top-level entries (depth 0) are always shown.
    pub max_depth: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { max_depth: 64 }
    }
}

impl RenderOptions {
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

/// Visual treatment of a scalar value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarStyle {
    Null,
    String,
    /// Numbers and booleans
    Literal,
}

/// Kind of composite value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Object,
    Array,
}

impl Container {
    /// Short type hint shown after the key
    pub fn type_hint(&self) -> &'static str {
        match self {
            Container::Object => "{}",
            Container::Array => "[]",
        }
    }
}

/// What a row displays
#[derive(Debug, Clone, PartialEq)]
pub enum RowKind {
    /// `key: value`, with `text` the JSON literal of the value
    Scalar { text: String, style: ScalarStyle },
    /// Clickable header of an object or array
    Branch {
        container: Container,
        expanded: bool,
        len: usize,
    },
    /// Stand-in for children deeper than `RenderOptions::max_depth`
    DepthLimit,
}

/// One visible line of the tree
#[derive(Debug, Clone, PartialEq)]
pub struct TreeRow {
    /// Member name or array index as text
    pub key: String,
    /// Identity used for expansion state
    pub path: JsonPath,
    /// Nesting level; top-level entries are 0
    pub depth: usize,
    pub kind: RowKind,
}

impl TreeRow {
    /// Plain-text rendering of the row without indentation
    pub fn label(&self) -> String {
        match &self.kind {
            RowKind::Scalar { text, .. } => format!("{}: {}", self.key, text),
            RowKind::Branch {
                container,
                expanded,
                ..
            } => format!(
                "{} {}: {}",
                if *expanded {
                    EXPANDED_INDICATOR
                } else {
                    COLLAPSED_INDICATOR
                },
                self.key,
                container.type_hint()
            ),
            RowKind::DepthLimit => format!("{} depth limit reached", DEPTH_LIMIT_LABEL),
        }
    }

    pub fn is_branch(&self) -> bool {
        matches!(self.kind, RowKind::Branch { .. })
    }
}

/// Result of rendering a JSON text
#[derive(Debug, Clone, PartialEq)]
pub enum TreeView {
    Tree { rows: Vec<TreeRow> },
    /// The input was not valid JSON; `raw` is the input unchanged
    ParseError { message: String, raw: String },
}

impl TreeView {
    /// Visible rows, empty for a parse error
    pub fn rows(&self) -> &[TreeRow] {
        match self {
            TreeView::Tree { rows } => rows,
            TreeView::ParseError { .. } => &[],
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, TreeView::ParseError { .. })
    }

    /// Find the visible row for `path`
    pub fn row(&self, path: &JsonPath) -> Option<&TreeRow> {
        self.rows().iter().find(|row| &row.path == path)
    }
}

/// Parse `json_text` and render it
///
/// Never fails: invalid input produces `TreeView::ParseError`.
pub fn render(json_text: &str, expansion: &ExpansionState, options: &RenderOptions) -> TreeView {
    match serde_json::from_str::<Value>(json_text) {
        Ok(document) => render_value(&document, expansion, options),
        Err(e) => TreeView::ParseError {
            message: e.to_string(),
            raw: json_text.to_string(),
        },
    }
}

/// Work item for the traversal
enum Pending<'a> {
    Node {
        key: String,
        path: JsonPath,
        depth: usize,
        value: &'a Value,
    },
    Limit {
        path: JsonPath,
        depth: usize,
    },
}

/// Render an already-parsed document
///
/// Top-level entries of an object or array become depth-0 rows. A scalar
/// document renders as a single row with an empty key. The walk keeps its
/// own stack, so document depth never grows the call stack.
pub fn render_value(
    document: &Value,
    expansion: &ExpansionState,
    options: &RenderOptions,
) -> TreeView {
    let mut rows = Vec::new();
    let mut stack: Vec<Pending<'_>> = Vec::new();

    if is_container(document) {
        push_children(&mut stack, &JsonPath::root(), document, 0);
    } else {
        rows.push(scalar_row(String::new(), JsonPath::root(), 0, document));
    }

    while let Some(item) = stack.pop() {
        match item {
            Pending::Node {
                key,
                path,
                depth,
                value,
            } => {
                let (container, len) = match value {
                    Value::Object(map) => (Container::Object, map.len()),
                    Value::Array(items) => (Container::Array, items.len()),
                    scalar => {
                        rows.push(scalar_row(key, path, depth, scalar));
                        continue;
                    }
                };
                let expanded = expansion.is_expanded(&path);

                if expanded {
                    let child_depth = depth + 1;
                    if child_depth >= options.max_depth {
                        stack.push(Pending::Limit {
                            path: path.clone(),
                            depth: child_depth,
                        });
                    } else {
                        push_children(&mut stack, &path, value, child_depth);
                    }
                }

                rows.push(TreeRow {
                    key,
                    path,
                    depth,
                    kind: RowKind::Branch {
                        container,
                        expanded,
                        len,
                    },
                });
            }
            Pending::Limit { path, depth } => rows.push(TreeRow {
                key: DEPTH_LIMIT_LABEL.to_string(),
                path,
                depth,
                kind: RowKind::DepthLimit,
            }),
        }
    }

    TreeView::Tree { rows }
}

fn is_container(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

/// Push the children of `value` so the first child is popped first
fn push_children<'a>(
    stack: &mut Vec<Pending<'a>>,
    parent: &JsonPath,
    value: &'a Value,
    depth: usize,
) {
    match value {
        Value::Object(map) => {
            for (key, child) in map.iter().rev() {
                stack.push(Pending::Node {
                    key: key.clone(),
                    path: parent.child(PathSegment::Key(key.clone())),
                    depth,
                    value: child,
                });
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate().rev() {
                stack.push(Pending::Node {
                    key: index.to_string(),
                    path: parent.child(PathSegment::Index(index)),
                    depth,
                    value: child,
                });
            }
        }
        _ => {}
    }
}

fn scalar_row(key: String, path: JsonPath, depth: usize, value: &Value) -> TreeRow {
    let style = match value {
        Value::Null => ScalarStyle::Null,
        Value::String(_) => ScalarStyle::String,
        _ => ScalarStyle::Literal,
    };
    TreeRow {
        key,
        path,
        depth,
        kind: RowKind::Scalar {
            text: value.to_string(),
            style,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn labels(view: &TreeView) -> Vec<String> {
        view.rows()
            .iter()
            .map(|row| format!("{}{}", "  ".repeat(row.depth), row.label()))
            .collect()
    }

    #[test]
    fn test_collapsed_then_expanded() {
        let mut expansion = ExpansionState::new();
        let options = RenderOptions::default();

        let view = render(r#"{"a":{"b":1}}"#, &expansion, &options);
        assert_eq!(labels(&view), vec!["▶ a: {}"]);

        expansion.toggle(&JsonPath::from_keys(["a"]));
        let view = render(r#"{"a":{"b":1}}"#, &expansion, &options);
        assert_eq!(labels(&view), vec!["▼ a: {}", "  b: 1"]);
        assert_eq!(view.rows()[1].path.to_string(), "a.b");
    }

    #[test]
    fn test_malformed_input_yields_error_view() {
        let view = render("{bad json", &ExpansionState::new(), &RenderOptions::default());
        match view {
            TreeView::ParseError { message, raw } => {
                assert!(!message.is_empty());
                assert_eq!(raw, "{bad json");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_scalar_styles() {
        let view = render(
            r#"{"n": null, "s": "text", "i": 42, "f": 1.5, "b": false}"#,
            &ExpansionState::new(),
            &RenderOptions::default(),
        );
        let rows = view.rows();
        let style_of = |key: &str| match &rows.iter().find(|r| r.key == key).unwrap().kind {
            RowKind::Scalar { style, .. } => *style,
            other => panic!("expected scalar, got {:?}", other),
        };

        assert_eq!(style_of("n"), ScalarStyle::Null);
        assert_eq!(style_of("s"), ScalarStyle::String);
        assert_eq!(style_of("i"), ScalarStyle::Literal);
        assert_eq!(style_of("b"), ScalarStyle::Literal);
        assert_eq!(
            labels(&view),
            vec!["n: null", "s: \"text\"", "i: 42", "f: 1.5", "b: false"]
        );
    }

    #[test]
    fn test_document_order_preserved() {
        let view = render(
            r#"{"zeta": 1, "alpha": 2, "mid": 3}"#,
            &ExpansionState::new(),
            &RenderOptions::default(),
        );
        let keys: Vec<&str> = view.rows().iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_array_root_and_type_hints() {
        let mut expansion = ExpansionState::new();
        expansion.toggle(&JsonPath::root().index(0));

        let view = render(
            r#"[{"name": "x", "tags": []}, "second"]"#,
            &expansion,
            &RenderOptions::default(),
        );
        assert_eq!(
            labels(&view),
            vec!["▼ 0: {}", "  name: \"x\"", "  ▶ tags: []", "1: \"second\""]
        );
    }

    #[test]
    fn test_scalar_root() {
        let view = render("\"just text\"", &ExpansionState::new(), &RenderOptions::default());
        assert_eq!(view.rows().len(), 1);
        assert!(view.rows()[0].path.is_root());
        assert_eq!(view.rows()[0].label(), ": \"just text\"");
    }

    #[test]
    fn test_shared_child_keys_expand_independently() {
        let json = r#"{"p1": {"x": {"v": 1}}, "p2": {"x": {"v": 2}}}"#;
        let mut expansion = ExpansionState::new();
        expansion.toggle(&JsonPath::from_keys(["p1"]));
        expansion.toggle(&JsonPath::from_keys(["p2"]));
        expansion.toggle(&JsonPath::from_keys(["p1", "x"]));

        let view = render(json, &expansion, &RenderOptions::default());
        assert_eq!(
            labels(&view),
            vec![
                "▼ p1: {}",
                "  ▼ x: {}",
                "    v: 1",
                "▼ p2: {}",
                "  ▶ x: {}",
            ]
        );
    }

    #[test]
    fn test_depth_limit_placeholder() {
        let mut expansion = ExpansionState::new();
        let document = json!({"a": {"b": {"c": {"d": 1}}}});
        expansion.expand_to_depth(&document, 10);

        let view = render_value(&document, &expansion, &RenderOptions::with_max_depth(2));
        assert_eq!(
            labels(&view),
            vec!["▼ a: {}", "  ▼ b: {}", "    … depth limit reached"]
        );
        assert_eq!(view.rows()[2].kind, RowKind::DepthLimit);
    }

    #[test]
    fn test_deep_document_does_not_overflow() {
        // Nested deeper than serde_json will parse, so build it directly
        let mut document = json!(1);
        for _ in 0..2_000 {
            document = json!({ "k": document });
        }
        let mut expansion = ExpansionState::new();
        expansion.expand_to_depth(&document, usize::MAX);

        let view = render_value(&document, &expansion, &RenderOptions::with_max_depth(4_000));
        assert_eq!(view.rows().len(), 2_001);
        assert_eq!(view.rows()[2_000].label(), "k: 1");
    }
}
