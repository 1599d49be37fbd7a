//! JSON tree renderer
//!
//! Turns an arbitrary JSON text into a flat list of indented rows. Which
//! branches are open is decided by an `ExpansionState` keyed on structural
//! paths, so the view can be re-rendered from new data without losing the
//! user's expand/collapse choices.

mod expansion;
mod path;
mod render;

pub use expansion::ExpansionState;
pub use path::{JsonPath, PathSegment};
pub use render::{
    COLLAPSED_INDICATOR, Container, DEPTH_LIMIT_LABEL, EXPANDED_INDICATOR, RenderOptions, RowKind,
    ScalarStyle, TreeRow, TreeView, render, render_value,
};
