//! Views for the dashboard

mod json_tree;
mod location;

pub use json_tree::JsonTreeView;
pub use location::LocationView;
