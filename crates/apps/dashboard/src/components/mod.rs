//! Reusable UI components for the dashboard

mod banner;
mod tree_row;

pub use banner::Banner;
pub use tree_row::TreeRowItem;
