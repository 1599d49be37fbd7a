//! Domain models shared by the backend client and the sync controller

mod request;
mod sync_state;

pub use request::{ErrorBody, GeoLocation, LocationRequest, SearchRequest, SearchResponse};
pub use sync_state::SyncState;
