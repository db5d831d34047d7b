//! Collection data model.
//!
//! Records returned by the collection API plus the two values that never
//! come from the network: the user's search filters and the static table of
//! European capitals shown on the map.

pub mod artwork;
pub mod capital;
pub mod filters;

pub use artwork::{ArtworkDetail, Department, DepartmentsResponse, SearchResponse, Tag};
pub use capital::{GeoCapital, EUROPEAN_CAPITALS};
pub use filters::SearchFilters;
