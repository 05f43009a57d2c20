// Cache module for the on-disk HTTP response cache.
// Stores index API responses keyed by URL so repeated runs skip unchanged projects.

pub mod paths;
pub mod store;

pub use paths::{http_cache_dir, response_path};
pub use store::{CachedResponse, STORED_HEADERS, clear, delete, read_cached, write_cached};
