pub mod endpoints;
pub mod fetcher;
pub mod transport;

pub use endpoints::{Endpoints, LookupKind};
pub use fetcher::{fetch_first_ok, fetch_lookup, status_error};
pub use transport::{Backend, HttpBackend, Method, RawResponse};
