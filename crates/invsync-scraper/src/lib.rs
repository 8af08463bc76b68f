pub mod error;
pub mod fetch;
pub(crate) mod retry;
pub mod signals;

pub use error::FetchError;
pub use fetch::{FetchResult, HttpFetcher, PageFetcher};
pub use signals::extract_signals;
