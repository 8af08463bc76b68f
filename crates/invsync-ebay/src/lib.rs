pub mod client;
pub mod error;
pub mod response;
pub mod updater;
pub mod writer;

pub use client::EbayClient;
pub use error::EbayError;
pub use response::{Ack, ApiErrorEntry, ReviseResponse};
pub use updater::reconcile_zero;
pub use writer::{DryRunWriter, IdentifierKind, InventoryWriter};
