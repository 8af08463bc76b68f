pub mod app_config;
pub mod config;
pub mod listing;
pub mod policy;
pub mod source;
pub mod status;
pub mod update;

pub use app_config::{
    AppConfig, EbayCredentials, FetchMode, LedgerSource, SheetsLedger, TelegramConfig,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use listing::{is_blank, normalize_field, parse_quantity, ListingRecord};
pub use policy::{decide, suppressed_by_recorded_quantity, ReasonCode, ReconciliationDecision, Trigger};
pub use source::SourceFamily;
pub use status::{
    resolve, AvailabilityStatus, PrimitiveSignalSet, StockCount, StructuredAvailability,
};
pub use update::{UpdatePath, UpdateResult};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("configuration error: {0}")]
    Validation(String),
}
