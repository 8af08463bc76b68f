pub mod error;
pub mod load;
pub mod parse;
pub mod sheets;

pub use error::LedgerError;
pub use load::load_ledger;
pub use parse::parse_ledger_csv;
pub use sheets::SheetsClient;
