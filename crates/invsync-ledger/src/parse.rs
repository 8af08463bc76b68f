//! Ledger CSV → [`ListingRecord`]s.

use csv::{ReaderBuilder, StringRecord};
use invsync_core::{normalize_field, parse_quantity, ListingRecord};

use crate::error::LedgerError;

const SOURCE_URL: &str = "source_url";

/// Column positions, resolved once from the header row.
struct Columns {
    source_url: usize,
    item_id: Option<usize>,
    sku: Option<usize>,
    trigger: Option<usize>,
    quantity: Option<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self, LedgerError> {
        let find = |names: &[&str]| {
            headers.iter().position(|h| {
                let h = h.trim();
                names.iter().any(|name| h.eq_ignore_ascii_case(name))
            })
        };

        Ok(Self {
            source_url: find(&[SOURCE_URL])
                .ok_or_else(|| LedgerError::MissingColumn(SOURCE_URL.to_owned()))?,
            item_id: find(&["ebay_item_id", "item_id"]),
            sku: find(&["sku"]),
            trigger: find(&["trigger"]),
            quantity: find(&["quantity", "qty"]),
        })
    }
}

/// Parses a ledger export. Headers are matched case-insensitively after
/// trimming; only `source_url` is required.
///
/// Rows with a blank `source_url` are dropped. Blank sentinels (`nan`,
/// `none`, ...) in any cell read as absent. An unparseable `quantity` is
/// logged and treated as absent.
///
/// # Errors
///
/// - [`LedgerError::MissingColumn`] if there is no `source_url` header.
/// - [`LedgerError::Csv`] if the text is not valid CSV.
pub fn parse_ledger_csv(text: &str) -> Result<Vec<ListingRecord>, LedgerError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let rows = reader.records().collect::<Result<Vec<_>, _>>()?;
    ledger_from_rows(&headers, rows)
}

/// Shared by the CSV and spreadsheet-API readers: `headers` is the first
/// row, `rows` the data rows in ledger order.
pub(crate) fn ledger_from_rows(
    headers: &StringRecord,
    rows: impl IntoIterator<Item = StringRecord>,
) -> Result<Vec<ListingRecord>, LedgerError> {
    let columns = Columns::locate(headers)?;
    let mut records = Vec::new();

    for (index, row) in rows.into_iter().enumerate() {
        // Header is line 1.
        let line = index + 2;
        let cell = |column: Option<usize>| column.and_then(|i| row.get(i));

        let Some(source_url) = normalize_field(row.get(columns.source_url)) else {
            tracing::debug!(line, "ledger row without source_url skipped");
            continue;
        };

        let recorded_quantity = match parse_quantity(cell(columns.quantity)) {
            Ok(quantity) => quantity,
            Err(raw) => {
                tracing::warn!(line, value = %raw, "unparseable quantity, treating as absent");
                None
            }
        };

        records.push(ListingRecord {
            source_url,
            marketplace_item_id: normalize_field(cell(columns.item_id)),
            sku: normalize_field(cell(columns.sku)),
            trigger: normalize_field(cell(columns.trigger)),
            recorded_quantity,
        });
    }

    Ok(records)
}
