//! Reconciliation policy: whether a resolved status, under the operator's
//! trigger, warrants zeroing the linked eBay quantity.

use serde::{Deserialize, Serialize};

use crate::listing::is_blank;
use crate::status::AvailabilityStatus;

/// Operator policy directive from the ledger's `trigger` column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Zero on `OUT_OF_STOCK` / `SOLD`. The default for a blank cell.
    SoldOut,
    /// Zero on `OUT_OF_STOCK` / `SOLD` / `LOW_STOCK`.
    LowStock,
    /// Zero on any resolved status.
    Manual,
    /// Unrecognised directive, kept verbatim (lower-cased). Never writes.
    Other(String),
}

impl Trigger {
    /// Normalises a raw ledger cell. Blank sentinels become
    /// [`Trigger::SoldOut`]; matching is case-insensitive.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        if is_blank(raw) {
            return Trigger::SoldOut;
        }
        let lowered = raw.unwrap_or_default().trim().to_lowercase();
        match lowered.as_str() {
            "soldout" => Trigger::SoldOut,
            "lowstock" => Trigger::LowStock,
            "manual" => Trigger::Manual,
            _ => Trigger::Other(lowered),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Trigger::SoldOut => "soldout",
            Trigger::LowStock => "lowstock",
            Trigger::Manual => "manual",
            Trigger::Other(raw) => raw.as_str(),
        }
    }

    /// Statuses this trigger zeroes on, lifecycle states aside.
    fn matches(&self, status: AvailabilityStatus) -> bool {
        use crate::status::AvailabilityStatus as S;
        match self {
            Trigger::SoldOut => matches!(status, S::OutOfStock | S::Sold),
            Trigger::LowStock => matches!(status, S::OutOfStock | S::Sold | S::LowStock),
            Trigger::Manual => status != S::Unknown,
            Trigger::Other(_) => false,
        }
    }
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a decision came out the way it did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReasonCode {
    /// Source URL answered 404 or 410.
    LinkDeleted,
    /// A positive match. Carries the trigger name, or `lifecycle` for
    /// `DELETED` / `ENDED`.
    TriggerMatch(String),
    NoMatch,
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReasonCode::LinkDeleted => f.write_str("link_deleted"),
            ReasonCode::TriggerMatch(what) => write!(f, "trigger_match:{what}"),
            ReasonCode::NoMatch => f.write_str("no_match"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationDecision {
    pub should_write: bool,
    pub reason: ReasonCode,
}

impl ReconciliationDecision {
    fn write(reason: ReasonCode) -> Self {
        Self {
            should_write: true,
            reason,
        }
    }

    fn no_match() -> Self {
        Self {
            should_write: false,
            reason: ReasonCode::NoMatch,
        }
    }
}

/// Decides whether to zero the linked listing. Rules, in order:
///
/// 1. HTTP 404/410 → write, `link_deleted` (status and trigger ignored)
/// 2. `UNKNOWN` → no write
/// 3. `DELETED` / `ENDED` → write, `trigger_match:lifecycle`
/// 4. `manual` → write
/// 5. `soldout` → write on `OUT_OF_STOCK` / `SOLD`
/// 6. `lowstock` → write on `OUT_OF_STOCK` / `SOLD` / `LOW_STOCK`
/// 7. anything else → no write
///
/// `http_code` is `0` for a transport failure. The recorded-quantity guard
/// is separate; see [`suppressed_by_recorded_quantity`].
#[must_use]
pub fn decide(
    status: AvailabilityStatus,
    trigger: &Trigger,
    http_code: u16,
) -> ReconciliationDecision {
    if matches!(http_code, 404 | 410) {
        return ReconciliationDecision::write(ReasonCode::LinkDeleted);
    }
    if status == AvailabilityStatus::Unknown {
        return ReconciliationDecision::no_match();
    }
    if status.is_terminal() {
        return ReconciliationDecision::write(ReasonCode::TriggerMatch("lifecycle".to_owned()));
    }
    if trigger.matches(status) {
        return ReconciliationDecision::write(ReasonCode::TriggerMatch(
            trigger.as_str().to_owned(),
        ));
    }
    ReconciliationDecision::no_match()
}

/// Idempotence guard applied by the caller after a positive decision.
///
/// A recorded quantity of `0` means the ledger already reflects a zeroed
/// listing, so the write and its notifications are skipped. An absent
/// quantity does not block.
#[must_use]
pub fn suppressed_by_recorded_quantity(
    decision: &ReconciliationDecision,
    recorded_quantity: Option<i64>,
) -> bool {
    decision.should_write && recorded_quantity == Some(0)
}
