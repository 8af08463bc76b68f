//! The reconciliation pass: fetch → resolve → decide → write → notify, one
//! ledger row at a time.

mod summary;

use std::collections::HashMap;

use invsync_core::{
    decide, resolve, suppressed_by_recorded_quantity, AvailabilityStatus, ListingRecord,
    ReconciliationDecision, SourceFamily, Trigger,
};
use invsync_ebay::{reconcile_zero, InventoryWriter};
use invsync_notify::message::{self, RowContext};
use invsync_notify::Notifier;
use invsync_scraper::{extract_signals, FetchResult, PageFetcher};

pub use summary::RunSummary;

/// Per-pass switches that do not belong to any collaborator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Only rows of this family are processed.
    pub source_filter: Option<SourceFamily>,
    pub notify_fetch_failures: bool,
}

/// Owns the collaborators for a run. Rows are processed strictly in order;
/// each row's fetch, write and notifications finish before the next row.
pub struct Reconciler {
    fetcher: Box<dyn PageFetcher>,
    writer: Box<dyn InventoryWriter>,
    notifier: Box<dyn Notifier>,
    options: RunOptions,
}

enum RowOutcome {
    SkippedNoIdentifier,
    Unknown { fetch_failed: bool },
    NoAction,
    Suppressed,
    Zeroed,
    Failed,
}

impl Reconciler {
    pub fn new(
        fetcher: Box<dyn PageFetcher>,
        writer: Box<dyn InventoryWriter>,
        notifier: Box<dyn Notifier>,
        options: RunOptions,
    ) -> Self {
        Self {
            fetcher,
            writer,
            notifier,
            options,
        }
    }

    /// Runs one pass over `rows` and returns its counters.
    pub async fn run_pass(&self, rows: &[ListingRecord]) -> RunSummary {
        let mut summary = RunSummary::default();
        let mut matched_by_family: HashMap<SourceFamily, usize> = HashMap::new();

        for row in rows {
            let Some(family) = SourceFamily::from_url(&row.source_url) else {
                tracing::debug!(url = %row.source_url, "no extractor for host, row skipped");
                continue;
            };
            if self.options.source_filter.is_some_and(|only| only != family) {
                continue;
            }

            summary.matched += 1;
            *matched_by_family.entry(family).or_default() += 1;

            match self.process_row(family, row).await {
                RowOutcome::SkippedNoIdentifier => summary.skipped_no_identifier += 1,
                RowOutcome::Unknown { fetch_failed } => {
                    summary.unknown += 1;
                    if fetch_failed {
                        summary.fetch_failures += 1;
                    }
                }
                RowOutcome::NoAction => summary.no_action += 1,
                RowOutcome::Suppressed => summary.suppressed += 1,
                RowOutcome::Zeroed => summary.zeroed += 1,
                RowOutcome::Failed => summary.failed += 1,
            }
        }

        match self.options.source_filter {
            Some(only) if summary.matched == 0 => {
                tracing::warn!(source = only.tag(), "no ledger rows matched; check headers and URLs");
            }
            Some(_) => {}
            None => {
                for family in SourceFamily::ALL {
                    if let Some(rows) = matched_by_family.get(&family) {
                        tracing::debug!(source = family.tag(), rows, "rows matched");
                    } else {
                        tracing::warn!(source = family.tag(), "no ledger rows matched");
                    }
                }
            }
        }

        summary
    }

    async fn process_row(&self, family: SourceFamily, row: &ListingRecord) -> RowOutcome {
        let ctx = RowContext {
            tag: family.tag(),
            ident: row.display_ident(),
            url: &row.source_url,
        };

        if !row.has_identifier() {
            tracing::warn!(
                source = ctx.tag,
                url = ctx.url,
                "row has neither SKU nor item ID, skipped"
            );
            return RowOutcome::SkippedNoIdentifier;
        }

        let fetched = self.fetcher.fetch(&row.source_url).await;
        let status = page_status(family, &fetched);
        let trigger = Trigger::parse(row.trigger.as_deref());
        let decision = decide(status, &trigger, fetched.http_code);

        tracing::info!(
            source = ctx.tag,
            url = ctx.url,
            ident = ctx.ident,
            http_code = fetched.http_code,
            status = %status,
            trigger = %trigger,
            should_write = decision.should_write,
            reason = %decision.reason,
            "row evaluated"
        );

        if !decision.should_write {
            return self.absorb(ctx, status, &fetched).await;
        }

        if suppressed_by_recorded_quantity(&decision, row.recorded_quantity) {
            tracing::info!(
                source = ctx.tag,
                ident = ctx.ident,
                reason = %decision.reason,
                "ledger already records quantity 0, write suppressed"
            );
            return RowOutcome::Suppressed;
        }

        self.zero(ctx, row, &decision).await
    }

    /// Negative decisions stay silent. The one exception is an opted-in
    /// fetch-failure alert.
    async fn absorb(
        &self,
        ctx: RowContext<'_>,
        status: AvailabilityStatus,
        fetched: &FetchResult,
    ) -> RowOutcome {
        if status != AvailabilityStatus::Unknown {
            return RowOutcome::NoAction;
        }

        let fetch_failed = is_fetch_failure(fetched);
        if fetch_failed {
            tracing::warn!(
                source = ctx.tag,
                url = ctx.url,
                http_code = fetched.http_code,
                "listing page could not be fetched"
            );
            if self.options.notify_fetch_failures {
                let detail = if fetched.is_transport_failure() {
                    fetched.body.clone()
                } else {
                    format!("HTTP {}", fetched.http_code)
                };
                self.notifier
                    .notify(&message::fetch_failure(ctx, &detail))
                    .await;
            }
        }
        RowOutcome::Unknown { fetch_failed }
    }

    async fn zero(
        &self,
        ctx: RowContext<'_>,
        row: &ListingRecord,
        decision: &ReconciliationDecision,
    ) -> RowOutcome {
        let reason = &decision.reason;
        self.notifier.notify(&message::pending(ctx, reason)).await;

        let result = reconcile_zero(
            self.writer.as_ref(),
            row.marketplace_item_id.as_deref(),
            row.sku.as_deref(),
        )
        .await;

        if result.ok {
            tracing::info!(
                outcome = "zeroed",
                source = ctx.tag,
                ident = ctx.ident,
                reason = %reason,
                path = %result.path_used,
                http_status = ?result.http_status,
                dry_run = result.dry_run,
                "eBay quantity zeroed"
            );
            self.notifier
                .notify(&message::success(ctx, reason, &result))
                .await;
            RowOutcome::Zeroed
        } else {
            tracing::error!(
                outcome = "failed",
                source = ctx.tag,
                ident = ctx.ident,
                reason = %reason,
                path = %result.path_used,
                http_status = ?result.http_status,
                error = ?result.error,
                "eBay zeroing failed"
            );
            self.notifier
                .notify(&message::failure(ctx, reason, &result))
                .await;
            RowOutcome::Failed
        }
    }
}

/// Only a 200 page is read. Every other code resolves to `UNKNOWN`; dead
/// links are handled by the policy from the HTTP code alone.
fn page_status(family: SourceFamily, fetched: &FetchResult) -> AvailabilityStatus {
    if fetched.http_code == 200 {
        resolve(&extract_signals(family, &fetched.body))
    } else {
        AvailabilityStatus::Unknown
    }
}

fn is_fetch_failure(fetched: &FetchResult) -> bool {
    !matches!(fetched.http_code, 200 | 404 | 410)
}

#[cfg(test)]
#[path = "run_test.rs"]
mod tests;
