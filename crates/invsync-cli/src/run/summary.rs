/// Counters for one pass over the ledger.
///
/// `matched` counts rows whose URL belongs to a handled source family. Every
/// matched row lands in exactly one of the outcome counters, except fetch
/// failures, which are also counted as `unknown`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub matched: usize,
    pub skipped_no_identifier: usize,
    pub unknown: usize,
    pub no_action: usize,
    pub suppressed: usize,
    pub zeroed: usize,
    pub failed: usize,
    pub fetch_failures: usize,
}

impl RunSummary {
    /// Number of rows that led to an eBay write attempt.
    #[must_use]
    pub fn writes_attempted(&self) -> usize {
        self.zeroed + self.failed
    }
}
