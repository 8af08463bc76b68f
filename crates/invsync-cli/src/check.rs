//! `invsync check`: classify one listing without writing or notifying.

use invsync_core::{resolve, FetchMode, SourceFamily};
use invsync_scraper::{extract_signals, HttpFetcher, PageFetcher};

const CHECK_MAX_RETRIES: u32 = 1;
const CHECK_BACKOFF_BASE_MS: u64 = 1_000;

/// Fetches `url`, runs the family's extractor and prints what the run loop
/// would see.
///
/// # Errors
///
/// Returns an error if the URL belongs to no known source family or the
/// HTTP client cannot be built.
pub(crate) async fn run_check(url: &str, fetch_mode: FetchMode, timeout_ms: u64) -> anyhow::Result<()> {
    let family = SourceFamily::from_url(url)
        .ok_or_else(|| anyhow::anyhow!("no source family handles {url}"))?;
    let fetcher = HttpFetcher::new(fetch_mode, timeout_ms, CHECK_MAX_RETRIES, CHECK_BACKOFF_BASE_MS)?;

    let fetched = fetcher.fetch(url).await;

    println!("family:    {family} [{}]", family.tag());
    println!("fetch:     {}", fetcher.mode());
    println!("http_code: {}", fetched.http_code);

    if fetched.http_code != 200 {
        if fetched.is_transport_failure() {
            println!("error:     {}", fetched.body);
        } else if fetched.is_dead_link() {
            println!("dead link: the run loop zeroes this listing under any trigger");
        }
        println!("status:    UNKNOWN");
        return Ok(());
    }

    let signals = extract_signals(family, &fetched.body);
    println!("signals:   {signals:#?}");
    println!("status:    {}", resolve(&signals));
    Ok(())
}
