//! Zeroing a linked listing, with the single SKU → item ID fallback.

use invsync_core::{normalize_field, UpdatePath, UpdateResult};

use crate::response::ReviseResponse;
use crate::writer::{IdentifierKind, InventoryWriter};

/// Sets the linked listing's quantity to zero.
///
/// SKU is tried first when present. If eBay rejects it as an invalid
/// identifier and an item ID exists, the write is repeated once by item ID.
/// At most two calls are made. Transport failures are folded into a failed
/// result; this never returns an error.
///
/// Callers must skip rows with no identifier. If both are blank anyway, no
/// call is made and a failed result is returned.
pub async fn reconcile_zero<W>(writer: &W, item_id: Option<&str>, sku: Option<&str>) -> UpdateResult
where
    W: InventoryWriter + ?Sized,
{
    let item_id = normalize_field(item_id);
    let sku = normalize_field(sku);

    match (sku.as_deref(), item_id.as_deref()) {
        (Some(sku), item_id) => {
            let (first, response) = attempt(writer, IdentifierKind::Sku, sku).await;
            let invalid_sku = response
                .as_ref()
                .is_some_and(ReviseResponse::is_invalid_identifier);

            match item_id {
                Some(item_id) if !first.ok && invalid_sku => {
                    tracing::warn!(sku, item_id, "SKU rejected as invalid, retrying by item ID");
                    let (second, _) = attempt(writer, IdentifierKind::ItemId, item_id).await;
                    UpdateResult {
                        path_used: UpdatePath::SkuThenItemIdFallback,
                        ..second
                    }
                }
                _ => first,
            }
        }
        (None, Some(item_id)) => attempt(writer, IdentifierKind::ItemId, item_id).await.0,
        (None, None) => UpdateResult::rejected(
            UpdatePath::ItemId,
            "no SKU or item ID; nothing to update",
        ),
    }
}

async fn attempt<W>(
    writer: &W,
    kind: IdentifierKind,
    identifier: &str,
) -> (UpdateResult, Option<ReviseResponse>)
where
    W: InventoryWriter + ?Sized,
{
    let path_used = match kind {
        IdentifierKind::Sku => UpdatePath::Sku,
        IdentifierKind::ItemId => UpdatePath::ItemId,
    };

    match writer.set_quantity(kind, identifier, 0).await {
        Ok(_) if writer.is_dry_run() => (UpdateResult::simulated(path_used), None),
        Ok(response) => {
            let ok = response.is_success();
            let error = (!ok).then(|| response.failure_summary());
            if let Some(error) = &error {
                tracing::warn!(%kind, identifier, http_status = response.http_status, error, "eBay write failed");
            }
            let result = UpdateResult {
                ok,
                path_used,
                http_status: Some(response.http_status),
                raw_body: Some(response.body.clone()),
                error,
                dry_run: false,
            };
            (result, Some(response))
        }
        Err(e) => {
            tracing::warn!(%kind, identifier, error = %e, "eBay write transport failure");
            (UpdateResult::rejected(path_used, e.to_string()), None)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::EbayError;
    use crate::response::Ack;
    use crate::writer::DryRunWriter;

    /// Replays scripted responses and records every call.
    struct ScriptedWriter {
        responses: Mutex<VecDeque<ReviseResponse>>,
        calls: Mutex<Vec<(IdentifierKind, String)>>,
    }

    impl ScriptedWriter {
        fn new(responses: Vec<ReviseResponse>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(IdentifierKind, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl InventoryWriter for ScriptedWriter {
        async fn set_quantity(
            &self,
            kind: IdentifierKind,
            identifier: &str,
            quantity: u32,
        ) -> Result<ReviseResponse, EbayError> {
            assert_eq!(quantity, 0);
            self.calls
                .lock()
                .unwrap()
                .push((kind, identifier.to_owned()));
            Ok(self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected extra call"))
        }
    }

    fn success() -> ReviseResponse {
        ReviseResponse::parse(200, "<R><Ack>Success</Ack></R>".to_owned())
    }

    fn invalid_sku() -> ReviseResponse {
        ReviseResponse::parse(
            200,
            "<R><Ack>Failure</Ack><Errors><ShortMessage>Invalid SKU.</ShortMessage>\
             <ErrorCode>21916255</ErrorCode><SeverityCode>Error</SeverityCode></Errors></R>"
                .to_owned(),
        )
    }

    fn other_failure() -> ReviseResponse {
        ReviseResponse::parse(
            200,
            "<R><Ack>Failure</Ack><Errors><ShortMessage>Listing ended.</ShortMessage>\
             <ErrorCode>291</ErrorCode><SeverityCode>Error</SeverityCode></Errors></R>"
                .to_owned(),
        )
    }

    #[tokio::test]
    async fn sku_success_is_one_call() {
        let writer = ScriptedWriter::new(vec![success()]);
        let r = reconcile_zero(&writer, Some("123"), Some("SKU-1")).await;
        assert!(r.ok);
        assert_eq!(r.path_used, UpdatePath::Sku);
        assert_eq!(writer.calls(), vec![(IdentifierKind::Sku, "SKU-1".to_owned())]);
    }

    #[tokio::test]
    async fn invalid_sku_falls_back_to_item_id_exactly_once() {
        let writer = ScriptedWriter::new(vec![invalid_sku(), success()]);
        let r = reconcile_zero(&writer, Some("123"), Some("SKU-1")).await;
        assert!(r.ok);
        assert_eq!(r.path_used, UpdatePath::SkuThenItemIdFallback);
        assert_eq!(
            writer.calls(),
            vec![
                (IdentifierKind::Sku, "SKU-1".to_owned()),
                (IdentifierKind::ItemId, "123".to_owned()),
            ]
        );
    }

    #[tokio::test]
    async fn failed_fallback_reports_second_call() {
        let writer = ScriptedWriter::new(vec![invalid_sku(), other_failure()]);
        let r = reconcile_zero(&writer, Some("123"), Some("SKU-1")).await;
        assert!(!r.ok);
        assert_eq!(r.path_used, UpdatePath::SkuThenItemIdFallback);
        assert_eq!(r.error.as_deref(), Some("eBay error 291: Listing ended."));
        assert_eq!(writer.calls().len(), 2);
    }

    #[tokio::test]
    async fn invalid_sku_without_item_id_does_not_fall_back() {
        let writer = ScriptedWriter::new(vec![invalid_sku()]);
        let r = reconcile_zero(&writer, None, Some("SKU-1")).await;
        assert!(!r.ok);
        assert_eq!(r.path_used, UpdatePath::Sku);
        assert_eq!(writer.calls().len(), 1);
    }

    #[tokio::test]
    async fn other_sku_failure_does_not_fall_back() {
        let writer = ScriptedWriter::new(vec![other_failure()]);
        let r = reconcile_zero(&writer, Some("123"), Some("SKU-1")).await;
        assert!(!r.ok);
        assert_eq!(r.path_used, UpdatePath::Sku);
        assert_eq!(writer.calls().len(), 1);
    }

    #[tokio::test]
    async fn blank_sku_goes_straight_to_item_id() {
        let writer = ScriptedWriter::new(vec![success()]);
        let r = reconcile_zero(&writer, Some(" 123 "), Some("nan")).await;
        assert!(r.ok);
        assert_eq!(r.path_used, UpdatePath::ItemId);
        assert_eq!(writer.calls(), vec![(IdentifierKind::ItemId, "123".to_owned())]);
    }

    #[tokio::test]
    async fn no_identifier_makes_no_call() {
        let writer = ScriptedWriter::new(vec![]);
        let r = reconcile_zero(&writer, None, Some("")).await;
        assert!(!r.ok);
        assert!(writer.calls().is_empty());
    }

    #[tokio::test]
    async fn warning_ack_is_success() {
        let mut warning = success();
        warning.ack = Some(Ack::Warning);
        let writer = ScriptedWriter::new(vec![warning]);
        let r = reconcile_zero(&writer, Some("123"), None).await;
        assert!(r.ok);
        assert_eq!(r.http_status, Some(200));
    }

    #[tokio::test]
    async fn dry_run_is_simulated() {
        let r = reconcile_zero(&DryRunWriter, Some("123"), Some("SKU-1")).await;
        assert!(r.ok);
        assert!(r.dry_run);
        assert_eq!(r.path_used, UpdatePath::Sku);
        assert!(r.raw_body.is_none());
    }
}
