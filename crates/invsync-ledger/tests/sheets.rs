//! Integration tests for the Sheets API ledger. The key file points its
//! `token_uri` at the mock server, so both the token grant and the values
//! read stay local.

use std::io::Write;

use invsync_core::SheetsLedger;
use invsync_ledger::{LedgerError, SheetsClient};
use serde_json::json;
use tempfile::NamedTempFile;
use wiremock::matchers::{body_string_contains, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_KEY_PEM: &str = include_str!("fixtures/service_account_key.pem");

fn key_file(token_uri: &str, private_key: &str) -> NamedTempFile {
    let key = json!({
        "type": "service_account",
        "client_email": "ledger-reader@invsync-test.iam.gserviceaccount.com",
        "private_key": private_key,
        "token_uri": token_uri,
    });
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(key.to_string().as_bytes()).expect("write key");
    file
}

fn sheet(key: &NamedTempFile) -> SheetsLedger {
    SheetsLedger {
        sheet_id: "SHEET123".to_owned(),
        range: "Ledger!A:E".to_owned(),
        service_account_json: key.path().to_path_buf(),
    }
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains(
            "grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer",
        ))
        .and(body_string_contains("assertion=ey"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ya29.test",
            "expires_in": 3599,
            "token_type": "Bearer",
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn reads_range_with_granted_token() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/SHEET123/values/Ledger!A:E"))
        .and(header_regex("authorization", r"^Bearer ya29\.test$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "range": "Ledger!A1:E3",
            "majorDimension": "ROWS",
            "values": [
                ["source_url", "ebay_item_id", "sku", "trigger", "quantity"],
                ["https://jp.mercari.com/item/m1", "110000000001", "PKM-1", "soldout", "1"],
                ["https://www.amazon.co.jp/dp/B0TEST", "110000000002"],
                [],
                ["https://item.rakuten.co.jp/shop/x/", "", "RKT-9", "", 0],
            ],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let key = key_file(&format!("{}/token", server.uri()), TEST_KEY_PEM);
    let client = SheetsClient::with_api_base(5_000, &server.uri()).expect("client");
    let rows = client.read_ledger(&sheet(&key)).await.expect("ledger should load");

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].sku.as_deref(), Some("PKM-1"));
    assert_eq!(rows[0].recorded_quantity, Some(1));
    assert_eq!(rows[1].marketplace_item_id.as_deref(), Some("110000000002"));
    assert_eq!(rows[1].sku, None);
    assert_eq!(rows[1].recorded_quantity, None);
    assert_eq!(rows[2].marketplace_item_id, None);
    assert_eq!(rows[2].recorded_quantity, Some(0));
}

#[tokio::test]
async fn empty_range_is_missing_source_url_column() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/SHEET123/values/Ledger!A:E"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "range": "Ledger!A1:E1" })),
        )
        .mount(&server)
        .await;

    let key = key_file(&format!("{}/token", server.uri()), TEST_KEY_PEM);
    let client = SheetsClient::with_api_base(5_000, &server.uri()).expect("client");
    let result = client.read_ledger(&sheet(&key)).await;

    assert!(
        matches!(result, Err(LedgerError::MissingColumn(ref c)) if c == "source_url"),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn forbidden_values_read_is_an_error() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let key = key_file(&format!("{}/token", server.uri()), TEST_KEY_PEM);
    let client = SheetsClient::with_api_base(5_000, &server.uri()).expect("client");
    let result = client.read_ledger(&sheet(&key)).await;

    assert!(
        matches!(result, Err(LedgerError::UnexpectedStatus { status: 403, .. })),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn rejected_grant_stops_before_values_read() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let key = key_file(&format!("{}/token", server.uri()), TEST_KEY_PEM);
    let client = SheetsClient::with_api_base(5_000, &server.uri()).expect("client");
    let result = client.read_ledger(&sheet(&key)).await;

    assert!(
        matches!(result, Err(LedgerError::UnexpectedStatus { status: 400, ref url }) if url.ends_with("/token")),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn missing_key_file_is_io_error() {
    let client = SheetsClient::with_api_base(5_000, "http://127.0.0.1:1").expect("client");
    let ledger = SheetsLedger {
        sheet_id: "SHEET123".to_owned(),
        range: "Ledger!A:E".to_owned(),
        service_account_json: "/nonexistent/invsync-sa.json".into(),
    };

    let result = client.read_ledger(&ledger).await;

    assert!(matches!(result, Err(LedgerError::Io { .. })), "got: {result:?}");
}

#[tokio::test]
async fn key_file_without_private_key_is_rejected() {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(br#"{"client_email":"a@b.example"}"#)
        .expect("write key");
    let client = SheetsClient::with_api_base(5_000, "http://127.0.0.1:1").expect("client");

    let result = client.read_ledger(&sheet(&file)).await;

    assert!(
        matches!(result, Err(LedgerError::ServiceAccount { .. })),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn unusable_private_key_is_a_signing_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let key = key_file(&format!("{}/token", server.uri()), "not a pem key");
    let client = SheetsClient::with_api_base(5_000, &server.uri()).expect("client");
    let result = client.read_ledger(&sheet(&key)).await;

    assert!(matches!(result, Err(LedgerError::Signing(_))), "got: {result:?}");
}
