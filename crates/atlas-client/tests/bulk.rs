mod common;

use atlas_client::schema::AtlasGlossaryCategory;
use atlas_client::{AtlasError, Method};
use common::{client, MockTransport, API};
use serde_json::json;

#[tokio::test]
async fn test_single_record_is_rejected_without_request() {
    let transport = MockTransport::new();
    let terms = client(transport.clone()).glossary_terms_bulk();
    let single = json!({"name": "Revenue"});

    for result in [
        terms.create(&single).await,
        terms.update(&single).await,
        terms.delete(&single).await,
    ] {
        match result.unwrap_err() {
            AtlasError::BadRequest { url, message, .. } => {
                assert_eq!(url, "glossary/terms");
                assert_eq!(message, "Data should be a list of \"AtlasGlossaryTerm\"");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn test_rejection_reports_the_method() {
    let transport = MockTransport::new();
    let categories = client(transport.clone()).glossary_categories_bulk();

    let err = categories.update(&json!("Income")).await.unwrap_err();

    match err {
        AtlasError::BadRequest { method, message, .. } => {
            assert_eq!(method, "PUT");
            assert!(message.contains("AtlasGlossaryCategory"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_categories_are_sent_in_one_request() {
    let transport = MockTransport::new();
    transport.reply(
        Method::Post,
        format!("{API}/glossary/categories"),
        json!([
            {"guid": "c1", "name": "Income"},
            {"guid": "c2", "name": "Expenses"}
        ]),
    );

    let records = vec![
        AtlasGlossaryCategory {
            name: Some("Income".to_string()),
            long_description: Some(String::new()),
            ..Default::default()
        },
        AtlasGlossaryCategory {
            name: Some("Expenses".to_string()),
            ..Default::default()
        },
    ];

    let created = client(transport.clone())
        .glossary_categories_bulk()
        .create(&records)
        .await
        .unwrap();

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].body,
        Some(json!([{"name": "Income"}, {"name": "Expenses"}]))
    );
    assert_eq!(
        created[0].url().unwrap(),
        format!("{API}/glossary/category/c1")
    );
    assert_eq!(created[1].name().await.unwrap().as_deref(), Some("Expenses"));
}
