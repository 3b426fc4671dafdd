mod common;

use atlas_client::{ApiVersion, AtlasError, Method, ModelSpec};
use common::{client_at_version, MockTransport, API};
use serde_json::json;

static LINEAGE: ModelSpec = ModelSpec::queryable("Lineage", "lineage")
    .primary_key("guid")
    .min_version(ApiVersion::new(2, 1, 0));

static TYPEDEF: ModelSpec = ModelSpec::queryable("TypeDef", "types/typedefs").primary_key("name");

#[tokio::test]
async fn test_newer_resource_fails_before_request() {
    let transport = MockTransport::new();
    let lineage = client_at_version(transport.clone(), "2.0.0").collection(&LINEAGE);

    let err = lineage.models().await.unwrap_err();

    match err {
        AtlasError::Client { message } => {
            assert_eq!(
                message,
                format!(
                    "Cannot access {API}/lineage in version 2.0.0, it was added in version 2.1.0"
                )
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn test_matching_version_is_allowed() {
    let transport = MockTransport::new();
    transport.reply(Method::Get, format!("{API}/lineage"), json!([{"guid": "l1"}]));

    let lineage = client_at_version(transport.clone(), "2.1").collection(&LINEAGE);

    assert_eq!(lineage.len().await.unwrap(), 1);
}

#[tokio::test]
async fn test_baseline_resources_ignore_old_servers() {
    let transport = MockTransport::new();
    transport.reply(
        Method::Get,
        format!("{API}/types/typedefs"),
        json!([{"name": "hive_table"}]),
    );

    let typedefs = client_at_version(transport.clone(), "1.0.0").collection(&TYPEDEF);

    assert_eq!(typedefs.len().await.unwrap(), 1);
}
