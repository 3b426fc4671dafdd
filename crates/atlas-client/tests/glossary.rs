mod common;

use atlas_client::schema::{AtlasGlossary, AtlasGlossaryHeader, AtlasGlossaryTerm};
use atlas_client::{Event, EventBus, EventKind, EventState, LoadState, Method};
use common::{client, client_with_bus, MockTransport, API};
use serde_json::{json, Map};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[tokio::test]
async fn test_listing_serves_accessors_then_inflates() {
    let transport = MockTransport::new();
    transport
        .reply(
            Method::Get,
            format!("{API}/glossary"),
            json!([{"guid": "g1", "name": "Finance"}]),
        )
        .reply(
            Method::Get,
            format!("{API}/glossary/g1"),
            json!({"guid": "g1", "name": "Finance", "shortDescription": "Money matters"}),
        );

    let glossaries = client(transport.clone()).glossaries();
    let finance = glossaries.models().await.unwrap().remove(0);

    assert_eq!(finance.name().await.unwrap().as_deref(), Some("Finance"));
    assert_eq!(transport.calls().len(), 1);

    assert_eq!(
        finance.short_description().await.unwrap().as_deref(),
        Some("Money matters")
    );
    assert_eq!(transport.count(Method::Get, &format!("{API}/glossary/g1")), 1);
    assert_eq!(finance.load_state(), LoadState::Loaded);
}

#[tokio::test]
async fn test_detailed_returns_inlined_terms() {
    let transport = MockTransport::new();
    transport.reply(
        Method::Get,
        format!("{API}/glossary/g1/detailed"),
        json!({
            "guid": "g1",
            "name": "Finance",
            "termInfo": {"t1": {"guid": "t1", "name": "Revenue"}},
            "categoryInfo": {"c1": {"guid": "c1", "name": "Income"}}
        }),
    );
    let bus = Arc::new(EventBus::new());
    let detailed_events = Arc::new(AtomicUsize::new(0));
    let counter = detailed_events.clone();
    bus.subscribe("QueryableModelV2", EventKind::Detailed, None, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let glossary = client_with_bus(transport.clone(), bus).glossaries().get("g1");
    let info = glossary.detailed().await.unwrap();

    assert_eq!(info.glossary.name.as_deref(), Some("Finance"));
    assert_eq!(info.term_info.unwrap()["t1"].name.as_deref(), Some("Revenue"));
    assert_eq!(info.category_info.unwrap()["c1"].name.as_deref(), Some("Income"));
    assert_eq!(detailed_events.load(Ordering::SeqCst), 2);
    assert_eq!(glossary.model().data()["name"], "Finance");
}

#[tokio::test]
async fn test_partial_updates_use_partial_endpoints() {
    let transport = MockTransport::new();
    let client = client(transport.clone());
    transport
        .reply(Method::Put, format!("{API}/glossary/g1/partial"), json!({"guid": "g1"}))
        .reply(
            Method::Put,
            format!("{API}/glossary/category/c1/partial"),
            json!({"guid": "c1"}),
        )
        .reply(
            Method::Put,
            format!("{API}/glossary/term/t1/partial"),
            json!({"guid": "t1"}),
        );

    let mut changes = Map::new();
    changes.insert("shortDescription".to_string(), json!("updated"));

    client
        .glossaries()
        .get("g1")
        .partial_update(changes.clone())
        .await
        .unwrap();
    client
        .glossary_categories()
        .get("c1")
        .partial_update(changes.clone())
        .await
        .unwrap();
    client
        .glossary_terms()
        .get("t1")
        .partial_update(changes)
        .await
        .unwrap();

    let calls = transport.calls();
    assert_eq!(calls.len(), 3);
    assert!(calls
        .iter()
        .all(|call| call.body == Some(json!({"shortDescription": "updated"}))));
}

#[tokio::test]
async fn test_create_glossary_from_record() {
    let transport = MockTransport::new();
    transport.reply(
        Method::Post,
        format!("{API}/glossary"),
        json!({"guid": "g9", "name": "Finance", "qualifiedName": "Finance"}),
    );

    let glossaries = client(transport.clone()).glossaries();
    let record = AtlasGlossary {
        name: Some("Finance".to_string()),
        terms: Some(Vec::new()),
        ..Default::default()
    };
    let created = glossaries.create(&record).await.unwrap();

    assert_eq!(transport.calls()[0].body, Some(json!({"name": "Finance"})));
    assert_eq!(created.url().unwrap(), format!("{API}/glossary/g9"));
    assert_eq!(
        created.qualified_name().await.unwrap().as_deref(),
        Some("Finance")
    );
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn test_fetch_categories_leaves_glossaries_alone() {
    let transport = MockTransport::new();
    transport.reply(
        Method::Get,
        format!("{API}/glossary/g1/categories"),
        json!([{"guid": "c1", "name": "Income"}]),
    );

    let glossaries = client(transport.clone()).glossaries();
    let categories = glossaries.fetch_categories("g1").await.unwrap();

    let members = categories.models().await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].url().unwrap(), format!("{API}/glossary/category/c1"));
    assert_eq!(glossaries.url().unwrap(), format!("{API}/glossary"));
    assert!(!glossaries.collection().is_inflated());
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn test_term_headers_resolve_to_terms() {
    let transport = MockTransport::new();
    transport
        .reply(
            Method::Get,
            format!("{API}/glossary/g1/terms/headers"),
            json!([{"termGuid": "t1", "displayText": "Revenue"}]),
        )
        .reply(
            Method::Get,
            format!("{API}/glossary/term/t1"),
            json!({"guid": "t1", "name": "Revenue"}),
        );

    let headers = client(transport.clone())
        .glossaries()
        .fetch_terms_headers("g1")
        .await
        .unwrap();

    let records = headers.records().await.unwrap();
    assert_eq!(records[0].display_text.as_deref(), Some("Revenue"));

    let header = headers.models().await.unwrap().remove(0);
    assert_eq!(header.url().unwrap(), format!("{API}/glossary/term/t1"));
    assert_eq!(header.relation_guid().await.unwrap(), None);
    assert_eq!(transport.count(Method::Get, &format!("{API}/glossary/term/t1")), 1);
}

#[tokio::test]
async fn test_related_maps_are_flattened() {
    let transport = MockTransport::new();
    let client = client(transport.clone());
    transport
        .reply(
            Method::Get,
            format!("{API}/glossary/terms/t1/related"),
            json!({
                "synonyms": [{"termGuid": "t2"}],
                "seeAlso": [{"termGuid": "t3"}, {"termGuid": "t4"}]
            }),
        )
        .reply(
            Method::Get,
            format!("{API}/glossary/category/c1/related"),
            json!({
                "parent": [{"categoryGuid": "c0"}],
                "children": [{"categoryGuid": "c2"}]
            }),
        );

    let related_terms = client.glossary_terms().fetch_related("t1").await.unwrap();
    let mut guids: Vec<_> = related_terms
        .models()
        .await
        .unwrap()
        .iter()
        .filter_map(|model| model.cached_identifier())
        .collect();
    guids.sort();
    assert_eq!(guids, vec!["t2", "t3", "t4"]);

    let related_categories = client
        .glossary_categories()
        .fetch_related("c1")
        .await
        .unwrap();
    assert_eq!(related_categories.len().await.unwrap(), 2);
}

#[tokio::test]
async fn test_category_terms_and_glossary_terms() {
    let transport = MockTransport::new();
    let client = client(transport.clone());
    transport
        .reply(
            Method::Get,
            format!("{API}/glossary/category/c1/terms"),
            json!([{"termGuid": "t1"}]),
        )
        .reply(
            Method::Get,
            format!("{API}/glossary/g1/terms"),
            json!([{"guid": "t1", "name": "Revenue"}, {"guid": "t2", "name": "Cost"}]),
        )
        .reply(
            Method::Get,
            format!("{API}/glossary/g1/categories/headers"),
            json!([{"categoryGuid": "c1"}]),
        );

    let category_terms = client.glossary_categories().fetch_terms("c1").await.unwrap();
    assert_eq!(category_terms.len().await.unwrap(), 1);

    let terms = client.glossaries().fetch_terms("g1").await.unwrap();
    let names: Vec<_> = terms
        .records()
        .await
        .unwrap()
        .into_iter()
        .filter_map(|term| term.name)
        .collect();
    assert_eq!(names, vec!["Revenue", "Cost"]);

    let headers = client
        .glossaries()
        .fetch_categories_headers("g1")
        .await
        .unwrap();
    assert_eq!(
        headers.models().await.unwrap()[0].url().unwrap(),
        format!("{API}/glossary/category/c1")
    );
}

#[tokio::test]
async fn test_assigned_entities_round() {
    let transport = MockTransport::new();
    let assigned = format!("{API}/glossary/terms/t1/assignedEntities");
    transport
        .reply(
            Method::Get,
            assigned.clone(),
            json!([{"guid": "e1", "typeName": "hive_table", "displayText": "sales"}]),
        )
        .reply(Method::Post, assigned.clone(), json!({}))
        .reply(Method::Put, assigned.clone(), json!({}))
        .reply(Method::Delete, assigned.clone(), json!({}));

    let bus = Arc::new(EventBus::new());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();
    bus.subscribe(
        "GlossaryTermsCollection",
        EventKind::AssignEntities,
        Some(EventState::Finished),
        move |event: &Event<'_>| log.lock().unwrap().push(event.source.type_name()),
    );
    let terms = client_with_bus(transport.clone(), bus).glossary_terms_bulk();

    let entities = terms.fetch_assigned_entities("t1").await.unwrap();
    let entity = entities.models().await.unwrap().remove(0);
    assert_eq!(entity.entity_type().await.unwrap().as_deref(), Some("hive_table"));
    assert_eq!(entity.url().unwrap(), format!("{API}/entity/guid/e1"));

    let headers = json!([{"guid": "e1", "typeName": "hive_table", "displayText": ""}]);
    let created = terms.assign_entities("t1", &headers).await.unwrap();
    assert!(created.is_empty());
    terms.update_assigned_entities("t1", &headers).await.unwrap();
    terms.delete_assigned_entities("t1", &headers).await.unwrap();

    let calls = transport.calls();
    assert_eq!(calls.len(), 4);
    for call in &calls[1..] {
        assert_eq!(call.url, assigned);
        assert_eq!(call.body, Some(json!([{"guid": "e1", "typeName": "hive_table"}])));
    }
    assert_eq!(
        calls[1..].iter().map(|call| call.method).collect::<Vec<_>>(),
        vec![Method::Post, Method::Put, Method::Delete]
    );
    assert_eq!(*seen.lock().unwrap(), vec!["GlossaryTermsCollection"]);
}

#[tokio::test]
async fn test_bulk_terms_resolve_canonically() {
    let transport = MockTransport::new();
    transport.reply(
        Method::Post,
        format!("{API}/glossary/terms"),
        json!([
            {"guid": "t1", "name": "Revenue", "anchor": {"glossaryGuid": "g1"}},
            {"guid": "t2", "name": "Cost", "anchor": {"glossaryGuid": "g1"}}
        ]),
    );

    let anchor = AtlasGlossaryHeader {
        glossary_guid: Some("g1".to_string()),
        ..Default::default()
    };
    let terms = vec![
        AtlasGlossaryTerm {
            name: Some("Revenue".to_string()),
            anchor: Some(anchor.clone()),
            ..Default::default()
        },
        AtlasGlossaryTerm {
            name: Some("Cost".to_string()),
            anchor: Some(anchor),
            ..Default::default()
        },
    ];

    let created = client(transport.clone())
        .glossary_terms_bulk()
        .create(&terms)
        .await
        .unwrap();

    assert_eq!(
        transport.calls()[0].body,
        Some(json!([
            {"name": "Revenue", "anchor": {"glossaryGuid": "g1"}},
            {"name": "Cost", "anchor": {"glossaryGuid": "g1"}}
        ]))
    );
    assert_eq!(created.len(), 2);
    assert_eq!(created[1].url().unwrap(), format!("{API}/glossary/term/t2"));
}
