use std::env::temp_dir;
use std::sync::Arc;

use cmd::command::apply;
use cmd::command::catalog::list_events;
use cmd::error::Error;
use filter::catalog::StaticCatalogSource;
use filter::test_util::test_catalog;
use filter::test_util::RecordingConsumer;
use filter::test_util::ScriptedCatalogSource;
use filter::AttributeOperator;
use filter::AttributeValue;
use filter::FilterCommand;
use filter::RangeValue;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_apply_script() {
    let mut path = temp_dir();
    path.push(format!("{}.json", Uuid::new_v4()));
    tokio::fs::write(
        &path,
        serde_json::to_vec(&json!([
            {"command": "selectEvent", "stepId": 1, "eventType": "SignUp"},
            {"command": "addAttribute", "stepId": 1},
            {"command": "changeProperty", "stepId": 1, "attributeId": 1, "property": "age"},
            {"command": "changeOperator", "stepId": 1, "attributeId": 1, "operator": "between"},
            {"command": "enterValue", "stepId": 1, "attributeId": 1, "raw": " 18 ", "part": "from"},
            {"command": "enterValue", "stepId": 1, "attributeId": 1, "raw": "abc", "part": "to"},
            {"command": "addAttribute", "stepId": 1},
            {"command": "addStep"},
            {"command": "selectEvent", "stepId": 2, "eventType": "Purchase"}
        ]))
        .unwrap(),
    )
    .await
    .unwrap();

    let script = apply::load_script(&path).await.unwrap();
    tokio::fs::remove_file(&path).await.unwrap();
    assert_eq!(script.len(), 9);

    let consumer = Arc::new(RecordingConsumer::new());
    let doc = apply::run(
        Arc::new(StaticCatalogSource::new(test_catalog())),
        consumer.clone(),
        script,
    )
    .await
    .unwrap();

    assert_eq!(consumer.documents().await, vec![doc.clone()]);
    assert_eq!(
        serde_json::to_value(&doc).unwrap(),
        json!({"steps": [
            {"id": 1, "event": "SignUp", "attributes": [
                {"property": "age", "type": "number", "operator": "between", "value": {"from": 18, "to": null}}
            ]},
            {"id": 2, "event": "Purchase", "attributes": []}
        ]})
    );
    assert_eq!(
        doc.steps[0].attributes[0].value,
        AttributeValue::Range(RangeValue::new(Some(18.0), None))
    );
    assert_eq!(doc.steps[0].attributes[0].operator, AttributeOperator::Between);
}

#[tokio::test]
async fn test_apply_without_catalog() {
    let res = apply::run(
        Arc::new(ScriptedCatalogSource::new().err("catalog is down")),
        Arc::new(RecordingConsumer::new()),
        vec![FilterCommand::AddStep],
    )
    .await;

    assert!(matches!(res, Err(Error::CatalogUnavailable)));
}

#[tokio::test]
async fn test_bad_script() {
    let mut path = temp_dir();
    path.push(format!("{}.json", Uuid::new_v4()));
    tokio::fs::write(&path, br#"[{"command": "explode"}]"#)
        .await
        .unwrap();

    let res = apply::load_script(&path).await;
    tokio::fs::remove_file(&path).await.unwrap();
    assert!(matches!(res, Err(Error::BadRequest(_))));

    let res = apply::load_script(&path).await;
    assert!(matches!(res, Err(Error::StdIO(_))));
}

#[tokio::test]
async fn test_list_events() {
    let source = Arc::new(StaticCatalogSource::new(test_catalog()));

    let events = list_events(source.clone(), None).await.unwrap();
    assert_eq!(events, test_catalog());

    let events = list_events(source.clone(), Some("purch")).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].typ, "Purchase");

    assert!(list_events(source, Some("logout")).await.unwrap().is_empty());
}
