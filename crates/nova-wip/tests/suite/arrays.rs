use std::sync::Arc;

use nova_wip::{RemoteType, RemoteValueRecord, RootName, UNKNOWN_ARRAY_LENGTH};

use super::{mock_builder, number, props};

fn array_record(id: &str) -> RemoteValueRecord {
    RemoteValueRecord::object(RemoteType::Array, "Array", id, true)
}

#[tokio::test]
async fn sparse_array_with_length() {
    let (source, builder) = mock_builder();
    source.insert(
        "arr",
        props(vec![
            ("0", RemoteValueRecord::primitive(RemoteType::String, "A")),
            ("2", RemoteValueRecord::primitive(RemoteType::String, "B")),
            ("length", number("3")),
        ]),
    );

    let value = builder.wrap(array_record("arr"), RootName::new("xs"));
    let array = value.as_array().unwrap();

    assert_eq!(array.length().await.unwrap(), 3);
    let sparse = array.to_sparse_map().await.unwrap();
    assert_eq!(sparse.keys().copied().collect::<Vec<_>>(), vec![0, 2]);
    assert_eq!(sparse[&0].value().value_string(), "A");
    assert_eq!(sparse[&2].value().value_string(), "B");
    assert_eq!(sparse[&2].fully_qualified_name(), "xs[2]");

    assert!(array.get(1).await.unwrap().is_none());
    assert_eq!(
        array.get(0).await.unwrap().unwrap().value().value_string(),
        "A"
    );
    assert_eq!(source.calls_for("arr"), 1);
}

#[tokio::test]
async fn missing_length_is_reported_as_unknown() {
    let (source, builder) = mock_builder();
    source.insert("arr", props(vec![("0", number("7"))]));

    let value = builder.wrap(array_record("arr"), RootName::new("xs"));
    let array = value.as_array().unwrap();

    assert_eq!(array.length().await.unwrap(), UNKNOWN_ARRAY_LENGTH);
    assert_eq!(array.to_sparse_map().await.unwrap().len(), 1);
}

#[tokio::test]
async fn empty_arrays_without_children_need_no_fetch() {
    let (source, builder) = mock_builder();
    let value = builder.wrap(
        RemoteValueRecord::object(RemoteType::Array, "Array[0]", "arr", false),
        RootName::new("xs"),
    );
    let array = value.as_array().unwrap();

    assert_eq!(array.length().await.unwrap(), UNKNOWN_ARRAY_LENGTH);
    assert!(array.to_sparse_map().await.unwrap().is_empty());
    assert_eq!(source.total_calls(), 0);
}

#[tokio::test]
async fn array_view_is_derived_once_and_shared_by_clones() {
    let (source, builder) = mock_builder();
    source.insert("arr", props(vec![("0", number("1")), ("length", number("1"))]));

    let value = builder.wrap(array_record("arr"), RootName::new("xs"));
    let clone = value.clone();

    let first = value.as_array().unwrap().array_properties().await.unwrap();
    let second = clone.as_array().unwrap().array_properties().await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.known_length(), Some(1));
    assert_eq!(source.calls_for("arr"), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_derivations_observe_one_result() {
    let (source, builder) = mock_builder();
    source.insert("arr", props(vec![("5", number("1")), ("length", number("6"))]));
    let value = builder.wrap(array_record("arr"), RootName::new("xs"));

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let value = value.clone();
            tokio::spawn(async move { value.as_array().unwrap().array_properties().await })
        })
        .collect();

    let mut views = Vec::new();
    for task in tasks {
        views.push(task.await.unwrap().unwrap());
    }
    for view in &views {
        assert!(Arc::ptr_eq(&views[0], view));
    }
    assert_eq!(views[0].length(), 6);
    assert_eq!(source.calls_for("arr"), 1);
}

#[tokio::test]
async fn arrays_still_expose_object_properties() {
    let (source, builder) = mock_builder();
    source.insert(
        "arr",
        props(vec![("0", number("1")), ("length", number("1")), ("extra", number("9"))]),
    );
    let value = builder.wrap(array_record("arr"), RootName::new("xs"));

    let object = value.as_object().unwrap();
    let snapshot = object.properties().await.unwrap();
    assert_eq!(snapshot.properties().len(), 3);
    assert_eq!(object.property("extra").unwrap().unwrap().fully_qualified_name(), "xs.extra");

    let sparse = value.as_array().unwrap().to_sparse_map().await.unwrap();
    assert_eq!(sparse.len(), 1);
}
