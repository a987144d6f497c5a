use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use nova_wip::{
    NameBuilder, NameRef, PropertyNameScope, RemoteType, RemoteValueRecord, RootName,
    UnsupportedOperation, WipError,
};

use super::{mock_builder, number, props};

/// Root name that counts how often its qualified form is rendered.
struct CountingRoot {
    name: String,
    renders: Arc<AtomicUsize>,
}

impl NameBuilder for CountingRoot {
    fn short_name(&self) -> &str {
        &self.name
    }

    fn append_qualified(&self, out: &mut String) {
        self.renders.fetch_add(1, Ordering::SeqCst);
        out.push_str(&self.name);
    }
}

fn counting_root(name: &str) -> (NameRef, Arc<AtomicUsize>) {
    let renders = Arc::new(AtomicUsize::new(0));
    let root: NameRef = Arc::new(CountingRoot {
        name: name.to_string(),
        renders: Arc::clone(&renders),
    });
    (root, renders)
}

#[test]
fn qualified_name_is_rendered_once_per_variable() {
    let (_, builder) = mock_builder();
    let (a, renders) = counting_root("a");
    let b = PropertyNameScope::new(a).property("b");
    let two = PropertyNameScope::new(b).property("2");

    let var = builder.create_variable(number("7"), two);
    assert_eq!(renders.load(Ordering::SeqCst), 0);
    assert_eq!(var.short_name(), "2");

    assert_eq!(var.fully_qualified_name(), "a.b[2]");
    assert_eq!(var.fully_qualified_name(), "a.b[2]");
    let clone = var.clone();
    assert_eq!(clone.fully_qualified_name(), "a.b[2]");
    assert_eq!(renders.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn loaded_properties_render_names_lazily() {
    let (source, builder) = mock_builder();
    source.insert(
        "obj",
        props(vec![("x", number("1")), ("y", number("2")), ("z", number("3"))]),
    );
    let (root, renders) = counting_root("o");
    let var = builder.create_variable(
        RemoteValueRecord::object(RemoteType::Object, "Object", "obj", true),
        root,
    );

    let snapshot = var.value().as_object().unwrap().properties().await.unwrap();
    // Wrapping the three properties renders nothing; the mock's call log may.
    let before = renders.load(Ordering::SeqCst);
    assert!(before <= 1, "rendered {before} times");

    assert_eq!(snapshot.find("y").unwrap().fully_qualified_name(), "o.y");
    assert_eq!(snapshot.find("y").unwrap().fully_qualified_name(), "o.y");
    assert_eq!(renders.load(Ordering::SeqCst), before + 1);
}

#[test]
fn property_paths_quote_and_index() {
    let (_, builder) = mock_builder();
    let scope = PropertyNameScope::new(RootName::new("window"));

    let cases = [
        ("location", "window.location"),
        ("0", "window[0]"),
        ("my-key", r#"window["my-key"]"#),
        ("1.5", r#"window["1.5"]"#),
        ("$jq", "window.$jq"),
    ];
    for (name, expected) in cases {
        let var = builder.create_variable(number("0"), scope.property(name));
        assert_eq!(var.fully_qualified_name(), expected);
        assert_eq!(var.short_name(), name);
    }
}

#[test]
fn expression_roots_are_wrapped_before_property_access() {
    let (_, builder) = mock_builder();
    let scope = PropertyNameScope::new(RootName::expression("foo()"));
    let var = builder.create_variable(number("0"), scope.property("bar"));
    assert_eq!(var.fully_qualified_name(), "(foo()).bar");
}

#[test]
fn set_value_always_fails() {
    let (source, builder) = mock_builder();
    let variables = [
        builder.create_variable(number("1"), RootName::new("n")),
        builder.create_variable(
            RemoteValueRecord::object(RemoteType::Object, "Object", "obj", true),
            RootName::new("o"),
        ),
        builder.create_variable(
            RemoteValueRecord::object(RemoteType::Array, "Array", "arr", true),
            RootName::new("xs"),
        ),
    ];

    for var in &variables {
        assert!(var.is_readable());
        assert!(!var.is_mutable());
        let err = var.set_value("2").unwrap_err();
        assert!(matches!(
            err,
            WipError::Unsupported(UnsupportedOperation::SetValue)
        ));
        assert!(err.is_unsupported());
    }
    assert_eq!(source.total_calls(), 0);
}
