//! Integration tests for messages and the global catalog.

use std::error::Error;

use lingo::runtime::MARKDOWN;
use lingo::{Catalog, Message, Value, global, vars};

#[test]
fn from_id_splits_the_context() {
    let message = Message::from_id("menu:open");
    assert_eq!(message.key, "open");
    assert_eq!(message.vars.get("context"), Some(&Value::from("menu")));

    let plain = Message::from_id("open");
    assert_eq!(plain.key, "open");
    assert!(plain.vars.is_empty());
}

#[test]
fn debug_string_lists_variables_by_name() {
    assert_eq!(Message::new("k").debug_string(), "k");
    let message = Message::new("k").with("zeta", 1).with("alpha", "a");
    assert_eq!(message.debug_string(), "k: {alpha: a, zeta: 1}");
}

#[test]
fn messages_compare_by_key() {
    assert_eq!(Message::new("k").with("n", 1), Message::new("k").with("n", 2));
    assert_ne!(Message::new("k"), Message::new("j"));
}

#[test]
fn with_vars_merges() {
    let message = Message::new("k")
        .with("a", 1)
        .with_vars(vars! { "a" => 2, "b" => 3 });
    assert_eq!(message.vars.get("a"), Some(&Value::Int(2)));
    assert_eq!(message.vars.len(), 2);
}

// The global catalog is process-wide, so everything touching it lives in one
// test.
#[test]
fn messages_render_through_the_global_catalog() {
    global::set_catalog(Catalog::builder().error_locale("de".to_string()).build());
    global::catalog()
        .load_json_str(
            "de",
            r#"{"disk.full": "Kein Platz mehr auf {bold(drive)}", "hi": "Hallo"}"#,
        )
        .unwrap();

    let message = Message::new("disk.full").with("drive", "C:");
    assert_eq!(message.to_string(), "Kein Platz mehr auf **C:**");

    let error: Box<dyn Error> = Box::new(message);
    assert_eq!(error.to_string(), "Kein Platz mehr auf **C:**");

    let missing = Message::new("disk.gone").with("drive", "D:");
    assert_eq!(missing.to_string(), "disk.gone: {drive: D:}");

    assert_eq!(global::closest_locale(&["de-AT"]), ("de".to_string(), true));
    assert_eq!(
        global::translate(&MARKDOWN, "de", &Message::new("hi")).unwrap(),
        "Hallo"
    );
    assert_eq!(global::t(&MARKDOWN, "de", &Message::new("nope")), "nope");
}
