//! Integration tests for the output runtimes.

use chrono::{TimeDelta, TimeZone, Utc};
use chrono_tz::Europe::Berlin;
use lingo::interpreter::eval_template;
use lingo::parser::parse_template;
use lingo::runtime::{HTML, JS, MARKDOWN, by_kind, escape_html, escape_js};
use lingo::{Runtime, Value, Vars, vars};

fn render(runtime: &dyn Runtime, template: &str, vars: &Vars) -> String {
    let node = parse_template(template).unwrap();
    let value = eval_template(&node, runtime, "en-GB", vars).unwrap();
    runtime.post_process(&value)
}

// =============================================================================
// Markdown
// =============================================================================

#[test]
fn markdown_wraps_emphasis() {
    let v = vars! { "name" => "Ada" };
    assert_eq!(render(&MARKDOWN, "{bold(name)} {italic(name)}", &v), "**Ada** *Ada*");
}

#[test]
fn markdown_emphasis_of_nothing_is_nothing() {
    assert_eq!(render(&MARKDOWN, "[{bold('')}]", &Vars::new()), "[]");
}

#[test]
fn markdown_link_escapes_label_and_href() {
    assert_eq!(
        render(&MARKDOWN, "{link('a<b', '/p?x=1&y=2')}", &Vars::new()),
        "[a&lt;b](/p?x=1&amp;y=2)"
    );
}

#[test]
fn markdown_does_not_escape_data() {
    let v = vars! { "name" => "<script>" };
    assert_eq!(render(&MARKDOWN, "Hi {name}", &v), "Hi <script>");
}

// =============================================================================
// HTML
// =============================================================================

#[test]
fn html_escapes_data_once() {
    let v = vars! { "name" => "<Ada>" };
    assert_eq!(
        render(&HTML, "{bold(name)} & {name}", &v),
        "<b>&lt;Ada&gt;</b> &amp; &lt;Ada&gt;"
    );
}

#[test]
fn html_link_with_and_without_target() {
    let v = Vars::new();
    assert_eq!(
        render(&HTML, "{link('Docs', 'https://x.io/?a=1&b=2', '_blank')}", &v),
        r#"<a href="https://x.io/?a=1&amp;b=2" target="_blank">Docs</a>"#
    );
    assert_eq!(
        render(&HTML, "{link('Home', '/home')}", &v),
        r#"<a href="/home">Home</a>"#
    );
}

#[test]
fn html_escapes_every_slice_element() {
    let v = vars! { "xs" => vec!["<a>", "&"] };
    assert_eq!(render(&HTML, "{join(xs, ' ')}|{xs}", &v), "&lt;a&gt; &amp;|&lt;a&gt;&amp;");
}

#[test]
fn html_italic() {
    let v = vars! { "q" => "x\"y" };
    assert_eq!(render(&HTML, "{italic(q)}", &v), "<i>x&#34;y</i>");
}

// =============================================================================
// JavaScript
// =============================================================================

#[test]
fn js_escapes_for_string_literals() {
    let v = vars! { "q" => r#"say "hi" </script>"# };
    assert_eq!(
        render(&JS, "'{q}'", &v),
        r#"\'say \"hi\" \u003C/script\u003E\'"#
    );
}

#[test]
fn js_markup_is_not_escaped_twice() {
    let v = vars! { "q" => "it's" };
    assert_eq!(render(&JS, "{bold(q)}", &v), r"<b>it\'s</b>");
}

// =============================================================================
// Escaping
// =============================================================================

#[test]
fn escape_html_covers_text_and_attributes() {
    assert_eq!(escape_html("<a href='x'>&\""), "&lt;a href=&#39;x&#39;&gt;&amp;&#34;");
    assert_eq!(escape_html("a\0b"), "a\u{FFFD}b");
    assert_eq!(escape_html("日本語"), "日本語");
}

#[test]
fn escape_js_covers_quotes_and_controls() {
    assert_eq!(escape_js(r"a\b"), r"a\\b");
    assert_eq!(escape_js("tab\there"), r"tab\u0009here");
    assert_eq!(escape_js("x=1&y"), r"x\u003D1\u0026y");
    assert_eq!(escape_js("a\u{2028}b\u{2029}c"), r"a\u2028b\u2029c");
}

// =============================================================================
// Padding
// =============================================================================

#[test]
fn padding_fills_to_the_length() {
    let v = vars! { "n" => 7 };
    assert_eq!(render(&MARKDOWN, "[{pad_left(n, 3, '0')}]", &v), "[007]");
    assert_eq!(render(&MARKDOWN, "[{pad_right('ab', 4)}]", &v), "[ab  ]");
}

#[test]
fn oversized_padding_adds_nothing() {
    let v = vars! { "huge" => i64::MAX, "big" => 1_i64 << 21 };
    assert_eq!(render(&MARKDOWN, "[{pad_left('ab', huge)}]", &v), "[ab]");
    assert_eq!(render(&MARKDOWN, "[{pad_right('ab', big, '-')}]", &v), "[ab]");
}

// =============================================================================
// Runtime lookup and nested translation messages
// =============================================================================

#[test]
fn runtimes_by_kind() {
    assert_eq!(by_kind("md").unwrap().kind(), "markdown");
    assert_eq!(by_kind("markdown").unwrap().kind(), "markdown");
    assert_eq!(by_kind("html").unwrap().kind(), "html");
    assert_eq!(by_kind("javascript").unwrap().kind(), "js");
    assert!(by_kind("xml").is_none());
}

#[test]
fn t_message_forwards_value_and_opt() {
    let message = MARKDOWN.t(&Value::from("unit.apples"), &Value::Float(2.5), &Value::from("short"));
    assert_eq!(message.key, "unit.apples");
    assert_eq!(message.vars.get("value"), Some(&Value::Float(2.5)));
    assert_eq!(message.vars.get("opt"), Some(&Value::from("short")));
    assert!(!message.vars.contains("hours"));
}

#[test]
fn t_message_breaks_durations_down() {
    let message = MARKDOWN.t(
        &Value::from("unit.duration"),
        &Value::from(TimeDelta::seconds(2 * 86_400 + 7322) + TimeDelta::milliseconds(250)),
        &Value::empty(),
    );
    let get = |name: &str| message.vars.get(name).cloned();
    assert_eq!(get("years"), Some(Value::Int(0)));
    assert_eq!(get("days"), Some(Value::Int(2)));
    assert_eq!(get("hours"), Some(Value::Int(2)));
    assert_eq!(get("minutes"), Some(Value::Int(2)));
    assert_eq!(get("seconds"), Some(Value::Int(2)));
    assert_eq!(get("millis"), Some(Value::Int(250)));
    assert_eq!(get("micros"), Some(Value::Int(0)));
}

#[test]
fn t_message_breaks_times_down() {
    let when = Berlin.with_ymd_and_hms(2024, 3, 1, 12, 30, 45).unwrap();
    let message = MARKDOWN.t(&Value::from("date.long"), &Value::from(when), &Value::empty());
    let get = |name: &str| message.vars.get(name).cloned();
    assert_eq!(get("year"), Some(Value::Int(2024)));
    assert_eq!(get("month"), Some(Value::Int(3)));
    assert_eq!(get("day"), Some(Value::Int(1)));
    assert_eq!(get("weekday"), Some(Value::from("friday")));
    assert_eq!(get("hour"), Some(Value::Int(12)));
    assert_eq!(get("second"), Some(Value::Int(45)));
    assert_eq!(get("zone_name"), Some(Value::from("Europe/Berlin")));
    assert_eq!(get("zone_name_short"), Some(Value::from("CET")));
    assert_eq!(get("zone_offset"), Some(Value::from("+01:00")));

    let utc = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let message = MARKDOWN.t(&Value::from("date.long"), &Value::from(utc), &Value::empty());
    assert_eq!(message.vars.get("zone_name"), Some(&Value::from("UTC")));
}
