//! Integration tests for interpreter evaluation.

use chrono::{TimeDelta, TimeZone, Utc};
use lingo::interpreter::{EvalContext, EvalError, eval, eval_template};
use lingo::parser::{MAX_NESTING, parse_template, parse_template_lenient};
use lingo::runtime::MARKDOWN;
use lingo::{Runtime, Type, Value, Vars, vars};

fn render_in(template: &str, locale: &str, vars: &Vars) -> String {
    let node = parse_template(template).unwrap();
    let value = eval_template(&node, &MARKDOWN, locale, vars).unwrap();
    MARKDOWN.post_process(&value)
}

fn render(template: &str, vars: &Vars) -> String {
    render_in(template, "en-GB", vars)
}

fn eval_error(template: &str, vars: &Vars) -> EvalError {
    let node = parse_template(template).unwrap();
    eval_template(&node, &MARKDOWN, "en-GB", vars).unwrap_err()
}

// =============================================================================
// Coercion
// =============================================================================

#[test]
fn arithmetic_coercion_vectors() {
    let v = vars! { "xs" => vec![1, 2, 3] };
    let cases = [
        ("{2 + 3}", "5"),
        ("{'A' + 3}", "A3"),
        ("{3 + 'A'}", "3A"),
        ("{'A' * 3}", "AAA"),
        ("{3 * 'A'}", "AAA"),
        ("{'A' * '2'}", "AA"),
        ("{'2' * 'A'}", "AA"),
        ("{'A' * 'AA'}", ""),
        ("{xs * xs}", "9"),
        ("{1 / 0}", "0"),
    ];
    for (template, expected) in cases {
        assert_eq!(render(template, &v), expected, "{template}");
    }
}

#[test]
fn numeric_arithmetic() {
    let v = Vars::new();
    assert_eq!(render("{10 / 3}", &v), "3");
    assert_eq!(render("{7.5 / 2}", &v), "3.75");
    assert_eq!(render("{1.5 + 1}", &v), "2.5");
    assert_eq!(render("{7 % 3}", &v), "1");
    assert_eq!(render("{7 % 0}", &v), "0");
    assert_eq!(render("{1.0 / 0}", &v), "0");
    assert_eq!(render("{1_000 * 2}", &v), "2000");
    assert_eq!(render("{'5' - 2}", &v), "3");
}

#[test]
fn integer_overflow_wraps() {
    let v = vars! { "max" => i64::MAX };
    assert_eq!(render("{max + 1}", &v), i64::MIN.to_string());
}

#[test]
fn comparisons_render_booleans() {
    let v = vars! { "n" => 1 };
    assert_eq!(render("{1 < 2}", &v), "true");
    assert_eq!(render("{'b' > 'a'}", &v), "true");
    assert_eq!(render("{2 == 2.0}", &v), "true");
    assert_eq!(render("{n == 1}", &v), "true");
    assert_eq!(render("{n != 1}", &v), "false");
    assert_eq!(render("{3 >= 3}", &v), "true");
    assert_eq!(render("{'10' <= 9}", &v), "true");
}

#[test]
fn logic_short_circuits() {
    let v = vars! { "x" => "set" };
    assert_eq!(render("{0 or 'x'}", &v), "true");
    assert_eq!(render("{'' and x}", &v), "false");
    assert_eq!(render("{x and 1}", &v), "true");
    // The right side is never evaluated, so its error is never raised.
    assert_eq!(render("{1 or 5[0:1]}", &v), "true");
}

#[test]
fn unary_operators() {
    let v = vars! { "xs" => vec![1, 2, 3] };
    assert_eq!(render("{-'5'}", &v), "-5");
    assert_eq!(render("{+xs}", &v), "3");
    assert_eq!(render("{!''}", &v), "true");
    assert_eq!(render("{-2.5}", &v), "-2.5");
    assert_eq!(render("{+(1 == 1)}", &v), "1");
}

#[test]
fn unresolved_identifiers_are_empty() {
    assert_eq!(render("[{missing}]", &Vars::new()), "[]");
}

#[test]
fn builtin_names_shadow_variables() {
    let v = vars! { "len" => "variable" };
    assert_eq!(render("{len}", &v), "len");
}

// =============================================================================
// Indexing and slicing
// =============================================================================

#[test]
fn string_indexing_is_by_character() {
    let v = vars! { "s" => "日本語" };
    assert_eq!(render("{s[0]}|{s[1]}|{s[2]}", &v), "日|本|語");
    assert_eq!(render("{s[-1]}", &v), "語");
    assert_eq!(render("{s[3]}", &v), "");
    assert_eq!(render("{s[:]}", &v), "日本語");
}

#[test]
fn negative_index_counts_from_the_end() {
    let v = vars! { "xs" => vec![10, 20, 30] };
    assert_eq!(render("{xs[-1]}", &v), render("{xs[2]}", &v));
    assert_eq!(render("{xs[3]}", &v), "");
    assert_eq!(render("{xs[-4]}", &v), "");
}

#[test]
fn out_of_range_slices_are_empty() {
    let v = vars! { "xs" => vec![1, 2, 3] };
    assert_eq!(render("{xs[1:]}", &v), "23");
    assert_eq!(render("{xs[5:9]}", &v), "");
    assert_eq!(render("{xs[2:1]}", &v), "");
    assert_eq!(render("{xs[-1:]}", &v), "");
    assert_eq!(render("{xs[0:4]}", &v), "");
}

#[test]
fn slices_chain() {
    let v = vars! { "slice_var_5" => vec![1, 2, 3, 4, 5] };
    assert_eq!(render("{slice_var_5[1:4][1]}", &v), "3");
}

#[test]
fn join_a_sliced_string() {
    let v = vars! { "string_var_jp" => "日本語" };
    assert_eq!(
        render(
            "{join(string_var_jp[:-1], ', ')}, or {string_var_jp[-1]}",
            &v
        ),
        "日, 本, or 語"
    );
}

#[test]
fn slicing_a_number_fails() {
    let v = vars! { "n" => 5 };
    assert_eq!(
        eval_error("{n[1:2]}", &v),
        EvalError::CannotSlice { kind: Type::Int }
    );
}

#[test]
fn slice_bounds_must_be_integers() {
    let v = vars! { "xs" => vec![1, 2, 3] };
    assert_eq!(
        eval_error("{xs['a':2]}", &v),
        EvalError::InvalidSliceBound {
            bound: "start",
            kind: Type::String
        }
    );
    assert_eq!(
        eval_error("{xs[0:1.5]}", &v),
        EvalError::InvalidSliceBound {
            bound: "end",
            kind: Type::Float
        }
    );
}

#[test]
fn bare_range_is_an_error() {
    assert_eq!(
        eval_error("{1:2}", &Vars::new()),
        EvalError::UnexpectedOperator { op: ":".into() }
    );
}

// =============================================================================
// Select
// =============================================================================

#[test]
fn select_picks_the_matching_option() {
    let template = "{n => (1 = 'second', 5 = 'Hello', _ = 'seconds')}";
    assert_eq!(render(template, &vars! { "n" => 5 }), "Hello");
}

#[test]
fn select_falls_back_to_the_wildcard() {
    let template = "{n => (1 = 'second', _ = 'seconds')}";
    assert_eq!(render(template, &vars! { "n" => 3 }), "seconds");
}

#[test]
fn select_without_match_is_empty() {
    let template = "{n => (1 = 'second', 2 = 'seconds')}";
    assert_eq!(render(template, &vars! { "n" => 3 }), "");
}

#[test]
fn select_compares_across_types() {
    let template = "{n => ('1' = 'text one', _ = 'other')}";
    assert_eq!(render(template, &vars! { "n" => 1 }), "text one");
}

// =============================================================================
// Calls
// =============================================================================

#[test]
fn string_builtins() {
    let v = vars! { "xs" => vec!["a", "b"] };
    assert_eq!(render("{len('日本語')}", &v), "3");
    assert_eq!(render("{len(xs)}", &v), "2");
    assert_eq!(render("{split('a,b,c', ',')[1]}", &v), "b");
    assert_eq!(render("{join(split('a-b', '-'), '+')}", &v), "a+b");
    assert_eq!(render("{join(split('ab', ''), ' ')}", &v), "a b");
    assert_eq!(render("{pad_left(7, 3, '0')}", &v), "007");
    assert_eq!(render("[{pad_right('ab', 4)}]", &v), "[ab  ]");
    assert_eq!(render("{pad_left('x', 5, 'ab')}", &v), "ababx");
    assert_eq!(render("{trim_left('--x', '-')}", &v), "-x");
    assert_eq!(render("{trim_right('x..', '.')}", &v), "x.");
}

#[test]
fn number_builtins() {
    let v = Vars::new();
    assert_eq!(render("{integer(3.75)}", &v), "3");
    assert_eq!(render("{fraction(3.75)}", &v), "0.75");
    assert_eq!(render("{fraction(3.74, 0.5)}", &v), "0.5");
    assert_eq!(render("{abs(-4)}", &v), "4");
    assert_eq!(render("{abs(-2.5)}", &v), "2.5");
}

#[test]
fn plural_uses_the_locale() {
    let v = vars! { "n" => 5 };
    assert_eq!(render_in("{plural(1)}", "en-GB", &v), "one");
    assert_eq!(render_in("{plural(n)}", "en-GB", &v), "other");
    assert_eq!(render_in("{plural(n)}", "ru", &v), "many");
    assert_eq!(render_in("{plural(2)}", "ru_RU", &v), "few");
}

#[test]
fn plural_of_unknown_locales_uses_english_rules() {
    assert_eq!(render_in("{plural(1)}", "xx", &Vars::new()), "one");
    assert_eq!(render_in("{plural(1)}", "not a locale", &Vars::new()), "one");
    assert_eq!(render_in("{plural(3)}", "xx-YY", &Vars::new()), "other");
}

#[test]
fn callee_can_be_computed() {
    let v = vars! { "f" => "abs" };
    assert_eq!(render("{f(-2)}", &v), "2");
    assert_eq!(render("{nope(1)}", &v), "");
}

#[test]
fn missing_arguments_are_empty() {
    assert_eq!(render("{join()}", &Vars::new()), "");
    assert_eq!(render("{len()}", &Vars::new()), "0");
}

#[test]
fn t_without_resources_is_empty() {
    assert_eq!(render("[{t('other.key', 1)}]", &Vars::new()), "[]");
}

#[test]
fn argument_errors_propagate() {
    let v = vars! { "n" => 5 };
    assert_eq!(
        eval_error("{len(n[0:1])}", &v),
        EvalError::CannotSlice { kind: Type::Int }
    );
}

// =============================================================================
// Times and durations
// =============================================================================

#[test]
fn times_render_as_rfc3339() {
    let when = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
    let v = vars! { "when" => when };
    assert_eq!(render("{when}", &v), "2024-03-01T12:30:00+00:00");
    assert_eq!(render("{when == when}", &v), "true");
}

#[test]
fn durations_render_human_readable() {
    let v = vars! { "d" => TimeDelta::seconds(3723) };
    assert_eq!(render("{d}", &v), "1h2m3s");
    assert_eq!(render("{-d}", &v), "-1h2m3s");
    assert_eq!(render("{abs(-d)}", &v), "1h2m3s");
}

// =============================================================================
// Invalid trees and depth
// =============================================================================

#[test]
fn invalid_fragments_render_empty() {
    let (node, errors) = parse_template_lenient("a{@}b");
    assert_eq!(errors.len(), 1);
    let value = eval_template(&node, &MARKDOWN, "en-GB", &Vars::new()).unwrap();
    assert_eq!(MARKDOWN.post_process(&value), "ab");
}

#[test]
fn nested_invalid_nodes_fail() {
    let (node, _) = parse_template_lenient("{1 +}");
    assert_eq!(
        eval_template(&node, &MARKDOWN, "en-GB", &Vars::new()),
        Err(EvalError::InvalidNode {
            lexeme: "}".into()
        })
    );
}

#[test]
fn depth_limit_is_enforced() {
    let node = parse_template("{1 + 2 + 3}").unwrap();
    let v = Vars::new();
    let mut ctx = EvalContext::new(&MARKDOWN, "en-GB", &v).with_max_depth(3);
    assert_eq!(
        eval(&node, &mut ctx),
        Err(EvalError::MaxDepthExceeded { limit: 3 })
    );

    let mut ctx = EvalContext::new(&MARKDOWN, "en-GB", &v).with_max_depth(8);
    assert_eq!(eval(&node, &mut ctx).unwrap().to_string(), "6");
    assert_eq!(ctx.depth(), 0);
}

#[test]
fn oversized_repetition_is_empty() {
    let v = vars! { "n" => i64::MAX, "big" => 1_i64 << 21 };
    assert_eq!(render("{'abc' * n}", &v), "");
    assert_eq!(render("{n * 'abc'}", &v), "");
    assert_eq!(render("[{'x' * big}]", &v), "[]");
    assert_eq!(render("{len('x' * 1024)}", &v), "1024");
}

#[test]
fn raw_strings_repeat_like_strings() {
    let v = vars! { "r" => Value::raw("ab") };
    assert_eq!(render("{r * 2}", &v), "abab");
    assert_eq!(render("{3 * r}", &v), "ababab");
}

#[test]
fn floats_use_exponents_at_extreme_magnitudes() {
    assert_eq!(Value::Float(1e21).to_string(), "1e+21");
    assert_eq!(Value::Float(1e-7).to_string(), "1e-07");
    assert_eq!(Value::Float(-2.5e-5).to_string(), "-2.5e-05");
    assert_eq!(Value::Float(1.5e300).to_string(), "1.5e+300");
    assert_eq!(Value::Float(1e20).to_string(), "100000000000000000000");
    assert_eq!(Value::Float(0.0001).to_string(), "0.0001");
    assert_eq!(Value::Float(2.5).to_string(), "2.5");
    assert_eq!(Value::Float(0.0).to_string(), "0");
    assert_eq!(Value::Float(f64::INFINITY).to_string(), "+Inf");
    assert_eq!(render("{0.00001}", &Vars::new()), "1e-05");
}

#[test]
fn longest_accepted_operator_chain_evaluates() {
    let template = format!("{{{}}}", vec!["1"; MAX_NESTING - 1].join(" + "));
    assert_eq!(render(&template, &Vars::new()), (MAX_NESTING - 1).to_string());
}

#[test]
fn root_evaluates_to_a_slice_of_fragments() {
    let node = parse_template("a{1}").unwrap();
    let value = eval_template(&node, &MARKDOWN, "en-GB", &Vars::new()).unwrap();
    assert_eq!(
        value,
        Value::Slice(vec![Value::from("a"), Value::Int(1)])
    );
}
