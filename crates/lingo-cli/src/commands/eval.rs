//! Implementation of the `lingo eval` command.

use std::path::PathBuf;

use lingo::interpreter::{eval, EvalContext};
use lingo::parser::{parse_template, sprint};
use lingo::resource::DEFAULT_FALLBACK_LOCALE;
use lingo::runtime::by_kind;
use lingo::{Catalog, Message, Value, Vars};
use miette::{miette, IntoDiagnostic, Report};
use serde::Serialize;

use crate::output::TemplateDiagnostic;

/// Arguments for the eval command.
#[derive(Debug, clap::Args)]
#[command(group(clap::ArgGroup::new("input").required(true).args(["template", "key"])))]
pub struct EvalArgs {
    /// Template string to evaluate
    #[arg(long)]
    pub template: Option<String>,

    /// Translation key to render from --resources
    #[arg(long, requires = "resources")]
    pub key: Option<String>,

    /// Output runtime (markdown, html or js)
    #[arg(long, default_value = "markdown")]
    pub runtime: String,

    /// Locale for evaluation (e.g., en-GB, de, ru)
    #[arg(long, default_value = DEFAULT_FALLBACK_LOCALE)]
    pub locale: String,

    /// Directory of `<locale>.json` resource files
    #[arg(long)]
    pub resources: Option<PathBuf>,

    /// Variables in name=value format (repeatable)
    #[arg(long = "var", value_parser = parse_key_val)]
    pub vars: Vec<(String, String)>,

    /// Print the parsed template instead of evaluating it
    #[arg(long, conflicts_with = "key")]
    pub ast: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for eval results.
#[derive(Serialize)]
pub struct EvalResult {
    pub result: String,
    pub locale: String,
    pub runtime: &'static str,
}

/// Parse a name=value variable string.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid variable format '{s}': expected name=value"))?;
    Ok((name.to_string(), value.to_string()))
}

/// Integers and floats become numbers, anything else a string.
fn parse_value(raw: String) -> Value {
    if let Ok(n) = raw.parse::<i64>() {
        Value::from(n)
    } else if let Ok(f) = raw.parse::<f64>() {
        Value::from(f)
    } else {
        Value::from(raw)
    }
}

/// Run the eval command.
pub fn run_eval(args: EvalArgs) -> miette::Result<i32> {
    let runtime = by_kind(&args.runtime).ok_or_else(|| {
        miette!(
            "unknown runtime '{}': expected markdown, html or js",
            args.runtime
        )
    })?;

    let catalog = Catalog::builder().fallback_locale(args.locale.clone()).build();
    if let Some(dir) = &args.resources {
        catalog.load_dir(dir).into_diagnostic()?;
    }
    let (locale, matched) = catalog.closest_locale(&[&args.locale]);
    if args.resources.is_some() && !matched {
        tracing::warn!(locale = %args.locale, "no resources for locale");
    }

    let vars: Vars = args
        .vars
        .into_iter()
        .map(|(name, value)| (name, parse_value(value)))
        .collect();

    let rendered = match (&args.template, &args.key) {
        (Some(template), _) => {
            let node = match parse_template(template) {
                Ok(node) => node,
                Err(error) => {
                    for syntax_error in &error.errors {
                        let diagnostic =
                            TemplateDiagnostic::new("template".into(), template, syntax_error);
                        eprintln!("{:?}", Report::new(diagnostic));
                    }
                    return Ok(exitcode::DATAERR);
                }
            };
            if args.ast {
                println!("{}", sprint(&node));
                return Ok(exitcode::OK);
            }
            let snapshot = catalog.snapshot();
            let mut ctx = EvalContext::new(runtime, &locale, &vars)
                .with_max_depth(catalog.max_depth());
            if let Some(resource) = snapshot.resource(&locale) {
                ctx = ctx.with_resource(resource);
            }
            eval(&node, &mut ctx)
                .map(|value| runtime.post_process(&value))
                .map_err(|e| e.to_string())
        }
        (None, Some(key)) => {
            let message = Message::new(key.as_str()).with_vars(vars);
            catalog
                .translate(runtime, &locale, &message)
                .map_err(|e| e.to_string())
        }
        (None, None) => return Err(miette!("either --template or --key is required")),
    };

    match rendered {
        Ok(result) => {
            if args.json {
                let output = EvalResult {
                    result,
                    locale,
                    runtime: runtime.kind(),
                };
                println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
            } else {
                println!("{result}");
            }
            Ok(exitcode::OK)
        }
        Err(e) => {
            if args.json {
                let output = serde_json::json!({ "error": e });
                eprintln!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
            } else {
                eprintln!("Evaluation error: {e}");
            }
            Ok(exitcode::DATAERR)
        }
    }
}

