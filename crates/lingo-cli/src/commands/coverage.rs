//! Coverage command implementation.

use std::collections::HashSet;
use std::path::PathBuf;

use clap::Args;
use lingo::resource::DEFAULT_FALLBACK_LOCALE;
use lingo::Catalog;
use miette::{miette, IntoDiagnostic, Result};
use serde::Serialize;

use crate::output::table::{format_coverage_table, LocaleCoverage};

/// Arguments for the coverage command.
#[derive(Debug, Args)]
pub struct CoverageArgs {
    /// Directory of `<locale>.json` resource files.
    pub dir: PathBuf,

    /// Locale whose keys every other locale should translate.
    #[arg(long, default_value = DEFAULT_FALLBACK_LOCALE)]
    pub source: String,

    /// Locales to report on (comma-separated). Defaults to every loaded locale.
    #[arg(long, value_delimiter = ',')]
    pub locale: Vec<String>,

    /// Exit with non-zero code if any translation is incomplete.
    #[arg(long)]
    pub strict: bool,

    /// Output results as JSON.
    #[arg(long)]
    pub json: bool,
}

/// JSON output format for coverage data.
#[derive(Debug, Serialize)]
struct CoverageJson {
    locale: String,
    translated: usize,
    total: usize,
    missing: Vec<String>,
    extra: Vec<String>,
}

/// Run the coverage command.
pub fn run_coverage(args: CoverageArgs) -> Result<i32> {
    // Templates with syntax errors still count as translated; `check` reports them.
    let catalog = Catalog::builder().strict(false).build();
    catalog.load_dir(&args.dir).into_diagnostic()?;

    if !catalog.locales().contains(&args.source) {
        return Err(miette!(
            "source locale '{}' not found in {}",
            args.source,
            args.dir.display()
        ));
    }
    let source_keys = catalog.keys(&args.source);
    let source_set: HashSet<&str> = source_keys.iter().map(String::as_str).collect();
    let source_count = source_keys.len();

    let locales: Vec<String> = if args.locale.is_empty() {
        catalog
            .locales()
            .into_iter()
            .filter(|locale| *locale != args.source)
            .collect()
    } else {
        args.locale.clone()
    };

    let coverage_data: Vec<LocaleCoverage> = locales
        .into_iter()
        .map(|locale| {
            let keys = catalog.keys(&locale);
            let key_set: HashSet<&str> = keys.iter().map(String::as_str).collect();
            let missing: Vec<String> = source_keys
                .iter()
                .filter(|key| !key_set.contains(key.as_str()))
                .cloned()
                .collect();
            let extra: Vec<String> = keys
                .iter()
                .filter(|key| !source_set.contains(key.as_str()))
                .cloned()
                .collect();
            LocaleCoverage {
                locale,
                translated: source_count - missing.len(),
                missing,
                extra,
            }
        })
        .collect();

    let any_incomplete = coverage_data.iter().any(|c| !c.missing.is_empty());

    if args.json {
        let json_data: Vec<CoverageJson> = coverage_data
            .iter()
            .map(|c| CoverageJson {
                locale: c.locale.clone(),
                translated: c.translated,
                total: source_count,
                missing: c.missing.clone(),
                extra: c.extra.clone(),
            })
            .collect();

        let json_output = serde_json::to_string_pretty(&json_data).into_diagnostic()?;
        println!("{json_output}");
    } else {
        let table = format_coverage_table(source_count, &coverage_data);
        println!("{table}");

        for locale_coverage in &coverage_data {
            if !locale_coverage.missing.is_empty() {
                println!("\nMissing in {}:", locale_coverage.locale);
                for key in &locale_coverage.missing {
                    println!("  - {key}");
                }
            }
        }
    }

    if args.strict && any_incomplete {
        Ok(exitcode::DATAERR)
    } else {
        Ok(exitcode::OK)
    }
}
