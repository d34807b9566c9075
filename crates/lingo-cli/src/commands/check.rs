//! Implementation of the `lingo check` command.

use std::fs::{read_dir, read_to_string};
use std::path::{Path, PathBuf};

use lingo::resource::{LoadError, Resource, TemplateIssue};
use miette::{miette, IntoDiagnostic, Report, Result};
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::output::table::format_check_table;
use crate::output::TemplateDiagnostic;

/// Arguments for the check command.
#[derive(Debug, clap::Args)]
pub struct CheckArgs {
    /// Resource files (.json) or directories of them
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// One problem found in a resource file, for JSON output.
#[derive(Debug, Serialize)]
struct CheckProblem {
    file: String,
    key: Option<String>,
    line: Option<usize>,
    column: Option<usize>,
    message: String,
}

/// Outcome of checking one file.
struct FileReport {
    path: PathBuf,
    keys: usize,
    issues: Vec<TemplateIssue>,
    failure: Option<LoadError>,
}

impl FileReport {
    fn error_count(&self) -> usize {
        self.issues.iter().map(|issue| issue.errors.len()).sum::<usize>()
            + usize::from(self.failure.is_some())
    }
}

/// Run the check command.
pub fn run_check(args: CheckArgs) -> Result<i32> {
    let files = collect_files(&args.paths)?;
    if files.is_empty() {
        return Err(miette!("no .json resource files found"));
    }

    let reports = files
        .iter()
        .map(PathBuf::as_path)
        .map(check_file)
        .collect::<Result<Vec<_>>>()?;
    let failed = reports.iter().any(|report| report.error_count() > 0);

    if args.json {
        let problems: Vec<CheckProblem> = reports.iter().flat_map(problems_of).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&problems).into_diagnostic()?
        );
    } else {
        for report in &reports {
            print_report(report);
        }
        let rows: Vec<(String, usize, usize)> = reports
            .iter()
            .map(|report| {
                (
                    report.path.display().to_string(),
                    report.keys,
                    report.error_count(),
                )
            })
            .collect();
        println!("{}", format_check_table(&rows));
        if failed {
            println!("{}", "check failed".red().bold());
        } else {
            println!("{}", "all templates parsed".green().bold());
        }
    }

    Ok(if failed {
        exitcode::DATAERR
    } else {
        exitcode::OK
    })
}

/// Expands directories into the `.json` files directly inside them.
fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut found = Vec::new();
            for entry in read_dir(path).into_diagnostic()? {
                let entry_path = entry.into_diagnostic()?.path();
                if entry_path.extension().is_some_and(|ext| ext == "json") {
                    found.push(entry_path);
                }
            }
            found.sort();
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

/// Compiles a file leniently so every broken template is reported, not just
/// the first.
fn check_file(path: &Path) -> Result<FileReport> {
    let content = read_to_string(path)
        .into_diagnostic()
        .map_err(|e| miette!("Failed to read {}: {}", path.display(), e))?;
    let locale = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default();

    Ok(match Resource::from_json_str(locale, &content, false) {
        Ok((resource, issues)) => FileReport {
            path: path.to_path_buf(),
            keys: resource.len(),
            issues,
            failure: None,
        },
        Err(failure) => FileReport {
            path: path.to_path_buf(),
            keys: 0,
            issues: Vec::new(),
            failure: Some(failure),
        },
    })
}

fn print_report(report: &FileReport) {
    if let Some(failure) = &report.failure {
        eprintln!(
            "{} {}: {failure}",
            "error:".red().bold(),
            report.path.display()
        );
    }
    for issue in &report.issues {
        for error in &issue.errors {
            let name = format!("{}#{}", report.path.display(), issue.key);
            let diagnostic = TemplateDiagnostic::new(name, &issue.template, error);
            eprintln!("{:?}", Report::new(diagnostic));
        }
    }
}

fn problems_of(report: &FileReport) -> Vec<CheckProblem> {
    let file = report.path.display().to_string();
    let mut problems: Vec<CheckProblem> = report
        .failure
        .iter()
        .map(|failure| CheckProblem {
            file: file.clone(),
            key: None,
            line: None,
            column: None,
            message: failure.to_string(),
        })
        .collect();
    for issue in &report.issues {
        for error in &issue.errors {
            let (line, column) = error.position(&issue.template);
            problems.push(CheckProblem {
                file: file.clone(),
                key: Some(issue.key.clone()),
                line: Some(line),
                column: Some(column),
                message: error.message.clone(),
            });
        }
    }
    problems
}
