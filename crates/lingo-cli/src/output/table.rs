//! Table formatting utilities for CLI output.

use comfy_table::{presets, Cell, CellAlignment, ContentArrangement, Table};

/// Coverage data for a single locale.
pub struct LocaleCoverage {
    /// Locale tag (e.g., "de", "pt-BR").
    pub locale: String,
    /// Number of source keys the locale translates.
    pub translated: usize,
    /// Source keys the locale lacks.
    pub missing: Vec<String>,
    /// Keys the locale has that the source does not.
    pub extra: Vec<String>,
}

impl LocaleCoverage {
    /// Translated share of the source keys, in percent.
    pub fn percent(&self, source_count: usize) -> f64 {
        if source_count == 0 {
            return 100.0;
        }
        self.translated as f64 * 100.0 / source_count as f64
    }
}

/// Format coverage data as an ASCII table.
pub fn format_coverage_table(source_count: usize, coverage: &[LocaleCoverage]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Locale", "Coverage", "Missing", "Extra"]);

    for locale in coverage {
        table.add_row(vec![
            Cell::new(&locale.locale),
            Cell::new(format!(
                "{}/{} ({:.0}%)",
                locale.translated,
                source_count,
                locale.percent(source_count)
            ))
            .set_alignment(CellAlignment::Right),
            Cell::new(locale.missing.len()).set_alignment(CellAlignment::Right),
            Cell::new(locale.extra.len()).set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

/// Format the issues found by `check` as a summary table, one row per file.
pub fn format_check_table(rows: &[(String, usize, usize)]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["File", "Keys", "Errors"]);

    for (file, keys, errors) in rows {
        table.add_row(vec![
            Cell::new(file),
            Cell::new(keys).set_alignment(CellAlignment::Right),
            Cell::new(errors).set_alignment(CellAlignment::Right),
        ]);
    }

    table
}
