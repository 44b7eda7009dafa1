// crates/cli/src/presentation.rs
use std::fmt::Write;
use std::path::Path;

use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, Table};
use polyloc_engine::RunReport;
use polyloc_engine::unit::{SourceUnit, UnitId, UnitMetrics, UnitState};
use serde::Serialize;

use crate::options::OutputFormat;

/// Render the run report in the requested format.
///
/// # Errors
/// Returns an error if JSON serialization fails.
pub fn render(report: &RunReport, format: OutputFormat, show_dups: bool) -> crate::error::Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(report, show_dups)),
        OutputFormat::Json => Ok(render_json(report, show_dups)?),
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub files: usize,
    pub units: usize,
    pub total_lines: usize,
    pub blank_lines: usize,
    pub whole_comments: usize,
    pub embedded_comments: usize,
    pub psloc: usize,
    pub lsloc: usize,
}

impl Totals {
    #[must_use]
    pub fn from_report(report: &RunReport) -> Self {
        let mut totals = Self::default();
        for (_, unit) in report.units.iter() {
            let Some(m) = unit.metrics() else { continue };
            totals.units += 1;
            if unit.is_top_level() {
                totals.files += 1;
            }
            totals.total_lines += m.total_lines;
            totals.blank_lines += m.blank_lines;
            totals.whole_comments += m.whole_comments;
            totals.embedded_comments += m.embedded_comments;
            totals.psloc += m.psloc;
            totals.lsloc += m.lsloc;
        }
        totals
    }
}

fn counted(report: &RunReport) -> impl Iterator<Item = (UnitId, &SourceUnit, &UnitMetrics)> {
    report
        .units
        .iter()
        .filter_map(|(id, u)| u.metrics().map(|m| (id, u, m)))
}

fn right(value: usize) -> Cell {
    Cell::new(value).set_alignment(CellAlignment::Right)
}

fn render_table(report: &RunReport, show_dups: bool) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED).set_header(vec![
        "FILE", "LANG", "LINES", "BLANK", "COMMENT", "EMB.CMT", "PSLOC", "LSLOC", "EXEC", "DATA",
    ]);

    for (_, unit, m) in counted(report) {
        table.add_row(vec![
            Cell::new(&unit.name),
            Cell::new(&unit.profile.name),
            right(m.total_lines),
            right(m.blank_lines),
            right(m.whole_comments),
            right(m.embedded_comments),
            right(m.psloc),
            right(m.lsloc),
            right(m.exec_logical),
            right(m.data_logical),
        ]);
    }

    let totals = Totals::from_report(report);
    table.add_row(vec![
        Cell::new(format!("TOTAL ({} files)", totals.files)),
        Cell::new(""),
        right(totals.total_lines),
        right(totals.blank_lines),
        right(totals.whole_comments),
        right(totals.embedded_comments),
        right(totals.psloc),
        right(totals.lsloc),
        Cell::new(""),
        Cell::new(""),
    ]);

    let mut out = format!("polyloc v{}\n{table}\n", crate::VERSION);

    if let Some(complexity) = complexity_table(report) {
        out.push('\n');
        out.push_str(&complexity.to_string());
        out.push('\n');
    }

    if show_dups {
        let groups = report.duplicates();
        if groups.is_empty() {
            out.push_str("\nNo duplicate files.\n");
        } else {
            out.push_str("\nDuplicate files:\n");
            for group in groups {
                let names: Vec<&str> = group
                    .units
                    .iter()
                    .filter_map(|id| report.units.get(*id))
                    .map(|u| u.name.as_str())
                    .collect();
                let _ = writeln!(out, "  ({} lines) {}", group.lines, names.join(", "));
            }
        }
    }

    if !report.skipped.is_empty() {
        let _ = writeln!(
            out,
            "\nSkipped {} files without a language profile.",
            report.skipped.len()
        );
    }
    if !report.errors.is_empty() {
        let _ = writeln!(out, "{} files could not be fully processed.", report.errors.len());
    }
    out
}

fn complexity_table(report: &RunReport) -> Option<Table> {
    let rows: Vec<_> = counted(report)
        .filter_map(|(_, u, m)| m.complexity.map(|c| (u, c)))
        .collect();
    if rows.is_empty() {
        return None;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED).set_header(vec![
        "FILE", "CALC", "COND", "LOGIC", "PREPROC", "ASSIGN", "POINTER",
    ]);
    for (unit, c) in rows {
        table.add_row(vec![
            Cell::new(&unit.name),
            right(c.calc),
            right(c.cond),
            right(c.logic),
            right(c.preproc),
            right(c.assign),
            right(c.pointer),
        ]);
    }
    Some(table)
}

#[derive(Serialize)]
struct JsonUnit<'a> {
    id: UnitId,
    name: &'a str,
    language: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    embedded_of: Option<UnitId>,
    has_embedded_code: bool,
    state: UnitState,
    #[serde(skip_serializing_if = "Option::is_none")]
    metrics: Option<&'a UnitMetrics>,
}

#[derive(Serialize)]
struct JsonError {
    unit: UnitId,
    name: String,
    message: String,
}

#[derive(Serialize)]
struct JsonDuplicate<'a> {
    lines: usize,
    files: Vec<&'a str>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    version: &'static str,
    units: Vec<JsonUnit<'a>>,
    totals: Totals,
    skipped: Vec<&'a Path>,
    errors: Vec<JsonError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duplicates: Option<Vec<JsonDuplicate<'a>>>,
}

fn render_json(report: &RunReport, show_dups: bool) -> serde_json::Result<String> {
    let units = report
        .units
        .iter()
        .map(|(id, u)| JsonUnit {
            id,
            name: &u.name,
            language: &u.profile.name,
            embedded_of: u.embedded_of,
            has_embedded_code: u.has_embedded_code,
            state: u.state(),
            metrics: u.metrics(),
        })
        .collect();

    let errors = report
        .errors
        .iter()
        .map(|e| JsonError {
            unit: e.unit,
            name: e.name.clone(),
            message: e.error.to_string(),
        })
        .collect();

    let duplicates = show_dups.then(|| {
        report
            .duplicates()
            .into_iter()
            .map(|g| JsonDuplicate {
                lines: g.lines,
                files: g
                    .units
                    .iter()
                    .filter_map(|id| report.units.get(*id))
                    .map(|u| u.name.as_str())
                    .collect(),
            })
            .collect()
    });

    let json = JsonReport {
        version: crate::VERSION,
        units,
        totals: Totals::from_report(report),
        skipped: report.skipped.iter().map(|p| p.as_path()).collect(),
        errors,
        duplicates,
    };
    serde_json::to_string_pretty(&json)
}
