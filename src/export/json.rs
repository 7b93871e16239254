//! JSON export implementation.
//!
//! Exports graph reports in JSON format for machine-readable output.

use super::{ExportData, Exporter};
use crate::graph::{GraphStats, ValidationReport};
use serde::Serialize;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

/// Serializable template row for JSON output.
#[derive(Serialize)]
struct JsonTemplate<'a> {
    id: &'a str,
    level: usize,
    dependencies: usize,
    dependents: usize,
    registered: bool,
}

/// Root JSON export structure.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonExport<'a> {
    project: &'a str,
    valid: bool,
    stats: &'a GraphStats,
    validation: &'a ValidationReport,
    load_order: &'a [String],
    templates: Vec<JsonTemplate<'a>>,
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        let templates: Vec<JsonTemplate> = data
            .templates
            .iter()
            .map(|t| JsonTemplate {
                id: &t.id,
                level: t.level,
                dependencies: t.dependencies,
                dependents: t.dependents,
                registered: t.registered,
            })
            .collect();

        let export = JsonExport {
            project: &data.project_name,
            valid: data.report.valid,
            stats: &data.stats,
            validation: &data.report,
            load_order: &data.load_order,
            templates,
        };

        let json = serde_json::to_string_pretty(&export)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}
