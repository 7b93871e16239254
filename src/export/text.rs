//! Plain text export implementation.
//!
//! The format printed by `modgraph check`: one line per problem, then a
//! short summary.

use super::{ExportData, Exporter};
use std::io::{self, Write};

/// Text exporter implementation.
pub struct TextExporter;

impl Exporter for TextExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        if data.report.valid {
            writeln!(writer, "✅ {}: dependency graph is valid", data.project_name)?;
        } else {
            writeln!(
                writer,
                "❌ {}: {} problem(s) found",
                data.project_name,
                data.report.errors.len()
            )?;
            for error in &data.report.errors {
                writeln!(writer, "  - {}", error)?;
            }
        }

        let stats = &data.stats;
        writeln!(writer)?;
        writeln!(
            writer,
            "{} templates ({} unregistered), {} dependencies, max level {}",
            stats.total_templates,
            data.stub_count(),
            stats.total_dependencies,
            stats.max_level
        )?;
        Ok(())
    }
}
