//! Markdown export implementation.
//!
//! Exports graph reports in Markdown format for documentation and reporting.

use super::{ExportData, Exporter};
use std::io::{self, Write};

/// Markdown exporter implementation.
pub struct MarkdownExporter;

impl Exporter for MarkdownExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        // Title
        writeln!(writer, "# Dependency Graph Report")?;
        writeln!(writer)?;
        writeln!(writer, "**Project:** {}", data.project_name)?;
        writeln!(writer)?;
        writeln!(
            writer,
            "**Status:** {}",
            if data.report.valid { "✅ valid" } else { "❌ invalid" }
        )?;
        writeln!(writer)?;

        // Summary section
        let stats = &data.stats;
        writeln!(writer, "## Summary")?;
        writeln!(writer)?;
        writeln!(writer, "| Metric | Count |")?;
        writeln!(writer, "|--------|-------|")?;
        writeln!(writer, "| Templates | {} |", stats.total_templates)?;
        writeln!(writer, "| Unregistered | {} |", data.stub_count())?;
        writeln!(
            writer,
            "| With Dependencies | {} |",
            stats.templates_with_dependencies
        )?;
        writeln!(
            writer,
            "| With Dependents | {} |",
            stats.templates_with_dependents
        )?;
        writeln!(writer, "| Dependencies | {} |", stats.total_dependencies)?;
        writeln!(
            writer,
            "| Average Fan-out | {:.2} |",
            stats.average_dependencies
        )?;
        writeln!(writer, "| Max Fan-out | {} |", stats.max_dependencies)?;
        writeln!(writer, "| Max Level | {} |", stats.max_level)?;
        writeln!(
            writer,
            "| Circular Dependencies | {} |",
            stats.circular_dependencies
        )?;
        writeln!(writer)?;

        // Problems
        if !data.report.cycles.is_empty() {
            writeln!(writer, "## ⚠️ Circular Dependencies")?;
            writeln!(writer)?;
            for cycle in &data.report.cycles {
                writeln!(writer, "- `{}`", cycle.path())?;
            }
            writeln!(writer)?;
        }

        if !data.report.missing.is_empty() {
            writeln!(writer, "## ⚠️ Missing Dependencies")?;
            writeln!(writer)?;
            writeln!(writer, "| Template | Requires |")?;
            writeln!(writer, "|----------|----------|")?;
            for missing in &data.report.missing {
                writeln!(writer, "| {} | {} |", missing.template_id, missing.target_id)?;
            }
            writeln!(writer)?;
        }

        // Templates
        writeln!(writer, "## Templates")?;
        writeln!(writer)?;
        writeln!(writer, "| Template | Level | Dependencies | Dependents |")?;
        writeln!(writer, "|----------|-------|--------------|------------|")?;
        for t in &data.templates {
            let name = if t.registered {
                t.id.clone()
            } else {
                format!("{} _(unregistered)_", t.id)
            };
            writeln!(
                writer,
                "| {} | {} | {} | {} |",
                name, t.level, t.dependencies, t.dependents
            )?;
        }
        writeln!(writer)?;

        // Load order
        if !data.load_order.is_empty() {
            writeln!(writer, "## Load Order")?;
            writeln!(writer)?;
            for (i, id) in data.load_order.iter().enumerate() {
                writeln!(writer, "{}. {}", i + 1, id)?;
            }
            writeln!(writer)?;
        }

        writeln!(writer, "---")?;
        writeln!(writer, "*Generated by modgraph*")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::fixtures::{cyclic_data, sample_data};

    fn render(data: &ExportData) -> String {
        let mut output = Vec::new();
        MarkdownExporter.export(data, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_markdown_export_basic() {
        let md = render(&sample_data());

        assert!(md.contains("# Dependency Graph Report"));
        assert!(md.contains("**Project:** storefront"));
        assert!(md.contains("❌ invalid"));
        assert!(md.contains("| Templates | 5 |"));
        assert!(md.contains("| Max Level | 2 |"));
    }

    #[test]
    fn test_markdown_export_missing_table() {
        let md = render(&sample_data());

        assert!(md.contains("## ⚠️ Missing Dependencies"));
        assert!(md.contains("| widget | ghost |"));
        assert!(md.contains("| ghost _(unregistered)_ | 0 | 0 | 1 |"));
        assert!(!md.contains("## ⚠️ Circular Dependencies"));
    }

    #[test]
    fn test_markdown_export_load_order() {
        let md = render(&sample_data());

        assert!(md.contains("## Load Order"));
        assert!(md.contains("1. theme\n2. layout\n3. page"));
    }

    #[test]
    fn test_markdown_export_cycles() {
        let md = render(&cyclic_data());

        assert!(md.contains("## ⚠️ Circular Dependencies"));
        assert!(md.contains("- `a -> b -> a`"));
        assert!(md.contains("❌ invalid"));
    }
}
