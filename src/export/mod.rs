//! Export functionality for dependency graph reports.
//!
//! This module provides exporters for writing a graph's validation result,
//! statistics and load order in various formats: plain text, JSON, and
//! Markdown.

pub mod json;
pub mod markdown;
pub mod text;

use crate::graph::{DependencyGraph, GraphStats, ValidationReport};
use std::io::{self, Write};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Plain text - terminal output
    #[default]
    Text,
    /// JSON format - machine-readable, full data
    Json,
    /// Markdown format - documentation/reporting
    Markdown,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ExportFormat::Text),
            "json" => Ok(ExportFormat::Json),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: text, json, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Text => write!(f, "text"),
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Per-template row of an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSummary {
    pub id: String,
    pub level: usize,
    pub dependencies: usize,
    pub dependents: usize,
    /// False for ids only ever named as a dependency
    pub registered: bool,
}

/// Data container for export operations.
///
/// A snapshot of everything a report shows, taken from a graph in one go.
#[derive(Debug, Clone)]
pub struct ExportData {
    /// Report title, usually the manifest name
    pub project_name: String,
    /// Templates in first-seen order
    pub templates: Vec<TemplateSummary>,
    /// Validation outcome
    pub report: ValidationReport,
    /// Summary counts
    pub stats: GraphStats,
    /// Load order over every known template
    pub load_order: Vec<String>,
}

impl ExportData {
    /// Create new export data from a graph.
    pub fn new(project_name: impl Into<String>, graph: &DependencyGraph) -> Self {
        Self {
            project_name: project_name.into(),
            templates: graph
                .nodes()
                .map(|node| TemplateSummary {
                    id: node.id.clone(),
                    level: node.level,
                    dependencies: node.dependencies.len(),
                    dependents: node.dependents.len(),
                    registered: node.registered,
                })
                .collect(),
            report: graph.validate(),
            stats: graph.stats(),
            load_order: graph.full_load_order(),
        }
    }

    /// Get count of templates that were never registered themselves
    pub fn stub_count(&self) -> usize {
        self.templates.iter().filter(|t| !t.registered).count()
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the data to the given writer.
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()>;
}

/// Export data in the specified format.
pub fn export<W: Write>(
    format: ExportFormat,
    data: &ExportData,
    writer: &mut W,
) -> io::Result<()> {
    match format {
        ExportFormat::Text => text::TextExporter.export(data, writer),
        ExportFormat::Json => json::JsonExporter.export(data, writer),
        ExportFormat::Markdown => markdown::MarkdownExporter.export(data, writer),
    }
}

/// Export data to a string.
pub fn export_to_string(format: ExportFormat, data: &ExportData) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, data, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("text".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert_eq!(
            "markdown".parse::<ExportFormat>().unwrap(),
            ExportFormat::Markdown
        );
        assert_eq!(
            "md".parse::<ExportFormat>().unwrap(),
            ExportFormat::Markdown
        );
        assert!("csv".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_format_display() {
        assert_eq!(format!("{}", ExportFormat::Text), "text");
        assert_eq!(format!("{}", ExportFormat::Json), "json");
        assert_eq!(format!("{}", ExportFormat::Markdown), "markdown");
    }

    #[test]
    fn test_export_data_snapshot() {
        let data = fixtures::sample_data();
        assert_eq!(data.templates.len(), 5);
        assert_eq!(data.stub_count(), 1);
        assert!(!data.report.valid);
        assert_eq!(data.stats.total_templates, 5);
        assert_eq!(data.load_order, vec!["theme", "layout", "page", "ghost", "widget"]);
    }

    #[test]
    fn test_export_to_string_all_formats() {
        let data = fixtures::sample_data();
        for format in [ExportFormat::Text, ExportFormat::Json, ExportFormat::Markdown] {
            let output = export_to_string(format, &data).unwrap();
            assert!(output.contains("ghost"), "{format} output should name ghost");
        }
    }
}
