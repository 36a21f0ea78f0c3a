//! Terminal output formatting.

use anyhow::Result;
use colored::{ColoredString, Colorize};
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use transit_graph::queries::{AlgorithmReport, EdaSummary, ProjectionOutcome};
use transit_graph::{ConnectedNode, DegreeEntry, GraphCounts, PipelineReport, SampleEdge, StepOutcome};

/// Print any report as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn heading(title: &str) {
    println!("{}", title.bold());
    println!("{}", "─".repeat(50));
}

pub fn print_counts(counts: &GraphCounts) {
    println!("  Nodes:         {}", counts.nodes.to_string().cyan());
    println!("  Relationships: {}", counts.relationships.to_string().cyan());
}

fn print_list(title: &str, items: &[String]) {
    println!("\n{} ({}):", title.bold(), items.len());
    if items.is_empty() {
        println!("  {}", "none".dimmed());
    }
    for item in items {
        println!("  {} {}", "•".dimmed(), item);
    }
}

fn labels_text(labels: &[String]) -> String {
    if labels.is_empty() {
        "No Label".to_string()
    } else {
        labels.join(":")
    }
}

pub fn print_most_connected(nodes: &[ConnectedNode]) {
    println!("\n{}", "Most connected nodes".bold());
    if nodes.is_empty() {
        println!("  {}", "No relationships found.".dimmed());
        return;
    }

    let name_width = column_width(nodes.iter().map(|n| n.name.as_str()), 32);
    for node in nodes {
        println!(
            "  {} {} {}",
            pad_right(&truncate_visual(&node.name, name_width), name_width),
            format!("[{}]", labels_text(&node.labels)).dimmed(),
            node.connections.to_string().yellow()
        );
    }
}

/// Counts, schema and top nodes.
pub fn print_summary(summary: &EdaSummary) {
    heading("Graph Summary");
    print_counts(&summary.counts);
    print_list("Node labels", &summary.labels);
    print_list("Relationship types", &summary.relationship_types);
    print_most_connected(&summary.most_connected);
}

/// Bar lengths proportional to degree, the largest filling `max_bar`.
/// Non-zero degrees always get at least one cell.
pub fn bar_lengths(entries: &[DegreeEntry], max_bar: usize) -> Vec<usize> {
    let max = entries.iter().map(|e| e.degree).max().unwrap_or(0);
    entries
        .iter()
        .map(|e| {
            if max <= 0 || e.degree <= 0 {
                0
            } else {
                let scaled = (e.degree as f64 / max as f64 * max_bar as f64).round() as usize;
                scaled.max(1)
            }
        })
        .collect()
}

/// Horizontal bar chart of node degrees.
pub fn print_degree_chart(entries: &[DegreeEntry]) {
    heading("Degree Distribution");
    if entries.is_empty() {
        println!("{}", "No nodes found.".dimmed());
        return;
    }

    let labels: Vec<String> = entries
        .iter()
        .map(|e| format!("{} ({})", e.name, e.label_text()))
        .collect();
    let label_width = column_width(labels.iter().map(String::as_str), 40);
    let digits = entries.iter().map(|e| e.degree.to_string().len()).max().unwrap_or(1);
    let max_bar = term_width().saturating_sub(label_width + digits + 6).max(10);

    for ((entry, label), len) in entries.iter().zip(&labels).zip(bar_lengths(entries, max_bar)) {
        println!(
            "  {} {} {}",
            pad_right(&truncate_visual(label, label_width), label_width),
            "█".repeat(len).cyan(),
            entry.degree.to_string().bold()
        );
    }
}

pub fn print_sample(rows: &[SampleEdge]) {
    heading("Subgraph Sample");
    if rows.is_empty() {
        println!("{}", "No relationships found.".dimmed());
        return;
    }
    for row in rows {
        println!(
            "  ({}:{}) {} ({}:{})",
            labels_text(&row.source_labels).dimmed(),
            row.source,
            format!("-[{}]-", row.rel_type).yellow(),
            labels_text(&row.target_labels).dimmed(),
            row.target
        );
    }
}

fn outcome_colored(outcome: &StepOutcome) -> ColoredString {
    match outcome {
        StepOutcome::Completed => "completed".green(),
        StepOutcome::Partial { failures } => format!("partial ({} rows failed)", failures).yellow(),
        StepOutcome::Skipped { reason } => format!("skipped: {}", reason).dimmed(),
        StepOutcome::Failed { reason } => format!("failed: {}", reason).red(),
    }
}

/// Per-step outcomes and totals of a pipeline run.
pub fn print_run_report(report: &PipelineReport) {
    heading(&format!("Run {} ({})", report.run_id, report.backend));
    for step in &report.steps {
        println!(
            "  {} {} {}",
            pad_right(&step.step.to_string(), 14),
            outcome_colored(&step.outcome),
            format!("{}ms", step.elapsed_ms).dimmed()
        );
    }

    for import in &report.imports {
        for failure in &import.failures {
            println!(
                "  {} {} line {}: {}",
                "!".yellow(),
                import.path.display(),
                failure.line,
                failure.reason
            );
        }
    }

    println!();
    println!("  Nodes created:         {}", report.nodes_created().to_string().cyan());
    println!("  Relationships created: {}", report.relationships_created().to_string().cyan());
    println!("  Elapsed:               {}ms", report.elapsed_ms());

    if let Some(step) = report.halted_at {
        println!("\n{} {}", "Halted at".red().bold(), step);
    } else if report.is_success() {
        println!("\n{}", "Pipeline complete.".green().bold());
    } else {
        println!("\n{}", "Pipeline complete with failures.".yellow().bold());
    }
}

pub fn print_algorithm_report(report: &AlgorithmReport) {
    heading("Graph Algorithms");
    match &report.projection {
        ProjectionOutcome::Created(stats) => println!(
            "  Projection: {} ({} nodes, {} relationships)",
            "created".green(),
            stats.node_count,
            stats.relationship_count
        ),
        ProjectionOutcome::Failed { reason } => println!("  Projection: {} {}", "failed".red(), reason),
    }

    println!("  Shortest path {} → {}:", report.from.cyan(), report.to.cyan());
    match (&report.path, &report.path_error) {
        (_, Some(error)) => println!("    {} {}", "error".red(), error),
        (Some(path), None) => {
            println!("    {}", path.path.join(" → "));
            println!("    Total cost: {}", path.total_cost.to_string().yellow());
        }
        (None, None) => println!("    {}", "No path found.".dimmed()),
    }
}

/// Get terminal width, defaulting to 80.
fn term_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}

/// Widest visual width among `items`, capped at `cap`.
fn column_width<'a>(items: impl Iterator<Item = &'a str>, cap: usize) -> usize {
    items.map(UnicodeWidthStr::width).max().unwrap_or(0).min(cap)
}

/// Pad a plain string to a given visual width (right-padded).
fn pad_right(s: &str, width: usize) -> String {
    let visual = UnicodeWidthStr::width(s);
    if visual >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visual))
    }
}

/// Truncate a string respecting visual width.
fn truncate_visual(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut result = String::new();
    let mut current_width = 0;
    for ch in s.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if current_width + ch_width > max_width - 2 {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }
    result.push_str("..");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, degree: i64) -> DegreeEntry {
        DegreeEntry {
            labels: vec!["Station".to_string()],
            name: name.to_string(),
            degree,
        }
    }

    #[test]
    fn test_bar_lengths_scale_to_widest() {
        let entries = [entry("a", 40), entry("b", 20), entry("c", 1), entry("d", 0)];
        assert_eq!(bar_lengths(&entries, 20), vec![20, 10, 1, 0]);
    }

    #[test]
    fn test_bar_lengths_empty_and_zero() {
        assert!(bar_lengths(&[], 20).is_empty());
        assert_eq!(bar_lengths(&[entry("a", 0)], 20), vec![0]);
    }

    #[test]
    fn test_truncate_visual() {
        assert_eq!(truncate_visual("Tallaght", 20), "Tallaght");
        assert_eq!(truncate_visual("St. Stephen's Green", 8), "St. St..");
        assert_eq!(truncate_visual("Dún Laoghaire", 3), "...");
    }

    #[test]
    fn test_pad_right_uses_visual_width() {
        assert_eq!(pad_right("Dún", 5), "Dún  ");
        assert_eq!(pad_right("Heuston", 3), "Heuston");
    }
}
