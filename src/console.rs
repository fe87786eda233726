use crate::loader::Dataset;
use crate::reconcile::ComparisonRecord;
use crate::stats::{Effectiveness, SummaryStatistics};

/// Print the textual comparison report to stdout. Absent values render as
/// `n/a`, never as zero.
pub fn print_report(
    records: &[ComparisonRecord],
    stats: &SummaryStatistics,
    left: &Dataset,
    right: &Dataset,
) {
    let left_label = left.label.as_str();
    let right_label = right.label.as_str();

    print_heading(&format!("RATE COMPARISON: {left_label} vs {right_label}"));
    println!(
        "  {left_label} run: {}",
        left.timestamp.as_deref().unwrap_or("n/a")
    );
    println!(
        "  {right_label} run: {}",
        right.timestamp.as_deref().unwrap_or("n/a")
    );
    println!();
    println!(
        "  {:<16} {:>14} {:>14} {:>12} {:>10}",
        "Scenario", left_label, right_label, "Difference", "% Diff"
    );
    for record in records {
        println!(
            "  {:<16} {:>14} {:>14} {:>12} {:>10}",
            record.scenario_key,
            fmt_money(record.left.rate),
            fmt_money(record.right.rate),
            fmt_signed_money(record.difference.rate_absolute),
            fmt_percent(record.difference.rate_percent),
        );
    }

    print_heading("MONTHLY COST ESTIMATES");
    println!(
        "  {:<16} {:>16} {:>16} {:>16}",
        "Scenario", "Software (L/R)", "Workspace (L/R)", "Income (L/R)"
    );
    for record in records {
        println!(
            "  {:<16} {:>16} {:>16} {:>16}",
            record.scenario_key,
            pair(record.left.software_cost, record.right.software_cost),
            pair(record.left.workspace_cost, record.right.workspace_cost),
            pair(record.left.suggested_income, record.right.suggested_income),
        );
    }

    print_heading("DATA SOURCES");
    println!(
        "  {:<16} {:>12} {:>12} {:>14} {:>14}",
        "Scenario", "Left", "Right", "Left ext.", "Right ext."
    );
    for record in records {
        println!(
            "  {:<16} {:>12} {:>12} {:>14} {:>14}",
            record.scenario_key,
            fmt_count(record.left.sources_count),
            fmt_count(record.right.sources_count),
            fmt_flag(record.left.has_external_source),
            fmt_flag(record.right.has_external_source),
        );
    }

    let detailed: Vec<(String, Vec<String>)> = records
        .iter()
        .map(|record| (record.scenario_key.clone(), source_lines(record, left_label, right_label)))
        .filter(|(_, lines)| !lines.is_empty())
        .collect();
    if !detailed.is_empty() {
        print_heading("DETAILED SOURCES");
        for (scenario_key, lines) in detailed {
            println!("  {scenario_key}:");
            for line in lines {
                println!("    {line}");
            }
        }
    }

    print_heading("KEY INSIGHTS");
    if !stats.has_data() {
        println!("  no data: both datasets were empty");
        return;
    }

    if let Some(left) = &stats.left_rate {
        println!(
            "  {left_label}: mean {} (range {} - {}, {} defined)",
            fmt_money(Some(left.mean)),
            fmt_money(Some(left.min)),
            fmt_money(Some(left.max)),
            left.defined_count
        );
    }
    if let Some(right) = &stats.right_rate {
        println!(
            "  {right_label}: mean {} (range {} - {}, {} defined)",
            fmt_money(Some(right.mean)),
            fmt_money(Some(right.min)),
            fmt_money(Some(right.max)),
            right.defined_count
        );
    }
    println!(
        "  mean difference: {} ({})",
        fmt_signed_money(stats.mean_rate_absolute_diff),
        fmt_percent(stats.mean_rate_percent_diff)
    );
    println!(
        "  external sources: {} of {} ({left_label}), {} of {} ({right_label})",
        stats.left_source_hits, stats.scenario_count, stats.right_source_hits, stats.scenario_count
    );
    println!("  verdict: {}", verdict(stats.effectiveness));
    println!();
}

const MAX_SOURCES_PER_SIDE: usize = 5;

/// Per-scenario source URL listing, capped per side to keep the console
/// readable. Scenarios without any recorded source yield no lines.
fn source_lines(record: &ComparisonRecord, left_label: &str, right_label: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for (label, sources) in [(left_label, &record.left.sources), (right_label, &record.right.sources)] {
        if sources.is_empty() {
            continue;
        }
        lines.push(format!("{label} ({}):", sources.len()));
        for url in sources.iter().take(MAX_SOURCES_PER_SIDE) {
            lines.push(format!("  - {url}"));
        }
        if sources.len() > MAX_SOURCES_PER_SIDE {
            lines.push(format!("  ... and {} more", sources.len() - MAX_SOURCES_PER_SIDE));
        }
    }
    lines
}

fn print_heading(title: &str) {
    println!();
    println!("{}", "=".repeat(72));
    println!("  {title}");
    println!("{}", "=".repeat(72));
}

fn verdict(effectiveness: Effectiveness) -> &'static str {
    match effectiveness {
        Effectiveness::LeftBetter => "left condition surfaces more external sources",
        Effectiveness::RightBetter => "right condition surfaces more external sources",
        Effectiveness::TieBothPresent => "both conditions surface external sources equally",
        Effectiveness::TieNeitherPresent => "neither condition surfaced external sources",
    }
}

fn fmt_money(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("${v:.2}"),
        None => "n/a".to_string(),
    }
}

fn fmt_signed_money(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("${v:+.2}"),
        None => "n/a".to_string(),
    }
}

fn fmt_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:+.1}%"),
        None => "n/a".to_string(),
    }
}

fn fmt_count(value: Option<u32>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "n/a".to_string(),
    }
}

fn fmt_flag(value: Option<bool>) -> String {
    match value {
        Some(true) => "yes".to_string(),
        Some(false) => "no".to_string(),
        None => "n/a".to_string(),
    }
}

fn pair(left: Option<f64>, right: Option<f64>) -> String {
    format!("{}/{}", fmt_whole(left), fmt_whole(right))
}

fn fmt_whole(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("${v:.0}"),
        None => "n/a".to_string(),
    }
}
