use std::path::PathBuf;

use anyhow::{Result, bail};
use chrono::Utc;
use tracing::{info, warn};

use crate::cli::Cli;
use crate::loader::{self, Dataset};
use crate::reconcile::reconcile;
use crate::render::SvgRenderer;
use crate::report::{self, ConditionLabels};
use crate::stats::summarize;
use crate::util::{utc_compact_string, utc_rfc3339_string};
use crate::{charts, console, export};

pub fn run(args: Cli) -> Result<()> {
    let now = Utc::now();
    let generated_at = utc_rfc3339_string(now);
    let compact_ts = utc_compact_string(now);

    let (left_path, right_path) = resolve_datasets(&args)?;

    let left = loader::load_dataset(&left_path)?;
    let right = match &right_path {
        Some(path) => loader::load_dataset(path)?,
        None => {
            info!("single-dataset mode: right side is empty");
            Dataset::empty("right")
        }
    };

    let records = reconcile(&left, &right, args.baseline);
    let stats = summarize(&records);

    if !args.charts_only {
        console::print_report(&records, &stats, &left, &right);
    }

    let specs = charts::build_chart_specs(&records, &left.label, &right.label);
    let condition_labels = match (&left.condition, &right.condition) {
        (Some(l), Some(r)) => Some(ConditionLabels {
            left: l.clone(),
            right: r.clone(),
        }),
        _ => None,
    };

    let assembled = report::assemble(
        &SvgRenderer,
        &specs,
        &stats,
        &records,
        condition_labels,
        &generated_at,
        &compact_ts,
    );

    let report_dir = args
        .report_dir
        .clone()
        .unwrap_or_else(|| args.results_dir.join("comparison_visual"));
    let manifest_path = report::persist_report(&report_dir, &assembled, &compact_ts)?;

    let export_document = export::build_export(&records, args.baseline, &generated_at);
    let export_path = args.export_path.clone().unwrap_or_else(|| {
        args.results_dir
            .join(format!("comparison_report_{compact_ts}.json"))
    });
    export::write_export(&export_path, &export_document)?;

    info!(
        report = %manifest_path.display(),
        export = %export_path.display(),
        scenarios = records.len(),
        baseline = args.baseline.as_str(),
        "comparison complete"
    );

    Ok(())
}

/// Positional dataset paths: two → full comparison, one → single-dataset
/// mode, none → the conventional latest pointers under the results
/// directory (a missing right pointer degrades to single-dataset mode).
fn resolve_datasets(args: &Cli) -> Result<(PathBuf, Option<PathBuf>)> {
    match args.datasets.as_slice() {
        [] => {
            let left = args.results_dir.join("latest_left.json");
            let right = args.results_dir.join("latest_right.json");
            if right.exists() {
                Ok((left, Some(right)))
            } else {
                warn!(
                    path = %right.display(),
                    "latest right pointer missing; running in single-dataset mode"
                );
                Ok((left, None))
            }
        }
        [left] => Ok((left.clone(), None)),
        [left, right] => Ok((left.clone(), Some(right.clone()))),
        _ => bail!("expected at most two dataset paths"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(argv: &[&str]) -> Cli {
        Cli::try_parse_from(argv).expect("argv should parse")
    }

    #[test]
    fn one_positional_path_selects_single_dataset_mode() {
        let args = cli(&["estcompare", "left.json"]);
        let (left, right) = resolve_datasets(&args).expect("resolve");
        assert_eq!(left, PathBuf::from("left.json"));
        assert!(right.is_none());
    }

    #[test]
    fn two_positional_paths_select_full_comparison() {
        let args = cli(&["estcompare", "a.json", "b.json"]);
        let (left, right) = resolve_datasets(&args).expect("resolve");
        assert_eq!(left, PathBuf::from("a.json"));
        assert_eq!(right, Some(PathBuf::from("b.json")));
    }

    #[test]
    fn zero_paths_resolve_latest_pointers_under_the_results_dir() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join("latest_left.json"), "{}").expect("seed left");
        std::fs::write(dir.path().join("latest_right.json"), "{}").expect("seed right");

        let results_dir = dir.path().to_str().expect("utf-8 path");
        let args = cli(&["estcompare", "--results-dir", results_dir]);
        let (left, right) = resolve_datasets(&args).expect("resolve");
        assert_eq!(left, dir.path().join("latest_left.json"));
        assert_eq!(right, Some(dir.path().join("latest_right.json")));
    }

    #[test]
    fn missing_latest_right_pointer_degrades_to_single_dataset_mode() {
        let dir = tempfile::tempdir().expect("temp dir");
        let results_dir = dir.path().to_str().expect("utf-8 path");
        let args = cli(&["estcompare", "--results-dir", results_dir]);

        let (_, right) = resolve_datasets(&args).expect("resolve");
        assert!(right.is_none());
    }

    #[test]
    fn end_to_end_run_writes_report_and_export() {
        let dir = tempfile::tempdir().expect("temp dir");
        let left = dir.path().join("with.json");
        let right = dir.path().join("without.json");

        std::fs::write(
            &left,
            r#"{
              "timestamp": "2025-03-10T11:00:00Z",
              "condition_flag": "with_grounding",
              "results": [
                {
                  "scenario_key": "senior",
                  "success": true,
                  "estimate": { "recommended_rate": 80.0 },
                  "sources_count": 5,
                  "has_external_source": true
                }
              ]
            }"#,
        )
        .expect("seed left");
        std::fs::write(
            &right,
            r#"{
              "timestamp": "2025-03-10T11:30:00Z",
              "condition_flag": "without_grounding",
              "results": [
                {
                  "scenario_key": "senior",
                  "success": true,
                  "estimate": { "recommended_rate": 60.0 },
                  "sources_count": 0,
                  "has_external_source": false
                }
              ]
            }"#,
        )
        .expect("seed right");

        let results_dir = dir.path().join("out");
        let export_path = dir.path().join("export.json");
        let args = cli(&[
            "estcompare",
            left.to_str().unwrap(),
            right.to_str().unwrap(),
            "--results-dir",
            results_dir.to_str().unwrap(),
            "--export-path",
            export_path.to_str().unwrap(),
            "--charts-only",
        ]);

        run(args).expect("pipeline should succeed");

        let export = crate::export::load_export(&export_path).expect("export should reload");
        assert_eq!(export.comparisons.len(), 1);
        assert_eq!(export.comparisons[0].difference.rate_absolute, Some(20.0));

        let report_dir = results_dir.join("comparison_visual");
        let entries: Vec<_> = std::fs::read_dir(&report_dir)
            .expect("report dir should exist")
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        assert!(entries.iter().any(|name| name.starts_with("report_")));
        assert!(entries.iter().any(|name| name.starts_with("01_rate_comparison_")));
    }

    #[test]
    fn empty_datasets_run_to_a_one_page_report() {
        let dir = tempfile::tempdir().expect("temp dir");
        let left = dir.path().join("left.json");
        let right = dir.path().join("right.json");
        std::fs::write(&left, r#"{ "results": [] }"#).expect("seed left");
        std::fs::write(&right, r#"{ "results": [] }"#).expect("seed right");

        let results_dir = dir.path().join("out");
        let export_path = dir.path().join("export.json");
        let args = cli(&[
            "estcompare",
            left.to_str().unwrap(),
            right.to_str().unwrap(),
            "--results-dir",
            results_dir.to_str().unwrap(),
            "--export-path",
            export_path.to_str().unwrap(),
            "--charts-only",
        ]);

        run(args).expect("empty datasets are a valid run");

        let report_dir = results_dir.join("comparison_visual");
        let manifest_name = std::fs::read_dir(&report_dir)
            .expect("report dir should exist")
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .find(|name| name.starts_with("report_"))
            .expect("report manifest should be written");
        let raw =
            std::fs::read(report_dir.join(&manifest_name)).expect("manifest should be readable");
        let manifest: serde_json::Value =
            serde_json::from_slice(&raw).expect("manifest should parse");

        assert_eq!(manifest["page_count"], serde_json::json!(1));
        assert_eq!(manifest["pages"].as_array().map(Vec::len), Some(1));
        assert_eq!(manifest["pages"][0]["statistics"]["status"], "no_data");

        let chart_files: Vec<String> = std::fs::read_dir(&report_dir)
            .expect("report dir")
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".svg"))
            .collect();
        assert!(chart_files.is_empty(), "no chart artifacts for empty input");

        let export = crate::export::load_export(&export_path).expect("export should reload");
        assert!(export.comparisons.is_empty());
    }

    #[test]
    fn missing_input_file_fails_the_run() {
        let args = cli(&["estcompare", "/nonexistent/left.json"]);
        let err = run(args).expect_err("missing input should fail");
        assert!(err.to_string().contains("input file not found"));
    }
}
