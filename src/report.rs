use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use crate::reconcile::ComparisonRecord;
use crate::render::{ChartSpec, Renderer};
use crate::stats::SummaryStatistics;
use crate::util::{ensure_directory, write_bytes_atomic, write_json_atomic};

const MANIFEST_VERSION: u32 = 1;

/// Paginated report: exactly one cover page followed by one page per
/// successfully rendered chart, numbered contiguously from 1.
#[derive(Debug, Clone, Serialize)]
pub struct ReportDocument {
    pub manifest_version: u32,
    pub generated_at: String,
    pub page_count: usize,
    pub pages: Vec<Page>,
    /// One note per chart that could not be rendered.
    pub render_failures: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub index: usize,
    pub total_pages: usize,
    #[serde(flatten)]
    pub content: PageContent,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageContent {
    Cover(CoverPage),
    Chart(ChartPage),
}

#[derive(Debug, Clone, Serialize)]
pub struct CoverPage {
    pub title: String,
    pub generated_at: String,
    pub scenario_count: usize,
    pub chart_count: usize,
    pub scenario_keys: Vec<String>,
    /// Omitted entirely when neither dataset carries a condition flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_labels: Option<ConditionLabels>,
    pub statistics: StatisticsBlock,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConditionLabels {
    pub left: String,
    pub right: String,
}

/// Cover statistics, or an explicit no-data placeholder when the comparison
/// sequence was empty.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StatisticsBlock {
    NoData,
    Summary(SummaryStatistics),
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartPage {
    pub title: String,
    pub file_name: String,
}

/// Assembled document plus the artifact bytes to persist alongside it.
#[derive(Debug)]
pub struct AssembledReport {
    pub document: ReportDocument,
    pub artifacts: Vec<(String, Vec<u8>)>,
}

/// Build the report: render each chart through the collaborator, skipping
/// (and noting) individual failures without aborting the rest of the
/// document. Artifact file names keep the chart's catalog position as a
/// numeric prefix so they sort lexically in page order.
pub fn assemble(
    renderer: &dyn Renderer,
    specs: &[ChartSpec],
    stats: &SummaryStatistics,
    records: &[ComparisonRecord],
    condition_labels: Option<ConditionLabels>,
    generated_at: &str,
    compact_ts: &str,
) -> AssembledReport {
    let mut chart_pages = Vec::new();
    let mut artifacts = Vec::new();
    let mut render_failures = Vec::new();

    for (position, spec) in specs.iter().enumerate() {
        match renderer.render(spec) {
            Ok(artifact) => {
                let file_name = format!("{:02}_{}_{}.svg", position + 1, spec.slug, compact_ts);
                chart_pages.push(ChartPage {
                    title: artifact.title,
                    file_name: file_name.clone(),
                });
                artifacts.push((file_name, artifact.bytes));
            }
            Err(err) => {
                warn!(chart = %spec.slug, error = %err, "chart skipped");
                render_failures.push(format!("chart {:02} {}: {err}", position + 1, spec.slug));
            }
        }
    }

    let statistics = if stats.has_data() {
        StatisticsBlock::Summary(stats.clone())
    } else {
        StatisticsBlock::NoData
    };

    let cover = CoverPage {
        title: "Estimation Comparison Report".to_string(),
        generated_at: generated_at.to_string(),
        scenario_count: records.len(),
        chart_count: chart_pages.len(),
        scenario_keys: records.iter().map(|r| r.scenario_key.clone()).collect(),
        condition_labels,
        statistics,
    };

    let total_pages = chart_pages.len() + 1;
    let mut pages = Vec::with_capacity(total_pages);
    pages.push(Page {
        index: 1,
        total_pages,
        content: PageContent::Cover(cover),
    });
    for (offset, chart) in chart_pages.into_iter().enumerate() {
        pages.push(Page {
            index: offset + 2,
            total_pages,
            content: PageContent::Chart(chart),
        });
    }

    AssembledReport {
        document: ReportDocument {
            manifest_version: MANIFEST_VERSION,
            generated_at: generated_at.to_string(),
            page_count: total_pages,
            pages,
            render_failures,
        },
        artifacts,
    }
}

/// Write every chart artifact and the report manifest, each atomically.
pub fn persist_report(report_dir: &Path, report: &AssembledReport, compact_ts: &str) -> Result<PathBuf> {
    ensure_directory(report_dir)?;

    for (file_name, bytes) in &report.artifacts {
        write_bytes_atomic(&report_dir.join(file_name), bytes)?;
    }

    let manifest_path = report_dir.join(format!("report_{compact_ts}.json"));
    write_json_atomic(&manifest_path, &report.document)?;

    info!(
        path = %manifest_path.display(),
        pages = report.document.page_count,
        charts = report.artifacts.len(),
        skipped = report.document.render_failures.len(),
        "wrote report"
    );

    Ok(manifest_path)
}
