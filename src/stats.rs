use serde::Serialize;

use crate::reconcile::ComparisonRecord;

/// Mean/min/max over the records where the rate is defined. Absent when no
/// record on the side has a defined rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub defined_count: usize,
}

/// Three-way effectiveness classification of the source-quality indicator,
/// with ties split so a "no data at all" state never masquerades as a real
/// tie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Effectiveness {
    LeftBetter,
    RightBetter,
    TieBothPresent,
    TieNeitherPresent,
}

/// Aggregate over one reconciliation pass. Every statistic is computed only
/// over records where the relevant field is defined; undefined entries are
/// excluded from both numerator and denominator.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryStatistics {
    pub scenario_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_rate: Option<RateStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_rate: Option<RateStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_rate_absolute_diff: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_rate_percent_diff: Option<f64>,
    /// Records whose side reports the source-quality indicator.
    pub left_source_hits: usize,
    pub right_source_hits: usize,
    pub effectiveness: Effectiveness,
}

impl SummaryStatistics {
    pub fn has_data(&self) -> bool {
        self.scenario_count > 0
    }
}

/// Order-independent reduction of the comparison records.
pub fn summarize(records: &[ComparisonRecord]) -> SummaryStatistics {
    let left_rate = rate_stats(records.iter().map(|r| r.left.rate));
    let right_rate = rate_stats(records.iter().map(|r| r.right.rate));

    let mean_rate_absolute_diff = mean(records.iter().filter_map(|r| r.difference.rate_absolute));
    let mean_rate_percent_diff = mean(records.iter().filter_map(|r| r.difference.rate_percent));

    let left_source_hits = source_hits(records.iter().map(|r| r.left.has_external_source));
    let right_source_hits = source_hits(records.iter().map(|r| r.right.has_external_source));

    let effectiveness = classify(left_source_hits, right_source_hits);

    SummaryStatistics {
        scenario_count: records.len(),
        left_rate,
        right_rate,
        mean_rate_absolute_diff,
        mean_rate_percent_diff,
        left_source_hits,
        right_source_hits,
        effectiveness,
    }
}

fn classify(left_hits: usize, right_hits: usize) -> Effectiveness {
    if left_hits > right_hits {
        Effectiveness::LeftBetter
    } else if right_hits > left_hits {
        Effectiveness::RightBetter
    } else if left_hits > 0 {
        Effectiveness::TieBothPresent
    } else {
        Effectiveness::TieNeitherPresent
    }
}

fn rate_stats(rates: impl Iterator<Item = Option<f64>>) -> Option<RateStats> {
    let defined: Vec<f64> = rates.flatten().collect();
    if defined.is_empty() {
        return None;
    }

    let sum: f64 = defined.iter().sum();
    let min = defined.iter().copied().fold(f64::INFINITY, f64::min);
    let max = defined.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(RateStats {
        mean: sum / defined.len() as f64,
        min,
        max,
        defined_count: defined.len(),
    })
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let collected: Vec<f64> = values.collect();
    if collected.is_empty() {
        return None;
    }
    Some(collected.iter().sum::<f64>() / collected.len() as f64)
}

fn source_hits(flags: impl Iterator<Item = Option<bool>>) -> usize {
    flags.filter(|flag| *flag == Some(true)).count()
}
