use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::cli::BaselineSide;
use crate::loader::Dataset;
use crate::model::SideView;

/// Absolute and percentage rate deltas between the two sides of a record.
/// Computed once at record construction; undefined stays undefined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifferenceMetrics {
    pub rate_absolute: Option<f64>,
    pub rate_percent: Option<f64>,
}

impl DifferenceMetrics {
    /// `rate_absolute` is defined only when both rates are present.
    /// `rate_percent` divides the absolute delta by the baseline side's rate
    /// and is defined only when that rate is present and non-zero.
    pub fn compute(left: &SideView, right: &SideView, baseline: BaselineSide) -> Self {
        let rate_absolute = match (left.rate, right.rate) {
            (Some(l), Some(r)) => Some(l - r),
            _ => None,
        };

        let denominator = match baseline {
            BaselineSide::Left => left.rate,
            BaselineSide::Right => right.rate,
        };

        let rate_percent = match (rate_absolute, denominator) {
            (Some(delta), Some(denom)) if denom != 0.0 => Some(delta / denom * 100.0),
            _ => None,
        };

        Self {
            rate_absolute,
            rate_percent,
        }
    }
}

/// Merge of the two per-condition results for one scenario key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub scenario_key: String,
    pub skills: Option<String>,
    pub left: SideView,
    pub right: SideView,
    pub difference: DifferenceMetrics,
}

/// Join the two datasets over the union of their scenario keys, sorted for
/// determinism. A key present on only one side still produces a record; the
/// missing side stays all-absent and its difference fields undefined.
pub fn reconcile(
    left: &Dataset,
    right: &Dataset,
    baseline: BaselineSide,
) -> Vec<ComparisonRecord> {
    let keys: BTreeSet<&String> = left.results.keys().chain(right.results.keys()).collect();

    keys.into_iter()
        .map(|key| {
            let left_raw = left.results.get(key);
            let right_raw = right.results.get(key);

            let left_view = left_raw.map(SideView::from_result).unwrap_or_default();
            let right_view = right_raw.map(SideView::from_result).unwrap_or_default();
            let difference = DifferenceMetrics::compute(&left_view, &right_view, baseline);

            let skills = left_raw
                .and_then(|raw| raw.skills.clone())
                .or_else(|| right_raw.and_then(|raw| raw.skills.clone()));

            ComparisonRecord {
                scenario_key: key.clone(),
                skills,
                left: left_view,
                right: right_view,
                difference,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawScenarioResult;
    use std::collections::BTreeMap;

    fn result(key: &str, rate: Option<f64>) -> RawScenarioResult {
        let raw = serde_json::json!({
            "scenario_key": key,
            "success": true,
            "estimate": { "recommended_rate": rate },
        });
        serde_json::from_value(raw).expect("raw result should deserialize")
    }

    fn dataset(label: &str, entries: Vec<RawScenarioResult>) -> Dataset {
        let mut results = BTreeMap::new();
        for entry in entries {
            let key = entry.scenario_key.clone().expect("test entry needs key");
            results.insert(key, entry);
        }
        Dataset {
            label: label.to_string(),
            condition: None,
            timestamp: None,
            results,
        }
    }

    #[test]
    fn union_of_keys_with_no_duplicates_or_drops() {
        let left = dataset(
            "left",
            vec![result("junior", Some(40.0)), result("mid", Some(60.0))],
        );
        let right = dataset(
            "right",
            vec![result("mid", Some(55.0)), result("senior", Some(90.0))],
        );

        let records = reconcile(&left, &right, BaselineSide::Right);
        let keys: Vec<&str> = records.iter().map(|r| r.scenario_key.as_str()).collect();
        assert_eq!(keys, vec!["junior", "mid", "senior"]);
    }

    #[test]
    fn differences_match_the_documented_example() {
        let left = dataset("left", vec![result("senior", Some(80.0))]);
        let right = dataset("right", vec![result("senior", Some(60.0))]);

        let records = reconcile(&left, &right, BaselineSide::Right);
        let diff = &records[0].difference;
        assert_eq!(diff.rate_absolute, Some(20.0));
        let percent = diff.rate_percent.expect("percent should be defined");
        assert!((percent - 33.33).abs() < 0.01, "got {percent}");
    }

    #[test]
    fn zero_baseline_rate_leaves_percent_undefined() {
        let left = dataset("left", vec![result("junior", Some(40.0))]);
        let right = dataset("right", vec![result("junior", Some(0.0))]);

        let records = reconcile(&left, &right, BaselineSide::Right);
        assert_eq!(records[0].difference.rate_absolute, Some(40.0));
        assert!(records[0].difference.rate_percent.is_none());
    }

    #[test]
    fn one_sided_record_has_undefined_differences_not_zero() {
        let left = dataset("left", vec![result("junior", Some(40.0))]);
        let right = dataset("right", vec![]);

        let records = reconcile(&left, &right, BaselineSide::Right);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].left.rate, Some(40.0));
        assert!(records[0].right.rate.is_none());
        assert!(records[0].difference.rate_absolute.is_none());
        assert!(records[0].difference.rate_percent.is_none());
    }

    #[test]
    fn baseline_side_flips_the_percentage_denominator() {
        let left = dataset("left", vec![result("senior", Some(80.0))]);
        let right = dataset("right", vec![result("senior", Some(60.0))]);

        let vs_right = reconcile(&left, &right, BaselineSide::Right);
        let vs_left = reconcile(&left, &right, BaselineSide::Left);

        let pct_right = vs_right[0].difference.rate_percent.unwrap();
        let pct_left = vs_left[0].difference.rate_percent.unwrap();
        assert!((pct_right - 33.333).abs() < 0.01);
        assert!((pct_left - 25.0).abs() < 0.01);
        // absolute delta is independent of baseline choice
        assert_eq!(
            vs_right[0].difference.rate_absolute,
            vs_left[0].difference.rate_absolute
        );
    }

    #[test]
    fn empty_inputs_yield_an_empty_sequence() {
        let records = reconcile(
            &Dataset::empty("left"),
            &Dataset::empty("right"),
            BaselineSide::Right,
        );
        assert!(records.is_empty());
    }
}
