use crate::reconcile::ComparisonRecord;
use crate::render::{ChartKind, ChartSpec, Series};

/// Build the ordered chart catalog for one reconciliation pass. The position
/// in the returned list fixes each chart's numeric file prefix, so the
/// persisted artifacts sort lexically in page order.
///
/// An empty record sequence yields an empty catalog: with nothing to chart
/// the report stays a cover-only document.
pub fn build_chart_specs(
    records: &[ComparisonRecord],
    left_label: &str,
    right_label: &str,
) -> Vec<ChartSpec> {
    if records.is_empty() {
        return Vec::new();
    }

    let categories: Vec<String> = records.iter().map(|r| r.scenario_key.clone()).collect();

    let two_sided = |title: &str, slug: &str, pick: fn(&ComparisonRecord) -> (Option<f64>, Option<f64>)| {
        let (left_values, right_values): (Vec<_>, Vec<_>) =
            records.iter().map(pick).unzip();
        ChartSpec {
            slug: slug.to_string(),
            title: title.to_string(),
            kind: ChartKind::GroupedBars,
            categories: categories.clone(),
            series: vec![
                Series {
                    label: left_label.to_string(),
                    values: left_values,
                },
                Series {
                    label: right_label.to_string(),
                    values: right_values,
                },
            ],
        }
    };

    let diverging = |title: &str, slug: &str, pick: fn(&ComparisonRecord) -> Option<f64>| ChartSpec {
        slug: slug.to_string(),
        title: title.to_string(),
        kind: ChartKind::DivergingBars,
        categories: categories.clone(),
        series: vec![Series {
            label: "difference".to_string(),
            values: records.iter().map(pick).collect(),
        }],
    };

    vec![
        two_sided("Hourly Rate Comparison", "rate_comparison", |r| {
            (r.left.rate, r.right.rate)
        }),
        diverging("Rate Difference Analysis", "rate_difference", |r| {
            r.difference.rate_absolute
        }),
        two_sided("Monthly Cost Estimates", "cost_comparison", |r| {
            (r.left.total_expenses, r.right.total_expenses)
        }),
        two_sided("Data Sources Analysis", "source_comparison", |r| {
            (
                r.left.sources_count.map(f64::from),
                r.right.sources_count.map(f64::from),
            )
        }),
        two_sided("Monthly Income Suggestions", "income_comparison", |r| {
            (r.left.suggested_income, r.right.suggested_income)
        }),
        diverging(
            "Percentage Difference Analysis",
            "percentage_difference",
            |r| r.difference.rate_percent,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::BaselineSide;
    use crate::model::SideView;
    use crate::reconcile::DifferenceMetrics;

    fn record(key: &str, left_rate: Option<f64>, right_rate: Option<f64>) -> ComparisonRecord {
        let left = SideView {
            rate: left_rate,
            ..SideView::default()
        };
        let right = SideView {
            rate: right_rate,
            ..SideView::default()
        };
        let difference = DifferenceMetrics::compute(&left, &right, BaselineSide::Right);
        ComparisonRecord {
            scenario_key: key.to_string(),
            skills: None,
            left,
            right,
            difference,
        }
    }

    #[test]
    fn empty_records_yield_an_empty_catalog() {
        assert!(build_chart_specs(&[], "with", "without").is_empty());
    }

    #[test]
    fn catalog_order_is_stable() {
        let records = vec![record("junior", Some(40.0), Some(38.0))];
        let specs = build_chart_specs(&records, "with", "without");

        let slugs: Vec<&str> = specs.iter().map(|s| s.slug.as_str()).collect();
        assert_eq!(
            slugs,
            vec![
                "rate_comparison",
                "rate_difference",
                "cost_comparison",
                "source_comparison",
                "income_comparison",
                "percentage_difference",
            ]
        );
    }

    #[test]
    fn undefined_values_stay_undefined_in_the_series() {
        let records = vec![
            record("junior", Some(40.0), None),
            record("senior", Some(80.0), Some(60.0)),
        ];
        let specs = build_chart_specs(&records, "with", "without");

        // rate comparison: right series mirrors the absent rate
        assert_eq!(specs[0].series[1].values, vec![None, Some(60.0)]);
        // rate difference: undefined where one side is missing
        assert_eq!(specs[1].series[0].values, vec![None, Some(20.0)]);
    }

    #[test]
    fn condition_labels_name_the_series() {
        let records = vec![record("junior", Some(40.0), Some(38.0))];
        let specs = build_chart_specs(&records, "with_grounding", "without_grounding");
        assert_eq!(specs[0].series[0].label, "with_grounding");
        assert_eq!(specs[0].series[1].label, "without_grounding");
    }
}
