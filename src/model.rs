use serde::{Deserialize, Serialize};

/// One raw result document produced by an estimation run under a single
/// experimental condition.
#[derive(Debug, Clone, Deserialize)]
pub struct InputDocument {
    pub timestamp: Option<String>,
    pub condition_flag: Option<String>,
    #[serde(default)]
    pub results: Vec<RawScenarioResult>,
}

/// Outcome of one estimation run for one scenario. Every numeric and metadata
/// field is independently optional; a failed run leaves them undefined.
///
/// `scenario_key` is optional at the wire level so the loader can report a
/// missing identity as a malformed document instead of a bare parse error.
#[derive(Debug, Clone, Deserialize)]
pub struct RawScenarioResult {
    pub scenario_key: Option<String>,
    pub skills: Option<String>,
    #[serde(default)]
    pub success: bool,
    pub estimate: Option<Estimate>,
    pub costs: Option<CostBreakdown>,
    pub income: Option<IncomeEstimate>,
    pub sources_count: Option<u32>,
    pub has_external_source: Option<bool>,
    #[serde(default)]
    pub sources: Vec<String>,
    pub market_research: Option<MarketResearch>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Estimate {
    pub recommended_rate: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CostBreakdown {
    pub monthly_software_cost: Option<f64>,
    pub monthly_workspace_cost: Option<f64>,
    pub monthly_equipment_cost: Option<f64>,
    pub total_monthly_expenses: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncomeEstimate {
    pub suggested_monthly_income: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketResearch {
    pub median_rate: Option<f64>,
    pub position: Option<String>,
}

/// Flattened per-side view of one scenario result, as carried by a
/// comparison record and the export document. A failed or missing run
/// flattens to all-absent fields, never zero-filled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SideView {
    pub rate: Option<f64>,
    pub software_cost: Option<f64>,
    pub workspace_cost: Option<f64>,
    pub equipment_cost: Option<f64>,
    pub total_expenses: Option<f64>,
    pub suggested_income: Option<f64>,
    pub sources_count: Option<u32>,
    pub has_external_source: Option<bool>,
    #[serde(default)]
    pub sources: Vec<String>,
    pub market_median: Option<f64>,
    pub market_position: Option<String>,
}

impl SideView {
    /// Flatten a raw result. Unsuccessful runs contribute nothing: their
    /// fields stay undefined rather than defaulting to zero.
    pub fn from_result(result: &RawScenarioResult) -> Self {
        if !result.success {
            return Self::default();
        }

        Self {
            rate: result.estimate.as_ref().and_then(|e| e.recommended_rate),
            software_cost: result.costs.as_ref().and_then(|c| c.monthly_software_cost),
            workspace_cost: result.costs.as_ref().and_then(|c| c.monthly_workspace_cost),
            equipment_cost: result.costs.as_ref().and_then(|c| c.monthly_equipment_cost),
            total_expenses: result.costs.as_ref().and_then(|c| c.total_monthly_expenses),
            suggested_income: result
                .income
                .as_ref()
                .and_then(|i| i.suggested_monthly_income),
            sources_count: result.sources_count,
            has_external_source: result.has_external_source,
            sources: result.sources.clone(),
            market_median: result.market_research.as_ref().and_then(|m| m.median_rate),
            market_position: result
                .market_research
                .as_ref()
                .and_then(|m| m.position.clone()),
        }
    }
}
