use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(
    name = "estcompare",
    version,
    about = "Reconcile and report per-scenario pricing-estimation runs"
)]
pub struct Cli {
    /// Dataset paths: left then right. With one path the tool runs in
    /// single-dataset mode; with none it resolves the latest pointers
    /// under the results directory.
    #[arg(value_name = "DATASET", num_args = 0..=2)]
    pub datasets: Vec<PathBuf>,

    #[arg(long, default_value = "results")]
    pub results_dir: PathBuf,

    /// Suppress the textual console report and emit only rendered artifacts.
    #[arg(long, default_value_t = false)]
    pub charts_only: bool,

    /// Side used as the denominator for percentage differences.
    #[arg(long, value_enum, default_value_t = BaselineSide::Right)]
    pub baseline: BaselineSide,

    #[arg(long)]
    pub export_path: Option<PathBuf>,

    #[arg(long)]
    pub report_dir: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaselineSide {
    Left,
    Right,
}

impl BaselineSide {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}
