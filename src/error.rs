use std::fmt;
use std::path::PathBuf;

/// Failure taxonomy for the comparison pipeline.
///
/// `InputNotFound`, `Io` and `MalformedInput` are fatal and abort the whole
/// pass. `Render` is contained to a single report page by the assembler.
#[derive(Debug)]
pub enum CompareError {
    /// A required dataset file is absent.
    InputNotFound { path: PathBuf },
    /// An existing dataset file could not be read.
    Io { path: PathBuf, detail: String },
    /// A dataset document is structurally invalid (unparseable, missing
    /// scenario identity, duplicate scenario key).
    MalformedInput { path: PathBuf, detail: String },
    /// A single chart could not be produced.
    Render { chart: String, detail: String },
}

impl fmt::Display for CompareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputNotFound { path } => {
                write!(f, "input file not found: {}", path.display())
            }
            Self::Io { path, detail } => {
                write!(f, "failed to read {}: {detail}", path.display())
            }
            Self::MalformedInput { path, detail } => {
                write!(f, "malformed input {}: {detail}", path.display())
            }
            Self::Render { chart, detail } => {
                write!(f, "failed to render chart '{chart}': {detail}")
            }
        }
    }
}

impl std::error::Error for CompareError {}
