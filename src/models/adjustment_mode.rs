//! Co-convened adjustment mode.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// How co-convened bundles are adjusted.
///
/// # Example
///
/// ```
/// use workload_engine::models::AdjustmentMode;
///
/// let mode: AdjustmentMode = "Split".parse().unwrap();
/// assert_eq!(mode, AdjustmentMode::Split);
/// assert!("average".parse::<AdjustmentMode>().is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentMode {
    /// One representative carries the combined enrollment; the others carry
    /// a fixed placeholder load.
    #[default]
    Collapse,
    /// Every member keeps its own load divided by the bundle size.
    Split,
}

impl FromStr for AdjustmentMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "collapse" => Ok(AdjustmentMode::Collapse),
            "split" => Ok(AdjustmentMode::Split),
            _ => Err(EngineError::UnsupportedAdjustmentMode {
                mode: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for AdjustmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdjustmentMode::Collapse => f.write_str("collapse"),
            AdjustmentMode::Split => f.write_str("split"),
        }
    }
}
