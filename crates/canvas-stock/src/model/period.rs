//! Chart periods

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chart granularity selectable on the price chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChartPeriod {
    /// Daily, last 30 points
    #[serde(rename = "D")]
    Daily,
    /// Weekly, last 90 points
    #[serde(rename = "W")]
    Weekly,
    /// Monthly, last 180 points
    #[default]
    #[serde(rename = "M")]
    Monthly,
    /// Yearly, every point
    #[serde(rename = "Y")]
    Yearly,
}

impl ChartPeriod {
    /// Value of the `period` query parameter
    pub fn code(self) -> &'static str {
        match self {
            Self::Daily => "D",
            Self::Weekly => "W",
            Self::Monthly => "M",
            Self::Yearly => "Y",
        }
    }

    /// Number of trailing points shown, `None` for all of them
    pub fn window(self) -> Option<usize> {
        match self {
            Self::Daily => Some(30),
            Self::Weekly => Some(90),
            Self::Monthly => Some(180),
            Self::Yearly => None,
        }
    }
}

impl fmt::Display for ChartPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ChartPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "D" | "DAILY" => Ok(Self::Daily),
            "W" | "WEEKLY" => Ok(Self::Weekly),
            "M" | "MONTHLY" => Ok(Self::Monthly),
            "Y" | "YEARLY" => Ok(Self::Yearly),
            other => Err(format!("Invalid period: {other} (expected D, W, M or Y)")),
        }
    }
}
