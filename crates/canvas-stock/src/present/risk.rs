//! Risk section labels

use crate::model::Level;
use crate::model::analysis::RiskFactor;
use serde::Serialize;

/// Bankruptcy-risk zone from the Altman Z-score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AltmanZone {
    Safe,
    Grey,
    Distress,
}

impl AltmanZone {
    pub fn from_score(score: f64) -> Self {
        if score > 2.99 {
            Self::Safe
        } else if score > 1.8 {
            Self::Grey
        } else {
            Self::Distress
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Safe => "안전",
            Self::Grey => "주의",
            Self::Distress => "위험",
        }
    }
}

/// `낮음`/`보통`/`높음`; a missing or unknown level reads as high
pub fn level_label(level: Option<Level>) -> &'static str {
    match level {
        Some(Level::Low) => "낮음",
        Some(Level::Medium) => "보통",
        Some(Level::High | Level::Unknown) | None => "높음",
    }
}

/// Position on the 1-3 risk matrix axis; a missing or unknown level reads as low
pub fn level_score(level: Option<Level>) -> u8 {
    match level {
        Some(Level::High) => 3,
        Some(Level::Medium) => 2,
        Some(Level::Low | Level::Unknown) | None => 1,
    }
}

/// Impact and probability scores of one risk factor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixPoint {
    pub category: String,
    pub impact: u8,
    pub probability: u8,
}

pub fn risk_matrix(factors: &[RiskFactor]) -> Vec<MatrixPoint> {
    factors
        .iter()
        .map(|factor| MatrixPoint {
            category: factor.category.clone(),
            impact: level_score(factor.impact),
            probability: level_score(factor.probability),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_altman_zones() {
        assert_eq!(AltmanZone::from_score(3.5), AltmanZone::Safe);
        assert_eq!(AltmanZone::from_score(2.99), AltmanZone::Grey);
        assert_eq!(AltmanZone::from_score(1.81), AltmanZone::Grey);
        assert_eq!(AltmanZone::from_score(1.8), AltmanZone::Distress);
        assert_eq!(AltmanZone::from_score(-1.0).label(), "위험");
    }

    #[test]
    fn test_level_labels_and_scores() {
        assert_eq!(level_label(Some(Level::Low)), "낮음");
        assert_eq!(level_label(Some(Level::Medium)), "보통");
        assert_eq!(level_label(None), "높음");
        assert_eq!(level_score(Some(Level::High)), 3);
        assert_eq!(level_score(None), 1);
        assert_eq!(level_label(Some(Level::Unknown)), "높음");
        assert_eq!(level_score(Some(Level::Unknown)), 1);
    }

    #[test]
    fn test_risk_matrix() {
        let factors = vec![RiskFactor {
            category: "시장".to_string(),
            impact: Some(Level::High),
            probability: Some(Level::Medium),
            ..Default::default()
        }];
        assert_eq!(
            risk_matrix(&factors),
            vec![MatrixPoint {
                category: "시장".to_string(),
                impact: 3,
                probability: 2,
            }]
        );
    }
}
