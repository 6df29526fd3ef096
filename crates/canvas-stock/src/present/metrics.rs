//! Investment metric cards and peer comparison

use super::format;
use crate::model::{InvestmentMetrics, PeerComparison};
use serde::Serialize;

/// How a metric compares with its thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Indicator {
    Good,
    Neutral,
    Bad,
}

impl Indicator {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Good => "▲",
            Self::Neutral => "-",
            Self::Bad => "▼",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Threshold {
    good: f64,
    bad: f64,
    /// Higher is better
    inverted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricKey {
    Per,
    Pbr,
    Roe,
    Eps,
    Bps,
    DebtRatio,
    CurrentRatio,
    OperatingMargin,
}

impl MetricKey {
    pub const ALL: [MetricKey; 8] = [
        MetricKey::Per,
        MetricKey::Pbr,
        MetricKey::Roe,
        MetricKey::Eps,
        MetricKey::Bps,
        MetricKey::DebtRatio,
        MetricKey::CurrentRatio,
        MetricKey::OperatingMargin,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::Per => "PER",
            Self::Pbr => "PBR",
            Self::Roe => "ROE",
            Self::Eps => "EPS",
            Self::Bps => "BPS",
            Self::DebtRatio => "부채비율",
            Self::CurrentRatio => "유동비율",
            Self::OperatingMargin => "영업이익률",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::Per | Self::Pbr => "배",
            Self::Eps | Self::Bps => "원",
            Self::Roe | Self::DebtRatio | Self::CurrentRatio | Self::OperatingMargin => "%",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Per => "주가수익비율",
            Self::Pbr => "주가순자산비율",
            Self::Roe => "자기자본이익률",
            Self::Eps => "주당순이익",
            Self::Bps => "주당순자산",
            Self::DebtRatio => "총부채/자기자본",
            Self::CurrentRatio => "유동자산/유동부채",
            Self::OperatingMargin => "영업이익/매출액",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            Self::Per => "낮을수록 저평가",
            Self::Pbr => "1 이하면 저평가",
            Self::Roe => "높을수록 효율적",
            Self::Eps | Self::Bps => "높을수록 좋음",
            Self::DebtRatio => "낮을수록 안정적",
            Self::CurrentRatio => "100% 이상이면 안정",
            Self::OperatingMargin => "높을수록 수익성 좋음",
        }
    }

    pub fn value(self, metrics: &InvestmentMetrics) -> Option<f64> {
        match self {
            Self::Per => metrics.per,
            Self::Pbr => metrics.pbr,
            Self::Roe => metrics.roe,
            Self::Eps => metrics.eps,
            Self::Bps => metrics.bps,
            Self::DebtRatio => metrics.debt_ratio,
            Self::CurrentRatio => metrics.current_ratio,
            Self::OperatingMargin => metrics.operating_margin,
        }
    }

    fn threshold(self) -> Option<Threshold> {
        let (good, bad, inverted) = match self {
            Self::Per => (15.0, 30.0, false),
            Self::Pbr => (1.0, 2.0, false),
            Self::Roe => (15.0, 5.0, true),
            Self::DebtRatio => (50.0, 100.0, false),
            Self::CurrentRatio => (150.0, 100.0, true),
            Self::OperatingMargin => (10.0, 5.0, true),
            Self::Eps | Self::Bps => return None,
        };
        Some(Threshold {
            good,
            bad,
            inverted,
        })
    }
}

/// Classify a metric value; metrics without thresholds are always neutral
pub fn indicator(key: MetricKey, value: f64) -> Indicator {
    let Some(t) = key.threshold() else {
        return Indicator::Neutral;
    };

    let (good, bad) = if t.inverted {
        (value >= t.good, value <= t.bad)
    } else {
        (value <= t.good, value >= t.bad)
    };

    if good {
        Indicator::Good
    } else if bad {
        Indicator::Bad
    } else {
        Indicator::Neutral
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricCard {
    pub key: MetricKey,
    pub title: &'static str,
    pub value: Option<f64>,
    pub display: String,
    pub indicator: Indicator,
    pub description: &'static str,
    pub hint: &'static str,
}

pub fn metric_cards(metrics: &InvestmentMetrics) -> Vec<MetricCard> {
    MetricKey::ALL
        .into_iter()
        .map(|key| {
            let value = key.value(metrics);
            MetricCard {
                key,
                title: key.title(),
                value,
                display: format::number(value, key.unit()),
                indicator: value.map_or(Indicator::Neutral, |v| indicator(key, v)),
                description: key.description(),
                hint: key.hint(),
            }
        })
        .collect()
}

/// Company metric next to the industry average
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerRow {
    pub label: &'static str,
    pub company: f64,
    pub industry: f64,
    /// Company value as a percentage of the industry average
    pub relative: f64,
}

/// Value as a percentage of the average; 0 when the average is 0
pub fn normalize(value: f64, average: f64) -> f64 {
    if average == 0.0 {
        0.0
    } else {
        value / average * 100.0
    }
}

/// PER, PBR, ROE, and dividend yield against the industry averages
pub fn peer_rows(
    metrics: &InvestmentMetrics,
    dividend_yield: Option<f64>,
    peers: &PeerComparison,
) -> Vec<PeerRow> {
    let averages = &peers.industry_averages;
    [
        ("PER", metrics.per, averages.per),
        ("PBR", metrics.pbr, averages.pbr),
        ("ROE", metrics.roe, averages.roe),
        ("배당수익률", dividend_yield, averages.dividend_yield),
    ]
    .into_iter()
    .map(|(label, company, industry)| {
        let company = company.unwrap_or(0.0);
        PeerRow {
            label,
            company,
            industry,
            relative: normalize(company, industry),
        }
    })
    .collect()
}
