//! Analysis sections

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// One independently fetched slice of a stock's analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    /// Price and volume chart
    Chart,
    /// Company profile
    Company,
    /// Investment metrics, consensus, and peer comparison
    Metrics,
    /// Financial statements
    Financial,
    /// Dividend data
    Dividend,
    /// Analyst reports and news sentiment
    News,
    /// AI-backed risk analysis
    Risk,
}

impl Section {
    /// All sections in display order
    pub const ALL: [Section; 7] = [
        Section::Chart,
        Section::Company,
        Section::Metrics,
        Section::Financial,
        Section::Dividend,
        Section::News,
        Section::Risk,
    ];

    /// Value of the `sections` query parameter for this section
    pub fn selector(self) -> &'static str {
        match self {
            Self::Chart => "chart",
            Self::Company => "company",
            Self::Metrics => "metrics,peer",
            Self::Financial => "financial",
            Self::Dividend => "dividend",
            Self::News => "news",
            Self::Risk => "risk",
        }
    }

    /// Default request timeout. News and risk run through an LLM upstream.
    pub fn default_timeout(self) -> Duration {
        match self {
            Self::Chart | Self::Company | Self::Dividend => Duration::from_secs(30),
            Self::Metrics | Self::Financial | Self::News => Duration::from_secs(45),
            Self::Risk => Duration::from_secs(60),
        }
    }

    /// Short machine name
    pub fn name(self) -> &'static str {
        match self {
            Self::Chart => "chart",
            Self::Company => "company",
            Self::Metrics => "metrics",
            Self::Financial => "financial",
            Self::Dividend => "dividend",
            Self::News => "news",
            Self::Risk => "risk",
        }
    }

    /// Panel title shown to the user
    pub fn title(self) -> &'static str {
        match self {
            Self::Chart => "주가 차트",
            Self::Company => "기업 정보",
            Self::Metrics => "투자 지표 · 동종업계",
            Self::Financial => "재무제표",
            Self::Dividend => "배당 정보",
            Self::News => "뉴스 · 애널리스트",
            Self::Risk => "AI 리스크 분석",
        }
    }

    /// Text shown while the section is loading
    pub fn loading_text(self) -> &'static str {
        match self {
            Self::Metrics => "동종업계 데이터 로딩 중...",
            Self::Financial => "재무 데이터 로딩 중...",
            Self::Dividend => "배당 정보 로딩 중...",
            Self::Risk => "AI 리스크 분석 중... OpenAI를 통한 분석에 시간이 소요됩니다",
            Self::Chart | Self::Company | Self::News => "데이터 로딩 중...",
        }
    }

    /// Text shown once the section settled without data
    pub fn unavailable_text(self) -> &'static str {
        match self {
            Self::Risk => {
                "리스크 분석 불가: 현재 리스크 분석 데이터를 가져올 수 없습니다. 잠시 후 다시 시도해주세요."
            }
            Self::Dividend => "배당 정보 없음: 현재 배당 정보를 가져올 수 없습니다.",
            Self::Chart => "차트 데이터를 가져올 수 없습니다.",
            Self::Company => "기업 정보를 가져올 수 없습니다.",
            Self::Metrics => "투자 지표를 가져올 수 없습니다.",
            Self::Financial => "재무 데이터를 가져올 수 없습니다.",
            Self::News => "뉴스 데이터를 가져올 수 없습니다.",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chart" => Ok(Self::Chart),
            "company" => Ok(Self::Company),
            "metrics" | "peer" | "metrics,peer" => Ok(Self::Metrics),
            "financial" => Ok(Self::Financial),
            "dividend" => Ok(Self::Dividend),
            "news" => Ok(Self::News),
            "risk" => Ok(Self::Risk),
            other => Err(format!("Unknown section: {other}")),
        }
    }
}
