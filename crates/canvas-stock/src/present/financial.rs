//! Financial statement and dividend tables

use super::format::growth_rate;
use crate::model::DividendInfo;
use crate::model::analysis::{BalanceRow, CashFlowRow, DividendHistory, IncomeRow};
use serde::Serialize;

/// Quarterly or annual statement view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementView {
    #[default]
    Quarterly,
    Annual,
}

impl StatementView {
    /// Number of trailing periods shown
    pub fn window(self) -> usize {
        match self {
            Self::Quarterly => 4,
            Self::Annual => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Quarterly => "분기",
            Self::Annual => "연간",
        }
    }
}

/// A statement row keyed by its period
pub trait Periodic {
    fn period(&self) -> &str;
}

impl Periodic for IncomeRow {
    fn period(&self) -> &str {
        &self.period
    }
}

impl Periodic for BalanceRow {
    fn period(&self) -> &str {
        &self.period
    }
}

impl Periodic for CashFlowRow {
    fn period(&self) -> &str {
        &self.period
    }
}

/// Rows in chronological order, limited to the view's window
pub fn recent<T: Periodic + Clone>(rows: &[T], view: StatementView) -> Vec<T> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| a.period().cmp(b.period()));
    let start = sorted.len().saturating_sub(view.window());
    sorted.split_off(start)
}

/// Headline figures of the latest period
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeSummary {
    pub period: String,
    pub revenue: f64,
    pub operating_income: f64,
    pub net_income: f64,
    /// Revenue growth against the previous shown period
    pub revenue_growth: f64,
    pub net_income_growth: f64,
    pub profit_margin: f64,
    pub operating_margin: f64,
}

pub fn income_summary(rows: &[IncomeRow], view: StatementView) -> Option<IncomeSummary> {
    let rows = recent(rows, view);
    let latest = rows.last()?;
    let previous = rows.len().checked_sub(2).and_then(|i| rows.get(i));

    let margin = |value: f64| {
        if latest.revenue == 0.0 {
            0.0
        } else {
            value / latest.revenue * 100.0
        }
    };

    Some(IncomeSummary {
        period: latest.period.clone(),
        revenue: latest.revenue,
        operating_income: latest.operating_income,
        net_income: latest.net_income,
        revenue_growth: previous.map_or(0.0, |p| growth_rate(latest.revenue, p.revenue)),
        net_income_growth: previous.map_or(0.0, |p| growth_rate(latest.net_income, p.net_income)),
        profit_margin: margin(latest.net_income),
        operating_margin: margin(latest.operating_income),
    })
}

/// Dividend history ordered by year
pub fn dividend_history(info: &DividendInfo) -> Vec<DividendHistory> {
    let mut history = info.history.clone();
    history.sort_by(|a, b| a.year.cmp(&b.year));
    history
}

#[cfg(test)]
mod tests {
    use super::*;

    fn income(period: &str, revenue: f64, net_income: f64) -> IncomeRow {
        IncomeRow {
            period: period.to_string(),
            revenue,
            operating_income: revenue / 10.0,
            net_income,
            ..Default::default()
        }
    }

    #[test]
    fn test_recent_sorts_and_limits() {
        let rows = vec![
            income("2024Q2", 2.0, 0.0),
            income("2023Q3", 1.0, 0.0),
            income("2024Q1", 1.0, 0.0),
            income("2023Q4", 1.0, 0.0),
            income("2024Q3", 3.0, 0.0),
        ];

        let quarters = recent(&rows, StatementView::Quarterly);
        let periods: Vec<&str> = quarters.iter().map(|r| r.period.as_str()).collect();
        assert_eq!(periods, vec!["2023Q4", "2024Q1", "2024Q2", "2024Q3"]);

        let years = recent(&rows, StatementView::Annual);
        assert_eq!(years.len(), 3);
        assert_eq!(years[0].period, "2024Q1");
    }

    #[test]
    fn test_income_summary() {
        let rows = vec![income("2024Q1", 100.0, 10.0), income("2024Q2", 150.0, 30.0)];
        let summary = income_summary(&rows, StatementView::Quarterly).unwrap();
        assert_eq!(summary.period, "2024Q2");
        assert_eq!(summary.revenue_growth, 50.0);
        assert_eq!(summary.net_income_growth, 200.0);
        assert_eq!(summary.profit_margin, 20.0);
        assert_eq!(summary.operating_margin, 10.0);

        assert!(income_summary(&[], StatementView::Annual).is_none());
    }

    #[test]
    fn test_summary_without_revenue() {
        let rows = vec![income("2024", 0.0, -5.0)];
        let summary = income_summary(&rows, StatementView::Annual).unwrap();
        assert_eq!(summary.profit_margin, 0.0);
        assert_eq!(summary.revenue_growth, 0.0);
    }

    #[test]
    fn test_dividend_history_sorted_by_year() {
        let info = DividendInfo {
            history: ["2023", "2021", "2022"]
                .into_iter()
                .map(|year| DividendHistory {
                    year: year.to_string(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        };
        let years: Vec<String> = dividend_history(&info).into_iter().map(|h| h.year).collect();
        assert_eq!(years, vec!["2021", "2022", "2023"]);
    }
}
