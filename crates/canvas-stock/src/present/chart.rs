//! Price/volume chart series
//!
//! Turns the raw broker rows of the chart section into sorted bars, moving
//! averages, and summary statistics for one display period.

use crate::model::{ChartData, ChartPeriod};
use serde::Serialize;
use serde_json::Value;
use ta::Next;
use ta::indicators::SimpleMovingAverage;

const DATE_KEYS: [&str; 2] = ["stck_cntg_hour", "stck_bsop_date"];
const CLOSE_KEYS: [&str; 2] = ["stck_prpr", "stck_clpr"];
const VOLUME_KEYS: [&str; 2] = ["acml_vol", "cntg_vol"];

pub const SHORT_WINDOW: usize = 20;
pub const LONG_WINDOW: usize = 60;

/// One trading period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBar {
    /// `YYYYMMDD`
    pub date: String,
    pub close: f64,
    pub volume: u64,
}

/// Colour of a volume bar relative to the previous close
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeDirection {
    Neutral,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartStats {
    pub current: f64,
    pub change: f64,
    pub change_percent: f64,
    pub high: f64,
    pub low: f64,
    pub volume: u64,
    pub avg_volume: f64,
    pub is_positive: bool,
}

impl Default for ChartStats {
    fn default() -> Self {
        Self {
            current: 0.0,
            change: 0.0,
            change_percent: 0.0,
            high: 0.0,
            low: 0.0,
            volume: 0,
            avg_volume: 0.0,
            is_positive: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub label: String,
    pub close: f64,
    pub volume: u64,
    pub ma20: Option<f64>,
    pub ma60: Option<f64>,
    pub direction: VolumeDirection,
}

/// Everything needed to draw the chart for one period
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub period: ChartPeriod,
    pub points: Vec<ChartPoint>,
    pub stats: ChartStats,
}

impl ChartSeries {
    pub fn build(chart: &ChartData, period: ChartPeriod) -> Self {
        let bars = extract_bars(&chart.daily_chart);
        let visible = filter_period(&bars, period);

        let closes: Vec<f64> = visible.iter().map(|b| b.close).collect();
        let ma20 = moving_average(&closes, SHORT_WINDOW);
        let ma60 = moving_average(&closes, LONG_WINDOW);
        let directions = volume_directions(visible);

        let points = visible
            .iter()
            .enumerate()
            .map(|(i, bar)| ChartPoint {
                label: date_label(&bar.date, period),
                close: bar.close,
                volume: bar.volume,
                ma20: ma20[i],
                ma60: ma60[i],
                direction: directions[i],
            })
            .collect();

        Self {
            period,
            points,
            stats: stats(visible),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Extract bars from `output`, `output2`, or a bare array, oldest first
pub fn extract_bars(daily_chart: &Value) -> Vec<PriceBar> {
    let rows = ["output", "output2"]
        .iter()
        .find_map(|key| daily_chart.get(key).filter(|v| !v.is_null()))
        .map_or_else(|| daily_chart.as_array(), Value::as_array);

    let mut bars: Vec<PriceBar> = rows
        .map(|rows| {
            rows.iter()
                .map(|row| PriceBar {
                    date: text_field(row, &DATE_KEYS).unwrap_or_default(),
                    close: number_field(row, &CLOSE_KEYS).unwrap_or(0.0),
                    volume: number_field(row, &VOLUME_KEYS).map_or(0, to_volume),
                })
                .collect()
        })
        .unwrap_or_default();

    bars.sort_by_key(|bar| bar.date.parse::<i64>().unwrap_or(0));
    bars
}

/// Most recent bars for a period; the yearly view keeps everything
pub fn filter_period(bars: &[PriceBar], period: ChartPeriod) -> &[PriceBar] {
    match period.window() {
        Some(window) => &bars[bars.len().saturating_sub(window)..],
        None => bars,
    }
}

/// Simple moving average; `None` until `window` values have been seen
pub fn moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let Ok(mut sma) = SimpleMovingAverage::new(window) else {
        return vec![None; values.len()];
    };

    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let average = sma.next(*value);
            (i + 1 >= window).then_some(average)
        })
        .collect()
}

pub fn stats(bars: &[PriceBar]) -> ChartStats {
    let (Some(first), Some(last)) = (bars.first(), bars.last()) else {
        return ChartStats::default();
    };

    let previous = match bars.len().checked_sub(2).map(|i| bars[i].close) {
        Some(close) if close != 0.0 => close,
        _ => first.close,
    };
    let change = last.close - previous;
    let change_percent = if previous == 0.0 {
        0.0
    } else {
        change / previous * 100.0
    };

    let high = bars.iter().map(|b| b.close).fold(f64::MIN, f64::max);
    let low = bars.iter().map(|b| b.close).fold(f64::MAX, f64::min);
    #[allow(clippy::cast_precision_loss)]
    let avg_volume = bars.iter().map(|b| b.volume as f64).sum::<f64>() / bars.len() as f64;

    ChartStats {
        current: last.close,
        change,
        change_percent,
        high,
        low,
        volume: last.volume,
        avg_volume,
        is_positive: change >= 0.0,
    }
}

pub fn volume_directions(bars: &[PriceBar]) -> Vec<VolumeDirection> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| match i.checked_sub(1).map(|p| bars[p].close) {
            None => VolumeDirection::Neutral,
            Some(previous) if bar.close >= previous => VolumeDirection::Up,
            Some(_) => VolumeDirection::Down,
        })
        .collect()
}

/// `MM/DD`, or `YYYY.MM` for the yearly view
pub fn date_label(date: &str, period: ChartPeriod) -> String {
    if date.is_empty() {
        return String::new();
    }
    let year = date.get(0..4).unwrap_or("");
    let month = date.get(4..6).unwrap_or("");
    let day = date.get(6..8).unwrap_or("");

    match period {
        ChartPeriod::Yearly => format!("{year}.{month}"),
        _ => format!("{month}/{day}"),
    }
}

fn text_field(row: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match row.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn number_field(row: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| match row.get(key)? {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_volume(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(n: usize) -> Value {
        let rows: Vec<Value> = (0..n)
            .rev()
            .map(|i| {
                let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Days::new(i as u64);
                json!({
                    "stck_bsop_date": date.format("%Y%m%d").to_string(),
                    "stck_clpr": format!("{}", 1000 + i),
                    "acml_vol": format!("{}", 10_000 + i),
                })
            })
            .collect();
        json!({ "output2": rows })
    }

    #[test]
    fn test_extract_sorts_chronologically() {
        let bars = extract_bars(&rows(5));
        assert_eq!(bars.len(), 5);
        assert_eq!(bars[0].date, "20240101");
        assert_eq!(bars[4].date, "20240105");
        assert_eq!(bars[4].close, 1004.0);
        assert_eq!(bars[4].volume, 10_004);
    }

    #[test]
    fn test_extract_alternate_shapes() {
        let intraday = json!({ "output": [
            { "stck_cntg_hour": "20240102", "stck_prpr": "71000", "cntg_vol": "5" },
            { "stck_cntg_hour": "20240101", "stck_prpr": "70000", "cntg_vol": "3" },
        ]});
        let bars = extract_bars(&intraday);
        assert_eq!(bars[0].close, 70000.0);
        assert_eq!(bars[1].volume, 5);

        let bare = json!([{ "stck_bsop_date": "20240101", "stck_clpr": 500, "acml_vol": 7 }]);
        assert_eq!(extract_bars(&bare)[0].close, 500.0);

        assert!(extract_bars(&json!({})).is_empty());
        assert!(extract_bars(&Value::Null).is_empty());
    }

    #[test]
    fn test_period_windows() {
        let bars = extract_bars(&rows(200));
        assert_eq!(filter_period(&bars, ChartPeriod::Daily).len(), 30);
        assert_eq!(filter_period(&bars, ChartPeriod::Weekly).len(), 90);
        assert_eq!(filter_period(&bars, ChartPeriod::Monthly).len(), 180);
        assert_eq!(filter_period(&bars, ChartPeriod::Yearly).len(), 200);

        let short = &bars[..10];
        assert_eq!(filter_period(short, ChartPeriod::Daily).len(), 10);
        assert_eq!(filter_period(&bars, ChartPeriod::Daily)[29].date, bars[199].date);
    }

    #[test]
    fn test_moving_average_waits_for_full_window() {
        let values: Vec<f64> = (1..=5).map(f64::from).collect();
        let ma = moving_average(&values, 3);
        assert_eq!(ma[0], None);
        assert_eq!(ma[1], None);
        assert_eq!(ma[2], Some(2.0));
        assert_eq!(ma[4], Some(4.0));

        assert!(moving_average(&values, 0).iter().all(Option::is_none));
        assert!(moving_average(&values, 10).iter().all(Option::is_none));
    }

    #[test]
    fn test_stats() {
        let bars = vec![
            PriceBar { date: "20240101".into(), close: 100.0, volume: 10 },
            PriceBar { date: "20240102".into(), close: 120.0, volume: 30 },
            PriceBar { date: "20240103".into(), close: 110.0, volume: 20 },
        ];
        let stats = stats(&bars);
        assert_eq!(stats.current, 110.0);
        assert_eq!(stats.change, -10.0);
        assert!((stats.change_percent + 8.333).abs() < 0.01);
        assert_eq!(stats.high, 120.0);
        assert_eq!(stats.low, 100.0);
        assert_eq!(stats.volume, 20);
        assert_eq!(stats.avg_volume, 20.0);
        assert!(!stats.is_positive);

        assert_eq!(super::stats(&[]), ChartStats::default());
    }

    #[test]
    fn test_volume_directions() {
        let bars = vec![
            PriceBar { date: "1".into(), close: 100.0, volume: 1 },
            PriceBar { date: "2".into(), close: 100.0, volume: 1 },
            PriceBar { date: "3".into(), close: 90.0, volume: 1 },
        ];
        assert_eq!(
            volume_directions(&bars),
            vec![VolumeDirection::Neutral, VolumeDirection::Up, VolumeDirection::Down]
        );
    }

    #[test]
    fn test_date_labels() {
        assert_eq!(date_label("20240315", ChartPeriod::Daily), "03/15");
        assert_eq!(date_label("20240315", ChartPeriod::Monthly), "03/15");
        assert_eq!(date_label("20240315", ChartPeriod::Yearly), "2024.03");
        assert_eq!(date_label("", ChartPeriod::Daily), "");
    }

    #[test]
    fn test_series_build() {
        let chart = ChartData {
            daily_chart: rows(100),
            ..Default::default()
        };
        let series = ChartSeries::build(&chart, ChartPeriod::Weekly);
        assert_eq!(series.points.len(), 90);
        assert!(series.points[18].ma20.is_none());
        assert!(series.points[19].ma20.is_some());
        assert!(series.points[58].ma60.is_none());
        assert!(series.points[59].ma60.is_some());
        assert_eq!(series.points[0].direction, VolumeDirection::Neutral);
        assert!(series.stats.is_positive);
        assert_eq!(series.stats.current, 1099.0);
    }
}
