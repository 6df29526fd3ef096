//! Korean number, currency, and date formatting

use chrono::NaiveDate;

const JO: f64 = 1_000_000_000_000.0;
const EOK: f64 = 100_000_000.0;
const CHEONMAN: f64 = 10_000_000.0;

/// Insert thousands separators, keeping `decimals` fraction digits
pub fn group_digits(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0');
    let sign = if negative { "-" } else { "" };
    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Market cap in won: `조원` above a trillion, `억원` above a hundred million
pub fn market_cap(value: f64) -> String {
    if value >= JO {
        format!("{:.2}조원", value / JO)
    } else if value >= EOK {
        format!("{:.0}억원", value / EOK)
    } else {
        format!("{}원", group_digits(value, 0))
    }
}

/// Financial statement value given in 억원 units
pub fn financial_value(eok: f64) -> String {
    let won = eok * EOK;
    let sign = if won < 0.0 { "-" } else { "" };
    let abs = won.abs();

    if abs >= JO {
        format!("{sign}{:.1}조", abs / JO)
    } else if abs >= EOK {
        format!("{sign}{:.0}억", abs / EOK)
    } else if abs >= CHEONMAN {
        format!("{sign}{:.1}천만", abs / CHEONMAN)
    } else {
        group_digits(won, 0)
    }
}

/// Two-decimal grouped number with a unit suffix; `-` when missing
pub fn number(value: Option<f64>, suffix: &str) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{}{suffix}", group_digits(v, 2)),
        _ => "-".to_string(),
    }
}

/// Won amount, e.g. `₩1,444`
pub fn krw(value: f64) -> String {
    if value < 0.0 {
        format!("-₩{}", group_digits(value.abs(), 0))
    } else {
        format!("₩{}", group_digits(value, 0))
    }
}

pub fn percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// Trading volume, e.g. `12.3M` or `450K`
pub fn volume(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.0}K", value / 1_000.0)
    } else {
        format!("{value:.0}")
    }
}

/// Date as `2024년 3월 29일`; `미정` when missing
///
/// Accepts `YYYY-MM-DD` and `YYYYMMDD`. Anything else is returned as is.
pub fn korean_date(date: Option<&str>) -> String {
    let Some(raw) = date.map(str::trim).filter(|d| !d.is_empty()) else {
        return "미정".to_string();
    };

    let day_part = raw.get(..10).unwrap_or(raw);
    let parsed = NaiveDate::parse_from_str(day_part, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y%m%d"));

    match parsed {
        Ok(date) => date.format("%Y년 %-m월 %-d일").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Period-over-period growth in percent; 0 when there is no base
pub fn growth_rate(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        (current - previous) / previous.abs() * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits(0.0, 0), "0");
        assert_eq!(group_digits(999.0, 0), "999");
        assert_eq!(group_digits(1_000.0, 0), "1,000");
        assert_eq!(group_digits(1_234_567.891, 2), "1,234,567.89");
        assert_eq!(group_digits(-98_765.4, 1), "-98,765.4");
        assert_eq!(group_digits(-0.001, 2), "0.00");
    }

    #[test]
    fn test_market_cap() {
        assert_eq!(market_cap(432_000_000_000_000.0), "432.00조원");
        assert_eq!(market_cap(1_500_000_000_000.0), "1.50조원");
        assert_eq!(market_cap(52_300_000_000.0), "523억원");
        assert_eq!(market_cap(12_345_678.0), "12,345,678원");
    }

    #[test]
    fn test_financial_value_in_eok_units() {
        assert_eq!(financial_value(2_589_355.0), "258.9조");
        assert_eq!(financial_value(6_567.0), "6567억");
        assert_eq!(financial_value(0.5), "5.0천만");
        assert_eq!(financial_value(0.01), "1,000,000");
        assert_eq!(financial_value(-12_000.0), "-1.2조");
    }

    #[test]
    fn test_number_and_percent() {
        assert_eq!(number(Some(12.346), "배"), "12.35배");
        assert_eq!(number(Some(1_234.0), "원"), "1,234.00원");
        assert_eq!(number(None, "%"), "-");
        assert_eq!(percent(2.0), "2.00%");
    }

    #[test]
    fn test_krw_and_volume() {
        assert_eq!(krw(1_444.0), "₩1,444");
        assert_eq!(krw(-500.0), "-₩500");
        assert_eq!(volume(12_345_678.0), "12.3M");
        assert_eq!(volume(45_000.0), "45K");
        assert_eq!(volume(999.0), "999");
    }

    #[test]
    fn test_korean_date() {
        assert_eq!(korean_date(Some("2024-12-27")), "2024년 12월 27일");
        assert_eq!(korean_date(Some("20240401")), "2024년 4월 1일");
        assert_eq!(korean_date(Some("2024-04-01T00:00:00Z")), "2024년 4월 1일");
        assert_eq!(korean_date(None), "미정");
        assert_eq!(korean_date(Some("")), "미정");
        assert_eq!(korean_date(Some("soon")), "soon");
    }

    #[test]
    fn test_growth_rate() {
        assert!((growth_rate(120.0, 100.0) - 20.0).abs() < 1e-9);
        assert!((growth_rate(-50.0, -100.0) - 50.0).abs() < 1e-9);
        assert_eq!(growth_rate(10.0, 0.0), 0.0);
    }
}
