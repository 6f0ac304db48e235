//! Display formatting for marker labels.

use chrono::NaiveDate;

/// Label used when a price is missing.
pub const NO_PRICE_LABEL: &str = "정보없음";

/// Label used when an application date is missing.
pub const NO_DATE_LABEL: &str = "신청일 정보 없음";

/// Maximum characters of a building name shown on its marker.
pub const MARKER_NAME_CHARS: usize = 6;

/// Formats a price given in units of 10,000 KRW as 억 with one decimal.
pub fn format_price_eok(price: Option<f64>) -> String {
    match price {
        Some(p) if p.is_finite() => format!("{:.1}억", p / 10_000.0),
        _ => NO_PRICE_LABEL.to_string(),
    }
}

/// District average price label.
pub fn format_area_price(avg_price: f64) -> String {
    if avg_price.is_finite() {
        format!("{:.1}억원", avg_price / 10_000.0)
    } else {
        NO_PRICE_LABEL.to_string()
    }
}

/// Truncates to at most `max_chars` characters.
pub fn truncate_name(name: &str, max_chars: usize) -> String {
    name.chars().take(max_chars).collect()
}

/// Formats an application start date as `YY.MM.DD`.
///
/// Accepts `YYYY-MM-DD` and `YYYYMMDD`. Unparsable input is returned as is.
pub fn format_receipt_date(date: Option<&str>) -> String {
    let Some(raw) = date.map(str::trim).filter(|d| !d.is_empty()) else {
        return NO_DATE_LABEL.to_string();
    };

    ["%Y-%m-%d", "%Y%m%d", "%Y.%m.%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .map(|d| d.format("%y.%m.%d").to_string())
        .unwrap_or_else(|| raw.to_string())
}
