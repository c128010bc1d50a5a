//! Client-side display helpers for amounts, places and times

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::models::Coordinates;

lazy_static! {
    static ref CURRENCY_SYMBOLS: HashMap<&'static str, &'static str> = {
        let mut symbols = HashMap::new();
        symbols.insert("USD", "$");
        symbols.insert("EUR", "€");
        symbols.insert("GBP", "£");
        symbols.insert("JPY", "¥");
        symbols.insert("CNY", "¥");
        symbols.insert("KRW", "₩");
        symbols.insert("INR", "₹");
        symbols.insert("RUB", "₽");
        symbols.insert("TRY", "₺");
        symbols.insert("UAH", "₴");
        symbols.insert("PHP", "₱");
        symbols.insert("NGN", "₦");
        symbols.insert("ILS", "₪");
        symbols.insert("VND", "₫");
        symbols.insert("THB", "฿");
        symbols.insert("BRL", "R$");
        symbols.insert("MXN", "MX$");
        symbols.insert("CAD", "CA$");
        symbols.insert("AUD", "A$");
        symbols.insert("CHF", "CHF");
        symbols
    };
}

/// Symbol for an ISO currency code, or the code itself when unknown
pub fn currency_symbol(code: &str) -> String {
    let code = code.trim().to_uppercase();
    match CURRENCY_SYMBOLS.get(code.as_str()) {
        Some(symbol) => symbol.to_string(),
        None => code,
    }
}

/// `$1,250.00`, or `$1,250` when the listing rounds to whole units
pub fn format_amount(amount: f64, currency: &str, will_round: bool) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let amount = amount.abs();

    let (whole, fraction) = if will_round {
        (amount.round() as u64, None)
    } else {
        let cents = (amount * 100.0).round() as u64;
        (cents / 100, Some(cents % 100))
    };

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match fraction {
        Some(cents) => format!("{}{}{}.{:02}", sign, currency_symbol(currency), grouped, cents),
        None => format!("{}{}{}", sign, currency_symbol(currency), grouped),
    }
}

/// Parse a `"lat,lon"` location string
pub fn parse_coordinates(location: &str) -> Option<Coordinates> {
    let (lat, lon) = location.split_once(',')?;
    let latitude = lat.trim().parse::<f64>().ok()?;
    let longitude = lon.trim().parse::<f64>().ok()?;
    Coordinates::new(latitude, longitude)
}

pub fn format_meeting_time(time: Option<DateTime<Utc>>) -> String {
    match time {
        Some(time) => time.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => "not set".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_currency_symbol_fallback() {
        assert_eq!(currency_symbol("eur"), "€");
        assert_eq!(currency_symbol("XOF"), "XOF");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(1250.0, "USD", false), "$1,250.00");
        assert_eq!(format_amount(1249.6, "USD", true), "$1,250");
        assert_eq!(format_amount(999.999, "GBP", false), "£1,000.00");
        assert_eq!(format_amount(12.5, "COP", false), "COP12.50");
        assert_eq!(format_amount(1234567.0, "EUR", true), "€1,234,567");
    }

    #[test]
    fn test_parse_coordinates() {
        let coords = parse_coordinates(" 19.4326 , -99.1332 ").expect("valid pair");
        assert!((coords.longitude + 99.1332).abs() < 1e-9);

        assert!(parse_coordinates("Zócalo, CDMX").is_none());
        assert!(parse_coordinates("95.0,10.0").is_none());
        assert!(parse_coordinates("10.0").is_none());
    }

    #[test]
    fn test_format_meeting_time() {
        let time = Utc.with_ymd_and_hms(2026, 5, 4, 18, 30, 0).single();
        assert_eq!(format_meeting_time(time), "2026-05-04 18:30 UTC");
        assert_eq!(format_meeting_time(None), "not set");
    }
}
