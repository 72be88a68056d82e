use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;

/// Round a currency amount to cents, halves away from zero.
pub fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `percent` percent of `amount`, or `None` if the product overflows
pub fn percent_of(amount: Decimal, percent: Decimal) -> Option<Decimal> {
    amount.checked_mul(percent)?.checked_div(dec!(100))
}

/// Parse a user-entered number, tolerating currency symbols, thousands
/// separators and a trailing percent sign. Anything unparseable is 0.
pub fn parse_amount(s: &str) -> Decimal {
    let cleaned: String = s
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '%') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return Decimal::ZERO;
    }
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .unwrap_or_else(|_| {
            log::warn!("Unparseable amount '{}', using 0", s);
            Decimal::ZERO
        })
}

pub fn format_cad(amount: Decimal) -> String {
    if amount < Decimal::ZERO {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${:.2}", amount)
    }
}

pub fn format_percent(percent: Decimal) -> String {
    format!("{}%", percent.normalize())
}

/// Deserialize an optional amount from either a JSON number or a loosely
/// formatted string. Empty strings and nulls are `None`.
///
/// Numbers are read through their decimal text (serde_json
/// `arbitrary_precision`) so no digits are lost to `f64`.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<JsonValue>::deserialize(deserializer)? {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Number(n)) => Ok(Some(parse_amount(&n.to_string()))),
        Some(JsonValue::String(s)) if s.trim().is_empty() => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(parse_amount(&s))),
        Some(other) => Err(de::Error::invalid_type(
            Unexpected::Other(&other.to_string()),
            &"a number or a numeric string",
        )),
    }
}

/// Deserialize an optional amount from a text field (CSV). Blank is `None`.
pub fn deserialize_lenient_str<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_str(LenientAmount)
}

struct LenientAmount;

impl<'de> Visitor<'de> for LenientAmount {
    type Value = Option<Decimal>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a numeric string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        if v.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(parse_amount(v)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round2_half_away_from_zero() {
        assert_eq!(round2(dec!(358.875)), dec!(358.88));
        assert_eq!(round2(dec!(0.125)), dec!(0.13));
        assert_eq!(round2(dec!(-0.125)), dec!(-0.13));
        assert_eq!(round2(dec!(72.6715)), dec!(72.67));
    }

    #[test]
    fn parse_amount_strips_formatting() {
        assert_eq!(parse_amount("$1,234.50"), dec!(1234.50));
        assert_eq!(parse_amount(" 80% "), dec!(80));
        assert_eq!(parse_amount("113"), dec!(113));
    }

    #[test]
    fn parse_amount_garbage_is_zero() {
        assert_eq!(parse_amount(""), Decimal::ZERO);
        assert_eq!(parse_amount("abc"), Decimal::ZERO);
        assert_eq!(parse_amount("NaN"), Decimal::ZERO);
    }

    #[test]
    fn format_cad_signs() {
        assert_eq!(format_cad(dec!(13)), "$13.00");
        assert_eq!(format_cad(dec!(-4.5)), "-$4.50");
    }

    #[test]
    fn lenient_deserialize_from_json() {
        #[derive(serde::Deserialize)]
        struct Row {
            #[serde(default, deserialize_with = "deserialize_lenient")]
            amount: Option<Decimal>,
        }

        let row: Row = serde_json::from_str(r#"{"amount": 59.99}"#).unwrap();
        assert_eq!(row.amount, Some(dec!(59.99)));
        let row: Row = serde_json::from_str(r#"{"amount": "$282.50"}"#).unwrap();
        assert_eq!(row.amount, Some(dec!(282.50)));
        let row: Row = serde_json::from_str(r#"{"amount": null}"#).unwrap();
        assert_eq!(row.amount, None);
        let row: Row = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(row.amount, None);
        let row: Row = serde_json::from_str(r#"{"amount": ""}"#).unwrap();
        assert_eq!(row.amount, None);
        assert!(serde_json::from_str::<Row>(r#"{"amount": [1]}"#).is_err());
    }

    #[test]
    fn lenient_deserialize_keeps_every_digit() {
        #[derive(serde::Deserialize)]
        struct Row {
            #[serde(default, deserialize_with = "deserialize_lenient")]
            amount: Option<Decimal>,
        }

        let row: Row = serde_json::from_str(r#"{"amount": 12345678901234567.89}"#).unwrap();
        assert_eq!(row.amount, Some(dec!(12345678901234567.89)));
        let row: Row = serde_json::from_str(r#"{"amount": 1e3}"#).unwrap();
        assert_eq!(row.amount, Some(dec!(1000)));
    }

    #[test]
    fn lenient_csv_field_keeps_every_digit() {
        #[derive(serde::Deserialize)]
        struct Row {
            #[serde(deserialize_with = "deserialize_lenient_str")]
            amount: Option<Decimal>,
        }

        let data = "amount\n12345678901234567.89\n\"$1,200\"\n\"\"\n";
        let mut rdr = csv::Reader::from_reader(data.as_bytes());
        let rows: Vec<Row> = rdr.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows[0].amount, Some(dec!(12345678901234567.89)));
        assert_eq!(rows[1].amount, Some(dec!(1200)));
        assert_eq!(rows[2].amount, None);
    }
}
