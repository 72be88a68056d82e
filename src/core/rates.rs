use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Participating HST province
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum Province {
    #[default]
    #[serde(rename = "ON")]
    Ontario,
    #[serde(rename = "NB")]
    NewBrunswick,
    #[serde(rename = "NL")]
    NewfoundlandAndLabrador,
    #[serde(rename = "NS")]
    NovaScotia,
    #[serde(rename = "PE")]
    PrinceEdwardIsland,
}

impl Province {
    pub fn from_str(s: &str) -> Option<Province> {
        match s.trim().to_uppercase().as_str() {
            "ON" => Some(Province::Ontario),
            "NB" => Some(Province::NewBrunswick),
            "NL" => Some(Province::NewfoundlandAndLabrador),
            "NS" => Some(Province::NovaScotia),
            "PE" | "PEI" => Some(Province::PrinceEdwardIsland),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Province::Ontario => "ON",
            Province::NewBrunswick => "NB",
            Province::NewfoundlandAndLabrador => "NL",
            Province::NovaScotia => "NS",
            Province::PrinceEdwardIsland => "PE",
        }
    }

    /// Combined federal + provincial HST rate as a fraction
    pub fn hst_rate(&self) -> Decimal {
        match self {
            Province::Ontario => dec!(0.13),
            Province::NewBrunswick
            | Province::NewfoundlandAndLabrador
            | Province::NovaScotia
            | Province::PrinceEdwardIsland => dec!(0.15),
        }
    }
}

impl fmt::Display for Province {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// CCA class with a prescribed declining-balance rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum CcaClass {
    /// Class 1: buildings acquired after 1987
    #[serde(rename = "1")]
    Class1,
    /// Class 8: furniture, appliances, general equipment
    #[serde(rename = "8")]
    Class8,
    /// Class 10: motor vehicles
    #[serde(rename = "10")]
    Class10,
    /// Class 12: software, small tools
    #[serde(rename = "12")]
    Class12,
    /// Class 14.1: goodwill and other intangibles
    #[serde(rename = "14.1")]
    Class14_1,
    /// Class 50: computers and systems software
    #[serde(rename = "50")]
    Class50,
}

impl CcaClass {
    pub fn from_str(s: &str) -> Option<CcaClass> {
        let s = s.trim();
        let s = s
            .strip_prefix("class")
            .or_else(|| s.strip_prefix("Class"))
            .unwrap_or(s)
            .trim();
        match s {
            "1" => Some(CcaClass::Class1),
            "8" => Some(CcaClass::Class8),
            "10" => Some(CcaClass::Class10),
            "12" => Some(CcaClass::Class12),
            "14.1" => Some(CcaClass::Class14_1),
            "50" => Some(CcaClass::Class50),
            _ => None,
        }
    }

    pub fn number(&self) -> &'static str {
        match self {
            CcaClass::Class1 => "1",
            CcaClass::Class8 => "8",
            CcaClass::Class10 => "10",
            CcaClass::Class12 => "12",
            CcaClass::Class14_1 => "14.1",
            CcaClass::Class50 => "50",
        }
    }

    /// Declining-balance rate in percent
    pub fn rate_percent(&self) -> Decimal {
        match self {
            CcaClass::Class1 => dec!(4),
            CcaClass::Class8 => dec!(20),
            CcaClass::Class10 => dec!(30),
            CcaClass::Class12 => dec!(100),
            CcaClass::Class14_1 => dec!(5),
            CcaClass::Class50 => dec!(55),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CcaClass::Class1 => "Buildings",
            CcaClass::Class8 => "Furniture & equipment",
            CcaClass::Class10 => "Motor vehicles",
            CcaClass::Class12 => "Software & small tools",
            CcaClass::Class14_1 => "Goodwill & intangibles",
            CcaClass::Class50 => "Computers",
        }
    }
}

impl fmt::Display for CcaClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Class {}", self.number())
    }
}

/// Resolve the tax rate in effect: an explicit override wins over the province table.
pub fn effective_tax_rate(province: Province, rate_override: Option<Decimal>) -> Decimal {
    rate_override.unwrap_or_else(|| province.hst_rate())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ontario_is_default_at_13_percent() {
        assert_eq!(Province::default(), Province::Ontario);
        assert_eq!(Province::default().hst_rate(), dec!(0.13));
    }

    #[test]
    fn atlantic_provinces_at_15_percent() {
        for code in ["NB", "NL", "NS", "PE"] {
            let province = Province::from_str(code).unwrap();
            assert_eq!(province.hst_rate(), dec!(0.15), "{code}");
        }
    }

    #[test]
    fn province_from_str() {
        assert_eq!(Province::from_str("on"), Some(Province::Ontario));
        assert_eq!(Province::from_str(" Ns "), Some(Province::NovaScotia));
        assert_eq!(Province::from_str("PEI"), Some(Province::PrinceEdwardIsland));
        assert_eq!(Province::from_str("BC"), None);
    }

    #[test]
    fn cca_class_rates() {
        assert_eq!(CcaClass::Class8.rate_percent(), dec!(20));
        assert_eq!(CcaClass::Class10.rate_percent(), dec!(30));
        assert_eq!(CcaClass::Class12.rate_percent(), dec!(100));
        assert_eq!(CcaClass::Class50.rate_percent(), dec!(55));
    }

    #[test]
    fn cca_class_from_str() {
        assert_eq!(CcaClass::from_str("50"), Some(CcaClass::Class50));
        assert_eq!(CcaClass::from_str("class 8"), Some(CcaClass::Class8));
        assert_eq!(CcaClass::from_str("Class 14.1"), Some(CcaClass::Class14_1));
        assert_eq!(CcaClass::from_str("7"), None);
    }

    #[test]
    fn override_wins_over_province() {
        assert_eq!(effective_tax_rate(Province::Ontario, None), dec!(0.13));
        assert_eq!(
            effective_tax_rate(Province::Ontario, Some(dec!(0.05))),
            dec!(0.05)
        );
    }
}
