// 🏠 Household Entity - one surveyed household and its sampling design fields

use crate::error::{Result, SurveyError, Table};
use serde::{Deserialize, Serialize};

// ============================================================================
// LOCALE
// ============================================================================

/// Urban/rural classification; other survey classes are kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locale {
    Urban,
    Rural,
    Other(String),
}

impl Locale {
    /// Accepts "urban"/"rural" in any case and the survey codes "1"/"2"
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.to_ascii_lowercase().as_str() {
            "urban" | "1" => Locale::Urban,
            "rural" | "2" => Locale::Rural,
            _ => Locale::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Locale::Urban => "urban",
            Locale::Rural => "rural",
            Locale::Other(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Locale::Other(_))
    }
}

impl Serialize for Locale {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Locale {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Locale::parse(&raw))
    }
}

// ============================================================================
// HOUSEHOLD ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Household {
    /// Unique household identifier
    #[serde(rename = "hh_id")]
    pub id: String,

    /// Sampling weight: how many population households this one represents
    pub weight: f64,

    /// Urban/rural classification (column may be absent in older extracts)
    #[serde(rename = "urban_rural", alias = "locale", default)]
    pub locale: Option<Locale>,

    /// Number of persons in the household
    #[serde(rename = "hh_size")]
    pub size: u32,
}

impl Household {
    pub fn new(id: &str, weight: f64, size: u32) -> Self {
        Household {
            id: id.to_string(),
            weight,
            locale: None,
            size,
        }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = Some(locale);
        self
    }

    /// Reject values the analysis cannot use
    ///
    /// `record` is the 1-based data row number, used in the error message.
    pub fn validate(&self, record: usize) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(SurveyError::malformed(
                Table::Households,
                record,
                "empty household identifier",
            ));
        }

        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(SurveyError::malformed(
                Table::Households,
                record,
                format!(
                    "household '{}' has invalid sampling weight {}",
                    self.id, self.weight
                ),
            ));
        }

        if self.size == 0 {
            return Err(SurveyError::malformed(
                Table::Households,
                record,
                format!("household '{}' has size 0", self.id),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_household() {
        let hh = Household::new("H1", 120.5, 4).with_locale(Locale::Rural);
        assert!(hh.validate(1).is_ok());
        assert_eq!(hh.locale, Some(Locale::Rural));
    }

    #[test]
    fn test_non_positive_weight_rejected() {
        let hh = Household::new("H1", 0.0, 4);
        let err = hh.validate(3).unwrap_err();

        assert!(matches!(
            err,
            SurveyError::MalformedInput {
                table: Table::Households,
                record: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_locale_parsing() {
        assert_eq!(Locale::parse("URBAN"), Locale::Urban);
        assert_eq!(Locale::parse(" 2 "), Locale::Rural);

        let peri = Locale::parse("Peri-urban");
        assert_eq!(peri, Locale::Other("Peri-urban".to_string()));
        assert_eq!(peri.as_str(), "Peri-urban");
        assert!(!peri.is_recognized());
    }

    #[test]
    fn test_nan_weight_rejected() {
        let hh = Household::new("H1", f64::NAN, 2);
        assert!(hh.validate(1).is_err());
    }

    #[test]
    fn test_zero_size_rejected() {
        let hh = Household::new("H1", 1.0, 0);
        assert!(hh.validate(1).is_err());
    }
}
