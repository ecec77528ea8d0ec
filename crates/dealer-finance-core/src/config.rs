use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::FinanceError;
use crate::inputs::{
    MAX_DOWN_PAYMENT_PERCENTAGE, MAX_INTEREST_RATE, MAX_TERM_MONTHS, MIN_INTEREST_RATE,
    MIN_TERM_MONTHS, TERM_STEP_MONTHS,
};
use crate::types::{Months, Percent};
use crate::FinanceResult;

pub const DEFAULT_ISLAMIC_TITLE: &str = "Islamic Finance";

pub const DEFAULT_ISLAMIC_DISCLOSURE: &str = "Sharia-compliant financing is arranged on a \
    profit-share basis rather than interest. Terms depend on the partner institution, so no \
    monthly figure is shown here. Speak to a finance specialist for a personalised quotation.";

/// Defaults used to seed a new finance session.
///
/// Every field has a default, so a config file only needs the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Initial down payment as a share of the vehicle price
    pub down_payment_percentage: Percent,
    /// Initial annual interest rate, percent
    pub interest_rate: Percent,
    /// Initial term in months
    pub loan_term_months: Months,
    /// Initial balloon lump sum as a share of the vehicle price
    pub balloon_percentage: Percent,
    /// Initial lease residual as a share of the vehicle price
    pub residual_percentage: Percent,
    /// Heading shown for the Islamic finance product
    pub islamic_title: String,
    /// Disclosure shown in place of figures for the Islamic finance product
    pub islamic_disclosure: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            down_payment_percentage: dec!(20),
            interest_rate: dec!(4.5),
            loan_term_months: 60,
            balloon_percentage: dec!(30),
            residual_percentage: dec!(40),
            islamic_title: DEFAULT_ISLAMIC_TITLE.to_string(),
            islamic_disclosure: DEFAULT_ISLAMIC_DISCLOSURE.to_string(),
        }
    }
}

impl EngineConfig {
    /// Parse a config from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> FinanceResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject defaults that the input setters would have to clamp.
    pub fn validate(&self) -> FinanceResult<()> {
        if self.down_payment_percentage < Decimal::ZERO
            || self.down_payment_percentage > MAX_DOWN_PAYMENT_PERCENTAGE
        {
            return Err(FinanceError::InvalidInput {
                field: "down_payment_percentage".into(),
                reason: format!("must be between 0 and {MAX_DOWN_PAYMENT_PERCENTAGE}"),
            });
        }

        if self.interest_rate < MIN_INTEREST_RATE || self.interest_rate > MAX_INTEREST_RATE {
            return Err(FinanceError::InvalidInput {
                field: "interest_rate".into(),
                reason: format!("must be between {MIN_INTEREST_RATE} and {MAX_INTEREST_RATE}"),
            });
        }

        if self.loan_term_months < MIN_TERM_MONTHS
            || self.loan_term_months > MAX_TERM_MONTHS
            || self.loan_term_months % TERM_STEP_MONTHS != 0
        {
            return Err(FinanceError::InvalidInput {
                field: "loan_term_months".into(),
                reason: format!(
                    "must be a multiple of {TERM_STEP_MONTHS} between {MIN_TERM_MONTHS} and {MAX_TERM_MONTHS}"
                ),
            });
        }

        for (field, value) in [
            ("balloon_percentage", self.balloon_percentage),
            ("residual_percentage", self.residual_percentage),
        ] {
            if value < Decimal::ZERO || value > dec!(100) {
                return Err(FinanceError::InvalidInput {
                    field: field.into(),
                    reason: "must be between 0 and 100".into(),
                });
            }
        }

        if self.islamic_disclosure.trim().is_empty() {
            return Err(FinanceError::Configuration(
                "islamic_disclosure must not be empty".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EngineConfig::from_json(r#"{ "interest_rate": "6.9" }"#).unwrap();
        assert_eq!(config.interest_rate, dec!(6.9));
        assert_eq!(config.loan_term_months, 60);
        assert_eq!(config.down_payment_percentage, dec!(20));
    }

    #[test]
    fn test_invalid_term_rejected() {
        let err = EngineConfig::from_json(r#"{ "loan_term_months": 30 }"#).unwrap_err();
        match err {
            FinanceError::InvalidInput { field, .. } => assert_eq!(field, "loan_term_months"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_rate_rejected() {
        let config = EngineConfig {
            interest_rate: dec!(12),
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_disclosure_rejected() {
        let config = EngineConfig {
            islamic_disclosure: "   ".into(),
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(FinanceError::Configuration(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        let err = EngineConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, FinanceError::SerializationError(_)));
    }
}
