//! Islamic finance is disclosed, never priced. The calculator exists so
//! the product takes its place in the carousel and result set, and it
//! deliberately produces no figures rather than borrowing another
//! product's formula.

use serde::{Deserialize, Serialize};

use super::{FinanceProduct, ProductCalculator, ProductQuote};
use crate::config::EngineConfig;
use crate::inputs::FinanceInputs;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IslamicDisclosure {
    pub title: String,
    pub disclosure: String,
}

#[derive(Debug, Clone)]
pub struct IslamicFinance {
    disclosure: IslamicDisclosure,
}

impl IslamicFinance {
    pub fn new(title: impl Into<String>, disclosure: impl Into<String>) -> Self {
        Self {
            disclosure: IslamicDisclosure {
                title: title.into(),
                disclosure: disclosure.into(),
            },
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(&config.islamic_title, &config.islamic_disclosure)
    }
}

impl Default for IslamicFinance {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl ProductCalculator for IslamicFinance {
    fn product(&self) -> FinanceProduct {
        FinanceProduct::IslamicFinance
    }

    fn quote(&self, _inputs: &FinanceInputs) -> ProductQuote {
        ProductQuote::IslamicFinance(self.disclosure.clone())
    }
}
