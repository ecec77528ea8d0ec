//! The four finance products and the carousel that cycles between them.
//!
//! Each product is a [`ProductCalculator`] strategy. Calculators read the
//! shared [`FinanceInputs`] and never write to it or to each other, so they
//! can all be re-run on every edit in any order.

pub mod balloon;
pub mod islamic;
pub mod lease;
pub mod standard;

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amortization::{finite_or_zero, AmortizationRow};
use crate::error::FinanceError;
use crate::inputs::FinanceInputs;
use crate::types::Money;

pub use balloon::{BalloonLoan, BalloonQuote};
pub use islamic::{IslamicDisclosure, IslamicFinance};
pub use lease::{Lease, LeaseQuote};
pub use standard::{StandardLoan, StandardQuote};

// ---------------------------------------------------------------------------
// Product selection
// ---------------------------------------------------------------------------

/// Finance products offered on the vehicle page, in carousel order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinanceProduct {
    #[default]
    StandardLoan,
    BalloonPayment,
    Lease,
    IslamicFinance,
}

impl FinanceProduct {
    pub const ALL: [FinanceProduct; 4] = [
        FinanceProduct::StandardLoan,
        FinanceProduct::BalloonPayment,
        FinanceProduct::Lease,
        FinanceProduct::IslamicFinance,
    ];

    fn position(self) -> usize {
        match self {
            FinanceProduct::StandardLoan => 0,
            FinanceProduct::BalloonPayment => 1,
            FinanceProduct::Lease => 2,
            FinanceProduct::IslamicFinance => 3,
        }
    }

    /// Following product, wrapping from the last back to the first.
    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    /// Preceding product, wrapping from the first to the last.
    pub fn prev(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            FinanceProduct::StandardLoan => "Standard Loan",
            FinanceProduct::BalloonPayment => "Balloon Payment",
            FinanceProduct::Lease => "Lease",
            FinanceProduct::IslamicFinance => "Islamic Finance",
        }
    }

    /// Whether the product produces figures at all.
    pub fn is_computed(self) -> bool {
        !matches!(self, FinanceProduct::IslamicFinance)
    }
}

impl fmt::Display for FinanceProduct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FinanceProduct {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "standard" | "standard_loan" | "loan" => Ok(FinanceProduct::StandardLoan),
            "balloon" | "balloon_payment" | "balloon_loan" => Ok(FinanceProduct::BalloonPayment),
            "lease" => Ok(FinanceProduct::Lease),
            "islamic" | "islamic_finance" => Ok(FinanceProduct::IslamicFinance),
            _ => Err(FinanceError::UnknownProduct(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Calculator seam
// ---------------------------------------------------------------------------

/// A finance product's pricing strategy.
pub trait ProductCalculator: fmt::Debug + Send + Sync {
    fn product(&self) -> FinanceProduct;

    /// Price the product from the shared inputs. Must not fail: degenerate
    /// arithmetic resolves to zero.
    fn quote(&self, inputs: &FinanceInputs) -> ProductQuote;

    /// Month-by-month repayment rows. Products that do not amortize a
    /// balance return an empty schedule.
    fn schedule(&self, _inputs: &FinanceInputs) -> Vec<AmortizationRow> {
        Vec::new()
    }
}

/// One product's figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "product", rename_all = "snake_case")]
pub enum ProductQuote {
    StandardLoan(StandardQuote),
    BalloonPayment(BalloonQuote),
    Lease(LeaseQuote),
    IslamicFinance(IslamicDisclosure),
}

impl ProductQuote {
    pub fn product(&self) -> FinanceProduct {
        match self {
            ProductQuote::StandardLoan(_) => FinanceProduct::StandardLoan,
            ProductQuote::BalloonPayment(_) => FinanceProduct::BalloonPayment,
            ProductQuote::Lease(_) => FinanceProduct::Lease,
            ProductQuote::IslamicFinance(_) => FinanceProduct::IslamicFinance,
        }
    }

    /// `None` for products that carry no figures.
    pub fn monthly_payment(&self) -> Option<Money> {
        match self {
            ProductQuote::StandardLoan(q) => Some(q.monthly_payment),
            ProductQuote::BalloonPayment(q) => Some(q.monthly_payment),
            ProductQuote::Lease(q) => Some(q.monthly_payment),
            ProductQuote::IslamicFinance(_) => None,
        }
    }

    pub fn total_payment(&self) -> Option<Money> {
        match self {
            ProductQuote::StandardLoan(q) => Some(q.total_payment),
            ProductQuote::BalloonPayment(q) => Some(q.total_payment),
            ProductQuote::Lease(q) => Some(q.total_payment),
            ProductQuote::IslamicFinance(_) => None,
        }
    }

    /// Every figure in the quote, for invariant checks.
    pub fn amounts(&self) -> Vec<Money> {
        match self {
            ProductQuote::StandardLoan(q) => vec![
                q.principal,
                q.monthly_payment,
                q.total_payment,
                q.total_interest,
            ],
            ProductQuote::BalloonPayment(q) => vec![
                q.principal,
                q.monthly_payment,
                q.total_payment,
                q.final_lump_sum,
            ],
            ProductQuote::Lease(q) => vec![
                q.monthly_payment,
                q.total_payment,
                q.depreciation_component,
                q.finance_charge_component,
            ],
            ProductQuote::IslamicFinance(_) => Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Result set
// ---------------------------------------------------------------------------

/// Quotes for every product, in carousel order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinanceResults {
    pub quotes: Vec<ProductQuote>,
}

impl FinanceResults {
    /// Run every calculator against the same inputs.
    pub fn compute(calculators: &[Box<dyn ProductCalculator>], inputs: &FinanceInputs) -> Self {
        Self {
            quotes: calculators.iter().map(|c| c.quote(inputs)).collect(),
        }
    }

    pub fn get(&self, product: FinanceProduct) -> Option<&ProductQuote> {
        self.quotes.iter().find(|q| q.product() == product)
    }

    pub fn standard(&self) -> Option<&StandardQuote> {
        self.quotes.iter().find_map(|q| match q {
            ProductQuote::StandardLoan(s) => Some(s),
            _ => None,
        })
    }

    pub fn balloon(&self) -> Option<&BalloonQuote> {
        self.quotes.iter().find_map(|q| match q {
            ProductQuote::BalloonPayment(b) => Some(b),
            _ => None,
        })
    }

    pub fn lease(&self) -> Option<&LeaseQuote> {
        self.quotes.iter().find_map(|q| match q {
            ProductQuote::Lease(l) => Some(l),
            _ => None,
        })
    }

    pub fn islamic(&self) -> Option<&IslamicDisclosure> {
        self.quotes.iter().find_map(|q| match q {
            ProductQuote::IslamicFinance(i) => Some(i),
            _ => None,
        })
    }

    /// Computed product with the lowest monthly payment.
    pub fn cheapest_monthly(&self) -> Option<FinanceProduct> {
        self.quotes
            .iter()
            .filter_map(|q| q.monthly_payment().map(|m| (q.product(), m)))
            .min_by(|a, b| a.1.cmp(&b.1))
            .map(|(product, _)| product)
    }
}

/// The four standard calculators in carousel order.
pub fn default_calculators(islamic: IslamicFinance) -> Vec<Box<dyn ProductCalculator>> {
    vec![
        Box::new(StandardLoan),
        Box::new(BalloonLoan),
        Box::new(Lease),
        Box::new(islamic),
    ]
}

/// Resolve a checked figure for a quote: unrepresentable becomes 0 and
/// negatives are floored at 0.
pub(crate) fn safe_amount(value: Option<Decimal>, context: &str) -> Money {
    finite_or_zero(value, context).max(Decimal::ZERO)
}
