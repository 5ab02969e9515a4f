//! `loan_calc` is a Rust library for solving fixed-rate loans.
//!
//! Given three of the four loan quantities (principal, monthly payment, number of
//! monthly periods and the annual interest rate, which is always required) it
//! derives the missing one and reports the overpayment, i.e. everything paid on
//! top of the principal. Two repayment schemes are supported:
//! - **Annuity**: the same payment every month.
//! - **Differentiated** (`diff`): the principal is repaid in equal installments and
//!   interest accrues on the remaining balance, so payments decline over time.
//!
//! ## Usage
//!
//! ```rust
//! use loan_calc::{calculate, LoanResult, ParameterSet};
//! use rust_decimal_macros::dec;
//!
//! let params = ParameterSet::from_pairs([
//!     ("type", "annuity"),
//!     ("principal", "1000000"),
//!     ("periods", "60"),
//!     ("interest", "10"),
//! ]);
//!
//! let result = calculate(&params).unwrap();
//! assert_eq!(
//!     result,
//!     LoanResult::Payment { payment: dec!(21248), overpayment: dec!(274880) }
//! );
//! ```

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod engine;
pub mod report;
pub mod resolver;

pub use resolver::{KnownValues, ParameterSet, Resolution};

/// Repayment scheme selected with `--type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scheme {
    /// Constant monthly payment.
    #[serde(rename = "annuity")]
    Annuity,
    /// Equal principal installments with interest on the remaining balance.
    #[serde(rename = "diff")]
    Differentiated,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Annuity => "annuity",
            Scheme::Differentiated => "diff",
        }
    }
}

impl FromStr for Scheme {
    type Err = LoanError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "annuity" => Ok(Scheme::Annuity),
            "diff" => Ok(Scheme::Differentiated),
            other => Err(LoanError::InvalidScheme(other.to_string())),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The quantity a calculation solves for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownField {
    Principal,
    Payment,
    Periods,
}

/// Every reason a calculation can be refused.
///
/// Callers facing end users are expected to collapse all of them into a single
/// "Incorrect parameters" message; the variants exist so tests can tell them apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoanError {
    #[error("calculation type must be `annuity` or `diff`, got `{0}`")]
    InvalidScheme(String),

    #[error("expected at least 4 parameters, got {0}")]
    MissingParameters(usize),

    #[error("differentiated payments cannot be combined with a fixed payment")]
    IncompatibleCombination,

    #[error("interest rate is required")]
    MissingInterest,

    #[error("{field} must not be negative")]
    NegativeValue { field: &'static str },

    #[error("{field} is not a valid number: `{value}`")]
    InvalidNumber { field: &'static str, value: String },

    #[error("exactly one of principal, payment and periods must be omitted, {0} were")]
    AmbiguousUnknown(usize),

    #[error("payment does not cover the monthly interest")]
    InsufficientPayment,

    #[error("number of periods must be greater than zero")]
    ZeroPeriods,

    #[error("a differentiated schedule of {0} months is too long")]
    TooManyPeriods(u32),

    #[error("numeric overflow while computing {0}")]
    Overflow(&'static str),
}

/// Payment details for a single month of a differentiated schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthPayment {
    /// 1-based month index.
    pub month: u32,
    /// Amount due this month, rounded up to a whole unit.
    pub payment: Decimal,
    /// Portion of the payment that covers interest.
    pub interest: Decimal,
    /// Portion of the payment that repays principal.
    pub amortization: Decimal,
    /// Outstanding principal after this month.
    pub balance: Decimal,
}

/// A number of monthly periods split into whole years and remaining months.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanDuration {
    pub years: u32,
    pub months: u32,
}

impl LoanDuration {
    pub fn from_periods(periods: u32) -> Self {
        LoanDuration {
            years: periods / 12,
            months: periods % 12,
        }
    }
}

impl fmt::Display for LoanDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn unit(count: u32, singular: &str) -> String {
            if count == 1 {
                format!("{count} {singular}")
            } else {
                format!("{count} {singular}s")
            }
        }

        match (self.years, self.months) {
            (0, months) => f.write_str(&unit(months, "month")),
            (years, 0) => f.write_str(&unit(years, "year")),
            (years, months) => write!(f, "{} and {}", unit(years, "year"), unit(months, "month")),
        }
    }
}

/// Outcome of a successful calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unknown", rename_all = "lowercase")]
pub enum LoanResult {
    /// Monthly annuity payment.
    Payment { payment: Decimal, overpayment: Decimal },
    /// Month-by-month differentiated payments.
    Schedule {
        months: Vec<MonthPayment>,
        overpayment: Decimal,
    },
    /// Principal that a given annuity payment can repay.
    Principal { principal: Decimal, overpayment: Decimal },
    /// Number of months needed to repay the loan.
    Periods { periods: u32, overpayment: Decimal },
}

/// Validates the parameters and solves for the missing quantity.
///
/// This is the main entry point of the library.
///
/// # Errors
///
/// Returns a [`LoanError`] when the parameter combination is invalid or when the
/// requested quantity cannot be computed (e.g. the payment never covers interest).
pub fn calculate(params: &ParameterSet) -> Result<LoanResult, LoanError> {
    let resolution = resolver::resolve(params)?;
    engine::compute(&resolution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_scheme_from_str() {
        assert_eq!("annuity".parse::<Scheme>(), Ok(Scheme::Annuity));
        assert_eq!("diff".parse::<Scheme>(), Ok(Scheme::Differentiated));
        assert_eq!(
            "Annuity".parse::<Scheme>(),
            Err(LoanError::InvalidScheme("Annuity".to_string()))
        );
    }

    #[rstest]
    #[case(0, "0 months")]
    #[case(1, "1 month")]
    #[case(11, "11 months")]
    #[case(12, "1 year")]
    #[case(13, "1 year and 1 month")]
    #[case(24, "2 years")]
    #[case(38, "3 years and 2 months")]
    fn test_duration_display(#[case] periods: u32, #[case] expected: &str) {
        assert_eq!(LoanDuration::from_periods(periods).to_string(), expected);
    }

    #[test]
    fn test_result_serializes_with_unknown_tag() {
        let result = LoanResult::Periods {
            periods: 24,
            overpayment: Decimal::from(52000),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["unknown"], "periods");
        assert_eq!(json["periods"], 24);
        assert_eq!(json["overpayment"], "52000");
    }
}
