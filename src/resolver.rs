//! Validation of raw command-line values and selection of the unknown quantity.

use std::str::FromStr;

use log::debug;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::{LoanError, Scheme, UnknownField};

/// Minimum number of parameters (out of the five known names) a request needs.
const MIN_PARAMETERS: usize = 4;

/// Raw parameter values keyed by name, as supplied on the command line.
///
/// Values are kept as strings until [`resolve`] converts them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    pub scheme: Option<String>,
    pub principal: Option<String>,
    pub payment: Option<String>,
    pub periods: Option<String>,
    pub interest: Option<String>,
}

impl ParameterSet {
    /// Stores `value` under `name`. Unknown names are ignored and reported as `false`.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> bool {
        let slot = match name {
            "type" => &mut self.scheme,
            "principal" => &mut self.principal,
            "payment" => &mut self.payment,
            "periods" => &mut self.periods,
            "interest" => &mut self.interest,
            _ => return false,
        };
        *slot = Some(value.into());
        true
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = ParameterSet::default();
        for (name, value) in pairs {
            if !params.set(name.as_ref(), value) {
                debug!("ignoring unknown parameter `{}`", name.as_ref());
            }
        }
        params
    }

    /// Builds a set from `--name=value` arguments (program name excluded).
    ///
    /// Leading dashes are stripped and the argument is split at the first `=`;
    /// arguments without `=` are skipped.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let pairs: Vec<(String, String)> = args
            .into_iter()
            .filter_map(|arg| {
                let (name, value) = arg.as_ref().split_once('=')?;
                Some((name.trim_start_matches('-').to_string(), value.to_string()))
            })
            .collect();
        ParameterSet::from_pairs(pairs)
    }

    /// Number of parameters that carry a value.
    pub fn present_count(&self) -> usize {
        [
            &self.scheme,
            &self.principal,
            &self.payment,
            &self.periods,
            &self.interest,
        ]
        .iter()
        .filter(|value| value.is_some())
        .count()
    }
}

/// Numeric values of a validated request. The unknown quantity is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct KnownValues {
    pub principal: Option<Decimal>,
    pub payment: Option<Decimal>,
    pub periods: Option<u32>,
    /// Annual interest rate in percent.
    pub interest: Decimal,
}

/// A validated request: which scheme, which quantity to solve for, and the inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub scheme: Scheme,
    pub unknown: UnknownField,
    pub values: KnownValues,
}

/// Validates a parameter set and determines the unknown quantity.
///
/// Checks run in a fixed order and the first failure is returned:
/// scheme, parameter count, `diff` with a payment, interest presence,
/// numeric values, and finally that exactly one quantity is missing.
pub fn resolve(params: &ParameterSet) -> Result<Resolution, LoanError> {
    let scheme = Scheme::from_str(params.scheme.as_deref().unwrap_or_default())?;

    let present = params.present_count();
    if present < MIN_PARAMETERS {
        return Err(LoanError::MissingParameters(present));
    }

    if scheme == Scheme::Differentiated && params.payment.is_some() {
        return Err(LoanError::IncompatibleCombination);
    }

    let Some(interest) = params.interest.as_deref() else {
        return Err(LoanError::MissingInterest);
    };

    let values = KnownValues {
        principal: parse_amount("principal", params.principal.as_deref())?,
        payment: parse_amount("payment", params.payment.as_deref())?,
        periods: parse_periods(params.periods.as_deref())?,
        interest: parse_non_negative("interest", interest)?,
    };

    let missing: Vec<UnknownField> = [
        (values.principal.is_none(), UnknownField::Principal),
        (values.payment.is_none(), UnknownField::Payment),
        (values.periods.is_none(), UnknownField::Periods),
    ]
    .into_iter()
    .filter_map(|(absent, field)| absent.then_some(field))
    .collect();

    let unknown = match missing.as_slice() {
        [unknown] => *unknown,
        _ => return Err(LoanError::AmbiguousUnknown(missing.len())),
    };

    debug!("resolved {scheme} loan, solving for {unknown:?}");

    Ok(Resolution {
        scheme,
        unknown,
        values,
    })
}

fn parse_non_negative(field: &'static str, raw: &str) -> Result<Decimal, LoanError> {
    let value = Decimal::from_str(raw.trim())
        .or_else(|_| Decimal::from_scientific(raw.trim()))
        .map_err(|_| LoanError::InvalidNumber {
            field,
            value: raw.to_string(),
        })?;

    if value.is_sign_negative() && !value.is_zero() {
        return Err(LoanError::NegativeValue { field });
    }
    Ok(value)
}

fn parse_amount(field: &'static str, raw: Option<&str>) -> Result<Option<Decimal>, LoanError> {
    raw.map(|raw| parse_non_negative(field, raw)).transpose()
}

fn parse_periods(raw: Option<&str>) -> Result<Option<u32>, LoanError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let value = parse_non_negative("periods", raw)?;
    let invalid = || LoanError::InvalidNumber {
        field: "periods",
        value: raw.to_string(),
    };

    if !value.fract().is_zero() {
        return Err(invalid());
    }
    value.to_u32().map(Some).ok_or_else(invalid)
}
