//! Amortization formulas for annuity and differentiated loans.
//!
//! Rounding rules:
//! - monthly payments are rounded up to a whole unit;
//! - a principal derived from a payment is rounded down, which offsets the
//!   rounding up applied to that payment;
//! - annuity overpayments are rounded up, the differentiated overpayment is
//!   rounded to the nearest unit so it reconciles with the sum of payments.

use log::{debug, trace};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use crate::{LoanError, LoanResult, MonthPayment, Resolution, Scheme, UnknownField};

/// Converts an annual interest percentage into a monthly rate as a fraction.
///
/// `10` (percent per year) becomes `0.1 / 12`.
pub fn monthly_rate(annual_percent: Decimal) -> Decimal {
    annual_percent / dec!(100) / dec!(12)
}

/// The annuity factor `r(1 + r)^n / ((1 + r)^n - 1)`.
///
/// At a zero rate this is the `r -> 0` limit, `1 / n`.
///
/// # Errors
///
/// Returns an error if `periods` is zero or `(1 + r)^n` does not fit in a `Decimal`.
pub fn annuity_factor(monthly_rate: Decimal, periods: u32) -> Result<Decimal, LoanError> {
    if periods == 0 {
        return Err(LoanError::ZeroPeriods);
    }

    let growth = (Decimal::ONE + monthly_rate)
        .checked_powu(u64::from(periods))
        .ok_or(LoanError::Overflow("annuity factor"))?;
    let denominator = growth - Decimal::ONE;

    // A rate small enough for the growth to round back to 1 behaves like zero.
    if monthly_rate.is_zero() || denominator.is_zero() {
        return Ok(Decimal::ONE / Decimal::from(periods));
    }

    monthly_rate
        .checked_mul(growth)
        .and_then(|numerator| numerator.checked_div(denominator))
        .ok_or(LoanError::Overflow("annuity factor"))
}

/// Fixed monthly payment that repays `principal` in `periods` months, rounded up.
pub fn annuity_payment(
    principal: Decimal,
    monthly_rate: Decimal,
    periods: u32,
) -> Result<Decimal, LoanError> {
    let payment = if monthly_rate.is_zero() {
        if periods == 0 {
            return Err(LoanError::ZeroPeriods);
        }
        principal / Decimal::from(periods)
    } else {
        let factor = annuity_factor(monthly_rate, periods)?;
        principal
            .checked_mul(factor)
            .ok_or(LoanError::Overflow("annuity payment"))?
    };
    trace!("annuity payment before rounding: {payment}");
    Ok(payment.ceil())
}

/// Principal that `payment` repays over `periods` months, rounded down.
pub fn annuity_principal(
    payment: Decimal,
    monthly_rate: Decimal,
    periods: u32,
) -> Result<Decimal, LoanError> {
    let principal = if monthly_rate.is_zero() {
        if periods == 0 {
            return Err(LoanError::ZeroPeriods);
        }
        payment
            .checked_mul(Decimal::from(periods))
            .ok_or(LoanError::Overflow("loan principal"))?
    } else {
        let factor = annuity_factor(monthly_rate, periods)?;
        payment
            .checked_div(factor)
            .ok_or(LoanError::Overflow("loan principal"))?
    };
    trace!("loan principal before rounding: {principal}");
    Ok(principal.floor())
}

/// Number of months needed to repay `principal` with a fixed `payment`.
///
/// Solves `n = log_{1+r}(payment / (payment - r * principal))` and rounds up.
///
/// # Errors
///
/// Returns [`LoanError::InsufficientPayment`] when the payment does not exceed the
/// monthly interest on the principal, since the loan would never be repaid.
pub fn annuity_periods(
    principal: Decimal,
    payment: Decimal,
    monthly_rate: Decimal,
) -> Result<u32, LoanError> {
    let periods = if monthly_rate.is_zero() {
        if payment.is_zero() {
            return Err(LoanError::InsufficientPayment);
        }
        principal
            .checked_div(payment)
            .ok_or(LoanError::Overflow("number of periods"))?
    } else {
        let interest_only = monthly_rate
            .checked_mul(principal)
            .ok_or(LoanError::Overflow("number of periods"))?;
        if payment <= interest_only {
            return Err(LoanError::InsufficientPayment);
        }
        if principal.is_zero() {
            return Ok(0);
        }

        let ratio = payment / (payment - interest_only);
        let numerator = ratio
            .checked_ln()
            .ok_or(LoanError::Overflow("number of periods"))?;
        let base = (Decimal::ONE + monthly_rate)
            .checked_ln()
            .ok_or(LoanError::Overflow("number of periods"))?;
        if base.is_zero() {
            return Err(LoanError::Overflow("number of periods"));
        }
        numerator / base
    };

    trace!("number of periods before rounding: {periods}");
    periods
        .ceil()
        .to_u32()
        .ok_or(LoanError::Overflow("number of periods"))
}

/// Longest differentiated schedule that will be generated, in months.
pub const MAX_SCHEDULE_MONTHS: u32 = 12_000;

/// Month-by-month payments of a differentiated loan.
///
/// Each month repays `principal / periods` plus interest on the balance left at
/// the start of that month; the payment is rounded up.
///
/// # Errors
///
/// Returns an error if `periods` is zero or above [`MAX_SCHEDULE_MONTHS`], or if
/// an intermediate amount does not fit in a `Decimal`.
pub fn differentiated_schedule(
    principal: Decimal,
    monthly_rate: Decimal,
    periods: u32,
) -> Result<Vec<MonthPayment>, LoanError> {
    if periods == 0 {
        return Err(LoanError::ZeroPeriods);
    }
    if periods > MAX_SCHEDULE_MONTHS {
        return Err(LoanError::TooManyPeriods(periods));
    }

    let total_months = Decimal::from(periods);
    let amortization = principal / total_months;
    let mut schedule = Vec::with_capacity(periods as usize);

    for month in 1..=periods {
        let balance = principal - repaid_share(principal, month - 1, total_months)?;
        let interest = monthly_rate
            .checked_mul(balance)
            .ok_or(LoanError::Overflow("differentiated payment"))?;
        let payment = amortization
            .checked_add(interest)
            .ok_or(LoanError::Overflow("differentiated payment"))?
            .ceil();
        let remaining = principal - repaid_share(principal, month, total_months)?;

        schedule.push(MonthPayment {
            month,
            payment,
            interest: interest.round_dp(2),
            amortization: amortization.round_dp(2),
            balance: remaining.max(Decimal::ZERO).round_dp(2),
        });
    }

    Ok(schedule)
}

/// Principal repaid after `months` equal installments, `principal * months / total`.
fn repaid_share(principal: Decimal, months: u32, total_months: Decimal) -> Result<Decimal, LoanError> {
    principal
        .checked_mul(Decimal::from(months))
        .and_then(|repaid| repaid.checked_div(total_months))
        .ok_or(LoanError::Overflow("differentiated payment"))
}

/// Solves a validated request.
///
/// # Errors
///
/// Returns an error if the computation is undefined for the given values
/// (zero periods, a payment below the monthly interest) or overflows.
pub fn compute(resolution: &Resolution) -> Result<LoanResult, LoanError> {
    let values = &resolution.values;
    let rate = monthly_rate(values.interest);
    debug!("monthly interest rate: {rate}");

    match (resolution.scheme, resolution.unknown) {
        (Scheme::Annuity, UnknownField::Payment) => {
            let principal = required(values.principal)?;
            let periods = required(values.periods)?;
            let payment = annuity_payment(principal, rate, periods)?;
            let overpayment = total_paid(payment, periods)? - principal;

            Ok(LoanResult::Payment {
                payment,
                overpayment: overpayment.ceil(),
            })
        }
        (Scheme::Differentiated, UnknownField::Payment) => {
            let principal = required(values.principal)?;
            let periods = required(values.periods)?;
            let months = differentiated_schedule(principal, rate, periods)?;
            let paid = months
                .iter()
                .try_fold(Decimal::ZERO, |paid, month| paid.checked_add(month.payment))
                .ok_or(LoanError::Overflow("total paid"))?;

            Ok(LoanResult::Schedule {
                months,
                overpayment: (paid - principal).round(),
            })
        }
        (Scheme::Annuity, UnknownField::Principal) => {
            let payment = required(values.payment)?;
            let periods = required(values.periods)?;
            let principal = annuity_principal(payment, rate, periods)?;
            let overpayment = total_paid(payment.ceil(), periods)? - principal;

            Ok(LoanResult::Principal {
                principal,
                overpayment: overpayment.ceil(),
            })
        }
        (Scheme::Annuity, UnknownField::Periods) => {
            let principal = required(values.principal)?;
            let payment = required(values.payment)?;
            let periods = annuity_periods(principal, payment, rate)?;
            let overpayment = total_paid(payment.ceil(), periods)? - principal;

            Ok(LoanResult::Periods {
                periods,
                overpayment: overpayment.ceil(),
            })
        }
        // A differentiated payment changes every month, so it cannot be an input.
        (Scheme::Differentiated, UnknownField::Principal | UnknownField::Periods) => {
            Err(LoanError::IncompatibleCombination)
        }
    }
}

fn required<T>(value: Option<T>) -> Result<T, LoanError> {
    value.ok_or(LoanError::AmbiguousUnknown(2))
}

fn total_paid(payment: Decimal, periods: u32) -> Result<Decimal, LoanError> {
    payment
        .checked_mul(Decimal::from(periods))
        .ok_or(LoanError::Overflow("total paid"))
}
