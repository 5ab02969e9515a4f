//! Plain-text rendering of calculation results.

use crate::{LoanDuration, LoanResult};

/// The single line printed for any rejected request.
pub const INCORRECT_PARAMETERS: &str = "Incorrect parameters";

/// Renders a result as the lines printed to standard output, without a trailing newline.
pub fn render(result: &LoanResult) -> String {
    match result {
        LoanResult::Payment {
            payment,
            overpayment,
        } => format!(
            "Your annuity payment = {}!\nOverpayment = {}",
            payment.normalize(),
            overpayment.normalize()
        ),
        LoanResult::Schedule {
            months,
            overpayment,
        } => {
            let mut lines: Vec<String> = months
                .iter()
                .map(|month| format!("Month {}: payment is {}", month.month, month.payment.normalize()))
                .collect();
            lines.push(String::new());
            lines.push(format!("Overpayment = {}", overpayment.normalize()));
            lines.join("\n")
        }
        LoanResult::Principal {
            principal,
            overpayment,
        } => format!(
            "Your loan principal = {}!\nOverpayment = {}",
            principal.normalize(),
            overpayment.normalize()
        ),
        LoanResult::Periods {
            periods,
            overpayment,
        } => format!(
            "It will take {} to repay this loan!\nOverpayment = {}",
            LoanDuration::from_periods(*periods),
            overpayment.normalize()
        ),
    }
}
