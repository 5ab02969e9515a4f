use loan_calc::report::{self, INCORRECT_PARAMETERS};
use loan_calc::{LoanError, LoanResult, ParameterSet, calculate};
use rstest::rstest;
use rust_decimal_macros::dec;

fn run(args: &[&str]) -> String {
    match calculate(&ParameterSet::from_args(args)) {
        Ok(result) => report::render(&result),
        Err(_) => INCORRECT_PARAMETERS.to_string(),
    }
}

#[test]
fn test_annuity_payment() {
    let output = run(&[
        "--type=annuity",
        "--principal=1000000",
        "--periods=60",
        "--interest=10",
    ]);
    assert_eq!(output, "Your annuity payment = 21248!\nOverpayment = 274880");
}

#[test]
fn test_differentiated_payments() {
    let output = run(&[
        "--type=diff",
        "--principal=500000",
        "--periods=8",
        "--interest=7.8",
    ]);
    let expected = "\
Month 1: payment is 65750
Month 2: payment is 65344
Month 3: payment is 64938
Month 4: payment is 64532
Month 5: payment is 64125
Month 6: payment is 63719
Month 7: payment is 63313
Month 8: payment is 62907

Overpayment = 14628";
    assert_eq!(output, expected);
}

#[test]
fn test_annuity_principal() {
    let output = run(&[
        "--type=annuity",
        "--payment=8722",
        "--periods=120",
        "--interest=5.6",
    ]);
    assert_eq!(output, "Your loan principal = 800018!\nOverpayment = 246622");
}

#[test]
fn test_annuity_periods() {
    let output = run(&[
        "--type=annuity",
        "--principal=500000",
        "--payment=23000",
        "--interest=7.8",
    ]);
    assert_eq!(
        output,
        "It will take 2 years to repay this loan!\nOverpayment = 52000"
    );
}

#[test]
fn test_periods_with_years_and_months() {
    let output = run(&[
        "--type=annuity",
        "--principal=1000000",
        "--payment=15000",
        "--interest=10",
    ]);
    assert_eq!(
        output,
        "It will take 8 years and 2 months to repay this loan!\nOverpayment = 470000"
    );
}

#[rstest]
#[case::diff_with_payment(&["--type=diff", "--payment=1000", "--principal=1000", "--periods=1", "--interest=5"])]
#[case::missing_interest(&["--type=annuity", "--principal=100000", "--payment=10400", "--periods=8"])]
#[case::too_few(&["--type=annuity", "--principal=1000000", "--payment=104000"])]
#[case::negative(&["--type=diff", "--principal=30000", "--periods=-14", "--interest=10"])]
#[case::no_type(&["--principal=1000000", "--periods=60", "--interest=10"])]
#[case::empty_value(&["--type=diff", "--periods=10", "--interest=10", "--principal="])]
#[case::payment_below_interest(&["--type=annuity", "--principal=100000", "--payment=500", "--interest=6"])]
#[case::zero_periods(&["--type=annuity", "--principal=1000", "--periods=0", "--interest=6"])]
fn test_rejected(#[case] args: &[&str]) {
    assert_eq!(run(args), INCORRECT_PARAMETERS);
}

#[test]
fn test_rejection_reason_is_kept_for_callers() {
    let params = ParameterSet::from_args([
        "--type=diff",
        "--payment=1000",
        "--principal=1000",
        "--periods=1",
        "--interest=5",
    ]);
    assert_eq!(calculate(&params), Err(LoanError::IncompatibleCombination));
}

#[test]
fn test_zero_interest_annuity() {
    let params = ParameterSet::from_args([
        "--type=annuity",
        "--principal=1000",
        "--periods=3",
        "--interest=0",
    ]);
    assert_eq!(
        calculate(&params),
        Ok(LoanResult::Payment {
            payment: dec!(334),
            overpayment: dec!(2),
        })
    );
}
