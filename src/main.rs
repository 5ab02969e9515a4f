//! Loan calculator CLI
//!
//! Solves for the principal, the monthly payment or the number of months of a
//! fixed-rate loan, e.g.
//! `loan-calc --type=annuity --principal=1000000 --periods=60 --interest=10`.

use std::ffi::OsString;
use std::io::{self, Write};

use clap::Parser;
use clap::error::ErrorKind;
use env_logger::Env;
use log::debug;

use loan_calc::{ParameterSet, calculate, report};

/// Fixed-rate loan calculator
#[derive(Parser, Debug)]
#[command(
    name = "loan-calc",
    version,
    about = "Calculate the missing principal, payment or number of months of a loan",
    long_about = "Supply --type and --interest plus two of --principal, --payment and \
                  --periods; the omitted one is calculated together with the overpayment."
)]
struct Cli {
    /// Repayment scheme: `annuity` or `diff`
    #[arg(long = "type", value_name = "TYPE")]
    scheme: Option<String>,

    /// Loan principal
    #[arg(long, allow_negative_numbers = true)]
    principal: Option<String>,

    /// Monthly payment (annuity only)
    #[arg(long, allow_negative_numbers = true)]
    payment: Option<String>,

    /// Number of monthly payments
    #[arg(long, allow_negative_numbers = true)]
    periods: Option<String>,

    /// Annual interest rate in percent, e.g. 10 for 10%
    #[arg(long, allow_negative_numbers = true)]
    interest: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn parameters(&self) -> ParameterSet {
        ParameterSet {
            scheme: self.scheme.clone(),
            principal: self.principal.clone(),
            payment: self.payment.clone(),
            periods: self.periods.clone(),
            interest: self.interest.clone(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("off")).init();

    let mut stdout = io::stdout().lock();
    run(std::env::args_os(), &mut stdout)
}

/// Parses `args` (program name first), solves the loan and writes the output to `out`.
fn run<I, T, W>(args: I, out: &mut W) -> anyhow::Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    W: Write,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            write!(out, "{}", err.render())?;
            return Ok(());
        }
        Err(err) => {
            debug!("argument parsing failed: {err}");
            writeln!(out, "{}", report::INCORRECT_PARAMETERS)?;
            return Ok(());
        }
    };

    match calculate(&cli.parameters()) {
        Ok(result) if cli.json => writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?,
        Ok(result) => writeln!(out, "{}", report::render(&result))?,
        Err(err) => {
            debug!("rejected: {err}");
            writeln!(out, "{}", report::INCORRECT_PARAMETERS)?;
        }
    }

    Ok(())
}
