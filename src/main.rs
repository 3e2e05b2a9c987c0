//! Amortization CLI
//!
//! Command-line interface for loan payment and payoff calculations

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};

use amortization_engine::auto_loan::{calculate_auto_loan, AutoLoanInputs};
use amortization_engine::export::{result_to_json, save_batch_csv, save_schedule_csv, write_batch_csv};
use amortization_engine::format::{CurrencyFormat, Locale};
use amortization_engine::loan::load_loans;
use amortization_engine::{
    AmortizationEngine, EngineConfig, ExtraPayments, LoanInputs, LoanResult, PaymentFrequency,
    ScenarioRunner,
};

#[derive(Parser, Debug)]
#[command(name = "amortize", version, about = "Loan amortization calculator")]
struct Cli {
    /// Display locale for currency formatting (en-US, es-ES, pt-BR, fr-FR, de-DE)
    #[arg(long, global = true)]
    locale: Option<String>,

    /// Currency symbol override
    #[arg(long, global = true)]
    currency_symbol: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Amortize a single loan
    Loan {
        #[command(flatten)]
        terms: TermsArgs,

        #[arg(long)]
        principal: f64,
    },
    /// Auto loan with trade-in, sales tax and fees
    AutoLoan {
        #[command(flatten)]
        terms: TermsArgs,

        #[arg(long)]
        price: f64,

        #[arg(long, default_value_t = 0.0)]
        down_payment: f64,

        #[arg(long, default_value_t = 0.0)]
        trade_in: f64,

        /// Amount still owed on the trade-in
        #[arg(long, default_value_t = 0.0)]
        trade_in_owed: f64,

        #[arg(long, default_value_t = 0.0)]
        sales_tax: f64,

        #[arg(long, default_value_t = 0.0)]
        fees: f64,

        /// Pay tax and fees at signing instead of financing them
        #[arg(long)]
        pay_tax_upfront: bool,
    },
    /// Summarize every loan in a CSV file
    Batch {
        #[arg(long)]
        input: PathBuf,

        /// Write the summary here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct TermsArgs {
    /// Annual interest rate in percent
    #[arg(long)]
    rate: f64,

    /// Term in years
    #[arg(long)]
    years: u32,

    #[arg(long, default_value = "monthly")]
    frequency: String,

    /// Extra amount paid every month
    #[arg(long, default_value_t = 0.0)]
    extra_monthly: f64,

    /// Extra lump sum paid at the end of every loan year
    #[arg(long, default_value_t = 0.0)]
    extra_annual: f64,

    #[arg(long, default_value_t = 0.0)]
    extra_one_time: f64,

    /// Month (1-based) of the one-time extra payment
    #[arg(long)]
    one_time_month: Option<u32>,

    /// First payment period start (YYYY-MM-DD), defaults to today
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,

    /// Write the yearly schedule to this CSV file
    #[arg(long)]
    schedule_csv: Option<PathBuf>,
}

impl TermsArgs {
    fn frequency(&self) -> Result<PaymentFrequency> {
        Ok(self.frequency.parse::<PaymentFrequency>()?)
    }

    fn extras(&self) -> Option<ExtraPayments> {
        let extras = ExtraPayments {
            extra_per_period: self.extra_monthly,
            extra_annual: self.extra_annual,
            extra_one_time: self.extra_one_time,
            one_time_period_index: self.one_time_month,
        };
        (extras != ExtraPayments::default()).then_some(extras)
    }

    fn start_date(&self) -> NaiveDate {
        self.start_date.unwrap_or_else(|| Local::now().date_naive())
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;
    let engine = AmortizationEngine::new(config.clone());

    match &cli.command {
        Command::Loan { terms, principal } => {
            let mut loan = LoanInputs::new(*principal, terms.rate, terms.years)
                .with_frequency(terms.frequency()?)
                .with_start_date(terms.start_date());
            if let Some(extras) = terms.extras() {
                loan = loan.with_extras(extras);
            }

            let result = engine.calculate(&loan);
            emit(&result, terms)?;
        }
        Command::AutoLoan {
            terms,
            price,
            down_payment,
            trade_in,
            trade_in_owed,
            sales_tax,
            fees,
            pay_tax_upfront,
        } => {
            let inputs = AutoLoanInputs {
                down_payment: *down_payment,
                trade_in_value: *trade_in,
                trade_in_owed: *trade_in_owed,
                sales_tax_percent: *sales_tax,
                fees: *fees,
                finance_tax_and_fees: !pay_tax_upfront,
                frequency: terms.frequency()?,
                extras: terms.extras(),
                start_date: Some(terms.start_date()),
                ..AutoLoanInputs::new(*price, terms.rate, terms.years)
            };

            let result = calculate_auto_loan(&engine, &inputs);
            if terms.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
                return Ok(());
            }

            let currency = &config.currency;
            println!("Amount financed: {}", currency.money(result.amount_financed));
            println!("Sales tax:       {}", currency.money(result.sales_tax));
            println!("Due at signing:  {}", currency.money(result.upfront_cost));
            if let Some(total) = result.total_cost {
                println!("Total cost:      {}", currency.money(total));
            }
            println!();
            emit(&result.loan, terms)?;
        }
        Command::Batch { input, output } => {
            let records = load_loans(input)
                .with_context(|| format!("failed to load loans from {}", input.display()))?;
            let runner = ScenarioRunner::with_config(config);
            let rows = runner.summarize_records(&records);

            match output {
                Some(path) => save_batch_csv(path, &rows)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => write_batch_csv(std::io::stdout().lock(), &rows)?,
            }
        }
    }

    Ok(())
}

fn build_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = EngineConfig::from_env().context("invalid AMORT_* environment configuration")?;
    if let Some(tag) = &cli.locale {
        let locale: Locale = tag.parse()?;
        config = config.with_currency(CurrencyFormat::for_locale(locale));
    }
    if let Some(symbol) = &cli.currency_symbol {
        config.currency.symbol = symbol.clone();
    }
    Ok(config)
}

fn emit(result: &LoanResult, terms: &TermsArgs) -> Result<()> {
    if terms.json {
        println!("{}", result_to_json(result)?);
    } else {
        print_report(result)?;
    }

    if let Some(path) = &terms.schedule_csv {
        save_schedule_csv(path, &result.yearly_schedule)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("\nYearly schedule written to: {}", path.display());
    }
    Ok(())
}

fn print_report(result: &LoanResult) -> Result<()> {
    let Some(metrics) = &result.metrics else {
        bail!(
            "cannot calculate loan: {}",
            result.invalid_reason.as_deref().unwrap_or("invalid inputs")
        );
    };
    let f = &result.formatted;

    println!("{}", result.summary);
    println!();
    println!("  Payment ({}):      {}", metrics.frequency.label(), f.payment);
    println!("  Total interest:        {}", f.total_interest);
    println!("  Total paid:            {}", f.total_paid);
    println!("  Payoff date:           {}", f.payoff_date);
    println!("  Payments:              {}", metrics.actual_periods);
    println!("  Equity at midpoint:    {}", f.equity_at_midpoint);
    println!("  Daily interest:        {}", f.daily_interest_cost);
    println!("  Interest / principal:  {}", f.interest_to_principal_ratio);
    if metrics.has_savings() {
        println!("  Interest saved:        {}", f.interest_saved);
        println!("  Time saved:            {}", f.time_saved);
    }
    if let (Some(saved), Some(time)) = (&f.biweekly_interest_saved, &f.biweekly_time_saved) {
        println!("  Bi-weekly would save:  {} and {}", saved, time);
    }

    println!();
    println!("{:>4} {:>14} {:>14} {:>14} {:>16}", "Year", "Principal", "Interest", "Extra", "Balance");
    println!("{}", "-".repeat(66));
    for row in &result.yearly_schedule {
        println!(
            "{:>4} {:>14.2} {:>14.2} {:>14.2} {:>16.2}",
            row.year, row.principal, row.interest, row.extra_principal, row.ending_balance
        );
    }

    for warning in &result.warnings {
        eprintln!("warning: {}", warning);
    }
    Ok(())
}
