use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use payment_tracker::config;
use payment_tracker::store::{Fill, PaymentAnalysis, StatusTotals};
use payment_tracker::{Column, PaymentRecord, PaymentStatus, RecordStore};

#[derive(Parser)]
#[command(author, version, about = "Track invoice payments in a spreadsheet", long_about = None)]
struct Cli {
    /// Payment records workbook (overrides PAYMENT_RECORDS_FILE)
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the workbook if it does not exist yet
    Init,
    /// Record a new payment
    Add {
        invoice_no: String,
        #[arg(long)]
        task_type: String,
        #[arg(long)]
        tariff_fee: f64,
        #[arg(long)]
        gross_fee: f64,
        /// VAT rate in percent
        #[arg(long)]
        vat_rate: f64,
        #[arg(long, default_value = "")]
        case_details: String,
        /// DD.MM.YYYY, defaults to today
        #[arg(long)]
        submission_date: Option<String>,
        /// DD.MM.YYYY, defaults to today
        #[arg(long)]
        invoice_date: Option<String>,
        #[arg(long, value_enum, default_value_t = StatusArg::Pending)]
        status: StatusArg,
    },
    /// Change the payment status of an invoice
    UpdateStatus {
        invoice_no: String,
        #[arg(value_enum, default_value_t = StatusArg::Paid)]
        status: StatusArg,
    },
    /// Show one payment record
    Search { invoice_no: String },
    /// Print every payment record
    List,
    /// Paid/pending totals and averages
    Analyze,
    /// Resize columns and rows and apply the currency format
    Format,
    /// Colour payment statuses
    Highlight,
    /// Add the paid/pending pie chart
    Chart,
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    Paid,
    Pending,
}

impl From<StatusArg> for PaymentStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Paid => PaymentStatus::Paid,
            StatusArg::Pending => PaymentStatus::Pending,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = config::init(cli.file)?;
    let store = RecordStore::from_config(&config)?;

    match cli.command {
        Commands::Init => println!("Payment records: {}", store.path().display()),
        Commands::Add {
            invoice_no,
            task_type,
            tariff_fee,
            gross_fee,
            vat_rate,
            case_details,
            submission_date,
            invoice_date,
            status,
        } => {
            let (vat_amount, net_fee) = split_gross(gross_fee, vat_rate);
            let record = PaymentRecord {
                invoice_no,
                task_type,
                tariff_fee,
                gross_fee,
                vat_rate,
                vat_amount,
                net_fee,
                case_details,
                submission_date: submission_date.unwrap_or_else(today),
                invoice_date: invoice_date.unwrap_or_else(today),
                payment_status: status.into(),
            };
            store.add(&record)?;
            println!("Added payment {}", record.invoice_no);
        }
        Commands::UpdateStatus { invoice_no, status } => {
            let status = PaymentStatus::from(status);
            if store.update_status(&invoice_no, status.clone())? {
                println!("Invoice {} is now {}", invoice_no, status);
            } else {
                println!("Invoice {} not found", invoice_no);
            }
        }
        Commands::Search { invoice_no } => match store.search(&invoice_no)? {
            Some(record) => print_record(&record),
            None => println!("Invoice {} not found", invoice_no),
        },
        Commands::List => {
            println!("{}", Column::headers().join(" | "));
            for row in store.get_all()? {
                println!("{}", row.join(" | "));
            }
        }
        Commands::Analyze => print_analysis(&store.analyze()?),
        Commands::Format => {
            let layout = store.adjust_formatting()?;
            println!("Formatted {} rows", layout.row_heights.len());
        }
        Commands::Highlight => {
            let fills = store.highlight()?;
            let paid = fills.iter().filter(|f| **f == Some(Fill::LightGreen)).count();
            let pending = fills.iter().filter(|f| **f == Some(Fill::LightRed)).count();
            println!("Highlighted {} paid and {} pending payments", paid, pending);
        }
        Commands::Chart => match store.generate_chart()? {
            Some(summary) => println!(
                "Chart added: {} paid, {} pending",
                summary.paid, summary.pending
            ),
            None => println!("No paid or pending payments to chart"),
        },
    }

    Ok(())
}

/// VAT amount and net fee for a gross fee at `vat_rate` percent.
fn split_gross(gross_fee: f64, vat_rate: f64) -> (f64, f64) {
    let vat_amount = gross_fee * vat_rate / 100.0;
    (vat_amount, gross_fee - vat_amount)
}

fn today() -> String {
    Local::now().date_naive().format("%d.%m.%Y").to_string()
}

/// Formats `amount` as `1,528.00 TL`.
fn currency(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::new();
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}{}.{} TL", sign, grouped, cents)
}

fn print_record(record: &PaymentRecord) {
    println!("Invoice No: {}", record.invoice_no);
    println!("Task Type: {}", record.task_type);
    println!("Tariff Fee: {}", currency(record.tariff_fee));
    println!("Gross Fee: {}", currency(record.gross_fee));
    println!("VAT (%): {}", record.vat_rate);
    println!("VAT Amount: {}", currency(record.vat_amount));
    println!("Net Fee: {}", currency(record.net_fee));
    println!("Case Details: {}", record.case_details);
    println!("Submission Date: {}", record.submission_date);
    println!("Invoice Date: {}", record.invoice_date);
    println!("Payment Status: {}", record.payment_status);
}

fn print_totals(label: &str, totals: &StatusTotals) {
    println!(
        "{}: {} (Total Amount: {}, Avg: {})",
        label,
        totals.count,
        currency(totals.net_total),
        currency(totals.average_net)
    );
}

fn print_analysis(analysis: &PaymentAnalysis) {
    println!("Total Payments: {}", analysis.total_records);
    print_totals("Total Paid", &analysis.paid);
    print_totals("Total Pending", &analysis.pending);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_gross() {
        assert_eq!(split_gross(1910.0, 20.0), (382.0, 1528.0));
        assert_eq!(split_gross(100.0, 0.0), (0.0, 100.0));
    }

    #[test]
    fn test_currency() {
        assert_eq!(currency(1528.0), "1,528.00 TL");
        assert_eq!(currency(0.5), "0.50 TL");
        assert_eq!(currency(1234567.891), "1,234,567.89 TL");
        assert_eq!(currency(-382.0), "-382.00 TL");
    }

    #[test]
    fn test_today_format() {
        let date = today();
        assert_eq!(date.len(), 10);
        assert_eq!(&date[2..3], ".");
        assert_eq!(&date[5..6], ".");
    }
}
