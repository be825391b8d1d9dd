// Headless façade CLI: exercise any marketplace endpoint from scripts and
// manage the stored session (token, last order id).

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use farmstand::api::MarketApi;
use farmstand::filter::FilterState;
use farmstand::models::{DateRange, ReportPeriod};
use farmstand::session;

#[derive(Parser, Debug)]
#[command(name = "farmstand-api")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Call marketplace API endpoints from the command line", long_about = None)]
struct Cli {
    /// Marketplace API base URL
    #[arg(long, env = "FARMSTAND_API_URL", default_value = "https://api.agromarket.example/v1")]
    api_url: String,

    /// Request timeout in milliseconds
    #[arg(long, env = "FARMSTAND_TIMEOUT_MS", default_value_t = 8000)]
    timeout_ms: u64,

    /// Path to the session file (access token + last order id)
    #[arg(long, env = "FARMSTAND_SESSION_PATH")]
    session_path: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// List products, optionally filtered
    Products {
        #[arg(long)]
        search: Option<String>,
        #[arg(long = "category")]
        categories: Vec<String>,
        #[arg(long)]
        organic: bool,
        #[arg(long)]
        verified: bool,
        #[arg(long)]
        min_rating: Option<u8>,
    },
    /// Payments dashboard overview
    Overview,
    /// Sales analytics for a range (7d, 30d, 90d, 365d)
    Analytics {
        #[arg(long, default_value = "30d")]
        range: String,
    },
    /// Settlement reports (weekly, monthly, quarterly)
    Reports {
        #[arg(long, default_value = "monthly")]
        period: String,
    },
    /// Transaction history for a range (7d, 30d, 90d, 365d)
    Transactions {
        #[arg(long, default_value = "30d")]
        range: String,
    },
    /// List payment methods
    Methods,
    /// List supported banks
    Banks,
    /// List payouts
    Payouts,
    /// List invoices
    Invoices,
    /// Request a payout
    RequestPayout { amount: f64, method_id: String },
    /// Process a pending payout
    ProcessPayout { id: String },
    /// Generate an invoice for an order
    GenerateInvoice { order_id: String },
    /// Send an invoice to its customer
    SendInvoice { id: String },
    /// Verify a payment method with a code
    VerifyMethod { id: String, code: String },
    /// Delete a listing
    DeleteProduct { id: String },
    /// Store an access token in the session file
    SetToken { token: String },
    /// Store the last order id in the session file
    SetLastOrder { order_id: String },
}

fn parse_range(s: &str) -> Result<DateRange> {
    match s {
        "7d" => Ok(DateRange::Last7Days),
        "30d" => Ok(DateRange::Last30Days),
        "90d" => Ok(DateRange::Quarter),
        "365d" => Ok(DateRange::Year),
        _ => Err(anyhow!("invalid range '{s}' (expected 7d, 30d, 90d or 365d)")),
    }
}

fn parse_period(s: &str) -> Result<ReportPeriod> {
    match s {
        "weekly" => Ok(ReportPeriod::Weekly),
        "monthly" => Ok(ReportPeriod::Monthly),
        "quarterly" => Ok(ReportPeriod::Quarterly),
        _ => Err(anyhow!("invalid period '{s}' (expected weekly, monthly or quarterly)")),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let session_path = cli.session_path.clone().unwrap_or_else(session::default_path);
    let mut sess = session::load(&session_path);
    let api = MarketApi::new(&cli.api_url, cli.timeout_ms, sess.token().map(str::to_string));

    match cli.cmd {
        Cmd::Products { search, categories, organic, verified, min_rating } => {
            let filter = FilterState {
                search: search.unwrap_or_default(),
                categories,
                organic_only: organic,
                verified_only: verified,
                min_rating,
                ..FilterState::default()
            };
            print_json(&api.fetch_products(&filter).await?)?;
        }
        Cmd::Overview => print_json(&api.fetch_overview().await?)?,
        Cmd::Analytics { range } => {
            print_json(&api.fetch_analytics(parse_range(&range)?).await?)?
        }
        Cmd::Reports { period } => {
            print_json(&api.fetch_reports(parse_period(&period)?).await?)?
        }
        Cmd::Transactions { range } => {
            print_json(&api.fetch_transactions(parse_range(&range)?).await?)?
        }
        Cmd::Methods => print_json(&api.fetch_payment_methods().await?)?,
        Cmd::Banks => print_json(&api.fetch_supported_banks().await?)?,
        Cmd::Payouts => print_json(&api.fetch_payouts().await?)?,
        Cmd::Invoices => print_json(&api.fetch_invoices().await?)?,
        Cmd::RequestPayout { amount, method_id } => {
            print_json(&api.request_payout(amount, &method_id).await?)?
        }
        Cmd::ProcessPayout { id } => print_json(&api.process_payout(&id).await?)?,
        Cmd::GenerateInvoice { order_id } => {
            print_json(&api.generate_invoice(&order_id).await?)?
        }
        Cmd::SendInvoice { id } => print_json(&api.send_invoice(&id).await?)?,
        Cmd::VerifyMethod { id, code } => {
            print_json(&api.verify_payment_method(&id, &code).await?)?
        }
        Cmd::DeleteProduct { id } => {
            api.delete_product(&id).await?;
            log::info!("listing {id} deleted");
        }
        Cmd::SetToken { token } => {
            sess.access_token = Some(token);
            session::store(&session_path, &sess)?;
            log::info!("access token stored in {}", session_path.display());
        }
        Cmd::SetLastOrder { order_id } => {
            sess.last_order_id = Some(order_id);
            session::store(&session_path, &sess)?;
            log::info!("last order id stored in {}", session_path.display());
        }
    }
    Ok(())
}
