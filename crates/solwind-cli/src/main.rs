//! Solwind command-line front end
//!
//! Every command prints JSON on stdout; logs go to stderr.

mod config;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;
use solwind_common::{ProfitInputs, Technology};
use solwind_costing::{CostingService, LineItemSheet};
use solwind_portfolio::PortfolioKpis;
use solwind_profit::{LegacyMarketRateCommission, ProfitCalculator};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::AppConfig;

/// Renewable project cost and profit calculator
#[derive(Parser, Debug)]
#[command(name = "solwind", author, version, about)]
struct Cli {
    /// Path to a configuration file
    #[arg(long, global = true, env = "SOLWIND_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate total project cost from the technology's catalog
    Cost {
        /// centralized-pv | onshore-wind (Chinese names accepted)
        #[arg(long)]
        technology: Technology,
        /// Installed capacity (MW)
        #[arg(long)]
        capacity: Decimal,
    },
    /// Recompute a line-item sheet at a capacity
    LineItems {
        /// JSON sheet: {"items": [...]}
        #[arg(long)]
        file: PathBuf,
        /// Installed capacity (MW)
        #[arg(long)]
        capacity: Decimal,
    },
    /// Seed a line-item sheet from the technology's catalog
    SeedItems {
        #[arg(long)]
        technology: Technology,
        #[arg(long)]
        capacity: Decimal,
    },
    /// Run a profit analysis
    Profit {
        /// Installed capacity (MW)
        #[arg(long)]
        capacity: Decimal,
        /// Development fee rate (元/W); configured default when absent or 0
        #[arg(long)]
        dev_fee_rate: Option<Decimal>,
        /// Extra investment required by the government (万元)
        #[arg(long, default_value = "0")]
        extra_investment: Decimal,
        /// Total resource fee (万元)
        #[arg(long, default_value = "0")]
        resource_fee: Decimal,
        /// Own cost (万元); 0 means no cost basis
        #[arg(long, default_value = "0")]
        own_cost: Decimal,
        /// Total project cost for the legacy market-rate commission (万元)
        #[arg(long, requires = "legacy_market_rate")]
        legacy_total_cost: Option<Decimal>,
        /// Market fair profit rate for the legacy commission (%)
        #[arg(long, requires = "legacy_total_cost")]
        legacy_market_rate: Option<Decimal>,
    },
    /// Portfolio dashboard KPIs
    Portfolio {
        /// JSON array of {"project": {...}, "analysis": {...}}
        #[arg(long)]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = AppConfig::load(cli.config.as_deref())?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Solwind v{}", solwind_common::VERSION);

    match cli.command {
        Command::Cost { technology, capacity } => {
            let costing = CostingService::new(&cfg.costing)?;
            print_json(&costing.estimate(technology, capacity)?)
        }
        Command::LineItems { file, capacity } => {
            let costing = CostingService::new(&cfg.costing)?;
            let mut sheet: LineItemSheet = read_json(&file)?;
            let total = sheet.recompute_all(costing.evaluator(), capacity)?;
            let subtotals = sheet.category_subtotals(costing.evaluator(), capacity)?;
            print_json(&json!({
                "capacity_mw": capacity,
                "items": sheet.items,
                "category_subtotals": subtotals,
                "total_cost": total,
            }))
        }
        Command::SeedItems { technology, capacity } => {
            let costing = CostingService::new(&cfg.costing)?;
            let (sheet, total) = costing.seed_sheet(technology, capacity)?;
            print_json(&json!({
                "technology": technology,
                "capacity_mw": capacity,
                "items": sheet.items,
                "total_cost": total,
            }))
        }
        Command::Profit {
            capacity,
            dev_fee_rate,
            extra_investment,
            resource_fee,
            own_cost,
            legacy_total_cost,
            legacy_market_rate,
        } => {
            let calculator = ProfitCalculator::new(cfg.profit.clone());
            let mut inputs = ProfitInputs::new(capacity)
                .with_extra_investment(extra_investment)
                .with_resource_fee_total(resource_fee)
                .with_own_cost(own_cost);
            inputs.dev_fee_rate = dev_fee_rate;

            let result = match (legacy_total_cost, legacy_market_rate) {
                (Some(total_project_cost), Some(market_profit_rate)) => {
                    let legacy = LegacyMarketRateCommission {
                        total_project_cost,
                        market_profit_rate,
                    };
                    calculator.analyze_with(&legacy, &inputs)?
                }
                _ => calculator.analyze(&inputs)?,
            };
            print_json(&result)
        }
        Command::Portfolio { file } => {
            let costing = CostingService::new(&cfg.costing)?;
            let content = fs::read_to_string(&file).with_context(|| format!("failed to read {}", file.display()))?;
            let entries = solwind_portfolio::entries_from_json(&content)?;
            print_json(&PortfolioKpis::compute(&entries, &costing, Utc::now())?)
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
