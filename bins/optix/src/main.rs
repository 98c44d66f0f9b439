//! Optix CLI Binary
//!
//! Command-line front end over the pricer, chain aggregator, scenario
//! classifier and strategy generator. Results are printed to stdout as
//! JSON; logs go to stderr.

use anyhow::{Context, Result};
use cli::{Cli, Commands};
use common::{OptionType, Symbol};
use config::{generate_default_config, load_config, save_config, validate_config, EngineConfig};
use observability::init_logging_with_level;
use option_chain::{ChainAggregator, ChainAnalysis, OptionChainSnapshot};
use pricer::{implied_volatility, price_and_greeks, PricingInputs};
use scenario::{all_v1, all_v2, classify1, classify2, Scenario, ScenarioKey, ScenarioKey2};
use serde::Serialize;
use std::path::Path;
use strategy::{Outlook, RiskAppetite, StrategyCandidate, StrategyGenerator, StrategyRequest};
use tracing::{debug, error, info, warn};

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let level = if cli.verbose { "debug" } else { "info" };
    init_logging_with_level("optix", cli.log_format, level)?;

    debug!(?cli, "CLI arguments parsed");
    info!(command = cli.command.name(), "Executing command");

    match cli.command {
        Commands::Validate { path } => {
            let path = path
                .or(cli.config)
                .context("validate needs a configuration file (positional or --config)")?;
            validate_command(&path)
        }
        Commands::Init { output } => init_command(&output),
        command => {
            let config = engine_config(cli.config.as_deref())?;
            run(command, &config)
        }
    }
}

/// Load and validate the engine configuration, or use defaults
fn engine_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        debug!("No configuration file given; using defaults");
        return Ok(generate_default_config());
    };

    let config = load_config(path)?;
    let report = validate_config(&config);

    for warning in &report.warnings {
        warn!(field = %warning.field, message = %warning.message, "Configuration warning");
    }

    if !report.is_valid() {
        error!(error_count = report.errors.len(), "Configuration validation failed");
        for err in &report.errors {
            error!("{}", err);
        }
        anyhow::bail!("Invalid configuration: {:?}", path);
    }

    Ok(config)
}

fn run(command: Commands, config: &EngineConfig) -> Result<()> {
    let name = command.name();

    match command {
        Commands::Price {
            spot,
            strike,
            days,
            vol,
            rate,
            option_type,
        } => {
            let vol = vol.unwrap_or(config.pricing.default_volatility_pct);
            let rate = rate.unwrap_or(config.pricing.risk_free_rate_pct);

            match price_and_greeks(spot, strike, days, vol, rate, option_type) {
                Some(result) => print_json(&result),
                None => {
                    println!("No result: spot, strike and days must be positive finite numbers");
                    Ok(())
                }
            }
        }

        Commands::Iv {
            price,
            spot,
            strike,
            days,
            rate,
            option_type,
        } => {
            let inputs = PricingInputs {
                spot,
                strike,
                days_to_expiry: days,
                volatility_pct: 0.0,
                risk_free_rate_pct: rate.unwrap_or(config.pricing.risk_free_rate_pct),
                option_type,
            };

            match implied_volatility(price, &inputs) {
                Some(iv) => print_json(&ImpliedVolReport {
                    market_price: price,
                    implied_volatility_pct: iv,
                }),
                None => {
                    println!("No result: price is outside no-arbitrage bounds or inputs are invalid");
                    Ok(())
                }
            }
        }

        Commands::Levels {
            snapshot,
            symbol,
            window,
        } => {
            let snapshot = read_snapshot(&snapshot, &symbol)?;
            let aggregator = ChainAggregator::new(config.chain.clone());

            let levels = if window {
                aggregator.aggregate(&aggregator.window(&snapshot))
            } else {
                aggregator.aggregate(&snapshot)
            };
            print_json(&levels)
        }

        Commands::Classify { support, resistance } => print_json(&classify1(ScenarioKey { support, resistance })),

        Commands::OiSignal { call, put } => print_json(&classify2(ScenarioKey2 {
            call_oi_trend: call,
            put_oi_trend: put,
        })),

        Commands::Suggest {
            spot,
            atm,
            support,
            resistance,
            outlook,
            risk,
            symbol,
            days,
            vol,
            rate,
        } => {
            let step = config.strikes.step_for(&symbol);
            let request = StrategyRequest::new(spot, outlook, risk)
                .with_levels(atm, support, resistance)
                .with_strike_step(step);

            let pricing = days.map(|days| PricingInputs {
                spot,
                strike: spot,
                days_to_expiry: days,
                volatility_pct: vol.unwrap_or(config.pricing.default_volatility_pct),
                risk_free_rate_pct: rate.unwrap_or(config.pricing.risk_free_rate_pct),
                option_type: OptionType::Call,
            });

            print_json(&suggest(config, &request, pricing.as_ref()))
        }

        Commands::Analyze {
            snapshot,
            symbol,
            outlook,
            risk,
            days,
            window,
        } => {
            let mut snapshot = read_snapshot(&snapshot, &symbol)?;
            if window {
                snapshot = snapshot.window(snapshot.underlying_value(), config.chain.window_strikes);
                debug!(strikes = snapshot.len(), "Analysing near-money window");
            }
            print_json(&analyze(config, &snapshot, outlook, risk, days))
        }

        Commands::Scenarios => print_json(&ScenarioTables {
            coa_v1: all_v1().map(|(key, scenario)| TableRow { key, scenario }).collect(),
            coa_v2: all_v2().map(|(key, scenario)| TableRow { key, scenario }).collect(),
        }),

        Commands::Validate { .. } | Commands::Init { .. } => {
            anyhow::bail!("'{}' does not run against an engine configuration", name)
        }
    }
}

fn suggest(config: &EngineConfig, request: &StrategyRequest, pricing: Option<&PricingInputs>) -> Vec<StrategyCandidate> {
    let generator = StrategyGenerator::new(config.strategy.clone());
    match pricing {
        Some(pricing) => generator.suggest_priced(request, pricing),
        None => generator.suggest(request),
    }
}

fn analyze(
    config: &EngineConfig,
    snapshot: &OptionChainSnapshot,
    outlook: Outlook,
    risk: RiskAppetite,
    days: Option<f64>,
) -> AnalyzeReport {
    let aggregator = ChainAggregator::new(config.chain.clone());
    let analysis = aggregator.analyze(snapshot);
    let levels = &analysis.levels;

    let spot = snapshot.underlying_value();
    let request = StrategyRequest::new(spot, outlook, risk)
        .with_levels(levels.atm_strike, levels.support_strike, levels.resistance_strike)
        .with_strike_step(config.strikes.step_for(snapshot.symbol().as_str()));

    let pricing = days.map(|days| PricingInputs {
        spot,
        strike: spot,
        days_to_expiry: days,
        volatility_pct: atm_volatility(snapshot, levels.atm_strike)
            .unwrap_or(config.pricing.default_volatility_pct),
        risk_free_rate_pct: config.pricing.risk_free_rate_pct,
        option_type: OptionType::Call,
    });

    let strategies = suggest(config, &request, pricing.as_ref());

    if !analysis.coa1.is_tradable() {
        warn!(action = analysis.coa1.action(), "COA 1.0 advises against trading");
    }

    AnalyzeReport {
        symbol: snapshot.symbol().clone(),
        spot,
        analysis,
        strategies,
    }
}

/// Mean of the call and put IV quoted at the ATM strike, ignoring zero quotes
fn atm_volatility(snapshot: &OptionChainSnapshot, atm: Option<f64>) -> Option<f64> {
    let atm = atm?;
    let row = snapshot.rows().iter().find(|r| r.strike == atm)?;

    let quoted: Vec<f64> = [row.call.implied_volatility, row.put.implied_volatility]
        .into_iter()
        .filter(|iv| iv.is_finite() && *iv > 0.0)
        .collect();

    if quoted.is_empty() {
        None
    } else {
        Some(quoted.iter().sum::<f64>() / quoted.len() as f64)
    }
}

fn read_snapshot(path: &Path, symbol: &str) -> Result<OptionChainSnapshot> {
    info!(?path, "Reading option-chain snapshot");

    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read snapshot: {:?}", path))?;
    let snapshot = OptionChainSnapshot::from_json(&content, &Symbol::new(symbol))
        .with_context(|| format!("Failed to decode snapshot: {:?}", path))?;

    info!(symbol = %snapshot.symbol(), strikes = snapshot.len(), spot = snapshot.underlying_value(), "Snapshot loaded");
    Ok(snapshot)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

#[derive(Serialize)]
struct ImpliedVolReport {
    market_price: f64,
    implied_volatility_pct: f64,
}

#[derive(Serialize)]
struct AnalyzeReport {
    symbol: Symbol,
    spot: f64,
    #[serde(flatten)]
    analysis: ChainAnalysis,
    strategies: Vec<StrategyCandidate>,
}

#[derive(Serialize)]
struct TableRow<K: Serialize> {
    key: K,
    scenario: &'static Scenario,
}

#[derive(Serialize)]
struct ScenarioTables {
    coa_v1: Vec<TableRow<ScenarioKey>>,
    coa_v2: Vec<TableRow<ScenarioKey2>>,
}

fn validate_command(config_path: &Path) -> Result<()> {
    info!(path = ?config_path, "Validating configuration");

    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            error!(%e, "Failed to load configuration");
            anyhow::bail!(e);
        }
    };

    let report = validate_config(&config);

    println!("\n=== Configuration Validation Report ===\n");

    if !report.defaults_applied.is_empty() {
        println!("Defaults Applied ({}):", report.defaults_applied.len());
        for default in &report.defaults_applied {
            println!("  [info] {} = {}", default.field, default.value);
        }
        println!();
    }

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {}", err);
        }
        println!();
        anyhow::bail!("Configuration validation failed");
    }

    println!("[ok] Configuration is valid!");
    println!();
    println!("Engine: {} {}", config.engine.name, config.engine.version);
    println!("Strike steps: {} symbols (default {})", config.strikes.steps.len(), config.strikes.default_step);
    println!(
        "Pricing: rate {}%, default volatility {}%",
        config.pricing.risk_free_rate_pct, config.pricing.default_volatility_pct
    );
    println!(
        "Strategy offsets: near {} steps, far {} steps",
        config.strategy.near_offset_steps, config.strategy.far_offset_steps
    );

    Ok(())
}

fn init_command(output_path: &Path) -> Result<()> {
    info!(?output_path, "Initializing new configuration file");

    let config = generate_default_config();

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    save_config(&config, output_path)?;

    println!("[ok] Configuration file created successfully!");
    println!();
    println!("Location: {:?}", output_path);
    println!();
    println!("Next steps:");
    println!("  1. Edit strike steps, pricing defaults and chain thresholds as needed");
    println!("  2. Run 'optix validate {:?}' to check the configuration", output_path);
    println!("  3. Pass it to any command with '--config {:?}'", output_path);

    Ok(())
}
