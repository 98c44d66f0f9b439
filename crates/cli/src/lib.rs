use clap::{Parser, Subcommand};
use common::OptionType;
use observability::LogFormat;
use scenario::{OiTrend, Strength};
use std::path::PathBuf;
use strategy::{Outlook, RiskAppetite};

#[derive(Parser, Debug)]
#[command(name = "optix")]
#[command(about = "Optix - Options analytics and strategy suggestions for index option chains")]
#[command(version)]
pub struct Cli {
    /// Engine configuration file (YAML); built-in defaults when omitted
    #[arg(short, long, global = true, env = "OPTIX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log output format: pretty, json or compact
    #[arg(long, global = true, default_value = "pretty")]
    pub log_format: LogFormat,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Black-Scholes premium and Greeks for one option leg
    Price {
        #[arg(long)]
        spot: f64,

        #[arg(long)]
        strike: f64,

        /// Calendar days to expiry
        #[arg(long)]
        days: f64,

        /// Implied volatility in percent; config default when omitted
        #[arg(long)]
        vol: Option<f64>,

        /// Risk-free rate in percent; config default when omitted
        #[arg(long)]
        rate: Option<f64>,

        /// Option type: ce or pe
        #[arg(long = "type")]
        option_type: OptionType,
    },

    /// Implied volatility from a market premium
    Iv {
        /// Observed option premium
        #[arg(long)]
        price: f64,

        #[arg(long)]
        spot: f64,

        #[arg(long)]
        strike: f64,

        #[arg(long)]
        days: f64,

        #[arg(long)]
        rate: Option<f64>,

        #[arg(long = "type")]
        option_type: OptionType,
    },

    /// Support, resistance, PCR and OI-change analytics for a chain snapshot
    Levels {
        /// Snapshot file: NSE option-chain JSON or the plain snapshot shape
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Index symbol when the snapshot does not name one
        #[arg(long, default_value = "NIFTY")]
        symbol: String,

        /// Only use the configured number of strikes around ATM
        #[arg(long)]
        window: bool,
    },

    /// Classify support/resistance strength with the COA 1.0 table
    Classify {
        /// strong, wtb (weak toward bottom) or wtt (weak toward top)
        #[arg(long)]
        support: Strength,

        #[arg(long)]
        resistance: Strength,
    },

    /// Classify call/put OI trends with the COA 2.0 table
    OiSignal {
        /// stable, decreasing or increasing
        #[arg(long)]
        call: OiTrend,

        #[arg(long)]
        put: OiTrend,
    },

    /// Suggest option strategies for a view and risk appetite
    Suggest {
        #[arg(long)]
        spot: f64,

        /// ATM strike; spot rounded to the strike grid when omitted
        #[arg(long)]
        atm: Option<f64>,

        #[arg(long)]
        support: Option<f64>,

        #[arg(long)]
        resistance: Option<f64>,

        /// bullish, bearish or neutral
        #[arg(long)]
        outlook: Outlook,

        /// conservative, moderate or aggressive
        #[arg(long)]
        risk: RiskAppetite,

        /// Index symbol, selects the strike step
        #[arg(long, default_value = "NIFTY")]
        symbol: String,

        /// Days to expiry; enables premium estimates
        #[arg(long)]
        days: Option<f64>,

        #[arg(long)]
        vol: Option<f64>,

        #[arg(long)]
        rate: Option<f64>,
    },

    /// Levels, scenarios and strategy suggestions from one snapshot
    Analyze {
        #[arg(short, long)]
        snapshot: PathBuf,

        #[arg(long, default_value = "NIFTY")]
        symbol: String,

        #[arg(long)]
        outlook: Outlook,

        #[arg(long)]
        risk: RiskAppetite,

        /// Days to expiry; enables premium estimates
        #[arg(long)]
        days: Option<f64>,

        /// Analyse only the configured number of strikes around ATM
        #[arg(long)]
        window: bool,
    },

    /// Print both COA tables
    Scenarios,

    /// Validate a configuration file
    Validate {
        /// Configuration file; falls back to --config
        path: Option<PathBuf>,
    },

    /// Write a configuration file with all defaults
    Init {
        /// Output path for the new configuration file
        #[arg(short, long, default_value = "optix.yaml")]
        output: PathBuf,
    },
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Price { .. } => "price",
            Commands::Iv { .. } => "iv",
            Commands::Levels { .. } => "levels",
            Commands::Classify { .. } => "classify",
            Commands::OiSignal { .. } => "oi-signal",
            Commands::Suggest { .. } => "suggest",
            Commands::Analyze { .. } => "analyze",
            Commands::Scenarios => "scenarios",
            Commands::Validate { .. } => "validate",
            Commands::Init { .. } => "init",
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_price() {
        let cli = Cli::try_parse_from([
            "optix", "price", "--spot", "24000", "--strike", "24000", "--days", "7", "--vol", "15", "--type", "ce",
        ])
        .unwrap();

        match cli.command {
            Commands::Price {
                spot,
                vol,
                rate,
                option_type,
                ..
            } => {
                assert_eq!(spot, 24000.0);
                assert_eq!(vol, Some(15.0));
                assert_eq!(rate, None);
                assert_eq!(option_type, OptionType::Call);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(cli.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_parse_suggest_with_global_flags() {
        let cli = Cli::try_parse_from([
            "optix", "suggest", "--spot", "52010", "--outlook", "neutral", "--risk", "aggressive", "--symbol",
            "BANKNIFTY", "--log-format", "json", "-c", "optix.yaml",
        ])
        .unwrap();

        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(cli.config, Some(PathBuf::from("optix.yaml")));
        assert_eq!(cli.command.name(), "suggest");
        match cli.command {
            Commands::Suggest {
                outlook,
                risk,
                atm,
                symbol,
                ..
            } => {
                assert_eq!(outlook, Outlook::Neutral);
                assert_eq!(risk, RiskAppetite::Aggressive);
                assert_eq!(atm, None);
                assert_eq!(symbol, "BANKNIFTY");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_analyze_window() {
        let cli = Cli::try_parse_from([
            "optix", "analyze", "-s", "chain.json", "--outlook", "bearish", "--risk", "moderate", "--window",
        ])
        .unwrap();

        match cli.command {
            Commands::Analyze {
                snapshot, window, days, ..
            } => {
                assert_eq!(snapshot, PathBuf::from("chain.json"));
                assert!(window);
                assert_eq!(days, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_classify() {
        let cli = Cli::try_parse_from(["optix", "classify", "--support", "wtb", "--resistance", "strong"]).unwrap();

        match cli.command {
            Commands::Classify { support, resistance } => {
                assert_eq!(support, Strength::WeakTowardBottom);
                assert_eq!(resistance, Strength::Strong);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_values() {
        assert!(Cli::try_parse_from(["optix", "oi-signal", "--call", "up", "--put", "sideways"]).is_err());
        assert!(Cli::try_parse_from(["optix", "price", "--spot", "1", "--strike", "1", "--days", "1", "--type", "xx"])
            .is_err());
        assert!(Cli::try_parse_from(["optix", "scenarios", "--log-format", "xml"]).is_err());
    }
}
