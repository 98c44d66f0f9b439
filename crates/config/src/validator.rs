use crate::*;
use regex::Regex;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Engine name is required")]
    MissingEngineName,

    #[error("Invalid version format: {0}. Must be in format X.Y.Z (e.g., 1.0.0)")]
    InvalidVersionFormat(String),

    #[error("{field} must be a positive number, got {value}")]
    InvalidPositiveFloat { field: String, value: f64 },

    #[error("{field} must be between 0 and 100, got {value}")]
    InvalidPercentageRange { field: String, value: f64 },

    #[error("{field} must be a positive integer")]
    InvalidPositiveInteger { field: String },

    #[error("Strategy offsets: far_offset_steps ({far}) must exceed near_offset_steps ({near})")]
    InvalidOffsetOrder { near: u32, far: u32 },
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct DefaultApplied {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    pub defaults_applied: Vec<DefaultApplied>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            defaults_applied: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn add_default(&mut self, field: &str, value: &str) {
        self.defaults_applied.push(DefaultApplied {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

pub fn validate_config(config: &EngineConfig) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_engine(&config.engine, &mut report);
    validate_strikes(&config.strikes, &mut report);
    validate_pricing(&config.pricing, &mut report);
    validate_chain(&config.chain, &mut report);
    validate_strategy(&config.strategy, &mut report);

    report
}

fn validate_engine(engine: &EngineInfo, report: &mut ValidationReport) {
    if engine.name.trim().is_empty() {
        report.add_error(ValidationError::MissingEngineName);
    }

    let version_ok = Regex::new(r"^\d+\.\d+\.\d+$")
        .map(|re| re.is_match(&engine.version))
        .unwrap_or(false);
    if !version_ok {
        report.add_error(ValidationError::InvalidVersionFormat(engine.version.clone()));
    }
}

fn require_positive(field: &str, value: f64, report: &mut ValidationReport) {
    if !(value.is_finite() && value > 0.0) {
        report.add_error(ValidationError::InvalidPositiveFloat {
            field: field.to_string(),
            value,
        });
    }
}

fn require_percentage(field: &str, value: f64, report: &mut ValidationReport) {
    if !(0.0..=100.0).contains(&value) {
        report.add_error(ValidationError::InvalidPercentageRange {
            field: field.to_string(),
            value,
        });
    }
}

fn validate_strikes(strikes: &StrikesConfig, report: &mut ValidationReport) {
    require_positive("strikes.default_step", strikes.default_step, report);

    if strikes.steps.is_empty() {
        report.add_default("strikes.steps", "default_step for every symbol");
    }

    for (symbol, step) in &strikes.steps {
        require_positive(&format!("strikes.steps.{}", symbol), *step, report);

        if symbol != &symbol.to_uppercase() {
            report.add_warning(
                &format!("strikes.steps.{}", symbol),
                "Symbols are matched in upper case; this entry will never match",
            );
        }
    }
}

fn validate_pricing(pricing: &PricingConfig, report: &mut ValidationReport) {
    require_percentage("pricing.risk_free_rate_pct", pricing.risk_free_rate_pct, report);
    require_positive("pricing.default_volatility_pct", pricing.default_volatility_pct, report);

    if pricing.default_volatility_pct > 200.0 {
        report.add_warning(
            "pricing.default_volatility_pct",
            "Default volatility above 200% is unusual for index options",
        );
    }
}

fn validate_chain(chain: &ChainConfig, report: &mut ValidationReport) {
    match chain.oi_trend_threshold {
        OiTrendThreshold::Absolute(0) => report.add_warning(
            "chain.oi_trend_threshold",
            "A zero threshold reports every non-zero OI change as a trend",
        ),
        OiTrendThreshold::Absolute(_) => {}
        OiTrendThreshold::Percent(pct) => {
            require_percentage("chain.oi_trend_threshold.value", pct, report)
        }
    }

    require_percentage("chain.strength_ratio_pct", chain.strength_ratio_pct, report);

    if chain.window_strikes == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "chain.window_strikes".to_string(),
        });
    }
}

fn validate_strategy(strategy: &StrategyConfig, report: &mut ValidationReport) {
    if strategy.near_offset_steps == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "strategy.near_offset_steps".to_string(),
        });
    }

    if strategy.far_offset_steps <= strategy.near_offset_steps {
        report.add_error(ValidationError::InvalidOffsetOrder {
            near: strategy.near_offset_steps,
            far: strategy.far_offset_steps,
        });
    }
}
