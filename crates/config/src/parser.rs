use crate::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

#[instrument(skip(path))]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<EngineConfig> {
    let path = path.as_ref();
    info!("Loading configuration from: {:?}", path);

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    debug!("Config file content length: {} bytes", content.len());

    parse_config(&content)
}

/// Parse configuration from YAML text, after environment variable substitution
pub fn parse_config(content: &str) -> Result<EngineConfig> {
    let substituted = substitution::substitute_env_vars(content)?;
    debug!("Environment variable substitution completed");

    // An empty file is a valid, all-defaults configuration
    if substituted.trim().is_empty() {
        return Ok(EngineConfig::default());
    }

    let config: EngineConfig = serde_yaml::from_str(&substituted)
        .with_context(|| "Failed to parse YAML configuration")?;

    info!("Configuration loaded successfully");
    Ok(config)
}

#[instrument]
pub fn generate_default_config() -> EngineConfig {
    EngineConfig::default()
}

#[instrument]
pub fn save_config<P: AsRef<Path> + std::fmt::Debug>(config: &EngineConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    info!("Saving configuration to: {:?}", path);

    let yaml = serde_yaml::to_string(config)
        .with_context(|| "Failed to serialize configuration to YAML")?;

    fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    info!("Configuration saved successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
engine:
  name: desk
  version: 2.1.0
pricing:
  risk_free_rate_pct: 7.0
  default_volatility_pct: 12.5
chain:
  oi_trend_threshold:
    type: absolute
    value: 25000
  strength_ratio_pct: 70
  window_strikes: 8
strategy:
  near_offset_steps: 3
  far_offset_steps: 6
"#;
        let config = parse_config(yaml).unwrap();

        assert_eq!(config.engine.name, "desk");
        assert_eq!(config.pricing.risk_free_rate_pct, 7.0);
        assert_eq!(config.chain.oi_trend_threshold, OiTrendThreshold::Absolute(25000));
        assert_eq!(config.chain.window_strikes, 8);
        assert_eq!(config.strategy.far_offset_steps, 6);
        assert_eq!(config.strikes, StrikesConfig::default());
    }

    #[test]
    fn test_parse_applies_env_defaults() {
        std::env::remove_var("OPTIX_PARSER_UNSET_RATE");
        let yaml = "pricing:\n  risk_free_rate_pct: ${OPTIX_PARSER_UNSET_RATE:-7.0}\n";

        let config = parse_config(yaml).unwrap();

        assert_eq!(config.pricing.risk_free_rate_pct, 7.0);
    }

    #[test]
    fn test_parse_empty_config() {
        assert_eq!(parse_config("").unwrap(), EngineConfig::default());
        assert_eq!(parse_config("\n  \n").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_parse_rejects_malformed_yaml() {
        assert!(parse_config("chain: [1, 2").is_err());
        assert!(parse_config("strategy:\n  near_offset_steps: lots").is_err());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("optix-config-{}.yaml", std::process::id()));

        let mut config = generate_default_config();
        config.chain.window_strikes = 6;
        save_config(&config, &path).unwrap();

        let loaded = load_config(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(load_config("/definitely/not/here/optix.yaml").is_err());
    }
}
