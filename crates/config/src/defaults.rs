use std::collections::BTreeMap;

pub fn default_engine_name() -> String {
    "optix".to_string()
}

pub fn default_engine_version() -> String {
    "1.0.0".to_string()
}

pub fn default_strike_step() -> f64 {
    50.0
}

pub fn default_strike_steps() -> BTreeMap<String, f64> {
    [
        ("NIFTY", 50.0),
        ("FINNIFTY", 50.0),
        ("BANKNIFTY", 100.0),
        ("SENSEX", 100.0),
        ("BANKEX", 100.0),
    ]
    .into_iter()
    .map(|(symbol, step)| (symbol.to_string(), step))
    .collect()
}

pub fn default_risk_free_rate_pct() -> f64 {
    6.5
}

pub fn default_volatility_pct() -> f64 {
    15.0
}

pub fn default_oi_trend_threshold() -> super::OiTrendThreshold {
    super::OiTrendThreshold::Percent(2.0)
}

pub fn default_strength_ratio_pct() -> f64 {
    75.0
}

pub fn default_window_strikes() -> usize {
    10
}

pub fn default_near_offset_steps() -> u32 {
    2
}

pub fn default_far_offset_steps() -> u32 {
    5
}
