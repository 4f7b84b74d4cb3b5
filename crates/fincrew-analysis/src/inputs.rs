//! User investment parameters and mode derivation

use fincrew_core::{CrewError, Result, TaskParams};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Analysis target used when no single stock is requested
pub const PORTFOLIO_TARGET: &str = "the selected market sectors";

/// Parameter keys, in the order they are validated
pub mod keys {
    pub const INITIAL_CAPITAL: &str = "initial_capital";
    pub const RISK_TOLERANCE: &str = "risk_tolerance";
    pub const INVESTMENT_TIMEFRAME: &str = "investment_timeframe";
    pub const TRADING_STRATEGY_PREFERENCE: &str = "trading_strategy_preference";
    pub const SECTOR_PREFERENCES: &str = "sector_preferences";
    pub const EXCLUDE_SECTORS: &str = "exclude_sectors";
    pub const NEWS_IMPACT_CONSIDERATION: &str = "news_impact_consideration";
    pub const STOCK_SELECTION: &str = "stock_selection";
    pub const ANALYSIS_TARGET: &str = "analysis_target";
}

/// Investor risk appetite
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskTolerance {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        })
    }
}

impl FromStr for RiskTolerance {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!(
                "unknown risk tolerance '{other}' (expected Low, Medium or High)"
            )),
        }
    }
}

/// Which crew runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// Multi-stock recommendation across sectors
    Portfolio,
    /// Deep analysis of one stock
    Single,
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Portfolio => "portfolio",
            Self::Single => "single",
        })
    }
}

/// Parameters of one analysis request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisInputs {
    /// Capital to invest, as entered
    pub initial_capital: String,
    /// Risk appetite; `None` fails validation
    pub risk_tolerance: Option<RiskTolerance>,
    /// Free-text horizon (e.g. "3-5 years")
    pub investment_timeframe: String,
    /// Free-text strategy (e.g. "Long-term")
    pub trading_strategy_preference: String,
    /// Preferred sectors
    pub sector_preferences: Vec<String>,
    /// Sectors to avoid
    pub exclude_sectors: Vec<String>,
    /// Whether news flow should be weighed
    pub news_impact_consideration: bool,
    /// Symbol for single-stock analysis, already normalized by the caller
    pub stock_selection: Option<String>,
}

impl Default for AnalysisInputs {
    fn default() -> Self {
        Self {
            initial_capital: "100000".to_string(),
            risk_tolerance: Some(RiskTolerance::Medium),
            investment_timeframe: "3-5 years".to_string(),
            trading_strategy_preference: "Long-term".to_string(),
            sector_preferences: parse_sector_list("Technology, Healthcare, Renewable Energy"),
            exclude_sectors: parse_sector_list("Tobacco, Gambling"),
            news_impact_consideration: true,
            stock_selection: None,
        }
    }
}

impl AnalysisInputs {
    /// The requested stock symbol, if non-blank
    pub fn stock_symbol(&self) -> Option<&str> {
        self.stock_selection
            .as_deref()
            .filter(|symbol| !symbol.trim().is_empty())
    }

    /// Single when a stock symbol is present, Portfolio otherwise
    pub fn mode(&self) -> AnalysisMode {
        if self.stock_symbol().is_some() {
            AnalysisMode::Single
        } else {
            AnalysisMode::Portfolio
        }
    }

    /// The stock symbol (Single) or [`PORTFOLIO_TARGET`] (Portfolio)
    pub fn analysis_target(&self) -> &str {
        self.stock_symbol().unwrap_or(PORTFOLIO_TARGET)
    }

    /// Check the required fields, reporting the first missing one
    pub fn validate(&self) -> Result<()> {
        let required = [
            (keys::INITIAL_CAPITAL, !self.initial_capital.trim().is_empty()),
            (keys::RISK_TOLERANCE, self.risk_tolerance.is_some()),
            (
                keys::INVESTMENT_TIMEFRAME,
                !self.investment_timeframe.trim().is_empty(),
            ),
            (
                keys::TRADING_STRATEGY_PREFERENCE,
                !self.trading_strategy_preference.trim().is_empty(),
            ),
        ];

        match required.iter().find(|(_, present)| !present) {
            Some((field, _)) => Err(CrewError::missing(*field)),
            None => Ok(()),
        }
    }

    /// Interpolation parameters for the crew, including `analysis_target`
    pub fn to_params(&self) -> TaskParams {
        TaskParams::new()
            .with(keys::INITIAL_CAPITAL, self.initial_capital.as_str())
            .with(
                keys::RISK_TOLERANCE,
                self.risk_tolerance
                    .map(|risk| risk.to_string())
                    .unwrap_or_default(),
            )
            .with(keys::INVESTMENT_TIMEFRAME, self.investment_timeframe.as_str())
            .with(
                keys::TRADING_STRATEGY_PREFERENCE,
                self.trading_strategy_preference.as_str(),
            )
            .with(keys::SECTOR_PREFERENCES, self.sector_preferences.join(", "))
            .with(keys::EXCLUDE_SECTORS, self.exclude_sectors.join(", "))
            .with(
                keys::NEWS_IMPACT_CONSIDERATION,
                self.news_impact_consideration.to_string(),
            )
            .with(keys::STOCK_SELECTION, self.stock_symbol().unwrap_or_default())
            .with(keys::ANALYSIS_TARGET, self.analysis_target())
    }
}

/// Caller-side symbol normalization: trimmed and upper-cased, `None` if blank
pub fn normalize_symbol(raw: &str) -> Option<String> {
    let symbol = raw.trim();
    (!symbol.is_empty()).then(|| symbol.to_ascii_uppercase())
}

/// Split a comma separated sector list, trimming and dropping blanks and repeats
pub fn parse_sector_list(raw: &str) -> Vec<String> {
    let mut sectors: Vec<String> = Vec::new();
    for sector in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !sectors.iter().any(|known| known.eq_ignore_ascii_case(sector)) {
            sectors.push(sector.to_string());
        }
    }
    sectors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_stock_symbol() {
        let mut inputs = AnalysisInputs::default();
        assert_eq!(inputs.mode(), AnalysisMode::Portfolio);
        assert_eq!(inputs.analysis_target(), PORTFOLIO_TARGET);

        inputs.stock_selection = Some("   ".to_string());
        assert_eq!(inputs.mode(), AnalysisMode::Portfolio);

        inputs.stock_selection = Some("nvda".to_string());
        assert_eq!(inputs.mode(), AnalysisMode::Single);
        assert_eq!(inputs.analysis_target(), "nvda");
    }

    #[test]
    fn test_validate_reports_first_missing_field() {
        assert!(AnalysisInputs::default().validate().is_ok());

        let cases: [(fn(&mut AnalysisInputs), &str); 4] = [
            (|i| i.initial_capital.clear(), "initial_capital"),
            (|i| i.risk_tolerance = None, "risk_tolerance"),
            (|i| i.investment_timeframe = "  ".into(), "investment_timeframe"),
            (
                |i| i.trading_strategy_preference.clear(),
                "trading_strategy_preference",
            ),
        ];

        for (mutate, field) in cases {
            let mut inputs = AnalysisInputs::default();
            mutate(&mut inputs);
            let err = inputs.validate().unwrap_err();
            assert_eq!(err.to_string(), format!("Missing required parameter: {field}"));
        }
    }

    #[test]
    fn test_to_params() {
        let inputs = AnalysisInputs {
            stock_selection: Some("AAPL".to_string()),
            ..AnalysisInputs::default()
        };
        let params = inputs.to_params();

        assert_eq!(params.get(keys::ANALYSIS_TARGET), Some("AAPL"));
        assert_eq!(params.get(keys::RISK_TOLERANCE), Some("Medium"));
        assert_eq!(
            params.get(keys::SECTOR_PREFERENCES),
            Some("Technology, Healthcare, Renewable Energy")
        );
        assert_eq!(params.get(keys::NEWS_IMPACT_CONSIDERATION), Some("true"));
        assert_eq!(params.len(), 9);
    }

    #[test]
    fn test_risk_tolerance_parsing() {
        assert_eq!("high".parse::<RiskTolerance>(), Ok(RiskTolerance::High));
        assert_eq!(" Low ".parse::<RiskTolerance>(), Ok(RiskTolerance::Low));
        assert!("extreme".parse::<RiskTolerance>().is_err());
    }

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol(" aapl "), Some("AAPL".to_string()));
        assert_eq!(normalize_symbol("brk.b"), Some("BRK.B".to_string()));
        assert_eq!(normalize_symbol("   "), None);
    }

    #[test]
    fn test_parse_sector_list() {
        assert_eq!(
            parse_sector_list(" Energy, ,Utilities,energy "),
            vec!["Energy".to_string(), "Utilities".to_string()]
        );
        assert!(parse_sector_list("").is_empty());
    }

    #[test]
    fn test_deserialize_mapping_with_defaults() {
        let inputs: AnalysisInputs = serde_json::from_str(
            r#"{"initial_capital": "5000", "risk_tolerance": "High", "stock_selection": "MSFT"}"#,
        )
        .unwrap();

        assert_eq!(inputs.initial_capital, "5000");
        assert_eq!(inputs.risk_tolerance, Some(RiskTolerance::High));
        assert_eq!(inputs.investment_timeframe, "3-5 years");
        assert_eq!(inputs.mode(), AnalysisMode::Single);
    }
}
