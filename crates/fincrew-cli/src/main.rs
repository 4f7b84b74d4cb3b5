//! Command-line interface for fincrew

use anyhow::Context;
use clap::Parser;
use comfy_table::{Table, presets::UTF8_FULL};
use fincrew_analysis::{
    AnalysisInputs, AnalysisMode, AnalysisRunner, CrewConfig, RiskTolerance, normalize_symbol,
    parse_sector_list,
};
use fincrew_core::{CrewError, LogBroadcaster, LogEntry};
use fincrew_llm::{ChatClient, ChatConfig, LlmCrewEngine, Toolbox};
use fincrew_utils::{EnvConfig, LogFormat};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "fincrew")]
#[command(about = "Run a financial analysis crew", long_about = None)]
#[command(version)]
struct Args {
    /// Initial investment capital
    #[arg(long)]
    capital: Option<String>,

    /// Risk tolerance (Low, Medium, High)
    #[arg(long)]
    risk: Option<RiskTolerance>,

    /// Investment timeframe (e.g. "1-2 years", "5+ years")
    #[arg(long)]
    timeframe: Option<String>,

    /// Trading strategy preference
    #[arg(long)]
    strategy: Option<String>,

    /// Preferred sectors (comma separated)
    #[arg(long)]
    sectors: Option<String>,

    /// Sectors to exclude (comma separated)
    #[arg(long)]
    exclude: Option<String>,

    /// Specific stock to analyze (single stock analysis)
    #[arg(long)]
    stock: Option<String>,

    /// Output file for the analysis report
    #[arg(long, default_value = "analysis_result.txt")]
    output: PathBuf,

    /// Emit tracing events as JSON
    #[arg(long)]
    json_logs: bool,
}

impl Args {
    /// Merge the flags over the default inputs
    fn inputs(&self) -> AnalysisInputs {
        let mut inputs = AnalysisInputs::default();
        if let Some(capital) = &self.capital {
            inputs.initial_capital.clone_from(capital);
        }
        if let Some(risk) = self.risk {
            inputs.risk_tolerance = Some(risk);
        }
        if let Some(timeframe) = &self.timeframe {
            inputs.investment_timeframe.clone_from(timeframe);
        }
        if let Some(strategy) = &self.strategy {
            inputs.trading_strategy_preference.clone_from(strategy);
        }
        if let Some(sectors) = &self.sectors {
            inputs.sector_preferences = parse_sector_list(sectors);
        }
        if let Some(exclude) = &self.exclude {
            inputs.exclude_sectors = parse_sector_list(exclude);
        }
        inputs.stock_selection = self.stock.as_deref().and_then(normalize_symbol);
        inputs
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let format = if args.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    fincrew_utils::init_tracing_with("warn", format);

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_failure(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> anyhow::Result<()> {
    let env = EnvConfig::from_env()?;
    let config = CrewConfig::from_env_config(&env);
    println!("Environment loaded. Using {} model.", env.model_name);

    let inputs = args.inputs();
    println!("\n=== Starting Financial Analysis ===");
    println!("{}", inputs_table(&inputs));
    println!("\nAnalysis in progress... (this may take several minutes)");
    println!(
        "Analysis Mode: {}",
        match inputs.mode() {
            AnalysisMode::Single => "Single Stock",
            AnalysisMode::Portfolio => "Portfolio",
        }
    );

    let client = ChatClient::new(ChatConfig::from_env_config(&env))
        .context("failed to build chat client")?;
    let toolbox = Toolbox::web(env.serper_api_key.clone()).context("failed to build web tools")?;
    let engine = Arc::new(LlmCrewEngine::new(Arc::new(client), toolbox));

    let log = Arc::new(LogBroadcaster::new());
    log.register_callback(print_entry);

    let runner = AnalysisRunner::new(engine, log, config);
    info!(mode = %inputs.mode(), "Running analysis");
    let report = runner.run(&inputs).await?;

    println!("\n=== ANALYSIS RESULT ===\n");
    println!("{report}");

    std::fs::write(&args.output, &report)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!("\nAnalysis saved to '{}'", args.output.display());
    Ok(())
}

fn print_entry(entry: &LogEntry) {
    match entry.details() {
        Some(details) => eprintln!(
            "[{}] {}: {} - {}",
            entry.time_label(),
            entry.agent(),
            entry.action(),
            details
        ),
        None => eprintln!("[{}] {}: {}", entry.time_label(), entry.agent(), entry.action()),
    }
}

fn inputs_table(inputs: &AnalysisInputs) -> Table {
    let yes_no = |flag: bool| if flag { "Yes" } else { "No" };
    let risk = inputs
        .risk_tolerance
        .map(|risk| risk.to_string())
        .unwrap_or_default();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Parameter", "Value"]);
    table.add_row(vec!["Initial capital", inputs.initial_capital.as_str()]);
    table.add_row(vec!["Risk tolerance", risk.as_str()]);
    table.add_row(vec!["Timeframe", inputs.investment_timeframe.as_str()]);
    table.add_row(vec!["Strategy", inputs.trading_strategy_preference.as_str()]);
    table.add_row(vec!["Sectors", inputs.sector_preferences.join(", ").as_str()]);
    table.add_row(vec!["Excluded sectors", inputs.exclude_sectors.join(", ").as_str()]);
    table.add_row(vec!["News impact", yes_no(inputs.news_impact_consideration)]);
    table.add_row(vec!["Stock", inputs.stock_symbol().unwrap_or("-")]);
    table
}

fn report_failure(err: &anyhow::Error) {
    error!(error = %format!("{err:#}"), "Analysis failed");

    if let Some(CrewError::Validation { .. }) = err.downcast_ref::<CrewError>() {
        eprintln!("\nInput Error: {err}");
        eprintln!("\nPlease check your parameters and try again.");
        return;
    }

    eprintln!("\nError during analysis: {err:#}");
    let rate_limited = err
        .downcast_ref::<CrewError>()
        .is_some_and(CrewError::is_rate_limited)
        || format!("{err:#}").to_lowercase().contains("rate limit");
    if rate_limited {
        eprintln!("\nAPI rate limit hit. Please wait a few minutes before trying again.");
    }
}
