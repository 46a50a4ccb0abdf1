mod cli;
mod gui;

use clap::Parser;
use cli::{Cli, Commands};
use genrescope_chart::{ChartInput, ChartStyle};
use genrescope_core::DevicePreference;
use genrescope_infer::{AppConfig, ModelSession};
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Rows shown in ranked output when neither metadata nor config says otherwise
const DEFAULT_TOP_K: usize = 10;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Gui {
            config,
            cpu,
            verbose,
        } => {
            init_logging(verbose);
            let config = load_config(config.as_deref(), cpu)?;
            gui::run(config)
        }

        Commands::Predict {
            text,
            config,
            chart,
            top,
            cpu,
            verbose,
        } => {
            init_logging(verbose);
            let config = load_config(config.as_deref(), cpu)?;

            let session = ModelSession::load(&config)?;
            let predictions = session.predict(&text)?;

            let top_k = top
                .or(config.top_k)
                .or(session.metadata().top_k)
                .unwrap_or(DEFAULT_TOP_K);

            let input = ChartInput::from(predictions);
            for (label, prob) in genrescope_chart::ranked_entries(&input)
                .into_iter()
                .take(top_k)
            {
                println!("{label:<24} {prob:.3}");
            }

            if let Some(chart_path) = chart {
                if chart_path.exists() {
                    // Best effort; render overwrites anyway.
                    let _ = std::fs::remove_file(&chart_path);
                }
                let written = genrescope_chart::render(&input, &chart_path, &ChartStyle::default())?;
                println!("chart written to {}", written.display());
            }

            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>, force_cpu: bool) -> anyhow::Result<AppConfig> {
    let mut config = AppConfig::load_or_default(path)?;
    if force_cpu {
        config.device = DevicePreference::Cpu;
    }
    Ok(config)
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        "genrescope_app=debug,genrescope_infer=debug,genrescope_chart=debug"
    } else {
        "genrescope_app=info,genrescope_infer=info,genrescope_chart=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
