use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;

use house_rocket::app::HouseRocketApp;
use house_rocket::cli::{self, Args, Command};
use house_rocket::config::AppConfig;
use house_rocket::data::{export, filter, loader};
use house_rocket::state::AppState;
use house_rocket::{insights, pipeline};

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut config = AppConfig::load(args.config.as_deref())?;
    if args.input.is_some() {
        config.input = args.input.clone();
    }

    match args.command {
        Some(Command::Export {
            input,
            output,
            buy_only,
            zipcodes,
            preview,
        }) => {
            let raw = loader::load_file(&input)?;
            let result = pipeline::run(&raw)
                .with_context(|| format!("running pipeline on {}", input.display()))?;
            let filters = cli::filter_state(buy_only, &zipcodes);
            let rows: Vec<_> = filter::filtered_indices(&result.recommendations, &filters)
                .into_iter()
                .map(|i| result.recommendations[i].clone())
                .collect();

            export::export_file(&rows, &output)?;
            log::info!("Wrote {} rows to {}", rows.len(), output.display());

            if let Some(limit) = preview {
                println!("{}", export::preview(&rows, limit)?);
            }
            if buy_only {
                let all: Vec<usize> = (0..rows.len()).collect();
                println!("Potential profit: {:.3}", filter::potential_profit(&rows, &all));
            }
            Ok(())
        }
        Some(Command::Insights { input }) => {
            let raw = loader::load_file(&input)?;
            let result = pipeline::run(&raw)?;
            for h in insights::compute(&result.recommendations) {
                println!("{h}");
            }
            println!("Median price by zip code:");
            for (zipcode, median) in result.zip_medians.ranked() {
                println!("    {zipcode}  {median:.2}");
            }
            Ok(())
        }
        None => run_dashboard(config),
    }
}

fn run_dashboard(config: AppConfig) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    let mut state = AppState::new(config);
    if let Some(input) = state.config.input.clone() {
        state.open(&input);
    }

    eframe::run_native(
        "House Rocket – Purchase Recommendations",
        options,
        Box::new(|_cc| Ok(Box::new(HouseRocketApp::new(state)))),
    )
    .map_err(|e| anyhow!("{e}"))
}
