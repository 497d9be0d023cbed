//! Dashboard entry point: CLI wiring, config loading and output.

mod cli;

use std::error::Error as StdError;
use std::process;

use tracing_subscriber::EnvFilter;

use gridmix::config::AppConfig;
use gridmix::io::export::export_csv;
use gridmix::mix::{
    CapacityTable, CapacityTables, Dashboard, GenerationAggregator, Selection, SessionState,
};
use gridmix::region::{RegionCatalog, RegionId};
use gridmix::report::{RegionSummary, Treemap};
use gridmix::source::EiaClient;

use cli::CliOptions;

/// Environment variable consulted when no API key is configured.
const API_KEY_ENV: &str = "EIA_API_KEY";

type BoxError = Box<dyn StdError + Send + Sync>;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = match cli::parse_args() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(2);
        }
    };
    if cli.help {
        cli::print_usage();
        return;
    }

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

/// Loads the config and applies CLI overrides, exiting on validation errors.
fn load_config(cli: &CliOptions) -> Result<AppConfig, BoxError> {
    let mut config = match cli.config.as_deref() {
        Some(path) => AppConfig::from_toml_file(path)?,
        None => AppConfig::defaults(),
    };

    if let Some(key) = &cli.api_key {
        config.eia.api_key.clone_from(key);
    }
    if config.eia.api_key.is_empty() {
        config.eia.api_key = std::env::var(API_KEY_ENV).unwrap_or_default();
    }
    if let Some(clean) = &cli.clean {
        config.display.clean.clone_from(clean);
    }
    if let Some(unit) = cli.unit {
        config.display.unit = unit.label().to_string();
    }
    if let Some(scenario) = cli.scenario {
        config.display.scenario = scenario.label().to_string();
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }
    if config.eia.api_key.is_empty() {
        tracing::warn!("no API key configured; set --api-key, [eia].api_key or {API_KEY_ENV}");
    }
    Ok(config)
}

async fn run(cli: CliOptions) -> Result<(), BoxError> {
    let config = load_config(&cli)?;
    let display = config.display_settings()?;
    let regions = RegionCatalog::united_states();
    let subsets = config.subsets();

    let tables = CapacityTables::read(&config.capacity)?;
    let capacity = CapacityTable::load(&regions, &tables);
    let client = EiaClient::new(&config.eia)?;

    let dashboard = Dashboard::initialize(
        client,
        GenerationAggregator::new(subsets.clone(), regions),
        capacity,
        SessionState::new(config.clean(), display),
    )
    .await?;

    if cli.region.is_some() || cli.year.is_some() {
        let current = dashboard.view().map(|v| v.selection);
        let region = match cli.region.as_deref() {
            Some(query) => dashboard
                .regions()
                .resolve(query)
                .map(|r| r.id.clone())
                .ok_or_else(|| gridmix::Error::UnknownRegion(query.to_string()))?,
            None => current
                .as_ref()
                .map_or_else(RegionId::national, |s| s.region.clone()),
        };
        let year = cli
            .year
            .or_else(|| current.as_ref().map(|s| s.year))
            .ok_or(gridmix::Error::NoYears)?;
        dashboard.select(Selection::new(region, year)).await?;
    }

    let view = dashboard
        .view()
        .ok_or("no data committed after initialization")?;
    let years = &config.capacity.data_years;
    let treemap = Treemap::build(&view, &subsets);

    if cli.json {
        let out = serde_json::json!({ "view": view, "treemap": treemap });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let unit = view.display.unit;
        let scenario = view.display.scenario;
        println!("{}", RegionSummary::new(&view.regional, unit, scenario, years));
        if !view.is_national() {
            println!();
            println!("{}", RegionSummary::new(&view.national, unit, scenario, years));
        }
        println!();
        println!("{}", treemap.name);
        for group in &treemap.children {
            println!("  {}", group.name);
            for leaf in &group.children {
                println!("    {}", leaf.tooltip(group.clean, unit).join(" | "));
            }
        }
    }

    if let Some(path) = cli.export.as_deref() {
        export_csv(&view, &subsets, path)?;
        eprintln!("Mix written to {}", path.display());
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(gridmix::api::AppState {
            dashboard,
            capacity_years: config.capacity.data_years.clone(),
        });
        let port = cli.port.unwrap_or(cli::DEFAULT_PORT);
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        gridmix::api::serve(state, addr).await?;
    }

    Ok(())
}
