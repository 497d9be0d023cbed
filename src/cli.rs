use std::env;
use std::path::PathBuf;

use gridmix::mix::{Scenario, Unit};

/// Default API server port.
#[cfg(feature = "api")]
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Default)]
pub struct CliOptions {
    pub help: bool,
    pub config: Option<PathBuf>,
    /// Region id or display name.
    pub region: Option<String>,
    pub year: Option<i32>,
    pub unit: Option<Unit>,
    pub scenario: Option<Scenario>,
    /// Replaces the configured clean set.
    pub clean: Option<Vec<String>>,
    pub api_key: Option<String>,
    pub export: Option<PathBuf>,
    /// Print the view and treemap as JSON instead of text.
    pub json: bool,
    #[cfg(feature = "api")]
    pub serve: bool,
    #[cfg(feature = "api")]
    pub port: Option<u16>,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(&args)
}

pub fn parse_args_from(args: &[String]) -> Result<CliOptions, String> {
    let mut opts = CliOptions::default();
    let mut i = 0usize;

    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => opts.help = true,
            "--config" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --config (expected a TOML file path)")?;
                set_once(&mut opts.config, PathBuf::from(path), "--config")?;
            }
            "--region" => {
                i += 1;
                let region = args.next_or_err(i, "missing value for --region (expected a state code or name)")?;
                set_once(&mut opts.region, region.to_string(), "--region")?;
            }
            "--year" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --year (expected a year)")?;
                let year = raw
                    .parse::<i32>()
                    .map_err(|_| format!("--year value \"{raw}\" is not a valid year"))?;
                set_once(&mut opts.year, year, "--year")?;
            }
            "--unit" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --unit (expected energy or power)")?;
                set_once(&mut opts.unit, raw.parse::<Unit>()?, "--unit")?;
            }
            "--scenario" => {
                i += 1;
                let raw = args.next_or_err(
                    i,
                    "missing value for --scenario (expected open, reference or limited)",
                )?;
                set_once(&mut opts.scenario, raw.parse::<Scenario>()?, "--scenario")?;
            }
            "--clean" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --clean (expected comma-separated subset keys)")?;
                let keys = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(str::to_string)
                    .collect();
                set_once(&mut opts.clean, keys, "--clean")?;
            }
            "--api-key" => {
                i += 1;
                let key = args.next_or_err(i, "missing value for --api-key")?;
                set_once(&mut opts.api_key, key.to_string(), "--api-key")?;
            }
            "--export" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --export (expected a file path)")?;
                set_once(&mut opts.export, PathBuf::from(path), "--export")?;
            }
            "--json" => opts.json = true,
            #[cfg(feature = "api")]
            "--serve" => opts.serve = true,
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --port (expected a u16)")?;
                let port = raw
                    .parse::<u16>()
                    .map_err(|_| format!("--port value \"{raw}\" is not a valid u16"))?;
                set_once(&mut opts.port, port, "--port")?;
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    Ok(opts)
}

fn set_once<T>(slot: &mut Option<T>, value: T, flag: &str) -> Result<(), String> {
    if slot.replace(value).is_some() {
        return Err(format!("{flag} provided more than once"));
    }
    Ok(())
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("gridmix: U.S. electricity generation mix by state and year");
    eprintln!();
    eprintln!("Usage: gridmix [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>          Load configuration from a TOML file");
    eprintln!("  --region <code|name>     State to show (default: Entire US)");
    eprintln!("  --year <year>            Year to show (default: latest available)");
    eprintln!("  --unit <energy|power>    Show GWh or average GW");
    eprintln!("  --scenario <name>        Capacity scenario: open, reference, limited");
    eprintln!("  --clean <keys>           Comma-separated subsets counted as clean");
    eprintln!("  --api-key <key>          API key (default: config or EIA_API_KEY)");
    eprintln!("  --export <path>          Write the regional mix to CSV");
    eprintln!("  --json                   Print view and treemap as JSON");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after the first view");
        eprintln!("  --port <u16>             API server port (default: {DEFAULT_PORT})");
    }
    eprintln!("  --help                   Show this help message");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn empty_args_use_defaults() {
        let opts = parse_args_from(&[]).expect("parse should succeed");
        assert!(!opts.help);
        assert!(opts.config.is_none());
        assert!(opts.region.is_none());
    }

    #[test]
    fn supports_full_selection() {
        let opts = parse_args_from(&args(&[
            "--config",
            "gridmix.toml",
            "--region",
            "New York",
            "--year",
            "2022",
            "--unit",
            "power",
            "--scenario",
            "open",
            "--clean",
            "wind, solar,,hydro",
            "--export",
            "mix.csv",
        ]))
        .expect("parse should succeed");
        assert_eq!(
            opts.config.as_deref().and_then(|p| p.to_str()),
            Some("gridmix.toml")
        );
        assert_eq!(opts.region.as_deref(), Some("New York"));
        assert_eq!(opts.year, Some(2022));
        assert_eq!(opts.unit, Some(Unit::Power));
        assert_eq!(opts.scenario, Some(Scenario::Open));
        assert_eq!(
            opts.clean,
            Some(vec!["wind".to_string(), "solar".to_string(), "hydro".to_string()])
        );
        assert!(opts.export.is_some());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(parse_args_from(&args(&["--year", "twenty"])).is_err());
        assert!(parse_args_from(&args(&["--unit", "watts"])).is_err());
        assert!(parse_args_from(&args(&["--scenario"])).is_err());
        assert!(parse_args_from(&args(&["--bogus"])).is_err());
    }

    #[test]
    fn rejects_repeated_flags() {
        let err = parse_args_from(&args(&["--region", "CA", "--region", "TX"]));
        assert_eq!(err.err().as_deref(), Some("--region provided more than once"));
    }

    #[test]
    fn help_flag_is_reported() {
        let opts = parse_args_from(&args(&["-h"])).expect("parse should succeed");
        assert!(opts.help);
    }
}
