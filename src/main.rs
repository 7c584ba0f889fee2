//! traffic-markov entry point: CLI wiring and config-driven runs.

use std::path::Path;
use std::process;

use tracing_subscriber::EnvFilter;
use traffic_markov::config::ScenarioConfig;
use traffic_markov::io::export::{export_steady_states_csv, export_trajectory_csv};
use traffic_markov::report::write_html_report;
use traffic_markov::sim::engine::simulate_with_axis;
use traffic_markov::sim::sampler::estimate_trajectory;
use traffic_markov::sim::summary::RunSummary;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    seed_override: Option<u64>,
    samples_override: Option<usize>,
    csv_out: Option<String>,
    steady_out: Option<String>,
    report_out: Option<String>,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
    #[cfg(feature = "tui")]
    tui: bool,
}

fn print_help() {
    eprintln!("traffic-markov: period-based Markov model of daily traffic congestion");
    eprintln!();
    eprintln!("Usage: traffic-markov [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!(
        "  --preset <name>          Use a built-in preset ({})",
        ScenarioConfig::PRESETS.join(", ")
    );
    eprintln!("  --csv-out <path>         Export the trajectory to CSV");
    eprintln!("  --steady-out <path>      Export per-period steady states to CSV");
    eprintln!("  --report-out <path>      Write an HTML report");
    eprintln!("  --samples <n>            Cross-check with n sampled paths");
    eprintln!("  --seed <u64>             Override sampling seed");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after the run");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    #[cfg(feature = "tui")]
    eprintln!("  --tui                    Step through the preset in a terminal UI");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
}

/// Returns the value following a flag, or exits with an error.
fn flag_value(args: &[String], i: usize, flag: &str, what: &str) -> String {
    match args.get(i) {
        Some(v) => v.clone(),
        None => {
            eprintln!("error: {flag} requires a {what} argument");
            process::exit(1);
        }
    }
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        seed_override: None,
        samples_override: None,
        csv_out: None,
        steady_out: None,
        report_out: None,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
        #[cfg(feature = "tui")]
        tui: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                cli.scenario_path = Some(flag_value(&args, i, "--scenario", "path"));
            }
            "--preset" => {
                i += 1;
                cli.preset = Some(flag_value(&args, i, "--preset", "name"));
            }
            "--csv-out" => {
                i += 1;
                cli.csv_out = Some(flag_value(&args, i, "--csv-out", "path"));
            }
            "--steady-out" => {
                i += 1;
                cli.steady_out = Some(flag_value(&args, i, "--steady-out", "path"));
            }
            "--report-out" => {
                i += 1;
                cli.report_out = Some(flag_value(&args, i, "--report-out", "path"));
            }
            "--seed" => {
                i += 1;
                let raw = flag_value(&args, i, "--seed", "u64");
                if let Ok(s) = raw.parse::<u64>() {
                    cli.seed_override = Some(s);
                } else {
                    eprintln!("error: --seed value \"{raw}\" is not a valid u64");
                    process::exit(1);
                }
            }
            "--samples" => {
                i += 1;
                let raw = flag_value(&args, i, "--samples", "count");
                if let Ok(n) = raw.parse::<usize>() {
                    cli.samples_override = Some(n);
                } else {
                    eprintln!("error: --samples value \"{raw}\" is not a valid count");
                    process::exit(1);
                }
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                let raw = flag_value(&args, i, "--port", "u16");
                if let Ok(p) = raw.parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{raw}\" is not a valid u16");
                    process::exit(1);
                }
            }
            #[cfg(feature = "tui")]
            "--tui" => {
                cli.tui = true;
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    let cli = parse_args();

    #[cfg(feature = "tui")]
    if cli.tui {
        traffic_markov::tui::run(cli.preset.as_deref().unwrap_or("baseline"));
        return;
    }

    // --scenario takes priority, then --preset, then baseline default
    let mut config = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ScenarioConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::baseline()
    };

    if let Some(seed) = cli.seed_override {
        config.simulation.seed = seed;
    }
    if let Some(n) = cli.samples_override {
        config.simulation.sample_runs = n;
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let scenario = config.build().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        process::exit(1);
    });
    let trajectory = simulate_with_axis(scenario.initial, &scenario.schedule, &scenario.axis)
        .unwrap_or_else(|e| {
            eprintln!("error: {e}");
            process::exit(1);
        });
    let summary = RunSummary::from_trajectory(&trajectory, &scenario.schedule).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        process::exit(1);
    });

    for r in trajectory.records() {
        println!("{r}");
    }
    println!("\n{summary}");

    if scenario.sample_runs > 0 {
        match estimate_trajectory(
            scenario.initial,
            &scenario.schedule,
            &scenario.axis,
            scenario.sample_runs,
            scenario.seed,
        ) {
            Ok(estimate) => {
                let max_dev = trajectory
                    .records()
                    .iter()
                    .zip(estimate.records())
                    .map(|(exact, est)| exact.vector.max_abs_diff(&est.vector))
                    .fold(0.0, f64::max);
                println!(
                    "Sampled {} paths (seed {}): max deviation from exact = {max_dev:.4}",
                    scenario.sample_runs, scenario.seed
                );
            }
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        }
    }

    if let Some(ref path) = cli.csv_out {
        if let Err(e) = export_trajectory_csv(&trajectory, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Trajectory written to {path}");
    }
    if let Some(ref path) = cli.steady_out {
        if let Err(e) = export_steady_states_csv(&summary, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Steady states written to {path}");
    }
    if let Some(ref path) = cli.report_out {
        if let Err(e) = write_html_report(&trajectory, &summary, Path::new(path)) {
            eprintln!("error: failed to write report: {e}");
            process::exit(1);
        }
        eprintln!("Report written to {path}");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(traffic_markov::api::AppState {
            config,
            summary,
            trajectory,
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(traffic_markov::api::serve(state, addr)) {
            eprintln!("error: API server failed: {e}");
            process::exit(1);
        }
    }
}
