use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{arg, Arg, Command};

use cflp_anneal::instance::{self, ProblemInstance};
use cflp_anneal::sa::{SaConfig, SaResult, SaRunner};

fn cli() -> Command {
    Command::new("cflp-anneal")
        .about("Capacitated facility location heuristic solver")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("solve")
                .about("Solves a single instance file")
                .arg(
                    arg!(<INSTANCE> "Path to an instance file")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--"capacity-index" [IDX] "Capacity table index (0-3), required for the capa/capb/capc families")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--optimum [VALUE] "Known optimal cost, for gap reporting")
                        .value_parser(clap::value_parser!(f64)),
                )
                .args(annealing_args()),
        )
        .subcommand(
            Command::new("batch")
                .about("Solves every .txt instance in a directory, skipping the capa/capb/capc family files")
                .arg(
                    arg!(<DIR> "Directory containing instance files")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .args(annealing_args()),
        )
}

fn annealing_args() -> Vec<Arg> {
    vec![
        arg!(--"initial-temperature" [T] "Initial temperature")
            .default_value("1000")
            .value_parser(clap::value_parser!(f64)),
        arg!(--"cooling-rate" [RATE] "Geometric cooling rate in (0, 1)")
            .default_value("0.9995")
            .value_parser(clap::value_parser!(f64)),
        arg!(--iterations [N] "Iterations per temperature level")
            .default_value("10")
            .value_parser(clap::value_parser!(usize)),
        arg!(--"accept-temperature" [T] "Temperature floor that stops the search")
            .default_value("0.00001")
            .value_parser(clap::value_parser!(f64)),
        arg!(--seed [SEED] "Random seed")
            .value_parser(clap::value_parser!(u64)),
        arg!(--log [FILE] "Append a result summary to this file")
            .value_parser(clap::value_parser!(PathBuf)),
    ]
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    match matches.subcommand() {
        Some(("solve", sub)) => {
            let path = sub
                .get_one::<PathBuf>("INSTANCE")
                .expect("INSTANCE is required")
                .clone();
            let capacity_index = sub.get_one::<usize>("capacity-index").copied();
            let optimum = sub.get_one::<f64>("optimum").copied();
            let log_path = sub.get_one::<PathBuf>("log").cloned();

            let instance = load(&path, capacity_index)?;
            solve_one(
                &path,
                &instance,
                &config_from(sub),
                optimum,
                log_path.as_deref(),
            )
        }
        Some(("batch", sub)) => {
            let dir = sub.get_one::<PathBuf>("DIR").expect("DIR is required").clone();
            let log_path = sub.get_one::<PathBuf>("log").cloned();
            batch(&dir, &config_from(sub), log_path.as_deref())
        }
        _ => Ok(()),
    }
}

fn config_from(matches: &clap::ArgMatches) -> SaConfig {
    let mut config = SaConfig::default()
        .with_initial_temperature(*matches.get_one::<f64>("initial-temperature").expect("has default"))
        .with_cooling_rate(*matches.get_one::<f64>("cooling-rate").expect("has default"))
        .with_iterations_per_temperature(*matches.get_one::<usize>("iterations").expect("has default"))
        .with_accept_temperature(*matches.get_one::<f64>("accept-temperature").expect("has default"));
    if let Some(&seed) = matches.get_one::<u64>("seed") {
        config = config.with_seed(seed);
    }
    config
}

fn load(path: &Path, capacity_index: Option<usize>) -> Result<ProblemInstance> {
    match capacity_index {
        Some(index) => instance::read_family_instance(path, index),
        None => instance::read_instance(path),
    }
    .with_context(|| format!("failed to load {}", path.display()))
}

fn solve_one(
    path: &Path,
    instance: &ProblemInstance,
    config: &SaConfig,
    optimum: Option<f64>,
    log_path: Option<&Path>,
) -> Result<()> {
    println!("solving {} ({})", path.display(), instance);

    let start = Instant::now();
    let result = SaRunner::run(instance, config)
        .with_context(|| format!("annealing failed on {}", path.display()))?;
    let seconds = start.elapsed().as_secs_f64();
    let feasible = result.best.is_feasible(instance);

    println!("finished in {seconds:.2}s ({} iterations)", result.iterations);
    println!("feasible: {feasible}");
    println!("{}", result.best);
    if let Some(optimum) = optimum {
        let gap = 100.0 * (result.best_cost() - optimum) / optimum;
        println!("known optimum: {optimum} (gap {gap:.3}%)");
    }

    if let Some(log_path) = log_path {
        append_log(log_path, path, &result, feasible, seconds, optimum)
            .with_context(|| format!("failed to append to {}", log_path.display()))?;
        println!("result appended to {}", log_path.display());
    }
    Ok(())
}

fn batch(dir: &Path, config: &SaConfig, log_path: Option<&Path>) -> Result<()> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    paths.sort();

    for path in paths {
        if is_family_file(&path) {
            println!(
                "skipping {}: family instances need `solve --capacity-index`",
                path.display()
            );
            continue;
        }
        let instance = match load(&path, None) {
            Ok(instance) => instance,
            Err(err) => {
                eprintln!("{err:#}");
                continue;
            }
        };
        if let Err(err) = solve_one(&path, &instance, config, None, log_path) {
            eprintln!("{err:#}");
        }
    }
    Ok(())
}

fn is_family_file(path: &Path) -> bool {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(|stem| instance::family_capacities(&stem.to_ascii_lowercase()).is_some())
        .unwrap_or(false)
}

fn append_log(
    log_path: &Path,
    instance_path: &Path,
    result: &SaResult,
    feasible: bool,
    seconds: f64,
    optimum: Option<f64>,
) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(log_path)?;
    writeln!(file, "instance: {}", instance_path.display())?;
    writeln!(file, "time: {seconds:.2}s")?;
    writeln!(file, "feasible: {feasible}")?;
    writeln!(file, "cost: {}", result.best_cost())?;
    if let Some(optimum) = optimum {
        let gap = 100.0 * (result.best_cost() - optimum) / optimum;
        writeln!(file, "optimum: {optimum} (gap {gap:.3}%)")?;
    }
    writeln!(file, "{}", "-".repeat(40))?;
    Ok(())
}
