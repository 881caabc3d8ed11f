use anyhow::{anyhow, Result};
use clap::{arg, Command};
use std::{
    path::PathBuf,
    time::{Duration, Instant},
};
use tlp_evaluator::{pipeline, simulator::SumoOptions};
use tracing::{info, Level};

fn cli() -> Command {
    Command::new("tlp-evaluator")
        .about("Evaluates traffic-light timing plans by driving the SUMO simulator")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("evaluate")
                .about("Runs one full evaluation and writes the fitness report")
                .arg(
                    arg!(<INSTANCE> "Path to the instance json file")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(<RUN_DIR> "Directory for generated files, resolved against the instance directory")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(<PLAN> "Path to the timing plan file")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(<RESULT> "Path the result report is written to")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(<DELETE> "1 deletes the generated files after reporting, 0 keeps them")
                        .value_parser(clap::value_parser!(u8).range(0..=1)),
                )
                .arg(
                    arg!(--sumo [SUMO] "Simulator executable")
                        .default_value("sumo")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--timeout [TIMEOUT] "Optional number of seconds after which the simulator is killed")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(arg!(--emissions "Produce a dedicated emissions log and read emission totals from it")),
        )
        .subcommand(
            Command::new("score_plan")
                .about("Computes the schedule-only GvR scores without running the simulator")
                .arg(
                    arg!(<INSTANCE> "Path to the instance json file")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(<PLAN> "Path to the timing plan file")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!([RESULT] "Optional path the scores are written to in report style")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
}

fn main() {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let matches = cli().get_matches();

    if let Err(e) = match matches.subcommand() {
        Some(("evaluate", sub_m)) => evaluate(
            sub_m.get_one::<PathBuf>("INSTANCE").unwrap().clone(),
            sub_m.get_one::<PathBuf>("RUN_DIR").unwrap().clone(),
            sub_m.get_one::<PathBuf>("PLAN").unwrap().clone(),
            sub_m.get_one::<PathBuf>("RESULT").unwrap().clone(),
            *sub_m.get_one::<u8>("DELETE").unwrap(),
            sub_m.get_one::<String>("sumo").unwrap().clone(),
            sub_m.get_one::<u64>("timeout").copied(),
            *sub_m.get_one::<bool>("emissions").unwrap(),
        ),
        Some(("score_plan", sub_m)) => score_plan(
            sub_m.get_one::<PathBuf>("INSTANCE").unwrap().clone(),
            sub_m.get_one::<PathBuf>("PLAN").unwrap().clone(),
            sub_m.get_one::<PathBuf>("RESULT").cloned(),
        ),
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn evaluate(
    instance_file: PathBuf,
    run_dir: PathBuf,
    plan_file: PathBuf,
    result_file: PathBuf,
    delete_flag: u8,
    sumo: String,
    timeout: Option<u64>,
    emissions: bool,
) -> Result<()> {
    let started = Instant::now();
    let options = SumoOptions {
        executable: sumo,
        timeout: timeout.map(Duration::from_secs),
        with_emissions: emissions,
    };

    let stats = pipeline::evaluate_plan(
        &instance_file,
        &run_dir,
        &plan_file,
        &result_file,
        &options,
        delete_flag == 1,
    )?;

    info!("fitness: {}", stats.fitness);
    info!("total time: {} ms", started.elapsed().as_millis());
    Ok(())
}

fn score_plan(instance_file: PathBuf, plan_file: PathBuf, result_file: Option<PathBuf>) -> Result<()> {
    let score = pipeline::score_plan(&instance_file, &plan_file, result_file.as_deref())?;
    if result_file.is_none() {
        println!("{} // Original Green vs Red", score.total);
        println!("{} // Normalized GvR", score.normalized);
    }
    Ok(())
}
