use crate::{
    encoder,
    error::EvalError,
    extract,
    metrics::{self, GvrScore},
    report,
    simulator::{self, LogPaths, SumoOptions},
};
use anyhow::{anyhow, Result};
use std::{
    fs,
    io::Write,
    path::Path,
    time::Instant,
};
use tlp_structs::core::{Instance, SimulationStatistics, TimingPlan};
use tracing::info;

/// One full evaluation: load instance and plan, encode the plan, run the
/// simulator, reduce its logs into statistics, write the report, optionally
/// delete the generated files.
///
/// Loader and encoder failures abort before the simulator runs, so a doomed
/// run never pays the simulation cost.
pub fn evaluate_plan(
    instance_file: &Path,
    run_dir: &Path,
    plan_file: &Path,
    result_file: &Path,
    options: &SumoOptions,
    delete_generated: bool,
) -> Result<SimulationStatistics> {
    let instance = Instance::load(instance_file)?;
    let plan = TimingPlan::load(plan_file, &instance).map_err(EvalError::Plan)?;

    let additional_file = encoder::write_additional_file(&instance, &plan, run_dir)?;
    let gvr = metrics::gvr_score(&instance, &plan);

    info!("executing {} ...", options.executable);
    let sumo_started = Instant::now();
    let logs = simulator::run_simulator(&instance, run_dir, &additional_file, options)?;
    info!("simulator finished in {} ms", sumo_started.elapsed().as_millis());

    let trips = extract::extract_tripinfo(&logs.tripinfo);
    let summary = extract::extract_summary(&logs.summary);
    let emissions = logs.emissions.as_deref().map(extract::extract_emissions);

    let stats = metrics::assemble_statistics(&instance, gvr, &trips, &summary, emissions.as_ref())?;
    report::write_report(&stats, result_file)?;

    if delete_generated {
        delete_generated_files(&additional_file, &logs);
    }

    Ok(stats)
}

/// Computes the schedule-only GvR scores for a plan without invoking the
/// simulator, optionally writing them in report style.
pub fn score_plan(
    instance_file: &Path,
    plan_file: &Path,
    result_file: Option<&Path>,
) -> Result<GvrScore> {
    let instance = Instance::load(instance_file)?;
    let plan = TimingPlan::load(plan_file, &instance).map_err(EvalError::Plan)?;
    let score = metrics::gvr_score(&instance, &plan);

    if let Some(path) = result_file {
        let mut out = fs::File::create(path)
            .map_err(|e| anyhow!("Failed to create result file {}: {}", path.display(), e))?;
        writeln!(out, "{} // Original Green vs Red", score.total)?;
        writeln!(out, "{} // Normalized GvR", score.normalized)?;
    }

    Ok(score)
}

/// Removes the files one evaluation generated. Missing files are fine: the
/// emissions log only exists when requested and a failed run may have
/// written nothing.
fn delete_generated_files(additional_file: &Path, logs: &LogPaths) {
    let mut generated = vec![
        additional_file,
        logs.summary.as_path(),
        logs.tripinfo.as_path(),
        logs.vehroutes.as_path(),
    ];
    if let Some(emissions) = &logs.emissions {
        generated.push(emissions.as_path());
    }
    for path in generated {
        let _ = fs::remove_file(path);
    }
}
