use crate::error::EvalError;
use std::{
    path::{Path, PathBuf},
    process::{Command, Output, Stdio},
    thread,
    time::{Duration, Instant},
};
use tlp_structs::core::Instance;

/// Fixed seed so repeated evaluations of the same plan are comparable.
const SUMO_SEED: u32 = 23432;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// The log files a successful run leaves on disk. These, not the captured
/// stdout, are the source of truth for the extractors.
#[derive(Clone, Debug)]
pub struct LogPaths {
    pub tripinfo: PathBuf,
    pub summary: PathBuf,
    pub vehroutes: PathBuf,
    pub emissions: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct SumoOptions {
    /// Simulator executable, resolved through PATH when not a path.
    pub executable: String,
    /// Kill the simulator and fail the evaluation after this long. Off by
    /// default: a simulation horizon gives no usable bound on wall time.
    pub timeout: Option<Duration>,
    /// Also produce a dedicated emissions log and read per-vehicle emission
    /// totals (including noise) from it instead of the tripinfo absolutes.
    pub with_emissions: bool,
}

impl Default for SumoOptions {
    fn default() -> Self {
        SumoOptions {
            executable: "sumo".to_string(),
            timeout: None,
            with_emissions: false,
        }
    }
}

pub fn log_paths(instance: &Instance, run_dir: &Path, with_emissions: bool) -> LogPaths {
    LogPaths {
        tripinfo: instance.tripinfo_file(run_dir),
        summary: instance.summary_file(run_dir),
        vehroutes: instance.vehroutes_file(run_dir),
        emissions: with_emissions.then(|| instance.emissions_file(run_dir)),
    }
}

/// Assembles the full simulator command line: instance inputs, the generated
/// additional file, the three (or four) output logs, and the fixed run
/// parameters (begin 0, end at the instance horizon, teleporting and step
/// logging off, emission capture probability 1.0, fixed seed, no xml schema
/// validation).
pub fn build_command(
    instance: &Instance,
    run_dir: &Path,
    additional_file: &Path,
    options: &SumoOptions,
) -> (Command, LogPaths) {
    let logs = log_paths(instance, run_dir, options.with_emissions);

    let mut cmd = Command::new(&options.executable);
    cmd.arg("-W");
    cmd.arg("-n").arg(instance.network_file());
    cmd.arg("-r").arg(instance.routes_file());
    cmd.arg("-a").arg(additional_file);
    cmd.arg("--summary-output").arg(&logs.summary);
    cmd.arg("--vehroute-output").arg(&logs.vehroutes);
    cmd.arg("--tripinfo-output").arg(&logs.tripinfo);
    if let Some(emissions) = &logs.emissions {
        cmd.arg("--emission-output").arg(emissions);
    }
    cmd.arg("-b").arg("0");
    cmd.arg("-e").arg(instance.simulation_time.to_string());
    cmd.arg("-s").arg("0");
    cmd.arg("--time-to-teleport").arg("-1");
    cmd.arg("--no-step-log");
    cmd.arg("--device.emissions.probability").arg("1.0");
    cmd.arg("--seed").arg(SUMO_SEED.to_string());
    cmd.arg("--xml-validation").arg("never");

    (cmd, logs)
}

/// Runs the simulator synchronously and blocks until it exits. The exit
/// status is checked: a simulator that cannot be started, dies abnormally or
/// outlives the configured timeout is a typed error, never silently parsed
/// as an empty run.
pub fn run_simulator(
    instance: &Instance,
    run_dir: &Path,
    additional_file: &Path,
    options: &SumoOptions,
) -> Result<LogPaths, EvalError> {
    let (mut cmd, logs) = build_command(instance, run_dir, additional_file, options);
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|e| EvalError::SimulatorSpawn {
        command: options.executable.clone(),
        source: e,
    })?;

    let output = match options.timeout {
        None => child.wait_with_output().map_err(EvalError::SimulatorWait)?,
        Some(timeout) => wait_with_timeout(child, timeout)?,
    };

    if !output.status.success() {
        return Err(EvalError::SimulatorFailed {
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(logs)
}

fn wait_with_timeout(
    mut child: std::process::Child,
    timeout: Duration,
) -> Result<Output, EvalError> {
    let started = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(_)) => return child.wait_with_output().map_err(EvalError::SimulatorWait),
            Ok(None) => {
                if started.elapsed() >= timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(EvalError::SimulatorTimeout { timeout });
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(e) => return Err(EvalError::SimulatorWait(e)),
        }
    }
}
