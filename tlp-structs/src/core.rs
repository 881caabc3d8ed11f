use crate::error::PlanError;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// One traffic-light program: an intersection's signal controller and its
/// ordered phase state strings (one character per controlled lane, SUMO
/// encoding: 'r' red, 'g'/'G' green, other letters for yellow etc).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TlLogic {
    pub id: String,
    pub phases: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Instance {
    pub name: String,
    pub simulation_time: u32,
    pub num_vehicles: u32,
    pub tl_logics: Vec<TlLogic>,
    /// Directory the instance file was loaded from; every SUMO file path is
    /// derived from it. Not part of the json document.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl Instance {
    pub fn load(path: &Path) -> Result<Instance> {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read instance file {}: {}", path.display(), e))?;
        let mut instance: Instance = serde_json::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse instance file {}: {}", path.display(), e))?;
        instance.base_dir = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
        Ok(instance)
    }

    /// Number of plan values an evaluation consumes: one offset plus one
    /// duration per phase, for each program in instance order.
    pub fn required_plan_values(&self) -> usize {
        self.tl_logics.iter().map(|tl| 1 + tl.phases.len()).sum()
    }

    pub fn network_file(&self) -> PathBuf {
        self.base_dir.join(format!("{}.net.xml", self.name))
    }

    pub fn routes_file(&self) -> PathBuf {
        self.base_dir.join(format!("{}.rou.xml", self.name))
    }

    /// Run directories are resolved against the instance directory; an
    /// absolute path is used as given. Callers running evaluations
    /// concurrently must pass distinct directories, the generated file names
    /// inside are deterministic and reruns overwrite.
    pub fn run_dir(&self, dir: &Path) -> PathBuf {
        self.base_dir.join(dir)
    }

    fn generated_file(&self, dir: &Path, suffix: &str) -> PathBuf {
        self.run_dir(dir).join(format!("{}{}", self.name, suffix))
    }

    pub fn additional_file(&self, dir: &Path) -> PathBuf {
        self.generated_file(dir, ".add.xml")
    }

    pub fn tripinfo_file(&self, dir: &Path) -> PathBuf {
        self.generated_file(dir, "-tripinfo.xml")
    }

    pub fn summary_file(&self, dir: &Path) -> PathBuf {
        self.generated_file(dir, "-summary.xml")
    }

    pub fn vehroutes_file(&self, dir: &Path) -> PathBuf {
        self.generated_file(dir, "-vehicles.xml")
    }

    pub fn emissions_file(&self, dir: &Path) -> PathBuf {
        self.generated_file(dir, "-emissions.xml")
    }
}

/// Timing of a single program: its offset and one duration per phase, in
/// phase order.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ProgramTiming {
    pub offset: u32,
    pub durations: Vec<u32>,
}

/// A candidate signal schedule, one [`ProgramTiming`] per program in
/// instance order.
///
/// The wire format produced by the plan generator is a flat sequence of
/// non-negative integers packed as `offset_0, d_0_0 .. d_0_n, offset_1, ...`.
/// [`TimingPlan::from_values`] is the single place that order is interpreted;
/// it validates the length against the instance before any simulator cost is
/// paid, so a producer/consumer mismatch fails fast instead of shifting every
/// later value by one.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TimingPlan {
    pub programs: Vec<ProgramTiming>,
}

impl TimingPlan {
    /// Reads a plan file: whitespace-separated unsigned integers, arbitrary
    /// line breaks, consumed to end of file.
    pub fn load(path: &Path, instance: &Instance) -> Result<TimingPlan, PlanError> {
        let content = fs::read_to_string(path).map_err(|e| PlanError::Load {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut values = Vec::new();
        for token in content.split_whitespace() {
            let value = token.parse::<u32>().map_err(|_| PlanError::Parse {
                path: path.to_path_buf(),
                token: token.to_string(),
            })?;
            values.push(value);
        }
        Self::from_values(instance, &values)
    }

    pub fn from_values(instance: &Instance, values: &[u32]) -> Result<TimingPlan, PlanError> {
        let expected = instance.required_plan_values();
        if values.len() != expected {
            return Err(PlanError::Length {
                expected,
                actual: values.len(),
            });
        }
        let mut cursor = values.iter().copied();
        let mut programs = Vec::with_capacity(instance.tl_logics.len());
        for tl in &instance.tl_logics {
            let offset = cursor.next().expect("plan length validated above");
            let durations = tl
                .phases
                .iter()
                .map(|_| cursor.next().expect("plan length validated above"))
                .collect();
            programs.push(ProgramTiming { offset, durations });
        }
        Ok(TimingPlan { programs })
    }
}

/// Everything one evaluation reports back to the optimizer. Assembled by
/// the evaluator's reducer from the extractor outputs, written as the
/// fixed-order result file.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct SimulationStatistics {
    pub gvr: f64,
    pub normalized_gvr: f64,
    pub total_duration: f64,
    pub num_arrived: u32,
    pub num_not_arrived: u32,
    pub stops: f64,
    pub waiting_time: f64,
    pub fitness: f64,
    pub mean_travel_time: f64,
    pub mean_waiting_time: f64,
    pub co2: f64,
    pub co: f64,
    pub hc: f64,
    pub nox: f64,
    pub pmx: f64,
    pub fuel: f64,
    pub noise: f64,
}
