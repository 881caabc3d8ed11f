use std::{fs, path::Path};
use tlp_utils::{attr_f64, parse_attributes};
use tracing::warn;

/// Totals accumulated from the per-vehicle trip records.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TripTotals {
    pub num_arrived: u32,
    pub total_duration: f64,
    pub stops: f64,
    pub waiting_time: f64,
    /// Absolute per-trip emissions, summed from the emission child records of
    /// the tripinfo log. Noise has no absolute form there and stays zero.
    pub emissions: EmissionTotals,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EmissionTotals {
    pub co2: f64,
    pub co: f64,
    pub hc: f64,
    pub nox: f64,
    pub pmx: f64,
    pub fuel: f64,
    pub noise: f64,
}

/// The final cumulative summary row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SummarySnapshot {
    pub mean_travel_time: f64,
    pub mean_waiting_time: f64,
}

/// A missing log file is a legitimate outcome (the simulator writes no trip
/// records when no vehicle was ever active), so every extractor degrades to
/// an all-zero result instead of failing the evaluation.
fn read_log(path: &Path, what: &str) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            warn!("cannot read {} log {}: {}; contributing zeros", what, path.display(), e);
            None
        }
    }
}

/// Scans the tripinfo log. Lines carrying a vehicle identifier are trip
/// records: count the arrival and accumulate duration, waiting count (times
/// the vehicle dropped below 0.1 m/s, planned stops excluded) and waiting
/// time. Lines carrying absolute CO values are the trip's emission record.
pub fn extract_tripinfo(path: &Path) -> TripTotals {
    let mut totals = TripTotals::default();
    let Some(content) = read_log(path, "tripinfo") else {
        return totals;
    };

    for line in content.lines() {
        if line.contains("id=") {
            let attrs = parse_attributes(line);
            totals.num_arrived += 1;
            totals.total_duration += attr_f64(&attrs, "duration");
            totals.stops += attr_f64(&attrs, "waitingCount");
            totals.waiting_time += attr_f64(&attrs, "waitingTime");
        } else if line.contains("CO_abs=") {
            let attrs = parse_attributes(line);
            totals.emissions.co2 += attr_f64(&attrs, "CO2_abs");
            totals.emissions.co += attr_f64(&attrs, "CO_abs");
            totals.emissions.hc += attr_f64(&attrs, "HC_abs");
            totals.emissions.nox += attr_f64(&attrs, "NOx_abs");
            totals.emissions.pmx += attr_f64(&attrs, "PMx_abs");
            totals.emissions.fuel += attr_f64(&attrs, "fuel_abs");
        }
    }

    totals
}

/// Scans the summary log and parses the mean travel and waiting times from
/// the last timestamped row. The rows are cumulative, only the final
/// snapshot matters.
pub fn extract_summary(path: &Path) -> SummarySnapshot {
    let mut snapshot = SummarySnapshot::default();
    let Some(content) = read_log(path, "summary") else {
        return snapshot;
    };

    match content.lines().filter(|line| line.contains("time=")).last() {
        Some(line) => {
            let attrs = parse_attributes(line);
            snapshot.mean_travel_time = attr_f64(&attrs, "meanTravelTime");
            snapshot.mean_waiting_time = attr_f64(&attrs, "meanWaitingTime");
        }
        None => warn!("summary log {} has no timestamped rows; contributing zeros", path.display()),
    }

    snapshot
}

/// Scans the dedicated emissions log, which records per-vehicle values under
/// the plain attribute names and, unlike the tripinfo records, includes
/// noise.
pub fn extract_emissions(path: &Path) -> EmissionTotals {
    let mut totals = EmissionTotals::default();
    let Some(content) = read_log(path, "emissions") else {
        return totals;
    };

    for line in content.lines() {
        if line.contains("id=") {
            let attrs = parse_attributes(line);
            totals.co2 += attr_f64(&attrs, "CO2");
            totals.co += attr_f64(&attrs, "CO");
            totals.hc += attr_f64(&attrs, "HC");
            totals.nox += attr_f64(&attrs, "NOx");
            totals.pmx += attr_f64(&attrs, "PMx");
            totals.fuel += attr_f64(&attrs, "fuel");
            totals.noise += attr_f64(&attrs, "noise");
        }
    }

    totals
}
