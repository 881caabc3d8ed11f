use crate::{
    error::EvalError,
    extract::{EmissionTotals, SummarySnapshot, TripTotals},
};
use tlp_structs::core::{Instance, SimulationStatistics, TimingPlan};
use tracing::warn;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GvrScore {
    pub total: f64,
    pub normalized: f64,
}

// GvR = sum_{i,j} duration(i,j) * greens(i,j) / reds(i,j)
// nGvR = (1/programs) * sum_i (sum_j GvR_phase(i,j) / sum_j duration(i,j))
// Larger values are better for both: they reward giving the long phases to
// the green-heavy states. nGvR bounds each program's contribution by its own
// duration-weighted green/red ratio, so programs with different phase counts
// compare fairly.
/// Schedule-only quality heuristic, computable without running the
/// simulator.
pub fn gvr_score(instance: &Instance, plan: &TimingPlan) -> GvrScore {
    let mut score = GvrScore::default();
    let mut ratio_sum = 0.0;
    let mut scored_programs = 0u32;

    for (tl, timing) in instance.tl_logics.iter().zip(&plan.programs) {
        let mut gvr = 0.0;
        let mut duration = 0.0;

        for (state, &d) in tl.phases.iter().zip(&timing.durations) {
            let green = state.chars().filter(|c| c.to_ascii_uppercase() == 'G').count() as f64;
            let mut red = state.chars().filter(|&c| c == 'r').count() as f64;
            // an all-green state still scores, count one red to keep the
            // ratio finite
            if red == 0.0 {
                red = 1.0;
            }
            gvr += (green / red) * d as f64;
            duration += d as f64;
        }

        score.total += gvr;
        // programs without phases (or with an all-zero schedule) have no
        // ratio to average; skipping them from both sum and count keeps the
        // normalization well defined
        if duration > 0.0 {
            ratio_sum += gvr / duration;
            scored_programs += 1;
        }
    }

    if scored_programs > 0 {
        score.normalized = ratio_sum / scored_programs as f64;
    }
    score
}

/// Objective value for the outer optimizer; lower is better. Long trips,
/// vehicles that never arrive (each charged the full simulation horizon) and
/// waiting time push the score up; arrivals (quadratically) and a
/// green-heavy schedule pull it down.
pub fn fitness(stats: &SimulationStatistics, simulation_time: u32) -> f64 {
    let penalty = stats.total_duration
        + stats.num_not_arrived as f64 * simulation_time as f64
        + stats.waiting_time;
    let reward = stats.num_arrived as f64 * stats.num_arrived as f64 + stats.gvr;
    if reward == 0.0 {
        warn!("no arrivals and zero GvR; reporting infinite fitness");
        return f64::INFINITY;
    }
    penalty / reward
}

/// Pure reducer combining the extractor outputs into the final statistics
/// record. `emissions` overrides the tripinfo absolutes when the dedicated
/// emissions log was produced. Fitness is derived last, after every other
/// field is in place.
pub fn assemble_statistics(
    instance: &Instance,
    gvr: GvrScore,
    trips: &TripTotals,
    summary: &SummarySnapshot,
    emissions: Option<&EmissionTotals>,
) -> Result<SimulationStatistics, EvalError> {
    // more arrivals than declared demand means the demand bookkeeping is
    // wrong; feeding the optimizer from a broken instance is worse than
    // aborting
    let num_not_arrived = instance.num_vehicles.checked_sub(trips.num_arrived).ok_or(
        EvalError::DataIntegrity {
            arrived: trips.num_arrived,
            demand: instance.num_vehicles,
        },
    )?;

    let emissions = emissions.unwrap_or(&trips.emissions);
    let mut stats = SimulationStatistics {
        gvr: gvr.total,
        normalized_gvr: gvr.normalized,
        total_duration: trips.total_duration,
        num_arrived: trips.num_arrived,
        num_not_arrived,
        stops: trips.stops,
        waiting_time: trips.waiting_time,
        fitness: 0.0,
        mean_travel_time: summary.mean_travel_time,
        mean_waiting_time: summary.mean_waiting_time,
        co2: emissions.co2,
        co: emissions.co,
        hc: emissions.hc,
        nox: emissions.nox,
        pmx: emissions.pmx,
        fuel: emissions.fuel,
        noise: emissions.noise,
    };
    stats.fitness = fitness(&stats, instance.simulation_time);

    Ok(stats)
}
