use anyhow::{anyhow, Result};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};
use tlp_structs::core::SimulationStatistics;

/// Writes the result file: one value per line, label after the value. The
/// field order and count are the interchange contract with the outer
/// optimizer; do not reorder.
pub fn write_report(stats: &SimulationStatistics, path: &Path) -> Result<()> {
    let file = File::create(path)
        .map_err(|e| anyhow!("Failed to create result file {}: {}", path.display(), e))?;
    let mut out = BufWriter::new(file);

    writeln!(out, "{} // Original Green vs Red", stats.gvr)?;
    writeln!(out, "{} // Normalized GvR", stats.normalized_gvr)?;
    writeln!(out, "{} // Total duration", stats.total_duration)?;
    writeln!(out, "{} // Vehicles arriving", stats.num_arrived)?;
    writeln!(out, "{} // Vehicles not arriving", stats.num_not_arrived)?;
    writeln!(out, "{} // Number of stops (waiting counts)", stats.stops)?;
    writeln!(out, "{} // Total waiting time (at a speed lower than 0.1 m/s)", stats.waiting_time)?;
    writeln!(out, "{} // Fitness", stats.fitness)?;
    writeln!(out, "{} // Mean Travel Time", stats.mean_travel_time)?;
    writeln!(out, "{} // Mean Waiting Time", stats.mean_waiting_time)?;
    writeln!(out, "{} // CO2", stats.co2)?;
    writeln!(out, "{} // CO", stats.co)?;
    writeln!(out, "{} // HC", stats.hc)?;
    writeln!(out, "{} // NOx", stats.nox)?;
    writeln!(out, "{} // PMx", stats.pmx)?;
    writeln!(out, "{} // fuel", stats.fuel)?;
    writeln!(out, "{} // noise", stats.noise)?;
    out.flush()?;

    Ok(())
}
