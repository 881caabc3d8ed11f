use anyhow::{anyhow, Result};
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tlp_structs::core::{Instance, TimingPlan};

/// Writes the additional-logic file the simulator loads the candidate
/// schedule from: one static tlLogic element per program carrying its offset,
/// one phase element per phase carrying its duration and the instance's state
/// string verbatim.
///
/// The output path is deterministic (run directory + instance name), so a
/// rerun overwrites the previous file and concurrent evaluations need
/// distinct run directories.
pub fn write_additional_file(
    instance: &Instance,
    plan: &TimingPlan,
    run_dir: &Path,
) -> Result<PathBuf> {
    let path = instance.additional_file(run_dir);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| anyhow!("Failed to create run directory {}: {}", parent.display(), e))?;
    }
    let file = File::create(&path)
        .map_err(|e| anyhow!("Failed to create additional file {}: {}", path.display(), e))?;
    let mut out = BufWriter::new(file);

    writeln!(out, "<additional>")?;
    for (tl, timing) in instance.tl_logics.iter().zip(&plan.programs) {
        writeln!(
            out,
            "\t<tlLogic id=\"{}\" type=\"static\" programID=\"1\" offset=\"{}\">",
            tl.id, timing.offset
        )?;
        for (state, duration) in tl.phases.iter().zip(&timing.durations) {
            writeln!(out, "\t\t<phase duration=\"{}\" state=\"{}\"/>", duration, state)?;
        }
        writeln!(out, "\t</tlLogic>")?;
    }
    writeln!(out, "</additional>")?;
    out.flush()?;

    Ok(path)
}
