//! Command-line entry point of the dx/dy analysis
//!
//! Takes the three enumerated run names (kinematics setting, target
//! material, reconstruction pass), validates them, and runs one full pass
//! over the matching event table. By default the derived fields are written
//! back to the store; `--histograms` switches to histogram accumulation.

use anyhow::{bail, Context};

use qe_dxdy::{output, pipeline};

use std::{env, path::Path, time::Instant};

/// We'll use anyhow's type-erased result type at the application level
type Result<T> = anyhow::Result<T>;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let (kinematics, target, pass, mode) = match args.as_slice() {
        [kinematics, target, pass] => {
            (kinematics, target, pass, pipeline::OutputMode::AppendToStore)
        }
        [kinematics, target, pass, flag] if flag == "--histograms" => {
            (kinematics, target, pass, pipeline::OutputMode::Histograms)
        }
        _ => bail!("usage: qe-dxdy <kin2|kin3|kin4a|kin4b> <He3|H> <pass1|pass2> [--histograms]"),
    };

    // NOTE: The clock starts after argument handling, to keep I/O-induced
    //       fluctuations out of the per-event timing
    let saved_time = Instant::now();

    let accumulator = pipeline::run(kinematics, target, pass, mode, Path::new("."))
        .context("Analysis pass failed")?;

    output::print_summary(&accumulator, saved_time.elapsed());
    Ok(())
}
