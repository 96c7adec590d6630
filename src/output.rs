//! Emission of the run results to the store, to disk and to the console
//!
//! The core guarantees exactly one set of derived values per input event, in
//! the order events were read; this module is the adapter that turns those
//! values into appended table columns or a histogram dump.

use crate::{
    error::AnalysisError,
    histogram::{Hist1d, Hist2d, RunHistograms},
    resacc::RunAccumulator,
    store::ColumnarTable,
};

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
    time::Duration,
};

/// Names of the fields appended to the event table, in column order
pub const APPENDED_FIELDS: [&str; 4] = ["sbs.hcal.x_exp", "sbs.hcal.y_exp", "dx", "dy"];

/// Append the derived columns to the table and rewrite the store
///
/// Only called once the whole pass has succeeded, so the store is either
/// fully updated or untouched.
pub fn append_derived_fields(
    table: &mut ColumnarTable,
    accumulator: &RunAccumulator,
    path: &Path,
) -> Result<(), AnalysisError> {
    let rows = &accumulator.rows;
    assert_eq!(
        rows.len(),
        table.num_events(),
        "write-back requires one derived row per event"
    );
    table.append_field(
        APPENDED_FIELDS[0],
        rows.iter().map(|row| row.expected_x).collect(),
    );
    table.append_field(
        APPENDED_FIELDS[1],
        rows.iter().map(|row| row.expected_y).collect(),
    );
    table.append_field(APPENDED_FIELDS[2], rows.iter().map(|row| row.dx).collect());
    table.append_field(APPENDED_FIELDS[3], rows.iter().map(|row| row.dy).collect());
    table.write_back(path)
}

/// Write the histogram set to a results file
pub fn dump_histograms(histograms: &RunHistograms, path: &Path) -> Result<(), AnalysisError> {
    let mut file = BufWriter::new(File::create(path)?);
    for hist in [
        &histograms.dx,
        &histograms.dx_cut,
        &histograms.momentum,
        &histograms.theta,
        &histograms.phi,
        &histograms.w2,
        &histograms.w2_cut,
        &histograms.q2,
        &histograms.q2_cut,
        &histograms.w2_tr,
        &histograms.w2_tr_cut,
        &histograms.q2_tr,
        &histograms.q2_tr_cut,
        &histograms.cointime,
        &histograms.cointime_cut,
    ] {
        write_hist1d(&mut file, hist)?;
    }
    for hist in [
        &histograms.dx_dy,
        &histograms.dx_dy_cut,
        &histograms.w2_dy,
        &histograms.momentum_theta,
    ] {
        write_hist2d(&mut file, hist)?;
    }
    file.flush()?;
    Ok(())
}

fn write_hist1d(file: &mut impl Write, hist: &Hist1d) -> io::Result<()> {
    writeln!(
        file,
        "# {} [{}, {}) bins={} underflow={} overflow={}",
        hist.name,
        hist.low,
        hist.high,
        hist.bins.len(),
        hist.underflow,
        hist.overflow
    )?;
    for (i, count) in hist.bins.iter().enumerate() {
        if i > 0 {
            write!(file, " ")?;
        }
        write!(file, "{count}")?;
    }
    writeln!(file)
}

fn write_hist2d(file: &mut impl Write, hist: &Hist2d) -> io::Result<()> {
    writeln!(
        file,
        "# {} x:[{}, {})x{} y:[{}, {})x{} outside={}",
        hist.name, hist.x_low, hist.x_high, hist.num_x, hist.y_low, hist.y_high, hist.num_y,
        hist.outside
    )?;
    for row in hist.bins.chunks(hist.num_x) {
        for (i, count) in row.iter().enumerate() {
            if i > 0 {
                write!(file, " ")?;
            }
            write!(file, "{count}")?;
        }
        writeln!(file)?;
    }
    Ok(())
}

/// Print the run summary to the console
pub fn print_summary(accumulator: &RunAccumulator, elapsed: Duration) {
    println!("Events processed    : {}", accumulator.processed);
    println!("Events selected     : {}", accumulator.selected);
    if accumulator.skips.total() > 0 {
        println!(
            "Events skipped      : {} (degenerate momentum: {}, parallel ray: {})",
            accumulator.skips.total(),
            accumulator.skips.degenerate_momentum,
            accumulator.skips.parallel_ray
        );
    }
    if let Some((mean_dx, mean_dy)) = accumulator.mean_residual() {
        println!("Mean dx         (m) : {mean_dx:.6}");
        println!("Mean dy         (m) : {mean_dy:.6}");
    }
    println!("Elapsed time    (s) : {:.3}", elapsed.as_secs_f64());
}
