//! Fixed-binning histograms with associative merge
//!
//! Histograms are the aggregation flavor of the output sink: per-event
//! scalars increment bin counts instead of being written back to the store.
//! Merging adds counts bin by bin, so partial results from independent event
//! ranges combine in any order without changing the totals.

use crate::{numeric::Float, observables::DerivedObservables};

/// One-dimensional fixed-range histogram
#[derive(Debug, Clone)]
pub struct Hist1d {
    /// Histogram name, following the reference script naming
    pub name: &'static str,

    /// Lower edge of the first bin
    pub low: Float,

    /// Upper edge of the last bin (exclusive)
    pub high: Float,

    /// Per-bin counts
    pub bins: Vec<u64>,

    /// Entries below the range
    pub underflow: u64,

    /// Entries at or above the range
    pub overflow: u64,
}
//
impl Hist1d {
    /// Allocate an empty histogram over [low, high)
    pub fn new(name: &'static str, num_bins: usize, low: Float, high: Float) -> Self {
        assert!(num_bins > 0 && low < high);
        Hist1d {
            name,
            low,
            high,
            bins: vec![0; num_bins],
            underflow: 0,
            overflow: 0,
        }
    }

    /// Count one value
    ///
    /// Callers guarantee finite input: the pipeline surfaces degenerate
    /// events as errors before anything reaches a histogram.
    pub fn fill(&mut self, value: Float) {
        debug_assert!(value.is_finite());
        if value < self.low {
            self.underflow += 1;
        } else if value >= self.high {
            self.overflow += 1;
        } else {
            let width = (self.high - self.low) / self.bins.len() as Float;
            let bin = (((value - self.low) / width) as usize).min(self.bins.len() - 1);
            self.bins[bin] += 1;
        }
    }

    /// Add another histogram's counts into this one
    pub fn merge(&mut self, other: &Hist1d) {
        assert_eq!(self.bins.len(), other.bins.len());
        assert_eq!((self.low, self.high), (other.low, other.high));
        for (bin, &count) in self.bins.iter_mut().zip(other.bins.iter()) {
            *bin += count;
        }
        self.underflow += other.underflow;
        self.overflow += other.overflow;
    }

    /// Total number of entries, range and out-of-range alike
    pub fn entries(&self) -> u64 {
        self.bins.iter().sum::<u64>() + self.underflow + self.overflow
    }
}

/// Two-dimensional fixed-range histogram, row-major in y
#[derive(Debug, Clone)]
pub struct Hist2d {
    /// Histogram name, following the reference script naming
    pub name: &'static str,

    /// Bin count along x
    pub num_x: usize,

    /// Bin count along y
    pub num_y: usize,

    /// x range, lower edge
    pub x_low: Float,

    /// x range, upper edge (exclusive)
    pub x_high: Float,

    /// y range, lower edge
    pub y_low: Float,

    /// y range, upper edge (exclusive)
    pub y_high: Float,

    /// Per-bin counts, indexed `y * num_x + x`
    pub bins: Vec<u64>,

    /// Entries falling outside the range on either axis
    pub outside: u64,
}
//
impl Hist2d {
    /// Allocate an empty histogram over [x_low, x_high) × [y_low, y_high)
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &'static str,
        num_x: usize,
        x_low: Float,
        x_high: Float,
        num_y: usize,
        y_low: Float,
        y_high: Float,
    ) -> Self {
        assert!(num_x > 0 && num_y > 0 && x_low < x_high && y_low < y_high);
        Hist2d {
            name,
            num_x,
            num_y,
            x_low,
            x_high,
            y_low,
            y_high,
            bins: vec![0; num_x * num_y],
            outside: 0,
        }
    }

    /// Count one (x, y) pair
    pub fn fill(&mut self, x: Float, y: Float) {
        debug_assert!(x.is_finite() && y.is_finite());
        if x < self.x_low || x >= self.x_high || y < self.y_low || y >= self.y_high {
            self.outside += 1;
            return;
        }
        let x_width = (self.x_high - self.x_low) / self.num_x as Float;
        let y_width = (self.y_high - self.y_low) / self.num_y as Float;
        let x_bin = (((x - self.x_low) / x_width) as usize).min(self.num_x - 1);
        let y_bin = (((y - self.y_low) / y_width) as usize).min(self.num_y - 1);
        self.bins[y_bin * self.num_x + x_bin] += 1;
    }

    /// Add another histogram's counts into this one
    pub fn merge(&mut self, other: &Hist2d) {
        assert_eq!((self.num_x, self.num_y), (other.num_x, other.num_y));
        assert_eq!(
            (self.x_low, self.x_high, self.y_low, self.y_high),
            (other.x_low, other.x_high, other.y_low, other.y_high)
        );
        for (bin, &count) in self.bins.iter_mut().zip(other.bins.iter()) {
            *bin += count;
        }
        self.outside += other.outside;
    }

    /// Total number of entries, in range or not
    pub fn entries(&self) -> u64 {
        self.bins.iter().sum::<u64>() + self.outside
    }
}

/// The histogram set of one analysis pass
///
/// Names and binnings follow the reference analysis. Only pre-selected
/// events reach this set at all, and the `_cut` histograms additionally
/// require the full quasi-elastic selection. The unsuffixed W²/Q² spectra
/// use the calorimeter-sum scattered energy, the `_tr` ones the track
/// momentum magnitude.
#[derive(Debug, Clone)]
pub struct RunHistograms {
    /// Dispersive residual, all pre-selected events
    pub dx: Hist1d,

    /// Dispersive residual, selected events
    pub dx_cut: Hist1d,

    /// dx vs dy, all pre-selected events
    pub dx_dy: Hist2d,

    /// dx vs dy, selected events
    pub dx_dy_cut: Hist2d,

    /// W² (track hypothesis) vs dy
    pub w2_dy: Hist2d,

    /// Track momentum magnitude
    pub momentum: Hist1d,

    /// Polar scattering angle of the track
    pub theta: Hist1d,

    /// Azimuthal angle of the track
    pub phi: Hist1d,

    /// Track momentum magnitude vs polar angle
    pub momentum_theta: Hist2d,

    /// W², calorimeter-sum hypothesis
    pub w2: Hist1d,

    /// W², calorimeter-sum hypothesis, selected events
    pub w2_cut: Hist1d,

    /// Q², calorimeter-sum hypothesis
    pub q2: Hist1d,

    /// Q², calorimeter-sum hypothesis, selected events
    pub q2_cut: Hist1d,

    /// W², track hypothesis
    pub w2_tr: Hist1d,

    /// W², track hypothesis, selected events
    pub w2_tr_cut: Hist1d,

    /// Q², track hypothesis
    pub q2_tr: Hist1d,

    /// Q², track hypothesis, selected events
    pub q2_tr_cut: Hist1d,

    /// Coincidence time, all pre-selected events
    pub cointime: Hist1d,

    /// Coincidence time, selected events
    pub cointime_cut: Hist1d,
}
//
impl RunHistograms {
    /// Allocate the empty histogram set
    pub fn new() -> Self {
        RunHistograms {
            dx: Hist1d::new("h_dx", 100, -4.5, 2.0),
            dx_cut: Hist1d::new("h_dx_cut", 100, -4.5, 2.0),
            dx_dy: Hist2d::new("h_dx_dy", 100, -11.0, 2.0, 100, -4.5, 2.0),
            dx_dy_cut: Hist2d::new("h_dx_dy_cut", 100, -1.0, 1.0, 100, -4.5, 2.0),
            w2_dy: Hist2d::new("h_W2_dy", 100, -11.0, 2.0, 100, -2.0, 9.0),
            momentum: Hist1d::new("h_keprime_mag", 100, 0.5, 3.5),
            theta: Hist1d::new("h_etheta", 100, 0.4, 0.7),
            phi: Hist1d::new("h_ephi", 100, -0.6, 0.6),
            momentum_theta: Hist2d::new("h_mag_etheta", 100, 0.4, 0.7, 100, 0.5, 3.5),
            w2: Hist1d::new("h_W2", 100, -6.0, 13.0),
            w2_cut: Hist1d::new("h_W2_cut", 100, -6.0, 13.0),
            q2: Hist1d::new("h_Q2", 100, -6.0, 9.0),
            q2_cut: Hist1d::new("h_Q2_cut", 100, -6.0, 9.0),
            w2_tr: Hist1d::new("h_W2_tr", 100, -6.0, 13.0),
            w2_tr_cut: Hist1d::new("h_W2_tr_cut", 100, -6.0, 13.0),
            q2_tr: Hist1d::new("h_Q2_tr", 100, -6.0, 9.0),
            q2_tr_cut: Hist1d::new("h_Q2_tr_cut", 100, -6.0, 9.0),
            cointime: Hist1d::new("h_cointime", 500, -10.0, 220.0),
            cointime_cut: Hist1d::new("h_cointime_cut", 300, 50.0, 150.0),
        }
    }

    /// Bin one pre-selected event's observables
    pub fn fill(&mut self, obs: &DerivedObservables, selected: bool) {
        self.dx.fill(obs.dx);
        self.dx_dy.fill(obs.dy, obs.dx);
        self.w2_dy.fill(obs.dy, obs.w2);
        self.momentum.fill(obs.momentum_magnitude);
        self.theta.fill(obs.theta);
        self.phi.fill(obs.phi);
        self.momentum_theta.fill(obs.theta, obs.momentum_magnitude);
        self.w2.fill(obs.w2_cal);
        self.q2.fill(obs.q2_cal);
        self.w2_tr.fill(obs.w2);
        self.q2_tr.fill(obs.q2);
        self.cointime.fill(obs.cointime);
        if selected {
            self.dx_cut.fill(obs.dx);
            self.dx_dy_cut.fill(obs.dy, obs.dx);
            self.w2_cut.fill(obs.w2_cal);
            self.q2_cut.fill(obs.q2_cal);
            self.w2_tr_cut.fill(obs.w2);
            self.q2_tr_cut.fill(obs.q2);
            self.cointime_cut.fill(obs.cointime);
        }
    }

    /// Add another set's counts into this one
    pub fn merge(&mut self, other: &RunHistograms) {
        self.dx.merge(&other.dx);
        self.dx_cut.merge(&other.dx_cut);
        self.dx_dy.merge(&other.dx_dy);
        self.dx_dy_cut.merge(&other.dx_dy_cut);
        self.w2_dy.merge(&other.w2_dy);
        self.momentum.merge(&other.momentum);
        self.theta.merge(&other.theta);
        self.phi.merge(&other.phi);
        self.momentum_theta.merge(&other.momentum_theta);
        self.w2.merge(&other.w2);
        self.w2_cut.merge(&other.w2_cut);
        self.q2.merge(&other.q2);
        self.q2_cut.merge(&other.q2_cut);
        self.w2_tr.merge(&other.w2_tr);
        self.w2_tr_cut.merge(&other.w2_tr_cut);
        self.q2_tr.merge(&other.q2_tr);
        self.q2_tr_cut.merge(&other.q2_tr_cut);
        self.cointime.merge(&other.cointime);
        self.cointime_cut.merge(&other.cointime_cut);
    }
}

impl Default for RunHistograms {
    fn default() -> Self {
        Self::new()
    }
}
