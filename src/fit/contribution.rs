//! Least-squares sufficient statistics for `T` regressed on `L`.

/// Running sums of one layer (or one window of layers).
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct LayerFitContribution {
    sum_l: f64,
    sum_t: f64,
    sum_ll: f64,
    sum_tt: f64,
    sum_lt: f64,
    n_points: usize,
}

/// Straight line `T = mean_t + gradient * (L - mean_l)` with its residual RMS.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LineFit {
    pub mean_l: f64,
    pub mean_t: f64,
    pub gradient: f64,
    pub rms: f64,
}

impl LineFit {
    #[inline]
    pub fn t_at(&self, l: f64) -> f64 {
        self.mean_t + self.gradient * (l - self.mean_l)
    }
}

impl LayerFitContribution {
    pub fn add_point(&mut self, l: f32, t: f32) {
        let l = f64::from(l);
        let t = f64::from(t);
        self.sum_l += l;
        self.sum_t += t;
        self.sum_ll += l * l;
        self.sum_tt += t * t;
        self.sum_lt += l * t;
        self.n_points += 1;
    }

    pub fn merge(&mut self, other: &LayerFitContribution) {
        self.sum_l += other.sum_l;
        self.sum_t += other.sum_t;
        self.sum_ll += other.sum_ll;
        self.sum_tt += other.sum_tt;
        self.sum_lt += other.sum_lt;
        self.n_points += other.n_points;
    }

    /// Solves the ordinary least-squares line. `None` when all contributing
    /// points share (within epsilon) one `L` value.
    pub fn solve(&self) -> Option<LineFit> {
        if self.n_points == 0 {
            return None;
        }
        let n = self.n_points as f64;
        let mean_l = self.sum_l / n;
        let mean_t = self.sum_t / n;
        let var_l = self.sum_ll / n - mean_l * mean_l;
        if var_l.abs() < f64::from(f32::EPSILON) {
            return None;
        }
        let var_t = self.sum_tt / n - mean_t * mean_t;
        let cov_lt = self.sum_lt / n - mean_l * mean_t;
        let gradient = cov_lt / var_l;
        let rms = (var_t - gradient * cov_lt).max(0.0).sqrt();
        Some(LineFit {
            mean_l,
            mean_t,
            gradient,
            rms,
        })
    }
}
