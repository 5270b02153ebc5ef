use std::fmt;

// ---------------------------------------------------------------------------
// NaN masking
// ---------------------------------------------------------------------------

/// Keep only positions where both `x` and `y` are finite.
pub fn paired_finite(x: &[f64], y: &[f64]) -> (Vec<f64>, Vec<f64>) {
    x.iter()
        .zip(y)
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(a, b)| (*a, *b))
        .unzip()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Pearson's r over the pairwise-complete observations, or `None` when fewer
/// than two pairs remain or either side has zero variance.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let (x, y) = paired_finite(x, y);
    if x.len() < 2 || is_constant(&x) || is_constant(&y) {
        return None;
    }
    let (mx, my) = (mean(&x), mean(&y));
    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(&y) {
        let (dx, dy) = (a - mx, b - my);
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    let r = sxy / (sxx * syy).sqrt();
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

/// Correlation annotation for one pair of variables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Correlation {
    Value(f64),
    NotAvailable,
}

impl Correlation {
    pub fn between(x: &[f64], y: &[f64]) -> Self {
        pearson(x, y).map_or(Correlation::NotAvailable, Correlation::Value)
    }
}

impl fmt::Display for Correlation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Correlation::Value(r) => write!(f, "r = {r:.3}"),
            Correlation::NotAvailable => write!(f, "r = N/A"),
        }
    }
}

/// Square matrix of pairwise Pearson coefficients; NaN where undefined.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub names: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn compute(names: &[String], series: &[Vec<f64>]) -> Self {
        let values = series
            .iter()
            .map(|a| {
                series
                    .iter()
                    .map(|b| pearson(a, b).unwrap_or(f64::NAN))
                    .collect()
            })
            .collect();
        CorrelationMatrix {
            names: names.to_vec(),
            values,
        }
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row][col]
    }
}

// ---------------------------------------------------------------------------
// Ordinary least squares
// ---------------------------------------------------------------------------

/// Fitted line `y = slope * x + intercept` over the observed x-range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub x_min: f64,
    pub x_max: f64,
}

impl LinearFit {
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// The two points spanning the observed x-range.
    pub fn endpoints(&self) -> [(f64, f64); 2] {
        [
            (self.x_min, self.at(self.x_min)),
            (self.x_max, self.at(self.x_max)),
        ]
    }
}

/// Least-squares line through the pairwise-complete points; `None` when
/// fewer than two points remain or x has no spread.
pub fn linear_fit(x: &[f64], y: &[f64]) -> Option<LinearFit> {
    let (x, y) = paired_finite(x, y);
    if x.len() < 2 || is_constant(&x) {
        return None;
    }
    let (mx, my) = (mean(&x), mean(&y));
    let (mut sxx, mut sxy) = (0.0, 0.0);
    for (a, b) in x.iter().zip(&y) {
        sxx += (a - mx) * (a - mx);
        sxy += (a - mx) * (b - my);
    }
    let slope = sxy / sxx;
    let intercept = my - slope * mx;
    if !slope.is_finite() || !intercept.is_finite() {
        return None;
    }
    let x_min = x.iter().copied().fold(f64::INFINITY, f64::min);
    let x_max = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some(LinearFit {
        slope,
        intercept,
        x_min,
        x_max,
    })
}

// ---------------------------------------------------------------------------
// Distribution summaries
// ---------------------------------------------------------------------------

fn finite_sorted(values: &[f64]) -> Vec<f64> {
    let mut v: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    v.sort_by(f64::total_cmp);
    v
}

/// Linearly interpolated quantile of already sorted data.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Box-and-whisker summary with whiskers at 1.5 IQR.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_lo: f64,
    pub whisker_hi: f64,
    pub outliers: Vec<f64>,
}

pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
    let sorted = finite_sorted(values);
    if sorted.is_empty() {
        return None;
    }
    let q1 = quantile(&sorted, 0.25);
    let median = quantile(&sorted, 0.5);
    let q3 = quantile(&sorted, 0.75);
    let iqr = q3 - q1;
    let (lo_fence, hi_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

    let inside = || sorted.iter().copied().filter(|v| (lo_fence..=hi_fence).contains(v));
    let whisker_lo = inside().fold(q1, f64::min);
    let whisker_hi = inside().fold(q3, f64::max);
    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| !(lo_fence..=hi_fence).contains(v))
        .collect();

    Some(BoxSummary {
        q1,
        median,
        q3,
        whisker_lo,
        whisker_hi,
        outliers,
    })
}

/// Upper bound on histogram bins; Freedman–Diaconis counts above it fall
/// back to Sturges.
pub const MAX_BINS: usize = 100;

/// Shared histogram bin edges, so several groups can be layered.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBins {
    pub edges: Vec<f64>,
}

impl HistogramBins {
    /// Bins over the finite values, count = max(Sturges, Freedman–Diaconis).
    pub fn for_values(values: &[f64]) -> Option<Self> {
        let sorted = finite_sorted(values);
        let (&first, &last) = (sorted.first()?, sorted.last()?);
        let (lo, hi) = if first == last {
            (first - 0.5, last + 0.5)
        } else {
            (first, last)
        };

        let n = sorted.len() as f64;
        let sturges = n.log2().ceil() as usize + 1;
        let iqr = quantile(&sorted, 0.75) - quantile(&sorted, 0.25);
        let fd = if iqr > 0.0 {
            let width = 2.0 * iqr / n.cbrt();
            ((hi - lo) / width).ceil() as usize
        } else {
            0
        };
        let bins = if fd > MAX_BINS { sturges } else { sturges.max(fd) };
        let bins = bins.clamp(1, MAX_BINS);

        let step = (hi - lo) / bins as f64;
        let mut edges: Vec<f64> = (0..=bins).map(|i| lo + step * i as f64).collect();
        edges[bins] = hi;
        Some(HistogramBins { edges })
    }

    pub fn len(&self) -> usize {
        self.edges.len() - 1
    }

    /// Count finite values per bin; the last bin is closed on the right.
    pub fn count(&self, values: &[f64]) -> Vec<usize> {
        let bins = self.len();
        let (lo, hi) = (self.edges[0], self.edges[bins]);
        let step = (hi - lo) / bins as f64;
        let mut counts = vec![0; bins];
        for &v in values.iter().filter(|v| v.is_finite()) {
            if v < lo || v > hi {
                continue;
            }
            let idx = (((v - lo) / step) as usize).min(bins - 1);
            counts[idx] += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAN: f64 = f64::NAN;

    #[test]
    fn perfect_linear_relation_is_one() {
        let r = Correlation::between(&[1.0, 2.0, 3.0, 4.0], &[2.0, 4.0, 6.0, 8.0]);
        assert_eq!(r.to_string(), "r = 1.000");
    }

    #[test]
    fn inverse_relation_is_minus_one() {
        let r = pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_sequences_are_not_available() {
        let x = [0.1, 0.1, 0.1];
        assert_eq!(Correlation::between(&x, &x), Correlation::NotAvailable);
        assert_eq!(Correlation::NotAvailable.to_string(), "r = N/A");
    }

    #[test]
    fn fewer_than_two_pairs_after_masking_is_not_available() {
        let x = [1.0, NAN, 3.0];
        let y = [NAN, 2.0, 5.0];
        assert_eq!(Correlation::between(&x, &y), Correlation::NotAvailable);
        assert_eq!(Correlation::between(&[], &[]), Correlation::NotAvailable);
    }

    #[test]
    fn masking_drops_pairs_not_single_values() {
        let x = [1.0, 2.0, NAN, 3.0];
        let y = [1.0, 2.0, 100.0, 3.0];
        assert_eq!(pearson(&x, &y), Some(1.0));
    }

    #[test]
    fn matrix_diagonal_and_constant_columns() {
        let names = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let series = vec![
            vec![1.0, 2.0, 3.0],
            vec![2.0, 4.0, 6.0],
            vec![5.0, 5.0, 5.0],
        ];
        let m = CorrelationMatrix::compute(&names, &series);
        assert_eq!(m.get(0, 0), 1.0);
        assert!((m.get(0, 1) - 1.0).abs() < 1e-12);
        assert!(m.get(2, 2).is_nan());
        assert!(m.get(0, 2).is_nan());
    }

    #[test]
    fn least_squares_recovers_line() {
        let fit = linear_fit(&[0.0, 1.0, 2.0, NAN], &[1.0, 3.0, 5.0, 9.0]).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
        assert_eq!(fit.endpoints(), [(0.0, 1.0), (2.0, 5.0)]);
    }

    #[test]
    fn degenerate_fits_render_nothing() {
        assert!(linear_fit(&[1.0], &[2.0]).is_none());
        assert!(linear_fit(&[3.0, 3.0, 3.0], &[1.0, 2.0, 3.0]).is_none());
        assert!(linear_fit(&[1.0, NAN], &[NAN, 2.0]).is_none());
    }

    #[test]
    fn box_summary_flags_outliers() {
        let mut values: Vec<f64> = (1..=9).map(f64::from).collect();
        values.push(100.0);
        values.push(NAN);
        let b = box_summary(&values).unwrap();
        assert_eq!(b.median, 5.5);
        assert_eq!(b.q1, 3.25);
        assert_eq!(b.q3, 7.75);
        assert_eq!(b.whisker_lo, 1.0);
        assert_eq!(b.whisker_hi, 9.0);
        assert_eq!(b.outliers, vec![100.0]);
    }

    #[test]
    fn box_summary_of_nothing() {
        assert!(box_summary(&[NAN]).is_none());
    }

    #[test]
    fn histogram_counts_every_finite_value() {
        let values: Vec<f64> = (0..50).map(|i| (i % 7) as f64).chain([NAN]).collect();
        let bins = HistogramBins::for_values(&values).unwrap();
        assert!(bins.len() >= 7);
        assert_eq!(bins.count(&values).iter().sum::<usize>(), 50);
    }

    #[test]
    fn histogram_bins_stay_bounded_with_a_far_outlier() {
        let mut values: Vec<f64> = (0..100).map(|i| i as f64 / 100.0).collect();
        values.push(1.0e9);
        let bins = HistogramBins::for_values(&values).unwrap();
        assert!(bins.len() <= MAX_BINS);
        // Sturges for 101 values
        assert_eq!(bins.len(), 8);
        assert_eq!(bins.count(&values).iter().sum::<usize>(), 101);
    }

    #[test]
    fn histogram_of_constant_values_has_width() {
        let bins = HistogramBins::for_values(&[2.0, 2.0]).unwrap();
        assert_eq!(bins.edges.first(), Some(&1.5));
        assert_eq!(bins.edges.last(), Some(&2.5));
        assert_eq!(bins.count(&[2.0, 2.0]).iter().sum::<usize>(), 2);
    }
}
