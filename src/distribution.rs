//! Acid/base distribution of a weak acid as a function of pH.

/// Percentage of the acid form at `ph` for an acid of the given `pka`.
pub fn acid_percentage(ph: f64, pka: f64) -> f64 {
    100.0 / (1.0 + 10f64.powf(ph - pka))
}

/// Percentage of the conjugate base form; always `100 - acid`.
pub fn base_percentage(ph: f64, pka: f64) -> f64 {
    100.0 - acid_percentage(ph, pka)
}

/// Evenly spaced pH values from `min` to `max` inclusive.
///
/// Values are rounded to ten decimals so that repeated additions of `0.1`
/// do not leak floating point noise into labels and spreadsheet cells.
pub fn ph_grid(min: f64, max: f64, step: f64) -> Vec<f64> {
    if step.is_nan() || step <= 0.0 || max < min {
        return vec![min];
    }
    let count = ((max - min) / step + 1e-9).floor() as usize;
    (0..=count)
        .map(|i| round_to(min + i as f64 * step, 10))
        .collect()
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Display names of the two species.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Species {
    pub acid: String,
    pub base: String,
}

impl Species {
    pub fn new(acid: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            acid: acid.into(),
            base: base.into(),
        }
    }

    pub fn chart_title(&self) -> String {
        format!(
            "Distribution diagram of acid ({}) and base ({})",
            self.acid, self.base
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistributionPoint {
    pub ph: f64,
    pub acid: f64,
    pub base: f64,
}

/// Computed acid/base percentages over a pH grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    pub pka: f64,
    pub points: Vec<DistributionPoint>,
}

impl Distribution {
    pub fn compute(pka: f64, ph_values: &[f64]) -> Self {
        let points = ph_values
            .iter()
            .map(|&ph| {
                let acid = acid_percentage(ph, pka);
                DistributionPoint {
                    ph,
                    acid,
                    base: 100.0 - acid,
                }
            })
            .collect();
        Self { pka, points }
    }

    pub fn ph_values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.ph).collect()
    }

    pub fn acid_series(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.ph, p.acid)).collect()
    }

    pub fn base_series(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.ph, p.base)).collect()
    }

    /// Inclusive pH bounds covered by the grid.
    pub fn ph_bounds(&self) -> (f64, f64) {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (first.ph, last.ph),
            _ => (0.0, 14.0),
        }
    }
}
