use serde::{Deserialize, Serialize};
use std::fmt;

/// The nominal generator weight and its six scale variations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WeightKind {
    Nominal,
    MuF0p5,
    MuR0p5,
    MuF0p5MuR0p5,
    MuF2,
    MuR2,
    MuF2MuR2,
}

impl WeightKind {
    pub const ALL: [WeightKind; 7] = [
        WeightKind::Nominal,
        WeightKind::MuF0p5,
        WeightKind::MuR0p5,
        WeightKind::MuF0p5MuR0p5,
        WeightKind::MuF2,
        WeightKind::MuR2,
        WeightKind::MuF2MuR2,
    ];

    /// Centre of the summary-histogram bin that carries this kind.
    ///
    /// Down variations sit left of the nominal bin, up variations right of it.
    pub const fn bin_center(self) -> f64 {
        match self {
            WeightKind::Nominal => 0.0,
            WeightKind::MuF0p5 => -1.0,
            WeightKind::MuR0p5 => -2.0,
            WeightKind::MuF0p5MuR0p5 => -3.0,
            WeightKind::MuF2 => 1.0,
            WeightKind::MuR2 => 2.0,
            WeightKind::MuF2MuR2 => 3.0,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            WeightKind::Nominal => "nominal",
            WeightKind::MuF0p5 => "muF0.5",
            WeightKind::MuR0p5 => "muR0.5",
            WeightKind::MuF0p5MuR0p5 => "muF0.5muR0.5",
            WeightKind::MuF2 => "muF2",
            WeightKind::MuR2 => "muR2",
            WeightKind::MuF2MuR2 => "muF2muR2",
        }
    }
}

impl fmt::Display for WeightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-event weights, only present for simulated samples that carry scale variations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EventWeights {
    pub nominal: f64,
    pub mu_f_0p5: f64,
    pub mu_r_0p5: f64,
    pub mu_f_0p5_mu_r_0p5: f64,
    pub mu_f_2: f64,
    pub mu_r_2: f64,
    pub mu_f_2_mu_r_2: f64,
}

impl EventWeights {
    /// All seven weights set to the same value.
    pub fn uniform(value: f64) -> Self {
        Self {
            nominal: value,
            mu_f_0p5: value,
            mu_r_0p5: value,
            mu_f_0p5_mu_r_0p5: value,
            mu_f_2: value,
            mu_r_2: value,
            mu_f_2_mu_r_2: value,
        }
    }

    pub fn get(&self, kind: WeightKind) -> f64 {
        match kind {
            WeightKind::Nominal => self.nominal,
            WeightKind::MuF0p5 => self.mu_f_0p5,
            WeightKind::MuR0p5 => self.mu_r_0p5,
            WeightKind::MuF0p5MuR0p5 => self.mu_f_0p5_mu_r_0p5,
            WeightKind::MuF2 => self.mu_f_2,
            WeightKind::MuR2 => self.mu_r_2,
            WeightKind::MuF2MuR2 => self.mu_f_2_mu_r_2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn bin_centers_are_distinct_and_span_minus_three_to_three() {
        let centers: HashSet<i64> = WeightKind::ALL
            .iter()
            .map(|k| k.bin_center() as i64)
            .collect();
        assert_eq!(centers, (-3..=3).collect());
    }

    #[test]
    fn get_maps_each_kind_to_its_field() {
        let weights = EventWeights {
            nominal: 1.0,
            mu_f_0p5: 2.0,
            mu_r_0p5: 3.0,
            mu_f_0p5_mu_r_0p5: 4.0,
            mu_f_2: 5.0,
            mu_r_2: 6.0,
            mu_f_2_mu_r_2: 7.0,
        };
        let values: Vec<f64> = WeightKind::ALL.iter().map(|k| weights.get(*k)).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    }
}
