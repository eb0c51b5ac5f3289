use crate::core::histogram::Histogram;
use crate::core::models::event::EventRecord;
use crate::core::models::weights::{EventWeights, WeightKind};
use std::ops::Index;

pub const SUMMARY_HISTOGRAM_NAME: &str = "sumNumPosMinusNegWeights";
/// Bin content written when the sample carries no scale-variation weights.
pub const NOT_COMPUTED_SENTINEL: i64 = -666;

/// Number of events with a non-negative and with a negative weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignCounter {
    pub positive: u64,
    pub negative: u64,
}

impl SignCounter {
    /// Counts `weight`; anything that is not `>= 0` (including NaN) is negative.
    #[inline]
    pub fn record(&mut self, weight: f64) {
        if weight >= 0.0 {
            self.positive += 1;
        } else {
            self.negative += 1;
        }
    }

    pub fn net(&self) -> i64 {
        self.positive as i64 - self.negative as i64
    }
}

/// How the run treats generator weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TallyMode {
    /// Collision data: no summary is produced.
    Disabled,
    /// Simulation without scale variations: the summary holds the sentinel.
    Sentinel,
    /// Simulation with scale variations: weight signs are counted.
    Counting,
}

impl TallyMode {
    pub fn for_run(simulated: bool, extra_weights: bool) -> Self {
        match (simulated, extra_weights) {
            (false, _) => TallyMode::Disabled,
            (true, false) => TallyMode::Sentinel,
            (true, true) => TallyMode::Counting,
        }
    }
}

/// Signed event counts for every weight kind of one output unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightTally {
    mode: TallyMode,
    nominal: SignCounter,
    mu_f_0p5: SignCounter,
    mu_r_0p5: SignCounter,
    mu_f_0p5_mu_r_0p5: SignCounter,
    mu_f_2: SignCounter,
    mu_r_2: SignCounter,
    mu_f_2_mu_r_2: SignCounter,
}

impl WeightTally {
    pub fn new(mode: TallyMode) -> Self {
        Self {
            mode,
            nominal: SignCounter::default(),
            mu_f_0p5: SignCounter::default(),
            mu_r_0p5: SignCounter::default(),
            mu_f_0p5_mu_r_0p5: SignCounter::default(),
            mu_f_2: SignCounter::default(),
            mu_r_2: SignCounter::default(),
            mu_f_2_mu_r_2: SignCounter::default(),
        }
    }

    pub fn mode(&self) -> TallyMode {
        self.mode
    }

    fn counter_mut(&mut self, kind: WeightKind) -> &mut SignCounter {
        match kind {
            WeightKind::Nominal => &mut self.nominal,
            WeightKind::MuF0p5 => &mut self.mu_f_0p5,
            WeightKind::MuR0p5 => &mut self.mu_r_0p5,
            WeightKind::MuF0p5MuR0p5 => &mut self.mu_f_0p5_mu_r_0p5,
            WeightKind::MuF2 => &mut self.mu_f_2,
            WeightKind::MuR2 => &mut self.mu_r_2,
            WeightKind::MuF2MuR2 => &mut self.mu_f_2_mu_r_2,
        }
    }

    /// Counts the sign of every weight of `weights`.
    pub fn record(&mut self, weights: &EventWeights) {
        for kind in WeightKind::ALL {
            self.counter_mut(kind).record(weights.get(kind));
        }
    }

    /// Counts `record` when the run tallies weights and the record carries them.
    ///
    /// Returns whether the record was counted.
    pub fn record_if_applicable(&mut self, record: &EventRecord) -> bool {
        match (self.mode, record.weights.as_ref()) {
            (TallyMode::Counting, Some(weights)) => {
                self.record(weights);
                true
            }
            _ => false,
        }
    }

    /// Builds the summary histogram without consuming the tally.
    ///
    /// `None` for collision data; every bin holds [`NOT_COMPUTED_SENTINEL`] when the
    /// sample has no scale variations.
    pub fn finalize(&self) -> Option<Histogram> {
        let mut histogram = match self.mode {
            TallyMode::Disabled => return None,
            _ => Histogram::new(SUMMARY_HISTOGRAM_NAME, 7, -3.5, 3.5),
        };

        for kind in WeightKind::ALL {
            let value = match self.mode {
                TallyMode::Counting => self[kind].net(),
                _ => NOT_COMPUTED_SENTINEL,
            };
            histogram.fill(kind.bin_center(), value);
        }
        Some(histogram)
    }
}

impl Index<WeightKind> for WeightTally {
    type Output = SignCounter;

    fn index(&self, kind: WeightKind) -> &Self::Output {
        match kind {
            WeightKind::Nominal => &self.nominal,
            WeightKind::MuF0p5 => &self.mu_f_0p5,
            WeightKind::MuR0p5 => &self.mu_r_0p5,
            WeightKind::MuF0p5MuR0p5 => &self.mu_f_0p5_mu_r_0p5,
            WeightKind::MuF2 => &self.mu_f_2,
            WeightKind::MuR2 => &self.mu_r_2,
            WeightKind::MuF2MuR2 => &self.mu_f_2_mu_r_2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::muon::MuonCollection;

    fn weighted(weights: EventWeights) -> EventRecord {
        EventRecord::new(MuonCollection::default()).with_weights(weights)
    }

    #[test]
    fn mode_follows_run_flags() {
        assert_eq!(TallyMode::for_run(false, false), TallyMode::Disabled);
        assert_eq!(TallyMode::for_run(false, true), TallyMode::Disabled);
        assert_eq!(TallyMode::for_run(true, false), TallyMode::Sentinel);
        assert_eq!(TallyMode::for_run(true, true), TallyMode::Counting);
    }

    #[test]
    fn nominal_bin_holds_positive_minus_negative() {
        let mut tally = WeightTally::new(TallyMode::Counting);
        for _ in 0..7 {
            tally.record_if_applicable(&weighted(EventWeights::uniform(0.8)));
        }
        for _ in 0..3 {
            tally.record_if_applicable(&weighted(EventWeights::uniform(-0.8)));
        }
        assert_eq!(tally[WeightKind::Nominal], SignCounter { positive: 7, negative: 3 });

        let histogram = tally.finalize().unwrap();
        assert_eq!(histogram.name, SUMMARY_HISTOGRAM_NAME);
        assert_eq!(histogram.n_bins(), 7);
        assert_eq!(histogram.content_at(0.0), Some(4));
    }

    #[test]
    fn each_kind_lands_in_its_own_bin() {
        let mut tally = WeightTally::new(TallyMode::Counting);
        let weights = EventWeights {
            nominal: 1.0,
            mu_f_0p5: -1.0,
            mu_r_0p5: 1.0,
            mu_f_0p5_mu_r_0p5: -1.0,
            mu_f_2: 1.0,
            mu_r_2: -1.0,
            mu_f_2_mu_r_2: 0.0,
        };
        tally.record(&weights);
        tally.record(&weights);

        let histogram = tally.finalize().unwrap();
        let expected = [(0.0, 2), (-1.0, -2), (-2.0, 2), (-3.0, -2), (1.0, 2), (2.0, -2), (3.0, 2)];
        for (center, value) in expected {
            assert_eq!(histogram.content_at(center), Some(value), "bin at {}", center);
        }
    }

    #[test]
    fn zero_counts_as_positive_and_nan_as_negative() {
        let mut counter = SignCounter::default();
        counter.record(0.0);
        counter.record(-0.0);
        counter.record(f64::NAN);
        assert_eq!(counter, SignCounter { positive: 2, negative: 1 });
    }

    #[test]
    fn finalize_is_idempotent() {
        let mut tally = WeightTally::new(TallyMode::Counting);
        tally.record(&EventWeights::uniform(-2.0));
        assert_eq!(tally.finalize(), tally.finalize());
    }

    #[test]
    fn sentinel_mode_fills_every_bin_with_sentinel() {
        let mut tally = WeightTally::new(TallyMode::Sentinel);
        assert!(!tally.record_if_applicable(&weighted(EventWeights::uniform(1.0))));

        let histogram = tally.finalize().unwrap();
        assert_eq!(histogram.bin_content, vec![NOT_COMPUTED_SENTINEL; 7]);
    }

    #[test]
    fn disabled_mode_produces_no_histogram() {
        let mut tally = WeightTally::new(TallyMode::Disabled);
        assert!(!tally.record_if_applicable(&weighted(EventWeights::uniform(1.0))));
        assert!(tally.finalize().is_none());
    }

    #[test]
    fn records_without_weights_are_not_counted() {
        let mut tally = WeightTally::new(TallyMode::Counting);
        assert!(!tally.record_if_applicable(&EventRecord::default()));
        assert_eq!(tally[WeightKind::Nominal], SignCounter::default());
    }
}
