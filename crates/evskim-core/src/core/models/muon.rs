use crate::core::utils::kinematics::FourMomentum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A reconstructed muon candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Muon {
    pub momentum: FourMomentum,
    pub eta: f64,
}

impl Muon {
    pub fn new(px: f64, py: f64, pz: f64, energy: f64, eta: f64) -> Self {
        Self {
            momentum: FourMomentum::new(px, py, pz, energy),
            eta,
        }
    }

    #[inline]
    pub fn pt(&self) -> f64 {
        self.momentum.pt()
    }
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum MalformedCollection {
    #[error("declared muon count {0} is negative")]
    NegativeCount(i64),
    #[error("muon array '{array}' holds {len} entries but {count} were declared")]
    Truncated {
        array: &'static str,
        len: usize,
        count: usize,
    },
}

/// Muon candidates in ntuple layout: a declared count plus index-aligned arrays.
///
/// Entries past `count` are ignored. A negative count, or any array shorter than
/// `count`, makes the collection malformed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MuonCollection {
    pub count: i64,
    #[serde(default)]
    pub px: Vec<f64>,
    #[serde(default)]
    pub py: Vec<f64>,
    #[serde(default)]
    pub pz: Vec<f64>,
    #[serde(default)]
    pub energy: Vec<f64>,
    #[serde(default)]
    pub eta: Vec<f64>,
}

impl MuonCollection {
    pub fn from_candidates(candidates: &[Muon]) -> Self {
        Self {
            count: candidates.len() as i64,
            px: candidates.iter().map(|m| m.momentum.p.x).collect(),
            py: candidates.iter().map(|m| m.momentum.p.y).collect(),
            pz: candidates.iter().map(|m| m.momentum.p.z).collect(),
            energy: candidates.iter().map(|m| m.momentum.e).collect(),
            eta: candidates.iter().map(|m| m.eta).collect(),
        }
    }

    /// Assembles the candidates, validating the arrays against the declared count.
    pub fn candidates(&self) -> Result<Vec<Muon>, MalformedCollection> {
        let count = usize::try_from(self.count)
            .map_err(|_| MalformedCollection::NegativeCount(self.count))?;

        for (array, values) in [
            ("px", &self.px),
            ("py", &self.py),
            ("pz", &self.pz),
            ("energy", &self.energy),
            ("eta", &self.eta),
        ] {
            if values.len() < count {
                return Err(MalformedCollection::Truncated {
                    array,
                    len: values.len(),
                    count,
                });
            }
        }

        Ok((0..count)
            .map(|i| Muon::new(self.px[i], self.py[i], self.pz[i], self.energy[i], self.eta[i]))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_round_trip_through_collection() {
        let muons = vec![
            Muon::new(20.0, 0.0, 5.0, 21.0, 0.25),
            Muon::new(0.0, -8.0, 1.0, 8.1, -0.12),
        ];
        let collection = MuonCollection::from_candidates(&muons);
        assert_eq!(collection.count, 2);
        assert_eq!(collection.candidates().unwrap(), muons);
    }

    #[test]
    fn negative_count_is_malformed() {
        let collection = MuonCollection {
            count: -1,
            ..Default::default()
        };
        assert_eq!(
            collection.candidates(),
            Err(MalformedCollection::NegativeCount(-1))
        );
    }

    #[test]
    fn short_array_is_malformed() {
        let mut collection =
            MuonCollection::from_candidates(&[Muon::new(1.0, 1.0, 1.0, 2.0, 0.5); 3]);
        collection.eta.pop();
        assert_eq!(
            collection.candidates(),
            Err(MalformedCollection::Truncated {
                array: "eta",
                len: 2,
                count: 3
            })
        );
    }

    #[test]
    fn entries_beyond_declared_count_are_ignored() {
        let mut collection =
            MuonCollection::from_candidates(&[Muon::new(1.0, 1.0, 1.0, 2.0, 0.5); 3]);
        collection.count = 1;
        assert_eq!(collection.candidates().unwrap().len(), 1);
    }

    #[test]
    fn empty_collection_yields_no_candidates() {
        assert!(MuonCollection::default().candidates().unwrap().is_empty());
    }
}
