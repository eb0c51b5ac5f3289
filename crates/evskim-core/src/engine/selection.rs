use crate::core::models::event::EventRecord;
use crate::core::models::muon::Muon;
use tracing::debug;

/// Thresholds of the low-mass dimuon selection. Momenta and masses in GeV.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimuonCuts {
    pub lead_pt_min: f64,
    pub sub_pt_min: f64,
    pub eta_max: f64,
    pub mass_max: f64,
}

impl Default for DimuonCuts {
    fn default() -> Self {
        Self {
            lead_pt_min: 15.0,
            sub_pt_min: 6.0,
            eta_max: 2.8,
            mass_max: 10.0,
        }
    }
}

impl DimuonCuts {
    /// Whether `a` and `b`, in this order, form an accepted pair.
    ///
    /// The candidate with the larger transverse momentum leads; on a tie `a` leads.
    pub fn accepts_pair(&self, a: &Muon, b: &Muon) -> bool {
        if a.eta.abs() > self.eta_max || b.eta.abs() > self.eta_max {
            return false;
        }

        let (lead, sub) = if b.pt() > a.pt() { (b, a) } else { (a, b) };
        if lead.pt() < self.lead_pt_min || sub.pt() < self.sub_pt_min {
            return false;
        }

        (lead.momentum + sub.momentum).mass() <= self.mass_max
    }

    pub fn accepts(&self, muons: &[Muon]) -> bool {
        find_pair(muons, |a, b| self.accepts_pair(a, b)).is_some()
    }
}

/// Returns the first unordered pair `(i, k)`, `i < k`, satisfying `predicate`.
///
/// Pairs are visited in lexicographic order of `(i, k)` and the search stops at the
/// first match.
pub fn find_pair<T, P>(items: &[T], mut predicate: P) -> Option<(usize, usize)>
where
    P: FnMut(&T, &T) -> bool,
{
    items.iter().enumerate().find_map(|(i, a)| {
        items[i + 1..]
            .iter()
            .position(|b| predicate(a, b))
            .map(|offset| (i, i + 1 + offset))
    })
}

/// Event selection applied during a skim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection {
    /// Keep every event.
    PassThrough,
    /// Keep events with at least one dimuon pair passing the cuts.
    Dimuon(DimuonCuts),
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Dimuon(DimuonCuts::default())
    }
}

impl Selection {
    pub fn accepts(&self, record: &EventRecord) -> bool {
        match self {
            Selection::PassThrough => true,
            Selection::Dimuon(cuts) => match record.muons.candidates() {
                Ok(muons) => cuts.accepts(&muons),
                Err(reason) => {
                    debug!("Rejecting event with malformed muon collection: {}", reason);
                    false
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::muon::MuonCollection;

    /// A muon with transverse momentum `pt` along `phi`, at pseudorapidity `eta`, massless.
    fn muon(pt: f64, phi: f64, eta: f64) -> Muon {
        let pz = pt * eta.sinh();
        let e = pt * eta.cosh();
        Muon::new(pt * phi.cos(), pt * phi.sin(), pz, e, eta)
    }

    /// Azimuthal separation that gives two massless muons at equal eta the mass `m`.
    fn phi_for_mass(pt1: f64, pt2: f64, m: f64) -> f64 {
        (1.0 - m * m / (2.0 * pt1 * pt2)).acos()
    }

    fn record_with(muons: &[Muon]) -> EventRecord {
        EventRecord::new(MuonCollection::from_candidates(muons))
    }

    #[test]
    fn fewer_than_two_muons_are_rejected() {
        let selection = Selection::default();
        assert!(!selection.accepts(&record_with(&[])));
        assert!(!selection.accepts(&record_with(&[muon(40.0, 0.0, 0.1)])));
    }

    #[test]
    fn low_mass_pair_is_accepted_and_high_mass_pair_is_rejected() {
        let selection = Selection::default();

        let phi = phi_for_mass(20.0, 10.0, 5.0);
        let pair = [muon(20.0, 0.0, 1.0), muon(10.0, phi, 1.0)];
        let mass = (pair[0].momentum + pair[1].momentum).mass();
        assert!((mass - 5.0).abs() < 1e-9);
        assert!(selection.accepts(&record_with(&pair)));

        let phi = phi_for_mass(20.0, 10.0, 15.0);
        let pair = [muon(20.0, 0.0, 1.0), muon(10.0, phi, 1.0)];
        assert!(!selection.accepts(&record_with(&pair)));
    }

    #[test]
    fn candidate_order_does_not_matter() {
        let cuts = DimuonCuts::default();
        let phi = phi_for_mass(20.0, 10.0, 5.0);
        let a = muon(10.0, phi, 1.0);
        let b = muon(20.0, 0.0, 1.0);
        assert!(cuts.accepts_pair(&a, &b));
        assert!(cuts.accepts_pair(&b, &a));
    }

    #[test]
    fn pt_thresholds_are_inclusive_and_asymmetric() {
        // Collinear massless muons along x: exact pt and zero pair mass.
        let along_x = |pt: f64| Muon::new(pt, 0.0, 0.0, pt, 0.0);
        let cuts = DimuonCuts::default();
        assert!(cuts.accepts_pair(&along_x(15.0), &along_x(6.0)));
        assert!(cuts.accepts_pair(&along_x(6.0), &along_x(15.0)));
        assert!(!cuts.accepts_pair(&along_x(14.9), &along_x(14.9)));
        assert!(!cuts.accepts_pair(&along_x(30.0), &along_x(5.9)));
    }

    #[test]
    fn eta_bound_is_inclusive() {
        let cuts = DimuonCuts::default();
        let phi = phi_for_mass(20.0, 10.0, 5.0);
        assert!(cuts.accepts_pair(&muon(20.0, 0.0, 2.8), &muon(10.0, phi, 2.8)));
        assert!(!cuts.accepts_pair(&muon(20.0, 0.0, 2.81), &muon(10.0, phi, 2.81)));
        assert!(!cuts.accepts_pair(&muon(20.0, 0.0, -2.9), &muon(10.0, phi, 0.0)));
    }

    #[test]
    fn equal_pt_pair_is_judged_consistently() {
        let cuts = DimuonCuts::default();
        let phi = phi_for_mass(16.0, 16.0, 4.0);
        let a = muon(16.0, 0.0, 0.5);
        let b = muon(16.0, phi, 0.5);
        assert!(cuts.accepts_pair(&a, &b));
        assert_eq!(cuts.accepts_pair(&a, &b), cuts.accepts_pair(&b, &a));
    }

    #[test]
    fn any_passing_pair_among_many_is_enough() {
        let selection = Selection::default();
        let phi = phi_for_mass(25.0, 8.0, 6.0);
        let muons = [
            muon(3.0, 0.0, 0.0),
            muon(25.0, 1.0, 0.2),
            muon(50.0, 0.0, 3.5),
            muon(8.0, 1.0 + phi, 0.2),
        ];
        assert!(selection.accepts(&record_with(&muons)));
    }

    #[test]
    fn pass_through_accepts_everything() {
        let selection = Selection::PassThrough;
        let malformed = EventRecord::new(MuonCollection {
            count: -3,
            ..Default::default()
        });
        assert!(selection.accepts(&record_with(&[])));
        assert!(selection.accepts(&malformed));
    }

    #[test]
    fn malformed_collection_is_rejected_in_dimuon_mode() {
        let selection = Selection::default();
        let phi = phi_for_mass(20.0, 10.0, 5.0);
        let mut muons = MuonCollection::from_candidates(&[muon(20.0, 0.0, 1.0), muon(10.0, phi, 1.0)]);
        muons.count = -2;
        assert!(!selection.accepts(&EventRecord::new(muons.clone())));

        muons.count = 2;
        muons.energy.truncate(1);
        assert!(!selection.accepts(&EventRecord::new(muons)));
    }

    #[test]
    fn find_pair_returns_first_match_in_lexicographic_order() {
        let values = [1, 5, 3, 7, 2];
        assert_eq!(find_pair(&values, |a, b| a + b == 8), Some((1, 2)));
        assert_eq!(find_pair(&values, |a, b| a + b == 100), None);
    }

    #[test]
    fn find_pair_stops_after_first_match() {
        let values = [1, 1, 1, 1];
        let mut calls = 0;
        let found = find_pair(&values, |_, _| {
            calls += 1;
            true
        });
        assert_eq!(found, Some((0, 1)));
        assert_eq!(calls, 1);
    }

    #[test]
    fn find_pair_never_pairs_an_item_with_itself() {
        assert_eq!(find_pair(&[42], |_, _| true), None);
    }
}
