use super::muon::MuonCollection;
use super::weights::EventWeights;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One collision event as stored in an event container.
///
/// Only the muon candidates and the generator weights are interpreted; every other
/// field of the stored record is kept in `extra`, in its original order, and written
/// back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(default)]
    pub muons: MuonCollection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<EventWeights>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EventRecord {
    pub fn new(muons: MuonCollection) -> Self {
        Self {
            muons,
            ..Default::default()
        }
    }

    pub fn with_weights(mut self, weights: EventWeights) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}
