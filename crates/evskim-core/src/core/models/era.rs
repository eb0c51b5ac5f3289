use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Data-taking period. Containers declare the era their branches were written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Era {
    #[serde(rename = "2016")]
    Run2016,
    #[serde(rename = "2017")]
    Run2017,
    #[serde(rename = "2018")]
    Run2018,
}

static ERA_TAGS: phf::Map<&'static str, Era> = phf::phf_map! {
    "2016" => Era::Run2016,
    "2017" => Era::Run2017,
    "2018" => Era::Run2018,
};

#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("Unknown era tag '{0}'. Expected one of: 2016, 2017, 2018.")]
pub struct UnknownEra(pub String);

impl Era {
    pub fn tag(self) -> &'static str {
        match self {
            Era::Run2016 => "2016",
            Era::Run2017 => "2017",
            Era::Run2018 => "2018",
        }
    }
}

impl FromStr for Era {
    type Err = UnknownEra;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ERA_TAGS
            .get(s.trim())
            .copied()
            .ok_or_else(|| UnknownEra(s.to_string()))
    }
}

impl fmt::Display for Era {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_tags() {
        assert_eq!("2016".parse::<Era>(), Ok(Era::Run2016));
        assert_eq!(" 2018 ".parse::<Era>(), Ok(Era::Run2018));
    }

    #[test]
    fn rejects_unknown_tag() {
        assert_eq!("2012".parse::<Era>(), Err(UnknownEra("2012".into())));
    }

    #[test]
    fn tag_and_parse_agree_for_every_era() {
        for era in [Era::Run2016, Era::Run2017, Era::Run2018] {
            assert_eq!(era.tag().parse::<Era>(), Ok(era));
        }
    }

    #[test]
    fn serializes_as_bare_year() {
        assert_eq!(serde_json::to_string(&Era::Run2017).unwrap(), "\"2017\"");
    }
}
