use crate::core::io::format::FILE_EXTENSION;
use std::path::PathBuf;

/// Hands out one output path per input group, in group order.
pub trait UnitNamer {
    fn next_path(&mut self) -> PathBuf;
}

/// `<dir>/<stem><n>.evs`, with `n` counting up from a starting number.
#[derive(Debug, Clone)]
pub struct SequentialNamer {
    dir: PathBuf,
    stem: String,
    next: u64,
}

impl SequentialNamer {
    pub const DEFAULT_STEM: &'static str = "skimFile";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            stem: Self::DEFAULT_STEM.to_string(),
            next: 0,
        }
    }

    pub fn with_stem(mut self, stem: impl Into<String>) -> Self {
        self.stem = stem.into();
        self
    }

    pub fn starting_at(mut self, first: u64) -> Self {
        self.next = first;
        self
    }

    pub fn path_for(&self, number: u64) -> PathBuf {
        self.dir
            .join(format!("{}{}.{}", self.stem, number, FILE_EXTENSION))
    }
}

impl UnitNamer for SequentialNamer {
    fn next_path(&mut self) -> PathBuf {
        let path = self.path_for(self.next);
        self.next += 1;
        path
    }
}

impl<F: FnMut() -> PathBuf> UnitNamer for F {
    fn next_path(&mut self) -> PathBuf {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn numbers_paths_consecutively_from_zero() {
        let mut namer = SequentialNamer::new("/data/skims/dimuon");
        assert_eq!(
            namer.next_path(),
            PathBuf::from("/data/skims/dimuon/skimFile0.evs")
        );
        assert_eq!(
            namer.next_path(),
            PathBuf::from("/data/skims/dimuon/skimFile1.evs")
        );
    }

    #[test]
    fn stem_and_start_are_configurable() {
        let mut namer = SequentialNamer::new("out").with_stem("part").starting_at(7);
        assert_eq!(namer.next_path(), Path::new("out").join("part7.evs"));
    }

    #[test]
    fn closures_act_as_namers() {
        let mut n = 0;
        let mut namer = || {
            n += 10;
            PathBuf::from(format!("unit{}", n))
        };
        assert_eq!(UnitNamer::next_path(&mut namer), PathBuf::from("unit10"));
        assert_eq!(UnitNamer::next_path(&mut namer), PathBuf::from("unit20"));
    }
}
