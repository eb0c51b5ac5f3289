use crate::error::{CliError, Result};
use evskim::engine::state::{GroupOutcome, SkimReport};
use serde::Serialize;
use std::path::Path;

/// One CSV row per input group.
#[derive(Debug, Serialize, PartialEq)]
pub struct ReportRow {
    pub index: usize,
    pub output: String,
    pub status: &'static str,
    pub events_read: Option<u64>,
    pub events_accepted: Option<u64>,
    /// Positive minus negative nominal weights; empty for collision data.
    pub nominal_bin: Option<i64>,
    pub error: Option<String>,
}

impl ReportRow {
    pub fn from_outcome(index: usize, outcome: &GroupOutcome) -> Self {
        let mut row = Self {
            index,
            output: outcome.output().display().to_string(),
            status: "",
            events_read: None,
            events_accepted: None,
            nominal_bin: None,
            error: None,
        };
        match outcome {
            GroupOutcome::Skipped { .. } => row.status = "skipped",
            GroupOutcome::Completed(summary) => {
                row.status = "completed";
                row.events_read = Some(summary.events_read);
                row.events_accepted = Some(summary.events_accepted);
                row.nominal_bin = summary.histogram.as_ref().and_then(|h| h.content_at(0.0));
            }
            GroupOutcome::Failed { error, .. } => {
                row.status = "failed";
                row.error = Some(error.to_string());
            }
        }
        row
    }
}

pub fn write_report(path: &Path, report: &SkimReport) -> Result<()> {
    let to_cli = |e: csv::Error| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    };
    let mut writer = csv::Writer::from_path(path).map_err(to_cli)?;
    for (index, outcome) in report.outcomes.iter().enumerate() {
        writer
            .serialize(ReportRow::from_outcome(index, outcome))
            .map_err(to_cli)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use evskim::core::histogram::Histogram;
    use evskim::core::io::reader::SourceError;
    use evskim::engine::error::EngineError;
    use evskim::engine::state::UnitSummary;
    use std::path::PathBuf;

    fn sample_report() -> SkimReport {
        let mut histogram = Histogram::new("sumNumPosMinusNegWeights", 7, -3.5, 3.5);
        histogram.fill(0.0, 4);
        SkimReport {
            outcomes: vec![
                GroupOutcome::Completed(UnitSummary {
                    output: PathBuf::from("out/skimFile0.evs"),
                    events_read: 10,
                    events_accepted: 6,
                    histogram: Some(histogram),
                }),
                GroupOutcome::Skipped {
                    output: PathBuf::from("out/skimFile1.evs"),
                },
                GroupOutcome::Failed {
                    output: PathBuf::from("out/skimFile2.evs"),
                    error: EngineError::from(SourceError::Truncated {
                        path: PathBuf::from("in/broken.evs"),
                    }),
                },
            ],
        }
    }

    #[test]
    fn rows_reflect_outcomes() {
        let report = sample_report();
        let completed = ReportRow::from_outcome(0, &report.outcomes[0]);
        assert_eq!(completed.status, "completed");
        assert_eq!(completed.events_accepted, Some(6));
        assert_eq!(completed.nominal_bin, Some(4));

        let failed = ReportRow::from_outcome(2, &report.outcomes[2]);
        assert_eq!(failed.status, "failed");
        assert!(failed.error.unwrap().contains("in/broken.evs"));
    }

    #[test]
    fn writes_header_and_one_line_per_group() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        write_report(&path, &sample_report()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(
            lines[0],
            "index,output,status,events_read,events_accepted,nominal_bin,error"
        );
        assert_eq!(lines[1], "0,out/skimFile0.evs,completed,10,6,4,");
        assert_eq!(lines[2], "1,out/skimFile1.evs,skipped,,,,");
        assert_eq!(lines.len(), 4);
    }
}
