use super::config::SkimConfig;
use super::error::EngineError;
use super::naming::UnitNamer;
use super::progress::{Progress, ProgressReporter};
use super::state::{DriverState, GroupOutcome, InputGroup, SkimReport, UnitSummary};
use super::tally::WeightTally;
use crate::core::io::source::EventSource;
use crate::core::io::traits::{EventSink, SinkFactory};
use crate::core::io::writer::SinkError;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, trace, warn};

/// Runs input groups through selection and weight tallying into output units.
///
/// Groups are processed strictly one after another. Each group consumes one path from
/// the namer, whether it is skimmed, skipped or fails.
pub struct SkimDriver<'a, F: SinkFactory, N: UnitNamer> {
    config: &'a SkimConfig,
    factory: F,
    namer: N,
    reporter: &'a ProgressReporter<'a>,
    state: DriverState,
}

impl<'a, F: SinkFactory, N: UnitNamer> SkimDriver<'a, F, N> {
    pub fn new(
        config: &'a SkimConfig,
        factory: F,
        namer: N,
        reporter: &'a ProgressReporter<'a>,
    ) -> Self {
        Self {
            config,
            factory,
            namer,
            reporter,
            state: DriverState::Idle,
        }
    }

    pub fn state(&self) -> &DriverState {
        &self.state
    }

    fn transition(&mut self, next: DriverState) {
        trace!("Driver state: {} -> {}", self.state, next);
        self.state = next;
    }

    pub fn run(&mut self, groups: &[InputGroup]) -> SkimReport {
        let mut report = SkimReport::default();
        for group in groups {
            report.outcomes.push(self.process_group(group));
        }
        report
    }

    /// Skims one group into the next output unit.
    pub fn process_group(&mut self, group: &InputGroup) -> GroupOutcome {
        let output = self.namer.next_path();
        self.transition(DriverState::Scanning {
            group: group.label.clone(),
            output: output.clone(),
        });

        let outcome = if self.factory.exists(&output) {
            self.skip(output)
        } else {
            match self.skim_group(group, &output) {
                Ok(Some(summary)) => GroupOutcome::Completed(summary),
                Ok(None) => self.skip(output),
                Err(error) => {
                    error!("Group '{}' failed: {}", group.label, error);
                    self.reporter
                        .report(Progress::Message(format!("✗ {}: {}", group.label, error)));
                    GroupOutcome::Failed { output, error }
                }
            }
        };

        self.transition(DriverState::Idle);
        outcome
    }

    fn skip(&mut self, output: PathBuf) -> GroupOutcome {
        info!("Output {:?} already exists, skipping group.", output);
        self.transition(DriverState::SkippedExisting {
            output: output.clone(),
        });
        GroupOutcome::Skipped { output }
    }

    /// `Ok(None)` when the output appeared between the existence check and the open.
    fn skim_group(
        &mut self,
        group: &InputGroup,
        output: &Path,
    ) -> Result<Option<UnitSummary>, EngineError> {
        let mut source = EventSource::open(group.files.as_slice(), self.config.schema_requirements())?;

        let mut sink = match self.factory.open(output) {
            Ok(sink) => sink,
            Err(SinkError::AlreadyExists { .. }) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        info!(
            "Skimming group '{}' ({} files, {} events) into {:?}",
            group.label,
            group.files.len(),
            source.len(),
            output
        );
        for file in source.files() {
            debug!("  input {:?}", file);
        }
        self.transition(DriverState::Processing {
            group: group.label.clone(),
            output: output.to_path_buf(),
        });
        self.reporter.report(Progress::PhaseStart {
            name: output.display().to_string(),
        });

        let mut tally = WeightTally::new(self.config.tally_mode());
        let accepted = match self.fill(&mut source, &mut sink, &mut tally) {
            Ok(accepted) => accepted,
            Err(e) => {
                Self::discard(sink);
                self.reporter.report(Progress::PhaseFinish);
                return Err(e);
            }
        };

        self.transition(DriverState::Finalizing {
            output: output.to_path_buf(),
        });
        let histogram = tally.finalize();
        if let Some(histogram) = &histogram {
            if let Err(e) = sink.write_summary(histogram) {
                Self::discard(sink);
                self.reporter.report(Progress::PhaseFinish);
                return Err(e.into());
            }
        }
        let closed = sink.close();
        self.reporter.report(Progress::PhaseFinish);
        closed?;

        info!(
            "Wrote {} of {} events to {:?}",
            accepted,
            source.len(),
            output
        );
        Ok(Some(UnitSummary {
            output: output.to_path_buf(),
            events_read: source.len(),
            events_accepted: accepted,
            histogram,
        }))
    }

    /// The per-event loop. Returns the number of accepted events.
    fn fill(
        &self,
        source: &mut EventSource,
        sink: &mut F::Sink,
        tally: &mut WeightTally,
    ) -> Result<u64, EngineError> {
        let total = source.len();
        self.reporter.report(Progress::TaskStart { total_steps: total });

        let mut accepted = 0u64;
        for index in 0..total {
            let record = source.get(index)?;
            tally.record_if_applicable(&record);
            if self.config.selection.accepts(&record) {
                sink.append(&record)?;
                accepted += 1;
            }
            self.reporter.report(Progress::TaskIncrement);
        }

        self.reporter.report(Progress::TaskFinish);
        debug!("Selection kept {}/{} events", accepted, total);
        Ok(accepted)
    }

    fn discard(sink: F::Sink) {
        if let Err(e) = sink.abandon() {
            warn!("Failed to discard partial output: {}", e);
        }
    }
}
