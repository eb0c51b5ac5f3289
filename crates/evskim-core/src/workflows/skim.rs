use crate::core::io::writer::ContainerSinkFactory;
use crate::engine::config::SkimConfig;
use crate::engine::driver::SkimDriver;
use crate::engine::naming::UnitNamer;
use crate::engine::progress::ProgressReporter;
use crate::engine::state::{InputGroup, SkimReport};
use tracing::{info, instrument, warn};

/// Skims every group into its own `.evs` container, named by `namer`.
///
/// Groups are processed in order. A group that fails is reported in its outcome and
/// does not stop the remaining groups; an existing output is left untouched.
#[instrument(skip_all, name = "skim_workflow")]
pub fn run<N: UnitNamer>(
    groups: &[InputGroup],
    config: &SkimConfig,
    namer: N,
    reporter: &ProgressReporter,
) -> SkimReport {
    info!(
        "Starting skim of {} group(s): simulated={}, extra_weights={}, era={:?}",
        groups.len(),
        config.simulated,
        config.extra_weights,
        config.era
    );

    let factory = ContainerSinkFactory::new(config.output_header(), config.output.basket_size);
    let mut driver = SkimDriver::new(config, factory, namer, reporter);
    let report = driver.run(groups);

    if report.failed_count() > 0 {
        warn!(
            "{} of {} group(s) failed.",
            report.failed_count(),
            report.outcomes.len()
        );
    }
    info!(
        "Skim finished: {} written, {} skipped, {} failed; {} of {} events kept.",
        report.completed().count(),
        report.skipped_count(),
        report.failed_count(),
        report.events_accepted(),
        report.events_read()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::format::ContainerHeader;
    use crate::core::io::reader::ContainerReader;
    use crate::core::io::traits::EventSink;
    use crate::core::io::writer::ContainerWriter;
    use crate::core::models::event::EventRecord;
    use crate::core::models::muon::{Muon, MuonCollection};
    use crate::engine::config::SkimConfigBuilder;
    use crate::engine::naming::SequentialNamer;
    use crate::engine::selection::Selection;
    use crate::engine::state::GroupOutcome;

    fn write_input(path: &std::path::Path, count: usize) {
        let mut writer =
            ContainerWriter::create(path, ContainerHeader::new(false, false, None), 64).unwrap();
        let muons = MuonCollection::from_candidates(&[
            Muon::new(30.0, 0.0, 0.0, 30.0, 0.1),
            Muon::new(8.0, 0.0, 0.0, 8.0, -0.4),
        ]);
        for i in 0..count {
            writer
                .append(&EventRecord::new(muons.clone()).with_field("run", i as u64))
                .unwrap();
        }
        writer.close().unwrap();
    }

    #[test]
    fn groups_map_to_numbered_outputs_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.evs");
        let b1 = dir.path().join("b1.evs");
        let b2 = dir.path().join("b2.evs");
        write_input(&a, 2);
        write_input(&b1, 3);
        write_input(&b2, 4);

        let config = SkimConfigBuilder::new()
            .selection(Selection::default())
            .basket_size(128)
            .build()
            .unwrap();
        let reporter = ProgressReporter::new();
        let report = run(
            &[
                InputGroup::new("a", vec![a]),
                InputGroup::new("b", vec![b1, b2]),
            ],
            &config,
            SequentialNamer::new(dir.path()),
            &reporter,
        );

        assert!(report.outcomes.iter().all(|o| matches!(o, GroupOutcome::Completed(_))));
        let first = ContainerReader::open(&dir.path().join("skimFile0.evs")).unwrap();
        let second = ContainerReader::open(&dir.path().join("skimFile1.evs")).unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 7);
        assert_eq!(second.header().compression, config.output.compression);
    }

    #[test]
    fn empty_group_list_produces_empty_report() {
        let config = SkimConfigBuilder::new()
            .selection(Selection::PassThrough)
            .build()
            .unwrap();
        let report = run(&[], &config, SequentialNamer::new("unused"), &ProgressReporter::new());
        assert!(report.outcomes.is_empty());
    }
}
