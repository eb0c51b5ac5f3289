use crate::cli::InspectArgs;
use crate::error::{CliError, Result};
use evskim::core::io::reader::ContainerReader;
use evskim::core::models::weights::WeightKind;
use evskim::engine::error::EngineError;
use std::io::{self, Write};
use tracing::info;

pub fn run(args: InspectArgs) -> Result<()> {
    info!("Opening container {:?}", &args.file);
    let mut reader = ContainerReader::open(&args.file).map_err(EngineError::from)?;
    let stdout = io::stdout();
    describe(&mut reader, args.head, &mut stdout.lock())
}

/// Writes a human-readable description of the container, followed by up to `head`
/// records as JSON lines.
pub fn describe(reader: &mut ContainerReader, head: u64, out: &mut impl Write) -> Result<()> {
    let header = reader.header().clone();
    writeln!(out, "File:        {}", reader.path().display())?;
    writeln!(out, "Format:      v{}", header.format_version)?;
    writeln!(
        out,
        "Sample:      {}{}",
        if header.simulated { "simulation" } else { "collision data" },
        if header.extra_weights {
            " with scale-variation weights"
        } else {
            ""
        }
    )?;
    match header.era {
        Some(era) => writeln!(out, "Era:         {}", era)?,
        None => writeln!(out, "Era:         unspecified")?,
    }
    writeln!(out, "Compression: {}", header.compression)?;
    writeln!(out, "Entries:     {}", reader.len())?;
    writeln!(out, "Baskets:     {}", reader.footer().baskets.len())?;

    match reader.summary() {
        Some(histogram) => {
            writeln!(out, "Summary:     {}", histogram.name)?;
            for kind in WeightKind::ALL {
                let value = histogram.content_at(kind.bin_center()).unwrap_or_default();
                writeln!(out, "  {:>+3.0} {:<18} {}", kind.bin_center(), kind.name(), value)?;
            }
        }
        None => writeln!(out, "Summary:     none")?,
    }

    for index in 0..head.min(reader.len()) {
        let record = reader.read_entry(index).map_err(EngineError::from)?;
        let line = serde_json::to_string(&record).map_err(|e| CliError::FileParsing {
            path: reader.path().to_path_buf(),
            source: e.into(),
        })?;
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use evskim::core::histogram::Histogram;
    use evskim::core::io::format::ContainerHeader;
    use evskim::core::io::traits::EventSink;
    use evskim::core::io::writer::ContainerWriter;
    use evskim::core::models::era::Era;
    use evskim::core::models::event::EventRecord;

    #[test]
    fn describes_header_counts_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skimFile0.evs");
        let header = ContainerHeader::new(true, true, Some(Era::Run2017));
        let mut writer = ContainerWriter::create(&path, header, 1024).unwrap();
        for run in 0..3u64 {
            writer
                .append(&EventRecord::default().with_field("run", run))
                .unwrap();
        }
        let mut histogram = Histogram::new("sumNumPosMinusNegWeights", 7, -3.5, 3.5);
        histogram.fill(0.0, 4);
        writer.write_summary(&histogram).unwrap();
        writer.close().unwrap();

        let mut reader = ContainerReader::open(&path).unwrap();
        let mut out = Vec::new();
        describe(&mut reader, 2, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Sample:      simulation with scale-variation weights"));
        assert!(text.contains("Era:         2017"));
        assert!(text.contains("Compression: lz4:4"));
        assert!(text.contains("Entries:     3"));
        assert!(text.contains("Summary:     sumNumPosMinusNegWeights"));
        assert_eq!(text.lines().filter(|l| l.starts_with('{')).count(), 2);
        assert!(text.contains("\"run\":1"));
    }
}
