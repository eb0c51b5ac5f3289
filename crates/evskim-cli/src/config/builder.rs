use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::SkimArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use evskim::core::io::compression::CompressionSettings;
use evskim::core::models::era::Era;
use evskim::engine::config::SkimConfigBuilder;
use evskim::engine::selection::{DimuonCuts, Selection};

pub fn build_config(args: &SkimArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let selection = if args.disable_cuts {
        Selection::PassThrough
    } else {
        let file = file_config.selection.take().unwrap_or_default();
        Selection::Dimuon(DimuonCuts {
            lead_pt_min: file.lead_pt_min.unwrap_or(defaults.cuts.lead_pt_min),
            sub_pt_min: file.sub_pt_min.unwrap_or(defaults.cuts.sub_pt_min),
            eta_max: file.eta_max.unwrap_or(defaults.cuts.eta_max),
            mass_max: file.mass_max.unwrap_or(defaults.cuts.mass_max),
        })
    };

    let output_file = file_config.output.take().unwrap_or_default();
    let compression = match output_file.compression.as_deref() {
        Some(setting) => parse_compression(setting)?,
        None => defaults.compression,
    };
    let basket_size = output_file.basket_size.unwrap_or(defaults.basket_size);

    let extension = file_config
        .input
        .take()
        .and_then(|input| input.extension)
        .unwrap_or(defaults.extension);
    let extension = extension.trim_start_matches('.').to_string();
    if extension.is_empty() {
        return Err(CliError::Config(
            "`input.extension` cannot be empty.".to_string(),
        ));
    }

    let era = args
        .era
        .as_deref()
        .map(|tag| tag.parse::<Era>())
        .transpose()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let core_config = SkimConfigBuilder::new()
        .simulated(args.mc)
        .extra_weights(args.lhe)
        .era(era)
        .selection(selection)
        .compression(compression)
        .basket_size(basket_size)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        input_dirs: args.input_dirs.clone(),
        output_dir: args.output_name.clone(),
        extension,
        report_path: args.report.clone(),
        core_config,
    })
}

fn parse_compression(setting: &str) -> Result<CompressionSettings> {
    setting.parse()
        .map_err(|e| CliError::Config(format!("`output.compression`: {}", e)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let (key, value) =
            parser::parse_key_value(kv_pair).map_err(|e| CliError::Argument(e.to_string()))?;
        let float = |v: &str| {
            parser::parse_number::<f64>(key, v, "float")
                .map_err(|e| CliError::Config(e.to_string()))
        };

        match key {
            "selection.lead-pt-min" => {
                config
                    .selection
                    .get_or_insert_with(Default::default)
                    .lead_pt_min = Some(float(value)?);
            }
            "selection.sub-pt-min" => {
                config
                    .selection
                    .get_or_insert_with(Default::default)
                    .sub_pt_min = Some(float(value)?);
            }
            "selection.eta-max" => {
                config.selection.get_or_insert_with(Default::default).eta_max = Some(float(value)?);
            }
            "selection.mass-max" => {
                config
                    .selection
                    .get_or_insert_with(Default::default)
                    .mass_max = Some(float(value)?);
            }
            "output.compression" => {
                config
                    .output
                    .get_or_insert_with(Default::default)
                    .compression = Some(value.to_string());
            }
            "output.basket-size" => {
                config
                    .output
                    .get_or_insert_with(Default::default)
                    .basket_size = Some(
                    parser::parse_number(key, value, "integer")
                        .map_err(|e| CliError::Config(e.to_string()))?,
                );
            }
            "input.extension" => {
                config.input.get_or_insert_with(Default::default).extension =
                    Some(value.to_string());
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use evskim::core::io::compression::Algorithm;
    use evskim::engine::tally::TallyMode;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn base_skim_args() -> SkimArgs {
        SkimArgs {
            input_dirs: vec![PathBuf::from("in/a"), PathBuf::from("in/b")],
            output_name: PathBuf::from("out"),
            config: None,
            report: None,
            mc: false,
            lhe: false,
            disable_cuts: false,
            era: None,
            set_values: vec![],
        }
    }

    fn cuts_of(selection: &Selection) -> DimuonCuts {
        match selection {
            Selection::Dimuon(cuts) => *cuts,
            Selection::PassThrough => panic!("expected dimuon selection"),
        }
    }

    #[test]
    fn defaults_apply_without_file() {
        let app = build_config(&base_skim_args()).expect("build ok");

        assert_eq!(app.input_dirs.len(), 2);
        assert_eq!(app.output_dir, PathBuf::from("out"));
        assert_eq!(app.extension, "evs");
        assert_eq!(cuts_of(&app.core_config.selection), DimuonCuts::default());
        assert_eq!(
            app.core_config.output.compression,
            CompressionSettings::default()
        );
        assert_eq!(app.core_config.tally_mode(), TallyMode::Disabled);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("skim.toml");
        fs::write(
            &cfg_path,
            r#"
            [selection]
            lead-pt-min = 25.0
            eta-max = 2.4

            [output]
            compression = "zlib:6"
            basket-size = 1024

            [input]
            extension = ".dat"
            "#,
        )
        .unwrap();

        let mut args = base_skim_args();
        args.config = Some(cfg_path);
        let app = build_config(&args).expect("build ok");

        let cuts = cuts_of(&app.core_config.selection);
        assert_eq!(cuts.lead_pt_min, 25.0);
        assert_eq!(cuts.eta_max, 2.4);
        assert_eq!(cuts.sub_pt_min, DimuonCuts::default().sub_pt_min);
        assert_eq!(app.core_config.output.compression.algorithm, Algorithm::Zlib);
        assert_eq!(app.core_config.output.compression.level, 6);
        assert_eq!(app.core_config.output.basket_size, 1024);
        assert_eq!(app.extension, "dat");
    }

    #[test]
    fn set_values_override_file() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("skim.toml");
        fs::write(&cfg_path, "[selection]\nmass-max = 8.0\n").unwrap();

        let mut args = base_skim_args();
        args.config = Some(cfg_path);
        args.set_values = vec![
            "selection.mass-max=12".to_string(),
            "output.compression=lz4:9".to_string(),
            "output.basket-size=4096".to_string(),
        ];
        let app = build_config(&args).expect("build ok");

        assert_eq!(cuts_of(&app.core_config.selection).mass_max, 12.0);
        assert_eq!(app.core_config.output.compression.level, 9);
        assert_eq!(app.core_config.output.basket_size, 4096);
    }

    #[test]
    fn run_flags_reach_core_config() {
        let mut args = base_skim_args();
        args.mc = true;
        args.lhe = true;
        args.disable_cuts = true;
        args.era = Some("2018".to_string());
        let app = build_config(&args).expect("build ok");

        assert_eq!(app.core_config.selection, Selection::PassThrough);
        assert_eq!(app.core_config.tally_mode(), TallyMode::Counting);
        assert_eq!(app.core_config.era, Some(Era::Run2018));
    }

    #[test]
    fn unknown_era_is_a_config_error() {
        let mut args = base_skim_args();
        args.era = Some("2019".to_string());
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut args = base_skim_args();
        args.set_values = vec!["selection.eta-max=wide".to_string()];
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));

        args.set_values = vec!["selection.eta-max".to_string()];
        assert!(matches!(build_config(&args), Err(CliError::Argument(_))));

        args.set_values = vec!["output.threads=4".to_string()];
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));

        args.set_values = vec!["output.compression=brotli".to_string()];
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));

        args.set_values = vec!["selection.sub-pt-min=40".to_string()];
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));
    }
}
