use evskim::engine::config::SkimConfig;
use std::path::PathBuf;

/// Everything the `skim` command needs, after merging CLI, file and defaults.
pub struct AppConfig {
    pub input_dirs: Vec<PathBuf>,
    pub output_dir: PathBuf,
    pub extension: String,
    pub report_path: Option<PathBuf>,
    pub core_config: SkimConfig,
}
