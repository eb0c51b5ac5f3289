use evskim::core::io::compression::CompressionSettings;
use evskim::core::io::format::FILE_EXTENSION;
use evskim::core::io::writer::DEFAULT_BASKET_SIZE;
use evskim::engine::selection::DimuonCuts;

pub struct DefaultsConfig {
    pub cuts: DimuonCuts,
    pub compression: CompressionSettings,
    pub basket_size: usize,
    pub extension: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            cuts: DimuonCuts::default(),
            compression: CompressionSettings::default(),
            basket_size: DEFAULT_BASKET_SIZE,
            extension: FILE_EXTENSION.to_string(),
        }
    }
}
