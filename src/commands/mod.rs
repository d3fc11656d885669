mod data;
mod init;
mod render;
mod serve;
mod summary;

pub use data::cmd_data;
pub use init::cmd_init;
pub use render::cmd_render;
pub use serve::cmd_serve;
pub use summary::cmd_summary;

use crate::config::Config;
use crate::fs::{FileSystem, default_fs};
use crate::model::Dataset;
use crate::style;
use std::path::{Path, PathBuf};

/// Shared context for command execution, reducing boilerplate across commands.
pub struct CommandContext {
    pub input: PathBuf,
    pub config: Config,
    pub dataset: Dataset,
}

impl CommandContext {
    /// Resolve the input path, load config, and parse the dataset.
    /// Returns Err(exit_code) if setup fails.
    pub fn new(input: &Path, config_override: Option<&Path>) -> Result<Self, i32> {
        Self::new_with_fs(input, config_override, default_fs())
    }

    pub fn new_with_fs(
        input: &Path,
        config_override: Option<&Path>,
        fs: &dyn FileSystem,
    ) -> Result<Self, i32> {
        if !fs.exists(input) {
            style::error(&format!("Input file not found: {}", style::path(input)));
            return Err(1);
        }

        let config = match config_override {
            // An explicitly named config file must parse.
            Some(path) => {
                let content = match fs.read_to_string(path) {
                    Ok(content) => content,
                    Err(e) => {
                        style::error(&format!("Failed to read config: {}", e));
                        return Err(1);
                    }
                };
                match Config::from_toml(&content) {
                    Ok(config) => config,
                    Err(e) => {
                        style::error(&format!("{}", e));
                        return Err(1);
                    }
                }
            }
            // The implicit .bundlemap.toml falls back to defaults.
            None => {
                let dir = input.parent().unwrap_or_else(|| Path::new("."));
                Config::load(dir).unwrap_or_else(|e| {
                    style::warning(&format!("Failed to load config: {}. Using defaults.", e));
                    Config::default()
                })
            }
        };

        let dataset = match fs
            .read_to_string(input)
            .map_err(crate::api::BundlemapError::from)
            .and_then(|content| Ok(Dataset::from_json_str(&content)?))
        {
            Ok(dataset) => dataset,
            Err(e) => {
                style::error(&format!("{}", e));
                return Err(1);
            }
        };

        Ok(Self {
            input: input.to_path_buf(),
            config,
            dataset,
        })
    }
}
