use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Leaf sort direction within each group, and group order by key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Largest aggregate first (the default).
    #[default]
    Descending,
    /// Smallest aggregate first.
    Ascending,
    /// Keep encounter order.
    None,
}

/// Fully resolved chart configuration.
///
/// Every field has a default; a `.bundlemap.toml` file overrides individual
/// keys. Values are validated at construction: continuous knobs out of range
/// are clamped, structurally invalid combinations are rejected.
#[derive(Debug, Clone)]
pub struct Config {
    /// Degrees of the circle the dendrogram occupies, in (0, 360].
    pub angle_span: f64,
    /// Bundle curve tension (beta), clamped to [0, 1].
    pub tension: f64,
    /// Sort direction for leaves (by value) and groups (by key).
    pub sort: SortOrder,
    /// Page background color (any CSS color).
    pub background: String,
    /// Column summed per group; `None` means count-of-records mode.
    pub metric_column: Option<String>,
    /// Explicit group columns. Non-empty wins over `exclude_columns`.
    pub include_columns: Vec<String>,
    /// Columns removed from the derived schema when no include-list is set.
    pub exclude_columns: Vec<String>,
    /// Display-name remapping per group column.
    pub display_names: HashMap<String, String>,
    /// Per-group color overrides (group column -> CSS color).
    pub group_colors: HashMap<String, String>,
    pub font_size: u32,
    pub font_weight: String,
    /// Horizontal room reserved for leaf labels, in pixels.
    pub label_width: u32,
    /// Maximum leaf bar length, in pixels.
    pub bar_height: f64,
    /// Leaf bar thickness, in pixels.
    pub bar_width: f64,
    pub link_color: String,
    /// Link stroke width range mapped from [0, max link value].
    pub link_width_min: f64,
    pub link_width_max: f64,
    /// Opacity of links/bars when nothing is hovered, in [0, 1].
    pub opacity_default: f64,
    /// Opacity of highlighted elements while hovering, in [0, 1].
    pub opacity_highlight: f64,
    /// Opacity of dimmed (background) elements while hovering, in [0, 1].
    pub opacity_background: f64,
    /// Label shown in the hover tooltip before the aggregate value.
    pub tooltip_label: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    angle_span: Option<f64>,
    tension: Option<f64>,
    sort: Option<SortOrder>,
    background: Option<String>,
    metric_column: Option<String>,
    include_columns: Option<Vec<String>>,
    exclude_columns: Option<Vec<String>>,
    display_names: Option<HashMap<String, String>>,
    group_colors: Option<HashMap<String, String>>,
    font_size: Option<u32>,
    font_weight: Option<String>,
    label_width: Option<u32>,
    bar_height: Option<f64>,
    bar_width: Option<f64>,
    link_color: Option<String>,
    link_width_min: Option<f64>,
    link_width_max: Option<f64>,
    opacity_default: Option<f64>,
    opacity_highlight: Option<f64>,
    opacity_background: Option<f64>,
    tooltip_label: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            angle_span: 360.0,
            tension: 0.85,
            sort: SortOrder::Descending,
            background: "#16213e".to_string(),
            metric_column: None,
            include_columns: Vec::new(),
            exclude_columns: Vec::new(),
            display_names: HashMap::new(),
            group_colors: HashMap::new(),
            font_size: 12,
            font_weight: "normal".to_string(),
            label_width: 120,
            bar_height: 60.0,
            bar_width: 5.0,
            link_color: "#00d9ff".to_string(),
            link_width_min: 1.0,
            link_width_max: 8.0,
            opacity_default: 0.4,
            opacity_highlight: 0.9,
            opacity_background: 0.08,
            tooltip_label: "value".to_string(),
        }
    }
}

impl Config {
    /// Load `.bundlemap.toml` from the given directory, falling back to
    /// defaults when no file exists.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = dir.join(".bundlemap.toml");

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        Self::from_toml(&content)
    }

    /// Parse a TOML override document, merge it over defaults and validate.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;
        let defaults = Self::default();

        let mut config = Self {
            angle_span: raw.angle_span.unwrap_or(defaults.angle_span),
            tension: raw.tension.unwrap_or(defaults.tension),
            sort: raw.sort.unwrap_or(defaults.sort),
            background: raw.background.unwrap_or(defaults.background),
            metric_column: raw.metric_column.filter(|c| !c.is_empty()),
            include_columns: raw.include_columns.unwrap_or_default(),
            exclude_columns: raw.exclude_columns.unwrap_or_default(),
            display_names: raw.display_names.unwrap_or_default(),
            group_colors: raw.group_colors.unwrap_or_default(),
            font_size: raw.font_size.unwrap_or(defaults.font_size),
            font_weight: raw.font_weight.unwrap_or(defaults.font_weight),
            label_width: raw.label_width.unwrap_or(defaults.label_width),
            bar_height: raw.bar_height.unwrap_or(defaults.bar_height),
            bar_width: raw.bar_width.unwrap_or(defaults.bar_width),
            link_color: raw.link_color.unwrap_or(defaults.link_color),
            link_width_min: raw.link_width_min.unwrap_or(defaults.link_width_min),
            link_width_max: raw.link_width_max.unwrap_or(defaults.link_width_max),
            opacity_default: raw.opacity_default.unwrap_or(defaults.opacity_default),
            opacity_highlight: raw.opacity_highlight.unwrap_or(defaults.opacity_highlight),
            opacity_background: raw
                .opacity_background
                .unwrap_or(defaults.opacity_background),
            tooltip_label: raw.tooltip_label.unwrap_or(defaults.tooltip_label),
        };

        config.validate()?;
        Ok(config)
    }

    /// Clamp continuous knobs to their legal range and reject structurally
    /// invalid combinations.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        if !self.angle_span.is_finite() || self.angle_span <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "angle_span must be a positive number of degrees, got {}",
                self.angle_span
            )));
        }
        self.angle_span = self.angle_span.min(360.0);
        self.tension = self.tension.clamp(0.0, 1.0);
        self.opacity_default = self.opacity_default.clamp(0.0, 1.0);
        self.opacity_highlight = self.opacity_highlight.clamp(0.0, 1.0);
        self.opacity_background = self.opacity_background.clamp(0.0, 1.0);

        if self.bar_height <= 0.0 || self.bar_width <= 0.0 {
            return Err(ConfigError::Invalid(
                "bar_height and bar_width must be positive".to_string(),
            ));
        }
        if self.link_width_min < 0.0 || self.link_width_max < self.link_width_min {
            return Err(ConfigError::Invalid(format!(
                "link width range [{}, {}] is not a valid range",
                self.link_width_min, self.link_width_max
            )));
        }
        if self.font_size == 0 {
            return Err(ConfigError::Invalid("font_size must be non-zero".to_string()));
        }

        if let Some(col) = self
            .include_columns
            .iter()
            .find(|c| self.exclude_columns.contains(c))
        {
            return Err(ConfigError::Invalid(format!(
                "column '{}' appears in both include_columns and exclude_columns",
                col
            )));
        }

        Ok(())
    }
}

/// Generate a starter `.bundlemap.toml` with all keys at their defaults.
pub fn generate_config_template() -> String {
    r##"# bundlemap configuration
# All keys are optional; shown values are the defaults.

# Degrees of the circle the chart occupies (0-360).
angle_span = 360.0

# Bundle curve tension, 0.0 (loose) to 1.0 (tight).
tension = 0.85

# Leaf sort direction: "descending", "ascending" or "none".
sort = "descending"

background = "#16213e"

# Column summed per group. Leave unset for count-of-records mode.
# metric_column = "salesAmount"

# Explicit group columns. When non-empty this wins over exclude_columns.
include_columns = []

# Columns dropped from the derived schema when include_columns is empty.
exclude_columns = []

# Display-name remapping per group column.
# [display_names]
# region = "Region"

# Per-group color overrides.
# [group_colors]
# region = "#4ecdc4"

font_size = 12
font_weight = "normal"
label_width = 120
bar_height = 60.0
bar_width = 5.0

link_color = "#00d9ff"
link_width_min = 1.0
link_width_max = 8.0

opacity_default = 0.4
opacity_highlight = 0.9
opacity_background = 0.08

tooltip_label = "value"
"##
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sort, SortOrder::Descending);
        assert!(config.metric_column.is_none());
    }

    #[test]
    fn toml_overrides_merge_over_defaults() {
        let config = Config::from_toml(
            r#"
            tension = 0.5
            sort = "ascending"
            metric_column = "amount"
            exclude_columns = ["id"]
            "#,
        )
        .unwrap();

        assert_eq!(config.tension, 0.5);
        assert_eq!(config.sort, SortOrder::Ascending);
        assert_eq!(config.metric_column.as_deref(), Some("amount"));
        assert_eq!(config.exclude_columns, vec!["id".to_string()]);
        // Untouched keys keep their defaults.
        assert_eq!(config.angle_span, 360.0);
    }

    #[test]
    fn out_of_range_knobs_are_clamped() {
        let config = Config::from_toml(
            r#"
            tension = 3.0
            angle_span = 720.0
            opacity_background = -0.5
            "#,
        )
        .unwrap();

        assert_eq!(config.tension, 1.0);
        assert_eq!(config.angle_span, 360.0);
        assert_eq!(config.opacity_background, 0.0);
    }

    #[test]
    fn invalid_width_range_is_rejected() {
        let result = Config::from_toml("link_width_min = 5.0\nlink_width_max = 1.0");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn overlapping_include_exclude_is_rejected() {
        let result = Config::from_toml(
            r#"
            include_columns = ["region"]
            exclude_columns = ["region"]
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn empty_metric_column_means_count_mode() {
        let config = Config::from_toml(r#"metric_column = """#).unwrap();
        assert!(config.metric_column.is_none());
    }

    #[test]
    fn template_parses_back() {
        let template = generate_config_template();
        let config = Config::from_toml(&template).unwrap();
        assert_eq!(config.tension, 0.85);
    }
}
