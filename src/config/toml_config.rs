use crate::core::batch_loader::DEFAULT_MIN_FILES;
use crate::core::ConfigProvider;
use crate::domain::model::PlotMode;
use crate::render::DEFAULT_CELL_SIZE;
use crate::utils::error::{MultiplesError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_plot_modes, validate_range, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub run: Option<RunConfig>,
    pub input: InputConfig,
    #[serde(default)]
    pub plot: PlotConfig,
    #[serde(default)]
    pub output: OutputConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Directory or glob pattern.
    pub pattern: String,
    pub min_files: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotConfig {
    #[serde(default = "default_modes")]
    pub modes: Vec<String>,
    pub cell_size: Option<u32>,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            modes: default_modes(),
            cell_size: None,
        }
    }
}

fn default_modes() -> Vec<String> {
    vec![PlotMode::Tracks.to_string()]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String,
    #[serde(default)]
    pub export_csv: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            export_csv: false,
        }
    }
}

fn default_output_path() -> String {
    "./output".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub json_logs: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| MultiplesError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GPX_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| {
            Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("env var pattern is valid")
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("input.pattern", &self.input.pattern)?;
        validate_path("output.path", &self.output.path)?;
        validate_plot_modes("plot.modes", &self.plot.modes)?;
        if let Some(cell_size) = self.plot.cell_size {
            validate_range("plot.cell_size", cell_size, 16, 4096)?;
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        self.run
            .as_ref()
            .map(|r| r.name.as_str())
            .unwrap_or("gpx-multiples")
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn input_pattern(&self) -> &str {
        &self.input.pattern
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn min_files(&self) -> usize {
        self.input.min_files.unwrap_or(DEFAULT_MIN_FILES)
    }

    fn plot_modes(&self) -> Vec<PlotMode> {
        // unknown names are rejected by validate_config
        validate_plot_modes("plot.modes", &self.plot.modes).unwrap_or_default()
    }

    fn cell_size(&self) -> u32 {
        self.plot.cell_size.unwrap_or(DEFAULT_CELL_SIZE)
    }

    fn export_csv(&self) -> bool {
        self.output.export_csv
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[run]
name = "alps-2024"
description = "Summer rides"

[input]
pattern = "rides/*.gpx"
min_files = 2

[plot]
modes = ["elevation", "tracks"]
cell_size = 150

[output]
path = "./previews"
export_csv = true

[monitoring]
enabled = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.name(), "alps-2024");
        assert_eq!(config.input_pattern(), "rides/*.gpx");
        assert_eq!(config.min_files(), 2);
        assert_eq!(
            config.plot_modes(),
            vec![PlotMode::Elevation, PlotMode::Tracks]
        );
        assert_eq!(config.cell_size(), 150);
        assert_eq!(config.output_path(), "./previews");
        assert!(config.export_csv());
        assert!(config.monitoring_enabled());
        assert!(!config.json_logs());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("[input]\npattern = \"tracks\"\n").unwrap();

        assert_eq!(config.name(), "gpx-multiples");
        assert_eq!(config.min_files(), DEFAULT_MIN_FILES);
        assert_eq!(config.plot_modes(), vec![PlotMode::Tracks]);
        assert_eq!(config.cell_size(), DEFAULT_CELL_SIZE);
        assert_eq!(config.output_path(), "./output");
        assert!(!config.export_csv());
        assert!(!config.monitoring_enabled());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("GPX_MULTIPLES_TEST_DIR", "/data/gpx");

        let toml_content = r#"
[input]
pattern = "${GPX_MULTIPLES_TEST_DIR}/*.gpx"

[output]
path = "${GPX_MULTIPLES_TEST_UNSET}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.input.pattern, "/data/gpx/*.gpx");
        assert_eq!(config.output.path, "${GPX_MULTIPLES_TEST_UNSET}");

        std::env::remove_var("GPX_MULTIPLES_TEST_DIR");
    }

    #[test]
    fn test_config_validation() {
        let bad_mode = r#"
[input]
pattern = "tracks"

[plot]
modes = ["heatmap"]
"#;
        let config = TomlConfig::from_toml_str(bad_mode).unwrap();
        assert!(config.validate().is_err());
        assert!(config.plot_modes().is_empty());

        let empty_pattern = TomlConfig::from_toml_str("[input]\npattern = \" \"\n").unwrap();
        assert!(empty_pattern.validate().is_err());

        assert!(matches!(
            TomlConfig::from_toml_str("[plot]\nmodes = [\"tracks\"]\n"),
            Err(MultiplesError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[input]\npattern = \"rides\"\nmin_files = 0").unwrap();

        let config = TomlConfig::from_file(file.path()).unwrap();
        assert_eq!(config.min_files(), 0);
    }
}
