use crate::error::{Error, Result};
use crate::filter::FilterDimension;
use crate::provider::{AnyProvider, DataFormat, FileProvider, StaticProvider};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Where the crop collection comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Sample,
    File(PathBuf),
}

impl DataSource {
    pub fn provider(&self) -> AnyProvider {
        match self {
            DataSource::Sample => AnyProvider::Static(StaticProvider::sample()),
            DataSource::File(path) => AnyProvider::File(FileProvider::new(path)),
        }
    }
}

/// How results are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One JSON object per line
    #[default]
    Json,
    Text,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "text" => OutputFormat::Text,
            _ => OutputFormat::Json,
        }
    }
}

/// Configuration for a filtering run
#[derive(Debug, Clone)]
pub struct Config {
    pub source: DataSource,
    pub disabled_names: Vec<String>,
    pub disabled_districts: Vec<String>,
    pub output: OutputFormat,
}

impl Config {
    /// Create a new default configuration
    pub fn new(source: DataSource) -> Self {
        Self {
            source,
            disabled_names: Vec::new(),
            disabled_districts: Vec::new(),
            output: OutputFormat::Json,
        }
    }

    /// Options to uncheck right after loading
    pub fn disabled(&self, dimension: FilterDimension) -> &[String] {
        match dimension {
            FilterDimension::Name => &self.disabled_names,
            FilterDimension::District => &self.disabled_districts,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if let DataSource::File(path) = &self.source {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Data file does not exist: {}",
                    path.display()
                )));
            }

            if !path.is_file() {
                return Err(Error::Config(format!(
                    "Data path is not a file: {}",
                    path.display()
                )));
            }

            DataFormat::from_path(path)?;
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DataSource::Sample)
    }
}

/// Builder for creating configurations
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder reading the built-in sample
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a configuration file's values
    pub fn from_file(file: ConfigFile) -> Self {
        let mut builder = Self::new();
        if let Some(path) = file.source {
            builder = builder.data_file(path);
        }
        builder.config.disabled_names = file.disabled_names;
        builder.config.disabled_districts = file.disabled_districts;
        if let Some(output) = file.output {
            builder.config.output = OutputFormat::from(output.as_str());
        }
        builder
    }

    /// Read crops from a JSON or YAML file
    pub fn data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.source = DataSource::File(path.into());
        self
    }

    /// Set disabled names from a comma-separated string
    pub fn disabled_names_str(mut self, names: &str) -> Result<Self> {
        self.config.disabled_names = parse_list(names, "name")?;
        Ok(self)
    }

    /// Set disabled districts from a comma-separated string
    pub fn disabled_districts_str(mut self, districts: &str) -> Result<Self> {
        self.config.disabled_districts = parse_list(districts, "district")?;
        Ok(self)
    }

    pub fn output(mut self, output: OutputFormat) -> Self {
        self.config.output = output;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.contains(&value) {
        list.push(value);
    }
}

fn parse_list(input: &str, what: &str) -> Result<Vec<String>> {
    if input.is_empty() {
        return Ok(vec![]);
    }

    let mut values = Vec::new();
    for part in input.split(',') {
        let trimmed = part.trim();
        if trimmed.is_empty() {
            return Err(Error::Config(format!("Empty {} in list '{}'", what, input)));
        }
        push_unique(&mut values, trimmed.to_string());
    }
    Ok(values)
}

/// On-disk configuration (cropfilter.yml)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    pub source: Option<PathBuf>,
    #[serde(default)]
    pub disabled_names: Vec<String>,
    #[serde(default)]
    pub disabled_districts: Vec<String>,
    pub output: Option<String>,
}

/// Load and parse a YAML configuration file
///
/// A relative `source` is resolved against the file's directory.
pub fn load_config_file(config_path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(config_path).map_err(|e| {
        Error::Config(format!(
            "Failed to read config file {}: {}",
            config_path.display(),
            e
        ))
    })?;
    let mut file: ConfigFile = serde_yaml::from_str(&contents)?;

    if let (Some(source), Some(dir)) = (&file.source, config_path.parent()) {
        if source.is_relative() {
            file.source = Some(dir.join(source));
        }
    }
    Ok(file)
}
