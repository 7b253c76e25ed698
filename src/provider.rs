use crate::error::{Error, Result};
use crate::sample::sample_crops;
use crate::types::Crop;
use std::future::Future;
use std::path::{Path, PathBuf};

/// Source of the crop collection, fetched once per session
pub trait DataProvider {
    fn get_all_items(&self) -> impl Future<Output = Result<Vec<Crop>>>;
}

/// In-memory data set
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    crops: Vec<Crop>,
}

impl StaticProvider {
    pub fn new(crops: Vec<Crop>) -> Self {
        Self { crops }
    }

    /// The built-in four-record sample
    pub fn sample() -> Self {
        Self::new(sample_crops())
    }
}

impl DataProvider for StaticProvider {
    async fn get_all_items(&self) -> Result<Vec<Crop>> {
        Ok(self.crops.clone())
    }
}

/// Supported data file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Json,
    Yaml,
}

impl DataFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        match ext.as_deref() {
            Some("json") => Ok(DataFormat::Json),
            Some("yaml") | Some("yml") => Ok(DataFormat::Yaml),
            _ => Err(Error::Config(format!(
                "Unsupported data file '{}'. Allowed extensions are: json, yaml, yml",
                path.display()
            ))),
        }
    }

    pub fn parse(&self, contents: &str) -> Result<Vec<Crop>> {
        let crops: Vec<Crop> = match self {
            DataFormat::Json => serde_json::from_str(contents)?,
            DataFormat::Yaml => serde_yaml::from_str(contents)?,
        };
        Ok(crops)
    }
}

/// Reads a JSON or YAML array of crops from disk
#[derive(Debug, Clone)]
pub struct FileProvider {
    path: PathBuf,
}

impl FileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataProvider for FileProvider {
    async fn get_all_items(&self) -> Result<Vec<Crop>> {
        let format = DataFormat::from_path(&self.path)?;
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            Error::DataLoad(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        let crops = format.parse(&contents)?;
        tracing::debug!(path = %self.path.display(), count = crops.len(), "read crop file");
        Ok(crops)
    }
}

/// Either built-in provider, chosen at runtime from configuration
#[derive(Debug, Clone)]
pub enum AnyProvider {
    Static(StaticProvider),
    File(FileProvider),
}

impl DataProvider for AnyProvider {
    async fn get_all_items(&self) -> Result<Vec<Crop>> {
        match self {
            AnyProvider::Static(p) => p.get_all_items().await,
            AnyProvider::File(p) => p.get_all_items().await,
        }
    }
}
