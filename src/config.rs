use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::builtin::builtin_reference;
use crate::reference::ReferenceData;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PathsConfig {
    pub export_dir: PathBuf,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RankingConfig {
    pub min_velocity: i32,
    pub top_n: usize,
    pub max_combinations: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EngineConfig {
    pub parallel: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    pub paths: PathsConfig,
    pub ranking: RankingConfig,
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub settings: Settings,
    pub reference: ReferenceData,
    pub base_dir: PathBuf,
}

impl AppConfig {
    pub fn load(data_dir: Option<PathBuf>) -> Result<Self> {
        let base_dir = match data_dir {
            Some(dir) => dir,
            None => project_dirs()?.data_dir().to_path_buf(),
        };
        Self::load_from(base_dir)
    }

    pub fn load_from(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)
            .with_context(|| format!("Failed to create {}", base_dir.display()))?;

        let settings_path = base_dir.join("settings.json");
        let reference_path = base_dir.join("reference.json");

        let settings: Settings = load_or_write(&settings_path, default_settings(&base_dir))?;
        let reference: ReferenceData = load_or_write(&reference_path, builtin_reference())?;

        Ok(AppConfig {
            settings,
            reference,
            base_dir,
        })
    }

    pub fn reference_path(&self) -> PathBuf {
        self.base_dir.join("reference.json")
    }
}

fn load_or_write<T>(path: &Path, default: T) -> Result<T>
where
    T: Serialize + for<'de> Deserialize<'de>,
{
    if !path.exists() {
        let data = serde_json::to_string_pretty(&default)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, data).with_context(|| format!("Failed to write {}", path.display()))?;
        return Ok(default);
    }
    let bytes =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let value = serde_json::from_str(&bytes)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(value)
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "example", "fashion_trends")
        .context("Unable to determine platform data directory")
}

fn default_settings(base_dir: &Path) -> Settings {
    Settings {
        paths: PathsConfig {
            export_dir: base_dir.join("exports"),
        },
        ranking: RankingConfig {
            min_velocity: -100,
            top_n: 10,
            max_combinations: 50_000,
        },
        engine: EngineConfig { parallel: true },
        logging: LoggingConfig {
            level: "info".into(),
            format: LogFormat::Compact,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_load_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load_from(dir.path().to_path_buf()).unwrap();
        assert!(dir.path().join("settings.json").exists());
        assert!(cfg.reference_path().exists());
        assert_eq!(cfg.settings.ranking.top_n, 10);
        assert_eq!(cfg.settings.logging.format, LogFormat::Compact);
        assert_eq!(cfg.reference, builtin_reference());
    }

    #[test]
    fn edited_files_are_read_back() {
        let dir = tempfile::tempdir().unwrap();
        AppConfig::load_from(dir.path().to_path_buf()).unwrap();

        let settings_path = dir.path().join("settings.json");
        let mut settings: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&settings_path).unwrap()).unwrap();
        settings["ranking"]["top_n"] = serde_json::json!(3);
        settings["logging"]["format"] = serde_json::json!("json");
        fs::write(&settings_path, settings.to_string()).unwrap();

        let mut reference = builtin_reference();
        reference.cities.truncate(2);
        fs::write(
            dir.path().join("reference.json"),
            serde_json::to_string(&reference).unwrap(),
        )
        .unwrap();

        let cfg = AppConfig::load_from(dir.path().to_path_buf()).unwrap();
        assert_eq!(cfg.settings.ranking.top_n, 3);
        assert_eq!(cfg.settings.logging.format, LogFormat::Json);
        assert_eq!(cfg.reference.cities.len(), 2);
    }

    #[test]
    fn broken_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("settings.json"), "{ not json").unwrap();
        let err = AppConfig::load_from(dir.path().to_path_buf()).unwrap_err();
        assert!(format!("{err:#}").contains("settings.json"));
    }
}
