use crate::aggregate::UserMetrics;
use crate::sources::Platform;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A user's registration: who they are and which platform accounts to
/// aggregate. Input to an update pass; [`UserMetrics`] is the output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub display_name: String,
    pub handles: HashMap<Platform, String>,
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("store I/O failed")]
    Io(#[from] io::Error),
    #[error("stored record is not valid JSON")]
    Json(#[from] serde_json::Error),
    #[error("failed to serialize a CSV row")]
    Csv(#[from] csv::Error),
    #[error("only .csv and .json exports are supported")]
    UnsupportedFormat,
}

/// Read/write access to the persisted per-user metrics. Passed explicitly
/// into the components that need it; adapters never see it.
pub trait MetricsStore: Send + Sync {
    /// Every metrics record, sorted by user id so that downstream stable
    /// sorts break ties deterministically.
    fn load_all(&self) -> Result<Vec<UserMetrics>, StoreError>;
    fn load(&self, user_id: &str) -> Result<Option<UserMetrics>, StoreError>;
    fn save(&self, metrics: &UserMetrics) -> Result<(), StoreError>;
}

/// One JSON file per record under a data directory:
/// `<root>/metrics/<user>.json` and `<root>/profiles/<user>.json`.
pub struct JsonMetricsStore {
    metrics_dir: PathBuf,
    profiles_dir: PathBuf,
}

impl JsonMetricsStore {
    pub fn new(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref();
        let metrics_dir = root.join("metrics");
        let profiles_dir = root.join("profiles");
        fs::create_dir_all(&metrics_dir)?;
        fs::create_dir_all(&profiles_dir)?;
        Ok(Self {
            metrics_dir,
            profiles_dir,
        })
    }

    fn record_path(dir: &Path, user_id: &str) -> PathBuf {
        dir.join(format!("{}.json", user_id))
    }

    pub fn save_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        write_json(
            profile,
            Self::record_path(&self.profiles_dir, &profile.user_id),
        )
    }

    pub fn load_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
        read_json_opt(Self::record_path(&self.profiles_dir, user_id))
    }

    pub fn load_all_profiles(&self) -> Result<Vec<UserProfile>, StoreError> {
        let mut profiles: Vec<UserProfile> = read_dir_json(&self.profiles_dir)?;
        profiles.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(profiles)
    }
}

impl MetricsStore for JsonMetricsStore {
    fn load_all(&self) -> Result<Vec<UserMetrics>, StoreError> {
        let mut records: Vec<UserMetrics> = read_dir_json(&self.metrics_dir)?;
        records.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(records)
    }

    fn load(&self, user_id: &str) -> Result<Option<UserMetrics>, StoreError> {
        read_json_opt(Self::record_path(&self.metrics_dir, user_id))
    }

    fn save(&self, metrics: &UserMetrics) -> Result<(), StoreError> {
        write_json(
            metrics,
            Self::record_path(&self.metrics_dir, &metrics.user_id),
        )
    }
}

fn write_json<T: Serialize>(value: &T, path: impl AsRef<Path>) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path.as_ref(), json)?;
    Ok(())
}

fn read_json_opt<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Option<T>, StoreError> {
    match fs::read_to_string(path.as_ref()) {
        Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn read_dir_json<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>, StoreError> {
    let ext = Some(std::ffi::OsStr::new("json"));
    let mut records = Vec::new();
    for file in fs::read_dir(dir)? {
        let path = file?.path();
        if path.extension() == ext {
            let json = fs::read_to_string(&path)?;
            records.push(serde_json::from_str(&json)?);
        }
    }
    Ok(records)
}

fn write_csv<T: Serialize>(values: &[T], path: &Path) -> Result<(), StoreError> {
    let file = fs::File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    values.iter().try_for_each(|value| writer.serialize(value))?;
    Ok(())
}

/// Writes any serializable slice, typically a leaderboard snapshot, to
/// `.csv` or `.json`, chosen by the file extension.
pub fn export_slice<T: Serialize>(values: &[T], path: impl AsRef<Path>) -> Result<(), StoreError> {
    let path = path.as_ref();
    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => write_json(&values, path)?,
        Some("csv") => write_csv(values, path)?,
        _ => return Err(StoreError::UnsupportedFormat),
    }
    tracing::info!("Wrote {} records to {:?}", values.len(), path);
    Ok(())
}
