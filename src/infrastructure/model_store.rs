//! File-backed model store.
//!
//! Layout under the model directory:
//! - `price_predictor.json` - serialized random-forest regressor
//! - `scaler.json` - serialized feature scaler
//!
//! Each file wraps its artifact as `{"training_id": ..., "artifact": ...}`.
//! A load only succeeds when both files carry the same id. Saves write both
//! temp files completely before renaming either into place.

use crate::domain::errors::ModelStoreError;
use crate::domain::ml::{FeatureScaler, ModelArtifacts, Regressor};
use crate::domain::ports::ModelStore;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const REGRESSOR_FILE: &str = "price_predictor.json";
pub const SCALER_FILE: &str = "scaler.json";

#[derive(Serialize, Deserialize)]
struct Stamped<T> {
    training_id: Uuid,
    artifact: T,
}

#[derive(Debug, Clone)]
pub struct FileModelStore {
    dir: PathBuf,
}

impl FileModelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn regressor_path(&self) -> PathBuf {
        self.dir.join(REGRESSOR_FILE)
    }

    pub fn scaler_path(&self) -> PathBuf {
        self.dir.join(SCALER_FILE)
    }

    fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ModelStoreError> {
        let file = File::open(path).map_err(|source| ModelStoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_reader(BufReader::new(file)).map_err(|e| ModelStoreError::Corrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Serializes `value` into a sibling temp file and returns its path.
    /// Nothing is left behind on failure.
    fn write_temp<T: Serialize>(path: &Path, value: &T) -> Result<PathBuf, ModelStoreError> {
        let tmp = path.with_extension("json.tmp");

        let written = File::create(&tmp)
            .map_err(|source| ModelStoreError::Io {
                path: tmp.clone(),
                source,
            })
            .and_then(|file| {
                let mut writer = BufWriter::new(file);
                serde_json::to_writer(&mut writer, value).map_err(|e| {
                    ModelStoreError::Serialization {
                        path: path.to_path_buf(),
                        reason: e.to_string(),
                    }
                })?;
                writer.flush().map_err(|source| ModelStoreError::Io {
                    path: tmp.clone(),
                    source,
                })
            });

        match written {
            Ok(()) => Ok(tmp),
            Err(e) => {
                discard(&tmp);
                Err(e)
            }
        }
    }
}

fn discard(tmp: &Path) {
    if let Err(e) = fs::remove_file(tmp) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Could not remove temp file {:?}: {}", tmp, e);
        }
    }
}

impl ModelStore for FileModelStore {
    fn load_pair(&self) -> Result<ModelArtifacts, ModelStoreError> {
        let regressor_path = self.regressor_path();
        let scaler_path = self.scaler_path();

        for path in [&regressor_path, &scaler_path] {
            if !path.exists() {
                return Err(ModelStoreError::Missing { path: path.clone() });
            }
        }

        let regressor: Stamped<Regressor> = Self::read_json(&regressor_path)?;
        let scaler: Stamped<FeatureScaler> = Self::read_json(&scaler_path)?;

        if regressor.training_id != scaler.training_id {
            return Err(ModelStoreError::Corrupt {
                path: scaler_path,
                reason: format!(
                    "scaler belongs to training {} but regressor to {}",
                    scaler.training_id, regressor.training_id
                ),
            });
        }
        debug!(
            "Deserialized regressor and scaler of training {} from {:?}",
            regressor.training_id, self.dir
        );

        ModelArtifacts::with_training_id(regressor.training_id, regressor.artifact, scaler.artifact)
            .map_err(|e| ModelStoreError::Corrupt {
                path: scaler_path,
                reason: e.to_string(),
            })
    }

    fn save_pair(&self, artifacts: &ModelArtifacts) -> Result<(), ModelStoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| ModelStoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let training_id = artifacts.training_id();
        let regressor_path = self.regressor_path();
        let scaler_path = self.scaler_path();

        let regressor_tmp = Self::write_temp(
            &regressor_path,
            &Stamped {
                training_id,
                artifact: artifacts.regressor(),
            },
        )?;
        let scaler_tmp = Self::write_temp(
            &scaler_path,
            &Stamped {
                training_id,
                artifact: artifacts.scaler(),
            },
        )
        .inspect_err(|_| discard(&regressor_tmp))?;

        for (tmp, path) in [(&regressor_tmp, &regressor_path), (&scaler_tmp, &scaler_path)] {
            if let Err(source) = fs::rename(tmp, path) {
                discard(&regressor_tmp);
                discard(&scaler_tmp);
                return Err(ModelStoreError::Io {
                    path: path.clone(),
                    source,
                });
            }
        }

        info!("Model {} saved to {:?}", training_id, self.dir);
        Ok(())
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}
