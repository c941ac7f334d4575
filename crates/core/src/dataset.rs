#![allow(missing_docs)]

//! City dataset stored as a JSON array on disk.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    catalog::{Catalog, CatalogError, RecordPolicy},
    models::RawCity,
};

/// Conventional dataset file name, looked up in the working directory.
pub const DEFAULT_DATASET: &str = "cities.json";

/// Failure to read a dataset file into a catalog.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset {} not found", path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read dataset {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse dataset {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed record in dataset {}", path.display())]
    Record {
        path: PathBuf,
        #[source]
        source: CatalogError,
    },
}

/// Outcome of a dataset load. A failed load still yields a usable (empty)
/// catalog so the caller can choose to play on or stop.
#[derive(Debug)]
pub enum DatasetLoad {
    Loaded(Catalog),
    Fallback { catalog: Catalog, error: DatasetError },
}

impl DatasetLoad {
    pub fn catalog(&self) -> &Catalog {
        match self {
            DatasetLoad::Loaded(catalog) | DatasetLoad::Fallback { catalog, .. } => catalog,
        }
    }

    pub fn into_catalog(self) -> Catalog {
        match self {
            DatasetLoad::Loaded(catalog) | DatasetLoad::Fallback { catalog, .. } => catalog,
        }
    }

    pub fn error(&self) -> Option<&DatasetError> {
        match self {
            DatasetLoad::Loaded(_) => None,
            DatasetLoad::Fallback { error, .. } => Some(error),
        }
    }
}

/// Load the dataset at `path`, substituting an empty catalog on failure.
pub fn load(path: impl AsRef<Path>, policy: RecordPolicy) -> DatasetLoad {
    let path = path.as_ref();
    match read_catalog(path, policy) {
        Ok(catalog) => {
            info!(cities = catalog.len(), "loaded dataset {}", path.display());
            DatasetLoad::Loaded(catalog)
        }
        Err(error) => {
            warn!("{error}; continuing with an empty catalog");
            DatasetLoad::Fallback {
                catalog: Catalog::default(),
                error,
            }
        }
    }
}

/// Read and validate the dataset at `path` without any fallback.
pub fn read_catalog(path: &Path, policy: RecordPolicy) -> Result<Catalog, DatasetError> {
    let contents = fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => DatasetError::NotFound {
            path: path.to_path_buf(),
        },
        _ => DatasetError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let values: Vec<Value> =
        serde_json::from_str(&contents).map_err(|source| DatasetError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    Catalog::from_json_values(values, policy).map_err(|source| DatasetError::Record {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `catalog` to `path` in the same shape it is read from, creating
/// parent directories if needed.
pub fn persist(path: impl AsRef<Path>, catalog: &Catalog) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create dataset directory {}", parent.display()))?;
    }

    let records: Vec<RawCity> = catalog.records().iter().map(|city| city.to_raw()).collect();
    let serialized =
        serde_json::to_string_pretty(&records).context("failed to serialize city dataset")?;
    fs::write(path, serialized)
        .with_context(|| format!("failed to write dataset {}", path.display()))
}
