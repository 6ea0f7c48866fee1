use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::catalog::{sort_channels, Catalog, Channel, ChannelIndex};

const CHANNELS_FILE: &str = "channels.json";
const SEASONS_FILE: &str = "seasons.json";
const SHOWS_FILE: &str = "shows.json";

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog document {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("catalog task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Which catalog documents a save should rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Documents {
    pub channels: bool,
    pub seasons: bool,
    pub shows: bool,
}

impl Documents {
    pub const ALL: Documents = Documents {
        channels: true,
        seasons: true,
        shows: true,
    };

    /// The collections that differ between two snapshots.
    pub fn changed(before: &Catalog, after: &Catalog) -> Self {
        Documents {
            channels: before.channels != after.channels,
            seasons: before.seasons != after.seasons,
            shows: before.shows != after.shows,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.channels || self.seasons || self.shows)
    }
}

/// Whole-document persistence for the catalog.
pub trait CatalogStore: Send + Sync {
    fn load(&self) -> Result<Catalog, CatalogError>;
    /// Rewrite the selected documents from `catalog`; the others are left alone.
    fn save(&self, catalog: &Catalog, documents: Documents) -> Result<(), CatalogError>;
}

/// Stores the catalog as `channels.json`, `seasons.json` and `shows.json`
/// inside one data directory.
#[derive(Debug, Clone)]
pub struct JsonCatalogStore {
    dir: PathBuf,
}

impl JsonCatalogStore {
    /// Creates `dir` if it does not exist yet.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| CatalogError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read_doc<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T, CatalogError> {
        let path = self.dir.join(name);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
            Err(source) => return Err(CatalogError::Io { path, source }),
        };
        serde_json::from_str(&content).map_err(|source| CatalogError::Json { path, source })
    }

    /// Write to a sibling temp file, then rename over the target.
    fn write_doc<T: Serialize + ?Sized>(&self, name: &str, doc: &T) -> Result<(), CatalogError> {
        let path = self.dir.join(name);
        let io_err = |source| CatalogError::Io {
            path: path.clone(),
            source,
        };

        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        serde_json::to_writer_pretty(&mut tmp, doc).map_err(|source| CatalogError::Json {
            path: path.clone(),
            source,
        })?;
        tmp.write_all(b"\n").map_err(io_err)?;
        tmp.persist(&path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}

impl CatalogStore for JsonCatalogStore {
    fn load(&self) -> Result<Catalog, CatalogError> {
        let by_id: BTreeMap<String, Channel> = self.read_doc(CHANNELS_FILE)?;
        let mut channels: Vec<Channel> = by_id.into_values().collect();
        sort_channels(&mut channels);

        Ok(Catalog {
            channels,
            seasons: self.read_doc(SEASONS_FILE)?,
            shows: self.read_doc(SHOWS_FILE)?,
        })
    }

    fn save(&self, catalog: &Catalog, documents: Documents) -> Result<(), CatalogError> {
        if documents.channels {
            self.write_doc(CHANNELS_FILE, &ChannelIndex(&catalog.channels))?;
        }
        if documents.seasons {
            self.write_doc(SEASONS_FILE, &catalog.seasons)?;
        }
        if documents.shows {
            self.write_doc(SHOWS_FILE, &catalog.shows)?;
        }
        tracing::debug!(?documents, "Saved catalog to {}", self.dir.display());
        Ok(())
    }
}

/// Shared async access to a [`CatalogStore`].
///
/// Every `update` holds one lock across load, mutate and save, so two
/// concurrent additions can never both observe the same collection and
/// allocate the same id.
#[derive(Clone)]
pub struct CatalogHandle {
    store: Arc<dyn CatalogStore>,
    write_lock: Arc<Mutex<()>>,
}

impl CatalogHandle {
    pub fn new(store: impl CatalogStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Load a snapshot. Reads are not serialized against writers; saves
    /// replace whole files, so a reader sees either the old or the new document.
    pub async fn read(&self) -> Result<Catalog, CatalogError> {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.load()).await?
    }

    /// Run `f` against a fresh snapshot and persist the documents it changed.
    ///
    /// When `f` returns `Err`, nothing is saved and the error is passed through.
    pub async fn update<T, E, F>(&self, f: F) -> Result<Result<T, E>, CatalogError>
    where
        F: FnOnce(&mut Catalog) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let _guard = self.write_lock.lock().await;
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || -> Result<Result<T, E>, CatalogError> {
            let before = store.load()?;
            let mut catalog = before.clone();
            match f(&mut catalog) {
                Ok(value) => {
                    let documents = Documents::changed(&before, &catalog);
                    if !documents.is_empty() {
                        store.save(&catalog, documents)?;
                    }
                    Ok(Ok(value))
                }
                Err(e) => Ok(Err(e)),
            }
        })
        .await?
    }
}
