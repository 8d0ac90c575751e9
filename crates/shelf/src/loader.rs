//! Dataset loading.
//!
//! Loading is the only asynchronous step. The dataset and the optional
//! read-state document are fetched concurrently; the dataset is mandatory,
//! the read state is best effort and degrades to an empty [`ReadSet`].

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::dataset::Catalog;
use crate::error::LoadError;
use crate::readset::ReadSet;

/// Retrieves raw document bytes by location.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, LoadError>;
}

/// Reads documents from the local filesystem.
///
/// Relative locations resolve against `root` when one is set.
#[derive(Debug, Clone, Default)]
pub struct FsFetcher {
    root: Option<PathBuf>,
}

impl FsFetcher {
    pub fn new() -> Self {
        FsFetcher::default()
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        FsFetcher {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, location: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(location),
            None => PathBuf::from(location),
        }
    }
}

#[async_trait]
impl Fetcher for FsFetcher {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, LoadError> {
        let path = self.resolve(location);
        debug!(path = %path.display(), "reading document");
        tokio::fs::read(&path)
            .await
            .map_err(|source| LoadError::Fetch {
                location: location.to_string(),
                source,
            })
    }
}

/// Serves documents from memory. Unknown locations fail as not found.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    documents: HashMap<String, Vec<u8>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        MemoryFetcher::default()
    }

    pub fn with_document(mut self, location: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.documents.insert(location.into(), bytes.into());
        self
    }
}

#[async_trait]
impl Fetcher for MemoryFetcher {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, LoadError> {
        self.documents
            .get(location)
            .cloned()
            .ok_or_else(|| LoadError::Fetch {
                location: location.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such document"),
            })
    }
}

/// Everything the session needs from the initial load.
#[derive(Debug, Clone, Default)]
pub struct Loaded {
    pub catalog: Catalog,
    pub read_set: ReadSet,
}

/// Fetches and decodes the dataset, and the read state if a location is given.
///
/// Both fetches run concurrently. Only a dataset failure is returned; a
/// read-state failure is logged and yields an empty read set.
pub async fn load<F>(
    fetcher: &F,
    dataset: &str,
    read_state: Option<&str>,
) -> Result<Loaded, LoadError>
where
    F: Fetcher + ?Sized,
{
    let primary = load_catalog(fetcher, dataset);
    let secondary = async {
        match read_state {
            Some(location) => load_read_set(fetcher, location).await.unwrap_or_else(|err| {
                warn!(%location, error = %err, "read state unavailable, treating all records as unread");
                ReadSet::default()
            }),
            None => ReadSet::default(),
        }
    };

    let (catalog, read_set) = tokio::join!(primary, secondary);
    let catalog = catalog?;
    info!(
        records = catalog.len(),
        read = read_set.len(),
        "catalog loaded"
    );
    Ok(Loaded { catalog, read_set })
}

/// Fetches and decodes a dataset document.
pub async fn load_catalog<F>(fetcher: &F, location: &str) -> Result<Catalog, LoadError>
where
    F: Fetcher + ?Sized,
{
    let bytes = fetcher.fetch(location).await?;
    Catalog::from_slice(location, &bytes)
}

/// Fetches and decodes a read-state document.
pub async fn load_read_set<F>(fetcher: &F, location: &str) -> Result<ReadSet, LoadError>
where
    F: Fetcher + ?Sized,
{
    let bytes = fetcher.fetch(location).await?;
    ReadSet::from_slice(location, &bytes)
}
