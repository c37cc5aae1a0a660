use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use voxplay_core::{Catalog, CatalogError, CatalogItem, MediaConfig};

const MEDIA_EXTENSIONS: &[&str] = &["mp4", "mov", "avi"];

/// Scan `config.dir` and build an ordered catalog snapshot.
///
/// The lead item (by stem, case-insensitive) is placed first; the rest sort
/// by display name, case-insensitive. A sibling `.txt` file with the same
/// stem is read as the item's reference transcript.
pub fn load_from_dir(config: &MediaConfig) -> Result<Catalog, CatalogError> {
    let dir = Path::new(&config.dir);
    let mut items = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || !is_media_file(&path) {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some(file_name) = path.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        items.push(CatalogItem {
            id: file_name.to_string(),
            display_name: stem.to_string(),
            transcript_text: read_transcript(&path),
        });
    }

    let lead = config.lead_item.to_lowercase();
    items.sort_by(|a, b| {
        let a_lead = a.display_name.to_lowercase() == lead;
        let b_lead = b.display_name.to_lowercase() == lead;
        b_lead
            .cmp(&a_lead)
            .then_with(|| a.display_name.to_lowercase().cmp(&b.display_name.to_lowercase()))
    });

    tracing::info!(dir = %config.dir, items = items.len(), "loaded media catalog");
    Ok(Catalog::new(items))
}

fn is_media_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| MEDIA_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn read_transcript(media_path: &Path) -> Option<String> {
    let sidecar: PathBuf = media_path.with_extension("txt");
    match fs::read_to_string(&sidecar) {
        Ok(text) => {
            let text = text.trim().to_string();
            (!text.is_empty()).then_some(text)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            tracing::warn!(path = %sidecar.display(), "failed to read transcript sidecar: {e}");
            None
        }
    }
}

/// Shared handle over the current catalog snapshot. Readers take cheap
/// `Arc` clones; a reload swaps the whole snapshot so in-flight
/// resolutions keep the catalog they started with.
pub struct CatalogStore {
    config: MediaConfig,
    current: RwLock<Arc<Catalog>>,
}

impl CatalogStore {
    pub fn new(config: MediaConfig) -> Result<Self, CatalogError> {
        let catalog = load_from_dir(&config)?;
        Ok(Self {
            config,
            current: RwLock::new(Arc::new(catalog)),
        })
    }

    pub fn snapshot(&self) -> Arc<Catalog> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    pub fn reload(&self) -> Result<(), CatalogError> {
        let catalog = Arc::new(load_from_dir(&self.config)?);
        match self.current.write() {
            Ok(mut guard) => *guard = catalog,
            Err(poisoned) => *poisoned.into_inner() = catalog,
        }
        Ok(())
    }
}
