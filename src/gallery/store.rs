// Durable record of user-saved creations.
// The whole list is the unit of persistence: every mutation rewrites the
// file. Load failures fall back to an empty gallery and are reported as
// warnings, never as errors.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::media::ImageFile;

/// A saved creation: the image plus the prompt that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryImage {
    /// Unique id, assigned at save time.
    pub id: String,
    #[serde(flatten)]
    pub image: ImageFile,
    /// Prompt text the image was generated from.
    pub prompt: String,
    /// When the image was saved.
    pub timestamp: DateTime<Utc>,
}

/// Ordered collection of saved images, newest first, synchronized with a
/// JSON file on disk.
#[derive(Debug)]
pub struct GalleryStore {
    images: Vec<GalleryImage>,
    path: PathBuf,
}

impl GalleryStore {
    /// Load the gallery from disk. A missing or corrupt file yields an empty
    /// gallery plus a warning for the activity log; this never fails.
    pub fn load(path: PathBuf) -> (Self, Option<String>) {
        let (images, warning) = match read_list(&path) {
            Ok(images) => (images, None),
            Err(e) => (
                Vec::new(),
                Some(format!("Could not load gallery, starting empty: {}", e)),
            ),
        };
        (Self { images, path }, warning)
    }

    /// Save an image to the front of the gallery and persist the full list.
    /// Returns the new entry's id and a warning when the write failed (the
    /// in-memory list keeps the entry either way).
    pub fn append(&mut self, image: ImageFile, prompt: String) -> (String, Option<String>) {
        let entry = GalleryImage {
            id: fresh_id(),
            image,
            prompt,
            timestamp: Utc::now(),
        };
        let id = entry.id.clone();
        self.images.insert(0, entry);
        (id, self.persist())
    }

    /// Remove an entry by id and persist. Removing an absent id is a no-op
    /// returning false.
    pub fn remove(&mut self, id: &str) -> (bool, Option<String>) {
        let before = self.images.len();
        self.images.retain(|img| img.id != id);
        if self.images.len() == before {
            return (false, None);
        }
        (true, self.persist())
    }

    /// All entries, newest first.
    pub fn images(&self) -> &[GalleryImage] {
        &self.images
    }

    /// Look up an entry by id.
    pub fn get(&self, id: &str) -> Option<&GalleryImage> {
        self.images.iter().find(|img| img.id == id)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Rewrite the whole list to disk. Failures come back as a warning for
    /// the activity log; they are never surfaced to the user.
    fn persist(&self) -> Option<String> {
        write_list(&self.path, &self.images)
            .err()
            .map(|e| format!("Could not persist gallery: {}", e))
    }
}

/// Synthesize a unique id: millisecond timestamp plus a random component.
fn fresh_id() -> String {
    format!("{}-{}", Utc::now().timestamp_millis(), Uuid::new_v4().simple())
}

fn read_list(path: &Path) -> std::io::Result<Vec<GalleryImage>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let contents = fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(std::io::Error::other)
}

/// Write atomically via temp file so a crash mid-write cannot clobber the
/// previously committed list.
fn write_list(path: &Path, images: &[GalleryImage]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(images).map_err(std::io::Error::other)?;

    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_image(name: &str) -> ImageFile {
        ImageFile::from_inline("aGVsbG8=".into(), "image/png".into(), name.into())
    }

    fn store_in(dir: &TempDir) -> GalleryStore {
        let (store, warning) = GalleryStore::load(dir.path().join("gallery.json"));
        assert!(warning.is_none());
        store
    }

    #[test]
    fn test_append_prepends_with_distinct_ids() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = store_in(&temp_dir);

        let (first, _) = store.append(test_image("a.png"), "first".into());
        let (second, _) = store.append(test_image("b.png"), "second".into());
        let (third, _) = store.append(test_image("c.png"), "third".into());

        assert_eq!(store.len(), 3);
        // Newest first
        assert_eq!(store.images()[0].id, third);
        assert_eq!(store.images()[1].id, second);
        assert_eq!(store.images()[2].id, first);

        assert_ne!(first, second);
        assert_ne!(second, third);
        assert_ne!(first, third);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = store_in(&temp_dir);

        let (id, _) = store.append(test_image("a.png"), "prompt".into());
        let (removed, warning) = store.remove(&id);
        assert!(removed);
        assert!(warning.is_none());
        assert!(store.is_empty());

        // Second remove is a no-op, not an error.
        let (removed, warning) = store.remove(&id);
        assert!(!removed);
        assert!(warning.is_none());
    }

    #[test]
    fn test_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gallery.json");

        let (mut store, _) = GalleryStore::load(path.clone());
        let (a, _) = store.append(test_image("a.png"), "alpha".into());
        let (b, _) = store.append(test_image("b.png"), "beta".into());
        let (c, _) = store.append(test_image("c.png"), "gamma".into());
        store.remove(&b);

        let (reloaded, warning) = GalleryStore::load(path);
        assert!(warning.is_none());
        let ids: Vec<&str> = reloaded.images().iter().map(|img| img.id.as_str()).collect();
        assert_eq!(ids, vec![c.as_str(), a.as_str()]);
        assert_eq!(reloaded.images()[1].prompt, "alpha");
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let (store, warning) = GalleryStore::load(temp_dir.path().join("nonexistent.json"));
        assert!(store.is_empty());
        assert!(warning.is_none());
    }

    #[test]
    fn test_corrupt_file_loads_empty_with_warning() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gallery.json");
        fs::write(&path, "{not json").unwrap();

        let (store, warning) = GalleryStore::load(path);
        assert!(store.is_empty());
        assert!(warning.is_some());
    }

    #[test]
    fn test_get_by_id() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = store_in(&temp_dir);
        let (id, _) = store.append(test_image("a.png"), "prompt".into());

        assert_eq!(store.get(&id).unwrap().image.name, "a.png");
        assert!(store.get("missing").is_none());
    }
}
