// Gallery path utilities.
// The gallery lives in the platform data directory as a single JSON file.

use std::path::PathBuf;

use directories::ProjectDirs;

/// Get the base data directory (~/.local/share/stylosphere on Linux).
pub fn data_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "stylosphere").map(|dirs| dirs.data_dir().to_path_buf())
}

/// Path to the persisted gallery list.
pub fn gallery_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("gallery.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gallery_path() {
        // Path construction only; no filesystem access.
        let path = gallery_path().unwrap();
        assert!(path.ends_with("gallery.json"));
    }
}
