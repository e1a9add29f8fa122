// Gallery module for persisted creations.
// Stores user-saved images as a single JSON list on disk.

pub mod paths;
pub mod store;

pub use store::{GalleryImage, GalleryStore};
