// AI service module.
// Provides the client and wire types for the generative image/video API.

pub mod client;
pub mod operations;
pub mod types;

pub use client::AiClient;
pub use types::AspectRatio;
