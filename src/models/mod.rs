//! Language model access
//!
//! - Chat-completions client with optional image input
//! - Image normalisation (data URL, file path, raw base64)
//! - Wire types for the chat API

pub mod client;
pub mod image;
pub mod types;

// Re-export key types for convenience
pub use client::{GroqClient, LanguageModel};
pub use image::process_image;
