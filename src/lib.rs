//! EduBot - Retrieval-Augmented Tutoring Backend
//!
//! Answers student questions from locally indexed study material, with a
//! web-search fallback, by prompting a hosted language model.
//!
//! # Architecture
//!
//! - **rag**: chunking, embeddings and the in-memory retrieval index
//! - **tutor**: prompt assembly and the retrieve / generate / search flow
//! - **models**, **search**: thin clients for the language model and web search
//! - **server**, **cli**, **bootstrap**: HTTP surface, arguments and startup wiring

pub mod errors;

// Re-export commonly used types
pub use errors::{EduBotError, Result};

pub mod config;
pub mod rag;

pub mod models;
pub mod search;
pub mod tutor;

pub mod bootstrap;
pub mod cli;
pub mod server;
