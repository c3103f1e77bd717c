//! Text-to-image client for the Bria FIBO generation API.
//!
//! Provides the REST wrapper, response parsing, status polling, offline
//! placeholders, and [`client::FiboClient`], the
//! [`ImageGenerator`](storyframe_core::generation::ImageGenerator)
//! implementation used by the pipeline.

pub mod api;
pub mod client;
pub mod config;
pub mod placeholder;
pub mod poll;
pub mod response;

pub use client::FiboClient;
pub use config::FiboConfig;
