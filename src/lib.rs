//! Prompt-driven image generation behind a small form.
//!
//! A [`Studio`] holds the API key and the user's extra requirements, turns
//! them into a prompt, sends it to an OpenAI-compatible images endpoint and
//! keeps the results in a newest-first gallery that can be saved to disk.

pub mod api;
pub mod config;
pub mod download;
pub mod error;
pub mod gallery;
pub mod logger;
pub mod models;
pub mod notify;
pub mod prompt;
pub mod studio;

pub use api::{ImageClient, ImageService};
pub use config::StudioConfig;
pub use download::Downloader;
pub use error::{Result, StudioError};
pub use gallery::GalleryCard;
pub use models::{GeneratedImage, GenerationPhase, Notification, NotificationKind};
pub use notify::{ConsoleNotifier, MemoryNotifier, Notifier};
pub use prompt::{assemble_prompt, DEFAULT_TEMPLATE};
pub use studio::{FormState, Studio};
