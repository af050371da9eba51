//! Showcase - portfolio widget runtime
//!
//! This library provides the panels of a personal portfolio page (visitor
//! location, Swiss city weather, crypto prices, movies), the modal, theme
//! and navigation behavior around them, and an HTTP host that serves the
//! rendered HTML fragments.

pub mod api;
pub mod config;
pub mod contact;
pub mod dashboard;
pub mod document;
pub mod error;
pub mod geolocation;
pub mod html;
pub mod lookup;
pub mod modal;
pub mod models;
pub mod navigation;
pub mod panels;
pub mod storage;
pub mod telemetry;
pub mod theme;
pub mod web;
pub mod widget;

// Re-export core types for public API
pub use config::ShowcaseConfig;
pub use dashboard::{Dashboard, Providers};
pub use document::{Document, SharedDocument};
pub use error::{ErrorCode, GeolocationFailure, ShowcaseError};
pub use geolocation::{GeolocationSource, PositionReport};
pub use modal::{ModalKind, ModalView};
pub use panels::Tab;
pub use storage::{FjallPreferenceStore, MemoryPreferenceStore, PreferenceStore};
pub use theme::{Theme, ThemeController};
pub use widget::RenderState;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ShowcaseError>;
