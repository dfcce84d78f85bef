//! `technotes` - A small blog of bite-sized technology notes
//!
//! This library provides the post store backed by a single JSON document, the
//! content formatter, the activity heatmap, the icon catalog and the HTTP
//! server that renders them.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod activity;
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod icons;
pub mod logging;
pub mod post;
pub mod render;
pub mod server;
pub mod store;

pub use activity::ActivityCalendar;
pub use config::{Config, RunMode};
pub use error::{Error, Result};
pub use format::FormattedContent;
pub use logging::init_logging;
pub use post::{Post, PostDraft, ValidationError};
pub use store::{MutableStore, PostPage, PostReader, ReadOnlyStore, StoreHandle};
