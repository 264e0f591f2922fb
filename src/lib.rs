//! mihomo: Honkai: Star Rail player profiles, localized with StarRailRes metadata.

pub mod api;
pub mod client;
pub mod config;
pub mod data;
pub mod error;
pub mod http;
pub mod index;
pub mod model;
pub mod normalize;
pub mod profile;
pub mod schema;

pub use client::Client;
pub use config::{Config, LocalizationMode};
pub use error::{Error, Result};
pub use model::Language;
pub use profile::Profile;
