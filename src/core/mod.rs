//! Core module - site layout and configuration

pub mod config;
pub mod site;

pub use config::Config;
pub use site::{Site, SiteError};
