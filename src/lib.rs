//! uidoc: UI schema documentation toolkit
//!
//! Renders a catalogue of schema definitions into browsable documentation
//! pages and live, composable page previews.

pub mod builder;
pub mod cli;
pub mod compose;
pub mod core;
pub mod pages;
pub mod registry;
pub mod render;
pub mod templates;
