//! Site settings backed by the `configs` table.

pub mod keys;
pub mod service;

pub use service::{FooterLink, RenderContext, SettingsService};
