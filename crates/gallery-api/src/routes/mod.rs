//! # API Route Modules
//!
//! Each module owns one slice of the gallery surface and exposes a
//! `router()` that is merged in [`crate::app`].

pub mod delete;
pub mod images;
pub mod upload;
