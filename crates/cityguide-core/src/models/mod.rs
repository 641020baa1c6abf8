//! Data models for the city guide document.
//!
//! - `Document`: the full dataset as fetched or cached
//! - `City`: a named city with its places
//! - `Place`: a named place with a description

pub mod city;

pub use city::{City, Document, Place};
