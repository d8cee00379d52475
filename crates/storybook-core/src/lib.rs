//! Storybook Core — shared story model and collaborator abstractions.
//!
//! This crate defines the story document, its validation rules, the
//! classification of page image references, and the traits that the
//! generation, fetching, and rendering crates implement. It contains no
//! infrastructure code.

pub mod clock;
pub mod error;
pub mod fetch;
pub mod filename;
pub mod generator;
pub mod image_ref;
pub mod request;
pub mod story;
