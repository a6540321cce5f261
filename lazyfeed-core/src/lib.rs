#![allow(clippy::new_without_default)]

pub mod actor;
pub mod error;
pub mod feed;
pub mod policy;
pub mod post;
pub mod screen;
pub mod sentinel;
pub mod source;
pub mod trigger;

pub use im;
