//! Upstream access. The only crate that talks to the network.

pub mod gateway;

pub use gateway::{ContentApi, ContentSource};
