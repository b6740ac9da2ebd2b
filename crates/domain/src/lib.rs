pub mod api;
pub mod cache;
pub mod config;
pub mod content;
pub mod identity;
pub mod lead;
