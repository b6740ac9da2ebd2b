//! Projection builders: pure mappers from a normalized record (plus its
//! resolved identity) to the JSON documents the site serves. No I/O here;
//! route handlers own serialization and status codes.

pub mod ai;
pub mod breadcrumb;
pub mod faq;
pub mod label;
pub mod schema;
