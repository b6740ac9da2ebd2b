//! Pure request → content business logic.
//!
//! Nothing in this crate performs I/O. The resolver turns raw path tokens
//! into a [`domain::identity::ResolvedIdentity`], the normalizer flattens
//! the upstream's assorted envelope shapes, and the projection builders map
//! a normalized record into the JSON documents the site serves. All the
//! actual fetching lives in the `infra` crate.

pub mod normalize;
pub mod project;
pub mod resolver;
