//! Armature merging for layered avatar outfits.
//!
//! This crate is engine-agnostic. It operates on its own retained scene
//! graph; hosts load the avatar and outfit skeletons into a [`Scene`], run
//! the merge, and read the surviving hierarchy back out.

#![forbid(unsafe_code)]

mod component;
mod config;
mod conflict;
mod context;
mod crossref;
mod error;
mod matching;
mod merge;
mod remap;
mod resolve;
mod scene;
mod usage;

#[cfg(feature = "json")]
pub mod json;

pub use component::*;
pub use config::*;
pub use conflict::*;
pub use crossref::*;
pub use error::*;
pub use merge::*;
pub use resolve::*;
pub use scene::*;
pub use usage::*;

#[cfg(test)]
mod matching_tests;


#[cfg(test)]
mod usage_tests;




#[cfg(test)]
mod remap_tests;
