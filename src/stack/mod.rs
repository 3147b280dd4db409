//! Strongly typed identifiers shared by detection and generation.
//!
//! Languages are a closed set and never carry unknown values. Frameworks use the
//! `define_id_enum!` macro so that profiles produced elsewhere (with frameworks this
//! build does not know) still deserialize through the `Custom` variant.

#[macro_use]
pub mod id_enum_macro;

pub mod framework_id;
pub mod language_id;

pub use framework_id::{FrameworkCategory, FrameworkId};
pub use language_id::Language;
