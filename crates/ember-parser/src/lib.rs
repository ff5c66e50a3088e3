//! Org document I/O adapter
//!
//! Turns raw org text into an [`ember_core::OrgNode`] tree and a tree
//! back into text. The two functions are structural inverses up to
//! formatting-insignificant whitespace: canonical spacing after keyword
//! colons, canonical tag padding on headlines, and a guaranteed trailing
//! newline.
//!
//! The parser is line-oriented and fails loudly on structure the tree
//! cannot represent (an unterminated property drawer or `#+BEGIN_`
//! block) instead of silently producing a corrupt tree.

pub mod blocks;
pub mod error;
pub mod inline;
pub mod serialize;

pub use blocks::parse;
pub use error::ParseError;
pub use serialize::serialize;
