//! Value types shared by the decoder, the heuristics and the output.
//!
//! A [`Fragment`] is what the decoder reports for one styled run of text.
//! The heuristics turn fragments into [`HeadingCandidate`]s, and the
//! assembler projects those into the [`DocumentResult`] that is persisted.

mod fragment;
mod outline;

pub use fragment::{BBox, Fragment, StyleFlags};
pub use outline::{DocumentResult, HeadingCandidate, HeadingLevel, OutlineEntry};
