//! Coordinate primitives shared by the baseline renderer.
//!
//! Positions are line/character pairs as produced by an analysis engine;
//! offsets are byte indices into a document's text. [`line_map::LineMap`]
//! converts between the two.

pub mod line_ending;
pub mod line_map;
pub mod position;

pub use line_ending::{
  LineEnding,
  split_lines,
};
pub use line_map::LineMap;
pub use position::{
  Offset,
  Position,
  PositionEncoding,
  PositionKind,
  Range,
};
