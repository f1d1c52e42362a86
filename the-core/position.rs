use std::fmt;

use serde::{
  Deserialize,
  Serialize,
};

/// Byte index into a document's text.
pub type Offset = usize;

/// A point in a document, zero-indexed.
///
/// `character` is counted in the code units of the [`PositionEncoding`] the
/// document's line map was built with.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
  pub line:      u32,
  pub character: u32,
}

impl Position {
  pub const fn new(line: u32, character: u32) -> Self {
    Self { line, character }
  }

  pub const fn zero() -> Self {
    Self {
      line:      0,
      character: 0,
    }
  }
}

impl From<(u32, u32)> for Position {
  fn from(value: (u32, u32)) -> Self {
    Position::new(value.0, value.1)
  }
}

impl fmt::Display for Position {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", self.line, self.character)
  }
}

/// Half-open range between two positions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Range {
  pub start: Position,
  pub end:   Position,
}

impl Range {
  pub const fn new(start: Position, end: Position) -> Self {
    Self { start, end }
  }

  /// Zero-length range at `pos`.
  pub const fn point(pos: Position) -> Self {
    Self {
      start: pos,
      end:   pos,
    }
  }

  pub const fn is_single_line(&self) -> bool {
    self.start.line == self.end.line
  }
}

impl fmt::Display for Range {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}-{}", self.start, self.end)
  }
}

/// Coordinates the line map knows how to resolve into an [`Offset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionKind {
  Position(Position),
  Offset(Offset),
}

impl From<Position> for PositionKind {
  fn from(pos: Position) -> Self {
    Self::Position(pos)
  }
}

impl From<Offset> for PositionKind {
  fn from(offset: Offset) -> Self {
    Self::Offset(offset)
  }
}

/// Unit in which [`Position::character`] is counted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionEncoding {
  /// Bytes of UTF-8.
  #[default]
  #[serde(rename = "utf-8")]
  Utf8,
  /// UTF-16 code units, as used by LSP clients.
  #[serde(rename = "utf-16")]
  Utf16,
}

impl PositionEncoding {
  /// Width of `ch` in this encoding's code units.
  #[inline]
  pub const fn len_char(self, ch: char) -> usize {
    match self {
      Self::Utf8 => ch.len_utf8(),
      Self::Utf16 => ch.len_utf16(),
    }
  }
}
