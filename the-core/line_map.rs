//! Line-start index over a document's text.
//!
//! The map is computed once per document and answers the three questions the
//! renderer asks while walking annotations: where does a line/character pair
//! land in the text, which line contains a byte offset, and where does each
//! line start.

use ropey::Rope;

use crate::position::{
  Offset,
  Position,
  PositionEncoding,
  PositionKind,
};

#[derive(Debug, Clone)]
pub struct LineMap {
  text:        Rope,
  line_starts: Vec<Offset>,
  encoding:    PositionEncoding,
}

impl LineMap {
  pub fn new(text: &str) -> Self {
    Self::with_encoding(text, PositionEncoding::default())
  }

  pub fn with_encoding(text: &str, encoding: PositionEncoding) -> Self {
    let text = Rope::from_str(text);
    let line_starts = (0..text.len_lines())
      .map(|line| text.line_to_byte(line))
      .collect();
    Self {
      text,
      line_starts,
      encoding,
    }
  }

  pub fn encoding(&self) -> PositionEncoding {
    self.encoding
  }

  /// Byte offset of the start of every line, ascending. Never empty.
  pub fn line_starts(&self) -> &[Offset] {
    &self.line_starts
  }

  pub fn line_count(&self) -> usize {
    self.line_starts.len()
  }

  /// Index of the last line. A trailing line ending opens an empty last line.
  pub fn last_line(&self) -> usize {
    self.line_starts.len() - 1
  }

  pub fn len_bytes(&self) -> usize {
    self.text.len_bytes()
  }

  /// Start of `line`, or the end of the text past the last line.
  pub fn line_start(&self, line: usize) -> Offset {
    self
      .line_starts
      .get(line)
      .copied()
      .unwrap_or_else(|| self.len_bytes())
  }

  /// End of `line` including its line ending.
  fn line_end(&self, line: usize) -> Offset {
    self.line_start(line + 1)
  }

  /// Resolves a coordinate to a byte offset.
  ///
  /// Lines past the end clamp to the last line and characters past the end of
  /// a line clamp to the line's end. The result is always a char boundary.
  pub fn offset_of(&self, at: impl Into<PositionKind>) -> Offset {
    match at.into() {
      PositionKind::Offset(offset) => self.floor_char_boundary(offset),
      PositionKind::Position(pos) => self.position_to_offset(pos),
    }
  }

  fn position_to_offset(&self, pos: Position) -> Offset {
    let line = (pos.line as usize).min(self.last_line());
    let start = self.line_starts[line];
    let end = self.line_end(line);
    let target = pos.character as usize;

    let mut units = 0usize;
    let mut offset = start;
    for ch in self.text.byte_slice(start..end).chars() {
      let next = units.saturating_add(self.encoding.len_char(ch));
      if next > target {
        break;
      }
      units = next;
      offset += ch.len_utf8();
    }
    offset
  }

  /// Zero-based index of the line containing `offset`.
  pub fn line_index_of(&self, offset: Offset) -> usize {
    self
      .line_starts
      .partition_point(|&start| start <= offset)
      .saturating_sub(1)
  }

  /// Inverse of [`LineMap::offset_of`] for offsets on char boundaries.
  pub fn position_of(&self, offset: Offset) -> Position {
    let offset = self.floor_char_boundary(offset);
    let line = self.line_index_of(offset);
    let start = self.line_starts[line];
    let character: usize = self
      .text
      .byte_slice(start..offset)
      .chars()
      .map(|ch| self.encoding.len_char(ch))
      .sum();
    Position::new(line as u32, character as u32)
  }

  fn floor_char_boundary(&self, offset: Offset) -> Offset {
    let offset = offset.min(self.len_bytes());
    self.text.char_to_byte(self.text.byte_to_char(offset))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn line_starts_follow_line_feeds() {
    let map = LineMap::new("ab\ncd\r\n\nef");
    assert_eq!(map.line_starts(), &[0, 3, 7, 8]);
    assert_eq!(map.last_line(), 3);
  }

  #[test]
  fn trailing_newline_opens_empty_line() {
    let map = LineMap::new("a\n");
    assert_eq!(map.line_starts(), &[0, 2]);
    assert_eq!(LineMap::new("").line_starts(), &[0]);
  }

  #[test]
  fn utf8_positions_count_bytes() {
    let map = LineMap::new("héllo\nwörld");
    assert_eq!(map.offset_of(Position::new(0, 3)), 3);
    assert_eq!(map.offset_of(Position::new(1, 3)), 10);
    // Inside a multi-byte char rounds down to its start.
    assert_eq!(map.offset_of(Position::new(0, 2)), 1);
  }

  #[test]
  fn utf16_positions_count_code_units() {
    let map = LineMap::with_encoding("a🦀b\nc", PositionEncoding::Utf16);
    assert_eq!(map.offset_of(Position::new(0, 1)), 1);
    assert_eq!(map.offset_of(Position::new(0, 3)), 5);
    assert_eq!(map.offset_of(Position::new(1, 1)), 8);
    assert_eq!(map.position_of(5), Position::new(0, 3));
  }

  #[test]
  fn positions_clamp() {
    let map = LineMap::new("abc\nde");
    assert_eq!(map.offset_of(Position::new(0, 99)), 4);
    assert_eq!(map.offset_of(Position::new(7, 1)), 5);
    assert_eq!(map.offset_of(PositionKind::Offset(100)), 6);
  }

  #[test]
  fn line_index_of_offsets() {
    let map = LineMap::new("abc\nde\nf");
    assert_eq!(map.line_index_of(0), 0);
    assert_eq!(map.line_index_of(3), 0);
    assert_eq!(map.line_index_of(4), 1);
    assert_eq!(map.line_index_of(7), 2);
    assert_eq!(map.line_index_of(50), 2);
  }

  quickcheck::quickcheck! {
      fn offsets_survive_position_conversion(text: String, seed: usize, utf16: bool) -> bool {
          let encoding = if utf16 { PositionEncoding::Utf16 } else { PositionEncoding::Utf8 };
          let map = LineMap::with_encoding(&text, encoding);
          let offset = map.offset_of(PositionKind::Offset(seed % (text.len() + 1)));
          map.offset_of(map.position_of(offset)) == offset
      }
  }
}
