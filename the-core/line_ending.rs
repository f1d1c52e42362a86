#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum LineEnding {
  /// CarriageReturn followed by LineFeed.
  Crlf,

  /// U+000A -- LineFeed
  LF,

  #[cfg(feature = "unicode-lines")]
  /// U+000B -- VerticalTab
  VT,

  #[cfg(feature = "unicode-lines")]
  /// U+000C -- FormFeed
  FF,

  #[cfg(feature = "unicode-lines")]
  /// U+000D -- CarriageReturn
  CR,

  #[cfg(feature = "unicode-lines")]
  /// U+0085 -- NextLine
  Nel,

  /// U+2028 -- Line Separator
  #[cfg(feature = "unicode-lines")]
  LS,

  /// U+2029 -- ParagraphSeparator
  #[cfg(feature = "unicode-lines")]
  PS,
}

impl LineEnding {
  #[inline]
  pub const fn as_str(&self) -> &'static str {
    match self {
      Self::Crlf => "\u{000D}\u{000A}",
      Self::LF => "\u{000A}",
      #[cfg(feature = "unicode-lines")]
      Self::VT => "\u{000B}",
      #[cfg(feature = "unicode-lines")]
      Self::FF => "\u{000C}",
      #[cfg(feature = "unicode-lines")]
      Self::CR => "\u{000D}",
      #[cfg(feature = "unicode-lines")]
      Self::Nel => "\u{0085}",
      #[cfg(feature = "unicode-lines")]
      Self::LS => "\u{2028}",
      #[cfg(feature = "unicode-lines")]
      Self::PS => "\u{2029}",
    }
  }

  /// Length in bytes.
  #[inline]
  pub const fn len_bytes(&self) -> usize {
    self.as_str().len()
  }

  /// Line ending that starts at byte `idx` of `text`, if any.
  ///
  /// Without the `unicode-lines` feature a lone `\r` is ordinary text, which
  /// keeps line numbering in step with the `\r?\n` split used when writing
  /// baselines.
  pub fn at(text: &str, idx: usize) -> Option<LineEnding> {
    let rest = text.get(idx..)?;
    if rest.starts_with("\u{000D}\u{000A}") {
      return Some(Self::Crlf);
    }
    match rest.chars().next()? {
      '\u{000A}' => Some(Self::LF),
      #[cfg(feature = "unicode-lines")]
      '\u{000B}' => Some(Self::VT),
      #[cfg(feature = "unicode-lines")]
      '\u{000C}' => Some(Self::FF),
      #[cfg(feature = "unicode-lines")]
      '\u{000D}' => Some(Self::CR),
      #[cfg(feature = "unicode-lines")]
      '\u{0085}' => Some(Self::Nel),
      #[cfg(feature = "unicode-lines")]
      '\u{2028}' => Some(Self::LS),
      #[cfg(feature = "unicode-lines")]
      '\u{2029}' => Some(Self::PS),
      _ => None,
    }
  }
}

/// Splits `text` into lines, dropping the line endings.
///
/// Unlike [`str::lines`], a trailing line ending yields a final empty line, so
/// the number of items always equals the number of line starts.
pub fn split_lines(text: &str) -> SplitLines<'_> {
  SplitLines {
    text,
    pos: 0,
    done: false,
  }
}

#[derive(Debug, Clone)]
pub struct SplitLines<'a> {
  text: &'a str,
  pos:  usize,
  done: bool,
}

impl<'a> Iterator for SplitLines<'a> {
  type Item = &'a str;

  fn next(&mut self) -> Option<Self::Item> {
    if self.done {
      return None;
    }
    let start = self.pos;
    for (idx, _) in self.text[start..].char_indices() {
      let idx = start + idx;
      if let Some(ending) = LineEnding::at(self.text, idx) {
        self.pos = idx + ending.len_bytes();
        return Some(&self.text[start..idx]);
      }
    }
    self.done = true;
    Some(&self.text[start..])
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn split_keeps_trailing_empty_line() {
    let lines: Vec<_> = split_lines("a\nb\n").collect();
    assert_eq!(lines, vec!["a", "b", ""]);
  }

  #[test]
  fn split_empty_text() {
    let lines: Vec<_> = split_lines("").collect();
    assert_eq!(lines, vec![""]);
  }

  #[test]
  fn split_crlf() {
    let lines: Vec<_> = split_lines("one\r\ntwo\nthree").collect();
    assert_eq!(lines, vec!["one", "two", "three"]);
  }

  #[cfg(not(feature = "unicode-lines"))]
  #[test]
  fn lone_carriage_return_is_text() {
    let lines: Vec<_> = split_lines("a\rb").collect();
    assert_eq!(lines, vec!["a\rb"]);
  }
}
