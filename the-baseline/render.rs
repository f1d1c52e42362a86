//! Inline rendering of a document with its details.
//!
//! Text between details is copied into a pending buffer. When the distance
//! from the cursor to the next detail exceeds the context kept on both sides,
//! the pending buffer is flushed with a few lines of trailing context and a
//! skip notice, and a fresh buffer is opened a few lines before the detail.
//! Every flushed line is written behind the comment prefix so the baseline
//! stays a valid comment block.

use std::mem;

use the_core::{
  LineMap,
  Offset,
  split_lines,
};

use crate::{
  annotation::{
    GroupIds,
    Location,
  },
  detail::{
    Detail,
    DetailKind,
  },
  document::Document,
  options::RenderOptions,
};

/// Skip notice for documents whose line numbers are not worth pinning.
pub const NOISY_SKIP_NOTICE: &str = "--- (line: --) skipped ---";

pub fn skip_notice(line: usize) -> String {
  format!("--- (line: {line}) skipped ---")
}

/// Renders `document` with its ordered `details`.
///
/// Context ranges that open get a group id in `group_ids`; span starts
/// without an id of their own look theirs up there.
pub fn render_document(
  document: &Document,
  line_map: &LineMap,
  details: &[Detail],
  options: &RenderOptions,
  group_ids: &mut GroupIds,
) -> String {
  WindowedRenderer::new(document, line_map, options, group_ids).render(details)
}

struct RenderBuffer<'a> {
  text:           &'a str,
  line_map:       &'a LineMap,
  context_lines:  usize,
  comment_prefix: &'a str,
  noisy:          bool,
  /// Finished, prefixed output.
  output:         String,
  /// Literal text and tokens since the last flush.
  pending:        String,
  cursor:         Offset,
}

impl<'a> RenderBuffer<'a> {
  /// # Panics
  ///
  /// If `options.context_lines` is zero.
  fn new(document: &'a Document, line_map: &'a LineMap, options: &'a RenderOptions) -> Self {
    assert!(
      options.context_lines >= 1,
      "context_lines must be at least 1, got {}",
      options.context_lines
    );
    let mut output = String::with_capacity(document.text.len() + 64);
    output.push_str(&options.comment_prefix);
    output.push_str("=== ");
    output.push_str(&document.name);
    output.push_str(" ===");
    Self {
      text: &document.text,
      line_map,
      context_lines: options.context_lines,
      comment_prefix: &options.comment_prefix,
      noisy: options.is_noisy(&document.name),
      output,
      pending: String::new(),
      cursor: 0,
    }
  }

  fn slice(&self, start: Offset, end: Offset) -> &'a str {
    if start > end {
      return "";
    }
    self.text.get(start..end).unwrap_or("")
  }

  fn skip_notice(&self, line: usize) -> String {
    if self.noisy {
      NOISY_SKIP_NOTICE.to_string()
    } else {
      skip_notice(line)
    }
  }

  fn write(&mut self, text: &str) {
    self.pending.push_str(text);
  }

  /// Copies the text from the cursor up to `next` (or the end of the
  /// document), eliding it when it is longer than the surrounding context.
  ///
  /// The text inside a span is never elided: end details copy verbatim.
  fn advance(&mut self, next: Option<&Detail>) {
    if next.is_none_or(|detail| !detail.kind.is_end()) {
      let cursor_line = self.line_map.line_index_of(self.cursor);
      let target_line = match next {
        Some(detail) => self.line_map.line_index_of(detail.offset),
        None => self.line_map.last_line(),
      };

      let window = self.context_lines + 1;
      let mut reserved = 0;
      if !self.pending.is_empty() {
        reserved += window;
      }
      if next.is_some() {
        reserved += window;
      }

      if target_line.saturating_sub(cursor_line) > reserved {
        tracing::trace!(cursor_line, target_line, reserved, "eliding unannotated lines");
        if !self.pending.is_empty() {
          let resume = cursor_line + self.context_lines;
          let trailing = self.slice(self.cursor, self.line_map.line_start(resume));
          let mut block = mem::take(&mut self.pending);
          block.push_str(trailing);
          if !block.ends_with('\n') {
            block.push('\n');
          }
          block.push_str(&self.skip_notice(resume + 1));
          self.flush(&block);
          if next.is_some() {
            self.output.push('\n');
          }
        }
        if let Some(detail) = next {
          let first = target_line + 1 - self.context_lines;
          let notice = self.skip_notice(first);
          let leading = self.slice(self.line_map.line_start(first), detail.offset);
          self.pending.push_str(&notice);
          self.pending.push('\n');
          self.pending.push_str(leading);
        }
        return;
      }
    }

    let end = next.map_or(self.text.len(), |detail| detail.offset);
    let text = self.slice(self.cursor, end);
    self.pending.push_str(text);
  }

  /// Appends `block` to the output, one prefixed line per source line.
  fn flush(&mut self, block: &str) {
    self.output.push('\n');
    for (idx, line) in split_lines(block).enumerate() {
      if idx > 0 {
        self.output.push('\n');
      }
      self.output.push_str(self.comment_prefix);
      self.output.push_str(line);
    }
  }

  fn finish(mut self) -> String {
    if !self.pending.is_empty() {
      let block = mem::take(&mut self.pending);
      self.flush(&block);
    }
    self.output
  }
}

/// Walks a detail sequence over one document.
pub struct WindowedRenderer<'a> {
  buffer:          RenderBuffer<'a>,
  name:            &'a str,
  group_ids:       &'a mut GroupIds,
  /// Index of the end detail the marker is written after, when the marker
  /// coincides with a closing boundary.
  deferred_marker: Option<usize>,
}

impl<'a> WindowedRenderer<'a> {
  pub fn new(
    document: &'a Document,
    line_map: &'a LineMap,
    options: &'a RenderOptions,
    group_ids: &'a mut GroupIds,
  ) -> Self {
    Self {
      buffer: RenderBuffer::new(document, line_map, options),
      name: &document.name,
      group_ids,
      deferred_marker: None,
    }
  }

  pub fn render(mut self, details: &[Detail]) -> String {
    if details.is_empty() {
      let text = self.buffer.text;
      self.buffer.write(text);
      return self.buffer.finish();
    }

    for (index, detail) in details.iter().enumerate() {
      // Preferred layouts:
      //   /*MARKER*/[| some text |]
      //   [| some /*MARKER*/ text |]
      //   [| some text |]/*MARKER*/
      // Stable ordering gives the first two; the last needs the marker held
      // back until the closing token is written.
      if detail.kind == DetailKind::Marker
        && self.deferred_marker.is_none()
        && let Some(next) = details.get(index + 1)
        && next.offset == detail.offset
        && next.kind.is_end()
      {
        self.deferred_marker = Some(index + 1);
        continue;
      }

      self.buffer.advance(Some(detail));
      self.buffer.cursor = detail.offset;
      self.write_detail(details, index);

      if self.deferred_marker == Some(index) {
        self.deferred_marker = None;
        self.write_decorated(&details[index - 1]);
      }
    }

    self.buffer.advance(None);
    self.buffer.finish()
  }

  fn write_detail(&mut self, details: &[Detail], index: usize) {
    let detail = &details[index];
    match detail.kind {
      DetailKind::SpanStart => {},
      DetailKind::ContextStart => {
        self.write_decorated(detail);
        if let Some(range) = detail.span_range {
          let id = self.group_ids.assign(Location::new(self.name, range));
          tracing::trace!(id, %range, "assigned group id");
        }
        return;
      },
      _ => {
        self.write_decorated(detail);
        return;
      },
    }

    if let Some(prefix) = &detail.prefix {
      self.buffer.write(prefix);
    }
    self.buffer.write(&detail.token);
    let group_id = detail.group_id.or_else(|| {
      detail
        .span_range
        .and_then(|range| self.group_ids.get(&Location::new(self.name, range)))
    });
    if let Some(group_id) = group_id
      && !opens_inside_own_context(details, index)
    {
      self.buffer.write(&format!("{{ contextId: {group_id} |}}"));
    }
    if let Some(suffix) = &detail.suffix {
      self.buffer.write(suffix);
    }
  }

  fn write_decorated(&mut self, detail: &Detail) {
    if let Some(prefix) = &detail.prefix {
      self.buffer.write(prefix);
    }
    self.buffer.write(&detail.token);
    if let Some(suffix) = &detail.suffix {
      self.buffer.write(suffix);
    }
  }
}

/// Whether the span start at `index` directly follows the start of its own
/// context range, markers aside. The group id is redundant there.
fn opens_inside_own_context(details: &[Detail], index: usize) -> bool {
  let owner = details[index].owner;
  for detail in details[..index].iter().rev() {
    match detail.kind {
      DetailKind::Marker => continue,
      DetailKind::ContextStart => return detail.owner == owner,
      _ => return false,
    }
  }
  false
}
