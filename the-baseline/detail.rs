//! Orders a document's marker and span boundaries into render instructions.
//!
//! Each span contributes a start and an end detail (plus a context start/end
//! pair when it has an enclosing context range). Details are stably sorted by
//! offset, so at equal offsets they keep emission order: the marker first,
//! then each span's boundaries in the order the spans were given. That alone
//! yields `/*MARKER*/[|text|]` for a marker at a span's start; the renderer
//! handles the opposite case by deferring the marker past a coinciding end.

use the_core::{
  LineMap,
  Offset,
  Position,
  Range,
};

use crate::{
  annotation::{
    Decorations,
    Marker,
    Span,
  },
  document::Document,
  options::RenderOptions,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailKind {
  Marker,
  SpanStart,
  SpanEnd,
  ContextStart,
  ContextEnd,
}

impl DetailKind {
  pub const fn is_end(self) -> bool {
    matches!(self, Self::SpanEnd | Self::ContextEnd)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detail {
  pub kind:       DetailKind,
  pub position:   Position,
  pub offset:     Offset,
  pub token:      String,
  /// Index of the span this detail belongs to; `None` for the marker.
  pub owner:      Option<usize>,
  /// Range of the owning span.
  pub span_range: Option<Range>,
  pub group_id:   Option<u32>,
  pub prefix:     Option<String>,
  pub suffix:     Option<String>,
}

impl Detail {
  fn new(kind: DetailKind, position: Position, offset: Offset, token: &str) -> Self {
    Self {
      kind,
      position,
      offset,
      token: token.to_string(),
      owner: None,
      span_range: None,
      group_id: None,
      prefix: None,
      suffix: None,
    }
  }

  fn owned_by(mut self, owner: usize, span: &Span) -> Self {
    self.owner = Some(owner);
    self.span_range = Some(span.range);
    self
  }
}

/// Builds the ordered detail sequence for `document`.
///
/// Spans and a marker belonging to other documents are ignored.
///
/// # Panics
///
/// If more than one span starting at the marker's position carries a prefix:
/// the marker has a single prefix slot.
pub fn sequence_details(
  document: &Document,
  line_map: &LineMap,
  marker: Option<&Marker>,
  spans: &[Span],
  decorations: &Decorations<'_>,
  options: &RenderOptions,
) -> Vec<Detail> {
  let marker = marker.filter(|marker| marker.document == document.name);
  let mut details = Vec::with_capacity(1 + spans.len() * 2);

  if let Some(marker) = marker {
    details.push(Detail::new(
      DetailKind::Marker,
      marker.position,
      line_map.offset_of(marker.position),
      &marker.label,
    ));
  }

  for (owner, span) in spans
    .iter()
    .enumerate()
    .filter(|(_, span)| span.document == document.name)
  {
    let start = line_map.offset_of(span.range.start);
    let end = line_map.offset_of(span.range.end);
    debug_assert!(start <= end, "span {} ends before it starts", span.range);

    if let Some(context) = span.context {
      details.push(
        Detail::new(
          DetailKind::ContextStart,
          context.start,
          line_map.offset_of(context.start),
          &options.context_start,
        )
        .owned_by(owner, span),
      );
    }

    let mut span_start = Detail::new(
      DetailKind::SpanStart,
      span.range.start,
      start,
      &options.span_start,
    )
    .owned_by(owner, span);
    span_start.group_id = span.group_id;
    let mut span_end = Detail::new(DetailKind::SpanEnd, span.range.end, end, &options.span_end)
      .owned_by(owner, span);
    span_end.suffix = decorations.suffix_for(span);

    if let Some(prefix) = decorations.prefix_for(span) {
      match marker {
        // The prefix belongs in front of the marker so the output reads
        // `prefix/*MARKER*/[|` rather than `/*MARKER*/prefix[|`.
        Some(marker) if marker.position == span.range.start => {
          let slot = &mut details[0].prefix;
          assert!(
            slot.is_none(),
            "only one span prefix may be attached to the marker at {}",
            marker.position
          );
          *slot = Some(prefix);
        },
        _ => span_start.prefix = Some(prefix),
      }
    }

    details.push(span_start);
    details.push(span_end);

    if let Some(context) = span.context {
      details.push(
        Detail::new(
          DetailKind::ContextEnd,
          context.end,
          line_map.offset_of(context.end),
          &options.context_end,
        )
        .owned_by(owner, span),
      );
    }
  }

  details.sort_by_key(|detail| detail.offset);
  details
}

#[cfg(test)]
mod tests {
  use super::*;

  fn pos(line: u32, character: u32) -> Position {
    Position::new(line, character)
  }

  fn kinds(details: &[Detail]) -> Vec<(DetailKind, Offset)> {
    details.iter().map(|d| (d.kind, d.offset)).collect()
  }

  #[test]
  fn sorted_by_offset_with_marker_first_on_ties() {
    let doc = Document::new("/a.ts", "abcdef");
    let map = LineMap::new(&doc.text);
    let marker = Marker::named("/a.ts", pos(0, 3), "M");
    let spans = [Span::new("/a.ts", Range::new(pos(0, 3), pos(0, 5)))];
    let details = sequence_details(
      &doc,
      &map,
      Some(&marker),
      &spans,
      &Decorations::new(),
      &RenderOptions::default(),
    );
    assert_eq!(kinds(&details), vec![
      (DetailKind::Marker, 3),
      (DetailKind::SpanStart, 3),
      (DetailKind::SpanEnd, 5),
    ]);
    assert_eq!(details[0].token, "/*M*/");
  }

  #[test]
  fn other_documents_are_ignored() {
    let doc = Document::new("/a.ts", "abcdef");
    let map = LineMap::new(&doc.text);
    let marker = Marker::named("/b.ts", pos(0, 0), "M");
    let spans = [
      Span::new("/b.ts", Range::new(pos(0, 0), pos(0, 1))),
      Span::new("/a.ts", Range::new(pos(0, 1), pos(0, 2))),
    ];
    let details = sequence_details(
      &doc,
      &map,
      Some(&marker),
      &spans,
      &Decorations::new(),
      &RenderOptions::default(),
    );
    assert_eq!(kinds(&details), vec![
      (DetailKind::SpanStart, 1),
      (DetailKind::SpanEnd, 2),
    ]);
    assert_eq!(details[0].owner, Some(1));
  }

  #[test]
  fn prefix_moves_to_marker_at_span_start() {
    let doc = Document::new("/a.ts", "let x = 1;");
    let map = LineMap::new(&doc.text);
    let marker = Marker::named("/a.ts", pos(0, 4), "RENAME");
    let spans = [Span::new("/a.ts", Range::new(pos(0, 4), pos(0, 5)))];
    let decorations = Decorations::new()
      .with_prefix(|_| Some("y: ".to_string()))
      .with_suffix(|_| Some(" /*END*/".to_string()));
    let details = sequence_details(
      &doc,
      &map,
      Some(&marker),
      &spans,
      &decorations,
      &RenderOptions::default(),
    );
    assert_eq!(details[0].kind, DetailKind::Marker);
    assert_eq!(details[0].prefix.as_deref(), Some("y: "));
    assert_eq!(details[1].prefix, None);
    assert_eq!(details[2].suffix.as_deref(), Some(" /*END*/"));
  }

  #[test]
  #[should_panic(expected = "only one span prefix")]
  fn two_prefixes_on_marker_slot_panic() {
    let doc = Document::new("/a.ts", "abcdef");
    let map = LineMap::new(&doc.text);
    let marker = Marker::named("/a.ts", pos(0, 0), "M");
    let spans = [
      Span::new("/a.ts", Range::new(pos(0, 0), pos(0, 1))).with_prefix("p1"),
      Span::new("/a.ts", Range::new(pos(0, 0), pos(0, 2))).with_prefix("p2"),
    ];
    sequence_details(
      &doc,
      &map,
      Some(&marker),
      &spans,
      &Decorations::new(),
      &RenderOptions::default(),
    );
  }

  #[test]
  fn context_details_wrap_the_span() {
    let doc = Document::new("/a.ts", "const x = 1;");
    let map = LineMap::new(&doc.text);
    let spans = [Span::new("/a.ts", Range::new(pos(0, 6), pos(0, 7)))
      .with_context(Range::new(pos(0, 0), pos(0, 12)))];
    let details = sequence_details(
      &doc,
      &map,
      None,
      &spans,
      &Decorations::new(),
      &RenderOptions::default(),
    );
    assert_eq!(kinds(&details), vec![
      (DetailKind::ContextStart, 0),
      (DetailKind::SpanStart, 6),
      (DetailKind::SpanEnd, 7),
      (DetailKind::ContextEnd, 12),
    ]);
  }
}
