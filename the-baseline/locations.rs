//! Rendering spans spread over the documents of a store.

use indexmap::IndexSet;
use the_core::LineMap;
use thiserror::Error;

use crate::{
  annotation::{
    Decorations,
    GroupIds,
    Marker,
    Span,
  },
  detail::sequence_details,
  document::{
    Document,
    DocumentStore,
    StoreError,
  },
  options::RenderOptions,
  render::render_document,
};

#[derive(Debug, Error)]
pub enum RenderError {
  #[error(transparent)]
  Store(#[from] StoreError),
}

pub type Result<T, E = RenderError> = std::result::Result<T, E>;

/// Renders documents with one optional marker and a set of spans.
///
/// Group ids handed out to context ranges are kept across calls, so later
/// renderings of the same spans show them.
///
/// ```
/// use the_baseline::{BaselineRenderer, Document, Marker, Position, Range, Span};
///
/// let doc = Document::new("/a.ts", "let x = 1;");
/// let mut renderer = BaselineRenderer::default()
///   .with_marker(Marker::named("/a.ts", Position::new(0, 4), "1"));
/// let span = Span::new("/a.ts", Range::new(Position::new(0, 4), Position::new(0, 5)));
/// assert_eq!(
///   renderer.render_document(&doc, &[span]),
///   "// === /a.ts ===\n// let /*1*/[|x|] = 1;"
/// );
/// ```
#[derive(Debug, Default)]
pub struct BaselineRenderer<'a> {
  options:     RenderOptions,
  marker:      Option<Marker>,
  decorations: Decorations<'a>,
  group_ids:   GroupIds,
}

impl<'a> BaselineRenderer<'a> {
  pub fn new(options: RenderOptions) -> Self {
    Self {
      options,
      marker: None,
      decorations: Decorations::new(),
      group_ids: GroupIds::new(),
    }
  }

  pub fn with_marker(mut self, marker: Marker) -> Self {
    self.marker = Some(marker);
    self
  }

  pub fn with_decorations(mut self, decorations: Decorations<'a>) -> Self {
    self.decorations = decorations;
    self
  }

  /// Seeds the ids of spans rendered earlier.
  pub fn with_group_ids(mut self, group_ids: GroupIds) -> Self {
    self.group_ids = group_ids;
    self
  }

  pub fn group_ids(&self) -> &GroupIds {
    &self.group_ids
  }

  pub fn options(&self) -> &RenderOptions {
    &self.options
  }

  pub fn marker(&self) -> Option<&Marker> {
    self.marker.as_ref()
  }

  /// Renders one document. Spans and a marker in other documents are ignored.
  pub fn render_document(&mut self, document: &Document, spans: &[Span]) -> String {
    let line_map = LineMap::with_encoding(&document.text, self.options.encoding);
    let details = sequence_details(
      document,
      &line_map,
      self.marker.as_ref(),
      spans,
      &self.decorations,
      &self.options,
    );
    render_document(
      document,
      &line_map,
      &details,
      &self.options,
      &mut self.group_ids,
    )
  }

  /// Renders every document of `store` that `spans` touch, in walk order.
  ///
  /// The marker's document is always shown: when no span lands in it, it is
  /// appended with the marker alone. Documents the store cannot read are
  /// skipped.
  pub fn render_locations(&mut self, store: &dyn DocumentStore, spans: &[Span]) -> Result<String> {
    let referenced: IndexSet<&str> = spans.iter().map(|span| span.document.as_str()).collect();
    let marker_document = self.marker.as_ref().map(|marker| marker.document.clone());

    let mut found_marker = false;
    let mut blocks = Vec::new();
    for name in store.walk()? {
      if !referenced.contains(name.as_str()) {
        continue;
      }
      let Some(document) = store.document(&name) else {
        tracing::debug!(name, "skipping unreadable document");
        continue;
      };
      if marker_document.as_deref() == Some(name.as_str()) {
        found_marker = true;
      }
      blocks.push(self.render_document(&document, spans));
    }

    if !found_marker && let Some(name) = marker_document.as_deref() {
      match store.document(name) {
        Some(document) => blocks.push(self.render_document(&document, &[])),
        None => tracing::debug!(name, "marker document is not readable"),
      }
    }

    Ok(blocks.join("\n\n"))
  }
}

#[cfg(test)]
mod tests {
  use std::io;

  use the_core::{
    Position,
    Range,
  };

  use super::*;
  use crate::document::MemoryStore;

  /// Lists documents it cannot read, or fails to list anything.
  struct FlakyStore {
    inner:     MemoryStore,
    listed:    Vec<String>,
    fail_walk: bool,
  }

  impl DocumentStore for FlakyStore {
    fn read(&self, name: &str) -> Option<String> {
      self.inner.read(name)
    }

    fn walk(&self) -> std::result::Result<Vec<String>, StoreError> {
      if self.fail_walk {
        return Err(StoreError::Walk {
          root:   "/x".into(),
          source: ignore::Error::Io(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "permission denied",
          )),
        });
      }
      Ok(self.listed.clone())
    }
  }

  fn span(document: &str, line: u32, start: u32, end: u32) -> Span {
    Span::new(
      document,
      Range::new(Position::new(line, start), Position::new(line, end)),
    )
  }

  fn store() -> MemoryStore {
    MemoryStore::new()
      .with("/b.ts", "import { x } from './a';\nx;")
      .with("/a.ts", "export const x = 1;")
      .with("/c.ts", "// unrelated")
  }

  #[test]
  fn documents_render_in_walk_order() {
    let mut renderer = BaselineRenderer::default();
    let out = renderer
      .render_locations(&store(), &[span("/b.ts", 1, 0, 1), span("/a.ts", 0, 13, 14)])
      .unwrap();
    assert_eq!(
      out,
      "// === /a.ts ===\n// export const [|x|] = 1;\n\n// === /b.ts ===\n// import { x } from './a';\n// [|x|];"
    );
  }

  #[test]
  fn marker_document_without_spans_is_appended() {
    let mut renderer =
      BaselineRenderer::default().with_marker(Marker::named("/c.ts", Position::new(0, 3), "1"));
    let out = renderer
      .render_locations(&store(), &[span("/a.ts", 0, 13, 14)])
      .unwrap();
    assert_eq!(
      out,
      "// === /a.ts ===\n// export const [|x|] = 1;\n\n// === /c.ts ===\n// // /*1*/unrelated"
    );
  }

  #[test]
  fn marker_document_with_spans_is_not_repeated() {
    let mut renderer =
      BaselineRenderer::default().with_marker(Marker::named("/a.ts", Position::new(0, 13), "1"));
    let out = renderer
      .render_locations(&store(), &[span("/a.ts", 0, 13, 14)])
      .unwrap();
    assert_eq!(out, "// === /a.ts ===\n// export const /*1*/[|x|] = 1;");
  }

  #[test]
  fn spans_in_unknown_documents_are_dropped() {
    let mut renderer = BaselineRenderer::default();
    let out = renderer
      .render_locations(&store(), &[span("/gone.ts", 0, 0, 1)])
      .unwrap();
    assert_eq!(out, "");
  }

  #[test]
  fn decorations_apply_to_every_document() {
    let mut renderer = BaselineRenderer::default().with_decorations(
      Decorations::new().with_suffix(|location| Some(format!("/*{}*/", location.document))),
    );
    let out = renderer
      .render_locations(&store(), &[span("/a.ts", 0, 13, 14)])
      .unwrap();
    assert_eq!(out, "// === /a.ts ===\n// export const [|x|]/*/a.ts*/ = 1;");
  }

  #[test]
  fn walk_failures_are_errors() {
    let store = FlakyStore {
      inner:     store(),
      listed:    Vec::new(),
      fail_walk: true,
    };
    let err = BaselineRenderer::default()
      .render_locations(&store, &[span("/a.ts", 0, 0, 1)])
      .unwrap_err();
    assert!(matches!(err, RenderError::Store(StoreError::Walk { .. })));
    assert!(err.to_string().contains("permission denied"));
  }

  #[test]
  fn listed_but_unreadable_documents_are_skipped() {
    let store = FlakyStore {
      inner:     MemoryStore::new().with("/a.ts", "abc"),
      listed:    vec!["/a.ts".to_string(), "/gone.ts".to_string()],
      fail_walk: false,
    };
    let out = BaselineRenderer::default()
      .render_locations(&store, &[span("/a.ts", 0, 0, 1), span("/gone.ts", 0, 0, 1)])
      .unwrap();
    assert_eq!(out, "// === /a.ts ===\n// [|a|]bc");
  }

  #[test]
  fn group_ids_carry_over_between_renderings() {
    let context = Range::new(Position::new(0, 0), Position::new(0, 19));
    let mut renderer = BaselineRenderer::default();
    let first = renderer
      .render_locations(&store(), &[span("/a.ts", 0, 13, 14).with_context(context)])
      .unwrap();
    assert_eq!(first, "// === /a.ts ===\n// <|export const [|x|] = 1;|>");
    assert_eq!(renderer.group_ids().len(), 1);

    let second = renderer
      .render_locations(&store(), &[span("/a.ts", 0, 13, 14)])
      .unwrap();
    assert_eq!(second, "// === /a.ts ===\n// export const [|{ contextId: 0 |}x|] = 1;");
  }
}
