use indexmap::IndexMap;
use the_core::{
  Position,
  Range,
};

/// A document and a range inside it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
  pub document: String,
  pub range:    Range,
}

impl Location {
  pub fn new(document: impl Into<String>, range: Range) -> Self {
    Self {
      document: document.into(),
      range,
    }
  }
}

/// The point annotation of a rendering pass.
///
/// `label` is written into the output verbatim, so it normally carries its own
/// comment syntax (`/*RENAME*/`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
  pub document: String,
  pub position: Position,
  pub label:    String,
}

impl Marker {
  pub fn new(document: impl Into<String>, position: Position, label: impl Into<String>) -> Self {
    Self {
      document: document.into(),
      position,
      label: label.into(),
    }
  }

  /// Marker labelled `/*name*/`.
  pub fn named(document: impl Into<String>, position: Position, name: &str) -> Self {
    Self::new(document, position, format!("/*{name}*/"))
  }
}

/// A bracketed range.
///
/// `context` is an optional enclosing range (a whole declaration around the
/// name being renamed, say) rendered with its own tokens around the span.
/// `group_id` pins the id written after the opening token; without it the id
/// is looked up in the renderer's [`GroupIds`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
  pub document: String,
  pub range:    Range,
  pub context:  Option<Range>,
  pub group_id: Option<u32>,
  pub prefix:   Option<String>,
  pub suffix:   Option<String>,
}

impl Span {
  pub fn new(document: impl Into<String>, range: Range) -> Self {
    Self {
      document: document.into(),
      range,
      context: None,
      group_id: None,
      prefix: None,
      suffix: None,
    }
  }

  pub fn with_context(mut self, context: Range) -> Self {
    self.context = Some(context);
    self
  }

  pub fn with_group_id(mut self, group_id: u32) -> Self {
    self.group_id = Some(group_id);
    self
  }

  pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
    self.prefix = Some(prefix.into());
    self
  }

  pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
    self.suffix = Some(suffix.into());
    self
  }

  pub fn location(&self) -> Location {
    Location::new(self.document.clone(), self.range)
  }
}

/// Group ids of spans that have been rendered with a context range, keyed by
/// span location. Ids are handed out in the order context ranges open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupIds {
  ids: IndexMap<Location, u32>,
}

impl GroupIds {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, location: &Location) -> Option<u32> {
    self.ids.get(location).copied()
  }

  pub fn insert(&mut self, location: Location, id: u32) -> Option<u32> {
    self.ids.insert(location, id)
  }

  /// Id of `location`, assigning the next one on first sight.
  pub fn assign(&mut self, location: Location) -> u32 {
    let next = self.ids.len() as u32;
    *self.ids.entry(location).or_insert(next)
  }

  pub fn len(&self) -> usize {
    self.ids.len()
  }

  pub fn is_empty(&self) -> bool {
    self.ids.is_empty()
  }
}

pub type DecorationFn<'a> = dyn Fn(&Location) -> Option<String> + 'a;

/// Generators for text written before a span opens and after it closes.
///
/// A span's own `prefix`/`suffix` wins over the generated text.
#[derive(Default)]
pub struct Decorations<'a> {
  prefix: Option<Box<DecorationFn<'a>>>,
  suffix: Option<Box<DecorationFn<'a>>>,
}

impl<'a> Decorations<'a> {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_prefix(mut self, prefix: impl Fn(&Location) -> Option<String> + 'a) -> Self {
    self.prefix = Some(Box::new(prefix));
    self
  }

  pub fn with_suffix(mut self, suffix: impl Fn(&Location) -> Option<String> + 'a) -> Self {
    self.suffix = Some(Box::new(suffix));
    self
  }

  pub(crate) fn prefix_for(&self, span: &Span) -> Option<String> {
    span
      .prefix
      .clone()
      .or_else(|| self.prefix.as_ref().and_then(|prefix| prefix(&span.location())))
  }

  pub(crate) fn suffix_for(&self, span: &Span) -> Option<String> {
    span
      .suffix
      .clone()
      .or_else(|| self.suffix.as_ref().and_then(|suffix| suffix(&span.location())))
  }
}

impl std::fmt::Debug for Decorations<'_> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Decorations")
      .field("prefix", &self.prefix.is_some())
      .field("suffix", &self.suffix.is_some())
      .finish()
  }
}
