//! Tooltip blocks inserted under marker lines.
//!
//! Each document is split into lines once; blocks are spliced into that line
//! array from the bottom-most marker up, so every insertion lands below the
//! markers still waiting to be processed and their line indices stay valid.

use std::cmp::Ordering;

use indexmap::IndexMap;
use the_core::{
  Position,
  Range,
  split_lines,
};

use crate::{
  annotation::Marker,
  document::DocumentStore,
  options::RenderOptions,
};

const RULE_WIDTH: usize = 70;

/// A marker and whatever the analysis produced there, if anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerItem<T> {
  pub marker: Marker,
  pub item:   Option<T>,
}

impl<T> MarkerItem<T> {
  pub fn new(marker: Marker, item: Option<T>) -> Self {
    Self { marker, item }
  }
}

fn rule() -> String {
  format!("| {}", "-".repeat(RULE_WIDTH))
}

fn underline(range: Range) -> String {
  let start = range.start.character as usize;
  let width = range.end.character.saturating_sub(range.start.character) as usize;
  format!("{}{}", " ".repeat(start), "^".repeat(width))
}

fn by_document_then_bottom_up<T>(a: &MarkerItem<T>, b: &MarkerItem<T>) -> Ordering {
  a.marker
    .document
    .cmp(&b.marker.document)
    .then_with(|| b.marker.position.cmp(&a.marker.position))
}

/// Renders every document holding a marker with a tooltip block below each
/// marker line.
///
/// `get_range` picks the underlined range for an item; without one the single
/// character after the marker is underlined. `tooltip_lines` formats an item
/// given the item formatted just before it. Markers with no item, or whose
/// item formats to nothing, get a `No <op_name> at <label>.` line. Lines are
/// written behind the configured comment prefix.
///
/// # Panics
///
/// If an underlined range spans more than one line.
pub fn annotate_with_tooltips<T>(
  store: &dyn DocumentStore,
  items: &[MarkerItem<T>],
  op_name: &str,
  options: &RenderOptions,
  get_range: impl Fn(&T) -> Option<Range>,
  tooltip_lines: impl Fn(&T, Option<&T>) -> Vec<String>,
) -> String {
  let mut sorted: Vec<&MarkerItem<T>> = items.iter().collect();
  sorted.sort_by(|a, b| by_document_then_bottom_up(a, b));

  let mut documents: IndexMap<&str, Vec<String>> = IndexMap::new();
  let mut previous: Option<&T> = None;
  for MarkerItem { marker, item } in sorted {
    let name = marker.document.as_str();
    if !documents.contains_key(name) {
      let Some(text) = store.read(name) else {
        tracing::debug!(name, "skipping tooltips for unreadable document");
        continue;
      };
      documents.insert(name, split_lines(&text).map(str::to_string).collect());
    }

    let range = item.as_ref().and_then(&get_range).unwrap_or_else(|| {
      let end = Position::new(marker.position.line, marker.position.character + 1);
      Range::new(marker.position, end)
    });
    assert!(
      range.is_single_line(),
      "tooltip range {range} for {} must lie on a single line",
      marker.label
    );

    let mut body = item
      .as_ref()
      .map(|item| tooltip_lines(item, previous))
      .unwrap_or_default();
    if body.is_empty() {
      body.push(format!("No {op_name} at {}.", marker.label));
    }

    let mut block = Vec::with_capacity(body.len() + 3);
    block.push(underline(range));
    block.push(rule());
    block.extend(body.into_iter().map(|line| format!("| {line}")));
    block.push(rule());

    if let Some(lines) = documents.get_mut(name) {
      let at = (range.start.line as usize + 1).min(lines.len());
      lines.splice(at..at, block);
    }
    previous = item.as_ref();
  }

  let mut out = String::new();
  for (idx, (name, lines)) in documents.iter().enumerate() {
    if idx > 0 {
      out.push('\n');
    }
    out.push_str(&format!("=== {name} ===\n"));
    for line in lines {
      out.push_str(&options.comment_prefix);
      out.push_str(line);
      out.push('\n');
    }
  }
  out
}
