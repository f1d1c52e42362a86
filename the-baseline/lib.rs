//! Annotated source baselines.
//!
//! Renders documents together with position-tagged annotations (a marker and
//! any number of spans) into deterministic, comment-prefixed text meant to be
//! stored as a golden file and diffed on later runs.
//!
//! The pieces, leaves first:
//!
//! - [`detail`] orders markers and span boundaries into a detail sequence.
//! - [`render`] walks that sequence over the document text, eliding long
//!   unannotated stretches.
//! - [`tooltip`] inserts tooltip blocks under marker lines.
//! - [`locations`] renders spans spread over a whole [`DocumentStore`].
//! - [`store`] aggregates rendered output per command for one test case.

pub mod annotation;
pub mod detail;
pub mod document;
pub mod locations;
pub mod options;
pub mod render;
pub mod store;
pub mod tooltip;

pub use annotation::{
  Decorations,
  GroupIds,
  Location,
  Marker,
  Span,
};
pub use document::{
  DirStore,
  Document,
  DocumentStore,
  MemoryStore,
  StoreError,
};
pub use locations::{
  BaselineRenderer,
  RenderError,
};
pub use options::{
  ConfigError,
  NoisyPattern,
  RenderOptions,
};
pub use store::BaselineStore;
pub use the_core::{
  Offset,
  Position,
  PositionEncoding,
  Range,
};
pub use tooltip::{
  MarkerItem,
  annotate_with_tooltips,
};
