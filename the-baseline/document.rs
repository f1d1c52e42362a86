//! Documents and the stores they are read from.

use std::{
  collections::BTreeMap,
  io,
  path::{
    Path,
    PathBuf,
  },
};

use ignore::WalkBuilder;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
  pub name: String,
  pub text: String,
}

impl Document {
  pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      text: text.into(),
    }
  }
}

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("failed to walk documents under {}: {source}", root.display())]
  Walk {
    root:   PathBuf,
    source: ignore::Error,
  },
}

/// Read-only view of the documents a rendering may reference.
pub trait DocumentStore {
  /// Text of `name`, or `None` if the document does not exist (yet).
  fn read(&self, name: &str) -> Option<String>;

  /// Every document name, in a deterministic order.
  fn walk(&self) -> Result<Vec<String>, StoreError>;

  fn document(&self, name: &str) -> Option<Document> {
    self.read(name).map(|text| Document::new(name, text))
  }
}

/// Documents held in memory, walked in name order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  documents: BTreeMap<String, String>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) -> Option<String> {
    self.documents.insert(name.into(), text.into())
  }

  pub fn with(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
    self.insert(name, text);
    self
  }

  pub fn remove(&mut self, name: &str) -> Option<String> {
    self.documents.remove(name)
  }

  pub fn len(&self) -> usize {
    self.documents.len()
  }

  pub fn is_empty(&self) -> bool {
    self.documents.is_empty()
  }
}

impl<N: Into<String>, T: Into<String>> FromIterator<(N, T)> for MemoryStore {
  fn from_iter<I: IntoIterator<Item = (N, T)>>(iter: I) -> Self {
    Self {
      documents: iter
        .into_iter()
        .map(|(name, text)| (name.into(), text.into()))
        .collect(),
    }
  }
}

impl DocumentStore for MemoryStore {
  fn read(&self, name: &str) -> Option<String> {
    self.documents.get(name).cloned()
  }

  fn walk(&self) -> Result<Vec<String>, StoreError> {
    Ok(self.documents.keys().cloned().collect())
  }
}

/// Documents on disk below `root`.
///
/// Names are root-relative with `/` separators and a leading `/`, so
/// `root/src/a.ts` is the document `/src/a.ts`.
#[derive(Debug, Clone)]
pub struct DirStore {
  root: PathBuf,
}

impl DirStore {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  fn path_of(&self, name: &str) -> PathBuf {
    self.root.join(name.trim_start_matches('/'))
  }

  fn name_of(&self, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(&self.root).ok()?;
    let mut name = String::new();
    for component in relative.components() {
      name.push('/');
      name.push_str(&component.as_os_str().to_string_lossy());
    }
    Some(name)
  }
}

impl DocumentStore for DirStore {
  fn read(&self, name: &str) -> Option<String> {
    match std::fs::read_to_string(self.path_of(name)) {
      Ok(text) => Some(text),
      Err(err) => {
        tracing::debug!(%err, name, "document is not readable");
        None
      },
    }
  }

  fn walk(&self) -> Result<Vec<String>, StoreError> {
    let walker = WalkBuilder::new(&self.root)
      .standard_filters(false)
      .sort_by_file_name(|a, b| a.cmp(b))
      .build();

    let mut names = Vec::new();
    for entry in walker {
      let entry = match entry {
        Ok(entry) => entry,
        // A directory vanishing mid-walk ends the walk with what was found.
        Err(err) if err.io_error().map(io::Error::kind) == Some(io::ErrorKind::NotFound) => {
          tracing::debug!(%err, root = %self.root.display(), "document walk hit a missing path");
          break;
        },
        Err(source) => {
          return Err(StoreError::Walk {
            root: self.root.clone(),
            source,
          });
        },
      };
      if !entry.file_type().is_some_and(|ty| ty.is_file()) {
        continue;
      }
      if let Some(name) = self.name_of(entry.path()) {
        names.push(name);
      }
    }
    Ok(names)
  }
}
