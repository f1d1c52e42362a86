use std::{
  fmt,
  path::Path,
};

use regex::Regex;
use serde::{
  Deserialize,
  Deserializer,
  Serialize,
  Serializer,
  de,
};
use the_core::PositionEncoding;
use thiserror::Error;

pub const DEFAULT_CONTEXT_LINES: usize = 4;
pub const DEFAULT_COMMENT_PREFIX: &str = "// ";
pub const DEFAULT_SPAN_START: &str = "[|";
pub const DEFAULT_SPAN_END: &str = "|]";
pub const DEFAULT_CONTEXT_START: &str = "<|";
pub const DEFAULT_CONTEXT_END: &str = "|>";
pub const DEFAULT_NOISY_PATTERN: &str = r"lib.*\.d\.ts$";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read render options from {path}: {source}")]
  Io {
    path:   String,
    source: std::io::Error,
  },
  #[error("invalid render options: {0}")]
  Parse(#[from] toml::de::Error),
  #[error("context-lines must be at least 1, got {0}")]
  ContextLines(usize),
}

/// File-name pattern marking library documents whose skip notices drop line
/// numbers.
#[derive(Debug, Clone)]
pub struct NoisyPattern(Regex);

impl NoisyPattern {
  pub fn new(pattern: &str) -> Result<Self, regex::Error> {
    Regex::new(pattern).map(Self)
  }

  pub fn is_match(&self, name: &str) -> bool {
    self.0.is_match(name)
  }

  pub fn as_str(&self) -> &str {
    self.0.as_str()
  }
}

impl Default for NoisyPattern {
  fn default() -> Self {
    Self(Regex::new(DEFAULT_NOISY_PATTERN).expect("default noisy pattern is valid"))
  }
}

impl PartialEq for NoisyPattern {
  fn eq(&self, other: &Self) -> bool {
    self.as_str() == other.as_str()
  }
}

impl Eq for NoisyPattern {}

impl fmt::Display for NoisyPattern {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl Serialize for NoisyPattern {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.as_str())
  }
}

impl<'de> Deserialize<'de> for NoisyPattern {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let pattern = String::deserialize(deserializer)?;
    NoisyPattern::new(&pattern).map_err(de::Error::custom)
  }
}

/// Knobs for the inline renderer.
///
/// ```toml
/// context-lines = 4
/// comment-prefix = "// "
/// span-end = "|]"
/// noisy-pattern = 'lib.*\.d\.ts$'
/// encoding = "utf-16"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct RenderOptions {
  /// Lines of real content kept on each side of an elided stretch.
  pub context_lines:  usize,
  pub comment_prefix: String,
  pub span_start:     String,
  pub span_end:       String,
  pub context_start:  String,
  pub context_end:    String,
  pub noisy_pattern:  NoisyPattern,
  pub encoding:       PositionEncoding,
}

impl Default for RenderOptions {
  fn default() -> Self {
    Self {
      context_lines:  DEFAULT_CONTEXT_LINES,
      comment_prefix: DEFAULT_COMMENT_PREFIX.to_string(),
      span_start:     DEFAULT_SPAN_START.to_string(),
      span_end:       DEFAULT_SPAN_END.to_string(),
      context_start:  DEFAULT_CONTEXT_START.to_string(),
      context_end:    DEFAULT_CONTEXT_END.to_string(),
      noisy_pattern:  NoisyPattern::default(),
      encoding:       PositionEncoding::default(),
    }
  }
}

impl RenderOptions {
  pub fn from_toml(src: &str) -> Result<Self, ConfigError> {
    let options: Self = toml::from_str(src)?;
    options.validate()?;
    Ok(options)
  }

  pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let src = std::fs::read_to_string(path).map_err(|source| {
      ConfigError::Io {
        path: path.display().to_string(),
        source,
      }
    })?;
    Self::from_toml(&src)
  }

  fn validate(&self) -> Result<(), ConfigError> {
    if self.context_lines == 0 {
      return Err(ConfigError::ContextLines(self.context_lines));
    }
    Ok(())
  }

  /// Same options with a different closing token, e.g. for rename baselines.
  pub fn with_span_end(mut self, span_end: impl Into<String>) -> Self {
    self.span_end = span_end.into();
    self
  }

  /// Rendering with zero context lines panics; TOML input rejects it with
  /// [`ConfigError::ContextLines`].
  pub fn with_context_lines(mut self, context_lines: usize) -> Self {
    self.context_lines = context_lines;
    self
  }

  pub fn with_encoding(mut self, encoding: PositionEncoding) -> Self {
    self.encoding = encoding;
    self
  }

  pub fn is_noisy(&self, document_name: &str) -> bool {
    self.noisy_pattern.is_match(document_name)
  }
}
