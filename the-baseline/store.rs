//! Per-test accumulation of rendered baselines.

use indexmap::IndexMap;

/// Between successive records of one command.
pub const RECORD_SEPARATOR: &str = "\n\n\n\n";

/// Rendered output of one test case, keyed by command name.
///
/// Each test case owns its store; nothing is shared between cases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaselineStore {
  baselines: IndexMap<String, String>,
}

impl BaselineStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Appends `text` under a `// === <command> ===` header.
  pub fn record(&mut self, command: &str, text: &str) {
    let baseline = self.baselines.entry(command.to_string()).or_default();
    if !baseline.is_empty() {
      baseline.push_str(RECORD_SEPARATOR);
    }
    baseline.push_str("// === ");
    baseline.push_str(command);
    baseline.push_str(" ===\n");
    baseline.push_str(text);
  }

  /// Appends `text` as is, for commands that frame their own output.
  pub fn write_raw(&mut self, command: &str, text: &str) {
    self
      .baselines
      .entry(command.to_string())
      .or_default()
      .push_str(text);
  }

  pub fn get(&self, command: &str) -> Option<&str> {
    self.baselines.get(command).map(String::as_str)
  }

  /// Recorded command names, first record first.
  pub fn commands(&self) -> impl Iterator<Item = &str> {
    self.baselines.keys().map(String::as_str)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self
      .baselines
      .iter()
      .map(|(command, text)| (command.as_str(), text.as_str()))
  }

  pub fn len(&self) -> usize {
    self.baselines.len()
  }

  pub fn is_empty(&self) -> bool {
    self.baselines.is_empty()
  }
}

/// `"Auto Imports"` becomes `"autoImports"`.
pub fn normalize_command_name(command: &str) -> String {
  let joined: String = command.split_whitespace().collect();
  let mut chars = joined.chars();
  match chars.next() {
    Some(first) => first.to_lowercase().chain(chars).collect(),
    None => String::new(),
  }
}

pub fn baseline_extension(command: &str) -> &'static str {
  match command {
    "QuickInfo" | "SignatureHelp" => "baseline",
    "Auto Imports" => "baseline.md",
    _ => "baseline.jsonc",
  }
}

pub fn baseline_file_name(test_name: &str, command: &str) -> String {
  format!("{test_name}.{}", baseline_extension(command))
}

/// Directory, relative to the baseline root, holding a command's baselines.
pub fn baseline_subfolder(command: &str) -> String {
  format!("fourslash/{}", normalize_command_name(command))
}

pub fn code_fence(lang: &str, code: &str) -> String {
  format!("```{lang}\n{code}\n```")
}
