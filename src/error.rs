//! Errors that might occur while building, importing, sorting or assembling modules.
//!
//! Every fallible operation returns an [`Error`], which carries the kind of failure, where it
//! happened (when known) and a secondary message. The location is what lets you jump to the
//! offending line in your editor.

use std::error;
use std::fmt;
use std::path::Path;

/// Name used as file location for sources that don’t come from the file system.
pub const MEMORY_FILE: &str = "(memory)";

/// Kind of failure.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
  /// Memory allocation failed.
  Alloc,
  /// Growing an existing allocation failed.
  Realloc,
  /// Malformed directive, list or identifier.
  Syntax,
  /// Well-formed but meaningless input, such as a module named twice.
  Semantic,
  /// A file couldn’t be opened.
  FileOpen,
  /// A file couldn’t be read.
  FileRead,
  /// A file doesn’t exist.
  FileNotFound,
  /// A module breaks one of its own invariants.
  ModuleCorrupt,
  /// A module has no name and none could be inferred.
  ModuleNoName,
  /// The requested module isn’t in the module set.
  ModuleNotFound,
  /// Modules require each other.
  CircularDependency,
  /// A required module isn’t in the module set.
  MissingDependency,
  /// A provided buffer can’t hold the result.
  BufferTooSmall,
}

impl ErrorKind {
  /// Human description of the kind.
  pub fn description(self) -> &'static str {
    match self {
      ErrorKind::Alloc => "Allocation failed",
      ErrorKind::Realloc => "Reallocation failed",
      ErrorKind::Syntax => "Syntax error",
      ErrorKind::Semantic => "Semantic error",
      ErrorKind::FileOpen => "Failed to open the file",
      ErrorKind::FileRead => "Failed to read the file",
      ErrorKind::FileNotFound => "File could not be found",
      ErrorKind::ModuleCorrupt => "Module is corrupt",
      ErrorKind::ModuleNoName => "Module without name",
      ErrorKind::ModuleNotFound => "Module is missing",
      ErrorKind::CircularDependency => "Circular dependency found",
      ErrorKind::MissingDependency => "Missing required module",
      ErrorKind::BufferTooSmall => "Provided buffer is too small",
    }
  }
}

impl fmt::Display for ErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str(self.description())
  }
}

/// Position of an error in a source.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Location {
  /// File path, or [`MEMORY_FILE`].
  pub file: String,
  /// 1-based line; 0 when the whole file is concerned.
  pub line: usize,
  /// 0-based byte offset in the line.
  pub column: usize,
}

impl Location {
  pub fn new<F>(file: F, line: usize, column: usize) -> Self where F: Into<String> {
    Location {
      file: file.into(),
      line,
      column,
    }
  }
}

/// Error that might occur while handling modules.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Error {
  kind: ErrorKind,
  location: Option<Location>,
  detail: String,
}

pub type Result<T> = ::std::result::Result<T, Error>;

impl Error {
  pub fn new<D>(kind: ErrorKind, detail: D) -> Self where D: Into<String> {
    Error {
      kind,
      location: None,
      detail: detail.into(),
    }
  }

  /// Syntax error at a given place.
  pub fn syntax<D>(line: usize, column: usize, detail: D) -> Self where D: Into<String> {
    Error::new(ErrorKind::Syntax, detail).at(MEMORY_FILE, line, column)
  }

  /// Attach a location to the error.
  pub fn at<F>(mut self, file: F, line: usize, column: usize) -> Self where F: Into<String> {
    self.location = Some(Location::new(file, line, column));
    self
  }

  /// Set the file the error originates from.
  ///
  /// Line and column already recorded are kept; an error without location gets a file-wide one.
  pub fn in_file(mut self, path: &Path) -> Self {
    let file = path.display().to_string();

    match self.location {
      Some(ref mut loc) => loc.file = file,
      None => self.location = Some(Location::new(file, 0, 0)),
    }

    self
  }

  pub fn kind(&self) -> ErrorKind {
    self.kind
  }

  pub fn location(&self) -> Option<&Location> {
    self.location.as_ref()
  }

  /// Secondary message, such as the name of the missing module.
  pub fn detail(&self) -> &str {
    &self.detail
  }
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self.location {
      Some(ref loc) if loc.line > 0 => write!(f, "{}:{}:{}: error: {}", loc.file, loc.line, loc.column, self.kind)?,
      Some(ref loc) => write!(f, "{}: error: {}", loc.file, self.kind)?,
      None => write!(f, "error: {}", self.kind)?,
    }

    if self.detail.is_empty() {
      f.write_str(".")
    } else {
      write!(f, ", {}.", self.detail)
    }
  }
}

impl error::Error for Error {}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn display_located() {
    let err = Error::syntax(3, 8, "invalid module name");
    assert_eq!(err.to_string(), "(memory):3:8: error: Syntax error, invalid module name.");
  }

  #[test]
  fn display_unlocated() {
    let err = Error::new(ErrorKind::MissingDependency, "quaternion");
    assert_eq!(err.to_string(), "error: Missing required module, quaternion.");

    let err = Error::new(ErrorKind::Alloc, "");
    assert_eq!(err.to_string(), "error: Allocation failed.");
  }

  #[test]
  fn in_file_keeps_position() {
    let err = Error::syntax(2, 1, "x").in_file(Path::new("shaders/main.glsl"));
    let loc = err.location().unwrap();

    assert_eq!(loc.file, "shaders/main.glsl");
    assert_eq!((loc.line, loc.column), (2, 1));

    let err = Error::new(ErrorKind::FileOpen, "").in_file(Path::new("a.glsl"));
    assert_eq!(err.to_string(), "a.glsl: error: Failed to open the file.");
  }
}
