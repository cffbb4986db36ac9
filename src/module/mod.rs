//! Shader module.
//!
//! A shader module is a piece of GLSL code annotated with a few directives, each on its own
//! line:
//!
//! ```glsl
//! #module lighting
//! #require structs, quaternion
//!
//! vec3 shade(Light l, vec3 n) { … }
//! ```
//!
//! `#module` names the module, `#require` lists the modules it depends on and `#type` is
//! reserved. Directive lines are removed from the source; everything else is kept verbatim.
//! Modules only know each other by name, never by address.

mod arena;
mod parser;

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::context::Context;
use crate::error::Result;
use crate::helpers::{TyDesc, report};

pub use self::arena::{DependencyArena, Iter as Dependencies};
pub use self::parser::{MAX_KEYWORD_LEN, ParseOptions};
pub(crate) use self::parser::load;

/// Shader stage a module is meant for.
///
/// The `#type` directive is parsed but has no effect yet: every module is [`Stage::None`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Stage {
  None,
  Vertex,
  Fragment,
  Geometry,
  Compute,
  TessControl,
  TessEval,
}

impl Default for Stage {
  fn default() -> Self {
    Stage::None
  }
}

/// Where a module was loaded from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Origin {
  /// Path the module was read at.
  pub path: PathBuf,
  /// Modification time of the file when it was last seen.
  pub mtime: SystemTime,
  /// Options the module was parsed with; reloading uses them again.
  pub options: ParseOptions,
}

/// A named, directive-free shader source fragment with its dependencies.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Module {
  name: String,
  stage: Stage,
  source: String,
  deps: DependencyArena,
  origin: Option<Origin>,
  dirty: bool,
}

impl TyDesc for Module {
  const TY_DESC: &'static str = "module";
}

impl Module {
  /// Build a module from a source living in memory.
  ///
  /// The source must contain a `#module` directive, as there’s nothing else to infer a name from.
  pub fn from_source(src: &str) -> Result<Self> {
    Self::from_source_with(src, ParseOptions::default())
  }

  pub fn from_source_with(src: &str, options: ParseOptions) -> Result<Self> {
    parser::build_from_source(src, options).map(|(module, _)| module)
  }

  /// Load a module from a file.
  ///
  /// Without `#module` directive, the module is named after the file (`shaders/noise.glsl` is
  /// named `noise`). The path and modification time of the file are recorded so that the module
  /// can be watched for changes.
  pub fn from_file<C, P>(ctx: &mut C, path: P) -> Result<Self> where C: Context, P: AsRef<Path> {
    Self::from_file_with(ctx, path, ParseOptions::default())
  }

  pub fn from_file_with<C, P>(ctx: &mut C, path: P, options: ParseOptions) -> Result<Self>
  where C: Context,
        P: AsRef<Path> {
    let r = parser::load(ctx, path.as_ref(), options);
    report(ctx, r)
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn stage(&self) -> Stage {
    self.stage
  }

  /// Source with every directive line removed.
  pub fn source(&self) -> &str {
    &self.source
  }

  /// Names of the required modules, in order of appearance, without duplicates.
  pub fn dependencies(&self) -> Dependencies {
    self.deps.iter()
  }

  pub fn dependency_arena(&self) -> &DependencyArena {
    &self.deps
  }

  /// File the module was loaded from, if any.
  pub fn origin(&self) -> Option<&Origin> {
    self.origin.as_ref()
  }

  pub fn path(&self) -> Option<&Path> {
    self.origin.as_ref().map(|origin| origin.path.as_path())
  }

  /// Has the backing file changed since the module was built?
  pub fn is_dirty(&self) -> bool {
    self.dirty
  }

  pub(crate) fn origin_mut(&mut self) -> Option<&mut Origin> {
    self.origin.as_mut()
  }

  pub(crate) fn set_dirty(&mut self, dirty: bool) {
    self.dirty = dirty;
  }
}

impl fmt::Display for Module {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self.origin {
      Some(ref origin) => write!(f, "{} ({})", self.name, origin.path.display()),
      None => f.write_str(&self.name),
    }
  }
}
