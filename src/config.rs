//! Project configuration.
//!
//! A project is described by a JSON file listing the modules to import, where to look for them
//! and how to assemble them:
//!
//! ```json
//! {
//!   "modules": ["main.glsl", "lighting.glsl"],
//!   "search_paths": "shaders:shaders/lib",
//!   "root": "main",
//!   "header_comments": false,
//!   "output": "build/main.glsl"
//! }
//! ```
//!
//! Lists can be given either as JSON arrays or as delimited strings. Paths are relative to the
//! working directory.

use serde_derive::Deserialize;
use std::path::{Path, PathBuf};

use crate::assemble::AssembleOptions;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::fs::FileSystem;
use crate::helpers::{TyDesc, load_with, report};
use crate::import::Importer;
use crate::module::ParseOptions;
use crate::set::ModuleSet;

/// A list written either as a delimited string or as an array.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(untagged)]
pub enum List {
  Joined(String),
  Items(Vec<String>),
}

impl Default for List {
  fn default() -> Self {
    List::Items(Vec::new())
  }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Config {
  /// Modules to import.
  pub modules: List,
  /// Directories modules are looked up in.
  #[serde(default)]
  pub search_paths: List,
  /// Name of the module to assemble.
  #[serde(default = "def_root")]
  pub root: String,
  #[serde(default = "def_header_comments")]
  pub header_comments: bool,
  #[serde(default)]
  pub keep_unknown_directives: bool,
  /// Where to write the assembled shader; stdout if absent.
  #[serde(default)]
  pub output: Option<PathBuf>,
}

impl TyDesc for Config {
  const TY_DESC: &'static str = "config";
}

fn def_root() -> String { "main".to_owned() }
fn def_header_comments() -> bool { true }

impl Config {
  /// Configuration importing the given modules with default settings.
  pub fn new(modules: List) -> Self {
    Config {
      modules,
      search_paths: List::default(),
      root: def_root(),
      header_comments: def_header_comments(),
      keep_unknown_directives: false,
      output: None,
    }
  }

  /// Decode a configuration from JSON.
  pub fn from_json(src: &str) -> Result<Self> {
    serde_json::from_str(src).map_err(|e| Error::syntax(e.line(), e.column().saturating_sub(1), e.to_string()))
  }

  /// Read and decode a configuration file.
  pub fn load<C, P>(ctx: &mut C, path: P) -> Result<Self> where C: Context, P: AsRef<Path> {
    let path = path.as_ref();
    let r = load_with::<Self, _, _, _>(ctx, path, |ctx| {
      let src = ctx.fs().read_file(path).map_err(|e| e.in_file(path))?;
      Self::from_json(&src).map_err(|e| e.in_file(path))
    });

    report(ctx, r)
  }

  pub fn parse_options(&self) -> ParseOptions {
    ParseOptions {
      keep_unknown_directives: self.keep_unknown_directives,
    }
  }

  pub fn assemble_options(&self) -> AssembleOptions {
    AssembleOptions {
      header_comments: self.header_comments,
    }
  }

  /// Importer looking into the configured search paths.
  pub fn importer(&self) -> Result<Importer> {
    let importer = Importer::new().options(self.parse_options());

    match self.search_paths {
      List::Joined(ref dirs) => importer.search_paths(dirs),
      List::Items(ref dirs) => {
        let dirs = dirs.iter().map(|dir| dir.trim()).filter(|dir| !dir.is_empty());
        Ok(dirs.fold(importer, |importer, dir| importer.search_dir(dir)))
      }
    }
  }

  /// Import the configured modules.
  pub fn import<C>(&self, ctx: &mut C) -> Result<ModuleSet> where C: Context {
    let importer = report(ctx, self.importer())?;

    match self.modules {
      List::Joined(ref list) => importer.import_str(ctx, list),
      List::Items(ref ids) => importer.import_slice(ctx, &ids[..]),
    }
  }
}
