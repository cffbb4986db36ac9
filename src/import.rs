//! Module set importer.
//!
//! Importing turns a list of module identifiers into a [`ModuleSet`]. Each identifier is first
//! tried as a path on its own, then joined to every search directory, in order; the first
//! existing file is loaded. Files are probed for existence, never read, before one is picked.
//!
//! ```ignore
//! let mut ctx = DefaultContext::new();
//! let set = import_from_str(&mut ctx, "main.glsl, lighting.glsl", "shaders:shaders/lib")?;
//! ```
//!
//! An import is all or nothing: if any identifier fails, every module built so far is dropped
//! and only the error is returned.

use std::path::{Path, PathBuf};

use crate::context::Context;
use crate::error::{Error, ErrorKind, MEMORY_FILE, Result};
use crate::fs::{FileSystem, MAX_PATH_LEN};
use crate::helpers::report;
use crate::module::{ParseOptions, load};
use crate::set::ModuleSet;
use crate::text::{Token, split};

/// Delimiter of module identifier lists.
pub const MODULE_LIST_SEPARATOR: char = ',';

/// Delimiter of search path lists, as in the `PATH` environment variable.
#[cfg(windows)]
pub const PATH_LIST_SEPARATOR: char = ';';
#[cfg(not(windows))]
pub const PATH_LIST_SEPARATOR: char = ':';

/// Import the modules listed in `list` (`"a.glsl, b.glsl"`), looking them up in the directories
/// of `search_paths` (`"dir1:dir2"`).
pub fn import_from_str<C>(ctx: &mut C, list: &str, search_paths: &str) -> Result<ModuleSet> where C: Context {
  let r = Importer::new().search_paths(search_paths);
  match report(ctx, r) {
    Ok(importer) => importer.import_str(ctx, list),
    Err(e) => Err(e),
  }
}

/// Import modules from identifiers that are already split.
pub fn import_from_slice<C, S>(ctx: &mut C, ids: &[S], search_paths: &str) -> Result<ModuleSet>
where C: Context,
      S: AsRef<str> {
  let r = Importer::new().search_paths(search_paths);
  match report(ctx, r) {
    Ok(importer) => importer.import_slice(ctx, ids),
    Err(e) => Err(e),
  }
}

/// Import the modules listed in a file.
pub fn import_from_file<C, P>(ctx: &mut C, path: P, search_paths: &str) -> Result<ModuleSet>
where C: Context,
      P: AsRef<Path> {
  let r = Importer::new().search_paths(search_paths);
  match report(ctx, r) {
    Ok(importer) => importer.import_file(ctx, path),
    Err(e) => Err(e),
  }
}

/// Module importer: search directories and parse options, reused across imports.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Importer {
  dirs: Vec<String>,
  options: ParseOptions,
}

impl Importer {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add the directories of a search path list (`"dir1:dir2"`).
  ///
  /// Empty entries are ignored.
  pub fn search_paths(mut self, list: &str) -> Result<Self> {
    let dirs = split(list, PATH_LIST_SEPARATOR)?;
    self.dirs.extend(dirs.into_iter().filter(|dir| !dir.text.is_empty()).map(|dir| dir.text.to_owned()));

    Ok(self)
  }

  /// Add a single search directory.
  pub fn search_dir<D>(mut self, dir: D) -> Self where D: Into<String> {
    self.dirs.push(dir.into());
    self
  }

  pub fn options(mut self, options: ParseOptions) -> Self {
    self.options = options;
    self
  }

  pub fn dirs(&self) -> &[String] {
    &self.dirs
  }

  pub fn parse_options(&self) -> ParseOptions {
    self.options
  }

  /// Import a comma-separated list of identifiers.
  pub fn import_str<C>(&self, ctx: &mut C, list: &str) -> Result<ModuleSet> where C: Context {
    let r = self.import_list(ctx, list);
    report(ctx, r)
  }

  pub fn import_slice<C, S>(&self, ctx: &mut C, ids: &[S]) -> Result<ModuleSet>
  where C: Context,
        S: AsRef<str> {
    let tokens = ids.iter().enumerate().map(|(i, id)| Token { text: id.as_ref(), line: i + 1 });
    let r = self.import_tokens(ctx, tokens, MEMORY_FILE);
    report(ctx, r)
  }

  /// Import the identifiers listed in a file. List errors point at that file.
  pub fn import_file<C, P>(&self, ctx: &mut C, path: P) -> Result<ModuleSet>
  where C: Context,
        P: AsRef<Path> {
    let r = self.import_list_file(ctx, path.as_ref());
    report(ctx, r)
  }

  fn import_list_file<C>(&self, ctx: &mut C, path: &Path) -> Result<ModuleSet> where C: Context {
    let list = ctx.fs().read_file(path).map_err(|e| e.in_file(path))?;
    let tokens = split(&list, MODULE_LIST_SEPARATOR).map_err(|e| e.in_file(path))?;

    self.import_tokens(ctx, tokens, &path.display().to_string())
  }

  fn import_list<C>(&self, ctx: &mut C, list: &str) -> Result<ModuleSet> where C: Context {
    let tokens = split(list, MODULE_LIST_SEPARATOR)?;
    self.import_tokens(ctx, tokens, MEMORY_FILE)
  }

  fn import_tokens<'a, C, I>(&self, ctx: &mut C, tokens: I, list_file: &str) -> Result<ModuleSet>
  where C: Context,
        I: IntoIterator<Item = Token<'a>> {
    let tokens = tokens.into_iter();
    let mut set = ModuleSet::with_capacity(tokens.size_hint().0);

    for token in tokens {
      if token.text.is_empty() {
        return Err(Error::new(ErrorKind::Syntax, "empty module identifier").at(list_file, token.line, 0));
      }

      let path = self.resolve(ctx, token.text)?;
      let module = load(ctx, &path, self.options)?;

      set.push(module).map_err(|e| e.in_file(&path))?;
    }

    debug!(ctx.logger(), "imported {} module(s)", set.len());

    Ok(set)
  }

  /// Find the file of a module identifier.
  fn resolve<C>(&self, ctx: &mut C, id: &str) -> Result<PathBuf> where C: Context {
    let capacity = MAX_PATH_LEN + 1;
    let literal = ctx.fs().join_path("", id, capacity)?;

    if exists(ctx, &literal)? {
      return Ok(literal);
    }

    for dir in &self.dirs {
      let candidate = ctx.fs().join_path(dir, id, capacity)?;

      if exists(ctx, &candidate)? {
        return Ok(candidate);
      }
    }

    Err(Error::new(ErrorKind::FileNotFound, id))
  }
}

fn exists<C>(ctx: &mut C, path: &Path) -> Result<bool> where C: Context {
  match ctx.fs().probe_mtime(path) {
    Ok(_) => Ok(true),
    Err(ref e) if e.kind() == ErrorKind::FileNotFound => Ok(false),
    Err(e) => Err(e),
  }
}
