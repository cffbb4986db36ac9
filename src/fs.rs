//! File system access.
//!
//! Reading files, joining paths and probing modification times go through the [`FileSystem`]
//! trait so that modules can live somewhere else than on disk (packed in an executable, in a
//! virtual file system, etc.).

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::{Error, ErrorKind, Result};

/// Maximum length of a path built while resolving modules, in bytes.
pub const MAX_PATH_LEN: usize = 254;

/// File system operations needed to import and hot-swap modules.
pub trait FileSystem {
  /// Read a whole file as text.
  fn read_file(&mut self, path: &Path) -> Result<String>;

  /// Get the last modification time of a file.
  ///
  /// Must fail with [`ErrorKind::FileNotFound`] when the file doesn’t exist; any other error is
  /// considered fatal by callers.
  fn probe_mtime(&mut self, path: &Path) -> Result<SystemTime>;

  /// Join a directory and a file path.
  ///
  /// `capacity` is the size of the room available for the result, terminator byte included.
  fn join_path(&self, a: &str, b: &str, capacity: usize) -> Result<PathBuf> {
    join_path(a, b, capacity)
  }
}

impl<'a, F> FileSystem for &'a mut F where F: FileSystem + ?Sized {
  fn read_file(&mut self, path: &Path) -> Result<String> {
    (**self).read_file(path)
  }

  fn probe_mtime(&mut self, path: &Path) -> Result<SystemTime> {
    (**self).probe_mtime(path)
  }

  fn join_path(&self, a: &str, b: &str, capacity: usize) -> Result<PathBuf> {
    (**self).join_path(a, b, capacity)
  }
}

/// Join two paths with a `/`.
///
/// The separator is only inserted if both sides are non-empty and none of them already has one
/// at the join point.
pub fn join_path(a: &str, b: &str, capacity: usize) -> Result<PathBuf> {
  let slash_between = !a.is_empty() && !b.is_empty() && !a.ends_with('/') && !b.starts_with('/');
  let len = a.len() + b.len() + slash_between as usize;

  if len + 1 > capacity {
    return Err(Error::new(ErrorKind::BufferTooSmall, format!("{}{}{} is too long", a, if slash_between { "/" } else { "" }, b)));
  }

  let mut joined = String::with_capacity(len);
  joined.push_str(a);

  if slash_between {
    joined.push('/');
  }

  joined.push_str(b);

  Ok(joined.into())
}

/// The regular file system, through `std::fs`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
  fn read_file(&mut self, path: &Path) -> Result<String> {
    let mut fh = File::open(path).map_err(|e| Error::new(ErrorKind::FileOpen, e.to_string()).in_file(path))?;
    let mut src = String::new();

    fh.read_to_string(&mut src).map_err(|e| Error::new(ErrorKind::FileRead, e.to_string()).in_file(path))?;

    Ok(src)
  }

  fn probe_mtime(&mut self, path: &Path) -> Result<SystemTime> {
    let metadata = fs::metadata(path).map_err(|e| {
      let kind = if e.kind() == io::ErrorKind::NotFound { ErrorKind::FileNotFound } else { ErrorKind::FileOpen };
      Error::new(kind, e.to_string()).in_file(path)
    })?;

    metadata.modified().map_err(|e| Error::new(ErrorKind::FileOpen, e.to_string()).in_file(path))
  }
}

/// A file system living in memory.
///
/// Every file gets a logical modification time that moves forward each time the file is
/// written or touched.
#[derive(Clone, Debug, Default)]
pub struct MemoryFileSystem {
  files: HashMap<PathBuf, (String, SystemTime)>,
  clock: u64,
}

impl MemoryFileSystem {
  pub fn new() -> Self {
    Self::default()
  }

  fn tick(&mut self) -> SystemTime {
    self.clock += 1;
    UNIX_EPOCH + Duration::from_secs(self.clock)
  }

  /// Create or overwrite a file.
  pub fn insert<P, S>(&mut self, path: P, content: S) where P: Into<PathBuf>, S: Into<String> {
    let mtime = self.tick();
    self.files.insert(path.into(), (content.into(), mtime));
  }

  /// Bump the modification time of a file without changing it. Returns whether the file exists.
  pub fn touch<P>(&mut self, path: P) -> bool where P: AsRef<Path> {
    let mtime = self.tick();

    match self.files.get_mut(path.as_ref()) {
      Some(file) => {
        file.1 = mtime;
        true
      }
      None => false,
    }
  }

  pub fn remove<P>(&mut self, path: P) -> Option<String> where P: AsRef<Path> {
    self.files.remove(path.as_ref()).map(|(content, _)| content)
  }
}

impl FileSystem for MemoryFileSystem {
  fn read_file(&mut self, path: &Path) -> Result<String> {
    self
      .files
      .get(path)
      .map(|file| file.0.clone())
      .ok_or_else(|| Error::new(ErrorKind::FileOpen, "no such file").in_file(path))
  }

  fn probe_mtime(&mut self, path: &Path) -> Result<SystemTime> {
    self
      .files
      .get(path)
      .map(|file| file.1)
      .ok_or_else(|| Error::new(ErrorKind::FileNotFound, "no such file").in_file(path))
  }
}
