//! Context.
//!
//! A context gathers the collaborators used by the operations that interact with the outer
//! world: a [`Logger`] and a [`FileSystem`].

use crate::fs::{FileSystem, MemoryFileSystem, StdFileSystem};
use crate::logger::{Logger, NullLogger, TermLogger};

/// Class of accepted contexts.
pub trait Context {
  type Logger: Logger;

  type FileSystem: FileSystem;

  /// Get access to the internal logger.
  fn logger(&mut self) -> &mut Self::Logger;

  /// Get access to the file system.
  fn fs(&mut self) -> &mut Self::FileSystem;
}

/// Using the default context will use:
///
///   - The `TermLogger` as a logger.
///   - The `StdFileSystem` as file system.
#[derive(Debug, Default)]
pub struct DefaultContext {
  logger: TermLogger,
  fs: StdFileSystem,
}

impl DefaultContext {
  pub fn new() -> Self {
    DefaultContext {
      logger: TermLogger,
      fs: StdFileSystem,
    }
  }
}

impl Context for DefaultContext {
  type Logger = TermLogger;

  type FileSystem = StdFileSystem;

  fn logger(&mut self) -> &mut Self::Logger {
    &mut self.logger
  }

  fn fs(&mut self) -> &mut Self::FileSystem {
    &mut self.fs
  }
}

/// A context made of any logger and file system.
#[derive(Debug, Default)]
pub struct ContextOf<L, F> {
  pub logger: L,
  pub fs: F,
}

impl<L, F> ContextOf<L, F> {
  pub fn new(logger: L, fs: F) -> Self {
    ContextOf { logger, fs }
  }
}

/// A silent, in-memory context.
pub type MemoryContext = ContextOf<NullLogger, MemoryFileSystem>;

impl<L, F> Context for ContextOf<L, F> where L: Logger, F: FileSystem {
  type Logger = L;

  type FileSystem = F;

  fn logger(&mut self) -> &mut Self::Logger {
    &mut self.logger
  }

  fn fs(&mut self) -> &mut Self::FileSystem {
    &mut self.fs
  }
}
