//! Change detection and hot swapping.
//!
//! Modules loaded from files remember the modification time of their file. [`ModuleSet::watch`]
//! compares it against the current one and flags the modules whose file changed as dirty;
//! [`ModuleSet::swap_dirty`] reloads them in place. Positions in the set never change, but any
//! [`Order`](crate::sort::Order) or shader computed before a swap is stale afterwards.

use crate::context::Context;
use crate::error::{Error, ErrorKind, Result};
use crate::fs::FileSystem;
use crate::helpers::report;
use crate::module::load;
use crate::set::ModuleSet;

/// Outcome of a watch poll.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum WatchStatus {
  /// No file changed since the last poll.
  Unchanged,
  /// At least one module became dirty.
  Changed,
}

impl WatchStatus {
  pub fn is_changed(self) -> bool {
    self == WatchStatus::Changed
  }
}

impl ModuleSet {
  /// Poll the files of every file-backed module.
  ///
  /// This never blocks. Modules built from memory are ignored.
  pub fn watch<C>(&mut self, ctx: &mut C) -> Result<WatchStatus> where C: Context {
    let r = self.poll(ctx);
    report(ctx, r)
  }

  /// Reload every dirty module from its file, keeping its position. Returns the number of
  /// swapped modules.
  ///
  /// A module that fails to reload is left untouched and stays dirty, so that it’s retried on the
  /// next call.
  pub fn swap_dirty<C>(&mut self, ctx: &mut C) -> Result<usize> where C: Context {
    let r = self.swap(ctx);
    report(ctx, r)
  }

  fn poll<C>(&mut self, ctx: &mut C) -> Result<WatchStatus> where C: Context {
    // nothing is recorded unless every file could be probed
    let mut changes = Vec::new();

    for (i, module) in self.iter().enumerate() {
      if let Some(origin) = module.origin() {
        let mtime = ctx.fs().probe_mtime(&origin.path)?;

        if mtime != origin.mtime {
          changes.push((i, mtime));
        }
      }
    }

    for &(i, mtime) in &changes {
      let module = &mut self.modules_mut()[i];
      debug!(ctx.logger(), "module {} changed on disk", module);

      if let Some(origin) = module.origin_mut() {
        origin.mtime = mtime;
      }

      module.set_dirty(true);
    }

    if changes.is_empty() {
      Ok(WatchStatus::Unchanged)
    } else {
      Ok(WatchStatus::Changed)
    }
  }

  fn swap<C>(&mut self, ctx: &mut C) -> Result<usize> where C: Context {
    let mut swapped = 0;

    for i in 0..self.len() {
      let origin = match self[i].origin() {
        Some(origin) if self[i].is_dirty() => origin.clone(),
        _ => continue,
      };

      let module = load(ctx, &origin.path, origin.options)?;

      match self.find(module.name()) {
        Some(j) if j != i => {
          return Err(Error::new(
            ErrorKind::Semantic,
            format!("module {} is defined twice", module.name())
          ).in_file(&origin.path));
        }
        _ => (),
      }

      info!(ctx.logger(), "swapped module {} ({})", module.name(), origin.path.display());

      self.modules_mut()[i] = module;
      swapped += 1;
    }

    Ok(swapped)
  }
}
