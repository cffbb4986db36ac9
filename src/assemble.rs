//! Shader assembly.
//!
//! Assembling concatenates the cleaned sources of every module reachable from a root module,
//! requirements first. Modules that the root doesn’t reach are left out.

use std::fmt::{self, Write};
use std::ops::Deref;

use crate::error::{Error, ErrorKind, Result};
use crate::set::ModuleSet;
use crate::sort::{Order, sort};

/// Room reserved for each module header comment, in bytes.
pub const HEADER_MAX_LEN: usize = 127;

/// Assembly options.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct AssembleOptions {
  /// Precede each module’s code with a `// ==== name module ====` comment.
  pub header_comments: bool,
}

impl Default for AssembleOptions {
  fn default() -> Self {
    AssembleOptions {
      header_comments: true,
    }
  }
}

/// An assembled shader, ready to be handed to a GLSL compiler.
///
/// The shader owns its code; dropping it releases it.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Shader(String);

impl Shader {
  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_string(self) -> String {
    self.0
  }
}

impl Deref for Shader {
  type Target = str;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl AsRef<str> for Shader {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

impl From<Shader> for String {
  fn from(shader: Shader) -> Self {
    shader.0
  }
}

impl fmt::Display for Shader {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Assemble the shader rooted at the module named `root`.
pub fn assemble(set: &ModuleSet, root: &str, options: AssembleOptions) -> Result<Shader> {
  let root_index = set.find(root).ok_or_else(|| Error::new(ErrorKind::ModuleNotFound, root))?;
  let order = sort(set, root_index)?;

  emit(set, &order, options)
}

/// Write the modules of a sorted set in emission order.
pub fn emit(set: &ModuleSet, order: &Order, options: AssembleOptions) -> Result<Shader> {
  let emission = order.emission_order();
  let mut size: usize = emission.iter().map(|&i| set[i].source().len()).sum();

  if options.header_comments {
    size += HEADER_MAX_LEN * emission.len();
  }

  let mut buf = String::new();
  buf
    .try_reserve_exact(size)
    .map_err(|_| Error::new(ErrorKind::Alloc, format!("cannot allocate {} bytes for the shader", size)))?;

  for &i in &emission {
    let module = &set[i];

    if options.header_comments {
      // writing into a String cannot fail
      let _ = write!(buf, "\n// ==== {} module ====\n", module.name());
    }

    buf.push_str(module.source());
  }

  // drop the header allowance
  buf.shrink_to_fit();

  Ok(Shader(buf))
}
