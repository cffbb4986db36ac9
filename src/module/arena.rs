//! Storage for the names a module requires.
//!
//! All names live back-to-back in a single buffer, each one terminated by a `'\0'`, and are
//! referred to by their starting offset. Offsets don’t care about where the buffer lives, so
//! growing it never invalidates them.

use crate::error::{Error, ErrorKind, Result};

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DependencyArena {
  names: String,
  offsets: Vec<usize>,
}

impl DependencyArena {
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of names stored.
  pub fn len(&self) -> usize {
    self.offsets.len()
  }

  pub fn is_empty(&self) -> bool {
    self.offsets.is_empty()
  }

  /// Size of the backing buffer, in bytes, terminators included.
  pub fn byte_len(&self) -> usize {
    self.names.len()
  }

  /// Get the name at a given index.
  pub fn get(&self, index: usize) -> Option<&str> {
    let start = *self.offsets.get(index)?;
    let end = self.offsets.get(index + 1).map(|&next| next - 1).unwrap_or(self.names.len() - 1);

    Some(&self.names[start..end])
  }

  pub fn contains(&self, name: &str) -> bool {
    self.iter().any(|n| n == name)
  }

  /// Iterate over the names, in insertion order.
  pub fn iter(&self) -> Iter {
    Iter {
      arena: self,
      index: 0,
    }
  }

  /// Append a name.
  ///
  /// The name must not contain any `'\0'`. Duplicates are not checked here.
  pub fn push(&mut self, name: &str) -> Result<()> {
    if name.contains('\0') {
      return Err(Error::new(ErrorKind::ModuleCorrupt, "dependency name contains a null byte"));
    }

    self
      .names
      .try_reserve(name.len() + 1)
      .map_err(|_| Error::new(ErrorKind::Realloc, "cannot grow the dependency buffer"))?;
    self
      .offsets
      .try_reserve(1)
      .map_err(|_| Error::new(ErrorKind::Realloc, "cannot grow the dependency list"))?;

    self.offsets.push(self.names.len());
    self.names.push_str(name);
    self.names.push('\0');

    Ok(())
  }
}

pub struct Iter<'a> {
  arena: &'a DependencyArena,
  index: usize,
}

impl<'a> Iterator for Iter<'a> {
  type Item = &'a str;

  fn next(&mut self) -> Option<Self::Item> {
    let name = self.arena.get(self.index)?;
    self.index += 1;
    Some(name)
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    let left = self.arena.len() - self.index;
    (left, Some(left))
  }
}

impl<'a> ExactSizeIterator for Iter<'a> {}

impl<'a> IntoIterator for &'a DependencyArena {
  type Item = &'a str;

  type IntoIter = Iter<'a>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn push_and_get() {
    let mut arena = DependencyArena::new();
    assert!(arena.is_empty());
    assert_eq!(arena.get(0), None);

    arena.push("structs").unwrap();
    arena.push("quaternion").unwrap();
    arena.push("a").unwrap();

    assert_eq!(arena.len(), 3);
    assert_eq!(arena.byte_len(), "structs\0quaternion\0a\0".len());
    assert_eq!(arena.get(0), Some("structs"));
    assert_eq!(arena.get(1), Some("quaternion"));
    assert_eq!(arena.get(2), Some("a"));
    assert_eq!(arena.get(3), None);
    assert_eq!(arena.iter().collect::<Vec<_>>(), vec!["structs", "quaternion", "a"]);
  }

  #[test]
  fn names_survive_growth() {
    let mut arena = DependencyArena::new();
    let names: Vec<String> = (0..500).map(|i| format!("module_{}", i)).collect();

    for name in &names {
      arena.push(name).unwrap();
    }

    assert!(arena.iter().eq(names.iter().map(String::as_str)));
    assert!(arena.contains("module_0") && arena.contains("module_499"));
    assert!(!arena.contains("module_"));
  }

  #[test]
  fn reject_null() {
    let mut arena = DependencyArena::new();
    assert_eq!(arena.push("a\0b").unwrap_err().kind(), ErrorKind::ModuleCorrupt);
    assert!(arena.is_empty());
  }
}
