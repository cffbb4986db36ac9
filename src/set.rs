//! Module sets.
//!
//! A [`ModuleSet`] owns modules and gives them a stable position. Modules refer to each other by
//! name only, so the set can grow and move freely; looking a module up by its name is the only
//! relation between two modules.

use std::ops::Index;
use std::slice;

use crate::error::{Error, ErrorKind, Result};
use crate::module::Module;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ModuleSet {
  modules: Vec<Module>,
}

impl ModuleSet {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_capacity(capacity: usize) -> Self {
    ModuleSet {
      modules: Vec::with_capacity(capacity),
    }
  }

  /// Build a set out of already constructed modules.
  ///
  /// Fails if two modules share a name.
  pub fn from_modules<I>(modules: I) -> Result<Self> where I: IntoIterator<Item = Module> {
    let mut set = ModuleSet::new();

    for module in modules {
      set.push(module)?;
    }

    Ok(set)
  }

  /// Add a module at the end of the set and return its position.
  pub fn push(&mut self, module: Module) -> Result<usize> {
    if self.find(module.name()).is_some() {
      return Err(Error::new(ErrorKind::Semantic, format!("module {} is defined twice", module.name())));
    }

    self.modules.push(module);
    Ok(self.modules.len() - 1)
  }

  /// Position of the module with the given name.
  pub fn find(&self, name: &str) -> Option<usize> {
    self.modules.iter().position(|module| module.name() == name)
  }

  pub fn get(&self, index: usize) -> Option<&Module> {
    self.modules.get(index)
  }

  pub fn get_by_name(&self, name: &str) -> Option<&Module> {
    self.find(name).map(|index| &self.modules[index])
  }

  pub fn len(&self) -> usize {
    self.modules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.modules.is_empty()
  }

  pub fn iter(&self) -> slice::Iter<Module> {
    self.modules.iter()
  }

  pub fn modules(&self) -> &[Module] {
    &self.modules
  }

  pub fn into_modules(self) -> Vec<Module> {
    self.modules
  }

  pub(crate) fn modules_mut(&mut self) -> &mut [Module] {
    &mut self.modules
  }
}

impl Index<usize> for ModuleSet {
  type Output = Module;

  fn index(&self, index: usize) -> &Self::Output {
    &self.modules[index]
  }
}

impl<'a> IntoIterator for &'a ModuleSet {
  type Item = &'a Module;

  type IntoIter = slice::Iter<'a, Module>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn module(src: &str) -> Module {
    Module::from_source(src).unwrap()
  }

  #[test]
  fn push_and_find() {
    let mut set = ModuleSet::new();

    assert_eq!(set.push(module("#module a\n")).unwrap(), 0);
    assert_eq!(set.push(module("#module b\n#require a\n")).unwrap(), 1);

    assert_eq!(set.len(), 2);
    assert_eq!(set.find("b"), Some(1));
    assert_eq!(set.find("c"), None);
    assert_eq!(set.get_by_name("a").map(Module::name), Some("a"));
    assert_eq!(set[1].name(), "b");
  }

  #[test]
  fn duplicate_names_rejected() {
    let err = ModuleSet::from_modules(vec![module("#module a\n"), module("#module a\nint x;\n")]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Semantic);
  }
}
