//! Directive parser and module builder.

use std::path::Path;

use crate::context::Context;
use crate::error::{Error, ErrorKind, MEMORY_FILE, Result};
use crate::fs::FileSystem;
use crate::helpers::load_with;
use crate::module::{DependencyArena, Module, Origin, Stage};
use crate::text::{is_valid_name, skip_line, skip_nonwhite, skip_space, split};

/// Maximum length of a directive keyword, in bytes.
pub const MAX_KEYWORD_LEN: usize = 32;

/// Options driving how sources are parsed.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct ParseOptions {
  /// Copy lines starting with an unrecognized directive (`#version`, `#extension`, …) to the
  /// cleaned source instead of dropping them.
  pub keep_unknown_directives: bool,
}

/// A module being built: its name stays empty until a `#module` directive is seen.
#[derive(Debug, Default)]
struct Builder {
  name: String,
  stage: Stage,
  deps: DependencyArena,
  repeated: usize,
}

impl Builder {
  /// `#module <name>`
  fn module(&mut self, args: Option<&str>) -> Result<()> {
    let name = args.ok_or_else(|| Error::new(ErrorKind::Syntax, "'module' directive without module name argument"))?;

    if !self.name.is_empty() {
      return Err(Error::new(ErrorKind::Semantic, "redefined module name"));
    }

    if !is_valid_name(name) {
      return Err(Error::new(ErrorKind::Syntax, "invalid module name"));
    }

    self.name = name.to_owned();
    Ok(())
  }

  /// `#require <name>[, <name>…]`
  fn require(&mut self, args: Option<&str>) -> Result<()> {
    let args = args.ok_or_else(|| Error::new(ErrorKind::Syntax, "'require' directive without any arguments"))?;
    let names = split(args, ',')
      .map_err(|_| Error::new(ErrorKind::Syntax, "one of 'require' directive arguments is not valid module name"))?;

    for name in names {
      if self.deps.contains(name.text) {
        self.repeated += 1;
        continue;
      }

      if name.text.is_empty() {
        return Err(Error::new(ErrorKind::Syntax, "'require' directive argument cannot be empty"));
      }

      if !is_valid_name(name.text) {
        return Err(Error::new(ErrorKind::Syntax, "one of 'require' directive arguments is not valid module name"));
      }

      self.deps.push(name.text)?;
    }

    Ok(())
  }

  /// `#type <…>`; reserved.
  fn stage(&mut self, _: Option<&str>) -> Result<()> {
    Ok(())
  }
}

/// Output of a parse: the cleaned source and what the directives said.
#[derive(Debug)]
struct Parsed {
  builder: Builder,
  source: String,
}

fn parse(src: &str, options: ParseOptions) -> Result<Parsed> {
  let bytes = src.as_bytes();
  let mut builder = Builder::default();
  let mut clean = String::with_capacity(src.len());
  let mut line = 0;
  let mut i = 0;

  while i < bytes.len() {
    let line_begin = i;
    let line_end = skip_line(bytes, i);
    line += 1;

    if let Some(nul) = bytes[line_begin..line_end].iter().position(|&c| c == 0) {
      return Err(Error::syntax(line, nul, "unexpected null byte"));
    }

    let cur = skip_space(bytes, line_begin);

    if cur < line_end && bytes[cur] == b'#' {
      let keyword_begin = skip_space(bytes, cur + 1);
      let keyword_end = skip_nonwhite(bytes, keyword_begin);

      if keyword_end - keyword_begin > MAX_KEYWORD_LEN {
        return Err(Error::syntax(line, keyword_begin - line_begin, "directive keyword is too long"));
      }

      let args_begin = skip_space(bytes, keyword_end).min(line_end);
      let args = src[args_begin..line_end].trim();
      let args = if args.is_empty() { None } else { Some(args) };

      let r = match &src[keyword_begin..keyword_end] {
        "module" => builder.module(args),
        "require" => builder.require(args),
        "type" => builder.stage(args),
        _ => {
          if options.keep_unknown_directives {
            clean.push_str(&src[line_begin..line_end]);
          }

          Ok(())
        }
      };

      r.map_err(|e| e.at(MEMORY_FILE, line, args_begin - line_begin))?;
    } else {
      // everything we don’t process is written back
      clean.push_str(&src[line_begin..line_end]);
    }

    i = line_end;
  }

  clean.shrink_to_fit();

  Ok(Parsed {
    builder,
    source: clean,
  })
}

/// Turn a parse into a module, once its name is known.
fn finish(parsed: Parsed, name: String) -> Result<Module> {
  let Parsed { builder, source } = parsed;

  if builder.deps.contains(&name) {
    return Err(Error::new(ErrorKind::CircularDependency, name));
  }

  Ok(Module {
    name,
    stage: builder.stage,
    source,
    deps: builder.deps,
    origin: None,
    dirty: false,
  })
}

/// Build a module from an in-memory source; the second member is the number of repeated
/// requirements that were collapsed.
pub(crate) fn build_from_source(src: &str, options: ParseOptions) -> Result<(Module, usize)> {
  let mut parsed = parse(src, options)?;
  let repeated = parsed.builder.repeated;

  if parsed.builder.name.is_empty() {
    return Err(Error::new(
      ErrorKind::ModuleNoName,
      "could not infer the name and the source does not contain valid 'module' directive"
    ).at(MEMORY_FILE, 0, 0));
  }

  let name = std::mem::replace(&mut parsed.builder.name, String::new());
  finish(parsed, name).map(|module| (module, repeated))
}

/// Name of a module inferred from its path: the file name without its extension.
pub(crate) fn infer_name(path: &Path) -> &str {
  let path = path.to_str().unwrap_or("");
  let base = path.rsplit(|c: char| c == '/' || c == std::path::MAIN_SEPARATOR).next().unwrap_or(path);

  match base.rfind('.') {
    Some(dot) => &base[..dot],
    None => base,
  }
}

/// Load a module from a file through the context file system.
pub(crate) fn load<C>(ctx: &mut C, path: &Path, options: ParseOptions) -> Result<Module> where C: Context {
  load_with::<Module, _, _, _>(ctx, path, |ctx| {
    let src = ctx.fs().read_file(path).map_err(|e| e.in_file(path))?;
    let mut parsed = parse(&src, options).map_err(|e| e.in_file(path))?;
    let repeated = parsed.builder.repeated;

    let name = if parsed.builder.name.is_empty() {
      let inferred = infer_name(path);

      if inferred.is_empty() {
        return Err(Error::new(
          ErrorKind::ModuleNoName,
          "could not infer the name and module source does not contain valid 'module' directive"
        ).in_file(path));
      }

      if !is_valid_name(inferred) {
        return Err(Error::new(
          ErrorKind::ModuleNoName,
          format!("inferred name '{}' is not a valid module name; add a 'module' directive", inferred)
        ).in_file(path));
      }

      inferred.to_owned()
    } else {
      std::mem::replace(&mut parsed.builder.name, String::new())
    };

    let mut module = finish(parsed, name).map_err(|e| e.in_file(path))?;

    if repeated > 0 {
      warn!(ctx.logger(), "{}: {} repeated requirement(s) in module {}", path.display(), repeated, module.name);
    }

    let mtime = ctx.fs().probe_mtime(path)?;
    module.origin = Some(Origin {
      path: path.to_owned(),
      mtime,
      options,
    });

    Ok(module)
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::context::MemoryContext;

  fn deps(module: &Module) -> Vec<&str> {
    module.dependencies().collect()
  }

  #[test]
  fn directives_are_stripped() {
    let src = "#module main\n#require util\n\nvoid main() {\n  # not really\n}\n";
    let module = Module::from_source(src).unwrap();

    assert_eq!(module.name(), "main");
    assert_eq!(deps(&module), vec!["util"]);
    assert_eq!(module.source(), "\nvoid main() {\n}\n");
    assert_eq!(module.stage(), Stage::None);
  }

  #[test]
  fn leading_space_before_directive() {
    let module = Module::from_source("  \t#  module   spaced  \r\nfloat x;").unwrap();

    assert_eq!(module.name(), "spaced");
    assert_eq!(module.source(), "float x;");
  }

  #[test]
  fn unknown_directives_dropped_by_default() {
    let src = "#version 330 core\n#module m\n#extension GL_foo : enable\nint a;\n#\n";
    let module = Module::from_source(src).unwrap();

    assert_eq!(module.source(), "int a;\n");
  }

  #[test]
  fn unknown_directives_kept_on_demand() {
    let src = "#version 330 core\n#module m\n#type vertex\nint a;\n";
    let opts = ParseOptions { keep_unknown_directives: true };
    let module = Module::from_source_with(src, opts).unwrap();

    assert_eq!(module.source(), "#version 330 core\nint a;\n");
  }

  #[test]
  fn type_directive_is_inert() {
    let module = Module::from_source("#module m\n#type fragment\n#type\n").unwrap();
    assert_eq!(module.stage(), Stage::None);
    assert_eq!(module.source(), "");
  }

  #[test]
  fn module_twice_is_semantic_error() {
    let err = Module::from_source("#module foo\n#module foo\n").unwrap_err();
    let loc = err.location().unwrap();

    assert_eq!(err.kind(), ErrorKind::Semantic);
    assert_eq!(loc.line, 2);
    assert_eq!(loc.column, 8);
  }

  #[test]
  fn module_without_argument() {
    let err = Module::from_source("#module\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);

    let err = Module::from_source("#module   \n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
  }

  #[test]
  fn module_invalid_name() {
    for src in &["#module 3d\n", "#module -x\n", "#module a.b\n", "#module two words\n"] {
      assert_eq!(Module::from_source(src).unwrap_err().kind(), ErrorKind::Syntax, "{:?}", src);
    }
  }

  #[test]
  fn require_dedup() {
    let module = Module::from_source("#module m\n#require a, a\n").unwrap();
    assert_eq!(deps(&module), vec!["a"]);

    let module = Module::from_source("#module m\n#require a\nint x;\n#require a\n").unwrap();
    assert_eq!(deps(&module), vec!["a"]);

    let (module, repeated) = build_from_source("#module m\n#require a, b\n#require b,c , a\n", ParseOptions::default()).unwrap();
    assert_eq!(deps(&module), vec!["a", "b", "c"]);
    assert_eq!(repeated, 2);
  }

  #[test]
  fn require_compares_whole_names() {
    let module = Module::from_source("#module m\n#require quaternion\n#require quat\n").unwrap();
    assert_eq!(deps(&module), vec!["quaternion", "quat"]);
  }

  #[test]
  fn require_errors() {
    let cases = &[
      "#module m\n#require\n",
      "#module m\n#require a,,b\n",
      "#module m\n#require a b\n",
      "#module m\n#require 1a\n",
      "#module m\n#require a,\n",
    ];

    for src in cases {
      let err = Module::from_source(src).unwrap_err();
      assert_eq!(err.kind(), ErrorKind::Syntax, "{:?}", src);
      assert_eq!(err.location().unwrap().line, 2);
    }
  }

  #[test]
  fn require_self() {
    let err = Module::from_source("#require me\n#module me\n").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CircularDependency);
    assert_eq!(err.detail(), "me");
  }

  #[test]
  fn no_name_in_memory() {
    let err = Module::from_source("#require a\nvoid f();\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ModuleNoName);
  }

  #[test]
  fn keyword_too_long() {
    let src = format!("#module m\n  #{}\n", "k".repeat(MAX_KEYWORD_LEN + 1));
    let err = Module::from_source(&src).unwrap_err();
    let loc = err.location().unwrap();

    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert_eq!((loc.line, loc.column), (2, 3));
  }

  #[test]
  fn null_byte_rejected() {
    let err = Module::from_source("#module m\nint\0 x;\n").unwrap_err();
    let loc = err.location().unwrap();

    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert_eq!((loc.line, loc.column), (2, 3));
  }

  #[test]
  fn last_line_without_newline() {
    let module = Module::from_source("int x;\n#module last").unwrap();

    assert_eq!(module.name(), "last");
    assert_eq!(module.source(), "int x;\n");
  }

  #[test]
  fn inferred_names() {
    assert_eq!(infer_name(Path::new("shaders/noise.glsl")), "noise");
    assert_eq!(infer_name(Path::new("noise")), "noise");
    assert_eq!(infer_name(Path::new("a/b.c/noise.frag.glsl")), "noise.frag");
    assert_eq!(infer_name(Path::new("shaders/.glsl")), "");
  }

  #[test]
  fn load_infers_name_and_records_origin() {
    let mut ctx = MemoryContext::default();
    ctx.fs.insert("shaders/noise.glsl", "#require hash\nfloat noise(vec2 p);\n");

    let module = Module::from_file(&mut ctx, "shaders/noise.glsl").unwrap();
    let origin = module.origin().unwrap();

    assert_eq!(module.name(), "noise");
    assert_eq!(deps(&module), vec!["hash"]);
    assert_eq!(origin.path, Path::new("shaders/noise.glsl"));
    assert_eq!(origin.mtime, ctx.fs.probe_mtime(Path::new("shaders/noise.glsl")).unwrap());
    assert!(!module.is_dirty());
  }

  #[test]
  fn load_directive_wins_over_file_name() {
    let mut ctx = MemoryContext::default();
    ctx.fs.insert("shaders/main.glsl", "#module entry\n");

    assert_eq!(Module::from_file(&mut ctx, "shaders/main.glsl").unwrap().name(), "entry");
  }

  #[test]
  fn load_without_usable_name() {
    let mut ctx = MemoryContext::default();
    ctx.fs.insert("shaders/.glsl", "int x;\n");
    ctx.fs.insert("shaders/my.noise.glsl", "int x;\n");

    let err = Module::from_file(&mut ctx, "shaders/.glsl").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ModuleNoName);
    assert_eq!(err.location().unwrap().file, "shaders/.glsl");

    let err = Module::from_file(&mut ctx, "shaders/my.noise.glsl").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ModuleNoName);
  }

  #[test]
  fn load_errors_point_at_file() {
    let mut ctx = MemoryContext::default();
    ctx.fs.insert("bad.glsl", "int x;\n#module 9lives\n");

    let err = Module::from_file(&mut ctx, "bad.glsl").unwrap_err();
    assert_eq!(err.to_string(), "bad.glsl:2:8: error: Syntax error, invalid module name.");

    let err = Module::from_file(&mut ctx, "missing.glsl").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FileOpen);
  }
}
