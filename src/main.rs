use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::thread;
use std::time::Duration;

use fondue::{
  Config, Context, DefaultContext, Error, ErrorKind, List, Module, ModuleSet, Result, WatchStatus, assemble, info, report
};
use structopt::StructOpt;

/// Link GLSL modules into a single shader.
#[derive(StructOpt, Debug)]
#[structopt(name = "fondue")]
struct Opt {
  /// Project configuration file (JSON). Other options override its values.
  #[structopt(short = "c", long = "config", parse(from_os_str))]
  config: Option<PathBuf>,

  /// Comma-separated list of modules to import.
  #[structopt(short = "m", long = "modules")]
  modules: Option<String>,

  /// Directories to look modules up in, separated as in PATH.
  #[structopt(short = "s", long = "search-paths")]
  search_paths: Option<String>,

  /// Name of the module to assemble (defaults to “main”).
  #[structopt(short = "r", long = "root")]
  root: Option<String>,

  /// Don’t precede modules with a header comment.
  #[structopt(long = "no-header")]
  no_header: bool,

  /// Keep unrecognized directives, such as #version, in the output.
  #[structopt(long = "keep-unknown-directives")]
  keep_unknown_directives: bool,

  /// Write the shader to a file instead of stdout.
  #[structopt(short = "o", long = "output", parse(from_os_str))]
  output: Option<PathBuf>,

  /// Keep running, assembling again whenever a module changes.
  #[structopt(short = "w", long = "watch")]
  watch: bool,

  /// Watch polling interval, in milliseconds.
  #[structopt(long = "interval-ms", default_value = "500")]
  interval_ms: u64,
}

fn main() {
  let opt = Opt::from_args();
  let mut ctx = DefaultContext::new();

  let config = match config(&mut ctx, &opt) {
    Ok(config) => config,
    Err(_) => process::exit(1),
  };

  if opt.watch {
    watch(&mut ctx, &config, Duration::from_millis(opt.interval_ms));
  } else if build(&mut ctx, &config).is_err() {
    process::exit(1);
  }
}

/// Merge the configuration file with the command line.
fn config<C>(ctx: &mut C, opt: &Opt) -> Result<Config> where C: Context {
  let mut config = match opt.config {
    Some(ref path) => Config::load(ctx, path)?,
    None => {
      let r = opt
        .modules
        .clone()
        .map(|modules| Config::new(List::Joined(modules)))
        .ok_or_else(|| Error::new(ErrorKind::Semantic, "no module to import; use --modules or --config"));
      report(ctx, r)?
    }
  };

  if let Some(ref modules) = opt.modules {
    config.modules = List::Joined(modules.clone());
  }

  if let Some(ref search_paths) = opt.search_paths {
    config.search_paths = List::Joined(search_paths.clone());
  }

  if let Some(ref root) = opt.root {
    config.root = root.clone();
  }

  if opt.output.is_some() {
    config.output = opt.output.clone();
  }

  config.header_comments &= !opt.no_header;
  config.keep_unknown_directives |= opt.keep_unknown_directives;

  Ok(config)
}

fn build<C>(ctx: &mut C, config: &Config) -> Result<ModuleSet> where C: Context {
  let set = config.import(ctx)?;
  emit(ctx, &set, config)?;
  Ok(set)
}

fn emit<C>(ctx: &mut C, set: &ModuleSet, config: &Config) -> Result<()> where C: Context {
  let r = assemble(set, &config.root, config.assemble_options()).and_then(|shader| {
    match config.output {
      Some(ref path) => write_file(path, shader.as_bytes()),
      None => io::stdout().write_all(shader.as_bytes()).map_err(|e| Error::new(ErrorKind::FileOpen, e.to_string())),
    }
  });

  report(ctx, r)?;

  if let Some(ref path) = config.output {
    info!(ctx.logger(), "wrote {} ({} module(s))", path.display(), set.len());
  }

  Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
  let mut fh = File::create(path).map_err(|e| Error::new(ErrorKind::FileOpen, e.to_string()).in_file(path))?;
  fh.write_all(bytes).map_err(|e| Error::new(ErrorKind::FileOpen, e.to_string()).in_file(path))
}

/// Poll forever. Errors are logged and polling goes on.
fn watch<C>(ctx: &mut C, config: &Config, interval: Duration) where C: Context {
  let mut set = import(ctx, config);

  loop {
    thread::sleep(interval);

    if let Some(ref mut set) = set {
      let changed = set.watch(ctx).map(WatchStatus::is_changed).unwrap_or(false);

      // modules left dirty by a failed swap are retried as well
      if changed || set.iter().any(Module::is_dirty) {
        if set.swap_dirty(ctx).is_ok() {
          let _ = emit(ctx, set, config);
        }
      }

      continue;
    }

    // nothing imported yet; try again from scratch
    set = import(ctx, config);
  }
}

fn import<C>(ctx: &mut C, config: &Config) -> Option<ModuleSet> where C: Context {
  let set = config.import(ctx).ok()?;
  let _ = emit(ctx, &set, config);
  Some(set)
}
