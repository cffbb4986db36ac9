//! # fondue
//!
//! A GLSL module linker. Shader sources are split into modules that name themselves and list the
//! modules they need with a couple of directives:
//!
//! ```glsl
//! #module main
//! #require lighting, tonemap
//!
//! void main() { … }
//! ```
//!
//! Modules are imported into a [`ModuleSet`], sorted by dependency from a root module and
//! assembled into a single shader, every requirement coming before the modules that need it.
//! File-backed modules can then be watched and hot-swapped when their files change.
//!
//! ```ignore
//! use fondue::{AssembleOptions, DefaultContext, assemble, import_from_str};
//!
//! let mut ctx = DefaultContext::new();
//! let mut set = import_from_str(&mut ctx, "main.glsl, lighting.glsl, tonemap.glsl", "shaders")?;
//! let shader = assemble(&set, "main", AssembleOptions::default())?;
//!
//! // later, in your render loop
//! if set.watch(&mut ctx)?.is_changed() {
//!   set.swap_dirty(&mut ctx)?;
//!   let shader = assemble(&set, "main", AssembleOptions::default())?;
//! }
//! ```
//!
//! Everything touching the outer world (files, logs) goes through a [`Context`], so that modules
//! can as well be read from memory or from a packed archive.

#[macro_use]
pub mod logger;

pub mod assemble;
pub mod config;
pub mod context;
pub mod error;
pub mod fs;
pub mod helpers;
pub mod import;
pub mod module;
pub mod set;
pub mod sort;
pub mod text;
pub mod watch;

pub use crate::assemble::{AssembleOptions, Shader, assemble};
pub use crate::config::{Config, List};
pub use crate::context::{Context, ContextOf, DefaultContext, MemoryContext};
pub use crate::error::{Error, ErrorKind, Location, Result};
pub use crate::fs::{FileSystem, MemoryFileSystem, StdFileSystem};
pub use crate::helpers::report;
pub use crate::import::{Importer, import_from_file, import_from_slice, import_from_str};
pub use crate::logger::{LogFacade, Logger, NullLogger, TermLogger};
pub use crate::module::{Module, Origin, ParseOptions, Stage};
pub use crate::set::ModuleSet;
pub use crate::sort::{Order, sort};
pub use crate::watch::WatchStatus;
