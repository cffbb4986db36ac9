//! Logger.
//!
//! Diagnostics are sent through a [`Logger`], which is part of the [`Context`] handed to every
//! operation that touches the file system. Logging is best effort: it never changes the outcome
//! of an operation.
//!
//! [`Context`]: crate::context::Context

use chrono::{Datelike, Local, Timelike};
use std::fmt::Arguments;

/// Trait use to log activity.
pub trait Logger {
  /// Log some information.
  fn info(&mut self, args: Arguments);
  /// Log some debug information.
  fn debug(&mut self, args: Arguments);
  /// Log some warnings.
  fn warn(&mut self, args: Arguments);
  /// Log some errors.
  fn error(&mut self, args: Arguments);
}

impl<'a, L> Logger for &'a mut L where L: Logger + ?Sized {
  fn info(&mut self, args: Arguments) {
    (**self).info(args)
  }

  fn debug(&mut self, args: Arguments) {
    (**self).debug(args)
  }

  fn warn(&mut self, args: Arguments) {
    (**self).warn(args)
  }

  fn error(&mut self, args: Arguments) {
    (**self).error(args)
  }
}

/// Colored, timestamped logger writing on stderr.
///
/// stdout is left alone so that an assembled shader can be piped somewhere else.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct TermLogger;

impl Logger for TermLogger {
  fn info(&mut self, args: Arguments) {
    eprintln!("\x1b[90m{} \x1b[34m> {}\x1b[0m", now(), args);
  }

  fn debug(&mut self, args: Arguments) {
    eprintln!("\x1b[90m{} \x1b[36m> {}\x1b[0m", now(), args);
  }

  fn warn(&mut self, args: Arguments) {
    eprintln!("\x1b[90m{} \x1b[33m> {}\x1b[0m", now(), args);
  }

  fn error(&mut self, args: Arguments) {
    eprintln!("\x1b[90m{} \x1b[1;31m> {}\x1b[0;0m", now(), args);
  }
}

/// Logger that drops everything.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct NullLogger;

impl Logger for NullLogger {
  fn info(&mut self, _: Arguments) {}

  fn debug(&mut self, _: Arguments) {}

  fn warn(&mut self, _: Arguments) {}

  fn error(&mut self, _: Arguments) {}
}

/// Logger forwarding to the [log](https://crates.io/crates/log) facade.
///
/// Use it when your application already installs a `log` backend.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct LogFacade;

impl Logger for LogFacade {
  fn info(&mut self, args: Arguments) {
    log::info!("{}", args);
  }

  fn debug(&mut self, args: Arguments) {
    log::debug!("{}", args);
  }

  fn warn(&mut self, args: Arguments) {
    log::warn!("{}", args);
  }

  fn error(&mut self, args: Arguments) {
    log::error!("{}", args);
  }
}

pub fn now() -> String {
  let t = Local::now();

  format!("{month:0>2}/{day:0>2}/{year} {hour:0>2}:{min:0>2}:{secs:0>2}:{nsecs:0>9}",
          month = t.month(),
          day = t.day(),
          year = t.year(),
          hour = t.hour(),
          min = t.minute(),
          secs = t.second(),
          nsecs = t.nanosecond())
}

#[macro_export]
macro_rules! info {
  ($logger:expr, $($arg:tt)+) => {{
    use $crate::logger::Logger;
    $logger.info(format_args!($($arg)+));
  }}
}

#[macro_export]
macro_rules! debug {
  ($logger:expr, $($arg:tt)+) => {{
    use $crate::logger::Logger;
    $logger.debug(format_args!($($arg)+));
  }}
}

#[macro_export]
macro_rules! warn {
  ($logger:expr, $($arg:tt)+) => {{
    use $crate::logger::Logger;
    $logger.warn(format_args!($($arg)+));
  }}
}

#[macro_export]
macro_rules! error {
  ($logger:expr, $($arg:tt)+) => {{
    use $crate::logger::Logger;
    $logger.error(format_args!($($arg)+));
  }}
}

#[cfg(test)]
pub mod tests {
  use super::*;

  /// Logger keeping every line in memory, tagged with its level.
  #[derive(Debug, Default)]
  pub struct MemLogger {
    pub lines: Vec<(&'static str, String)>,
  }

  impl Logger for MemLogger {
    fn info(&mut self, args: Arguments) {
      self.lines.push(("info", args.to_string()));
    }

    fn debug(&mut self, args: Arguments) {
      self.lines.push(("debug", args.to_string()));
    }

    fn warn(&mut self, args: Arguments) {
      self.lines.push(("warn", args.to_string()));
    }

    fn error(&mut self, args: Arguments) {
      self.lines.push(("error", args.to_string()));
    }
  }

  #[test]
  fn macros_route_levels() {
    let mut logger = MemLogger::default();

    info!(logger, "loaded {}", "main");
    warn!(logger, "repeated requirement {}", 3);
    error!(&mut logger, "oops");

    assert_eq!(logger.lines, vec![
      ("info", "loaded main".to_owned()),
      ("warn", "repeated requirement 3".to_owned()),
      ("error", "oops".to_owned()),
    ]);
  }

  #[test]
  fn timestamp_shape() {
    let t = now();
    // MM/DD/YYYY hh:mm:ss:nnnnnnnnn
    assert_eq!(t.split(' ').count(), 2);
    assert_eq!(t.split(' ').nth(1).map(|hms| hms.split(':').count()), Some(4));
  }
}
