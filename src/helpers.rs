use std::path::Path;
use std::time::Instant;

use crate::context::Context;
use crate::error::Result;

/// A trait that gives a compile-time string representation of a type – akin to the intrisics
/// core::intrisics::type_name, but without the unsafe / unstable interface, and more customizable
/// as it’s a closed set (not all types implement this trait).
pub trait TyDesc {
  const TY_DESC: &'static str;
}

/// Load helper.
///
/// Call this function whenever you need to load something from a path and that you want logged
/// information, such as failures, timing, etc.
pub fn load_with<T, A, C, F>(ctx: &mut C, path: &Path, loader: F) -> Result<A>
where C: Context,
      F: FnOnce(&mut C) -> Result<A>,
      T: TyDesc {
  debug!(ctx.logger(), "loading {} {}", T::TY_DESC, path.display());

  let start_time = Instant::now();
  let r = loader(ctx);
  let t = start_time.elapsed();
  let ns = t.as_secs() as f64 * 1e9 + t.subsec_nanos() as f64;
  let (pretty_time, suffix) = load_time(ns);

  if r.is_ok() {
    info!(ctx.logger(), "loaded {} {}: {:.3}{}", T::TY_DESC, path.display(), pretty_time, suffix);
  } else {
    warn!(ctx.logger(), "fail to load {} {}: {:.3}{}", T::TY_DESC, path.display(), pretty_time, suffix);
  }

  r
}

/// Report helper (pass-through).
///
/// This function will log any error that happens.
///
/// Whatever the result of the computation, this function returns it untouched.
pub fn report<C, A>(ctx: &mut C, r: Result<A>) -> Result<A> where C: Context {
  if let Err(ref e) = r {
    error!(ctx.logger(), "{}", e);
  }

  r
}

fn load_time<'a>(ns: f64) -> (f64, &'a str) {
  if ns >= 1e9 {
    (ns * 1e-9, "s")
  } else if ns >= 1e6 {
    (ns * 1e-6, "ms")
  } else if ns >= 1e3 {
    (ns * 1e-3, "μs")
  } else {
    (ns, "ns")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn load_time_units() {
    assert_eq!(load_time(12.), (12., "ns"));
    assert_eq!(load_time(2e3).1, "μs");
    assert_eq!(load_time(3.5e6).1, "ms");
    assert_eq!(load_time(1e9).1, "s");
  }
}
