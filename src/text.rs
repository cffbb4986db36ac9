//! Character classification, line scanning and list splitting.
//!
//! Module sources are handled as bytes: every character that matters to the directive grammar is
//! ASCII, and everything else is copied around untouched.

use crate::error::{Error, Result};

/// Maximum length of a module name, in bytes.
pub const MAX_NAME_LEN: usize = 95;

/// Space or tab.
#[inline]
pub fn is_space(c: u8) -> bool {
  c == b' ' || c == b'\t'
}

/// Any whitespace, line breaks included.
#[inline]
pub fn is_white(c: u8) -> bool {
  is_space(c) || c == b'\n' || c == b'\r' || c == 0x0b || c == 0x0c
}

#[inline]
pub fn is_digit(c: u8) -> bool {
  c.is_ascii_digit()
}

#[inline]
pub fn is_letter(c: u8) -> bool {
  c.is_ascii_alphabetic()
}

/// Is `name` a valid module name?
///
/// Valid names contain letters, digits, `_` and `-`, cannot start with a digit or `-` and are at
/// most [`MAX_NAME_LEN`] bytes long.
pub fn is_valid_name(name: &str) -> bool {
  let bytes = name.as_bytes();

  match bytes.first() {
    None => false,
    Some(&first) if is_digit(first) || first == b'-' => false,
    Some(_) if bytes.len() > MAX_NAME_LEN => false,
    Some(_) => bytes.iter().all(|&c| is_letter(c) || is_digit(c) || c == b'_' || c == b'-'),
  }
}

/// Index of the first byte from `i` that is not a space.
#[inline]
pub fn skip_space(s: &[u8], mut i: usize) -> usize {
  while i < s.len() && is_space(s[i]) {
    i += 1;
  }

  i
}

/// Index of the first whitespace byte from `i`.
#[inline]
pub fn skip_nonwhite(s: &[u8], mut i: usize) -> usize {
  while i < s.len() && !is_white(s[i]) {
    i += 1;
  }

  i
}

/// Index right after the end of the line `i` is in (past its `\n`, if any).
#[inline]
pub fn skip_line(s: &[u8], i: usize) -> usize {
  match s[i..].iter().position(|&c| c == b'\n') {
    Some(nl) => i + nl + 1,
    None => s.len(),
  }
}

/// An entry of a delimited list, along with the line it was found at.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Token<'a> {
  pub text: &'a str,
  /// 1-based line.
  pub line: usize,
}

/// Split a `delim`-delimited list.
///
/// Whitespace (line breaks included) around entries is dropped. An entry is a run of
/// non-whitespace characters; finding anything else than whitespace between the end of an entry
/// and the next delimiter is a syntax error reported at the line it occurred. A blank input gives
/// no entry at all, while empty entries inside a list (`"a,,b"`) are kept as empty tokens.
pub fn split(s: &str, delim: char) -> Result<Vec<Token>> {
  let bytes = s.as_bytes();
  let mut tokens = Vec::new();

  if bytes.iter().all(|&c| is_white(c)) {
    return Ok(tokens);
  }

  debug_assert!(delim.is_ascii());
  let delim = delim as u8;
  let mut line = 1;
  let mut line_start = 0;
  let mut i = 0;

  loop {
    // leading whitespace
    while i < bytes.len() && is_white(bytes[i]) {
      if bytes[i] == b'\n' {
        line += 1;
        line_start = i + 1;
      }

      i += 1;
    }

    let start = i;
    let token_line = line;

    while i < bytes.len() && !is_white(bytes[i]) && bytes[i] != delim {
      i += 1;
    }

    tokens.push(Token { text: &s[start..i], line: token_line });

    // trailing whitespace, up to the delimiter
    while i < bytes.len() && bytes[i] != delim {
      if bytes[i] == b'\n' {
        line += 1;
        line_start = i + 1;
      } else if !is_white(bytes[i]) {
        return Err(Error::syntax(line, i - line_start, "unexpected character in list, expected a delimiter"));
      }

      i += 1;
    }

    if i == bytes.len() {
      break;
    }

    // skip the delimiter
    i += 1;
  }

  Ok(tokens)
}
