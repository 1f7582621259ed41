//! Ordering of port version strings.
//!
//! Port versions are not semver: `1.2.13`, `2.0~beta1`, `r1_hrev57000`.
//! They are compared piecewise: runs of digits numerically, everything else
//! lexically. A piece starting with `~` marks a pre-release and sorts below
//! anything else, including the end of the version (`2.0~beta1` < `2.0`).

use std::cmp::Ordering;

#[derive(Debug, PartialEq, Eq)]
enum Piece<'a> {
  Number(u64, &'a str),
  Text(&'a str),
}

impl Ord for Piece<'_> {
  fn cmp(&self, other: &Self) -> Ordering {
    match (self, other) {
      // digits text breaks ties between equal values with different padding
      (Piece::Number(a, a_text), Piece::Number(b, b_text)) => a.cmp(b).then_with(|| a_text.cmp(b_text)),
      (Piece::Number(..), Piece::Text(_)) => Ordering::Greater,
      (Piece::Text(_), Piece::Number(..)) => Ordering::Less,
      (Piece::Text(a), Piece::Text(b)) => match (a.starts_with('~'), b.starts_with('~')) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.cmp(b),
      },
    }
  }
}

impl Piece<'_> {
  fn is_pre_release(&self) -> bool {
    matches!(self, Piece::Text(text) if text.starts_with('~'))
  }
}

impl PartialOrd for Piece<'_> {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

fn pieces(version: &str) -> Vec<Piece<'_>> {
  let mut result = Vec::new();
  let mut start = 0;
  let bytes = version.as_bytes();

  while start < bytes.len() {
    let digit = bytes[start].is_ascii_digit();
    let end = bytes[start..]
      .iter()
      .position(|b| b.is_ascii_digit() != digit)
      .map_or(bytes.len(), |offset| start + offset);
    let text = &version[start..end];

    if digit {
      result.push(Piece::Number(text.parse().unwrap_or(u64::MAX), text));
    } else {
      result.push(Piece::Text(text));
    }
    start = end;
  }

  result
}

/// Compare two port versions.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
  let (a, b) = (pieces(a), pieces(b));
  let (mut a, mut b) = (a.iter(), b.iter());

  loop {
    match (a.next(), b.next()) {
      (None, None) => return Ordering::Equal,
      (Some(rest), None) if rest.is_pre_release() => return Ordering::Less,
      (Some(_), None) => return Ordering::Greater,
      (None, Some(rest)) if rest.is_pre_release() => return Ordering::Greater,
      (None, Some(_)) => return Ordering::Less,
      (Some(x), Some(y)) => match x.cmp(y) {
        Ordering::Equal => continue,
        other => return other,
      },
    }
  }
}

/// Sort versions ascending, oldest first.
pub fn sort_versions(versions: &mut [String]) {
  versions.sort_by(|a, b| compare_versions(a, b));
}
