use crate::color::ColorFormat;
use crate::error::{ColorError, ColorResult};
use regex::Regex;
use std::sync::LazyLock;

/// Characters allowed inside a payload
const PAYLOAD: &str = r"[a-zA-Z0-9\s,;°%]*";

/// Outer shape. Groups: 2 short token, 4 tag, 5 opener, 6 payload, 7 closer.
static MAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(&format!(
    r"^\s*(#?\s*(([a-zA-Z0-9]{{3}}){{1,2}})|((?i:rgb|hsl|hex))?\s*(\s+|\[|\(|\{{)({PAYLOAD})(\s*|\]|\)|\}}))\s*$"
  ))
  .unwrap()
});

/// Wrapper shape. Groups: 1 space-wrapped, 2 `[]`, 3 `()`, 4 `{}`.
static BRACKETS_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(&format!(
    r"^\s*(?:\s({PAYLOAD})\s|\[({PAYLOAD})\]|\(({PAYLOAD})\)|\{{({PAYLOAD})\}})\s*$"
  ))
  .unwrap()
});

/// Result of classifying raw input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotationMatch {
  /// Explicit notation tag, if the input carried one
  pub tag: Option<ColorFormat>,
  /// Payload with any wrapper removed
  pub inner: String,
}

/// Classify `raw` into an optional notation tag and the unwrapped payload
pub fn match_notation(raw: &str) -> ColorResult<NotationMatch> {
  if raw.trim().is_empty() {
    return Err(ColorError::Blank);
  }

  let Some(main) = MAIN_RE.captures(raw) else {
    // Still try to peel a wrapper off, e.g. "255, 0, 0" or "(-1,0,0)"
    let inner =
      unwrap_brackets(&format!(" {} ", raw)).unwrap_or_else(|| raw.trim().to_string());
    return Ok(NotationMatch { tag: None, inner });
  };

  // Short token short-circuits the rest
  if let Some(token) = main.get(2) {
    return Ok(NotationMatch {
      tag: Some(ColorFormat::Hex),
      inner: token.as_str().to_string(),
    });
  }

  let tag = main.get(4).and_then(|t| t.as_str().parse().ok());
  let wrapped = format!(
    " {}{}{} ",
    main.get(5).map_or("", |m| m.as_str()),
    main.get(6).map_or("", |m| m.as_str()),
    main.get(7).map_or("", |m| m.as_str()),
  );

  let inner = unwrap_brackets(&wrapped).unwrap_or_else(|| raw.trim().to_string());
  Ok(NotationMatch { tag, inner })
}

/// Return the text enclosed by a whitespace or bracket wrapper
fn unwrap_brackets(value: &str) -> Option<String> {
  let caps = BRACKETS_RE.captures(value)?;
  (1..=4)
    .find_map(|i| caps.get(i))
    .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn matched(raw: &str) -> NotationMatch {
    match_notation(raw).unwrap()
  }

  #[test]
  fn blank_input_is_rejected() {
    assert_eq!(match_notation(""), Err(ColorError::Blank));
    assert_eq!(match_notation("   \t"), Err(ColorError::Blank));
  }

  #[test]
  fn short_token_is_hex() {
    let m = matched("  FF0000  ");
    assert_eq!(m.tag, Some(ColorFormat::Hex));
    assert_eq!(m.inner, "FF0000");

    let m = matched("#f00");
    assert_eq!(m.tag, Some(ColorFormat::Hex));
    assert_eq!(m.inner, "f00");
  }

  #[test]
  fn tagged_brackets_are_unwrapped() {
    let m = matched("rgb(255, 0, 0)");
    assert_eq!(m.tag, Some(ColorFormat::Rgb));
    assert_eq!(m.inner, "255, 0, 0");

    let m = matched("HSL{200 50% 50%}");
    assert_eq!(m.tag, Some(ColorFormat::Hsl));
    assert_eq!(m.inner, "200 50% 50%");
  }

  #[test]
  fn tag_with_whitespace_separator() {
    let m = matched("hsl 200, 50%, 50%");
    assert_eq!(m.tag, Some(ColorFormat::Hsl));
    assert_eq!(m.inner.trim(), "200, 50%, 50%");
  }

  #[test]
  fn untagged_payloads() {
    let m = matched("[1,2,3]");
    assert_eq!(m.tag, None);
    assert_eq!(m.inner, "1,2,3");

    let m = matched("1;2;3");
    assert_eq!(m.tag, None);
    assert_eq!(m.inner, "1;2;3");
  }

  #[test]
  fn mismatched_brackets_fall_back_to_raw_text() {
    let m = matched("rgb(1,2,3]");
    assert_eq!(m.tag, Some(ColorFormat::Rgb));
    assert_eq!(m.inner, "rgb(1,2,3]");
  }
}
