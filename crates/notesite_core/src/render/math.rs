//! LaTeX math typesetting and the legacy delimiter transform.
//!
//! # Responsibility
//! - Typeset `$…$` / `$$…$$` expressions into MathML.
//! - Rewrite `\(…\)` / `\[…\]` into dollar delimiters on request.
//!
//! # Invariants
//! - Typesetting never fails the caller: any error yields the escaped raw
//!   expression wrapped in `<span class="math-error">`.
//! - The legacy transform is never applied implicitly.

use crate::render::escape_text;
use latex2mathml::{latex_to_mathml, DisplayStyle};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::panic::{catch_unwind, AssertUnwindSafe};

static LEGACY_DELIMITER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\(\(|\[)|\\(\)|\])").expect("valid legacy delimiter regex"));
static TOKEN_ELEMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<(mi|mn|mo|mtext)(\s[^>]*)?>(.*?)</(mi|mn|mo|mtext)>")
        .expect("valid token element regex")
});
static CHAR_REFERENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&#x[0-9A-Fa-f]+;").expect("valid char reference regex"));

/// Marker the typesetter embeds in its output for nodes it cannot convert.
const PARSE_ERROR_MARKER: &str = "[PARSE ERROR";

/// Placement of a math expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathMode {
    /// `$…$`, flows with surrounding text.
    Inline,
    /// `$$…$$`, rendered as its own block.
    Display,
}

impl MathMode {
    fn delimiter(self) -> &'static str {
        match self {
            Self::Inline => "$",
            Self::Display => "$$",
        }
    }

    fn style(self) -> DisplayStyle {
        match self {
            Self::Inline => DisplayStyle::Inline,
            Self::Display => DisplayStyle::Block,
        }
    }
}

/// Typesets one expression, falling back to its raw source on error.
pub fn render_math(expression: &str, mode: MathMode) -> String {
    match typeset(expression, mode) {
        Ok(markup) => markup,
        Err(reason) => {
            debug!("event=math_fallback module=render status=error reason={reason}");
            let delimiter = mode.delimiter();
            format!(
                "<span class=\"math-error\" title=\"{}\">{}</span>",
                escape_text(&reason),
                escape_text(&format!("{delimiter}{expression}{delimiter}"))
            )
        }
    }
}

fn typeset(expression: &str, mode: MathMode) -> Result<String, String> {
    if expression.trim().is_empty() {
        return Err("empty expression".to_string());
    }
    // Unbalanced groups never typeset.
    check_braces(expression)?;

    let markup = catch_unwind(AssertUnwindSafe(|| latex_to_mathml(expression, mode.style())))
        .map_err(|_| "math typesetter panicked".to_string())?
        .map_err(|err| err.to_string())?;
    // Missing arguments and unknown commands still produce `Ok` markup.
    if markup.contains(PARSE_ERROR_MARKER) {
        return Err("expression contains unsupported or incomplete commands".to_string());
    }
    Ok(escape_token_text(&markup).into_owned())
}

/// Escapes the text content of MathML token elements.
///
/// The typesetter writes operators such as `<` and `&` verbatim; its own
/// `&#x…;` character references are kept.
fn escape_token_text(markup: &str) -> Cow<'_, str> {
    TOKEN_ELEMENT_RE.replace_all(markup, |caps: &regex::Captures<'_>| {
        if caps[1] != caps[4] {
            return caps[0].to_string();
        }
        format!(
            "<{name}{attrs}>{text}</{name}>",
            name = &caps[1],
            attrs = caps.get(2).map_or("", |m| m.as_str()),
            text = escape_token_content(&caps[3]),
        )
    })
}

fn escape_token_content(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let mut last = 0;
    for reference in CHAR_REFERENCE_RE.find_iter(text) {
        escaped.push_str(&escape_text(&text[last..reference.start()]));
        escaped.push_str(reference.as_str());
        last = reference.end();
    }
    escaped.push_str(&escape_text(&text[last..]));
    escaped
}

fn check_braces(expression: &str) -> Result<(), String> {
    let mut depth: usize = 0;
    let mut chars = expression.chars();
    while let Some(ch) = chars.next() {
        match ch {
            // `\{` and `\}` are literal braces.
            '\\' => {
                chars.next();
            }
            '{' => depth += 1,
            '}' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| "unexpected `}`".to_string())?;
            }
            _ => {}
        }
    }
    if depth == 0 {
        Ok(())
    } else {
        Err(format!("{depth} unclosed `{{`"))
    }
}

/// Rewrites `\(`/`\)` to `$` and `\[`/`\]` to `$$`.
///
/// Opt-in convenience for documents written with the older delimiter
/// convention. Returns the input unchanged when no legacy delimiter occurs.
pub fn normalize_legacy_math_delimiters(markdown: &str) -> Cow<'_, str> {
    LEGACY_DELIMITER_RE.replace_all(markdown, |caps: &regex::Captures<'_>| {
        match &caps[0] {
            r"\(" | r"\)" => "$",
            _ => "$$",
        }
    })
}

#[cfg(test)]
mod tests {
    use super::{
        check_braces, escape_token_text, normalize_legacy_math_delimiters, render_math, MathMode,
    };
    use std::borrow::Cow;

    #[test]
    fn inline_expression_becomes_mathml() {
        let html = render_math("x^2", MathMode::Inline);
        assert!(html.contains("<math"));
        assert!(html.contains("msup"));
    }

    #[test]
    fn display_expression_uses_block_style() {
        let html = render_math("x", MathMode::Display);
        assert!(html.contains("display=\"block\""));
    }

    #[test]
    fn malformed_expression_falls_back_to_source() {
        let html = render_math(r"\frac{1", MathMode::Inline);
        assert!(html.starts_with("<span class=\"math-error\""));
        assert!(html.contains(r"$\frac{1$"));
        assert!(!html.contains("<math"));
    }

    #[test]
    fn missing_argument_falls_back_to_source() {
        let html = render_math(r"\frac{1}", MathMode::Inline);
        assert!(html.starts_with("<span class=\"math-error\""));
        assert!(html.contains(r"$\frac{1}$"));
        assert!(!html.contains("PARSE ERROR"));
    }

    #[test]
    fn unknown_command_falls_back_to_source() {
        let html = render_math(r"\unknowncmd{x}", MathMode::Display);
        assert!(html.starts_with("<span class=\"math-error\""));
        assert!(html.contains(r"$$\unknowncmd{x}$$"));
        assert!(!html.contains("<math"));
    }

    #[test]
    fn comparison_operators_are_escaped() {
        let html = render_math("a<b", MathMode::Inline);
        assert!(html.contains("<mo>&lt;</mo>"));
        assert!(!html.contains("<mo><</mo>"));
    }

    #[test]
    fn escaped_ampersand_is_an_entity() {
        let html = render_math(r"a \& b", MathMode::Inline);
        assert!(html.contains("&amp;</mi>"));
        assert!(!html.contains(">&<"));
    }

    #[test]
    fn token_escaping_keeps_character_references() {
        assert_eq!(
            escape_token_text("<mi>sin</mi><mo>&#x2061;</mo><mo>></mo>"),
            "<mi>sin</mi><mo>&#x2061;</mo><mo>&gt;</mo>"
        );
        assert_eq!(
            escape_token_text(r#"<mi mathvariant="normal">&</mi>"#),
            r#"<mi mathvariant="normal">&amp;</mi>"#
        );
    }

    #[test]
    fn escaped_braces_do_not_count_as_groups() {
        assert!(check_braces(r"\{x\}").is_ok());
        assert!(check_braces("}{").is_err());
    }

    #[test]
    fn legacy_transform_maps_both_delimiter_pairs() {
        assert_eq!(
            normalize_legacy_math_delimiters(r"a \(x\) b \[y\]"),
            "a $x$ b $$y$$"
        );
    }

    #[test]
    fn legacy_transform_borrows_when_untouched() {
        assert!(matches!(
            normalize_legacy_math_delimiters("$x$ only"),
            Cow::Borrowed(_)
        ));
    }
}
