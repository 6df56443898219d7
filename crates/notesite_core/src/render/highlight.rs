//! Fenced code block highlighting backed by syntect grammars.
//!
//! # Invariants
//! - Unknown or missing languages use the plaintext grammar.
//! - `highlight` always returns HTML: grammar errors and panics inside the
//!   highlighter fall back to the escaped source.

use crate::render::escape_text;
use log::warn;
use std::panic::{catch_unwind, AssertUnwindSafe};
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

/// Token class prefix, compatible with highlight.js themes.
const TOKEN_CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hljs-" };

/// Language label reported for blocks without a known grammar.
pub const PLAINTEXT: &str = "plaintext";

/// Grammar registry loaded once and reused for every block.
pub struct Highlighter {
    syntaxes: SyntaxSet,
}

/// Outcome of highlighting one code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightedCode {
    /// Inner HTML for the `<code>` element.
    pub html: String,
    /// Whether a grammar other than plaintext was applied.
    pub highlighted: bool,
}

impl Highlighter {
    /// Loads the bundled grammar set.
    pub fn new() -> Self {
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
        }
    }

    /// Highlights `code` with the grammar for `lang`, or plaintext.
    pub fn highlight(&self, code: &str, lang: Option<&str>) -> HighlightedCode {
        let syntax = lang.and_then(|lang| self.find_syntax(lang));
        let highlighted = syntax.is_some();
        let syntax = syntax.unwrap_or_else(|| self.syntaxes.find_syntax_plain_text());

        let attempt = catch_unwind(AssertUnwindSafe(|| self.highlight_with(code, syntax)));
        match attempt {
            Ok(Ok(html)) => HighlightedCode { html, highlighted },
            Ok(Err(err)) => {
                warn!(
                    "event=highlight_fallback module=render status=error syntax={} error={err}",
                    syntax.name
                );
                escaped(code)
            }
            Err(_) => {
                warn!(
                    "event=highlight_fallback module=render status=panic syntax={}",
                    syntax.name
                );
                escaped(code)
            }
        }
    }

    fn find_syntax(&self, lang: &str) -> Option<&SyntaxReference> {
        let lang = lang.trim();
        if lang.is_empty() || lang.eq_ignore_ascii_case(PLAINTEXT) {
            return None;
        }
        self.syntaxes.find_syntax_by_token(lang)
    }

    fn highlight_with(
        &self,
        code: &str,
        syntax: &SyntaxReference,
    ) -> Result<String, syntect::Error> {
        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntaxes, TOKEN_CLASS_STYLE);
        for line in LinesWithEndings::from(code) {
            generator.parse_html_for_line_which_includes_newline(line)?;
        }
        Ok(generator.finalize())
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

fn escaped(code: &str) -> HighlightedCode {
    HighlightedCode {
        html: escape_text(code),
        highlighted: false,
    }
}

#[cfg(test)]
mod tests {
    use super::Highlighter;

    #[test]
    fn known_language_emits_token_spans() {
        let highlighter = Highlighter::new();
        let out = highlighter.highlight("fn main() {}\n", Some("rust"));
        assert!(out.highlighted);
        assert!(out.html.contains("hljs-"));
        assert!(out.html.contains("main"));
    }

    #[test]
    fn extension_tokens_resolve_grammars() {
        let highlighter = Highlighter::new();
        assert!(highlighter.highlight("let a = 1;\n", Some("rs")).highlighted);
        assert!(highlighter.highlight("x = 1\n", Some("Python")).highlighted);
        assert!(!highlighter.highlight("x\n", Some("nosuchlang")).highlighted);
    }

    #[test]
    fn unknown_language_falls_back_to_plaintext() {
        let highlighter = Highlighter::new();
        let out = highlighter.highlight("a < b\n", Some("nosuchlang"));
        assert!(!out.highlighted);
        assert!(out.html.contains("a &lt; b"));
    }

    #[test]
    fn missing_language_is_plaintext() {
        let highlighter = Highlighter::new();
        let out = highlighter.highlight("plain\n", None);
        assert!(!out.highlighted);
        assert!(out.html.contains("plain"));
    }
}
