//! Markdown renderer composing pulldown-cmark with highlighting and math.
//!
//! # Responsibility
//! - Parse markdown with the site's extension set.
//! - Replace fenced code blocks with highlighted HTML.
//! - Replace math spans with typeset MathML.
//!
//! # Invariants
//! - `render` is a pure function of the renderer config and its input.
//! - The grammar set is loaded once in `MarkdownRenderer::new`.

use crate::render::escape_text;
use crate::render::highlight::{Highlighter, PLAINTEXT};
use crate::render::math::{normalize_legacy_math_delimiters, render_math, MathMode};
use log::info;
use pulldown_cmark::{html, CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

const DEFAULT_LANG_PREFIX: &str = "hljs language-";

/// Immutable rendering options, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererConfig {
    /// Class prefix for the `<code>` element of fenced blocks.
    pub lang_prefix: String,
    /// Apply grammar highlighting to code blocks.
    pub highlight_code: bool,
    /// Recognize and typeset `$`/`$$` math.
    pub render_math: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            lang_prefix: DEFAULT_LANG_PREFIX.to_string(),
            highlight_code: true,
            render_math: true,
        }
    }
}

/// Configured markdown renderer shared by every page.
pub struct MarkdownRenderer {
    config: RendererConfig,
    options: Options,
    highlighter: Highlighter,
}

struct PendingCodeBlock {
    lang: Option<String>,
    source: String,
}

impl MarkdownRenderer {
    pub fn new(config: RendererConfig) -> Self {
        let mut options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS;
        if config.render_math {
            options.insert(Options::ENABLE_MATH);
        }

        info!(
            "event=renderer_init module=render status=ok highlight={} math={}",
            config.highlight_code, config.render_math
        );

        Self {
            config,
            options,
            highlighter: Highlighter::new(),
        }
    }

    /// Renders markdown to HTML.
    pub fn render(&self, markdown: &str) -> String {
        let mut pending: Option<PendingCodeBlock> = None;
        let events = Parser::new_ext(markdown, self.options).filter_map(|event| match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                pending = Some(PendingCodeBlock {
                    lang: fence_language(&kind),
                    source: String::new(),
                });
                None
            }
            Event::Text(text) if pending.is_some() => {
                if let Some(block) = pending.as_mut() {
                    block.source.push_str(&text);
                }
                None
            }
            Event::End(TagEnd::CodeBlock) => pending
                .take()
                .map(|block| Event::Html(self.code_block_html(&block).into())),
            Event::InlineMath(expression) => Some(Event::InlineHtml(
                render_math(&expression, MathMode::Inline).into(),
            )),
            Event::DisplayMath(expression) => Some(Event::InlineHtml(
                render_math(&expression, MathMode::Display).into(),
            )),
            other => Some(other),
        });

        let mut out = String::with_capacity(markdown.len() + markdown.len() / 2);
        html::push_html(&mut out, events);
        out
    }

    /// Applies the legacy `\(`/`\[` delimiter transform, then renders.
    pub fn render_legacy(&self, markdown: &str) -> String {
        self.render(&normalize_legacy_math_delimiters(markdown))
    }

    fn code_block_html(&self, block: &PendingCodeBlock) -> String {
        let (inner, label) = if self.config.highlight_code {
            let out = self.highlighter.highlight(&block.source, block.lang.as_deref());
            let label = match block.lang.as_deref() {
                Some(lang) if out.highlighted => lang,
                _ => PLAINTEXT,
            };
            (out.html, label)
        } else {
            (
                escape_text(&block.source),
                block.lang.as_deref().unwrap_or(PLAINTEXT),
            )
        };

        format!(
            "<pre><code class=\"{}{}\">{}</code></pre>\n",
            escape_text(&self.config.lang_prefix),
            escape_text(label),
            inner
        )
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new(RendererConfig::default())
    }
}

fn fence_language(kind: &CodeBlockKind<'_>) -> Option<String> {
    match kind {
        CodeBlockKind::Fenced(info) => info
            .split_whitespace()
            .next()
            .map(|token| token.to_string()),
        CodeBlockKind::Indented => None,
    }
}
