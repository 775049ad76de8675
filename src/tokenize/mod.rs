//! Content tokenizer.
//!
//! Splits stored text into plain text, mention and hashtag tokens for
//! rendering. Mentions are resolved by label against a [`Directory`] at
//! tokenize time; a label that matches no entity, or more than one, stays
//! plain text. Nothing is cached between calls, so a label that becomes
//! ambiguous later simply stops linking.

mod directory;

pub use directory::{Directory, DirectoryError, EntityDirectory, SharedDirectory};

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::config::LinkConfig;
use crate::trigger::MentionCandidate;

/// Kind of a content token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Text,
    Mention,
    Hashtag,
}

/// What a resolved token links to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ResolvedEntity {
    User(MentionCandidate),
    /// Tag text without the `#`
    Hashtag { tag: String },
}

/// A run of content. `range` is a byte range into the tokenized string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub range: Range<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<ResolvedEntity>,
}

impl Token {
    fn text(source: &str, range: Range<usize>) -> Self {
        Self {
            kind: TokenKind::Text,
            text: source[range.clone()].to_string(),
            range,
            entity: None,
        }
    }

    /// Link target for a resolved token, from the configured templates
    pub fn href(&self, links: &LinkConfig) -> Option<String> {
        match self.entity.as_ref()? {
            ResolvedEntity::User(user) => Some(links.mention_href(&user.id)),
            ResolvedEntity::Hashtag { tag } => Some(links.hashtag_href(tag)),
        }
    }
}

fn mention_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Letters and digits, with single internal spaces between words
    RE.get_or_init(|| Regex::new(r"@[\p{L}\p{N}]+(?: [\p{L}\p{N}]+)*").unwrap())
}

fn hashtag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#[\p{L}\p{N}_]+").unwrap())
}

/// Split `text` into tokens.
///
/// The concatenation of every token's `text` equals the input. Adjacent
/// plain runs are merged into one text token.
pub fn tokenize<D: Directory + ?Sized>(text: &str, directory: &D) -> Vec<Token> {
    let mut matches: Vec<(TokenKind, Range<usize>)> = mention_regex()
        .find_iter(text)
        .map(|m| (TokenKind::Mention, m.range()))
        .chain(
            hashtag_regex()
                .find_iter(text)
                .map(|m| (TokenKind::Hashtag, m.range())),
        )
        .collect();
    matches.sort_by_key(|(_, range)| range.start);

    let mut tokens = Vec::new();
    let mut cursor = 0;

    for (kind, range) in matches {
        if range.start < cursor {
            continue;
        }
        if cursor < range.start {
            push_text(&mut tokens, text, cursor..range.start);
        }

        match kind {
            TokenKind::Hashtag => {
                let tag = text[range.start + 1..range.end].to_string();
                tokens.push(Token {
                    kind: TokenKind::Hashtag,
                    text: text[range.clone()].to_string(),
                    range: range.clone(),
                    entity: Some(ResolvedEntity::Hashtag { tag }),
                });
                cursor = range.end;
            }
            TokenKind::Mention => {
                let label = &text[range.start + 1..range.end];
                match resolve_label(label, directory) {
                    Some((len, user)) => {
                        let end = range.start + 1 + len;
                        tokens.push(Token {
                            kind: TokenKind::Mention,
                            text: text[range.start..end].to_string(),
                            range: range.start..end,
                            entity: Some(ResolvedEntity::User(user)),
                        });
                        cursor = end;
                    }
                    None => {
                        push_text(&mut tokens, text, range.clone());
                        cursor = range.end;
                    }
                }
            }
            TokenKind::Text => {}
        }
    }

    if cursor < text.len() {
        push_text(&mut tokens, text, cursor..text.len());
    }

    tracing::trace!(len = text.len(), tokens = tokens.len(), "tokenized");
    tokens
}

/// Resolve a greedy mention label to exactly one entity.
///
/// Tries the whole label, then each shorter prefix ending at a word
/// boundary. Stops at the first label that matches more than one entity:
/// that mention stays text rather than guessing. Returns the byte length
/// of the matched label.
fn resolve_label<D: Directory + ?Sized>(
    label: &str,
    directory: &D,
) -> Option<(usize, MentionCandidate)> {
    let mut ends: Vec<usize> = label.match_indices(' ').map(|(i, _)| i).collect();
    ends.push(label.len());

    for &end in ends.iter().rev() {
        let mut found = directory.lookup_by_label(&label[..end]);
        match found.len() {
            0 => continue,
            1 => return found.pop().map(|user| (end, user)),
            n => {
                tracing::debug!(label = &label[..end], matches = n, "ambiguous mention label");
                return None;
            }
        }
    }
    None
}

fn push_text(tokens: &mut Vec<Token>, source: &str, range: Range<usize>) {
    if let Some(last) = tokens.last_mut() {
        if last.kind == TokenKind::Text && last.range.end == range.start {
            last.range.end = range.end;
            last.text.push_str(&source[range]);
            return;
        }
    }
    tokens.push(Token::text(source, range));
}

/// Render tokens as Markdown, linking resolved mentions and hashtags
pub fn render_markdown(tokens: &[Token], links: &LinkConfig) -> String {
    let mut out = String::new();
    for token in tokens {
        match token.href(links) {
            Some(href) => {
                out.push('[');
                out.push_str(&token.text);
                out.push_str("](");
                out.push_str(&href);
                out.push(')');
            }
            None => out.push_str(&token.text),
        }
    }
    out
}
