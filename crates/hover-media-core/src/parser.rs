//! Lossless stylesheet parser using the `cssparser` tokenizer.
//!
//! The parser builds a [`Stylesheet`] whose [`Raws`](crate::Raws) capture
//! every piece of formatting, so that stringifying an untouched tree gives
//! back the input byte-for-byte. It does not validate CSS: any prelude
//! followed by `{` becomes a rule, and anything else ending in `;` (or at
//! the end of a block) must be a `prop: value` declaration.

use std::mem;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cssparser::{Delimiter, ParseError as CssParseError, ParseErrorKind, Parser, ParserInput, Token};

use crate::logging::targets;
use crate::node::{NodeId, NodeType, Position, RawValue, Source};
use crate::stylesheet::Stylesheet;
use crate::{Error, Result};

/// Options for [`parse`].
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// File the CSS was read from. Recorded in every node's [`Source`].
    pub from: Option<PathBuf>,
}

impl ParseOptions {
    /// Set the input file name.
    pub fn with_from(mut self, from: impl Into<PathBuf>) -> Self {
        self.from = Some(from.into());
        self
    }
}

/// Parser-specific error kinds, converted to [`Error::Syntax`].
#[derive(Debug, Clone, PartialEq, Eq)]
enum SyntaxError {
    UnexpectedCloseBrace,
    UnknownWord(String),
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyntaxError::UnexpectedCloseBrace => write!(f, "Unexpected }}"),
            SyntaxError::UnknownWord(word) => write!(f, "Unknown word {word}"),
        }
    }
}

type ParseResult<'i, T> = std::result::Result<T, CssParseError<'i, SyntaxError>>;

/// Parse a CSS stylesheet into a tree.
///
/// # Example
///
/// ```
/// use hover_media_core::{parse, ParseOptions};
///
/// let sheet = parse("a { color: red }", &ParseOptions::default()).unwrap();
/// assert_eq!(sheet.to_css(), "a { color: red }");
/// ```
///
/// # Errors
///
/// Returns [`Error::Syntax`] for a `}` without a matching `{`, or for text
/// that is neither a rule nor a `prop: value` declaration.
pub fn parse(css: &str, options: &ParseOptions) -> Result<Stylesheet> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut builder = TreeBuilder {
        sheet: Stylesheet::new(),
        input: options.from.as_deref().map(Arc::<Path>::from),
    };

    let root = builder.sheet.root();
    let start = Position::new(1, 1, 0);
    builder.sheet.set_source(root, Some(builder.source(start, None)));

    let after = builder
        .parse_body(&mut parser, root)
        .map_err(into_error)?;
    builder.sheet.raws_mut(root).after = Some(after);

    tracing::debug!(
        target: targets::PARSER,
        nodes = builder.sheet.node_count(),
        bytes = css.len(),
        "parsed stylesheet"
    );
    Ok(builder.sheet)
}

struct TreeBuilder {
    sheet: Stylesheet,
    input: Option<Arc<Path>>,
}

impl TreeBuilder {
    fn source(&self, start: Position, end: Option<Position>) -> Source {
        Source {
            start,
            end,
            input: self.input.clone(),
        }
    }

    /// Parse the contents of `container` up to the end of the current block.
    ///
    /// Returns the whitespace left over after the last child, which becomes
    /// the container's `after` raw.
    fn parse_body<'i>(
        &mut self,
        p: &mut Parser<'i, '_>,
        container: NodeId,
    ) -> ParseResult<'i, String> {
        let mut spaces = String::new();
        let mut semicolon = false;

        loop {
            let state = p.state();
            let start = current_position(p);
            let token = match p.next_including_whitespace_and_comments() {
                Ok(token) => token.clone(),
                Err(_) => break,
            };

            match token {
                Token::WhiteSpace(ws) => spaces.push_str(ws),
                Token::Comment(text) => {
                    let before = mem::take(&mut spaces);
                    let end = current_position(p);
                    self.comment(container, text, before, start, end);
                }
                Token::Semicolon => {
                    spaces.push(';');
                    self.attach_own_semicolon(container, &mut spaces);
                }
                Token::CloseCurlyBracket => {
                    return Err(CssParseError {
                        kind: ParseErrorKind::Custom(SyntaxError::UnexpectedCloseBrace),
                        location: state.source_location(),
                    });
                }
                Token::AtKeyword(name) => {
                    let before = mem::take(&mut spaces);
                    semicolon = self.at_rule(p, container, name.to_string(), before, start)?;
                }
                _ => {
                    p.reset(&state);
                    semicolon = self.rule_or_declaration(p, container, &mut spaces, start)?;
                }
            }
        }

        if !self.sheet.children(container).is_empty() {
            self.sheet.raws_mut(container).semicolon = Some(semicolon);
        }
        Ok(spaces)
    }

    fn comment(&mut self, container: NodeId, text: &str, before: String, start: Position, end: Position) {
        let trimmed = text.trim();
        let id = self.sheet.create_comment(trimmed);
        let raws = self.sheet.raws_mut(id);
        raws.before = Some(before);
        if trimmed.is_empty() {
            raws.left = Some(text.to_string());
            raws.right = Some(String::new());
        } else {
            let left = text.len() - text.trim_start().len();
            let right = text.len() - text.trim_end().len();
            raws.left = Some(text[..left].to_string());
            raws.right = Some(text[text.len() - right..].to_string());
        }
        self.sheet.set_source(id, Some(self.source(start, Some(end))));
        self.sheet.append(container, id);
    }

    /// A stray `;` right after a rule's block belongs to that rule.
    fn attach_own_semicolon(&mut self, container: NodeId, spaces: &mut String) {
        if let Some(prev) = self.sheet.last(container)
            && self.sheet.node_type(prev) == NodeType::Rule
            && self.sheet.raws(prev).own_semicolon.is_none()
        {
            self.sheet.raws_mut(prev).own_semicolon = Some(mem::take(spaces));
        }
    }

    /// Parse an at-rule whose `@name` token has just been consumed.
    ///
    /// Returns whether the at-rule was terminated by `;`.
    fn at_rule<'i>(
        &mut self,
        p: &mut Parser<'i, '_>,
        container: NodeId,
        name: String,
        before: String,
        start: Position,
    ) -> ParseResult<'i, bool> {
        let prelude_start = p.position();
        p.parse_until_before(Delimiter::Semicolon | Delimiter::CurlyBracketBlock, |p| {
            while p.next_including_whitespace_and_comments().is_ok() {}
            Ok::<_, CssParseError<'i, SyntaxError>>(())
        })?;
        let prelude = p.slice_from(prelude_start);

        let without_between = prelude.trim_end();
        let between = &prelude[without_between.len()..];
        let params = without_between.trim_start();
        let after_name = &without_between[..without_between.len() - params.len()];

        let id = self.sheet.create_at_rule(name, params);
        let raws = self.sheet.raws_mut(id);
        raws.before = Some(before);
        raws.between = Some(between.to_string());
        raws.after_name = Some(after_name.to_string());
        self.sheet.append(container, id);

        let terminator = match p.next_including_whitespace_and_comments() {
            Ok(Token::CurlyBracketBlock) => Terminator::Block,
            Ok(Token::Semicolon) => Terminator::Semicolon,
            _ => Terminator::End,
        };
        if terminator == Terminator::Block {
            if let Some(at_rule) = self.sheet.at_rule_mut(id) {
                at_rule.has_block = true;
            }
            let after = p.parse_nested_block(|p| self.parse_body(p, id))?;
            self.sheet.raws_mut(id).after = Some(after);
        }

        let end = current_position(p);
        self.sheet.set_source(id, Some(self.source(start, Some(end))));
        Ok(terminator == Terminator::Semicolon)
    }

    /// Parse a rule or a declaration starting at the current token.
    ///
    /// Returns whether the node was terminated by `;`.
    fn rule_or_declaration<'i>(
        &mut self,
        p: &mut Parser<'i, '_>,
        container: NodeId,
        spaces: &mut String,
        start: Position,
    ) -> ParseResult<'i, bool> {
        let location = p.current_source_location();
        let prelude_start = p.position();
        let base = prelude_start.byte_index();
        let mut colon: Option<(usize, usize)> = None;

        p.parse_until_before(Delimiter::Semicolon | Delimiter::CurlyBracketBlock, |p| {
            loop {
                let token_start = p.position().byte_index();
                match p.next_including_whitespace_and_comments() {
                    Ok(Token::Colon) if colon.is_none() => {
                        colon = Some((token_start - base, p.position().byte_index() - base));
                    }
                    Ok(_) => {}
                    Err(_) => break,
                }
            }
            Ok::<_, CssParseError<'i, SyntaxError>>(())
        })?;
        let prelude = p.slice_from(prelude_start);

        let terminator = match p.next_including_whitespace_and_comments() {
            Ok(Token::CurlyBracketBlock) => Terminator::Block,
            Ok(Token::Semicolon) => Terminator::Semicolon,
            _ => Terminator::End,
        };

        if terminator == Terminator::Block {
            let selector = prelude.trim_end();
            let id = self.sheet.create_rule(selector);
            let raws = self.sheet.raws_mut(id);
            raws.before = Some(mem::take(spaces));
            raws.between = Some(prelude[selector.len()..].to_string());
            self.sheet.append(container, id);

            let after = p.parse_nested_block(|p| self.parse_body(p, id))?;
            self.sheet.raws_mut(id).after = Some(after);
            let end = current_position(p);
            self.sheet.set_source(id, Some(self.source(start, Some(end))));
            return Ok(false);
        }

        let Some((colon_start, colon_end)) = colon else {
            return Err(CssParseError {
                kind: ParseErrorKind::Custom(SyntaxError::UnknownWord(prelude.trim().to_string())),
                location,
            });
        };

        // Whitespace before the closing `}` belongs to the container.
        let declaration = match terminator {
            Terminator::Semicolon => prelude,
            _ => prelude.trim_end(),
        };
        let trailing = &prelude[declaration.len()..];

        let prop = declaration[..colon_start].trim_end();
        let value_text = declaration[colon_end..].trim_start();
        let between = &declaration[prop.len()..declaration.len() - value_text.len()];

        let clean = value_text.trim_end();
        let (value, important, raw_value) = match split_important(clean) {
            Some((value, important)) => {
                let raw = format!("{important}{}", &value_text[clean.len()..]);
                (value, Some(raw), None)
            }
            None if clean != value_text => {
                let raw = RawValue {
                    value: clean.to_string(),
                    raw: value_text.to_string(),
                };
                (clean, None, Some(raw))
            }
            None => (clean, None, None),
        };

        let id = self.sheet.create_declaration(prop, value);
        if let Some(decl) = self.sheet.declaration_mut(id) {
            decl.important = important.is_some();
        }
        let raws = self.sheet.raws_mut(id);
        raws.before = Some(mem::take(spaces));
        raws.between = Some(between.to_string());
        raws.important = important.filter(|raw| raw != " !important");
        raws.value = raw_value;
        self.sheet.append(container, id);

        let end = current_position(p);
        self.sheet.set_source(id, Some(self.source(start, Some(end))));
        spaces.push_str(trailing);
        Ok(terminator == Terminator::Semicolon)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminator {
    Block,
    Semicolon,
    End,
}

/// Split `red !important` into `("red", " !important")`.
fn split_important(value: &str) -> Option<(&str, &str)> {
    let lower = value.to_ascii_lowercase();
    let body = lower.strip_suffix("important")?.trim_end();
    let body = body.strip_suffix('!')?;
    let end = body.trim_end().len();
    Some((&value[..end], &value[end..]))
}

fn current_position(p: &Parser<'_, '_>) -> Position {
    let location = p.current_source_location();
    Position::new(location.line + 1, location.column, p.position().byte_index())
}

fn into_error(err: CssParseError<'_, SyntaxError>) -> Error {
    let message = match err.kind {
        ParseErrorKind::Custom(kind) => kind.to_string(),
        ParseErrorKind::Basic(kind) => format!("{kind:?}"),
    };
    let error = Error::syntax(message, err.location.line + 1, err.location.column);
    tracing::debug!(target: targets::PARSER, %error, "stylesheet parse failed");
    error
}
