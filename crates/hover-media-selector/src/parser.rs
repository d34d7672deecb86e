//! Selector list parser using the `cssparser` tokenizer.

use cssparser::{
    BasicParseErrorKind, Delimiter, ParseError as CssParseError, ParseErrorKind, Parser,
    ParserInput, SourceLocation, SourcePosition, Token,
};

use crate::types::{
    AttributeOperator, AttributeSelector, Combinator, Component, Pseudo, PseudoArgument, Selector,
    SelectorList,
};
use crate::{Error, Result};

/// Functional pseudos whose argument is a selector list.
///
/// Names are compared case-insensitively.
pub const SELECTOR_PSEUDOS: &[&str] = &[
    "is",
    "where",
    "not",
    "has",
    "matches",
    "any",
    "-webkit-any",
    "-moz-any",
    "host",
    "host-context",
    "current",
    "past",
    "future",
    "slotted",
    "global",
    "local",
];

type ParseResult<'i, T> = std::result::Result<T, CssParseError<'i, String>>;

/// Parse a comma-separated selector list.
///
/// # Example
///
/// ```
/// use hover_media_selector::parse;
///
/// let list = parse(".a:hover,  .b > .c").unwrap();
/// assert_eq!(list.len(), 2);
/// assert_eq!(list.to_string(), ".a:hover,.b>.c");
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidSelector`] for empty selectors (`a,,b`), a
/// trailing or doubled combinator, or tokens that cannot appear in a
/// selector.
pub fn parse(selector: &str) -> Result<SelectorList> {
    let mut input = ParserInput::new(selector);
    let mut parser = Parser::new(&mut input);
    let result = parser.parse_entirely(parse_list);

    match result {
        Ok(list) => {
            tracing::trace!(selectors = list.len(), "parsed selector list");
            Ok(list)
        }
        Err(err) => {
            let location = err.location;
            let message = match err.kind {
                ParseErrorKind::Custom(message) => message,
                ParseErrorKind::Basic(BasicParseErrorKind::EndOfInput) => {
                    "Unexpected end of selector".to_string()
                }
                ParseErrorKind::Basic(BasicParseErrorKind::UnexpectedToken(token)) => {
                    format!("Unexpected token {token:?}")
                }
                ParseErrorKind::Basic(kind) => format!("{kind:?}"),
            };
            Err(Error::invalid_selector(
                selector,
                message,
                location.line + 1,
                location.column,
            ))
        }
    }
}

fn error<'i>(location: SourceLocation, message: impl Into<String>) -> CssParseError<'i, String> {
    CssParseError {
        kind: ParseErrorKind::Custom(message.into()),
        location,
    }
}

fn parse_list<'i>(p: &mut Parser<'i, '_>) -> ParseResult<'i, SelectorList> {
    let mut selectors = Vec::new();
    loop {
        selectors.push(p.parse_until_before(Delimiter::Comma, parse_selector)?);
        match p.next() {
            Ok(Token::Comma) => {}
            _ => break,
        }
    }
    Ok(SelectorList { selectors })
}

fn parse_selector<'i>(p: &mut Parser<'i, '_>) -> ParseResult<'i, Selector> {
    let start = p.current_source_location();
    let mut components: Vec<Component> = Vec::new();
    let mut whitespace = false;

    loop {
        let location = p.current_source_location();
        let token_start = p.position();
        let token = match p.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };

        let combinator = match token {
            Token::WhiteSpace(_) => {
                whitespace = true;
                continue;
            }
            Token::Comment(_) => continue,
            Token::Delim('>') => Some(Combinator::Child),
            Token::Delim('+') => Some(Combinator::NextSibling),
            Token::Delim('~') => Some(Combinator::SubsequentSibling),
            _ => None,
        };

        let after_combinator = matches!(components.last(), Some(Component::Combinator(_)));
        if let Some(combinator) = combinator {
            if after_combinator {
                return Err(error(location, "Unexpected combinator"));
            }
            components.push(Component::Combinator(combinator));
            whitespace = false;
            continue;
        }

        if whitespace && !components.is_empty() && !after_combinator {
            components.push(Component::Combinator(Combinator::Descendant));
        }
        whitespace = false;
        components.push(parse_simple(p, token, token_start, location)?);
    }

    match components.last() {
        None => Err(error(start, "Empty selector")),
        Some(Component::Combinator(_)) => Err(error(start, "Selector ends with a combinator")),
        Some(_) => Ok(Selector { components }),
    }
}

/// Parse one simple selector whose first token has just been consumed.
fn parse_simple<'i>(
    p: &mut Parser<'i, '_>,
    token: Token<'i>,
    start: SourcePosition,
    location: SourceLocation,
) -> ParseResult<'i, Component> {
    match token {
        Token::Ident(_) => {
            qualify_with_namespace(p);
            Ok(Component::Type(p.slice_from(start).to_string()))
        }
        Token::Delim('*') => {
            qualify_with_namespace(p);
            Ok(Component::Universal(p.slice_from(start).to_string()))
        }
        Token::Delim('|') => match p.next_including_whitespace()? {
            Token::Ident(_) => Ok(Component::Type(p.slice_from(start).to_string())),
            Token::Delim('*') => Ok(Component::Universal(p.slice_from(start).to_string())),
            _ => Err(error(location, "Expected name after '|'")),
        },
        Token::Delim('&') => Ok(Component::Nesting),
        Token::Delim('.') => {
            let name_start = p.position();
            match p.next_including_whitespace() {
                Ok(Token::Ident(_)) => Ok(Component::Class(p.slice_from(name_start).to_string())),
                _ => Err(error(location, "Expected class name after '.'")),
            }
        }
        Token::IDHash(_) | Token::Hash(_) => {
            let hash = p.slice_from(start);
            Ok(Component::Id(hash[1..].to_string()))
        }
        Token::SquareBracketBlock => {
            let attribute = p.parse_nested_block(parse_attribute)?;
            Ok(Component::Attribute(attribute))
        }
        Token::Colon => parse_pseudo(p, location),
        _ => Err(error(
            location,
            format!("Unexpected '{}'", p.slice_from(start)),
        )),
    }
}

/// Consume a `|name` or `|*` suffix, if present.
fn qualify_with_namespace(p: &mut Parser<'_, '_>) {
    let _ = p.try_parse(|p| {
        match p.next_including_whitespace()? {
            Token::Delim('|') => {}
            _ => return Err(p.new_custom_error::<_, ()>(())),
        }
        match p.next_including_whitespace()? {
            Token::Ident(_) | Token::Delim('*') => Ok(()),
            _ => Err(p.new_custom_error(())),
        }
    });
}

/// Parse a pseudo-class or pseudo-element after its first `:`.
fn parse_pseudo<'i>(p: &mut Parser<'i, '_>, location: SourceLocation) -> ParseResult<'i, Component> {
    let mut name_start = p.position();
    let mut token = p.next_including_whitespace()?.clone();
    let element = token == Token::Colon;
    if element {
        name_start = p.position();
        token = p.next_including_whitespace()?.clone();
    }

    let pseudo = match token {
        Token::Ident(_) => Pseudo {
            name: p.slice_from(name_start).to_string(),
            argument: None,
        },
        Token::Function(_) => {
            let name = p.slice_from(name_start).trim_end_matches('(').to_string();
            let takes_selectors = SELECTOR_PSEUDOS
                .iter()
                .any(|candidate| candidate.eq_ignore_ascii_case(&name));
            let argument = p.parse_nested_block(|p| -> ParseResult<'i, PseudoArgument> {
                if takes_selectors {
                    Ok(PseudoArgument::Selectors(parse_list(p)?))
                } else {
                    Ok(PseudoArgument::Raw(parse_raw_argument(p)?))
                }
            })?;
            Pseudo {
                name,
                argument: Some(argument),
            }
        }
        _ if element => return Err(error(location, "Expected pseudo-element name after '::'")),
        _ => return Err(error(location, "Expected pseudo-class name after ':'")),
    };

    Ok(if element {
        Component::PseudoElement(pseudo)
    } else {
        Component::PseudoClass(pseudo)
    })
}

/// Render a non-selector argument such as `2n + 1` compactly.
///
/// Comments are dropped. Whitespace collapses to one space and disappears
/// next to `+`, `>`, `~` and `,`. Nested blocks are kept as written.
fn parse_raw_argument<'i>(p: &mut Parser<'i, '_>) -> ParseResult<'i, String> {
    let mut raw = String::new();
    let mut space = false;

    loop {
        let start = p.position();
        let token = match p.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        match token {
            Token::WhiteSpace(_) => {
                space = true;
                continue;
            }
            Token::Comment(_) => continue,
            Token::Function(_)
            | Token::ParenthesisBlock
            | Token::SquareBracketBlock
            | Token::CurlyBracketBlock => {
                p.parse_nested_block(|p| {
                    while p.next_including_whitespace_and_comments().is_ok() {}
                    Ok::<_, CssParseError<'i, String>>(())
                })?;
            }
            _ => {}
        }

        let text = p.slice_from(start);
        let tight = text.starts_with(['+', '>', '~', ','])
            || raw.ends_with(['+', '>', '~', ',']);
        if space && !raw.is_empty() && !tight {
            raw.push(' ');
        }
        space = false;
        raw.push_str(text);
    }
    Ok(raw)
}

/// Parse the inside of `[...]`.
fn parse_attribute<'i>(p: &mut Parser<'i, '_>) -> ParseResult<'i, AttributeSelector> {
    let location = p.current_source_location();
    p.skip_whitespace();

    let name_start = p.position();
    let mut name_end = name_start;
    loop {
        let state = p.state();
        match p.next_including_whitespace() {
            Ok(Token::Ident(_) | Token::Delim('|') | Token::Delim('*')) => name_end = p.position(),
            _ => {
                p.reset(&state);
                break;
            }
        }
    }
    let name = p.slice(name_start..name_end).to_string();
    if name.is_empty() {
        return Err(error(location, "Expected attribute name"));
    }

    if p.is_exhausted() {
        return Ok(AttributeSelector {
            name,
            matcher: None,
            modifier: None,
        });
    }

    let operator_location = p.current_source_location();
    let operator = match p.next()? {
        Token::Delim('=') => AttributeOperator::Equals,
        Token::IncludeMatch => AttributeOperator::Includes,
        Token::DashMatch => AttributeOperator::DashMatch,
        Token::PrefixMatch => AttributeOperator::Prefix,
        Token::SuffixMatch => AttributeOperator::Suffix,
        Token::SubstringMatch => AttributeOperator::Substring,
        _ => return Err(error(operator_location, "Expected attribute operator")),
    };

    p.skip_whitespace();
    let value_location = p.current_source_location();
    let value_start = p.position();
    let value = match p.next() {
        Ok(
            Token::Ident(_)
            | Token::QuotedString(_)
            | Token::Number { .. }
            | Token::Percentage { .. }
            | Token::Dimension { .. }
            | Token::Hash(_)
            | Token::IDHash(_),
        ) => p.slice_from(value_start).to_string(),
        _ => return Err(error(value_location, "Expected attribute value")),
    };

    let modifier = p
        .try_parse(|p| p.expect_ident_cloned())
        .ok()
        .map(|ident| ident.to_string());

    Ok(AttributeSelector {
        name,
        matcher: Some((operator, value)),
        modifier,
    })
}
