use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_till, take_until, take_while, take_while1},
    character::complete::{char, multispace0, multispace1, satisfy},
    combinator::{map, recognize, value},
    multi::many0,
    sequence::{delimited, pair, preceded, separated_pair, terminated},
};
use std::io::Read;
use tracing::debug;

use super::node::HierarchyNode;
use crate::error::{ConvertError, ConvertResult};

/// Parse a hierarchy dump into its root node.
pub fn parse_hierarchy(input: &str) -> ConvertResult<HierarchyNode> {
    let body = input.strip_prefix('\u{feff}').unwrap_or(input);
    if body.trim().is_empty() {
        return Err(ConvertError::EmptyInput);
    }

    let root = TreeBuilder::new(body).build()?;
    debug!(
        root = %root.class_name,
        nodes = root.node_count(),
        "Parsed hierarchy dump"
    );
    Ok(root)
}

pub fn parse_hierarchy_bytes(bytes: &[u8]) -> ConvertResult<HierarchyNode> {
    let input = std::str::from_utf8(bytes).map_err(|e| ConvertError::InvalidUtf8 {
        valid_up_to: e.valid_up_to(),
    })?;
    parse_hierarchy(input)
}

pub fn read_hierarchy<R: Read>(mut reader: R) -> ConvertResult<HierarchyNode> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    parse_hierarchy_bytes(&bytes)
}

#[derive(Debug, Clone, PartialEq)]
enum Token<'a> {
    Start {
        name: &'a str,
        attributes: Vec<(&'a str, &'a str)>,
        self_closing: bool,
    },
    End {
        name: &'a str,
    },
    Text(&'a str),
    Skip,
}

/// Assembles tokens into a tree with an explicit stack, so nesting depth is
/// bounded by memory rather than by the call stack.
struct TreeBuilder<'a> {
    source: &'a str,
    stack: Vec<HierarchyNode>,
    root: Option<HierarchyNode>,
}

impl<'a> TreeBuilder<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            stack: Vec::new(),
            root: None,
        }
    }

    /// Byte offset of `slice`, which must borrow from `source`.
    fn offset_of(&self, slice: &str) -> usize {
        slice.as_ptr() as usize - self.source.as_ptr() as usize
    }

    fn build(mut self) -> ConvertResult<HierarchyNode> {
        let mut rest = self.source;

        while !rest.is_empty() {
            let offset = self.offset_of(rest);
            let (next, tok) = match token(rest) {
                Ok(parsed) => parsed,
                Err(_) => return Err(self.error(offset, describe_failure(rest))),
            };

            match tok {
                Token::Start {
                    name,
                    attributes,
                    self_closing,
                } => {
                    if self.root.is_some() && self.stack.is_empty() {
                        return Err(self.error(offset, "Multiple root elements"));
                    }
                    let mut decoded = Vec::with_capacity(attributes.len());
                    for (key, raw) in attributes {
                        let value = decode_entities(raw)
                            .map_err(|details| self.error(self.offset_of(raw), details))?;
                        decoded.push((key, value));
                    }
                    let node = HierarchyNode::from_attributes(name, decoded);
                    if self_closing {
                        self.attach(node);
                    } else {
                        self.stack.push(node);
                    }
                }
                Token::End { name } => {
                    let Some(node) = self.stack.pop() else {
                        return Err(self.error(offset, format!("Unexpected closing tag </{name}>")));
                    };
                    if node.tag != name {
                        return Err(self.error(
                            offset,
                            format!("Mismatched closing tag: expected </{}>, found </{name}>", node.tag),
                        ));
                    }
                    self.attach(node);
                }
                Token::Text(text) => {
                    if self.stack.is_empty() && !text.trim().is_empty() {
                        return Err(self.error(offset, "Text outside of the root element"));
                    }
                }
                Token::Skip => {}
            }

            rest = next;
        }

        if let Some(open) = self.stack.last() {
            return Err(self.error(
                self.source.len(),
                format!("Unclosed element <{}>", open.tag),
            ));
        }

        let source = self.source;
        self.root
            .ok_or_else(|| ConvertError::parse_at(source, source.len(), "No root element found"))
    }

    fn attach(&mut self, node: HierarchyNode) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.root = Some(node),
        }
    }

    fn error(&self, offset: usize, details: impl Into<String>) -> ConvertError {
        ConvertError::parse_at(self.source, offset, details)
    }
}

fn describe_failure(rest: &str) -> String {
    let snippet: String = rest.chars().take(24).collect();
    if rest.starts_with("<!--") {
        "Unterminated comment".to_string()
    } else if rest.starts_with("<?") {
        "Unterminated processing instruction".to_string()
    } else if rest.starts_with("<![CDATA[") {
        "Unterminated CDATA section".to_string()
    } else {
        format!("Malformed markup near '{snippet}'")
    }
}

fn token(input: &str) -> IResult<&str, Token<'_>> {
    alt((
        value(Token::Skip, comment),
        value(Token::Skip, processing_instruction),
        value(Token::Skip, cdata),
        value(Token::Skip, doctype),
        end_tag,
        start_tag,
        map(take_while1(|c: char| c != '<'), Token::Text),
    ))
    .parse(input)
}

fn comment(input: &str) -> IResult<&str, &str> {
    delimited(tag("<!--"), take_until("-->"), tag("-->")).parse(input)
}

fn processing_instruction(input: &str) -> IResult<&str, &str> {
    delimited(tag("<?"), take_until("?>"), tag("?>")).parse(input)
}

fn cdata(input: &str) -> IResult<&str, &str> {
    delimited(tag("<![CDATA["), take_until("]]>"), tag("]]>")).parse(input)
}

fn doctype(input: &str) -> IResult<&str, &str> {
    delimited(tag("<!DOCTYPE"), take_till(|c: char| c == '>'), char('>')).parse(input)
}

fn end_tag(input: &str) -> IResult<&str, Token<'_>> {
    map(
        delimited(tag("</"), name, preceded(multispace0, char('>'))),
        |name| Token::End { name },
    )
    .parse(input)
}

fn start_tag(input: &str) -> IResult<&str, Token<'_>> {
    let (input, _) = char('<').parse(input)?;
    let (input, name) = name(input)?;
    let (input, attributes) = many0(preceded(multispace1, attribute)).parse(input)?;
    let (input, _) = multispace0(input)?;
    let (input, close) = alt((tag("/>"), tag(">"))).parse(input)?;

    Ok((
        input,
        Token::Start {
            name,
            attributes,
            self_closing: close == "/>",
        },
    ))
}

fn name(input: &str) -> IResult<&str, &str> {
    recognize(pair(satisfy(is_name_start), take_while(is_name_char))).parse(input)
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == ':'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.' | '$')
}

fn attribute(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(
        name,
        delimited(multispace0, char('='), multispace0),
        alt((quoted('"'), quoted('\''))),
    )
    .parse(input)
}

fn quoted<'a>(quote: char) -> impl Fn(&'a str) -> IResult<&'a str, &'a str> {
    move |input: &'a str| {
        terminated(
            preceded(char(quote), take_while(|c: char| c != quote && c != '<')),
            char(quote),
        )
        .parse(input)
    }
}

/// Decode the predefined XML entities and numeric character references.
pub fn decode_entities(raw: &str) -> Result<String, String> {
    if !raw.contains('&') {
        return Ok(raw.to_string());
    }

    let mut result = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find('&') {
        result.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let Some(end) = after.find(';') else {
            return Err(format!("Unterminated entity reference in '{raw}'"));
        };
        let entity = &after[..end];
        let decoded = match entity {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            _ => decode_numeric(entity)
                .ok_or_else(|| format!("Unknown entity '&{entity};'"))?,
        };
        result.push(decoded);
        rest = &after[end + 1..];
    }
    result.push_str(rest);
    Ok(result)
}

fn decode_numeric(entity: &str) -> Option<char> {
    let digits = entity.strip_prefix('#')?;
    let code = match digits.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<u32>().ok()?,
    };
    char::from_u32(code)
}
