use std::sync::Arc;

use memchr::{memchr, memmem};
use regex::Regex;

use crate::route::{RouteError, RouteResult};
use crate::types::CapturedArgs;

#[derive(Debug, Clone)]
pub enum RoutePart {
    Literal(String),
    Var {
        name: String,
        raw_constraint: Option<Box<str>>,
        constraint: Option<Arc<Regex>>,
    },
}

#[derive(Debug, Clone)]
pub struct SegmentPattern {
    pub parts: Vec<RoutePart>,
}

impl SegmentPattern {
    pub fn is_static(&self) -> bool {
        self.parts
            .iter()
            .all(|part| matches!(part, RoutePart::Literal(_)))
    }
}

impl PartialEq for SegmentPattern {
    fn eq(&self, other: &Self) -> bool {
        if self.parts.len() != other.parts.len() {
            return false;
        }
        self.parts.iter().zip(other.parts.iter()).all(|pair| match pair {
            (RoutePart::Literal(a), RoutePart::Literal(b)) => a == b,
            (
                RoutePart::Var {
                    name: na,
                    raw_constraint: ca,
                    ..
                },
                RoutePart::Var {
                    name: nb,
                    raw_constraint: cb,
                    ..
                },
            ) => na == nb && ca == cb,
            _ => false,
        })
    }
}

impl Eq for SegmentPattern {}

/// Parses one template segment into literal and `<name>` / `<name:regex>`
/// variable parts.
#[tracing::instrument(level = "trace", fields(segment = %seg))]
pub fn parse_segment(seg: &str) -> RouteResult<SegmentPattern> {
    let mut parts: Vec<RoutePart> = Vec::new();
    let mut rest = seg;

    while !rest.is_empty() {
        match rest.find('<') {
            None => {
                parts.push(RoutePart::Literal(rest.to_string()));
                break;
            }
            Some(open) => {
                if open > 0 {
                    parts.push(RoutePart::Literal(rest[..open].to_string()));
                }
                let after_open = &rest[open + 1..];
                let close = after_open.find('>').ok_or_else(|| RouteError::UnclosedVariable {
                    segment: seg.to_string(),
                })?;
                let body = &after_open[..close];
                parts.push(parse_variable(seg, body)?);
                rest = &after_open[close + 1..];
            }
        }
    }

    Ok(SegmentPattern { parts })
}

fn parse_variable(seg: &str, body: &str) -> RouteResult<RoutePart> {
    let (name, raw_constraint) = match body.find(':') {
        Some(colon) => (&body[..colon], Some(&body[colon + 1..])),
        None => (body, None),
    };

    if name.is_empty() {
        return Err(RouteError::VariableMissingName {
            segment: seg.to_string(),
        });
    }

    let bytes = name.as_bytes();
    if !(bytes[0].is_ascii_alphabetic() || bytes[0] == b'_') {
        return Err(RouteError::VariableInvalidStart {
            segment: seg.to_string(),
            name: name.to_string(),
            found: bytes[0] as char,
        });
    }
    for &byte in &bytes[1..] {
        if !(byte.is_ascii_alphanumeric() || byte == b'_') {
            return Err(RouteError::VariableInvalidCharacter {
                segment: seg.to_string(),
                name: name.to_string(),
                invalid: byte as char,
            });
        }
    }

    let constraint = match raw_constraint {
        None => None,
        Some(raw) => {
            // anchored so the constraint must cover the whole capture
            let compiled =
                Regex::new(&format!("^(?:{raw})$")).map_err(|source| RouteError::InvalidConstraint {
                    segment: seg.to_string(),
                    name: name.to_string(),
                    source,
                })?;
            Some(Arc::new(compiled))
        }
    };

    Ok(RoutePart::Var {
        name: name.to_string(),
        raw_constraint: raw_constraint.map(Into::into),
        constraint,
    })
}

/// Matches one path segment against one segment pattern, appending captured
/// variables to `args`. Variables capture up to the next literal occurrence,
/// or to the end of the segment when the variable is trailing.
pub fn match_segment(seg: &str, pattern: &SegmentPattern, args: &mut CapturedArgs) -> bool {
    let checkpoint = args.len();
    let mut cursor = 0usize;
    let bytes = seg.as_bytes();
    let mut idx = 0usize;

    while idx < pattern.parts.len() {
        match &pattern.parts[idx] {
            RoutePart::Literal(lit) => {
                // byte-wise: the cursor may sit inside a multi-byte char of
                // a non-matching segment, where a str slice would panic
                let lit_bytes = lit.as_bytes();
                if bytes.get(cursor..cursor + lit_bytes.len()) != Some(lit_bytes) {
                    args.truncate(checkpoint);
                    return false;
                }
                cursor += lit_bytes.len();
            }
            RoutePart::Var {
                name, constraint, ..
            } => {
                let mut end = seg.len();
                if idx + 1 < pattern.parts.len()
                    && let RoutePart::Literal(next_lit) = &pattern.parts[idx + 1]
                {
                    let window = &bytes[cursor..];
                    let found = if next_lit.len() == 1 {
                        memchr(next_lit.as_bytes()[0], window)
                    } else {
                        memmem::find(window, next_lit.as_bytes())
                    };
                    match found {
                        Some(rel) => end = cursor + rel,
                        None => {
                            args.truncate(checkpoint);
                            return false;
                        }
                    }
                }
                if end == cursor {
                    args.truncate(checkpoint);
                    return false;
                }
                let value = &seg[cursor..end];
                if let Some(re) = constraint
                    && !re.is_match(value)
                {
                    args.truncate(checkpoint);
                    return false;
                }
                args.push((name.clone(), value.to_string()));
                cursor = end;
            }
        }
        idx += 1;
    }

    if cursor == seg.len() {
        true
    } else {
        args.truncate(checkpoint);
        false
    }
}
