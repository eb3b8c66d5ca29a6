mod error;
mod parser;

pub use error::{RouteError, RouteResult};
pub(crate) use parser::match_segment;
pub use parser::{RoutePart, SegmentPattern, parse_segment};

use std::fmt;

use memchr::memchr;

use crate::types::{CapturedArgs, UrlArgs};

/// A path pattern: literal segments mixed with named, regex-constrained
/// variable segments, with an optional terminal `*` marking a mount point
/// that expects sub-routes beneath it.
///
/// Routes are immutable once parsed. Two routes are equal iff their raw
/// template strings are equal.
#[derive(Debug, Clone)]
pub struct Route {
    raw: Box<str>,
    path_key: Box<str>,
    segments: Vec<SegmentPattern>,
    absolute: bool,
    trailing_slash: bool,
    is_leaf: bool,
    level: usize,
}

impl Route {
    /// Parses an absolute route template (`/blog/<slug>/`).
    pub fn parse(template: &str) -> RouteResult<Self> {
        if !template.is_empty() && !template.starts_with('/') {
            return Err(RouteError::MissingLeadingSlash {
                template: template.to_string(),
            });
        }
        Self::parse_inner(template)
    }

    /// Parses a template that may omit the leading slash; used for the
    /// relative routes derived when a node attaches under its parent.
    pub(crate) fn parse_relative(template: &str) -> RouteResult<Self> {
        Self::parse_inner(template)
    }

    fn parse_inner(template: &str) -> RouteResult<Self> {
        if template.is_empty() {
            return Err(RouteError::EmptyTemplate);
        }

        let absolute = template.starts_with('/');
        let raw_segments: Vec<&str> = crate::path::segments(template).collect();
        let total = raw_segments.len();

        let mut is_leaf = true;
        let mut segments = Vec::with_capacity(total);
        for (idx, raw_seg) in raw_segments.iter().enumerate() {
            if *raw_seg == "*" {
                if idx + 1 != total {
                    return Err(RouteError::WildcardMustBeTerminal {
                        template: template.to_string(),
                        segment_index: idx,
                        total_segments: total,
                    });
                }
                is_leaf = false;
                continue;
            }
            if raw_seg.contains('*') {
                return Err(RouteError::WildcardNotAlone {
                    template: template.to_string(),
                    segment: raw_seg.to_string(),
                });
            }
            segments.push(parse_segment(raw_seg)?);
        }

        let mut seen: Vec<&str> = Vec::new();
        for pattern in &segments {
            for part in &pattern.parts {
                if let RoutePart::Var { name, .. } = part {
                    if seen.contains(&name.as_str()) {
                        return Err(RouteError::DuplicateVariable {
                            template: template.to_string(),
                            name: name.clone(),
                        });
                    }
                    seen.push(name.as_str());
                }
            }
        }

        // the mount marker is not part of the node's path; `/blog/*` keys
        // and matches as `/blog/`
        let (path_key, trailing_slash) = if is_leaf {
            (template.to_string(), template.ends_with('/'))
        } else {
            let key = match template.rfind('*') {
                Some(pos) => template[..pos].to_string(),
                None => template.to_string(),
            };
            (key, true)
        };

        let level = segments.len();
        Ok(Self {
            raw: template.into(),
            path_key: path_key.into(),
            segments,
            absolute,
            trailing_slash,
            is_leaf,
            level,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The route's canonical path string; the key it occupies in a tree's
    /// path index. Identical to `raw()` except for mount routes, whose
    /// trailing `*` is dropped.
    pub fn path_key(&self) -> &str {
        &self.path_key
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn is_leaf(&self) -> bool {
        self.is_leaf
    }

    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    pub fn has_vars(&self) -> bool {
        self.segments.iter().any(|segment| !segment.is_static())
    }

    pub fn var_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().flat_map(|segment| {
            segment.parts.iter().filter_map(|part| match part {
                RoutePart::Var { name, .. } => Some(name.as_str()),
                RoutePart::Literal(_) => None,
            })
        })
    }

    /// Attempts to consume this route against the left-hand portion of
    /// `path`. On success returns the extracted variables and the
    /// unconsumed remainder (never starting with `/`).
    pub fn match_prefix<'p>(&self, path: &'p str) -> Option<(CapturedArgs, &'p str)> {
        let mut args = CapturedArgs::new();
        let remainder = self.match_into(path, &mut args)?;
        Some((args, remainder))
    }

    pub(crate) fn match_into<'p>(
        &self,
        path: &'p str,
        args: &mut CapturedArgs,
    ) -> Option<&'p str> {
        let checkpoint = args.len();
        let mut rest = path;
        if self.absolute {
            rest = rest.strip_prefix('/')?;
        }

        let total = self.segments.len();
        for (idx, pattern) in self.segments.iter().enumerate() {
            let (seg, after) = match memchr(b'/', rest.as_bytes()) {
                Some(pos) => (&rest[..pos], Some(&rest[pos + 1..])),
                None => (rest, None),
            };
            if seg.is_empty() || !match_segment(seg, pattern, args) {
                args.truncate(checkpoint);
                return None;
            }
            match after {
                Some(next) => rest = next,
                None => {
                    let is_last = idx + 1 == total;
                    if !is_last || self.trailing_slash {
                        args.truncate(checkpoint);
                        return None;
                    }
                    rest = "";
                }
            }
        }

        Some(rest)
    }

    /// Inverse of `match_prefix`: substitutes `args` into the template.
    /// Fails on a missing variable or a value that violates its constraint.
    pub fn build(&self, args: &UrlArgs) -> RouteResult<String> {
        let mut out = String::with_capacity(self.raw.len());
        if self.absolute {
            out.push('/');
        }

        let total = self.segments.len();
        for (idx, pattern) in self.segments.iter().enumerate() {
            for part in &pattern.parts {
                match part {
                    RoutePart::Literal(lit) => out.push_str(lit),
                    RoutePart::Var {
                        name, constraint, ..
                    } => {
                        let value =
                            args.get(name).ok_or_else(|| RouteError::MissingVariable {
                                name: name.clone(),
                            })?;
                        let valid = match constraint {
                            Some(re) => re.is_match(value),
                            None => !value.is_empty() && !value.contains('/'),
                        };
                        if !valid {
                            return Err(RouteError::ConstraintViolation {
                                name: name.clone(),
                                value: value.clone(),
                            });
                        }
                        out.push_str(value);
                    }
                }
            }
            if idx + 1 < total || self.trailing_slash {
                out.push('/');
            }
        }

        Ok(out)
    }

    /// Composes this route with a relative continuation, yielding the
    /// absolute route a child occupies once attached.
    pub fn join(&self, relative: &Route) -> RouteResult<Route> {
        Route::parse_inner(&format!("{}{}", self.path_key, relative.raw))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PartialEq for Route {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for Route {}
