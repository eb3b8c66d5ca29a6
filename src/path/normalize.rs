use crate::path::{PathError, PathResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub decode_percent: bool,
    pub collapse_duplicate_slash: bool,
    pub case_sensitive: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            decode_percent: false,
            collapse_duplicate_slash: true,
            case_sensitive: true,
        }
    }
}

/// Normalizes a lookup path before it is matched against a tree.
///
/// Trailing slashes are preserved: CMS trees treat `/blog` and `/blog/` as
/// distinct paths and the trailing-slash redirect policy depends on the
/// difference surviving normalization.
#[tracing::instrument(level = "trace", skip(path, options), fields(path_len = path.len() as u64))]
pub fn normalize_path(path: &str, options: &NormalizeOptions) -> PathResult<String> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }
    if !path.starts_with('/') {
        return Err(PathError::MissingLeadingSlash {
            input: path.to_string(),
        });
    }

    let bytes = path.as_bytes();
    let mut output: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut prev_was_slash = false;
    let mut segment_start = 0usize;
    let mut saw_traversal = false;

    let mut idx = 0usize;
    while idx < bytes.len() {
        let byte = bytes[idx];
        if options.decode_percent && byte == b'%' {
            if idx + 2 >= bytes.len() {
                return Err(PathError::InvalidPercentEncoding {
                    input: path.to_string(),
                    index: idx,
                });
            }
            let value = decode_hex_pair(bytes[idx + 1], bytes[idx + 2]).ok_or_else(|| {
                PathError::InvalidPercentEncoding {
                    input: path.to_string(),
                    index: idx,
                }
            })?;
            push_byte(
                value,
                options,
                path,
                &mut output,
                &mut prev_was_slash,
                &mut segment_start,
                &mut saw_traversal,
            )?;
            idx += 3;
            continue;
        }

        push_byte(
            byte,
            options,
            path,
            &mut output,
            &mut prev_was_slash,
            &mut segment_start,
            &mut saw_traversal,
        )?;
        idx += 1;
    }

    close_segment(&output, segment_start, &mut saw_traversal);

    if saw_traversal {
        return Err(PathError::ParentTraversal {
            input: path.to_string(),
        });
    }

    String::from_utf8(output).map_err(|_| PathError::InvalidUtf8AfterDecoding {
        input: path.to_string(),
    })
}

fn push_byte(
    byte: u8,
    options: &NormalizeOptions,
    original: &str,
    output: &mut Vec<u8>,
    prev_was_slash: &mut bool,
    segment_start: &mut usize,
    saw_traversal: &mut bool,
) -> PathResult<()> {
    if byte == b'/' {
        if options.collapse_duplicate_slash && *prev_was_slash {
            return Ok(());
        }
        close_segment(output, *segment_start, saw_traversal);
        output.push(b'/');
        *prev_was_slash = true;
        *segment_start = output.len();
        return Ok(());
    }

    if byte <= 0x20 || byte == 0x7f {
        return Err(PathError::ControlOrWhitespace {
            input: original.to_string(),
            byte,
        });
    }

    let mut value = byte;
    if !options.case_sensitive && value.is_ascii_uppercase() {
        value = value.to_ascii_lowercase();
    }
    output.push(value);
    *prev_was_slash = false;
    Ok(())
}

fn close_segment(output: &[u8], segment_start: usize, saw_traversal: &mut bool) {
    if segment_start >= output.len() {
        return;
    }
    if &output[segment_start..] == b".." {
        *saw_traversal = true;
    }
}

fn decode_hex_pair(hi: u8, lo: u8) -> Option<u8> {
    fn val(byte: u8) -> Option<u8> {
        match byte {
            b'0'..=b'9' => Some(byte - b'0'),
            b'a'..=b'f' => Some(byte - b'a' + 10),
            b'A'..=b'F' => Some(byte - b'A' + 10),
            _ => None,
        }
    }

    Some(val(hi)? << 4 | val(lo)?)
}
