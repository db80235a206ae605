//! Output sanitization for user-supplied free text.
//!
//! Stored records keep exactly what the client submitted. Everything handed back to a client goes
//! through [`clean`] first, via the [`Sanitize`] trait implemented by the API response types.
//!
//! The filter is an allow-list: a small set of formatting tags survive with a per-tag set of
//! attributes, everything else that looks like markup has its angle brackets escaped so it renders
//! as text. Text outside tags, including quotes and ampersands, is passed through untouched.

use html_escape::{decode_html_entities, encode_double_quoted_attribute};

/// Tags that are kept, with the attributes each one may carry.
const ALLOWED_TAGS: &[(&str, &[&str])] = &[
    ("a", &["href", "title", "target"]),
    ("abbr", &["title"]),
    ("b", &[]),
    ("blockquote", &[]),
    ("br", &[]),
    ("code", &[]),
    ("em", &[]),
    ("h1", &[]),
    ("h2", &[]),
    ("h3", &[]),
    ("h4", &[]),
    ("h5", &[]),
    ("h6", &[]),
    ("hr", &[]),
    ("i", &[]),
    ("img", &["src", "alt", "title", "width", "height"]),
    ("li", &[]),
    ("ol", &[]),
    ("p", &[]),
    ("pre", &[]),
    ("s", &[]),
    ("small", &[]),
    ("strong", &[]),
    ("sub", &[]),
    ("sup", &[]),
    ("u", &[]),
    ("ul", &[]),
];

/// Attributes holding a URL, checked against [`UNSAFE_SCHEMES`].
const URL_ATTRIBUTES: &[&str] = &["href", "src"];

const UNSAFE_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:"];

/// A value that can be made safe to hand to a browser.
pub trait Sanitize {
    /// Return a copy with every free-text field passed through [`clean`].
    fn sanitized(self) -> Self;
}

impl<T: Sanitize> Sanitize for Vec<T> {
    fn sanitized(self) -> Self {
        self.into_iter().map(Sanitize::sanitized).collect()
    }
}

impl<T: Sanitize> Sanitize for Option<T> {
    fn sanitized(self) -> Self {
        self.map(Sanitize::sanitized)
    }
}

impl Sanitize for String {
    fn sanitized(self) -> Self {
        if self.contains(['<', '>']) { clean(&self) } else { self }
    }
}

/// Neutralize markup in `input`. Never fails.
pub fn clean(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find(['<', '>']) {
        out.push_str(&rest[..start]);
        if rest.as_bytes()[start] == b'>' {
            out.push_str("&gt;");
            rest = &rest[start + 1..];
            continue;
        }

        let after = &rest[start + 1..];
        match tag_end(after) {
            Some(end) => {
                render_tag(&after[..end], &mut out);
                rest = &after[end + 1..];
            }
            None => {
                // A lone `<` that never closes into a tag
                out.push_str("&lt;");
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Byte offset of the `>` closing a tag body, ignoring `>` inside quoted attribute values.
/// Returns `None` when another `<` shows up first or the input runs out.
fn tag_end(body: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (idx, ch) in body.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '>') => return Some(idx),
            (None, '<') => return None,
            (None, _) => {}
        }
    }
    None
}

fn render_tag(body: &str, out: &mut String) {
    let (closing, unprefixed) = match body.strip_prefix('/') {
        Some(stripped) => (true, stripped),
        None => (false, body),
    };
    let name_len = unprefixed
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(unprefixed.len());
    let name = unprefixed[..name_len].to_ascii_lowercase();

    let Some((_, allowed_attrs)) = ALLOWED_TAGS.iter().find(|(tag, _)| *tag == name) else {
        escape_tag(body, out);
        return;
    };

    if closing {
        out.push_str("</");
        out.push_str(&name);
        out.push('>');
        return;
    }

    let attrs = unprefixed[name_len..].trim_end();
    let (attrs, self_closing) = match attrs.strip_suffix('/') {
        Some(stripped) => (stripped, true),
        None => (attrs, false),
    };

    out.push('<');
    out.push_str(&name);
    for (attr, value) in parse_attributes(attrs) {
        if !allowed_attrs.contains(&attr.as_str()) {
            continue;
        }
        match value {
            Some(value) => {
                // Source values may already be entity-encoded; encode the decoded text exactly once
                let value = decode_html_entities(&value);
                if URL_ATTRIBUTES.contains(&attr.as_str()) && !is_safe_url(&value) {
                    continue;
                }
                out.push(' ');
                out.push_str(&attr);
                out.push_str("=\"");
                out.push_str(&encode_double_quoted_attribute(&value));
                out.push('"');
            }
            None if !URL_ATTRIBUTES.contains(&attr.as_str()) => {
                out.push(' ');
                out.push_str(&attr);
            }
            None => {}
        }
    }
    out.push_str(if self_closing { " />" } else { ">" });
}

fn escape_tag(body: &str, out: &mut String) {
    out.push_str("&lt;");
    out.push_str(&body.replace('>', "&gt;"));
    out.push_str("&gt;");
}

/// Split the attribute section of a tag into lowercase names and optional unquoted values.
fn parse_attributes(input: &str) -> Vec<(String, Option<String>)> {
    let mut attrs = Vec::new();
    let mut chars = input.char_indices().peekable();

    loop {
        while chars.next_if(|(_, c)| c.is_whitespace() || *c == '/').is_some() {}
        let Some(&(name_start, _)) = chars.peek() else {
            break;
        };

        let mut name_end = input.len();
        while let Some(&(idx, c)) = chars.peek() {
            if c.is_whitespace() || c == '=' || c == '/' {
                name_end = idx;
                break;
            }
            chars.next();
        }
        let name = input[name_start..name_end].to_ascii_lowercase();

        while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
        if chars.next_if(|(_, c)| *c == '=').is_none() {
            attrs.push((name, None));
            continue;
        }
        while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}

        let value = match chars.peek().copied() {
            Some((idx, quote @ ('"' | '\''))) => {
                chars.next();
                let start = idx + 1;
                let mut end = input.len();
                for (i, c) in chars.by_ref() {
                    if c == quote {
                        end = i;
                        break;
                    }
                }
                input[start..end].to_string()
            }
            Some((start, _)) => {
                let mut end = input.len();
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_whitespace() {
                        end = i;
                        break;
                    }
                    chars.next();
                }
                input[start..end].to_string()
            }
            None => String::new(),
        };
        attrs.push((name, Some(value)));
    }

    attrs
}

/// `value` must already be entity-decoded. Browsers ignore whitespace and control characters
/// when resolving a scheme, so compare against the normalized form.
fn is_safe_url(value: &str) -> bool {
    let normalized: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    !UNSAFE_SCHEMES.iter().any(|scheme| normalized.starts_with(scheme))
}
