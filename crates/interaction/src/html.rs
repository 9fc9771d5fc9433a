use std::{borrow::Cow, fmt};

/// Escape the characters that carry meaning in HTML text and attribute values
///
/// Returns the input unchanged (borrowed) when there is nothing to escape.
#[must_use]
pub fn escape(input: &str) -> Cow<'_, str> {
    let Some(first) = input.find(needs_escape) else {
        return Cow::Borrowed(input);
    };

    let mut output = String::with_capacity(input.len() + 16);
    output.push_str(&input[..first]);
    for ch in input[first..].chars() {
        match entity(ch) {
            Some(entity) => output.push_str(entity),
            None => output.push(ch),
        }
    }

    Cow::Owned(output)
}

fn needs_escape(ch: char) -> bool {
    entity(ch).is_some()
}

fn entity(ch: char) -> Option<&'static str> {
    match ch {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#039;"),
        _ => None,
    }
}

/// Untrusted text that is escaped as it is formatted
///
/// Templates interpolate request-derived values through this wrapper only.
#[derive(Debug, Clone, Copy)]
pub struct Escaped<'a>(pub &'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&escape(self.0))
    }
}
