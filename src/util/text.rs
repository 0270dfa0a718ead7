use std::borrow::Cow;

/// Ellipsis string used for truncation
const ELLIPSIS: &str = "...";
/// Length of the ellipsis in characters
const ELLIPSIS_LEN: usize = 3;

/// Truncates a string to at most `max_chars` characters.
///
/// If truncation is necessary, appends "..." so the result is still exactly
/// `max_chars` characters long. Counting is done in `char`s, so multi-byte
/// text is never split inside a code point.
///
/// For very short limits (0-3) there is no room for text plus ellipsis, so
/// the leading characters are returned without one.
///
/// # Examples
///
/// ```
/// use rssbot::util::truncate_chars;
///
/// assert_eq!(truncate_chars("Short", 10), "Short");
/// assert_eq!(truncate_chars("Hello World", 8), "Hello...");
/// assert_eq!(truncate_chars("Test", 2), "Te");
/// ```
pub fn truncate_chars(s: &str, max_chars: usize) -> Cow<'_, str> {
    // Fast path: byte length bounds char count
    if s.len() <= max_chars {
        return Cow::Borrowed(s);
    }

    let char_count = s.chars().count();
    if char_count <= max_chars {
        return Cow::Borrowed(s);
    }

    if max_chars <= ELLIPSIS_LEN {
        return Cow::Owned(s.chars().take(max_chars).collect());
    }

    let keep = max_chars - ELLIPSIS_LEN;
    let mut out: String = s.chars().take(keep).collect();
    // Don't leave a dangling space before the ellipsis
    let trimmed_len = out.trim_end().len();
    out.truncate(trimmed_len);
    out.push_str(ELLIPSIS);
    Cow::Owned(out)
}

/// Removes control characters that would garble a chat message.
///
/// Tabs and newlines are preserved; carriage returns, ESC, DEL and the other
/// C0 controls are dropped. Returns `Cow::Borrowed` when nothing needs
/// stripping.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    let is_stripped = |c: char| c.is_control() && c != '\n' && c != '\t';

    if !s.chars().any(is_stripped) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(s.chars().filter(|&c| !is_stripped(c)).collect())
}

/// Strips HTML markup from feed text.
///
/// Feed descriptions frequently carry inline HTML. Tags are removed, block
/// level breaks (`<br>`, `</p>`, `</div>`, `</li>`) become newlines, and the
/// five predefined XML entities plus `&nbsp;` and numeric references are
/// decoded. Unknown entities are left untouched. A `<` not followed by a
/// letter, `/` or `!` is ordinary text.
pub fn strip_html_tags(s: &str) -> Cow<'_, str> {
    if !s.contains('<') && !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find(['<', '&']) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        if rest.starts_with('<') {
            if !opens_tag(rest) {
                out.push('<');
                rest = &rest[1..];
                continue;
            }
            match rest.find('>') {
                Some(end) => {
                    let tag = rest[1..end].trim().to_ascii_lowercase();
                    if is_line_break_tag(&tag) {
                        out.push('\n');
                    }
                    rest = &rest[end + 1..];
                }
                None => {
                    // Unterminated tag: keep the text as-is
                    out.push_str(rest);
                    rest = "";
                }
            }
        } else {
            match decode_entity(rest) {
                Some((decoded, consumed)) => {
                    out.push(decoded);
                    rest = &rest[consumed..];
                }
                None => {
                    out.push('&');
                    rest = &rest[1..];
                }
            }
        }
    }
    out.push_str(rest);

    Cow::Owned(out)
}

/// A `<` starts markup only when followed by a tag name, `/` or `!`.
fn opens_tag(s: &str) -> bool {
    matches!(s[1..].chars().next(), Some(c) if c.is_ascii_alphabetic() || c == '/' || c == '!')
}

fn is_line_break_tag(tag: &str) -> bool {
    let name = tag
        .trim_end_matches('/')
        .split_whitespace()
        .next()
        .unwrap_or("");
    matches!(name, "br" | "/p" | "/div" | "/li" | "/h1" | "/h2" | "/h3" | "/h4")
}

/// Decodes one entity at the start of `s`, returning the char and bytes consumed.
fn decode_entity(s: &str) -> Option<(char, usize)> {
    let end = s.find(';')?;
    // Entities are short; anything longer is a bare ampersand
    if end > 10 {
        return None;
    }
    let body = &s[1..end];
    let decoded = match body {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        _ => {
            let code = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                body.strip_prefix('#')?.parse::<u32>().ok()?
            };
            char::from_u32(code)?
        }
    };
    Some((decoded, end + 1))
}

/// Normalizes feed text for a chat message.
///
/// Strips HTML and control characters, trims every line, collapses runs of
/// blank lines into one and trims the result.
pub fn clean_text(s: &str) -> String {
    let stripped = strip_html_tags(s);
    let stripped = strip_control_chars(&stripped);

    let mut out = String::with_capacity(stripped.len());
    let mut blank_run = false;
    for line in stripped.lines().map(str::trim) {
        if line.is_empty() {
            blank_run = !out.is_empty();
            continue;
        }
        if blank_run {
            out.push_str("\n\n");
        } else if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(line);
        blank_run = false;
    }
    out
}
