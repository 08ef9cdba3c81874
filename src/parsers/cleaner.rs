// Text cleaner - isolates and repairs the JSON array inside raw model output

use super::RecoveryError;

/// Characters that may follow a backslash in a JSON string
const JSON_ESCAPES: [char; 9] = ['"', '\\', '/', 'b', 'f', 'n', 'r', 't', 'u'];

/// Runs the full cleaning sequence over raw model output.
///
/// The result is intended to parse as strict JSON but carries no guarantee.
/// Fails only when no array can be isolated.
pub fn clean(raw: &str) -> Result<String, RecoveryError> {
    let span = isolate_array(raw)?;
    Ok(repair(span))
}

/// Repair steps applied to an isolated array span, in order
pub fn repair(span: &str) -> String {
    let text = strip_control_chars(span);
    let text = repair_escapes(&text);
    let text = remove_trailing_commas(&text);
    let text = escape_raw_whitespace_in_strings(&text);
    collapse_repeated_commas(&text)
}

/// Returns the span from the first `[` to the bracket that closes it.
///
/// Brackets inside string literals are skipped. When that scan never
/// balances (broken quoting), plain bracket counting decides.
pub fn isolate_array(raw: &str) -> Result<&str, RecoveryError> {
    let start = raw.find('[').ok_or(RecoveryError::NoArrayFound)?;
    let tail = &raw[start..];

    let end = find_array_end(tail, true)
        .or_else(|| find_array_end(tail, false))
        .ok_or(RecoveryError::UnbalancedArray)?;

    Ok(&tail[..=end])
}

fn find_array_end(text: &str, skip_strings: bool) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, c) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' if skip_strings => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }

    None
}

/// Drops control characters except newline, carriage return and tab
pub fn strip_control_chars(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\r' | '\t'))
        .collect()
}

/// Doubles every backslash that does not start a valid JSON escape.
///
/// Valid pairs, `\\` included, are copied through untouched. A `\u` needs
/// four hex digits to count as valid.
pub fn repair_escapes(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c != '\\' {
            out.push(c);
            i += 1;
            continue;
        }

        match chars.get(i + 1).copied() {
            Some('u') if is_unicode_escape(&chars[i + 2..]) => {
                out.push_str("\\u");
                i += 2;
            }
            Some(next) if next != 'u' && JSON_ESCAPES.contains(&next) => {
                out.push('\\');
                out.push(next);
                i += 2;
            }
            _ => {
                out.push_str("\\\\");
                i += 1;
            }
        }
    }

    out
}

fn is_unicode_escape(rest: &[char]) -> bool {
    rest.len() >= 4 && rest[..4].iter().all(|c| c.is_ascii_hexdigit())
}

/// Removes commas that directly precede a closing `]` or `}`
pub fn remove_trailing_commas(text: &str) -> String {
    rewrite_outside_strings(text, |out, c, in_string| {
        if !in_string && (c == ']' || c == '}') {
            let kept = out
                .trim_end_matches(|ch: char| ch == ',' || ch.is_whitespace())
                .len();
            if out[kept..].contains(',') {
                out.truncate(kept);
            }
        }
        out.push(c);
    })
}

/// Escapes raw newlines, carriage returns and tabs inside string literals
pub fn escape_raw_whitespace_in_strings(text: &str) -> String {
    rewrite_outside_strings(text, |out, c, in_string| match c {
        '\n' if in_string => out.push_str("\\n"),
        '\r' if in_string => out.push_str("\\r"),
        '\t' if in_string => out.push_str("\\t"),
        _ => out.push(c),
    })
}

/// Collapses runs of commas between tokens into one
pub fn collapse_repeated_commas(text: &str) -> String {
    rewrite_outside_strings(text, |out, c, in_string| {
        if c == ',' && !in_string && out.trim_end().ends_with(',') {
            return;
        }
        out.push(c);
    })
}

/// Copies `text` through `emit`, reporting whether each char sits inside a
/// string literal. Quote characters themselves report the state before them.
fn rewrite_outside_strings(text: &str, mut emit: impl FnMut(&mut String, char, bool)) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for c in text.chars() {
        let inside = in_string;
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
        }
        emit(&mut out, c, inside);
    }

    out
}
