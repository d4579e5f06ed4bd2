//! Lexical helpers over SQL text
//!
//! Nothing here parses SQL. The scanner only knows enough to skip string
//! literals, quoted identifiers and comments, so that `?`, `%s` and keywords
//! inside them are not mistaken for syntax.

/// Table-name substitution marker accepted in override text
pub const TABLE_MARKER: &str = "%s";

/// Replaces every blanked-out region (literals, quoted identifiers, comments)
/// with spaces, preserving byte offsets.
fn blank_quoted(sql: &str) -> String {
    blank(sql, true)
}

/// Like [`blank_quoted`] but leaves quoted identifiers in place
fn blank_literals(sql: &str) -> String {
    blank(sql, false)
}

fn blank(sql: &str, identifiers: bool) -> String {
    let bytes = sql.as_bytes();
    let mut out = bytes.to_vec();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'\'' | b'"' | b'`') => {
                let start = i;
                i += 1;
                while i < bytes.len() {
                    if bytes[i] == quote {
                        // Doubled quote is an escaped quote
                        if i + 1 < bytes.len() && bytes[i + 1] == quote {
                            i += 2;
                            continue;
                        }
                        break;
                    }
                    i += 1;
                }
                let end = (i + 1).min(bytes.len());
                if quote == b'\'' || identifiers {
                    out[start..end].fill(b' ');
                }
                i = end;
            }
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                let start = i;
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                out[start..i].fill(b' ');
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let start = i;
                i += 2;
                while i + 1 < bytes.len() && !(bytes[i] == b'*' && bytes[i + 1] == b'/') {
                    i += 1;
                }
                let end = (i + 2).min(bytes.len());
                out[start..end].fill(b' ');
                i = end;
            }
            _ => i += 1,
        }
    }

    // Regions start and end on ASCII delimiters, so whole characters were replaced
    String::from_utf8_lossy(&out).into_owned()
}

/// Number of anonymous `?` placeholders in the statement
///
/// Only anonymous placeholders are supported: a numbered `?NNN` counts once
/// per occurrence and named `:name`, `@name` or `$name` parameters are not
/// counted, so statements using them fail the binder's count check.
pub fn placeholder_count(sql: &str) -> usize {
    blank_quoted(sql).bytes().filter(|b| *b == b'?').count()
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Byte offset of `word` as a standalone, case-insensitive token outside
/// literals and comments
pub fn find_keyword(sql: &str, word: &str) -> Option<usize> {
    keyword_offsets(&blank_quoted(sql), word).into_iter().next()
}

/// Like [`find_keyword`] but skips occurrences nested inside parentheses,
/// such as the WHERE of a subquery
pub fn find_top_level_keyword(sql: &str, word: &str) -> Option<usize> {
    let scanned = blank_quoted(sql);
    let depths = paren_depths(&scanned);
    keyword_offsets(&scanned, word).into_iter().find(|at| depths[*at] == 0)
}

/// Whether the statement names the column `name`, either bare (matched as a
/// case-insensitive token) or, when given, in its exact `quoted` form
pub fn mentions_identifier(sql: &str, name: &str, quoted: Option<&str>) -> bool {
    if find_keyword(sql, name).is_some() {
        return true;
    }
    match quoted {
        Some(quoted) => blank_literals(sql).contains(quoted),
        None => false,
    }
}

fn keyword_offsets(scanned: &str, word: &str) -> Vec<usize> {
    let haystack = scanned.to_ascii_lowercase();
    let needle = word.to_ascii_lowercase();
    let mut offsets = Vec::new();

    if !needle.is_empty() {
        let bytes = haystack.as_bytes();
        let mut from = 0;
        while let Some(pos) = haystack[from..].find(&needle) {
            let start = from + pos;
            let end = start + needle.len();
            let before_ok = start == 0 || !is_word_byte(bytes[start - 1]);
            let after_ok = end >= bytes.len() || !is_word_byte(bytes[end]);
            if before_ok && after_ok {
                offsets.push(start);
            }
            from = start + 1;
        }
    }
    offsets
}

/// Parenthesis depth at every byte of already-blanked text
fn paren_depths(scanned: &str) -> Vec<usize> {
    let mut depth = 0usize;
    scanned
        .bytes()
        .map(|b| match b {
            b'(' => {
                depth += 1;
                depth - 1
            }
            b')' => {
                depth = depth.saturating_sub(1);
                depth
            }
            _ => depth,
        })
        .collect()
}

/// Wraps an identifier in double quotes, doubling embedded quotes
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Substitutes the table name for every marker; text without a marker is
/// returned unchanged
pub fn substitute_table(template: &str, table_name: &str) -> String {
    if template.contains(TABLE_MARKER) { template.replace(TABLE_MARKER, table_name) } else { template.to_string() }
}
