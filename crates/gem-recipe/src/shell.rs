//! The small slice of shell quoting that PKGBUILD values need.

/// Split a shell value into words, honouring single quotes, double quotes
/// and backslash escapes. Adjacent quoted pieces join into one word, so
/// `'it'\''s'` reads as `it's`.
pub fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                in_word = true;
                for q in chars.by_ref() {
                    if q == '\'' {
                        break;
                    }
                    current.push(q);
                }
            }
            '"' => {
                in_word = true;
                while let Some(q) = chars.next() {
                    match q {
                        '"' => break,
                        '\\' => {
                            if let Some(escaped) = chars.next() {
                                if !matches!(escaped, '"' | '\\' | '$' | '`') {
                                    current.push('\\');
                                }
                                current.push(escaped);
                            }
                        }
                        other => current.push(other),
                    }
                }
            }
            '\\' => {
                in_word = true;
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            other => {
                in_word = true;
                current.push(other);
            }
        }
    }

    if in_word {
        words.push(current);
    }
    words
}

/// Quote `value` for a PKGBUILD assignment. Values carrying a `$`
/// expansion are double-quoted so the expansion survives; everything else
/// is single-quoted with embedded single quotes escaped.
pub fn quote(value: &str) -> String {
    if value.contains('$') {
        let mut quoted = String::with_capacity(value.len() + 2);
        quoted.push('"');
        for c in value.chars() {
            if matches!(c, '"' | '\\' | '`') {
                quoted.push('\\');
            }
            quoted.push(c);
        }
        quoted.push('"');
        quoted
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}

/// Quote `value` only when it would not survive [`split_words`] bare.
pub fn quote_if_needed(value: &str) -> String {
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._+-:/@%=,!_".contains(c));
    if plain {
        value.to_string()
    } else {
        quote(value)
    }
}
