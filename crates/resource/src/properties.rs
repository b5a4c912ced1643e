//! Reading and writing `.properties` bundles.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::io;
use std::path::Path;

/// Parses `.properties` text into a key/value table.
///
/// Supports `#`/`!` comments, `=`, `:` or whitespace separators, line
/// continuations with a trailing backslash and the usual escapes including
/// `\uXXXX`.
pub fn parse_properties(text: &str) -> HashMap<String, String> {
    let mut entries = HashMap::new();
    let mut logical = String::new();

    for line in text.lines() {
        let trimmed = line.trim_start();
        if logical.is_empty() && (trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!')) {
            continue;
        }
        logical.push_str(trimmed);
        if ends_with_continuation(&logical) {
            logical.pop();
            continue;
        }
        let (key, value) = split_entry(&logical);
        entries.insert(unescape(key), unescape(value));
        logical.clear();
    }
    if !logical.is_empty() {
        let (key, value) = split_entry(&logical);
        entries.insert(unescape(key), unescape(value));
    }
    entries
}

/// Writes a bundle with every character of keys and values `\u`-escaped.
///
/// Entries with an empty value are written with the key as their value so a
/// lookup never produces an empty string.
pub fn write_properties<'a, I>(path: &Path, entries: I) -> io::Result<()>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut out = String::new();
    for (key, value) in entries {
        let value = if value.is_empty() { key } else { value };
        escape_into(&mut out, key);
        out.push('=');
        escape_into(&mut out, value);
        out.push('\n');
    }
    std::fs::write(path, out)
}

fn escape_into(out: &mut String, text: &str) {
    for unit in text.encode_utf16() {
        let _ = write!(out, "\\u{unit:04x}");
    }
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => return (&line[..i], line[i + 1..].trim_start()),
            c if c.is_whitespace() => {
                let rest = line[i..].trim_start();
                let rest = rest
                    .strip_prefix('=')
                    .or_else(|| rest.strip_prefix(':'))
                    .unwrap_or(rest);
                return (&line[..i], rest.trim_start());
            }
            _ => {}
        }
    }
    (line, "")
}

fn unescape(text: &str) -> String {
    let mut units: Vec<u16> = Vec::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u16; 2];
            units.extend_from_slice(c.encode_utf16(&mut buf));
            continue;
        }
        match chars.next() {
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u16::from_str_radix(&hex, 16) {
                    Ok(unit) => units.push(unit),
                    Err(_) => units.extend(format!("u{hex}").encode_utf16()),
                }
            }
            Some('n') => units.push(u16::from(b'\n')),
            Some('t') => units.push(u16::from(b'\t')),
            Some('r') => units.push(u16::from(b'\r')),
            Some('f') => units.push(0x0c),
            Some(other) => {
                let mut buf = [0u16; 2];
                units.extend_from_slice(other.encode_utf16(&mut buf));
            }
            None => {}
        }
    }
    String::from_utf16_lossy(&units)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_separators_and_comments() {
        let entries = parse_properties(
            "# comment\n! also a comment\nTotal=Importe\nCustomer: Cliente\nDate   Fecha\n\nEmpty=\n",
        );
        assert_eq!(entries["Total"], "Importe");
        assert_eq!(entries["Customer"], "Cliente");
        assert_eq!(entries["Date"], "Fecha");
        assert_eq!(entries["Empty"], "");
        assert_eq!(entries.len(), 4);
    }

    #[test]
    fn parses_unicode_escapes_and_escaped_separators() {
        let entries = parse_properties("Ma\\u00f1ana=Tomorrow\nkey\\=with\\:seps=v\\u00e1lue\n");
        assert_eq!(entries["Mañana"], "Tomorrow");
        assert_eq!(entries["key=with:seps"], "válue");
    }

    #[test]
    fn joins_continuation_lines() {
        let entries = parse_properties("Long=first \\\n    second\n");
        assert_eq!(entries["Long"], "first second");
    }

    #[test]
    fn write_then_parse_preserves_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice_es.properties");
        write_properties(&path, [("Invoice", "Factura"), ("Total €", ""), ("Año", "Year")]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.is_ascii());
        assert!(text.starts_with("\\u0049\\u006e"));

        let entries = parse_properties(&text);
        assert_eq!(entries["Invoice"], "Factura");
        assert_eq!(entries["Total €"], "Total €");
        assert_eq!(entries["Año"], "Year");
    }
}
