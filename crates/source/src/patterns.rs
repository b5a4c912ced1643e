//! Date and number patterns used to interpret hierarchical field text.
//!
//! Patterns are written in the report engine's notation (`yyyy-MM-dd
//! HH:mm:ss`, `#######0.##`) and translated once into something chrono and
//! the float parser understand.

use chrono::{NaiveDate, NaiveDateTime};
use quire_types::Locale;

/// A date pattern such as `yyyy-MM-dd HH:mm:ss`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePattern {
    source: String,
    chrono_format: String,
    has_time: bool,
}

impl DatePattern {
    pub fn new(pattern: &str) -> Self {
        let mut format = String::new();
        let mut has_time = false;
        let chars: Vec<char> = pattern.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            if c == '\'' {
                // '' is a quote both inside and outside a quoted literal.
                if chars.get(i + 1) == Some(&'\'') {
                    push_literal(&mut format, '\'');
                    i += 2;
                    continue;
                }
                i += 1;
                while i < chars.len() {
                    if chars[i] == '\'' {
                        if chars.get(i + 1) != Some(&'\'') {
                            break;
                        }
                        push_literal(&mut format, '\'');
                        i += 2;
                        continue;
                    }
                    push_literal(&mut format, chars[i]);
                    i += 1;
                }
                // Closing quote.
                i += 1;
                continue;
            }

            let run = chars[i..].iter().take_while(|&&x| x == c).count();
            match c {
                'y' if run == 2 => format.push_str("%y"),
                'y' => format.push_str("%Y"),
                'M' if run >= 4 => format.push_str("%B"),
                'M' if run == 3 => format.push_str("%b"),
                'M' => format.push_str("%m"),
                'd' => format.push_str("%d"),
                'H' => {
                    has_time = true;
                    format.push_str("%H");
                }
                'h' => {
                    has_time = true;
                    format.push_str("%I");
                }
                'm' => format.push_str("%M"),
                's' => format.push_str("%S"),
                'S' => format.push_str("%3f"),
                'a' => format.push_str("%p"),
                other => {
                    for _ in 0..run {
                        push_literal(&mut format, other);
                    }
                }
            }
            i += run;
        }

        Self {
            source: pattern.to_string(),
            chrono_format: format,
            has_time,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Parses `text`; date-only patterns yield midnight.
    pub fn parse(&self, text: &str) -> Option<NaiveDateTime> {
        if self.has_time {
            NaiveDateTime::parse_from_str(text, &self.chrono_format).ok()
        } else {
            NaiveDate::parse_from_str(text, &self.chrono_format)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        }
    }
}

fn push_literal(format: &mut String, c: char) {
    if c == '%' {
        format.push_str("%%");
    } else {
        format.push(c);
    }
}

/// A decimal number pattern such as `#######0.##`.
///
/// Only the fraction part matters when reading: values are rounded to the
/// number of fraction digits the pattern allows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberPattern {
    source: String,
    max_fraction_digits: u32,
}

impl NumberPattern {
    pub fn new(pattern: &str) -> Self {
        let max_fraction_digits = pattern
            .split_once('.')
            .map(|(_, fraction)| fraction.chars().filter(|c| matches!(c, '#' | '0')).count())
            .unwrap_or(0);
        Self {
            source: pattern.to_string(),
            max_fraction_digits: u32::try_from(max_fraction_digits).unwrap_or(u32::MAX),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn max_fraction_digits(&self) -> u32 {
        self.max_fraction_digits
    }

    /// Reads `text` written with the separators of `locale`.
    pub fn parse(&self, text: &str, locale: &Locale) -> Option<f64> {
        let grouping = locale.grouping_separator();
        let decimal = locale.decimal_separator();
        let normalised: String = text
            .trim()
            .chars()
            .filter(|&c| c != grouping)
            .map(|c| if c == decimal { '.' } else { c })
            .collect();
        let value: f64 = normalised.parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        let scale = 10f64.powi(i32::try_from(self.max_fraction_digits.min(15)).unwrap_or(15));
        Some((value * scale).round() / scale)
    }
}
