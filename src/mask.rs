// src/mask.rs
//! Sensitive-column detection and irreversible value masking
//!
//! Columns are classified by name only, against a table of substring
//! patterns. Over-masking is acceptable; under-masking is not, so the patterns
//! are deliberately broad (`identifier` also catches `customer_identifier`).

use std::iter;

use tracing::debug;

use crate::consts::DEFAULT_MASK_CHAR;
use crate::table::{Cell, Table};

/// Built-in patterns, matched against normalized column names
pub const SENSITIVE_COLUMN_PATTERNS: &[&str] = &[
    "ssn",
    "social_security",
    "credit_card",
    "cc_number",
    "card_number",
    "password",
    "secret",
    "api_key",
    "token",
    "email",
    "phone",
    "dob",
    "student_id",
    "studentid",
    "id_number",
    "identifier",
];

/// Lowercase, with spaces and hyphens turned into underscores
pub fn normalize_column_name(name: &str) -> String {
    name.to_lowercase().replace([' ', '-'], "_")
}

/// Classify a column against the built-in pattern table
pub fn is_sensitive_column(name: &str) -> bool {
    let normalized = normalize_column_name(name);
    SENSITIVE_COLUMN_PATTERNS
        .iter()
        .any(|pattern| normalized.contains(pattern))
}

/// The rule table consulted for every column name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensitivePatterns {
    patterns: Vec<String>,
}

impl Default for SensitivePatterns {
    fn default() -> Self {
        Self::new(SENSITIVE_COLUMN_PATTERNS.iter().copied())
    }
}

impl SensitivePatterns {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self {
            patterns: Vec::new(),
        };
        table.extend(patterns);
        table
    }

    /// Built-ins plus `extra`
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::default();
        table.extend(extra);
        table
    }

    fn extend<I, S>(&mut self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            let normalized = normalize_column_name(pattern.as_ref().trim());
            if !normalized.is_empty() && !self.patterns.contains(&normalized) {
                self.patterns.push(normalized);
            }
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn matches(&self, column_name: &str) -> bool {
        let normalized = normalize_column_name(column_name);
        self.patterns
            .iter()
            .any(|pattern| normalized.contains(pattern.as_str()))
    }
}

/// Mask a value, keeping its length and at most two boundary characters.
///
/// Works on the trimmed value and counts characters, not bytes:
///
/// | length | result            |
/// |--------|-------------------|
/// | 0      | empty             |
/// | 1–2    | all masked        |
/// | 3–4    | first kept        |
/// | 5+     | first 2, last 2   |
pub fn mask_value(value: &str, mask_char: char) -> String {
    let chars: Vec<char> = value.trim().chars().collect();
    let n = chars.len();
    match n {
        0 => String::new(),
        1..=2 => iter::repeat(mask_char).take(n).collect(),
        3..=4 => iter::once(chars[0])
            .chain(iter::repeat(mask_char).take(n - 1))
            .collect(),
        _ => {
            let visible_start = 2.min(n / 2);
            let visible_end = 2.min(n - visible_start - 1);
            chars[..visible_start]
                .iter()
                .copied()
                .chain(iter::repeat(mask_char).take(n - visible_start - visible_end))
                .chain(chars[n - visible_end..].iter().copied())
                .collect()
        }
    }
}

/// Missing values pass through; absence is not sensitive
pub fn mask_cell(cell: Option<&str>, mask_char: char) -> Cell {
    cell.map(|value| mask_value(value, mask_char))
}

/// Applies a pattern table and mask character to whole tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Masker {
    patterns: SensitivePatterns,
    mask_char: char,
}

impl Default for Masker {
    fn default() -> Self {
        Self::new(SensitivePatterns::default(), DEFAULT_MASK_CHAR)
    }
}

impl Masker {
    pub fn new(patterns: SensitivePatterns, mask_char: char) -> Self {
        Self {
            patterns,
            mask_char,
        }
    }

    pub fn patterns(&self) -> &SensitivePatterns {
        &self.patterns
    }

    pub fn mask_char(&self) -> char {
        self.mask_char
    }

    /// Indices of the columns this masker rewrites
    pub fn sensitive_columns(&self, table: &Table) -> Vec<usize> {
        table
            .headers()
            .iter()
            .enumerate()
            .filter(|(_, name)| self.patterns.matches(name))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// New table with every classified column masked; the input is untouched
    pub fn mask_table(&self, table: &Table) -> Table {
        let sensitive = self.sensitive_columns(table);
        debug!(
            columns = ?sensitive
                .iter()
                .filter_map(|&idx| table.headers().get(idx))
                .collect::<Vec<_>>(),
            "masking columns"
        );

        let rows = table
            .rows()
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(idx, cell)| {
                        if sensitive.contains(&idx) {
                            mask_cell(cell.as_deref(), self.mask_char)
                        } else {
                            cell.clone()
                        }
                    })
                    .collect()
            })
            .collect();

        Table::new(table.headers().to_vec(), rows)
    }
}

/// Mask a table with the built-in patterns and `*`
pub fn mask_table(table: &Table) -> Table {
    Masker::default().mask_table(table)
}
