//! Form validation and sanitization.
//!
//! A [`Checker`] runs an ordered chain of rules per form field. Each field
//! stops at its first failing rule, but every field is checked, so a rejected
//! form reports all of its problems at once. Values come out trimmed and
//! escaped, ready either to be persisted or to be echoed back into the form.

use chrono::{DateTime, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

/// A single failed field rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Form field name
    pub field: &'static str,
    /// Human-readable message shown next to the form
    pub message: String,
}

/// Collects field errors across a whole form
#[derive(Debug, Default)]
pub struct Checker {
    errors: Vec<FieldError>,
}

impl Checker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a rule chain for one field
    pub fn field<'c>(&'c mut self, name: &'static str, raw: &str) -> FieldRule<'c> {
        FieldRule {
            checker: self,
            name,
            value: raw.to_string(),
            skip: false,
        }
    }

    /// Record a failure found outside a rule chain (e.g. a dangling reference)
    pub fn reject(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    /// Hand back `value` when every rule passed, the collected errors otherwise
    pub fn finish<T>(self, value: T) -> Result<T, Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self.errors)
        }
    }
}

/// Rule chain for a single field
pub struct FieldRule<'c> {
    checker: &'c mut Checker,
    name: &'static str,
    value: String,
    skip: bool,
}

impl<'c> FieldRule<'c> {
    fn fail(&mut self, message: &str) {
        self.checker.reject(self.name, message);
        self.skip = true;
    }

    pub fn trim(mut self) -> Self {
        self.value = self.value.trim().to_string();
        self
    }

    /// Empty input is valid and skips every remaining rule
    pub fn optional(mut self) -> Self {
        if self.value.is_empty() {
            self.skip = true;
        }
        self
    }

    pub fn required(self, message: &str) -> Self {
        self.min_length(1, message)
    }

    pub fn min_length(mut self, min: usize, message: &str) -> Self {
        if !self.skip && self.value.chars().count() < min {
            self.fail(message);
        }
        self
    }

    pub fn max_length(mut self, max: usize, message: &str) -> Self {
        if !self.skip && self.value.chars().count() > max {
            self.fail(message);
        }
        self
    }

    /// Escape markup-significant characters. Runs even after a failure so
    /// the echoed value is always safe to render.
    pub fn escape(mut self) -> Self {
        self.value = escape(&self.value);
        self
    }

    pub fn alphanumeric(mut self, message: &str) -> Self {
        if !self.skip && !self.value.chars().all(|c| c.is_ascii_alphanumeric()) {
            self.fail(message);
        }
        self
    }

    pub fn one_of(mut self, allowed: &[&str], message: &str) -> Self {
        if !self.skip && !allowed.contains(&self.value.as_str()) {
            self.fail(message);
        }
        self
    }

    /// Finish the chain, yielding the sanitized value
    pub fn value(self) -> String {
        self.value
    }

    /// Finish the chain coercing to an ISO-8601 date. Empty input is absent.
    pub fn date(mut self, message: &str) -> (String, Option<NaiveDate>) {
        if self.value.is_empty() {
            return (self.value, None);
        }
        let parsed = if self.skip { None } else { parse_iso_date(&self.value) };
        if parsed.is_none() && !self.skip {
            self.fail(message);
        }
        (self.value, parsed)
    }

    /// Finish the chain coercing to a record identifier
    pub fn id(mut self, message: &str) -> (String, Option<Uuid>) {
        if self.skip {
            return (self.value, None);
        }
        let parsed = Uuid::parse_str(&self.value).ok();
        if parsed.is_none() {
            self.fail(message);
        }
        (self.value, parsed)
    }
}

/// Sanitize every element of a multi-valued field, dropping blanks and
/// repeated entries while keeping submission order.
pub fn sanitize_each(raw: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for value in raw {
        let value = escape(value.trim());
        if !value.is_empty() && !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

/// Replace characters significant to HTML with entities
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            c => out.push(c),
        }
    }
    out
}

/// Accepts a calendar date (`1965-08-01`) or a full RFC 3339 timestamp
pub fn parse_iso_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(input).ok().map(|d| d.date_naive()))
}

/// Parse an identifier taken from a URL path
pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_fails_required() {
        let mut checker = Checker::new();
        let value = checker
            .field("title", "   \t ")
            .trim()
            .required("Title must not be empty.")
            .escape()
            .value();

        assert_eq!(value, "");
        assert_eq!(
            checker.errors(),
            &[FieldError {
                field: "title",
                message: "Title must not be empty.".to_string()
            }]
        );
    }

    #[test]
    fn first_failure_per_field_but_all_fields_checked() {
        let mut checker = Checker::new();
        checker
            .field("first_name", "")
            .trim()
            .required("First name must be specified.")
            .escape()
            .alphanumeric("First name has non-alphanumeric characters.")
            .value();
        checker
            .field("family_name", "O'Brien")
            .trim()
            .required("Family name must be specified.")
            .escape()
            .alphanumeric("Family name has non-alphanumeric characters.")
            .value();

        let fields: Vec<_> = checker.errors().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["first_name", "family_name"]);
        assert_eq!(checker.errors()[0].message, "First name must be specified.");
    }

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(
            escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;&#x2F;a&gt;"
        );
        assert_eq!(escape("plain text"), "plain text");
    }

    #[test]
    fn empty_optional_date_is_absent_not_invalid() {
        let mut checker = Checker::new();
        let (echo, date) = checker
            .field("date_of_birth", "  ")
            .optional()
            .trim()
            .escape()
            .date("Invalid date of birth");

        assert_eq!(echo, "");
        assert_eq!(date, None);
        assert!(checker.is_clean());
    }

    #[test]
    fn dates_accept_calendar_and_timestamp_forms() {
        let expected = NaiveDate::from_ymd_opt(1920, 1, 2);
        assert_eq!(parse_iso_date("1920-01-02"), expected);
        assert_eq!(parse_iso_date("1920-01-02T10:00:00Z"), expected);
        assert_eq!(parse_iso_date("02/01/1920"), None);
        assert_eq!(parse_iso_date("1920-13-01"), None);
    }

    #[test]
    fn invalid_date_is_reported_and_echoed_escaped() {
        let mut checker = Checker::new();
        let (echo, date) = checker
            .field("due_back", "<soon>")
            .trim()
            .optional()
            .escape()
            .date("Invalid date");

        assert_eq!(echo, "&lt;soon&gt;");
        assert_eq!(date, None);
        assert_eq!(checker.errors()[0].message, "Invalid date");
    }

    #[test]
    fn sanitize_each_normalizes_multi_valued_fields() {
        assert!(sanitize_each(&[]).is_empty());
        assert_eq!(sanitize_each(&["a".to_string()]), vec!["a"]);
        assert_eq!(
            sanitize_each(&["b".to_string(), " a ".to_string(), "b".to_string(), "".to_string()]),
            vec!["b", "a"]
        );
        assert_eq!(sanitize_each(&["<i>".to_string()]), vec!["&lt;i&gt;"]);
    }

    #[test]
    fn length_bounds_count_characters() {
        let mut checker = Checker::new();
        checker
            .field("name", "Sf")
            .trim()
            .min_length(3, "too short")
            .max_length(100, "too long")
            .value();
        checker
            .field("first_name", &"é".repeat(100))
            .max_length(100, "too long")
            .value();

        assert_eq!(checker.errors().len(), 1);
        assert_eq!(checker.errors()[0].message, "too short");
    }

    #[test]
    fn ids_must_be_uuids() {
        let mut checker = Checker::new();
        let id = Uuid::new_v4();
        let (_, parsed) = checker.field("author", &id.to_string()).trim().id("bad");
        assert_eq!(parsed, Some(id));

        let (_, parsed) = checker.field("author", "scifi").trim().id("bad");
        assert_eq!(parsed, None);
        assert_eq!(checker.into_errors().len(), 1);
    }
}
