// Field validators
use chrono::{NaiveDate, Utc};
use once_cell::sync::Lazy;

/// A failed rule: stable code plus a human-readable message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub code: &'static str,
    pub message: String,
}

impl Violation {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

/// Trait for field validators
pub trait FieldValidator {
    /// Validate a value
    fn validate(&self, value: &str) -> Result<(), Violation>;
}

/// String validator with various constraints
///
/// Lengths count characters, not bytes. Messages can be overridden per rule
/// so forms show copy such as "Password too short".
#[derive(Debug, Clone)]
pub struct StringValidator {
    min_length: Option<usize>,
    max_length: Option<usize>,
    pattern: Option<regex::Regex>,
    not_empty: bool,
    trim: bool,
    messages: Vec<(&'static str, String)>,
}

impl Default for StringValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl StringValidator {
    /// Create a new string validator
    pub fn new() -> Self {
        Self {
            min_length: None,
            max_length: None,
            pattern: None,
            not_empty: false,
            trim: true,
            messages: Vec::new(),
        }
    }

    /// Require non-empty string
    #[must_use]
    pub fn not_empty(mut self) -> Self {
        self.not_empty = true;
        self
    }

    /// Set minimum length
    #[must_use]
    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Set maximum length
    #[must_use]
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Set pattern to match
    ///
    /// # Errors
    /// Returns the regex compile error for an invalid pattern
    pub fn pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.pattern = Some(regex::Regex::new(pattern)?);
        Ok(self)
    }

    /// Set whether to trim before validation
    #[must_use]
    pub fn trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Replace the message reported for `code`
    /// (`required`, `too_short`, `too_long`, `pattern`)
    #[must_use]
    pub fn message(mut self, code: &'static str, message: impl Into<String>) -> Self {
        self.messages.retain(|(c, _)| *c != code);
        self.messages.push((code, message.into()));
        self
    }

    fn violation(&self, code: &'static str, default: String) -> Violation {
        let message = self
            .messages
            .iter()
            .find(|(c, _)| *c == code)
            .map_or(default, |(_, m)| m.clone());
        Violation::new(code, message)
    }
}

impl FieldValidator for StringValidator {
    fn validate(&self, value: &str) -> Result<(), Violation> {
        let val = if self.trim { value.trim() } else { value };
        let len = val.chars().count();

        if self.not_empty && val.is_empty() {
            return Err(self.violation("required", "Value cannot be empty".to_string()));
        }

        if let Some(min) = self.min_length {
            if len < min {
                return Err(
                    self.violation("too_short", format!("Length must be at least {min} characters"))
                );
            }
        }

        if let Some(max) = self.max_length {
            if len > max {
                return Err(
                    self.violation("too_long", format!("Length must not exceed {max} characters"))
                );
            }
        }

        if let Some(ref pattern) = self.pattern {
            if !pattern.is_match(val) {
                return Err(self.violation(
                    "pattern",
                    format!("Value must match pattern: {}", pattern.as_str()),
                ));
            }
        }

        Ok(())
    }
}

/// Static email regex pattern compiled once at first use
#[allow(clippy::expect_used)]
static EMAIL_REGEX: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("EMAIL_REGEX pattern is valid and well-formed")
});

/// Email validator
#[derive(Debug, Clone, Default)]
pub struct EmailValidator;

impl EmailValidator {
    /// Create a new email validator
    pub const fn new() -> Self {
        Self
    }
}

impl FieldValidator for EmailValidator {
    fn validate(&self, value: &str) -> Result<(), Violation> {
        let value = value.trim();
        if value.is_empty() {
            return Err(Violation::new("required", "Email is required"));
        }
        if !EMAIL_REGEX.is_match(value) {
            return Err(Violation::new("email", "Invalid email format"));
        }
        Ok(())
    }
}

/// Temporal constraint applied by [`DateValidator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRule {
    Any,
    /// Strictly before today (dates of birth, issue dates)
    Past,
    /// Strictly after today (expiry dates, arrival dates)
    Future,
}

/// `YYYY-MM-DD` calendar date validator
#[derive(Debug, Clone)]
pub struct DateValidator {
    rule: DateRule,
    today: Option<NaiveDate>,
}

impl DateValidator {
    pub const fn new(rule: DateRule) -> Self {
        Self { rule, today: None }
    }

    /// Pin "today" instead of reading the clock
    #[must_use]
    pub const fn relative_to(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }
}

impl FieldValidator for DateValidator {
    fn validate(&self, value: &str) -> Result<(), Violation> {
        let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
            .map_err(|_| Violation::new("date", "Date must use the YYYY-MM-DD format"))?;
        let today = self.today.unwrap_or_else(|| Utc::now().date_naive());

        match self.rule {
            DateRule::Past if date >= today => {
                Err(Violation::new("date_not_past", "Date must be in the past"))
            }
            DateRule::Future if date <= today => {
                Err(Violation::new("date_not_future", "Date must be in the future"))
            }
            _ => Ok(()),
        }
    }
}
