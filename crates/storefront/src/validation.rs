//! Form field validation.
//!
//! [`Validator`] checks submitted [`Form`]s field by field. Errors are
//! collected per field rather than stopping at the first failure, so every
//! problem can be shown next to its input.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use tiffin_core::Email;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[6-9][0-9]{9}$").expect("Invalid regex"));
static PINCODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9][0-9]{5}$").expect("Invalid regex"));
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]{2,50}$").expect("Invalid regex"));
static ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9\s,.-]{5,100}$").expect("Invalid regex"));
static PASSWORD_SPECIAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[!@#$%^&*(),.?":{}|<>]"#).expect("Invalid regex"));

const REQUIRED_MESSAGE: &str = "This field is required";
const MIN_PASSWORD_LENGTH: usize = 8;

/// Names of the built-in rules.
pub mod rules {
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";
    pub const PINCODE: &str = "pincode";
    pub const NAME: &str = "name";
    pub const ADDRESS: &str = "address";
}

/// The kind of input a field was entered through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputKind {
    #[default]
    Text,
    Email,
    Tel,
    Number,
    Password,
    TextArea,
}

/// One submitted form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub kind: InputKind,
    pub value: String,
    pub required: bool,
}

impl Field {
    /// An optional field of the given kind.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: InputKind, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            value: value.into(),
            required: false,
        }
    }

    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, InputKind::Text, value)
    }

    #[must_use]
    pub fn email(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, InputKind::Email, value)
    }

    #[must_use]
    pub fn tel(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, InputKind::Tel, value)
    }

    /// Mark the field as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// A submitted form: its identifier and fields in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    pub id: String,
    pub fields: Vec<Field>,
}

impl Form {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Raw value of the first field named `name`.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }
}

/// A validation failure on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// All field failures of one form, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{} field(s) failed validation", .0.len())]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The message for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// A named pattern with the message shown when it does not match.
#[derive(Debug, Clone)]
pub struct Rule {
    pub pattern: Regex,
    pub message: String,
}

impl Rule {
    fn new(pattern: &Regex, message: &str) -> Self {
        Self {
            pattern: pattern.clone(),
            message: message.to_string(),
        }
    }
}

/// Outcome of [`Validator::validate_password`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordCheck {
    pub is_valid: bool,
    /// Every unmet requirement, in a fixed order.
    pub errors: Vec<&'static str>,
}

/// Validates fields against named pattern rules.
#[derive(Debug, Clone)]
pub struct Validator {
    rules: HashMap<String, Rule>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// A validator with the built-in email, phone, pincode, name and
    /// address rules.
    #[must_use]
    pub fn new() -> Self {
        let rules = [
            (
                rules::EMAIL,
                Rule::new(&EMAIL_RE, "Please enter a valid email address"),
            ),
            (
                rules::PHONE,
                Rule::new(&PHONE_RE, "Please enter a valid 10-digit phone number"),
            ),
            (
                rules::PINCODE,
                Rule::new(&PINCODE_RE, "Please enter a valid 6-digit pincode"),
            ),
            (
                rules::NAME,
                Rule::new(
                    &NAME_RE,
                    "Name should contain only letters and spaces (2-50 characters)",
                ),
            ),
            (
                rules::ADDRESS,
                Rule::new(&ADDRESS_RE, "Address should be 5-100 characters long"),
            ),
        ]
        .into_iter()
        .map(|(name, rule)| (name.to_string(), rule))
        .collect();

        Self { rules }
    }

    /// Add or replace the rule called `name`.
    ///
    /// # Errors
    ///
    /// Returns `regex::Error` if `pattern` does not compile.
    pub fn add_custom_rule(
        &mut self,
        name: impl Into<String>,
        pattern: &str,
        message: impl Into<String>,
    ) -> Result<(), regex::Error> {
        let rule = Rule {
            pattern: Regex::new(pattern)?,
            message: message.into(),
        };
        self.rules.insert(name.into(), rule);
        Ok(())
    }

    #[must_use]
    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    /// Validate one field.
    ///
    /// The value is trimmed first. An empty required field fails; an empty
    /// optional field passes. Otherwise the rule is picked by input kind
    /// (email, tel) or, for other inputs, by field name.
    ///
    /// # Errors
    ///
    /// Returns the message to show next to the field.
    pub fn validate_field(&self, field: &Field) -> Result<(), String> {
        let value = field.value.trim();

        if value.is_empty() {
            return if field.required {
                Err(REQUIRED_MESSAGE.to_string())
            } else {
                Ok(())
            };
        }

        let rule_name = match field.kind {
            InputKind::Email => Some(rules::EMAIL),
            InputKind::Tel => Some(rules::PHONE),
            _ => match field.name.as_str() {
                "pincode" => Some(rules::PINCODE),
                "customerName" | "reviewerName" => Some(rules::NAME),
                "houseFlatNo" | "streetName" => Some(rules::ADDRESS),
                _ => None,
            },
        };

        match rule_name.and_then(|name| self.rules.get(name).map(|rule| (name, rule))) {
            Some((name, rule)) if !accepts(name, rule, value) => Err(rule.message.clone()),
            _ => Ok(()),
        }
    }

    /// Validate every required field of `form`.
    ///
    /// # Errors
    ///
    /// Returns all field failures.
    pub fn validate_form(&self, form: &Form) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        for field in form.fields.iter().filter(|field| field.required) {
            if let Err(message) = self.validate_field(field) {
                errors.push(&field.name, message);
            }
        }
        errors.into_result()
    }

    #[must_use]
    pub fn validate_email(&self, email: &str) -> bool {
        self.matches(rules::EMAIL, email)
    }

    #[must_use]
    pub fn validate_phone(&self, phone: &str) -> bool {
        self.matches(rules::PHONE, phone)
    }

    #[must_use]
    pub fn validate_pincode(&self, pincode: &str) -> bool {
        self.matches(rules::PINCODE, pincode)
    }

    #[must_use]
    pub fn validate_name(&self, name: &str) -> bool {
        self.matches(rules::NAME, name)
    }

    fn matches(&self, name: &str, value: &str) -> bool {
        self.rules
            .get(name)
            .is_some_and(|rule| accepts(name, rule, value))
    }

    /// Check password strength: length, upper, lower, digit, special.
    #[must_use]
    pub fn validate_password(password: &str) -> PasswordCheck {
        let checks = [
            (
                password.chars().count() >= MIN_PASSWORD_LENGTH,
                "Password must be at least 8 characters long",
            ),
            (
                password.chars().any(|c| c.is_ascii_uppercase()),
                "Password must contain at least one uppercase letter",
            ),
            (
                password.chars().any(|c| c.is_ascii_lowercase()),
                "Password must contain at least one lowercase letter",
            ),
            (
                password.chars().any(|c| c.is_ascii_digit()),
                "Password must contain at least one number",
            ),
            (
                PASSWORD_SPECIAL_RE.is_match(password),
                "Password must contain at least one special character",
            ),
        ];

        let errors: Vec<&'static str> = checks
            .into_iter()
            .filter(|(ok, _)| !ok)
            .map(|(_, message)| message)
            .collect();

        PasswordCheck {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    #[must_use]
    pub fn validate_confirm_password(password: &str, confirm: &str) -> bool {
        password == confirm
    }
}

/// Whether `value` satisfies the rule called `name`.
///
/// E-mail values are also held to the address length limit, so anything the
/// rule accepts can be stored as an [`Email`].
fn accepts(name: &str, rule: &Rule, value: &str) -> bool {
    rule.pattern.is_match(value) && (name != rules::EMAIL || value.len() <= Email::MAX_LENGTH)
}

/// Declarative constraints for one field, with optional custom messages.
#[derive(Debug, Clone, Default)]
pub struct FieldRule {
    pub required: bool,
    pub pattern: Option<Regex>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub required_message: Option<String>,
    pub pattern_message: Option<String>,
    pub min_length_message: Option<String>,
    pub max_length_message: Option<String>,
}

impl FieldRule {
    fn check(&self, value: &str) -> Option<String> {
        let len = value.chars().count();

        if value.is_empty() {
            return self.required.then(|| {
                self.required_message
                    .clone()
                    .unwrap_or_else(|| REQUIRED_MESSAGE.to_string())
            });
        }

        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(value) {
                return Some(
                    self.pattern_message
                        .clone()
                        .unwrap_or_else(|| "Invalid format".to_string()),
                );
            }
        }

        if let Some(min) = self.min_length.filter(|&min| min > 0 && len < min) {
            return Some(
                self.min_length_message
                    .clone()
                    .unwrap_or_else(|| format!("Minimum {min} characters required")),
            );
        }

        if let Some(max) = self.max_length.filter(|&max| max > 0 && len > max) {
            return Some(
                self.max_length_message
                    .clone()
                    .unwrap_or_else(|| format!("Maximum {max} characters allowed")),
            );
        }

        None
    }
}

/// Validate `form` against per-field constraints.
///
/// Fields named in `rules` but missing from the form are skipped. Values are
/// trimmed before checking.
///
/// # Errors
///
/// Returns all field failures.
pub fn validate_with_rules(form: &Form, rules: &[(&str, FieldRule)]) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    for (name, rule) in rules {
        let Some(value) = form.value(name) else {
            continue;
        };
        if let Some(message) = rule.check(value.trim()) {
            errors.push(name, message);
        }
    }
    errors.into_result()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_required_field() {
        let validator = Validator::new();
        let field = Field::text("city", "   ").required();
        assert_eq!(
            validator.validate_field(&field),
            Err("This field is required".to_string())
        );
        assert!(validator.validate_field(&Field::text("city", "")).is_ok());
    }

    #[test]
    fn test_email_and_phone_by_kind() {
        let validator = Validator::new();
        assert!(validator.validate_field(&Field::email("email", "a@b.co")).is_ok());
        assert_eq!(
            validator.validate_field(&Field::email("email", "a@b")),
            Err("Please enter a valid email address".to_string())
        );
        assert!(validator.validate_field(&Field::tel("customerNo", "9876543210")).is_ok());
        assert!(validator.validate_field(&Field::tel("customerNo", "5876543210")).is_err());
        assert!(validator.validate_field(&Field::tel("customerNo", "98765")).is_err());
    }

    #[test]
    fn test_rules_by_field_name() {
        let validator = Validator::new();
        assert!(validator.validate_field(&Field::text("pincode", "560001")).is_ok());
        assert!(validator.validate_field(&Field::text("pincode", "060001")).is_err());
        assert!(validator.validate_field(&Field::text("customerName", "Asha Rao")).is_ok());
        assert!(validator.validate_field(&Field::text("reviewerName", "R2D2")).is_err());
        assert!(validator.validate_field(&Field::text("houseFlatNo", "12-B, Tower 4")).is_ok());
        assert!(validator.validate_field(&Field::text("streetName", "MG")).is_err());
        // No rule applies to free text such as city.
        assert!(validator.validate_field(&Field::text("city", "?!")).is_ok());
    }

    #[test]
    fn test_value_is_trimmed_before_matching() {
        let validator = Validator::new();
        assert!(validator.validate_field(&Field::text("pincode", " 560001 ")).is_ok());
    }

    #[test]
    fn test_validate_form_collects_required_errors_only() {
        let validator = Validator::new();
        let form = Form::new("addressForm")
            .field(Field::text("houseFlatNo", "").required())
            .field(Field::text("pincode", "12").required())
            .field(Field::email("email", "not-an-email"));

        let errors = validator.validate_form(&form).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("houseFlatNo"), Some("This field is required"));
        assert_eq!(errors.get("pincode"), Some("Please enter a valid 6-digit pincode"));
        assert_eq!(errors.get("email"), None);
    }

    #[test]
    fn test_custom_rule_overrides_builtin() {
        let mut validator = Validator::new();
        validator
            .add_custom_rule(rules::PINCODE, r"^[0-9]{5}$", "Enter a 5-digit ZIP")
            .unwrap();
        assert!(validator.validate_pincode("94107"));
        assert_eq!(
            validator.validate_field(&Field::text("pincode", "560001")),
            Err("Enter a 5-digit ZIP".to_string())
        );
        assert!(validator.add_custom_rule("broken", "(", "x").is_err());
    }

    #[test]
    fn test_direct_checks() {
        let validator = Validator::new();
        assert!(validator.validate_email("user@example.com"));
        assert!(!validator.validate_email("user @example.com"));
        assert!(validator.validate_phone("6000000000"));
        assert!(validator.validate_name("Li"));
        assert!(!validator.validate_name("L"));
    }

    #[test]
    fn test_password_strength() {
        let check = Validator::validate_password("Str0ng!pass");
        assert!(check.is_valid);
        assert!(check.errors.is_empty());

        let check = Validator::validate_password("weak");
        assert!(!check.is_valid);
        assert_eq!(
            check.errors,
            [
                "Password must be at least 8 characters long",
                "Password must contain at least one uppercase letter",
                "Password must contain at least one number",
                "Password must contain at least one special character",
            ]
        );
    }

    #[test]
    fn test_confirm_password() {
        assert!(Validator::validate_confirm_password("a", "a"));
        assert!(!Validator::validate_confirm_password("a", "b"));
    }

    #[test]
    fn test_rule_set_validation() {
        let form = Form::new("contact")
            .field(Field::text("name", ""))
            .field(Field::text("code", "abc"))
            .field(Field::text("bio", "hi"))
            .field(Field::text("tag", "toolong"));

        let rules = [
            (
                "name",
                FieldRule {
                    required: true,
                    required_message: Some("Tell us your name".into()),
                    ..FieldRule::default()
                },
            ),
            (
                "code",
                FieldRule {
                    pattern: Some(Regex::new("^[0-9]+$").unwrap()),
                    ..FieldRule::default()
                },
            ),
            (
                "bio",
                FieldRule {
                    min_length: Some(5),
                    ..FieldRule::default()
                },
            ),
            (
                "tag",
                FieldRule {
                    max_length: Some(3),
                    ..FieldRule::default()
                },
            ),
            ("missing", FieldRule { required: true, ..FieldRule::default() }),
        ];

        let errors = validate_with_rules(&form, &rules).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get("name"), Some("Tell us your name"));
        assert_eq!(errors.get("code"), Some("Invalid format"));
        assert_eq!(errors.get("bio"), Some("Minimum 5 characters required"));
        assert_eq!(errors.get("tag"), Some("Maximum 3 characters allowed"));
        assert_eq!(errors.get("missing"), None);
    }

    #[test]
    fn test_zero_length_limits_are_ignored() {
        let form = Form::new("contact").field(Field::text("note", "anything at all"));
        let rules = [(
            "note",
            FieldRule {
                min_length: Some(0),
                max_length: Some(0),
                ..FieldRule::default()
            },
        )];
        assert!(validate_with_rules(&form, &rules).is_ok());
    }

    #[test]
    fn test_overlong_email_fails_the_email_rule() {
        let validator = Validator::new();
        let address = format!("{}@example.com", "a".repeat(250));
        assert!(!validator.validate_email(&address));
        assert_eq!(
            validator.validate_field(&Field::email("email", address)),
            Err("Please enter a valid email address".to_string())
        );

        let longest = format!("{}@example.com", "a".repeat(Email::MAX_LENGTH - 12));
        assert!(validator.validate_email(&longest));
    }
}
