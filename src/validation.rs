use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::models::PostForm;

pub const TITLE_MAX: usize = 200;
pub const SLUG_MAX: usize = 200;
pub const EXCERPT_MAX: usize = 500;
pub const CONTENT_MAX: usize = 50_000;
pub const EMAIL_MAX: usize = 255;
pub const PASSWORD_MIN: usize = 6;
pub const PASSWORD_MAX: usize = 100;

// Leading-dot and double-dot checks live in `Rule::Email` since the regex engine
// has no lookahead.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9_'+\-.]*[A-Z0-9_+\-]@(?:[A-Z0-9][A-Z0-9\-]*\.)+[A-Z]{2,}$")
        .expect("email pattern is valid")
});

/// Field
///
/// Every form field the admin and auth forms validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS, ToSchema)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Field {
    Title,
    Slug,
    Excerpt,
    Content,
    CoverImage,
    Email,
    Password,
}

/// FieldError
///
/// One failed rule: which field, and the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS, ToSchema)]
#[ts(export)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// Rule
///
/// A single check on a field value. Lengths are measured in UTF-16 code units,
/// so an astral character such as an emoji counts twice.
#[derive(Debug, Clone)]
pub enum Rule {
    MinChars(usize, &'static str),
    MaxChars(usize, &'static str),
    Url(&'static str),
    Email(&'static str),
}

impl Rule {
    /// Returns the rule's message when `value` violates it.
    fn check(&self, value: &str) -> Option<&'static str> {
        match *self {
            Rule::MinChars(min, message) => (utf16_len(value) < min).then_some(message),
            Rule::MaxChars(max, message) => (utf16_len(value) > max).then_some(message),
            Rule::Url(message) => reqwest::Url::parse(value).is_err().then_some(message),
            Rule::Email(message) => {
                let well_formed = !value.starts_with('.')
                    && !value.contains("..")
                    && EMAIL_PATTERN.is_match(value);
                (!well_formed).then_some(message)
            }
        }
    }
}

fn utf16_len(value: &str) -> usize {
    value.encode_utf16().count()
}

/// FieldValidator
///
/// The ordered rules for one field. An optional field skips every rule when its
/// value is empty.
#[derive(Debug, Clone)]
pub struct FieldValidator {
    pub field: Field,
    pub optional: bool,
    pub rules: Vec<Rule>,
}

impl FieldValidator {
    pub fn required(field: Field) -> Self {
        Self {
            field,
            optional: false,
            rules: Vec::new(),
        }
    }

    pub fn optional(field: Field) -> Self {
        Self {
            field,
            optional: true,
            rules: Vec::new(),
        }
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// All violations for `value`, in rule order.
    pub fn check(&self, value: &str) -> Vec<FieldError> {
        if self.optional && value.is_empty() {
            return Vec::new();
        }
        self.rules
            .iter()
            .filter_map(|rule| rule.check(value))
            .map(|message| FieldError {
                field: self.field,
                message: message.to_string(),
            })
            .collect()
    }
}

/// ValidationErrors
///
/// Every violation found, in field order then rule order. Presentation only ever
/// shows the first one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn first(&self) -> Option<&FieldError> {
        self.0.first()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result(self) -> Result<(), FieldError> {
        match self.0.into_iter().next() {
            Some(first) => Err(first),
            None => Ok(()),
        }
    }
}

/// BlogPostValidator
///
/// The rule set applied identically on create and update.
#[derive(Debug, Clone)]
pub struct BlogPostValidator {
    pub title: FieldValidator,
    pub slug: FieldValidator,
    pub excerpt: FieldValidator,
    pub content: FieldValidator,
    pub cover_image: FieldValidator,
}

impl Default for BlogPostValidator {
    fn default() -> Self {
        Self {
            title: FieldValidator::required(Field::Title)
                .rule(Rule::MinChars(1, "Judul harus diisi"))
                .rule(Rule::MaxChars(TITLE_MAX, "Judul terlalu panjang")),
            slug: FieldValidator::required(Field::Slug)
                .rule(Rule::MinChars(1, "Slug harus diisi"))
                .rule(Rule::MaxChars(SLUG_MAX, "Slug terlalu panjang")),
            excerpt: FieldValidator::optional(Field::Excerpt)
                .rule(Rule::MaxChars(EXCERPT_MAX, "Ringkasan terlalu panjang")),
            content: FieldValidator::required(Field::Content)
                .rule(Rule::MinChars(1, "Konten harus diisi"))
                .rule(Rule::MaxChars(CONTENT_MAX, "Konten terlalu panjang")),
            cover_image: FieldValidator::optional(Field::CoverImage)
                .rule(Rule::Url("URL gambar tidak valid")),
        }
    }
}

impl BlogPostValidator {
    pub fn validate(&self, form: &PostForm) -> ValidationErrors {
        let mut errors = Vec::new();
        errors.extend(self.title.check(&form.title));
        errors.extend(self.slug.check(&form.slug));
        errors.extend(self.excerpt.check(&form.excerpt));
        errors.extend(self.content.check(&form.content));
        errors.extend(self.cover_image.check(&form.cover_image));
        ValidationErrors(errors)
    }
}

/// CredentialsValidator
///
/// Login/register input rules. The caller trims the email first.
#[derive(Debug, Clone)]
pub struct CredentialsValidator {
    pub email: FieldValidator,
    pub password: FieldValidator,
}

impl Default for CredentialsValidator {
    fn default() -> Self {
        Self {
            email: FieldValidator::required(Field::Email)
                .rule(Rule::Email("Email tidak valid"))
                .rule(Rule::MaxChars(EMAIL_MAX, "Email terlalu panjang")),
            password: FieldValidator::required(Field::Password)
                .rule(Rule::MinChars(PASSWORD_MIN, "Password minimal 6 karakter"))
                .rule(Rule::MaxChars(PASSWORD_MAX, "Password terlalu panjang")),
        }
    }
}

impl CredentialsValidator {
    pub fn validate(&self, email: &str, password: &str) -> ValidationErrors {
        let mut errors = self.email.check(email);
        errors.extend(self.password.check(password));
        ValidationErrors(errors)
    }
}
