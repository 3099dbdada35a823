//! Write-body validation for citizen and content forms.
//!
//! Each form is a typed view over the JSON body the browser submits. Only
//! the fields with rules are declared; everything else is ignored here and
//! forwarded to the backend untouched.

use std::borrow::Cow;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{de, Deserialize, Deserializer};
use serde_json::Value;
use validator::{Validate, ValidateEmail, ValidateUrl, ValidationError, ValidationErrors};

/// Date format used by every date input on the portal.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Minimum applicant age for a community tax certificate.
pub const MINIMUM_AGE: i32 = 18;

/// Notification kinds accepted by the send-email route.
pub const NOTIFICATION_KINDS: &[&str] = &["announcement", "news"];

static PH_MOBILE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(09|\+639)\d{9}$").expect("valid mobile number regex"));

// ---------------------------------------------------------------------------
// Form kinds
// ---------------------------------------------------------------------------

/// Forms a resource's write bodies can be checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    OfficeContact,
    Cedula,
    HealthCertificate,
    IssueReport,
    ContactMessage,
}

impl FormKind {
    /// Validate a JSON write body against this form.
    pub fn validate(self, body: &Value) -> Result<(), ValidationErrors> {
        match self {
            Self::OfficeContact => check::<OfficeContactForm>(body),
            Self::Cedula => check::<CedulaForm>(body),
            Self::HealthCertificate => check::<HealthCertificateForm>(body),
            Self::IssueReport => check::<IssueReportForm>(body),
            Self::ContactMessage => check::<ContactMessageForm>(body),
        }
    }
}

fn check<T>(body: &Value) -> Result<(), ValidationErrors>
where
    T: Validate + for<'de> Deserialize<'de>,
{
    parse::<T>(body)?.validate()
}

fn parse<T>(body: &Value) -> Result<T, ValidationErrors>
where
    T: for<'de> Deserialize<'de>,
{
    T::deserialize(body).map_err(|e| {
        let mut errors = ValidationErrors::new();
        errors.add("body", rule_error("invalid_body", e.to_string()));
        errors
    })
}

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct OfficeContactForm {
    #[validate(custom(function = "not_blank"))]
    pub office_location: String,
    #[validate(custom(function = "not_blank"))]
    pub phone_number: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(custom(function = "not_blank"))]
    pub office_hours: String,
}

/// Community tax certificate (cedula) application.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CedulaForm {
    #[validate(custom(function = "not_blank"))]
    pub first_name: String,
    #[validate(custom(function = "not_blank"))]
    pub last_name: String,
    #[validate(custom(function = "adult_birthdate"))]
    pub birthdate: String,
    #[validate(custom(function = "not_blank"))]
    pub address: String,
    #[validate(custom(function = "not_blank"))]
    pub civil_status: String,
    #[serde(deserialize_with = "lenient_number")]
    #[validate(range(min = 0.0, message = "Income cannot be negative"))]
    pub gross_income: Option<f64>,
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(custom(function = "mobile_number"))]
    pub contact_number: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct HealthCertificateForm {
    #[validate(custom(function = "not_blank"))]
    pub full_name: String,
    #[serde(deserialize_with = "lenient_number")]
    #[validate(
        required(message = "Age is required"),
        range(min = 18.0, max = 120.0, message = "Age must be between 18 and 120")
    )]
    pub age: Option<f64>,
    #[validate(custom(function = "not_blank"))]
    pub sex: String,
    #[validate(custom(function = "not_blank"))]
    pub address: String,
    #[validate(custom(function = "not_blank"))]
    pub purpose: String,
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct IssueReportForm {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(custom(function = "not_blank"))]
    pub category: String,
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(custom(function = "past_or_present_date"))]
    pub incident_date: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ContactMessageForm {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(custom(function = "not_blank"))]
    pub subject: String,
    #[validate(custom(function = "not_blank"))]
    pub message: String,
}

/// Body of `POST /api/send-email`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct SendEmailForm {
    #[validate(
        length(min = 1, message = "At least one recipient is required"),
        custom(function = "email_list")
    )]
    pub recipients: Vec<String>,
    #[validate(custom(function = "not_blank"))]
    pub subject: String,
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[validate(custom(function = "not_blank"))]
    pub content: String,
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(custom(function = "notification_kind"))]
    pub kind: Option<String>,
    /// Must be an absolute `http(s)` URL; it ends up as an `href`.
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(custom(function = "http_link"))]
    pub link: Option<String>,
}

impl SendEmailForm {
    /// Parse and validate a send-email body in one step.
    pub fn from_json(body: &Value) -> Result<Self, ValidationErrors> {
        let form = parse::<Self>(body)?;
        form.validate()?;
        Ok(form)
    }
}

// ---------------------------------------------------------------------------
// Field rules
// ---------------------------------------------------------------------------

fn rule_error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(rule_error("required", "This field is required"));
    }
    Ok(())
}

fn mobile_number(value: &str) -> Result<(), ValidationError> {
    if PH_MOBILE_NUMBER.is_match(value.trim()) {
        Ok(())
    } else {
        Err(rule_error(
            "mobile_number",
            "Mobile number must look like 09XXXXXXXXX or +639XXXXXXXXX",
        ))
    }
}

fn email_list(values: &[String]) -> Result<(), ValidationError> {
    match values.iter().find(|v| !v.validate_email()) {
        Some(bad) => Err(rule_error("email", format!("Invalid recipient address: {bad}"))),
        None => Ok(()),
    }
}

fn notification_kind(value: &str) -> Result<(), ValidationError> {
    if NOTIFICATION_KINDS.contains(&value) {
        Ok(())
    } else {
        Err(rule_error(
            "notification_kind",
            format!("Kind must be one of: {NOTIFICATION_KINDS:?}"),
        ))
    }
}

fn http_link(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    let scheme_ok = ["http://", "https://"]
        .iter()
        .any(|scheme| value.get(..scheme.len()).is_some_and(|p| p.eq_ignore_ascii_case(scheme)));
    if scheme_ok && value.validate_url() {
        Ok(())
    } else {
        Err(rule_error("url", "Link must be an http or https URL"))
    }
}

fn adult_birthdate(value: &str) -> Result<(), ValidationError> {
    let birthdate = parse_date(value)?;
    validate_adult_on(birthdate, today())
}

fn past_or_present_date(value: &str) -> Result<(), ValidationError> {
    let date = parse_date(value)?;
    validate_not_future_on(date, today())
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| rule_error("date", "Date must be in YYYY-MM-DD format"))
}

/// Whole years between `birthdate` and `today`.
pub fn age_on(birthdate: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birthdate.year();
    if (today.month(), today.day()) < (birthdate.month(), birthdate.day()) {
        age -= 1;
    }
    age
}

pub fn validate_not_future_on(date: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    if date > today {
        return Err(rule_error("future_date", "Date cannot be in the future"));
    }
    Ok(())
}

pub fn validate_adult_on(birthdate: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    validate_not_future_on(birthdate, today)?;
    if age_on(birthdate, today) < MINIMUM_AGE {
        return Err(rule_error(
            "minimum_age",
            format!("Applicant must be at least {MINIMUM_AGE} years old"),
        ));
    }
    Ok(())
}

/// Accept numbers sent either as JSON numbers or as numeric strings, which is
/// what HTML number inputs usually produce. A blank string or `null` is
/// absent; any other string must parse.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("expected a number, got \"{s}\""))),
        Some(other) => Err(de::Error::custom(format!("expected a number, got {other}"))),
    }
}

/// Untouched optional inputs arrive as `""`; treat them like missing fields.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
