// ABOUTME: Typed request payloads, their validation, and response representations
// ABOUTME: Converts wire-format JSON into storage inputs and stored records back into JSON

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tasklane_core::{
    reject_null, validate_char_field, FieldErrors, BLANK_MESSAGE, REQUIRED_MESSAGE,
};
use tasklane_security::users::MAX_USERNAME_LENGTH;
use tasklane_security::UserCreateInput;
use tasklane_tags::{Tag, MAX_TAG_NAME_LENGTH};
use tasklane_tasks::{
    Task, TaskCreateInput, TaskReplaceInput, TaskStatus, MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH,
};

pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATE_FORMAT_MESSAGE: &str =
    "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.";
pub const USERNAME_CHARSET_MESSAGE: &str = "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.";
pub const DUPLICATE_USERNAME_MESSAGE: &str = "A user with that username already exists.";
pub const EMAIL_MESSAGE: &str = "Enter a valid email address.";

/// Distinguishes an absent key (outer `None`) from an explicit `null`
/// (`Some(None)`). Pair with `#[serde(default)]`.
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A tag reference on write: `{"name": "Urgent"}` or the bare string `"Urgent"`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagPayload {
    Named { name: String },
    Bare(String),
}

impl TagPayload {
    pub fn name(&self) -> &str {
        match self {
            TagPayload::Named { name } | TagPayload::Bare(name) => name,
        }
    }
}

/// Body of task create and replace requests. Unknown keys such as
/// `created_by`, `id` or `timestamp` are ignored. Only `due_date` may be
/// sent as `null`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPayload {
    #[serde(default, deserialize_with = "double_option")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub status: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub tags: Option<Option<Vec<TagPayload>>>,
}

struct ValidatedFields {
    title: String,
    description: String,
    status: Option<TaskStatus>,
    due_date: Option<Option<NaiveDate>>,
    tags: Option<Vec<String>>,
}

impl TaskPayload {
    pub fn validate_create(self) -> Result<TaskCreateInput, FieldErrors> {
        let fields = self.validate_fields()?;
        Ok(TaskCreateInput {
            title: fields.title,
            description: fields.description,
            status: fields.status.unwrap_or_default(),
            due_date: fields.due_date.flatten(),
            tags: fields.tags.unwrap_or_default(),
        })
    }

    pub fn validate_replace(self) -> Result<TaskReplaceInput, FieldErrors> {
        let fields = self.validate_fields()?;
        Ok(TaskReplaceInput {
            title: fields.title,
            description: fields.description,
            status: fields.status,
            due_date: fields.due_date,
            tags: fields.tags,
        })
    }

    fn validate_fields(self) -> Result<ValidatedFields, FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = errors.check(
            "title",
            reject_null(self.title)
                .and_then(|title| validate_char_field(title.as_deref(), MAX_TITLE_LENGTH)),
        );
        let description = errors.check(
            "description",
            reject_null(self.description).and_then(|description| {
                validate_char_field(description.as_deref(), MAX_DESCRIPTION_LENGTH)
            }),
        );
        let status = errors.check(
            "status",
            reject_null(self.status).and_then(|status| validate_status(status.as_deref())),
        );
        let due_date = errors.check("due_date", validate_due_date(self.due_date));
        let tags = errors.check("tags", reject_null(self.tags).and_then(validate_tags));

        match (title, description, status, due_date, tags) {
            (Some(title), Some(description), Some(status), Some(due_date), Some(tags)) => {
                Ok(ValidatedFields {
                    title,
                    description,
                    status,
                    due_date,
                    tags,
                })
            }
            _ => Err(errors),
        }
    }
}

fn validate_status(value: Option<&str>) -> Result<Option<TaskStatus>, String> {
    match value {
        None => Ok(None),
        Some(raw) => raw
            .parse::<TaskStatus>()
            .map(Some)
            .map_err(|_| format!("\"{}\" is not a valid choice.", raw)),
    }
}

fn validate_due_date(value: Option<Option<String>>) -> Result<Option<Option<NaiveDate>>, String> {
    match value {
        None => Ok(None),
        Some(None) => Ok(Some(None)),
        Some(Some(raw)) => NaiveDate::parse_from_str(raw.trim(), DUE_DATE_FORMAT)
            .map(|date| Some(Some(date)))
            .map_err(|_| DATE_FORMAT_MESSAGE.to_string()),
    }
}

fn validate_tags(value: Option<Vec<TagPayload>>) -> Result<Option<Vec<String>>, String> {
    let Some(tags) = value else {
        return Ok(None);
    };

    tags.iter()
        .map(|tag| {
            validate_char_field(Some(tag.name()), MAX_TAG_NAME_LENGTH)
                .map_err(|message| format!("name: {}", message))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

/// Parse the `status` list filter. An empty value means no filter.
pub fn parse_status_filter(value: Option<&str>) -> Result<Option<TaskStatus>, FieldErrors> {
    match value {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse::<TaskStatus>().map(Some).map_err(|_| {
            FieldErrors::single(
                "status",
                format!(
                    "Select a valid choice. {} is not one of the available choices.",
                    raw
                ),
            )
        }),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagResponse {
    pub id: i64,
    pub name: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
        }
    }
}

/// Wire representation of a task. The owner is deliberately absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub due_date: Option<NaiveDate>,
    pub status: TaskStatus,
    pub tags: Vec<TagResponse>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            timestamp: task.timestamp,
            due_date: task.due_date,
            status: task.status,
            tags: task.tags.into_iter().map(TagResponse::from).collect(),
        }
    }
}

/// Body of `POST /api/register/`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationPayload {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

impl RegistrationPayload {
    /// Field checks only; username uniqueness needs the database and is
    /// checked by the handler.
    pub fn validate(self) -> Result<UserCreateInput, FieldErrors> {
        let mut errors = FieldErrors::new();

        let username = errors.check("username", validate_username(self.username.as_deref()));
        let password = errors.check("password", validate_password(self.password));
        let email = errors.check("email", validate_email(self.email.as_deref()));

        match (username, password, email) {
            (Some(username), Some(password), Some(email)) => Ok(UserCreateInput {
                username,
                email,
                password,
            }),
            _ => Err(errors),
        }
    }
}

fn validate_username(value: Option<&str>) -> Result<String, String> {
    let username = validate_char_field(value, MAX_USERNAME_LENGTH)?;
    let allowed = username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'));
    if !allowed {
        return Err(USERNAME_CHARSET_MESSAGE.to_string());
    }
    Ok(username)
}

/// Passwords are checked for blankness but stored exactly as sent
fn validate_password(value: Option<String>) -> Result<String, String> {
    let password = value.ok_or_else(|| REQUIRED_MESSAGE.to_string())?;
    if password.trim().is_empty() {
        return Err(BLANK_MESSAGE.to_string());
    }
    Ok(password)
}

fn validate_email(value: Option<&str>) -> Result<String, String> {
    let email = value.map(str::trim).unwrap_or_default();
    if email.is_empty() {
        return Ok(String::new());
    }

    let valid = match email.rsplit_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !email.chars().any(char::is_whitespace)
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };

    if valid {
        Ok(email.to_string())
    } else {
        Err(EMAIL_MESSAGE.to_string())
    }
}

/// Body of `POST /api/login/`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginPayload {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl LoginPayload {
    pub fn validate(self) -> Result<(String, String), FieldErrors> {
        let mut errors = FieldErrors::new();
        // Registration stores usernames trimmed
        let username = errors.check(
            "username",
            required_string(self.username).map(|username| username.trim().to_string()),
        );
        let password = errors.check("password", required_string(self.password));

        match (username, password) {
            (Some(username), Some(password)) => Ok((username, password)),
            _ => Err(errors),
        }
    }
}

/// Body of `POST /api/login/refresh/`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefreshPayload {
    pub refresh: Option<String>,
}

impl RefreshPayload {
    pub fn validate(self) -> Result<String, FieldErrors> {
        let mut errors = FieldErrors::new();
        errors
            .check("refresh", required_string(self.refresh))
            .ok_or(errors)
    }
}

fn required_string(value: Option<String>) -> Result<String, String> {
    let value = value.ok_or_else(|| REQUIRED_MESSAGE.to_string())?;
    if value.trim().is_empty() {
        return Err(BLANK_MESSAGE.to_string());
    }
    Ok(value)
}
