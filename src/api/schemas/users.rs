use crate::domain::user::User;
use crate::error::FieldError;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

/// Submitted on create and update. Any `id` in the body is ignored; the path
/// (or the store) decides which row is addressed.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "passwords_match", skip_on_field_errors = false))]
pub struct UserPayload {
    pub id: Option<i64>,

    #[validate(length(min = 3, max = 32, message = "Username must be 3-32 characters"))]
    pub username: String,

    #[validate(length(min = 8, message = "Password must have at least 8 characters"))]
    #[validate(custom(function = "password_complexity"))]
    pub password: String,

    /// Optional; when present it must equal `password`.
    pub confirm_password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        // The password hash never leaves the service boundary.
        Self { id: user.id, username: user.username }
    }
}

fn password_complexity(password: &str) -> Result<(), ValidationError> {
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if has_upper && has_lower && has_digit {
        Ok(())
    } else {
        Err(ValidationError::new("password_complexity")
            .with_message("Password must contain an uppercase letter, a lowercase letter and a digit".into()))
    }
}

fn passwords_match(payload: &UserPayload) -> Result<(), ValidationError> {
    match &payload.confirm_password {
        Some(confirm) if confirm != &payload.password => {
            Err(ValidationError::new("passwords_match").with_message("Passwords do not match".into()))
        }
        _ => Ok(()),
    }
}

/// Flattens `validator`'s error tree into the field-level descriptors the 400
/// body carries. Schema-level errors are attributed to `confirmPassword`.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            let field = match field.as_ref() {
                "__all__" => "confirmPassword",
                other => other,
            };
            errs.iter().map(move |e| FieldError {
                field: field.to_string(),
                message: e.message.as_ref().map_or_else(|| e.code.to_string(), ToString::to_string),
            })
        })
        .collect()
}
