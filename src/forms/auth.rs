use serde::Serialize;

use super::{check_length, is_blank, is_valid_email, is_valid_phone, FieldErrors, Validate};
use crate::models::Role;

#[derive(Clone, Debug, Default, Serialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Validate for LoginForm {
    fn errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if is_blank(&self.username) {
            errors.add("username", "Username is required");
        }
        if self.password.is_empty() {
            errors.add("password", "Password is required");
        }
        errors
    }
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    #[serde(skip_serializing_if = "is_blank_option")]
    pub phone_number: Option<String>,
}

// An empty optional field is left out of the request.
fn is_blank_option(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, is_blank)
}

impl RegisterForm {
    pub fn role(&self) -> Option<Role> {
        self.role.parse().ok()
    }
}

impl Validate for RegisterForm {
    fn errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if is_blank(&self.username) {
            errors.add("username", "Username is required");
        } else {
            check_length(&mut errors, "username", &self.username, 3, 20, "Username");
        }

        if self.password.is_empty() {
            errors.add("password", "Password is required");
        } else if self.password.chars().count() < 6 {
            errors.add("password", "Password must be at least 6 characters");
        }

        if is_blank(&self.email) {
            errors.add("email", "Email is required");
        } else if !is_valid_email(&self.email) {
            errors.add("email", "Invalid email address");
        }

        if is_blank(&self.full_name) {
            errors.add("fullName", "Full name is required");
        }

        if is_blank(&self.role) {
            errors.add("role", "Role is required");
        } else if self.role().is_none() {
            errors.add("role", "Role must be INVTEAM or DLTEAM");
        }

        if let Some(phone) = self.phone_number.as_deref().filter(|p| !is_blank(p)) {
            if !is_valid_phone(phone) {
                errors.add("phoneNumber", "Phone number must be valid");
            }
        }

        errors
    }
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
}

impl Validate for ProfileForm {
    fn errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if is_blank(&self.full_name) {
            errors.add("fullName", "Full name is required");
        }
        if is_blank(&self.email) {
            errors.add("email", "Email is required");
        } else if !is_valid_email(&self.email) {
            errors.add("email", "Invalid email address");
        }
        if is_blank(&self.phone_number) {
            errors.add("phoneNumber", "Phone number is required");
        }
        errors
    }
}
