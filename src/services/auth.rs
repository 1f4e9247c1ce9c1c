use std::sync::Arc;

use reqwest::Method;

use crate::error::{ClientError, Result};
use crate::forms::{LoginForm, RegisterForm, Validate};
use crate::http::ApiClient;
use crate::models::{LoginResponse, User};
use crate::session::SessionManager;

pub struct AuthService {
    api: Arc<ApiClient>,
    session: Arc<SessionManager>,
}

impl AuthService {
    pub fn new(api: Arc<ApiClient>, session: Arc<SessionManager>) -> Self {
        Self { api, session }
    }

    pub async fn login(&self, form: &LoginForm) -> Result<User> {
        form.validate()?;
        let login: LoginResponse = self.api.post("/auth/login", form, "Login failed").await?;
        self.establish(login)
    }

    /// Finish the Google OAuth redirect with the authorization `code`.
    pub async fn login_with_google(&self, code: &str) -> Result<User> {
        if code.trim().is_empty() {
            return Err(ClientError::Request("missing authorization code".to_string()));
        }
        let query = [("code", code.to_string())];
        let login: LoginResponse = self
            .api
            .get_with_query("/auth/google/callback", &query, "Google login failed")
            .await?;
        self.establish(login)
    }

    fn establish(&self, login: LoginResponse) -> Result<User> {
        if login.token.is_empty() {
            return Err(ClientError::Decode("login response carried no token".to_string()));
        }
        self.session.establish(&login)
    }

    /// Registration does not sign the new user in.
    pub async fn register(&self, form: &RegisterForm) -> Result<Option<String>> {
        form.validate()?;
        let response = self
            .api
            .send::<serde_json::Value, RegisterForm>(
                Method::POST,
                "/auth/register",
                &[],
                Some(form),
                "Registration failed",
            )
            .await?;
        Ok(response.message)
    }

    pub fn logout(&self) -> Result<()> {
        self.session.logout()
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.current_user()
    }
}
