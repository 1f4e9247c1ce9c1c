use std::sync::Arc;

use reqwest::Method;

use crate::error::{ClientError, Result};
use crate::forms::{ProfileForm, Validate};
use crate::http::{expect_data, ApiClient};
use crate::models::User;
use crate::session::SessionManager;

const PATH: &str = "/users/profile";

pub struct ProfileService {
    api: Arc<ApiClient>,
    session: Arc<SessionManager>,
}

impl ProfileService {
    pub fn new(api: Arc<ApiClient>, session: Arc<SessionManager>) -> Self {
        Self { api, session }
    }

    fn username(&self) -> Result<String> {
        self.session
            .current_user()
            .map(|u| u.username)
            .ok_or(ClientError::NotAuthenticated)
    }

    pub async fn get(&self) -> Result<User> {
        let query = [("username", self.username()?)];
        self.api
            .get_with_query(PATH, &query, "Failed to fetch profile")
            .await
    }

    /// Saves the profile and refreshes the locally stored user record.
    pub async fn update(&self, form: &ProfileForm) -> Result<User> {
        form.validate()?;
        let query = [("username", self.username()?)];
        let context = "Failed to update profile";
        let user: User = self
            .api
            .send(Method::PUT, PATH, &query, Some(form), context)
            .await
            .and_then(|r| expect_data(r, context))?;
        self.session.update_user(user.clone())?;
        Ok(user)
    }
}
