use super::ApiError;
use crate::domain::Handle;
use actix_web::{HttpResponse, web};
use anyhow::Context;
use multi_solve::sources::Platform;
use multi_solve::store::{JsonMetricsStore, UserProfile};
use std::collections::HashMap;

#[derive(serde::Deserialize)]
pub struct FormData {
    username: String,
    display_name: Option<String>,
    codeforces: Option<String>,
    codechef: Option<String>,
    leetcode: Option<String>,
}

#[tracing::instrument(
    name = "Registering a user profile",
    skip(form, store),
    fields(username = %form.username)
)]
pub async fn register(
    form: web::Form<FormData>,
    store: web::Data<JsonMetricsStore>,
) -> Result<HttpResponse, ApiError> {
    let form = form.0;
    let user_id = Handle::parse(form.username).map_err(ApiError::Validation)?;

    let mut handles = HashMap::new();
    for (platform, handle) in [
        (Platform::Codeforces, form.codeforces),
        (Platform::CodeChef, form.codechef),
        (Platform::LeetCode, form.leetcode),
    ] {
        if let Some(handle) = handle {
            let handle = Handle::parse(handle).map_err(ApiError::Validation)?;
            handles.insert(platform, handle.as_ref().to_owned());
        }
    }
    if handles.is_empty() {
        return Err(ApiError::Validation(
            "at least one platform handle is required".to_string(),
        ));
    }

    let profile = UserProfile {
        display_name: form
            .display_name
            .unwrap_or_else(|| user_id.as_ref().to_owned()),
        user_id: user_id.as_ref().to_owned(),
        handles,
    };

    let store = store.into_inner();
    let saved = profile.clone();
    web::block(move || store.save_profile(&saved))
        .await
        .context("the registration task could not be scheduled")?
        .context("failed to persist the profile")?;

    Ok(HttpResponse::Ok().json(profile))
}
