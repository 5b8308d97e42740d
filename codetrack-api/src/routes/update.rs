use super::ApiError;
use crate::startup::UpdateSettings;
use actix_web::{HttpResponse, web};
use anyhow::Context;
use multi_solve::aggregate::UserMetrics;
use multi_solve::store::JsonMetricsStore;
use multi_solve::update::Updater;

#[derive(serde::Deserialize)]
pub struct FormData {
    username: String,
    score: Option<f64>,
}

#[tracing::instrument(
    name = "Refreshing a user's metrics",
    skip(form, store, settings),
    fields(username = %form.username, score = ?form.score)
)]
pub async fn update_user(
    form: web::Form<FormData>,
    store: web::Data<JsonMetricsStore>,
    settings: web::Data<UpdateSettings>,
) -> Result<HttpResponse, ApiError> {
    let form = form.0;
    let store = store.into_inner();
    let settings = settings.get_ref().clone();

    // The pass is blocking end to end (network fetches, file writes), so
    // it runs on the blocking thread pool.
    let metrics = web::block(move || -> Result<UserMetrics, ApiError> {
        let profile = store
            .load_profile(&form.username)
            .context("failed to read the stored profile")?
            .ok_or_else(|| ApiError::UnknownUser(form.username.clone()))?;
        let updater = Updater::new(settings.sources, store.clone(), settings.ema_period)
            .context("failed to build the source client")?;
        let metrics = updater
            .update_user(&profile, form.score)
            .context("the update pass failed to persist its result")?;
        Ok(metrics)
    })
    .await
    .context("the update task could not be scheduled")??;

    Ok(HttpResponse::Ok().json(metrics))
}
