//! Route handlers.

use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use chrono::Local;
use serde::Deserialize;
use tracing::debug;

use crate::activity::ActivityCalendar;
use crate::error::Error;
use crate::post::PostDraft;
use crate::render::{AdminForm, HomePage, Pagination, PostCard};
use crate::store::{MutableStore, PostReader};

use super::error::HttpError;
use super::AppState;

/// `?page=` on the home page. Kept as a string so bad values fall back to 1.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    page: Option<String>,
}

impl PageQuery {
    fn page(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<usize>().ok())
            .filter(|&p| p >= 1)
            .unwrap_or(1)
    }
}

/// Fields posted by the admin forms.
#[derive(Debug, Default, Deserialize)]
pub struct PostForm {
    #[serde(default)]
    content: String,
    #[serde(default, rename = "techIcon")]
    tech_icon: String,
    #[serde(default)]
    intent: Option<String>,
}

pub async fn home(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, HttpError> {
    let page = query.page();
    let page_size = state.page_size;
    let offset = (page - 1).saturating_mul(page_size);

    let listing = state.store.list(page_size, offset);
    let calendar = ActivityCalendar::from_timestamps(&Local::now(), &state.store.all_timestamps());

    let view = HomePage {
        cards: listing.posts.iter().map(|p| PostCard::new(p, &Local)).collect(),
        total: listing.total,
        calendar,
        pagination: Pagination::new(page, listing.total, page_size, listing.has_more),
    };

    Ok(Html(state.views.home(&view)?))
}

pub async fn admin_page(State(state): State<AppState>) -> Result<Html<String>, HttpError> {
    if state.store.writable().is_none() {
        return Ok(Html(state.views.admin_disabled()?));
    }
    Ok(Html(state.views.admin_form(&AdminForm::create())?))
}

/// Run a store mutation on the blocking pool; it locks and rewrites the
/// posts document.
async fn mutate<T, F>(state: &AppState, op: F) -> Result<T, HttpError>
where
    T: Send + 'static,
    F: FnOnce(&MutableStore) -> crate::Result<T> + Send + 'static,
{
    let store = Arc::clone(&state.store);
    let mode = state.mode;
    let joined = tokio::task::spawn_blocking(move || {
        let writable = store.writable().ok_or_else(|| Error::read_only(mode))?;
        op(writable)
    })
    .await;

    match joined {
        Ok(result) => Ok(result?),
        Err(e) => Err(HttpError::Internal(format!("store task failed: {e}"))),
    }
}

pub async fn create_post(
    State(state): State<AppState>,
    form: Result<Form<PostForm>, FormRejection>,
) -> Result<Response, HttpError> {
    state.writable()?;
    let Form(form) = form?;

    match PostDraft::new(&form.content, &form.tech_icon) {
        Ok(draft) => {
            mutate(&state, move |store| store.create(draft)).await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(e) => {
            debug!("Create rejected: {e}");
            let view = AdminForm::create().rejected(&form.content, &form.tech_icon, e);
            Ok(Html(state.views.admin_form(&view)?).into_response())
        }
    }
}

pub async fn edit_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, HttpError> {
    let store = state.writable()?;
    let post = store.get(&id).ok_or_else(|| Error::post_not_found(&id))?;
    Ok(Html(state.views.admin_form(&AdminForm::edit(&post))?))
}

pub async fn edit_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    form: Result<Form<PostForm>, FormRejection>,
) -> Result<Response, HttpError> {
    let store = state.writable()?;
    let Form(form) = form?;

    if form.intent.as_deref() == Some("delete") {
        let target = id.clone();
        if !mutate(&state, move |store| store.delete(&target)).await? {
            return Err(Error::post_not_found(id).into());
        }
        return Ok(Redirect::to("/").into_response());
    }

    let post = store.get(&id).ok_or_else(|| Error::post_not_found(&id))?;
    match PostDraft::new(&form.content, &form.tech_icon) {
        Ok(draft) => {
            let target = id.clone();
            if !mutate(&state, move |store| store.update(&target, draft)).await? {
                return Err(Error::post_not_found(id).into());
            }
            Ok(Redirect::to("/").into_response())
        }
        Err(e) => {
            debug!("Update of {id} rejected: {e}");
            let view = AdminForm::edit(&post).rejected(&form.content, &form.tech_icon, e);
            Ok(Html(state.views.admin_form(&view)?).into_response())
        }
    }
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn not_found() -> HttpError {
    HttpError::NotFound("Page not found".to_string())
}
