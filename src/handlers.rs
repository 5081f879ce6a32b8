use crate::draft::{Draft, DraftEdit};
use crate::errors::AppError;
use crate::models::{Collection, Difficulty, StatsResponse, ViewMode, ViewRequest};
use crate::state::AppState;
use crate::stats::build_stats;
use crate::ui::render_index;
use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    Form, Json,
};
use serde::Deserialize;
use tracing::{error, info, warn};

/// Urlencoded body of the entry form when it is posted without the page script.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DraftForm {
    pub rank: String,
    pub date: String,
    pub easy_solved: String,
    pub easy_total: String,
    pub medium_solved: String,
    pub medium_total: String,
    pub hard_solved: String,
    pub hard_total: String,
}

/// Body of a scripted submit: the form's field values, applied to the draft
/// in the same step as the write.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SubmitRequest {
    pub edits: Vec<DraftEdit>,
}

impl DraftForm {
    fn edits(self) -> Vec<DraftEdit> {
        let counts = [
            (Difficulty::Easy, self.easy_solved, self.easy_total),
            (Difficulty::Medium, self.medium_solved, self.medium_total),
            (Difficulty::Hard, self.hard_solved, self.hard_total),
        ];
        let mut edits = vec![
            DraftEdit::Rank { value: self.rank },
            DraftEdit::Date { value: self.date },
        ];
        for (difficulty, solved, total) in counts {
            edits.push(DraftEdit::Solved {
                difficulty,
                value: solved,
            });
            edits.push(DraftEdit::Total {
                difficulty,
                value: total,
            });
        }
        edits
    }
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let dashboard = state.dashboard.lock().await;
    let stats = build_stats(&dashboard.records);
    Html(render_index(&dashboard, &stats))
}

pub async fn get_records(State(state): State<AppState>) -> Json<Collection> {
    let dashboard = state.dashboard.lock().await;
    Json(dashboard.records.clone())
}

pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let dashboard = state.dashboard.lock().await;
    Json(build_stats(&dashboard.records))
}

pub async fn get_draft(State(state): State<AppState>) -> Json<Draft> {
    let dashboard = state.dashboard.lock().await;
    Json(dashboard.draft.clone())
}

pub async fn edit_draft(
    State(state): State<AppState>,
    Json(edit): Json<DraftEdit>,
) -> Result<Json<Draft>, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.draft.apply(edit)?;
    Ok(Json(dashboard.draft.clone()))
}

pub async fn submit(
    State(state): State<AppState>,
    Json(request): Json<SubmitRequest>,
) -> Result<Json<Collection>, AppError> {
    let confirmed = submit_draft(&state, request.edits).await?;
    Ok(Json(confirmed))
}

pub async fn submit_form(
    State(state): State<AppState>,
    Form(form): Form<DraftForm>,
) -> Result<Redirect, AppError> {
    submit_draft(&state, form.edits()).await?;
    Ok(Redirect::to("/"))
}

pub async fn refresh(State(state): State<AppState>) -> Result<Json<Collection>, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    let records = state.store.load_all().await.map_err(|err| {
        warn!("refresh failed, keeping {} records: {err}", dashboard.records.len());
        err
    })?;
    info!(records = records.len(), "collection reloaded");
    dashboard.replace_records(records.clone());
    Ok(Json(records))
}

pub async fn get_view(State(state): State<AppState>) -> Json<ViewRequest> {
    let dashboard = state.dashboard.lock().await;
    Json(ViewRequest {
        view: dashboard.view,
    })
}

pub async fn set_view(
    State(state): State<AppState>,
    Json(payload): Json<ViewRequest>,
) -> Json<ViewRequest> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.view = payload.view;
    Json(payload)
}

pub async fn switch_view(
    State(state): State<AppState>,
    Path(view): Path<String>,
) -> Result<Redirect, AppError> {
    let view: ViewMode = view.parse().map_err(AppError::bad_request)?;
    state.dashboard.lock().await.view = view;
    Ok(Redirect::to("/"))
}

/// Applies `edits` to the draft, then sends the current collection plus the
/// draft as the new stored document, all under one lock. An invalid edit
/// leaves the draft untouched; the collection only changes once the store
/// has acknowledged the write.
async fn submit_draft(state: &AppState, edits: Vec<DraftEdit>) -> Result<Collection, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    let mut draft = dashboard.draft.clone();
    for edit in edits {
        draft.apply(edit)?;
    }
    dashboard.draft = draft;

    let mut payload = dashboard.records.clone();
    payload.push(dashboard.draft.record().clone());

    let confirmed = state.store.replace_all(&payload).await.map_err(|err| {
        error!("submit failed: {err}");
        err
    })?;
    info!(records = confirmed.len(), "collection replaced");

    dashboard.replace_records(confirmed.clone());
    Ok(confirmed)
}
