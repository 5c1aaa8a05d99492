use actix_web::{http::header::ContentDisposition, web, HttpResponse, Responder};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use crate::{
    domain::catalog,
    errors::AppError,
    export,
    use_cases::extractors::ManagerUser,
    AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct AssessmentQuery {
    #[serde(default)]
    pub user_id: Option<String>,
}

#[instrument(skip(_manager, state))]
pub async fn list_assessments(
    _manager: ManagerUser,
    state: web::Data<AppState>,
    query: web::Query<AssessmentQuery>,
) -> Result<impl Responder, AppError> {
    let summaries = state
        .ledger
        .summaries(query.user_id.as_deref(), &catalog::team_roster())
        .await;

    Ok(HttpResponse::Ok().json(summaries))
}

#[instrument(skip(_manager, state))]
pub async fn team_stats(
    _manager: ManagerUser,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    Ok(HttpResponse::Ok().json(state.ledger.team_stats().await))
}

pub async fn team_members(_manager: ManagerUser) -> impl Responder {
    HttpResponse::Ok().json(catalog::team_roster())
}

#[instrument(skip(manager, state), fields(manager_id = %manager.0.id))]
pub async fn export_team_report(
    manager: ManagerUser,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let sheets = state.team_report_sheets(&manager.0).await;
    let bytes = export::write_workbook(&sheets)?;
    tracing::info!(sheets = sheets.len(), "Team report exported");

    Ok(HttpResponse::Ok()
        .content_type(export::XLSX_CONTENT_TYPE)
        .insert_header(ContentDisposition::attachment(export::team_report_file_name(
            Utc::now().date_naive(),
        )))
        .body(bytes))
}

#[instrument(skip(_manager, state))]
pub async fn export_individual_report(
    _manager: ManagerUser,
    state: web::Data<AppState>,
    user_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let assessment = state
        .ledger
        .assessments_for(Some(user_id.as_str()))
        .await
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound(format!("No assessment for user {}", user_id)))?;

    let employee_name = catalog::team_roster()
        .into_iter()
        .find(|m| m.id == assessment.user_id)
        .map(|m| m.name)
        .unwrap_or_else(|| format!("user-{}", assessment.user_id));

    let bytes = export::write_workbook(&export::individual_report_sheets(&assessment))?;

    Ok(HttpResponse::Ok()
        .content_type(export::XLSX_CONTENT_TYPE)
        .insert_header(ContentDisposition::attachment(export::assessment_file_name(&employee_name)))
        .body(bytes))
}
