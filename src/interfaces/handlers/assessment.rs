use actix_web::{http::header::ContentDisposition, web, HttpResponse, Responder};
use chrono::Utc;
use tracing::instrument;
use validator::Validate;

use crate::{
    entities::{
        assessment::AssessmentView,
        skill::{LevelUpdate, NewSkill, SkillEdit, SkillFilter},
    },
    errors::AppError,
    export,
    use_cases::extractors::CurrentUser,
    AppAssessmentManager, AppState,
};

fn full_view(manager: &AppAssessmentManager) -> AssessmentView {
    AssessmentView {
        status: manager.status(),
        categories: manager.categories().to_vec(),
    }
}

#[instrument(skip(user, state, filter), fields(user_id = %user.0.id))]
pub async fn get_assessment(
    user: CurrentUser,
    state: web::Data<AppState>,
    filter: web::Query<SkillFilter>,
) -> Result<impl Responder, AppError> {
    let manager = state.workspace_for(&user.0).await;

    Ok(HttpResponse::Ok().json(AssessmentView {
        status: manager.status(),
        categories: manager.filtered_categories(&filter),
    }))
}

#[instrument(skip(user, state), fields(user_id = %user.0.id))]
pub async fn get_stats(
    user: CurrentUser,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let manager = state.workspace_for(&user.0).await;
    Ok(HttpResponse::Ok().json(manager.stats()))
}

#[instrument(skip(user, state, data), fields(user_id = %user.0.id))]
pub async fn set_skill_level(
    user: CurrentUser,
    state: web::Data<AppState>,
    skill_id: web::Path<String>,
    data: web::Json<LevelUpdate>,
) -> Result<impl Responder, AppError> {
    let mut manager = state.workspace_for(&user.0).await;
    manager.set_level(&skill_id, data.level).await;

    Ok(HttpResponse::Ok().json(full_view(&manager)))
}

#[instrument(skip(user, state, data), fields(user_id = %user.0.id))]
pub async fn add_skill(
    user: CurrentUser,
    state: web::Data<AppState>,
    data: web::Json<NewSkill>,
) -> Result<impl Responder, AppError> {
    let new_skill = data.into_inner();
    new_skill.validate()?;

    let mut manager = state.workspace_for(&user.0).await;
    let skill = manager.add_skill(new_skill).await;
    let view = full_view(&manager);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "skill": skill,
        "status": view.status,
        "categories": view.categories,
    })))
}

#[instrument(skip(user, state, data), fields(user_id = %user.0.id))]
pub async fn edit_skill(
    user: CurrentUser,
    state: web::Data<AppState>,
    skill_id: web::Path<String>,
    data: web::Json<SkillEdit>,
) -> Result<impl Responder, AppError> {
    let edit = data.into_inner();
    edit.validate()?;

    let mut manager = state.workspace_for(&user.0).await;
    let current = manager.skill(&skill_id);
    let updated = edit.into_skill(skill_id.to_string(), current);
    manager.edit_skill(updated).await;

    Ok(HttpResponse::Ok().json(full_view(&manager)))
}

#[instrument(skip(user, state), fields(user_id = %user.0.id))]
pub async fn delete_skill(
    user: CurrentUser,
    state: web::Data<AppState>,
    skill_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let mut manager = state.workspace_for(&user.0).await;
    manager.delete_skill(&skill_id).await;

    Ok(HttpResponse::Ok().json(full_view(&manager)))
}

#[instrument(skip(user, state), fields(user_id = %user.0.id))]
pub async fn submit_assessment(
    user: CurrentUser,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let mut manager = state.workspace_for(&user.0).await;
    let assessment = manager.submit_assessment().await;

    Ok(HttpResponse::Ok().json(assessment))
}

#[instrument(skip(user, state), fields(user_id = %user.0.id))]
pub async fn export_json(
    user: CurrentUser,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let manager = state.workspace_for(&user.0).await;
    let body = manager.export_json()?;
    let file_name = export::json_file_name(&user.0.name, Utc::now().date_naive());

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .insert_header(ContentDisposition::attachment(file_name))
        .body(body))
}

#[instrument(skip(user, state), fields(user_id = %user.0.id))]
pub async fn export_xlsx(
    user: CurrentUser,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let manager = state.workspace_for(&user.0).await;
    let sheets = export::assessment_sheets(manager.categories(), &user.0.name, Utc::now());
    drop(manager);

    let bytes = export::write_workbook(&sheets)?;

    Ok(HttpResponse::Ok()
        .content_type(export::XLSX_CONTENT_TYPE)
        .insert_header(ContentDisposition::attachment(export::assessment_file_name(&user.0.name)))
        .body(bytes))
}
