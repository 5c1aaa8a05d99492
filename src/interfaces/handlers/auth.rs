use actix_web::{get, post, web, HttpResponse, Responder};

use crate::{
    domain::entities::user::LoginUser,
    errors::AuthError,
    use_cases::extractors::CurrentUser,
    AppState,
};

#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    credentials: web::Json<LoginUser>
) -> Result<impl Responder, AuthError> {
    match state.sign_in(credentials.into_inner()).await {
        Some(user) => Ok(HttpResponse::Ok().json(user)),
        None => Err(AuthError::WrongCredentials),
    }
}

#[post("/logout")]
pub async fn logout(state: web::Data<AppState>) -> impl Responder {
    state.sign_out().await;
    HttpResponse::Ok().json(serde_json::json!({"message": "Logged out successfully"}))
}

#[get("/me")]
pub async fn me(user: CurrentUser) -> impl Responder {
    HttpResponse::Ok().json(user.0)
}
