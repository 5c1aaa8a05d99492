use actix_web::web;

use crate::handlers::{json_error::not_found, system::home};

mod assessment;
mod auth;
mod json_error;
mod manager;
mod system;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(json_error::config_routes);

    cfg.service(home);

    cfg.service(
        web::scope("/api/v1")
            .configure(system::config_routes)
            .configure(auth::config_routes)
            .configure(assessment::config_routes)
            .configure(manager::config_routes)
    );

    cfg.default_service(web::to(not_found));
}
