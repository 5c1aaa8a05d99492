use actix_web::web;

use crate::handlers::system::health_check;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check);
}
