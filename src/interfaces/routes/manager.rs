use actix_web::web;

use crate::handlers::manager;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/manager")
            .service(
                web::resource("/assessments")
                    .route(web::get().to(manager::list_assessments))
            )
            .service(
                web::resource("/team-stats")
                    .route(web::get().to(manager::team_stats))
            )
            .service(
                web::resource("/team-members")
                    .route(web::get().to(manager::team_members))
            )
            .service(
                web::resource("/export/team")
                    .route(web::get().to(manager::export_team_report))
            )
            .service(
                web::resource("/export/{user_id}")
                    .route(web::get().to(manager::export_individual_report))
            )
    );
}
