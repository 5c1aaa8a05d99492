use actix_web::web;

use crate::handlers::assessment;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/assessment")
            .service(
                web::resource("")
                    .route(web::get().to(assessment::get_assessment))
            )
            .service(
                web::resource("/stats")
                    .route(web::get().to(assessment::get_stats))
            )
            .service(
                web::resource("/skills")
                    .route(web::post().to(assessment::add_skill))
            )
            .service(
                web::resource("/skills/{skill_id}")
                    .route(web::put().to(assessment::edit_skill))
                    .route(web::delete().to(assessment::delete_skill))
            )
            .service(
                web::resource("/skills/{skill_id}/level")
                    .route(web::put().to(assessment::set_skill_level))
            )
            .service(
                web::resource("/submit")
                    .route(web::post().to(assessment::submit_assessment))
            )
            .service(
                web::resource("/export/json")
                    .route(web::get().to(assessment::export_json))
            )
            .service(
                web::resource("/export/xlsx")
                    .route(web::get().to(assessment::export_xlsx))
            )
    );
}
