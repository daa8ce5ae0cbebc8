use crate::routes;
use actix_web::web;

pub fn user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/register")
            .route(web::get().to(routes::registration_fields))
            .route(web::post().to(routes::register_user)),
    );
}
