use actix_web::web::*;

use crate::handlers::friends;

pub fn configure(cfg: &mut ServiceConfig) {
    // The fixed paths must be registered before `/{id}`
    cfg.service(
        scope("/friend-requests")
            .service(resource("").route(post().to(friends::send_request)))
            .service(resource("/pending").route(get().to(friends::pending_requests)))
            .service(resource("/sent").route(get().to(friends::sent_requests)))
            .service(resource("/{id}").route(put().to(friends::update_request))),
    )
    .service(
        scope("/friends")
            .service(resource("").route(get().to(friends::list)))
            .service(resource("/status/{user_id}").route(get().to(friends::status)))
            .service(resource("/{id}").route(delete().to(friends::remove))),
    );
}
