use actix_web::web::*;

use crate::handlers::auth;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/auth")
            .service(resource("/local").route(post().to(auth::login)))
            .service(resource("/local/register").route(post().to(auth::register)))
            .service(resource("/logout").route(post().to(auth::logout)))
            .service(resource("/session").route(get().to(auth::current_session))),
    )
    .service(resource("/users/me").route(get().to(auth::current_user)));
}
