use actix_web::web::*;

use crate::handlers::contact;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(resource("/contact").route(post().to(contact::submit)));
}
