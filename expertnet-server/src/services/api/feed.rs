use actix_web::web::*;

use crate::handlers::feed;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(resource("/posts").route(get().to(feed::list_posts)));
}
