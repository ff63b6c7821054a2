use actix_web::web::*;

use crate::handlers::knowledge;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/knowledge")
            .service(resource("").route(get().to(knowledge::list_articles)))
            // Registered ahead of `/{id}` so it is not taken for an article ID
            .service(resource("/facets").route(get().to(knowledge::article_facets)))
            .service(resource("/{id}").route(get().to(knowledge::get_article))),
    );
}
