use actix_web::web::*;

use crate::handlers::directory;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/experts")
            .service(resource("").route(get().to(directory::list_experts)))
            .service(resource("/{document_id}").route(get().to(directory::get_expert)))
            .service(
                resource("/{document_id}/timeline").route(get().to(directory::expert_timeline)),
            )
            .service(
                resource("/{document_id}/properties")
                    .route(get().to(directory::expert_properties)),
            ),
    );
}
