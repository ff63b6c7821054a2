use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::web::*;
use actix_web::HttpRequest;

use crate::handlers::error::HttpErrorResponse;

mod auth;
mod contact;
mod directory;
mod feed;
mod friends;
mod health;
mod knowledge;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.app_data(JsonConfig::default().error_handler(json_error))
        .app_data(QueryConfig::default().error_handler(query_error))
        .app_data(PathConfig::default().error_handler(path_error))
        .service(
            scope("/api")
                .configure(auth::configure)
                .configure(contact::configure)
                .configure(directory::configure)
                .configure(feed::configure)
                .configure(friends::configure)
                .configure(health::configure)
                .configure(knowledge::configure),
        );
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    HttpErrorResponse::IncorrectlyFormed(format!("Invalid request body: {err}")).into()
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    HttpErrorResponse::IncorrectlyFormed(format!("Invalid query: {err}")).into()
}

fn path_error(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    HttpErrorResponse::IncorrectlyFormed(format!("Invalid path: {err}")).into()
}
