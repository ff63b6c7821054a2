use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::env::BackendMode;

pub async fn heartbeat() -> impl Responder {
    HttpResponse::Ok()
}

pub async fn health(mode: web::Data<BackendMode>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "mode": mode.as_str(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    use actix_web::test::{self, TestRequest};
    use actix_web::web::Data;
    use actix_web::App;

    #[actix_web::test]
    async fn test_heartbeat() {
        let app =
            test::init_service(App::new().route("/heartbeat", web::get().to(heartbeat))).await;

        let req = TestRequest::get().uri("/heartbeat").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_health_reports_mode() {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(BackendMode::Live))
                .route("/health", web::get().to(health)),
        )
        .await;

        let req = TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);

        let resp_body = test::read_body(resp).await;
        let resp_json: serde_json::Value = serde_json::from_slice(&resp_body).unwrap();

        assert_eq!(resp_json["status"], "ok");
        assert_eq!(resp_json["mode"], "live");
    }
}
