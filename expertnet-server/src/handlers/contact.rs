use expertnet_common::models::contact::ContactForm;
use expertnet_common::validators;

use actix_web::{web, HttpResponse};
use serde_json::json;
use std::time::{SystemTime, UNIX_EPOCH};

pub const CONTACT_CONFIRMATION: &str =
    "Your message has been sent successfully. We'll get back to you within 24 hours.";

/// A reference the sender can quote in follow-ups.
pub fn contact_reference(now: SystemTime) -> String {
    let millis = now
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();

    format!("CON-{millis}")
}

pub async fn submit(form: web::Json<ContactForm>) -> HttpResponse {
    let form = form.into_inner();
    let problems = validators::validate_contact_form(&form);

    if !problems.is_empty() {
        let error = if problems.iter().any(|p| p.ends_with("is required")) {
            "Missing required fields"
        } else {
            "Invalid email format"
        };

        return HttpResponse::BadRequest().json(json!({
            "success": false,
            "error": error,
            "errors": problems,
        }));
    }

    let reference = contact_reference(SystemTime::now());

    log::info!(
        "Contact form {} from {} ({:?} urgency, reply by {:?}): {}",
        reference,
        form.email.trim(),
        form.urgency,
        form.contact_method,
        form.subject.trim(),
    );

    HttpResponse::Ok().json(json!({
        "success": true,
        "message": CONTACT_CONFIRMATION,
        "reference": reference,
    }))
}
