use expertnet_common::directory::{Directory, SearchFilters};

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::handlers::error::HttpErrorResponse;
use crate::handlers::{comma_list, DataResponse};

pub const DEFAULT_EXPERT_LIMIT: u32 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct ExpertQuery {
    pub limit: Option<u32>,
    pub region: Option<String>,
    pub country: Option<String>,
    // Comma separated
    pub specialty: Option<String>,
    pub keyword: Option<String>,
}

impl ExpertQuery {
    pub fn filters(&self) -> SearchFilters {
        SearchFilters {
            region: self.region.clone(),
            country: self.country.clone(),
            specialties: comma_list(self.specialty.as_deref()),
            keyword: self.keyword.clone(),
        }
    }
}

pub async fn list_experts(
    directory: web::Data<dyn Directory>,
    query: web::Query<ExpertQuery>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let limit = query.limit.unwrap_or(DEFAULT_EXPERT_LIMIT);
    let consultants = directory.consultants(Some(limit)).await?;

    Ok(HttpResponse::Ok().json(DataResponse::new(query.filters().apply(consultants))))
}

pub async fn get_expert(
    directory: web::Data<dyn Directory>,
    document_id: web::Path<String>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let consultant = directory.consultant(&document_id).await?;
    Ok(HttpResponse::Ok().json(DataResponse::new(consultant)))
}

pub async fn expert_timeline(
    directory: web::Data<dyn Directory>,
    document_id: web::Path<String>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let posts = directory.consultant_timeline(&document_id).await?;
    Ok(HttpResponse::Ok().json(DataResponse::new(posts)))
}

pub async fn expert_properties(
    directory: web::Data<dyn Directory>,
    document_id: web::Path<String>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let properties = directory.consultant_properties(&document_id).await?;
    Ok(HttpResponse::Ok().json(DataResponse::new(properties)))
}
