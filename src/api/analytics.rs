use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{model::analytics::AnalyticsSummary, service::AttendanceService};

const DEFAULT_WINDOW_DAYS: u32 = 7;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AnalyticsQuery {
    /// Trailing window in days, 7 when omitted
    #[param(example = 7)]
    pub days: Option<u32>,
}

/// Hours worked over the trailing window
#[utoipa::path(
    get,
    path = "/api/analytics",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Aggregated hours", body = AnalyticsSummary)
    ),
    tag = "Analytics"
)]
pub async fn summary(
    service: web::Data<AttendanceService>,
    query: web::Query<AnalyticsQuery>,
) -> impl Responder {
    let days = query.days.unwrap_or(DEFAULT_WINDOW_DAYS);
    HttpResponse::Ok().json(service.compute_analytics(days))
}
