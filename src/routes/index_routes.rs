use crate::models::ServiceError;
use crate::services::holiday_service;
use actix_web::{get, web, HttpResponse};
use chrono::{Datelike, NaiveDate};
use log::{debug, error};
use serde_json::json;

// Gregorian years only
const FIRST_YEAR: i32 = 1583;
const LAST_YEAR: i32 = 9999;

fn check_year(year: i32) -> Result<(), ServiceError> {
    if !(FIRST_YEAR..=LAST_YEAR).contains(&year) {
        error!("❌ Holiday year out of range: {}", year);
        return Err(ServiceError::BadRequest(format!("Unsupported year: {}", year)));
    }
    Ok(())
}

#[get("/")]
async fn index() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "service": "holiflow",
        "status": "ok"
    }))
}

// National holidays of a year
#[get("/holidays/{year}")]
async fn holidays(path: web::Path<i32>) -> Result<HttpResponse, ServiceError> {
    let year = path.into_inner();
    check_year(year)?;

    debug!("📅 Listing holidays for {}", year);
    Ok(HttpResponse::Ok().json(holiday_service::holidays_for_year(year)))
}

// Whether a single date is a national holiday
#[get("/holidays/date/{date}")]
async fn holiday_on(path: web::Path<NaiveDate>) -> Result<HttpResponse, ServiceError> {
    let date = path.into_inner();
    check_year(date.year())?;
    let name = holiday_service::holiday_name(date);

    Ok(HttpResponse::Ok().json(json!({
        "date": date,
        "is_holiday": name.is_some(),
        "name": name
    })))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(index).service(holiday_on).service(holidays);
}
