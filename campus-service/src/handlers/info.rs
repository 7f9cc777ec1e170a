//! Fixed informational routes. Neither touches the completion provider.

use axum::Json;
use serde::Serialize;

pub const WELCOME_MESSAGE: &str =
    "Welcome to Dimraj AiCampus (DAIC) – Institutional Intelligence Services";

pub const ERP_STATUS: &str = "ERP module loaded.";

pub const ERP_FEATURES: [&str; 7] = [
    "AI-based attendance system",
    "Class schedule generation",
    "Payroll and HR tools",
    "Fee tracking and invoice generation",
    "Student record management",
    "Parent communication center",
    "Analytics dashboard for school admins",
];

#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErpOverview {
    pub erp: &'static str,
    pub features: &'static [&'static str],
}

pub async fn root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: WELCOME_MESSAGE,
    })
}

pub async fn erp_overview() -> Json<ErpOverview> {
    Json(ErpOverview {
        erp: ERP_STATUS,
        features: &ERP_FEATURES,
    })
}
