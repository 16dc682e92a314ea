pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::services::{
    email_service::EmailService, lecture_service::LectureService, test_service::TestService,
};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub test_service: TestService,
    pub lecture_service: LectureService,
    pub email_service: EmailService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let config = crate::config::get_config();

        let test_service = TestService::new(pool.clone());
        let lecture_service = LectureService::new(pool.clone());
        let email_service = EmailService::new(config.mail_webhook_url.clone());

        Self {
            pool,
            test_service,
            lecture_service,
            email_service,
        }
    }
}
