pub mod email_service;
pub mod lecture_service;
pub mod list_service;
pub mod marathon_service;
pub mod pomodoro_service;
pub mod result_service;
pub mod scoring_service;
pub mod test_service;
pub mod user_service;
