pub mod auth_dto;
pub mod lecture_dto;
pub mod list_dto;
pub mod marathon_dto;
pub mod pomodoro_dto;
pub mod test_dto;
