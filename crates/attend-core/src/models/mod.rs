pub mod demographics;
pub mod questionnaire;
pub mod session;
