pub mod dataset;
pub mod health;
pub mod instruments;
pub mod models;
pub mod risk;
pub mod screenings;
pub mod sessions;
