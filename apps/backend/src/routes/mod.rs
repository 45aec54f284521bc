pub mod auth;
pub mod learners;
pub mod progress;
pub mod review;
pub mod sessions;
pub mod settings;
