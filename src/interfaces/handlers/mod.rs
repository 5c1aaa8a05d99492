pub mod assessment;
pub mod auth;
pub mod json_error;
pub mod manager;
pub mod system;
