pub mod assessment;
pub mod skill;
pub mod stats;
pub mod user;
