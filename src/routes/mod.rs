pub mod card;
pub mod dashboard;
pub mod profile;
pub mod status;
