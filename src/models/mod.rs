pub mod application;
pub mod notification;
pub mod user;
pub mod vacancy;
