pub mod account;
pub mod courses;
pub mod lessons;
pub mod modules;
pub mod users;
