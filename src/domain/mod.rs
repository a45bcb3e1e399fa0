pub mod teacher;
pub mod user;
