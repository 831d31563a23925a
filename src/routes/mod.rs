pub mod health;
pub mod schools;
pub mod session;
pub mod students;
