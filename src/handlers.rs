pub mod expenses;
pub mod health;
pub mod months;
pub mod users;
