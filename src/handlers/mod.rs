pub mod custody;
pub mod health;
