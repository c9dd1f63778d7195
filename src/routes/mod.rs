pub mod health;
pub mod stock;
