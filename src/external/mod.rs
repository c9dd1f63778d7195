pub mod mock;
pub mod price_provider;
pub mod yahoo;
