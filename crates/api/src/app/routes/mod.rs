pub mod products;
pub mod sales;
pub mod system;
