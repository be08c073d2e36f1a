pub mod audit;
pub mod product;
pub mod user;
