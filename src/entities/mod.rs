//! Concrete entity types managed by the API

pub mod product;
pub mod user;

pub use product::Product;
pub use user::User;
