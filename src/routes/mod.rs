pub mod analysis;
pub mod page;
pub mod user;
