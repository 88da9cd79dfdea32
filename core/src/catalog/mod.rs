pub mod alias;
pub mod filter;
pub mod model;
pub mod render;
