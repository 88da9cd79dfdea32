pub mod export;
pub mod import;
pub mod merge;
pub mod validate;
