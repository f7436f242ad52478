pub mod audit;
pub mod security;
