pub mod outline;
pub mod symbols;
