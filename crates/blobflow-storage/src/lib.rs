pub mod factory;
pub mod local;
pub mod store;

pub mod azure;
