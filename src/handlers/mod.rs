pub mod common;
pub mod configure;
pub mod metrics;
pub mod monitoring;
pub mod organizations;
pub mod quickstart;
pub mod setups;
