pub mod account;
pub mod api;
pub mod check_in;
pub mod config;
pub mod decode;
pub mod mirror;
pub mod quota;
pub mod report;
pub mod transport;
