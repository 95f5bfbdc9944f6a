pub mod activity_log;
pub mod audit;
pub mod business_unit;
pub mod employee;
pub mod network_path;
pub mod storage;
pub mod template;
pub mod user;
