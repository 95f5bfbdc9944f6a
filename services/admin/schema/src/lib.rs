//! sea-orm entities for the HR admin service.

pub mod activity_logs;
pub mod business_units;
pub mod employee_sequences;
pub mod employees;
pub mod network_paths;
pub mod template_images;
pub mod users;
