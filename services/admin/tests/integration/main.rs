mod activity_log_test;
mod business_unit_test;
mod employee_test;
mod guard_test;
mod template_test;
mod user_test;
