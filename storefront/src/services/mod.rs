// storefront/src/services/mod.rs

pub mod auth_service;
pub mod catalog_service;
pub mod course_lists;
pub mod order_service;

pub use course_lists::CourseLists;
