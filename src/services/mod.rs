pub mod auth_service;
pub mod catalog_service;
pub mod image_service;
pub mod item_service;
