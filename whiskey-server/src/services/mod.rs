//! Business services

pub mod convert;
pub mod image_store;
pub mod whiskey;

pub use image_store::{ImageStore, ImageUpload};
pub use whiskey::WhiskeyService;
