mod manufacturer_service;

pub use manufacturer_service::{ManufacturerService, MANUFACTURER_RESOURCE};
