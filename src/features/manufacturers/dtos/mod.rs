mod manufacturer_dto;

pub use manufacturer_dto::{ManufacturerInputDto, ManufacturerResponseDto};
