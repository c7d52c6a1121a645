pub mod zip_code;

pub use zip_code::ZipCode;
