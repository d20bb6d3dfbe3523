pub mod bitstream;
pub mod convert;
pub mod crc16;
pub mod errors;
pub mod format;
pub mod hfe;
pub mod track;

pub use convert::{sector_to_hfe, hfe_to_sector, hfe_info, hfe_raw_dump, Geometry, HfeInfo};
pub use errors::{ConvertError, ConvertErrorType, HfeError, HfeErrorType};
pub use format::Format;
pub use hfe::HfeImage;
