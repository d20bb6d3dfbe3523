use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum HfeErrorType {
    NotAnHfeImage,
    InvalidEncoding(u8),
    InvalidMode(u8),
    InvalidTrackCount(usize, usize),
    MarkMismatch { track: usize, sector: usize, expected: Vec<u8>, found: Vec<u8> },
    DuplicateSectorId { track: usize, sector_id: u8 },
    TrackLengthMismatch { track: usize, expected: usize, found: usize },
}

#[derive(Debug)]
pub struct HfeError {
    kind: HfeErrorType,
}

impl HfeError {
    pub fn new(kind: HfeErrorType) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> &HfeErrorType {
        &self.kind
    }
}

impl fmt::Display for HfeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let string: String = match &self.kind {
            HfeErrorType::NotAnHfeImage => "Not an HFE image".to_string(),
            HfeErrorType::InvalidEncoding(enc) => format!("Invalid encoding: {}", enc),
            HfeErrorType::InvalidMode(mode) => format!("Invalid mode: {}", mode),
            HfeErrorType::InvalidTrackCount(should_be, is) => format!(
                "Invalid track count (should be {}, is {})",
                should_be, is
            ),
            HfeErrorType::MarkMismatch { track, sector, expected, found } => format!(
                "Mark mismatch on track {} sector {}: expected {:02x?}, found {:02x?}",
                track, sector, expected, found
            ),
            HfeErrorType::DuplicateSectorId { track, sector_id } => {
                format!("Duplicate sector id {} on track {}", sector_id, track)
            }
            HfeErrorType::TrackLengthMismatch { track, expected, found } => format!(
                "Track {} has wrong length (expected {}, found {})",
                track, expected, found
            ),
        };

        write!(f, "{}", string)
    }
}

impl Error for HfeError {}

#[derive(Debug)]
pub enum ConvertErrorType {
    SectorDivision,
    SectorNumber(usize, usize),
}

#[derive(Debug)]
pub struct ConvertError {
    kind: ConvertErrorType,
}

impl ConvertError {
    pub fn new(kind: ConvertErrorType) -> Self {
        Self { kind }
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let string: String = match &self.kind {
            ConvertErrorType::SectorDivision => {
                "Unable to divide input image into sectors".to_string()
            }
            ConvertErrorType::SectorNumber(should_be, is) => format!(
                "Wrong number of sectors in input image (should be {}, is {})",
                should_be, is
            ),
        };

        write!(f, "{}", string)
    }
}

impl Error for ConvertError {}
