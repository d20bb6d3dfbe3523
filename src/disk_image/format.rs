// Format descriptor: the fixed geometry, gap/mark byte sequences and
// interleave rule for each of the two recording methods the TI 99 uses.
//
// All of the literal byte sequences below (leadin/leadout/gaps/marks) are
// exactly what a real drive controller expects on the wire; they are not
// derived from the bit codec, they're fixed per format, so they're kept as
// literal constants rather than computed.

use crate::disk_image::bitstream;
use crate::disk_image::errors::HfeErrorType;

/// Single density (FM, 9 sectors/track) or double density (MFM, 18
/// sectors/track), the only two recording methods the TI 99 uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Sd,
    Dd,
}

const SD_ADDRESS_MARK: [u8; 4] = [0xaa, 0x88, 0xa8, 0x2a];
const SD_VADDRESS_MARK: [u8; 1] = [0xfe];
const SD_DATA_MARK: [u8; 4] = [0xaa, 0x88, 0x28, 0xaa];
const SD_VDATA_MARK: [u8; 1] = [0xfb];

const SD_SECTOR_INTERLEAVE: [usize; 27] = [
    0, 7, 5, 3, 1, 8, 6, 4, 2, //
    6, 4, 2, 0, 7, 5, 3, 1, 8, //
    3, 1, 8, 6, 4, 2, 0, 7, 5,
];
const SD_SECTOR_INTERLEAVE_WTF: [usize; 27] = [
    4, 2, 0, 7, 5, 3, 1, 8, 6, //
    1, 8, 6, 4, 2, 0, 7, 5, 3, //
    7, 5, 3, 1, 8, 6, 4, 2, 0,
];

const DD_ADDRESS_MARK: [u8; 8] = [0x22, 0x91, 0x22, 0x91, 0x22, 0x91, 0xaa, 0x2a];
const DD_VADDRESS_MARK: [u8; 4] = [0xa1, 0xa1, 0xa1, 0xfe];
const DD_DATA_MARK: [u8; 8] = [0x22, 0x91, 0x22, 0x91, 0x22, 0x91, 0xaa, 0xa2];
const DD_VDATA_MARK: [u8; 4] = [0xa1, 0xa1, 0xa1, 0xfb];

/// HFE `track_encoding` byte for single density.
pub const HFE_SD_ENCODING: u8 = 2;
/// HFE `track_encoding` byte for double density.
pub const HFE_DD_ENCODING: u8 = 0;
/// HFE `floppy_interface_mode` byte this crate accepts (generic Shugart
/// DD).
pub const HFE_INTERFACE_MODE: u8 = 7;

impl Format {
    /// Number of sectors per track.
    pub fn sectors(&self) -> usize {
        match self {
            Format::Sd => 9,
            Format::Dd => 18,
        }
    }

    /// Decoded length of one full track, including leadin/leadout and every
    /// sector's gaps and marks.
    pub fn track_len(&self) -> usize {
        match self {
            Format::Sd => 17 + 9 * 334 + 113,
            Format::Dd => 32 + 18 * 342 + 84,
        }
    }

    /// Factor by which a decoded byte expands when encoded onto the wire
    /// (4 for FM, 2 for MFM).
    pub fn factor(&self) -> usize {
        match self {
            Format::Sd => 4,
            Format::Dd => 2,
        }
    }

    pub fn leadin(&self) -> Vec<u8> {
        match self {
            Format::Sd => {
                let mut v = vec![0xaa, 0xa8, 0xa8, 0x22];
                v.extend(std::iter::repeat(0xaa).take(4 * 16));
                v
            }
            Format::Dd => std::iter::repeat([0x49u8, 0x2a]).take(32).flatten().collect(),
        }
    }

    pub fn leadout(&self) -> Vec<u8> {
        match self {
            Format::Sd => {
                let mut v: Vec<u8> = std::iter::repeat(0xaa).take(4 * 77).collect();
                v.push(0xaa);
                v.push(0x50);
                v.extend(std::iter::repeat(0x55).take(2 + 4 * 35));
                v
            }
            Format::Dd => std::iter::repeat([0x49u8, 0x2a]).take(84).flatten().collect(),
        }
    }

    /// Decoded length of the leadin.
    pub fn lv_leadin(&self) -> usize {
        match self {
            Format::Sd => 17,
            Format::Dd => 32,
        }
    }

    /// Decoded length of the leadout.
    pub fn lv_leadout(&self) -> usize {
        match self {
            Format::Sd => 113,
            Format::Dd => 84,
        }
    }

    pub fn pregap(&self) -> Vec<u8> {
        match self {
            Format::Sd => vec![0x22; 4 * 6],
            Format::Dd => vec![0x55; 2 * 12],
        }
    }

    pub fn lv_pregap(&self) -> usize {
        match self {
            Format::Sd => 6,
            Format::Dd => 12,
        }
    }

    pub fn gap1(&self) -> Vec<u8> {
        match self {
            Format::Sd => {
                let mut v = vec![0xaa; 4 * 11];
                v.extend(std::iter::repeat(0x22).take(4 * 6));
                v
            }
            Format::Dd => {
                let mut v: Vec<u8> = std::iter::repeat([0x49u8, 0x2a]).take(22).flatten().collect();
                v.extend(std::iter::repeat(0x55).take(2 * 12));
                v
            }
        }
    }

    pub fn lv_gap1(&self) -> usize {
        match self {
            Format::Sd => 17,
            Format::Dd => 34,
        }
    }

    pub fn gap2(&self) -> Vec<u8> {
        match self {
            Format::Sd => vec![0xaa; 4 * 45],
            Format::Dd => std::iter::repeat([0x49u8, 0x2a]).take(24).flatten().collect(),
        }
    }

    pub fn lv_gap2(&self) -> usize {
        match self {
            Format::Sd => 45,
            Format::Dd => 24,
        }
    }

    /// Encoded address mark bytes, with a deliberately dropped clock bit so
    /// it can't appear in ordinary encoded data.
    pub fn address_mark(&self) -> &'static [u8] {
        match self {
            Format::Sd => &SD_ADDRESS_MARK,
            Format::Dd => &DD_ADDRESS_MARK,
        }
    }

    /// Decoded form of the address mark (what a correct decode of
    /// `address_mark()` yields).
    pub fn vaddress_mark(&self) -> &'static [u8] {
        match self {
            Format::Sd => &SD_VADDRESS_MARK,
            Format::Dd => &DD_VADDRESS_MARK,
        }
    }

    pub fn lv_address_mark(&self) -> usize {
        match self {
            Format::Sd => 1,
            Format::Dd => 4,
        }
    }

    pub fn data_mark(&self) -> &'static [u8] {
        match self {
            Format::Sd => &SD_DATA_MARK,
            Format::Dd => &DD_DATA_MARK,
        }
    }

    pub fn vdata_mark(&self) -> &'static [u8] {
        match self {
            Format::Sd => &SD_VDATA_MARK,
            Format::Dd => &DD_VDATA_MARK,
        }
    }

    pub fn lv_data_mark(&self) -> usize {
        match self {
            Format::Sd => 1,
            Format::Dd => 4,
        }
    }

    /// Encode a run of decoded bytes (sector payload, address field, CRC)
    /// into its on-wire bit-cell representation.
    pub fn encode(&self, bytes: &[u8]) -> Vec<u8> {
        match self {
            Format::Sd => bitstream::fm_encode(bytes),
            Format::Dd => bitstream::mfm_encode(bytes),
        }
    }

    /// Decode a run of on-wire bit cells back into bytes.
    pub fn decode(&self, stream: &[u8]) -> Vec<u8> {
        match self {
            Format::Sd => bitstream::fm_decode(stream),
            Format::Dd => bitstream::mfm_decode(stream),
        }
    }

    /// Patch clock bits across byte boundaries after encoding an entire
    /// sector body. No-op for FM, where the clock never depends on
    /// neighboring bytes.
    pub fn fix_clocks(&self, stream: &mut [u8]) {
        match self {
            Format::Sd => bitstream::fm_fix_clocks(stream),
            Format::Dd => bitstream::mfm_fix_clocks(stream),
        }
    }

    /// Which logical sector number occupies physical slot `sector` on
    /// `track`, for the given `side`. `wtf80t` is set for 80-track disks,
    /// which use a different SD interleave table on side 1 tracks below 37
    /// for reasons lost to history.
    pub fn interleave(&self, side: u8, track: usize, sector: usize, wtf80t: bool) -> usize {
        match self {
            Format::Sd => {
                if !wtf80t || side == 0 {
                    SD_SECTOR_INTERLEAVE[(track * self.sectors() + sector) % 27]
                } else if track < 37 {
                    SD_SECTOR_INTERLEAVE_WTF[(track * self.sectors() + sector) % 27]
                } else {
                    SD_SECTOR_INTERLEAVE[((track - 37) * self.sectors() + sector) % 27]
                }
            }
            Format::Dd => (sector * 11) % self.sectors(),
        }
    }

    /// HFE `track_encoding` byte for this format.
    pub fn hfe_encoding_byte(&self) -> u8 {
        match self {
            Format::Sd => HFE_SD_ENCODING,
            Format::Dd => HFE_DD_ENCODING,
        }
    }

    /// Recover the format from an HFE `track_encoding` byte.
    pub fn from_hfe_encoding_byte(byte: u8) -> Result<Self, HfeErrorType> {
        match byte {
            HFE_DD_ENCODING => Ok(Format::Dd),
            HFE_SD_ENCODING => Ok(Format::Sd),
            other => Err(HfeErrorType::InvalidEncoding(other)),
        }
    }
}
