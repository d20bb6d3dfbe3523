// HFE (HxC Floppy Emulator) container: header, track-offset LUT and the
// side-interleaved 256-byte-block track payload.
//
// The header and LUT byte values (bit rate 250, interface mode 7, LUT
// stride `0x31` blocks) and the side-1 physical track reversal are fixed
// by the format this crate targets, not derived from anything else here.

use log::debug;

use crate::disk_image::errors::{HfeError, HfeErrorType};
use crate::disk_image::format::{Format, HFE_INTERFACE_MODE};
use crate::disk_image::track;

const MAGIC: &[u8; 8] = b"HXCPICFE";
const HEADER_LEN: usize = 512;
const LUT_LEN: usize = 512;
const LUT_STRIDE_BLOCKS: u32 = 0x31;
const BLOCK_SIZE: usize = 256;

/// A parsed HFE image: header fields plus the raw (still wire-encoded)
/// track payload.
pub struct HfeImage {
    pub tracks: u8,
    pub sides: u8,
    pub format: Format,
    pub interface_mode: u8,
    trackdata: Vec<u8>,
}

impl HfeImage {
    /// Read the four raw header fields (tracks, sides, encoding, interface
    /// mode) without validating that they describe a format this crate
    /// supports. Used by `--hfe-info`, which reports on any HFE image, not
    /// just TI-99-suitable ones.
    pub fn raw_params(image: &[u8]) -> Result<(u8, u8, u8, u8), HfeError> {
        if image.len() < HEADER_LEN + LUT_LEN || &image[0..8] != MAGIC {
            return Err(HfeError::new(HfeErrorType::NotAnHfeImage));
        }
        Ok((image[9], image[10], image[11], image[16]))
    }

    /// Parse an HFE image's header and stash its track payload for later
    /// decoding. Does not itself decode any track (see [`HfeImage::tracks`]).
    pub fn parse(image: &[u8]) -> Result<Self, HfeError> {
        if image.len() < HEADER_LEN + LUT_LEN || &image[0..8] != MAGIC {
            return Err(HfeError::new(HfeErrorType::NotAnHfeImage));
        }
        let tracks = image[9];
        let sides = image[10];
        let encoding = image[11];
        let interface_mode = image[16];

        let format = Format::from_hfe_encoding_byte(encoding).map_err(HfeError::new)?;
        if interface_mode != HFE_INTERFACE_MODE {
            return Err(HfeError::new(HfeErrorType::InvalidMode(interface_mode)));
        }

        debug!(
            "parsed HFE header: {} tracks, {} sides, format {:?}",
            tracks, sides, format
        );

        Ok(Self {
            tracks,
            sides,
            format,
            interface_mode,
            trackdata: image[HEADER_LEN + LUT_LEN..].to_vec(),
        })
    }

    /// Undo the 256-byte side interleave and decode every track's bit
    /// stream, returning decoded per-track byte buffers in logical track
    /// order (0..tracks, side 0 then side 1).
    pub fn decoded_tracks(&self) -> Result<Vec<Vec<u8>>, HfeError> {
        let blocks: Vec<&[u8]> = self.trackdata.chunks(BLOCK_SIZE).collect();
        let side0: Vec<u8> = blocks.iter().step_by(2).flat_map(|b| b.iter().copied()).collect();
        let side1: Vec<u8> = blocks
            .iter()
            .skip(1)
            .step_by(2)
            .flat_map(|b| b.iter().copied())
            .collect();

        let track_len = self.format.track_len();
        let decoded0 = self.format.decode(&side0);
        let mut tracks0: Vec<Vec<u8>> = decoded0.chunks(track_len).map(|c| c.to_vec()).collect();

        let mut tracks1: Vec<Vec<u8>> = if self.sides == 2 {
            let decoded1 = self.format.decode(&side1);
            decoded1.chunks(track_len).map(|c| c.to_vec()).collect()
        } else {
            Vec::new()
        };
        tracks1.reverse();
        tracks0.extend(tracks1);

        let expected = self.sides as usize * self.tracks as usize;
        if tracks0.len() != expected {
            return Err(HfeError::new(HfeErrorType::InvalidTrackCount(expected, tracks0.len())));
        }
        Ok(tracks0)
    }

    /// Decode the whole image back into a flat sector image (sectors in
    /// physical-track, side, logical-sector order).
    pub fn to_sector_image(&self) -> Result<Vec<u8>, HfeError> {
        let tracks = self.decoded_tracks()?;
        let mut out = Vec::with_capacity(tracks.len() * self.format.sectors() * BLOCK_SIZE);
        for (i, track_bytes) in tracks.iter().enumerate() {
            out.extend(track::parse_track(self.format, track_bytes, i)?);
        }
        Ok(out)
    }

    /// Build a complete HFE image from a flat sector image.
    ///
    /// `sector_image` must hold exactly `tracks * sides * format.sectors() *
    /// 256` bytes, sectors ordered physical-track, side, logical-sector.
    pub fn create(sector_image: &[u8], tracks: u8, sides: u8, format: Format, protected: bool) -> Vec<u8> {
        let header = Self::create_header(tracks, sides, format, protected);
        let lut = Self::create_lut(tracks, format);
        let (side0, side1) = Self::create_track_streams(sector_image, tracks, sides, format);

        debug_assert_eq!(side0.len() % BLOCK_SIZE, 0, "encoded track stream must be block-aligned");

        let zero_block = [0u8; BLOCK_SIZE];
        let mut sandwich = Vec::with_capacity(side0.len() * 2);
        for chunk_start in (0..side0.len()).step_by(BLOCK_SIZE) {
            sandwich.extend_from_slice(&side0[chunk_start..chunk_start + BLOCK_SIZE]);
            if sides == 2 {
                sandwich.extend_from_slice(&side1[chunk_start..chunk_start + BLOCK_SIZE]);
            } else {
                sandwich.extend_from_slice(&zero_block);
            }
        }

        let mut image = Vec::with_capacity(HEADER_LEN + LUT_LEN + sandwich.len());
        image.extend(header);
        image.extend(lut);
        image.extend(sandwich);
        image
    }

    fn create_header(tracks: u8, sides: u8, format: Format, protected: bool) -> Vec<u8> {
        let mut info = Vec::with_capacity(HEADER_LEN);
        info.extend_from_slice(MAGIC);
        info.push(0); // format revision
        info.push(tracks);
        info.push(sides);
        info.push(format.hfe_encoding_byte());
        info.extend_from_slice(&250u16.to_le_bytes()); // bit rate (kbit/s)
        info.extend_from_slice(&0u16.to_le_bytes()); // rpm, unused
        info.push(HFE_INTERFACE_MODE);
        info.push(1); // dnu
        info.extend_from_slice(&1u16.to_le_bytes()); // LUT offset, in 512-byte blocks
        info.push(if protected { 0x00 } else { 0xff });
        info.resize(HEADER_LEN, 0xff);
        info
    }

    fn create_lut(tracks: u8, format: Format) -> Vec<u8> {
        let length_field: [u8; 2] = match format {
            Format::Dd => [0xc0, 0x61],
            Format::Sd => [0xb0, 0x61],
        };
        let mut lut = Vec::with_capacity(LUT_LEN);
        for i in 0..tracks as u32 {
            let offset_blocks = (LUT_STRIDE_BLOCKS * i + 2) as u16;
            lut.extend_from_slice(&offset_blocks.to_le_bytes());
            lut.extend_from_slice(&length_field);
        }
        lut.resize(LUT_LEN, 0xff);
        lut
    }

    /// Encode every track of both sides. Side 0 tracks are assembled and
    /// concatenated in recorded order (0..tracks); side 1 tracks are
    /// assembled in logical order but the resulting track-length chunks
    /// are reversed before concatenation, matching how the drive actually
    /// lays out the physically-reversed side.
    fn create_track_streams(sector_image: &[u8], tracks: u8, sides: u8, format: Format) -> (Vec<u8>, Vec<u8>) {
        let wtf80t = tracks == 80;
        let mut side0 = Vec::new();
        let mut side1_tracks: Vec<Vec<u8>> = Vec::new();

        for s in 0..sides {
            for j in 0..tracks {
                let track_id = if s != 0 { tracks - 1 - j } else { j };
                let mut sectors_by_id = Vec::with_capacity(format.sectors());
                for i in 0..format.sectors() {
                    let offset = ((s as usize * tracks as usize + j as usize) * format.sectors() + i) * BLOCK_SIZE;
                    sectors_by_id.push(sector_image[offset..offset + BLOCK_SIZE].to_vec());
                }
                let encoded = track::assemble_track(format, s, j as usize, track_id, wtf80t, &sectors_by_id);
                if s == 0 {
                    side0.extend(encoded);
                } else {
                    side1_tracks.push(encoded);
                }
            }
        }
        side1_tracks.reverse();
        let side1: Vec<u8> = side1_tracks.into_iter().flatten().collect();
        (side0, side1)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sector_image(tracks: u8, sides: u8, format: Format) -> Vec<u8> {
        let total_sectors = tracks as usize * sides as usize * format.sectors();
        let mut image = Vec::with_capacity(total_sectors * BLOCK_SIZE);
        for i in 0..total_sectors {
            image.extend(std::iter::repeat((i % 256) as u8).take(BLOCK_SIZE));
        }
        image
    }

    #[test]
    fn sd_single_sided_round_trips() {
        let tracks = 2;
        let sides = 1;
        let format = Format::Sd;
        let image = sector_image(tracks, sides, format);

        let hfe = HfeImage::create(&image, tracks, sides, format, false);
        let parsed = HfeImage::parse(&hfe).unwrap();
        assert_eq!(parsed.tracks, tracks);
        assert_eq!(parsed.sides, sides);
        assert_eq!(parsed.format, format);

        let roundtripped = parsed.to_sector_image().unwrap();
        assert_eq!(roundtripped, image);
    }

    #[test]
    fn dd_double_sided_round_trips() {
        let tracks = 3;
        let sides = 2;
        let format = Format::Dd;
        let image = sector_image(tracks, sides, format);

        let hfe = HfeImage::create(&image, tracks, sides, format, false);
        let parsed = HfeImage::parse(&hfe).unwrap();
        let roundtripped = parsed.to_sector_image().unwrap();
        assert_eq!(roundtripped, image);
    }

    /// Side 1 is recorded back-to-front on a real drive, so its track-0
    /// data is the *last* encoded track chunk in the HFE payload's side-1
    /// stream, not the first. This checks that placement directly off the
    /// raw payload bytes rather than through `to_sector_image`, since a
    /// reversal bug that is symmetric between encode and decode would
    /// otherwise cancel out and still round-trip correctly.
    #[test]
    fn side1_track_zero_lands_in_last_block_pair() {
        let tracks = 3;
        let sides = 2;
        let format = Format::Sd;
        let image = sector_image(tracks, sides, format);

        let hfe = HfeImage::create(&image, tracks, sides, format, false);
        let payload = &hfe[HEADER_LEN + LUT_LEN..];

        let blocks: Vec<&[u8]> = payload.chunks(BLOCK_SIZE).collect();
        let side1: Vec<u8> = blocks.iter().skip(1).step_by(2).flat_map(|b| b.iter().copied()).collect();

        let encoded_track_len = format.track_len() * format.factor();
        let last_chunk = &side1[side1.len() - encoded_track_len..];

        let decoded = format.decode(last_chunk);
        let extracted = track::parse_track(format, &decoded, tracks as usize - 1).unwrap();

        let side1_track0_offset = (tracks as usize * format.sectors()) * BLOCK_SIZE;
        let expected = &image[side1_track0_offset..side1_track0_offset + format.sectors() * BLOCK_SIZE];
        assert_eq!(extracted, expected);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bad = vec![0u8; HEADER_LEN + LUT_LEN];
        bad[0] = b'X';
        let err = HfeImage::parse(&bad).unwrap_err();
        assert!(matches!(err.kind(), HfeErrorType::NotAnHfeImage));
    }

    #[test]
    fn rejects_bad_interface_mode() {
        let tracks = 1;
        let sides = 1;
        let format = Format::Sd;
        let image = sector_image(tracks, sides, format);
        let mut hfe = HfeImage::create(&image, tracks, sides, format, false);
        hfe[16] = 3;
        let err = HfeImage::parse(&hfe).unwrap_err();
        assert!(matches!(err.kind(), HfeErrorType::InvalidMode(3)));
    }
}
