// Track assembler and parser: these are exact inverses built on top of a
// `Format` descriptor, the bit codec and the CRC. Each sector is a
// pregap, an address mark and CRC-terminated address field, gap1, a data
// mark and CRC-terminated data field, and gap2, assembled or torn back
// down in that order.

use std::collections::BTreeMap;

use log::{debug, trace};

use crate::disk_image::crc16;
use crate::disk_image::errors::{HfeError, HfeErrorType};
use crate::disk_image::format::Format;

/// Assemble one physical track's encoded (on-wire) byte stream.
///
/// `sectors_by_logical_id[i]` must hold the 256-byte payload for logical
/// sector `i`; there must be exactly `fmt.sectors()` of them. `track_index`
/// is the *recorded* (0-based, forward for side 0) track position;
/// `logical_track_id` is the value stamped into each sector's address
/// field, which runs backwards on side 1 (see `disk_image::hfe`).
pub fn assemble_track(
    fmt: Format,
    side: u8,
    track_index: usize,
    logical_track_id: u8,
    wtf80t: bool,
    sectors_by_logical_id: &[Vec<u8>],
) -> Vec<u8> {
    debug_assert_eq!(sectors_by_logical_id.len(), fmt.sectors());
    trace!("assembling track {} side {}", track_index, side);

    let mut body = Vec::new();
    for slot in 0..fmt.sectors() {
        let sector_id = fmt.interleave(side, track_index, slot, wtf80t);
        let sector = &sectors_by_logical_id[sector_id];

        let addr = [logical_track_id, side, sector_id as u8, 0x01];
        let crc1 = crc16::field_crc(fmt.vaddress_mark(), &addr);
        let crc2 = crc16::field_crc(fmt.vdata_mark(), sector);

        let mut addr_field = addr.to_vec();
        addr_field.extend_from_slice(&crc1);
        let mut data_field = sector.clone();
        data_field.extend_from_slice(&crc2);

        body.extend(fmt.pregap());
        body.extend_from_slice(fmt.address_mark());
        body.extend(fmt.encode(&addr_field));
        body.extend(fmt.gap1());
        body.extend_from_slice(fmt.data_mark());
        body.extend(fmt.encode(&data_field));
        body.extend(fmt.gap2());
    }
    fmt.fix_clocks(&mut body);

    let mut track = fmt.leadin();
    track.extend(body);
    track.extend(fmt.leadout());
    track
}

/// Parse one physical track's *decoded* byte stream (i.e. already run
/// through `fmt.decode`) back into its 9 or 18 sector payloads, sorted by
/// logical sector id. `track_index` is only used to annotate errors.
pub fn parse_track(fmt: Format, track: &[u8], track_index: usize) -> Result<Vec<u8>, HfeError> {
    if track.len() != fmt.track_len() {
        return Err(HfeError::new(HfeErrorType::TrackLengthMismatch {
            track: track_index,
            expected: fmt.track_len(),
            found: track.len(),
        }));
    }
    debug!("parsing track {}", track_index);

    let mut h = fmt.lv_leadin();
    let mut sectors: BTreeMap<u8, Vec<u8>> = BTreeMap::new();

    for slot in 0..fmt.sectors() {
        h += fmt.lv_pregap();

        let addr_mark = &track[h..h + fmt.lv_address_mark()];
        if addr_mark != fmt.vaddress_mark() {
            return Err(HfeError::new(HfeErrorType::MarkMismatch {
                track: track_index,
                sector: slot,
                expected: fmt.vaddress_mark().to_vec(),
                found: addr_mark.to_vec(),
            }));
        }
        h += fmt.lv_address_mark();

        // track_id, side_id, sector_id, size_id, crc1(2)
        let sector_id = track[h + 2];
        if sectors.contains_key(&sector_id) {
            return Err(HfeError::new(HfeErrorType::DuplicateSectorId {
                track: track_index,
                sector_id,
            }));
        }
        h += 6;
        h += fmt.lv_gap1();

        let data_mark = &track[h..h + fmt.lv_data_mark()];
        if data_mark != fmt.vdata_mark() {
            return Err(HfeError::new(HfeErrorType::MarkMismatch {
                track: track_index,
                sector: slot,
                expected: fmt.vdata_mark().to_vec(),
                found: data_mark.to_vec(),
            }));
        }
        h += fmt.lv_data_mark();

        let data = track[h..h + 256].to_vec();
        sectors.insert(sector_id, data);
        h += 258; // 256 data bytes + 2 crc bytes
        h += fmt.lv_gap2();
    }
    h += fmt.lv_leadout();

    if h != track.len() {
        return Err(HfeError::new(HfeErrorType::TrackLengthMismatch {
            track: track_index,
            expected: track.len(),
            found: h,
        }));
    }

    Ok(sectors.into_values().flatten().collect())
}

#[cfg(test)]
mod test {
    use super::*;

    fn flat_sectors(fmt: Format, seed: u8) -> Vec<Vec<u8>> {
        (0..fmt.sectors())
            .map(|i| vec![seed.wrapping_add(i as u8); 256])
            .collect()
    }

    #[test]
    fn sd_track_round_trips() {
        let fmt = Format::Sd;
        let sectors = flat_sectors(fmt, 0x10);
        let encoded = assemble_track(fmt, 0, 0, 0, false, &sectors);
        assert_eq!(encoded.len(), fmt.track_len() * fmt.factor());

        let decoded = fmt.decode(&encoded);
        assert_eq!(decoded.len(), fmt.track_len());

        let extracted = parse_track(fmt, &decoded, 0).unwrap();
        let expected: Vec<u8> = sectors.into_iter().flatten().collect();
        assert_eq!(extracted, expected);
    }

    #[test]
    fn dd_track_round_trips() {
        let fmt = Format::Dd;
        let sectors = flat_sectors(fmt, 0x55);
        let encoded = assemble_track(fmt, 1, 3, 36, false, &sectors);
        let decoded = fmt.decode(&encoded);
        let extracted = parse_track(fmt, &decoded, 3).unwrap();
        let expected: Vec<u8> = sectors.into_iter().flatten().collect();
        assert_eq!(extracted, expected);
    }

    #[test]
    fn corrupt_address_mark_is_rejected() {
        let fmt = Format::Sd;
        let sectors = flat_sectors(fmt, 0);
        let encoded = assemble_track(fmt, 0, 0, 0, false, &sectors);
        let mut decoded = fmt.decode(&encoded);
        let mark_offset = fmt.lv_leadin() + fmt.lv_pregap();
        decoded[mark_offset] = 0x00;
        let err = parse_track(fmt, &decoded, 0).unwrap_err();
        assert!(matches!(err.kind(), HfeErrorType::MarkMismatch { .. }));
    }
}
