//! Advertising-data parsing for the pairing scan.
//!
//! An open wireless profile is filled by the first HID peripheral that
//! shows up during the pairing window, so only two questions are asked
//! of an advertisement: does it offer the HID service, and what is it
//! called.

/// Incomplete / complete list of 16-bit service UUIDs.
const AD_UUID16_INCOMPLETE: u8 = 0x02;
const AD_UUID16_COMPLETE: u8 = 0x03;
/// Shortened / complete local name.
const AD_NAME_SHORT: u8 = 0x08;
const AD_NAME_COMPLETE: u8 = 0x09;

/// HID over GATT service (0x1812), little-endian on the air.
const HID_SERVICE_UUID: [u8; 2] = [0x12, 0x18];

/// One length-type-value structure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdStructure<'a> {
    pub ad_type: u8,
    pub data: &'a [u8],
}

/// Iterator over the AD structures in a raw advertisement.
///
/// Stops at the first zero-length entry or at a structure that would
/// run past the end of the buffer.
pub struct AdStructures<'a> {
    raw: &'a [u8],
}

impl<'a> AdStructures<'a> {
    pub fn new(raw: &'a [u8]) -> Self {
        Self { raw }
    }
}

impl<'a> Iterator for AdStructures<'a> {
    type Item = AdStructure<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (&len, rest) = self.raw.split_first()?;
        let len = len as usize;
        if len == 0 || len > rest.len() {
            self.raw = &[];
            return None;
        }
        let (entry, tail) = rest.split_at(len);
        self.raw = tail;
        Some(AdStructure {
            ad_type: entry[0],
            data: &entry[1..],
        })
    }
}

/// True when the advertisement lists the HID service UUID.
pub fn advertises_hid(raw: &[u8]) -> bool {
    AdStructures::new(raw)
        .filter(|ad| matches!(ad.ad_type, AD_UUID16_INCOMPLETE | AD_UUID16_COMPLETE))
        .any(|ad| ad.data.chunks_exact(2).any(|uuid| uuid == HID_SERVICE_UUID))
}

/// Shortened or complete local name, if present and valid UTF-8.
pub fn local_name(raw: &[u8]) -> Option<&str> {
    AdStructures::new(raw)
        .find(|ad| matches!(ad.ad_type, AD_NAME_SHORT | AD_NAME_COMPLETE))
        .and_then(|ad| core::str::from_utf8(ad.data).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ═══════════════════════════════════════════════════════════════════
    // HID service detection
    // ═══════════════════════════════════════════════════════════════════

    #[test]
    fn hid_uuid_in_complete_list() {
        // Flags, then complete 16-bit UUID list with 0x180F and 0x1812.
        let adv = [0x02, 0x01, 0x06, 0x05, 0x03, 0x0F, 0x18, 0x12, 0x18];
        assert!(advertises_hid(&adv));
    }

    #[test]
    fn hid_uuid_in_incomplete_list() {
        let adv = [0x03, 0x02, 0x12, 0x18];
        assert!(advertises_hid(&adv));
    }

    #[test]
    fn other_services_are_not_hid() {
        let adv = [0x02, 0x01, 0x06, 0x03, 0x03, 0x0F, 0x18];
        assert!(!advertises_hid(&adv));
    }

    #[test]
    fn hid_bytes_outside_uuid_list_do_not_count() {
        // Manufacturer data (0xFF) that happens to contain 12 18.
        let adv = [0x05, 0xFF, 0x12, 0x18, 0x00, 0x00];
        assert!(!advertises_hid(&adv));
    }

    #[test]
    fn truncated_structure_is_ignored() {
        // Claims 5 bytes, only 3 follow.
        let adv = [0x05, 0x03, 0x12, 0x18];
        assert!(!advertises_hid(&adv));
    }

    #[test]
    fn empty_advertisement() {
        assert!(!advertises_hid(&[]));
        assert_eq!(local_name(&[]), None);
    }

    // ═══════════════════════════════════════════════════════════════════
    // Local name
    // ═══════════════════════════════════════════════════════════════════

    #[test]
    fn complete_name_is_returned() {
        let adv = [0x02, 0x01, 0x06, 0x06, 0x09, b'C', b'o', b'r', b'n', b'e'];
        assert_eq!(local_name(&adv), Some("Corne"));
    }

    #[test]
    fn shortened_name_is_returned() {
        let adv = [0x04, 0x08, b'K', b'B', b'D'];
        assert_eq!(local_name(&adv), Some("KBD"));
    }

    #[test]
    fn missing_name_is_none() {
        let adv = [0x02, 0x01, 0x06];
        assert_eq!(local_name(&adv), None);
    }

    #[test]
    fn zero_length_entry_stops_parsing() {
        let adv = [0x00, 0x04, 0x09, b'A', b'B', b'C'];
        assert_eq!(AdStructures::new(&adv).count(), 0);
    }

    #[test]
    fn iterator_yields_every_structure() {
        let adv = [0x02, 0x01, 0x06, 0x03, 0x03, 0x12, 0x18];
        let types: heapless::Vec<u8, 4> = AdStructures::new(&adv).map(|ad| ad.ad_type).collect();
        assert_eq!(types.as_slice(), &[0x01, 0x03]);
    }
}
