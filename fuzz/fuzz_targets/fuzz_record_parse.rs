#![no_main]

//! Fuzz target for TLS record and alert parsing.
//!
//! Feeds arbitrary bytes to the record parser, and every parsed fragment to
//! the alert parser. Also wraps the input in an alert record header so short
//! inputs reach the alert parser too.

use libfuzzer_sys::fuzz_target;

use recstate::{Alert, ContentType, ProtocolVersion, RecordHeader, MAX_FRAGMENT_LEN};

fuzz_target!(|data: &[u8]| {
    let mut input = data;
    while let Ok((rest, (header, fragment))) = RecordHeader::parse_record(input) {
        assert_eq!(header.length as usize, fragment.len());
        let _ = Alert::parse(fragment);
        input = rest;
    }

    let frag_len = data.len().min(MAX_FRAGMENT_LEN);
    let header = RecordHeader {
        content_type: ContentType::Alert,
        version: ProtocolVersion::Tls1_2,
        length: frag_len as u16,
    };

    let mut record = Vec::with_capacity(RecordHeader::LEN + frag_len);
    header.serialize(&mut record);
    record.extend_from_slice(&data[..frag_len]);

    if let Ok((_, (parsed, fragment))) = RecordHeader::parse_record(&record) {
        assert_eq!(parsed, header);
        if let Ok((_, alert)) = Alert::parse(fragment) {
            assert_eq!(&alert.to_bytes()[..], &fragment[..Alert::LEN]);
        }
    }
});
