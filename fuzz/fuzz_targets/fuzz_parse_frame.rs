#![no_main]

use libfuzzer_sys::fuzz_target;
use mbus_codec::{ControlFrame, Frame, LongFrame, ShortFrame, SingleFrame};

fuzz_target!(|data: &[u8]| {
    // Frame detection must never panic, whatever the input
    let mut rest = data;
    while let Ok((next, frame)) = Frame::parse(rest) {
        let _ = frame.verify_checksum();
        assert!(next.len() < rest.len());
        rest = next;
    }

    // Every shape handed the wrong bytes has to fail gracefully
    let _ = SingleFrame::from_bytes(data);
    let _ = ShortFrame::from_bytes(data);
    let _ = ControlFrame::from_bytes(data);
    let _ = LongFrame::from_bytes(data);

    // Force valid markers so the accessors are reached
    if data.len() >= 10 {
        let mut long = data[..10].to_vec();
        long[0] = 0x68;
        long[3] = 0x68;
        long[9] = 0x16;
        if let Ok(frame) = LongFrame::from_bytes(&long) {
            assert!(frame.user_data() <= 252);
            let _ = frame.checksum_valid();
        }
    }
});
