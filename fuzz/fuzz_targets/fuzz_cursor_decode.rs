#![no_main]
use libfuzzer_sys::fuzz_target;
use scanpage::{CursorCodec, KeyPairCodec};

fuzz_target!(|data: &[u8]| {
    if data.len() > 8192 { return; }
    if let Ok(s) = std::str::from_utf8(data) {
        // Decoding arbitrary text must not panic; a decoded point re-encodes.
        let codec = KeyPairCodec::new("PK", "SK");
        if let Ok(resume) = codec.decode(s) {
            let again = codec.decode(&codec.encode(&resume));
            assert_eq!(again.ok(), Some(resume));
        }
    }
});
