//! Fuzz target for color key string parsing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use maskcoco::mask::ColorKey;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(key) = s.parse::<ColorKey>() {
            // Display/FromStr must round-trip whatever parses.
            let rendered = key.to_string();
            assert_eq!(rendered.parse::<ColorKey>(), Ok(key));
        }
    }
});
