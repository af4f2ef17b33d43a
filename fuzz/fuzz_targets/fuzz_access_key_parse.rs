#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Errors are fine; a parsed key must carry a consistent check digit.
        if let Ok(key) = nota::core::AccessKey::parse(s) {
            let body = &key.as_str()[..43];
            assert_eq!(nota::core::check_digit(body).ok(), Some(key.check_digit()));
        }
    }
});
