#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let max = usize::from(data.first().copied().unwrap_or(60));
        let cleaned = nota::core::clean_text(s, max, true);
        assert!(cleaned.chars().count() <= max);
        assert_eq!(cleaned, cleaned.trim());
        let _ = nota::core::strip_mask(s);
    }
});
