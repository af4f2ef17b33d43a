//! Property-based tests for access-key derivation and the modulo-11 check digit.

use nota::core::*;
use proptest::prelude::*;

fn fields<'a>(
    tax_id: &'a str,
    series: &'a str,
    number: &'a str,
    random_code: &'a str,
) -> KeyFields<'a> {
    KeyFields {
        state_code: "35",
        issued_at: "2024-06-15T10:30:00-03:00",
        tax_id,
        model: "55",
        series,
        number,
        emission_type: "1",
        random_code,
    }
}

/// Straight transcription of the weighting rule, used as an oracle.
fn reference_digit(body: &str) -> u8 {
    let mut weight = 2u32;
    let mut sum = 0u32;
    for d in body.bytes().rev() {
        sum += u32::from(d - b'0') * weight;
        weight = if weight == 9 { 2 } else { weight + 1 };
    }
    match sum % 11 {
        0 | 1 => 0,
        r => (11 - r) as u8,
    }
}

#[test]
fn known_key() {
    let key = AccessKey::generate(&fields("11222333000181", "1", "123", "12345678")).unwrap();
    assert_eq!(key.as_str(), "35240611222333000181550010000001231123456789");
    assert_eq!(key.check_digit(), 9);
    assert_eq!(key.year_month(), "2406");
    assert_eq!(key.series(), "001");
    assert_eq!(key.number(), "000000123");
}

#[test]
fn remainder_edge_cases() {
    for (code, digit) in [("00000006", 0), ("00000014", 0), ("00000005", 1)] {
        let key = AccessKey::generate(&fields("11222333000181", "1", "123", code)).unwrap();
        assert_eq!(key.check_digit(), digit, "random code {code}");
    }
}

#[test]
fn cpf_issuer_is_left_padded() {
    let key = AccessKey::generate(&fields("52998224725", "1", "1", "12345678")).unwrap();
    assert_eq!(key.tax_id(), "00052998224725");
}

#[test]
fn derivation_failures() {
    let bad_state = KeyFields {
        state_code: "99",
        ..fields("11222333000181", "1", "1", "12345678")
    };
    assert!(matches!(AccessKey::generate(&bad_state), Err(NfeError::Derivation(_))));

    let bad_time = KeyFields {
        issued_at: "15/06/2024",
        ..fields("11222333000181", "1", "1", "12345678")
    };
    assert!(matches!(AccessKey::generate(&bad_time), Err(NfeError::Derivation(_))));

    for f in [
        fields("11.222.333/0001-81", "1", "1", "12345678"),
        fields("112223330001810", "1", "1", "12345678"),
        fields("11222333000181", "1000", "1", "12345678"),
        fields("11222333000181", "1", "1234567890", "12345678"),
        fields("11222333000181", "1", "1", "1234567A"),
    ] {
        assert!(matches!(AccessKey::generate(&f), Err(NfeError::Derivation(_))));
    }
}

#[test]
fn parse_rejects_tampered_keys() {
    let key = "35240611222333000181550010000001231123456789";
    assert_eq!(AccessKey::parse(key).unwrap().as_str(), key);
    assert_eq!(
        AccessKey::parse("3524 0611 2223 3300 0181 5500 1000 0001 2311 2345 6789")
            .unwrap()
            .as_str(),
        key
    );

    assert!(matches!(
        AccessKey::parse("35240611222333000181550010000001231123456780"),
        Err(NfeError::BusinessRule { .. })
    ));
    assert!(matches!(AccessKey::parse(&key[..43]), Err(NfeError::Format { .. })));
    assert!(matches!(
        AccessKey::parse("99240611222333000181550010000001231123456789"),
        Err(NfeError::Format { .. })
    ));
}

proptest! {
    #[test]
    fn generation_is_deterministic(
        tax_id in "[0-9]{14}",
        series in 0u16..=999,
        number in 1u32..=999_999_999,
        code in "[0-9]{8}",
    ) {
        let series = series.to_string();
        let number = number.to_string();
        let a = AccessKey::generate(&fields(&tax_id, &series, &number, &code)).unwrap();
        let b = AccessKey::generate(&fields(&tax_id, &series, &number, &code)).unwrap();
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.as_str().len(), 44);
        prop_assert!(AccessKey::parse(a.as_str()).is_ok());
    }

    #[test]
    fn check_digit_matches_reference(body in "[0-9]{43}") {
        prop_assert_eq!(check_digit(&body).unwrap(), reference_digit(&body));
    }

    #[test]
    fn single_digit_change_is_detected(
        body in "[0-9]{43}",
        pos in 0usize..43,
        delta in 1u8..=9,
    ) {
        let original = check_digit(&body).unwrap();
        let mut bytes = body.into_bytes();
        bytes[pos] = b'0' + (bytes[pos] - b'0' + delta) % 10;
        let mutated = String::from_utf8(bytes).unwrap();
        let changed = check_digit(&mutated).unwrap();

        // Mod 11 catches every single-digit error except when both sides of
        // the change collapse into the 0/1 remainder bucket.
        if changed == original {
            let sum_class = |s: &str| {
                let mut w = 2u32;
                let mut sum = 0u32;
                for d in s.bytes().rev() {
                    sum += u32::from(d - b'0') * w;
                    w = if w == 9 { 2 } else { w + 1 };
                }
                sum % 11
            };
            let pair = (sum_class(&mutated), original);
            prop_assert!(matches!(pair, (0 | 1, 0)), "undetected change at {}", pos);
        }
    }
}

#[test]
fn single_digit_changes_are_mostly_detected() {
    let body = "3524061122233300018155001000000123112345678";
    let original = check_digit(body).unwrap();
    let mut detected = 0;
    let mut total = 0;
    for pos in 0..43 {
        for delta in 1..=9u8 {
            let mut bytes = body.as_bytes().to_vec();
            bytes[pos] = b'0' + (bytes[pos] - b'0' + delta) % 10;
            let mutated = std::str::from_utf8(&bytes).unwrap();
            total += 1;
            if check_digit(mutated).unwrap() != original {
                detected += 1;
            }
        }
    }
    assert!(detected * 100 / total >= 85, "{detected}/{total}");
}
