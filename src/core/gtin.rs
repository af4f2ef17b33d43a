//! GS1 GTIN (barcode) validation.

/// Literal accepted in place of a barcode for products without one.
pub const NO_GTIN: &str = "SEM GTIN";

/// Check a GTIN-8/12/13/14 by its GS1 mod-10 check digit.
pub fn is_valid_gtin(gtin: &str) -> bool {
    if !matches!(gtin.len(), 8 | 12 | 13 | 14) {
        return false;
    }
    let Some(digits) = gtin
        .chars()
        .map(|c| c.to_digit(10))
        .collect::<Option<Vec<u32>>>()
    else {
        return false;
    };
    let (body, check) = digits.split_at(digits.len() - 1);
    // Weights alternate 3,1,3,... starting from the digit left of the check digit.
    let sum: u32 = body
        .iter()
        .rev()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { d * 3 } else { *d })
        .sum();
    (10 - sum % 10) % 10 == check[0]
}

/// A GTIN field is acceptable if it is the sentinel or a valid barcode.
pub fn is_acceptable_gtin(gtin: &str) -> bool {
    gtin == NO_GTIN || is_valid_gtin(gtin)
}
