//! CNPJ / CPF check-digit verification.

use serde::{Deserialize, Serialize};

use super::normalize::strip_mask;

/// Taxpayer identifier of an issuer, recipient or carrier.
///
/// Exactly one form is present by construction. `Foreign` is only accepted
/// for recipients.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxId {
    /// 14-digit legal-entity id.
    Cnpj(String),
    /// 11-digit individual id.
    Cpf(String),
    /// Foreign buyer id (`idEstrangeiro`), may be empty.
    Foreign(String),
}

impl TaxId {
    /// Build from user input, stripping punctuation masks.
    pub fn cnpj(value: &str) -> Self {
        Self::Cnpj(strip_mask(value))
    }

    pub fn cpf(value: &str) -> Self {
        Self::Cpf(strip_mask(value))
    }

    pub fn foreign(value: impl Into<String>) -> Self {
        Self::Foreign(value.into())
    }

    /// XML element name carrying the identifier.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Cnpj(_) => "CNPJ",
            Self::Cpf(_) => "CPF",
            Self::Foreign(_) => "idEstrangeiro",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Cnpj(v) | Self::Cpf(v) | Self::Foreign(v) => v,
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Self::Foreign(_) => false,
            _ => self.value().trim().is_empty(),
        }
    }
}

/// Modulo-11 digit over `digits` with the given weights (left to right).
fn mod11_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    let rem = sum % 11;
    if rem < 2 { 0 } else { 11 - rem }
}

fn to_digits(value: &str, len: usize) -> Option<Vec<u32>> {
    if value.len() != len {
        return None;
    }
    value.chars().map(|c| c.to_digit(10)).collect()
}

/// Validate a 14-digit CNPJ including both check digits.
pub fn is_valid_cnpj(cnpj: &str) -> bool {
    let Some(d) = to_digits(cnpj, 14) else {
        return false;
    };
    if d.iter().all(|x| *x == d[0]) {
        return false;
    }
    const W1: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
    const W2: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
    mod11_digit(&d[..12], &W1) == d[12] && mod11_digit(&d[..13], &W2) == d[13]
}

/// Validate an 11-digit CPF including both check digits.
pub fn is_valid_cpf(cpf: &str) -> bool {
    let Some(d) = to_digits(cpf, 11) else {
        return false;
    };
    if d.iter().all(|x| *x == d[0]) {
        return false;
    }
    let w1: Vec<u32> = (2..=10).rev().collect();
    let w2: Vec<u32> = (2..=11).rev().collect();
    mod11_digit(&d[..9], &w1) == d[9] && mod11_digit(&d[..10], &w2) == d[10]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cnpj_check_digits() {
        assert!(is_valid_cnpj("11222333000181"));
        assert!(is_valid_cnpj("08530528000184"));
        assert!(!is_valid_cnpj("11222333000182"));
        assert!(!is_valid_cnpj("11111111111111"));
        assert!(!is_valid_cnpj("1122233300018"));
        assert!(!is_valid_cnpj("1122233300018A"));
    }

    #[test]
    fn cpf_check_digits() {
        assert!(is_valid_cpf("52998224725"));
        assert!(!is_valid_cpf("52998224726"));
        assert!(!is_valid_cpf("00000000000"));
        assert!(!is_valid_cpf("5299822472"));
    }

    #[test]
    fn masks_are_stripped() {
        assert_eq!(TaxId::cnpj("11.222.333/0001-81"), TaxId::Cnpj("11222333000181".into()));
        assert_eq!(TaxId::cpf("529.982.247-25"), TaxId::Cpf("52998224725".into()));
        assert_eq!(TaxId::cpf("529.982.247-25").tag(), "CPF");
    }
}
