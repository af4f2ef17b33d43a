//! 44-digit access key (`chave de acesso`) derivation and parsing.
//!
//! Layout, every field zero-padded to its width:
//!
//! | field          | width |
//! |----------------|-------|
//! | state code     | 2     |
//! | issue YYMM     | 4     |
//! | issuer tax id  | 14    |
//! | model          | 2     |
//! | series         | 3     |
//! | number         | 9     |
//! | emission type  | 1     |
//! | random code    | 8     |
//! | check digit    | 1     |

use std::fmt;

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use super::error::NfeError;
use super::states::is_known_state_code;

/// Number of digits before the check digit.
pub const KEY_BODY_LEN: usize = 43;
/// Full key length.
pub const KEY_LEN: usize = 44;
/// Document-family prefix of the `Id` attribute.
pub const ID_PREFIX: &str = "NFe";

/// Raw, string-typed inputs of the generator.
///
/// Numeric fields are left-padded with zeros to their width; anything
/// non-numeric or wider than its field is a derivation failure.
#[derive(Debug, Clone, Copy)]
pub struct KeyFields<'a> {
    pub state_code: &'a str,
    /// RFC 3339 timestamp; only year and month are encoded.
    pub issued_at: &'a str,
    /// CNPJ, or CPF left-padded to 14 digits.
    pub tax_id: &'a str,
    pub model: &'a str,
    pub series: &'a str,
    pub number: &'a str,
    pub emission_type: &'a str,
    pub random_code: &'a str,
}

/// A derived or parsed access key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessKey {
    key: String,
}

impl AccessKey {
    /// Derive the key from its fields. Pure: equal inputs give equal keys.
    pub fn generate(fields: &KeyFields<'_>) -> Result<Self, NfeError> {
        if !is_known_state_code(fields.state_code) {
            return Err(NfeError::Derivation(format!(
                "unknown state code '{}'",
                fields.state_code
            )));
        }
        let issued = DateTime::parse_from_rfc3339(fields.issued_at).map_err(|e| {
            NfeError::Derivation(format!(
                "cannot parse issue timestamp '{}': {e}",
                fields.issued_at
            ))
        })?;

        let mut body = String::with_capacity(KEY_LEN);
        body.push_str(fields.state_code);
        body.push_str(&issued.format("%y%m").to_string());
        body.push_str(&pad("tax id", fields.tax_id, 14)?);
        body.push_str(&pad("model", fields.model, 2)?);
        body.push_str(&pad("series", fields.series, 3)?);
        body.push_str(&pad("number", fields.number, 9)?);
        body.push_str(&pad("emission type", fields.emission_type, 1)?);
        body.push_str(&pad("random code", fields.random_code, 8)?);

        let dv = check_digit(&body)?;
        body.push(char::from(b'0' + dv));
        Ok(Self { key: body })
    }

    /// Parse and verify an existing 44-digit key (spaces are ignored).
    pub fn parse(input: &str) -> Result<Self, NfeError> {
        let key: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        if key.len() != KEY_LEN || !key.bytes().all(|b| b.is_ascii_digit()) {
            return Err(NfeError::format(
                "access_key",
                format!("expected {KEY_LEN} digits, got '{input}'"),
            ));
        }
        if !is_known_state_code(&key[..2]) {
            return Err(NfeError::format(
                "access_key",
                format!("unknown state code '{}'", &key[..2]),
            ));
        }
        let expected = check_digit(&key[..KEY_BODY_LEN])?;
        let found = key.as_bytes()[KEY_BODY_LEN] - b'0';
        if expected != found {
            return Err(NfeError::business(
                "access_key",
                format!("check digit {found} does not match computed {expected}"),
            ));
        }
        Ok(Self { key })
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// `Id` attribute form: "NFe" + key.
    pub fn id_attribute(&self) -> String {
        format!("{ID_PREFIX}{}", self.key)
    }

    pub fn state_code(&self) -> &str {
        &self.key[0..2]
    }

    /// Issue year and month as "YYMM".
    pub fn year_month(&self) -> &str {
        &self.key[2..6]
    }

    pub fn tax_id(&self) -> &str {
        &self.key[6..20]
    }

    pub fn model(&self) -> &str {
        &self.key[20..22]
    }

    pub fn series(&self) -> &str {
        &self.key[22..25]
    }

    pub fn number(&self) -> &str {
        &self.key[25..34]
    }

    pub fn emission_type(&self) -> &str {
        &self.key[34..35]
    }

    pub fn random_code(&self) -> &str {
        &self.key[35..43]
    }

    pub fn check_digit(&self) -> u8 {
        self.key.as_bytes()[KEY_BODY_LEN] - b'0'
    }
}

impl fmt::Display for AccessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

/// Weighted modulo-11 check digit.
///
/// Digits are weighted 2..=9 from the rightmost one, wrapping back to 2.
/// `r = sum % 11`; the digit is 0 when `r` is 0 or 1, else `11 - r`.
pub fn check_digit(digits: &str) -> Result<u8, NfeError> {
    let mut sum: u32 = 0;
    let mut weight: u32 = 2;
    for c in digits.chars().rev() {
        let d = c
            .to_digit(10)
            .ok_or_else(|| NfeError::Derivation(format!("non-digit '{c}' in key body")))?;
        sum += d * weight;
        weight = if weight == 9 { 2 } else { weight + 1 };
    }
    let rem = sum % 11;
    Ok(if rem < 2 { 0 } else { (11 - rem) as u8 })
}

fn pad(name: &str, value: &str, width: usize) -> Result<String, NfeError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NfeError::Derivation(format!(
            "{name} '{value}' is not numeric"
        )));
    }
    if value.len() > width {
        return Err(NfeError::Derivation(format!(
            "{name} '{value}' exceeds {width} digits"
        )));
    }
    Ok(format!("{value:0>width$}"))
}
