//! Brazilian federative units and their IBGE codes.
//!
//! The two-digit IBGE code opens every access key; the two-letter
//! abbreviation appears in addresses and vehicle plates.

use serde::{Deserialize, Serialize};

/// Federative unit (UF).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum State {
    RO,
    AC,
    AM,
    RR,
    PA,
    AP,
    TO,
    MA,
    PI,
    CE,
    RN,
    PB,
    PE,
    AL,
    SE,
    BA,
    MG,
    ES,
    RJ,
    SP,
    PR,
    SC,
    RS,
    MS,
    MT,
    GO,
    DF,
}

/// (abbreviation, IBGE code, state) sorted by abbreviation for binary search.
static STATES: &[(&str, u8, State)] = &[
    ("AC", 12, State::AC),
    ("AL", 27, State::AL),
    ("AM", 13, State::AM),
    ("AP", 16, State::AP),
    ("BA", 29, State::BA),
    ("CE", 23, State::CE),
    ("DF", 53, State::DF),
    ("ES", 32, State::ES),
    ("GO", 52, State::GO),
    ("MA", 21, State::MA),
    ("MG", 31, State::MG),
    ("MS", 50, State::MS),
    ("MT", 51, State::MT),
    ("PA", 15, State::PA),
    ("PB", 25, State::PB),
    ("PE", 26, State::PE),
    ("PI", 22, State::PI),
    ("PR", 41, State::PR),
    ("RJ", 33, State::RJ),
    ("RN", 24, State::RN),
    ("RO", 11, State::RO),
    ("RR", 14, State::RR),
    ("RS", 43, State::RS),
    ("SC", 42, State::SC),
    ("SE", 28, State::SE),
    ("SP", 35, State::SP),
    ("TO", 17, State::TO),
];

impl State {
    /// IBGE numeric code (e.g. 35 for SP).
    pub fn code(&self) -> u8 {
        STATES
            .iter()
            .find(|(_, _, s)| s == self)
            .map(|(_, c, _)| *c)
            .unwrap_or_default()
    }

    /// Two-letter abbreviation (e.g. "SP").
    pub fn abbreviation(&self) -> &'static str {
        STATES
            .iter()
            .find(|(_, _, s)| s == self)
            .map(|(a, _, _)| *a)
            .unwrap_or_default()
    }

    /// Parse from IBGE numeric code.
    pub fn from_code(code: u8) -> Option<Self> {
        STATES
            .iter()
            .find(|(_, c, _)| *c == code)
            .map(|(_, _, s)| *s)
    }

    /// Parse from the two-letter abbreviation (case-insensitive).
    pub fn from_abbreviation(abbreviation: &str) -> Option<Self> {
        let upper = abbreviation.trim().to_ascii_uppercase();
        STATES
            .binary_search_by(|(a, _, _)| a.cmp(&upper.as_str()))
            .ok()
            .map(|i| STATES[i].2)
    }
}

/// Check whether `code` is a recognized two-digit IBGE state code.
pub fn is_known_state_code(code: &str) -> bool {
    code.len() == 2
        && code
            .parse::<u8>()
            .ok()
            .and_then(State::from_code)
            .is_some()
}
