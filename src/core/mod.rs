//! Document model, builder, totals and access keys.
//!
//! Everything needed to assemble an NF-e (model 55) or NFC-e (model 65)
//! without touching the wire format lives here; serialization is in
//! [`crate::xml`].

pub mod access_key;
mod builder;
mod config;
mod error;
pub mod gtin;
mod normalize;
pub mod states;
pub mod tax_id;
mod totalizer;
mod types;
mod validation;

pub use access_key::{AccessKey, KeyFields, check_digit};
pub use builder::*;
pub use config::*;
pub use error::*;
pub use gtin::{NO_GTIN, is_acceptable_gtin, is_valid_gtin};
pub use normalize::*;
pub use states::{State, is_known_state_code};
pub use tax_id::{TaxId, is_valid_cnpj, is_valid_cpf};
pub use totalizer::*;
pub use types::*;
pub use validation::*;
