//! # nota
//!
//! Assembly of Brazilian electronic fiscal documents: the NF-e full invoice
//! (model 55) and the NFC-e consumer receipt (model 65), layout 4.00.
//!
//! The crate covers the part of the issuing pipeline that has to be exact:
//! section-by-section validated assembly, the `ICMSTot` totals and the
//! 44-digit access key with its modulo-11 check digit. Tax-rule catalogs,
//! signing and submission to the authority are left to the caller.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! use nota::core::*;
//! use rust_decimal_macros::dec;
//!
//! let builder = NfeBuilder::new(BuilderConfig::default().with_model(DocumentModel::Nfce));
//!
//! let mut ide = Identification::new(State::SP, "Venda ao consumidor", 1, 7, "3550308");
//! ide.final_consumer = true;
//! ide.presence = Presence::InPerson;
//! builder.identification(ide).unwrap();
//!
//! let address = AddressBuilder::new("Rua Augusta", "500", "Consolação", "3550308", "São Paulo", State::SP).build();
//! builder
//!     .issuer(IssuerBuilder::new(TaxId::cnpj("11222333000181"), "Padaria Ltda", address, "123456789012")
//!         .regime(TaxRegime::SimplesNacional)
//!         .build())
//!     .unwrap();
//!
//! let pao = ProductBuilder::new("10", "Pão francês", "19059090", "5102", "KG", dec!(0.5), dec!(16.90)).build();
//! let tax = Tax { icms: Some(Icms::Sn102 { origin: 0, csosn: 102 }), ..Tax::default() };
//! builder.add_item(pao, tax).unwrap();
//! builder.transport(Transport::new(FreightMode::NoFreight)).unwrap();
//! builder.add_payment(Payment::new(PaymentMethod::Pix, dec!(8.45))).unwrap();
//!
//! let nfce = builder.build().unwrap();
//! assert_eq!(nfce.totals.grand_total, dec!(8.45));
//! assert_eq!(nfce.access_key.model(), "65");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Document model, builder, totals, access keys |
//! | `xml` (default) | NF-e 4.00 XML serialization |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "xml")]
pub mod xml;
