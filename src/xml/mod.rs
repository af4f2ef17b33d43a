//! NF-e 4.00 XML serialization.
//!
//! # Example
//!
//! ```no_run
//! use nota::core::*;
//!
//! let builder = NfeBuilder::default();
//! // ... identification, issuer, recipient, items, transport ...
//! builder.build().unwrap();
//! let xml = builder.xml().unwrap();
//! assert!(xml.starts_with("<?xml"));
//! ```

mod nfe;
pub(crate) mod xml_utils;

pub use nfe::to_xml;

/// Schema namespace of the `NFe` root element.
pub const NFE_NAMESPACE: &str = "http://www.portalfiscal.inf.br/nfe";

/// `procEmi` value for documents issued by the taxpayer's own application.
pub const PROCESS_OWN_APPLICATION: u8 = 0;
