use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use rust_decimal::Decimal;
use std::io::Cursor;

use crate::core::{NfeError, format_money, format_quantity, format_unit_value};

pub type XmlResult = Result<String, NfeError>;

fn xml_io(e: std::io::Error) -> NfeError {
    NfeError::Xml(format!("write error: {e}"))
}

/// Thin event writer over `quick_xml`. Output is compact: the authority
/// signs and hashes the exact byte stream, so no indentation is added.
pub struct XmlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlWriter {
    pub fn new() -> Result<Self, NfeError> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_io)?;
        Ok(Self { writer })
    }

    pub fn into_string(self) -> Result<String, NfeError> {
        let buf = self.writer.into_inner().into_inner();
        String::from_utf8(buf).map_err(|e| NfeError::Xml(format!("UTF-8 error: {e}")))
    }

    pub fn start_element(&mut self, name: &str) -> Result<&mut Self, NfeError> {
        self.writer
            .write_event(Event::Start(BytesStart::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn start_element_with_attrs(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, NfeError> {
        let mut elem = BytesStart::new(name);
        for (k, v) in attrs {
            elem.push_attribute((*k, *v));
        }
        self.writer
            .write_event(Event::Start(elem))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn end_element(&mut self, name: &str) -> Result<&mut Self, NfeError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn text_element(&mut self, name: &str, text: &str) -> Result<&mut Self, NfeError> {
        self.start_element(name)?;
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_io)?;
        self.end_element(name)
    }

    /// Write `name` only when `text` is present.
    pub fn opt_text_element(
        &mut self,
        name: &str,
        text: Option<&str>,
    ) -> Result<&mut Self, NfeError> {
        match text {
            Some(t) => self.text_element(name, t),
            None => Ok(self),
        }
    }

    /// Integer-coded field (`tpNF`, `CRT`, ...).
    pub fn code_element(&mut self, name: &str, code: impl ToString) -> Result<&mut Self, NfeError> {
        self.text_element(name, &code.to_string())
    }

    /// Monetary value, 2 decimal places.
    pub fn money_element(&mut self, name: &str, value: Decimal) -> Result<&mut Self, NfeError> {
        self.text_element(name, &format_money(value))
    }

    pub fn opt_money_element(
        &mut self,
        name: &str,
        value: Option<Decimal>,
    ) -> Result<&mut Self, NfeError> {
        match value {
            Some(v) => self.money_element(name, v),
            None => Ok(self),
        }
    }

    /// Quantity or percentage rate, 4 decimal places.
    pub fn quantity_element(&mut self, name: &str, value: Decimal) -> Result<&mut Self, NfeError> {
        self.text_element(name, &format_quantity(value))
    }

    pub fn opt_quantity_element(
        &mut self,
        name: &str,
        value: Option<Decimal>,
    ) -> Result<&mut Self, NfeError> {
        match value {
            Some(v) => self.quantity_element(name, v),
            None => Ok(self),
        }
    }

    /// Unit value, 10 decimal places.
    pub fn unit_value_element(
        &mut self,
        name: &str,
        value: Decimal,
    ) -> Result<&mut Self, NfeError> {
        self.text_element(name, &format_unit_value(value))
    }
}
