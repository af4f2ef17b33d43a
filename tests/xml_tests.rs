#![cfg(feature = "xml")]

use chrono::{FixedOffset, TimeZone};
use nota::core::*;
use nota::xml::{NFE_NAMESPACE, to_xml};
use quick_xml::Reader;
use quick_xml::events::Event;
use rust_decimal_macros::dec;

fn address() -> Address {
    AddressBuilder::new(
        "Rua da Consolação",
        "2000",
        "Consolação",
        "3550308",
        "São Paulo",
        State::SP,
    )
    .postal_code("01302-001")
    .build()
}

fn builder(config: BuilderConfig) -> NfeBuilder {
    let b = NfeBuilder::new(config);
    let mut ide = Identification::new(State::SP, "Venda de mercadoria", 1, 123, "3550308");
    ide.random_code = Some("12345678".into());
    ide.issued_at = Some(
        FixedOffset::west_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 15, 10, 30, 0)
            .unwrap(),
    );
    b.identification(ide).unwrap();
    b.issuer(
        IssuerBuilder::new(
            TaxId::cnpj("11222333000181"),
            "Distribuidora & Cia Ltda",
            address(),
            "123456789012",
        )
        .build(),
    )
    .unwrap();
    b.recipient(
        RecipientBuilder::new(TaxId::cnpj("08530528000184"))
            .name("Mercado Bom Preço")
            .address(address())
            .contributor("987654321098")
            .build(),
    )
    .unwrap();

    let tax = Tax {
        icms: Some(Icms::Cst00 {
            origin: 0,
            own: IcmsOwn {
                base_mode: 3,
                base: dec!(100),
                rate: dec!(18),
                value: dec!(18),
            },
        }),
        pis: Some(Contribution {
            cst: 1,
            basis: Some(ContributionBasis::Rate {
                base: dec!(100),
                rate: dec!(1.65),
            }),
            value: dec!(1.65),
        }),
        cofins: Some(Contribution {
            cst: 1,
            basis: Some(ContributionBasis::Rate {
                base: dec!(100),
                rate: dec!(7.6),
            }),
            value: dec!(7.60),
        }),
        ..Tax::default()
    };
    b.add_item(
        ProductBuilder::new("A1", "Óleo de soja 900ml", "15079011", "5102", "CX", dec!(4), dec!(25))
            .gtin("7891000315507")
            .discount(dec!(10))
            .freight(dec!(5))
            .build(),
        tax,
    )
    .unwrap();
    b.transport(Transport::new(FreightMode::Issuer)).unwrap();
    b
}

/// Text content of every element called `name`, in document order.
fn texts(xml: &str, name: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut out = Vec::new();
    let mut inside = false;
    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) if e.name().as_ref() == name.as_bytes() => inside = true,
            Event::End(e) if e.name().as_ref() == name.as_bytes() => inside = false,
            Event::Text(t) if inside => out.push(t.unescape().unwrap().into_owned()),
            Event::Eof => break,
            _ => {}
        }
    }
    out
}

#[test]
fn xml_before_build_is_an_error() {
    let b = builder(BuilderConfig::default());
    assert_eq!(b.xml().unwrap_err(), NfeError::NotBuilt);
}

#[test]
fn root_and_identifier() {
    let b = builder(BuilderConfig::default());
    b.build().unwrap();
    let xml = b.xml().unwrap();

    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains(&format!("<NFe xmlns=\"{NFE_NAMESPACE}\">")));
    assert!(xml.contains(
        "<infNFe versao=\"4.00\" Id=\"NFe35240611222333000181550010000001231123456789\">"
    ));
    assert_eq!(texts(&xml, "cNF"), ["12345678"]);
    assert_eq!(texts(&xml, "cDV"), ["9"]);
    assert_eq!(texts(&xml, "dhEmi"), ["2024-06-15T10:30:00-03:00"]);
    assert_eq!(texts(&xml, "tpAmb"), ["2"]);
    assert!(xml.ends_with("</infNFe></NFe>"));
}

#[test]
fn fixed_decimal_fields() {
    let b = builder(BuilderConfig::default());
    b.build().unwrap();
    let xml = b.xml().unwrap();

    assert_eq!(texts(&xml, "qCom"), ["4.0000"]);
    assert_eq!(texts(&xml, "vUnCom"), ["25.0000000000"]);
    assert_eq!(texts(&xml, "vProd"), ["100.00", "100.00"]);
    assert_eq!(texts(&xml, "vNF"), ["95.00"]);
    assert_eq!(texts(&xml, "vPIS"), ["1.65", "1.65"]);
    assert_eq!(texts(&xml, "pCOFINS"), ["7.6000"]);
}

#[test]
fn text_is_normalized_and_escaped() {
    let b = builder(BuilderConfig::default());
    b.build().unwrap();
    let xml = b.xml().unwrap();

    assert!(xml.contains("<xNome>Distribuidora &amp; Cia Ltda</xNome>"));
    assert_eq!(texts(&xml, "xProd"), ["Oleo de soja 900ml"]);
    assert_eq!(
        texts(&xml, "xNome"),
        ["Distribuidora & Cia Ltda", HOMOLOGATION_RECIPIENT_NAME]
    );
}

#[test]
fn sections_in_schema_order() {
    let b = builder(BuilderConfig::default());
    b.additional_info(AdditionalInfo {
        complementary: Some("Pedido 4471".into()),
        ..AdditionalInfo::default()
    })
    .unwrap();
    b.build().unwrap();
    let xml = b.xml().unwrap();

    let order = [
        "<ide>",
        "<emit>",
        "<dest>",
        "<det nItem=\"1\">",
        "<total>",
        "<transp>",
        "<pag>",
        "<infAdic>",
    ];
    let positions: Vec<usize> = order.iter().map(|tag| xml.find(tag).unwrap()).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
}

#[test]
fn missing_payments_serialize_as_no_payment() {
    let b = builder(BuilderConfig::default());
    b.build().unwrap();
    let xml = b.xml().unwrap();
    assert!(xml.contains("<pag><detPag><tPag>90</tPag><vPag>0.00</vPag></detPag></pag>"));
}

#[test]
fn serialization_is_cached_until_rebuild() {
    let b = builder(BuilderConfig::default());
    b.build().unwrap();
    let first = b.xml().unwrap();
    let second = b.xml().unwrap();
    assert_eq!(first, second);

    // Mutations after a build do not touch the cached document.
    b.add_item(
        ProductBuilder::new("B2", "Arroz 5kg", "10063021", "5102", "UN", dec!(1), dec!(30)).build(),
        Tax::default(),
    )
    .unwrap();
    assert_eq!(b.xml().unwrap(), first);

    b.build().unwrap();
    let rebuilt = b.xml().unwrap();
    assert_ne!(rebuilt, first);
    assert!(rebuilt.contains("<det nItem=\"2\">"));
    assert_eq!(texts(&rebuilt, "vNF"), ["125.00"]);
}

#[test]
fn to_xml_matches_builder_output() {
    let b = builder(BuilderConfig::default().with_environment(Environment::Production));
    let nfe = b.build().unwrap();
    assert_eq!(to_xml(&nfe).unwrap(), b.xml().unwrap());
    assert_eq!(texts(&b.xml().unwrap(), "xNome")[1], "Mercado Bom Preco");
}

#[test]
fn well_formed_output() {
    let b = builder(BuilderConfig::default());
    b.add_payment(Payment {
        card: Some(Card {
            integration: CardIntegration::Integrated,
            acquirer_cnpj: Some("08.530.528/0001-84".into()),
            brand: Some("01".into()),
            authorization: Some("A1B2C3".into()),
        }),
        ..Payment::new(PaymentMethod::CreditCard, dec!(95))
    })
    .unwrap();
    b.build().unwrap();
    let xml = b.xml().unwrap();

    let mut reader = Reader::from_str(&xml);
    let mut depth = 0i32;
    loop {
        match reader.read_event().unwrap() {
            Event::Start(_) => depth += 1,
            Event::End(_) => depth -= 1,
            Event::Eof => break,
            _ => {}
        }
        assert!(depth >= 0);
    }
    assert_eq!(depth, 0);
    assert_eq!(texts(&xml, "CNPJ").last().map(String::as_str), Some("08530528000184"));
}
