use nota::core::*;

#[test]
fn defaults() {
    let cfg = BuilderConfig::default();
    assert_eq!(cfg.environment, Environment::Homologation);
    assert_eq!(cfg.model, DocumentModel::Nfe);
    assert_eq!(cfg.emission_type, EmissionType::Normal);
    assert!(cfg.validate_gtin && cfg.remove_accents && cfg.round_values && cfg.auto_totals);
    assert!(cfg.app_version.starts_with("nota "));
}

#[test]
fn partial_json_falls_back_to_defaults() {
    let cfg: BuilderConfig = serde_json::from_str(
        r#"{ "environment": "Production", "model": "Nfce", "remove_accents": false }"#,
    )
    .unwrap();
    assert_eq!(cfg.environment, Environment::Production);
    assert_eq!(cfg.model, DocumentModel::Nfce);
    assert!(!cfg.remove_accents);
    assert!(cfg.validate_gtin);
    assert_eq!(cfg.app_version, BuilderConfig::default().app_version);
}

#[test]
fn json_round_trip() {
    let cfg = BuilderConfig::default()
        .with_emission_type(EmissionType::Offline)
        .with_auto_totals(false)
        .with_app_version("pdv 3.2");
    let json = serde_json::to_string(&cfg).unwrap();
    let back: BuilderConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, cfg);
}

#[test]
fn builder_exposes_live_config() {
    let builder = NfeBuilder::new(BuilderConfig::default().with_gtin_validation(false));
    assert!(!builder.config().validate_gtin);
    builder.set_gtin_validation(true);
    builder.set_auto_totals(false);
    let cfg = builder.config();
    assert!(cfg.validate_gtin);
    assert!(!cfg.auto_totals);
}

#[test]
fn built_document_serializes_to_json() {
    use rust_decimal_macros::dec;

    let builder = NfeBuilder::new(BuilderConfig::default().with_model(DocumentModel::Nfce));
    let mut ide = Identification::new(State::MG, "Venda", 2, 10, "3106200");
    ide.final_consumer = true;
    ide.presence = Presence::InPerson;
    builder.identification(ide).unwrap();
    builder
        .issuer(
            IssuerBuilder::new(
                TaxId::cnpj("11222333000181"),
                "Loja",
                AddressBuilder::new("Rua A", "1", "Centro", "3106200", "Belo Horizonte", State::MG)
                    .build(),
                "ISENTO",
            )
            .build(),
        )
        .unwrap();
    builder
        .add_item(
            ProductBuilder::new("1", "Servico", "00", "5933", "UN", dec!(1), dec!(50)).build(),
            Tax::default(),
        )
        .unwrap();
    builder.transport(Transport::new(FreightMode::NoFreight)).unwrap();
    let nfe = builder.build().unwrap();

    let json = serde_json::to_value(&nfe).unwrap();
    assert_eq!(json["access_key"]["key"], nfe.access_key.as_str());
    let back: Nfe = serde_json::from_value(json).unwrap();
    assert_eq!(back, nfe);
    assert_eq!(back.access_key.state_code(), "31");
}
