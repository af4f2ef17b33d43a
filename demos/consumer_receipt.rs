//! Consumer receipt (model 65) from a Simples Nacional shop, paid by card
//! and cash, with change.

use nota::core::*;
use rust_decimal_macros::dec;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let builder = NfeBuilder::new(BuilderConfig::default().with_model(DocumentModel::Nfce));

    let mut ide = Identification::new(State::RS, "Venda ao consumidor", 3, 58_001, "4314902");
    ide.final_consumer = true;
    ide.presence = Presence::InPerson;
    ide.print_format = PrintFormat::ConsumerReceipt;
    builder.identification(ide).expect("identification should be valid");

    builder
        .issuer(
            IssuerBuilder::new(
                TaxId::cnpj("11222333000181"),
                "Padaria e Confeitaria Gaúcha Ltda",
                AddressBuilder::new(
                    "Rua dos Andradas",
                    "1200",
                    "Centro Histórico",
                    "4314902",
                    "Porto Alegre",
                    State::RS,
                )
                .build(),
                "0960001234",
            )
            .regime(TaxRegime::SimplesNacional)
            .build(),
        )
        .expect("issuer should be valid");

    let simples = Tax {
        icms: Some(Icms::Sn102 { origin: 0, csosn: 102 }),
        ..Tax::default()
    };
    for (code, description, ncm, unit, quantity, unit_value) in [
        ("001", "Pão francês", "19059090", "KG", dec!(0.750), dec!(18.90)),
        ("014", "Cuca de uva", "19059090", "UN", dec!(1), dec!(32.00)),
        ("102", "Café expresso", "21011110", "UN", dec!(2), dec!(7.50)),
    ] {
        let product =
            ProductBuilder::new(code, description, ncm, "5102", unit, quantity, unit_value).build();
        builder.add_item(product, simples.clone()).expect("item should be valid");
    }
    builder
        .transport(Transport::new(FreightMode::NoFreight))
        .expect("transport should be valid");

    builder
        .add_payment(Payment {
            card: Some(Card {
                integration: CardIntegration::NotIntegrated,
                acquirer_cnpj: None,
                brand: Some("02".into()),
                authorization: Some("204718".into()),
            }),
            ..Payment::new(PaymentMethod::DebitCard, dec!(40.00))
        })
        .expect("payment should be valid");
    builder
        .add_payment(Payment::new(PaymentMethod::Cash, dec!(25.00)))
        .expect("payment should be valid");

    let nfce = builder.build().expect("document should build");
    let paid: rust_decimal::Decimal = nfce.payments.iter().map(|p| p.amount).sum();
    builder
        .change(paid - nfce.totals.grand_total)
        .expect("change should be valid");

    // The change is recorded after the first build, so build again.
    let nfce = builder.build().expect("document should build");
    println!("Access key: {}", nfce.access_key);
    println!("Total:      {}", nfce.totals.grand_total);
    println!("Change:     {}", nfce.change.unwrap_or_default());
    println!();
    println!("{}", builder.xml().expect("serialization should succeed"));
}
