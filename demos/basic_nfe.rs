//! Full invoice (model 55) between two companies.
//!
//! Run with `RUST_LOG=nota=debug cargo run --example basic_nfe` to see the
//! builder's section log.

use nota::core::*;
use rust_decimal_macros::dec;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let builder = NfeBuilder::new(BuilderConfig::default().with_app_version("demo 1.0"));

    let mut ide =
        Identification::new(State::SP, "Venda de mercadoria adquirida", 1, 1024, "3550308");
    ide.destination = Destination::Interstate;
    builder.identification(ide).expect("identification should be valid");

    builder
        .issuer(
            IssuerBuilder::new(
                TaxId::cnpj("11.222.333/0001-81"),
                "Distribuidora Paulista de Alimentos Ltda",
                AddressBuilder::new(
                    "Rua do Gasômetro",
                    "215",
                    "Brás",
                    "3550308",
                    "São Paulo",
                    State::SP,
                )
                .postal_code("03004-000")
                .phone("(11) 3228-1000")
                .build(),
                "123.456.789.012",
            )
            .trade_name("Distribuidora Paulista")
            .build(),
        )
        .expect("issuer should be valid");

    builder
        .recipient(
            RecipientBuilder::new(TaxId::cnpj("08.530.528/0001-84"))
                .name("Supermercado Mineiro S.A.")
                .address(
                    AddressBuilder::new(
                        "Avenida Amazonas",
                        "3000",
                        "Prado",
                        "3106200",
                        "Belo Horizonte",
                        State::MG,
                    )
                    .postal_code("30411-186")
                    .build(),
                )
                .contributor("0623079040081")
                .email("fiscal@supermineiro.com.br")
                .build(),
        )
        .expect("recipient should be valid");

    let items = [
        ("7891000315507", "Café torrado e moído 500g", "09012100", dec!(120), dec!(14.90)),
        ("4006381333931", "Açúcar cristal 5kg", "17019900", dec!(80), dec!(21.50)),
    ];
    for (gtin, description, ncm, quantity, unit_value) in items {
        let product =
            ProductBuilder::new(gtin, description, ncm, "6102", "UN", quantity, unit_value)
                .gtin(gtin)
                .build();
        let icms_interstate = |p: &Product| -> Result<Tax, NfeError> {
            let value = p.total * dec!(0.12);
            Ok(Tax {
                icms: Some(Icms::Cst00 {
                    origin: 0,
                    own: IcmsOwn {
                        base_mode: 3,
                        base: p.total,
                        rate: dec!(12),
                        value,
                    },
                }),
                pis: Some(Contribution {
                    cst: 1,
                    basis: Some(ContributionBasis::Rate {
                        base: p.total,
                        rate: dec!(1.65),
                    }),
                    value: p.total * dec!(0.0165),
                }),
                cofins: Some(Contribution {
                    cst: 1,
                    basis: Some(ContributionBasis::Rate {
                        base: p.total,
                        rate: dec!(7.6),
                    }),
                    value: p.total * dec!(0.076),
                }),
                ..Tax::default()
            })
        };
        builder
            .add_item_with(product, &icms_interstate)
            .expect("item should be valid");
    }

    let mut transport = Transport::new(FreightMode::Issuer);
    transport.volumes.push(Volume {
        quantity: Some(10),
        species: Some("Caixa".into()),
        gross_weight: Some(dec!(1000.5)),
        ..Volume::default()
    });
    builder.transport(transport).expect("transport should be valid");
    builder
        .add_payment(Payment::new(PaymentMethod::BankSlip, dec!(3508.00)))
        .expect("payment should be valid");
    builder
        .additional_info(AdditionalInfo {
            complementary: Some("Pedido de compra 88412".into()),
            ..AdditionalInfo::default()
        })
        .expect("additional info should be valid");

    let nfe = builder.build().expect("document should build");
    println!("Access key: {}", nfe.access_key);
    println!("Items:      {}", nfe.items.len());
    println!("Products:   {}", nfe.totals.products);
    println!("ICMS:       {}", nfe.totals.icms_value);
    println!("Total:      {}", nfe.totals.grand_total);
    println!();
    println!("{}", builder.xml().expect("serialization should succeed"));
}
