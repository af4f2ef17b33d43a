use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal_macros::dec;

use nota::core::*;
use nota::xml;

fn issuer() -> Issuer {
    IssuerBuilder::new(
        TaxId::cnpj("11222333000181"),
        "Benchmark Comércio Ltda",
        AddressBuilder::new(
            "Rua Vergueiro",
            "1",
            "Liberdade",
            "3550308",
            "São Paulo",
            State::SP,
        )
        .build(),
        "123456789012",
    )
    .build()
}

fn recipient() -> Recipient {
    RecipientBuilder::new(TaxId::cnpj("08530528000184"))
        .name("Cliente Atacadista")
        .address(
            AddressBuilder::new(
                "Avenida Brasil",
                "500",
                "Centro",
                "3304557",
                "Rio de Janeiro",
                State::RJ,
            )
            .build(),
        )
        .contributor("12345678")
        .build()
}

fn icms(total: rust_decimal::Decimal) -> Tax {
    Tax {
        icms: Some(Icms::Cst00 {
            origin: 0,
            own: IcmsOwn {
                base_mode: 3,
                base: total,
                rate: dec!(12),
                value: total * dec!(0.12),
            },
        }),
        ..Tax::default()
    }
}

fn builder_with_items(n: usize) -> NfeBuilder {
    let builder = NfeBuilder::default();
    let mut ide = Identification::new(State::SP, "Venda de mercadoria", 1, 1, "3550308");
    ide.destination = Destination::Interstate;
    builder.identification(ide).unwrap();
    builder.issuer(issuer()).unwrap();
    builder.recipient(recipient()).unwrap();
    for i in 1..=n {
        let p = ProductBuilder::new(
            i.to_string(),
            format!("Produto número {i}"),
            "61091000",
            "6102",
            "UN",
            dec!(3),
            dec!(19.99),
        )
        .build();
        let tax = icms(p.total);
        builder.add_item(p, tax).unwrap();
    }
    builder.transport(Transport::new(FreightMode::Recipient)).unwrap();
    builder
}

fn bench_access_key(c: &mut Criterion) {
    let fields = KeyFields {
        state_code: "35",
        issued_at: "2024-06-15T10:30:00-03:00",
        tax_id: "11222333000181",
        model: "55",
        series: "1",
        number: "123",
        emission_type: "1",
        random_code: "12345678",
    };
    c.bench_function("access_key_generate", |b| {
        b.iter(|| black_box(AccessKey::generate(black_box(&fields))));
    });
    c.bench_function("access_key_parse", |b| {
        b.iter(|| {
            black_box(AccessKey::parse(black_box(
                "35240611222333000181550010000001231123456789",
            )))
        });
    });
}

fn bench_normalize(c: &mut Criterion) {
    let text = "  Distribuição de Peças e Acessórios   Automotivos São João  ";
    c.bench_function("clean_text_strip_accents", |b| {
        b.iter(|| black_box(clean_text(black_box(text), 60, true)));
    });
}

fn bench_assembly(c: &mut Criterion) {
    c.bench_function("assemble_10_items", |b| {
        b.iter(|| black_box(builder_with_items(10).build()));
    });
    c.bench_function("assemble_990_items", |b| {
        b.iter(|| black_box(builder_with_items(990).build()));
    });
}

fn bench_xml(c: &mut Criterion) {
    let nfe = builder_with_items(50).build().unwrap();
    c.bench_function("xml_serialize_50_items", |b| {
        b.iter(|| black_box(xml::to_xml(black_box(&nfe))));
    });
}

criterion_group!(
    benches,
    bench_access_key,
    bench_normalize,
    bench_assembly,
    bench_xml,
);
criterion_main!(benches);
