//! Per-section field validators.
//!
//! Each validator returns every finding (not just the first) so callers can
//! route them into the builder's error list; the builder's section calls
//! fail fast on the first one.

use rust_decimal::Decimal;

use super::error::ValidationError;
use super::gtin::{NO_GTIN, is_acceptable_gtin};
use super::tax_id::{TaxId, is_valid_cnpj, is_valid_cpf};
use super::types::*;

/// Highest `nItem` accepted by the authority.
pub const MAX_ITEMS: usize = 990;

/// Highest document number (9 digits).
pub const MAX_NUMBER: u32 = 999_999_999;

// ── field-group checks ──────────────────────────────────────────────────────

fn require(value: &str, field: &str, errors: &mut Vec<ValidationError>) -> bool {
    if value.trim().is_empty() {
        errors.push(ValidationError::missing(field));
        false
    } else {
        true
    }
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Exactly `width` ASCII digits.
fn check_fixed_digits(value: &str, width: usize, field: &str, errors: &mut Vec<ValidationError>) {
    if value.len() != width || !is_digits(value) {
        errors.push(ValidationError::format(
            field,
            format!("must be exactly {width} digits, got '{value}'"),
        ));
    }
}

fn check_one_of<T: PartialEq + std::fmt::Display>(
    value: T,
    allowed: &[T],
    field: &str,
    errors: &mut Vec<ValidationError>,
) {
    if !allowed.contains(&value) {
        errors.push(ValidationError::format(
            field,
            format!("'{value}' is not an accepted code"),
        ));
    }
}

fn check_non_negative(value: Decimal, field: &str, errors: &mut Vec<ValidationError>) {
    if value.is_sign_negative() && !value.is_zero() {
        errors.push(ValidationError::format(field, format!("must not be negative, got {value}")));
    }
}

fn check_max_chars(value: &str, max: usize, field: &str, errors: &mut Vec<ValidationError>) {
    if value.chars().count() > max {
        errors.push(ValidationError::format(
            field,
            format!("must not exceed {max} characters"),
        ));
    }
}

fn check_tax_id(tax_id: &TaxId, field: &str, errors: &mut Vec<ValidationError>) {
    match tax_id {
        TaxId::Cnpj(v) if v.is_empty() => errors.push(ValidationError::missing(field)),
        TaxId::Cpf(v) if v.is_empty() => errors.push(ValidationError::missing(field)),
        TaxId::Cnpj(v) if v.len() != 14 || !is_digits(v) => errors.push(ValidationError::format(
            field,
            format!("CNPJ must be 14 digits, got '{v}'"),
        )),
        TaxId::Cpf(v) if v.len() != 11 || !is_digits(v) => errors.push(ValidationError::format(
            field,
            format!("CPF must be 11 digits, got '{v}'"),
        )),
        TaxId::Cnpj(v) if !is_valid_cnpj(v) => errors.push(ValidationError::business(
            field,
            format!("CNPJ '{v}' has invalid check digits"),
        )),
        TaxId::Cpf(v) if !is_valid_cpf(v) => errors.push(ValidationError::business(
            field,
            format!("CPF '{v}' has invalid check digits"),
        )),
        TaxId::Foreign(v) => check_max_chars(v, 20, field, errors),
        _ => {}
    }
}

// ── sections ────────────────────────────────────────────────────────────────

/// Validate `ide`. Unresolved optional fields are skipped.
pub fn validate_identification(ide: &Identification) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    require(&ide.nature, "identification.nature", &mut errors);
    if ide.series > 999 {
        errors.push(ValidationError::format(
            "identification.series",
            format!("must be 0..=999, got {}", ide.series),
        ));
    }
    if ide.number == 0 || ide.number > MAX_NUMBER {
        errors.push(ValidationError::format(
            "identification.number",
            format!("must be 1..={MAX_NUMBER}, got {}", ide.number),
        ));
    }
    if require(&ide.city_code, "identification.city_code", &mut errors) {
        check_fixed_digits(&ide.city_code, 7, "identification.city_code", &mut errors);
    }
    if let Some(code) = &ide.random_code {
        check_fixed_digits(code, 8, "identification.random_code", &mut errors);
    }

    match (ide.emission_type, &ide.contingency) {
        (Some(t), None) if t != EmissionType::Normal => {
            errors.push(ValidationError::business(
                "identification.contingency",
                format!("emission type {} requires a contingency entry", t.code()),
            ));
        }
        (_, Some(c)) => {
            let len = c.justification.chars().count();
            if !(15..=256).contains(&len) {
                errors.push(ValidationError::format(
                    "identification.contingency.justification",
                    format!("must have 15 to 256 characters, got {len}"),
                ));
            }
        }
        _ => {}
    }

    if ide.model == Some(DocumentModel::Nfce) {
        if !ide.final_consumer {
            errors.push(ValidationError::business(
                "identification.final_consumer",
                "consumer receipts must be issued to a final consumer",
            ));
        }
        if !matches!(ide.presence, Presence::InPerson | Presence::Delivery) {
            errors.push(ValidationError::business(
                "identification.presence",
                "consumer receipts require in-person (1) or delivery (4) presence",
            ));
        }
        if ide.destination != Destination::Internal {
            errors.push(ValidationError::business(
                "identification.destination",
                "consumer receipts only cover internal operations",
            ));
        }
    }

    errors
}

fn validate_address(address: &Address, prefix: &str, errors: &mut Vec<ValidationError>) {
    require(&address.street, &format!("{prefix}.street"), errors);
    require(&address.number, &format!("{prefix}.number"), errors);
    require(&address.district, &format!("{prefix}.district"), errors);
    require(&address.city, &format!("{prefix}.city"), errors);
    let city_code = format!("{prefix}.city_code");
    if require(&address.city_code, &city_code, errors) {
        check_fixed_digits(&address.city_code, 7, &city_code, errors);
    }
    if let Some(cep) = &address.postal_code {
        check_fixed_digits(cep, 8, &format!("{prefix}.postal_code"), errors);
    }
    if let Some(country) = &address.country_code {
        check_fixed_digits(country, 4, &format!("{prefix}.country_code"), errors);
    }
    if let Some(phone) = &address.phone {
        if !(6..=14).contains(&phone.len()) || !is_digits(phone) {
            errors.push(ValidationError::format(
                format!("{prefix}.phone"),
                "must have 6 to 14 digits",
            ));
        }
    }
}

/// Validate `emit`.
pub fn validate_issuer(issuer: &Issuer) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if issuer.tax_id.is_blank() {
        errors.push(ValidationError::missing("issuer.tax_id"));
    } else if matches!(issuer.tax_id, TaxId::Foreign(_)) {
        errors.push(ValidationError::business(
            "issuer.tax_id",
            "issuer must be identified by CNPJ or CPF",
        ));
    } else {
        check_tax_id(&issuer.tax_id, "issuer.tax_id", &mut errors);
    }
    require(&issuer.name, "issuer.name", &mut errors);
    if require(&issuer.state_registration, "issuer.state_registration", &mut errors)
        && issuer.state_registration != "ISENTO"
        && (!(2..=14).contains(&issuer.state_registration.len())
            || !is_digits(&issuer.state_registration))
    {
        errors.push(ValidationError::format(
            "issuer.state_registration",
            "must be 2 to 14 digits or ISENTO",
        ));
    }
    validate_address(&issuer.address, "issuer.address", &mut errors);

    errors
}

/// Validate `dest`. Name/address requirements that depend on the model are
/// checked at build time.
pub fn validate_recipient(recipient: &Recipient) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if recipient.tax_id.is_blank() {
        errors.push(ValidationError::missing("recipient.tax_id"));
    } else {
        check_tax_id(&recipient.tax_id, "recipient.tax_id", &mut errors);
    }
    if recipient.ie_indicator == IeIndicator::Contributor
        && recipient.state_registration.as_deref().unwrap_or("").is_empty()
    {
        errors.push(ValidationError::business(
            "recipient.state_registration",
            "a contributor recipient (indIEDest 1) must carry its state registration",
        ));
    }
    if let Some(email) = &recipient.email {
        if !email.contains('@') {
            errors.push(ValidationError::format("recipient.email", "not an e-mail address"));
        }
    }
    if let Some(address) = &recipient.address {
        validate_address(address, "recipient.address", &mut errors);
    }

    errors
}

/// Validate `prod`.
pub fn validate_product(product: &Product, validate_gtin: bool) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    require(&product.code, "item.product.code", &mut errors);
    require(&product.description, "item.product.description", &mut errors);
    if require(&product.ncm, "item.product.ncm", &mut errors)
        && product.ncm != "00"
        && (product.ncm.len() != 8 || !is_digits(&product.ncm))
    {
        errors.push(ValidationError::format(
            "item.product.ncm",
            format!("must be 8 digits (or 00 for services), got '{}'", product.ncm),
        ));
    }
    if require(&product.cfop, "item.product.cfop", &mut errors) {
        check_fixed_digits(&product.cfop, 4, "item.product.cfop", &mut errors);
        if is_digits(&product.cfop)
            && !matches!(product.cfop.as_bytes()[0], b'1'..=b'3' | b'5'..=b'7')
        {
            errors.push(ValidationError::format(
                "item.product.cfop",
                format!("'{}' is not an operation code", product.cfop),
            ));
        }
    }
    if let Some(cest) = &product.cest {
        check_fixed_digits(cest, 7, "item.product.cest", &mut errors);
    }
    require(&product.unit, "item.product.unit", &mut errors);
    if product.quantity <= Decimal::ZERO {
        errors.push(ValidationError::format(
            "item.product.quantity",
            "must be greater than zero",
        ));
    }
    check_non_negative(product.unit_value, "item.product.unit_value", &mut errors);
    check_non_negative(product.total, "item.product.total", &mut errors);
    for (value, field) in [
        (product.freight, "item.product.freight"),
        (product.insurance, "item.product.insurance"),
        (product.discount, "item.product.discount"),
        (product.other, "item.product.other"),
        (product.tax_quantity, "item.product.tax_quantity"),
        (product.tax_unit_value, "item.product.tax_unit_value"),
    ] {
        if let Some(v) = value {
            check_non_negative(v, field, &mut errors);
        }
    }

    if validate_gtin {
        for (gtin, field) in [
            (&product.gtin, "item.product.gtin"),
            (&product.tax_gtin, "item.product.tax_gtin"),
        ] {
            let gtin = gtin.as_deref().unwrap_or(NO_GTIN);
            if !is_acceptable_gtin(gtin) {
                errors.push(ValidationError::business(
                    field,
                    format!("'{gtin}' is neither a valid GTIN nor '{NO_GTIN}'"),
                ));
            }
        }
    }

    errors
}

/// Validate `imposto` codes and enumerations.
pub fn validate_tax(tax: &Tax) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(icms) = &tax.icms {
        if icms.origin() > 8 {
            errors.push(ValidationError::format(
                "item.tax.icms.origin",
                format!("must be 0..=8, got {}", icms.origin()),
            ));
        }
        match icms {
            Icms::Cst40 { cst, .. } => {
                check_one_of(*cst, &[40, 41, 50], "item.tax.icms.cst", &mut errors)
            }
            Icms::Sn102 { csosn, .. } => check_one_of(
                *csosn,
                &[102, 103, 300, 400],
                "item.tax.icms.csosn",
                &mut errors,
            ),
            Icms::Sn202 { csosn, .. } => {
                check_one_of(*csosn, &[202, 203], "item.tax.icms.csosn", &mut errors)
            }
            _ => {}
        }
        if let Some(own) = icms.own() {
            check_one_of(own.base_mode, &[0, 1, 2, 3], "item.tax.icms.base_mode", &mut errors);
            check_non_negative(own.value, "item.tax.icms.value", &mut errors);
        }
        if let Some(st) = icms.st() {
            check_one_of(
                st.base_mode,
                &[0, 1, 2, 3, 4, 5, 6],
                "item.tax.icms.st.base_mode",
                &mut errors,
            );
            check_non_negative(st.value, "item.tax.icms.st.value", &mut errors);
        }
        if let Some(relief) = icms.relief() {
            check_one_of(
                relief.reason,
                &[1, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 16, 90],
                "item.tax.icms.relief.reason",
                &mut errors,
            );
        }
    }

    if let Some(ipi) = &tax.ipi {
        check_fixed_digits(&ipi.framing_code, 3, "item.tax.ipi.framing_code", &mut errors);
        match ipi.kind {
            IpiKind::Taxed { cst, value, .. } => {
                check_one_of(cst, &[0, 49, 50, 99], "item.tax.ipi.cst", &mut errors);
                check_non_negative(value, "item.tax.ipi.value", &mut errors);
            }
            IpiKind::NotTaxed { cst } => check_one_of(
                cst,
                &[1, 2, 3, 4, 5, 51, 52, 53, 54, 55],
                "item.tax.ipi.cst",
                &mut errors,
            ),
        }
    }

    for (contribution, field) in [(&tax.pis, "item.tax.pis"), (&tax.cofins, "item.tax.cofins")] {
        if let Some(c) = contribution {
            validate_contribution(c, field, &mut errors);
        }
    }

    errors
}

fn validate_contribution(c: &Contribution, field: &str, errors: &mut Vec<ValidationError>) {
    let ok = match (c.cst, &c.basis) {
        (1 | 2, Some(ContributionBasis::Rate { .. })) => true,
        (3, Some(ContributionBasis::Quantity { .. })) => true,
        (4..=9, None) => true,
        (49..=56 | 60..=67 | 70..=75 | 98 | 99, _) => true,
        _ => false,
    };
    if !ok {
        errors.push(ValidationError::format(
            format!("{field}.cst"),
            format!("CST {:02} does not match the supplied basis", c.cst),
        ));
    }
    check_non_negative(c.value, &format!("{field}.value"), errors);
}

/// Validate `transp`.
pub fn validate_transport(transport: &Transport) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(carrier) = &transport.carrier {
        if let Some(tax_id) = &carrier.tax_id {
            if matches!(tax_id, TaxId::Foreign(_)) {
                errors.push(ValidationError::business(
                    "transport.carrier.tax_id",
                    "carrier must be identified by CNPJ or CPF",
                ));
            } else {
                check_tax_id(tax_id, "transport.carrier.tax_id", &mut errors);
            }
        }
    }
    if let Some(vehicle) = &transport.vehicle {
        if vehicle.plate.len() != 7 || !vehicle.plate.bytes().all(|b| b.is_ascii_alphanumeric()) {
            errors.push(ValidationError::format(
                "transport.vehicle.plate",
                format!("must be 7 letters/digits, got '{}'", vehicle.plate),
            ));
        }
    }
    for (i, volume) in transport.volumes.iter().enumerate() {
        for (value, name) in [
            (volume.net_weight, "net_weight"),
            (volume.gross_weight, "gross_weight"),
        ] {
            if let Some(v) = value {
                check_non_negative(v, &format!("transport.volumes[{i}].{name}"), &mut errors);
            }
        }
    }

    errors
}

/// Validate one `detPag`.
pub fn validate_payment(payment: &Payment) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    check_non_negative(payment.amount, "payment.amount", &mut errors);
    if payment.method == PaymentMethod::Other
        && payment.description.as_deref().unwrap_or("").trim().is_empty()
    {
        errors.push(ValidationError::missing("payment.description"));
    }
    if payment.method == PaymentMethod::NoPayment && !payment.amount.is_zero() {
        errors.push(ValidationError::business(
            "payment.amount",
            "payment method 90 (no payment) must have a zero amount",
        ));
    }
    if let Some(card) = &payment.card {
        if !matches!(payment.method, PaymentMethod::CreditCard | PaymentMethod::DebitCard) {
            errors.push(ValidationError::business(
                "payment.card",
                "card data only applies to credit or debit card payments",
            ));
        }
        if let Some(cnpj) = &card.acquirer_cnpj {
            check_tax_id(&TaxId::Cnpj(cnpj.clone()), "payment.card.acquirer_cnpj", &mut errors);
        }
        if let Some(brand) = &card.brand {
            check_fixed_digits(brand, 2, "payment.card.brand", &mut errors);
        }
    }

    errors
}

/// Validate `infAdic`.
pub fn validate_additional_info(info: &AdditionalInfo) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if info.fiscal.is_none() && info.complementary.is_none() && info.observations.is_empty() {
        errors.push(ValidationError::missing("additional_info"));
    }
    if info.observations.len() > 10 {
        errors.push(ValidationError::format(
            "additional_info.observations",
            format!("at most 10 entries, got {}", info.observations.len()),
        ));
    }
    for (i, obs) in info.observations.iter().enumerate() {
        require(&obs.field, &format!("additional_info.observations[{i}].field"), &mut errors);
        require(&obs.text, &format!("additional_info.observations[{i}].text"), &mut errors);
    }

    errors
}

/// Validate caller-supplied totals.
pub fn validate_totals(totals: &Totals) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (value, field) in [
        (totals.products, "totals.products"),
        (totals.discount, "totals.discount"),
        (totals.freight, "totals.freight"),
        (totals.insurance, "totals.insurance"),
        (totals.other, "totals.other"),
        (totals.grand_total, "totals.grand_total"),
    ] {
        check_non_negative(value, field, &mut errors);
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use crate::core::states::State;
    use rust_decimal_macros::dec;

    fn address() -> Address {
        Address {
            street: "Avenida Paulista".into(),
            number: "1000".into(),
            complement: None,
            district: "Bela Vista".into(),
            city_code: "3550308".into(),
            city: "Sao Paulo".into(),
            state: State::SP,
            postal_code: Some("01310100".into()),
            country_code: Some("1058".into()),
            country: Some("BRASIL".into()),
            phone: None,
        }
    }

    fn issuer() -> Issuer {
        Issuer {
            tax_id: TaxId::Cnpj("11222333000181".into()),
            name: "Empresa Teste Ltda".into(),
            trade_name: None,
            address: address(),
            state_registration: "123456789012".into(),
            regime: TaxRegime::Normal,
        }
    }

    fn product() -> Product {
        Product {
            code: "001".into(),
            gtin: Some("7891000315507".into()),
            description: "Cafe torrado 500g".into(),
            ncm: "09012100".into(),
            cest: None,
            cfop: "5102".into(),
            unit: "UN".into(),
            quantity: dec!(2),
            unit_value: dec!(15),
            total: dec!(30),
            tax_gtin: None,
            tax_unit: None,
            tax_quantity: None,
            tax_unit_value: None,
            freight: None,
            insurance: None,
            discount: None,
            other: None,
            include_in_total: true,
            additional_info: None,
        }
    }

    #[test]
    fn valid_issuer() {
        assert!(validate_issuer(&issuer()).is_empty());
    }

    #[test]
    fn issuer_without_name_is_missing_field() {
        let mut i = issuer();
        i.name = "  ".into();
        let errors = validate_issuer(&i);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "issuer.name");
        assert_eq!(errors[0].kind, ErrorKind::MissingField);
    }

    #[test]
    fn issuer_rejects_bad_cnpj_and_foreign_id() {
        let mut i = issuer();
        i.tax_id = TaxId::Cnpj("11222333000182".into());
        assert_eq!(validate_issuer(&i)[0].kind, ErrorKind::BusinessRule);

        i.tax_id = TaxId::Cnpj("1122233300018".into());
        assert_eq!(validate_issuer(&i)[0].kind, ErrorKind::Format);

        i.tax_id = TaxId::Foreign("X123".into());
        assert_eq!(validate_issuer(&i)[0].kind, ErrorKind::BusinessRule);

        i.tax_id = TaxId::Cnpj(String::new());
        assert_eq!(validate_issuer(&i)[0].kind, ErrorKind::MissingField);
    }

    #[test]
    fn address_city_code_width() {
        let mut i = issuer();
        i.address.city_code = "355030".into();
        let errors = validate_issuer(&i);
        assert_eq!(errors[0].field, "issuer.address.city_code");
    }

    #[test]
    fn product_required_fields() {
        let mut p = product();
        p.code.clear();
        p.cfop.clear();
        let fields: Vec<_> = validate_product(&p, true).into_iter().map(|e| e.field).collect();
        assert_eq!(fields, ["item.product.code", "item.product.cfop"]);
    }

    #[test]
    fn product_ncm_and_cfop_format() {
        let mut p = product();
        p.ncm = "0901".into();
        p.cfop = "4102".into();
        let errors = validate_product(&p, true);
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.kind == ErrorKind::Format));

        let mut service = product();
        service.ncm = "00".into();
        assert!(validate_product(&service, true).is_empty());
    }

    #[test]
    fn gtin_checked_only_when_enabled() {
        let mut p = product();
        p.gtin = Some("7891000315508".into());
        assert_eq!(validate_product(&p, true)[0].kind, ErrorKind::BusinessRule);
        assert!(validate_product(&p, false).is_empty());

        p.gtin = None;
        assert!(validate_product(&p, true).is_empty());
    }

    #[test]
    fn contribution_cst_must_match_basis() {
        let tax = Tax {
            pis: Some(Contribution {
                cst: 1,
                basis: Some(ContributionBasis::Quantity {
                    quantity: dec!(1),
                    unit_rate: dec!(0.5),
                }),
                value: dec!(0.5),
            }),
            ..Tax::default()
        };
        let errors = validate_tax(&tax);
        assert_eq!(errors[0].field, "item.tax.pis.cst");
    }

    #[test]
    fn icms_enumerations() {
        let tax = Tax {
            icms: Some(Icms::Sn102 {
                origin: 9,
                csosn: 101,
            }),
            ..Tax::default()
        };
        assert_eq!(validate_tax(&tax).len(), 2);
    }

    #[test]
    fn consumer_receipt_rules() {
        let mut ide = Identification::new(State::SP, "VENDA", 1, 10, "3550308");
        ide.model = Some(DocumentModel::Nfce);
        let fields: Vec<_> = validate_identification(&ide)
            .into_iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(
            fields,
            ["identification.final_consumer", "identification.presence"]
        );
        ide.final_consumer = true;
        ide.presence = Presence::InPerson;
        assert!(validate_identification(&ide).is_empty());
    }

    #[test]
    fn contingency_required_outside_normal_emission() {
        let mut ide = Identification::new(State::SP, "VENDA", 1, 10, "3550308");
        ide.emission_type = Some(EmissionType::SvcAn);
        assert_eq!(
            validate_identification(&ide)[0].field,
            "identification.contingency"
        );
    }

    #[test]
    fn payment_other_requires_description() {
        let p = Payment::new(PaymentMethod::Other, dec!(10));
        assert_eq!(validate_payment(&p)[0].field, "payment.description");
    }

    #[test]
    fn empty_additional_info_is_missing() {
        let errors = validate_additional_info(&AdditionalInfo::default());
        assert_eq!(errors[0].kind, ErrorKind::MissingField);
    }
}
