use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;

use super::xml_utils::{XmlResult, XmlWriter};
use super::{NFE_NAMESPACE, PROCESS_OWN_APPLICATION};
use crate::core::*;

fn timestamp(dt: &DateTime<FixedOffset>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

/// Serialize a built document into the NF-e 4.00 layout.
///
/// The output is unsigned; signing and submission happen downstream.
pub fn to_xml(nfe: &Nfe) -> XmlResult {
    let mut w = XmlWriter::new()?;
    let id = nfe.id();

    w.start_element_with_attrs("NFe", &[("xmlns", NFE_NAMESPACE)])?;
    w.start_element_with_attrs("infNFe", &[("versao", LAYOUT_VERSION), ("Id", &id)])?;

    write_identification(&mut w, &nfe.identification, &nfe.access_key)?;
    write_issuer(&mut w, &nfe.issuer)?;
    if let Some(r) = &nfe.recipient {
        write_recipient(&mut w, r)?;
    }
    for item in &nfe.items {
        write_item(&mut w, item)?;
    }
    write_totals(&mut w, &nfe.totals)?;
    write_transport(&mut w, &nfe.transport)?;
    write_payments(&mut w, &nfe.payments, nfe.change)?;
    if let Some(info) = &nfe.additional_info {
        write_additional_info(&mut w, info)?;
    }

    w.end_element("infNFe")?;
    w.end_element("NFe")?;
    w.into_string()
}

fn write_identification(
    w: &mut XmlWriter,
    ide: &Identification,
    key: &AccessKey,
) -> Result<(), NfeError> {
    // The key is authoritative for every field it encodes.
    let issued_at = ide
        .issued_at
        .as_ref()
        .ok_or_else(|| NfeError::Xml("identification has no issue timestamp".into()))?;
    let environment = ide
        .environment
        .ok_or_else(|| NfeError::Xml("identification has no environment".into()))?;

    w.start_element("ide")?;
    w.text_element("cUF", key.state_code())?;
    w.text_element("cNF", key.random_code())?;
    w.text_element("natOp", &ide.nature)?;
    w.text_element("mod", key.model())?;
    w.code_element("serie", ide.series)?;
    w.code_element("nNF", ide.number)?;
    w.text_element("dhEmi", &timestamp(issued_at))?;
    if let Some(departed) = &ide.departed_at {
        w.text_element("dhSaiEnt", &timestamp(departed))?;
    }
    w.code_element("tpNF", ide.operation.code())?;
    w.code_element("idDest", ide.destination.code())?;
    w.text_element("cMunFG", &ide.city_code)?;
    w.code_element("tpImp", ide.print_format.code())?;
    w.text_element("tpEmis", key.emission_type())?;
    w.code_element("cDV", key.check_digit())?;
    w.code_element("tpAmb", environment.code())?;
    w.code_element("finNFe", ide.purpose.code())?;
    w.code_element("indFinal", u8::from(ide.final_consumer))?;
    w.code_element("indPres", ide.presence.code())?;
    w.code_element("procEmi", PROCESS_OWN_APPLICATION)?;
    w.text_element("verProc", ide.app_version.as_deref().unwrap_or_default())?;
    if let Some(c) = &ide.contingency {
        w.text_element("dhCont", &timestamp(&c.entered_at))?;
        w.text_element("xJust", &c.justification)?;
    }
    w.end_element("ide")?;
    Ok(())
}

fn write_address(w: &mut XmlWriter, tag: &str, a: &Address) -> Result<(), NfeError> {
    w.start_element(tag)?;
    w.text_element("xLgr", &a.street)?;
    w.text_element("nro", &a.number)?;
    w.opt_text_element("xCpl", a.complement.as_deref())?;
    w.text_element("xBairro", &a.district)?;
    w.text_element("cMun", &a.city_code)?;
    w.text_element("xMun", &a.city)?;
    w.text_element("UF", a.state.abbreviation())?;
    w.opt_text_element("CEP", a.postal_code.as_deref())?;
    w.opt_text_element("cPais", a.country_code.as_deref())?;
    w.opt_text_element("xPais", a.country.as_deref())?;
    w.opt_text_element("fone", a.phone.as_deref())?;
    w.end_element(tag)?;
    Ok(())
}

fn write_issuer(w: &mut XmlWriter, emit: &Issuer) -> Result<(), NfeError> {
    w.start_element("emit")?;
    w.text_element(emit.tax_id.tag(), emit.tax_id.value())?;
    w.text_element("xNome", &emit.name)?;
    w.opt_text_element("xFant", emit.trade_name.as_deref())?;
    write_address(w, "enderEmit", &emit.address)?;
    w.text_element("IE", &emit.state_registration)?;
    w.code_element("CRT", emit.regime.code())?;
    w.end_element("emit")?;
    Ok(())
}

fn write_recipient(w: &mut XmlWriter, dest: &Recipient) -> Result<(), NfeError> {
    w.start_element("dest")?;
    w.text_element(dest.tax_id.tag(), dest.tax_id.value())?;
    w.opt_text_element("xNome", dest.name.as_deref())?;
    if let Some(a) = &dest.address {
        write_address(w, "enderDest", a)?;
    }
    w.code_element("indIEDest", dest.ie_indicator.code())?;
    w.opt_text_element("IE", dest.state_registration.as_deref())?;
    w.opt_text_element("email", dest.email.as_deref())?;
    w.end_element("dest")?;
    Ok(())
}

fn write_item(w: &mut XmlWriter, item: &Item) -> Result<(), NfeError> {
    let number = item.number.to_string();
    w.start_element_with_attrs("det", &[("nItem", &number)])?;
    write_product(w, &item.product)?;
    write_tax(w, &item.tax)?;
    w.opt_text_element("infAdProd", item.product.additional_info.as_deref())?;
    w.end_element("det")?;
    Ok(())
}

fn write_product(w: &mut XmlWriter, p: &Product) -> Result<(), NfeError> {
    w.start_element("prod")?;
    w.text_element("cProd", &p.code)?;
    w.text_element("cEAN", p.gtin.as_deref().unwrap_or(NO_GTIN))?;
    w.text_element("xProd", &p.description)?;
    w.text_element("NCM", &p.ncm)?;
    w.opt_text_element("CEST", p.cest.as_deref())?;
    w.text_element("CFOP", &p.cfop)?;
    w.text_element("uCom", &p.unit)?;
    w.quantity_element("qCom", p.quantity)?;
    w.unit_value_element("vUnCom", p.unit_value)?;
    w.money_element("vProd", p.total)?;
    w.text_element("cEANTrib", p.tax_gtin.as_deref().unwrap_or(NO_GTIN))?;
    w.text_element("uTrib", p.tax_unit.as_deref().unwrap_or(&p.unit))?;
    w.quantity_element("qTrib", p.tax_quantity.unwrap_or(p.quantity))?;
    w.unit_value_element("vUnTrib", p.tax_unit_value.unwrap_or(p.unit_value))?;
    w.opt_money_element("vFrete", p.freight)?;
    w.opt_money_element("vSeg", p.insurance)?;
    w.opt_money_element("vDesc", p.discount)?;
    w.opt_money_element("vOutro", p.other)?;
    w.code_element("indTot", u8::from(p.include_in_total))?;
    w.end_element("prod")?;
    Ok(())
}

fn write_tax(w: &mut XmlWriter, tax: &Tax) -> Result<(), NfeError> {
    w.start_element("imposto")?;
    w.opt_money_element("vTotTrib", tax.approximate_total)?;
    if let Some(icms) = &tax.icms {
        w.start_element("ICMS")?;
        write_icms(w, icms)?;
        w.end_element("ICMS")?;
    }
    if let Some(ipi) = &tax.ipi {
        write_ipi(w, ipi)?;
    }
    if let Some(ii) = &tax.import {
        w.start_element("II")?;
        w.money_element("vBC", ii.base)?;
        w.money_element("vDespAdu", ii.customs_expenses)?;
        w.money_element("vII", ii.value)?;
        w.money_element("vIOF", ii.iof)?;
        w.end_element("II")?;
    }
    if let Some(pis) = &tax.pis {
        write_contribution(w, "PIS", pis)?;
    }
    if let Some(cofins) = &tax.cofins {
        write_contribution(w, "COFINS", cofins)?;
    }
    w.end_element("imposto")?;
    Ok(())
}

fn write_own(
    w: &mut XmlWriter,
    own: &IcmsOwn,
    base_reduction: Option<Decimal>,
) -> Result<(), NfeError> {
    w.code_element("modBC", own.base_mode)?;
    w.opt_quantity_element("pRedBC", base_reduction)?;
    w.money_element("vBC", own.base)?;
    w.quantity_element("pICMS", own.rate)?;
    w.money_element("vICMS", own.value)?;
    Ok(())
}

fn write_st(w: &mut XmlWriter, st: &IcmsSt) -> Result<(), NfeError> {
    w.code_element("modBCST", st.base_mode)?;
    w.opt_quantity_element("pMVAST", st.margin)?;
    w.opt_quantity_element("pRedBCST", st.base_reduction)?;
    w.money_element("vBCST", st.base)?;
    w.quantity_element("pICMSST", st.rate)?;
    w.money_element("vICMSST", st.value)?;
    Ok(())
}

fn write_relief(w: &mut XmlWriter, relief: Option<&IcmsRelief>) -> Result<(), NfeError> {
    if let Some(r) = relief {
        w.money_element("vICMSDeson", r.value)?;
        w.code_element("motDesICMS", r.reason)?;
    }
    Ok(())
}

fn write_icms(w: &mut XmlWriter, icms: &Icms) -> Result<(), NfeError> {
    let tag = icms.tag();
    let code_tag = if icms.is_simples() { "CSOSN" } else { "CST" };

    w.start_element(tag)?;
    w.code_element("orig", icms.origin())?;
    w.text_element(code_tag, &icms.situation_code())?;

    match icms {
        Icms::Cst00 { own, .. } => write_own(w, own, None)?,
        Icms::Cst10 { own, st, .. } => {
            write_own(w, own, None)?;
            write_st(w, st)?;
        }
        Icms::Cst20 {
            base_reduction,
            own,
            relief,
            ..
        } => {
            write_own(w, own, Some(*base_reduction))?;
            write_relief(w, relief.as_ref())?;
        }
        Icms::Cst30 { st, relief, .. } => {
            write_st(w, st)?;
            write_relief(w, relief.as_ref())?;
        }
        Icms::Cst40 { relief, .. } => write_relief(w, relief.as_ref())?,
        Icms::Cst51 {
            own,
            deferral_rate,
            deferred_value,
            ..
        } => {
            if let Some(own) = own {
                w.code_element("modBC", own.base_mode)?;
                w.money_element("vBC", own.base)?;
                w.quantity_element("pICMS", own.rate)?;
                w.money_element("vICMSOp", own.value + deferred_value.unwrap_or_default())?;
            }
            w.opt_quantity_element("pDif", *deferral_rate)?;
            w.opt_money_element("vICMSDif", *deferred_value)?;
            if let Some(own) = own {
                w.money_element("vICMS", own.value)?;
            }
        }
        Icms::Cst60 {
            retained_base,
            retained_value,
            ..
        }
        | Icms::Sn500 {
            retained_base,
            retained_value,
            ..
        } => {
            w.opt_money_element("vBCSTRet", *retained_base)?;
            w.opt_money_element("vICMSSTRet", *retained_value)?;
        }
        Icms::Cst70 {
            base_reduction,
            own,
            st,
            relief,
            ..
        } => {
            write_own(w, own, Some(*base_reduction))?;
            write_st(w, st)?;
            write_relief(w, relief.as_ref())?;
        }
        Icms::Cst90 { own, st, relief, .. } => {
            if let Some(own) = own {
                write_own(w, own, None)?;
            }
            if let Some(st) = st {
                write_st(w, st)?;
            }
            write_relief(w, relief.as_ref())?;
        }
        Icms::Sn101 {
            credit_rate,
            credit_value,
            ..
        } => {
            w.quantity_element("pCredSN", *credit_rate)?;
            w.money_element("vCredICMSSN", *credit_value)?;
        }
        Icms::Sn102 { .. } => {}
        Icms::Sn201 {
            st,
            credit_rate,
            credit_value,
            ..
        } => {
            write_st(w, st)?;
            w.quantity_element("pCredSN", *credit_rate)?;
            w.money_element("vCredICMSSN", *credit_value)?;
        }
        Icms::Sn202 { st, .. } => write_st(w, st)?,
        Icms::Sn900 {
            own,
            st,
            credit_rate,
            credit_value,
            ..
        } => {
            if let Some(own) = own {
                write_own(w, own, None)?;
            }
            if let Some(st) = st {
                write_st(w, st)?;
            }
            w.opt_quantity_element("pCredSN", *credit_rate)?;
            w.opt_money_element("vCredICMSSN", *credit_value)?;
        }
    }

    w.end_element(tag)?;
    Ok(())
}

fn write_ipi(w: &mut XmlWriter, ipi: &Ipi) -> Result<(), NfeError> {
    w.start_element("IPI")?;
    w.text_element("cEnq", &ipi.framing_code)?;
    match ipi.kind {
        IpiKind::Taxed {
            cst,
            base,
            rate,
            value,
        } => {
            w.start_element("IPITrib")?;
            w.text_element("CST", &format!("{cst:02}"))?;
            w.money_element("vBC", base)?;
            w.quantity_element("pIPI", rate)?;
            w.money_element("vIPI", value)?;
            w.end_element("IPITrib")?;
        }
        IpiKind::NotTaxed { cst } => {
            w.start_element("IPINT")?;
            w.text_element("CST", &format!("{cst:02}"))?;
            w.end_element("IPINT")?;
        }
    }
    w.end_element("IPI")?;
    Ok(())
}

/// `PIS` or `COFINS`; `name` doubles as the prefix of the group and rate tags.
fn write_contribution(w: &mut XmlWriter, name: &str, c: &Contribution) -> Result<(), NfeError> {
    let group = format!("{name}{}", c.group());
    let value_tag = format!("v{name}");

    w.start_element(name)?;
    w.start_element(&group)?;
    w.text_element("CST", &format!("{:02}", c.cst))?;
    match c.basis {
        Some(ContributionBasis::Rate { base, rate }) => {
            w.money_element("vBC", base)?;
            w.quantity_element(&format!("p{name}"), rate)?;
            w.money_element(&value_tag, c.value)?;
        }
        Some(ContributionBasis::Quantity {
            quantity,
            unit_rate,
        }) => {
            w.quantity_element("qBCProd", quantity)?;
            w.quantity_element("vAliqProd", unit_rate)?;
            w.money_element(&value_tag, c.value)?;
        }
        None => {}
    }
    w.end_element(&group)?;
    w.end_element(name)?;
    Ok(())
}

fn write_totals(w: &mut XmlWriter, t: &Totals) -> Result<(), NfeError> {
    w.start_element("total")?;
    w.start_element("ICMSTot")?;
    w.money_element("vBC", t.icms_base)?;
    w.money_element("vICMS", t.icms_value)?;
    w.money_element("vICMSDeson", t.icms_relief)?;
    w.money_element("vFCP", Decimal::ZERO)?;
    w.money_element("vBCST", t.icms_st_base)?;
    w.money_element("vST", t.icms_st_value)?;
    w.money_element("vFCPST", Decimal::ZERO)?;
    w.money_element("vFCPSTRet", Decimal::ZERO)?;
    w.money_element("vProd", t.products)?;
    w.money_element("vFrete", t.freight)?;
    w.money_element("vSeg", t.insurance)?;
    w.money_element("vDesc", t.discount)?;
    w.money_element("vII", t.import_tax)?;
    w.money_element("vIPI", t.ipi)?;
    w.money_element("vIPIDevol", Decimal::ZERO)?;
    w.money_element("vPIS", t.pis)?;
    w.money_element("vCOFINS", t.cofins)?;
    w.money_element("vOutro", t.other)?;
    w.money_element("vNF", t.grand_total)?;
    if !t.approximate_taxes.is_zero() {
        w.money_element("vTotTrib", t.approximate_taxes)?;
    }
    w.end_element("ICMSTot")?;
    w.end_element("total")?;
    Ok(())
}

fn write_transport(w: &mut XmlWriter, transp: &Transport) -> Result<(), NfeError> {
    w.start_element("transp")?;
    w.code_element("modFrete", transp.mode.code())?;
    if let Some(c) = &transp.carrier {
        w.start_element("transporta")?;
        if let Some(id) = &c.tax_id {
            w.text_element(id.tag(), id.value())?;
        }
        w.opt_text_element("xNome", c.name.as_deref())?;
        w.opt_text_element("IE", c.state_registration.as_deref())?;
        w.opt_text_element("xEnder", c.address.as_deref())?;
        w.opt_text_element("xMun", c.city.as_deref())?;
        w.opt_text_element("UF", c.state.map(|s| s.abbreviation()))?;
        w.end_element("transporta")?;
    }
    if let Some(v) = &transp.vehicle {
        w.start_element("veicTransp")?;
        w.text_element("placa", &v.plate)?;
        w.opt_text_element("UF", v.state.map(|s| s.abbreviation()))?;
        w.opt_text_element("RNTC", v.rntc.as_deref())?;
        w.end_element("veicTransp")?;
    }
    for vol in &transp.volumes {
        w.start_element("vol")?;
        if let Some(q) = vol.quantity {
            w.code_element("qVol", q)?;
        }
        w.opt_text_element("esp", vol.species.as_deref())?;
        w.opt_text_element("marca", vol.brand.as_deref())?;
        w.opt_text_element("nVol", vol.numbering.as_deref())?;
        if let Some(net) = vol.net_weight {
            w.text_element("pesoL", &format_decimal(net, 3))?;
        }
        if let Some(gross) = vol.gross_weight {
            w.text_element("pesoB", &format_decimal(gross, 3))?;
        }
        w.end_element("vol")?;
    }
    w.end_element("transp")?;
    Ok(())
}

fn write_payments(
    w: &mut XmlWriter,
    payments: &[Payment],
    change: Option<Decimal>,
) -> Result<(), NfeError> {
    w.start_element("pag")?;
    if payments.is_empty() {
        w.start_element("detPag")?;
        w.text_element("tPag", &format!("{:02}", PaymentMethod::NoPayment.code()))?;
        w.money_element("vPag", Decimal::ZERO)?;
        w.end_element("detPag")?;
    }
    for p in payments {
        w.start_element("detPag")?;
        if let Some(ind) = p.indicator {
            w.code_element("indPag", ind.code())?;
        }
        w.text_element("tPag", &format!("{:02}", p.method.code()))?;
        w.opt_text_element("xPag", p.description.as_deref())?;
        w.money_element("vPag", p.amount)?;
        if let Some(card) = &p.card {
            w.start_element("card")?;
            w.code_element("tpIntegra", card.integration.code())?;
            w.opt_text_element("CNPJ", card.acquirer_cnpj.as_deref())?;
            w.opt_text_element("tBand", card.brand.as_deref())?;
            w.opt_text_element("cAut", card.authorization.as_deref())?;
            w.end_element("card")?;
        }
        w.end_element("detPag")?;
    }
    w.opt_money_element("vTroco", change)?;
    w.end_element("pag")?;
    Ok(())
}

fn write_additional_info(w: &mut XmlWriter, info: &AdditionalInfo) -> Result<(), NfeError> {
    w.start_element("infAdic")?;
    w.opt_text_element("infAdFisco", info.fiscal.as_deref())?;
    w.opt_text_element("infCpl", info.complementary.as_deref())?;
    for obs in &info.observations {
        w.start_element_with_attrs("obsCont", &[("xCampo", &obs.field)])?;
        w.text_element("xTexto", &obs.text)?;
        w.end_element("obsCont")?;
    }
    w.end_element("infAdic")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn tz() -> FixedOffset {
        FixedOffset::west_opt(3 * 3600).unwrap()
    }

    #[test]
    fn timestamp_has_seconds_and_offset() {
        let dt = tz().with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap();
        assert_eq!(timestamp(&dt), "2024-06-15T10:30:00-03:00");
    }

    #[test]
    fn contribution_groups() {
        let mut w = XmlWriter::new().unwrap();
        let pis = Contribution {
            cst: 1,
            basis: Some(ContributionBasis::Rate {
                base: dec!(100),
                rate: dec!(1.65),
            }),
            value: dec!(1.65),
        };
        write_contribution(&mut w, "PIS", &pis).unwrap();
        let cofins = Contribution {
            cst: 7,
            basis: None,
            value: dec!(0),
        };
        write_contribution(&mut w, "COFINS", &cofins).unwrap();
        let xml = w.into_string().unwrap();
        assert!(xml.contains(concat!(
            "<PIS><PISAliq><CST>01</CST><vBC>100.00</vBC>",
            "<pPIS>1.6500</pPIS><vPIS>1.65</vPIS></PISAliq></PIS>",
        )));
        assert!(xml.contains("<COFINS><COFINSNT><CST>07</CST></COFINSNT></COFINS>"));
    }

    #[test]
    fn icms_simples_uses_csosn() {
        let mut w = XmlWriter::new().unwrap();
        write_icms(
            &mut w,
            &Icms::Sn102 {
                origin: 0,
                csosn: 102,
            },
        )
        .unwrap();
        let xml = w.into_string().unwrap();
        assert!(xml.ends_with("<ICMSSN102><orig>0</orig><CSOSN>102</CSOSN></ICMSSN102>"));
    }

    #[test]
    fn icms20_writes_reduction_and_relief() {
        let mut w = XmlWriter::new().unwrap();
        write_icms(
            &mut w,
            &Icms::Cst20 {
                origin: 0,
                base_reduction: dec!(33.33),
                own: IcmsOwn {
                    base_mode: 3,
                    base: dec!(66.67),
                    rate: dec!(18),
                    value: dec!(12),
                },
                relief: Some(IcmsRelief {
                    value: dec!(6),
                    reason: 9,
                }),
            },
        )
        .unwrap();
        let xml = w.into_string().unwrap();
        assert!(xml.contains(
            "<ICMS20><orig>0</orig><CST>20</CST><modBC>3</modBC><pRedBC>33.3300</pRedBC>\
             <vBC>66.67</vBC><pICMS>18.0000</pICMS><vICMS>12.00</vICMS>\
             <vICMSDeson>6.00</vICMSDeson><motDesICMS>9</motDesICMS></ICMS20>"
        ));
    }

    #[test]
    fn empty_payments_become_no_payment() {
        let mut w = XmlWriter::new().unwrap();
        write_payments(&mut w, &[], None).unwrap();
        let xml = w.into_string().unwrap();
        assert!(xml.ends_with("<pag><detPag><tPag>90</tPag><vPag>0.00</vPag></detPag></pag>"));
    }

    #[test]
    fn payments_with_change() {
        let mut w = XmlWriter::new().unwrap();
        let payments = [Payment::new(PaymentMethod::Cash, dec!(50))];
        write_payments(&mut w, &payments, Some(dec!(5))).unwrap();
        let xml = w.into_string().unwrap();
        assert!(xml.ends_with(
            "<pag><detPag><tPag>01</tPag><vPag>50.00</vPag></detPag><vTroco>5.00</vTroco></pag>"
        ));
    }
}
