use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::access_key::AccessKey;
use super::error::NfeError;
use super::states::State;
use super::tax_id::TaxId;

/// Schema version written on `infNFe`.
pub const LAYOUT_VERSION: &str = "4.00";

/// Recipient name forced by the authority in the homologation environment.
pub const HOMOLOGATION_RECIPIENT_NAME: &str =
    "NF-E EMITIDA EM AMBIENTE DE HOMOLOGACAO - SEM VALOR FISCAL";

/// Numeric-coded enumeration with `code()` / `from_code()`.
macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            pub fn code(&self) -> u8 {
                match self {
                    $( Self::$variant => $code ),+
                }
            }

            pub fn from_code(code: u8) -> Option<Self> {
                match code {
                    $( $code => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }
    };
}

coded_enum! {
    /// `mod` — document model.
    DocumentModel {
        /// 55 — full invoice (NF-e).
        Nfe = 55,
        /// 65 — consumer receipt (NFC-e).
        Nfce = 65,
    }
}

coded_enum! {
    /// `tpAmb` — target environment.
    Environment {
        Production = 1,
        Homologation = 2,
    }
}

coded_enum! {
    /// `tpEmis` — emission type.
    EmissionType {
        Normal = 1,
        /// FS-IA security form contingency.
        SecurityForm = 2,
        /// EPEC prior event contingency.
        Epec = 4,
        /// FS-DA security form contingency.
        SecurityFormDa = 5,
        /// SVC-AN virtual authority.
        SvcAn = 6,
        /// SVC-RS virtual authority.
        SvcRs = 7,
        /// NFC-e offline contingency.
        Offline = 9,
    }
}

coded_enum! {
    /// `tpNF` — operation direction.
    OperationType {
        Inbound = 0,
        Outbound = 1,
    }
}

coded_enum! {
    /// `idDest` — destination of the operation.
    Destination {
        Internal = 1,
        Interstate = 2,
        Abroad = 3,
    }
}

coded_enum! {
    /// `tpImp` — DANFE print format.
    PrintFormat {
        NoPrint = 0,
        Portrait = 1,
        Landscape = 2,
        Simplified = 3,
        ConsumerReceipt = 4,
        ConsumerMessage = 5,
    }
}

coded_enum! {
    /// `finNFe` — document purpose.
    Purpose {
        Normal = 1,
        Complementary = 2,
        Adjustment = 3,
        Return = 4,
    }
}

coded_enum! {
    /// `indPres` — buyer presence at the moment of the operation.
    Presence {
        NotApplicable = 0,
        InPerson = 1,
        Internet = 2,
        Telephone = 3,
        Delivery = 4,
        InPersonOutside = 5,
        Other = 9,
    }
}

coded_enum! {
    /// `CRT` — issuer tax regime.
    TaxRegime {
        SimplesNacional = 1,
        SimplesNacionalExcess = 2,
        Normal = 3,
        Mei = 4,
    }
}

coded_enum! {
    /// `indIEDest` — recipient state-registration indicator.
    IeIndicator {
        Contributor = 1,
        Exempt = 2,
        NonContributor = 9,
    }
}

coded_enum! {
    /// `modFrete` — who pays the freight.
    FreightMode {
        Issuer = 0,
        Recipient = 1,
        ThirdParty = 2,
        OwnByIssuer = 3,
        OwnByRecipient = 4,
        NoFreight = 9,
    }
}

coded_enum! {
    /// `indPag` — payment timing.
    PaymentIndicator {
        Upfront = 0,
        Installments = 1,
    }
}

coded_enum! {
    /// `tPag` — payment method.
    PaymentMethod {
        Cash = 1,
        Check = 2,
        CreditCard = 3,
        DebitCard = 4,
        StoreCredit = 5,
        FoodVoucher = 10,
        MealVoucher = 11,
        GiftVoucher = 12,
        FuelVoucher = 13,
        BankSlip = 15,
        BankDeposit = 16,
        Pix = 17,
        BankTransfer = 18,
        Loyalty = 19,
        NoPayment = 90,
        Other = 99,
    }
}

coded_enum! {
    /// `tpIntegra` — card terminal integration.
    CardIntegration {
        Integrated = 1,
        NotIntegrated = 2,
    }
}

/// `ide` — operation metadata.
///
/// Optional fields are resolved by the builder: a random code is drawn,
/// model/environment/emission type default from configuration and the
/// issue timestamp defaults to now. `check_digit` is back-filled from the
/// access key at build time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identification {
    pub state: State,
    /// `cNF` — 8-digit random code.
    pub random_code: Option<String>,
    /// `natOp` — operation nature (≤60).
    pub nature: String,
    pub model: Option<DocumentModel>,
    pub series: u16,
    pub number: u32,
    pub issued_at: Option<DateTime<FixedOffset>>,
    /// `dhSaiEnt` — goods exit/entry timestamp.
    pub departed_at: Option<DateTime<FixedOffset>>,
    pub operation: OperationType,
    pub destination: Destination,
    /// `cMunFG` — IBGE code of the municipality where the taxable event occurs.
    pub city_code: String,
    pub print_format: PrintFormat,
    pub emission_type: Option<EmissionType>,
    pub environment: Option<Environment>,
    pub purpose: Purpose,
    /// `indFinal`
    pub final_consumer: bool,
    pub presence: Presence,
    /// `verProc` — defaults to the configured application version.
    pub app_version: Option<String>,
    pub contingency: Option<Contingency>,
    /// `cDV`
    pub check_digit: Option<u8>,
}

impl Identification {
    pub fn new(
        state: State,
        nature: impl Into<String>,
        series: u16,
        number: u32,
        city_code: impl Into<String>,
    ) -> Self {
        Self {
            state,
            random_code: None,
            nature: nature.into(),
            model: None,
            series,
            number,
            issued_at: None,
            departed_at: None,
            operation: OperationType::Outbound,
            destination: Destination::Internal,
            city_code: city_code.into(),
            print_format: PrintFormat::Portrait,
            emission_type: None,
            environment: None,
            purpose: Purpose::Normal,
            final_consumer: false,
            presence: Presence::NotApplicable,
            app_version: None,
            contingency: None,
            check_digit: None,
        }
    }
}

/// Contingency entry (`dhCont` / `xJust`), required outside normal emission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contingency {
    pub entered_at: DateTime<FixedOffset>,
    /// 15 to 256 characters.
    pub justification: String,
}

/// `enderEmit` / `enderDest` — postal address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub district: String,
    /// 7-digit IBGE municipality code.
    pub city_code: String,
    pub city: String,
    pub state: State,
    /// 8-digit CEP.
    pub postal_code: Option<String>,
    /// `cPais`, "1058" for Brazil.
    pub country_code: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
}

/// `emit` — document issuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issuer {
    pub tax_id: TaxId,
    pub name: String,
    pub trade_name: Option<String>,
    pub address: Address,
    /// `IE` — state registration.
    pub state_registration: String,
    pub regime: TaxRegime,
}

/// `dest` — document recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub tax_id: TaxId,
    pub name: Option<String>,
    pub address: Option<Address>,
    pub ie_indicator: IeIndicator,
    pub state_registration: Option<String>,
    pub email: Option<String>,
}

/// `prod` — product attributes of one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// `cProd` (≤60).
    pub code: String,
    /// `cEAN`; `None` is written as "SEM GTIN".
    pub gtin: Option<String>,
    /// `xProd` (≤120).
    pub description: String,
    /// 8-digit NCM.
    pub ncm: String,
    /// 7-digit CEST.
    pub cest: Option<String>,
    /// 4-digit CFOP.
    pub cfop: String,
    pub unit: String,
    pub quantity: Decimal,
    pub unit_value: Decimal,
    /// `vProd` — gross item value.
    pub total: Decimal,
    pub tax_gtin: Option<String>,
    pub tax_unit: Option<String>,
    pub tax_quantity: Option<Decimal>,
    pub tax_unit_value: Option<Decimal>,
    pub freight: Option<Decimal>,
    pub insurance: Option<Decimal>,
    pub discount: Option<Decimal>,
    pub other: Option<Decimal>,
    /// `indTot` — whether `total` counts toward the document product value.
    pub include_in_total: bool,
    /// `infAdProd` (≤500).
    pub additional_info: Option<String>,
}

/// `det` — one document line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// `nItem` — 1-based position, assigned by the builder.
    pub number: u16,
    pub product: Product,
    pub tax: Tax,
}

/// `imposto` — tax sub-record of one item, as produced by a [`TaxProvider`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tax {
    /// `vTotTrib` — approximate total taxes.
    pub approximate_total: Option<Decimal>,
    pub icms: Option<Icms>,
    pub ipi: Option<Ipi>,
    pub import: Option<ImportTax>,
    pub pis: Option<Contribution>,
    pub cofins: Option<Contribution>,
}

/// Own-operation ICMS figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IcmsOwn {
    /// `modBC` — 0 margin, 1 list price, 2 max price, 3 operation value.
    pub base_mode: u8,
    pub base: Decimal,
    pub rate: Decimal,
    pub value: Decimal,
}

/// Tax-substitution (ST) ICMS figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IcmsSt {
    /// `modBCST` — 0..6.
    pub base_mode: u8,
    pub margin: Option<Decimal>,
    pub base_reduction: Option<Decimal>,
    pub base: Decimal,
    pub rate: Decimal,
    pub value: Decimal,
}

/// Relieved (desonerated) ICMS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IcmsRelief {
    pub value: Decimal,
    /// `motDesICMS`
    pub reason: u8,
}

/// ICMS tax situation. Exactly one variant applies to an item.
///
/// `origin` is the goods origin digit (0..8). `Cst*` variants are used by the
/// normal regime, `Sn*` by Simples Nacional issuers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Icms {
    Cst00 {
        origin: u8,
        own: IcmsOwn,
    },
    Cst10 {
        origin: u8,
        own: IcmsOwn,
        st: IcmsSt,
    },
    Cst20 {
        origin: u8,
        base_reduction: Decimal,
        own: IcmsOwn,
        relief: Option<IcmsRelief>,
    },
    Cst30 {
        origin: u8,
        st: IcmsSt,
        relief: Option<IcmsRelief>,
    },
    /// CST 40 (exempt), 41 (not taxed) or 50 (suspended).
    Cst40 {
        origin: u8,
        cst: u8,
        relief: Option<IcmsRelief>,
    },
    Cst51 {
        origin: u8,
        own: Option<IcmsOwn>,
        deferral_rate: Option<Decimal>,
        deferred_value: Option<Decimal>,
    },
    Cst60 {
        origin: u8,
        retained_base: Option<Decimal>,
        retained_value: Option<Decimal>,
    },
    Cst70 {
        origin: u8,
        base_reduction: Decimal,
        own: IcmsOwn,
        st: IcmsSt,
        relief: Option<IcmsRelief>,
    },
    Cst90 {
        origin: u8,
        own: Option<IcmsOwn>,
        st: Option<IcmsSt>,
        relief: Option<IcmsRelief>,
    },
    Sn101 {
        origin: u8,
        credit_rate: Decimal,
        credit_value: Decimal,
    },
    /// CSOSN 102, 103, 300 or 400.
    Sn102 {
        origin: u8,
        csosn: u16,
    },
    Sn201 {
        origin: u8,
        st: IcmsSt,
        credit_rate: Decimal,
        credit_value: Decimal,
    },
    /// CSOSN 202 or 203.
    Sn202 {
        origin: u8,
        csosn: u16,
        st: IcmsSt,
    },
    Sn500 {
        origin: u8,
        retained_base: Option<Decimal>,
        retained_value: Option<Decimal>,
    },
    Sn900 {
        origin: u8,
        own: Option<IcmsOwn>,
        st: Option<IcmsSt>,
        credit_rate: Option<Decimal>,
        credit_value: Option<Decimal>,
    },
}

impl Icms {
    /// Group element name inside `<ICMS>`.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Cst00 { .. } => "ICMS00",
            Self::Cst10 { .. } => "ICMS10",
            Self::Cst20 { .. } => "ICMS20",
            Self::Cst30 { .. } => "ICMS30",
            Self::Cst40 { .. } => "ICMS40",
            Self::Cst51 { .. } => "ICMS51",
            Self::Cst60 { .. } => "ICMS60",
            Self::Cst70 { .. } => "ICMS70",
            Self::Cst90 { .. } => "ICMS90",
            Self::Sn101 { .. } => "ICMSSN101",
            Self::Sn102 { .. } => "ICMSSN102",
            Self::Sn201 { .. } => "ICMSSN201",
            Self::Sn202 { .. } => "ICMSSN202",
            Self::Sn500 { .. } => "ICMSSN500",
            Self::Sn900 { .. } => "ICMSSN900",
        }
    }

    /// CST (two digits) or CSOSN (three digits) as written in the document.
    pub fn situation_code(&self) -> String {
        match self {
            Self::Cst00 { .. } => "00".into(),
            Self::Cst10 { .. } => "10".into(),
            Self::Cst20 { .. } => "20".into(),
            Self::Cst30 { .. } => "30".into(),
            Self::Cst40 { cst, .. } => format!("{cst:02}"),
            Self::Cst51 { .. } => "51".into(),
            Self::Cst60 { .. } => "60".into(),
            Self::Cst70 { .. } => "70".into(),
            Self::Cst90 { .. } => "90".into(),
            Self::Sn101 { .. } => "101".into(),
            Self::Sn102 { csosn, .. } | Self::Sn202 { csosn, .. } => csosn.to_string(),
            Self::Sn201 { .. } => "201".into(),
            Self::Sn500 { .. } => "500".into(),
            Self::Sn900 { .. } => "900".into(),
        }
    }

    /// Whether the variant belongs to the Simples Nacional (CSOSN) family.
    pub fn is_simples(&self) -> bool {
        matches!(
            self,
            Self::Sn101 { .. }
                | Self::Sn102 { .. }
                | Self::Sn201 { .. }
                | Self::Sn202 { .. }
                | Self::Sn500 { .. }
                | Self::Sn900 { .. }
        )
    }

    pub fn origin(&self) -> u8 {
        match self {
            Self::Cst00 { origin, .. }
            | Self::Cst10 { origin, .. }
            | Self::Cst20 { origin, .. }
            | Self::Cst30 { origin, .. }
            | Self::Cst40 { origin, .. }
            | Self::Cst51 { origin, .. }
            | Self::Cst60 { origin, .. }
            | Self::Cst70 { origin, .. }
            | Self::Cst90 { origin, .. }
            | Self::Sn101 { origin, .. }
            | Self::Sn102 { origin, .. }
            | Self::Sn201 { origin, .. }
            | Self::Sn202 { origin, .. }
            | Self::Sn500 { origin, .. }
            | Self::Sn900 { origin, .. } => *origin,
        }
    }

    /// Own-operation base/value, if the variant carries one.
    pub fn own(&self) -> Option<&IcmsOwn> {
        match self {
            Self::Cst00 { own, .. }
            | Self::Cst10 { own, .. }
            | Self::Cst20 { own, .. }
            | Self::Cst70 { own, .. } => Some(own),
            Self::Cst51 { own, .. } | Self::Cst90 { own, .. } | Self::Sn900 { own, .. } => {
                own.as_ref()
            }
            _ => None,
        }
    }

    /// Tax-substitution base/value, if the variant carries one.
    pub fn st(&self) -> Option<&IcmsSt> {
        match self {
            Self::Cst10 { st, .. }
            | Self::Cst30 { st, .. }
            | Self::Cst70 { st, .. }
            | Self::Sn201 { st, .. }
            | Self::Sn202 { st, .. } => Some(st),
            Self::Cst90 { st, .. } | Self::Sn900 { st, .. } => st.as_ref(),
            _ => None,
        }
    }

    /// Relieved ICMS, if any.
    pub fn relief(&self) -> Option<&IcmsRelief> {
        match self {
            Self::Cst20 { relief, .. }
            | Self::Cst30 { relief, .. }
            | Self::Cst40 { relief, .. }
            | Self::Cst70 { relief, .. }
            | Self::Cst90 { relief, .. } => relief.as_ref(),
            _ => None,
        }
    }
}

/// `IPI` — federal excise tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ipi {
    /// `cEnq` — legal framing code (3 digits, "999" when none applies).
    pub framing_code: String,
    pub kind: IpiKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IpiKind {
    /// `IPITrib` — CST 00, 49, 50 or 99.
    Taxed {
        cst: u8,
        base: Decimal,
        rate: Decimal,
        value: Decimal,
    },
    /// `IPINT` — CST 01..05 or 51..55.
    NotTaxed { cst: u8 },
}

/// `II` — import tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportTax {
    pub base: Decimal,
    pub customs_expenses: Decimal,
    pub value: Decimal,
    pub iof: Decimal,
}

/// PIS or COFINS contribution of one item.
///
/// The group written to the document follows from the CST: 01/02 rate-based,
/// 03 quantity-based, 04..09 not taxed, 49..99 other (either basis).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub cst: u8,
    pub basis: Option<ContributionBasis>,
    pub value: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContributionBasis {
    /// Percentage over a monetary base.
    Rate { base: Decimal, rate: Decimal },
    /// Fixed amount per unit sold.
    Quantity { quantity: Decimal, unit_rate: Decimal },
}

impl Contribution {
    /// Group suffix: "Aliq", "Qtde", "NT" or "Outr".
    pub fn group(&self) -> &'static str {
        match self.cst {
            1 | 2 => "Aliq",
            3 => "Qtde",
            4..=9 => "NT",
            _ => "Outr",
        }
    }
}

/// `transp` — transport block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transport {
    pub mode: FreightMode,
    pub carrier: Option<Carrier>,
    pub vehicle: Option<Vehicle>,
    pub volumes: Vec<Volume>,
}

impl Transport {
    pub fn new(mode: FreightMode) -> Self {
        Self {
            mode,
            carrier: None,
            vehicle: None,
            volumes: Vec::new(),
        }
    }
}

/// `transporta`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Carrier {
    pub tax_id: Option<TaxId>,
    pub name: Option<String>,
    pub state_registration: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<State>,
}

/// `veicTransp`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub plate: String,
    pub state: Option<State>,
    /// `RNTC` — national cargo carrier registry.
    pub rntc: Option<String>,
}

/// `vol`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    pub quantity: Option<u32>,
    pub species: Option<String>,
    pub brand: Option<String>,
    pub numbering: Option<String>,
    pub net_weight: Option<Decimal>,
    pub gross_weight: Option<Decimal>,
}

/// `detPag` — one payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub indicator: Option<PaymentIndicator>,
    pub method: PaymentMethod,
    /// `xPag` — required for [`PaymentMethod::Other`].
    pub description: Option<String>,
    pub amount: Decimal,
    pub card: Option<Card>,
}

impl Payment {
    pub fn new(method: PaymentMethod, amount: Decimal) -> Self {
        Self {
            indicator: None,
            method,
            description: None,
            amount,
            card: None,
        }
    }
}

/// `card`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub integration: CardIntegration,
    pub acquirer_cnpj: Option<String>,
    /// `tBand` — 2-digit card brand code.
    pub brand: Option<String>,
    pub authorization: Option<String>,
}

/// `infAdic`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalInfo {
    /// `infAdFisco` (≤2000).
    pub fiscal: Option<String>,
    /// `infCpl` (≤5000).
    pub complementary: Option<String>,
    /// `obsCont` (≤10).
    pub observations: Vec<Observation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// `xCampo` (≤20).
    pub field: String,
    /// `xTexto` (≤60).
    pub text: String,
}

/// `ICMSTot` — document totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub icms_base: Decimal,
    pub icms_value: Decimal,
    pub icms_relief: Decimal,
    pub icms_st_base: Decimal,
    pub icms_st_value: Decimal,
    pub products: Decimal,
    pub freight: Decimal,
    pub insurance: Decimal,
    pub discount: Decimal,
    pub import_tax: Decimal,
    pub ipi: Decimal,
    pub pis: Decimal,
    pub cofins: Decimal,
    pub other: Decimal,
    /// `vNF` — grand total.
    pub grand_total: Decimal,
    pub approximate_taxes: Decimal,
}

/// The finished fiscal document (`NFe` / `infNFe`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nfe {
    pub access_key: AccessKey,
    pub identification: Identification,
    pub issuer: Issuer,
    pub recipient: Option<Recipient>,
    pub items: Vec<Item>,
    pub transport: Transport,
    pub payments: Vec<Payment>,
    /// `vTroco`
    pub change: Option<Decimal>,
    pub additional_info: Option<AdditionalInfo>,
    pub totals: Totals,
}

impl Nfe {
    /// `Id` attribute of `infNFe`: "NFe" followed by the 44-digit key.
    pub fn id(&self) -> String {
        self.access_key.id_attribute()
    }
}

/// Collaborator that computes the tax sub-record of an item.
///
/// Tax-rule catalogs live outside this crate; the builder only consumes
/// the monetary fields they produce.
pub trait TaxProvider {
    fn compute(&self, product: &Product) -> Result<Tax, NfeError>;
}

impl<F> TaxProvider for F
where
    F: Fn(&Product) -> Result<Tax, NfeError>,
{
    fn compute(&self, product: &Product) -> Result<Tax, NfeError> {
        self(product)
    }
}
