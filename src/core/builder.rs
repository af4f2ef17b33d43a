use chrono::Local;
use parking_lot::RwLock;
#[cfg(feature = "xml")]
use parking_lot::RwLockUpgradableReadGuard;
use rand::Rng;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::access_key::{AccessKey, KeyFields};
use super::config::BuilderConfig;
use super::error::{NfeError, ValidationError, first_error};
use super::gtin::NO_GTIN;
use super::normalize::{clean_optional, clean_text, digits_only, round_half_away, strip_mask};
use super::states::State;
use super::tax_id::TaxId;
use super::totalizer::Totalizer;
use super::types::*;
use super::validation::{self, MAX_ITEMS};

/// Incremental, thread-safe assembler of one fiscal document.
///
/// Every section call validates and normalizes its input, then commits it
/// under the builder's write lock; a failing call leaves the builder as it
/// was. [`NfeBuilder::build`] produces the immutable [`Nfe`] and
/// [`NfeBuilder::xml`] serializes it once and caches the result.
///
/// ```
/// use nota::core::*;
/// use rust_decimal_macros::dec;
///
/// let builder = NfeBuilder::new(BuilderConfig::default());
/// let mut ide = Identification::new(State::SP, "Venda de mercadoria", 1, 42, "3550308");
/// ide.random_code = Some("10293847".into());
/// builder.identification(ide).unwrap();
///
/// let address = AddressBuilder::new("Av. Paulista", "1000", "Bela Vista", "3550308", "São Paulo", State::SP).build();
/// builder
///     .issuer(IssuerBuilder::new(TaxId::cnpj("11.222.333/0001-81"), "Empresa Ltda", address.clone(), "123456789012").build())
///     .unwrap();
/// builder
///     .recipient(RecipientBuilder::new(TaxId::cpf("529.982.247-25")).name("Maria").address(address).build())
///     .unwrap();
/// let n = builder
///     .add_item(ProductBuilder::new("001", "Café", "09012100", "5102", "UN", dec!(2), dec!(15)).build(), Tax::default())
///     .unwrap();
/// assert_eq!(n, 1);
/// builder.transport(Transport::new(FreightMode::NoFreight)).unwrap();
///
/// let nfe = builder.build().unwrap();
/// assert_eq!(nfe.access_key.as_str().len(), 44);
/// assert_eq!(nfe.totals.grand_total, dec!(30.00));
/// ```
pub struct NfeBuilder {
    state: RwLock<BuilderState>,
    totalizer: Totalizer,
    errors: RwLock<Vec<ValidationError>>,
}

#[derive(Default)]
struct BuilderState {
    config: BuilderConfig,
    identification: Option<Identification>,
    issuer: Option<Issuer>,
    recipient: Option<Recipient>,
    items: Vec<Item>,
    transport: Option<Transport>,
    payments: Vec<Payment>,
    change: Option<Decimal>,
    additional_info: Option<AdditionalInfo>,
    manual_totals: Option<Totals>,
    access_key: Option<AccessKey>,
    document: Option<Nfe>,
    #[cfg_attr(not(feature = "xml"), allow(dead_code))]
    xml: Option<String>,
}

impl Default for NfeBuilder {
    fn default() -> Self {
        Self::new(BuilderConfig::default())
    }
}

impl NfeBuilder {
    pub fn new(config: BuilderConfig) -> Self {
        Self {
            state: RwLock::new(BuilderState {
                config,
                ..BuilderState::default()
            }),
            totalizer: Totalizer::new(),
            errors: RwLock::new(Vec::new()),
        }
    }

    /// Current configuration.
    pub fn config(&self) -> BuilderConfig {
        self.state.read().config.clone()
    }

    /// Toggle GTIN validation for items added from now on.
    pub fn set_gtin_validation(&self, enabled: bool) {
        self.state.write().config.validate_gtin = enabled;
    }

    /// Toggle diacritic removal for sections stored from now on.
    pub fn set_accent_removal(&self, enabled: bool) {
        self.state.write().config.remove_accents = enabled;
    }

    /// Toggle rounding for the next finalize.
    pub fn set_rounding(&self, enabled: bool) {
        self.state.write().config.round_values = enabled;
    }

    /// Toggle automatic totals for items added from now on and the next build.
    pub fn set_auto_totals(&self, enabled: bool) {
        self.state.write().config.auto_totals = enabled;
    }

    // ── sections ────────────────────────────────────────────────────────────

    /// Store `ide`, resolving defaults and the random code.
    ///
    /// Replacing the identification discards a previously derived access key.
    pub fn identification(&self, mut ide: Identification) -> Result<(), NfeError> {
        let mut state = self.state.write();
        let cfg = &state.config;

        ide.nature = clean_text(&ide.nature, 60, cfg.remove_accents);
        ide.city_code = digits_only(&ide.city_code);
        ide.random_code = ide.random_code.map(|c| c.trim().to_string());
        ide.model.get_or_insert(cfg.model);
        ide.environment.get_or_insert(cfg.environment);
        ide.emission_type.get_or_insert(cfg.emission_type);
        if ide.issued_at.is_none() {
            ide.issued_at = Some(Local::now().fixed_offset());
        }
        let app_version = clean_optional(ide.app_version.as_deref(), 20, false)
            .unwrap_or_else(|| clean_text(&cfg.app_version, 20, false));
        ide.app_version = Some(app_version);
        if let Some(c) = ide.contingency.as_mut() {
            c.justification = clean_text(&c.justification, 256, cfg.remove_accents);
        }
        ide.check_digit = None;

        first_error(validation::validate_identification(&ide))?;
        resolve_random_code(&mut ide);

        debug!(
            state = ide.state.abbreviation(),
            series = ide.series,
            number = ide.number,
            "identification stored"
        );
        state.identification = Some(ide);
        state.access_key = None;
        Ok(())
    }

    /// Store `emit`. Replacing the issuer discards a previously derived access key.
    pub fn issuer(&self, mut issuer: Issuer) -> Result<(), NfeError> {
        let mut state = self.state.write();
        let strip = state.config.remove_accents;

        issuer.tax_id = normalize_tax_id(issuer.tax_id);
        issuer.name = clean_text(&issuer.name, 60, strip);
        issuer.trade_name = clean_optional(issuer.trade_name.as_deref(), 60, strip);
        issuer.state_registration = normalize_state_registration(&issuer.state_registration);
        normalize_address(&mut issuer.address, strip);

        first_error(validation::validate_issuer(&issuer))?;

        debug!(tax_id = issuer.tax_id.value(), "issuer stored");
        state.issuer = Some(issuer);
        state.access_key = None;
        Ok(())
    }

    /// Store `dest`.
    pub fn recipient(&self, mut recipient: Recipient) -> Result<(), NfeError> {
        let mut state = self.state.write();
        let strip = state.config.remove_accents;

        recipient.tax_id = normalize_tax_id(recipient.tax_id);
        recipient.name = clean_optional(recipient.name.as_deref(), 60, strip);
        recipient.state_registration = recipient
            .state_registration
            .as_deref()
            .map(normalize_state_registration)
            .filter(|ie| !ie.is_empty());
        recipient.email = clean_optional(recipient.email.as_deref(), 60, false);
        if let Some(address) = recipient.address.as_mut() {
            normalize_address(address, strip);
        }

        first_error(validation::validate_recipient(&recipient))?;

        debug!(tax_id = recipient.tax_id.value(), "recipient stored");
        state.recipient = Some(recipient);
        Ok(())
    }

    /// Append an item and return its sequence number (`nItem`).
    ///
    /// Numbers follow the order in which callers acquire the builder's write
    /// lock. With automatic totals on, the item is fed to the totalizer.
    pub fn add_item(&self, mut product: Product, tax: Tax) -> Result<u16, NfeError> {
        let mut state = self.state.write();
        let cfg = &state.config;

        normalize_product(&mut product, cfg.remove_accents);
        first_error(validation::validate_product(&product, cfg.validate_gtin))?;
        first_error(validation::validate_tax(&tax))?;
        if state.items.len() >= MAX_ITEMS {
            return Err(NfeError::business(
                "items",
                format!("a document holds at most {MAX_ITEMS} items"),
            ));
        }

        let number = u16::try_from(state.items.len() + 1)
            .map_err(|_| NfeError::business("items", "item sequence overflow"))?;
        if cfg.auto_totals {
            self.totalizer.add_item(&product, &tax);
        }
        debug!(number, code = %product.code, "item added");
        state.items.push(Item {
            number,
            product,
            tax,
        });
        Ok(number)
    }

    /// Compute the item's tax record through `provider`, then add it.
    ///
    /// The provider runs outside the builder lock.
    pub fn add_item_with<P>(&self, product: Product, provider: &P) -> Result<u16, NfeError>
    where
        P: TaxProvider + ?Sized,
    {
        let tax = provider.compute(&product)?;
        self.add_item(product, tax)
    }

    /// Store `transp`.
    pub fn transport(&self, mut transport: Transport) -> Result<(), NfeError> {
        let mut state = self.state.write();
        let strip = state.config.remove_accents;

        if let Some(carrier) = transport.carrier.as_mut() {
            carrier.tax_id = carrier.tax_id.take().map(normalize_tax_id);
            carrier.name = clean_optional(carrier.name.as_deref(), 60, strip);
            carrier.state_registration = carrier
                .state_registration
                .as_deref()
                .map(normalize_state_registration)
                .filter(|ie| !ie.is_empty());
            carrier.address = clean_optional(carrier.address.as_deref(), 60, strip);
            carrier.city = clean_optional(carrier.city.as_deref(), 60, strip);
        }
        if let Some(vehicle) = transport.vehicle.as_mut() {
            vehicle.plate = strip_mask(&vehicle.plate).to_ascii_uppercase();
            vehicle.rntc = clean_optional(vehicle.rntc.as_deref(), 20, false);
        }
        for volume in &mut transport.volumes {
            volume.species = clean_optional(volume.species.as_deref(), 60, strip);
            volume.brand = clean_optional(volume.brand.as_deref(), 60, strip);
            volume.numbering = clean_optional(volume.numbering.as_deref(), 60, strip);
        }

        first_error(validation::validate_transport(&transport))?;

        debug!(mode = transport.mode.code(), "transport stored");
        state.transport = Some(transport);
        Ok(())
    }

    /// Append a `detPag` entry.
    pub fn add_payment(&self, mut payment: Payment) -> Result<(), NfeError> {
        let mut state = self.state.write();
        let strip = state.config.remove_accents;

        payment.description = clean_optional(payment.description.as_deref(), 60, strip);
        if let Some(card) = payment.card.as_mut() {
            card.acquirer_cnpj = card.acquirer_cnpj.as_deref().map(strip_mask);
            card.authorization = clean_optional(card.authorization.as_deref(), 20, false);
        }

        first_error(validation::validate_payment(&payment))?;

        debug!(method = payment.method.code(), amount = %payment.amount, "payment added");
        state.payments.push(payment);
        Ok(())
    }

    /// Set `vTroco`, the change returned to the buyer.
    pub fn change(&self, amount: Decimal) -> Result<(), NfeError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(NfeError::format("payment.change", "must not be negative"));
        }
        self.state.write().change = Some(amount);
        Ok(())
    }

    /// Store `infAdic`.
    pub fn additional_info(&self, mut info: AdditionalInfo) -> Result<(), NfeError> {
        let mut state = self.state.write();
        let strip = state.config.remove_accents;

        info.fiscal = clean_optional(info.fiscal.as_deref(), 2000, strip);
        info.complementary = clean_optional(info.complementary.as_deref(), 5000, strip);
        for obs in &mut info.observations {
            obs.field = clean_text(&obs.field, 20, strip);
            obs.text = clean_text(&obs.text, 60, strip);
        }

        first_error(validation::validate_additional_info(&info))?;

        debug!(observations = info.observations.len(), "additional info stored");
        state.additional_info = Some(info);
        Ok(())
    }

    /// Supply the totals block by hand. Takes precedence over the totalizer.
    pub fn totals(&self, totals: Totals) -> Result<(), NfeError> {
        first_error(validation::validate_totals(&totals))?;
        self.state.write().manual_totals = Some(totals);
        Ok(())
    }

    // ── terminal ────────────────────────────────────────────────────────────

    /// Assemble the document.
    ///
    /// Derives the access key unless one is already set, finalizes the
    /// totalizer when automatic totals are on and replaces any previously
    /// built document. On error nothing changes and the call can be retried.
    pub fn build(&self) -> Result<Nfe, NfeError> {
        let mut state = self.state.write();

        let mut identification = state
            .identification
            .clone()
            .ok_or_else(|| NfeError::missing("identification"))?;
        let issuer = state
            .issuer
            .clone()
            .ok_or_else(|| NfeError::missing("issuer"))?;
        if state.items.is_empty() {
            return Err(NfeError::missing("items"));
        }
        let transport = state
            .transport
            .clone()
            .ok_or_else(|| NfeError::missing("transport"))?;

        let model = identification.model.unwrap_or(state.config.model);
        let environment = identification
            .environment
            .unwrap_or(state.config.environment);
        let mut recipient = state.recipient.clone();
        check_model_rules(model, recipient.as_ref(), &transport)?;

        let access_key = match &state.access_key {
            Some(key) => key.clone(),
            None => derive_access_key(&identification, &issuer)?,
        };

        let totals = match state.manual_totals {
            Some(totals) => totals,
            None if state.config.auto_totals => self.totalizer.finalize(state.config.round_values),
            None => self.totalizer.snapshot(),
        };

        identification.check_digit = Some(access_key.check_digit());
        if environment == Environment::Homologation && model == DocumentModel::Nfe {
            if let Some(r) = recipient.as_mut() {
                r.name = Some(HOMOLOGATION_RECIPIENT_NAME.to_string());
            }
        }

        let nfe = Nfe {
            access_key: access_key.clone(),
            identification,
            issuer,
            recipient,
            items: state.items.clone(),
            transport,
            payments: state.payments.clone(),
            change: state.change,
            additional_info: state.additional_info.clone(),
            totals,
        };

        if let Some(ide) = state.identification.as_mut() {
            ide.check_digit = Some(access_key.check_digit());
        }
        state.access_key = Some(access_key);
        state.document = Some(nfe.clone());
        state.xml = None;

        info!(
            key = %nfe.access_key,
            items = nfe.items.len(),
            grand_total = %nfe.totals.grand_total,
            "document built"
        );
        Ok(nfe)
    }

    /// Serialized document of the last successful build.
    ///
    /// The first call renders and caches the XML; later calls return the
    /// cached string until the next [`NfeBuilder::build`]. Section calls made
    /// after a build do not invalidate it.
    #[cfg(feature = "xml")]
    pub fn xml(&self) -> Result<String, NfeError> {
        let state = self.state.upgradable_read();
        if let Some(xml) = &state.xml {
            return Ok(xml.clone());
        }
        let document = state.document.as_ref().ok_or(NfeError::NotBuilt)?;
        let xml = crate::xml::to_xml(document)?;

        let mut state = RwLockUpgradableReadGuard::upgrade(state);
        state.xml = Some(xml.clone());
        debug!(bytes = xml.len(), "document serialized");
        Ok(xml)
    }

    // ── readers ─────────────────────────────────────────────────────────────

    /// Last built document, if any.
    pub fn document(&self) -> Option<Nfe> {
        self.state.read().document.clone()
    }

    /// Access key derived by the last build, if still valid.
    pub fn access_key(&self) -> Option<AccessKey> {
        self.state.read().access_key.clone()
    }

    /// Stored identification (with resolved defaults).
    pub fn current_identification(&self) -> Option<Identification> {
        self.state.read().identification.clone()
    }

    pub fn items(&self) -> Vec<Item> {
        self.state.read().items.clone()
    }

    pub fn item_count(&self) -> usize {
        self.state.read().items.len()
    }

    /// Totalizer accumulators as they stand.
    pub fn running_totals(&self) -> Totals {
        self.totalizer.snapshot()
    }

    // ── diagnostic error list ───────────────────────────────────────────────

    /// Record a finding for batch reporting. Section calls never do this.
    pub fn add_error(&self, error: ValidationError) {
        self.errors.write().push(error);
    }

    pub fn add_errors(&self, errors: impl IntoIterator<Item = ValidationError>) {
        self.errors.write().extend(errors);
    }

    pub fn clear_errors(&self) {
        self.errors.write().clear();
    }

    pub fn errors(&self) -> Vec<ValidationError> {
        self.errors.read().clone()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.read().is_empty()
    }
}

fn check_model_rules(
    model: DocumentModel,
    recipient: Option<&Recipient>,
    transport: &Transport,
) -> Result<(), NfeError> {
    match model {
        DocumentModel::Nfe => {
            let recipient = recipient.ok_or_else(|| {
                NfeError::business("recipient", "a full invoice (model 55) requires a recipient")
            })?;
            if recipient.name.is_none() {
                return Err(NfeError::missing("recipient.name"));
            }
            if recipient.address.is_none() && !matches!(recipient.tax_id, TaxId::Foreign(_)) {
                return Err(NfeError::missing("recipient.address"));
            }
        }
        DocumentModel::Nfce => {
            if transport.mode != FreightMode::NoFreight {
                return Err(NfeError::business(
                    "transport.mode",
                    "consumer receipts (model 65) must use freight mode 9",
                ));
            }
        }
    }
    Ok(())
}

fn derive_access_key(ide: &Identification, issuer: &Issuer) -> Result<AccessKey, NfeError> {
    let issued_at = ide
        .issued_at
        .ok_or_else(|| NfeError::missing("identification.issued_at"))?
        .to_rfc3339();
    let model = ide
        .model
        .ok_or_else(|| NfeError::missing("identification.model"))?;
    let emission_type = ide
        .emission_type
        .ok_or_else(|| NfeError::missing("identification.emission_type"))?;
    let random_code = ide
        .random_code
        .as_deref()
        .ok_or_else(|| NfeError::missing("identification.random_code"))?;

    let state_code = format!("{:02}", ide.state.code());
    let model = model.code().to_string();
    let series = ide.series.to_string();
    let number = ide.number.to_string();
    let emission_type = emission_type.code().to_string();

    AccessKey::generate(&KeyFields {
        state_code: &state_code,
        issued_at: &issued_at,
        tax_id: issuer.tax_id.value(),
        model: &model,
        series: &series,
        number: &number,
        emission_type: &emission_type,
        random_code,
    })
}

/// `cNF` may not repeat the last 8 digits of the 9-digit document number.
fn collides(random_code: &str, number: u32) -> bool {
    let padded = format!("{number:09}");
    random_code == &padded[1..]
}

fn resolve_random_code(ide: &mut Identification) {
    if let Some(code) = &ide.random_code {
        if !collides(code, ide.number) {
            return;
        }
        warn!(
            number = ide.number,
            "random code collides with the document number, drawing a new one"
        );
    }
    let mut rng = rand::thread_rng();
    loop {
        let code = format!("{:08}", rng.gen_range(0..100_000_000u32));
        if !collides(&code, ide.number) {
            ide.random_code = Some(code);
            return;
        }
    }
}

fn normalize_tax_id(tax_id: TaxId) -> TaxId {
    match tax_id {
        TaxId::Cnpj(v) => TaxId::Cnpj(strip_mask(&v)),
        TaxId::Cpf(v) => TaxId::Cpf(strip_mask(&v)),
        TaxId::Foreign(v) => TaxId::Foreign(v.trim().to_string()),
    }
}

fn normalize_state_registration(ie: &str) -> String {
    let ie = ie.trim().to_ascii_uppercase();
    if ie == "ISENTO" { ie } else { strip_mask(&ie) }
}

fn normalize_address(address: &mut Address, strip: bool) {
    address.street = clean_text(&address.street, 60, strip);
    address.number = clean_text(&address.number, 60, strip);
    address.complement = clean_optional(address.complement.as_deref(), 60, strip);
    address.district = clean_text(&address.district, 60, strip);
    address.city_code = digits_only(&address.city_code);
    address.city = clean_text(&address.city, 60, strip);
    address.postal_code = address.postal_code.as_deref().map(digits_only);
    address.country = clean_optional(address.country.as_deref(), 60, strip);
    address.phone = address
        .phone
        .as_deref()
        .map(digits_only)
        .filter(|p| !p.is_empty());
}

fn normalize_product(product: &mut Product, strip: bool) {
    product.code = clean_text(&product.code, 60, false);
    product.description = clean_text(&product.description, 120, strip);
    product.ncm = digits_only(&product.ncm);
    product.cest = product
        .cest
        .as_deref()
        .map(digits_only)
        .filter(|c| !c.is_empty());
    product.cfop = digits_only(&product.cfop);
    product.unit = clean_text(&product.unit, 6, strip);
    product.gtin = product
        .gtin
        .as_deref()
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(String::from);
    if product.tax_gtin.is_none() {
        product.tax_gtin = product.gtin.clone();
    }
    if product.gtin.as_deref() == Some(NO_GTIN) {
        product.gtin = None;
    }
    if product.tax_gtin.as_deref() == Some(NO_GTIN) {
        product.tax_gtin = None;
    }
    product.tax_unit = Some(
        clean_optional(product.tax_unit.as_deref(), 6, strip)
            .unwrap_or_else(|| product.unit.clone()),
    );
    product.tax_quantity.get_or_insert(product.quantity);
    product.tax_unit_value.get_or_insert(product.unit_value);
    product.additional_info = clean_optional(product.additional_info.as_deref(), 500, strip);
}

/// Builder for [`Address`].
pub struct AddressBuilder {
    address: Address,
}

impl AddressBuilder {
    pub fn new(
        street: impl Into<String>,
        number: impl Into<String>,
        district: impl Into<String>,
        city_code: impl Into<String>,
        city: impl Into<String>,
        state: State,
    ) -> Self {
        Self {
            address: Address {
                street: street.into(),
                number: number.into(),
                complement: None,
                district: district.into(),
                city_code: city_code.into(),
                city: city.into(),
                state,
                postal_code: None,
                country_code: Some("1058".into()),
                country: Some("BRASIL".into()),
                phone: None,
            },
        }
    }

    pub fn complement(mut self, complement: impl Into<String>) -> Self {
        self.address.complement = Some(complement.into());
        self
    }

    pub fn postal_code(mut self, cep: impl Into<String>) -> Self {
        self.address.postal_code = Some(cep.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.address.phone = Some(phone.into());
        self
    }

    pub fn country(mut self, code: impl Into<String>, name: impl Into<String>) -> Self {
        self.address.country_code = Some(code.into());
        self.address.country = Some(name.into());
        self
    }

    pub fn build(self) -> Address {
        self.address
    }
}

/// Builder for [`Issuer`].
pub struct IssuerBuilder {
    issuer: Issuer,
}

impl IssuerBuilder {
    pub fn new(
        tax_id: TaxId,
        name: impl Into<String>,
        address: Address,
        state_registration: impl Into<String>,
    ) -> Self {
        Self {
            issuer: Issuer {
                tax_id,
                name: name.into(),
                trade_name: None,
                address,
                state_registration: state_registration.into(),
                regime: TaxRegime::Normal,
            },
        }
    }

    pub fn trade_name(mut self, name: impl Into<String>) -> Self {
        self.issuer.trade_name = Some(name.into());
        self
    }

    pub fn regime(mut self, regime: TaxRegime) -> Self {
        self.issuer.regime = regime;
        self
    }

    pub fn build(self) -> Issuer {
        self.issuer
    }
}

/// Builder for [`Recipient`].
pub struct RecipientBuilder {
    recipient: Recipient,
}

impl RecipientBuilder {
    pub fn new(tax_id: TaxId) -> Self {
        Self {
            recipient: Recipient {
                tax_id,
                name: None,
                address: None,
                ie_indicator: IeIndicator::NonContributor,
                state_registration: None,
                email: None,
            },
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.recipient.name = Some(name.into());
        self
    }

    pub fn address(mut self, address: Address) -> Self {
        self.recipient.address = Some(address);
        self
    }

    /// Mark as an ICMS contributor with the given state registration.
    pub fn contributor(mut self, state_registration: impl Into<String>) -> Self {
        self.recipient.ie_indicator = IeIndicator::Contributor;
        self.recipient.state_registration = Some(state_registration.into());
        self
    }

    pub fn ie_indicator(mut self, indicator: IeIndicator) -> Self {
        self.recipient.ie_indicator = indicator;
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.recipient.email = Some(email.into());
        self
    }

    pub fn build(self) -> Recipient {
        self.recipient
    }
}

/// Builder for [`Product`]. The total defaults to `quantity * unit_value`
/// rounded to cents.
pub struct ProductBuilder {
    product: Product,
}

impl ProductBuilder {
    pub fn new(
        code: impl Into<String>,
        description: impl Into<String>,
        ncm: impl Into<String>,
        cfop: impl Into<String>,
        unit: impl Into<String>,
        quantity: Decimal,
        unit_value: Decimal,
    ) -> Self {
        Self {
            product: Product {
                code: code.into(),
                gtin: None,
                description: description.into(),
                ncm: ncm.into(),
                cest: None,
                cfop: cfop.into(),
                unit: unit.into(),
                quantity,
                unit_value,
                total: round_half_away(quantity * unit_value, 2),
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
            },
        }
    }

    pub fn gtin(mut self, gtin: impl Into<String>) -> Self {
        self.product.gtin = Some(gtin.into());
        self
    }

    pub fn cest(mut self, cest: impl Into<String>) -> Self {
        self.product.cest = Some(cest.into());
        self
    }

    pub fn total(mut self, total: Decimal) -> Self {
        self.product.total = total;
        self
    }

    /// Tributary unit, quantity and unit value when they differ from the
    /// commercial ones.
    pub fn tax_unit(
        mut self,
        unit: impl Into<String>,
        quantity: Decimal,
        unit_value: Decimal,
    ) -> Self {
        self.product.tax_unit = Some(unit.into());
        self.product.tax_quantity = Some(quantity);
        self.product.tax_unit_value = Some(unit_value);
        self
    }

    pub fn tax_gtin(mut self, gtin: impl Into<String>) -> Self {
        self.product.tax_gtin = Some(gtin.into());
        self
    }

    pub fn freight(mut self, value: Decimal) -> Self {
        self.product.freight = Some(value);
        self
    }

    pub fn insurance(mut self, value: Decimal) -> Self {
        self.product.insurance = Some(value);
        self
    }

    pub fn discount(mut self, value: Decimal) -> Self {
        self.product.discount = Some(value);
        self
    }

    pub fn other(mut self, value: Decimal) -> Self {
        self.product.other = Some(value);
        self
    }

    /// Keep the item in the document but out of the product total (`indTot` 0).
    pub fn excluded_from_total(mut self) -> Self {
        self.product.include_in_total = false;
        self
    }

    pub fn additional_info(mut self, info: impl Into<String>) -> Self {
        self.product.additional_info = Some(info.into());
        self
    }

    pub fn build(self) -> Product {
        self.product
    }
}
