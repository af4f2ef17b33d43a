use serde::{Deserialize, Serialize};

use super::types::{DocumentModel, EmissionType, Environment};

/// Builder-level defaults and behavior toggles.
///
/// Deserializable so callers can keep it in their own config files; every
/// missing key falls back to [`BuilderConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Used when the identification leaves `tpAmb` unset.
    pub environment: Environment,
    /// Used when the identification leaves `mod` unset.
    pub model: DocumentModel,
    /// Used when the identification leaves `tpEmis` unset.
    pub emission_type: EmissionType,
    /// Reject items whose GTINs fail the GS1 check.
    pub validate_gtin: bool,
    /// Strip diacritics from free text.
    pub remove_accents: bool,
    /// Round totals to 2 decimal places when finalizing.
    pub round_values: bool,
    /// Feed every added item into the totalizer.
    pub auto_totals: bool,
    /// `verProc` written when the identification leaves it unset.
    pub app_version: String,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Homologation,
            model: DocumentModel::Nfe,
            emission_type: EmissionType::Normal,
            validate_gtin: true,
            remove_accents: true,
            round_values: true,
            auto_totals: true,
            app_version: concat!("nota ", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl BuilderConfig {
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_model(mut self, model: DocumentModel) -> Self {
        self.model = model;
        self
    }

    pub fn with_emission_type(mut self, emission_type: EmissionType) -> Self {
        self.emission_type = emission_type;
        self
    }

    pub fn with_gtin_validation(mut self, enabled: bool) -> Self {
        self.validate_gtin = enabled;
        self
    }

    pub fn with_accent_removal(mut self, enabled: bool) -> Self {
        self.remove_accents = enabled;
        self
    }

    pub fn with_rounding(mut self, enabled: bool) -> Self {
        self.round_values = enabled;
        self
    }

    pub fn with_auto_totals(mut self, enabled: bool) -> Self {
        self.auto_totals = enabled;
        self
    }

    pub fn with_app_version(mut self, version: impl Into<String>) -> Self {
        self.app_version = version.into();
        self
    }
}
