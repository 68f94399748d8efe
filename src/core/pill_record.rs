use serde::{Deserialize, Deserializer, Serialize};

use crate::matching::normalize_imprint;

/// Placeholder shown for every text field a source could not supply
pub const UNKNOWN: &str = "Unknown";

const REFERENCE_IMAGE_BASE: &str = "https://www.drugs.com/images/pills/mtm";

fn default_unknown() -> String {
    UNKNOWN.to_string()
}

/// Replace blank text with the `Unknown` placeholder
pub fn or_unknown(value: impl Into<String>) -> String {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default_unknown()
    } else if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_string()
    }
}

/// Deserialize a text field, mapping null and blank strings to `Unknown`
fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(or_unknown(value.unwrap_or_default()))
}

/// Deserialize `uses` from either a string or a list of strings
fn deserialize_uses<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum UsesValue {
        Text(String),
        List(Vec<String>),
        Null,
    }

    let joined = match UsesValue::deserialize(deserializer)? {
        UsesValue::Text(s) => s,
        UsesValue::List(items) => items
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        UsesValue::Null => String::new(),
    };
    Ok(or_unknown(joined))
}

/// Deserialize the imprint, trimmed; absent or null becomes empty
fn deserialize_imprint<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default().trim().to_string())
}

/// Deserialize an optional URL, treating blank strings as absent
fn deserialize_url<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// A candidate medication/imprint entry, from the local store or a live source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PillRecord {
    /// Store id (0 for transient live-source records)
    #[serde(default)]
    pub id: i64,

    /// Imprint code as printed, e.g. "L484" or "IP 109"; never defaulted
    #[serde(default, deserialize_with = "deserialize_imprint")]
    pub imprint: String,

    #[serde(default = "default_unknown", deserialize_with = "deserialize_text")]
    pub color: String,

    #[serde(default = "default_unknown", deserialize_with = "deserialize_text")]
    pub shape: String,

    #[serde(default = "default_unknown", deserialize_with = "deserialize_text")]
    pub drug_name: String,

    #[serde(default = "default_unknown", deserialize_with = "deserialize_text")]
    pub generic_name: String,

    /// Strength with unit suffix ("500 mg", "325 mg / 10 mg")
    #[serde(default = "default_unknown", deserialize_with = "deserialize_text")]
    pub strength: String,

    #[serde(default = "default_unknown", deserialize_with = "deserialize_text")]
    pub drug_class: String,

    /// Comma-joined list of uses
    #[serde(default = "default_unknown", deserialize_with = "deserialize_uses")]
    pub uses: String,

    /// Reference image locator
    #[serde(default, deserialize_with = "deserialize_url")]
    pub image_url: Option<String>,

    /// Detail page on the live source
    #[serde(default, deserialize_with = "deserialize_url", skip_serializing_if = "Option::is_none")]
    pub detail_url: Option<String>,
}

impl PillRecord {
    /// Create a record with the required fields; everything else is `Unknown`
    pub fn new(imprint: impl Into<String>, drug_name: impl Into<String>) -> Self {
        let imprint: String = imprint.into();
        let drug_name = or_unknown(drug_name);
        Self {
            id: 0,
            imprint: imprint.trim().to_string(),
            color: default_unknown(),
            shape: default_unknown(),
            generic_name: drug_name.clone(),
            drug_name,
            strength: default_unknown(),
            drug_class: default_unknown(),
            uses: default_unknown(),
            image_url: None,
            detail_url: None,
        }
    }

    /// Set color and shape
    pub fn with_appearance(mut self, color: impl Into<String>, shape: impl Into<String>) -> Self {
        self.color = or_unknown(color);
        self.shape = or_unknown(shape);
        self
    }

    /// Set strength
    pub fn with_strength(mut self, strength: impl Into<String>) -> Self {
        self.strength = or_unknown(strength);
        self
    }

    /// Set drug class and uses
    pub fn with_class(mut self, drug_class: impl Into<String>, uses: impl Into<String>) -> Self {
        self.drug_class = or_unknown(drug_class);
        self.uses = or_unknown(uses);
        self
    }

    /// Canonical imprint used for comparisons
    pub fn normalized_imprint(&self) -> String {
        normalize_imprint(&self.imprint)
    }

    /// Image to display: the stored one, else the conventional reference image for the imprint
    pub fn reference_image_url(&self) -> Option<String> {
        if let Some(url) = &self.image_url {
            return Some(url.clone());
        }
        reference_image_for(&self.imprint)
    }

    /// Get display name (for logging/UI)
    pub fn display_name(&self) -> String {
        if self.strength == UNKNOWN {
            format!("{} [{}]", self.drug_name, self.imprint)
        } else {
            format!("{} {} [{}]", self.drug_name, self.strength, self.imprint)
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Conventional reference image location for an imprint, if it has any usable characters
pub fn reference_image_for(imprint: &str) -> Option<String> {
    let slug = normalize_imprint(imprint);
    if slug.is_empty() {
        None
    } else {
        Some(format!("{}/{}.JPG", REFERENCE_IMAGE_BASE, slug))
    }
}
