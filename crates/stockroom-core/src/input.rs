//! # Request Inputs
//!
//! Raw request payloads and their validated counterparts.
//!
//! ## Absent vs Null
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  JSON body                    FieldInput<T>         Effect on patch     │
//! │  ──────────────────────────   ──────────────────    ─────────────────   │
//! │  { }                          Absent                column untouched    │
//! │  { "cost": null }             Null                  clear / reject      │
//! │  { "cost": "4.50" }           Value("4.50")         validate + write    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Whether `Null` clears a column or is rejected depends on the field: only
//! optional columns (cost, img_url, profile extras) can be cleared.

use std::borrow::Cow;

use serde::{Deserialize, Deserializer};

use crate::money::Money;
use crate::validation::{
    validate_address, validate_available_stock, validate_avatar_url, validate_cost,
    validate_country, validate_email, validate_img_url, validate_password,
    validate_phone_number, validate_platform, validate_price, validate_product_description,
    validate_product_name, validate_username, ValidationResult,
};

// =============================================================================
// FieldInput
// =============================================================================

/// A field of a partial update: absent, explicitly null, or a value.
///
/// Struct fields of this type must carry `#[serde(default)]` so that a
/// missing key deserializes to `Absent` rather than `Null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput<T> {
    /// Key not present in the payload.
    Absent,
    /// Key present with a JSON `null`.
    Null,
    /// Key present with a value.
    Value(T),
}

impl<T> Default for FieldInput<T> {
    fn default() -> Self {
        FieldInput::Absent
    }
}

impl<T> FieldInput<T> {
    /// True unless the key was missing.
    #[inline]
    pub fn is_present(&self) -> bool {
        !matches!(self, FieldInput::Absent)
    }

    /// The value, treating `Absent` and `Null` alike.
    pub fn value(&self) -> Option<&T> {
        match self {
            FieldInput::Value(v) => Some(v),
            _ => None,
        }
    }

    /// `None` when absent, `Some(None)` when null, `Some(Some(v))` otherwise.
    pub fn present(&self) -> Option<Option<&T>> {
        match self {
            FieldInput::Absent => None,
            FieldInput::Null => Some(None),
            FieldInput::Value(v) => Some(Some(v)),
        }
    }
}

impl FieldInput<String> {
    fn present_str(&self) -> Option<Option<&str>> {
        self.present().map(|v| v.map(String::as_str))
    }
}

impl FieldInput<DecimalInput> {
    fn present_text(&self) -> Option<Option<Cow<'_, str>>> {
        self.present().map(|v| v.map(DecimalInput::as_text))
    }
}

impl<'de, T> Deserialize<'de> for FieldInput<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Only called when the key exists; missing keys hit Default.
        Option::<T>::deserialize(deserializer)
            .map(|opt| opt.map_or(FieldInput::Null, FieldInput::Value))
    }
}

/// Runs `validate` on a present field, leaving absent fields as `None`.
fn when_present<I, T>(
    input: Option<Option<I>>,
    validate: impl FnOnce(Option<I>) -> ValidationResult<T>,
) -> ValidationResult<Option<T>> {
    input.map(validate).transpose()
}

// =============================================================================
// DecimalInput
// =============================================================================

/// A decimal that arrived either as a JSON number or a JSON string.
///
/// Both forms are validated through their text so that `19.99` and
/// `"19.99"` behave the same.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DecimalInput {
    Number(serde_json::Number),
    Text(String),
}

impl DecimalInput {
    /// Textual form handed to the decimal parser.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            DecimalInput::Number(n) => Cow::Owned(n.to_string()),
            DecimalInput::Text(s) => Cow::Borrowed(s.as_str()),
        }
    }
}

impl From<&str> for DecimalInput {
    fn from(s: &str) -> Self {
        DecimalInput::Text(s.to_string())
    }
}

// =============================================================================
// Product Create
// =============================================================================

/// Payload of a product creation request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProductDraft {
    pub name: FieldInput<String>,
    pub description: FieldInput<String>,
    pub available_stock: FieldInput<i64>,
    pub price: FieldInput<DecimalInput>,
    pub cost: FieldInput<DecimalInput>,
    pub platform: FieldInput<String>,
    pub img_url: FieldInput<String>,
}

/// A validated product ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub available_stock: i64,
    pub price: Money,
    pub cost: Option<Money>,
    pub platform: Option<String>,
    pub img_url: Option<String>,
}

impl ProductDraft {
    /// Validates every field and produces the insertable record.
    ///
    /// Name, stock and price are required. Description and platform may be
    /// omitted but not sent as null. Cost and image URL may be either.
    pub fn validate(&self) -> ValidationResult<NewProduct> {
        let name = validate_product_name(self.name.value().map(String::as_str))?;
        let description = when_present(self.description.present_str(), validate_product_description)?;
        let available_stock = validate_available_stock(self.available_stock.value().copied())?;
        let price = validate_price(self.price.value().map(DecimalInput::as_text).as_deref())?;
        let cost = when_present(self.cost.present_text(), |v| validate_cost(v.as_deref()))?.flatten();
        let platform = when_present(self.platform.present_str(), validate_platform)?;
        let img_url = when_present(self.img_url.present_str(), validate_img_url)?.flatten();

        Ok(NewProduct {
            name,
            description,
            available_stock,
            price,
            cost,
            platform,
            img_url,
        })
    }
}

// =============================================================================
// Product Patch
// =============================================================================

/// Payload of a partial product update.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProductPatch {
    pub name: FieldInput<String>,
    pub description: FieldInput<String>,
    pub available_stock: FieldInput<i64>,
    pub price: FieldInput<DecimalInput>,
    pub cost: FieldInput<DecimalInput>,
    pub platform: FieldInput<String>,
    pub img_url: FieldInput<String>,
}

/// The validated columns a patch will write.
///
/// `None` leaves a column untouched. For the nullable columns the inner
/// option is the new value, so `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available_stock: Option<i64>,
    pub price: Option<Money>,
    pub cost: Option<Option<Money>>,
    pub platform: Option<String>,
    pub img_url: Option<Option<String>>,
}

impl ProductPatch {
    /// True when the payload carried no known field at all.
    pub fn is_empty(&self) -> bool {
        !(self.name.is_present()
            || self.description.is_present()
            || self.available_stock.is_present()
            || self.price.is_present()
            || self.cost.is_present()
            || self.platform.is_present()
            || self.img_url.is_present())
    }

    /// Validates only the fields that are present.
    pub fn validate(&self) -> ValidationResult<ProductChanges> {
        Ok(ProductChanges {
            name: when_present(self.name.present_str(), validate_product_name)?,
            description: when_present(self.description.present_str(), validate_product_description)?,
            available_stock: when_present(
                self.available_stock.present().map(|v| v.copied()),
                validate_available_stock,
            )?,
            price: when_present(self.price.present_text(), |v| validate_price(v.as_deref()))?,
            cost: when_present(self.cost.present_text(), |v| validate_cost(v.as_deref()))?,
            platform: when_present(self.platform.present_str(), validate_platform)?,
            img_url: when_present(self.img_url.present_str(), validate_img_url)?,
        })
    }
}

impl ProductChanges {
    /// True when nothing would be written.
    pub fn is_empty(&self) -> bool {
        *self == ProductChanges::default()
    }
}

// =============================================================================
// Profile Patch
// =============================================================================

/// Payload of a partial profile update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProfilePatch {
    pub username: FieldInput<String>,
    pub avatar_url: FieldInput<String>,
    pub address: FieldInput<String>,
    pub country: FieldInput<String>,
    pub phone_number: FieldInput<String>,
}

/// Validated profile columns. Same conventions as [`ProductChanges`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub username: Option<String>,
    pub avatar_url: Option<Option<String>>,
    pub address: Option<Option<String>>,
    pub country: Option<Option<String>>,
    pub phone_number: Option<String>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        !(self.username.is_present()
            || self.avatar_url.is_present()
            || self.address.is_present()
            || self.country.is_present()
            || self.phone_number.is_present())
    }

    pub fn validate(&self) -> ValidationResult<ProfileChanges> {
        Ok(ProfileChanges {
            username: when_present(self.username.present_str(), validate_username)?,
            avatar_url: when_present(self.avatar_url.present_str(), validate_avatar_url)?,
            address: when_present(self.address.present_str(), validate_address)?,
            country: when_present(self.country.present_str(), validate_country)?,
            phone_number: when_present(self.phone_number.present_str(), validate_phone_number)?,
        })
    }
}

// =============================================================================
// Account Changes
// =============================================================================

/// Request to change the account email.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EmailChange {
    pub email: Option<String>,
}

impl EmailChange {
    /// Returns the normalized new email.
    pub fn validate(&self) -> ValidationResult<String> {
        validate_email(self.email.as_deref())
    }
}

/// Request to change the account password.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PasswordChange {
    pub password: Option<String>,
    pub new_password: Option<String>,
}

/// Both passwords after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPasswordChange {
    pub current: String,
    pub new: String,
}

impl PasswordChange {
    pub fn validate(&self) -> ValidationResult<ValidPasswordChange> {
        Ok(ValidPasswordChange {
            current: validate_password(self.password.as_deref())?,
            new: validate_password(self.new_password.as_deref())?,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
