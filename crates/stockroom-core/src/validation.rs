//! # Validation Module
//!
//! Field validators for products, accounts and profiles.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP boundary (axum Json extractor)                          │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── Absent / null / value per field (FieldInput)                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Normalization (trim, quantize, URL canonical form)                │
//! │  └── Rejection (length, charset, bounds)                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── UNIQUE(user_id, name)                                             │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every validator takes `Option<&str>` (or `Option<i64>`) where `None` is a
//! JSON `null`, and returns the normalized value. Lengths count characters.
//!
//! ## Usage
//! ```rust
//! use stockroom_core::validation::{validate_product_name, validate_price};
//!
//! assert_eq!(validate_product_name(Some("  Desk Lamp ")).unwrap(), "Desk Lamp");
//! assert_eq!(validate_price(Some("19.999")).unwrap().cents(), 2000);
//! ```

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use url::Url;

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_PRICE_CENTS, MAX_STOCK};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"));

static COUNTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-zÀ-ÿ\s'-]+$").expect("country pattern is valid"));

// =============================================================================
// Shared Helpers
// =============================================================================

/// Trims the value and rejects null or blank input.
fn required_text<'a>(field: &str, value: Option<&'a str>) -> ValidationResult<&'a str> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(ValidationError::required(field)),
    }
}

/// Checks the character count against inclusive bounds.
fn check_length(field: &str, text: &str, min: usize, max: usize) -> ValidationResult<()> {
    let len = text.chars().count();
    if len < min {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min,
        });
    }
    if len > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

/// Parses a decimal from its textual form.
///
/// Accepts plain notation (`"19.99"`) and the exponent form serde_json
/// produces for very large or very small numbers (`"1e20"`).
fn parse_decimal(field: &str, text: &str) -> ValidationResult<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| ValidationError::invalid_format(field, "must be a decimal number"))
}

fn validate_money(field: &str, value: Option<&str>) -> ValidationResult<Money> {
    let text = required_text(field, value).map_err(|_| match value {
        // Present but blank is a format problem, not a missing value
        Some(_) => ValidationError::invalid_format(field, "must be a decimal number"),
        None => ValidationError::required(field),
    })?;
    let amount = parse_decimal(field, text)?;

    let max = Money::from_cents(MAX_PRICE_CENTS);
    if amount < Decimal::ZERO || amount > max.to_decimal() {
        return Err(ValidationError::out_of_range(field, Money::zero(), max));
    }

    Money::from_decimal(amount)
        .ok_or_else(|| ValidationError::out_of_range(field, Money::zero(), max))
}

fn validate_http_url(field: &str, text: &str) -> ValidationResult<String> {
    let url = Url::parse(text.trim())
        .map_err(|e| ValidationError::invalid_format(field, e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ValidationError::invalid_format(field, "scheme must be http or https"));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(ValidationError::invalid_format(field, "must include a host"));
    }

    Ok(url.to_string())
}

// =============================================================================
// Product Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Trimmed, then 2 to 100 characters
/// - ASCII letters, digits and whitespace only
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::validate_product_name;
///
/// assert!(validate_product_name(Some("Desk Lamp 2")).is_ok());
/// assert!(validate_product_name(Some("Lamp-2")).is_err());
/// assert!(validate_product_name(None).is_err());
/// ```
pub fn validate_product_name(value: Option<&str>) -> ValidationResult<String> {
    let name = required_text("name", value)?;
    check_length("name", name, 2, 100)?;

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
    {
        return Err(ValidationError::invalid_format(
            "name",
            "must contain only letters, numbers and spaces",
        ));
    }

    Ok(name.to_string())
}

/// Validates a product description.
///
/// ## Rules
/// - Trimmed, then 1 to 1000 characters
/// - No tag-like substrings (`<b>`, `<script src=x>`)
pub fn validate_product_description(value: Option<&str>) -> ValidationResult<String> {
    let description = required_text("description", value)?;
    check_length("description", description, 1, 1000)?;

    if HTML_TAG.is_match(description) {
        return Err(ValidationError::invalid_format(
            "description",
            "must not contain HTML tags",
        ));
    }

    Ok(description.to_string())
}

/// Validates the units in stock.
///
/// ## Rules
/// - Required
/// - 0 to 999 999 inclusive
pub fn validate_available_stock(value: Option<i64>) -> ValidationResult<i64> {
    let stock = value.ok_or_else(|| ValidationError::required("available_stock"))?;

    if !(0..=MAX_STOCK).contains(&stock) {
        return Err(ValidationError::out_of_range("available_stock", 0, MAX_STOCK));
    }

    Ok(stock)
}

/// Validates a sale price given in textual decimal form.
///
/// ## Rules
/// - Required, must parse as a decimal
/// - 0.00 to 999 999.99 inclusive, checked before rounding
/// - Rounded to 2 fractional digits, half to even
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::validate_price;
///
/// assert_eq!(validate_price(Some("999999.99")).unwrap().cents(), 99_999_999);
/// assert!(validate_price(Some("1000000.00")).is_err());
/// assert!(validate_price(Some("abc")).is_err());
/// ```
pub fn validate_price(value: Option<&str>) -> ValidationResult<Money> {
    validate_money("price", value)
}

/// Validates a purchase cost. `None` stays unknown.
pub fn validate_cost(value: Option<&str>) -> ValidationResult<Option<Money>> {
    value.map(|text| validate_money("cost", Some(text))).transpose()
}

/// Validates the sales platform.
///
/// ## Rules
/// - Trimmed, then 2 to 35 characters
pub fn validate_platform(value: Option<&str>) -> ValidationResult<String> {
    let platform = required_text("platform", value)?;
    check_length("platform", platform, 2, 35)?;
    Ok(platform.to_string())
}

/// Validates a product image URL. `None` stays unset.
///
/// Returns the canonical form of the URL (`https://cdn.example.com` becomes
/// `https://cdn.example.com/`).
pub fn validate_img_url(value: Option<&str>) -> ValidationResult<Option<String>> {
    value.map(|text| validate_http_url("img_url", text)).transpose()
}

// =============================================================================
// Account Validators
// =============================================================================

/// Validates and normalizes an email address.
///
/// ## Rules
/// - Trimmed, at most 254 characters, no whitespace
/// - Exactly one `@` with a non-empty local part
/// - Domain has at least two non-empty labels (`example.com`)
///
/// The domain is lowercased; the local part is kept as typed.
pub fn validate_email(value: Option<&str>) -> ValidationResult<String> {
    let email = required_text("email", value)?;
    check_length("email", email, 3, 254)?;

    let invalid = || ValidationError::invalid_format("email", "must be a valid email address");

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(invalid());
    }

    Ok(format!("{}@{}", local, domain.to_lowercase()))
}

/// Validates a password.
///
/// ## Rules
/// - Trimmed, then 6 to 128 characters
/// - At least one uppercase letter, one lowercase letter and one symbol
pub fn validate_password(value: Option<&str>) -> ValidationResult<String> {
    let password = required_text("password", value)?;
    check_length("password", password, 6, 128)?;

    let has_upper = password.chars().any(char::is_uppercase);
    let has_lower = password.chars().any(char::is_lowercase);
    let has_symbol = password.chars().any(|c| !c.is_alphanumeric());

    if !(has_upper && has_lower && has_symbol) {
        return Err(ValidationError::invalid_format(
            "password",
            "must contain an uppercase letter, a lowercase letter and a symbol",
        ));
    }

    Ok(password.to_string())
}

// =============================================================================
// Profile Validators
// =============================================================================

/// Validates a username: 3 to 15 ASCII letters, digits or underscores.
pub fn validate_username(value: Option<&str>) -> ValidationResult<String> {
    let username = required_text("username", value)?;
    check_length("username", username, 3, 15)?;

    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(ValidationError::invalid_format(
            "username",
            "must contain only letters, numbers and underscores",
        ));
    }

    Ok(username.to_string())
}

/// Validates an avatar URL. `None` clears it.
pub fn validate_avatar_url(value: Option<&str>) -> ValidationResult<Option<String>> {
    value.map(|text| validate_http_url("avatar_url", text)).transpose()
}

/// Validates a postal address. `None` clears it.
pub fn validate_address(value: Option<&str>) -> ValidationResult<Option<String>> {
    value
        .map(|text| {
            let address = required_text("address", Some(text))?;
            check_length("address", address, 5, 120)?;
            Ok(address.to_string())
        })
        .transpose()
}

/// Validates a country name. `None` clears it.
///
/// Letters (including Latin-1 accented ones), spaces, apostrophes and
/// hyphens: `Côte d'Ivoire`, `Guinea-Bissau`.
pub fn validate_country(value: Option<&str>) -> ValidationResult<Option<String>> {
    value
        .map(|text| {
            let country = required_text("country", Some(text))?;
            check_length("country", country, 2, 56)?;
            if !COUNTRY.is_match(country) {
                return Err(ValidationError::invalid_format(
                    "country",
                    "must contain only letters, spaces, apostrophes and hyphens",
                ));
            }
            Ok(country.to_string())
        })
        .transpose()
}

/// Validates a phone number: required, 4 to 25 characters.
pub fn validate_phone_number(value: Option<&str>) -> ValidationResult<String> {
    let phone = required_text("phone_number", value)?;
    check_length("phone_number", phone, 4, 25)?;
    Ok(phone.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_name() {
        assert_eq!(validate_product_name(Some("  Desk Lamp  ")).unwrap(), "Desk Lamp");
        assert!(validate_product_name(Some("AB")).is_ok());
        assert!(validate_product_name(Some(&"A".repeat(100))).is_ok());

        assert_eq!(
            validate_product_name(Some("A")),
            Err(ValidationError::TooShort {
                field: "name".to_string(),
                min: 2
            })
        );
        assert!(validate_product_name(Some(&"A".repeat(101))).is_err());
        assert!(validate_product_name(Some("Lamp!")).is_err());
        assert!(validate_product_name(Some("Lâmpada")).is_err());
        assert_eq!(validate_product_name(Some("   ")), Err(ValidationError::required("name")));
        assert_eq!(validate_product_name(None), Err(ValidationError::required("name")));
    }

    #[test]
    fn test_validate_product_description() {
        assert_eq!(
            validate_product_description(Some(" Warm light ")).unwrap(),
            "Warm light"
        );
        assert!(validate_product_description(Some("x")).is_ok());
        assert!(validate_product_description(Some("2 < 3")).is_ok());

        assert!(validate_product_description(Some("<b>bold</b>")).is_err());
        // Any `<...>` span counts as a tag, even in plain comparisons
        assert!(validate_product_description(Some("2 < 3 and 4 > 1")).is_err());
        assert!(validate_product_description(Some("hi <script src=x>")).is_err());
        assert!(validate_product_description(Some(&"d".repeat(1001))).is_err());
        assert!(validate_product_description(Some("")).is_err());
        assert!(validate_product_description(None).is_err());
    }

    #[test]
    fn test_validate_available_stock() {
        assert_eq!(validate_available_stock(Some(0)), Ok(0));
        assert_eq!(validate_available_stock(Some(999_999)), Ok(999_999));
        assert!(validate_available_stock(Some(-1)).is_err());
        assert!(validate_available_stock(Some(1_000_000)).is_err());
        assert_eq!(
            validate_available_stock(None),
            Err(ValidationError::required("available_stock"))
        );
    }

    #[test]
    fn test_validate_price_bounds() {
        assert_eq!(validate_price(Some("999999.99")).unwrap().cents(), 99_999_999);
        assert_eq!(validate_price(Some("0")).unwrap().cents(), 0);
        assert_eq!(validate_price(Some("-0.00")).unwrap().cents(), 0);

        assert!(validate_price(Some("1000000.00")).is_err());
        assert!(validate_price(Some("999999.994")).is_err());
        assert!(validate_price(Some("-0.01")).is_err());
        assert!(validate_price(Some("1e20")).is_err());
    }

    #[test]
    fn test_validate_price_quantizes() {
        assert_eq!(validate_price(Some(" 19.99 ")).unwrap().cents(), 1999);
        assert_eq!(validate_price(Some("19.994")).unwrap().cents(), 1999);
        assert_eq!(validate_price(Some("19.995")).unwrap().cents(), 2000);
        assert_eq!(validate_price(Some("7")).unwrap().cents(), 700);
        // Midpoints go to the even cent
        assert_eq!(validate_price(Some("0.125")).unwrap().cents(), 12);
        assert_eq!(validate_price(Some("19.985")).unwrap().cents(), 1998);
        assert_eq!(validate_price(Some("2.675")).unwrap().cents(), 268);
        assert_eq!(validate_price(Some("0.005")).unwrap().cents(), 0);
        assert_eq!(validate_cost(Some("0.125")).unwrap(), Some(Money::from_cents(12)));
        assert_eq!(validate_price(Some("1e2")).unwrap().cents(), 10_000);
    }

    #[test]
    fn test_validate_price_rejects_garbage() {
        assert_eq!(validate_price(None), Err(ValidationError::required("price")));
        assert!(matches!(
            validate_price(Some("abc")),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            validate_price(Some("")),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_validate_cost() {
        assert_eq!(validate_cost(None), Ok(None));
        assert_eq!(validate_cost(Some("10")).unwrap(), Some(Money::from_cents(1000)));
        assert_eq!(validate_cost(Some("-1")).unwrap_err().field(), "cost");
    }

    #[test]
    fn test_validate_platform() {
        assert_eq!(validate_platform(Some(" Etsy ")).unwrap(), "Etsy");
        assert!(validate_platform(Some("E")).is_err());
        assert!(validate_platform(Some(&"p".repeat(36))).is_err());
        assert!(validate_platform(None).is_err());
    }

    #[test]
    fn test_validate_img_url() {
        assert_eq!(validate_img_url(None), Ok(None));
        assert_eq!(
            validate_img_url(Some("https://cdn.example.com/lamp.png")).unwrap(),
            Some("https://cdn.example.com/lamp.png".to_string())
        );
        assert!(validate_img_url(Some("not a url")).is_err());
        assert!(validate_img_url(Some("ftp://cdn.example.com/x")).is_err());
        assert!(validate_img_url(Some("/relative/path.png")).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(
            validate_email(Some(" Owner@Example.COM ")).unwrap(),
            "Owner@example.com"
        );
        assert!(validate_email(Some("no-at-sign")).is_err());
        assert!(validate_email(Some("@example.com")).is_err());
        assert!(validate_email(Some("a@localhost")).is_err());
        assert!(validate_email(Some("a@b@c.com")).is_err());
        assert!(validate_email(Some("a b@c.com")).is_err());
        assert!(validate_email(None).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password(Some("Secret!1")).is_ok());
        assert!(validate_password(Some("Ab!")).is_err());
        assert!(validate_password(Some("secret!1")).is_err());
        assert!(validate_password(Some("SECRET!1")).is_err());
        assert!(validate_password(Some("Secret11")).is_err());
    }

    #[test]
    fn test_validate_username() {
        assert_eq!(validate_username(Some("shop_owner")).unwrap(), "shop_owner");
        assert!(validate_username(Some("ab")).is_err());
        assert!(validate_username(Some("a".repeat(16).as_str())).is_err());
        assert!(validate_username(Some("shop-owner")).is_err());
        assert!(validate_username(None).is_err());
    }

    #[test]
    fn test_validate_profile_optionals() {
        assert_eq!(validate_address(None), Ok(None));
        assert!(validate_address(Some("Main")).is_err());
        assert_eq!(
            validate_address(Some(" 12 Main St ")).unwrap(),
            Some("12 Main St".to_string())
        );

        assert_eq!(validate_country(None), Ok(None));
        assert!(validate_country(Some("Côte d'Ivoire")).is_ok());
        assert!(validate_country(Some("Guinea-Bissau")).is_ok());
        assert!(validate_country(Some("Land 42")).is_err());
        assert!(validate_country(Some("X")).is_err());

        assert_eq!(validate_avatar_url(None), Ok(None));
        assert!(validate_avatar_url(Some("mailto:x@y.com")).is_err());
    }

    #[test]
    fn test_validate_phone_number() {
        assert_eq!(validate_phone_number(Some(" +1 555 0100 ")).unwrap(), "+1 555 0100");
        assert!(validate_phone_number(Some("123")).is_err());
        assert!(validate_phone_number(Some(&"9".repeat(26))).is_err());
        assert!(validate_phone_number(None).is_err());
    }
}
