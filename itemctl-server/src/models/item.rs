//! Item payload validation
//!
//! Request bodies arrive as loosely typed JSON objects. `ItemPayload::validate`
//! turns one into `ItemFields`, the only input the store accepts.
//!
//! Column limits mirror the `items` table: `name VARCHAR(100)`,
//! `price NUMERIC(10, 2)`.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{FieldErrors, ValidationError};

/// Maximum length for item names
pub const MAX_NAME_LEN: usize = 100;

/// Total significant digits allowed in a price
pub const PRICE_MAX_DIGITS: u32 = 10;

/// Fractional digits allowed in a price
pub const PRICE_DECIMAL_PLACES: u32 = 2;

/// Raw item body as received on the wire.
///
/// Any JSON object deserializes; unknown keys (including `id`) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ItemPayload(Map<String, Value>);

impl ItemPayload {
    /// Build a payload from an arbitrary JSON value.
    ///
    /// Returns `None` if the value is not an object.
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Validate every field, collecting all failures.
    ///
    /// # Example
    /// ```
    /// use itemctl_server::models::ItemPayload;
    /// use serde_json::json;
    ///
    /// let payload = ItemPayload::from_json(json!({"name": "Pen", "price": 1.5})).unwrap();
    /// assert!(payload.validate().is_ok());
    ///
    /// let payload = ItemPayload::from_json(json!({"description": "Blue"})).unwrap();
    /// assert!(payload.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<ItemFields, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = parse_name(self.0.get("name")).map_err(|e| errors.push(e)).ok();
        let description = parse_description(self.0.get("description"))
            .map_err(|e| errors.push(e))
            .ok();
        let price = parse_price(self.0.get("price")).map_err(|e| errors.push(e)).ok();

        match (name, description, price) {
            (Some(name), Some(description), Some(price)) if errors.is_empty() => Ok(ItemFields {
                name,
                description,
                price,
            }),
            _ => Err(errors),
        }
    }
}

impl From<Map<String, Value>> for ItemPayload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Validated item fields, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFields {
    name: String,
    description: Option<String>,
    price: Decimal,
}

impl ItemFields {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Price rescaled to exactly two decimal places.
    pub fn price(&self) -> Decimal {
        self.price
    }
}

fn parse_name(value: Option<&Value>) -> Result<String, ValidationError> {
    const FIELD: &str = "name";
    let raw = match value {
        None => return Err(ValidationError::Required { field: FIELD }),
        Some(Value::Null) => return Err(ValidationError::Null { field: FIELD }),
        Some(v) => as_text(v).ok_or(ValidationError::NotAString { field: FIELD })?,
    };

    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::Blank { field: FIELD });
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: FIELD,
            max: MAX_NAME_LEN,
        });
    }
    Ok(name.to_owned())
}

fn parse_description(value: Option<&Value>) -> Result<Option<String>, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => as_text(v)
            .map(|s| Some(s.trim().to_owned()))
            .ok_or(ValidationError::NotAString {
                field: "description",
            }),
    }
}

fn parse_price(value: Option<&Value>) -> Result<Decimal, ValidationError> {
    const FIELD: &str = "price";
    let raw = match value {
        None => return Err(ValidationError::Required { field: FIELD }),
        Some(Value::Null) => return Err(ValidationError::Null { field: FIELD }),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.trim().to_owned(),
        Some(_) => return Err(ValidationError::NotANumber { field: FIELD }),
    };

    // Decimal's parser accepts digit separators.
    if raw.contains('_') {
        return Err(ValidationError::NotANumber { field: FIELD });
    }

    // Counted on the text: Decimal rounds past 28 fractional digits.
    if decimal_places(&raw).is_some_and(|places| places > u64::from(PRICE_DECIMAL_PLACES)) {
        return Err(ValidationError::TooManyDecimalPlaces {
            field: FIELD,
            max: PRICE_DECIMAL_PLACES,
        });
    }

    let parsed = Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|_| ValidationError::NotANumber { field: FIELD })?;

    // Trailing zeros don't count towards the scale: "1.500" is a valid price.
    let mut price = parsed.normalize();
    if price.scale() > PRICE_DECIMAL_PLACES {
        return Err(ValidationError::TooManyDecimalPlaces {
            field: FIELD,
            max: PRICE_DECIMAL_PLACES,
        });
    }

    let max_whole = PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES;
    if whole_digits(price) > max_whole {
        return Err(ValidationError::TooManyWholeDigits {
            field: FIELD,
            max: max_whole,
        });
    }

    price.rescale(PRICE_DECIMAL_PLACES);
    Ok(price)
}

/// Strings pass through; numbers are accepted in their JSON text form.
fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Significant fractional digits of a decimal literal such as `-1.250` or
/// `15e-3`, ignoring trailing zeros.
///
/// Returns `None` when the text is not a plain decimal literal.
fn decimal_places(raw: &str) -> Option<u64> {
    let unsigned = raw.strip_prefix(['-', '+']).unwrap_or(raw);
    let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
        Some((m, e)) => (m, e.parse::<i64>().ok()?),
        None => (unsigned, 0),
    };
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let digits = format!("{whole}{fraction}");
    let significant = digits.trim_end_matches('0').len() as i64;
    let point = (whole.len() as i64).saturating_add(exponent);
    Some(significant.saturating_sub(point).max(0) as u64)
}

fn whole_digits(value: Decimal) -> u32 {
    let whole = value.trunc().abs();
    if whole.is_zero() {
        0
    } else {
        whole.to_string().len() as u32
    }
}
