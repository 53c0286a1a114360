//! Producto field validation
//!
//! Each newtype can only be built through its constructor, so a value that
//! reaches the repository already satisfies the column constraints.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

use super::ValidationError;

/// Maximum length for product names (characters, not bytes)
pub const MAX_NOMBRE_LEN: usize = 150;

/// Prices are NUMERIC(10,2): at most 2 decimals, below 10^8
const PRECIO_SCALE: u32 = 2;
const PRECIO_LIMIT: i64 = 100_000_000;

/// SKU pattern: three letters, hyphen, four digits (e.g. PAN-0001)
static SKU_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]{3}-[0-9]{4}$").expect("invalid sku regex"));

/// Plain decimal or scientific notation, no separators
static PRECIO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<sign>[+-])?(?P<int>[0-9]+)(?:\.(?P<frac>[0-9]+))?(?:[eE](?P<exp>[+-]?[0-9]+))?$")
        .expect("invalid precio regex")
});

/// Validated product name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nombre(String);

impl Nombre {
    /// Create a new product name.
    ///
    /// # Rules
    /// - Non-empty (after trimming whitespace)
    /// - Max 150 characters
    ///
    /// # Example
    /// ```
    /// use panaderia_server::models::Nombre;
    ///
    /// assert!(Nombre::new("Pan Francés").is_ok());
    /// assert!(Nombre::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "nombre" });
        }

        if trimmed.chars().count() > MAX_NOMBRE_LEN {
            return Err(ValidationError::TooLong {
                field: "nombre",
                max: MAX_NOMBRE_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated stock keeping unit, always upper-case
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sku(String);

impl Sku {
    /// Create a SKU in `XXX-NNNN` format.
    ///
    /// Letters are accepted in any case and stored upper-case.
    ///
    /// # Example
    /// ```
    /// use panaderia_server::models::Sku;
    ///
    /// assert_eq!(Sku::new("pan-0001").unwrap().as_str(), "PAN-0001");
    /// assert!(Sku::new("PAN0001").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "sku" });
        }

        if !SKU_RE.is_match(trimmed) {
            return Err(ValidationError::InvalidFormat {
                field: "sku",
                reason: "must have format XXX-NNNN (e.g. PAN-0001)",
            });
        }

        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated unit price: positive, at most two decimal places
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrecioUnitario(Decimal);

impl PrecioUnitario {
    /// Validate a price.
    ///
    /// Trailing zeros don't count as decimal places (`1.500` is `1.50`),
    /// anything finer than cents is rejected rather than rounded.
    pub fn new(value: Decimal) -> Result<Self, ValidationError> {
        if value <= Decimal::ZERO {
            return Err(ValidationError::OutOfRange {
                field: "precio_unitario",
                reason: "must be greater than 0",
            });
        }

        let normalized = value.normalize();
        if normalized.scale() > PRECIO_SCALE {
            return Err(ValidationError::InvalidFormat {
                field: "precio_unitario",
                reason: "cannot have more than 2 decimal places",
            });
        }

        if normalized >= Decimal::from(PRECIO_LIMIT) {
            return Err(ValidationError::OutOfRange {
                field: "precio_unitario",
                reason: "must be less than 100000000",
            });
        }

        let mut stored = normalized;
        stored.rescale(PRECIO_SCALE);
        Ok(Self(stored))
    }

    /// Parse a price from its decimal text (plain or scientific notation).
    ///
    /// Bounds are checked on the digits before converting, so a value too
    /// large or too precise for `Decimal` reports the same error as one that
    /// merely misses the column limits.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        let caps = PRECIO_RE.captures(s).ok_or(ValidationError::InvalidType {
            field: "precio_unitario",
            expected: "a decimal number",
        })?;

        let int = caps["int"].trim_start_matches('0');
        let frac = caps.name("frac").map_or("", |m| m.as_str());
        let exp = match caps.name("exp") {
            Some(m) => m.as_str().parse::<i64>().unwrap_or(if m.as_str().starts_with('-') {
                i64::MIN / 2
            } else {
                i64::MAX / 2
            }),
            None => 0,
        };

        let significant_frac = frac.trim_end_matches('0');
        if int.is_empty() && significant_frac.is_empty() {
            return Self::new(Decimal::ZERO);
        }
        if caps.name("sign").is_some_and(|m| m.as_str() == "-") {
            return Self::new(Decimal::NEGATIVE_ONE);
        }

        let places = (significant_frac.len() as i64).saturating_sub(exp);
        if places > i64::from(PRECIO_SCALE) {
            return Err(ValidationError::InvalidFormat {
                field: "precio_unitario",
                reason: "cannot have more than 2 decimal places",
            });
        }

        // Digits left of the point once the exponent is applied
        let int_digits = if int.is_empty() {
            let leading_zeros = frac.len() - frac.trim_start_matches('0').len();
            exp.saturating_sub(leading_zeros as i64)
        } else {
            (int.len() as i64).saturating_add(exp)
        };
        if int_digits > PRECIO_LIMIT.ilog10() as i64 {
            return Err(ValidationError::OutOfRange {
                field: "precio_unitario",
                reason: "must be less than 100000000",
            });
        }

        let value = if caps.name("exp").is_some() {
            Decimal::from_scientific(s)
        } else {
            s.parse::<Decimal>()
        }
        .map_err(|_| ValidationError::InvalidType {
            field: "precio_unitario",
            expected: "a decimal number",
        })?;
        Self::new(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

/// Validated stock count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stock(i32);

impl Stock {
    /// Validate a stock count: 0 up to the INTEGER column maximum.
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if value < 0 {
            return Err(ValidationError::OutOfRange {
                field: "stock",
                reason: "cannot be negative",
            });
        }

        i32::try_from(value)
            .map(Self)
            .map_err(|_| ValidationError::OutOfRange {
                field: "stock",
                reason: "is too large",
            })
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}
