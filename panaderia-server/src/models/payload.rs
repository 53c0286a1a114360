//! Inbound producto payloads
//!
//! The body is deserialized loosely (every field an optional JSON value) and
//! then checked field by field, so one response can list every violation
//! instead of stopping at the first type mismatch.

use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::{Categoria, Nombre, PrecioUnitario, Sku, Stock, ValidationError, ValidationErrors};

/// Raw create/update body. `null` is treated the same as an absent field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductoPayload {
    pub nombre: Option<JsonValue>,
    pub sku: Option<JsonValue>,
    pub categoria: Option<JsonValue>,
    pub precio_unitario: Option<JsonValue>,
    pub stock: Option<JsonValue>,
    pub disponible: Option<JsonValue>,
}

/// Fully validated producto ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NewProducto {
    pub nombre: Nombre,
    pub sku: Sku,
    pub categoria: Categoria,
    pub precio_unitario: PrecioUnitario,
    pub stock: Stock,
    pub disponible: bool,
}

/// Validated partial update; `None` leaves the column untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductoChanges {
    pub nombre: Option<Nombre>,
    pub sku: Option<Sku>,
    pub categoria: Option<Categoria>,
    pub precio_unitario: Option<PrecioUnitario>,
    pub stock: Option<Stock>,
    pub disponible: Option<bool>,
}

impl ProductoChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Validated fields of a payload, before required-ness is enforced
struct Checked {
    changes: ProductoChanges,
    errors: Vec<ValidationError>,
}

impl ProductoPayload {
    /// Validate for creation: all fields except `disponible` are required.
    pub fn into_new(self) -> Result<NewProducto, ValidationErrors> {
        let Checked {
            changes,
            mut errors,
        } = self.check();

        // Only report "required" for fields that were absent, not invalid
        let reported = |errors: &[ValidationError], field: &str| {
            errors.iter().any(|e| e.field() == field)
        };
        for (field, present) in [
            ("nombre", changes.nombre.is_some()),
            ("sku", changes.sku.is_some()),
            ("categoria", changes.categoria.is_some()),
            ("precio_unitario", changes.precio_unitario.is_some()),
            ("stock", changes.stock.is_some()),
        ] {
            if !present && !reported(&errors, field) {
                errors.push(ValidationError::Required { field });
            }
        }

        if let Some(errors) = ValidationErrors::from_vec(errors) {
            return Err(errors);
        }

        match changes {
            ProductoChanges {
                nombre: Some(nombre),
                sku: Some(sku),
                categoria: Some(categoria),
                precio_unitario: Some(precio_unitario),
                stock: Some(stock),
                disponible,
            } => Ok(NewProducto {
                nombre,
                sku,
                categoria,
                precio_unitario,
                stock,
                disponible: disponible.unwrap_or(true),
            }),
            // Every missing field was pushed as Required above
            _ => Err(ValidationError::InvalidBody {
                reason: "incomplete producto".into(),
            }
            .into()),
        }
    }

    /// Validate for update: only supplied fields are checked.
    pub fn into_changes(self) -> Result<ProductoChanges, ValidationErrors> {
        let Checked { changes, errors } = self.check();
        match ValidationErrors::from_vec(errors) {
            Some(errors) => Err(errors),
            None => Ok(changes),
        }
    }

    fn check(self) -> Checked {
        let mut errors = Vec::new();
        let changes = ProductoChanges {
            nombre: collect(&mut errors, self.nombre.map(nombre)),
            sku: collect(&mut errors, self.sku.map(sku)),
            categoria: collect(&mut errors, self.categoria.map(categoria)),
            precio_unitario: collect(&mut errors, self.precio_unitario.map(precio_unitario)),
            stock: collect(&mut errors, self.stock.map(stock)),
            disponible: collect(&mut errors, self.disponible.map(disponible)),
        };
        Checked { changes, errors }
    }
}

fn collect<T>(
    errors: &mut Vec<ValidationError>,
    checked: Option<Result<T, ValidationError>>,
) -> Option<T> {
    match checked? {
        Ok(v) => Some(v),
        Err(e) => {
            errors.push(e);
            None
        }
    }
}

fn text<'a>(field: &'static str, v: &'a JsonValue) -> Result<&'a str, ValidationError> {
    v.as_str().ok_or(ValidationError::InvalidType {
        field,
        expected: "a string",
    })
}

fn nombre(v: JsonValue) -> Result<Nombre, ValidationError> {
    Nombre::new(text("nombre", &v)?)
}

fn sku(v: JsonValue) -> Result<Sku, ValidationError> {
    Sku::new(text("sku", &v)?)
}

fn categoria(v: JsonValue) -> Result<Categoria, ValidationError> {
    text("categoria", &v)?.parse()
}

fn precio_unitario(v: JsonValue) -> Result<PrecioUnitario, ValidationError> {
    match v {
        // serde_json renders floats with the shortest round-trip text, so
        // 1.25 arrives as "1.25" rather than its binary expansion
        JsonValue::Number(n) => PrecioUnitario::parse(&n.to_string()),
        JsonValue::String(s) => PrecioUnitario::parse(&s),
        _ => Err(ValidationError::InvalidType {
            field: "precio_unitario",
            expected: "a decimal number",
        }),
    }
}

fn stock(v: JsonValue) -> Result<Stock, ValidationError> {
    match &v {
        JsonValue::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => Stock::new(i),
            (None, Some(_)) => Err(ValidationError::OutOfRange {
                field: "stock",
                reason: "is too large",
            }),
            _ => Err(ValidationError::InvalidType {
                field: "stock",
                expected: "an integer",
            }),
        },
        _ => Err(ValidationError::InvalidType {
            field: "stock",
            expected: "an integer",
        }),
    }
}

fn disponible(v: JsonValue) -> Result<bool, ValidationError> {
    v.as_bool().ok_or(ValidationError::InvalidType {
        field: "disponible",
        expected: "a boolean",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(v: JsonValue) -> ProductoPayload {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn create_defaults_disponible() {
        let new = payload(json!({
            "nombre": "Pan Francés",
            "sku": "PAN-0001",
            "categoria": "Pan",
            "precio_unitario": 1.25,
            "stock": 120
        }))
        .into_new()
        .unwrap();

        assert_eq!(new.nombre.as_str(), "Pan Francés");
        assert_eq!(new.sku.as_str(), "PAN-0001");
        assert_eq!(new.categoria, Categoria::Pan);
        assert_eq!(new.precio_unitario.value().to_string(), "1.25");
        assert_eq!(new.stock.value(), 120);
        assert!(new.disponible);
    }

    #[test]
    fn create_accepts_price_as_string() {
        let new = payload(json!({
            "nombre": "Croissant",
            "sku": "pas-0101",
            "categoria": "Pastelería",
            "precio_unitario": "2.75",
            "stock": 60,
            "disponible": false
        }))
        .into_new()
        .unwrap();

        assert_eq!(new.sku.as_str(), "PAS-0101");
        assert_eq!(new.categoria, Categoria::Pasteleria);
        assert!(!new.disponible);
    }

    #[test]
    fn create_reports_every_missing_field() {
        let errors = payload(json!({})).into_new().unwrap_err();
        for field in ["nombre", "sku", "categoria", "precio_unitario", "stock"] {
            assert!(errors.has_field(field), "missing {field}");
        }
        assert!(!errors.has_field("disponible"));
        assert_eq!(errors.errors().len(), 5);
    }

    #[test]
    fn create_reports_every_invalid_field() {
        let errors = payload(json!({
            "nombre": "",
            "sku": "PAN0001",
            "categoria": "Galletas",
            "precio_unitario": 0,
            "stock": -5,
            "disponible": "yes"
        }))
        .into_new()
        .unwrap_err();

        assert_eq!(errors.errors().len(), 6);
        // invalid fields are not additionally reported as required
        assert!(!errors
            .errors()
            .iter()
            .any(|e| matches!(e, ValidationError::Required { .. })));
    }

    #[test]
    fn null_counts_as_missing() {
        let errors = payload(json!({
            "nombre": null,
            "sku": "PAN-0001",
            "categoria": "Pan",
            "precio_unitario": 1.25,
            "stock": 1
        }))
        .into_new()
        .unwrap_err();

        assert_eq!(
            errors.errors(),
            &[ValidationError::Required { field: "nombre" }]
        );
    }

    #[test]
    fn rejects_fractional_price_and_stock() {
        let errors = payload(json!({
            "nombre": "Pan",
            "sku": "PAN-0002",
            "categoria": "Pan",
            "precio_unitario": 1.255,
            "stock": 1.5
        }))
        .into_new()
        .unwrap_err();

        assert!(errors.has_field("precio_unitario"));
        assert!(errors.has_field("stock"));
    }

    #[test]
    fn extreme_price_numbers_keep_their_reason() {
        let errors = payload(json!({ "precio_unitario": 1e30 }))
            .into_changes()
            .unwrap_err();
        assert!(matches!(
            errors.errors(),
            [ValidationError::OutOfRange { field: "precio_unitario", .. }]
        ));

        let errors = payload(json!({ "precio_unitario": 1e-30 }))
            .into_changes()
            .unwrap_err();
        assert!(matches!(
            errors.errors(),
            [ValidationError::InvalidFormat { field: "precio_unitario", .. }]
        ));

        let errors = payload(json!({ "precio_unitario": "1_0.5" }))
            .into_changes()
            .unwrap_err();
        assert!(matches!(
            errors.errors(),
            [ValidationError::InvalidType { field: "precio_unitario", .. }]
        ));
    }

    #[test]
    fn update_partial() {
        let changes = payload(json!({ "stock": 10 })).into_changes().unwrap();
        assert_eq!(changes.stock.map(|s| s.value()), Some(10));
        assert!(changes.nombre.is_none());
        assert!(changes.sku.is_none());
        assert!(!changes.is_empty());
    }

    #[test]
    fn update_empty_is_valid() {
        let changes = payload(json!({})).into_changes().unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn update_validates_supplied_fields() {
        let errors = payload(json!({ "precio_unitario": -1, "stock": -1 }))
            .into_changes()
            .unwrap_err();
        assert!(errors.has_field("precio_unitario"));
        assert!(errors.has_field("stock"));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let changes = payload(json!({ "id": 99, "fecha_registro": "x" }))
            .into_changes()
            .unwrap();
        assert!(changes.is_empty());
    }
}
