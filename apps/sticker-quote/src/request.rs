//! # Request Parsing
//!
//! Turns loosely typed JSON into a closed [`QuoteRequest`].
//!
//! ## Accepted Bodies
//! ```text
//! { "variantId": "STICKER-DIECUT", "quantity": 500 }            → Variant
//! { "cartItems": [ { "variantId", "quantity", "shape"? } ] }    → Cart
//! { "quantity": 500, "shape": "circle",
//!   "dimensions": { "diameter": 10 }, "variantId"? }            → Shape
//! ```
//!
//! Cart item shapes may be given either as a tagged object
//! (`{"type": "circle", "diameter": 10}`) or as a `shape` name plus a
//! `dimensions` map.
//!
//! Everything that can be wrong with the input is caught here: unknown
//! shapes, missing dimensions, fractional or textual quantities. The engine
//! only ever sees whole numbers and valid shapes.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use sticker_core::validation::validate_variant_id;
use sticker_core::{CartLine, Shape, ShapeKind, ValidationError};

use crate::error::ApiError;

/// A parsed quote request.
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteRequest {
    Variant {
        variant_id: String,
        quantity: i64,
    },
    Cart {
        lines: Vec<CartLine>,
    },
    Shape {
        variant_id: Option<String>,
        quantity: i64,
        shape: Shape,
    },
}

impl QuoteRequest {
    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            QuoteRequest::Variant { .. } => "variant",
            QuoteRequest::Cart { .. } => "cart",
            QuoteRequest::Shape { .. } => "shape",
        }
    }

    /// Parses a JSON request body.
    pub fn from_json(body: &str) -> Result<Self, ApiError> {
        let raw: RawRequest = serde_json::from_str(body)
            .map_err(|e| ApiError::invalid_request(format!("Malformed request: {}", e)))?;
        raw.into_request()
    }
}

// =============================================================================
// Raw Wire Shapes
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRequest {
    #[serde(default)]
    variant_id: Option<String>,
    #[serde(default)]
    quantity: Option<Value>,
    #[serde(default)]
    cart_items: Option<Vec<RawCartItem>>,
    #[serde(default)]
    shape: Option<Value>,
    #[serde(default)]
    dimensions: Option<BTreeMap<String, Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCartItem {
    variant_id: String,
    quantity: Value,
    #[serde(default)]
    shape: Option<Value>,
    #[serde(default)]
    dimensions: Option<BTreeMap<String, Value>>,
}

impl RawRequest {
    fn into_request(self) -> Result<QuoteRequest, ApiError> {
        if let Some(items) = self.cart_items {
            let lines = items
                .into_iter()
                .map(RawCartItem::into_line)
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(QuoteRequest::Cart { lines });
        }

        let quantity = self
            .quantity
            .as_ref()
            .ok_or_else(|| ApiError::invalid_request("quantity is required"))
            .and_then(parse_quantity)?;

        let variant_id = self.variant_id.map(checked_variant_id).transpose()?;

        if let Some(shape) = &self.shape {
            let shape = parse_shape(shape, self.dimensions.as_ref())?;
            return Ok(QuoteRequest::Shape {
                variant_id,
                quantity,
                shape,
            });
        }

        match variant_id {
            Some(variant_id) => Ok(QuoteRequest::Variant {
                variant_id,
                quantity,
            }),
            None => Err(ApiError::invalid_request(
                "expected variantId, cartItems or shape",
            )),
        }
    }
}

impl RawCartItem {
    fn into_line(self) -> Result<CartLine, ApiError> {
        let variant_id = checked_variant_id(self.variant_id)?;
        let quantity = parse_quantity(&self.quantity)
            .map_err(|e| ApiError::new(e.code, format!("{}: {}", variant_id, e.message)))?;

        let mut line = CartLine::new(variant_id, quantity);
        if let Some(shape) = &self.shape {
            line.shape = Some(
                parse_shape(shape, self.dimensions.as_ref()).map_err(|e| {
                    ApiError::new(e.code, format!("{}: {}", line.variant_id, e.message))
                })?,
            );
        }
        Ok(line)
    }
}

// =============================================================================
// Field Parsers
// =============================================================================

fn checked_variant_id(variant_id: String) -> Result<String, ApiError> {
    validate_variant_id(&variant_id)?;
    Ok(variant_id.trim().to_string())
}

/// Accepts JSON integers, and floats with no fractional part.
fn parse_quantity(value: &Value) -> Result<i64, ApiError> {
    if let Some(quantity) = value.as_i64() {
        return Ok(quantity);
    }

    match value.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => {
            Ok(f as i64)
        }
        _ => Err(ValidationError::invalid_quantity(value).into()),
    }
}

fn parse_shape(
    shape: &Value,
    dimensions: Option<&BTreeMap<String, Value>>,
) -> Result<Shape, ApiError> {
    match shape {
        Value::String(name) => {
            let kind: ShapeKind = name.parse()?;
            let dimensions = numeric_dimensions(kind, dimensions)?;
            Ok(Shape::from_dimensions(kind, &dimensions)?)
        }
        Value::Object(_) => {
            let shape: Shape = serde_json::from_value(shape.clone()).map_err(|e| {
                ApiError::from(ValidationError::invalid_shape("shape", e.to_string()))
            })?;
            shape.validate()?;
            Ok(shape)
        }
        other => Err(ValidationError::invalid_shape(
            other.to_string(),
            "expected a shape name or object",
        )
        .into()),
    }
}

fn numeric_dimensions(
    kind: ShapeKind,
    dimensions: Option<&BTreeMap<String, Value>>,
) -> Result<BTreeMap<String, f64>, ApiError> {
    let Some(dimensions) = dimensions else {
        return Err(ValidationError::invalid_shape(kind.to_string(), "dimensions are required").into());
    };

    dimensions
        .iter()
        .filter(|(key, _)| kind.dimension_keys().contains(&key.as_str()))
        .map(|(key, value)| {
            value.as_f64().map(|v| (key.clone(), v)).ok_or_else(|| {
                ApiError::from(ValidationError::invalid_shape(
                    kind.to_string(),
                    format!("{} must be a number, got {}", key, value),
                ))
            })
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_variant_request() {
        let request = QuoteRequest::from_json(r#"{"variantId":"STICKER-A","quantity":500}"#).unwrap();
        assert_eq!(
            request,
            QuoteRequest::Variant {
                variant_id: "STICKER-A".into(),
                quantity: 500
            }
        );
    }

    #[test]
    fn test_integral_float_quantity_is_accepted() {
        let request = QuoteRequest::from_json(r#"{"variantId":"STICKER-A","quantity":500.0}"#).unwrap();
        assert!(matches!(request, QuoteRequest::Variant { quantity: 500, .. }));
    }

    #[test]
    fn test_non_integral_quantities_rejected() {
        for quantity in ["12.5", "\"500\"", "true", "1e30"] {
            let body = format!(r#"{{"variantId":"STICKER-A","quantity":{}}}"#, quantity);
            let err = QuoteRequest::from_json(&body).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidQuantity, "quantity {quantity}");
        }
    }

    #[test]
    fn test_shape_request_with_dimensions() {
        let body = r#"{"quantity":500,"shape":"circle","dimensions":{"diameter":10,"note":"x"}}"#;
        let request = QuoteRequest::from_json(body).unwrap();
        assert_eq!(
            request,
            QuoteRequest::Shape {
                variant_id: None,
                quantity: 500,
                shape: Shape::Circle { diameter: 10.0 }
            }
        );
    }

    #[test]
    fn test_shape_errors() {
        let cases = [
            r#"{"quantity":500,"shape":"circle","dimensions":{"width":10}}"#,
            r#"{"quantity":500,"shape":"hexagon","dimensions":{"side":1}}"#,
            r#"{"quantity":500,"shape":"rectangle","dimensions":{"width":10,"height":-2}}"#,
            r#"{"quantity":500,"shape":"rectangle","dimensions":{"width":"10","height":2}}"#,
            r#"{"quantity":500,"shape":"circle"}"#,
        ];
        for body in cases {
            let err = QuoteRequest::from_json(body).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidShape, "{body}");
        }
    }

    #[test]
    fn test_cart_request_with_both_shape_forms() {
        let body = r#"{"cartItems":[
            {"variantId":"STICKER-A","quantity":500,"shape":{"type":"rectangle","width":5,"height":5}},
            {"variantId":"STICKER-B","quantity":600,"shape":"custom","dimensions":{"area":12}},
            {"variantId":"MUG-01","quantity":2}
        ]}"#;
        let QuoteRequest::Cart { lines } = QuoteRequest::from_json(body).unwrap() else {
            panic!("expected a cart request");
        };
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].shape, Some(Shape::Rectangle { width: 5.0, height: 5.0 }));
        assert_eq!(lines[1].shape, Some(Shape::Custom { area: 12.0 }));
        assert_eq!(lines[2], CartLine::new("MUG-01", 2));
    }

    #[test]
    fn test_cart_item_errors_name_the_variant() {
        let body = r#"{"cartItems":[{"variantId":"STICKER-A","quantity":1.5}]}"#;
        let err = QuoteRequest::from_json(body).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidQuantity);
        assert!(err.message.starts_with("STICKER-A:"));
    }

    #[test]
    fn test_malformed_bodies() {
        for body in ["not json", "{}", r#"{"quantity":5}"#, r#"{"variantId":"A"}"#] {
            let err = QuoteRequest::from_json(body).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidRequest, "{body}");
        }
        let err = QuoteRequest::from_json(r#"{"variantId":"bad id","quantity":5}"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }
}
