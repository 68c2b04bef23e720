//! Inbound payload normalization.
//!
//! Raw bodies parse as `serde_json::Value` and are validated field by
//! field. Validation accumulates every violation instead of stopping at the
//! first, so a caller fixes their payload in one round trip. Nothing here
//! performs I/O; normalization always runs before any downstream call.

use order_bridge_core::{Email, Quantity, Sku};
use serde_json::Value;

/// A single-product order payload after validation.
#[derive(Debug, Clone)]
pub struct SingleOrder {
    pub sku: Sku,
    pub quantity: Quantity,
    pub email: Option<Email>,
    pub product_title: Option<String>,
    /// Caller-supplied unit price as a decimal string.
    pub price: Option<String>,
}

/// One line of a multi-item order payload.
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub sku: Sku,
    pub quantity: Quantity,
    /// Line total as a decimal string, when the source reports one.
    pub total: Option<String>,
}

/// A postal address as external sources send it.
///
/// Sources disagree on shape: some send `first_name`/`last_name`, some a
/// single `name`. Canonicalization happens at submit time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncomingAddress {
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub country: Option<String>,
    pub zip: Option<String>,
    pub phone: Option<String>,
}

/// A multi-item order payload after validation.
#[derive(Debug, Clone)]
pub struct MultiOrder {
    pub items: Vec<OrderItem>,
    pub customer_email: Email,
    pub billing_address: Option<IncomingAddress>,
    pub shipping_address: Option<IncomingAddress>,
    pub total: Option<String>,
    pub currency: Option<String>,
    /// Whether the source already collected payment.
    pub paid: bool,
}

/// Validate a single-product payload, accumulating every violation.
///
/// # Errors
///
/// Returns the full list of violations when any field is invalid.
pub fn parse_single(body: &Value) -> Result<SingleOrder, Vec<String>> {
    let mut violations = Vec::new();

    if !body.is_object() {
        return Err(vec!["Body must be a JSON object".to_string()]);
    }

    let sku = parse_sku(body, &mut violations, "");
    let quantity = parse_quantity(body, &mut violations, "");
    let email = parse_optional_email(body, &mut violations, "email", "");
    let product_title = body
        .get("product_title")
        .or_else(|| body.get("productTitle"))
        .and_then(Value::as_str)
        .map(ToString::to_string);
    let price = money_field(body, &["price"]);

    if violations.is_empty() {
        // Both parses succeeded when no violations were recorded
        match (sku, quantity) {
            (Some(sku), Some(quantity)) => Ok(SingleOrder {
                sku,
                quantity,
                email,
                product_title,
                price,
            }),
            _ => Err(vec!["Body must be a JSON object".to_string()]),
        }
    } else {
        Err(violations)
    }
}

/// Validate a multi-item payload, accumulating every violation.
///
/// # Errors
///
/// Returns the full list of violations when any field is invalid.
pub fn parse_multi(body: &Value) -> Result<MultiOrder, Vec<String>> {
    let mut violations = Vec::new();

    if !body.is_object() {
        return Err(vec!["Body must be a JSON object".to_string()]);
    }

    let items = match body.get("items").and_then(Value::as_array) {
        Some(array) if !array.is_empty() => array
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                let prefix = format!("items[{index}]: ");
                if !item.is_object() {
                    violations.push(format!("{prefix}must be an object"));
                    return None;
                }
                let sku = parse_sku(item, &mut violations, &prefix);
                let quantity = parse_quantity(item, &mut violations, &prefix);
                match (sku, quantity) {
                    (Some(sku), Some(quantity)) => Some(OrderItem {
                        sku,
                        quantity,
                        total: money_field(item, &["total", "line_total"]),
                    }),
                    _ => None,
                }
            })
            .collect(),
        Some(_) => {
            violations.push("items must be a non-empty array".to_string());
            Vec::new()
        }
        None => {
            violations.push("items is required and must be a non-empty array".to_string());
            Vec::new()
        }
    };

    let customer_email = match body
        .get("customer_email")
        .or_else(|| body.get("customerEmail"))
    {
        Some(Value::String(s)) => match s.parse::<Email>() {
            Ok(email) => Some(email),
            Err(err) => {
                violations.push(format!("customer_email: {err}"));
                None
            }
        },
        Some(_) => {
            violations.push("customer_email must be a string".to_string());
            None
        }
        None => {
            violations.push("customer_email is required".to_string());
            None
        }
    };

    let billing_address = body
        .get("billing_address")
        .or_else(|| body.get("billingAddress"))
        .map(parse_address);
    let shipping_address = body
        .get("shipping_address")
        .or_else(|| body.get("shippingAddress"))
        .map(parse_address);
    let total = money_field(body, &["total", "total_amount"]);
    let currency = body
        .get("currency")
        .and_then(Value::as_str)
        .map(ToString::to_string);
    let paid = body.get("paid").and_then(Value::as_bool).unwrap_or(false);

    if violations.is_empty() {
        customer_email.map_or_else(
            || Err(vec!["customer_email is required".to_string()]),
            |customer_email| {
                Ok(MultiOrder {
                    items,
                    customer_email,
                    billing_address,
                    shipping_address,
                    total,
                    currency,
                    paid,
                })
            },
        )
    } else {
        Err(violations)
    }
}

fn parse_sku(value: &Value, violations: &mut Vec<String>, prefix: &str) -> Option<Sku> {
    match value.get("sku") {
        Some(Value::String(s)) => match s.parse::<Sku>() {
            Ok(sku) => Some(sku),
            Err(err) => {
                violations.push(format!("{prefix}sku: {err}"));
                None
            }
        },
        Some(_) => {
            violations.push(format!("{prefix}sku must be a string"));
            None
        }
        None => {
            violations.push(format!("{prefix}sku is required"));
            None
        }
    }
}

fn parse_quantity(value: &Value, violations: &mut Vec<String>, prefix: &str) -> Option<Quantity> {
    match value.get("quantity") {
        Some(Value::Number(n)) => match n.as_i64().map(Quantity::parse) {
            Some(Ok(quantity)) => Some(quantity),
            Some(Err(err)) => {
                violations.push(format!("{prefix}quantity: {err}"));
                None
            }
            None => {
                violations.push(format!("{prefix}quantity must be an integer"));
                None
            }
        },
        Some(_) => {
            violations.push(format!("{prefix}quantity must be a positive integer"));
            None
        }
        None => {
            violations.push(format!("{prefix}quantity is required"));
            None
        }
    }
}

fn parse_optional_email(
    value: &Value,
    violations: &mut Vec<String>,
    field: &str,
    prefix: &str,
) -> Option<Email> {
    match value.get(field) {
        Some(Value::String(s)) => match s.parse::<Email>() {
            Ok(email) => Some(email),
            Err(err) => {
                violations.push(format!("{prefix}{field}: {err}"));
                None
            }
        },
        Some(Value::Null) | None => None,
        Some(_) => {
            violations.push(format!("{prefix}{field} must be a string"));
            None
        }
    }
}

/// A money amount from any of the given keys, as a decimal string.
///
/// Sources send money as JSON numbers or strings; both are accepted.
fn money_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match value.get(*key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn parse_address(value: &Value) -> IncomingAddress {
    let field = |name: &str| {
        value
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
    };

    IncomingAddress {
        name: field("name"),
        first_name: field("first_name").or_else(|| field("firstName")),
        last_name: field("last_name").or_else(|| field("lastName")),
        address1: field("address1").or_else(|| field("address_1")),
        address2: field("address2").or_else(|| field("address_2")),
        city: field("city"),
        province: field("province").or_else(|| field("state")),
        country: field("country"),
        zip: field("zip").or_else(|| field("postal_code")),
        phone: field("phone"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_single_valid() {
        let order = parse_single(&json!({
            "sku": "WIDGET-1",
            "quantity": 2,
            "email": "buyer@example.com",
            "price": 19.99
        }))
        .unwrap();

        assert_eq!(order.sku.as_str(), "WIDGET-1");
        assert_eq!(order.quantity.get(), 2);
        assert_eq!(order.email.unwrap().as_str(), "buyer@example.com");
        assert_eq!(order.price.as_deref(), Some("19.99"));
    }

    #[test]
    fn test_parse_single_accumulates_all_violations() {
        let err = parse_single(&json!({
            "sku": "",
            "quantity": 0,
            "email": "not-an-email"
        }))
        .unwrap_err();

        // Every invalid field is reported, not just the first
        assert_eq!(err.len(), 3);
        assert!(err.iter().any(|v| v.starts_with("sku")));
        assert!(err.iter().any(|v| v.starts_with("quantity")));
        assert!(err.iter().any(|v| v.starts_with("email")));
    }

    #[test]
    fn test_parse_single_missing_fields() {
        let err = parse_single(&json!({})).unwrap_err();
        assert!(err.contains(&"sku is required".to_string()));
        assert!(err.contains(&"quantity is required".to_string()));
    }

    #[test]
    fn test_parse_single_rejects_non_object() {
        let err = parse_single(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(err, vec!["Body must be a JSON object".to_string()]);
    }

    #[test]
    fn test_parse_single_fractional_quantity_rejected() {
        let err = parse_single(&json!({"sku": "X1", "quantity": 1.5})).unwrap_err();
        assert!(err.iter().any(|v| v.contains("quantity")));
    }

    #[test]
    fn test_parse_single_price_as_string() {
        let order = parse_single(&json!({"sku": "X1", "quantity": 1, "price": "9.50"})).unwrap();
        assert_eq!(order.price.as_deref(), Some("9.50"));
    }

    #[test]
    fn test_parse_multi_valid() {
        let order = parse_multi(&json!({
            "items": [
                {"sku": "A", "quantity": 1, "total": "10.00"},
                {"sku": "B", "quantity": 3}
            ],
            "customerEmail": "buyer@example.com",
            "billing_address": {
                "name": "Ada Lovelace",
                "address1": "1 Analytical Way",
                "city": "London",
                "country": "GB"
            },
            "total": 40.00,
            "currency": "USD",
            "paid": true
        }))
        .unwrap();

        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].sku.as_str(), "A");
        assert_eq!(order.items[1].quantity.get(), 3);
        assert_eq!(order.customer_email.as_str(), "buyer@example.com");
        assert!(order.paid);
        let billing = order.billing_address.unwrap();
        assert_eq!(billing.name.as_deref(), Some("Ada Lovelace"));
        assert!(billing.first_name.is_none());
    }

    #[test]
    fn test_parse_multi_snake_case_email_key() {
        let order = parse_multi(&json!({
            "items": [{"sku": "A", "quantity": 1}],
            "customer_email": "buyer@example.com"
        }))
        .unwrap();
        assert_eq!(order.customer_email.as_str(), "buyer@example.com");
    }

    #[test]
    fn test_parse_multi_requires_customer_email() {
        let err = parse_multi(&json!({
            "items": [{"sku": "A", "quantity": 1}]
        }))
        .unwrap_err();
        assert!(err.contains(&"customer_email is required".to_string()));
    }

    #[test]
    fn test_parse_multi_empty_items() {
        let err = parse_multi(&json!({
            "items": [],
            "customer_email": "buyer@example.com"
        }))
        .unwrap_err();
        assert!(err.contains(&"items must be a non-empty array".to_string()));
    }

    #[test]
    fn test_parse_multi_item_violations_are_indexed() {
        let err = parse_multi(&json!({
            "items": [
                {"sku": "A", "quantity": 1},
                {"sku": "", "quantity": -2}
            ],
            "customer_email": "buyer@example.com"
        }))
        .unwrap_err();

        assert!(err.iter().any(|v| v.starts_with("items[1]: sku")));
        assert!(err.iter().any(|v| v.starts_with("items[1]: quantity")));
        assert!(!err.iter().any(|v| v.starts_with("items[0]")));
    }

    #[test]
    fn test_parse_multi_paid_defaults_false() {
        let order = parse_multi(&json!({
            "items": [{"sku": "A", "quantity": 1}],
            "customer_email": "buyer@example.com"
        }))
        .unwrap();
        assert!(!order.paid);
    }

    #[test]
    fn test_parse_address_state_alias() {
        let address = parse_address(&json!({
            "first_name": "Grace",
            "last_name": "Hopper",
            "state": "VA",
            "postal_code": "22201"
        }));
        assert_eq!(address.province.as_deref(), Some("VA"));
        assert_eq!(address.zip.as_deref(), Some("22201"));
        assert_eq!(address.first_name.as_deref(), Some("Grace"));
    }
}
