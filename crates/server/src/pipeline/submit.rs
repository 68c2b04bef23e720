//! Order construction for submission to Shopify.
//!
//! Builders turn a normalized payload plus resolved variants into the wire
//! shape of `orders.json` or `draftOrderCreate`. Orders are request-scoped
//! and never persisted here.

use order_bridge_core::FinancialStatus;

use super::normalize::{IncomingAddress, MultiOrder, SingleOrder};
use super::resolve::ResolvedLineItem;
use crate::error::AppError;
use crate::shopify::{
    DraftOrderInput, DraftOrderLineItem, OrderCustomer, OrderInput, OrderLineItem, PostalAddress,
    ResolvedVariant,
};

/// `source_name` and tag per integration path.
pub const SOURCE_API: &str = "api";
pub const TAG_API: &str = "API";
pub const SOURCE_SHOPFUNNELS: &str = "shopfunnels";
pub const TAG_SHOPFUNNELS: &str = "ShopFunnels";
pub const SOURCE_WEBHOOK: &str = "webhook";

/// Build a REST order for a single-product request.
///
/// # Errors
///
/// Returns `AppError::Internal` if the resolved variant carries no numeric
/// id, which the REST order endpoint requires.
pub fn build_single_order(
    order: &SingleOrder,
    variant: &ResolvedVariant,
) -> Result<OrderInput, AppError> {
    let variant_id = rest_variant_id(variant)?;

    Ok(OrderInput {
        line_items: vec![OrderLineItem {
            variant_id,
            quantity: order.quantity.get(),
            price: order.price.clone().or_else(|| variant.price.clone()),
        }],
        customer: order.email.as_ref().map(|email| OrderCustomer {
            email: email.as_str().to_string(),
        }),
        email: order.email.as_ref().map(|e| e.as_str().to_string()),
        billing_address: None,
        shipping_address: None,
        financial_status: FinancialStatus::Pending.as_str().to_string(),
        tags: Some(TAG_API.to_string()),
        source_name: SOURCE_API.to_string(),
    })
}

/// Build a REST order for a multi-item request.
///
/// # Errors
///
/// Returns `AppError::NoValidItems` when zero items resolved, and
/// `AppError::Internal` on a variant without a numeric id.
pub fn build_multi_order(
    order: &MultiOrder,
    items: &[ResolvedLineItem],
) -> Result<OrderInput, AppError> {
    if items.is_empty() {
        return Err(AppError::NoValidItems);
    }

    let line_items = items
        .iter()
        .map(|item| {
            let variant_id = item.variant_id.rest_id().ok_or_else(|| {
                AppError::Internal(format!(
                    "variant '{}' has no numeric id for REST order",
                    item.variant_id
                ))
            })?;
            Ok(OrderLineItem {
                variant_id,
                quantity: item.quantity.get(),
                price: item.unit_price.clone(),
            })
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    let financial_status = if order.paid {
        FinancialStatus::Paid
    } else {
        FinancialStatus::Pending
    };

    Ok(OrderInput {
        line_items,
        customer: Some(OrderCustomer {
            email: order.customer_email.as_str().to_string(),
        }),
        email: Some(order.customer_email.as_str().to_string()),
        billing_address: order.billing_address.as_ref().map(canonical_address),
        shipping_address: order
            .shipping_address
            .as_ref()
            .or(order.billing_address.as_ref())
            .map(canonical_address),
        financial_status: financial_status.as_str().to_string(),
        tags: Some(TAG_SHOPFUNNELS.to_string()),
        source_name: SOURCE_SHOPFUNNELS.to_string(),
    })
}

/// Build a draft order for a single-product request.
#[must_use]
pub fn build_draft_order(order: &SingleOrder, variant: &ResolvedVariant) -> DraftOrderInput {
    DraftOrderInput {
        line_items: vec![DraftOrderLineItem {
            variant_id: variant.variant_id.as_gid(),
            quantity: order.quantity.get(),
        }],
        email: order.email.as_ref().map(|e| e.as_str().to_string()),
        tags: None,
    }
}

/// Canonical postal address with name fallback.
///
/// Sources that send a single `name` get it split on the first space; an
/// unsplittable name becomes the first name alone.
pub fn canonical_address(address: &IncomingAddress) -> PostalAddress {
    let (first_name, last_name) =
        if address.first_name.is_some() || address.last_name.is_some() {
            (address.first_name.clone(), address.last_name.clone())
        } else {
            address.name.as_deref().map_or((None, None), split_name)
        };

    PostalAddress {
        first_name,
        last_name,
        address1: address.address1.clone(),
        address2: address.address2.clone(),
        city: address.city.clone(),
        province: address.province.clone(),
        country: address.country.clone(),
        zip: address.zip.clone(),
        phone: address.phone.clone(),
    }
}

fn split_name(name: &str) -> (Option<String>, Option<String>) {
    let name = name.trim();
    if name.is_empty() {
        return (None, None);
    }
    match name.split_once(' ') {
        Some((first, rest)) => (Some(first.to_string()), Some(rest.trim().to_string())),
        None => (Some(name.to_string()), None),
    }
}

fn rest_variant_id(variant: &ResolvedVariant) -> Result<i64, AppError> {
    variant.variant_id.rest_id().ok_or_else(|| {
        AppError::Internal(format!(
            "variant '{}' has no numeric id for REST order",
            variant.variant_id
        ))
    })
}
