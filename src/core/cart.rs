//! Cart validation and compatibility splitting.
//!
//! A cart is submitted as a flat list of line items. Items whose categories
//! belong to the same [`CompatibilityGroup`] are booked together; every other
//! combination is split into its own booking. The customer still pays once for
//! the whole cart, see [`crate::core::checkout`].

use crate::domain::model::{Amount, CartItem, CheckoutPlan, CompatibilityGroup, ServiceGroup};
use crate::utils::error::{AppError, Result};
use crate::utils::validation::validate_non_empty_string;
use chrono::NaiveDateTime;

pub fn validate_item(index: usize, item: &CartItem, now: NaiveDateTime) -> Result<()> {
    let field = format!("items[{}]", index);

    validate_non_empty_string(&format!("{}.service_name", field), &item.service_name)?;

    if item.quantity <= 0 {
        return Err(AppError::validation(
            format!("{}.quantity", field),
            format!("Quantity for {} must be at least 1", item.service_name),
        ));
    }

    if item.unit_price < Amount::ZERO {
        return Err(AppError::validation(
            format!("{}.unit_price", field),
            format!("Price for {} cannot be negative", item.service_name),
        ));
    }

    if line_total(item).is_none() {
        return Err(AppError::validation(
            format!("{}.quantity", field),
            format!("Quantity for {} is too large", item.service_name),
        ));
    }

    if item.time_slot.duration_minutes() <= 0 {
        return Err(AppError::validation(
            format!("{}.time_slot", field),
            format!("End time must be after start time for {}", item.service_name),
        ));
    }

    if item.time_slot.starts_at() <= now {
        return Err(AppError::validation(
            format!("{}.time_slot", field),
            format!(
                "The slot on {} for {} is in the past",
                item.time_slot.date, item.service_name
            ),
        ));
    }

    Ok(())
}

/// Partitions items by compatibility group. Groups come out in order of first
/// appearance; items keep their input order within a group.
pub fn split_by_compatibility(items: &[CartItem]) -> Vec<(CompatibilityGroup, Vec<CartItem>)> {
    let mut groups: Vec<(CompatibilityGroup, Vec<CartItem>)> = Vec::new();

    for item in items {
        let key = item.category.compatibility_group();
        match groups.iter_mut().find(|(group, _)| *group == key) {
            Some((_, members)) => members.push(item.clone()),
            None => groups.push((key, vec![item.clone()])),
        }
    }

    groups
}

/// `unit_price × quantity`, or `None` when the quantity is not positive or the product overflows.
pub fn line_total(item: &CartItem) -> Option<Amount> {
    u32::try_from(item.quantity)
        .ok()
        .and_then(|quantity| item.unit_price.checked_mul(quantity))
}

pub fn plan_checkout(items: &[CartItem], now: NaiveDateTime) -> Result<CheckoutPlan> {
    if items.is_empty() {
        return Err(AppError::validation("items", "Your cart is empty"));
    }

    for (index, item) in items.iter().enumerate() {
        validate_item(index, item, now)?;
    }

    let mut groups = Vec::new();
    let mut total = Amount::ZERO;

    for (group, members) in split_by_compatibility(items) {
        let subtotal = members
            .iter()
            .try_fold(Amount::ZERO, |acc, item| {
                line_total(item).and_then(|line| acc.checked_add(line))
            })
            .ok_or_else(|| AppError::validation("items", "Cart total is too large"))?;
        total = total
            .checked_add(subtotal)
            .ok_or_else(|| AppError::validation("items", "Cart total is too large"))?;

        groups.push(ServiceGroup {
            group,
            items: members,
            subtotal,
        });
    }

    tracing::debug!(
        "Planned checkout: {} items in {} bookings, total {}",
        items.len(),
        groups.len(),
        total
    );

    Ok(CheckoutPlan {
        booking_count: groups.len(),
        groups,
        total,
    })
}
