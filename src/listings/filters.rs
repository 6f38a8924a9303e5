use crate::config::FilterPolicy;
use crate::models::{MappedProperty, SearchFilters};

/// Keep the listings that satisfy every active bound in `filters`.
///
/// A listing with no value for an active bound (e.g. unknown floor area
/// while a square-footage minimum is set) is excluded.
pub fn apply_filters(
    properties: Vec<MappedProperty>,
    filters: &SearchFilters,
    policy: FilterPolicy,
) -> Vec<MappedProperty> {
    properties
        .into_iter()
        .filter(|p| matches(p, filters, policy))
        .collect()
}

fn matches(property: &MappedProperty, filters: &SearchFilters, policy: FilterPolicy) -> bool {
    if let Some(wanted) = filters.property_type.as_deref().filter(|t| !t.trim().is_empty()) {
        let wanted = wanted.trim().to_lowercase();
        if !property.property_type.to_lowercase().contains(&wanted) {
            return false;
        }
    }

    if !within(Some(property.price), filters.min_price, filters.max_price) {
        return false;
    }
    if !within(Some(property.bedrooms), filters.min_bedrooms, filters.max_bedrooms) {
        return false;
    }
    if policy.bathrooms && !within(property.bathrooms, filters.min_bathrooms, filters.max_bathrooms) {
        return false;
    }
    if policy.square_footage
        && !within(property.square_feet, filters.min_square_feet, filters.max_square_feet)
    {
        return false;
    }
    true
}

fn within<T: PartialOrd + Copy>(value: Option<T>, min: Option<T>, max: Option<T>) -> bool {
    if min.is_none() && max.is_none() {
        return true;
    }
    let Some(value) = value else {
        return false;
    };
    min.map_or(true, |min| value >= min) && max.map_or(true, |max| value <= max)
}
