use std::cmp::Ordering;

use super::derive::Listing;
use super::types::{FilterState, SortKey};

/// Keep the listings that satisfy every active constraint, then order them.
pub fn apply_filters(listings: &[Listing], filters: &FilterState) -> Vec<Listing> {
    let query = filters.search_query.trim().to_lowercase();
    let statuses: Vec<String> = filters.status.iter().map(|s| s.to_lowercase()).collect();

    let mut results: Vec<Listing> = listings
        .iter()
        .filter(|listing| matches(listing, filters, &statuses, &query))
        .cloned()
        .collect();

    sort_listings(&mut results, filters.sort_by);
    results
}

fn matches(listing: &Listing, filters: &FilterState, statuses: &[String], query: &str) -> bool {
    let property = &listing.property;

    if !filters.property_types.is_empty() && !filters.property_types.contains(&listing.property_type) {
        return false;
    }

    // An unparsable price never satisfies a price range
    match listing.price_value {
        Some(price) if filters.price_range.contains(price) => {}
        _ => return false,
    }

    if !filters.bedroom_range.contains(property.bedrooms) {
        return false;
    }

    if !filters.bathroom_range.contains(property.bathrooms) {
        return false;
    }

    if !statuses.is_empty() {
        let status = property.status.to_lowercase();
        if !statuses.iter().any(|wanted| status.contains(wanted.as_str())) {
            return false;
        }
    }

    if !filters.locations.is_empty() && !filters.locations.contains(&listing.country) {
        return false;
    }

    if !query.is_empty() {
        let in_title = property.title.to_lowercase().contains(query);
        let in_location = property.location.to_lowercase().contains(query);
        if !in_title && !in_location {
            return false;
        }
    }

    true
}

/// Stable sort by the selected key. `Default` leaves the order untouched.
/// Listings without a price come first in `PriceAsc` and last in `PriceDesc`.
pub fn sort_listings(listings: &mut [Listing], sort_by: SortKey) {
    if sort_by == SortKey::Default {
        return;
    }
    listings.sort_by(|a, b| compare(a, b, sort_by));
}

fn compare(a: &Listing, b: &Listing, sort_by: SortKey) -> Ordering {
    match sort_by {
        SortKey::Default => Ordering::Equal,
        SortKey::PriceAsc => a.price_value.cmp(&b.price_value),
        SortKey::PriceDesc => b.price_value.cmp(&a.price_value),
        SortKey::Newest => b.id().cmp(&a.id()),
        SortKey::Oldest => a.id().cmp(&b.id()),
        SortKey::BedroomsAsc => a.property.bedrooms.cmp(&b.property.bedrooms),
        SortKey::BedroomsDesc => b.property.bedrooms.cmp(&a.property.bedrooms),
    }
}

/// Number of dimensions that differ from `defaults`, at most one each
pub fn count_active_filters(filters: &FilterState, defaults: &FilterState) -> usize {
    [
        !filters.property_types.is_empty(),
        filters.price_range != defaults.price_range,
        filters.bedroom_range != defaults.bedroom_range,
        filters.bathroom_range != defaults.bathroom_range,
        !filters.status.is_empty(),
        !filters.locations.is_empty(),
        !filters.amenities.is_empty(),
        !filters.search_query.trim().is_empty(),
        filters.sort_by != SortKey::Default,
    ]
    .into_iter()
    .filter(|active| *active)
    .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::derive::derive_fields;
    use crate::filters::types::ValueRange;
    use crate::models::{PriceField, Property, PropertyType};
    use chrono::Utc;

    fn property(id: u64, title: &str, status: &str, price: &str, beds: u32, baths: u32, location: &str) -> Property {
        Property {
            id,
            title: title.to_string(),
            property_type: None,
            status: status.to_string(),
            price: PriceField::Display(price.to_string()),
            location: location.to_string(),
            bedrooms: beds,
            bathrooms: baths,
            features: vec![],
            description: String::new(),
            images: vec![],
            area_sqft: None,
            created_at: Utc::now(),
        }
    }

    fn sample() -> Vec<Listing> {
        derive_fields(vec![
            property(1, "Marina Villa", "For Sale", "$500", 3, 2, "Dubai, UAE"),
            property(2, "Downtown Apartment", "For Rent", "$300", 2, 1, "Dubai, UAE"),
            property(3, "Sky Penthouse", "For Sale - Ready", "$2,400", 4, 4, "Dubai, Business Bay, UAE"),
            property(4, "Garden House", "Sold", "$800", 5, 3, "Muscat, Oman"),
            property(5, "Studio Apartment", "For Rent", "$90", 0, 1, "Sharjah, Al Majaz, UAE"),
        ])
    }

    fn ids(listings: &[Listing]) -> Vec<u64> {
        listings.iter().map(Listing::id).collect()
    }

    #[test]
    fn test_end_to_end_villa_scenario() {
        let listings = derive_fields(vec![
            property(1, "Marina Villa", "For Sale", "$500", 3, 2, "Dubai, UAE"),
            property(2, "Downtown Apartment", "For Rent", "$300", 2, 1, "Dubai, UAE"),
        ]);
        let mut filters = FilterState::default();
        filters.property_types.insert(PropertyType::Villa);

        let result = apply_filters(&listings, &filters);
        assert_eq!(ids(&result), vec![1]);
    }

    #[test]
    fn test_default_filters_are_identity() {
        let listings = sample();
        let result = apply_filters(&listings, &FilterState::default());
        assert_eq!(result, listings);
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let listings = sample();
        let mut filters = FilterState::default();
        filters.status.insert("sale".to_string());
        filters.sort_by = SortKey::PriceDesc;

        let once = apply_filters(&listings, &filters);
        let twice = apply_filters(&once, &filters);
        assert_eq!(once, twice);
        assert_eq!(ids(&once), vec![3, 1]);
    }

    #[test]
    fn test_bedroom_range_inclusive() {
        let listings = sample();
        let mut filters = FilterState::default();
        filters.bedroom_range = ValueRange(3, 3);
        assert_eq!(ids(&apply_filters(&listings, &filters)), vec![1]);

        filters.bedroom_range = ValueRange(3, 4);
        assert_eq!(ids(&apply_filters(&listings, &filters)), vec![1, 3]);
    }

    #[test]
    fn test_price_range_inclusive() {
        let listings = sample();
        let mut filters = FilterState::default();
        filters.price_range = ValueRange(300_000, 800_000);
        assert_eq!(ids(&apply_filters(&listings, &filters)), vec![1, 2, 4]);
    }

    #[test]
    fn test_status_substring_match() {
        let listings = sample();
        let mut filters = FilterState::default();
        filters.status.insert("sale".to_string());
        assert_eq!(ids(&apply_filters(&listings, &filters)), vec![1, 3]);

        filters.status.clear();
        filters.status.insert("RENT".to_string());
        assert_eq!(ids(&apply_filters(&listings, &filters)), vec![2, 5]);

        filters.status.insert("sold".to_string());
        assert_eq!(ids(&apply_filters(&listings, &filters)), vec![2, 4, 5]);
    }

    #[test]
    fn test_location_filters_on_country() {
        let listings = sample();
        let mut filters = FilterState::default();
        filters.locations.insert("Oman".to_string());
        assert_eq!(ids(&apply_filters(&listings, &filters)), vec![4]);

        // city names are not countries
        filters.locations.clear();
        filters.locations.insert("Dubai".to_string());
        assert!(apply_filters(&listings, &filters).is_empty());
    }

    #[test]
    fn test_search_query_matches_title_or_location() {
        let listings = sample();
        let mut filters = FilterState::default();
        filters.search_query = "  business bay ".to_string();
        assert_eq!(ids(&apply_filters(&listings, &filters)), vec![3]);

        filters.search_query = "APARTMENT".to_string();
        assert_eq!(ids(&apply_filters(&listings, &filters)), vec![2, 5]);

        filters.search_query = "   ".to_string();
        assert_eq!(apply_filters(&listings, &filters).len(), listings.len());
    }

    #[test]
    fn test_amenities_do_not_constrain() {
        let listings = sample();
        let mut filters = FilterState::default();
        filters.amenities.insert("Pool".to_string());
        assert_eq!(apply_filters(&listings, &filters).len(), listings.len());
    }

    #[test]
    fn test_malformed_price_fails_every_price_range() {
        let listings = derive_fields(vec![
            property(1, "Marina Villa", "For Sale", "Price on request", 3, 2, "Dubai, UAE"),
            property(2, "Palm Villa", "For Sale", "$700", 3, 2, "Dubai, UAE"),
        ]);
        assert_eq!(listings[0].price_value, None);

        let filters = FilterState::default();
        assert_eq!(ids(&apply_filters(&listings, &filters)), vec![2]);

        let mut wide = FilterState::default();
        wide.price_range = ValueRange(0, u64::MAX);
        assert_eq!(ids(&apply_filters(&listings, &wide)), vec![2]);
    }

    #[test]
    fn test_sort_orders() {
        let listings = sample();
        let mut filters = FilterState::default();

        filters.sort_by = SortKey::PriceAsc;
        assert_eq!(ids(&apply_filters(&listings, &filters)), vec![5, 2, 1, 4, 3]);

        filters.sort_by = SortKey::PriceDesc;
        assert_eq!(ids(&apply_filters(&listings, &filters)), vec![3, 4, 1, 2, 5]);

        filters.sort_by = SortKey::Newest;
        assert_eq!(ids(&apply_filters(&listings, &filters)), vec![5, 4, 3, 2, 1]);

        filters.sort_by = SortKey::Oldest;
        assert_eq!(ids(&apply_filters(&listings, &filters)), vec![1, 2, 3, 4, 5]);

        filters.sort_by = SortKey::BedroomsAsc;
        assert_eq!(ids(&apply_filters(&listings, &filters)), vec![5, 2, 1, 3, 4]);

        filters.sort_by = SortKey::BedroomsDesc;
        assert_eq!(ids(&apply_filters(&listings, &filters)), vec![4, 3, 1, 2, 5]);
    }

    #[test]
    fn test_default_sort_preserves_input_order() {
        let mut listings = sample();
        listings.reverse();
        let result = apply_filters(&listings, &FilterState::default());
        assert_eq!(ids(&result), vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_equal_keys_keep_input_order() {
        let listings = derive_fields(vec![
            property(9, "A Villa", "For Sale", "$100", 2, 1, "Dubai, UAE"),
            property(3, "B Villa", "For Sale", "$100", 2, 1, "Dubai, UAE"),
            property(7, "C Villa", "For Sale", "$100", 2, 1, "Dubai, UAE"),
        ]);
        let mut filters = FilterState::default();
        filters.sort_by = SortKey::PriceAsc;
        assert_eq!(ids(&apply_filters(&listings, &filters)), vec![9, 3, 7]);
    }

    #[test]
    fn test_count_active_filters() {
        let defaults = FilterState::default();
        let mut filters = defaults.clone();
        assert_eq!(count_active_filters(&filters, &defaults), 0);

        filters.property_types.insert(PropertyType::Villa);
        filters.property_types.insert(PropertyType::Apartment);
        assert_eq!(count_active_filters(&filters, &defaults), 1);

        filters.sort_by = SortKey::PriceAsc;
        assert_eq!(count_active_filters(&filters, &defaults), 2);

        filters.price_range = ValueRange(0, 1_000_000);
        filters.search_query = " marina ".to_string();
        filters.amenities.insert("Gym".to_string());
        assert_eq!(count_active_filters(&filters, &defaults), 5);

        filters.search_query = "  ".to_string();
        assert_eq!(count_active_filters(&filters, &defaults), 4);
    }

    #[test]
    fn test_unpriced_listings_sort_first_ascending_last_descending() {
        let mut listings = derive_fields(vec![
            property(1, "Marina Villa", "For Sale", "$500", 3, 2, "Dubai, UAE"),
            property(2, "Creek Apartment", "For Sale", "Price on request", 1, 1, "Dubai, UAE"),
            property(3, "Sky Penthouse", "For Sale", "$2,400", 4, 4, "Dubai, UAE"),
            property(4, "JVC Apartment", "For Sale", "TBA", 2, 2, "Dubai, UAE"),
        ]);
        assert!(listings[1].price_value.is_none());

        sort_listings(&mut listings, SortKey::PriceAsc);
        assert_eq!(ids(&listings), vec![2, 4, 1, 3]);

        sort_listings(&mut listings, SortKey::PriceDesc);
        assert_eq!(ids(&listings), vec![3, 1, 2, 4]);
    }
}
