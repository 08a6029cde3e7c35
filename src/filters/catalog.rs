use super::derive::{derive_fields, Listing};
use super::engine::{apply_filters, count_active_filters};
use super::types::{FilterBounds, FilterKey, FilterState, ValueRange};
use crate::models::Property;

impl FilterBounds {
    /// Observed `[min, max]` per range dimension, falling back to the
    /// constants when nothing can be observed.
    pub fn from_listings(listings: &[Listing]) -> Self {
        let fallback = FilterBounds::default();
        if listings.is_empty() {
            return fallback;
        }

        let price = observed(listings.iter().filter_map(|l| l.price_value)).unwrap_or(fallback.price);
        let bedrooms =
            observed(listings.iter().map(|l| l.property.bedrooms)).unwrap_or(fallback.bedrooms);
        let bathrooms =
            observed(listings.iter().map(|l| l.property.bathrooms)).unwrap_or(fallback.bathrooms);

        Self {
            price,
            bedrooms,
            bathrooms,
        }
    }
}

fn observed<T: Ord + Copy>(values: impl Iterator<Item = T>) -> Option<ValueRange<T>> {
    values.fold(None, |range, value| match range {
        None => Some(ValueRange(value, value)),
        Some(ValueRange(lo, hi)) => Some(ValueRange(lo.min(value), hi.max(value))),
    })
}

/// Live listings together with the filter state applied to them
#[derive(Debug, Clone)]
pub struct Catalog {
    listings: Vec<Listing>,
    bounds: FilterBounds,
    filters: FilterState,
}

impl Catalog {
    pub fn new(properties: Vec<Property>) -> Self {
        let listings = derive_fields(properties);
        let bounds = FilterBounds::from_listings(&listings);
        let filters = FilterState::with_bounds(&bounds);
        Self {
            listings,
            bounds,
            filters,
        }
    }

    /// Swap in a new property list. Derived fields and bounds are recomputed,
    /// the user's filter selection is kept. A range still sitting at the old
    /// bounds is untouched by the user, so it follows the new bounds.
    pub fn replace_properties(&mut self, properties: Vec<Property>) {
        let previous = self.bounds;
        self.listings = derive_fields(properties);
        self.bounds = FilterBounds::from_listings(&self.listings);

        if self.filters.price_range == previous.price {
            self.filters.price_range = self.bounds.price;
        }
        if self.filters.bedroom_range == previous.bedrooms {
            self.filters.bedroom_range = self.bounds.bedrooms;
        }
        if self.filters.bathroom_range == previous.bathrooms {
            self.filters.bathroom_range = self.bounds.bathrooms;
        }
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn bounds(&self) -> &FilterBounds {
        &self.bounds
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut FilterState {
        &mut self.filters
    }

    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
    }

    /// Default filter state for the current data
    pub fn defaults(&self) -> FilterState {
        FilterState::with_bounds(&self.bounds)
    }

    pub fn results(&self) -> Vec<Listing> {
        apply_filters(&self.listings, &self.filters)
    }

    pub fn active_filter_count(&self) -> usize {
        count_active_filters(&self.filters, &self.defaults())
    }

    pub fn clear_filter(&mut self, key: FilterKey) {
        let defaults = self.defaults();
        self.filters.reset(key, &defaults);
    }

    pub fn clear_all(&mut self) {
        self.filters = self.defaults();
    }

    pub fn get(&self, id: u64) -> Option<&Listing> {
        self.listings.iter().find(|l| l.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::types::{SortKey, FALLBACK_BEDROOM_RANGE, FALLBACK_PRICE_RANGE};
    use crate::models::{PriceField, PropertyType};
    use chrono::Utc;

    fn property(id: u64, title: &str, price: PriceField, beds: u32, baths: u32) -> Property {
        Property {
            id,
            title: title.to_string(),
            property_type: None,
            status: "For Sale".to_string(),
            price,
            location: "Dubai, UAE".to_string(),
            bedrooms: beds,
            bathrooms: baths,
            features: vec![],
            description: String::new(),
            images: vec![],
            area_sqft: None,
            created_at: Utc::now(),
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            property(1, "Marina Villa", PriceField::Amount(4_500_000), 5, 6),
            property(2, "Creek Apartment", PriceField::Display("$950".into()), 1, 2),
            property(3, "JVC Apartment", PriceField::Display("TBA".into()), 2, 2),
        ])
    }

    #[test]
    fn test_bounds_from_data() {
        let catalog = catalog();
        assert_eq!(catalog.bounds().price, ValueRange(950_000, 4_500_000));
        assert_eq!(catalog.bounds().bedrooms, ValueRange(1, 5));
        assert_eq!(catalog.bounds().bathrooms, ValueRange(2, 6));
        assert_eq!(catalog.filters().price_range, ValueRange(950_000, 4_500_000));
    }

    #[test]
    fn test_empty_catalog_uses_fallbacks() {
        let catalog = Catalog::new(vec![]);
        assert_eq!(catalog.bounds().price, FALLBACK_PRICE_RANGE);
        assert_eq!(catalog.bounds().bedrooms, FALLBACK_BEDROOM_RANGE);
        assert!(catalog.results().is_empty());
        assert_eq!(catalog.active_filter_count(), 0);
    }

    #[test]
    fn test_no_parsable_prices_keeps_price_fallback() {
        let catalog = Catalog::new(vec![property(1, "Villa", PriceField::Display("n/a".into()), 3, 3)]);
        assert_eq!(catalog.bounds().price, FALLBACK_PRICE_RANGE);
        assert_eq!(catalog.bounds().bedrooms, ValueRange(3, 3));
    }

    #[test]
    fn test_clear_filter_resets_to_observed_bounds() {
        let mut catalog = catalog();
        catalog.filters_mut().price_range = ValueRange(0, 1_000_000);
        catalog.filters_mut().bedroom_range = ValueRange(2, 2);
        catalog.filters_mut().sort_by = SortKey::Newest;
        assert_eq!(catalog.active_filter_count(), 3);

        catalog.clear_filter(FilterKey::PriceRange);
        assert_eq!(catalog.filters().price_range, ValueRange(950_000, 4_500_000));
        assert_ne!(catalog.filters().price_range, FALLBACK_PRICE_RANGE);
        assert_eq!(catalog.filters().bedroom_range, ValueRange(2, 2));
        assert_eq!(catalog.active_filter_count(), 2);

        catalog.clear_filter(FilterKey::SortBy);
        assert_eq!(catalog.filters().sort_by, SortKey::Default);
        assert_eq!(catalog.active_filter_count(), 1);
    }

    #[test]
    fn test_clear_all_and_results() {
        let mut catalog = catalog();
        catalog.filters_mut().property_types.insert(PropertyType::Villa);
        assert_eq!(catalog.results().len(), 1);

        catalog.clear_all();
        assert_eq!(catalog.active_filter_count(), 0);
        // listing 3 has no usable price
        let ids: Vec<u64> = catalog.results().iter().map(Listing::id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_replace_properties_recomputes_bounds() {
        let mut catalog = catalog();
        catalog.filters_mut().search_query = "villa".to_string();
        catalog.replace_properties(vec![property(9, "Palm Villa", PriceField::Amount(12_000_000), 7, 8)]);

        assert_eq!(catalog.bounds().price, ValueRange(12_000_000, 12_000_000));
        assert_eq!(catalog.filters().search_query, "villa");
        assert!(catalog.get(9).is_some());
        assert!(catalog.get(1).is_none());

        assert_eq!(catalog.filters().price_range, ValueRange(12_000_000, 12_000_000));
        assert_eq!(catalog.filters().bedroom_range, ValueRange(7, 7));
        assert_eq!(catalog.results().len(), 1);
        assert_eq!(catalog.active_filter_count(), 1);
    }

    #[test]
    fn test_replace_properties_keeps_narrowed_ranges() {
        let mut catalog = catalog();
        catalog.filters_mut().bedroom_range = ValueRange(2, 3);
        catalog.replace_properties(vec![
            property(9, "Palm Villa", PriceField::Amount(12_000_000), 7, 8),
            property(10, "Hills Villa", PriceField::Amount(6_000_000), 3, 3),
        ]);

        assert_eq!(catalog.filters().bedroom_range, ValueRange(2, 3));
        assert_eq!(catalog.filters().price_range, ValueRange(6_000_000, 12_000_000));
        let ids: Vec<u64> = catalog.results().iter().map(Listing::id).collect();
        assert_eq!(ids, vec![10]);
        assert_eq!(catalog.active_filter_count(), 1);
    }
}
