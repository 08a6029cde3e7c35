use serde::{Deserialize, Serialize};

use crate::models::{PriceField, Property, PropertyType};

/// Title keywords tried in order; the first hit decides the type.
const TYPE_KEYWORDS: [(&str, PropertyType); 8] = [
    ("villa", PropertyType::Villa),
    ("apartment", PropertyType::Apartment),
    ("penthouse", PropertyType::Penthouse),
    ("mansion", PropertyType::Mansion),
    ("house", PropertyType::House),
    ("cottage", PropertyType::Cottage),
    ("cabin", PropertyType::Cabin),
    ("chalet", PropertyType::Chalet),
];

/// Display-string prices are quoted in thousands
const DISPLAY_PRICE_MULTIPLIER: u64 = 1000;

/// A property with the fields the filter engine works on
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    #[serde(flatten)]
    pub property: Property,
    #[serde(rename = "derived_type")]
    pub property_type: PropertyType,
    /// `None` when the price could not be parsed
    pub price_value: Option<u64>,
    pub city: String,
    pub country: String,
}

impl Listing {
    pub fn from_property(property: Property) -> Self {
        let property_type = property
            .property_type
            .unwrap_or_else(|| infer_property_type(&property.title));
        let price_value = parse_price(&property.price);
        let (city, country) = split_location(&property.location);

        Self {
            property,
            property_type,
            price_value,
            city,
            country,
        }
    }

    pub fn id(&self) -> u64 {
        self.property.id
    }
}

/// Attach derived fields to every property, preserving order
pub fn derive_fields(properties: Vec<Property>) -> Vec<Listing> {
    properties.into_iter().map(Listing::from_property).collect()
}

/// Best-effort classification from free-text title
pub fn infer_property_type(title: &str) -> PropertyType {
    let title = title.to_lowercase();
    TYPE_KEYWORDS
        .iter()
        .find(|(keyword, _)| title.contains(keyword))
        .map(|(_, property_type)| *property_type)
        .unwrap_or(PropertyType::Other)
}

pub fn parse_price(price: &PriceField) -> Option<u64> {
    match price {
        PriceField::Amount(value) => Some(*value),
        PriceField::Fractional(value) => {
            if value.is_finite() && *value >= 0.0 && *value <= u64::MAX as f64 {
                Some(*value as u64)
            } else {
                None
            }
        }
        PriceField::Display(text) => {
            let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
            digits
                .parse::<u64>()
                .ok()
                .and_then(|v| v.checked_mul(DISPLAY_PRICE_MULTIPLIER))
        }
    }
}

/// Split `"<city>, ..., <country>"` into its first and last segment
pub fn split_location(location: &str) -> (String, String) {
    let mut segments = location.split(", ");
    let city = segments.next().unwrap_or_default().to_string();
    let country = segments.last().map(str::to_string).unwrap_or_else(|| city.clone());
    (city, country)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn property(title: &str, price: PriceField, location: &str) -> Property {
        Property {
            id: 1,
            title: title.to_string(),
            property_type: None,
            status: "For Sale".to_string(),
            price,
            location: location.to_string(),
            bedrooms: 2,
            bathrooms: 1,
            features: vec![],
            description: String::new(),
            images: vec![],
            area_sqft: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_type_inference_priority() {
        assert_eq!(infer_property_type("Luxury Villa Apartment"), PropertyType::Villa);
        assert_eq!(infer_property_type("Penthouse Apartment"), PropertyType::Apartment);
        assert_eq!(infer_property_type("Beach HOUSE"), PropertyType::House);
        // "penthouse" contains "house" but is tried first
        assert_eq!(infer_property_type("Sky Penthouse"), PropertyType::Penthouse);
        assert_eq!(infer_property_type("Alpine Chalet"), PropertyType::Chalet);
        assert_eq!(infer_property_type("Plot in Dubai Hills"), PropertyType::Other);
    }

    #[test]
    fn test_stored_type_wins_over_title() {
        let mut p = property("Marina Villa", PriceField::Amount(1), "Dubai, UAE");
        p.property_type = Some(PropertyType::Land);
        assert_eq!(Listing::from_property(p).property_type, PropertyType::Land);
    }

    #[test]
    fn test_price_parsing() {
        assert_eq!(parse_price(&PriceField::Display("$1,250".into())), Some(1_250_000));
        assert_eq!(parse_price(&PriceField::Amount(1_250_000)), Some(1_250_000));
        assert_eq!(parse_price(&PriceField::Fractional(999.9)), Some(999));
        assert_eq!(parse_price(&PriceField::Display("Price on request".into())), None);
        assert_eq!(parse_price(&PriceField::Display(String::new())), None);
        assert_eq!(parse_price(&PriceField::Display("99999999999999999999".into())), None);
        assert_eq!(parse_price(&PriceField::Fractional(-10.0)), None);
    }

    #[test]
    fn test_location_split() {
        assert_eq!(
            split_location("Dubai, Jumeirah, UAE"),
            ("Dubai".to_string(), "UAE".to_string())
        );
        assert_eq!(
            split_location("Abu Dhabi"),
            ("Abu Dhabi".to_string(), "Abu Dhabi".to_string())
        );
        // only ", " separates segments
        assert_eq!(
            split_location("Dubai,UAE"),
            ("Dubai,UAE".to_string(), "Dubai,UAE".to_string())
        );
    }

    #[test]
    fn test_derive_fields_keeps_order() {
        let listings = derive_fields(vec![
            property("Downtown Apartment", PriceField::Display("$300".into()), "Dubai, UAE"),
            property("Marina Villa", PriceField::Display("$500".into()), "Dubai, UAE"),
        ]);
        assert_eq!(listings[0].property_type, PropertyType::Apartment);
        assert_eq!(listings[0].price_value, Some(300_000));
        assert_eq!(listings[1].property_type, PropertyType::Villa);
        assert_eq!(listings[1].country, "UAE");
    }
}
