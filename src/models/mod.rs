use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

mod content;

pub use content::{AreaGuide, BlogPost, EvaluationDetails, Lead, LeadKind};

/// Coarse classification of a listing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Apartment,
    Villa,
    House,
    Penthouse,
    Mansion,
    Cottage,
    Cabin,
    Chalet,
    Land,
    Other,
}

impl PropertyType {
    pub const ALL: [PropertyType; 10] = [
        PropertyType::Apartment,
        PropertyType::Villa,
        PropertyType::House,
        PropertyType::Penthouse,
        PropertyType::Mansion,
        PropertyType::Cottage,
        PropertyType::Cabin,
        PropertyType::Chalet,
        PropertyType::Land,
        PropertyType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Apartment => "apartment",
            PropertyType::Villa => "villa",
            PropertyType::House => "house",
            PropertyType::Penthouse => "penthouse",
            PropertyType::Mansion => "mansion",
            PropertyType::Cottage => "cottage",
            PropertyType::Cabin => "cabin",
            PropertyType::Chalet => "chalet",
            PropertyType::Land => "land",
            PropertyType::Other => "other",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        PropertyType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| format!("unknown property type '{}'", s.trim()))
    }
}

/// Asking price as it arrives from the listing data.
///
/// Older listings carry a display string in thousands (`"$1,250"`), newer
/// ones a plain number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PriceField {
    Amount(u64),
    Fractional(f64),
    Display(String),
}

/// Core property data model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Property {
    pub id: u64,
    pub title: String,
    /// Type set at ingestion. When absent it is inferred from the title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyType>,
    pub status: String,
    pub price: PriceField,
    /// `"<city>, ..., <country>"`
    pub location: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_sqft: Option<u32>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// Payload for creating or replacing a property from the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyInput {
    pub title: String,
    #[serde(default)]
    pub property_type: Option<PropertyType>,
    pub status: String,
    pub price: PriceField,
    pub location: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub area_sqft: Option<u32>,
}

impl PropertyInput {
    pub fn into_property(self, id: u64, created_at: DateTime<Utc>) -> Property {
        Property {
            id,
            title: self.title,
            property_type: self.property_type,
            status: self.status,
            price: self.price,
            location: self.location,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            features: self.features,
            description: self.description,
            images: self.images,
            area_sqft: self.area_sqft,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_field_accepts_numbers_and_strings() {
        let p: PriceField = serde_json::from_str("1250000").unwrap();
        assert_eq!(p, PriceField::Amount(1_250_000));

        let p: PriceField = serde_json::from_str("1250000.5").unwrap();
        assert_eq!(p, PriceField::Fractional(1_250_000.5));

        let p: PriceField = serde_json::from_str("\"$1,250\"").unwrap();
        assert_eq!(p, PriceField::Display("$1,250".to_string()));
    }

    #[test]
    fn test_property_defaults_optional_fields() {
        let json = r#"{
            "id": 7,
            "title": "Marina Villa",
            "status": "For Sale",
            "price": "$500",
            "location": "Dubai, UAE",
            "bedrooms": 3,
            "bathrooms": 2
        }"#;
        let property: Property = serde_json::from_str(json).unwrap();
        assert_eq!(property.id, 7);
        assert!(property.property_type.is_none());
        assert!(property.features.is_empty());
        assert!(property.area_sqft.is_none());
    }

    #[test]
    fn test_property_type_parsing() {
        assert_eq!("Villa".parse::<PropertyType>().unwrap(), PropertyType::Villa);
        assert_eq!(" land ".parse::<PropertyType>().unwrap(), PropertyType::Land);
        assert!("castle".parse::<PropertyType>().is_err());
        assert_eq!(
            serde_json::to_string(&PropertyType::Penthouse).unwrap(),
            "\"penthouse\""
        );
    }
}
