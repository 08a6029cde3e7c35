use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PropertyType;

/// Blog article shown on the public site
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlogPost {
    pub id: u64,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    pub body: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl BlogPost {
    /// Lower-case, ASCII alphanumerics separated by single dashes.
    pub fn slugify(title: &str) -> String {
        let mut slug = String::with_capacity(title.len());
        for c in title.chars() {
            if c.is_ascii_alphanumeric() {
                slug.push(c.to_ascii_lowercase());
            } else if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        }
        while slug.ends_with('-') {
            slug.pop();
        }
        slug
    }
}

/// Neighbourhood entry in the area guide
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AreaGuide {
    #[serde(default)]
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub average_price: Option<u64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LeadKind {
    Contact,
    Evaluation,
}

/// What an owner tells us when asking for a valuation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvaluationDetails {
    pub location: String,
    pub property_type: PropertyType,
    pub bedrooms: u32,
    #[serde(default)]
    pub area_sqft: Option<u32>,
    #[serde(default)]
    pub asking_price: Option<u64>,
}

/// Captured contact or evaluation request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lead {
    pub id: u64,
    pub kind: LeadKind,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub property_id: Option<u64>,
    #[serde(default)]
    pub evaluation: Option<EvaluationDetails>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(BlogPost::slugify("Buying in Dubai Marina"), "buying-in-dubai-marina");
        assert_eq!(BlogPost::slugify("  2025: What's next?  "), "2025-what-s-next");
        assert_eq!(BlogPost::slugify("!!!"), "");
    }

    #[test]
    fn test_lead_kind_wire_format() {
        assert_eq!(serde_json::to_string(&LeadKind::Evaluation).unwrap(), "\"evaluation\"");
        let kind: LeadKind = serde_json::from_str("\"contact\"").unwrap();
        assert_eq!(kind, LeadKind::Contact);
    }
}
