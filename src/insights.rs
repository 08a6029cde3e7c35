//! Aggregations behind the "similar properties" panel and the dashboard.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::filters::Listing;
use crate::models::{BlogPost, Lead, LeadKind, PropertyType};

const TOP_CITIES: usize = 5;
const RECENT_LEADS: usize = 5;

/// Listings sharing the target's type or city, closest match first.
///
/// Same type ranks above same city only, then smaller price distance, then id.
/// Listings without a usable price sort after priced ones.
pub fn similar_properties(listings: &[Listing], id: u64, limit: usize) -> Option<Vec<Listing>> {
    let target = listings.iter().find(|l| l.id() == id)?;

    let mut candidates: Vec<&Listing> = listings
        .iter()
        .filter(|l| l.id() != id)
        .filter(|l| l.property_type == target.property_type || l.city == target.city)
        .collect();

    candidates.sort_by_key(|l| {
        let different_type = l.property_type != target.property_type;
        let distance = match (l.price_value, target.price_value) {
            (Some(a), Some(b)) => a.abs_diff(b),
            _ => u64::MAX,
        };
        (different_type, distance, l.id())
    });

    Some(candidates.into_iter().take(limit).cloned().collect())
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CityCount {
    pub city: String,
    pub listings: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardOverview {
    pub total_properties: usize,
    pub total_posts: usize,
    pub published_posts: usize,
    pub total_leads: usize,
    pub contact_leads: usize,
    pub evaluation_leads: usize,
    pub properties_by_type: BTreeMap<PropertyType, usize>,
    pub top_cities: Vec<CityCount>,
    /// Mean over listings whose price parsed
    pub average_price: Option<u64>,
    pub recent_leads: Vec<Lead>,
}

pub fn dashboard_overview(listings: &[Listing], posts: &[BlogPost], leads: &[Lead]) -> DashboardOverview {
    let mut properties_by_type = BTreeMap::new();
    let mut per_city: HashMap<&str, usize> = HashMap::new();
    for listing in listings {
        *properties_by_type.entry(listing.property_type).or_insert(0) += 1;
        *per_city.entry(listing.city.as_str()).or_insert(0) += 1;
    }

    let mut top_cities: Vec<CityCount> = per_city
        .into_iter()
        .map(|(city, listings)| CityCount {
            city: city.to_string(),
            listings,
        })
        .collect();
    top_cities.sort_by(|a, b| b.listings.cmp(&a.listings).then_with(|| a.city.cmp(&b.city)));
    top_cities.truncate(TOP_CITIES);

    let prices: Vec<u128> = listings.iter().filter_map(|l| l.price_value).map(u128::from).collect();
    let average_price = if prices.is_empty() {
        None
    } else {
        u64::try_from(prices.iter().sum::<u128>() / prices.len() as u128).ok()
    };

    let mut recent_leads = leads.to_vec();
    recent_leads.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    recent_leads.truncate(RECENT_LEADS);

    DashboardOverview {
        total_properties: listings.len(),
        total_posts: posts.len(),
        published_posts: posts.iter().filter(|p| p.published).count(),
        total_leads: leads.len(),
        contact_leads: leads.iter().filter(|l| l.kind == LeadKind::Contact).count(),
        evaluation_leads: leads.iter().filter(|l| l.kind == LeadKind::Evaluation).count(),
        properties_by_type,
        top_cities,
        average_price,
        recent_leads,
    }
}
