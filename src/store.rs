//! In-memory content store with optional JSON snapshot on disk.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::models::{AreaGuide, BlogPost, EvaluationDetails, Lead, LeadKind, Property, PropertyInput};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("slug '{0}' is already taken")]
    DuplicateSlug(String),

    #[error("no {0} ids left")]
    IdsExhausted(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Everything the site persists
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub posts: Vec<BlogPost>,
    #[serde(default)]
    pub areas: Vec<AreaGuide>,
    #[serde(default)]
    pub leads: Vec<Lead>,
}

/// New or replacement blog article from the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostInput {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub excerpt: String,
    pub body: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub published: bool,
}

/// Lead as submitted through the contact or evaluation form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadInput {
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
}

pub struct Store {
    content: RwLock<Content>,
    path: Option<PathBuf>,
}

impl Store {
    pub fn in_memory(content: Content) -> Self {
        Self {
            content: RwLock::new(content),
            path: None,
        }
    }

    /// Open the snapshot at `path`, starting empty if it does not exist yet
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No snapshot at {}, starting empty", path.display());
                Content::default()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            content: RwLock::new(content),
            path: Some(path),
        })
    }

    /// Apply `change` to a copy of the content, write the snapshot, then
    /// swap the copy in.
    ///
    /// The write guard is held until the snapshot is on disk, so snapshots
    /// land in the order the changes were made. If the write fails the
    /// in-memory content is left as it was.
    async fn commit<T>(&self, change: impl FnOnce(&mut Content) -> Result<T>) -> Result<T> {
        let mut content = self.content.write().await;
        let mut draft = content.clone();
        let out = change(&mut draft)?;
        if let Some(path) = &self.path {
            write_snapshot(path, &draft).await?;
        }
        *content = draft;
        Ok(out)
    }

    pub async fn snapshot(&self) -> Content {
        self.content.read().await.clone()
    }

    // Properties

    pub async fn properties(&self) -> Vec<Property> {
        self.content.read().await.properties.clone()
    }

    pub async fn property(&self, id: u64) -> Result<Property> {
        self.content
            .read()
            .await
            .properties
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("property {}", id)))
    }

    pub async fn create_property(&self, input: PropertyInput) -> Result<Property> {
        let property = self
            .commit(|content| {
                let id = next_id("property", content.properties.iter().map(|p| p.id))?;
                let property = input.into_property(id, Utc::now());
                content.properties.push(property.clone());
                Ok(property)
            })
            .await?;
        info!("Created property {} ({})", property.id, property.title);
        Ok(property)
    }

    pub async fn update_property(&self, id: u64, input: PropertyInput) -> Result<Property> {
        let property = self
            .commit(|content| {
                let slot = content
                    .properties
                    .iter_mut()
                    .find(|p| p.id == id)
                    .ok_or_else(|| StoreError::NotFound(format!("property {}", id)))?;
                *slot = input.into_property(id, slot.created_at);
                Ok(slot.clone())
            })
            .await?;
        info!("Updated property {}", id);
        Ok(property)
    }

    pub async fn delete_property(&self, id: u64) -> Result<()> {
        self.commit(|content| {
            let before = content.properties.len();
            content.properties.retain(|p| p.id != id);
            if content.properties.len() == before {
                return Err(StoreError::NotFound(format!("property {}", id)));
            }
            Ok(())
        })
        .await?;
        info!("Deleted property {}", id);
        Ok(())
    }

    /// Upsert by id. Returns how many records were new.
    pub async fn import_properties(&self, incoming: Vec<Property>) -> Result<usize> {
        self.commit(|content| {
            let mut by_id: BTreeMap<u64, usize> = content
                .properties
                .iter()
                .enumerate()
                .map(|(idx, p)| (p.id, idx))
                .collect();
            let mut added = 0;
            for property in incoming {
                match by_id.get(&property.id) {
                    Some(&idx) => content.properties[idx] = property,
                    None => {
                        by_id.insert(property.id, content.properties.len());
                        content.properties.push(property);
                        added += 1;
                    }
                }
            }
            Ok(added)
        })
        .await
    }

    // Blog

    pub async fn posts(&self, published_only: bool) -> Vec<BlogPost> {
        let content = self.content.read().await;
        let mut posts: Vec<BlogPost> = content
            .posts
            .iter()
            .filter(|p| !published_only || p.published)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at).then(b.id.cmp(&a.id)));
        posts
    }

    pub async fn post(&self, slug: &str) -> Result<BlogPost> {
        self.content
            .read()
            .await
            .posts
            .iter()
            .find(|p| p.slug == slug)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("post '{}'", slug)))
    }

    pub async fn create_post(&self, input: PostInput) -> Result<BlogPost> {
        let post = self
            .commit(|content| {
                let slug = input
                    .slug
                    .clone()
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| BlogPost::slugify(&input.title));
                if content.posts.iter().any(|p| p.slug == slug) {
                    return Err(StoreError::DuplicateSlug(slug));
                }
                let id = next_id("post", content.posts.iter().map(|p| p.id))?;
                let now = Utc::now();
                let post = BlogPost {
                    id,
                    slug,
                    title: input.title,
                    excerpt: input.excerpt,
                    body: input.body,
                    author: input.author,
                    tags: input.tags,
                    published: input.published,
                    published_at: input.published.then_some(now),
                    updated_at: now,
                };
                content.posts.push(post.clone());
                Ok(post)
            })
            .await?;
        info!("Created post '{}'", post.slug);
        Ok(post)
    }

    pub async fn update_post(&self, slug: &str, input: PostInput) -> Result<BlogPost> {
        self.commit(|content| {
            let new_slug = input
                .slug
                .clone()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| slug.to_string());
            if new_slug != slug && content.posts.iter().any(|p| p.slug == new_slug) {
                return Err(StoreError::DuplicateSlug(new_slug));
            }
            let post = content
                .posts
                .iter_mut()
                .find(|p| p.slug == slug)
                .ok_or_else(|| StoreError::NotFound(format!("post '{}'", slug)))?;

            let now = Utc::now();
            post.slug = new_slug;
            post.title = input.title;
            post.excerpt = input.excerpt;
            post.body = input.body;
            post.author = input.author;
            post.tags = input.tags;
            if input.published && post.published_at.is_none() {
                post.published_at = Some(now);
            }
            post.published = input.published;
            post.updated_at = now;
            Ok(post.clone())
        })
        .await
    }

    pub async fn delete_post(&self, slug: &str) -> Result<()> {
        self.commit(|content| {
            let before = content.posts.len();
            content.posts.retain(|p| p.slug != slug);
            if content.posts.len() == before {
                return Err(StoreError::NotFound(format!("post '{}'", slug)));
            }
            Ok(())
        })
        .await
    }

    // Area guide

    pub async fn areas(&self) -> Vec<AreaGuide> {
        let mut areas = self.content.read().await.areas.clone();
        areas.sort_by(|a, b| a.name.cmp(&b.name));
        areas
    }

    pub async fn area(&self, slug: &str) -> Result<AreaGuide> {
        self.content
            .read()
            .await
            .areas
            .iter()
            .find(|a| a.slug == slug)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("area '{}'", slug)))
    }

    pub async fn upsert_area(&self, mut area: AreaGuide) -> Result<AreaGuide> {
        if area.slug.trim().is_empty() {
            area.slug = BlogPost::slugify(&area.name);
        }
        self.commit(|content| {
            match content.areas.iter_mut().find(|a| a.slug == area.slug) {
                Some(existing) => *existing = area.clone(),
                None => content.areas.push(area.clone()),
            }
            Ok(())
        })
        .await?;
        Ok(area)
    }

    pub async fn delete_area(&self, slug: &str) -> Result<()> {
        self.commit(|content| {
            let before = content.areas.len();
            content.areas.retain(|a| a.slug != slug);
            if content.areas.len() == before {
                return Err(StoreError::NotFound(format!("area '{}'", slug)));
            }
            Ok(())
        })
        .await
    }

    // Leads

    pub async fn add_lead(&self, input: LeadInput) -> Result<Lead> {
        let lead = self
            .commit(|content| {
                let id = next_id("lead", content.leads.iter().map(|l| l.id))?;
                let lead = Lead {
                    id,
                    kind: input.kind,
                    name: input.name,
                    email: input.email,
                    phone: input.phone,
                    message: input.message,
                    property_id: input.property_id,
                    evaluation: input.evaluation,
                    created_at: Utc::now(),
                };
                content.leads.push(lead.clone());
                Ok(lead)
            })
            .await?;
        info!("Captured {:?} lead {}", lead.kind, lead.id);
        Ok(lead)
    }

    /// Newest first
    pub async fn leads(&self) -> Vec<Lead> {
        let mut leads = self.content.read().await.leads.clone();
        leads.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        leads
    }
}

fn next_id(kind: &'static str, ids: impl Iterator<Item = u64>) -> Result<u64> {
    match ids.max() {
        Some(max) => max.checked_add(1).ok_or(StoreError::IdsExhausted(kind)),
        None => Ok(1),
    }
}

/// Write to a sibling temp file and rename it over the snapshot, so a
/// reader never sees a half-written file.
async fn write_snapshot(path: &Path, content: &Content) -> Result<()> {
    let json = serde_json::to_string_pretty(content)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, json).await?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    debug!("Saved snapshot to {}", path.display());
    Ok(())
}
