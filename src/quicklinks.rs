use crate::ids::unique_id;
use crate::storage::{load_json, save_json, Storage};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const QUICK_LINKS_KEY: &str = "quick_links";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickLink {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Links shown on a fresh profile before the user customises anything.
pub fn default_links() -> Vec<QuickLink> {
    let seed = [
        ("GitHub", "https://github.com", "💻"),
        ("Gmail", "https://gmail.com", "📧"),
        ("YouTube", "https://youtube.com", "📺"),
        ("StackOverflow", "https://stackoverflow.com", "📚"),
    ];
    seed.iter()
        .map(|(name, url, icon)| QuickLink {
            id: slug::slugify(name),
            name: (*name).into(),
            url: (*url).into(),
            icon: Some((*icon).into()),
            enabled: true,
        })
        .collect()
}

/// User-ordered quick links. Same registry shape as the engines but with no
/// default-item concept and no builtin catalog to reconcile against.
pub struct QuickLinkRegistry {
    storage: Arc<dyn Storage>,
    links: Vec<QuickLink>,
}

impl QuickLinkRegistry {
    /// Load persisted links; a profile with no blob at all gets the seed
    /// list (an explicitly emptied list stays empty).
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let links = if storage.read(QUICK_LINKS_KEY).is_some() {
            load_json(storage.as_ref(), QUICK_LINKS_KEY)
        } else {
            default_links()
        };
        let registry = Self { storage, links };
        registry.persist();
        registry
    }

    pub fn links(&self) -> &[QuickLink] {
        &self.links
    }

    pub fn enabled(&self) -> Vec<&QuickLink> {
        self.links.iter().filter(|l| l.enabled).collect()
    }

    pub fn add(&mut self, name: &str, url: &str, icon: Option<&str>) -> String {
        let id = unique_id(name, |candidate| {
            self.links.iter().any(|l| l.id == candidate)
        });
        self.links.push(QuickLink {
            id: id.clone(),
            name: name.to_string(),
            url: url.to_string(),
            icon: icon.map(str::to_string),
            enabled: true,
        });
        self.persist();
        id
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let Some(index) = self.links.iter().position(|l| l.id == id) else {
            return false;
        };
        self.links.remove(index);
        self.persist();
        true
    }

    pub fn toggle_enabled(&mut self, id: &str, enabled: bool) -> bool {
        let Some(link) = self.links.iter_mut().find(|l| l.id == id) else {
            return false;
        };
        link.enabled = enabled;
        self.persist();
        true
    }

    /// Move `from_id` to `to_id`'s position. Pure splice.
    pub fn reorder(&mut self, from_id: &str, to_id: &str) -> bool {
        let Some(from) = self.links.iter().position(|l| l.id == from_id) else {
            return false;
        };
        let Some(to) = self.links.iter().position(|l| l.id == to_id) else {
            return false;
        };
        if from != to {
            let link = self.links.remove(from);
            self.links.insert(to, link);
            self.persist();
        }
        true
    }

    fn persist(&self) {
        if let Err(e) = save_json(self.storage.as_ref(), QUICK_LINKS_KEY, &self.links) {
            tracing::warn!("failed to persist quick links: {e}");
        }
    }
}
