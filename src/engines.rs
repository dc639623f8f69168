use crate::ids::unique_id;
use crate::storage::{load_json, save_json, Storage};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const ENGINES_KEY: &str = "search_engines";
pub const CURRENT_ENGINE_KEY: &str = "current_engine";
pub const DELETED_BUILTINS_KEY: &str = "deleted_builtin_ids";

/// The AI-assistant engine can never be removed.
pub const ASSISTANT_ENGINE_ID: &str = "kagi-assistant";
/// Promoted to default when no entry claims it after a merge.
pub const FALLBACK_DEFAULT_ID: &str = "google";

/// A configurable search engine. `url` is the query-substitution prefix the
/// encoded query is appended to. Field names on the wire match the blobs the
/// original extension wrote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchEngine {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default, rename = "isDefault")]
    pub is_default: bool,
    #[serde(default, rename = "isAI")]
    pub is_ai: bool,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl SearchEngine {
    fn builtin(id: &str, name: &str, url: &str) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: url.into(),
            is_default: false,
            is_ai: false,
            enabled: true,
        }
    }
}

/// The builtin catalog shipped with the crate, in display order.
pub fn builtin_engines() -> &'static [SearchEngine] {
    static CATALOG: Lazy<Vec<SearchEngine>> = Lazy::new(|| {
        vec![
            SearchEngine {
                is_default: true,
                ..SearchEngine::builtin("google", "Google", "https://www.google.com/search?q=")
            },
            SearchEngine::builtin("bing", "Bing", "https://www.bing.com/search?q="),
            SearchEngine::builtin("kagi", "Kagi", "https://kagi.com/search?q="),
            SearchEngine::builtin("duckduckgo", "DuckDuckGo", "https://duckduckgo.com/?q="),
            SearchEngine {
                is_ai: true,
                enabled: false,
                ..SearchEngine::builtin(
                    ASSISTANT_ENGINE_ID,
                    "Kagi Assistant",
                    "https://kagi.com/assistant",
                )
            },
            SearchEngine {
                enabled: false,
                ..SearchEngine::builtin("yahoo", "Yahoo", "https://search.yahoo.com/search?p=")
            },
            SearchEngine {
                enabled: false,
                ..SearchEngine::builtin("sogou", "搜狗", "https://www.sogou.com/web?query=")
            },
            SearchEngine {
                enabled: false,
                ..SearchEngine::builtin("yandex", "Yandex", "https://yandex.com/search/?text=")
            },
            SearchEngine {
                enabled: false,
                ..SearchEngine::builtin(
                    "startpage",
                    "StartPage",
                    "https://www.startpage.com/do/search?q=",
                )
            },
            SearchEngine {
                enabled: false,
                ..SearchEngine::builtin("ecosia", "Ecosia", "https://www.ecosia.org/search?q=")
            },
        ]
    });
    &CATALOG
}

/// Presets offered in the "add engine" UI that are not part of the catalog.
pub fn preset_engines() -> &'static [SearchEngine] {
    static PRESETS: Lazy<Vec<SearchEngine>> = Lazy::new(|| {
        vec![
            SearchEngine::builtin("github", "GitHub", "https://github.com/search?q="),
            SearchEngine::builtin(
                "stackoverflow",
                "Stack Overflow",
                "https://stackoverflow.com/search?q=",
            ),
            SearchEngine::builtin("searx", "SearX", "https://searx.org/?q="),
            SearchEngine::builtin("360", "360搜索", "https://www.so.com/s?q="),
        ]
    });
    &PRESETS
}

/// Merge the user's list with the builtin catalog.
///
/// User order and fields are preserved; catalog entries whose id is neither
/// in the user list nor in `deleted` are appended. The result always has
/// exactly one default, and that default is enabled. Idempotent.
pub fn merge_builtins(
    user: &[SearchEngine],
    catalog: &[SearchEngine],
    deleted: &[String],
) -> Vec<SearchEngine> {
    let mut merged: Vec<SearchEngine> = user.to_vec();
    for builtin in catalog {
        if deleted.iter().any(|id| id == &builtin.id) {
            continue;
        }
        if merged.iter().any(|e| e.id == builtin.id) {
            continue;
        }
        merged.push(builtin.clone());
    }
    ensure_single_default(&mut merged);
    merged
}

/// Enforce the exactly-one-default invariant. The first existing default
/// wins; with none, `google` (or the first entry) is promoted. The default
/// entry is always enabled.
fn ensure_single_default(list: &mut [SearchEngine]) {
    if list.is_empty() {
        return;
    }
    let keep = list
        .iter()
        .position(|e| e.is_default)
        .or_else(|| list.iter().position(|e| e.id == FALLBACK_DEFAULT_ID))
        .unwrap_or(0);
    for (i, engine) in list.iter_mut().enumerate() {
        engine.is_default = i == keep;
    }
    list[keep].enabled = true;
}

/// The reconciled, persisted search-engine list. Every mutation writes the
/// affected blobs back through [`Storage`] (last-write-wins).
pub struct EngineRegistry {
    storage: Arc<dyn Storage>,
    engines: Vec<SearchEngine>,
}

impl EngineRegistry {
    /// Load the user list, reconcile it against the builtin catalog and
    /// persist the merged result.
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let user: Vec<SearchEngine> = load_json(storage.as_ref(), ENGINES_KEY);
        let deleted: Vec<String> = load_json(storage.as_ref(), DELETED_BUILTINS_KEY);
        let engines = merge_builtins(&user, builtin_engines(), &deleted);
        let registry = Self { storage, engines };
        registry.persist();
        registry
    }

    pub fn engines(&self) -> &[SearchEngine] {
        &self.engines
    }

    pub fn enabled(&self) -> Vec<&SearchEngine> {
        self.engines.iter().filter(|e| e.enabled).collect()
    }

    pub fn default_engine(&self) -> Option<&SearchEngine> {
        self.engines.iter().find(|e| e.is_default)
    }

    /// Make `id` the sole default in one pass. Forces the target enabled.
    pub fn set_default(&mut self, id: &str) -> bool {
        if !self.engines.iter().any(|e| e.id == id) {
            return false;
        }
        for engine in &mut self.engines {
            engine.is_default = engine.id == id;
            if engine.is_default {
                engine.enabled = true;
            }
        }
        self.persist();
        true
    }

    /// Enable or disable an engine. Disabling the current default is
    /// rejected; reassign the default first.
    pub fn toggle_enabled(&mut self, id: &str, enabled: bool) -> bool {
        let Some(engine) = self.engines.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        if engine.is_default && !enabled {
            tracing::debug!("refusing to disable default engine `{id}`");
            return false;
        }
        engine.enabled = enabled;
        self.persist();
        true
    }

    /// Remove an engine. The assistant sentinel and the current default are
    /// protected; removing a builtin records its id so a later merge does
    /// not resurrect it.
    pub fn remove(&mut self, id: &str) -> bool {
        if id == ASSISTANT_ENGINE_ID {
            return false;
        }
        let Some(index) = self.engines.iter().position(|e| e.id == id) else {
            return false;
        };
        if self.engines[index].is_default {
            return false;
        }
        self.engines.remove(index);
        if builtin_engines().iter().any(|b| b.id == id) {
            let mut deleted: Vec<String> = load_json(self.storage.as_ref(), DELETED_BUILTINS_KEY);
            if !deleted.iter().any(|d| d == id) {
                deleted.push(id.to_string());
                if let Err(e) = save_json(self.storage.as_ref(), DELETED_BUILTINS_KEY, &deleted) {
                    tracing::warn!("failed to persist deleted builtin ids: {e}");
                }
            }
        }
        self.persist();
        true
    }

    /// Add a custom engine. The id is generated from the slugified name plus
    /// a timestamp, with a numeric suffix when that still collides (two adds
    /// of the same name within one millisecond).
    pub fn add(&mut self, name: &str, url: &str) -> String {
        let id = unique_id(name, |candidate| {
            self.engines.iter().any(|e| e.id == candidate)
        });
        self.engines.push(SearchEngine {
            id: id.clone(),
            name: name.to_string(),
            url: url.to_string(),
            is_default: false,
            is_ai: false,
            enabled: true,
        });
        self.persist();
        id
    }

    /// Add a preset engine, refusing duplicates by id.
    pub fn add_preset(&mut self, preset: &SearchEngine) -> bool {
        if self.engines.iter().any(|e| e.id == preset.id) {
            return false;
        }
        self.engines.push(SearchEngine {
            is_default: false,
            enabled: true,
            ..preset.clone()
        });
        self.persist();
        true
    }

    /// Move `from_id` to `to_id`'s position, shifting the entries between
    /// them. Pure splice; no fields change.
    pub fn reorder(&mut self, from_id: &str, to_id: &str) -> bool {
        let Some(from) = self.engines.iter().position(|e| e.id == from_id) else {
            return false;
        };
        let Some(to) = self.engines.iter().position(|e| e.id == to_id) else {
            return false;
        };
        if from == to {
            return true;
        }
        let engine = self.engines.remove(from);
        self.engines.insert(to, engine);
        self.persist();
        true
    }

    /// Forget all customisations and deletions; the list becomes the builtin
    /// catalog verbatim.
    pub fn reset_to_default(&mut self) {
        if let Err(e) = save_json(self.storage.as_ref(), DELETED_BUILTINS_KEY, &Vec::<String>::new())
        {
            tracing::warn!("failed to clear deleted builtin ids: {e}");
        }
        self.engines = builtin_engines().to_vec();
        self.persist();
    }

    /// The engine searches run against: the persisted selection when it
    /// still names an enabled engine, otherwise the default.
    pub fn selected(&self) -> Option<&SearchEngine> {
        let id: String = load_json(self.storage.as_ref(), CURRENT_ENGINE_KEY);
        self.engines
            .iter()
            .find(|e| e.id == id && e.enabled)
            .or_else(|| self.default_engine())
    }

    /// Persist `id` as the active engine. Rejected when it does not name an
    /// enabled engine.
    pub fn select(&mut self, id: &str) -> bool {
        if !self.engines.iter().any(|e| e.id == id && e.enabled) {
            return false;
        }
        if let Err(e) = save_json(self.storage.as_ref(), CURRENT_ENGINE_KEY, &id) {
            tracing::warn!("failed to persist engine selection: {e}");
        }
        true
    }

    fn persist(&self) {
        if let Err(e) = save_json(self.storage.as_ref(), ENGINES_KEY, &self.engines) {
            tracing::warn!("failed to persist search engines: {e}");
        }
    }
}
