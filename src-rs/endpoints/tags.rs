use std::fmt;
use std::sync::RwLock;

use tokio::sync::watch;
use tracing::debug;

pub const GEO_TASK_ENTITY: &str = "geo-task";

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CacheTag {
    /// The entity's list as a whole.
    Collection { entity: String },
    Item { entity: String, id: String },
}

impl CacheTag {
    pub fn collection(entity: &str) -> Self {
        Self::Collection {
            entity: entity.to_string(),
        }
    }

    pub fn item(entity: &str, id: &str) -> Self {
        Self::Item {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }
}

impl fmt::Display for CacheTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Collection { entity } => write!(f, "{}:list", entity),
            Self::Item { entity, id } => write!(f, "{}:{}", entity, id),
        }
    }
}

#[derive(Default)]
struct ProvidedTags {
    collection: bool,
    /// Ids from the most recent successful list, in list order.
    ids: Vec<String>,
}

/// Tag bookkeeping for one entity. Provided item ids are always a subset of
/// the ids returned by the latest list; invalidations bump a generation that
/// list subscriptions watch.
pub struct TagStore {
    entity: String,
    provided: RwLock<ProvidedTags>,
    invalidations: watch::Sender<u64>,
}

impl TagStore {
    pub fn new(entity: &str) -> Self {
        let (invalidations, _) = watch::channel(0);
        Self {
            entity: entity.to_string(),
            provided: RwLock::new(ProvidedTags::default()),
            invalidations,
        }
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Replaces the provided ids with `ids`, pruning anything stale.
    pub fn provide_list<'a>(&self, ids: impl IntoIterator<Item = &'a str>) -> Vec<CacheTag> {
        let fresh: Vec<String> = ids.into_iter().map(str::to_string).collect();
        if let Ok(mut provided) = self.provided.write() {
            let pruned = provided.ids.iter().filter(|id| !fresh.contains(id)).count();
            if pruned > 0 {
                debug!(entity = %self.entity, pruned, "pruned stale tags");
            }
            provided.collection = true;
            provided.ids = fresh;
        }
        self.provided()
    }

    /// A failed list provides the collection tag alone and drops the ids
    /// of the previous list.
    pub fn provide_collection(&self) -> Vec<CacheTag> {
        if let Ok(mut provided) = self.provided.write() {
            provided.collection = true;
            provided.ids.clear();
        }
        vec![CacheTag::collection(&self.entity)]
    }

    pub fn provided(&self) -> Vec<CacheTag> {
        let provided = match self.provided.read() {
            Ok(lock) => lock,
            Err(_) => return vec![],
        };
        let mut tags = Vec::with_capacity(provided.ids.len() + 1);
        if provided.collection {
            tags.push(CacheTag::collection(&self.entity));
        }
        tags.extend(provided.ids.iter().map(|id| CacheTag::item(&self.entity, id)));
        tags
    }

    pub fn provided_ids(&self) -> Vec<String> {
        match self.provided.read() {
            Ok(provided) => provided.ids.clone(),
            Err(_) => vec![],
        }
    }

    /// Returns true when a watched tag was hit and subscribers were notified.
    pub fn invalidate(&self, tags: &[CacheTag]) -> bool {
        let hit = {
            let provided = match self.provided.read() {
                Ok(lock) => lock,
                Err(_) => return false,
            };
            tags.iter().any(|tag| match tag {
                CacheTag::Collection { entity } => *entity == self.entity,
                CacheTag::Item { entity, id } => *entity == self.entity && provided.ids.contains(id),
            })
        };
        if hit {
            self.invalidations.send_modify(|generation| *generation += 1);
            debug!(entity = %self.entity, generation = self.generation(), "tags invalidated");
        }
        hit
    }

    pub fn generation(&self) -> u64 {
        *self.invalidations.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.invalidations.subscribe()
    }
}
