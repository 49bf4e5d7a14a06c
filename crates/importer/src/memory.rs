//! In-process [`CatalogStore`] used for dry runs and tests.
//!
//! Rows live in one arena per kind; a row's local id is its arena index plus
//! one. Each kind keeps an `external_id -> id` index, and edges are a set of
//! `(link, owner, target)` triples.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use citadel_core::catalog::{EntityKind, ManyLink, SingleLink};
use citadel_core::types::{DbId, ExternalId};
use citadel_db::models::book::CreateBook;
use citadel_db::models::character::CreateCharacter;
use citadel_db::models::house::CreateHouse;

use crate::store::{CatalogStore, StoreError};

/// A stored row plus its single-valued relationships.
#[derive(Debug, Clone)]
pub struct MemoryRow<T> {
    pub id: DbId,
    pub data: T,
    pub links: HashMap<SingleLink, DbId>,
}

#[derive(Default)]
struct Arena<T> {
    rows: Vec<MemoryRow<T>>,
    by_external_id: HashMap<ExternalId, DbId>,
}

impl<T: Clone> Arena<T> {
    fn upsert(&mut self, external_id: ExternalId, data: &T) -> DbId {
        if let Some(&id) = self.by_external_id.get(&external_id) {
            if let Some(row) = self.row_mut(id) {
                row.data = data.clone();
            }
            return id;
        }
        let id = self.rows.len() as DbId + 1;
        self.rows.push(MemoryRow {
            id,
            data: data.clone(),
            links: HashMap::new(),
        });
        self.by_external_id.insert(external_id, id);
        id
    }

    fn row(&self, id: DbId) -> Option<&MemoryRow<T>> {
        usize::try_from(id - 1).ok().and_then(|i| self.rows.get(i))
    }

    fn row_mut(&mut self, id: DbId) -> Option<&mut MemoryRow<T>> {
        usize::try_from(id - 1).ok().and_then(|i| self.rows.get_mut(i))
    }
}

#[derive(Default)]
struct Inner {
    characters: Arena<CreateCharacter>,
    houses: Arena<CreateHouse>,
    books: Arena<CreateBook>,
    edges: BTreeSet<(u8, DbId, DbId)>,
}

impl Inner {
    fn index(&self, kind: EntityKind) -> &HashMap<ExternalId, DbId> {
        match kind {
            EntityKind::Character => &self.characters.by_external_id,
            EntityKind::House => &self.houses.by_external_id,
            EntityKind::Book => &self.books.by_external_id,
        }
    }

    fn links_mut(&mut self, kind: EntityKind, id: DbId) -> Option<&mut HashMap<SingleLink, DbId>> {
        match kind {
            EntityKind::Character => self.characters.row_mut(id).map(|r| &mut r.links),
            EntityKind::House => self.houses.row_mut(id).map(|r| &mut r.links),
            EntityKind::Book => self.books.row_mut(id).map(|r| &mut r.links),
        }
    }

    fn links(&self, kind: EntityKind, id: DbId) -> Option<&HashMap<SingleLink, DbId>> {
        match kind {
            EntityKind::Character => self.characters.row(id).map(|r| &r.links),
            EntityKind::House => self.houses.row(id).map(|r| &r.links),
            EntityKind::Book => self.books.row(id).map(|r| &r.links),
        }
    }
}

/// Edge tables are keyed by a small tag so the set stays ordered.
fn edge_tag(link: ManyLink) -> u8 {
    match link {
        ManyLink::Allegiance => 0,
        ManyLink::BookCharacter => 1,
        ManyLink::BookPovCharacter => 2,
        ManyLink::CadetBranch => 3,
        ManyLink::SwornMember => 4,
    }
}

#[derive(Default)]
pub struct MemoryCatalogStore {
    inner: Mutex<Inner>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of rows of `kind`.
    pub fn count(&self, kind: EntityKind) -> usize {
        self.lock().index(kind).len()
    }

    /// Total number of edges across all association sets.
    pub fn edge_count(&self) -> usize {
        self.lock().edges.len()
    }

    pub fn id_of(&self, kind: EntityKind, external_id: ExternalId) -> Option<DbId> {
        self.lock().index(kind).get(&external_id).copied()
    }

    pub fn character(&self, external_id: ExternalId) -> Option<MemoryRow<CreateCharacter>> {
        let inner = self.lock();
        let id = *inner.characters.by_external_id.get(&external_id)?;
        inner.characters.row(id).cloned()
    }

    pub fn house(&self, external_id: ExternalId) -> Option<MemoryRow<CreateHouse>> {
        let inner = self.lock();
        let id = *inner.houses.by_external_id.get(&external_id)?;
        inner.houses.row(id).cloned()
    }

    pub fn book(&self, external_id: ExternalId) -> Option<MemoryRow<CreateBook>> {
        let inner = self.lock();
        let id = *inner.books.by_external_id.get(&external_id)?;
        inner.books.row(id).cloned()
    }

    /// Current target of a single-valued relationship.
    pub fn link(&self, link: SingleLink, owner: DbId) -> Option<DbId> {
        self.lock()
            .links(link.owner(), owner)
            .and_then(|links| links.get(&link).copied())
    }

    /// Targets of `owner`'s edges for `link`, ascending.
    pub fn targets(&self, link: ManyLink, owner: DbId) -> Vec<DbId> {
        let tag = edge_tag(link);
        self.lock()
            .edges
            .range((tag, owner, DbId::MIN)..=(tag, owner, DbId::MAX))
            .map(|&(_, _, target)| target)
            .collect()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn upsert_character(&self, input: &CreateCharacter) -> Result<DbId, StoreError> {
        Ok(self.lock().characters.upsert(input.external_id, input))
    }

    async fn upsert_house(&self, input: &CreateHouse) -> Result<DbId, StoreError> {
        Ok(self.lock().houses.upsert(input.external_id, input))
    }

    async fn upsert_book(&self, input: &CreateBook) -> Result<DbId, StoreError> {
        Ok(self.lock().books.upsert(input.external_id, input))
    }

    async fn resolve(
        &self,
        kind: EntityKind,
        external_id: ExternalId,
    ) -> Result<Option<DbId>, StoreError> {
        Ok(self.id_of(kind, external_id))
    }

    async fn assign(&self, link: SingleLink, owner: DbId, target: DbId) -> Result<(), StoreError> {
        if let Some(links) = self.lock().links_mut(link.owner(), owner) {
            links.insert(link, target);
        }
        Ok(())
    }

    async fn add_edge(
        &self,
        link: ManyLink,
        owner: DbId,
        target: DbId,
    ) -> Result<bool, StoreError> {
        Ok(self.lock().edges.insert((edge_tag(link), owner, target)))
    }
}
