//! Two-pass reconciliation of an upstream snapshot into a [`CatalogStore`].
//!
//! Pass 1 upserts every record of a kind keyed by its external id. Pass 2
//! re-resolves each record and writes its relationships: references are
//! resolved against what is already stored, and a miss is skipped rather than
//! failing the run. Single-valued relationships take the last resolved
//! reference; edges are only ever added.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use citadel_core::catalog::{EntityKind, ManyLink, SingleLink};
use citadel_core::identity::external_id;
use citadel_core::release::{marketplace_search_url, parse_released};
use citadel_core::types::{DbId, ExternalId};
use citadel_db::models::book::CreateBook;
use citadel_db::models::character::CreateCharacter;
use citadel_db::models::house::CreateHouse;
use citadel_source::{BookRecord, CatalogSource, CharacterRecord, HouseRecord, RefList};
use serde::{Deserialize, Serialize};

use crate::error::ImportError;
use crate::store::CatalogStore;

/// Which part of the catalog to import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportSelection {
    All,
    Books,
    Characters,
    Houses,
}

impl ImportSelection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Books => "books",
            Self::Characters => "characters",
            Self::Houses => "houses",
        }
    }
}

impl fmt::Display for ImportSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImportSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "books" => Ok(Self::Books),
            "characters" => Ok(Self::Characters),
            "houses" => Ok(Self::Houses),
            other => Err(format!(
                "unknown import kind {other:?} (expected all, books, characters or houses)"
            )),
        }
    }
}

/// Which character relationships a pass 2 writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterLinks {
    /// father, mother, spouse
    Family,
    /// allegiances, books, pov books
    Affiliations,
    All,
}

impl CharacterLinks {
    fn family(self) -> bool {
        matches!(self, Self::Family | Self::All)
    }

    fn affiliations(self) -> bool {
        matches!(self, Self::Affiliations | Self::All)
    }
}

/// Per-kind counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindReport {
    /// Records written in pass 1.
    pub upserted: usize,
    /// Resolved references written in pass 2.
    pub linked: usize,
    /// References whose target is not in the store.
    pub skipped: usize,
}

/// Summary of one import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub characters: KindReport,
    pub houses: KindReport,
    pub books: KindReport,
}

impl ImportReport {
    pub fn get(&self, kind: EntityKind) -> &KindReport {
        match kind {
            EntityKind::Character => &self.characters,
            EntityKind::House => &self.houses,
            EntityKind::Book => &self.books,
        }
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for kind in [EntityKind::Character, EntityKind::House, EntityKind::Book] {
            let r = self.get(kind);
            writeln!(
                f,
                "{:<11} upserted={} linked={} skipped={}",
                kind.resource(),
                r.upserted,
                r.linked,
                r.skipped
            )?;
        }
        Ok(())
    }
}

/// Drives one import run. Strictly sequential.
pub struct Reconciler<'a> {
    source: &'a dyn CatalogSource,
    store: &'a dyn CatalogStore,
}

impl<'a> Reconciler<'a> {
    pub fn new(source: &'a dyn CatalogSource, store: &'a dyn CatalogStore) -> Self {
        Self { source, store }
    }

    /// Import `selection`.
    ///
    /// `All` runs characters (family links), houses, characters again
    /// (allegiances and books), then books, so every cross-kind reference
    /// points at a row that already exists. A single kind runs both passes
    /// with all of its links; references to kinds not yet imported are skipped.
    pub async fn run(&self, selection: ImportSelection) -> Result<ImportReport, ImportError> {
        let mut report = ImportReport::default();
        tracing::info!(selection = %selection, "Catalog import started");

        match selection {
            ImportSelection::All => {
                let characters = self.source.fetch_characters().await?;
                self.upsert_characters(&characters, &mut report.characters)
                    .await?;
                self.link_characters(&characters, CharacterLinks::Family, &mut report.characters)
                    .await?;

                let houses = self.source.fetch_houses().await?;
                self.upsert_houses(&houses, &mut report.houses).await?;
                self.link_houses(&houses, &mut report.houses).await?;

                self.link_characters(
                    &characters,
                    CharacterLinks::Affiliations,
                    &mut report.characters,
                )
                .await?;

                let books = self.source.fetch_books().await?;
                self.upsert_books(&books, &mut report.books).await?;
                self.link_books(&books, &mut report.books).await?;
            }
            ImportSelection::Characters => {
                let characters = self.source.fetch_characters().await?;
                self.upsert_characters(&characters, &mut report.characters)
                    .await?;
                self.link_characters(&characters, CharacterLinks::All, &mut report.characters)
                    .await?;
            }
            ImportSelection::Houses => {
                let houses = self.source.fetch_houses().await?;
                self.upsert_houses(&houses, &mut report.houses).await?;
                self.link_houses(&houses, &mut report.houses).await?;
            }
            ImportSelection::Books => {
                let books = self.source.fetch_books().await?;
                self.upsert_books(&books, &mut report.books).await?;
                self.link_books(&books, &mut report.books).await?;
            }
        }

        tracing::info!(
            selection = %selection,
            characters = report.characters.upserted,
            houses = report.houses.upserted,
            books = report.books.upserted,
            skipped = report.characters.skipped + report.houses.skipped + report.books.skipped,
            "Catalog import finished",
        );
        Ok(report)
    }

    // -----------------------------------------------------------------------
    // Pass 1
    // -----------------------------------------------------------------------

    async fn upsert_characters(
        &self,
        records: &[CharacterRecord],
        report: &mut KindReport,
    ) -> Result<(), ImportError> {
        for record in records {
            let input = CreateCharacter {
                external_id: record.external_id()?,
                name: record.name.clone(),
                gender: record.gender.clone(),
                culture: record.culture.clone(),
                born: record.born.clone(),
                died: record.died.clone(),
                titles: record.titles.clone(),
                aliases: record.aliases.clone(),
                tv_series: record.tv_series.clone(),
                played_by: record.played_by.clone(),
            };
            self.store.upsert_character(&input).await?;
            report.upserted += 1;
        }
        tracing::info!(count = report.upserted, "Characters upserted");
        Ok(())
    }

    async fn upsert_houses(
        &self,
        records: &[HouseRecord],
        report: &mut KindReport,
    ) -> Result<(), ImportError> {
        for record in records {
            let input = CreateHouse {
                external_id: record.external_id()?,
                name: record.name.clone().unwrap_or_default(),
                region: record.region.clone(),
                coat_of_arms: record.coat_of_arms.clone(),
                words: record.words.clone(),
                founded: record.founded.clone(),
                died_out: record.died_out.clone(),
                titles: record.titles.clone(),
                seats: record.seats.clone(),
                ancestral_weapons: record.ancestral_weapons.clone(),
            };
            self.store.upsert_house(&input).await?;
            report.upserted += 1;
        }
        tracing::info!(count = report.upserted, "Houses upserted");
        Ok(())
    }

    async fn upsert_books(
        &self,
        records: &[BookRecord],
        report: &mut KindReport,
    ) -> Result<(), ImportError> {
        for record in records {
            let external_id = record.external_id()?;
            let released = parse_released(record.released.as_deref())?;

            let cover_base64 = match record.isbn.as_deref() {
                Some(isbn) => self
                    .source
                    .fetch_cover(isbn)
                    .await
                    .map(|bytes| STANDARD.encode(bytes)),
                None => None,
            };
            if cover_base64.is_none() {
                tracing::debug!(external_id, isbn = ?record.isbn, "Book has no cover");
            }

            let input = CreateBook {
                external_id,
                name: record.name.clone().unwrap_or_default(),
                isbn: record.isbn.clone(),
                authors: record.authors.clone(),
                number_of_pages: record.number_of_pages,
                publisher: record.publisher.clone(),
                country: record.country.clone(),
                media_type: record.media_type.clone(),
                released,
                cover_base64,
                marketplace_url: record.isbn.as_deref().map(marketplace_search_url),
            };
            self.store.upsert_book(&input).await?;
            report.upserted += 1;
        }
        tracing::info!(count = report.upserted, "Books upserted");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Pass 2
    // -----------------------------------------------------------------------

    async fn link_characters(
        &self,
        records: &[CharacterRecord],
        links: CharacterLinks,
        report: &mut KindReport,
    ) -> Result<(), ImportError> {
        for record in records {
            let Some(owner) = self.owner(EntityKind::Character, record.external_id()?).await?
            else {
                continue;
            };

            if links.family() {
                self.link_single(SingleLink::Father, owner, &record.father, report)
                    .await?;
                self.link_single(SingleLink::Mother, owner, &record.mother, report)
                    .await?;
                self.link_single(SingleLink::Spouse, owner, &record.spouse, report)
                    .await?;
            }
            if links.affiliations() {
                self.link_many(ManyLink::Allegiance, owner, &record.allegiances, report)
                    .await?;
                self.link_many_inverse(ManyLink::BookCharacter, owner, &record.books, report)
                    .await?;
                self.link_many_inverse(
                    ManyLink::BookPovCharacter,
                    owner,
                    &record.pov_books,
                    report,
                )
                .await?;
            }
        }
        Ok(())
    }

    async fn link_houses(
        &self,
        records: &[HouseRecord],
        report: &mut KindReport,
    ) -> Result<(), ImportError> {
        for record in records {
            let Some(owner) = self.owner(EntityKind::House, record.external_id()?).await? else {
                continue;
            };

            self.link_single(SingleLink::CurrentLord, owner, &record.current_lord, report)
                .await?;
            self.link_single(SingleLink::Heir, owner, &record.heir, report)
                .await?;
            self.link_single(SingleLink::Founder, owner, &record.founder, report)
                .await?;
            self.link_single(SingleLink::Overlord, owner, &record.overlord, report)
                .await?;
            self.link_many(ManyLink::CadetBranch, owner, &record.cadet_branches, report)
                .await?;
            self.link_many(ManyLink::SwornMember, owner, &record.sworn_members, report)
                .await?;
        }
        Ok(())
    }

    async fn link_books(
        &self,
        records: &[BookRecord],
        report: &mut KindReport,
    ) -> Result<(), ImportError> {
        for record in records {
            let Some(owner) = self.owner(EntityKind::Book, record.external_id()?).await? else {
                continue;
            };

            self.link_many(ManyLink::BookCharacter, owner, &record.characters, report)
                .await?;
            self.link_many(ManyLink::BookPovCharacter, owner, &record.pov_characters, report)
                .await?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// The row written in pass 1 for this record.
    async fn owner(
        &self,
        kind: EntityKind,
        external_id: ExternalId,
    ) -> Result<Option<DbId>, ImportError> {
        let owner = self.store.resolve(kind, external_id).await?;
        if owner.is_none() {
            tracing::warn!(kind = %kind, external_id, "Record vanished between passes");
        }
        Ok(owner)
    }

    /// Resolve one reference against `kind`. A miss is counted and skipped.
    async fn resolve(
        &self,
        kind: EntityKind,
        reference: &str,
        report: &mut KindReport,
    ) -> Result<Option<DbId>, ImportError> {
        let target = self.store.resolve(kind, external_id(reference)?).await?;
        if target.is_none() {
            tracing::debug!(kind = %kind, reference, "Reference not in store, skipped");
            report.skipped += 1;
        }
        Ok(target)
    }

    async fn link_single(
        &self,
        link: SingleLink,
        owner: DbId,
        refs: &RefList,
        report: &mut KindReport,
    ) -> Result<(), ImportError> {
        if refs.len() > 1 {
            tracing::warn!(
                link = link.as_str(),
                owner,
                count = refs.len(),
                "Several values for a single-valued relationship; keeping the last resolved",
            );
        }

        let mut resolved = None;
        for reference in refs.iter() {
            if let Some(target) = self.resolve(link.target(), reference, report).await? {
                resolved = Some(target);
            }
        }

        if let Some(target) = resolved {
            self.store.assign(link, owner, target).await?;
            report.linked += 1;
        }
        Ok(())
    }

    async fn link_many(
        &self,
        link: ManyLink,
        owner: DbId,
        refs: &RefList,
        report: &mut KindReport,
    ) -> Result<(), ImportError> {
        for reference in refs.iter() {
            if let Some(target) = self.resolve(link.target(), reference, report).await? {
                self.store.add_edge(link, owner, target).await?;
                report.linked += 1;
            }
        }
        Ok(())
    }

    /// Edges recorded from the target side, e.g. a character's `books`.
    async fn link_many_inverse(
        &self,
        link: ManyLink,
        target: DbId,
        refs: &RefList,
        report: &mut KindReport,
    ) -> Result<(), ImportError> {
        for reference in refs.iter() {
            if let Some(owner) = self.resolve(link.owner(), reference, report).await? {
                self.store.add_edge(link, owner, target).await?;
                report.linked += 1;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use citadel_core::error::CoreError;
    use citadel_source::SourceError;

    use super::*;
    use crate::memory::MemoryCatalogStore;

    const API: &str = "https://anapioficeandfire.com/api";

    #[derive(Default)]
    struct FakeSource {
        books: Vec<BookRecord>,
        characters: Vec<CharacterRecord>,
        houses: Vec<HouseRecord>,
        covers: HashMap<String, Vec<u8>>,
        books_unavailable: bool,
        cover_requests: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CatalogSource for FakeSource {
        async fn fetch_books(&self) -> Result<Vec<BookRecord>, SourceError> {
            if self.books_unavailable {
                return Err(SourceError::Status {
                    status: 503,
                    url: format!("{API}/books"),
                });
            }
            Ok(self.books.clone())
        }

        async fn fetch_characters(&self) -> Result<Vec<CharacterRecord>, SourceError> {
            Ok(self.characters.clone())
        }

        async fn fetch_houses(&self) -> Result<Vec<HouseRecord>, SourceError> {
            Ok(self.houses.clone())
        }

        async fn fetch_cover(&self, isbn: &str) -> Option<Vec<u8>> {
            self.cover_requests.lock().unwrap().push(isbn.to_string());
            self.covers.get(isbn).cloned()
        }
    }

    fn url(resource: &str, id: i32) -> String {
        format!("{API}/{resource}/{id}")
    }

    fn refs(resource: &str, ids: &[i32]) -> RefList {
        RefList::new(ids.iter().map(|id| url(resource, *id)))
    }

    fn character(id: i32, name: &str) -> CharacterRecord {
        CharacterRecord {
            url: url("characters", id),
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    fn house(id: i32, name: &str) -> HouseRecord {
        HouseRecord {
            url: url("houses", id),
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    fn book(id: i32, name: &str, isbn: Option<&str>) -> BookRecord {
        BookRecord {
            url: url("books", id),
            name: Some(name.to_string()),
            isbn: isbn.map(str::to_string),
            released: Some("1996-08-01T00:00:00".to_string()),
            ..Default::default()
        }
    }

    /// One book, one character, one house, all cross-referenced.
    fn small_snapshot() -> FakeSource {
        let mut jon = character(583, "Jon Snow");
        jon.allegiances = refs("houses", &[362]);
        jon.books = refs("books", &[1]);
        jon.pov_books = refs("books", &[1]);

        let mut stark = house(362, "House Stark of Winterfell");
        stark.sworn_members = refs("characters", &[583]);

        let mut got = book(1, "A Game of Thrones", Some("978-0553103540"));
        got.characters = refs("characters", &[583]);
        got.pov_characters = refs("characters", &[583]);

        FakeSource {
            books: vec![got],
            characters: vec![jon],
            houses: vec![stark],
            covers: HashMap::from([("978-0553103540".to_string(), vec![1, 2, 3])]),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_full_import_links_every_kind() {
        let source = small_snapshot();
        let store = MemoryCatalogStore::new();

        let report = Reconciler::new(&source, &store)
            .run(ImportSelection::All)
            .await
            .unwrap();

        let book = store.id_of(EntityKind::Book, 1).unwrap();
        let jon = store.id_of(EntityKind::Character, 583).unwrap();
        let stark = store.id_of(EntityKind::House, 362).unwrap();

        assert_eq!(store.targets(ManyLink::BookPovCharacter, book), vec![jon]);
        assert_eq!(store.targets(ManyLink::BookCharacter, book), vec![jon]);
        assert_eq!(store.targets(ManyLink::Allegiance, jon), vec![stark]);
        assert_eq!(store.targets(ManyLink::SwornMember, stark), vec![jon]);

        assert_eq!(report.characters.upserted, 1);
        assert_eq!(report.houses.upserted, 1);
        assert_eq!(report.books.upserted, 1);
        // The character's book references run before books exist; the book
        // side writes the same edges.
        assert_eq!(report.characters.skipped, 2);
        assert_eq!(report.books.skipped, 0);
    }

    #[tokio::test]
    async fn test_book_pass_one_extras() {
        let source = small_snapshot();
        let store = MemoryCatalogStore::new();
        Reconciler::new(&source, &store)
            .run(ImportSelection::Books)
            .await
            .unwrap();

        let row = store.book(1).unwrap();
        assert_eq!(row.data.cover_base64.as_deref(), Some("AQID"));
        assert_eq!(
            row.data.marketplace_url.as_deref(),
            Some("https://www.amazon.com/s?k=9780553103540&i=stripbooks")
        );
        assert_eq!(
            row.data.released.map(|r| r.to_rfc3339()),
            Some("1996-08-01T00:00:00+00:00".to_string())
        );
    }

    #[tokio::test]
    async fn test_absent_isbn_means_no_cover_request() {
        let source = FakeSource {
            books: vec![book(5, "The Hedge Knight", None)],
            ..Default::default()
        };
        let store = MemoryCatalogStore::new();
        Reconciler::new(&source, &store)
            .run(ImportSelection::Books)
            .await
            .unwrap();

        let row = store.book(5).unwrap();
        assert_eq!(row.data.cover_base64, None);
        assert_eq!(row.data.marketplace_url, None);
        assert!(source.cover_requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_cover_is_absent() {
        let source = FakeSource {
            books: vec![book(2, "A Clash of Kings", Some("978-0553108033"))],
            ..Default::default()
        };
        let store = MemoryCatalogStore::new();
        Reconciler::new(&source, &store)
            .run(ImportSelection::Books)
            .await
            .unwrap();

        assert_eq!(store.book(2).unwrap().data.cover_base64, None);
        assert_eq!(*source.cover_requests.lock().unwrap(), ["978-0553108033"]);
    }

    #[tokio::test]
    async fn test_rerun_on_same_snapshot_is_stable() {
        let source = small_snapshot();
        let store = MemoryCatalogStore::new();
        let reconciler = Reconciler::new(&source, &store);

        reconciler.run(ImportSelection::All).await.unwrap();
        let edges = store.edge_count();
        let jon = store.character(583).unwrap();
        let second = reconciler.run(ImportSelection::All).await.unwrap();

        assert_eq!(store.edge_count(), edges);
        assert_eq!(store.character(583).unwrap().id, jon.id);
        assert_eq!(second.characters.skipped, 0);
        assert_eq!(store.count(EntityKind::Character), 1);
        assert_eq!(store.count(EntityKind::House), 1);
        assert_eq!(store.count(EntityKind::Book), 1);
    }

    #[tokio::test]
    async fn test_unknown_allegiance_is_skipped() {
        let mut arya = character(148, "Arya Stark");
        arya.allegiances = refs("houses", &[362, 9999]);
        let source = FakeSource {
            characters: vec![arya],
            houses: vec![house(362, "House Stark of Winterfell")],
            ..Default::default()
        };
        let store = MemoryCatalogStore::new();

        let report = Reconciler::new(&source, &store)
            .run(ImportSelection::All)
            .await
            .unwrap();

        let arya = store.id_of(EntityKind::Character, 148).unwrap();
        let stark = store.id_of(EntityKind::House, 362).unwrap();
        assert_eq!(store.targets(ManyLink::Allegiance, arya), vec![stark]);
        assert_eq!(report.characters.skipped, 1);
        assert_eq!(report.characters.linked, 1);
    }

    #[tokio::test]
    async fn test_character_only_run_skips_unimported_houses() {
        let source = small_snapshot();
        let store = MemoryCatalogStore::new();

        let report = Reconciler::new(&source, &store)
            .run(ImportSelection::Characters)
            .await
            .unwrap();

        let jon = store.id_of(EntityKind::Character, 583).unwrap();
        assert!(store.targets(ManyLink::Allegiance, jon).is_empty());
        // allegiance, book, pov book
        assert_eq!(report.characters.skipped, 3);
    }

    #[tokio::test]
    async fn test_single_valued_link_takes_last_resolved() {
        let mut lord = house(7, "House Arryn of the Eyrie");
        lord.current_lord = refs("characters", &[10, 11, 12]);
        let source = FakeSource {
            characters: vec![character(10, "Jon Arryn"), character(11, "Robert Arryn")],
            houses: vec![lord],
            ..Default::default()
        };
        let store = MemoryCatalogStore::new();

        let report = Reconciler::new(&source, &store)
            .run(ImportSelection::All)
            .await
            .unwrap();

        let arryn = store.id_of(EntityKind::House, 7).unwrap();
        let robert = store.id_of(EntityKind::Character, 11).unwrap();
        assert_eq!(store.link(SingleLink::CurrentLord, arryn), Some(robert));
        assert_eq!(report.houses.skipped, 1);
    }

    #[tokio::test]
    async fn test_unresolved_single_link_keeps_stored_value() {
        let mut robb = character(2, "Robb Stark");
        robb.father = refs("characters", &[339]);
        let mut source = FakeSource {
            characters: vec![character(339, "Eddard Stark"), robb.clone()],
            ..Default::default()
        };
        let store = MemoryCatalogStore::new();
        Reconciler::new(&source, &store)
            .run(ImportSelection::Characters)
            .await
            .unwrap();

        robb.father = refs("characters", &[4040]);
        source.characters = vec![robb];
        Reconciler::new(&source, &store)
            .run(ImportSelection::Characters)
            .await
            .unwrap();

        let robb = store.id_of(EntityKind::Character, 2).unwrap();
        let ned = store.id_of(EntityKind::Character, 339).unwrap();
        assert_eq!(store.link(SingleLink::Father, robb), Some(ned));
    }

    #[tokio::test]
    async fn test_cadet_branches_are_directional() {
        let mut stark = house(362, "House Stark of Winterfell");
        stark.cadet_branches = refs("houses", &[170]);
        let source = FakeSource {
            houses: vec![stark, house(170, "House Karstark of Karhold")],
            ..Default::default()
        };
        let store = MemoryCatalogStore::new();
        Reconciler::new(&source, &store)
            .run(ImportSelection::Houses)
            .await
            .unwrap();

        let stark = store.id_of(EntityKind::House, 362).unwrap();
        let karstark = store.id_of(EntityKind::House, 170).unwrap();
        assert_eq!(store.targets(ManyLink::CadetBranch, stark), vec![karstark]);
        assert!(store.targets(ManyLink::CadetBranch, karstark).is_empty());
    }

    #[tokio::test]
    async fn test_malformed_reference_is_fatal() {
        let mut jon = character(583, "Jon Snow");
        jon.father = RefList::new([format!("{API}/characters/unknown")]);
        let source = FakeSource {
            characters: vec![jon],
            ..Default::default()
        };
        let store = MemoryCatalogStore::new();

        let err = Reconciler::new(&source, &store)
            .run(ImportSelection::Characters)
            .await
            .unwrap_err();
        assert_matches!(err, ImportError::Core(CoreError::MalformedReference(_)));
    }

    #[tokio::test]
    async fn test_malformed_release_date_is_fatal() {
        let mut odd = book(9, "The Princess and the Queen", None);
        odd.released = Some("the year of the false spring".to_string());
        let source = FakeSource {
            books: vec![odd],
            ..Default::default()
        };
        let store = MemoryCatalogStore::new();

        let err = Reconciler::new(&source, &store)
            .run(ImportSelection::Books)
            .await
            .unwrap_err();
        assert_matches!(
            err,
            ImportError::Core(CoreError::MalformedRecord { field: "released", .. })
        );
    }

    #[tokio::test]
    async fn test_source_failure_aborts_without_undo() {
        let mut source = small_snapshot();
        source.books_unavailable = true;
        let store = MemoryCatalogStore::new();

        let err = Reconciler::new(&source, &store)
            .run(ImportSelection::All)
            .await
            .unwrap_err();

        assert_matches!(err, ImportError::Source(SourceError::Status { status: 503, .. }));
        assert_eq!(store.count(EntityKind::Character), 1);
        assert_eq!(store.count(EntityKind::House), 1);
        assert_eq!(store.count(EntityKind::Book), 0);
    }

    #[test]
    fn test_selection_parses_case_insensitively() {
        assert_eq!("ALL".parse::<ImportSelection>().unwrap(), ImportSelection::All);
        assert_eq!(
            " houses ".parse::<ImportSelection>().unwrap(),
            ImportSelection::Houses
        );
        assert!("dragons".parse::<ImportSelection>().is_err());
    }
}
