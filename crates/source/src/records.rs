//! Upstream record shapes.
//!
//! Every field defaults when missing. Blank strings become `None`, blank
//! entries are dropped from lists, and reference fields accept `""`, a single
//! URL, or a list of URLs.

use citadel_core::error::CoreError;
use citadel_core::identity::external_id;
use citadel_core::types::ExternalId;
use serde::{Deserialize, Deserializer};

/// Zero or more entity URLs from a relationship field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefList(Vec<String>);

impl RefList {
    pub fn new<I, S>(refs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            refs.into_iter()
                .map(Into::<String>::into)
                .filter(|r| !r.trim().is_empty())
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for RefList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            One(String),
            Many(Vec<String>),
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            None => Self::default(),
            Some(Raw::One(url)) => Self::new([url]),
            Some(Raw::Many(urls)) => Self::new(urls),
        })
    }
}

fn blank_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.trim().is_empty()))
}

fn non_blank_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?
        .unwrap_or_default()
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .collect())
}

/// A `/books` entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookRecord {
    pub url: String,
    #[serde(deserialize_with = "blank_as_none")]
    pub name: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub isbn: Option<String>,
    #[serde(deserialize_with = "non_blank_list")]
    pub authors: Vec<String>,
    pub number_of_pages: Option<i32>,
    #[serde(deserialize_with = "blank_as_none")]
    pub publisher: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub country: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub media_type: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub released: Option<String>,
    pub characters: RefList,
    pub pov_characters: RefList,
}

/// A `/characters` entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CharacterRecord {
    pub url: String,
    #[serde(deserialize_with = "blank_as_none")]
    pub name: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub gender: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub culture: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub born: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub died: Option<String>,
    #[serde(deserialize_with = "non_blank_list")]
    pub titles: Vec<String>,
    #[serde(deserialize_with = "non_blank_list")]
    pub aliases: Vec<String>,
    #[serde(deserialize_with = "non_blank_list")]
    pub tv_series: Vec<String>,
    #[serde(deserialize_with = "non_blank_list")]
    pub played_by: Vec<String>,
    pub father: RefList,
    pub mother: RefList,
    pub spouse: RefList,
    pub allegiances: RefList,
    pub books: RefList,
    pub pov_books: RefList,
}

/// A `/houses` entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HouseRecord {
    pub url: String,
    #[serde(deserialize_with = "blank_as_none")]
    pub name: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub region: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub coat_of_arms: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub words: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub founded: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub died_out: Option<String>,
    #[serde(deserialize_with = "non_blank_list")]
    pub titles: Vec<String>,
    #[serde(deserialize_with = "non_blank_list")]
    pub seats: Vec<String>,
    #[serde(deserialize_with = "non_blank_list")]
    pub ancestral_weapons: Vec<String>,
    pub current_lord: RefList,
    pub heir: RefList,
    pub founder: RefList,
    pub overlord: RefList,
    pub cadet_branches: RefList,
    pub sworn_members: RefList,
}

macro_rules! impl_external_id {
    ($($record:ty),*) => {
        $(impl $record {
            /// Upstream id taken from the record's own URL.
            pub fn external_id(&self) -> Result<ExternalId, CoreError> {
                external_id(&self.url)
            }
        })*
    };
}

impl_external_id!(BookRecord, CharacterRecord, HouseRecord);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_record_from_upstream_json() {
        let json = r#"{
            "url": "https://anapioficeandfire.com/api/books/1",
            "name": "A Game of Thrones",
            "isbn": "978-0553103540",
            "authors": ["George R. R. Martin"],
            "numberOfPages": 694,
            "publisher": "Bantam Books",
            "country": "United States",
            "mediaType": "Hardcover",
            "released": "1996-08-01T00:00:00",
            "characters": ["https://anapioficeandfire.com/api/characters/2"],
            "povCharacters": ["https://anapioficeandfire.com/api/characters/148"]
        }"#;
        let book: BookRecord = serde_json::from_str(json).unwrap();

        assert_eq!(book.external_id().unwrap(), 1);
        assert_eq!(book.number_of_pages, Some(694));
        assert_eq!(book.media_type.as_deref(), Some("Hardcover"));
        assert_eq!(book.characters.len(), 1);
        assert_eq!(
            book.pov_characters.iter().collect::<Vec<_>>(),
            ["https://anapioficeandfire.com/api/characters/148"]
        );
    }

    #[test]
    fn test_blank_values_are_absent() {
        let json = r#"{
            "url": "https://anapioficeandfire.com/api/characters/583",
            "name": "Jon Snow",
            "culture": "",
            "titles": ["Lord Commander of the Night's Watch", ""],
            "aliases": [""],
            "father": "",
            "spouse": "",
            "allegiances": ["https://anapioficeandfire.com/api/houses/362"]
        }"#;
        let jon: CharacterRecord = serde_json::from_str(json).unwrap();

        assert_eq!(jon.culture, None);
        assert_eq!(jon.titles.len(), 1);
        assert!(jon.aliases.is_empty());
        assert!(jon.father.is_empty());
        assert!(jon.spouse.is_empty());
        assert!(jon.mother.is_empty());
        assert_eq!(jon.allegiances.len(), 1);
    }

    #[test]
    fn test_single_url_reference_is_a_one_element_list() {
        let json = r#"{
            "url": "https://anapioficeandfire.com/api/houses/362",
            "name": "House Stark of Winterfell",
            "currentLord": "https://anapioficeandfire.com/api/characters/1880",
            "overlord": null,
            "cadetBranches": ["https://anapioficeandfire.com/api/houses/170"]
        }"#;
        let house: HouseRecord = serde_json::from_str(json).unwrap();

        assert_eq!(house.current_lord.len(), 1);
        assert!(house.overlord.is_empty());
        assert_eq!(house.cadet_branches.len(), 1);
        assert!(house.sworn_members.is_empty());
    }

    #[test]
    fn test_record_without_url_has_no_identity() {
        let house: HouseRecord = serde_json::from_str(r#"{"name": "House Nobody"}"#).unwrap();
        assert!(house.external_id().is_err());
    }
}
