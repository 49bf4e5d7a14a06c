//! Entity kinds and the relationship taxonomy between them.
//!
//! Relationships are named from the owning side: a [`SingleLink`] is a
//! nullable foreign-key column on the owner's row, a [`ManyLink`] is an edge
//! in an association table keyed `(owner, target)`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The three catalog entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Book,
    Character,
    House,
}

impl EntityKind {
    /// Singular snake-case name, as used in logs and API payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Book => "book",
            Self::Character => "character",
            Self::House => "house",
        }
    }

    /// Upstream collection name (`/api/<resource>`).
    pub fn resource(&self) -> &'static str {
        match self {
            Self::Book => "books",
            Self::Character => "characters",
            Self::House => "houses",
        }
    }

    /// Human-readable entity label for error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Book => "Book",
            Self::Character => "Character",
            Self::House => "House",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single-valued relationships (nullable FK, `ON DELETE SET NULL`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SingleLink {
    Father,
    Mother,
    Spouse,
    CurrentLord,
    Heir,
    Founder,
    Overlord,
}

impl SingleLink {
    pub fn owner(&self) -> EntityKind {
        match self {
            Self::Father | Self::Mother | Self::Spouse => EntityKind::Character,
            Self::CurrentLord | Self::Heir | Self::Founder | Self::Overlord => EntityKind::House,
        }
    }

    pub fn target(&self) -> EntityKind {
        match self {
            Self::Overlord => EntityKind::House,
            _ => EntityKind::Character,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Father => "father",
            Self::Mother => "mother",
            Self::Spouse => "spouse",
            Self::CurrentLord => "current_lord",
            Self::Heir => "heir",
            Self::Founder => "founder",
            Self::Overlord => "overlord",
        }
    }
}

/// Multi-valued relationships (association tables with set semantics).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManyLink {
    /// Character -> House.
    Allegiance,
    /// Book -> Character (appeared in).
    BookCharacter,
    /// Book -> Character (narrator of).
    BookPovCharacter,
    /// House -> House, asymmetric.
    CadetBranch,
    /// House -> Character.
    SwornMember,
}

impl ManyLink {
    pub fn owner(&self) -> EntityKind {
        match self {
            Self::Allegiance => EntityKind::Character,
            Self::BookCharacter | Self::BookPovCharacter => EntityKind::Book,
            Self::CadetBranch | Self::SwornMember => EntityKind::House,
        }
    }

    pub fn target(&self) -> EntityKind {
        match self {
            Self::Allegiance | Self::CadetBranch => EntityKind::House,
            Self::BookCharacter | Self::BookPovCharacter | Self::SwornMember => {
                EntityKind::Character
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allegiance => "allegiances",
            Self::BookCharacter => "characters",
            Self::BookPovCharacter => "pov_characters",
            Self::CadetBranch => "cadet_branches",
            Self::SwornMember => "sworn_members",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_names_match_upstream_collections() {
        let resources = [EntityKind::Book, EntityKind::Character, EntityKind::House]
            .map(|k| k.resource());
        assert_eq!(resources, ["books", "characters", "houses"]);
        assert_eq!(EntityKind::Character.label(), "Character");
    }

    #[test]
    fn test_self_references_stay_within_kind() {
        for link in [SingleLink::Father, SingleLink::Mother, SingleLink::Spouse] {
            assert_eq!(link.owner(), EntityKind::Character);
            assert_eq!(link.target(), EntityKind::Character);
        }
        assert_eq!(SingleLink::Overlord.target(), EntityKind::House);
        assert_eq!(ManyLink::CadetBranch.owner(), ManyLink::CadetBranch.target());
    }

    #[test]
    fn test_house_character_links_target_characters() {
        for link in [SingleLink::CurrentLord, SingleLink::Heir, SingleLink::Founder] {
            assert_eq!(link.owner(), EntityKind::House);
            assert_eq!(link.target(), EntityKind::Character);
        }
        assert_eq!(ManyLink::SwornMember.target(), EntityKind::Character);
        assert_eq!(ManyLink::Allegiance.target(), EntityKind::House);
    }
}
