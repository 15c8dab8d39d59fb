//! Group memberships returned by `GET /groups/me/groups`.
//!
//! Payloads look like:
//!
//! ```json
//! {
//!   "id": "fc:fs:fs:emne:ntnu.no:TMA4100:1",
//!   "displayName": "Matematikk 1",
//!   "type": "fc:fs:emne",
//!   "parent": "fc:org:ntnu.no",
//!   "membership": { "basic": "member", "active": true, "fsroles": ["STUDENT"] }
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Type tag of a Dataporten group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GroupType {
    /// `fc:org`
    Organisation,
    /// `fc:orgunit`
    OrganisationUnit,
    /// `fc:fs:emne`
    Course,
    /// `fc:fs:prg`
    StudyProgramme,
    /// `fc:fs:str`
    StudyDirection,
    /// `fc:fs:kull`
    Cohort,
    /// `fc:adhoc`
    AdHoc,
    /// `fc:gogroup`
    GoGroup,
    Other(String),
}

impl GroupType {
    pub fn as_str(&self) -> &str {
        match self {
            GroupType::Organisation => "fc:org",
            GroupType::OrganisationUnit => "fc:orgunit",
            GroupType::Course => "fc:fs:emne",
            GroupType::StudyProgramme => "fc:fs:prg",
            GroupType::StudyDirection => "fc:fs:str",
            GroupType::Cohort => "fc:fs:kull",
            GroupType::AdHoc => "fc:adhoc",
            GroupType::GoGroup => "fc:gogroup",
            GroupType::Other(tag) => tag,
        }
    }
}

impl From<String> for GroupType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "fc:org" => GroupType::Organisation,
            "fc:orgunit" => GroupType::OrganisationUnit,
            "fc:fs:emne" => GroupType::Course,
            "fc:fs:prg" => GroupType::StudyProgramme,
            "fc:fs:str" => GroupType::StudyDirection,
            "fc:fs:kull" => GroupType::Cohort,
            "fc:adhoc" => GroupType::AdHoc,
            "fc:gogroup" => GroupType::GoGroup,
            _ => GroupType::Other(tag),
        }
    }
}

impl From<GroupType> for String {
    fn from(group_type: GroupType) -> Self {
        match group_type {
            GroupType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for GroupType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dataporten sends `affiliation` either as a single string or as a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Affiliation {
    One(String),
    Many(Vec<String>),
}

impl Affiliation {
    pub fn contains(&self, value: &str) -> bool {
        match self {
            Affiliation::One(a) => a == value,
            Affiliation::Many(all) => all.iter().any(|a| a == value),
        }
    }
}

/// The current user's relation to a group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    #[serde(default)]
    pub basic: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub affiliation: Option<Affiliation>,
    #[serde(default)]
    pub primary_affiliation: Option<String>,
    #[serde(default)]
    pub title: Option<Vec<String>>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub fsroles: Option<Vec<String>>,
    #[serde(default)]
    pub not_after: Option<DateTime<Utc>>,
}

/// One group membership of the token holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub group_type: GroupType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membership: Option<Membership>,
}

impl Group {
    pub fn is_course(&self) -> bool {
        self.group_type == GroupType::Course
    }

    pub fn is_organisation(&self) -> bool {
        matches!(
            self.group_type,
            GroupType::Organisation | GroupType::OrganisationUnit
        )
    }

    /// Memberships without an explicit `active` flag count as active.
    pub fn is_active(&self) -> bool {
        self.membership
            .as_ref()
            .and_then(|m| m.active)
            .unwrap_or(true)
    }
}

/// Course code of an `fc:fs:emne` group.
///
/// Course ids have the shape `fc:fs:fs:emne:<org>:<code>:<version>`.
pub fn course_code(group: &Group) -> Option<&str> {
    if !group.is_course() {
        return None;
    }
    let mut parts = group.id.split(':');
    let prefix: Vec<&str> = parts.by_ref().take(4).collect();
    if prefix != ["fc", "fs", "fs", "emne"] {
        return None;
    }
    let _org = parts.next()?;
    parts.next().filter(|code| !code.is_empty())
}
