//! Closed enums for publishing organizations and post categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Organization that publishes a technology blog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Organization {
    Naver,
    Kakao,
    Devocean,
    Toss,
    MyRealTrip,
    Line,
    Daangn,
    OliveYoung,
    Other,
}

impl Organization {
    pub const ALL: [Organization; 9] = [
        Organization::Naver,
        Organization::Kakao,
        Organization::Devocean,
        Organization::Toss,
        Organization::MyRealTrip,
        Organization::Line,
        Organization::Daangn,
        Organization::OliveYoung,
        Organization::Other,
    ];

    /// Stable tag used in configuration and the database.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Organization::Naver => "NAVER",
            Organization::Kakao => "KAKAO",
            Organization::Devocean => "DEVOCEAN",
            Organization::Toss => "TOSS",
            Organization::MyRealTrip => "MY_REAL_TRIP",
            Organization::Line => "LINE",
            Organization::Daangn => "DAANGN",
            Organization::OliveYoung => "OLIVE_YOUNG",
            Organization::Other => "OTHER",
        }
    }

    /// Lower-case path segment, used as the image upload path hint.
    #[must_use]
    pub fn slug(self) -> String {
        self.as_str().to_ascii_lowercase().replace('_', "-")
    }

    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Organization::Naver => "Naver",
            Organization::Kakao => "Kakao",
            Organization::Devocean => "DEVOCEAN",
            Organization::Toss => "Toss",
            Organization::MyRealTrip => "MyRealTrip",
            Organization::Line => "LINE",
            Organization::Daangn => "Daangn",
            Organization::OliveYoung => "Olive Young",
            Organization::Other => "Other",
        }
    }
}

impl fmt::Display for Organization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Organization {
    type Err = String;

    /// Accepts the stored tag in any case, with `-`, `_`, or no separator.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = squash(s);
        Organization::ALL
            .into_iter()
            .find(|org| squash(org.as_str()) == wanted)
            .ok_or_else(|| format!("unknown organization: {s}"))
    }
}

fn squash(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Technical topic assigned to a post during enrichment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Field {
    Ai,
    Backend,
    Frontend,
    #[serde(rename = "DEVOPS")]
    DevOps,
    Mobile,
    Db,
    CollabTool,
    Other,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Ai,
        Field::Backend,
        Field::Frontend,
        Field::DevOps,
        Field::Mobile,
        Field::Db,
        Field::CollabTool,
        Field::Other,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Ai => "AI",
            Field::Backend => "BACKEND",
            Field::Frontend => "FRONTEND",
            Field::DevOps => "DEVOPS",
            Field::Mobile => "MOBILE",
            Field::Db => "DB",
            Field::CollabTool => "COLLAB_TOOL",
            Field::Other => "OTHER",
        }
    }

    /// Label shown to (and expected back from) the summarization model.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Field::Ai => "AI",
            Field::Backend => "Backend",
            Field::Frontend => "Frontend",
            Field::DevOps => "DevOps",
            Field::Mobile => "Mobile",
            Field::Db => "DB",
            Field::CollabTool => "Collab Tool",
            Field::Other => "Other",
        }
    }

    /// Map a free-form category label onto the closed set.
    ///
    /// Unrecognized labels map to [`Field::Other`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let wanted = squash(label);
        if wanted == "기타" || wanted == "etc" {
            return Field::Other;
        }
        Field::ALL
            .into_iter()
            .find(|field| squash(field.as_str()) == wanted || squash(field.label()) == wanted)
            .unwrap_or(Field::Other)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
