use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lifecycle of a scraped site record.
///
/// The crawler only ever produces `Pending`; `Live` is set once downstream
/// processing (assistant creation) has consumed the record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SiteStatus {
    #[default]
    Pending,
    Live,
}

/// Text captured from a single fetched page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCapture {
    /// URL the page was fetched from
    pub url: String,

    /// Heading, paragraph and block texts in document order
    pub texts: Vec<String>,
}

impl PageCapture {
    pub fn new(url: impl Into<String>, texts: Vec<String>) -> Self {
        Self {
            url: url.into(),
            texts,
        }
    }
}

/// Best-effort guess at one person listed on an About-like page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub name: String,
    pub role: String,
    pub email: String,
    pub phone: String,
    pub address: String,

    /// Profile URLs keyed by platform tag (`facebook`, `instagram`, `linkedin`, `other`)
    pub social_links: BTreeMap<String, Vec<String>>,
}

impl TeamMember {
    /// A member is worth keeping once any identifying field resolved
    pub fn is_identified(&self) -> bool {
        !(self.name.is_empty()
            && self.role.is_empty()
            && self.email.is_empty()
            && self.phone.is_empty())
    }
}

/// Aggregate record for one crawl run.
///
/// Unresolved values are empty strings or empty sequences, never absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedSite {
    /// Store-assigned identifier, empty until persisted
    #[serde(default)]
    pub id: String,
    pub url: String,
    pub name: String,
    pub slogan: String,
    pub about: String,
    pub email: String,
    pub phone: String,
    pub social_links: Vec<String>,
    pub headlines: Vec<String>,
    pub links: Vec<String>,
    pub team: Vec<TeamMember>,
    pub pages: Vec<PageCapture>,
    pub user_id: String,
    pub category: String,
    #[serde(default)]
    pub status: SiteStatus,
    pub scraped_at: DateTime<Utc>,
}

impl ScrapedSite {
    /// Start a record carrying only its attribution
    pub fn new(url: impl Into<String>, user_id: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            url: url.into(),
            name: String::new(),
            slogan: String::new(),
            about: String::new(),
            email: String::new(),
            phone: String::new(),
            social_links: Vec::new(),
            headlines: Vec::new(),
            links: Vec::new(),
            team: Vec::new(),
            pages: Vec::new(),
            user_id: user_id.into(),
            category: category.into(),
            status: SiteStatus::Pending,
            scraped_at: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_name(mut self, name: String) -> Self {
        self.name = name;
        self
    }

    pub fn with_slogan(mut self, slogan: String) -> Self {
        self.slogan = slogan;
        self
    }

    pub fn with_about(mut self, about: String) -> Self {
        self.about = about;
        self
    }

    pub fn with_email(mut self, email: String) -> Self {
        self.email = email;
        self
    }

    pub fn with_phone(mut self, phone: String) -> Self {
        self.phone = phone;
        self
    }

    pub fn with_social_links(mut self, social_links: Vec<String>) -> Self {
        self.social_links = social_links;
        self
    }

    pub fn with_headlines(mut self, headlines: Vec<String>) -> Self {
        self.headlines = headlines;
        self
    }

    pub fn with_links(mut self, links: Vec<String>) -> Self {
        self.links = links;
        self
    }

    pub fn with_team(mut self, team: Vec<TeamMember>) -> Self {
        self.team = team;
        self
    }

    pub fn with_pages(mut self, pages: Vec<PageCapture>) -> Self {
        self.pages = pages;
        self
    }

    pub fn with_status(mut self, status: SiteStatus) -> Self {
        self.status = status;
        self
    }
}
