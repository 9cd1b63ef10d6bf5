//! Client for the `unitedstates/congress-legislators` dataset
//!
//! Downloads the current roster plus the social media accounts file and
//! translates both into [`Legislator`] records. Only each person's most
//! recent term decides their seat.

use std::collections::{BTreeMap, HashMap};

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::fields::LegislatorField;
use super::legislator::{Legislator, Role};
use super::Jurisdiction;

/// Base URL of the published dataset
pub const DATASET_BASE_URL: &str = "https://unitedstates.github.io/congress-legislators";

const ROSTER_FILE: &str = "legislators-current.json";
const SOCIAL_FILE: &str = "legislators-social-media.json";

/// Errors that can occur while fetching the legislator dataset
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed
    #[error("Request to {url} failed: {source}")]
    RequestFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-success HTTP status
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Body was not the expected JSON shape
    #[error("Failed to parse {url}: {source}")]
    ParseError {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be translated
    #[error("Malformed record for '{bioguide_id}': {reason}")]
    Malformed { bioguide_id: String, reason: String },

    /// The source returned no legislators at all
    #[error("Dataset for jurisdiction '{0}' is empty")]
    Empty(Jurisdiction),
}

/// Bulk source of legislator records
#[allow(async_fn_in_trait)]
pub trait DatasetSource {
    /// The full current roster for a jurisdiction, unfiltered
    async fn fetch_roster(&self, jurisdiction: Jurisdiction) -> Result<Vec<Legislator>, FetchError>;
}

#[derive(Debug, Deserialize)]
struct RawLegislator {
    id: RawIds,
    name: RawName,
    #[serde(default)]
    bio: RawBio,
    #[serde(default)]
    terms: Vec<RawTerm>,
}

#[derive(Debug, Deserialize)]
struct RawIds {
    bioguide: String,
    govtrack: Option<Value>,
    opensecrets: Option<Value>,
    votesmart: Option<Value>,
    wikipedia: Option<Value>,
    ballotpedia: Option<Value>,
    #[serde(default)]
    fec: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawName {
    first: String,
    last: String,
    middle: Option<String>,
    suffix: Option<String>,
    nickname: Option<String>,
    official_full: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawBio {
    birthday: Option<String>,
    gender: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTerm {
    #[serde(rename = "type")]
    kind: String,
    start: Option<String>,
    end: Option<String>,
    state: String,
    district: Option<i64>,
    party: Option<String>,
    class: Option<u8>,
    state_rank: Option<String>,
    url: Option<String>,
    address: Option<String>,
    phone: Option<String>,
    office: Option<String>,
    contact_form: Option<String>,
    rss_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSocialEntry {
    id: RawSocialIds,
    #[serde(default)]
    social: RawSocial,
}

#[derive(Debug, Deserialize)]
struct RawSocialIds {
    bioguide: String,
}

#[derive(Debug, Default, Clone, Deserialize)]
struct RawSocial {
    twitter: Option<String>,
    facebook: Option<String>,
    youtube: Option<String>,
    instagram: Option<String>,
}

/// Client for downloading the legislator dataset
#[derive(Debug, Clone)]
pub struct CongressClient {
    client: Client,
    base_url: String,
}

impl Default for CongressClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CongressClient {
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    /// Creates a client with a custom HTTP client (timeouts, proxies)
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            base_url: DATASET_BASE_URL.to_string(),
        }
    }

    /// Points the client at another base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn get_json<T: DeserializeOwned>(&self, file: &str) -> Result<T, FetchError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), file);
        tracing::info!(url = %url, "downloading legislator data");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::RequestFailed {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|source| FetchError::RequestFailed {
                url: url.clone(),
                source,
            })?;
        serde_json::from_str(&text).map_err(|source| FetchError::ParseError { url, source })
    }
}

impl DatasetSource for CongressClient {
    async fn fetch_roster(&self, jurisdiction: Jurisdiction) -> Result<Vec<Legislator>, FetchError> {
        let raw: Vec<RawLegislator> = self.get_json(ROSTER_FILE).await?;
        let social: Vec<RawSocialEntry> = self.get_json(SOCIAL_FILE).await?;

        let legislators = build_roster(raw, social)?;
        if legislators.is_empty() {
            return Err(FetchError::Empty(jurisdiction));
        }
        tracing::debug!(
            jurisdiction = %jurisdiction,
            count = legislators.len(),
            "translated legislator records"
        );
        Ok(legislators)
    }
}

/// Joins roster and social entries and translates them, ordered by id
fn build_roster(
    raw: Vec<RawLegislator>,
    social: Vec<RawSocialEntry>,
) -> Result<Vec<Legislator>, FetchError> {
    let social: HashMap<String, RawSocial> = social
        .into_iter()
        .map(|entry| (entry.id.bioguide, entry.social))
        .collect();

    let mut legislators = raw
        .into_iter()
        .map(|person| {
            let accounts = social.get(&person.id.bioguide).cloned().unwrap_or_default();
            translate(person, accounts)
        })
        .collect::<Result<Vec<_>, _>>()?;

    legislators.sort_by(|a, b| a.bioguide_id.cmp(&b.bioguide_id));
    Ok(legislators)
}

/// Translates one upstream record into a [`Legislator`]
fn translate(person: RawLegislator, social: RawSocial) -> Result<Legislator, FetchError> {
    let bioguide_id = person.id.bioguide;
    let malformed = |reason: &str| FetchError::Malformed {
        bioguide_id: bioguide_id.clone(),
        reason: reason.to_string(),
    };

    let term = person.terms.last().ok_or_else(|| malformed("no terms"))?;
    let role = match term.kind.as_str() {
        "sen" => Role::Senator,
        "rep" => Role::Representative,
        _ => return Err(malformed(&format!("unknown term type '{}'", term.kind))),
    };
    let district = match role {
        Role::Senator => None,
        Role::Representative => {
            let n = term.district.ok_or_else(|| malformed("representative without district"))?;
            let n = u32::try_from(n).map_err(|_| malformed(&format!("invalid district {}", n)))?;
            Some(n)
        }
    };
    let state = term.state.to_ascii_uppercase();

    let mut profile = BTreeMap::new();
    let mut put = |field: LegislatorField, value: Option<Value>| {
        if let Some(value) = value.filter(|v| !v.is_null()) {
            profile.insert(field, value);
        }
    };
    let text = |s: &Option<String>| s.clone().map(Value::from);

    put(LegislatorField::MiddleName, text(&person.name.middle));
    put(LegislatorField::Suffix, text(&person.name.suffix));
    put(LegislatorField::Nickname, text(&person.name.nickname));
    put(LegislatorField::FullName, text(&person.name.official_full));
    put(LegislatorField::Gender, text(&person.bio.gender));
    put(LegislatorField::Birthday, text(&person.bio.birthday));
    put(LegislatorField::Party, text(&term.party));
    put(LegislatorField::Phone, text(&term.phone));
    put(LegislatorField::Address, text(&term.address));
    put(LegislatorField::Office, text(&term.office));
    put(LegislatorField::Url, text(&term.url));
    put(LegislatorField::ContactForm, text(&term.contact_form));
    put(LegislatorField::RssUrl, text(&term.rss_url));
    put(LegislatorField::TermStart, text(&term.start));
    put(LegislatorField::TermEnd, text(&term.end));
    put(LegislatorField::SenateClass, term.class.map(Value::from));
    put(LegislatorField::StateRank, text(&term.state_rank));
    put(LegislatorField::Twitter, text(&social.twitter));
    put(LegislatorField::Facebook, text(&social.facebook));
    put(LegislatorField::Youtube, text(&social.youtube));
    put(LegislatorField::Instagram, text(&social.instagram));
    put(LegislatorField::GovtrackId, person.id.govtrack);
    put(LegislatorField::OpensecretsId, person.id.opensecrets);
    put(LegislatorField::VotesmartId, person.id.votesmart);
    put(LegislatorField::WikipediaId, person.id.wikipedia);
    put(LegislatorField::BallotpediaId, person.id.ballotpedia);
    if !person.id.fec.is_empty() {
        put(LegislatorField::FecIds, Some(Value::from(person.id.fec)));
    }

    Ok(Legislator {
        divisions: Legislator::seat_divisions(role, &state, district),
        bioguide_id,
        first_name: person.name.first,
        last_name: person.name.last,
        role,
        state,
        district,
        profile,
    })
}
