//! Read-only access to the external question table.
//!
//! The loader only sees the [`QuestionSource`] trait; [`AirtableSource`] is
//! the production implementation speaking the Airtable REST paging protocol.

use std::env;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use grrow_core::model::Circle;

use crate::error::LoaderError;

/// Credentials and location of the question table.
#[derive(Clone, Debug)]
pub struct AirtableConfig {
    pub base_url: String,
    pub token: String,
    pub base_id: String,
    pub table: String,
}

impl AirtableConfig {
    /// Reads the configuration from `GRROW_AIRTABLE_*` environment variables.
    ///
    /// Returns `None` when the token or base id is absent or blank.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let token = env::var("GRROW_AIRTABLE_TOKEN").ok()?;
        let base_id = env::var("GRROW_AIRTABLE_BASE").ok()?;
        let table = env::var("GRROW_AIRTABLE_TABLE").unwrap_or_else(|_| "Questions".into());
        let base_url = env::var("GRROW_AIRTABLE_URL")
            .unwrap_or_else(|_| "https://api.airtable.com/v0".into());
        Self::from_parts(base_url, token, base_id, table)
    }

    /// Builds a configuration, rejecting blank credentials.
    #[must_use]
    pub fn from_parts(
        base_url: impl Into<String>,
        token: impl Into<String>,
        base_id: impl Into<String>,
        table: impl Into<String>,
    ) -> Option<Self> {
        let token = token.into();
        let base_id = base_id.into();
        if token.trim().is_empty() || base_id.trim().is_empty() {
            return None;
        }
        Some(Self {
            base_url: base_url.into(),
            token,
            base_id,
            table: table.into(),
        })
    }
}

/// One page of raw provider rows plus the continuation cursor.
///
/// An absent `offset` signals the final page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordPage {
    #[serde(default)]
    pub records: Vec<ProviderRecord>,
    #[serde(default)]
    pub offset: Option<String>,
}

/// A raw provider row. Fields may be incomplete; validation happens in the
/// loader, not here.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderRecord {
    pub id: String,
    #[serde(default)]
    pub fields: RecordFields,
}

/// Loosely-typed cell values of one row.
///
/// Numeric cells tolerate strings and floats; anything unusable maps to
/// `None` so a malformed row degrades to a validation skip instead of
/// aborting the page parse.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordFields {
    #[serde(rename = "Question")]
    pub question: Option<String>,
    #[serde(rename = "Circle")]
    pub circle: Option<String>,
    #[serde(rename = "Strength")]
    pub strength: Option<String>,
    #[serde(rename = "Strength Order", default, deserialize_with = "lenient_u32")]
    pub strength_order: Option<u32>,
    #[serde(rename = "Skillset")]
    pub skillset: Option<String>,
    #[serde(rename = "Objective")]
    pub objective: Option<String>,
    #[serde(rename = "Question Order", default, deserialize_with = "lenient_u8")]
    pub question_order: Option<u8>,
    #[serde(rename = "ID", default, deserialize_with = "lenient_string")]
    pub question_id: Option<String>,
}

/// Paginated, filtered access to the question table.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetches one page of active rows matching `circle` and `version`,
    /// continuing from `offset` when given.
    async fn fetch_page(
        &self,
        circle: Circle,
        version: &str,
        offset: Option<&str>,
    ) -> Result<RecordPage, LoaderError>;
}

/// Airtable-backed [`QuestionSource`].
#[derive(Clone)]
pub struct AirtableSource {
    client: Client,
    endpoint: Url,
    token: String,
}

impl AirtableSource {
    /// Builds a source from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns `LoaderError::NotConfigured` when the base URL does not form a
    /// valid endpoint.
    pub fn new(config: &AirtableConfig) -> Result<Self, LoaderError> {
        let mut endpoint =
            Url::parse(config.base_url.trim_end_matches('/')).map_err(|_| LoaderError::NotConfigured)?;
        endpoint
            .path_segments_mut()
            .map_err(|()| LoaderError::NotConfigured)?
            .push(&config.base_id)
            .push(&config.table);

        Ok(Self {
            client: Client::new(),
            endpoint,
            token: config.token.clone(),
        })
    }

    /// Builds a source from `GRROW_AIRTABLE_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `LoaderError::NotConfigured` when required variables are absent.
    pub fn from_env() -> Result<Self, LoaderError> {
        let config = AirtableConfig::from_env().ok_or(LoaderError::NotConfigured)?;
        Self::new(&config)
    }
}

#[async_trait]
impl QuestionSource for AirtableSource {
    async fn fetch_page(
        &self,
        circle: Circle,
        version: &str,
        offset: Option<&str>,
    ) -> Result<RecordPage, LoaderError> {
        let formula = filter_formula(circle, version);
        let mut params: Vec<(&str, &str)> = vec![("filterByFormula", &formula)];
        if let Some(offset) = offset {
            params.push(("offset", offset));
        }

        let response = self
            .client
            .get(self.endpoint.clone())
            .bearer_auth(&self.token)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(LoaderError::Provider { status, body });
        }

        serde_json::from_str(&body).map_err(|source| LoaderError::Parse { status, source })
    }
}

/// Server-side filter: active rows for one circle and content version.
fn filter_formula(circle: Circle, version: &str) -> String {
    let version = version.replace('"', "\\\"");
    format!(
        "AND({{Active}}, {{Circle}} = \"{}\", {{Version}} = \"{}\")",
        circle.as_str(),
        version
    )
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_u8<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_number(deserializer)?.and_then(|n| u8::try_from(n).ok()))
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_number(deserializer)?.and_then(|n| u32::try_from(n).ok()))
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => {
            n.as_u64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64))
        }
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
