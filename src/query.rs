//! The knowledge-graph query boundary.
//!
//! One fixed query shape, parameterized by an occupation id, sent as a
//! `GET` to a SPARQL endpoint. Any status other than 200 ends the lookup.

use std::time::Duration;

use tracing::{debug, trace};
use url::Url;

use crate::config::EndpointConfig;
use crate::error::LookupError;
use crate::model::{PersonRecord, QueryResponse};
use crate::normalization::entity_id_from_uri;

const ACCEPT_HEADER: &str = "Accept: application/sparql-results+json";

pub trait QueryClient {
    /// Fetches everyone whose occupation is `profession` or a subclass of it
    /// and who lists a federated account.
    fn fetch_people(&self, profession: &str) -> Result<Vec<PersonRecord>, LookupError>;
}

pub fn build_person_query(entity_id: &str, language: &str) -> String {
    format!(
        r#"
    SELECT DISTINCT ?person ?personLabel ?mastodonName ?pic ?personDescription
    WHERE {{
      ?person wdt:P4033 ?mastodonName ;
        wdt:P106 ?occupation .
      OPTIONAL {{ ?person wdt:P18 ?pic . }}
      ?occupation wdt:P279* wd:{entity_id} .
       SERVICE wikibase:label {{
         bd:serviceParam wikibase:language "{language}"
       }}
    }}"#
    )
}

pub fn build_request_url(endpoint: &str, query: &str) -> Result<Url, LookupError> {
    Url::parse_with_params(endpoint, &[("format", "json"), ("query", query)]).map_err(|error| {
        LookupError::InvalidEndpoint {
            url: endpoint.to_owned(),
            reason: error.to_string(),
        }
    })
}

pub fn decode_response(body: &[u8]) -> Result<Vec<PersonRecord>, LookupError> {
    let response: QueryResponse = serde_json::from_slice(body)?;
    Ok(response.into_records())
}

/// Blocking client backed by libcurl.
#[derive(Debug, Clone)]
pub struct HttpQueryClient {
    config: EndpointConfig,
}

impl HttpQueryClient {
    pub fn new(config: EndpointConfig) -> Self {
        Self { config }
    }

    fn get(&self, url: &Url) -> Result<(u32, Vec<u8>), LookupError> {
        let mut body = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url.as_str())?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.useragent(&self.config.user_agent)?;
        easy.connect_timeout(Duration::from_secs(self.config.connect_timeout_secs))?;
        easy.timeout(Duration::from_secs(self.config.timeout_secs))?;

        let mut headers = curl::easy::List::new();
        headers.append(ACCEPT_HEADER)?;
        easy.http_headers(headers)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        Ok((status, body))
    }
}

impl QueryClient for HttpQueryClient {
    fn fetch_people(&self, profession: &str) -> Result<Vec<PersonRecord>, LookupError> {
        let entity_id = entity_id_from_uri(profession);
        let query = build_person_query(entity_id, &self.config.language);
        let url = build_request_url(&self.config.sparql_url, &query)?;

        debug!(entity_id, endpoint = %self.config.sparql_url, "issuing person query");
        let (status, body) = self.get(&url)?;
        trace!(status, bytes = body.len(), "query response received");

        if status != 200 {
            return Err(LookupError::QueryRejected { status });
        }

        decode_response(&body)
    }
}
