//! Bexio API client implementing the `QuotingPlatform` port

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use ausmass_core::{unit_name_alternates, QuotingPlatform, SubmitError, TaxCatalog};
use ausmass_domain::constants::DEFAULT_TAX_RATE;
use ausmass_domain::{AusmassError, BexioConfig, QuoteHeader, QuotePosition, Result};
use chrono::Utc;
use reqwest::{Method, RequestBuilder};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};

use super::endpoints::{self, CandidateRequest};
use crate::http::HttpClient;

/// Client for Bexio's quoting API.
///
/// Position posts are not idempotent, so the underlying HTTP client runs
/// with a single attempt; all retry behavior is the explicit candidate and
/// ladder logic below.
pub struct BexioClient {
    http: HttpClient,
    config: BexioConfig,
}

/// Tax catalog entry. Depending on API generation the percentage arrives
/// under `percentage` or `value`, as a number or a numeric string.
#[derive(Debug, Deserialize)]
struct TaxRecord {
    id: i64,
    #[serde(default)]
    percentage: Option<Value>,
    #[serde(default)]
    value: Option<Value>,
}

impl TaxRecord {
    fn rate(&self) -> Option<f64> {
        let raw = self.percentage.as_ref().or(self.value.as_ref())?;
        let rate = match raw {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        rate.filter(|r| r.is_finite())
    }
}

#[derive(Debug, Deserialize)]
struct ContactRecord {
    id: i64,
}

/// Status/body of a non-success delivery attempt.
struct Attempt {
    status: u16,
    body: String,
}

/// Rolling record of the most recent failed attempt for one position.
struct LastFailure {
    endpoint: String,
    status: u16,
    body: String,
}

impl LastFailure {
    fn update(&mut self, attempt: &Attempt) {
        self.status = attempt.status;
        self.body = attempt.body.clone();
    }
}

impl BexioClient {
    pub fn new(config: BexioConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .max_attempts(1)
            .build()?;
        Ok(Self { http, config })
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.config.api_token))
            .header("Accept", "application/json")
    }

    async fn fetch_taxes(&self, base_url: &str) -> Result<Vec<TaxRecord>> {
        let url = format!("{base_url}/taxes");
        let response = self.http.send(self.request(Method::GET, &url)).await?;
        if !response.status().is_success() {
            return Err(AusmassError::Network(format!(
                "tax catalog request returned HTTP {}",
                response.status()
            )));
        }
        response
            .json()
            .await
            .map_err(|err| AusmassError::Internal(format!("failed to parse tax catalog: {err}")))
    }

    async fn create_contact(&self, name: &str, address: Option<&str>) -> Result<Option<i64>> {
        let mut payload = serde_json::Map::new();
        payload.insert("name_1".to_string(), json!(name));
        if let Some(address) = address {
            payload.insert("address".to_string(), json!(address));
        }
        payload.insert("contact_type_id".to_string(), json!(1));

        let url = format!("{}/contact", self.config.base_url);
        let response =
            self.http.send(self.request(Method::POST, &url).json(&Value::Object(payload))).await?;

        if response.status().as_u16() == 401 {
            return Err(AusmassError::Auth(
                "quoting platform rejected the token during contact creation".into(),
            ));
        }
        if !response.status().is_success() {
            warn!(
                status = response.status().as_u16(),
                "contact creation rejected; quote will be created without a contact"
            );
            return Ok(None);
        }

        let contact: ContactRecord = response
            .json()
            .await
            .map_err(|err| AusmassError::Internal(format!("failed to parse contact: {err}")))?;
        Ok(Some(contact.id))
    }

    /// Send one payload once. `Ok(None)` means delivered; `Ok(Some(_))` is a
    /// non-success response other than 401.
    async fn post_once(
        &self,
        url: &str,
        payload: &Value,
    ) -> std::result::Result<Option<Attempt>, SubmitError> {
        let builder = self.request(Method::POST, url).json(payload);
        let response = self.http.send(builder).await.map_err(SubmitError::Fatal)?;
        let status = response.status();

        if status.is_success() {
            return Ok(None);
        }
        if status.as_u16() == 401 {
            return Err(SubmitError::Unauthorized { endpoint: url.to_string() });
        }

        let body = response.text().await.unwrap_or_default();
        Ok(Some(Attempt { status: status.as_u16(), body }))
    }

    /// Retry a 422 that names `tax_id`: every catalog identifier, then the
    /// configured fallbacks, then the platform's historical small integers.
    async fn retry_with_tax_ids(
        &self,
        url: &str,
        payload: &Value,
        taxes: &TaxCatalog,
        last: &mut LastFailure,
    ) -> std::result::Result<bool, SubmitError> {
        let mut ids: Vec<i64> = taxes.ids().collect();
        ids.push(self.config.fallback_tax_id);
        ids.push(self.config.fallback_zero_tax_id);
        ids.extend([1, 2, 3, 0]);
        let mut seen = HashSet::new();
        ids.retain(|id| seen.insert(*id));

        for id in ids {
            let retry_payload = with_field(payload, "tax_id", json!(id));
            debug!(%url, tax_id = id, "retrying position with alternate tax id");
            match self.post_once(url, &retry_payload).await? {
                None => return Ok(true),
                Some(attempt) => {
                    let status = attempt.status;
                    last.update(&attempt);
                    if status != 422 {
                        break;
                    }
                }
            }
        }
        Ok(false)
    }

    /// Last resort for tax rejections: let the server pick its default.
    async fn retry_without_tax(
        &self,
        url: &str,
        payload: &Value,
        last: &mut LastFailure,
    ) -> std::result::Result<bool, SubmitError> {
        let retry_payload = without_field(payload, "tax_id");
        debug!(%url, "retrying position without tax id");
        match self.post_once(url, &retry_payload).await? {
            None => Ok(true),
            Some(attempt) => {
                last.update(&attempt);
                Ok(false)
            }
        }
    }

    /// Retry a 422 that names `unit_name` with the alternate spellings of
    /// the same unit family.
    async fn retry_with_unit_names(
        &self,
        url: &str,
        payload: &Value,
        unit_name: &str,
        last: &mut LastFailure,
    ) -> std::result::Result<bool, SubmitError> {
        for alternate in unit_name_alternates(unit_name) {
            let retry_payload = with_field(payload, "unit_name", json!(alternate));
            debug!(%url, unit_name = alternate, "retrying position with alternate unit name");
            match self.post_once(url, &retry_payload).await? {
                None => return Ok(true),
                Some(attempt) => last.update(&attempt),
            }
        }
        Ok(false)
    }

    fn base_payload(&self, quote_id: i64, position: &QuotePosition, taxes: &TaxCatalog) -> Value {
        match position {
            QuotePosition::Text { text } => json!({
                "kb_document_id": quote_id,
                "text": text,
            }),
            QuotePosition::Custom { text, amount, unit_price, unit_name, tax_rate } => json!({
                "kb_document_id": quote_id,
                "text": text,
                "amount": amount,
                "unit_price": unit_price,
                "unit_name": unit_name,
                "tax_id": taxes.id_for_rate(*tax_rate, self.config.fallback_tax_id),
                "discount_in_percent": 0,
            }),
        }
    }

    /// Compact payload excerpt for failure diagnostics; long texts are
    /// truncated so reports stay readable.
    fn failure_excerpt(position: &QuotePosition, base_payload: &Value) -> Value {
        match position {
            QuotePosition::Text { .. } => json!({ "text": base_payload["text"] }),
            QuotePosition::Custom { tax_rate, .. } => {
                let text: String = base_payload["text"]
                    .as_str()
                    .unwrap_or_default()
                    .chars()
                    .take(120)
                    .collect();
                json!({
                    "text": text,
                    "amount": base_payload["amount"],
                    "unit_price": base_payload["unit_price"],
                    "unit_name": base_payload["unit_name"],
                    "tax_id": base_payload["tax_id"],
                    "tax_rate": tax_rate,
                })
            }
        }
    }

    async fn deliver_candidate(
        &self,
        candidate: &CandidateRequest,
        taxes: &TaxCatalog,
        last: &mut LastFailure,
    ) -> std::result::Result<CandidateOutcome, SubmitError> {
        let payload = strip_nulls(&candidate.payload);

        let first = match self.post_once(&candidate.url, &payload).await? {
            None => return Ok(CandidateOutcome::Posted),
            Some(attempt) => attempt,
        };
        let first_status = first.status;
        last.update(&first);

        if first_status == 422 && contains_ignore_case(&last.body, "tax_id") {
            if self.retry_with_tax_ids(&candidate.url, &payload, taxes, last).await? {
                return Ok(CandidateOutcome::Posted);
            }
            if self.retry_without_tax(&candidate.url, &payload, last).await? {
                return Ok(CandidateOutcome::Posted);
            }
        }

        if first_status == 422 && contains_ignore_case(&last.body, "unit_name") {
            if let Some(unit_name) = payload.get("unit_name").and_then(Value::as_str) {
                let unit_name = unit_name.to_string();
                if self.retry_with_unit_names(&candidate.url, &payload, &unit_name, last).await? {
                    return Ok(CandidateOutcome::Posted);
                }
            }
        }

        // 404/405 mean the path shape was wrong; anything else is a genuine
        // rejection and further candidates would only duplicate it.
        if first_status == 404 || first_status == 405 {
            Ok(CandidateOutcome::WrongShape)
        } else {
            Ok(CandidateOutcome::Rejected)
        }
    }
}

enum CandidateOutcome {
    Posted,
    WrongShape,
    Rejected,
}

#[async_trait]
impl QuotingPlatform for BexioClient {
    /// Best-effort catalog fetch across both API generations; the current
    /// generation wins ties and configured fallbacks guarantee a non-empty
    /// result.
    #[instrument(skip(self))]
    async fn tax_catalog(&self) -> TaxCatalog {
        let mut catalog = TaxCatalog::new();

        for base_url in [self.config.base_url.as_str(), self.config.legacy_base_url.as_str()] {
            match self.fetch_taxes(base_url).await {
                Ok(records) => {
                    for record in &records {
                        if let Some(rate) = record.rate() {
                            catalog.insert(rate, record.id);
                        }
                    }
                }
                Err(err) => {
                    warn!(base_url, error = %err, "tax catalog fetch failed; continuing");
                }
            }
        }

        if catalog.is_empty() {
            catalog.insert(DEFAULT_TAX_RATE, self.config.fallback_tax_id);
            catalog.insert(0.0, self.config.fallback_zero_tax_id);
        }

        debug!(entries = catalog.len(), "tax catalog resolved");
        catalog
    }

    #[instrument(skip(self, address))]
    async fn resolve_contact(&self, name: &str, address: Option<&str>) -> Result<Option<i64>> {
        let url =
            format!("{}/contact?search_term={}", self.config.base_url, urlencoding::encode(name));
        let response = self.http.send(self.request(Method::GET, &url)).await?;

        if response.status().as_u16() == 401 {
            return Err(AusmassError::Auth(
                "quoting platform rejected the token during contact search".into(),
            ));
        }

        if response.status().is_success() {
            let contacts: Vec<ContactRecord> = response.json().await.map_err(|err| {
                AusmassError::Internal(format!("failed to parse contact search: {err}"))
            })?;
            if let Some(first) = contacts.first() {
                debug!(contact_id = first.id, "existing contact found");
                return Ok(Some(first.id));
            }
        } else {
            warn!(
                status = response.status().as_u16(),
                "contact search returned non-success; attempting creation"
            );
        }

        self.create_contact(name, address).await
    }

    #[instrument(skip(self, title))]
    async fn create_quote(&self, title: &str, contact_id: Option<i64>) -> Result<QuoteHeader> {
        let payload = json!({
            "title": title,
            "contact_id": contact_id,
            "user_id": 1,
            "is_valid_from": Utc::now().date_naive().format("%Y-%m-%d").to_string(),
        });

        let url = format!("{}/kb_offer", self.config.base_url);
        let response = self.http.send(self.request(Method::POST, &url).json(&payload)).await?;

        if response.status().as_u16() == 401 {
            return Err(AusmassError::Auth(
                "quoting platform rejected the token during quote creation".into(),
            ));
        }
        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AusmassError::Internal(body));
        }

        response
            .json()
            .await
            .map_err(|err| AusmassError::Internal(format!("failed to parse quote header: {err}")))
    }

    async fn post_position(
        &self,
        quote_id: i64,
        position: &QuotePosition,
        taxes: &TaxCatalog,
    ) -> std::result::Result<(), SubmitError> {
        let base_payload = self.base_payload(quote_id, position, taxes);
        let candidates = endpoints::candidates_for(&self.config, quote_id, position, &base_payload);

        let mut last = LastFailure { endpoint: String::new(), status: 0, body: String::new() };

        for candidate in &candidates {
            last.endpoint = candidate.url.clone();
            match self.deliver_candidate(candidate, taxes, &mut last).await? {
                CandidateOutcome::Posted => return Ok(()),
                CandidateOutcome::WrongShape => continue,
                CandidateOutcome::Rejected => break,
            }
        }

        Err(SubmitError::Rejected {
            endpoint: last.endpoint,
            status: last.status,
            payload: Self::failure_excerpt(position, &base_payload),
            body: last.body,
        })
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_ascii_lowercase().contains(needle)
}

fn with_field(payload: &Value, key: &str, value: Value) -> Value {
    let mut copy = payload.clone();
    if let Value::Object(map) = &mut copy {
        map.insert(key.to_string(), value);
    }
    copy
}

fn without_field(payload: &Value, key: &str) -> Value {
    let mut copy = payload.clone();
    if let Value::Object(map) = &mut copy {
        map.remove(key);
    }
    copy
}

/// Drop null members so optional fields are absent rather than `null`.
fn strip_nulls(payload: &Value) -> Value {
    match payload {
        Value::Object(map) => Value::Object(
            map.iter().filter(|(_, v)| !v.is_null()).map(|(k, v)| (k.clone(), v.clone())).collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> BexioClient {
        let config = BexioConfig {
            base_url: format!("{}/3.0", server.uri()),
            legacy_base_url: format!("{}/2.0", server.uri()),
            api_token: "test-token".to_string(),
            ..BexioConfig::default()
        };
        BexioClient::new(config).expect("client")
    }

    #[test]
    fn strip_nulls_removes_only_null_members() {
        let value = json!({"a": 1, "b": null, "c": "x"});
        assert_eq!(strip_nulls(&value), json!({"a": 1, "c": "x"}));
    }

    #[test]
    fn tax_record_rate_handles_numbers_and_strings() {
        let record: TaxRecord =
            serde_json::from_value(json!({"id": 10, "percentage": "8.1"})).unwrap();
        assert_eq!(record.rate(), Some(8.1));

        let record: TaxRecord = serde_json::from_value(json!({"id": 20, "value": 0.0})).unwrap();
        assert_eq!(record.rate(), Some(0.0));

        let record: TaxRecord =
            serde_json::from_value(json!({"id": 30, "percentage": "n/a"})).unwrap();
        assert_eq!(record.rate(), None);
    }

    #[tokio::test]
    async fn tax_catalog_merges_generations_with_current_winning_ties() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/3.0/taxes"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 10, "percentage": "8.1"},
            ])))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/2.0/taxes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 99, "value": 8.1},
                {"id": 20, "value": 0.0},
            ])))
            .mount(&server)
            .await;

        let catalog = client_for(&server).tax_catalog().await;

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.id_for_rate(8.1, 0), 10);
        assert_eq!(catalog.id_for_rate(0.0, 0), 20);
    }

    #[tokio::test]
    async fn tax_catalog_falls_back_when_both_generations_fail() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/3.0/taxes"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/2.0/taxes"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let catalog = client_for(&server).tax_catalog().await;

        assert!(!catalog.is_empty());
        assert_eq!(catalog.id_for_rate(8.1, 0), 383);
        assert_eq!(catalog.id_for_rate(0.0, 0), 2);
    }

    #[tokio::test]
    async fn contact_search_returns_first_match() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/3.0/contact"))
            .and(query_param("search_term", "Muster AG"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 7, "name_1": "Muster AG"},
                {"id": 8, "name_1": "Muster AG Filiale"},
            ])))
            .mount(&server)
            .await;

        let contact = client_for(&server).resolve_contact("Muster AG", None).await.unwrap();
        assert_eq!(contact, Some(7));
    }

    #[tokio::test]
    async fn contact_search_401_is_fatal() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/3.0/contact"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let result = client_for(&server).resolve_contact("Muster AG", None).await;
        assert!(matches!(result, Err(AusmassError::Auth(_))));
    }

    #[tokio::test]
    async fn missing_contact_is_created() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/3.0/contact"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/3.0/contact"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 55})))
            .expect(1)
            .mount(&server)
            .await;

        let contact = client_for(&server)
            .resolve_contact("Muster AG", Some("Dorfstrasse 1"))
            .await
            .unwrap();
        assert_eq!(contact, Some(55));

        let requests = server.received_requests().await.unwrap();
        let create = requests.iter().find(|r| r.method.as_str() == "POST").unwrap();
        let body: Value = serde_json::from_slice(&create.body).unwrap();
        assert_eq!(body["name_1"], "Muster AG");
        assert_eq!(body["address"], "Dorfstrasse 1");
        assert_eq!(body["contact_type_id"], 1);
    }

    #[tokio::test]
    async fn failed_contact_creation_degrades_to_none() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/3.0/contact"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/3.0/contact"))
            .respond_with(ResponseTemplate::new(422).set_body_string("name_1 invalid"))
            .mount(&server)
            .await;

        let contact = client_for(&server).resolve_contact("Muster AG", None).await.unwrap();
        assert_eq!(contact, None);
    }

    #[tokio::test]
    async fn quote_creation_posts_title_contact_and_validity_date() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/3.0/kb_offer"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 4242,
                "document_nr": "AN-0001",
            })))
            .mount(&server)
            .await;

        let quote = client_for(&server)
            .create_quote("Ausmass - Muster AG", Some(7))
            .await
            .unwrap();
        assert_eq!(quote.id, 4242);
        assert_eq!(quote.document_nr.as_deref(), Some("AN-0001"));

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["title"], "Ausmass - Muster AG");
        assert_eq!(body["contact_id"], 7);
        assert_eq!(body["user_id"], 1);
        // Valid from today, ISO date only.
        let date = body["is_valid_from"].as_str().unwrap();
        assert_eq!(date.len(), 10);
    }

    #[tokio::test]
    async fn quote_creation_failure_carries_the_raw_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/3.0/kb_offer"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal platform error"))
            .mount(&server)
            .await;

        let result = client_for(&server).create_quote("Ausmass - Muster AG", None).await;
        match result {
            Err(AusmassError::Internal(body)) => assert_eq!(body, "internal platform error"),
            other => panic!("expected internal error, got {other:?}"),
        }
    }
}
