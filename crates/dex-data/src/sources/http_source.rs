use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use dex_core::{Cursor, DescriptionRecord, DetailRecord, DexSource, FetchError, Identifier, Page};

use crate::api::{NamedResourceList, PokemonPayload, SpeciesPayload};
use crate::DataError;

/// HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Catalog served by the remote REST API
///
/// ```text
/// GET <base>/pokemon?offset=<n>&limit=<n>   entry list
/// GET <base>/pokemon/<id>                   detail payload
/// GET <base>/pokemon-species/<id>           description payload
/// ```
pub struct HttpSource {
    client: Client,
    base_url: String,
    /// Language used to select description text
    language: String,
}

impl HttpSource {
    /// Create a source for the API rooted at `base_url`
    pub fn new(base_url: impl Into<String>, language: impl Into<String>) -> Result<Self, DataError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("dex/", env!("CARGO_PKG_VERSION")))
            .build()?;
        info!("Using remote catalog at {}", base_url);

        Ok(Self {
            client,
            base_url,
            language: language.into(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, DataError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Status(status.as_u16()));
        }

        // Decode with serde_json so a bad body surfaces as malformed
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// A 404 for an entry means the catalog has no such entry
fn entry_error(id: Identifier, error: DataError) -> FetchError {
    match error {
        DataError::Status(status) if status == StatusCode::NOT_FOUND.as_u16() => FetchError::NotFound(id),
        other => other.into(),
    }
}

#[async_trait]
impl DexSource for HttpSource {
    async fn detail(&self, id: Identifier) -> Result<Arc<DetailRecord>, FetchError> {
        let url = format!("{}/pokemon/{}", self.base_url, id);
        let payload: PokemonPayload = self.get_json(&url).await.map_err(|e| entry_error(id, e))?;
        Ok(Arc::new(payload.into()))
    }

    async fn description(&self, id: Identifier) -> Result<Arc<DescriptionRecord>, FetchError> {
        let url = format!("{}/pokemon-species/{}", self.base_url, id);
        let payload: SpeciesPayload = self.get_json(&url).await.map_err(|e| entry_error(id, e))?;
        Ok(Arc::new(payload.description(id, &self.language)))
    }

    async fn page(&self, cursor: Option<Cursor>, limit: usize) -> Result<Page, FetchError> {
        let offset = cursor.map(|c| c.0).unwrap_or(0);
        let url = format!("{}/pokemon?offset={}&limit={}", self.base_url, offset, limit.max(1));
        let list: NamedResourceList = self.get_json(&url).await?;

        // The offset advances over every result, including ones without an id
        let fetched = list.results.len();
        let next_cursor = (list.next.is_some() && fetched > 0).then_some(Cursor(offset + fetched));
        Ok(Page {
            entries: list.entries(),
            next_cursor,
        })
    }

    fn source_name(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use dex_core::EntrySummary;

    const IVYSAUR: &str = r#"{ "id": 2, "name": "ivysaur", "height": 10, "weight": 130,
        "types": [ { "slot": 1, "type": { "name": "grass", "url": "" } } ],
        "stats": [ { "base_stat": 60, "effort": 0, "stat": { "name": "hp", "url": "" } } ] }"#;

    const IVYSAUR_SPECIES: &str = r#"{ "flavor_text_entries": [
        { "flavor_text": "Quand le bulbe...", "language": { "name": "fr", "url": "" } },
        { "flavor_text": "When the bulb on\nits back grows large,", "language": { "name": "en", "url": "" } }
    ] }"#;

    const FIRST_PAGE: &str = r#"{ "count": 3,
        "next": "https://pokeapi.co/api/v2/pokemon?offset=2&limit=2",
        "results": [
            { "name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon/1/" },
            { "name": "ivysaur", "url": "https://pokeapi.co/api/v2/pokemon/2/" }
        ] }"#;

    const LAST_PAGE: &str = r#"{ "count": 3, "next": null,
        "results": [ { "name": "venusaur", "url": "https://pokeapi.co/api/v2/pokemon/3/" } ] }"#;

    /// Answer each request line from a fixed table, recording the paths asked for
    async fn serve(routes: Vec<(&'static str, u16, &'static str)>) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}/api/v2", listener.local_addr().unwrap());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();

        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let request = String::from_utf8_lossy(&request);
                let path = request.split_whitespace().nth(1).unwrap_or("").to_string();
                log.lock().push(path.clone());

                let (status, body) = routes
                    .iter()
                    .find(|(route, _, _)| path == format!("/api/v2{}", route))
                    .map(|(_, status, body)| (*status, *body))
                    .unwrap_or((404, "Not Found"));
                let response = format!(
                    "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        (base, seen)
    }

    #[tokio::test]
    async fn test_reads_detail_and_description() {
        let (base, _) = serve(vec![
            ("/pokemon/2", 200, IVYSAUR),
            ("/pokemon-species/2", 200, IVYSAUR_SPECIES),
        ])
        .await;
        let source = HttpSource::new(format!("{}/", base), "en").unwrap();
        assert_eq!(source.source_name(), base);

        let detail = source.detail(Identifier::new(2)).await.unwrap();
        assert_eq!(detail.name, "ivysaur");
        assert_eq!(detail.types, vec!["grass"]);
        assert_eq!(detail.stats[0].value, 60);

        let description = source.description(Identifier::new(2)).await.unwrap();
        assert_eq!(description.text.as_deref(), Some("When the bulb on. its back grows large,"));
    }

    #[tokio::test]
    async fn test_missing_entry_and_server_errors() {
        let (base, _) = serve(vec![
            ("/pokemon/3", 200, "{ not json"),
            ("/pokemon/4", 503, "busy"),
        ])
        .await;
        let source = HttpSource::new(base, "en").unwrap();

        assert_eq!(
            source.detail(Identifier::new(1)).await.unwrap_err(),
            FetchError::NotFound(Identifier::new(1))
        );
        assert_eq!(
            source.description(Identifier::new(1)).await.unwrap_err(),
            FetchError::NotFound(Identifier::new(1))
        );
        assert!(matches!(
            source.detail(Identifier::new(3)).await.unwrap_err(),
            FetchError::Malformed(_)
        ));
        assert!(matches!(
            source.detail(Identifier::new(4)).await.unwrap_err(),
            FetchError::Unavailable(_)
        ));
    }

    #[tokio::test]
    async fn test_pages_by_offset_and_limit() {
        let (base, seen) = serve(vec![
            ("/pokemon?offset=0&limit=2", 200, FIRST_PAGE),
            ("/pokemon?offset=2&limit=2", 200, LAST_PAGE),
        ])
        .await;
        let source = HttpSource::new(base, "en").unwrap();

        let first = source.page(None, 2).await.unwrap();
        assert_eq!(first.entries.len(), 2);
        assert_eq!(first.next_cursor, Some(Cursor(2)));

        let last = source.page(first.next_cursor, 2).await.unwrap();
        assert_eq!(last.entries, vec![EntrySummary::new(3, "venusaur")]);
        assert!(last.next_cursor.is_none());
        assert_eq!(
            seen.lock().as_slice(),
            ["/api/v2/pokemon?offset=0&limit=2", "/api/v2/pokemon?offset=2&limit=2"]
        );
    }

    #[tokio::test]
    async fn test_unreachable_server_is_unavailable() {
        // Bind then drop so the port refuses connections
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let source = HttpSource::new(base, "en").unwrap();
        assert!(matches!(source.page(None, 21).await.unwrap_err(), FetchError::Unavailable(_)));
    }
}
