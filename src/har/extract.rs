//! HAR endpoint extraction.
//!
//! A single-pass, stateless filter over `log.entries`: each entry is either
//! classified as API traffic and summarized into an [`Endpoint`], or
//! discarded as static-asset noise. Entry order is preserved, and ids are
//! derived from the position in the original list (not the filtered output)
//! so they stay stable if the classification rule changes.

use serde::Serialize;
use url::Url;

use crate::har::{Har, HarEntry, HarHeader};

/// A classified, summarized API call extracted from one HAR entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    /// Stable id: `endpoint-<zero-based index in the original entry list>`.
    pub id: String,
    /// HTTP method, verbatim from the entry.
    pub method: String,
    /// URL path plus query string (no trailing `?` when the query is empty).
    pub path: String,
    /// Response status code, verbatim from the entry.
    pub status: u16,
}

/// Result of one extraction pass.
#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    pub endpoints: Vec<Endpoint>,
    /// Entries dropped because their request URL did not parse as an
    /// absolute URL. A malformed entry never fails the batch.
    pub skipped: usize,
}

/// Extract API endpoints from a parsed HAR document.
///
/// Pure and idempotent — no I/O, no state across calls. The output length
/// is at most the input entry count.
pub fn extract_endpoints(har: &Har) -> Extraction {
    let mut endpoints = Vec::new();
    let mut skipped = 0usize;

    for (index, entry) in har.log.entries.iter().enumerate() {
        let url = match Url::parse(&entry.request.url) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!(
                    index,
                    url = %entry.request.url,
                    error = %e,
                    "skipping entry with unparseable URL"
                );
                skipped += 1;
                continue;
            }
        };

        if !is_api_traffic(&url, entry) {
            continue;
        }

        // pathname + search, matching the standard URL component split
        let path = match url.query() {
            Some(query) if !query.is_empty() => format!("{}?{}", url.path(), query),
            _ => url.path().to_string(),
        };

        endpoints.push(Endpoint {
            id: format!("endpoint-{index}"),
            method: entry.request.method.clone(),
            path,
            status: entry.response.status,
        });
    }

    Extraction { endpoints, skipped }
}

/// Parse HAR JSON text and extract endpoints in one call.
///
/// Whole-input failures (`MalformedHar`) return no partial results.
pub fn extract_endpoints_from_json(raw: &str) -> crate::Result<Extraction> {
    let har = Har::from_json(raw)?;
    Ok(extract_endpoints(&har))
}

/// Classification rule, evaluated in order with short-circuit:
/// 1. URL path contains the literal `/api/`
/// 2. any request `content-type` header mentions `application/json`
/// 3. any response `content-type` header mentions `application/json`
fn is_api_traffic(url: &Url, entry: &HarEntry) -> bool {
    if url.path().contains("/api/") {
        return true;
    }
    has_json_content_type(&entry.request.headers)
        || has_json_content_type(&entry.response.headers)
}

fn has_json_content_type(headers: &[HarHeader]) -> bool {
    headers.iter().any(|h| {
        h.name.eq_ignore_ascii_case("content-type") && h.value.contains("application/json")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_json(method: &str, url: &str, content_type: &str, status: u16) -> String {
        format!(
            r#"{{"request": {{"method": "{method}", "url": "{url}", "headers": []}},
                 "response": {{"status": {status},
                               "headers": [{{"name": "Content-Type", "value": "{content_type}"}}]}}}}"#
        )
    }

    fn har_with(entries: &[String]) -> Har {
        let raw = format!(r#"{{"log": {{"entries": [{}]}}}}"#, entries.join(","));
        Har::from_json(&raw).unwrap()
    }

    fn three_entry_har() -> Har {
        har_with(&[
            entry_json("GET", "http://127.0.0.1:5000/home", "text/html", 200),
            entry_json(
                "GET",
                "http://127.0.0.1:5000/api/products",
                "application/json",
                200,
            ),
            entry_json(
                "POST",
                "http://127.0.0.1:5000/api/login",
                "application/json",
                401,
            ),
        ])
    }

    #[test]
    fn test_filters_noise_and_preserves_order() {
        let extraction = extract_endpoints(&three_entry_har());
        assert_eq!(extraction.skipped, 0);
        let endpoints = extraction.endpoints;
        assert_eq!(endpoints.len(), 2);
        assert_eq!(endpoints[0].method, "GET");
        assert_eq!(endpoints[0].path, "/api/products");
        assert_eq!(endpoints[0].status, 200);
        assert_eq!(endpoints[1].method, "POST");
        assert_eq!(endpoints[1].path, "/api/login");
        assert_eq!(endpoints[1].status, 401);
    }

    #[test]
    fn test_ids_use_original_index() {
        // /home is entry 0 and excluded, so the surviving ids start at 1
        let extraction = extract_endpoints(&three_entry_har());
        assert_eq!(extraction.endpoints[0].id, "endpoint-1");
        assert_eq!(extraction.endpoints[1].id, "endpoint-2");
    }

    #[test]
    fn test_api_path_included_regardless_of_headers() {
        let har = har_with(&[entry_json(
            "GET",
            "http://example.com/api/export.csv",
            "text/csv",
            200,
        )]);
        assert_eq!(extract_endpoints(&har).endpoints.len(), 1);
    }

    #[test]
    fn test_json_request_header_included() {
        let har = Har::from_json(
            r#"{"log": {"entries": [
                {"request": {"method": "POST", "url": "http://example.com/graphql",
                             "headers": [{"name": "content-type", "value": "application/json; charset=utf-8"}]},
                 "response": {"status": 200, "headers": []}}
            ]}}"#,
        )
        .unwrap();
        let extraction = extract_endpoints(&har);
        assert_eq!(extraction.endpoints.len(), 1);
        assert_eq!(extraction.endpoints[0].path, "/graphql");
    }

    #[test]
    fn test_header_name_match_is_case_insensitive() {
        let har = Har::from_json(
            r#"{"log": {"entries": [
                {"request": {"method": "GET", "url": "http://example.com/data",
                             "headers": [{"name": "CONTENT-TYPE", "value": "application/json"}]},
                 "response": {"status": 200, "headers": []}}
            ]}}"#,
        )
        .unwrap();
        assert_eq!(extract_endpoints(&har).endpoints.len(), 1);
    }

    #[test]
    fn test_plain_asset_excluded() {
        let har = har_with(&[entry_json(
            "GET",
            "http://example.com/static/app.css",
            "text/css",
            200,
        )]);
        let extraction = extract_endpoints(&har);
        assert!(extraction.endpoints.is_empty());
        assert_eq!(extraction.skipped, 0);
    }

    #[test]
    fn test_query_string_preserved_in_path() {
        let har = har_with(&[entry_json(
            "GET",
            "http://example.com/api/search?q=laptop&limit=10",
            "application/json",
            200,
        )]);
        assert_eq!(
            extract_endpoints(&har).endpoints[0].path,
            "/api/search?q=laptop&limit=10"
        );
    }

    #[test]
    fn test_no_trailing_question_mark_without_query() {
        let har = har_with(&[
            entry_json("GET", "http://example.com/api/items", "application/json", 200),
            entry_json("GET", "http://example.com/api/items?", "application/json", 200),
        ]);
        let endpoints = extract_endpoints(&har).endpoints;
        assert_eq!(endpoints[0].path, "/api/items");
        assert_eq!(endpoints[1].path, "/api/items");
    }

    #[test]
    fn test_unparseable_url_skipped_batch_survives() {
        let har = har_with(&[
            entry_json("GET", "not a url", "application/json", 200),
            entry_json("GET", "http://example.com/api/ok", "application/json", 200),
        ]);
        let extraction = extract_endpoints(&har);
        assert_eq!(extraction.skipped, 1);
        assert_eq!(extraction.endpoints.len(), 1);
        assert_eq!(extraction.endpoints[0].path, "/api/ok");
        // id still reflects the original position
        assert_eq!(extraction.endpoints[0].id, "endpoint-1");
    }

    #[test]
    fn test_relative_url_skipped() {
        let har = har_with(&[entry_json("GET", "/api/relative", "application/json", 200)]);
        let extraction = extract_endpoints(&har);
        assert!(extraction.endpoints.is_empty());
        assert_eq!(extraction.skipped, 1);
    }

    #[test]
    fn test_output_never_longer_than_input() {
        let har = three_entry_har();
        let extraction = extract_endpoints(&har);
        assert!(extraction.endpoints.len() <= har.log.entries.len());
    }

    #[test]
    fn test_idempotent() {
        let har = three_entry_har();
        let first = extract_endpoints(&har);
        let second = extract_endpoints(&har);
        assert_eq!(first.endpoints, second.endpoints);
        assert_eq!(first.skipped, second.skipped);
    }

    #[test]
    fn test_empty_entries_yield_empty_output() {
        let extraction = extract_endpoints_from_json(r#"{"log": {"entries": []}}"#).unwrap();
        assert!(extraction.endpoints.is_empty());
        assert_eq!(extraction.skipped, 0);
    }

    #[test]
    fn test_malformed_top_level_fails_whole_call() {
        assert!(matches!(
            extract_endpoints_from_json("{}"),
            Err(crate::HarbingerError::MalformedHar(_))
        ));
        assert!(matches!(
            extract_endpoints_from_json("[1, 2"),
            Err(crate::HarbingerError::MalformedHar(_))
        ));
    }

    #[test]
    fn test_endpoint_serializes_to_expected_shape() {
        let endpoint = Endpoint {
            id: "endpoint-3".to_string(),
            method: "DELETE".to_string(),
            path: "/api/products/2".to_string(),
            status: 200,
        };
        let value = serde_json::to_value(&endpoint).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "endpoint-3",
                "method": "DELETE",
                "path": "/api/products/2",
                "status": 200
            })
        );
    }
}
