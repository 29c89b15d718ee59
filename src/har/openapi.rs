//! OpenAPI-style view synthesis over extracted endpoints.
//!
//! Groups endpoints by path (query string stripped) and lower-cased method
//! into a minimal `{openapi, info, paths}` document. This is a convenience
//! view for browsing observed traffic, not a validated OpenAPI document —
//! there is no schema inference from observed bodies.

use serde_json::{Map, Value, json};

use crate::har::extract::Endpoint;

/// Synthesize a minimal OpenAPI-style document from extracted endpoints.
///
/// Each operation carries a `summary` and a single `responses` entry keyed
/// by the observed status code. When several endpoints share a path and
/// method the last one wins — the operation descriptor is replaced wholesale,
/// never accumulated.
pub fn synthesize_openapi(endpoints: &[Endpoint], title: &str) -> Value {
    let mut paths = Map::new();

    for endpoint in endpoints {
        let path = match endpoint.path.split_once('?') {
            Some((path, _)) => path,
            None => endpoint.path.as_str(),
        };
        let method = endpoint.method.to_lowercase();

        let description = if (200..300).contains(&endpoint.status) {
            "Success"
        } else {
            "Error"
        };
        let mut responses = Map::new();
        responses.insert(
            endpoint.status.to_string(),
            json!({ "description": description }),
        );

        let mut operation = Map::new();
        operation.insert(
            "summary".to_string(),
            Value::String(format!("{} {}", endpoint.method.to_uppercase(), path)),
        );
        operation.insert("responses".to_string(), Value::Object(responses));

        let item = paths
            .entry(path.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Some(item) = item.as_object_mut() {
            item.insert(method, Value::Object(operation));
        }
    }

    json!({
        "openapi": "3.0.0",
        "info": { "title": title, "version": "1.0.0" },
        "paths": paths
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(id: usize, method: &str, path: &str, status: u16) -> Endpoint {
        Endpoint {
            id: format!("endpoint-{id}"),
            method: method.to_string(),
            path: path.to_string(),
            status,
        }
    }

    #[test]
    fn test_groups_by_path_then_method() {
        let endpoints = vec![
            endpoint(0, "GET", "/api/products", 200),
            endpoint(1, "POST", "/api/products", 201),
            endpoint(2, "GET", "/api/users", 200),
        ];
        let doc = synthesize_openapi(&endpoints, "Shop API");
        assert_eq!(doc["info"]["title"], "Shop API");
        assert!(doc["paths"]["/api/products"]["get"].is_object());
        assert!(doc["paths"]["/api/products"]["post"].is_object());
        assert!(doc["paths"]["/api/users"]["get"].is_object());
    }

    #[test]
    fn test_query_string_stripped_from_path_key() {
        let endpoints = vec![endpoint(0, "GET", "/api/search?q=laptop", 200)];
        let doc = synthesize_openapi(&endpoints, "t");
        assert!(doc["paths"]["/api/search"]["get"].is_object());
        assert!(doc["paths"].get("/api/search?q=laptop").is_none());
        assert_eq!(
            doc["paths"]["/api/search"]["get"]["summary"],
            "GET /api/search"
        );
    }

    #[test]
    fn test_success_and_error_descriptions() {
        let endpoints = vec![
            endpoint(0, "GET", "/api/products", 200),
            endpoint(1, "POST", "/api/login", 401),
        ];
        let doc = synthesize_openapi(&endpoints, "t");
        assert_eq!(
            doc["paths"]["/api/products"]["get"]["responses"]["200"]["description"],
            "Success"
        );
        assert_eq!(
            doc["paths"]["/api/login"]["post"]["responses"]["401"]["description"],
            "Error"
        );
    }

    #[test]
    fn test_status_299_is_success_300_is_error() {
        let endpoints = vec![
            endpoint(0, "GET", "/api/a", 299),
            endpoint(1, "GET", "/api/b", 300),
        ];
        let doc = synthesize_openapi(&endpoints, "t");
        assert_eq!(
            doc["paths"]["/api/a"]["get"]["responses"]["299"]["description"],
            "Success"
        );
        assert_eq!(
            doc["paths"]["/api/b"]["get"]["responses"]["300"]["description"],
            "Error"
        );
    }

    #[test]
    fn test_last_write_wins_for_same_path_and_method() {
        let endpoints = vec![
            endpoint(0, "GET", "/api/items", 200),
            endpoint(1, "GET", "/api/items", 404),
        ];
        let doc = synthesize_openapi(&endpoints, "t");
        let responses = doc["paths"]["/api/items"]["get"]["responses"]
            .as_object()
            .unwrap();
        // the whole operation was replaced, not merged
        assert_eq!(responses.len(), 1);
        assert_eq!(responses["404"]["description"], "Error");
    }

    #[test]
    fn test_method_lowercased_in_key_uppercased_in_summary() {
        let endpoints = vec![endpoint(0, "delete", "/api/items/1", 200)];
        let doc = synthesize_openapi(&endpoints, "t");
        assert!(doc["paths"]["/api/items/1"]["delete"].is_object());
        assert_eq!(
            doc["paths"]["/api/items/1"]["delete"]["summary"],
            "DELETE /api/items/1"
        );
    }

    #[test]
    fn test_empty_endpoints_give_empty_paths() {
        let doc = synthesize_openapi(&[], "t");
        assert_eq!(doc["paths"], json!({}));
        assert_eq!(doc["openapi"], "3.0.0");
    }
}
