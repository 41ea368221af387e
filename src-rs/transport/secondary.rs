use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE,
};
use reqwest::{Client, StatusCode, Url};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::classify::GeoTaskEndpoint;
use super::types::{ApiError, HttpMethod, LogicalRequest};
use crate::config::SessionToken;

/// Header carrying the host application's session credential.
pub const SESSION_HEADER: &str = "X-Metabase-Session";

const CORS_HINT: &str = "Geo Task service refused the request (HTTP 403) and sent no \
Access-Control-Allow-Origin header: allow this origin in the service's CORS settings \
and make sure it accepts the X-Metabase-Session header";

/// Direct cross-origin transport to the Geo Task service.
pub struct GeoTaskServiceTransport {
    origin: String,
    session: Option<SessionToken>,
    client: Client,
}

impl GeoTaskServiceTransport {
    pub fn new(origin: &str, session: Option<SessionToken>) -> Result<Self, ApiError> {
        if origin.trim().is_empty() {
            return Err(ApiError::Config("secondary origin is empty".to_string()));
        }
        // No cookie store: cookies never travel to this origin.
        let client = Client::builder()
            .build()
            .map_err(|err| ApiError::Config(err.to_string()))?;
        Ok(Self {
            origin: origin.to_string(),
            session,
            client,
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub async fn send(
        &self,
        method: HttpMethod,
        endpoint: GeoTaskEndpoint,
        request: &LogicalRequest,
    ) -> Result<Value, ApiError> {
        let url = build_url(&self.origin, endpoint, request.params.as_ref())?;
        let headers = build_headers(method, self.session.as_ref());
        debug!(%method, %url, "geo task request");

        let mut builder = self
            .client
            .request(method.to_reqwest(), url.clone())
            .headers(headers);
        if method != HttpMethod::Get {
            if let Some(body) = &request.body {
                builder = builder.body(body.to_string());
            }
        }

        let resp = builder.send().await.map_err(|err| {
            warn!(%method, %url, error = %err, "geo task request did not complete");
            ApiError::network(err)
        })?;

        let status = resp.status();
        if !status.is_success() {
            let has_cors = resp.headers().contains_key(ACCESS_CONTROL_ALLOW_ORIGIN);
            let data = resp.text().await.unwrap_or_default();
            warn!(%method, %url, status = status.as_u16(), "geo task request rejected");
            return Err(ApiError::Transport {
                status: status.as_u16(),
                data,
                message: error_message(status, has_cors),
            });
        }

        let body = resp.text().await.map_err(ApiError::network)?;
        decode_body(&body)
    }
}

/// Absolute URL for `endpoint`; list params become the query string.
pub fn build_url(
    origin: &str,
    endpoint: GeoTaskEndpoint,
    params: Option<&Map<String, Value>>,
) -> Result<Url, ApiError> {
    let raw = format!("{}{}", origin.trim_end_matches('/'), endpoint.path());
    let mut url = Url::parse(&raw).map_err(|err| ApiError::Config(format!("{}: {}", raw, err)))?;
    if endpoint.carries_query() {
        let pairs = params.map(query_pairs).unwrap_or_default();
        if !pairs.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in &pairs {
                query.append_pair(key, value);
            }
        }
    }
    Ok(url)
}

/// Non-null params, stringified, in insertion order. Params are expected to
/// be scalars; arrays join their elements with `,` and objects fall back to
/// their JSON text.
pub fn query_pairs(params: &Map<String, Value>) -> Vec<(String, String)> {
    params
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.clone(), query_value(value)))
        .collect()
}

fn query_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Array(items) => items.iter().map(query_value).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

/// `Content-Type` is left off GET so the browser-equivalent call stays a
/// simple request with no preflight.
pub fn build_headers(method: HttpMethod, session: Option<&SessionToken>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if method != HttpMethod::Get {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
    if let Some(token) = session {
        headers.insert(HeaderName::from_static("x-metabase-session"), token.header_value());
    }
    headers
}

pub fn error_message(status: StatusCode, has_cors_header: bool) -> String {
    if status == StatusCode::FORBIDDEN && !has_cors_header {
        return CORS_HINT.to_string();
    }
    format!("Geo Task service responded with HTTP {}", status.as_u16())
}

fn decode_body(body: &str) -> Result<Value, ApiError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|err| ApiError::Decode(err.to_string()))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn params(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn list_url_keeps_param_insertion_order() {
        let params = params(json!({"page": 2, "page_size": 20, "enabled": true}));
        let url = build_url("http://localhost:8000", GeoTaskEndpoint::List, Some(&params)).unwrap();
        assert_eq!(url.query(), Some("page=2&page_size=20&enabled=true"));
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/geo-task/list?page=2&page_size=20&enabled=true"
        );
    }

    #[test]
    fn list_url_skips_null_params_and_encodes_values() {
        let params = params(json!({"page": 1, "platform_id": null, "usr_company_id": "a b&c"}));
        let url = build_url("https://x/", GeoTaskEndpoint::List, Some(&params)).unwrap();
        assert_eq!(url.as_str(), "https://x/api/geo-task/list?page=1&usr_company_id=a+b%26c");
    }

    #[test]
    fn array_params_join_their_elements() {
        let params = params(json!({"ids": ["a", 2, null, true], "tag": ["solo"], "page": 1}));
        assert_eq!(
            query_pairs(&params),
            vec![
                ("ids".to_string(), "a,2,,true".to_string()),
                ("tag".to_string(), "solo".to_string()),
                ("page".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn list_url_without_params_has_no_query() {
        let url = build_url("https://x", GeoTaskEndpoint::List, None).unwrap();
        assert_eq!(url.as_str(), "https://x/api/geo-task/list");
    }

    #[test]
    fn non_list_endpoints_ignore_params() {
        let params = params(json!({"page": 1}));
        let url = build_url("https://x", GeoTaskEndpoint::Execute, Some(&params)).unwrap();
        assert_eq!(url.as_str(), "https://x/api/geo-task/execute");
    }

    #[test]
    fn invalid_origin_is_a_config_error() {
        let err = build_url("not a url", GeoTaskEndpoint::Add, None).unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[rstest]
    #[case(HttpMethod::Get, false)]
    #[case(HttpMethod::Post, true)]
    #[case(HttpMethod::Put, true)]
    #[case(HttpMethod::Delete, true)]
    fn content_type_only_on_non_get(#[case] method: HttpMethod, #[case] expected: bool) {
        let headers = build_headers(method, None);
        assert_eq!(headers.contains_key(CONTENT_TYPE), expected);
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/json");
    }

    #[test]
    fn session_header_attached_when_present() {
        let token = SessionToken::new("sess-1").unwrap();
        let headers = build_headers(HttpMethod::Get, Some(&token));
        assert_eq!(headers.get(SESSION_HEADER).unwrap(), "sess-1");
        assert!(build_headers(HttpMethod::Get, None).get(SESSION_HEADER).is_none());
    }

    #[test]
    fn forbidden_without_cors_header_gets_hint() {
        let message = error_message(StatusCode::FORBIDDEN, false);
        assert!(message.contains("Access-Control-Allow-Origin"));
        let plain = error_message(StatusCode::FORBIDDEN, true);
        assert_eq!(plain, "Geo Task service responded with HTTP 403");
        let other = error_message(StatusCode::INTERNAL_SERVER_ERROR, false);
        assert_eq!(other, "Geo Task service responded with HTTP 500");
    }

    #[test]
    fn empty_success_body_decodes_to_null() {
        assert_eq!(decode_body("").unwrap(), Value::Null);
        assert!(matches!(decode_body("<html>"), Err(ApiError::Decode(_))));
    }

    #[test]
    fn rejects_empty_origin() {
        assert!(matches!(
            GeoTaskServiceTransport::new(" ", None),
            Err(ApiError::Config(_))
        ));
    }
}
