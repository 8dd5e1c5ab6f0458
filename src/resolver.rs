use crate::config;
use crate::identity::PhotoIdentity;
use crate::sizes;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Which resolution path the user prefers. `Auto` only spends an API call
/// when the requested tier actually needs one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MethodPreference {
    #[default]
    Auto,
    Api,
    OembedOnly,
}

impl FromStr for MethodPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "api" => Ok(Self::Api),
            "oembed-only" => Ok(Self::OembedOnly),
            other => Err(format!(
                "unknown method \"{}\" (expected auto, api, or oembed-only)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResolveSettings {
    pub api_key: Option<String>,
    pub method: MethodPreference,
}

impl ResolveSettings {
    fn credential(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }
}

/// Outcome of size resolution: a concrete size to embed, plus a warning
/// when the exact request could not be honored. `html` carries
/// provider-rendered markup when the public endpoint supplied one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSize {
    pub label: String,
    pub source_url: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub requires_api: bool,
    pub warning: Option<String>,
    pub html: Option<String>,
    /// Title reported by the public endpoint, when it had one; more
    /// authoritative than whatever the page scrape captured.
    pub title: Option<String>,
}

/// One entry of the authenticated size-list response. The provider emits
/// dimensions as numbers or numeric strings depending on the size.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSize {
    pub label: String,
    #[serde(default, deserialize_with = "de_dimension")]
    pub width: Option<u32>,
    #[serde(default, deserialize_with = "de_dimension")]
    pub height: Option<u32>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SizesEnvelope {
    stat: String,
    #[serde(default)]
    sizes: Option<SizesPayload>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SizesPayload {
    size: Vec<ApiSize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OembedResponse {
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "de_dimension")]
    pub width: Option<u32>,
    #[serde(default, deserialize_with = "de_dimension")]
    pub height: Option<u32>,
    #[serde(default)]
    pub title: Option<String>,
}

fn de_dimension<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        serde_json::Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    })
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("provider error: {0}")]
    Provider(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Terminal resolution failure: every strategy in the chain either failed
/// or was not applicable. Transport detail stays behind this message.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("could not generate embed: {0}")]
    Exhausted(String),
}

/// The two outbound collaborators, abstracted so tests run without sockets.
pub trait ProviderApi {
    fn photo_sizes(&self, api_key: &str, photo_id: &str) -> Result<Vec<ApiSize>, ApiError>;
    fn oembed(&self, photo_url: &str, max_width: u32) -> Result<OembedResponse, ApiError>;
}

pub struct HttpProviderApi {
    agent: ureq::Agent,
    rest_endpoint: String,
    oembed_endpoint: String,
}

impl HttpProviderApi {
    pub fn new(config: &config::ApiConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        Self {
            agent,
            rest_endpoint: config.rest_endpoint.clone(),
            oembed_endpoint: config.oembed_endpoint.clone(),
        }
    }
}

fn call_error(err: ureq::Error) -> ApiError {
    match err {
        ureq::Error::Status(code, _) => ApiError::Provider(format!("HTTP {}", code)),
        other => ApiError::Network(other.to_string()),
    }
}

impl ProviderApi for HttpProviderApi {
    fn photo_sizes(&self, api_key: &str, photo_id: &str) -> Result<Vec<ApiSize>, ApiError> {
        let response = self
            .agent
            .get(&self.rest_endpoint)
            .query("method", "flickr.photos.getSizes")
            .query("api_key", api_key)
            .query("photo_id", photo_id)
            .query("format", "json")
            .query("nojsoncallback", "1")
            .call()
            .map_err(call_error)?;
        let envelope: SizesEnvelope = response
            .into_json()
            .map_err(|e| ApiError::Malformed(e.to_string()))?;
        if envelope.stat != "ok" {
            return Err(ApiError::Provider(
                envelope.message.unwrap_or_else(|| "unknown error".into()),
            ));
        }
        envelope
            .sizes
            .map(|payload| payload.size)
            .ok_or_else(|| ApiError::Malformed("success envelope without sizes".into()))
    }

    fn oembed(&self, photo_url: &str, max_width: u32) -> Result<OembedResponse, ApiError> {
        let response = self
            .agent
            .get(&self.oembed_endpoint)
            .query("format", "json")
            .query("url", photo_url)
            .query("maxwidth", &max_width.to_string())
            .call()
            .map_err(call_error)?;
        response
            .into_json()
            .map_err(|e| ApiError::Malformed(e.to_string()))
    }
}

#[derive(Debug, Clone, Copy)]
enum Strategy {
    AuthenticatedSizeList,
    PublicEmbed,
}

// Resolution order: strategies run top to bottom until one produces a size.
const STRATEGY_CHAIN: [Strategy; 2] = [Strategy::AuthenticatedSizeList, Strategy::PublicEmbed];

pub struct SizeResolver<'a> {
    client: &'a dyn ProviderApi,
}

impl<'a> SizeResolver<'a> {
    pub fn new(client: &'a dyn ProviderApi) -> Self {
        Self { client }
    }

    /// Resolves a requested tier to a concrete size. "Size not found" is
    /// never an error, only a warning on the best-effort match; this fails
    /// only when every strategy in the chain failed.
    pub fn resolve(
        &self,
        identity: &PhotoIdentity,
        tier_key: &str,
        settings: &ResolveSettings,
    ) -> Result<ResolvedSize, ResolveError> {
        let mut last_failure: Option<ApiError> = None;
        for strategy in STRATEGY_CHAIN {
            match self.try_strategy(strategy, identity, tier_key, settings) {
                Ok(Some(resolved)) => return Ok(resolved),
                Ok(None) => {}
                Err(err) => {
                    warn!(
                        "{:?} failed for photo {}: {}",
                        strategy, identity.photo_id, err
                    );
                    last_failure = Some(err);
                }
            }
        }
        Err(ResolveError::Exhausted(
            last_failure
                .map(|err| err.to_string())
                .unwrap_or_else(|| "no resolution strategy was applicable".into()),
        ))
    }

    fn try_strategy(
        &self,
        strategy: Strategy,
        identity: &PhotoIdentity,
        tier_key: &str,
        settings: &ResolveSettings,
    ) -> Result<Option<ResolvedSize>, ApiError> {
        match strategy {
            Strategy::AuthenticatedSizeList => {
                if !use_authenticated_api(tier_key, settings) {
                    return Ok(None);
                }
                let api_key = match settings.credential() {
                    Some(key) => key,
                    None => return Ok(None),
                };
                let available = self.client.photo_sizes(api_key, &identity.photo_id)?;
                select_from_sizes(tier_key, &available).map(Some)
            }
            Strategy::PublicEmbed => {
                let max_width = sizes::oembed_max_width(tier_key);
                let response = self.client.oembed(&identity.canonical_url(), max_width)?;
                resolved_from_oembed(tier_key, response).map(Some)
            }
        }
    }

    /// Batch-export sizing: picks a size per photo from the authoritative
    /// list when one is reachable, otherwise degrades to the public
    /// endpoint at its default ceiling.
    pub fn best_size_for(
        &self,
        identity: &PhotoIdentity,
        sizing: &ExportSizing,
        settings: &ResolveSettings,
    ) -> Result<ResolvedSize, ResolveError> {
        if let ExportSizing::Tier(key) = sizing {
            return self.resolve(identity, key, settings);
        }

        let available = match settings.credential() {
            Some(api_key) => match self.client.photo_sizes(api_key, &identity.photo_id) {
                Ok(list) => Some(list),
                Err(err) => {
                    debug!(
                        "size list unavailable for photo {}: {}",
                        identity.photo_id, err
                    );
                    None
                }
            },
            None => None,
        };

        let picked = available
            .as_deref()
            .and_then(|list| pick_for_sizing(sizing, list));
        match picked {
            Some(resolved) => Ok(resolved),
            None => {
                let mut resolved = self.resolve(identity, "large1024", settings)?;
                resolved
                    .warning
                    .get_or_insert_with(|| "size list unavailable, using public embed (1024px max)".into());
                Ok(resolved)
            }
        }
    }
}

// The strict two-factor decision: a preference signal and credentials, or
// the authenticated path stays cold.
fn use_authenticated_api(tier_key: &str, settings: &ResolveSettings) -> bool {
    let has_credentials = settings.credential().is_some();
    match settings.method {
        MethodPreference::Api => has_credentials,
        MethodPreference::Auto => has_credentials && sizes::requires_api(tier_key),
        MethodPreference::OembedOnly => false,
    }
}

fn select_from_sizes(tier_key: &str, available: &[ApiSize]) -> Result<ResolvedSize, ApiError> {
    let requested_label = sizes::find(tier_key)
        .map(|tier| tier.api_label)
        .unwrap_or(tier_key);
    if let Some(exact) = available.iter().find(|s| s.label == requested_label) {
        return Ok(from_api_size(exact, None));
    }

    // Closest size not exceeding the catalog target, else smallest
    // available. Providers withhold some sizes per key, so this tie-break
    // keeps output reproducible.
    let mut ordered: Vec<&ApiSize> = available.iter().collect();
    ordered.sort_by(|a, b| b.width.unwrap_or(0).cmp(&a.width.unwrap_or(0)));
    let target = sizes::target_width(tier_key);
    let selected = ordered
        .iter()
        .find(|s| s.width.unwrap_or(0) <= target)
        .copied()
        .or_else(|| ordered.last().copied())
        .ok_or_else(|| ApiError::Malformed("empty size list".into()))?;

    let warning = format!(
        "exact size \"{}\" not available, using {} ({}x{})",
        requested_label,
        selected.label,
        selected.width.unwrap_or(0),
        selected.height.unwrap_or(0)
    );
    Ok(from_api_size(selected, Some(warning)))
}

fn from_api_size(size: &ApiSize, warning: Option<String>) -> ResolvedSize {
    ResolvedSize {
        label: size.label.clone(),
        source_url: size.source.clone(),
        width: size.width,
        height: size.height,
        requires_api: sizes::label_requires_api(&size.label),
        warning,
        html: None,
        title: None,
    }
}

fn resolved_from_oembed(
    tier_key: &str,
    response: OembedResponse,
) -> Result<ResolvedSize, ApiError> {
    if response.html.is_none() && response.url.is_none() {
        return Err(ApiError::Malformed(
            "response carried neither html nor image data".into(),
        ));
    }
    let label = sizes::find(tier_key)
        .map(|tier| tier.label.to_string())
        .unwrap_or_else(|| "Large".into());
    Ok(ResolvedSize {
        label,
        source_url: response.url,
        width: response.width,
        height: response.height,
        requires_api: false,
        warning: None,
        html: response.html,
        title: response.title,
    })
}

/// Sizing strategy for batch export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportSizing {
    LargestAvailable,
    KeepOriginal,
    ConsistentMax(u32),
    Tier(String),
}

impl ExportSizing {
    pub fn parse(s: &str) -> Self {
        match s {
            "largest-available" => Self::LargestAvailable,
            "keep-original" => Self::KeepOriginal,
            "consistent-max" => Self::ConsistentMax(sizes::FALLBACK_WIDTH),
            other => match other.strip_prefix("consistent-").and_then(|v| v.parse().ok()) {
                Some(px) => Self::ConsistentMax(px),
                None => Self::Tier(other.to_string()),
            },
        }
    }
}

fn area(size: &ApiSize) -> u64 {
    size.width.unwrap_or(0) as u64 * size.height.unwrap_or(0) as u64
}

fn pick_for_sizing(sizing: &ExportSizing, available: &[ApiSize]) -> Option<ResolvedSize> {
    match sizing {
        ExportSizing::KeepOriginal => {
            if let Some(exact) = available.iter().find(|s| s.label == "Original") {
                return Some(from_api_size(exact, None));
            }
            available.iter().max_by_key(|s| area(s)).map(|largest| {
                from_api_size(
                    largest,
                    Some("Original size not available, using largest available".into()),
                )
            })
        }
        ExportSizing::LargestAvailable => available
            .iter()
            .max_by_key(|s| area(s))
            .map(|largest| from_api_size(largest, None)),
        ExportSizing::ConsistentMax(px) => {
            let best_fit = available
                .iter()
                .filter(|s| s.width.is_some() && s.height.is_some())
                .filter(|s| s.width.unwrap_or(0).max(s.height.unwrap_or(0)) <= *px)
                .max_by_key(|s| area(s));
            match best_fit {
                Some(best) => Some(from_api_size(best, None)),
                None => available.iter().min_by_key(|s| area(s)).map(|smallest| {
                    from_api_size(
                        smallest,
                        Some(format!(
                            "no size within {}px, using {}",
                            px, smallest.label
                        )),
                    )
                }),
            }
        }
        // Handled by the caller before the list is fetched.
        ExportSizing::Tier(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct StubApi {
        sizes: Option<Vec<ApiSize>>,
        oembed: Option<OembedResponse>,
        sizes_calls: RefCell<u32>,
        oembed_calls: RefCell<u32>,
    }

    impl StubApi {
        fn new(sizes: Option<Vec<ApiSize>>, oembed: Option<OembedResponse>) -> Self {
            Self {
                sizes,
                oembed,
                sizes_calls: RefCell::new(0),
                oembed_calls: RefCell::new(0),
            }
        }
    }

    impl ProviderApi for StubApi {
        fn photo_sizes(&self, _api_key: &str, _photo_id: &str) -> Result<Vec<ApiSize>, ApiError> {
            *self.sizes_calls.borrow_mut() += 1;
            self.sizes
                .clone()
                .ok_or_else(|| ApiError::Network("connection refused".into()))
        }

        fn oembed(&self, _photo_url: &str, _max_width: u32) -> Result<OembedResponse, ApiError> {
            *self.oembed_calls.borrow_mut() += 1;
            self.oembed
                .clone()
                .ok_or_else(|| ApiError::Provider("HTTP 404".into()))
        }
    }

    fn api_size(label: &str, width: u32, height: u32) -> ApiSize {
        ApiSize {
            label: label.into(),
            width: Some(width),
            height: Some(height),
            source: Some(format!("https://live.staticflickr.com/1/{}.jpg", width)),
        }
    }

    fn oembed_html() -> OembedResponse {
        OembedResponse {
            html: Some("<a>provider markup</a>".into()),
            ..OembedResponse::default()
        }
    }

    fn settings(api_key: Option<&str>, method: MethodPreference) -> ResolveSettings {
        ResolveSettings {
            api_key: api_key.map(|k| k.to_string()),
            method,
        }
    }

    #[test]
    fn auto_without_credentials_never_touches_the_api() {
        let stub = StubApi::new(Some(vec![api_size("Large", 1024, 768)]), Some(oembed_html()));
        let resolver = SizeResolver::new(&stub);
        let identity = PhotoIdentity::new("123", "alice");
        let resolved = resolver
            .resolve(&identity, "large1024", &settings(None, MethodPreference::Auto))
            .unwrap();
        assert_eq!(*stub.sizes_calls.borrow(), 0);
        assert!(!resolved.requires_api);
        assert_eq!(resolved.html.as_deref(), Some("<a>provider markup</a>"));
    }

    #[test]
    fn auto_with_credentials_skips_api_for_public_tier() {
        let stub = StubApi::new(Some(vec![api_size("Large", 1024, 768)]), Some(oembed_html()));
        let resolver = SizeResolver::new(&stub);
        let identity = PhotoIdentity::new("123", "alice");
        resolver
            .resolve(&identity, "medium640", &settings(Some("key"), MethodPreference::Auto))
            .unwrap();
        assert_eq!(*stub.sizes_calls.borrow(), 0);
        assert_eq!(*stub.oembed_calls.borrow(), 1);
    }

    #[test]
    fn oembed_only_ignores_credentials() {
        let stub = StubApi::new(Some(vec![api_size("Original", 6000, 4000)]), Some(oembed_html()));
        let resolver = SizeResolver::new(&stub);
        let identity = PhotoIdentity::new("123", "alice");
        resolver
            .resolve(
                &identity,
                "original",
                &settings(Some("key"), MethodPreference::OembedOnly),
            )
            .unwrap();
        assert_eq!(*stub.sizes_calls.borrow(), 0);
    }

    #[test]
    fn exact_label_match_has_no_warning() {
        let stub = StubApi::new(
            Some(vec![api_size("Large 2048", 2048, 1365), api_size("Medium", 500, 333)]),
            None,
        );
        let resolver = SizeResolver::new(&stub);
        let identity = PhotoIdentity::new("123", "alice");
        let resolved = resolver
            .resolve(&identity, "large2k", &settings(Some("key"), MethodPreference::Auto))
            .unwrap();
        assert_eq!(resolved.label, "Large 2048");
        assert!(resolved.requires_api);
        assert_eq!(resolved.warning, None);
    }

    #[test]
    fn missing_original_picks_closest_below_target_with_warning() {
        let stub = StubApi::new(
            Some(vec![
                api_size("Medium", 500, 333),
                api_size("Large 2048", 2048, 1365),
                api_size("Large", 1024, 683),
            ]),
            None,
        );
        let resolver = SizeResolver::new(&stub);
        let identity = PhotoIdentity::new("123", "alice");
        let resolved = resolver
            .resolve(&identity, "original", &settings(Some("key"), MethodPreference::Auto))
            .unwrap();
        assert_eq!(*stub.sizes_calls.borrow(), 1);
        assert_eq!(resolved.label, "Large 2048");
        assert!(resolved.warning.as_deref().unwrap_or("").contains("Large 2048"));
    }

    #[test]
    fn nothing_below_target_picks_smallest_available() {
        let stub = StubApi::new(
            Some(vec![api_size("Large 2048", 2048, 1365), api_size("Large", 1024, 683)]),
            None,
        );
        let resolver = SizeResolver::new(&stub);
        let identity = PhotoIdentity::new("123", "alice");
        // Thumbnail targets 100px; neither size fits, so the smallest wins.
        let resolved = resolver
            .resolve(&identity, "thumbnail", &settings(Some("key"), MethodPreference::Api))
            .unwrap();
        assert_eq!(resolved.label, "Large");
        assert!(resolved.warning.is_some());
    }

    #[test]
    fn api_failure_falls_back_to_oembed() {
        let stub = StubApi::new(None, Some(oembed_html()));
        let resolver = SizeResolver::new(&stub);
        let identity = PhotoIdentity::new("123", "alice");
        let resolved = resolver
            .resolve(&identity, "original", &settings(Some("key"), MethodPreference::Auto))
            .unwrap();
        assert_eq!(*stub.sizes_calls.borrow(), 1);
        assert_eq!(*stub.oembed_calls.borrow(), 1);
        assert!(resolved.html.is_some());
    }

    #[test]
    fn both_paths_failing_is_terminal() {
        let stub = StubApi::new(None, None);
        let resolver = SizeResolver::new(&stub);
        let identity = PhotoIdentity::new("123", "alice");
        let err = resolver
            .resolve(&identity, "original", &settings(Some("key"), MethodPreference::Auto))
            .unwrap_err();
        assert!(err.to_string().starts_with("could not generate embed"));
    }

    #[test]
    fn structured_oembed_payload_synthesizes_a_size() {
        let stub = StubApi::new(
            None,
            Some(OembedResponse {
                html: None,
                url: Some("https://live.staticflickr.com/1/x.jpg".into()),
                width: Some(500),
                height: Some(333),
                title: Some("Sunset".into()),
            }),
        );
        let resolver = SizeResolver::new(&stub);
        let identity = PhotoIdentity::new("123", "alice");
        let resolved = resolver
            .resolve(&identity, "medium500", &settings(None, MethodPreference::Auto))
            .unwrap();
        assert_eq!(resolved.label, "Medium (500px)");
        assert_eq!(resolved.width, Some(500));
        assert!(resolved.html.is_none());
        assert!(!resolved.requires_api);
    }

    #[test]
    fn oembed_html_survives_resolution_and_synthesis_unchanged() {
        let stub = StubApi::new(
            None,
            Some(OembedResponse {
                html: Some(r#"<a href="https://www.flickr.com/photos/alice/123">x</a>"#.into()),
                ..OembedResponse::default()
            }),
        );
        let resolver = SizeResolver::new(&stub);
        let identity = PhotoIdentity::new("123", "alice");
        let resolved = resolver
            .resolve(&identity, "medium500", &settings(None, MethodPreference::Auto))
            .unwrap();
        assert_eq!(
            crate::embed::build_embed(&identity, &resolved),
            r#"<a href="https://www.flickr.com/photos/alice/123">x</a>"#
        );
    }

    #[test]
    fn dimensions_deserialize_from_strings_and_numbers() {
        let size: ApiSize = serde_json::from_str(
            r#"{"label":"Large","width":"1024","height":683,"source":"https://x/y.jpg"}"#,
        )
        .unwrap();
        assert_eq!(size.width, Some(1024));
        assert_eq!(size.height, Some(683));

        let size: ApiSize =
            serde_json::from_str(r#"{"label":"Odd","width":"not a number"}"#).unwrap();
        assert_eq!(size.width, None);
    }

    #[test]
    fn export_sizing_parse_forms() {
        assert_eq!(ExportSizing::parse("largest-available"), ExportSizing::LargestAvailable);
        assert_eq!(ExportSizing::parse("keep-original"), ExportSizing::KeepOriginal);
        assert_eq!(ExportSizing::parse("consistent-max"), ExportSizing::ConsistentMax(1024));
        assert_eq!(ExportSizing::parse("consistent-1600"), ExportSizing::ConsistentMax(1600));
        assert_eq!(
            ExportSizing::parse("large2k"),
            ExportSizing::Tier("large2k".into())
        );
    }

    #[test]
    fn keep_original_prefers_exact_then_largest() {
        let with_original = vec![api_size("Original", 6000, 4000), api_size("Large", 1024, 683)];
        let picked = pick_for_sizing(&ExportSizing::KeepOriginal, &with_original).unwrap();
        assert_eq!(picked.label, "Original");
        assert_eq!(picked.warning, None);

        let without = vec![api_size("Large 2048", 2048, 1365), api_size("Large", 1024, 683)];
        let picked = pick_for_sizing(&ExportSizing::KeepOriginal, &without).unwrap();
        assert_eq!(picked.label, "Large 2048");
        assert!(picked.warning.is_some());
    }

    #[test]
    fn consistent_max_filters_then_falls_back_to_smallest() {
        let available = vec![
            api_size("Large 2048", 2048, 1365),
            api_size("Large", 1024, 683),
            api_size("Medium", 500, 333),
        ];
        let picked = pick_for_sizing(&ExportSizing::ConsistentMax(1024), &available).unwrap();
        assert_eq!(picked.label, "Large");

        let picked = pick_for_sizing(&ExportSizing::ConsistentMax(100), &available).unwrap();
        assert_eq!(picked.label, "Medium");
        assert!(picked.warning.is_some());
    }

    #[test]
    fn best_size_without_credentials_degrades_to_public_embed() {
        let stub = StubApi::new(None, Some(oembed_html()));
        let resolver = SizeResolver::new(&stub);
        let identity = PhotoIdentity::new("123", "alice");
        let resolved = resolver
            .best_size_for(
                &identity,
                &ExportSizing::LargestAvailable,
                &settings(None, MethodPreference::Auto),
            )
            .unwrap();
        assert_eq!(*stub.sizes_calls.borrow(), 0);
        assert!(resolved.warning.is_some());
        assert!(resolved.html.is_some());
    }
}
