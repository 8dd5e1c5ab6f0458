use crate::identity::PhotoIdentity;
use crate::resolver::ResolvedSize;
use crate::sizes;
use regex::Regex;

/// Asynchronous loader the provider expects after its embed markup.
pub const EMBED_SCRIPT_TAG: &str =
    r#"<script async src="//embedr.flickr.com/assets/client-code.js" charset="utf-8"></script>"#;

lazy_static! {
    static ref SCRIPT_TAG: Regex = Regex::new(r"(?is)<script[^>]*>.*?</script>").unwrap();
}

/// Builds the embed snippet for one photo. Provider-returned HTML is the
/// preferred form and passes through unchanged; everything else gets the
/// fixed anchor-wrapping-image shape, which the extractor parses back.
pub fn build_embed(identity: &PhotoIdentity, resolved: &ResolvedSize) -> String {
    if let Some(html) = &resolved.html {
        return html.clone();
    }

    // The provider's own title beats the scraped one when both exist.
    let title_text = resolved
        .title
        .clone()
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| identity.display_title());
    let title = escape_attr(&title_text);
    let src = resolved
        .source_url
        .clone()
        .or_else(|| source_by_convention(identity, resolved))
        .unwrap_or_default();

    let mut out = String::new();
    out.push_str(&format!(
        r#"<a data-flickr-embed="true" href="{}" title="{}">"#,
        identity.canonical_url(),
        title
    ));
    out.push_str(&format!(r#"<img src="{}""#, src));
    if let Some(width) = resolved.width {
        out.push_str(&format!(r#" width="{}""#, width));
    }
    if let Some(height) = resolved.height {
        out.push_str(&format!(r#" height="{}""#, height));
    }
    out.push_str(&format!(r#" alt="{}"/></a>"#, title));
    out.push_str(EMBED_SCRIPT_TAG);
    out
}

// Pure-URL-by-convention flow: no source URL in the resolution, but the
// identity carries the provider tokens that determine the asset URL.
fn source_by_convention(identity: &PhotoIdentity, resolved: &ResolvedSize) -> Option<String> {
    let tier = sizes::TIERS
        .iter()
        .find(|t| t.api_label == resolved.label || t.label == resolved.label)?;
    identity.static_url(tier.suffix)
}

/// Concatenates embeds for batch export. The loader tag is stripped from
/// every individual entry and appended exactly once at the end when
/// requested.
pub fn build_batch_output(embeds: &[String], include_script_tag: bool, separator: &str) -> String {
    let stripped: Vec<String> = embeds
        .iter()
        .map(|embed| strip_script_tags(embed))
        .collect();
    let mut out = stripped.join(separator);
    if include_script_tag && !out.is_empty() {
        out.push_str(separator);
        out.push_str(EMBED_SCRIPT_TAG);
    }
    out
}

/// Shareable page URLs, one per line (or blank-line separated).
pub fn build_url_list(identities: &[PhotoIdentity], separator: &str) -> String {
    identities
        .iter()
        .map(|identity| identity.page_url())
        .collect::<Vec<_>>()
        .join(separator)
}

pub fn strip_script_tags(html: &str) -> String {
    SCRIPT_TAG.replace_all(html, "").into_owned()
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
