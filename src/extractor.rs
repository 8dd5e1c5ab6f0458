use crate::identity::PhotoIdentity;
use crate::sizes;
use regex::Regex;

// Pattern lists are additive: collections hold embed HTML generated by
// older releases, so every shape that ever produced a match must keep
// matching. Append new patterns, never remove or reorder existing ones.
lazy_static! {
    static ref EMBED_URL_PATTERNS: Vec<Regex> = vec![
        // Synthesized markup, double-quoted href.
        Regex::new(
            r#"href="https://www\.flickr\.com/photos/([^/"]+)/(\d+)(?:/in/album-([^"/]+))?/?""#
        )
        .unwrap(),
        // Provider markup occasionally single-quotes attributes.
        Regex::new(
            r#"href='https://www\.flickr\.com/photos/([^/']+)/(\d+)(?:/in/album-([^'/]+))?/?'"#
        )
        .unwrap(),
        // Widget-style markup carries the page URL in data-url.
        Regex::new(
            r#"data-url=["']https://www\.flickr\.com/photos/([^/"']+)/(\d+)(?:/in/album-([^"'/]+))?/?["']"#
        )
        .unwrap(),
        // Bare URL anywhere in the fragment, with or without the www host.
        Regex::new(
            r#"https?://(?:www\.)?flickr\.com/photos/([^/\s"'<>]+)/(\d+)(?:/in/album-([^/\s"'<>]+))?"#
        )
        .unwrap(),
    ];
    static ref TITLE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r#"alt="([^"]+)""#).unwrap(),
        Regex::new(r#"title="([^"]+)""#).unwrap(),
        Regex::new(r#"data-title="([^"]+)""#).unwrap(),
    ];
    static ref CANONICAL_URL: Regex = Regex::new(
        r#"/photos/([^/\s?#]+)/(\d+)(?:/in/album-([^/\s?#]+))?"#
    )
    .unwrap();
    static ref STATIC_URL: Regex = Regex::new(
        r#"staticflickr\.com/(\d+)/(\d+)_([a-zA-Z0-9]+)(?:_([a-z0-9]+))?\.jpg"#
    )
    .unwrap();
}

/// Components of a static asset URL: enough to rebuild thumbnails but not
/// a full identity (the asset form carries no username).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticImageRef {
    pub server_id: String,
    pub photo_id: String,
    pub secret: String,
    pub size_key: &'static str,
}

/// Parses the provider's canonical photo page URL. Returns `None` rather
/// than guessing when no pattern matches.
pub fn from_canonical_url(url: &str) -> Option<PhotoIdentity> {
    let captures = CANONICAL_URL.captures(url)?;
    let mut identity = PhotoIdentity::new(&captures[2], &captures[1]);
    identity.album_id = captures.get(3).map(|m| m.as_str().to_string());
    if identity.is_valid() {
        Some(identity)
    } else {
        None
    }
}

/// Recovers an identity from embed HTML, trying each URL pattern in order
/// and taking the first match. Title recovery is best-effort over an
/// ordered attribute list.
pub fn from_embed_html(html: &str) -> Option<PhotoIdentity> {
    for pattern in EMBED_URL_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(html) {
            let mut identity = PhotoIdentity::new(&captures[2], &captures[1]);
            identity.album_id = captures.get(3).map(|m| m.as_str().to_string());
            identity.title = extract_title(html).unwrap_or_default();
            if identity.is_valid() {
                return Some(identity);
            }
        }
    }
    None
}

/// First non-empty title among the candidate attributes.
pub fn extract_title(html: &str) -> Option<String> {
    for pattern in TITLE_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(html) {
            let title = unescape_attr(&captures[1]);
            let title = title.trim();
            if !title.is_empty() {
                return Some(title.to_string());
            }
        }
    }
    None
}

/// Parses the static asset URL form `{server}/{photo}_{secret}[_{suffix}].jpg`.
pub fn from_static_url(src: &str) -> Option<StaticImageRef> {
    let captures = STATIC_URL.captures(src)?;
    let suffix = captures.get(4).map(|m| m.as_str()).unwrap_or("");
    Some(StaticImageRef {
        server_id: captures[1].to_string(),
        photo_id: captures[2].to_string(),
        secret: captures[3].to_string(),
        size_key: sizes::suffix_to_key(suffix).unwrap_or("large1024"),
    })
}

// Inverse of the synthesizer's attribute escaping; &amp; must come last.
fn unescape_attr(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_url_with_and_without_album() {
        let identity = from_canonical_url("https://www.flickr.com/photos/alice/123").unwrap();
        assert_eq!(identity.photo_id, "123");
        assert_eq!(identity.username, "alice");
        assert_eq!(identity.album_id, None);

        let identity =
            from_canonical_url("https://www.flickr.com/photos/alice/123/in/album-987/").unwrap();
        assert_eq!(identity.album_id.as_deref(), Some("987"));
    }

    #[test]
    fn canonical_url_rejects_non_photo_urls() {
        assert_eq!(from_canonical_url("https://www.flickr.com/groups/birds"), None);
        assert_eq!(from_canonical_url("not a url"), None);
    }

    #[test]
    fn embed_html_double_quoted_href() {
        let html = r#"<a data-flickr-embed="true" href="https://www.flickr.com/photos/alice/123" title="Sunset"><img src="https://live.staticflickr.com/65535/123_abc_b.jpg" width="1024" height="768" alt="Sunset"/></a>"#;
        let identity = from_embed_html(html).unwrap();
        assert_eq!(identity.photo_id, "123");
        assert_eq!(identity.username, "alice");
        assert_eq!(identity.title, "Sunset");
    }

    #[test]
    fn embed_html_single_quoted_and_data_url_variants() {
        let single = "<a href='https://www.flickr.com/photos/bob/456/in/album-11'>x</a>";
        let identity = from_embed_html(single).unwrap();
        assert_eq!(identity.username, "bob");
        assert_eq!(identity.album_id.as_deref(), Some("11"));

        let widget = r#"<div data-url="https://www.flickr.com/photos/carol/789"></div>"#;
        let identity = from_embed_html(widget).unwrap();
        assert_eq!(identity.username, "carol");
        assert_eq!(identity.photo_id, "789");
    }

    #[test]
    fn embed_html_bare_url_fallback() {
        let text = "see https://flickr.com/photos/dave/321 for the shot";
        let identity = from_embed_html(text).unwrap();
        assert_eq!(identity.username, "dave");
        assert_eq!(identity.photo_id, "321");
    }

    #[test]
    fn title_prefers_alt_then_title_then_data_title() {
        assert_eq!(
            extract_title(r#"<img alt="Alt title" title="Other"/>"#).as_deref(),
            Some("Alt title")
        );
        assert_eq!(
            extract_title(r#"<a title="Anchor title">x</a>"#).as_deref(),
            Some("Anchor title")
        );
        assert_eq!(
            extract_title(r#"<div data-title="Data title"></div>"#).as_deref(),
            Some("Data title")
        );
        assert_eq!(extract_title("<p>nothing here</p>"), None);
    }

    #[test]
    fn title_unescapes_attribute_entities() {
        assert_eq!(
            extract_title(r#"<img alt="Salt &amp; Pepper &quot;close up&quot;"/>"#).as_deref(),
            Some(r#"Salt & Pepper "close up""#)
        );
    }

    #[test]
    fn static_url_parses_suffix_and_bare_forms() {
        let parsed =
            from_static_url("https://live.staticflickr.com/65535/123_abc123_k.jpg").unwrap();
        assert_eq!(parsed.server_id, "65535");
        assert_eq!(parsed.photo_id, "123");
        assert_eq!(parsed.secret, "abc123");
        assert_eq!(parsed.size_key, "large2k");

        let bare = from_static_url("https://live.staticflickr.com/65535/123_abc123.jpg").unwrap();
        assert_eq!(bare.size_key, "medium500");

        assert_eq!(from_static_url("https://example.com/photo.jpg"), None);
    }
}
