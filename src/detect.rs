use crate::extractor;
use crate::identity::PhotoIdentity;
use log::debug;
use regex::Regex;

/// Snapshot of the page a photo was picked from: its URL and captured
/// markup. Everything the strategies need, nothing live.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub url: String,
    pub html: String,
}

type StrategyFn = fn(&PageContext) -> Option<PhotoIdentity>;

// Tried in order, first valid identity wins. Each strategy is a pure
// function over the context so it can be exercised with synthetic markup.
const STRATEGIES: [(&str, StrategyFn); 3] = [
    ("page-url", detect_from_page_url),
    ("data-attribute", detect_from_data_attribute),
    ("static-image", detect_from_static_image),
];

lazy_static! {
    static ref OG_TITLE: Regex =
        Regex::new(r#"<meta\s+property="og:title"\s+content="([^"]*)""#).unwrap();
    static ref PAGE_TITLE: Regex = Regex::new(r"(?is)<title>(.*?)</title>").unwrap();
    static ref PROVIDER_TITLE_SUFFIX: Regex = Regex::new(r"\s*\|\s*Flickr$").unwrap();
    static ref DATA_PHOTO_ID: Regex = Regex::new(r#"data-photo-id=["'](\d+)["']"#).unwrap();
    static ref URL_USERNAME: Regex = Regex::new(r"/photos/([^/\s?#]+)").unwrap();
    static ref URL_ALBUM: Regex = Regex::new(r"/albums/(\d+)").unwrap();
}

pub fn detect(ctx: &PageContext) -> Option<PhotoIdentity> {
    for (name, strategy) in STRATEGIES {
        if let Some(identity) = strategy(ctx) {
            if identity.is_valid() {
                debug!("detected photo {} via {} strategy", identity.photo_id, name);
                return Some(identity);
            }
        }
    }
    None
}

// Photo pages carry the identity in the URL itself; the markup only
// contributes the title.
fn detect_from_page_url(ctx: &PageContext) -> Option<PhotoIdentity> {
    let mut identity = extractor::from_canonical_url(&ctx.url)?;
    if let Some(title) = page_title(&ctx.html) {
        identity.title = title;
    }
    Some(identity)
}

fn detect_from_data_attribute(ctx: &PageContext) -> Option<PhotoIdentity> {
    let captures = DATA_PHOTO_ID.captures(&ctx.html)?;
    let username = username_from_url(&ctx.url)?;
    let mut identity = PhotoIdentity::new(&captures[1], username);
    identity.album_id = album_from_url(&ctx.url);
    identity.title = extractor::extract_title(&ctx.html).unwrap_or_default();
    Some(identity)
}

fn detect_from_static_image(ctx: &PageContext) -> Option<PhotoIdentity> {
    let asset = extractor::from_static_url(&ctx.html)?;
    debug!(
        "page shows photo {} at the {} tier",
        asset.photo_id, asset.size_key
    );
    let username = username_from_url(&ctx.url)?;
    let mut identity = PhotoIdentity::new(asset.photo_id, username);
    identity.image_secret = Some(asset.secret);
    identity.server_id = Some(asset.server_id);
    identity.album_id = album_from_url(&ctx.url);
    identity.title = extractor::extract_title(&ctx.html).unwrap_or_default();
    Some(identity)
}

fn page_title(html: &str) -> Option<String> {
    let raw = OG_TITLE
        .captures(html)
        .or_else(|| PAGE_TITLE.captures(html))
        .map(|captures| captures[1].to_string())?;
    let title = PROVIDER_TITLE_SUFFIX.replace(raw.trim(), "").into_owned();
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

fn username_from_url(url: &str) -> Option<String> {
    URL_USERNAME
        .captures(url)
        .map(|captures| captures[1].to_string())
}

fn album_from_url(url: &str) -> Option<String> {
    URL_ALBUM
        .captures(url)
        .map(|captures| captures[1].to_string())
}
