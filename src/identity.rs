use serde::{Deserialize, Serialize};

pub const PHOTO_BASE_URL: &str = "https://www.flickr.com";
pub const STATIC_BASE_URL: &str = "https://live.staticflickr.com";

/// Normalized identity of a hosted photo. `image_secret` and `server_id`
/// are opaque provider tokens, only needed to build static asset URLs; the
/// identity is complete without them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoIdentity {
    pub photo_id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_id: Option<String>,
}

impl PhotoIdentity {
    pub fn new(photo_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            photo_id: photo_id.into(),
            username: username.into(),
            ..Self::default()
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.photo_id.is_empty() && !self.username.is_empty()
    }

    /// Canonical photo page URL, the identity-carrying form embedded in
    /// generated markup and passed to the public embed endpoint.
    pub fn canonical_url(&self) -> String {
        match &self.album_id {
            Some(album) => format!(
                "{}/photos/{}/{}/in/album-{}",
                PHOTO_BASE_URL, self.username, self.photo_id, album
            ),
            None => format!("{}/photos/{}/{}", PHOTO_BASE_URL, self.username, self.photo_id),
        }
    }

    /// Browsable page form, with the trailing slash the photo pages use.
    pub fn page_url(&self) -> String {
        format!("{}/", self.canonical_url())
    }

    pub fn display_title(&self) -> String {
        if self.title.is_empty() {
            format!("Photo {}", self.photo_id)
        } else {
            self.title.clone()
        }
    }

    pub fn has_image_data(&self) -> bool {
        self.image_secret.is_some() && self.server_id.is_some()
    }

    /// Static asset URL built by suffix convention. Only possible when the
    /// provider tokens were captured; an empty suffix is the 500px size.
    pub fn static_url(&self, suffix: &str) -> Option<String> {
        let secret = self.image_secret.as_deref()?;
        let server = self.server_id.as_deref()?;
        if suffix.is_empty() {
            Some(format!(
                "{}/{}/{}_{}.jpg",
                STATIC_BASE_URL, server, self.photo_id, secret
            ))
        } else {
            Some(format!(
                "{}/{}/{}_{}_{}.jpg",
                STATIC_BASE_URL, server, self.photo_id, secret, suffix
            ))
        }
    }

    /// 150px square asset, used for list previews.
    pub fn thumbnail_url(&self) -> Option<String> {
        self.static_url("q")
    }
}
