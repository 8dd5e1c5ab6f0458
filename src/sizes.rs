/// One entry in the fixed size catalog.
///
/// `suffix` is the static-asset URL code; `api_label` is the label the
/// authenticated size-list endpoint uses for the same tier. The two differ
/// for historical provider reasons and neither can be derived from the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeTier {
    pub key: &'static str,
    pub label: &'static str,
    pub suffix: &'static str,
    pub target_width_px: u32,
    pub api_label: &'static str,
    pub oembed_max_width: u32,
    pub requires_api: bool,
}

/// Width assumed when a caller asks about a tier the catalog does not know.
/// Callers rely on this default instead of failing.
pub const FALLBACK_WIDTH: u32 = 1024;

// Ordered largest to smallest by convention; lookups are by key.
// The first seven tiers carry per-photo unique access tokens and are only
// reachable through the authenticated API.
pub static TIERS: [SizeTier; 16] = [
    SizeTier {
        key: "original",
        label: "Original",
        suffix: "o",
        target_width_px: 10000,
        api_label: "Original",
        oembed_max_width: 6000,
        requires_api: true,
    },
    SizeTier {
        key: "large6k",
        label: "Extra Large (6144px)",
        suffix: "6k",
        target_width_px: 6144,
        api_label: "Extra Large 6144",
        oembed_max_width: 6144,
        requires_api: true,
    },
    SizeTier {
        key: "large5k",
        label: "Extra Large (5120px)",
        suffix: "5k",
        target_width_px: 5120,
        api_label: "Extra Large 5120",
        oembed_max_width: 5120,
        requires_api: true,
    },
    SizeTier {
        key: "large4k",
        label: "Extra Large (4096px)",
        suffix: "4k",
        target_width_px: 4096,
        api_label: "Extra Large 4096",
        oembed_max_width: 4096,
        requires_api: true,
    },
    SizeTier {
        key: "large3k",
        label: "Extra Large (3072px)",
        suffix: "3k",
        target_width_px: 3072,
        api_label: "Extra Large 3072",
        oembed_max_width: 3072,
        requires_api: true,
    },
    SizeTier {
        key: "large2k",
        label: "Large (2048px)",
        suffix: "k",
        target_width_px: 2048,
        api_label: "Large 2048",
        oembed_max_width: 2048,
        requires_api: true,
    },
    SizeTier {
        key: "large1600",
        label: "Large (1600px)",
        suffix: "h",
        target_width_px: 1600,
        api_label: "Large 1600",
        oembed_max_width: 1600,
        requires_api: true,
    },
    SizeTier {
        key: "large1024",
        label: "Large (1024px)",
        suffix: "b",
        target_width_px: 1024,
        api_label: "Large",
        oembed_max_width: 1024,
        requires_api: false,
    },
    SizeTier {
        key: "medium800",
        label: "Medium (800px)",
        suffix: "c",
        target_width_px: 800,
        api_label: "Medium 800",
        oembed_max_width: 800,
        requires_api: false,
    },
    SizeTier {
        key: "medium640",
        label: "Medium (640px)",
        suffix: "z",
        target_width_px: 640,
        api_label: "Medium 640",
        oembed_max_width: 640,
        requires_api: false,
    },
    SizeTier {
        // The 500px size has no suffix in static asset URLs.
        key: "medium500",
        label: "Medium (500px)",
        suffix: "",
        target_width_px: 500,
        api_label: "Medium",
        oembed_max_width: 500,
        requires_api: false,
    },
    SizeTier {
        key: "small400",
        label: "Small (400px)",
        suffix: "w",
        target_width_px: 400,
        api_label: "Small 400",
        oembed_max_width: 400,
        requires_api: false,
    },
    SizeTier {
        key: "small320",
        label: "Small (320px)",
        suffix: "n",
        target_width_px: 320,
        api_label: "Small 320",
        oembed_max_width: 320,
        requires_api: false,
    },
    SizeTier {
        key: "small240",
        label: "Small (240px)",
        suffix: "m",
        target_width_px: 240,
        api_label: "Small",
        oembed_max_width: 240,
        requires_api: false,
    },
    SizeTier {
        key: "thumbnail",
        label: "Thumbnail (100px)",
        suffix: "t",
        target_width_px: 100,
        api_label: "Thumbnail",
        oembed_max_width: 100,
        requires_api: false,
    },
    SizeTier {
        key: "square150",
        label: "Square (150px)",
        suffix: "q",
        target_width_px: 150,
        api_label: "Large Square",
        oembed_max_width: 150,
        requires_api: false,
    },
];

pub fn find(key: &str) -> Option<&'static SizeTier> {
    TIERS.iter().find(|tier| tier.key == key)
}

pub fn target_width(key: &str) -> u32 {
    find(key)
        .map(|tier| tier.target_width_px)
        .unwrap_or(FALLBACK_WIDTH)
}

pub fn oembed_max_width(key: &str) -> u32 {
    find(key)
        .map(|tier| tier.oembed_max_width)
        .unwrap_or(FALLBACK_WIDTH)
}

pub fn requires_api(key: &str) -> bool {
    find(key).map(|tier| tier.requires_api).unwrap_or(false)
}

/// Whether a size-list label names one of the API-gated tiers. Labels not
/// in the catalog are assumed public.
pub fn label_requires_api(label: &str) -> bool {
    TIERS
        .iter()
        .find(|tier| tier.api_label == label)
        .map(|tier| tier.requires_api)
        .unwrap_or(false)
}

/// Reverse lookup from a static-asset URL suffix to a tier key. The empty
/// suffix is the 500px size.
pub fn suffix_to_key(suffix: &str) -> Option<&'static str> {
    TIERS
        .iter()
        .find(|tier| tier.suffix == suffix)
        .map(|tier| tier.key)
}
