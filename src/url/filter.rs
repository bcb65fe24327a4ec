/// Non-HTTP schemes that never lead to a crawlable page
const IGNORED_SCHEMES: &[&str] = &[
    "tel:",
    "skype:",
    "callto:",
    "sms:",
    "whatsapp:",
    "mailto:",
    "javascript:",
    "data:",
    "ftp:",
];

/// File extensions that never carry contact information worth fetching
const IGNORED_EXTENSIONS: &[&str] = &[
    // Images
    ".jpg", ".jpeg", ".png", ".gif", ".svg", ".webp", ".bmp", ".ico", ".tif", ".tiff",
    // Stylesheets, scripts and fonts
    ".css", ".js", ".mjs", ".map", ".woff", ".woff2", ".ttf", ".eot", ".otf",
    // Audio and video
    ".mp3", ".mp4", ".m4a", ".wav", ".ogg", ".webm", ".avi", ".mov", ".wmv", ".flv", ".mkv",
    // Archives and binaries
    ".zip", ".rar", ".7z", ".tar", ".gz", ".tgz", ".bz2", ".exe", ".msi", ".dmg", ".iso", ".apk",
];

/// Checks a raw href or resolved URL against the static block-list
///
/// Schemes are matched as prefixes and extensions as suffixes of the
/// lowercased target, with any query string or fragment ignored for the
/// extension check.
///
/// # Examples
///
/// ```
/// use trawler::url::is_ignored;
///
/// assert!(is_ignored("tel:+15551234"));
/// assert!(is_ignored("https://example.com/logo.PNG"));
/// assert!(!is_ignored("https://example.com/contact"));
/// assert!(!is_ignored("https://example.com/brochure.pdf"));
/// ```
pub fn is_ignored(target: &str) -> bool {
    has_ignored_scheme(target) || has_ignored_extension(target)
}

/// Returns true if the target starts with a blocked non-HTTP scheme
pub fn has_ignored_scheme(target: &str) -> bool {
    let lower = target.trim_start().to_lowercase();
    IGNORED_SCHEMES.iter().any(|scheme| lower.starts_with(scheme))
}

/// Returns true if the target ends with a blocked file extension
pub fn has_ignored_extension(target: &str) -> bool {
    let lower = target.trim().to_lowercase();
    let path = lower.split(['?', '#']).next().unwrap_or("");
    IGNORED_EXTENSIONS
        .iter()
        .any(|ext| path.ends_with(ext) || lower.ends_with(ext))
}
