use url::Url;

/// Schemes Tauri serves bundled assets from.
const BUNDLED_SCHEMES: [&str; 2] = ["tauri", "asset"];
const BUNDLED_HOSTS: [&str; 2] = ["tauri.localhost", "asset.localhost"];

/// Whether `url` belongs to the app itself: bundled assets in release builds,
/// or the dev server when one is configured.
pub fn is_app_origin(url: &Url, dev_url: Option<&Url>) -> bool {
    if BUNDLED_SCHEMES.contains(&url.scheme()) {
        return true;
    }
    if matches!(url.scheme(), "http" | "https")
        && url
            .host_str()
            .is_some_and(|host| BUNDLED_HOSTS.contains(&host))
    {
        return true;
    }
    match dev_url {
        Some(dev) => url.origin() == dev.origin(),
        None => false,
    }
}
