use url::Url;

const SHARE_HOST_SUFFIX: &str = "csb.app";

/// Builds the human-shareable sandbox link for a preview URL.
///
/// The final path segment of `preview_url` becomes the subdomain of the
/// sandbox hosting domain. Query and fragment are ignored. Returns `None`
/// when there is no usable segment.
pub fn derive_share_url(preview_url: &str) -> Option<String> {
    let segment = match Url::parse(preview_url.trim()) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .map(ToOwned::to_owned),
        Err(_) => raw_last_segment(preview_url),
    }?;

    if segment.is_empty() {
        return None;
    }
    Some(format!("https://{segment}.{SHARE_HOST_SUFFIX}/"))
}

fn raw_last_segment(raw: &str) -> Option<String> {
    let without_suffix = raw.split(['?', '#']).next().unwrap_or(raw).trim();
    without_suffix
        .rsplit('/')
        .next()
        .map(ToOwned::to_owned)
}
