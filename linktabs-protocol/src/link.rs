use url::Url;

/// Returns `true` iff `input`, once trimmed, is an absolute `http`/`https`
/// URL with an authority component.
///
/// Never fails: anything that does not parse is simply not a valid link.
pub fn is_valid_url(input: &str) -> bool {
    let input = input.trim();
    if input.is_empty() {
        return false;
    }

    let Ok(url) = Url::parse(input) else {
        return false;
    };

    matches!(url.scheme(), "http" | "https")
        && has_authority(input, url.scheme())
        && url.host_str().is_some_and(|host| !host.is_empty())
}

/// The URL parser repairs `http:example.com` into `http://example.com/`; a
/// link only counts as absolute if the `//` authority marker was typed.
fn has_authority(input: &str, scheme: &str) -> bool {
    input
        .get(scheme.len() + 1..)
        .is_some_and(|rest| rest.starts_with("//"))
}
