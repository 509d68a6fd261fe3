use url::Url;

/// Extract the scheme of a URL / 提取URL协议
///
/// Takes the `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )` prefix before the
/// first `:`, lowercased. The rest of the URL does not have to parse.
/// Returns None when there is no scheme.
pub fn url_scheme(raw: &str) -> Option<String> {
    let (scheme, _) = raw.split_once(':')?;
    let mut chars = scheme.chars();
    if !chars.next()?.is_ascii_alphabetic() {
        return None;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        return None;
    }
    Some(scheme.to_ascii_lowercase())
}

/// Split `scheme://bucket/key` into (bucket, key) / 拆分出存储桶和对象键
///
/// The key is percent-decoded and has no leading slash.
/// Returns None if either part is missing.
pub fn split_bucket_key(raw: &str) -> Option<(String, String)> {
    let url = Url::parse(raw).ok()?;
    let bucket = url.host_str().filter(|h| !h.is_empty())?.to_string();

    let path = url.path().trim_start_matches('/');
    if path.is_empty() {
        return None;
    }
    let key = urlencoding::decode(path).ok()?.into_owned();

    Some((bucket, key))
}
