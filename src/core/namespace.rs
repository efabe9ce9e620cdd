/// Drops a `{namespace-uri}` prefix from a tag name.
///
/// Splits at the last `}` so nested or repeated braces still leave only the
/// local name. Tags without a `}` are returned unchanged.
pub fn strip_namespace(tag: &str) -> &str {
    match tag.rfind('}') {
        Some(idx) => &tag[idx + 1..],
        None => tag,
    }
}
