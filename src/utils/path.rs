use crate::errors::BotError;

/// Normalize a mount path into the canonical key used by the bot registry.
///
/// Whitespace is trimmed, empty segments are dropped and the result always
/// starts with `/` and never ends with one (except the root itself).
#[must_use]
pub fn format_path(path: &str) -> String {
    let segments: Vec<&str> = path
        .trim()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();

    format!("/{}", segments.join("/"))
}

/// Reject segments the router would read as captures or wildcards.
///
/// # Errors
///
/// Returns `BotError::InvalidPath` naming the offending segment.
pub fn check_static_path(path: &str) -> Result<(), BotError> {
    for segment in path.split('/') {
        let reason = if segment.starts_with(':') || segment.starts_with('*') {
            format!("segment '{segment}' must not start with ':' or '*'")
        } else if segment.contains('{') || segment.contains('}') {
            format!("segment '{segment}' must not contain '{{' or '}}'")
        } else {
            continue;
        };

        return Err(BotError::InvalidPath {
            path: path.to_string(),
            reason,
        });
    }

    Ok(())
}
