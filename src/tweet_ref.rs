//! Tweet reference handling
//! Users may pass either the bare id or the permalink(e.g. `https://x.com/user/status/123`)

/// Extract the id from a permalink, otherwise return the input as it is
/// No validation, no network access
pub fn resolve_id(input: &str) -> String {
    let mut rest = input;
    while let Some(position) = rest.find("/status/") {
        rest = &rest[position + "/status/".len()..];
        let digits_len = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits_len > 0 {
            return rest[..digits_len].to_string();
        }
    }
    input.to_string()
}

#[cfg(test)]
mod tests {
    use super::resolve_id;

    #[test]
    fn permalink() {
        assert_eq!(
            resolve_id("https://x.com/user/status/1234567890"),
            "1234567890"
        );
        assert_eq!(
            resolve_id("https://twitter.com/jack/status/20?s=20&t=abc"),
            "20"
        );
        assert_eq!(
            resolve_id("https://x.com/user/status/1234567890/photo/1"),
            "1234567890"
        );
    }

    #[test]
    fn bare_id() {
        assert_eq!(resolve_id("1234567890"), "1234567890");
    }

    #[test]
    fn no_digits_after_status() {
        assert_eq!(
            resolve_id("https://x.com/user/status/abc"),
            "https://x.com/user/status/abc"
        );
        assert_eq!(resolve_id("something-else"), "something-else");
    }
}
