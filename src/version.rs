//! Build metadata for `--version` output and the upstream `User-Agent`.

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// `User-Agent` sent with every upstream request.
pub const USER_AGENT: &str = concat!("geogate/", env!("CARGO_PKG_VERSION"));

/// Commit the binary was built from; empty outside a git checkout.
const GIT_SHA: &str = match option_env!("VERGEN_GIT_SHA") {
    Some(sha) => sha,
    None => "",
};

/// Version with build provenance, e.g. `0.1.0 (abc1234)` or
/// `0.1.0 (abc1234, dirty)`. Just the package version when git metadata
/// was not available at build time.
pub fn version_string() -> String {
    describe(
        PKG_VERSION,
        GIT_SHA,
        option_env!("VERGEN_GIT_DIRTY") == Some("true"),
    )
}

fn describe(version: &str, sha: &str, dirty: bool) -> String {
    if sha.is_empty() {
        return version.to_string();
    }
    let short = &sha[..7.min(sha.len())];
    if dirty {
        format!("{version} ({short}, dirty)")
    } else {
        format!("{version} ({short})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_starts_with_pkg_version() {
        assert!(version_string().starts_with(PKG_VERSION));
    }

    #[test]
    fn user_agent_names_crate_and_version() {
        assert_eq!(USER_AGENT, format!("geogate/{PKG_VERSION}"));
    }

    #[test]
    fn describe_shortens_sha_and_marks_dirty() {
        assert_eq!(describe("1.2.3", "0123456789abcdef", false), "1.2.3 (0123456)");
        assert_eq!(describe("1.2.3", "0123456789abcdef", true), "1.2.3 (0123456, dirty)");
        assert_eq!(describe("1.2.3", "abc", false), "1.2.3 (abc)");
    }

    #[test]
    fn describe_without_git_is_bare_version() {
        assert_eq!(describe("1.2.3", "", true), "1.2.3");
    }
}
