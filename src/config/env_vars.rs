/// Expand `$VAR` and `${VAR}` references in a configured path.
///
/// Unset `$VAR` references are left untouched so the problem stays visible
/// in the resulting path; unset `${VAR}` references expand to nothing.
/// An unterminated `${` is copied literally.
pub fn expand_env_vars(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(pos) = rest.find('$') {
        result.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => {
                    let name = &braced[..end];
                    result.push_str(&std::env::var(name).unwrap_or_default());
                    rest = &braced[end + 1..];
                }
                None => {
                    result.push_str(&rest[pos..]);
                    rest = "";
                }
            }
            continue;
        }

        let name_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        let name = &after[..name_len];

        match std::env::var(name) {
            Ok(expanded) if !name.is_empty() => result.push_str(&expanded),
            _ => {
                result.push('$');
                result.push_str(name);
            }
        }
        rest = &after[name_len..];
    }

    result.push_str(rest);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_expand_dollar_style() {
        env::set_var("WSC_TEST_HOME", "/home/che");

        assert_eq!(expand_env_vars("$WSC_TEST_HOME"), "/home/che");
        assert_eq!(expand_env_vars("$WSC_TEST_HOME/logs"), "/home/che/logs");
        assert_eq!(expand_env_vars("$WSC_TEST_HOME-old"), "/home/che-old");

        env::remove_var("WSC_TEST_HOME");
    }

    #[test]
    fn test_expand_brace_style() {
        env::set_var("WSC_TEST_BUILD", "build-42");

        assert_eq!(expand_env_vars("/tmp/${WSC_TEST_BUILD}/logs"), "/tmp/build-42/logs");
        assert_eq!(expand_env_vars("${WSC_TEST_BUILD}${WSC_TEST_BUILD}"), "build-42build-42");

        env::remove_var("WSC_TEST_BUILD");
    }

    #[test]
    fn test_unset_variables() {
        assert_eq!(expand_env_vars("$WSC_TEST_UNSET/path"), "$WSC_TEST_UNSET/path");
        assert_eq!(expand_env_vars("/a/${WSC_TEST_UNSET}/b"), "/a//b");
    }

    #[test]
    fn test_edge_cases() {
        assert_eq!(expand_env_vars(""), "");
        assert_eq!(expand_env_vars("$"), "$");
        assert_eq!(expand_env_vars("$$"), "$$");
        assert_eq!(expand_env_vars("${"), "${");
        assert_eq!(expand_env_vars("/x/${incomplete"), "/x/${incomplete");
        assert_eq!(expand_env_vars("no variables"), "no variables");
    }
}
