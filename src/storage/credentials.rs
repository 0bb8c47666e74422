//! Access token retrieval
//!
//! The token is issued by the authentication provider and handed to this crate
//! through the ROLLCALL_ACCESS_TOKEN environment variable (or `--access-token`).
//! Nothing here persists it.

use std::env;

pub const ACCESS_TOKEN_ENV_VAR: &str = "ROLLCALL_ACCESS_TOKEN";

/// Returns the value of ROLLCALL_ACCESS_TOKEN if set and non-empty
pub fn get_access_token() -> Option<String> {
    env::var(ACCESS_TOKEN_ENV_VAR).ok().filter(|k| !k.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so the env mutations never race each other
    #[test]
    fn test_get_access_token_from_env() {
        let original = env::var(ACCESS_TOKEN_ENV_VAR).ok();

        unsafe {
            env::set_var(ACCESS_TOKEN_ENV_VAR, "tok_123");
        }
        assert_eq!(get_access_token(), Some("tok_123".to_string()));

        unsafe {
            env::set_var(ACCESS_TOKEN_ENV_VAR, "");
        }
        assert_eq!(get_access_token(), None);

        unsafe {
            env::remove_var(ACCESS_TOKEN_ENV_VAR);
        }
        assert!(get_access_token().is_none());

        unsafe {
            if let Some(value) = original {
                env::set_var(ACCESS_TOKEN_ENV_VAR, value);
            }
        }
    }
}
