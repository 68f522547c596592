use bizflow_core::config::GatewayConfig;
use bizflow_core::types::Caller;

/// Result of a successful authentication.
#[derive(Debug, Clone)]
pub struct AuthResult {
    /// Name of the matched API key, for logs.
    pub name: String,
    pub caller: Caller,
}

/// Match a bearer token against the configured API keys.
///
/// There is no anonymous access: a missing or unknown token is `None`.
pub fn validate_auth(config: &GatewayConfig, bearer: Option<&str>) -> Option<AuthResult> {
    let bearer = bearer.filter(|b| !b.is_empty())?;
    config
        .api_keys
        .iter()
        .find(|ak| ak.key == bearer)
        .map(|ak| AuthResult {
            name: ak.name.clone(),
            caller: Caller::new(ak.user_id.clone(), ak.role),
        })
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizflow_core::config::ApiKeyConfig;
    use bizflow_core::types::UserRole;

    fn gateway(api_keys: Vec<ApiKeyConfig>) -> GatewayConfig {
        GatewayConfig {
            bind: "127.0.0.1:18790".to_string(),
            api_keys,
        }
    }

    fn key(name: &str, key: &str, user_id: &str, role: UserRole) -> ApiKeyConfig {
        ApiKeyConfig {
            name: name.to_string(),
            key: key.to_string(),
            user_id: user_id.to_string(),
            role,
        }
    }

    #[test]
    fn test_no_keys_denies_everyone() {
        let config = gateway(vec![]);
        assert!(validate_auth(&config, None).is_none());
        assert!(validate_auth(&config, Some("anything")).is_none());
    }

    #[test]
    fn test_bearer_api_key() {
        let config = gateway(vec![key("web-app", "bk_test123", "user-1", UserRole::Member)]);

        let auth = validate_auth(&config, Some("bk_test123")).unwrap();
        assert_eq!(auth.name, "web-app");
        assert_eq!(auth.caller, Caller::new("user-1", UserRole::Member));

        assert!(validate_auth(&config, Some("wrong")).is_none());
        assert!(validate_auth(&config, Some("")).is_none());
        assert!(validate_auth(&config, None).is_none());
    }

    #[test]
    fn test_api_key_roles() {
        let config = gateway(vec![
            key("member", "bk_member", "user-1", UserRole::Member),
            key("ops", "bk_ops", "ops-1", UserRole::SystemAdmin),
        ]);

        let member = validate_auth(&config, Some("bk_member")).unwrap();
        assert!(!member.caller.role.is_admin());

        let ops = validate_auth(&config, Some("bk_ops")).unwrap();
        assert_eq!(ops.caller.user_id, "ops-1");
        assert!(ops.caller.role.is_admin());
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("bearer abc "), Some("abc"));
        assert_eq!(bearer_token("Basic abc"), None);
    }
}
