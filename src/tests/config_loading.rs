#[cfg(test)]
mod test {
    use std::io::Write;

    use serial_test::serial;

    use crate::auth::jwt::decode_segments;
    use crate::auth::signer::{der_to_pem, EcdsaSigner};
    use crate::cache::token_manager::TokenManager;
    use crate::config::loader::{expand_env_vars, file_to_config, parse_config};
    use crate::config::settings::{AuthConfig, LogFormat};
    use crate::errors::TokenError;
    use crate::utils::config_loader;

    fn write_key() -> tempfile::NamedTempFile {
        let (_, der) = EcdsaSigner::generate().unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(der_to_pem(&der).as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_are_applied() {
        let cfg =
            parse_config("auth:\n  team_id: T\n  key_id: K\n  key_path: /keys/a.p8\n").unwrap();
        assert_eq!(cfg.auth.freshness_window_seconds, 3300);
        assert!(cfg.settings.logging.is_none());
        assert!(!cfg.settings.metrics.is_enabled);
    }

    #[test]
    fn all_problems_are_reported_together() {
        let err = parse_config(
            "auth:\n  team_id: ''\n  key_id: ''\n  key_path: /k\n  freshness_window_seconds: 3600\nsettings:\n  logging: {level: loud, format: compact}\n",
        )
        .unwrap_err()
        .to_string();

        assert!(err.contains("team_id"));
        assert!(err.contains("key_id"));
        assert!(err.contains("freshness_window_seconds"));
        assert!(err.contains("loud"));
    }

    #[test]
    fn zero_window_is_rejected() {
        let yaml = "auth: {team_id: T, key_id: K, key_path: /k, freshness_window_seconds: 0}";
        let err = parse_config(yaml)
            .unwrap_err()
            .to_string();
        assert!(err.contains("must be > 0"));
    }

    #[test]
    #[serial]
    fn env_placeholders_expand() {
        std::env::set_var("PUSH_TOKEN_TEST_TEAM", "TEAMFROMENV");
        std::env::remove_var("PUSH_TOKEN_TEST_MISSING");
        let out = expand_env_vars(
            "team: ${PUSH_TOKEN_TEST_TEAM}\nkid: ${PUSH_TOKEN_TEST_MISSING:fallback}\n",
        );
        assert_eq!(out, "team: TEAMFROMENV\nkid: fallback\n");
        std::env::remove_var("PUSH_TOKEN_TEST_TEAM");
    }

    #[tokio::test]
    #[serial]
    async fn manager_from_config_file() {
        let key = write_key();
        std::env::set_var("PUSH_TOKEN_TEST_KEY_PATH", key.path());

        let mut cfg_file = tempfile::NamedTempFile::new().unwrap();
        write!(
            cfg_file,
            "auth:\n  team_id: TEAM123456\n  key_id: KEY1234567\n  key_path: ${{PUSH_TOKEN_TEST_KEY_PATH}}\n  freshness_window_seconds: 1200\nsettings:\n  logging: {{level: debug, format: json}}\n"
        )
        .unwrap();

        let cfg = file_to_config(cfg_file.path()).await.unwrap();
        std::env::remove_var("PUSH_TOKEN_TEST_KEY_PATH");
        assert_eq!(cfg.settings.logging.as_ref().unwrap().format, LogFormat::Json);

        let manager = TokenManager::from_config(&cfg.auth).await.unwrap();
        assert_eq!(manager.freshness_window().as_secs(), 1200);
        assert_eq!(manager.issuer(), "TEAM123456");

        let token = manager.current_token().await.unwrap();
        let decoded = decode_segments(&token).unwrap();
        assert_eq!(decoded.claims["iss"], "TEAM123456");
        assert_eq!(decoded.header["kid"], "KEY1234567");
    }

    #[tokio::test]
    async fn code_built_config_with_bad_window_is_rejected() {
        let key = write_key();
        let cfg = AuthConfig {
            team_id: "TEAM123456".to_owned(),
            key_id: "KEY1234567".to_owned(),
            key_path: key.path().to_path_buf(),
            freshness_window_seconds: 7200,
        };
        let err = TokenManager::from_config(&cfg).await.unwrap_err();
        assert!(matches!(err, TokenError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn missing_config_file_is_an_error() {
        let err = config_loader::run("/nonexistent/push-token.yaml").await.unwrap_err();
        assert!(err.to_string().contains("Invalid config format"));
    }
}
