// crates/backend-lib/src/config/config_tests.rs
use super::*;
use figment::Jail;

#[test]
fn test_settings_validation() {
    let settings = Settings::default();
    assert!(settings.validate().is_ok());

    // Test invalid log level
    let mut invalid_settings = settings.clone();
    invalid_settings.log_level = "invalid".to_string();
    assert!(invalid_settings.validate().is_err());

    // Test invalid cache TTL
    let mut invalid_settings = settings.clone();
    invalid_settings.credential_cache.ttl_secs = 0;
    assert!(invalid_settings.validate().is_err());

    // Test invalid cache capacity
    let mut invalid_settings = settings.clone();
    invalid_settings.credential_cache.max_entries = 0;
    assert!(invalid_settings.validate().is_err());

    // Test invalid scrypt parameters
    let mut invalid_settings = settings.clone();
    invalid_settings.hashing.r = 0;
    assert!(invalid_settings.validate().is_err());
}

#[test]
fn test_defaults() {
    let settings = Settings::default();
    assert_eq!(settings.bind_addr.to_string(), "127.0.0.1:3000");
    assert_eq!(settings.cache_ttl(), Duration::from_secs(300));
    assert_eq!(settings.credential_cache.max_entries, 10_000);
    assert_eq!(
        settings.password_policy().character_rule,
        CharacterRule::RequireAllClasses
    );
}

#[test]
fn test_load_settings() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "commerce.toml",
            r#"
            bind_addr = "0.0.0.0:8080"
            data_dir = "test_data"
            log_level = "debug"

            [credential_cache]
            ttl_secs = 120

            [password_policy]
            character_rule = "allowed_symbols_only"
            "#,
        )?;

        // Environment variables take precedence over the file
        jail.set_env("COMMERCE_LOG_LEVEL", "warn");
        jail.set_env("COMMERCE_CREDENTIAL_CACHE__MAX_ENTRIES", "500");

        let settings = Settings::load_from("commerce.toml").map_err(|e| e.to_string())?;
        assert_eq!(settings.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(settings.data_dir, PathBuf::from("test_data"));
        assert_eq!(settings.log_level, "warn");
        assert_eq!(settings.credential_cache.ttl_secs, 120);
        assert_eq!(settings.credential_cache.max_entries, 500);
        // Unset keys keep their defaults
        assert_eq!(settings.credential_cache.purge_interval_secs, 60);
        assert_eq!(
            settings.password_policy.character_rule,
            CharacterRule::AllowedSymbolsOnly
        );
        Ok(())
    });
}

#[test]
fn test_missing_file_uses_defaults() {
    Jail::expect_with(|_jail| {
        let settings = Settings::load_from("absent.toml").map_err(|e| e.to_string())?;
        assert_eq!(settings, Settings::default());
        Ok(())
    });
}

#[test]
fn test_invalid_override_is_rejected() {
    Jail::expect_with(|jail| {
        jail.set_env("COMMERCE_CREDENTIAL_CACHE__TTL_SECS", "0");
        assert!(Settings::load_from("absent.toml").is_err());
        Ok(())
    });
}
