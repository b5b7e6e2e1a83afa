use blog_navigator::{AppConfig, config::Env};
use serial_test::serial;
use std::{env, panic};

// --- Setup/Teardown Utilities ---

const CONFIG_VARS: [&str; 5] = ["APP_ENV", "JWT_SECRET", "BIND_ADDR", "BASE_URL", "ASSETS_DIR"];

/// Runs `test` with the given variables set (and every other config variable cleared),
/// restoring the original environment afterwards.
fn run_with_env<T, R>(vars: &[(&str, &str)], test: T) -> R
where
    T: FnOnce() -> R + panic::UnwindSafe,
{
    let originals: Vec<(&str, Option<String>)> = CONFIG_VARS
        .iter()
        .map(|&var| (var, env::var(var).ok()))
        .collect();

    unsafe {
        for var in CONFIG_VARS {
            env::remove_var(var);
        }
        for (key, value) in vars {
            env::set_var(key, value);
        }
    }

    let result = panic::catch_unwind(test);

    unsafe {
        for (key, original_value) in originals {
            match original_value {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }

    match result {
        Ok(value) => value,
        Err(e) => panic::resume_unwind(e),
    }
}

// --- Tests ---

#[test]
#[serial]
fn test_app_config_production_fail_fast() {
    let result = run_with_env(&[("APP_ENV", "production")], || {
        panic::catch_unwind(AppConfig::load)
    });

    assert!(
        result.is_err(),
        "Production config loading should panic without JWT_SECRET"
    );
}

#[test]
#[serial]
fn test_app_config_production_with_secret() {
    let config = run_with_env(
        &[
            ("APP_ENV", "production"),
            ("JWT_SECRET", "prod-secret"),
            ("BASE_URL", "/blog/"),
        ],
        AppConfig::load,
    );

    assert_eq!(config.env, Env::Production);
    assert_eq!(config.jwt_secret, "prod-secret");
    assert_eq!(config.base_url, "/blog/");
}

#[test]
#[serial]
fn test_app_config_local_env_defaults() {
    let config = run_with_env(&[("APP_ENV", "local")], AppConfig::load);
    let defaults = AppConfig::default();

    assert_eq!(config.env, Env::Local);
    assert_eq!(config.jwt_secret, defaults.jwt_secret);
    assert_eq!(config.bind_addr, "0.0.0.0:3000");
    assert_eq!(config.base_url, "/");
    assert_eq!(config.assets_dir, "dist/assets");
}

#[test]
#[serial]
fn test_app_config_unknown_env_falls_back_to_local() {
    let config = run_with_env(
        &[("APP_ENV", "staging"), ("BIND_ADDR", "127.0.0.1:8080")],
        AppConfig::load,
    );

    assert_eq!(config.env, Env::Local);
    assert_eq!(config.bind_addr, "127.0.0.1:8080");
}
