//! Integration tests for layered settings and their effect on the container.

use std::io::Write;

use appcontainer::config::Config;
use appcontainer::web::{application_sources, HTTP_CLIENT, WEB_CONFIG};
use appcontainer::{ComponentProducer, ConfigurationSource, Container};
use serial_test::serial;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("Failed to create temp config");
    file.write_all(contents.as_bytes())
        .expect("Failed to write temp config");
    file
}

// Tests touching APPCONTAINER_* variables run serially
#[serial]
mod env_tests {
    use super::*;

    #[test]
    fn test_file_values() {
        let file = write_config(
            r#"
            [http]
            timeout_secs = 12
            user_agent = "tests/1.0"

            [container.priorities]
            WebConfig = 4
            "#,
        );

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.http.timeout_secs, 12);
        assert_eq!(config.http.user_agent, "tests/1.0");
        assert_eq!(config.container.priorities.get(WEB_CONFIG), Some(&4));
    }

    #[test]
    fn test_env_overrides_file() {
        let file = write_config(
            r#"
            [http]
            timeout_secs = 12
            "#,
        );

        std::env::set_var("APPCONTAINER_HTTP__TIMEOUT_SECS", "2");
        let config = Config::load_from(file.path());
        std::env::remove_var("APPCONTAINER_HTTP__TIMEOUT_SECS");

        let config = config.unwrap();
        assert_eq!(config.http.timeout_secs, 2);
        assert_eq!(config.http.connect_timeout_secs, 10);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path().join("absent.toml")).unwrap();

        assert_eq!(config.http.timeout_secs, 30);
        assert!(config.container.priorities.is_empty());
    }

    #[test]
    fn test_configured_priority_reorders_sources() {
        let file = write_config(
            r#"
            [container.priorities]
            WebConfig = 10
            Services = 0
            "#,
        );
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.container.priorities.get(WEB_CONFIG), Some(&10));
        assert_eq!(config.container.priorities.get("Services"), Some(&0));

        let mut sources = application_sources(&config);
        // declared without a priority, supplied by settings
        sources.push(
            ConfigurationSource::new("Services")
                .producer(ComponentProducer::new("greeting", 0, |()| Ok("hi".to_string()))),
        );

        let plan = Container::builder()
            .register_all(sources)
            .with_priorities(&config.container.priorities)
            .plan()
            .unwrap();

        let names: Vec<_> = plan.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["greeting", HTTP_CLIENT]);
        assert_eq!(plan[1].source_priority, 10);
    }

    #[test]
    fn test_http_client_component_from_settings() {
        let file = write_config(
            r#"
            [http]
            timeout_secs = 1
            connect_timeout_secs = 2
            user_agent = "tests/2.0"
            "#,
        );
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.http.timeout_secs, 1);
        assert_eq!(config.http.connect_timeout_secs, 2);
        assert_eq!(config.http.user_agent, "tests/2.0");

        let container = Container::build(application_sources(&config)).unwrap();
        let by_type = container.get_by_type::<reqwest::Client>().unwrap();
        let by_name = container.get_by_name::<reqwest::Client>(HTTP_CLIENT).unwrap();
        assert!(std::sync::Arc::ptr_eq(&by_type, &by_name));
        assert_eq!(
            container.resolve(HTTP_CLIENT).unwrap().source_name(),
            WEB_CONFIG
        );
    }
}
