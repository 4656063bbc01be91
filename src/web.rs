//! HTTP client configuration source.
//!
//! The application's web layer obtains its client with
//! `container.get_by_type::<reqwest::Client>()`.

use anyhow::Context as _;

use crate::config::{Config, HttpClientConfig};
use crate::producer::ComponentProducer;
use crate::source::ConfigurationSource;

/// Name of the web configuration source.
pub const WEB_CONFIG: &str = "WebConfig";

/// Base name of the shared HTTP client component.
pub const HTTP_CLIENT: &str = "httpClient";

/// Source declaring the pre-configured HTTP client.
pub fn http_client_configuration(settings: &HttpClientConfig) -> ConfigurationSource {
    let settings = settings.clone();

    ConfigurationSource::new(WEB_CONFIG)
        .with_priority(0)
        .producer(ComponentProducer::new(HTTP_CLIENT, 0, move |()| {
            reqwest::Client::builder()
                .timeout(settings.timeout())
                .connect_timeout(settings.connect_timeout())
                .user_agent(settings.user_agent.clone())
                .build()
                .context("failed to build HTTP client")
        }))
}

/// Configuration sources of the application, in declaration order.
pub fn application_sources(config: &Config) -> Vec<ConfigurationSource> {
    vec![http_client_configuration(&config.http)]
}
