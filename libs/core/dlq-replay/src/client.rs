//! Shared Kafka client configuration

use core_config::KafkaConfig;
use rdkafka::config::ClientConfig;
use tracing::info;

/// Build an `rdkafka` client config from `KafkaConfig`.
///
/// Consumer and producer both start from this so that bootstrap servers,
/// TLS and SASL settings stay identical.
pub fn create_client_config(config: &KafkaConfig) -> ClientConfig {
    let mut client_config = ClientConfig::new();
    client_config.set("bootstrap.servers", &config.brokers);
    client_config.set("security.protocol", security_protocol(config));

    if config.ssl_enabled {
        info!("Enabling SSL/TLS for Kafka connection");
        if let Some(ca_location) = &config.ssl_ca_location {
            client_config.set("ssl.ca.location", ca_location);
        }
    }

    if let Some((mechanism, username, password)) = config.sasl() {
        info!(sasl_mechanism = %mechanism, "Configuring SASL authentication");
        client_config
            .set("sasl.mechanism", mechanism)
            .set("sasl.username", username)
            .set("sasl.password", password);
    }

    client_config
}

fn security_protocol(config: &KafkaConfig) -> &'static str {
    match (config.ssl_enabled, config.sasl().is_some()) {
        (false, false) => "plaintext",
        (true, false) => "ssl",
        (false, true) => "sasl_plaintext",
        (true, true) => "sasl_ssl",
    }
}
