//! Command-line arguments

use clap::Parser;
use core_config::{KafkaConfig, OffsetReset};

#[derive(Parser, Debug, Default)]
#[command(name = "dlq-viewer")]
#[command(about = "Inspect a Kafka dead-letter queue and replay records to their original topic")]
pub struct Args {
    /// Bootstrap servers (overrides KAFKA_BROKERS)
    #[arg(short, long)]
    pub brokers: Option<String>,

    /// DLQ topic to read (overrides DLQ_TOPIC)
    #[arg(long)]
    pub dlq_topic: Option<String>,

    /// Topic that retried payloads are published to (overrides ORIGINAL_TOPIC)
    #[arg(long)]
    pub original_topic: Option<String>,

    /// Consumer group for DLQ offsets (overrides DLQ_CONSUMER_GROUP)
    #[arg(short, long)]
    pub group_id: Option<String>,

    /// Start a fresh consumer group at the end of the DLQ instead of the beginning
    #[arg(long)]
    pub from_latest: bool,

    /// Do not attach x-dlq-* headers to replayed messages
    #[arg(long)]
    pub no_replay_headers: bool,
}

impl Args {
    /// Apply command-line overrides on top of the environment configuration
    pub fn apply(&self, mut config: KafkaConfig) -> KafkaConfig {
        if let Some(brokers) = &self.brokers {
            config.brokers = brokers.clone();
        }
        if let Some(topic) = &self.dlq_topic {
            config.dlq_topic = topic.clone();
        }
        if let Some(topic) = &self.original_topic {
            config.original_topic = topic.clone();
        }
        if let Some(group) = &self.group_id {
            config.consumer_group = group.clone();
        }
        if self.from_latest {
            config.auto_offset_reset = OffsetReset::Latest;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_config::FromEnv;

    #[test]
    fn test_no_args_keeps_env_config() {
        let args = Args::try_parse_from(["dlq-viewer"]).unwrap();

        temp_env::with_vars(
            [
                ("KAFKA_BROKERS", Some("broker-a:9092")),
                ("DLQ_TOPIC", Some("payments-dlq")),
                ("KAFKA_AUTO_OFFSET_RESET", None),
            ],
            || {
                let config = args.apply(KafkaConfig::from_env().unwrap());
                assert_eq!(config.brokers, "broker-a:9092");
                assert_eq!(config.dlq_topic, "payments-dlq");
                assert_eq!(config.auto_offset_reset, OffsetReset::Earliest);
            },
        );
        assert!(!args.no_replay_headers);
    }

    #[test]
    fn test_args_override_env_config() {
        let args = Args::try_parse_from([
            "dlq-viewer",
            "--brokers",
            "localhost:29092",
            "--dlq-topic",
            "payments-dlq",
            "--original-topic",
            "payments",
            "-g",
            "ops-review",
            "--from-latest",
            "--no-replay-headers",
        ])
        .unwrap();

        let config = args.apply(KafkaConfig::default());

        assert_eq!(config.brokers, "localhost:29092");
        assert_eq!(config.dlq_topic, "payments-dlq");
        assert_eq!(config.original_topic, "payments");
        assert_eq!(config.consumer_group, "ops-review");
        assert_eq!(config.auto_offset_reset, OffsetReset::Latest);
        assert!(args.no_replay_headers);
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert!(Args::try_parse_from(["dlq-viewer", "--replay-all"]).is_err());
    }
}
