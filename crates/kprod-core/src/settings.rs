//! Connection settings.
//!
//! The parameters needed to open a broker session, as last snapshotted from
//! the configuration form. Settings are only refreshed at two moments: when a
//! connection is requested and when the configuration is saved. `use_auth` is
//! derived at those same moments and is never edited directly.

use crate::{codec::Serde, config::PersistedConfig, error::ValidationError};

/// Serde used when the persisted configuration leaves one unset.
pub const DEFAULT_SERDE: &str = "json";

/// Parameters for establishing a broker session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    /// Bootstrap brokers as `host:port`, in form order.
    pub brokers: Vec<String>,
    /// Destination topic.
    pub topic: String,
    /// Client certificate path. Empty means unset.
    pub cert_path: String,
    /// Client private key path. Empty means unset.
    pub key_path: String,
    /// CA certificate path. Empty means unset.
    pub ca_path: String,
    /// Serde name for message keys.
    pub key_serde: String,
    /// Serde name for message values.
    pub value_serde: String,
    /// Mutual TLS enabled. Derived, see [`ConnectionSettings::recompute_auth`].
    pub use_auth: bool,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            brokers: vec!["localhost:9092".to_string()],
            topic: "test-topic".to_string(),
            cert_path: String::new(),
            key_path: String::new(),
            ca_path: String::new(),
            key_serde: DEFAULT_SERDE.to_string(),
            value_serde: DEFAULT_SERDE.to_string(),
            use_auth: false,
        }
    }
}

impl ConnectionSettings {
    /// Split the comma-separated brokers field.
    ///
    /// Entries are trimmed; blank entries are dropped so that `""` and
    /// `" , "` both parse to an empty list.
    pub fn parse_brokers(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|broker| !broker.is_empty())
            .map(ToString::to_string)
            .collect()
    }

    /// Brokers joined back into the form's comma-separated representation.
    pub fn brokers_field(&self) -> String {
        self.brokers.join(",")
    }

    /// Whether all three mutual TLS paths are set.
    pub fn auth_material_complete(cert_path: &str, key_path: &str, ca_path: &str) -> bool {
        !cert_path.is_empty() && !key_path.is_empty() && !ca_path.is_empty()
    }

    /// Recompute `use_auth` from the current certificate paths.
    pub fn recompute_auth(&mut self) {
        self.use_auth =
            Self::auth_material_complete(&self.cert_path, &self.key_path, &self.ca_path);
    }

    /// Check the settings can be handed to the broker client.
    pub fn validate_for_connect(&self) -> Result<(), ValidationError> {
        if self.brokers.is_empty() {
            return Err(ValidationError::EmptyBrokerList);
        }
        Ok(())
    }

    /// Resolved serde for message keys.
    pub fn key_serde(&self) -> Serde {
        Serde::from_name(&self.key_serde)
    }

    /// Resolved serde for message values.
    pub fn value_serde(&self) -> Serde {
        Serde::from_name(&self.value_serde)
    }

    /// Settings in their persisted form.
    pub fn to_persisted(&self) -> PersistedConfig {
        PersistedConfig {
            brokers: self.brokers.clone(),
            topic: self.topic.clone(),
            cert_file: self.cert_path.clone(),
            key_file: self.key_path.clone(),
            ca_file: self.ca_path.clone(),
            key_serde: self.key_serde.clone(),
            value_serde: self.value_serde.clone(),
            use_auth: self.use_auth,
        }
    }
}

impl From<PersistedConfig> for ConnectionSettings {
    fn from(config: PersistedConfig) -> Self {
        let or_default = |serde: String| {
            if serde.is_empty() { DEFAULT_SERDE.to_string() } else { serde }
        };

        Self {
            brokers: config.brokers,
            topic: config.topic,
            cert_path: config.cert_file,
            key_path: config.key_file,
            ca_path: config.ca_file,
            key_serde: or_default(config.key_serde),
            value_serde: or_default(config.value_serde),
            use_auth: config.use_auth,
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn brokers_are_split_and_trimmed() {
        assert_eq!(ConnectionSettings::parse_brokers(" a:1 ,b:2,  c:3"), vec!["a:1", "b:2", "c:3"]);
    }

    #[test]
    fn blank_brokers_parse_empty() {
        assert!(ConnectionSettings::parse_brokers("").is_empty());
        assert!(ConnectionSettings::parse_brokers(" , ,").is_empty());
    }

    #[test]
    fn empty_broker_list_fails_validation() {
        let settings = ConnectionSettings { brokers: vec![], ..Default::default() };
        assert_eq!(settings.validate_for_connect(), Err(ValidationError::EmptyBrokerList));
        assert_eq!(ConnectionSettings::default().validate_for_connect(), Ok(()));
    }

    #[test]
    fn empty_serdes_default_to_json() {
        let settings = ConnectionSettings::from(PersistedConfig::default());
        assert_eq!(settings.key_serde, "json");
        assert_eq!(settings.value_serde, "json");
    }

    #[test]
    fn persisted_round_trip_keeps_fields() {
        let mut settings = ConnectionSettings {
            brokers: vec!["k1:9093".into(), "k2:9093".into()],
            topic: "orders".into(),
            cert_path: "/c.pem".into(),
            key_path: "/k.pem".into(),
            ca_path: "/ca.pem".into(),
            key_serde: "string".into(),
            value_serde: "avro".into(),
            use_auth: false,
        };
        settings.recompute_auth();

        assert_eq!(ConnectionSettings::from(settings.to_persisted()), settings);
    }

    proptest! {
        #[test]
        fn use_auth_iff_all_paths_set(cert in "([a-z/]{1,8})?", key in "([a-z/]{1,8})?", ca in "([a-z/]{1,8})?") {
            let mut settings = ConnectionSettings {
                cert_path: cert.clone(),
                key_path: key.clone(),
                ca_path: ca.clone(),
                use_auth: true,
                ..Default::default()
            };
            settings.recompute_auth();

            let expected = !cert.is_empty() && !key.is_empty() && !ca.is_empty();
            prop_assert_eq!(settings.use_auth, expected);
        }
    }
}
