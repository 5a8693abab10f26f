#[cfg(test)]
pub mod test {
    use std::collections::BTreeMap;

    use toml::Value;

    use crate::entry::{BoolEntry, ConfigEntry, DoubleEntry, EnumEntry, IntEntry};
    use crate::schema::{FieldDescriptor, Schema};
    use crate::value::ConfigEnum;

    // -- Plain-field schema with one nested section ------------------------------

    #[derive(Debug, PartialEq)]
    pub struct ServerConfig {
        pub host: String,
        pub port: i32,
        pub debug: bool,
        pub database: DatabaseConfig,
    }

    impl Default for ServerConfig {
        fn default() -> Self {
            Self {
                host: "localhost".into(),
                port: 8080,
                debug: false,
                database: DatabaseConfig::default(),
            }
        }
    }

    impl Schema for ServerConfig {
        fn comment() -> &'static str {
            "Server settings"
        }

        fn fields() -> Vec<FieldDescriptor<Self>> {
            vec![
                FieldDescriptor::plain("host", |c: &Self| c.host.clone(), |c, v| c.host = v)
                    .comment("The application host."),
                FieldDescriptor::plain("port", |c: &Self| c.port, |c, v| c.port = v)
                    .comment("The port number."),
                FieldDescriptor::plain("debug", |c: &Self| c.debug, |c, v| c.debug = v),
                FieldDescriptor::nested(
                    "database",
                    |c: &Self| &c.database,
                    |c: &mut Self| &mut c.database,
                )
                .comment("Database settings."),
            ]
        }
    }

    #[derive(Debug, PartialEq)]
    pub struct DatabaseConfig {
        pub url: String,
        pub pool_size: i32,
    }

    impl Default for DatabaseConfig {
        fn default() -> Self {
            Self {
                url: String::new(),
                pool_size: 5,
            }
        }
    }

    impl Schema for DatabaseConfig {
        fn fields() -> Vec<FieldDescriptor<Self>> {
            vec![
                FieldDescriptor::plain("url", |c: &Self| c.url.clone(), |c, v| c.url = v)
                    .comment("Connection string URL."),
                FieldDescriptor::plain("pool_size", |c: &Self| c.pool_size, |c, v| {
                    c.pool_size = v
                })
                .comment("Connection pool size."),
            ]
        }
    }

    // -- Enumerated value --------------------------------------------------------

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Mode {
        Development,
        Production,
    }

    impl ConfigEnum for Mode {
        fn variants() -> &'static [Self] {
            &[Mode::Development, Mode::Production]
        }

        fn name(&self) -> &'static str {
            match self {
                Mode::Development => "development",
                Mode::Production => "production",
            }
        }
    }

    // -- Entry-wrapper schema ----------------------------------------------------

    #[derive(Debug, PartialEq)]
    pub struct EntryConfig {
        pub port: ConfigEntry<i64>,
        pub bounded: IntEntry,
        pub ratio: DoubleEntry,
        pub enabled: BoolEntry,
        pub mode: EnumEntry<Mode>,
    }

    impl Default for EntryConfig {
        fn default() -> Self {
            Self {
                port: ConfigEntry::new(8080),
                bounded: IntEntry::new(50, 0, 100),
                ratio: DoubleEntry::new(0.5, 0.0, 1.0),
                enabled: BoolEntry::new(true),
                mode: EnumEntry::new(Mode::Development),
            }
        }
    }

    impl Schema for EntryConfig {
        fn fields() -> Vec<FieldDescriptor<Self>> {
            vec![
                FieldDescriptor::entry("port", |c: &Self| &c.port, |c: &mut Self| &mut c.port),
                FieldDescriptor::entry(
                    "bounded",
                    |c: &Self| &c.bounded,
                    |c: &mut Self| &mut c.bounded,
                ),
                FieldDescriptor::entry("ratio", |c: &Self| &c.ratio, |c: &mut Self| &mut c.ratio),
                FieldDescriptor::entry(
                    "enabled",
                    |c: &Self| &c.enabled,
                    |c: &mut Self| &mut c.enabled,
                ),
                FieldDescriptor::entry("mode", |c: &Self| &c.mode, |c: &mut Self| &mut c.mode),
            ]
        }
    }

    #[derive(Debug, PartialEq, Default)]
    pub struct NestedEntryConfig {
        pub codec: EntryConfig,
    }

    impl Schema for NestedEntryConfig {
        fn fields() -> Vec<FieldDescriptor<Self>> {
            vec![FieldDescriptor::nested(
                "codec",
                |c: &Self| &c.codec,
                |c: &mut Self| &mut c.codec,
            )]
        }
    }

    // -- Validators and transformers ---------------------------------------------

    #[derive(Debug, PartialEq)]
    pub struct ValidatedConfig {
        pub level: i32,
        pub name: String,
        pub mode: Mode,
    }

    impl Default for ValidatedConfig {
        fn default() -> Self {
            Self {
                level: 1,
                name: String::new(),
                mode: Mode::Development,
            }
        }
    }

    impl Schema for ValidatedConfig {
        fn fields() -> Vec<FieldDescriptor<Self>> {
            vec![
                FieldDescriptor::plain("level", |c: &Self| c.level, |c, v| c.level = v).validate(
                    |v| v.as_integer().is_some_and(|i| (0..=10).contains(&i)),
                    &["0..=10"],
                ),
                FieldDescriptor::plain("name", |c: &Self| c.name.clone(), |c, v| c.name = v)
                    .transform(|v| match v {
                        Value::String(s) => Value::String(s.trim().to_owned()),
                        other => other,
                    })
                    .transform(|v| match v {
                        Value::String(s) => Value::String(s.to_lowercase()),
                        other => other,
                    }),
                FieldDescriptor::enumerated("mode", |c: &Self| c.mode, |c, v| c.mode = v),
            ]
        }
    }

    // -- Omit-if-default, nested validation, and declaration order ---------------

    #[derive(Debug, PartialEq)]
    pub struct SparseConfig {
        pub greeting: ConfigEntry<String>,
        pub limits: LimitsConfig,
        pub after: i64,
    }

    impl Default for SparseConfig {
        fn default() -> Self {
            Self {
                greeting: ConfigEntry::new(String::new()),
                limits: LimitsConfig::default(),
                after: 0,
            }
        }
    }

    impl Schema for SparseConfig {
        fn fields() -> Vec<FieldDescriptor<Self>> {
            vec![
                FieldDescriptor::entry(
                    "greeting",
                    |c: &Self| &c.greeting,
                    |c: &mut Self| &mut c.greeting,
                )
                .skip_default(),
                FieldDescriptor::nested(
                    "limits",
                    |c: &Self| &c.limits,
                    |c: &mut Self| &mut c.limits,
                )
                .comment("Resource limits.\nConservative out of the box."),
                FieldDescriptor::plain("after", |c: &Self| c.after, |c, v| c.after = v),
            ]
        }
    }

    #[derive(Debug, PartialEq, Default)]
    pub struct LimitsConfig {
        pub level: i32,
    }

    impl Schema for LimitsConfig {
        fn fields() -> Vec<FieldDescriptor<Self>> {
            vec![
                FieldDescriptor::plain("level", |c: &Self| c.level, |c, v| c.level = v).validate(
                    |v| v.as_integer().is_some_and(|i| i >= 0),
                    &["non-negative integers"],
                ),
            ]
        }
    }

    // -- Declared field with no accessors ----------------------------------------

    #[derive(Debug, PartialEq, Default)]
    pub struct SkippedFieldConfig {
        pub kept: i64,
        pub ghost: i64,
    }

    impl Schema for SkippedFieldConfig {
        fn fields() -> Vec<FieldDescriptor<Self>> {
            vec![
                FieldDescriptor::plain("kept", |c: &Self| c.kept, |c, v| c.kept = v),
                FieldDescriptor::unbound("ghost"),
            ]
        }
    }

    // -- Mapping-valued plain fields ---------------------------------------------

    #[derive(Debug, PartialEq)]
    pub struct MapConfig {
        pub aliases: BTreeMap<String, String>,
        pub servers: BTreeMap<String, BTreeMap<String, String>>,
    }

    impl Default for MapConfig {
        fn default() -> Self {
            let mut aliases = BTreeMap::new();
            aliases.insert("ls".to_string(), "list".to_string());
            aliases.insert("rm".to_string(), "remove".to_string());

            let mut eu = BTreeMap::new();
            eu.insert("host".to_string(), "eu.example.org".to_string());
            let mut us = BTreeMap::new();
            us.insert("host".to_string(), "us.example.org".to_string());
            let mut servers = BTreeMap::new();
            servers.insert("eu".to_string(), eu);
            servers.insert("us".to_string(), us);

            Self { aliases, servers }
        }
    }

    impl Schema for MapConfig {
        fn fields() -> Vec<FieldDescriptor<Self>> {
            vec![
                FieldDescriptor::plain("aliases", |c: &Self| c.aliases.clone(), |c, v| {
                    c.aliases = v
                })
                .comment("Command aliases."),
                FieldDescriptor::plain("servers", |c: &Self| c.servers.clone(), |c, v| {
                    c.servers = v
                }),
            ]
        }
    }

    #[test]
    fn defaults_construct_cleanly() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 8080);
        assert!(!config.debug);
        assert_eq!(config.database.pool_size, 5);

        let entries = EntryConfig::default();
        assert_eq!(*entries.port.value(), 8080);
        assert_eq!(entries.bounded.value(), 50);
        assert!(entries.port.is_default());
    }
}
