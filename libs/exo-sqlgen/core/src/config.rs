// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde::Deserialize;

/// How a preparable value is represented in the prepared SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderStyle {
    /// `?` for every parameter (JDBC/ODBC/SQLite style)
    #[default]
    Question,
    /// `$1`, `$2`, ... (Postgres style)
    Numbered,
}

impl PlaceholderStyle {
    /// The placeholder for the parameter at the given 1-based index
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            PlaceholderStyle::Question => "?".to_string(),
            PlaceholderStyle::Numbered => format!("${index}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub placeholder_style: PlaceholderStyle,
    /// Double-quote each segment of column references that didn't pick a quoting mode
    /// explicitly.
    pub quote_identifiers: bool,
}

pub const PLACEHOLDER_STYLE_KEY: &str = "EXO_SQL_PLACEHOLDER_STYLE";
pub const QUOTE_IDENTIFIERS_KEY: &str = "EXO_SQL_QUOTE_IDENTIFIERS";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "Invalid value for {key}: {value}. Expected true, 1, yes, on, enabled, enable OR false, 0, no, off, disabled, disable"
    )]
    InvalidBoolean { key: String, value: String },

    #[error("Invalid value for {key}: {value}. Expected question or numbered")]
    InvalidPlaceholderStyle { key: String, value: String },
}

impl RenderConfig {
    pub fn new(placeholder_style: PlaceholderStyle, quote_identifiers: bool) -> Self {
        Self {
            placeholder_style,
            quote_identifiers,
        }
    }

    /// Postgres flavor: numbered placeholders and quoted identifiers.
    pub fn postgres() -> Self {
        Self::new(PlaceholderStyle::Numbered, true)
    }

    /// Read the configuration from the process environment. Unset keys keep their default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = RenderConfig::default();

        let placeholder_style = match lookup(PLACEHOLDER_STYLE_KEY) {
            Some(value) => match value.to_lowercase().as_str() {
                "question" | "?" => PlaceholderStyle::Question,
                "numbered" | "$" => PlaceholderStyle::Numbered,
                _ => {
                    return Err(ConfigError::InvalidPlaceholderStyle {
                        key: PLACEHOLDER_STYLE_KEY.to_string(),
                        value,
                    });
                }
            },
            None => defaults.placeholder_style,
        };

        let quote_identifiers = enabled(
            &lookup,
            QUOTE_IDENTIFIERS_KEY,
            defaults.quote_identifiers,
        )?;

        Ok(Self {
            placeholder_style,
            quote_identifiers,
        })
    }
}

fn enabled(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default_value: bool,
) -> Result<bool, ConfigError> {
    match lookup(key) {
        Some(value) => match value.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" | "enabled" | "enable" => Ok(true),
            "false" | "0" | "no" | "off" | "disabled" | "disable" => Ok(false),
            _ => Err(ConfigError::InvalidBoolean {
                key: key.to_string(),
                value,
            }),
        },
        None => Ok(default_value),
    }
}
