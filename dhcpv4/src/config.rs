//
// DHCP-RS
//   Copyright (C) 2024-2025, Toshiaki Takada
//

use serde::Deserialize;

use crate::*;
use crate::builder::DEFAULT_REQUESTED_OPTIONS;
use crate::modifiers::*;

/// Defaults for building client messages, typically loaded from JSON.
#[derive(Debug, Default, Deserialize)]
pub struct BuilderConfig {
    pub debug: Option<bool>,
    pub broadcast: Option<bool>,
    pub requested_options: Option<Vec<u8>>,
    pub hostname: Option<String>,
    pub vendor_class: Option<String>,
    pub user_class: Option<ConfigUserClass>,
}

#[derive(Debug, Deserialize)]
pub struct ConfigUserClass {
    pub data: String,
    pub rfc3004: Option<bool>,
}

impl BuilderConfig {
    pub fn from_json(s: &str) -> Result<BuilderConfig, DhcpError> {
        serde_json::from_str(s).map_err(|e| DhcpError::ConfigError(e.to_string()))
    }

    pub fn is_debug_enabled(&self) -> bool {
        self.debug.unwrap_or(false)
    }

    /// Parameter Request List codes, the default set when not configured.
    pub fn requested_options(&self) -> Vec<u8> {
        match &self.requested_options {
            Some(codes) => codes.clone(),
            None => DEFAULT_REQUESTED_OPTIONS.to_vec(),
        }
    }

    /// Modifiers for the optional client identification options.
    pub fn modifiers(&self) -> Vec<Modifier> {
        let mut modifiers = Vec::new();

        if let Some(hostname) = &self.hostname {
            modifiers.push(with_option(DhcpOption::host_name(hostname)));
        }
        if let Some(vendor_class) = &self.vendor_class {
            modifiers.push(with_option(DhcpOption::vendor_class_identifier(vendor_class)));
        }
        if let Some(user_class) = &self.user_class {
            modifiers.push(with_user_class(user_class.data.as_bytes(), user_class.rfc3004.unwrap_or(false)));
        }

        modifiers
    }
}
