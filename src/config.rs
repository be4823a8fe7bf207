// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::DEFAULT_NAMESPACE;
use crate::kubernetes::ListOptions;
use anyhow::{Context, Result};
use std::env;

/// Watcher configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Namespace whose packages are listed and watched
    pub namespace: String,
    pub watch_timeout_secs: Option<u32>,
    pub label_selector: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let namespace = lookup("FISSION_NAMESPACE")
            .filter(|ns| !ns.is_empty())
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

        let watch_timeout_secs = lookup("PACKAGE_WATCH_TIMEOUT")
            .map(|v| {
                v.parse::<u32>()
                    .with_context(|| format!("PACKAGE_WATCH_TIMEOUT is not a number of seconds: {}", v))
            })
            .transpose()?;

        let label_selector = lookup("PACKAGE_LABEL_SELECTOR").filter(|s| !s.is_empty());

        Ok(Config {
            namespace,
            watch_timeout_secs,
            label_selector,
        })
    }

    /// Options used for both the initial list and the following watch
    pub fn list_options(&self) -> ListOptions {
        ListOptions {
            label_selector: self.label_selector.clone(),
            timeout_seconds: self.watch_timeout_secs,
            ..Default::default()
        }
    }
}
