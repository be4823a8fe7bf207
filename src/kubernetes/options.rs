// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! List and watch options forwarded to the API server as query parameters.

use crate::constants::DEFAULT_WATCH_VERSION;
use kube::api::{ListParams, WatchParams};

/// Filters and cursors shared by list and watch requests.
///
/// `limit` and `continue_token` only apply to lists; a watch ignores them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Restrict results by labels, e.g. `environment=nodejs`
    pub label_selector: Option<String>,
    /// Restrict results by fields, e.g. `metadata.name=hello`
    pub field_selector: Option<String>,
    /// Resource version to list at, or to start watching from
    pub resource_version: Option<String>,
    /// Server side timeout of the call in seconds
    pub timeout_seconds: Option<u32>,
    pub limit: Option<u32>,
    /// Continuation token returned by a previous paginated list
    pub continue_token: Option<String>,
    /// Ask the server to send bookmark events on watches
    pub allow_watch_bookmarks: bool,
}

impl ListOptions {
    pub fn labels(mut self, label_selector: &str) -> Self {
        self.label_selector = Some(label_selector.to_string());
        self
    }

    pub fn fields(mut self, field_selector: &str) -> Self {
        self.field_selector = Some(field_selector.to_string());
        self
    }

    pub fn at(mut self, resource_version: &str) -> Self {
        self.resource_version = Some(resource_version.to_string());
        self
    }

    pub fn timeout(mut self, timeout_secs: u32) -> Self {
        self.timeout_seconds = Some(timeout_secs);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn continue_token(mut self, token: &str) -> Self {
        self.continue_token = Some(token.to_string());
        self
    }

    pub fn bookmarks(mut self) -> Self {
        self.allow_watch_bookmarks = true;
        self
    }

    pub fn to_list_params(&self) -> ListParams {
        let mut lp = ListParams::default();
        if let Some(labels) = &self.label_selector {
            lp = lp.labels(labels);
        }
        if let Some(fields) = &self.field_selector {
            lp = lp.fields(fields);
        }
        if let Some(version) = &self.resource_version {
            lp = lp.at(version);
        }
        lp.timeout = self.timeout_seconds;
        if let Some(limit) = self.limit {
            lp = lp.limit(limit);
        }
        if let Some(token) = &self.continue_token {
            lp = lp.continue_token(token);
        }
        lp
    }

    pub fn to_watch_params(&self) -> WatchParams {
        let mut wp = WatchParams::default();
        if let Some(labels) = &self.label_selector {
            wp = wp.labels(labels);
        }
        if let Some(fields) = &self.field_selector {
            wp = wp.fields(fields);
        }
        // Out of range timeouts are rejected when the request is built
        wp.timeout = self.timeout_seconds;
        if !self.allow_watch_bookmarks {
            wp = wp.disable_bookmarks();
        }
        wp
    }

    /// Cursor a watch starts from
    pub fn watch_version(&self) -> &str {
        self.resource_version
            .as_deref()
            .unwrap_or(DEFAULT_WATCH_VERSION)
    }
}
