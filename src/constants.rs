// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Identity of the Package resource on the API server
pub mod resource {
    /// API group serving the Fission custom resources
    pub const GROUP: &str = "fission.io";
    /// Served version of the group
    pub const VERSION: &str = "v1";
    /// Kind of the resource
    pub const KIND: &str = "Package";
    /// Plural resource name used in every request path
    pub const PLURAL: &str = "packages";
    /// Path prefix for the deprecated watch endpoints
    pub const WATCH_PREFIX: &str = "watch";
}

/// Namespace used when none is configured
pub const DEFAULT_NAMESPACE: &str = "default";

/// Resource version to start a watch from when the caller gives no cursor
pub const DEFAULT_WATCH_VERSION: &str = "0";

/// CRD polling configuration
pub mod crd {
    /// Initial polling interval in seconds when waiting for CRD
    pub const POLL_INTERVAL_SECS: u64 = 10;
    /// Maximum polling interval in seconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_SECS: u64 = 60;
}
