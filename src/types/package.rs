// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use k8s_openapi::ByteString;
use kube::api::ObjectList;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// A unit of deployable code or configuration, built by an environment's builder
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, schemars::JsonSchema)]
#[kube(group = "fission.io", version = "v1", kind = "Package", plural = "packages")]
#[kube(namespaced)]
#[kube(status = "PackageStatus")]
#[serde(rename_all = "camelCase")]
pub struct PackageSpec {
    pub environment: EnvironmentReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Archive>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment: Option<Archive>,
    #[serde(rename = "buildcmd", default, skip_serializing_if = "Option::is_none")]
    pub build_command: Option<String>,
}

/// List of packages with list metadata (resource version, continue token)
pub type PackageList = ObjectList<Package>;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
pub struct EnvironmentReference {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveType {
    Literal,
    Url,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumType {
    Sha256,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
pub struct Checksum {
    #[serde(rename = "type")]
    pub checksum_type: ChecksumType,
    pub sum: String,
}

/// Package contents, either inline or fetched from a URL
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
pub struct Archive {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub archive_type: Option<ArchiveType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub literal: Option<ByteString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<Checksum>,
}

impl Archive {
    /// Inline archive; the bytes are base64 encoded on the wire
    pub fn from_literal(contents: impl Into<Vec<u8>>) -> Self {
        Self {
            archive_type: Some(ArchiveType::Literal),
            literal: Some(ByteString(contents.into())),
            ..Default::default()
        }
    }

    /// Archive fetched from `url`, optionally pinned by a sha256 sum
    pub fn from_url(url: &str, sha256: Option<&str>) -> Self {
        Self {
            archive_type: Some(ArchiveType::Url),
            url: Some(url.to_string()),
            checksum: sha256.map(|sum| Checksum {
                checksum_type: ChecksumType::Sha256,
                sum: sum.to_string(),
            }),
            ..Default::default()
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BuildStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    #[default]
    None,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PackageStatus {
    #[serde(rename = "buildstatus", default, skip_serializing_if = "Option::is_none")]
    pub build_status: Option<BuildStatus>,
    #[serde(rename = "buildlog", default, skip_serializing_if = "Option::is_none")]
    pub build_log: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update_timestamp: Option<Time>,
}

impl Package {
    /// Name of the environment whose builder and runtime this package targets
    pub fn environment_name(&self) -> &str {
        &self.spec.environment.name
    }

    pub fn build_status(&self) -> BuildStatus {
        self.status
            .as_ref()
            .and_then(|s| s.build_status)
            .unwrap_or_default()
    }

    /// Check if the builder is done with this package, successfully or not
    pub fn is_build_finished(&self) -> bool {
        matches!(
            self.build_status(),
            BuildStatus::Succeeded | BuildStatus::Failed | BuildStatus::None
        )
    }
}
