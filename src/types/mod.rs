// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Custom resource schemas served under `fission.io/v1`.

pub mod package;

pub use package::{
    Archive, ArchiveType, BuildStatus, Checksum, ChecksumType, EnvironmentReference, Package,
    PackageList, PackageSpec, PackageStatus,
};
