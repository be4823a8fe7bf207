// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes access for Packages: the typed client, its options and watch stream,
//! and CRD discovery.

pub mod crd;
pub mod options;
pub mod packages;
pub mod watch;

pub use crd::wait_for_package_crd;
pub use options::ListOptions;
pub use packages::{make_package_interface, PackageClient, PackageInterface};
pub use watch::PackageWatch;
