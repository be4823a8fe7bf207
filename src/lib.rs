// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod config;
pub mod constants;
pub mod error;
pub mod kubernetes;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use error::{FissionError, Result};
pub use kubernetes::{make_package_interface, ListOptions, PackageClient, PackageInterface, PackageWatch};
pub use types::package::{Package, PackageList};
