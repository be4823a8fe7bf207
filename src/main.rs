// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use futures::StreamExt;
use kube::api::WatchEvent;
use kube::{Client, CustomResourceExt, ResourceExt};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fission_packages::config::Config;
use fission_packages::kubernetes::{wait_for_package_crd, PackageClient, PackageInterface};
use fission_packages::Package;

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::args().nth(1).as_deref() == Some("crd") {
        print!("{}", serde_yaml::to_string(&Package::crd())?);
        return Ok(());
    }

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting package watcher");

    let config = Config::from_env()?;
    info!("Configuration loaded: namespace={}", config.namespace);

    let client = Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    info!("Waiting for Package CRD to become available...");
    wait_for_package_crd(&client).await?;

    let packages = PackageClient::new(client, &config.namespace);
    let options = config.list_options();

    let list = packages.list(&options).await?;
    info!("Found {} packages in {}", list.items.len(), config.namespace);
    for package in &list.items {
        info!(
            "Package {} (environment {}, build {:?})",
            package.name_any(),
            package.environment_name(),
            package.build_status()
        );
    }

    let mut watch_options = options.clone();
    watch_options.resource_version = list.metadata.resource_version.clone();
    let mut watch = packages.watch(&watch_options).await?;
    info!("Watching packages in {}", watch.namespace());

    while let Some(event) = watch.next().await {
        match event? {
            WatchEvent::Added(p) => info!("Added package {}", p.name_any()),
            WatchEvent::Modified(p) => {
                info!("Modified package {} (build {:?})", p.name_any(), p.build_status())
            }
            WatchEvent::Deleted(p) => info!("Deleted package {}", p.name_any()),
            WatchEvent::Bookmark(_) => {}
            WatchEvent::Error(e) => {
                warn!("Watch error from server: {}", e);
                break;
            }
        }
    }

    watch.stop();
    info!("Package watch closed");
    Ok(())
}
