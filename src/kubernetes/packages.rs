// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Typed CRUD and watch access to `fission.io/v1` Packages in a single namespace.

use crate::constants::resource::{GROUP, PLURAL, VERSION, WATCH_PREFIX};
use crate::error::{FissionError, Result};
use crate::kubernetes::options::ListOptions;
use crate::kubernetes::watch::PackageWatch;
use crate::types::package::{Package, PackageList};
use async_trait::async_trait;
use http::StatusCode;
use http_body_util::BodyExt;
use kube::api::{DeleteParams, GetParams, PostParams};
use kube::client::Body;
use kube::core::{ErrorResponse, Request};
use kube::Client;
use tracing::{debug, instrument};

/// Operations on the Packages of one namespace
#[async_trait]
pub trait PackageInterface: Send + Sync {
    /// Create a package; returns the record as stored by the server
    async fn create(&self, package: &Package) -> Result<Package>;

    async fn get(&self, name: &str) -> Result<Package>;

    /// Replace the package named by `package.metadata.name`
    async fn update(&self, package: &Package) -> Result<Package>;

    async fn delete(&self, name: &str, options: &DeleteParams) -> Result<()>;

    /// List one page of packages; pagination is left to the caller
    async fn list(&self, options: &ListOptions) -> Result<PackageList>;

    /// Open a watch starting at `options.resource_version`
    async fn watch(&self, options: &ListOptions) -> Result<PackageWatch>;
}

/// [`PackageInterface`] backed by a [`kube::Client`]
#[derive(Clone)]
pub struct PackageClient {
    client: Client,
    namespace: String,
}

pub fn make_package_interface(client: Client, namespace: &str) -> Box<dyn PackageInterface> {
    Box::new(PackageClient::new(client, namespace))
}

impl PackageClient {
    pub fn new(client: Client, namespace: &str) -> Self {
        Self {
            client,
            namespace: namespace.to_string(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// `/apis/fission.io/v1/namespaces/{ns}/packages`
    fn collection(&self) -> Request {
        Request::new(format!(
            "/apis/{}/{}/namespaces/{}/{}",
            GROUP, VERSION, self.namespace, PLURAL
        ))
    }

    /// `/apis/fission.io/v1/watch/namespaces/{ns}/packages`
    fn watch_collection(&self) -> Request {
        Request::new(format!(
            "/apis/{}/{}/{}/namespaces/{}/{}",
            GROUP, VERSION, WATCH_PREFIX, self.namespace, PLURAL
        ))
    }
}

#[async_trait]
impl PackageInterface for PackageClient {
    #[instrument(skip(self, package), fields(namespace = %self.namespace, name = ?package.metadata.name))]
    async fn create(&self, package: &Package) -> Result<Package> {
        let data = serde_json::to_vec(package)?;
        let req = self.collection().create(&PostParams::default(), data)?;
        debug!("Creating package");
        Ok(self.client.request::<Package>(req).await?)
    }

    #[instrument(skip(self), fields(namespace = %self.namespace))]
    async fn get(&self, name: &str) -> Result<Package> {
        let req = self.collection().get(name, &GetParams::default())?;
        debug!("Getting package");
        Ok(self.client.request::<Package>(req).await?)
    }

    #[instrument(skip(self, package), fields(namespace = %self.namespace, name = ?package.metadata.name))]
    async fn update(&self, package: &Package) -> Result<Package> {
        let name = package.metadata.name.as_deref().unwrap_or_default();
        let data = serde_json::to_vec(package)?;
        let req = self.collection().replace(name, &PostParams::default(), data)?;
        debug!("Replacing package");
        Ok(self.client.request::<Package>(req).await?)
    }

    #[instrument(skip(self, options), fields(namespace = %self.namespace))]
    async fn delete(&self, name: &str, options: &DeleteParams) -> Result<()> {
        let req = self.collection().delete(name, options)?;
        debug!("Deleting package");
        // The server answers with either the deleted object or a Status
        self.client.request_status::<Package>(req).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(namespace = %self.namespace))]
    async fn list(&self, options: &ListOptions) -> Result<PackageList> {
        let req = self.collection().list(&options.to_list_params())?;
        debug!("Listing packages");
        Ok(self.client.request::<PackageList>(req).await?)
    }

    #[instrument(skip(self), fields(namespace = %self.namespace))]
    async fn watch(&self, options: &ListOptions) -> Result<PackageWatch> {
        let mut req = self
            .watch_collection()
            .watch(&options.to_watch_params(), options.watch_version())?;
        req.extensions_mut().insert("watch");
        debug!(version = options.watch_version(), "Opening package watch");
        let res = self.client.send(req.map(Body::from)).await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.into_body().collect().await?.to_bytes();
            return Err(watch_refused(status, &body));
        }
        Ok(PackageWatch::from_body(res.into_body(), &self.namespace))
    }
}

/// Turn a refused watch response into the server's error
fn watch_refused(status: StatusCode, body: &[u8]) -> FissionError {
    let response = serde_json::from_slice::<ErrorResponse>(body).or_else(|_| {
        serde_json::from_value(serde_json::json!({
            "status": status.to_string(),
            "message": String::from_utf8_lossy(body),
            "reason": "Failed to parse error data",
            "code": status.as_u16(),
        }))
    });
    match response {
        Ok(response) => FissionError::KubeError(kube::Error::Api(response)),
        Err(e) => FissionError::KubeError(kube::Error::SerdeError(e)),
    }
}
