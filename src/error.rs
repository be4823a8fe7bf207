// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FissionError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to build request: {0}")]
    RequestError(#[from] kube::core::request::Error),

    #[error("Failed to encode package: {0}")]
    EncodeError(#[from] serde_json::Error),
}

impl FissionError {
    /// HTTP status code reported by the API server, if the failure came from it
    pub fn status_code(&self) -> Option<u16> {
        match self {
            FissionError::KubeError(kube::Error::Api(err)) => Some(err.code),
            _ => None,
        }
    }

    /// The addressed resource does not exist
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// The server rejected the write because of a name clash or a stale resource version
    pub fn is_conflict(&self) -> bool {
        self.status_code() == Some(409)
    }
}

pub type Result<T> = std::result::Result<T, FissionError>;
