// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Caller-owned stream of package change events.

use crate::error::Result;
use crate::types::package::Package;
use futures::stream::{BoxStream, Stream, StreamExt, TryStreamExt};
use http_body_util::BodyExt;
use kube::api::WatchEvent;
use kube::client::Body;
use kube::core::ErrorResponse;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};
use tokio_util::io::StreamReader;
use tracing::debug;

/// An open watch connection delivering `Added`/`Modified`/`Deleted` events.
///
/// The underlying connection stays open until the server ends the stream,
/// [`PackageWatch::stop`] is called, or the value is dropped. Nothing is
/// re-established automatically.
pub struct PackageWatch {
    events: Option<BoxStream<'static, Result<WatchEvent<Package>>>>,
    namespace: String,
}

impl PackageWatch {
    pub(crate) fn new<S>(events: S, namespace: &str) -> Self
    where
        S: Stream<Item = Result<WatchEvent<Package>>> + Send + 'static,
    {
        Self {
            events: Some(events.boxed()),
            namespace: namespace.to_string(),
        }
    }

    /// Decode a newline-delimited `WatchEvent` response body
    pub(crate) fn from_body(body: Body, namespace: &str) -> Self {
        let reader = StreamReader::new(
            body.into_data_stream()
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e)),
        );
        let events = FramedRead::new(reader, LinesCodec::new())
            .filter_map(|line| async move { decode_line(line) });
        Self::new(events, namespace)
    }

    /// Namespace the watch is scoped to
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Close the connection; the stream yields no further events
    pub fn stop(&mut self) {
        if self.events.take().is_some() {
            debug!(namespace = %self.namespace, "Package watch stopped");
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.events.is_none()
    }
}

impl Stream for PackageWatch {
    type Item = Result<WatchEvent<Package>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let Some(events) = self.events.as_mut() else {
            return Poll::Ready(None);
        };
        match events.poll_next_unpin(cx) {
            Poll::Ready(None) => {
                self.events = None;
                Poll::Ready(None)
            }
            other => other,
        }
    }
}

fn decode_line(
    line: std::result::Result<String, LinesCodecError>,
) -> Option<Result<WatchEvent<Package>>> {
    let line = match line {
        Ok(line) => line,
        Err(LinesCodecError::Io(e)) => return Some(Err(kube::Error::ReadEvents(e).into())),
        Err(LinesCodecError::MaxLineLengthExceeded) => {
            return Some(Err(kube::Error::LinesCodecMaxLineLengthExceeded.into()))
        }
    };
    if line.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<WatchEvent<Package>>(&line) {
        Ok(event) => Some(Ok(event)),
        // A bare Status line means the server gave up on the watch
        Err(e) => match serde_json::from_str::<ErrorResponse>(&line) {
            Ok(response) => Some(Err(kube::Error::Api(response).into())),
            Err(_) => Some(Err(kube::Error::SerdeError(e).into())),
        },
    }
}
