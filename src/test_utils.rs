// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! In-memory API server for exercising a real `kube::Client` in tests.

use http::{Method, Request, Response, StatusCode};
use http_body_util::BodyExt;
use kube::client::Body;
use kube::Client;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

const API_PREFIX: &str = "/apis/fission.io/v1/";

/// A request as received by the fake server
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn query_param(&self, key: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}

struct WatchRecord {
    revision: u64,
    namespace: String,
    event_type: &'static str,
    object: Value,
}

#[derive(Default)]
struct State {
    revision: u64,
    // (namespace, name) -> (creation revision, object)
    objects: BTreeMap<(String, String), (u64, Value)>,
    events: Vec<WatchRecord>,
    requests: Vec<RecordedRequest>,
    crd_missing: bool,
}

impl State {
    fn next_revision(&mut self) -> u64 {
        self.revision += 1;
        self.revision
    }

    fn record(&mut self, namespace: &str, event_type: &'static str, object: &Value) {
        self.events.push(WatchRecord {
            revision: self.revision,
            namespace: namespace.to_string(),
            event_type,
            object: object.clone(),
        });
    }
}

/// A fake `fission.io/v1` API server serving `packages`.
///
/// Objects get a fresh `resourceVersion` on every write, PUT replaces the
/// stored object wholesale, and watches replay every event newer than the
/// requested version before ending the response. Discovery (`/apis` and
/// `/apis/fission.io/v1`) advertises the namespaced `packages` resource.
#[derive(Clone, Default)]
pub struct FakeApiServer {
    state: Arc<Mutex<State>>,
}

enum Route {
    Collection { namespace: String },
    Item { namespace: String, name: String },
    Watch { namespace: String },
}

fn route(path: &str) -> Option<Route> {
    let rest = path.strip_prefix(API_PREFIX)?;
    let segments: Vec<&str> = rest.split('/').collect();
    match segments.as_slice() {
        ["namespaces", ns, "packages"] => Some(Route::Collection {
            namespace: ns.to_string(),
        }),
        ["namespaces", ns, "packages", name] => Some(Route::Item {
            namespace: ns.to_string(),
            name: name.to_string(),
        }),
        ["watch", "namespaces", ns, "packages"] => Some(Route::Watch {
            namespace: ns.to_string(),
        }),
        _ => None,
    }
}

fn status_json(code: StatusCode, reason: &str, message: String) -> (StatusCode, String) {
    let body = json!({
        "kind": "Status",
        "apiVersion": "v1",
        "metadata": {},
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code.as_u16()
    });
    (code, body.to_string())
}

fn unknown_resource(path: &str) -> (StatusCode, String) {
    status_json(
        StatusCode::NOT_FOUND,
        "NotFound",
        format!("the server could not find the requested resource {}", path),
    )
}

fn api_group_list(crd_missing: bool) -> Value {
    let version = json!({ "groupVersion": "fission.io/v1", "version": "v1" });
    let groups = if crd_missing {
        vec![]
    } else {
        vec![json!({
            "name": "fission.io",
            "versions": [version.clone()],
            "preferredVersion": version
        })]
    };
    json!({ "kind": "APIGroupList", "apiVersion": "v1", "groups": groups })
}

fn package_resource_list() -> Value {
    json!({
        "kind": "APIResourceList",
        "apiVersion": "v1",
        "groupVersion": "fission.io/v1",
        "resources": [{
            "name": "packages",
            "singularName": "package",
            "namespaced": true,
            "kind": "Package",
            "verbs": ["create", "delete", "get", "list", "update", "watch"]
        }]
    })
}

fn not_found(name: &str) -> (StatusCode, String) {
    status_json(
        StatusCode::NOT_FOUND,
        "NotFound",
        format!("packages.fission.io \"{}\" not found", name),
    )
}

fn labels_match(object: &Value, selector: Option<&str>) -> bool {
    let Some(selector) = selector.filter(|s| !s.is_empty()) else {
        return true;
    };
    let labels = &object["metadata"]["labels"];
    selector.split(',').all(|pair| match pair.split_once('=') {
        Some((key, value)) => labels[key.trim()].as_str() == Some(value.trim()),
        None => true,
    })
}

impl FakeApiServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve no `fission.io` group, as a cluster without the CRD installed
    pub fn without_package_crd(self) -> Self {
        self.state.lock().unwrap().crd_missing = true;
        self
    }

    /// Build a kube Client talking to this server
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.state.lock().unwrap().requests.last().cloned()
    }

    fn handle(&self, request: RecordedRequest) -> (StatusCode, String) {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());

        let label_selector = request.query_param("labelSelector");
        let method = request.method.as_str();
        match (method, request.path.as_str()) {
            ("GET", "/apis") => {
                return (StatusCode::OK, api_group_list(state.crd_missing).to_string())
            }
            ("GET", "/apis/fission.io/v1") if !state.crd_missing => {
                return (StatusCode::OK, package_resource_list().to_string())
            }
            _ if state.crd_missing => return unknown_resource(&request.path),
            _ => {}
        }
        match (method, route(&request.path)) {
            ("POST", Some(Route::Collection { namespace })) => {
                let Ok(mut object) = serde_json::from_slice::<Value>(&request.body) else {
                    return status_json(
                        StatusCode::BAD_REQUEST,
                        "BadRequest",
                        "invalid body".to_string(),
                    );
                };
                let name = object["metadata"]["name"].as_str().unwrap_or_default().to_string();
                let key = (namespace.clone(), name.clone());
                if state.objects.contains_key(&key) {
                    return status_json(
                        StatusCode::CONFLICT,
                        "AlreadyExists",
                        format!("packages.fission.io \"{}\" already exists", name),
                    );
                }
                let revision = state.next_revision();
                object["metadata"]["namespace"] = json!(namespace);
                object["metadata"]["resourceVersion"] = json!(revision.to_string());
                object["metadata"]["uid"] = json!(format!("uid-{}", revision));
                state.objects.insert(key, (revision, object.clone()));
                state.record(&namespace, "ADDED", &object);
                (StatusCode::CREATED, object.to_string())
            }
            ("GET", Some(Route::Item { namespace, name })) => {
                match state.objects.get(&(namespace, name.clone())) {
                    Some((_, object)) => (StatusCode::OK, object.to_string()),
                    None => not_found(&name),
                }
            }
            ("PUT", Some(Route::Item { namespace, name })) => {
                let Ok(mut object) = serde_json::from_slice::<Value>(&request.body) else {
                    return status_json(
                        StatusCode::BAD_REQUEST,
                        "BadRequest",
                        "invalid body".to_string(),
                    );
                };
                let key = (namespace.clone(), name.clone());
                let Some((created, stored)) = state.objects.get(&key).cloned() else {
                    return not_found(&name);
                };
                let stored_version = stored["metadata"]["resourceVersion"].clone();
                let given_version = &object["metadata"]["resourceVersion"];
                if !given_version.is_null() && *given_version != stored_version {
                    return status_json(
                        StatusCode::CONFLICT,
                        "Conflict",
                        format!(
                            "Operation cannot be fulfilled on packages.fission.io \"{}\": the object has been modified",
                            name
                        ),
                    );
                }
                let revision = state.next_revision();
                object["metadata"]["namespace"] = json!(namespace);
                object["metadata"]["uid"] = stored["metadata"]["uid"].clone();
                object["metadata"]["resourceVersion"] = json!(revision.to_string());
                state.objects.insert(key, (created, object.clone()));
                state.record(&namespace, "MODIFIED", &object);
                (StatusCode::OK, object.to_string())
            }
            ("DELETE", Some(Route::Item { namespace, name })) => {
                let Some((_, object)) = state.objects.remove(&(namespace.clone(), name.clone()))
                else {
                    return not_found(&name);
                };
                state.next_revision();
                state.record(&namespace, "DELETED", &object);
                (StatusCode::OK, object.to_string())
            }
            ("GET", Some(Route::Collection { namespace })) => {
                let mut matching: Vec<&(u64, Value)> = state
                    .objects
                    .iter()
                    .filter(|((ns, _), (_, object))| {
                        *ns == namespace && labels_match(object, label_selector.as_deref())
                    })
                    .map(|(_, entry)| entry)
                    .collect();
                matching.sort_by_key(|(created, _)| *created);
                let items: Vec<Value> = matching.into_iter().map(|(_, o)| o.clone()).collect();
                let body = json!({
                    "apiVersion": "fission.io/v1",
                    "kind": "PackageList",
                    "metadata": { "resourceVersion": state.revision.to_string() },
                    "items": items
                });
                (StatusCode::OK, body.to_string())
            }
            ("GET", Some(Route::Watch { namespace })) => {
                let version = request.query_param("resourceVersion").unwrap_or_default();
                let since: u64 = if version.is_empty() {
                    0
                } else {
                    match version.parse() {
                        Ok(since) => since,
                        Err(_) => {
                            return status_json(
                                StatusCode::BAD_REQUEST,
                                "BadRequest",
                                format!("invalid resource version \"{}\"", version),
                            )
                        }
                    }
                };
                let lines: String = state
                    .events
                    .iter()
                    .filter(|e| e.namespace == namespace && e.revision > since)
                    .filter(|e| labels_match(&e.object, label_selector.as_deref()))
                    .map(|e| format!("{}\n", json!({ "type": e.event_type, "object": e.object })))
                    .collect();
                (StatusCode::OK, lines)
            }
            _ => unknown_resource(&request.path),
        }
    }
}

impl Service<Request<Body>> for FakeApiServer {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let server = self.clone();

        Box::pin(async move {
            let method: Method = req.method().clone();
            let path = req.uri().path().to_string();
            let query = req.uri().query().map(str::to_string);
            let body = req.into_body().collect().await?.to_bytes().to_vec();

            let (status, body) = server.handle(RecordedRequest {
                method: method.to_string(),
                path,
                query,
                body,
            });

            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(bytes::Bytes::from(body)))?)
        })
    }
}
