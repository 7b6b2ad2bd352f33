// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses and building fixtures.

use http::{Request, Response};
use http_body_util::BodyExt;
use k8s_openapi::api::apps::v1::{DaemonSet, DaemonSetSpec, DaemonSetUpdateStrategy};
use k8s_openapi::api::core::v1::{Node, NodeSpec, Pod, PodSpec, PodStatus};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::api::ObjectMeta;
use kube::client::Body;
use kube::Client;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

/// A request received by [`MockService`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
    pub at: tokio::time::Instant,
}

/// A mock HTTP service that returns predefined responses based on request paths.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    one_shot: Arc<Mutex<HashMap<(String, String), VecDeque<(u16, String)>>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            one_shot: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    /// Queue a response served once, before the regular GET response for the path
    pub fn on_get_once(self, path: &str, status: u16, body: &str) -> Self {
        self.one_shot
            .lock()
            .unwrap()
            .entry(("GET".to_string(), path.to_string()))
            .or_default()
            .push_back((status, body.to_string()));
        self
    }

    /// Add a response for PUT requests matching the exact path
    pub fn on_put(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PUT", path, status, body)
    }

    fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    /// All requests received so far, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests received for the given method
    pub fn requests_with_method(&self, method: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method)
            .collect()
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        let key = (method.to_string(), path.to_string());
        if let Some(resp) = self
            .one_shot
            .lock()
            .unwrap()
            .get_mut(&key)
            .and_then(VecDeque::pop_front)
        {
            return Some(resp);
        }

        self.responses
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();
        let response = self.find_response(&method, &path);
        let requests = self.requests.clone();
        let at = tokio::time::Instant::now();

        Box::pin(async move {
            let bytes = req.into_body().collect().await?.to_bytes();
            requests.lock().unwrap().push(RecordedRequest {
                method,
                path,
                body: String::from_utf8_lossy(&bytes).into_owned(),
                at,
            });

            let (status, body) =
                response.unwrap_or_else(|| (404, status_json(404, "NotFound", "not found")));
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Create a Kubernetes `Status` failure response
pub fn status_json(code: u16, reason: &str, message: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "metadata": {},
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
    .to_string()
}

fn list_json(api_version: &str, kind: &str, items: Vec<serde_json::Value>) -> String {
    serde_json::json!({
        "apiVersion": api_version,
        "kind": kind,
        "metadata": { "resourceVersion": "100" },
        "items": items
    })
    .to_string()
}

pub fn node_list_json(nodes: &[Node]) -> String {
    let items = nodes.iter().map(|n| serde_json::to_value(n).unwrap()).collect();
    list_json("v1", "NodeList", items)
}

pub fn pod_list_json(pods: &[Pod]) -> String {
    let items = pods.iter().map(|p| serde_json::to_value(p).unwrap()).collect();
    list_json("v1", "PodList", items)
}

pub fn daemonset_list_json(daemonsets: &[DaemonSet]) -> String {
    let items = daemonsets
        .iter()
        .map(|d| serde_json::to_value(d).unwrap())
        .collect();
    list_json("apps/v1", "DaemonSetList", items)
}

pub fn node_json(node: &Node) -> String {
    serde_json::to_string(node).unwrap()
}

/// A node, optionally carrying a `lifecycle-status` label
pub fn make_node(name: &str, lifecycle_status: Option<&str>) -> Node {
    let labels = lifecycle_status.map(|status| {
        BTreeMap::from([("lifecycle-status".to_string(), status.to_string())])
    });

    Node {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            resource_version: Some("1".to_string()),
            labels,
            ..Default::default()
        },
        spec: Some(NodeSpec::default()),
        ..Default::default()
    }
}

/// A pod bound to `node`; `owners` lists `(kind, name, uid)` owner references
pub fn make_pod(
    namespace: &str,
    name: &str,
    node: &str,
    phase: &str,
    generation: Option<&str>,
    owners: &[(&str, &str, &str)],
) -> Pod {
    let labels = generation.map(|g| {
        BTreeMap::from([("pod-template-generation".to_string(), g.to_string())])
    });
    let owner_references = owners
        .iter()
        .map(|(kind, owner_name, uid)| OwnerReference {
            api_version: "apps/v1".to_string(),
            kind: kind.to_string(),
            name: owner_name.to_string(),
            uid: uid.to_string(),
            controller: Some(true),
            ..Default::default()
        })
        .collect();

    Pod {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            labels,
            owner_references: Some(owner_references),
            ..Default::default()
        },
        spec: Some(PodSpec {
            node_name: Some(node.to_string()),
            ..Default::default()
        }),
        status: Some(PodStatus {
            phase: Some(phase.to_string()),
            ..Default::default()
        }),
    }
}

/// A DaemonSet with the given update strategy type and generation
pub fn make_daemonset(
    namespace: &str,
    name: &str,
    uid: &str,
    strategy: &str,
    generation: i64,
) -> DaemonSet {
    DaemonSet {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            uid: Some(uid.to_string()),
            generation: Some(generation),
            ..Default::default()
        },
        spec: Some(DaemonSetSpec {
            update_strategy: Some(DaemonSetUpdateStrategy {
                type_: Some(strategy.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}
