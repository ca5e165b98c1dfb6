// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]

use std::{collections::HashMap, net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use overlap_core::{RleRun, SparseBody};
use overlap_proto::encode_sparse_body;
use overlap_service::{router, AppState, ServiceConfig};
use serde_json::{json, Value};
use tokio::net::TcpListener;

const UUID: &str = "abc123";

#[derive(Clone)]
struct MockDvid {
    addr: SocketAddr,
    bodies: Arc<HashMap<u32, Bytes>>,
}

async fn sparsevol(
    State(mock): State<MockDvid>,
    Path((uuid, body)): Path<(String, u32)>,
) -> impl IntoResponse {
    match mock.bodies.get(&body) {
        Some(bytes) if uuid == UUID => (StatusCode::OK, bytes.clone()),
        _ => (StatusCode::NOT_FOUND, Bytes::from_static(b"no such body")),
    }
}

async fn proxy_node(State(mock): State<MockDvid>) -> Json<Value> {
    Json(json!({ "service-location": format!("http://{}", mock.addr) }))
}

/// Body 1 is one voxel at the origin, body 2 sits next to it along x,
/// body 3 is a 2-voxel run one row up over both, body 9 is far away.
fn fixture() -> Vec<SparseBody> {
    vec![
        SparseBody::new(1, vec![RleRun::new(0, 0, 0, 1)]),
        SparseBody::new(2, vec![RleRun::new(1, 0, 0, 1)]),
        SparseBody::new(3, vec![RleRun::new(0, 1, 0, 2)]),
        SparseBody::new(9, vec![RleRun::new(50, 50, 50, 3)]),
    ]
}

/// Mock DVID that also answers the proxy's DVID lookup.
async fn spawn_dvid() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let bodies = fixture()
        .iter()
        .map(|b| (b.id().get(), encode_sparse_body(b)))
        .collect();
    let mock = MockDvid {
        addr,
        bodies: Arc::new(bodies),
    };
    let app = Router::new()
        .route("/api/node/{uuid}/sp2body/sparsevol/{body}", get(sparsevol))
        .route("/services/dvid/node", get(proxy_node))
        .with_state(mock);
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    addr
}

async fn spawn_service(proxy: Option<SocketAddr>) -> String {
    let config = ServiceConfig {
        proxy: proxy.map(|p| p.to_string()),
        dvid_timeout: Duration::from_secs(5),
    };
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(AppState::new(&config).unwrap());
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{addr}")
}

async fn post_json(url: &str, body: &Value) -> (StatusCode, String) {
    let resp = reqwest::Client::new()
        .post(url)
        .json(body)
        .send()
        .await
        .unwrap();
    let status = resp.status();
    (status, resp.text().await.unwrap())
}

#[tokio::test]
async fn overlap_with_explicit_dvid_server() {
    let dvid = spawn_dvid().await;
    let service = spawn_service(None).await;

    let (status, body) = post_json(
        &format!("{service}/overlap"),
        &json!({ "dvid-server": dvid.to_string(), "uuid": UUID, "bodies": [1, 2, 3, 9] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    let got: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(got, json!({ "overlap-list": [[1, 2, 1], [1, 3, 1], [2, 3, 1]] }));
}

#[tokio::test]
async fn bodystats_via_proxy_lookup() {
    let dvid = spawn_dvid().await;
    let service = spawn_service(Some(dvid)).await;

    let (status, body) = post_json(
        &format!("{service}/bodystats/"),
        &json!({ "uuid": UUID, "bodies": [3, 1] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    let got: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(got, json!({ "body-stats": [[3, 2, 10], [1, 1, 6]] }));
}

#[tokio::test]
async fn missing_body_is_a_bad_request() {
    let dvid = spawn_dvid().await;
    let service = spawn_service(None).await;

    let (status, body) = post_json(
        &format!("{service}/overlap"),
        &json!({ "dvid-server": dvid.to_string(), "uuid": UUID, "bodies": [1, 404] }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("body could not be read"), "{body}");
    assert!(body.contains("/sparsevol/404"), "{body}");
}

#[tokio::test]
async fn invalid_requests_are_rejected_before_fetching() {
    let service = spawn_service(None).await;
    let url = format!("{service}/overlap");

    let resp = reqwest::Client::new()
        .post(&url)
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(resp
        .text()
        .await
        .unwrap()
        .starts_with("JSON did not pass validation"));

    let (status, body) = post_json(&url, &json!({ "uuid": UUID, "bodies": [7] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("at least 2 bodies"), "{body}");

    let (status, body) = post_json(&url, &json!({ "uuid": UUID, "bodies": [7, 7] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("duplicate"), "{body}");
}

#[tokio::test]
async fn no_server_and_no_proxy_is_a_bad_request() {
    let service = spawn_service(None).await;
    let (status, body) = post_json(
        &format!("{service}/bodystats"),
        &json!({ "uuid": UUID, "bodies": [1] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("no proxy"), "{body}");
}

#[tokio::test]
async fn interface_document_headers() {
    let service = spawn_service(None).await;
    for path in ["/interface", "/interface/interface.raml"] {
        let resp = reqwest::get(format!("{service}{path}")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let headers = resp.headers();
        assert_eq!(headers["content-type"], "application/raml+yaml");
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert!(resp.text().await.unwrap().starts_with("#%RAML 0.8"));
    }
}

#[tokio::test]
async fn front_page_prefills_proxy_server() {
    let dvid = spawn_dvid().await;
    let service = spawn_service(Some(dvid)).await;
    let html = reqwest::get(format!("{service}/"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains(&format!(r#"value="{dvid}""#)), "{html}");
}

#[tokio::test]
async fn form_handlers_accept_comma_separated_bodies() {
    let dvid = spawn_dvid().await;
    let service = spawn_service(None).await;
    let client = reqwest::Client::new();
    let form = format!("dvidserver={dvid}&uuid={UUID}&bodies=1%2C+2");

    let resp = client
        .post(format!("{service}/formhandler/"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body(form.clone())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let got: Value = resp.json().await.unwrap();
    assert_eq!(got, json!({ "overlap-list": [[1, 2, 1]] }));

    let resp = client
        .post(format!("{service}/formhandler2"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let got: Value = resp.json().await.unwrap();
    assert_eq!(got, json!({ "body-stats": [[1, 1, 6], [2, 1, 6]] }));
}
