//! AurClient against a mock RPC endpoint

use gem_distro::{AurClient, CommunityOverlay, Error, Provenance, SourceAnswer};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_found_package_strips_release() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rpc/v5/info"))
        .and(query_param("arg[]", "ruby-bar-2.1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"resultcount":1,"results":[{"Name":"ruby-bar-2.1","Version":"2.1.5-2"}],"type":"multiinfo","version":5}"#,
        ))
        .mount(&server)
        .await;

    let client = AurClient::new(server.uri());
    let answer = client.query("ruby-bar-2.1").await.unwrap();

    let SourceAnswer::Found(info) = answer else {
        panic!("expected package to be found");
    };
    assert_eq!(info.version, "2.1.5");
    assert_eq!(info.provenance, Provenance::CommunityOverlay);
    assert_eq!(info.info_url, format!("{}/packages/ruby-bar-2.1/", server.uri()));
}

#[tokio::test]
async fn test_empty_result_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rpc/v5/info"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"resultcount":0,"results":[],"type":"multiinfo","version":5}"#,
        ))
        .mount(&server)
        .await;

    let client = AurClient::new(server.uri());
    assert_eq!(client.query("ruby-nope").await.unwrap(), SourceAnswer::NotFound);
}

#[tokio::test]
async fn test_server_error_is_transient() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = AurClient::new(server.uri());
    let err = client.query("ruby-bar").await.unwrap_err();
    assert!(matches!(err, Error::Overlay { status: 503, .. }));
}
