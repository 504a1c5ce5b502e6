use std::time::Duration;

use explorer_engine::{
    ApiClient, ClientSettings, FailureKind, FsReply, ListedNode, OptionsPayload, ReqwestApiClient,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ReqwestApiClient {
    let settings = ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    };
    ReqwestApiClient::new(settings).expect("client")
}

#[tokio::test]
async fn list_children_sends_path_and_hidden_flag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tree"))
        .and(query_param("path", "/proj/src dir"))
        .and(query_param("showHidden", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "/proj/src dir/lib", "text": "lib", "children": true},
            {"id": "/proj/src dir/main.rs", "text": "main.rs", "children": false},
            {"id": "/proj/src dir/.env", "text": ".env", "children": false,
             "state": {"disabled": true}},
            {"id": "/proj/src dir/inline", "text": "inline", "children": [{"id": "x", "text": "x"}]}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let nodes = client_for(&server)
        .list_children("/proj/src dir", true)
        .await
        .expect("children");

    assert_eq!(
        nodes,
        vec![
            ListedNode {
                id: "/proj/src dir/lib".into(),
                text: "lib".into(),
                has_children: true,
                disabled: false,
            },
            ListedNode {
                id: "/proj/src dir/main.rs".into(),
                text: "main.rs".into(),
                has_children: false,
                disabled: false,
            },
            ListedNode {
                id: "/proj/src dir/.env".into(),
                text: ".env".into(),
                has_children: false,
                disabled: true,
            },
            ListedNode {
                id: "/proj/src dir/inline".into(),
                text: "inline".into(),
                has_children: true,
                disabled: false,
            },
        ]
    );
}

#[tokio::test]
async fn code_request_encodes_paths_as_json_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/code"))
        .and(query_param("paths", r#"["/p/a.rs","/p/b.rs"]"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": "// a\n// b"})))
        .expect(1)
        .mount(&server)
        .await;

    let code = client_for(&server)
        .code(&["/p/a.rs".to_string(), "/p/b.rs".to_string()])
        .await
        .expect("code");
    assert_eq!(code, "// a\n// b");
}

#[tokio::test]
async fn tree_structure_and_preview_bodies_are_unwrapped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tree_structure"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tree": "proj/\n  a.rs"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/preview"))
        .and(query_param("path", "/p/a.rs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": "x\r\ny"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/preview"))
        .and(query_param("path", "/p/empty.rs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.tree_structure().await.unwrap(), "proj/\n  a.rs");
    assert_eq!(client.preview("/p/a.rs").await.unwrap(), "x\ny");
    assert_eq!(client.preview("/p/empty.rs").await.unwrap(), "");
}

#[tokio::test]
async fn refused_preview_reads_as_empty_content() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/preview"))
        .and(query_param("path", "/etc/passwd"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"content": ""})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/preview"))
        .and(query_param("path", "/p/broken"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<h1>Not Found</h1>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/preview"))
        .and(query_param("path", "/p/crash"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"content": ""})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.preview("/etc/passwd").await.unwrap(), "");

    let err = client.preview("/p/broken").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
    let err = client.preview("/p/crash").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
}

#[tokio::test]
async fn options_tolerate_missing_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/options"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "known_extensions": [".rs", ".toml"],
            "selected_extensions": [".rs"]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/options/hidden"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["/p/target"])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(
        client.options().await.unwrap(),
        OptionsPayload {
            known_extensions: vec![".rs".into(), ".toml".into()],
            selected_extensions: vec![".rs".into()],
            favorites: Vec::new(),
        }
    );
    assert_eq!(client.hidden().await.unwrap(), vec!["/p/target".to_string()]);
}

#[tokio::test]
async fn saves_post_full_lists() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/options/extensions"))
        .and(body_json(json!({"extensions": [".rs"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/options/favorites"))
        .and(body_json(json!({"favorites": ["/p/a", "/p/b"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/options/hidden"))
        .and(body_json(json!({"hidden": []})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.save_extensions(&[".rs".to_string()]).await.unwrap();
    client
        .save_favorites(&["/p/a".to_string(), "/p/b".to_string()])
        .await
        .unwrap();
    client.save_hidden(&[]).await.unwrap();
}

#[tokio::test]
async fn rename_posts_camel_case_body_and_reports_backend_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/fs/rename"))
        .and(body_json(json!({"oldPath": "/p/a/b.txt", "newName": "c.txt"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "newPath": "/p/a/c.txt"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/fs/delete"))
        .and(body_json(json!({"path": "/p/locked"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": false, "message": "Permission denied"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(
        client.rename("/p/a/b.txt", "c.txt").await.unwrap(),
        FsReply {
            success: true,
            new_path: Some("/p/a/c.txt".into()),
            message: None,
        }
    );
    assert_eq!(
        client.delete("/p/locked").await.unwrap(),
        FsReply {
            success: false,
            new_path: None,
            message: Some("Permission denied".into()),
        }
    );
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/options/favorites"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client_for(&server).save_favorites(&[]).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
}

#[tokio::test]
async fn malformed_json_is_a_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tree"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .list_children("/p", false)
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn slow_backend_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tree_structure"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({"tree": "late"})),
        )
        .mount(&server)
        .await;

    let settings = ClientSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..ClientSettings::default()
    };
    let err = ReqwestApiClient::new(settings)
        .unwrap()
        .tree_structure()
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn oversized_response_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/code"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Length", "11")
                .set_body_string("01234567890"),
        )
        .mount(&server)
        .await;

    let settings = ClientSettings {
        base_url: server.uri(),
        max_bytes: 10,
        ..ClientSettings::default()
    };
    let err = ReqwestApiClient::new(settings)
        .unwrap()
        .code(&["/p/a.rs".to_string()])
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}
