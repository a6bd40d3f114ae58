//
//  stash-client
//  tests/server_api_tests.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use std::time::Duration;

use mockito::{Matcher, Server};
use stash_client::api::{RetryPolicy, TransportConfig};
use stash_client::{is_conflict, is_not_found, Credentials, StashClient, StashError};

const REPOS: &str = r#"{
    "nextPageStart": 44,
    "isLastPage": true,
    "limit": 25,
    "values": [
        {
            "id": 300, "name": "apa", "slug": "apa", "scmId": "git", "state": "AVAILABLE",
            "project": {"key": "TEAMP", "id": 107, "name": "Dev", "public": true},
            "links": {"clone": [
                {"href": "ssh://git@example.com:9999/teamp/apa.git", "name": "ssh"},
                {"href": "http://example.com:8888/scm/teamp/apa.git", "name": "http"}
            ]}
        },
        {
            "id": 171, "name": "rabbit", "slug": "rabbit", "scmId": "git",
            "project": {"key": "TEAMI"},
            "links": {"clone": [{"href": "ssh://git@example.com:9999/teami/rabbit.git", "name": "ssh"}]}
        },
        {
            "id": 359, "name": "fox", "slug": "fox", "scmId": "git",
            "project": {"key": "TEAMI"},
            "links": {"clone": [{"href": "ssh://git@example.com:9999/teami/fox.git", "name": "ssh"}]}
        }
    ],
    "start": 0,
    "size": 3
}"#;

const BRANCHES: &str = r#"{
    "isLastPage": true,
    "values": [
        {"displayId": "develop", "isDefault": true, "latestChangeset": "e680a10f3e0afb5e3a5978dea02d37ac884da21", "id": "refs/heads/develop"},
        {"displayId": "master", "isDefault": false, "latestChangeset": "8d0f23745dfe4bacef9509bb4ecd7722b9aff82", "id": "refs/heads/master"},
        {"displayId": "feature/PRJ-447", "isDefault": false, "latestChangeset": "8d9c0642da6b3f06629cf115683da105d8e0654", "id": "refs/heads/feature/PRJ-447"},
        {"displayId": "bug/PRJ-442", "isDefault": false, "latestChangeset": "a57a403996161f24d1d0605ea8b5030927a0d3d", "id": "refs/heads/bug/PRJ-442"}
    ],
    "limit": 25,
    "start": 0,
    "size": 4
}"#;

const TAGS: &str = r#"{
    "isLastPage": true,
    "values": [
        {"displayId": "acme-release-99.8", "hash": "c505d5eac54dc0239c610274f0c972845b4d71c3", "id": "refs/tags/acme-release-99.8", "latestChangeset": "fa6618112e8014934dfdfc3337e94f52b6de5708"},
        {"displayId": "acme-release-99.9", "hash": "cd301bcf63344a9c2a4acf88591961ff9a7bc44b", "id": "refs/tags/acme-release-99.9", "latestChangeset": "f0910c480a77b6ccf919fb384ab87f7ab4fd479e"}
    ],
    "limit": 25,
    "start": 0,
    "size": 2
}"#;

const RESTRICTION: &str = r#"{
    "id": 41,
    "type": "BRANCH",
    "value": "refs/heads/develop",
    "branch": {"id": "refs/heads/develop", "displayId": "develop", "latestChangeset": "d81c71b179c08715eb21251824635ce9a1d7f6f3", "isDefault": false}
}"#;

fn client(server: &Server) -> StashClient {
    StashClient::new(&server.url(), &TransportConfig::default())
        .unwrap()
        .with_credentials(Credentials::basic("u", "p"))
        .with_retry(RetryPolicy::new(3, Duration::ZERO))
}

fn first_page() -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("start".into(), "0".into()),
        Matcher::UrlEncoded("limit".into(), "25".into()),
    ])
}

#[test]
fn test_get_repositories() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/rest/api/1.0/repos")
        .match_query(first_page())
        .match_header("accept", "application/json")
        .match_header("authorization", "Basic dTpw")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(REPOS)
        .create();

    let repositories = client(&server).get_repositories().unwrap();

    mock.assert();
    assert_eq!(repositories.len(), 3);
    for id in [171, 300, 359] {
        assert!(repositories.contains_key(&id), "missing repository {}", id);
    }
    let apa = &repositories[&300];
    assert_eq!(apa.project.key, "TEAMP");
    assert_eq!(apa.ssh_url(), Some("ssh://git@example.com:9999/teamp/apa.git"));
    assert_eq!(apa.http_url(), Some("http://example.com:8888/scm/teamp/apa.git"));
    assert_eq!(repositories[&171].http_url(), None);

    let found = stash_client::api::server::has_repository(
        &repositories,
        "ssh://git@example.com:9999/teami/rabbit.git",
    );
    assert_eq!(found.map(|r| r.id), Some(171));
}

#[test]
fn test_get_repositories_500_is_retried_three_times() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/rest/api/1.0/repos")
        .match_query(Matcher::Any)
        .with_status(500)
        .expect(3)
        .create();

    let err = client(&server).get_repositories().unwrap_err();

    mock.assert();
    assert_eq!(err.status(), Some(500));
    assert!(err.to_string().starts_with("unhandled reason (500)"));
    assert!(!is_not_found(Some(&err)));
    assert!(!is_conflict(Some(&err)));
}

#[test]
fn test_get_repositories_walks_every_page() {
    let mut server = Server::new();
    let first = server
        .mock("GET", "/rest/api/1.0/repos")
        .match_query(first_page())
        .with_status(200)
        .with_body(
            r#"{"isLastPage":false,"nextPageStart":25,"start":0,"values":[
                {"id":1,"name":"one","slug":"one","project":{"key":"P"}},
                {"id":2,"name":"two","slug":"two","project":{"key":"P"}}
            ]}"#,
        )
        .create();
    let second = server
        .mock("GET", "/rest/api/1.0/repos")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("start".into(), "25".into()),
            Matcher::UrlEncoded("limit".into(), "25".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"isLastPage":true,"start":25,"values":[
                {"id":3,"name":"three","slug":"three","project":{"key":"P"}}
            ]}"#,
        )
        .create();

    let repositories = client(&server).get_repositories().unwrap();

    first.assert();
    second.assert();
    let mut ids: Vec<_> = repositories.keys().copied().collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn test_failing_later_page_returns_no_partial_result() {
    let mut server = Server::new();
    server
        .mock("GET", "/rest/api/1.0/repos")
        .match_query(first_page())
        .with_status(200)
        .with_body(r#"{"isLastPage":false,"nextPageStart":25,"values":[{"id":1,"name":"one","slug":"one","project":{"key":"P"}}]}"#)
        .create();
    let failing = server
        .mock("GET", "/rest/api/1.0/repos")
        .match_query(Matcher::UrlEncoded("start".into(), "25".into()))
        .with_status(400)
        .expect(3)
        .create();

    let err = client(&server).get_repositories().unwrap_err();

    failing.assert();
    assert_eq!(err.to_string(), "Bad request. (400)");
}

#[test]
fn test_get_repository_not_found() {
    let mut server = Server::new();
    server
        .mock("GET", "/rest/api/1.0/projects/PROJ/repos/slug")
        .with_status(404)
        .with_body(r#"{"errors":[{"message":"Repository PROJ/slug does not exist."}]}"#)
        .expect(3)
        .create();

    let err = client(&server).get_repository("PROJ", "slug").unwrap_err();

    assert!(is_not_found(Some(&err)));
    assert_eq!(
        err.to_string(),
        "Not found (404): Repository PROJ/slug does not exist."
    );
}

#[test]
fn test_get_repository_unauthorized() {
    let mut server = Server::new();
    server
        .mock("GET", "/rest/api/1.0/projects/PROJ/repos/slug")
        .with_status(401)
        .create();

    let client = client(&server).with_retry(RetryPolicy::none());
    let err = client.get_repository("PROJ", "slug").unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().starts_with("Unauthorized (401)"));
}

#[test]
fn test_create_repository() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/rest/api/1.0/projects/PROJ/repos")
        .match_header("content-type", "application/json")
        .match_header("accept", "application/json")
        .match_body(Matcher::Exact(r#"{"name":"rabbit","scmId":"git"}"#.to_string()))
        .with_status(201)
        .with_body(r#"{"id":171,"name":"rabbit","slug":"rabbit","scmId":"git","project":{"key":"PROJ"}}"#)
        .create();

    let repo = client(&server).create_repository("PROJ", "rabbit").unwrap();

    mock.assert();
    assert_eq!(repo.id, 171);
    assert_eq!(repo.project.key, "PROJ");
}

#[test]
fn test_create_repository_conflict() {
    let mut server = Server::new();
    server
        .mock("POST", "/rest/api/1.0/projects/PROJ/repos")
        .with_status(409)
        .create();

    let err = client(&server).create_repository("PROJ", "rabbit").unwrap_err();

    assert!(is_conflict(Some(&err)));
    assert!(!is_not_found(Some(&err)));
    assert!(err.to_string().starts_with("A repository with same name already exists. (409)"));
}

#[test]
fn test_get_branches() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/rest/api/1.0/projects/PROJ/repos/slug/branches")
        .match_query(first_page())
        .match_header("authorization", "Basic dTpw")
        .with_status(200)
        .with_body(BRANCHES)
        .create();

    let branches = client(&server).get_branches("PROJ", "slug").unwrap();

    mock.assert();
    assert_eq!(branches.len(), 4);
    for name in ["develop", "master", "feature/PRJ-447", "bug/PRJ-442"] {
        assert!(branches.contains_key(name), "missing branch {}", name);
    }
    assert!(branches["develop"].is_default);
    assert_eq!(branches["feature/PRJ-447"].id, "refs/heads/feature/PRJ-447");
}

#[test]
fn test_get_tags_anonymous() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/rest/api/1.0/projects/PROJ/repos/slug/tags")
        .match_query(first_page())
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(TAGS)
        .create();

    let client = client(&server).with_credentials(Credentials::basic("", ""));
    let tags = client.get_tags("PROJ", "slug").unwrap();

    mock.assert();
    assert_eq!(tags.len(), 2);
    assert_eq!(
        tags["acme-release-99.9"].latest_changeset.as_deref(),
        Some("f0910c480a77b6ccf919fb384ab87f7ab4fd479e")
    );
}

#[test]
fn test_delete_branch() {
    let mut server = Server::new();
    let mock = server
        .mock("DELETE", "/rest/branch-utils/1.0/projects/PROJ/repos/slug/branches")
        .match_body(Matcher::Exact(r#"{"name":"refs/heads/develop","dryRun":false}"#.to_string()))
        .with_status(204)
        .create();

    client(&server).delete_branch("PROJ", "slug", "develop").unwrap();

    mock.assert();
}

#[test]
fn test_branch_restrictions_lifecycle() {
    let mut server = Server::new();
    let list = server
        .mock("GET", "/rest/branch-permissions/1.0/projects/PROJ/repos/slug/restricted")
        .with_status(200)
        .with_body(format!(
            r#"{{"size":1,"limit":100,"isLastPage":true,"values":[{}],"start":0,"filter":null}}"#,
            RESTRICTION
        ))
        .create();
    let create = server
        .mock("POST", "/rest/branch-permissions/1.0/projects/PROJ/repos/slug/restricted")
        .match_header("accept", "application/json")
        .match_body(Matcher::Exact(
            r#"{"type":"BRANCH","value":"refs/heads/develop","users":["user"]}"#.to_string(),
        ))
        .with_status(200)
        .with_body(RESTRICTION)
        .create();
    let delete = server
        .mock("DELETE", "/rest/branch-permissions/1.0/projects/PROJ/repos/slug/restricted/41")
        .with_status(204)
        .create();

    let client = client(&server);

    let restrictions = client.get_branch_restrictions("PROJ", "slug").unwrap();
    assert_eq!(restrictions.values.len(), 1);
    assert_eq!(
        restrictions.values[0].branch.as_ref().map(|b| b.display_id.as_str()),
        Some("develop")
    );

    let restriction = client
        .create_branch_restriction("PROJ", "slug", "develop", "user")
        .unwrap();
    assert_eq!(restriction.id, 41);

    client.delete_branch_restriction("PROJ", "slug", restriction.id).unwrap();

    list.assert();
    create.assert();
    delete.assert();
}

#[test]
fn test_delete_branch_restriction_not_found() {
    let mut server = Server::new();
    server
        .mock("DELETE", "/rest/branch-permissions/1.0/projects/PROJ/repos/slug/restricted/1")
        .with_status(404)
        .create();

    let err = client(&server)
        .delete_branch_restriction("PROJ", "slug", 1)
        .unwrap_err();

    assert!(is_not_found(Some(&err)));
}

#[test]
fn test_get_branch_permissions() {
    let mut server = Server::new();
    server
        .mock("GET", "/rest/branch-permissions/1.0/projects/PROJ/repos/slug/permitted")
        .match_header("authorization", "Basic dTpw")
        .with_status(200)
        .with_body(r#"{"type":"type","matcherType":"matcherType","matcherId":"matcherId","effective":true}"#)
        .create();

    let permission = client(&server).get_branch_permissions("PROJ", "slug").unwrap();

    assert_eq!(permission.permission_type, "type");
    assert_eq!(permission.matcher_type, "matcherType");
    assert_eq!(permission.matcher_id, "matcherId");
    assert!(permission.effective);
}

#[test]
fn test_pull_requests() {
    let mut server = Server::new();
    let list = server
        .mock("GET", "/rest/api/1.0/projects/proj/repos/bar/pull-requests")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("state".into(), "OPEN".into()),
            Matcher::UrlEncoded("start".into(), "0".into()),
            Matcher::UrlEncoded("limit".into(), "25".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"isLastPage":true,"values":[
                {"id":2,"title":"a title","state":"OPEN","open":true,"closed":false,
                 "createdDate":1435759062673,"updatedDate":1435759062673,
                 "fromRef":{"id":"refs/heads/feature/file1","displayId":"feature/file1"},
                 "toRef":{"id":"refs/heads/develop","displayId":"develop"}}
            ]}"#,
        )
        .create();
    let create = server
        .mock("POST", "/rest/api/1.0/projects/proj/repos/bar/pull-requests")
        .match_header("authorization", "Basic dTpw")
        .match_body(Matcher::Exact(
            r#"{"title":"a title","description":"a description","fromRef":{"id":"feature/file1","repository":{"slug":"bar","project":{"key":"proj"}}},"toRef":{"id":"develop","repository":{"slug":"bar","project":{"key":"proj"}}},"reviewers":[{"user":{"name":"bob"}},{"user":{"name":"bill"}}]}"#
                .to_string(),
        ))
        .with_status(201)
        .with_body(
            r#"{"id":2,"version":0,"title":"a title","description":"a description","state":"OPEN",
                "open":true,"closed":false,"createdDate":1435759062673,"updatedDate":1435759062673,
                "fromRef":{"id":"refs/heads/feature/file1","displayId":"feature/file1"},
                "toRef":{"id":"refs/heads/develop","displayId":"develop"},
                "author":{"user":{"name":"mike","id":877},"role":"AUTHOR","approved":false},
                "reviewers":[{"user":{"name":"bob"},"role":"REVIEWER"},{"user":{"name":"bill"},"role":"REVIEWER"}],
                "participants":[]}"#,
        )
        .create();

    let client = client(&server);

    let prs = client.get_pull_requests("proj", "bar", "OPEN").unwrap();
    assert_eq!(prs.len(), 1);
    assert_eq!(prs[0].from_ref.display_id, "feature/file1");

    let pr = client
        .create_pull_request(
            "proj",
            "bar",
            "a title",
            "a description",
            "feature/file1",
            "develop",
            &["bob", "bill"],
        )
        .unwrap();
    assert_eq!(pr.id, 2);
    assert_eq!(pr.state, "OPEN");
    assert_eq!(pr.description.as_deref(), Some("a description"));
    assert_eq!(pr.to_ref.display_id, "develop");
    assert_eq!(pr.author.map(|a| a.user.name).as_deref(), Some("mike"));

    list.assert();
    create.assert();
}

#[test]
fn test_get_raw_file() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/projects/prj/repos/repo/browse/foo/bar")
        .match_query(Matcher::Exact("at=master&raw".to_string()))
        .match_header("authorization", "Basic dTpw")
        .with_status(200)
        .with_body("hello")
        .create();

    let data = client(&server)
        .get_raw_file("PRJ", "REPO", "foo/bar", "master")
        .unwrap();

    mock.assert();
    assert_eq!(data, b"hello");
}

#[test]
fn test_get_raw_file_with_hash_in_name() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/projects/prj/repos/repo/browse/docs/a%23b.md")
        .match_query(Matcher::Exact("at=master&raw".to_string()))
        .with_status(200)
        .with_body("right file")
        .create();

    let data = client(&server)
        .get_raw_file("PRJ", "REPO", "docs/a#b.md", "master")
        .unwrap();

    mock.assert();
    assert_eq!(data, b"right file");
}

#[test]
fn test_malformed_body_is_decode_error_without_retry() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/rest/api/1.0/projects/PROJ/repos/slug")
        .with_status(200)
        .with_body("{\"id\": ")
        .expect(1)
        .create();

    let err = client(&server).get_repository("PROJ", "slug").unwrap_err();

    mock.assert();
    assert!(matches!(err, StashError::Decode { .. }));
    assert_eq!(err.status(), None);
}

#[test]
fn test_context_path_is_preserved() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/stash/rest/api/1.0/projects/PROJ/repos/slug")
        .with_status(200)
        .with_body(r#"{"id":1,"name":"slug","slug":"slug","project":{"key":"PROJ"}}"#)
        .create();

    let client = StashClient::new(&format!("{}/stash/", server.url()), &TransportConfig::default())
        .unwrap()
        .with_retry(RetryPolicy::none());
    let repo = client.get_repository("PROJ", "slug").unwrap();

    mock.assert();
    assert_eq!(repo.id, 1);
}
