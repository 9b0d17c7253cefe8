//! Integration tests for net crate

#[cfg(test)]
mod tests {
    use addonhub_errors::{Error, NetworkError, TransferError};
    use addonhub_events::{channel, AppEvent, DownloadEvent};
    use addonhub_hash::Hash;
    use addonhub_net::*;
    use addonhub_types::{
        AddonReference, Credential, CredentialType, DownloadDescriptor, Target, TeamScope,
    };
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;
    use tempfile::tempdir;
    use tokio_util::sync::CancellationToken;

    const BODY: &[u8] = b"PK\x03\x04 addon archive bytes";

    fn hub(server: &MockServer, kind: CredentialType) -> HubClient {
        HubClient::new(
            NetClient::with_defaults().unwrap(),
            &server.base_url(),
            Credential::new("secret-token", kind),
        )
        .unwrap()
    }

    fn descriptor(server: &MockServer, path: &str, body: &[u8]) -> DownloadDescriptor {
        DownloadDescriptor {
            location: server.url(path).parse().unwrap(),
            checksum: Hash::from_data(body).to_hex(),
        }
    }

    #[tokio::test]
    async fn test_addon_metadata() {
        let server = MockServer::start_async().await;
        let location = server.url("/x/foo-v1.2.3.zip");
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/teams/acme-team/addons/acme/transformation/foo/versions/v1.2.3/download")
                    .header("authorization", "Bearer secret-token")
                    .header("accept", "application/json");
                then.status(200)
                    .json_body(json!({ "location": location, "checksum": "deadbeef" }));
            })
            .await;

        let reference: AddonReference = "acme/transformation/foo@v1.2.3".parse().unwrap();
        let descriptor = hub(&server, CredentialType::SessionToken)
            .addon_metadata(
                &TeamScope::new("acme-team"),
                &reference,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(descriptor.checksum, "deadbeef");
        assert_eq!(descriptor.location.path(), "/x/foo-v1.2.3.zip");
    }

    #[tokio::test]
    async fn test_addon_metadata_error_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path_contains("/versions/v9.9.9/download");
                then.status(404)
                    .json_body(json!({ "message": "addon version not found" }));
            })
            .await;

        let reference: AddonReference = "acme/transformer/foo@v9.9.9".parse().unwrap();
        let err = hub(&server, CredentialType::ApiKey)
            .addon_metadata(&TeamScope::new("acme"), &reference, &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            Error::Network(NetworkError::MetadataHttpError { status, message }) => {
                assert_eq!(status, 404);
                assert_eq!(message, "addon version not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_addon_metadata_unparseable_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path_contains("/download");
                then.status(200).body("not json");
            })
            .await;

        let reference: AddonReference = "acme/transformer/foo@v1.2.3".parse().unwrap();
        let err = hub(&server, CredentialType::ApiKey)
            .addon_metadata(&TeamScope::new("acme"), &reference, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Network(NetworkError::MetadataHttpError { status: 200, .. })
        ));
    }

    #[tokio::test]
    async fn test_addon_metadata_cancelled() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(200).json_body(json!({}));
            })
            .await;

        let cancel = CancellationToken::new();
        cancel.cancel();
        let reference: AddonReference = "acme/transformer/foo@v1.2.3".parse().unwrap();
        let err = hub(&server, CredentialType::ApiKey)
            .addon_metadata(&TeamScope::new("acme"), &reference, &cancel)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Network(NetworkError::MetadataRequestFailed { .. })
        ));
        assert_eq!(mock.hits_async().await, 0);
    }

    #[tokio::test]
    async fn test_list_teams_follows_pages() {
        let server = MockServer::start_async().await;
        let first = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/teams")
                    .query_param("page", "1")
                    .query_param("per_page", "100");
                then.status(200).json_body(json!({
                    "items": [{ "name": "acme" }, { "name": "globex" }],
                    "metadata": { "last_page": 2 }
                }));
            })
            .await;
        let second = server
            .mock_async(|when, then| {
                when.method(GET).path("/teams").query_param("page", "2");
                then.status(200).json_body(json!({
                    "items": [{ "name": "initech" }],
                    "metadata": { "last_page": 2 }
                }));
            })
            .await;

        let teams = hub(&server, CredentialType::ApiKey)
            .list_teams(&CancellationToken::new())
            .await
            .unwrap();

        first.assert_async().await;
        second.assert_async().await;
        assert_eq!(teams, vec!["acme", "globex", "initech"]);
    }

    #[tokio::test]
    async fn test_list_teams_unauthorized() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/teams");
                then.status(401).json_body(json!({ "message": "invalid api key" }));
            })
            .await;

        let err = hub(&server, CredentialType::ApiKey)
            .list_teams(&CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            Error::Network(NetworkError::TeamListHttpError { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "invalid api key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transfer_to_directory() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/x/foo-v1.2.3.zip");
                then.status(200).body(BODY);
            })
            .await;

        let temp = tempdir().unwrap();
        let (tx, mut rx) = channel();
        let target = Target::Directory(temp.path().to_path_buf());
        let descriptor = descriptor(&server, "/x/foo-v1.2.3.zip", BODY);

        let result = transfer(
            &NetClient::with_defaults().unwrap(),
            &descriptor,
            &target,
            &CancellationToken::new(),
            &tx,
        )
        .await
        .unwrap();

        mock.assert_async().await;
        let path = temp.path().join("foo-v1.2.3.zip");
        assert_eq!(result.path.as_deref(), Some(path.as_path()));
        assert_eq!(result.bytes_written, BODY.len() as u64);
        assert_eq!(result.digest, descriptor.checksum);
        assert_eq!(Hash::from_data(&std::fs::read(&path).unwrap()).to_hex(), result.digest);

        let mut saw_start = false;
        let mut saw_complete = false;
        while let Ok(event) = rx.try_recv() {
            match event {
                AppEvent::Download(DownloadEvent::Started { .. }) => saw_start = true,
                AppEvent::Download(DownloadEvent::Completed { bytes_written, .. }) => {
                    assert_eq!(bytes_written, BODY.len() as u64);
                    saw_complete = true;
                }
                _ => {}
            }
        }
        assert!(saw_start);
        assert!(saw_complete);
    }

    #[tokio::test]
    async fn test_transfer_names_file_after_final_url() {
        let server = MockServer::start_async().await;
        let final_url = server.url("/files/foo-v1.2.3.zip");
        server
            .mock_async(|when, then| {
                when.method(GET).path("/dl/42");
                then.status(302).header("location", final_url.as_str());
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/files/foo-v1.2.3.zip");
                then.status(200).body(BODY);
            })
            .await;

        let temp = tempdir().unwrap();
        let (tx, _rx) = channel();
        let result = transfer(
            &NetClient::with_defaults().unwrap(),
            &descriptor(&server, "/dl/42", BODY),
            &Target::Directory(temp.path().to_path_buf()),
            &CancellationToken::new(),
            &tx,
        )
        .await
        .unwrap();

        assert_eq!(result.path, Some(temp.path().join("foo-v1.2.3.zip")));
        assert!(!temp.path().join("42").exists());
    }

    #[tokio::test]
    async fn test_addon_metadata_requires_ok_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path_contains("/download");
                then.status(203).json_body(
                    json!({ "location": "https://cdn.example.com/foo.zip", "checksum": "ab" }),
                );
            })
            .await;

        let reference: AddonReference = "acme/transformer/foo@v1.2.3".parse().unwrap();
        let err = hub(&server, CredentialType::SessionToken)
            .addon_metadata(&TeamScope::new("acme"), &reference, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Network(NetworkError::MetadataHttpError { status: 203, .. })
        ));
    }

    #[tokio::test]
    async fn test_transfer_decodes_file_name() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path_contains("/files/foo");
                then.status(200).body(BODY);
            })
            .await;

        let temp = tempdir().unwrap();
        let (tx, _rx) = channel();
        let result = transfer(
            &NetClient::with_defaults().unwrap(),
            &descriptor(&server, "/files/foo%20bar.zip", BODY),
            &Target::Directory(temp.path().to_path_buf()),
            &CancellationToken::new(),
            &tx,
        )
        .await
        .unwrap();

        assert_eq!(result.path, Some(temp.path().join("foo bar.zip")));
        assert!(!temp.path().join("foo%20bar.zip").exists());
    }

    fn short_api_timeout() -> NetClient {
        NetClient::new(NetConfig {
            timeout: Duration::from_millis(200),
            read_timeout: Duration::from_secs(5),
            ..NetConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_transfer_outlives_api_timeout() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/x/foo-v1.2.3.zip");
                then.status(200)
                    .body(BODY)
                    .delay(Duration::from_millis(600));
            })
            .await;

        let temp = tempdir().unwrap();
        let (tx, _rx) = channel();
        let result = transfer(
            &short_api_timeout(),
            &descriptor(&server, "/x/foo-v1.2.3.zip", BODY),
            &Target::Directory(temp.path().to_path_buf()),
            &CancellationToken::new(),
            &tx,
        )
        .await
        .unwrap();

        assert_eq!(result.bytes_written, BODY.len() as u64);
        assert!(temp.path().join("foo-v1.2.3.zip").exists());
    }

    #[tokio::test]
    async fn test_registry_call_honors_api_timeout() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path_contains("/download");
                then.status(200)
                    .json_body(json!({ "location": "https://cdn.example.com/foo.zip", "checksum": "ab" }))
                    .delay(Duration::from_millis(600));
            })
            .await;

        let client = HubClient::new(
            short_api_timeout(),
            &server.base_url(),
            Credential::new("secret-token", CredentialType::SessionToken),
        )
        .unwrap();
        let reference: AddonReference = "acme/transformer/foo@v1.2.3".parse().unwrap();
        let err = client
            .addon_metadata(&TeamScope::new("acme"), &reference, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Network(NetworkError::MetadataRequestFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_transfer_mismatch_rolls_back() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/x/foo-v1.2.3.zip");
                then.status(200).body(BODY);
            })
            .await;

        let temp = tempdir().unwrap();
        let (tx, mut rx) = channel();
        let mut descriptor = descriptor(&server, "/x/foo-v1.2.3.zip", BODY);
        let actual = descriptor.checksum.clone();
        // Flip the last hex character
        let last = if actual.ends_with('0') { '1' } else { '0' };
        descriptor.checksum = format!("{}{last}", &actual[..actual.len() - 1]);

        let err = transfer(
            &NetClient::with_defaults().unwrap(),
            &descriptor,
            &Target::Directory(temp.path().to_path_buf()),
            &CancellationToken::new(),
            &tx,
        )
        .await
        .unwrap_err();

        match err {
            Error::Transfer(TransferError::ChecksumMismatch {
                expected,
                actual: got,
            }) => {
                assert_eq!(expected, descriptor.checksum);
                assert_eq!(got, actual);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!temp.path().join("foo-v1.2.3.zip").exists());

        let mut rolled_back = false;
        while let Ok(event) = rx.try_recv() {
            if let AppEvent::Download(DownloadEvent::RolledBack { path, .. }) = event {
                assert_eq!(path, temp.path().join("foo-v1.2.3.zip"));
                rolled_back = true;
            }
        }
        assert!(rolled_back);
    }

    #[tokio::test]
    async fn test_rerun_after_rollback_starts_clean() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/x/foo-v1.2.3.zip");
                then.status(200).body(BODY);
            })
            .await;

        let temp = tempdir().unwrap();
        let (tx, _rx) = channel();
        let client = NetClient::with_defaults().unwrap();
        let target = Target::Directory(temp.path().to_path_buf());

        let mut bad = descriptor(&server, "/x/foo-v1.2.3.zip", BODY);
        bad.checksum = Hash::from_data(b"other").to_hex();
        assert!(transfer(&client, &bad, &target, &CancellationToken::new(), &tx)
            .await
            .is_err());
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);

        let good = descriptor(&server, "/x/foo-v1.2.3.zip", BODY);
        let result = transfer(&client, &good, &target, &CancellationToken::new(), &tx)
            .await
            .unwrap();
        assert_eq!(result.bytes_written, BODY.len() as u64);
    }

    #[tokio::test]
    async fn test_transfer_refuses_existing_file() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/x/foo-v1.2.3.zip");
                then.status(200).body(BODY);
            })
            .await;

        let temp = tempdir().unwrap();
        let existing = temp.path().join("foo-v1.2.3.zip");
        std::fs::write(&existing, b"keep me").unwrap();

        let (tx, _rx) = channel();
        let err = transfer(
            &NetClient::with_defaults().unwrap(),
            &descriptor(&server, "/x/foo-v1.2.3.zip", BODY),
            &Target::Directory(temp.path().to_path_buf()),
            &CancellationToken::new(),
            &tx,
        )
        .await
        .unwrap_err();

        match err {
            Error::Transfer(TransferError::DestinationExists { path, is_dir }) => {
                assert_eq!(path, existing);
                assert!(!is_dir);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(std::fs::read(&existing).unwrap(), b"keep me");
    }

    #[tokio::test]
    async fn test_transfer_http_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/x/missing.zip");
                then.status(404);
            })
            .await;

        let temp = tempdir().unwrap();
        let (tx, _rx) = channel();
        let err = transfer(
            &NetClient::with_defaults().unwrap(),
            &descriptor(&server, "/x/missing.zip", BODY),
            &Target::Directory(temp.path().to_path_buf()),
            &CancellationToken::new(),
            &tx,
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            Error::Network(NetworkError::DownloadHttpError { status: 404, .. })
        ));
        assert!(!temp.path().join("missing.zip").exists());
    }

    #[tokio::test]
    async fn test_transfer_cancelled_before_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(200).body(BODY);
            })
            .await;

        let temp = tempdir().unwrap();
        let (tx, _rx) = channel();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = transfer(
            &NetClient::with_defaults().unwrap(),
            &descriptor(&server, "/x/foo-v1.2.3.zip", BODY),
            &Target::Directory(temp.path().to_path_buf()),
            &cancel,
            &tx,
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            Error::Network(NetworkError::DownloadRequestFailed { .. })
        ));
        assert_eq!(mock.hits_async().await, 0);
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
    }
}
