use blogship_core::Credential;
use blogship_engine::client::{
    BuildError, EngineClient, ExtractError, PublishError, ServiceError, ServiceHandle,
};
use blogship_engine::engine::EngineError;
use blogship_engine::executor::EngineExecutor;
use mockall::mock;
use secrecy::SecretString;
use std::path::Path;

mock! {
    Executor {}

    impl EngineExecutor for Executor {
        async fn exec(&self, args: &[String]) -> Result<String, EngineError>;
        async fn exec_streaming(&self, args: &[String]) -> Result<(), EngineError>;
        async fn exec_with_stdin(
            &self,
            args: &[String],
            stdin_data: &[u8],
        ) -> Result<String, EngineError>;
    }
}

fn failed(stderr: &str) -> EngineError {
    EngineError::CommandFailed {
        args: vec![],
        stderr: stderr.to_owned(),
    }
}

fn has(args: &[String], needle: &str) -> bool {
    args.iter().any(|a| a == needle)
}

fn credential() -> Credential {
    Credential::for_blog_registry(SecretString::from("ghp_token".to_owned()))
}

fn service() -> ServiceHandle {
    ServiceHandle {
        id: "abc123".to_owned(),
        image: "blog.kgb33.dev:build".to_owned(),
        host_port: 1313,
        container_port: 1313,
    }
}

// ── Build Tests ──

#[tokio::test]
async fn build_image_passes_tag_file_and_context() {
    let mut mock = MockExecutor::new();

    mock.expect_exec_streaming()
        .withf(|args| {
            args.first().map(String::as_str) == Some("build")
                && args.windows(2).any(|w| w[0] == "--tag" && w[1] == "blog:build")
                && args
                    .windows(2)
                    .any(|w| w[0] == "--file" && w[1] == "/ctx/Containerfile")
                && args.last().map(String::as_str) == Some("/ctx")
                && !has(args, "--platform")
        })
        .times(1)
        .returning(|_| Ok(()));

    let client = EngineClient::with_executor(mock);
    let result = client
        .build_image(
            Path::new("/ctx"),
            Path::new("/ctx/Containerfile"),
            "blog:build",
            None,
        )
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn build_image_forwards_platform() {
    let mut mock = MockExecutor::new();

    mock.expect_exec_streaming()
        .withf(|args| {
            args.windows(2)
                .any(|w| w[0] == "--platform" && w[1] == "linux/arm64")
        })
        .returning(|_| Ok(()));

    let client = EngineClient::with_executor(mock);
    let result = client
        .build_image(
            Path::new("/ctx"),
            Path::new("/ctx/Containerfile"),
            "blog:build",
            Some("linux/arm64"),
        )
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn build_image_failure_keeps_engine_stderr() {
    let mut mock = MockExecutor::new();

    mock.expect_exec_streaming()
        .returning(|_| Err(failed("npm ERR! code E404")));

    let client = EngineClient::with_executor(mock);
    let result = client
        .build_image(
            Path::new("/ctx"),
            Path::new("/ctx/Containerfile"),
            "blog:build",
            None,
        )
        .await;

    match result {
        Err(BuildError::Build { tag, source }) => {
            assert_eq!(tag, "blog:build");
            assert!(source.to_string().contains("npm ERR! code E404"));
        }
        other => panic!("expected build error, got {other:?}"),
    }
}

// ── Extract Tests ──

#[tokio::test]
async fn extract_file_creates_copies_and_removes() {
    let mut mock = MockExecutor::new();
    let mut seq = mockall::Sequence::new();

    mock.expect_exec()
        .withf(|args| args == ["create", "hugo:toolchain"])
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok("c0ffee\n".to_owned()));
    mock.expect_exec()
        .withf(|args| args == ["cp", "c0ffee:/root/go/bin/hugo", "/tmp/out/hugo"])
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(String::new()));
    mock.expect_exec()
        .withf(|args| args == ["rm", "--force", "c0ffee"])
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok("c0ffee\n".to_owned()));

    let client = EngineClient::with_executor(mock);
    let result = client
        .extract_file(
            "hugo:toolchain",
            "/root/go/bin/hugo",
            Path::new("/tmp/out/hugo"),
        )
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn extract_file_removes_container_when_copy_fails() {
    let mut mock = MockExecutor::new();

    mock.expect_exec()
        .withf(|args| has(args, "create"))
        .returning(|_| Ok("c0ffee\n".to_owned()));
    mock.expect_exec()
        .withf(|args| has(args, "cp"))
        .returning(|_| Err(failed("no such file")));
    mock.expect_exec()
        .withf(|args| has(args, "rm"))
        .times(1)
        .returning(|_| Ok(String::new()));

    let client = EngineClient::with_executor(mock);
    let result = client
        .extract_file("hugo:toolchain", "/root/go/bin/hugo", Path::new("/tmp/hugo"))
        .await;

    assert!(matches!(result, Err(ExtractError::Copy { .. })));
}

#[tokio::test]
async fn extract_file_create_failure() {
    let mut mock = MockExecutor::new();

    mock.expect_exec()
        .withf(|args| has(args, "create"))
        .returning(|_| Err(failed("image not found")));

    let client = EngineClient::with_executor(mock);
    let result = client
        .extract_file("missing", "/root/go/bin/hugo", Path::new("/tmp/hugo"))
        .await;

    assert!(matches!(result, Err(ExtractError::Create { .. })));
}

// ── Service Tests ──

#[tokio::test]
async fn start_service_publishes_port_and_overrides_entrypoint() {
    let mut mock = MockExecutor::new();

    mock.expect_exec()
        .withf(|args| {
            args == [
                "run",
                "--detach",
                "--publish",
                "8080:1313",
                "--entrypoint",
                "/bin/hugo",
                "blog:build",
                "server",
                "--bind=0.0.0.0",
            ]
        })
        .returning(|_| Ok("Unable to find image locally\nabc123\n".to_owned()));

    let client = EngineClient::with_executor(mock);
    let command = vec![
        "/bin/hugo".to_owned(),
        "server".to_owned(),
        "--bind=0.0.0.0".to_owned(),
    ];
    let handle = client
        .start_service("blog:build", &command, 8080, 1313)
        .await
        .unwrap();

    assert_eq!(handle.id, "abc123");
    assert_eq!(handle.host_port, 8080);
    assert_eq!(handle.container_port, 1313);
    assert_eq!(handle.url(), "http://localhost:8080/");
}

#[tokio::test]
async fn start_service_rejects_empty_command() {
    let client = EngineClient::with_executor(MockExecutor::new());
    let result = client.start_service("blog:build", &[], 1313, 1313).await;

    assert!(matches!(result, Err(ServiceError::EmptyCommand)));
}

#[tokio::test]
async fn start_service_port_conflict_is_start_error() {
    let mut mock = MockExecutor::new();

    mock.expect_exec()
        .returning(|_| Err(failed("port is already allocated")));

    let client = EngineClient::with_executor(mock);
    let command = vec!["/bin/hugo".to_owned()];
    let result = client.start_service("blog:build", &command, 1313, 1313).await;

    assert!(matches!(result, Err(ServiceError::Start { .. })));
}

#[tokio::test]
async fn wait_service_returns_exit_code_and_removes_container() {
    let mut mock = MockExecutor::new();

    mock.expect_exec()
        .withf(|args| args == ["wait", "abc123"])
        .returning(|_| Ok("137\n".to_owned()));
    mock.expect_exec()
        .withf(|args| args == ["rm", "--force", "abc123"])
        .times(1)
        .returning(|_| Ok(String::new()));

    let client = EngineClient::with_executor(mock);
    let code = client.wait_service(&service()).await.unwrap();

    assert_eq!(code, 137);
}

#[tokio::test]
async fn wait_service_rejects_garbage_exit_code() {
    let mut mock = MockExecutor::new();

    mock.expect_exec()
        .withf(|args| has(args, "wait"))
        .returning(|_| Ok("not-a-number\n".to_owned()));

    let client = EngineClient::with_executor(mock);
    let result = client.wait_service(&service()).await;

    assert!(matches!(
        result,
        Err(ServiceError::InvalidExitCode { ref output, .. }) if output == "not-a-number"
    ));
}

#[tokio::test]
async fn stop_service_force_removes() {
    let mut mock = MockExecutor::new();

    mock.expect_exec()
        .withf(|args| args == ["rm", "--force", "abc123"])
        .times(1)
        .returning(|_| Ok(String::new()));

    let client = EngineClient::with_executor(mock);
    assert!(client.stop_service(&service()).await.is_ok());
}

#[tokio::test]
async fn follow_logs_streams() {
    let mut mock = MockExecutor::new();

    mock.expect_exec_streaming()
        .withf(|args| args == ["logs", "--follow", "abc123"])
        .returning(|_| Ok(()));

    let client = EngineClient::with_executor(mock);
    assert!(client.follow_logs(&service()).await.is_ok());
}

// ── Publish Tests ──

#[tokio::test]
async fn publish_logs_in_tags_pushes_and_returns_digest() {
    let mut mock = MockExecutor::new();

    mock.expect_exec_with_stdin()
        .withf(|args, stdin| {
            has(args, "login")
                && has(args, "ghcr.io")
                && args.windows(2).any(|w| w[0] == "--username" && w[1] == "KGB33")
                && has(args, "--password-stdin")
                && !has(args, "ghp_token")
                && stdin == b"ghp_token"
        })
        .times(1)
        .returning(|_, _| Ok("Login Succeeded\n".to_owned()));

    mock.expect_exec()
        .withf(|args| args == ["tag", "blog:prod", "ghcr.io/kgb33/blog.kgb33.dev"])
        .times(1)
        .returning(|_| Ok(String::new()));

    mock.expect_exec_streaming()
        .withf(|args| {
            args.first().map(String::as_str) == Some("--config")
                && has(args, "push")
                && args.last().map(String::as_str) == Some("ghcr.io/kgb33/blog.kgb33.dev")
        })
        .times(1)
        .returning(|_| Ok(()));

    mock.expect_exec()
        .withf(|args| has(args, "inspect"))
        .returning(|_| {
            Ok(r#"["other.registry/blog@sha256:111","ghcr.io/kgb33/blog.kgb33.dev@sha256:abc"]"#
                .to_owned()
                + "\n")
        });

    let client = EngineClient::with_executor(mock);
    let digest = client
        .publish("blog:prod", "ghcr.io/kgb33/blog.kgb33.dev", &credential())
        .await
        .unwrap();

    assert_eq!(digest, "ghcr.io/kgb33/blog.kgb33.dev@sha256:abc");
}

#[tokio::test]
async fn publish_rejected_credential_fails_before_push() {
    let mut mock = MockExecutor::new();

    mock.expect_exec_with_stdin()
        .returning(|_, _| Err(failed("unauthorized: bad credentials")));
    mock.expect_exec_streaming().never();
    mock.expect_exec().never();

    let client = EngineClient::with_executor(mock);
    let result = client
        .publish("blog:prod", "ghcr.io/kgb33/blog.kgb33.dev", &credential())
        .await;

    match result {
        Err(PublishError::Login { source }) => {
            assert!(source.to_string().contains("unauthorized: bad credentials"));
        }
        other => panic!("expected login error, got {other:?}"),
    }
}

#[tokio::test]
async fn publish_push_failure() {
    let mut mock = MockExecutor::new();

    mock.expect_exec_with_stdin()
        .returning(|_, _| Ok("Login Succeeded\n".to_owned()));
    mock.expect_exec()
        .withf(|args| has(args, "tag"))
        .returning(|_| Ok(String::new()));
    mock.expect_exec_streaming()
        .returning(|_| Err(failed("denied: permission_denied")));

    let client = EngineClient::with_executor(mock);
    let result = client
        .publish("blog:prod", "ghcr.io/kgb33/blog.kgb33.dev", &credential())
        .await;

    assert!(matches!(result, Err(PublishError::Push { .. })));
}

#[tokio::test]
async fn publish_without_matching_digest_fails() {
    let mut mock = MockExecutor::new();

    mock.expect_exec_with_stdin()
        .returning(|_, _| Ok(String::new()));
    mock.expect_exec()
        .withf(|args| has(args, "tag"))
        .returning(|_| Ok(String::new()));
    mock.expect_exec_streaming().returning(|_| Ok(()));
    mock.expect_exec()
        .withf(|args| has(args, "inspect"))
        .returning(|_| Ok("[]\n".to_owned()));

    let client = EngineClient::with_executor(mock);
    let result = client
        .publish("blog:prod", "ghcr.io/kgb33/blog.kgb33.dev", &credential())
        .await;

    assert!(matches!(result, Err(PublishError::MissingDigest(_))));
}

// ── Doctor Tests ──

#[tokio::test]
async fn doctor_reports_engine_and_daemon() {
    let mut mock = MockExecutor::new();

    mock.expect_exec()
        .withf(|args| has(args, "version"))
        .returning(|_| Ok("27.3.1\n".to_owned()));
    mock.expect_exec()
        .withf(|args| has(args, "info"))
        .returning(|_| Ok("27.3.1\n".to_owned()));

    let client = EngineClient::with_executor(mock);
    let report = client.doctor().await;

    assert!(report.engine.passed);
    assert_eq!(report.engine.detail, "27.3.1");
    assert!(report.daemon.passed);
    // Filled in by the CLI
    assert!(!report.config_file.passed);
}

#[tokio::test]
async fn doctor_daemon_unreachable() {
    let mut mock = MockExecutor::new();

    mock.expect_exec()
        .withf(|args| has(args, "version"))
        .returning(|_| Ok("27.3.1\n".to_owned()));
    mock.expect_exec()
        .withf(|args| has(args, "info"))
        .returning(|_| Err(failed("Cannot connect to the Docker daemon")));

    let client = EngineClient::with_executor(mock);
    let report = client.doctor().await;

    assert!(report.engine.passed);
    assert!(!report.daemon.passed);
    assert!(!report.all_passed());
    assert!(report.to_string().contains("[NG] Engine daemon"));
}

#[tokio::test]
async fn doctor_engine_missing() {
    let mut mock = MockExecutor::new();

    mock.expect_exec().returning(|_| {
        Err(EngineError::NotFound {
            program: "docker".to_owned(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        })
    });

    let client = EngineClient::with_executor(mock);
    let report = client.doctor().await;

    assert!(!report.engine.passed);
    assert!(report.engine.detail.contains("docker"));
}
