use permset_mirror::MirrorBuilder;
use tokio::sync::watch;
use tokio::time::timeout;
use tonic::Status;

use crate::commons::completed_revision;
use crate::commons::member_change;
use crate::commons::set_change;
use crate::commons::settings;
use crate::commons::start_feed;
use crate::commons::wait_until;
use crate::commons::zed_token;
use crate::commons::WAIT_TIMEOUT;
use crate::enable_logger;

/// Mirror a feed, lose the stream, restart the process and check that the
/// mirror resumes after the last completed revision without duplicating rows.
#[tokio::test]
async fn test_mirror_resumes_after_reconnect_and_restart() {
    enable_logger();
    let dir = tempfile::tempdir().unwrap();

    let mut feed = start_feed(vec![
        vec![
            set_change(("team", "eng", "member"), ("org", "acme", "member")),
            completed_revision("r1"),
            member_change(("user", "42", ""), ("repo", "7", "collaborator")),
            Err(Status::unavailable("connection reset")),
        ],
        vec![
            // Redelivery of the change that followed r1
            member_change(("user", "42", ""), ("repo", "7", "collaborator")),
            completed_revision("r2"),
        ],
    ])
    .await;

    let (shutdown_tx, shutdown_rx) = watch::channel(());
    let mirror = MirrorBuilder::init(settings(feed.port, dir.path()), shutdown_rx)
        .build()
        .unwrap();
    let edges = mirror.edge_store();
    let task = tokio::spawn(mirror.run());

    assert_eq!(feed.next_call().await, None);
    assert_eq!(feed.next_call().await, Some(zed_token("r1")));
    // Second stream closes after r2, so a third call follows it
    assert_eq!(feed.next_call().await, Some(zed_token("r2")));

    assert_eq!(edges.set_to_set_len(), 1);
    assert_eq!(edges.member_to_set_len(), 1);

    shutdown_tx.send(()).unwrap();
    assert!(timeout(WAIT_TIMEOUT, task).await.unwrap().unwrap().is_ok());
    drop(edges);

    // Restart on the same database
    let mut feed = start_feed(vec![vec![set_change(
        ("team", "sre", "member"),
        ("org", "acme", "member"),
    )]])
    .await;
    let (shutdown_tx, shutdown_rx) = watch::channel(());
    let mirror = MirrorBuilder::init(settings(feed.port, dir.path()), shutdown_rx)
        .build()
        .unwrap();
    let edges = mirror.edge_store();
    let task = tokio::spawn(mirror.run());

    assert_eq!(feed.next_call().await, Some(zed_token("r2")));
    wait_until(|| edges.set_to_set_len() == 2).await;

    let eng = edges.set_to_set_by_child("team", "eng", "member").unwrap();
    assert_eq!(eng.len(), 1);
    assert_eq!(eng[0].parent_id, "acme");
    let members = edges.member_to_set_by_set("repo", "7", "collaborator").unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].member_relation, None);

    shutdown_tx.send(()).unwrap();
    assert!(timeout(WAIT_TIMEOUT, task).await.unwrap().unwrap().is_ok());
}

#[tokio::test]
async fn test_mirror_with_unreachable_credentials_fails_fast() {
    enable_logger();
    let dir = tempfile::tempdir().unwrap();
    let mut settings = settings(1, dir.path());
    settings.authzed.materialize_endpoint = "not a uri".to_string();

    let (_shutdown_tx, shutdown_rx) = watch::channel(());
    let mirror = MirrorBuilder::init(settings, shutdown_rx).build().unwrap();

    let result = timeout(WAIT_TIMEOUT, mirror.run()).await.unwrap();

    assert!(matches!(result, Err(permset_mirror::Error::Fatal(_))));
}
