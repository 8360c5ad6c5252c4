//! End-to-end flows across ports: a page's session, secrets, uploads and
//! presets wired to the same clock and storage.

use std::sync::Arc;

use paygrid_console::{
    ConsoleError, FileStorage, IdleConfig, IdleEvent, JobState, JobTracker, ManualClock,
    MaskedValue, MemoryStorage, MockClipboard, PresetStore, RevealConfig, RevealEvent,
    SessionGuard, SimulatedRunner, Storage, UploadConfig, UploadQueue, UploadStatus,
    SESSION_EXPIRED_KEY,
};
use serde::{Deserialize, Serialize};

const MIN: i64 = 60_000;

#[test]
fn expired_session_leaves_banner_for_next_login() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("console.json");
    let clock = Arc::new(ManualClock::at(1_704_067_200_000));

    let mut guard = SessionGuard::new(
        IdleConfig::default(),
        clock.clone(),
        Arc::new(FileStorage::new(&path)),
    );
    clock.advance(5 * MIN);
    assert!(guard.record_activity());
    clock.advance(14 * MIN);
    assert_eq!(guard.tick().unwrap(), Some(IdleEvent::Warn));
    assert!(!guard.record_activity());
    clock.advance(MIN);
    assert_eq!(guard.tick().unwrap(), Some(IdleEvent::Timeout));
    assert_eq!(guard.tick().unwrap(), None);

    let next = SessionGuard::new(
        IdleConfig::default(),
        clock.clone(),
        Arc::new(FileStorage::new(&path)),
    );
    assert_eq!(
        next.expired_banner().unwrap().as_deref(),
        Some("2024-01-01T00:20:00.000Z")
    );
    next.dismiss_banner().unwrap();
    assert_eq!(next.expired_banner().unwrap(), None);
}

#[test]
fn extend_from_warning_keeps_session() {
    let clock = Arc::new(ManualClock::at(0));
    let storage = Arc::new(MemoryStorage::new());
    let mut guard = SessionGuard::new(IdleConfig::default(), clock.clone(), storage.clone());

    clock.set(14 * MIN);
    assert_eq!(guard.tick().unwrap(), Some(IdleEvent::Warn));
    clock.set(14 * MIN + 30_000);
    assert_eq!(guard.seconds_left(), Some(30));
    assert!(guard.extend());
    clock.set(15 * MIN);
    assert_eq!(guard.tick().unwrap(), None);
    assert_eq!(storage.get(SESSION_EXPIRED_KEY).unwrap(), None);
}

#[test]
fn webhook_secret_reveal_and_copy() {
    let clock = ManualClock::at(0);
    let clipboard = MockClipboard::new();
    let mut secret = MaskedValue::new(Some("whsec_live_3b9e".into()), RevealConfig::default(), 0);

    assert_eq!(secret.display(), "***********3b9e");
    secret.copy_to(&clipboard).unwrap();
    assert_eq!(clipboard.contents().as_deref(), Some("whsec_live_3b9e"));

    clock.advance(1_000);
    let now = paygrid_console::Clock::now_millis(&clock);
    assert_eq!(secret.toggle(now).unwrap(), RevealEvent::Revealed);
    assert_eq!(secret.poll(now + 4_999), None);
    assert_eq!(secret.poll(now + 5_000), Some(RevealEvent::Hidden));
    assert_eq!(secret.display(), "***********3b9e");
}

#[test]
fn document_upload_form() {
    let mut runner = SimulatedRunner::new();
    let mut queue = UploadQueue::new(UploadConfig::default());

    let err = queue.add("statement.xlsx", 1024).unwrap_err();
    assert_eq!(
        err.to_string(),
        "File 'statement.xlsx' rejected: only pdf/jpg/jpeg/png files are accepted"
    );

    let ok = queue.add("registration.pdf", 200_000).unwrap();
    let flaky = queue.add("fail_id_card.jpg", 300_000).unwrap();
    assert!(queue.validate().is_err());

    assert_eq!(queue.upload(ok, &mut runner).unwrap(), UploadStatus::Done);
    assert_eq!(queue.upload(flaky, &mut runner).unwrap(), UploadStatus::Failed);
    assert!(queue.get(flaky).unwrap().error.is_some());
    assert!(matches!(
        queue.validate(),
        Err(ConsoleError::Validation { ref reason, .. }) if reason == "retry failed uploads"
    ));

    assert_eq!(queue.retry(flaky, &mut runner).unwrap(), UploadStatus::Done);
    assert!(queue.get(flaky).unwrap().error.is_none());
    queue.validate().unwrap();

    queue.remove(ok).unwrap();
    assert_eq!(queue.entries().len(), 1);
}

#[test]
fn settlement_download_retry() {
    let mut runner = SimulatedRunner::new().fail_first("STL-202401-007");
    let mut jobs = JobTracker::new();
    let id = "STL-202401-007".to_string();

    let err = jobs.run(&id, &mut runner).unwrap_err();
    assert!(matches!(err, ConsoleError::JobFailed(_)));
    assert_eq!(jobs.state(&id), JobState::Failed(err.to_string()));

    jobs.run(&id, &mut runner).unwrap();
    assert_eq!(jobs.state(&id), JobState::Idle);
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    merchant: Option<String>,
}

#[test]
fn presets_survive_reload() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("console.json");
    let clock = Arc::new(ManualClock::at(1_000));

    let store = PresetStore::new(Arc::new(FileStorage::new(&path)), clock.clone());
    let refunds = TransactionFilters {
        status: Some("refunded".into()),
        merchant: None,
    };
    store.add("Refunds", refunds.clone()).unwrap();
    clock.advance(1);
    store
        .add(
            "Acme",
            TransactionFilters {
                status: None,
                merchant: Some("Acme".into()),
            },
        )
        .unwrap();

    let reloaded: PresetStore<TransactionFilters, _, _> =
        PresetStore::new(Arc::new(FileStorage::new(&path)), clock);
    let names: Vec<_> = reloaded.list().unwrap().into_iter().map(|p| p.name).collect();
    assert_eq!(names, ["Refunds", "Acme"]);
    assert_eq!(reloaded.find("1000").unwrap().unwrap().filters, refunds);
    assert!(reloaded.remove("1001").unwrap());
    assert_eq!(reloaded.list().unwrap().len(), 1);
}
