use chrono::NaiveDate;
use std::sync::Arc;
use tempfile::TempDir;
use thankly_core::clock::FixedClock;
use thankly_core::identity::IdentitySession;
use thankly_core::journal::JournalStore;
use thankly_core::profile::ProfileService;
use thankly_core::{AccountTier, SessionContext};
use thankly_infrastructure::{FileKeyValueStore, ThanklyPaths};

fn context(paths: &ThanklyPaths) -> SessionContext {
    let store = Arc::new(FileKeyValueStore::new(paths.data_dir().to_path_buf()));
    let clock = Arc::new(FixedClock::on(NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()));
    SessionContext::new(store, clock)
}

#[test]
fn test_journal_survives_a_restart() {
    let temp_dir = TempDir::new().unwrap();
    let paths = ThanklyPaths::with_root(temp_dir.path());
    let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();

    let alice = {
        let ctx = context(&paths);
        let session = IdentitySession::new(ctx.clone());
        let alice = session.sign_up("Alice", AccountTier::Guest).unwrap();
        let view = session.resolve(None).unwrap().view().unwrap();

        let mut journal = JournalStore::open(ctx.clone(), view.clone(), AccountTier::Guest).unwrap();
        journal.add(Some(today), Some("Tea"), "with a friend").unwrap();
        ProfileService::new(ctx, view).set_nickname("Ally").unwrap();
        alice
    };

    // A new process: nothing but the files on disk.
    let ctx = context(&paths);
    let session = IdentitySession::new(ctx.clone());
    let state = session.resolve(None).unwrap();
    assert_eq!(state.target(), Some(&alice));
    assert!(!state.is_read_only());

    let view = state.view().unwrap();
    let journal = JournalStore::open(ctx.clone(), view.clone(), session.tier().unwrap()).unwrap();
    assert_eq!(journal.list().len(), 1);
    assert_eq!(journal.list()[0].title.as_deref(), Some("Tea"));
    assert_eq!(journal.stored_total_days().unwrap(), Some(1));

    let profile = ProfileService::new(ctx, view).load_or_create().unwrap();
    assert_eq!(profile.nickname, "Ally");
}

#[test]
fn test_corrupt_partition_file_opens_as_empty_journal() {
    let temp_dir = TempDir::new().unwrap();
    let paths = ThanklyPaths::with_root(temp_dir.path());
    let ctx = context(&paths);
    let session = IdentitySession::new(ctx.clone());
    let alice = session.sign_up("Alice", AccountTier::Registered).unwrap();

    let partitions = paths.data_dir().join("partitions");
    std::fs::create_dir_all(&partitions).unwrap();
    std::fs::write(partitions.join(format!("{}.json", alice.as_str())), "{ oops").unwrap();

    let view = session.resolve(None).unwrap().view().unwrap();
    let mut journal = JournalStore::open(ctx, view, AccountTier::Registered).unwrap();
    assert!(journal.list().is_empty());

    // Writing again replaces the unreadable document.
    let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
    journal.add(Some(today), None, "fresh start").unwrap();
    assert!(partitions.join(format!("{}.json.corrupt", alice.as_str())).exists());
}
