use chrono::{Duration, NaiveDate};
use std::sync::Arc;
use thankly_core::clock::FixedClock;
use thankly_core::identity::{IdentitySession, IdentityState};
use thankly_core::journal::JournalStore;
use thankly_core::profile::ProfileService;
use thankly_core::storage::InMemoryStore;
use thankly_core::{AccountTier, SessionContext, ThanklyError};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

fn context() -> (SessionContext, Arc<InMemoryStore>, Arc<FixedClock>) {
    let store = Arc::new(InMemoryStore::new());
    let clock = Arc::new(FixedClock::on(day(15)));
    (SessionContext::new(store.clone(), clock.clone()), store, clock)
}

fn open(ctx: &SessionContext, fragment: Option<&str>) -> (IdentityState, JournalStore) {
    let session = IdentitySession::new(ctx.clone());
    let state = session.resolve(fragment).expect("Should resolve");
    let view = state.view().expect("Should have a view");
    let journal = JournalStore::open(ctx.clone(), view, session.tier().unwrap())
        .expect("Should open journal");
    (state, journal)
}

#[test]
fn test_owner_round_trip_reflects_net_effect() {
    let (ctx, _, clock) = context();
    let session = IdentitySession::new(ctx.clone());
    let alice = session.sign_up("Alice", AccountTier::Guest).unwrap();

    let (state, mut journal) = open(&ctx, Some(&alice.to_fragment()));
    assert!(!state.is_read_only());

    let a = journal.add(Some(day(15)), None, "first").unwrap();
    clock.advance(Duration::milliseconds(5));
    let b = journal.add(Some(day(14)), Some("Second"), "").unwrap();
    clock.advance(Duration::milliseconds(5));
    let c = journal.add(Some(day(13)), None, "third").unwrap();
    journal.update(b.id, None, Some("second, edited")).unwrap();
    journal.remove(a.id).unwrap();

    // Reopen from storage: the net effect survives, newest first.
    let (_, reopened) = open(&ctx, None);
    let listed: Vec<(i64, &str)> = reopened
        .list()
        .iter()
        .map(|e| (e.id, e.text.as_str()))
        .collect();
    assert_eq!(listed, vec![(c.id, "third"), (b.id, "second, edited")]);
    assert_eq!(reopened.count_distinct_dates_with_entries(), 2);
}

#[test]
fn test_read_only_view_leaves_storage_untouched() {
    let (ctx, store, _) = context();

    // Bob writes his journal first.
    let bob = IdentitySession::new(ctx.clone())
        .sign_up("Bob", AccountTier::Registered)
        .unwrap();
    let (_, mut bobs) = open(&ctx, Some(&bob.to_fragment()));
    let entry = bobs.add(Some(day(15)), None, "bob's day").unwrap();

    // Alice takes over the browsing context and peeks at Bob's page.
    let session = IdentitySession::new(ctx.clone());
    session.log_out().unwrap();
    let alice = session.sign_up("Alice", AccountTier::Registered).unwrap();
    let (_, _) = open(&ctx, Some(&alice.to_fragment()));

    let (state, mut viewed) = open(&ctx, Some(&bob.to_fragment()));
    assert_eq!(
        state,
        IdentityState::ReadOnly {
            target: bob.clone(),
            return_to: alice.clone(),
        }
    );

    let before = store.snapshot();
    assert!(viewed.add(Some(day(15)), None, "graffiti").unwrap_err().is_read_only());
    assert!(viewed.update(entry.id, None, Some("x")).unwrap_err().is_read_only());
    assert!(viewed.remove(entry.id).unwrap_err().is_read_only());

    let profile = ProfileService::new(ctx.clone(), state.view().unwrap());
    profile.load_or_create().unwrap();
    assert!(profile.set_nickname("Mallory").unwrap_err().is_read_only());

    assert_eq!(store.snapshot(), before);
    assert_eq!(viewed.list().len(), 1);
}

#[test]
fn test_guest_quota_counts_today_only() {
    let (ctx, _, clock) = context();
    let guest = IdentitySession::new(ctx.clone())
        .sign_up("Gus", AccountTier::Guest)
        .unwrap();
    let (_, mut journal) = open(&ctx, Some(&guest.to_fragment()));

    // Entries on other days do not count towards today's cap.
    for d in 1..=6 {
        journal.add(Some(day(d)), None, "back-filled").unwrap();
    }
    for _ in 0..5 {
        journal.add(Some(day(15)), None, "today").unwrap();
    }

    assert_eq!(
        journal.add(Some(day(15)), None, "sixth"),
        Err(ThanklyError::QuotaExceeded { limit: 5 })
    );
    assert!(journal.add(Some(day(10)), None, "other day").unwrap_err().is_quota_exceeded());

    clock.advance(Duration::days(1));
    assert!(journal.add(Some(day(10)), None, "tomorrow").is_ok());
}

#[test]
fn test_logout_then_login_restores_ownership() {
    let (ctx, _, _) = context();
    let session = IdentitySession::new(ctx.clone());
    let alice = session.sign_up("Alice", AccountTier::Guest).unwrap();
    session.log_out().unwrap();

    assert_eq!(session.resolve(None).unwrap(), IdentityState::Unauthenticated);

    session.log_in(alice.as_str()).unwrap();
    let (state, mut journal) = open(&ctx, Some(&alice.to_fragment()));
    assert!(!state.is_read_only());
    assert!(journal.add(Some(day(15)), None, "back again").is_ok());
}
