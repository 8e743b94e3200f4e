//! End-to-end tests of the command handler over a real SQLite file
//!
//! Run with: cargo test --test command_flow_test

mod common;

use common::{at, TestEnvironment};
use expensebot::commands::{render, AddStep, Keyboard};
use expensebot::core::config::add_prompt::MAX_NOTE_CHARS;
use expensebot::core::ErrorKind;
use expensebot::ledger::{Category, NewTransaction, Window};
use pretty_assertions::assert_eq;
use tokio::time::Duration;

#[tokio::test]
async fn test_multi_step_add_commits_on_confirm() {
    let env = TestEnvironment::new();
    let now = at(2026, 3, 18, 12, 0);

    let reply = env.handler.add("1", "", now).await.unwrap();
    assert!(reply.text.contains("Enter the amount"));

    let reply = env.handler.text("1", "12,50", now).await.unwrap();
    assert_eq!(reply.keyboard, Some(Keyboard::Categories));

    let reply = env.handler.callback("1", "cat:food", now).await.unwrap();
    assert_eq!(reply.answer, None);
    assert!(reply.edit.unwrap().text.contains("Add a note"));

    let reply = env.handler.text("1", "team lunch", now).await.unwrap();
    assert_eq!(reply.keyboard, Some(Keyboard::Confirm));
    assert!(reply.text.contains("-$12.50"));

    let reply = env.handler.callback("1", "confirm:yes", now).await.unwrap();
    assert!(reply.edit.unwrap().text.contains("Saved #"));
    assert_eq!(env.handler.pending().get("1").await, None);

    let recent = env.store.query_recent("1", 10).unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].amount, -12.5);
    assert_eq!(recent[0].category, Some(Category::Food));
    assert_eq!(recent[0].note.as_deref(), Some("team lunch"));
    assert_eq!(recent[0].created_at, now);
}

#[tokio::test]
async fn test_invalid_amount_reprompts_and_keeps_slot() {
    let env = TestEnvironment::new();
    let now = at(2026, 3, 18, 12, 0);
    env.handler.add("1", "", now).await.unwrap();

    let reply = env.handler.text("1", "twelve", now).await.unwrap();
    assert!(reply.text.contains("valid number"));
    assert_eq!(env.handler.pending().get("1").await, Some(AddStep::AwaitingAmount));

    let reply = env.handler.text("1", "0", now).await.unwrap();
    assert!(reply.text.contains("greater than zero"));

    let reply = env.handler.text("1", "12", now).await.unwrap();
    assert_eq!(reply.keyboard, Some(Keyboard::Categories));
}

#[tokio::test]
async fn test_typed_category_and_unknown_category() {
    let env = TestEnvironment::new();
    let now = at(2026, 3, 18, 12, 0);
    env.handler.add("1", "", now).await.unwrap();
    env.handler.text("1", "+40", now).await.unwrap();

    let reply = env.handler.text("1", "lunch money", now).await.unwrap();
    assert!(reply.text.contains("Unknown category"));
    assert_eq!(reply.keyboard, Some(Keyboard::Categories));

    env.handler.text("1", "🎁 Gifts", now).await.unwrap();
    env.handler.skip("1").await;
    env.handler.text("1", "yes", now).await.unwrap();

    let recent = env.store.query_recent("1", 1).unwrap();
    assert_eq!(recent[0].amount, 40.0);
    assert_eq!(recent[0].category, Some(Category::Gifts));
    assert_eq!(recent[0].note, None);
}

#[tokio::test]
async fn test_cancel_and_discard_record_nothing() {
    let env = TestEnvironment::new();
    let now = at(2026, 3, 18, 12, 0);

    env.handler.add("1", "", now).await.unwrap();
    env.handler.text("1", "5", now).await.unwrap();
    let reply = env.handler.cancel("1").await;
    assert!(reply.text.contains("Cancelled"));
    assert_eq!(env.handler.text("1", "5", now).await.unwrap().text, render::NO_ADD_IN_PROGRESS);

    env.handler.add("1", "", now).await.unwrap();
    env.handler.text("1", "5", now).await.unwrap();
    let reply = env.handler.callback("1", "add:cancel", now).await.unwrap();
    assert!(reply.edit.unwrap().text.contains("Cancelled"));

    env.handler.add("1", "", now).await.unwrap();
    env.handler.text("1", "5", now).await.unwrap();
    env.handler.callback("1", "cat:tech", now).await.unwrap();
    env.handler.skip("1").await;
    let reply = env.handler.callback("1", "confirm:no", now).await.unwrap();
    assert!(reply.edit.unwrap().text.contains("discarded"));

    assert_eq!(env.store.count_for_user("1").unwrap(), 0);
}

#[tokio::test]
async fn test_idle_prompt_times_out() {
    let env = TestEnvironment::with_add_timeout(Duration::from_millis(50));
    let now = at(2026, 3, 18, 12, 0);

    env.handler.add("1", "", now).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let reply = env.handler.text("1", "12", now).await.unwrap();
    assert_eq!(reply.text, render::NO_ADD_IN_PROGRESS);
    assert_eq!(env.store.count_for_user("1").unwrap(), 0);
}

#[tokio::test]
async fn test_restarting_add_replaces_slot() {
    let env = TestEnvironment::new();
    let now = at(2026, 3, 18, 12, 0);

    env.handler.add("1", "", now).await.unwrap();
    env.handler.text("1", "5", now).await.unwrap();
    env.handler.add("1", "", now).await.unwrap();
    assert_eq!(env.handler.pending().get("1").await, Some(AddStep::AwaitingAmount));
}

#[tokio::test]
async fn test_quick_add_then_today_shows_expense_and_breakdown() {
    let env = TestEnvironment::new();
    let now = at(2026, 3, 18, 12, 0);

    let reply = env.handler.add("1", "-12.50 food", now).await.unwrap();
    assert!(reply.text.contains("-$12.50"));

    let reply = env.handler.summary("1", Window::Today, at(2026, 3, 18, 18, 0)).unwrap();
    assert!(reply.text.contains("Expense: <b>12.50</b>"));
    assert!(reply.text.contains("food: 12.50"));
}

#[tokio::test]
async fn test_quick_add_validation_error() {
    let env = TestEnvironment::new();
    let err = env.handler.add("1", "abc food", at(2026, 3, 18, 12, 0)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(env.handler.error_reply(&err).text.contains("/add 12.50 food lunch"));
}

#[tokio::test]
async fn test_month_subtotals_sum_to_net() {
    let env = TestEnvironment::new();
    let rows = [
        (-12.34, Some(Category::Food)),
        (-0.1, Some(Category::Food)),
        (-0.2, Some(Category::Dining)),
        (2500.0, Some(Category::Salary)),
        (-999.99, Some(Category::Rent)),
        (-7.77, None),
        (15.55, Some(Category::Gifts)),
    ];
    for (i, (amount, category)) in rows.into_iter().enumerate() {
        let mut tx = NewTransaction::new("1", amount).at(at(2026, 3, 2 + i as u32, 10, 0));
        if let Some(category) = category {
            tx = tx.category(category);
        }
        env.store.insert(&tx).unwrap();
    }
    // Previous month, must not count
    env.store
        .insert(&NewTransaction::new("1", -50.0).at(at(2026, 2, 27, 10, 0)))
        .unwrap();

    let summary = env.handler.summarize("1", Window::Month, at(2026, 3, 20, 0, 0)).unwrap();
    let subtotals: i64 = summary.by_category.iter().map(|c| c.total).sum();
    assert_eq!(subtotals, summary.net());
    assert_eq!(summary.count, 7);
    assert_eq!(summary.net(), 149_515);
}

#[tokio::test]
async fn test_delete_flow_respects_ownership() {
    let env = TestEnvironment::new();
    let now = at(2026, 3, 18, 12, 0);
    env.handler.add("alice", "3 food", now).await.unwrap();
    let id = env.store.query_recent("alice", 1).unwrap()[0].id;

    let err = env.handler.delete("bob", &id.to_string()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(env.store.count_for_user("alice").unwrap(), 1);

    let reply = env.handler.delete("alice", &id.to_string()).unwrap();
    assert!(reply.text.contains(&format!("#{} deleted", id)));

    let err = env.handler.delete("alice", &id.to_string()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_recent_lists_newest_first() {
    let env = TestEnvironment::new();
    env.handler.add("1", "1 food first", at(2026, 3, 18, 9, 0)).await.unwrap();
    env.handler.add("1", "2 fuel second", at(2026, 3, 18, 10, 0)).await.unwrap();

    let text = env.handler.recent("1").unwrap().text;
    let first = text.find("first").unwrap();
    let second = text.find("second").unwrap();
    assert!(second < first);
}

#[tokio::test]
async fn test_recent_with_long_notes_fits_one_message() {
    let env = TestEnvironment::new();
    let note = "&<".repeat(MAX_NOTE_CHARS / 2);
    for i in 0..10 {
        env.handler
            .add("1", &format!("-999999.99 entertainment {}", note), at(2026, 3, 18, 9, i))
            .await
            .unwrap();
    }

    let text = env.handler.recent("1").unwrap().text;
    assert!(render::message_len(&text) <= render::MAX_MESSAGE_LEN);
    assert!(text.contains("Delete with /delete"));
}

/// Breaks the schema underneath the store so every query fails.
fn drop_expenses_table(env: &TestEnvironment) {
    let conn = rusqlite::Connection::open(env.store.path()).unwrap();
    conn.execute_batch("DROP TABLE expenses").unwrap();
}

#[tokio::test]
async fn test_storage_failure_gives_generic_reply() {
    let env = TestEnvironment::new();
    let now = at(2026, 3, 18, 12, 0);
    env.handler.add("1", "3 food", now).await.unwrap();
    drop_expenses_table(&env);

    let failures = [
        env.handler.summary("1", Window::Month, now).unwrap_err(),
        env.handler.recent("1").unwrap_err(),
        env.handler.delete("1", "1").unwrap_err(),
        env.handler.add("1", "3 food", now).await.unwrap_err(),
        env.handler.status("1", now).await.unwrap_err(),
    ];
    for err in failures {
        assert_eq!(err.kind(), ErrorKind::Storage, "{}", err);
        assert_eq!(env.handler.error_reply(&err).text, render::GENERIC_FAILURE);
    }
}

#[tokio::test]
async fn test_failed_save_keeps_prompt_for_retry() {
    let env = TestEnvironment::new();
    let now = at(2026, 3, 18, 12, 0);
    env.handler.add("1", "", now).await.unwrap();
    env.handler.text("1", "4.20", now).await.unwrap();
    env.handler.callback("1", "cat:dining", now).await.unwrap();
    env.handler.text("1", "flat white", now).await.unwrap();
    drop_expenses_table(&env);

    let err = env.handler.callback("1", "confirm:yes", now).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);
    assert!(matches!(
        env.handler.pending().get("1").await,
        Some(AddStep::AwaitingConfirmation { .. })
    ));
}
