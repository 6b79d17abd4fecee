//! Unit tests for identities and cursor pagination.

use mockall::Sequence;
use rstest::rstest;

use super::{
    ContributionError, ContributionPage, MockContributionSource, PageCursor, PageInfo,
    PersonalAccessToken, UserLogin, fetch_all,
};
use crate::github::models::test_support::merged_pull_request as record;

fn login(value: &str) -> UserLogin {
    UserLogin::new(value).expect("login should be valid")
}

#[rstest]
#[case::empty("")]
#[case::whitespace("   ")]
fn rejects_blank_login(#[case] value: &str) {
    let result = UserLogin::new(value);
    assert!(
        matches!(result, Err(ContributionError::InvalidUserLogin)),
        "expected InvalidUserLogin, got {result:?}"
    );
}

#[rstest]
fn trims_login_but_keeps_case() {
    let user = login("  OctoCat ");
    assert_eq!(user.as_str(), "OctoCat");
    assert_ne!(user, login("octocat"), "logins are case-sensitive");
}

#[rstest]
fn rejects_empty_token() {
    let result = PersonalAccessToken::new(String::new());
    assert!(
        matches!(result, Err(ContributionError::MissingToken)),
        "expected MissingToken, got {result:?}"
    );
}

#[rstest]
fn token_debug_output_is_redacted() {
    let token = PersonalAccessToken::new("ghp_secret").expect("token should be valid");
    assert!(!format!("{token:?}").contains("ghp_secret"));
}

#[tokio::test]
async fn fetch_all_threads_cursor_until_last_page() {
    let mut source = MockContributionSource::new();
    let mut sequence = Sequence::new();

    source
        .expect_merged_pull_requests()
        .withf(|user, cursor| user.as_str() == "octocat" && cursor.is_none())
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_, _| {
            Ok(ContributionPage {
                records: vec![record("acme", "core", "Fix bug", "L1")],
                page_info: PageInfo::new(Some(PageCursor::new("c1")), true),
            })
        });

    source
        .expect_merged_pull_requests()
        .withf(|_, cursor| cursor.as_ref().map(PageCursor::as_str) == Some("c1"))
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_, _| {
            Ok(ContributionPage {
                records: vec![
                    record("acme", "widgets", "Add docs", "L3"),
                    record("globex", "api", "Bump deps", "L5"),
                ],
                page_info: PageInfo::new(Some(PageCursor::new("c2")), false),
            })
        });

    let records = fetch_all(&source, &login("octocat"))
        .await
        .expect("pagination should succeed");

    let titles: Vec<&str> = records.iter().map(|item| item.title.as_str()).collect();
    assert_eq!(titles, vec!["Fix bug", "Add docs", "Bump deps"]);
}

#[tokio::test]
async fn fetch_all_aborts_on_first_failure() {
    let mut source = MockContributionSource::new();
    let mut sequence = Sequence::new();

    source
        .expect_merged_pull_requests()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_, _| {
            Ok(ContributionPage {
                records: vec![record("acme", "core", "Fix bug", "L1")],
                page_info: PageInfo::new(Some(PageCursor::new("c1")), true),
            })
        });

    source
        .expect_merged_pull_requests()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_, _| {
            Err(ContributionError::Network {
                message: "connection reset".to_owned(),
            })
        });

    let result = fetch_all(&source, &login("octocat")).await;

    assert_eq!(
        result,
        Err(ContributionError::Network {
            message: "connection reset".to_owned(),
        })
    );
}

#[tokio::test]
async fn fetch_all_rejects_next_page_without_cursor() {
    let mut source = MockContributionSource::new();

    source
        .expect_merged_pull_requests()
        .times(1)
        .returning(|_, _| {
            Ok(ContributionPage {
                records: Vec::new(),
                page_info: PageInfo::new(None, true),
            })
        });

    let result = fetch_all(&source, &login("octocat")).await;

    assert!(
        matches!(result, Err(ContributionError::InvalidPagination { .. })),
        "expected InvalidPagination, got {result:?}"
    );
}

#[tokio::test]
async fn fetch_all_returns_empty_for_user_without_pull_requests() {
    let mut source = MockContributionSource::new();

    source
        .expect_merged_pull_requests()
        .times(1)
        .returning(|_, _| Ok(ContributionPage::default()));

    let records = fetch_all(&source, &login("octocat"))
        .await
        .expect("pagination should succeed");

    assert!(records.is_empty());
}
