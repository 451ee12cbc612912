use std::time::Duration;

use eventgate::core::{menu, CloseReason, Identity, Mode, ShellEvent};
use eventgate::Route;

mod common;

use common::{is_navigation, is_notice, navigations, notice_titles, ALICE, ALICE_PASSWORD};

fn route(path: &str) -> Route {
    Route::new(path).unwrap()
}

#[test]
fn create_event_after_sign_in() {
    common::init_tracing();

    tokio_test::block_on(async move {
        let mut shell = common::start(common::provider()).await;

        // Visitor clicks "Create Event" from the navbar without a session.
        let snapshot = shell.handle.snapshot().await.unwrap();
        let create = menu::find(&snapshot.menu, "Create Event").unwrap();
        shell.handle.activate(create.action.clone()).await.unwrap();

        shell.wait_for(|event| *event == ShellEvent::AuthOpened).await;
        let snapshot = shell.handle.snapshot().await.unwrap();
        assert_eq!(snapshot.pending, Some(route("/create-event")));
        assert_eq!(snapshot.auth.unwrap().mode, Mode::SignIn);

        shell.sign_in(ALICE, ALICE_PASSWORD).await;

        // The notice and the navigation may arrive in either order.
        let mut seen = shell.wait_for(is_navigation).await;
        seen.extend(shell.drain(Duration::from_millis(100)).await);

        assert_eq!(navigations(&seen), vec!["/create-event".to_owned()]);
        assert_eq!(notice_titles(&seen), vec!["Welcome back!".to_owned()]);
        assert!(seen.contains(&ShellEvent::IdentityChanged(Some(Identity::new(ALICE)))));

        let snapshot = shell.handle.snapshot().await.unwrap();
        assert_eq!(snapshot.identity, Some(Identity::new(ALICE)));
        assert_eq!(snapshot.pending, None);
        assert!(snapshot.auth.is_none());
        assert!(menu::find(&snapshot.menu, "My Events").is_some());

        shell.stop().await;
    })
}

#[test]
fn only_latest_target_is_honored() {
    tokio_test::block_on(async move {
        let mut shell = common::start(common::provider()).await;

        shell.handle.request_navigation(route("/a")).await.unwrap();
        shell.handle.request_navigation(route("/b")).await.unwrap();
        shell.sign_in(ALICE, ALICE_PASSWORD).await;

        let mut seen = shell.wait_for(is_navigation).await;
        seen.extend(shell.drain(Duration::from_millis(100)).await);

        assert_eq!(navigations(&seen), vec!["/b".to_owned()]);
        // Opening twice keeps one surface.
        assert_eq!(
            seen.iter()
                .filter(|event| **event == ShellEvent::AuthOpened)
                .count(),
            1
        );

        shell.stop().await;
    })
}

#[test]
fn sign_in_without_intent_navigates_nowhere() {
    tokio_test::block_on(async move {
        let mut shell = common::start(common::provider()).await;

        shell.handle.open_auth_flow().await.unwrap();
        shell.sign_in(ALICE, ALICE_PASSWORD).await;

        let mut seen = shell.wait_for(is_notice("Welcome back!")).await;
        seen.extend(shell.drain(Duration::from_millis(100)).await);

        assert!(navigations(&seen).is_empty());
        assert!(seen.contains(&ShellEvent::AuthClosed(CloseReason::Authenticated)));

        shell.stop().await;
    })
}

#[test]
fn dismissal_discards_intent() {
    tokio_test::block_on(async move {
        let provider = common::provider();
        let mut shell = common::start(provider.clone()).await;

        shell
            .handle
            .request_navigation(route("/create-event"))
            .await
            .unwrap();
        shell.handle.close_auth_flow().await.unwrap();
        shell
            .wait_for(|event| *event == ShellEvent::AuthClosed(CloseReason::Dismissed))
            .await;

        let snapshot = shell.handle.snapshot().await.unwrap();
        assert_eq!(snapshot.pending, None);

        // A later unrelated sign in.
        shell.handle.open_auth_flow().await.unwrap();
        shell.sign_in(ALICE, ALICE_PASSWORD).await;

        let mut seen = shell.wait_for(is_notice("Welcome back!")).await;
        seen.extend(shell.drain(Duration::from_millis(100)).await);
        assert!(navigations(&seen).is_empty());

        shell.stop().await;
    })
}

#[test]
fn late_result_after_dismissal_is_discarded() {
    tokio_test::block_on(async move {
        let provider = common::provider();
        let mut shell = common::start(provider.clone().with_latency(50, 80)).await;

        shell
            .handle
            .request_navigation(route("/create-event"))
            .await
            .unwrap();
        shell.sign_in(ALICE, ALICE_PASSWORD).await;
        shell.handle.close_auth_flow().await.unwrap();
        shell
            .wait_for(|event| *event == ShellEvent::AuthClosed(CloseReason::Dismissed))
            .await;

        // The provider still completes the sign in.
        let mut seen = shell
            .wait_for(|event| matches!(event, ShellEvent::IdentityChanged(Some(_))))
            .await;
        seen.extend(shell.drain(Duration::from_millis(150)).await);

        assert!(navigations(&seen).is_empty());
        assert!(notice_titles(&seen).is_empty());
        assert!(!seen.contains(&ShellEvent::AuthOpened));

        let snapshot = shell.handle.snapshot().await.unwrap();
        assert!(snapshot.auth.is_none());
        assert_eq!(snapshot.pending, None);

        shell.stop().await;
    })
}

#[test]
fn duplicate_notification_does_not_navigate_twice() {
    tokio_test::block_on(async move {
        let provider = common::provider();
        let mut shell = common::start(provider.clone()).await;

        shell
            .handle
            .request_navigation(route("/create-event"))
            .await
            .unwrap();
        shell.sign_in(ALICE, ALICE_PASSWORD).await;
        let mut seen = shell.wait_for(is_navigation).await;

        provider.broadcast(Some(Identity::new(ALICE)));
        provider.broadcast(Some(Identity::new(ALICE)));
        seen.extend(shell.drain(Duration::from_millis(100)).await);

        assert_eq!(navigations(&seen).len(), 1);
        assert_eq!(
            seen.iter()
                .filter(|event| matches!(event, ShellEvent::IdentityChanged(_)))
                .count(),
            1
        );

        shell.stop().await;
    })
}

#[test]
fn signed_in_navigation_is_immediate() {
    tokio_test::block_on(async move {
        let provider = common::provider().with_session(Identity::new(ALICE));
        let mut shell = common::start(provider).await;

        shell
            .handle
            .request_navigation(route("/create-event"))
            .await
            .unwrap();

        let seen = shell.wait_for(is_navigation).await;
        assert_eq!(seen, vec![ShellEvent::Navigated(route("/create-event"))]);

        let snapshot = shell.handle.snapshot().await.unwrap();
        assert_eq!(snapshot.pending, None);
        assert!(snapshot.auth.is_none());

        shell.stop().await;
    })
}

#[test]
fn unknown_account_switches_to_sign_up() {
    tokio_test::block_on(async move {
        let mut shell = common::start(common::provider()).await;

        shell
            .handle
            .request_navigation(route("/create-event"))
            .await
            .unwrap();
        shell.sign_in("bob@example.com", "hunter22").await;
        shell.wait_for(is_notice("Account Not Found")).await;

        let auth = shell.handle.snapshot().await.unwrap().auth.unwrap();
        assert_eq!(auth.mode, Mode::SignUp);
        assert_eq!(auth.email, "bob@example.com");
        assert!(!auth.submitting);

        // Sign up never signs in by itself.
        shell.handle.submit().await.unwrap();
        let mut seen = shell.wait_for(is_notice("Account created!")).await;
        seen.extend(shell.drain(Duration::from_millis(50)).await);

        assert!(navigations(&seen).is_empty());
        let snapshot = shell.handle.snapshot().await.unwrap();
        assert_eq!(snapshot.identity, None);
        assert_eq!(snapshot.auth.unwrap().mode, Mode::SignIn);
        assert_eq!(snapshot.pending, Some(route("/create-event")));

        // Credentials are kept, so signing in right away resumes the navigation.
        shell.handle.submit().await.unwrap();
        let seen = shell.wait_for(is_navigation).await;
        assert_eq!(navigations(&seen), vec!["/create-event".to_owned()]);

        shell.stop().await;
    })
}

#[test]
fn invalid_input_never_reaches_provider() {
    tokio_test::block_on(async move {
        let mut shell = common::start(common::provider()).await;

        shell.handle.open_auth_flow().await.unwrap();
        shell.sign_in("not-an-email", ALICE_PASSWORD).await;

        let seen = shell.wait_for(is_notice("Error")).await;
        let notice = seen
            .iter()
            .find_map(|event| match event {
                ShellEvent::Notice(notice) => Some(notice.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(notice.description, "Please enter a valid email address.");

        let auth = shell.handle.snapshot().await.unwrap().auth.unwrap();
        assert_eq!(auth.mode, Mode::SignIn);
        assert!(!auth.submitting);

        shell.stop().await;
    })
}

#[test]
fn sign_out_updates_identity() {
    tokio_test::block_on(async move {
        let provider = common::provider().with_session(Identity::new(ALICE));
        let mut shell = common::start(provider).await;

        let snapshot = shell.handle.snapshot().await.unwrap();
        let sign_out = menu::find(&snapshot.menu, "sign out").unwrap();
        shell.handle.activate(sign_out.action.clone()).await.unwrap();

        shell
            .wait_for(|event| *event == ShellEvent::IdentityChanged(None))
            .await;

        let snapshot = shell.handle.snapshot().await.unwrap();
        assert_eq!(snapshot.identity, None);
        assert!(menu::find(&snapshot.menu, "Sign In").is_some());
        assert!(menu::find(&snapshot.menu, "My Events").is_none());

        shell.stop().await;
    })
}

#[test]
fn shutdown_releases_subscription() {
    tokio_test::block_on(async move {
        let provider = common::provider();
        let shell = common::start(provider.clone()).await;
        assert_eq!(provider.subscriber_count(), 1);

        shell.stop().await;

        assert_eq!(provider.subscriber_count(), 0);
    })
}

#[test]
fn dismiss_after_sign_in_keeps_intent() {
    tokio_test::block_on(async move {
        // Notification lands well after sign_in has returned.
        let provider = common::provider().with_feed_lag(50);
        let mut shell = common::start(provider).await;

        shell
            .handle
            .request_navigation(route("/create-event"))
            .await
            .unwrap();
        shell.sign_in(ALICE, ALICE_PASSWORD).await;
        shell
            .wait_for(|event| *event == ShellEvent::AuthClosed(CloseReason::Authenticated))
            .await;

        shell.handle.close_auth_flow().await.unwrap();

        let mut seen = shell.wait_for(is_navigation).await;
        seen.extend(shell.drain(Duration::from_millis(50)).await);

        assert_eq!(navigations(&seen), vec!["/create-event".to_owned()]);
        assert!(!seen.contains(&ShellEvent::AuthClosed(CloseReason::Dismissed)));

        let snapshot = shell.handle.snapshot().await.unwrap();
        assert_eq!(snapshot.identity, Some(Identity::new(ALICE)));
        assert_eq!(snapshot.pending, None);

        shell.stop().await;
    })
}

#[test]
fn sign_out_right_after_sign_in_navigates_once() {
    tokio_test::block_on(async move {
        let provider = common::provider();
        let mut shell = common::start(provider.clone()).await;

        shell
            .handle
            .request_navigation(route("/create-event"))
            .await
            .unwrap();
        shell.wait_for(|event| *event == ShellEvent::AuthOpened).await;

        provider.broadcast(Some(Identity::new(ALICE)));
        provider.broadcast(None);

        let mut seen = shell
            .wait_for(|event| *event == ShellEvent::IdentityChanged(None))
            .await;
        seen.extend(shell.drain(Duration::from_millis(100)).await);

        assert_eq!(navigations(&seen), vec!["/create-event".to_owned()]);
        let navigated = seen.iter().position(is_navigation).unwrap();
        let signed_out = seen
            .iter()
            .position(|event| *event == ShellEvent::IdentityChanged(None))
            .unwrap();
        assert!(navigated < signed_out);

        let snapshot = shell.handle.snapshot().await.unwrap();
        assert_eq!(snapshot.identity, None);
        assert_eq!(snapshot.pending, None);

        shell.stop().await;
    })
}
