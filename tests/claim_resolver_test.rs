mod common;

use assert_matches::assert_matches;
use common::TestApp;
use uuid::Uuid;
use whistl_api::errors::ClaimError;
use whistl_api::services::claims::ClaimItemCommand;

fn command(item_id: Uuid, user_id: Uuid, alert_id: Uuid, quantity: i32) -> ClaimItemCommand {
    ClaimItemCommand {
        item_id,
        user_id,
        alert_id,
        quantity,
    }
}

#[tokio::test]
async fn claim_succeeds_and_returns_row() {
    let app = TestApp::new().await;
    let alert_id = app.seed_alert().await;
    let item_id = app.seed_item(alert_id, "Water bottles", 5).await;
    let user_id = Uuid::new_v4();

    let claim = app
        .state
        .services
        .claims
        .claim_item(command(item_id, user_id, alert_id, 3))
        .await
        .expect("claim should succeed");

    assert_eq!(claim.preparation_item_id, item_id);
    assert_eq!(claim.user_id, user_id);
    assert_eq!(claim.quantity, 3);
}

#[tokio::test]
async fn second_claimant_is_rejected_with_existing_claim() {
    let app = TestApp::new().await;
    let alert_id = app.seed_alert().await;
    let item_id = app.seed_item(alert_id, "Blankets", 5).await;
    let first_user = Uuid::new_v4();

    app.state
        .services
        .claims
        .claim_item(command(item_id, first_user, alert_id, 3))
        .await
        .expect("first claim should succeed");

    // The item is exclusive: a different user asking for the remainder is
    // still rejected, and the rejection carries the blocking claim.
    let second = app
        .state
        .services
        .claims
        .claim_item(command(item_id, Uuid::new_v4(), alert_id, 2))
        .await;

    assert_matches!(second, Err(ClaimError::AlreadyClaimed { existing_claim }) => {
        assert_eq!(existing_claim.user_id, first_user);
        assert_eq!(existing_claim.quantity, 3);
    });
}

#[tokio::test]
async fn reclaiming_own_item_is_rejected() {
    let app = TestApp::new().await;
    let alert_id = app.seed_alert().await;
    let item_id = app.seed_item(alert_id, "Torches", 2).await;
    let user_id = Uuid::new_v4();

    app.state
        .services
        .claims
        .claim_item(command(item_id, user_id, alert_id, 1))
        .await
        .expect("first claim should succeed");

    let again = app
        .state
        .services
        .claims
        .claim_item(command(item_id, user_id, alert_id, 1))
        .await;

    assert_matches!(again, Err(ClaimError::AlreadyClaimed { existing_claim }) => {
        assert_eq!(existing_claim.user_id, user_id);
    });
}

#[tokio::test]
async fn unknown_item_is_not_found() {
    let app = TestApp::new().await;
    let alert_id = app.seed_alert().await;

    let result = app
        .state
        .services
        .claims
        .claim_item(command(Uuid::new_v4(), Uuid::new_v4(), alert_id, 1))
        .await;

    assert_matches!(result, Err(ClaimError::NotFound));
}

#[tokio::test]
async fn item_under_other_alert_is_not_found() {
    let app = TestApp::new().await;
    let alert_a = app.seed_alert().await;
    let alert_b = app.seed_alert().await;
    let item_id = app.seed_item(alert_a, "Sandbags", 10).await;

    // The item exists, but not under the alert the caller named.
    let result = app
        .state
        .services
        .claims
        .claim_item(command(item_id, Uuid::new_v4(), alert_b, 1))
        .await;

    assert_matches!(result, Err(ClaimError::NotFound));

    // Nothing was written; the item is still claimable under its own alert.
    let claim = app
        .state
        .services
        .claims
        .claim_for_item(item_id)
        .await
        .expect("lookup should succeed");
    assert!(claim.is_none());
}

#[tokio::test]
async fn requesting_more_than_authorized_is_insufficient() {
    let app = TestApp::new().await;
    let alert_id = app.seed_alert().await;
    let item_id = app.seed_item(alert_id, "Generators", 5).await;

    let result = app
        .state
        .services
        .claims
        .claim_item(command(item_id, Uuid::new_v4(), alert_id, 7))
        .await;

    assert_matches!(result, Err(ClaimError::InsufficientQuantity { available: 5 }));

    // Rejection leaves no side effects.
    let claim = app
        .state
        .services
        .claims
        .claim_for_item(item_id)
        .await
        .expect("lookup should succeed");
    assert!(claim.is_none());
}

#[tokio::test]
async fn claims_are_listed_under_their_alert() {
    let app = TestApp::new().await;
    let alert_id = app.seed_alert().await;
    let other_alert = app.seed_alert().await;
    let item_a = app.seed_item(alert_id, "Radios", 4).await;
    let item_b = app.seed_item(alert_id, "Batteries", 20).await;
    let foreign_item = app.seed_item(other_alert, "Radios", 4).await;

    let claims = &app.state.services.claims;
    claims
        .claim_item(command(item_a, Uuid::new_v4(), alert_id, 2))
        .await
        .expect("claim a should succeed");
    claims
        .claim_item(command(item_b, Uuid::new_v4(), alert_id, 20))
        .await
        .expect("claim b should succeed");
    claims
        .claim_item(command(foreign_item, Uuid::new_v4(), other_alert, 1))
        .await
        .expect("foreign claim should succeed");

    let listed = claims
        .list_claims_for_alert(alert_id)
        .await
        .expect("listing should succeed");

    assert_eq!(listed.len(), 2);
    assert!(listed
        .iter()
        .all(|c| c.preparation_item_id == item_a || c.preparation_item_id == item_b));
}

#[tokio::test]
async fn supply_list_reflects_claim_state() {
    let app = TestApp::new().await;
    let alert_id = app.seed_alert().await;
    let claimed_item = app.seed_item(alert_id, "Tents", 3).await;
    let open_item = app.seed_item(alert_id, "Rope", 50).await;
    let user_id = Uuid::new_v4();

    app.state
        .services
        .claims
        .claim_item(command(claimed_item, user_id, alert_id, 2))
        .await
        .expect("claim should succeed");

    let statuses = app
        .state
        .services
        .preparation_items
        .list_for_alert(alert_id)
        .await
        .expect("listing should succeed");

    assert_eq!(statuses.len(), 2);

    let claimed = statuses
        .iter()
        .find(|s| s.id == claimed_item)
        .expect("claimed item present");
    assert!(claimed.claimed);
    assert_eq!(claimed.claimed_by, Some(user_id));
    assert_eq!(claimed.claimed_quantity, Some(2));

    let open = statuses.iter().find(|s| s.id == open_item).expect("open item present");
    assert!(!open.claimed);
    assert_eq!(open.claimed_by, None);
    assert_eq!(open.claimed_quantity, None);
}
