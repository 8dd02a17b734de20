mod common;

use common::TestApp;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;
use whistl_api::entities::supply_claim;
use whistl_api::errors::ClaimError;
use whistl_api::services::claims::ClaimItemCommand;

/// Twenty callers race for a single-unit item: exactly one wins. Losers must
/// see a claim-specific rejection, never an over-allocation.
#[tokio::test]
async fn concurrent_claims_have_a_single_winner() {
    let app = TestApp::new().await;
    let alert_id = app.seed_alert().await;
    let item_id = app.seed_item(alert_id, "Satellite phone", 1).await;

    let mut tasks = Vec::new();
    for _ in 0..20 {
        let claims = app.state.services.claims.clone();
        tasks.push(tokio::spawn(async move {
            claims
                .claim_item(ClaimItemCommand {
                    item_id,
                    user_id: Uuid::new_v4(),
                    alert_id,
                    quantity: 1,
                })
                .await
        }));
    }

    let mut winners = 0;
    let mut race_lost = 0;
    let mut already_claimed = 0;
    for task in tasks {
        match task.await.expect("task panicked") {
            Ok(_) => winners += 1,
            Err(ClaimError::RaceLost) => race_lost += 1,
            Err(ClaimError::AlreadyClaimed { .. }) => already_claimed += 1,
            Err(other) => panic!("unexpected rejection: {:?}", other),
        }
    }

    assert_eq!(winners, 1, "exactly one claim must win");
    assert_eq!(race_lost + already_claimed, 19);

    // The table agrees with the outcomes.
    let rows = supply_claim::Entity::find()
        .filter(supply_claim::Column::PreparationItemId.eq(item_id))
        .all(&*app.state.db)
        .await
        .expect("query should succeed");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].quantity, 1);
}

/// Whatever the interleaving, the sum of persisted quantities for an item
/// never exceeds its authorized total.
#[tokio::test]
async fn persisted_quantity_never_exceeds_total() {
    let app = TestApp::new().await;
    let alert_id = app.seed_alert().await;

    // Several items of varying size, each fought over by callers whose
    // combined requests exceed the total.
    let totals = [1, 3, 5, 8];
    let mut item_ids = Vec::new();
    for (i, total) in totals.iter().enumerate() {
        let item_id = app
            .seed_item(alert_id, &format!("Supply crate {}", i), *total)
            .await;
        item_ids.push(item_id);
    }

    let mut tasks = Vec::new();
    for (idx, total) in totals.iter().enumerate() {
        let item_id = item_ids[idx];
        for caller in 0..10 {
            let claims = app.state.services.claims.clone();
            let quantity = 1 + (caller % *total);
            tasks.push(tokio::spawn(async move {
                claims
                    .claim_item(ClaimItemCommand {
                        item_id,
                        user_id: Uuid::new_v4(),
                        alert_id,
                        quantity,
                    })
                    .await
            }));
        }
    }

    for task in tasks {
        match task.await.expect("task panicked") {
            Ok(_)
            | Err(ClaimError::RaceLost)
            | Err(ClaimError::AlreadyClaimed { .. })
            | Err(ClaimError::InsufficientQuantity { .. }) => {}
            Err(other) => panic!("unexpected rejection: {:?}", other),
        }
    }

    for (idx, total) in totals.iter().enumerate() {
        let item_id = item_ids[idx];
        let rows = supply_claim::Entity::find()
            .filter(supply_claim::Column::PreparationItemId.eq(item_id))
            .all(&*app.state.db)
            .await
            .expect("query should succeed");

        let claimed: i32 = rows.iter().map(|r| r.quantity).sum();
        assert!(
            claimed <= *total,
            "item {} over-allocated: {} claimed of {} authorized",
            item_id,
            claimed,
            total
        );
        // Exclusivity: never more than one claim row per item.
        assert!(rows.len() <= 1);
    }
}
