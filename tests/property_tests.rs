//! Property-based tests for claim request validation.

use proptest::prelude::*;
use uuid::Uuid;
use whistl_api::errors::ClaimError;
use whistl_api::handlers::claims::ClaimItemRequest;

fn id_field() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        "[a-z0-9-]{1,40}".prop_map(Some),
        Just(Some(Uuid::new_v4().to_string())),
    ]
}

proptest! {
    /// A command is only ever produced when all three identifiers parse and
    /// the quantity (when given) is positive; the resulting quantity is
    /// always positive.
    #[test]
    fn validation_gates_every_field(
        item in id_field(),
        user in id_field(),
        alert in id_field(),
        quantity in proptest::option::of(-5i32..10),
    ) {
        let all_ids_valid = [&item, &user, &alert]
            .iter()
            .all(|f| f.as_deref().map(|s| Uuid::parse_str(s).is_ok()).unwrap_or(false));
        let quantity_valid = quantity.map(|q| q > 0).unwrap_or(true);

        let request = ClaimItemRequest {
            item_id: item,
            user_id: user,
            alert_id: alert,
            claimed_quantity: quantity,
        };

        match request.into_command() {
            Ok(command) => {
                prop_assert!(all_ids_valid && quantity_valid);
                prop_assert!(command.quantity > 0);
                prop_assert_eq!(command.quantity, quantity.unwrap_or(1));
            }
            Err(ClaimError::InvalidRequest) => {
                prop_assert!(!(all_ids_valid && quantity_valid));
            }
            Err(other) => {
                prop_assert!(false, "unexpected error: {:?}", other);
            }
        }
    }
}
