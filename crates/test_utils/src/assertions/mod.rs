// Path: crates/test_utils/src/assertions/mod.rs

//! Assertion utilities for testing

/// Assert that a result is OK and unwrap it
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(val) => val,
            Err(err) => panic!("Expected Ok, got Err: {:?}", err),
        }
    };
}

/// Assert that a result failed with the given `LeaseError` variant and return the error
#[macro_export]
macro_rules! assert_lease_err {
    ($expr:expr, $variant:ident) => {
        match $expr {
            Err(err @ lease_types::error::LeaseError::$variant { .. }) => err,
            Err(other) => panic!(
                "Expected LeaseError::{}, got {:?}",
                stringify!($variant),
                other
            ),
            Ok(_) => panic!("Expected LeaseError::{}, got Ok", stringify!($variant)),
        }
    };
}

/// Assert that a sequence of statuses only moves forward through
/// `Future, Ready, Broadcast, InBlock` and contains at most one terminal status,
/// in last position
#[macro_export]
macro_rules! assert_status_order {
    ($statuses:expr) => {{
        let statuses: Vec<lease_types::app::TransactionStatus> =
            $statuses.into_iter().collect();
        let mut last_rank = 0u8;
        for (i, status) in statuses.iter().enumerate() {
            assert!(
                status.rank() >= last_rank,
                "status {} at position {} went backwards in {:?}",
                status,
                i,
                statuses
            );
            if status.is_terminal() {
                assert_eq!(i + 1, statuses.len(), "statuses after terminal in {:?}", statuses);
            }
            last_rank = status.rank();
        }
    }};
}
