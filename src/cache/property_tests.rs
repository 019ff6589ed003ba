//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check cache semantics over arbitrary operation sequences.

use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::CacheStore;

// == Test Configuration ==
const TEST_DEFAULT_TTL: Duration = Duration::from_secs(300);

// == Strategies ==
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,8}\\|lang=[a-z]{2}".prop_map(|s| s)
}

fn payload_strategy() -> impl Strategy<Value = Value> {
    ("[a-zA-Z0-9 ]{0,64}", 0u64..1000)
        .prop_map(|(title, total)| json!({ "title": title, "totalResults": total }))
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: Value },
    Get { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), payload_strategy()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Hits and misses reflect exactly the reads that found or missed a value,
    // and every read returns the last value written for its key.
    #[test]
    fn prop_reads_follow_last_write(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let mut store = CacheStore::new(TEST_DEFAULT_TTL);
        let mut model: HashMap<String, Value> = HashMap::new();
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    store.set(key.clone(), Arc::new(value.clone()), None);
                    model.insert(key, value);
                }
                CacheOp::Get { key } => match (store.get(&key), model.get(&key)) {
                    (Some(found), Some(expected)) => {
                        prop_assert_eq!(&*found, expected);
                        expected_hits += 1;
                    }
                    (None, None) => expected_misses += 1,
                    (found, expected) => {
                        prop_assert!(false, "cache {:?} disagrees with model {:?}", found, expected);
                    }
                },
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits);
        prop_assert_eq!(stats.misses, expected_misses);
        prop_assert_eq!(stats.total_entries, model.len());
    }

    // Concurrent readers always observe a complete payload that some writer stored.
    #[test]
    fn prop_concurrent_reads_see_whole_payloads(
        ops in prop::collection::vec(cache_op_strategy(), 10..50)
    ) {
        use tokio::sync::RwLock;

        let written: Vec<Value> = ops
            .iter()
            .filter_map(|op| match op {
                CacheOp::Set { value, .. } => Some(value.clone()),
                CacheOp::Get { .. } => None,
            })
            .collect();

        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let store = Arc::new(RwLock::new(CacheStore::new(TEST_DEFAULT_TTL)));
            let mut handles = vec![];

            for op in ops {
                let store = Arc::clone(&store);
                handles.push(tokio::spawn(async move {
                    match op {
                        CacheOp::Set { key, value } => {
                            store.write().await.set(key, Arc::new(value), None);
                            None
                        }
                        CacheOp::Get { key } => store.write().await.get(&key),
                    }
                }));
            }

            for handle in handles {
                if let Some(value) = handle.await.expect("Task should not panic") {
                    prop_assert!(written.contains(&*value), "read a payload nobody wrote: {}", value);
                }
            }

            let hit_rate = store.read().await.stats().hit_rate();
            prop_assert!((0.0..=1.0).contains(&hit_rate));
            Ok(())
        })?;
    }
}

// == Error Response Format ==
proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // Every error variant renders as a JSON body with a string "error" field.
    #[test]
    fn prop_error_response_format(msg in "[a-zA-Z0-9 _-]{1,100}", secs in 1u64..10_000) {
        use crate::error::GatewayError;
        use axum::body::to_bytes;
        use axum::response::IntoResponse;

        let variants = vec![
            GatewayError::QuotaExceeded { seconds_remaining: secs },
            GatewayError::UpstreamFailure(msg.clone()),
            GatewayError::Configuration(msg.clone()),
            GatewayError::InvalidRequest(msg.clone()),
        ];

        let rt = tokio::runtime::Runtime::new().unwrap();
        for error in variants {
            let response = error.into_response();

            let content_type = response
                .headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok());
            prop_assert!(content_type.map(|ct| ct.contains("application/json")).unwrap_or(false));

            let bytes = rt.block_on(async { to_bytes(response.into_body(), usize::MAX).await.unwrap() });
            let json: Value = serde_json::from_slice(&bytes).expect("body should be JSON");
            prop_assert!(json["error"].is_string());
        }
    }
}
