#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use crate::auth::jwt::decode_segments;
    use crate::helpers::time::epoch_seconds;
    use crate::tests::common::{harness, T0};

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_callers_get_valid_tokens() {
        let h = harness();

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let manager = h.manager.clone();
                tokio::spawn(async move { manager.current_token().await })
            })
            .collect();

        let mut tokens = HashSet::new();
        for handle in handles {
            let token = handle.await.unwrap().unwrap();
            let decoded = decode_segments(&token).unwrap();
            assert!(h.verifies(&decoded));
            tokens.insert(token);
        }

        // the lock covers check and store, so only the first caller signs
        assert_eq!(h.sign_calls(), 1);
        assert_eq!(tokens.len(), 1);

        let cached = h.manager.current_token().await.unwrap();
        assert!(tokens.contains(&cached));
        assert_eq!(epoch_seconds(&h.manager.cached_issued_at().await.unwrap()), T0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_refresh_leaves_one_consistent_entry() {
        let h = harness();
        let _ = h.manager.current_token().await.unwrap();
        h.clock.set(T0 + 3600);

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let manager = h.manager.clone();
                tokio::spawn(async move { manager.current_token().await })
            })
            .collect();

        for handle in handles {
            let token = handle.await.unwrap().unwrap();
            let claims = decode_segments(&token).unwrap().claims;
            assert_eq!(claims["iat"], serde_json::json!((T0 + 3600).to_string()));
        }

        let cached = h.manager.current_token().await.unwrap();
        assert!(h.verifies(&decode_segments(&cached).unwrap()));
        assert_eq!(h.sign_calls(), 2);
    }
}
