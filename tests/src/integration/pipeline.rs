//! End-to-end pipeline properties: scan → queue → writer → store.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use txindex::{
        AppliedBlock, BoundedQueue, IndexConfig, MemoryChainIndex, MemoryLocationStore,
        PluginLifecycle, TxId, TxIndexPlugin, TxLocationEntry, WriterHandle, WriterState,
    };

    use crate::integration::{init_tracing, txid, wait_for};

    fn applied(block_num: u64, txs: &[u64], lib: u64) -> AppliedBlock {
        AppliedBlock {
            block_num,
            tx_ids: txs.iter().map(|&n| txid(n)).collect(),
            last_irreversible: lib,
        }
    }

    /// Scenario: capacity 10, batch size 1, entries for blocks 1..5, then
    /// irreversibility advances to 6. The store must end with exactly five
    /// records and the cursor at 6.
    #[test]
    fn test_five_blocks_become_five_records() {
        init_tracing();
        let store = Arc::new(MemoryLocationStore::new());
        let mut config = IndexConfig::for_testing("/unused");
        config.queue_capacity = 10;
        config.batch_size = 1;

        let mut plugin =
            TxIndexPlugin::with_store(config, Arc::new(MemoryChainIndex::new()), store.clone());
        plugin.on_init().unwrap();

        for block in 1..=5 {
            plugin.on_block_applied(&applied(block, &[block * 100], 0)).unwrap();
        }
        plugin.on_block_applied(&applied(6, &[], 6)).unwrap();

        wait_for(|| store.record_count() == 5);
        assert_eq!(plugin.cursor(), 6);

        plugin.on_shutdown().unwrap();
        assert_eq!(store.record_count(), 5);
        for block in 1..=5u64 {
            let location = plugin.lookup(&txid(block * 100)).unwrap().unwrap();
            assert_eq!(location.block_num, block);
        }
    }

    /// Every enqueued entry is committed exactly once: the final store key
    /// set equals the known input set, with no duplicates possible in a map
    /// and none omitted.
    #[test]
    fn test_no_loss_exactly_once() {
        let store = Arc::new(MemoryLocationStore::new());
        let mut config = IndexConfig::for_testing("/unused");
        config.batch_size = 7; // batches cut mid-block on purpose

        let mut plugin =
            TxIndexPlugin::with_store(config, Arc::new(MemoryChainIndex::new()), store.clone());
        plugin.on_init().unwrap();

        // Hash-like random ids, seeded for reproducibility.
        let mut rng = StdRng::seed_from_u64(7);
        let mut expected_keys = Vec::new();
        for block in 1..=20 {
            let tx_ids: Vec<TxId> = (0..10)
                .map(|_| {
                    let mut id = [0u8; 32];
                    rng.fill(&mut id);
                    id
                })
                .collect();
            for id in &tx_ids {
                expected_keys.push(id.to_vec());
            }
            plugin
                .on_block_applied(&AppliedBlock {
                    block_num: block,
                    tx_ids,
                    last_irreversible: 0,
                })
                .unwrap();
        }
        plugin.on_block_applied(&applied(21, &[], 21)).unwrap();

        wait_for(|| store.record_count() == 200);
        plugin.on_shutdown().unwrap();

        let records = store.records();
        assert_eq!(records.len(), expected_keys.len());
        for key in &expected_keys {
            assert!(records.contains_key(key), "missing record for enqueued entry");
        }
    }

    /// Entries reach the store in scan order: ascending block number, then
    /// position in block, across batch boundaries.
    #[test]
    fn test_store_commit_order_matches_scan_order() {
        let store = Arc::new(MemoryLocationStore::new());
        let mut config = IndexConfig::for_testing("/unused");
        config.batch_size = 3;

        let mut plugin =
            TxIndexPlugin::with_store(config, Arc::new(MemoryChainIndex::new()), store.clone());
        plugin.on_init().unwrap();

        let mut expected_order = Vec::new();
        let mut next_tx = 0u64;
        for block in 1..=4 {
            let txs: Vec<u64> = (0..4).map(|_| {
                next_tx += 1;
                next_tx
            }).collect();
            for &n in &txs {
                expected_order.push(txid(n).to_vec());
            }
            plugin.on_block_applied(&applied(block, &txs, 0)).unwrap();
        }
        plugin.on_block_applied(&applied(5, &[], 5)).unwrap();

        wait_for(|| store.record_count() == 16);
        plugin.on_shutdown().unwrap();

        let committed: Vec<Vec<u8>> = store
            .committed_batches()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(committed, expected_order);
    }

    /// Atomic-batch property: when the store dies after batch K, the store
    /// holds exactly the entries of batches 1..K and nothing from K+1.
    #[test]
    fn test_failure_cuts_cleanly_at_batch_boundary() {
        let store = Arc::new(MemoryLocationStore::new());
        store.fail_after_batches(2);

        let mut config = IndexConfig::for_testing("/unused");
        config.batch_size = 5;

        let queue = Arc::new(BoundedQueue::with_capacity(64));
        let writer = WriterHandle::spawn(store.clone(), Arc::clone(&queue), &config);

        for n in 1..=15u64 {
            queue
                .send(TxLocationEntry::new(txid(n), n, 0))
                .unwrap();
        }

        wait_for(|| writer.state() == WriterState::Stopped);
        assert!(writer.fatal_error().is_some());

        // Two full batches durable, the third entirely absent.
        assert_eq!(store.committed_batches().len(), 2);
        let records = store.records();
        assert_eq!(records.len(), 10);
        for n in 1..=10u64 {
            assert!(records.contains_key(&txid(n).to_vec()));
        }
        for n in 11..=15u64 {
            assert!(!records.contains_key(&txid(n).to_vec()));
        }
    }

    /// Irreversibility advancing past blocks with no transactions still
    /// moves the cursor without queueing anything.
    #[test]
    fn test_empty_blocks_advance_cursor_only() {
        let store = Arc::new(MemoryLocationStore::new());
        let mut plugin = TxIndexPlugin::with_store(
            IndexConfig::for_testing("/unused"),
            Arc::new(MemoryChainIndex::new()),
            store.clone(),
        );
        plugin.on_init().unwrap();

        for block in 1..=3 {
            plugin.on_block_applied(&applied(block, &[], block)).unwrap();
        }

        assert_eq!(plugin.cursor(), 3);
        plugin.on_shutdown().unwrap();
        assert_eq!(store.record_count(), 0);
    }
}
