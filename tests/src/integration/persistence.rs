//! RocksDB durability: restart idempotence, record format, fatal opens.

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use tempfile::TempDir;
    use txindex::{
        AppliedBlock, IndexConfig, IndexError, MemoryChainIndex, PluginLifecycle,
        RocksDbLocationStore, StoreError, TxIndexPlugin, TxLocationEntry, TxLocationStore,
        RECORD_VERSION,
    };

    use crate::integration::{txid, wait_for};

    fn applied(block_num: u64, txs: &[u64], lib: u64) -> AppliedBlock {
        AppliedBlock {
            block_num,
            tx_ids: txs.iter().map(|&n| txid(n)).collect(),
            last_irreversible: lib,
        }
    }

    fn run_plugin_once(path: &std::path::Path, blocks: u64) {
        let mut plugin = TxIndexPlugin::new(
            IndexConfig::for_testing(path),
            Arc::new(MemoryChainIndex::new()),
        );
        plugin.on_init().unwrap();
        for block in 1..=blocks {
            plugin.on_block_applied(&applied(block, &[block], 0)).unwrap();
        }
        plugin
            .on_block_applied(&applied(blocks + 1, &[], blocks + 1))
            .unwrap();
        wait_for(|| {
            (1..=blocks).all(|n| plugin.lookup(&txid(n)).unwrap().is_some())
        });
        plugin.on_shutdown().unwrap();
    }

    #[test]
    fn test_restart_yields_same_key_set() {
        let temp_dir = TempDir::new().unwrap();
        run_plugin_once(temp_dir.path(), 8);

        // Reopen the store cold and iterate everything.
        let store = RocksDbLocationStore::open(temp_dir.path(), false).unwrap();
        let keys: BTreeSet<Vec<u8>> = store
            .iter_all()
            .unwrap()
            .map(|item| item.unwrap().0)
            .collect();

        let expected: BTreeSet<Vec<u8>> = (1..=8u64).map(|n| txid(n).to_vec()).collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_reopened_records_decode() {
        let temp_dir = TempDir::new().unwrap();
        run_plugin_once(temp_dir.path(), 3);

        let store = RocksDbLocationStore::open(temp_dir.path(), false).unwrap();
        let value = store.get(&txid(2)).unwrap().unwrap();

        // Version tag leads the on-disk value.
        assert_eq!(value[0], RECORD_VERSION);
        let entry = TxLocationEntry::decode(&value).unwrap();
        assert_eq!(entry.txid, txid(2));
        assert_eq!(entry.block_num, 2);
        assert_eq!(entry.position_in_block, 0);
    }

    #[test]
    fn test_second_run_continues_over_existing_store() {
        let temp_dir = TempDir::new().unwrap();
        run_plugin_once(temp_dir.path(), 4);

        // A fresh plugin over the same path must see the old records and
        // keep accepting new ones.
        let mut plugin = TxIndexPlugin::new(
            IndexConfig::for_testing(temp_dir.path()),
            Arc::new(MemoryChainIndex::new()),
        );
        plugin.on_init().unwrap();
        assert!(plugin.lookup(&txid(3)).unwrap().is_some());

        plugin.on_block_applied(&applied(9, &[900], 0)).unwrap();
        plugin.on_block_applied(&applied(10, &[], 10)).unwrap();
        wait_for(|| plugin.lookup(&txid(900)).unwrap().is_some());
        plugin.on_shutdown().unwrap();
    }

    #[test]
    fn test_unusable_path_is_fatal_at_init() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, b"not a database directory").unwrap();

        let mut plugin = TxIndexPlugin::new(
            IndexConfig::for_testing(&blocker),
            Arc::new(MemoryChainIndex::new()),
        );
        match plugin.on_init() {
            Err(IndexError::Store(StoreError::Open { .. })) => {}
            other => panic!("expected fatal open error, got {:?}", other),
        }
    }
}
