use crate::core::transaction::StagedTransaction;
use crate::error::{Result, WalletError};
use crate::utils::{current_timestamp, deserialize, serialize};
use log::debug;
use sled::{Db, IVec, Tree};
use std::sync::{Arc, Mutex};

pub const STAGED_TRANSACTIONS_TREE: &str = "staged_transactions";

/// Durable name -> staged transaction mapping
///
/// Reads hand out decoded copies. Every write runs under one mutex and
/// commits with a compare-and-swap against the bytes that were read, so a
/// failed mutation never reaches the tree.
#[derive(Clone)]
pub struct StagingStore {
    tree: Tree,
    write_lock: Arc<Mutex<()>>,
}

impl StagingStore {
    pub fn open(db: &Db) -> Result<StagingStore> {
        let tree = db.open_tree(STAGED_TRANSACTIONS_TREE).map_err(|e| {
            WalletError::Database(format!("Failed to open staged transactions tree: {e}"))
        })?;
        Ok(StagingStore {
            tree,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| WalletError::Database("Staging store lock poisoned".to_string()))
    }

    pub fn create(&self, name: &str) -> Result<StagedTransaction> {
        if name.trim().is_empty() {
            return Err(WalletError::InvalidName(name.to_string()));
        }

        let tx = StagedTransaction::new(name, current_timestamp()?);
        let bytes = serialize(&tx)?;

        let _guard = self.lock()?;
        // Swapping against None means an existing name is never overwritten
        self.tree
            .compare_and_swap(name, None as Option<&[u8]>, Some(bytes))?
            .map_err(|_| WalletError::DuplicateName(name.to_string()))?;
        self.tree.flush()?;
        debug!("Created staged transaction {name}");
        Ok(tx)
    }

    pub fn get(&self, name: &str) -> Result<StagedTransaction> {
        let bytes = self
            .tree
            .get(name)?
            .ok_or_else(|| WalletError::NotFound(name.to_string()))?;
        deserialize(bytes.as_ref())
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        let _guard = self.lock()?;
        if self.tree.remove(name)?.is_none() {
            return Err(WalletError::NotFound(name.to_string()));
        }
        self.tree.flush()?;
        debug!("Deleted staged transaction {name}");
        Ok(())
    }

    /// Names in byte order
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = vec![];
        for item in self.tree.iter().keys() {
            let key = item?;
            names.push(String::from_utf8_lossy(key.as_ref()).to_string());
        }
        Ok(names)
    }

    /// Atomic read-modify-write of one entry.
    ///
    /// `f` runs on a decoded copy; its error aborts the update with nothing
    /// written. On success the new state is written in one swap and returned
    /// together with whatever `f` produced.
    pub fn update<T, F>(&self, name: &str, mut f: F) -> Result<(StagedTransaction, T)>
    where
        F: FnMut(&mut StagedTransaction) -> Result<T>,
    {
        // The mutex serializes writers in this process; the CAS catches
        // anyone else holding the same tree
        let _guard = self.lock()?;
        loop {
            let current: IVec = self
                .tree
                .get(name)?
                .ok_or_else(|| WalletError::NotFound(name.to_string()))?;

            let mut tx: StagedTransaction = deserialize(current.as_ref())?;
            let value = f(&mut tx)?;
            let bytes = serialize(&tx)?;

            match self.tree.compare_and_swap(name, Some(&current), Some(bytes))? {
                Ok(()) => {
                    self.tree.flush()?;
                    return Ok((tx, value));
                }
                Err(conflict) => {
                    // deleted underneath us
                    if conflict.current.is_none() {
                        return Err(WalletError::NotFound(name.to_string()));
                    }
                    debug!("Concurrent write to {name}, retrying");
                }
            }
        }
    }
}
