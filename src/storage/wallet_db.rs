use crate::error::{Result, WalletError};
use crate::storage::StagingStore;
use crate::wallet::Wallets;
use log::info;
use sled::Db;
use std::path::{Path, PathBuf};

/// Handle on one wallet database directory.
///
/// Owns the sled instance and the stores built on its trees. Clone the
/// stores freely; they share the same database.
pub struct WalletDb {
    db: Db,
    path: PathBuf,
    staging: StagingStore,
    wallets: Wallets,
}

impl WalletDb {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<WalletDb> {
        let path = path.as_ref().to_path_buf();
        let db = sled::open(&path)
            .map_err(|e| WalletError::Database(format!("Failed to open database: {e}")))?;
        let staging = StagingStore::open(&db)?;
        let wallets = Wallets::open(&db)?;
        info!("Opened wallet database at {}", path.display());
        Ok(WalletDb {
            db,
            path,
            staging,
            wallets,
        })
    }

    pub fn staging_store(&self) -> &StagingStore {
        &self.staging
    }

    pub fn wallets(&self) -> &Wallets {
        &self.wallets
    }

    pub fn get_path(&self) -> &Path {
        &self.path
    }

    /// Flush everything to disk and release the database
    pub fn close(self) -> Result<()> {
        self.db.flush()?;
        info!("Closed wallet database at {}", self.path.display());
        Ok(())
    }
}
