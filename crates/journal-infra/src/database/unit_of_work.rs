use sea_orm::{DatabaseTransaction, DbConn, TransactionTrait};

use journal_core::error::RepoError;

use super::base::{SeaRepository, map_db_err};
use super::repositories::{
    SeaCategoryRepository, SeaCommentRepository, SeaPostRepository, SeaUserRepository,
};

/// One request's transaction.
///
/// Repositories handed out here all run inside the same transaction.
/// Nothing is visible to other requests until [`commit`](Self::commit);
/// dropping the unit of work without committing rolls everything back.
pub struct UnitOfWork {
    txn: DatabaseTransaction,
}

impl UnitOfWork {
    pub async fn begin(db: &DbConn) -> Result<Self, RepoError> {
        let txn = db.begin().await.map_err(map_db_err)?;
        Ok(Self { txn })
    }

    pub fn posts(&self) -> SeaPostRepository<'_, DatabaseTransaction> {
        SeaRepository::new(&self.txn)
    }

    pub fn users(&self) -> SeaUserRepository<'_, DatabaseTransaction> {
        SeaRepository::new(&self.txn)
    }

    pub fn comments(&self) -> SeaCommentRepository<'_, DatabaseTransaction> {
        SeaRepository::new(&self.txn)
    }

    pub fn categories(&self) -> SeaCategoryRepository<'_, DatabaseTransaction> {
        SeaRepository::new(&self.txn)
    }

    pub async fn commit(self) -> Result<(), RepoError> {
        self.txn.commit().await.map_err(map_db_err)
    }

    pub async fn rollback(self) -> Result<(), RepoError> {
        self.txn.rollback().await.map_err(map_db_err)
    }
}
