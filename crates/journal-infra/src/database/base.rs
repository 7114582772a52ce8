use std::marker::PhantomData;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel,
    PrimaryKeyTrait, SqlErr,
};

use journal_core::error::RepoError;
use journal_core::ports::BaseRepository;

/// Generic SeaORM repository bound to one connection or transaction.
///
/// `C` is usually the `DatabaseTransaction` held by a
/// [`UnitOfWork`](super::UnitOfWork), so every read and write of a request
/// shares the same transaction.
pub struct SeaRepository<'c, E, C>
where
    E: EntityTrait,
{
    pub(crate) db: &'c C,
    _entity: PhantomData<E>,
}

impl<'c, E, C> SeaRepository<'c, E, C>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    pub fn new(db: &'c C) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }
}

/// Classify a SeaORM error for the domain layer.
pub(crate) fn map_db_err(err: DbErr) -> RepoError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => return RepoError::Constraint(msg),
        Some(SqlErr::ForeignKeyConstraintViolation(msg)) => return RepoError::ForeignKey(msg),
        _ => {}
    }

    match err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => RepoError::Connection(err.to_string()),
        DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => RepoError::NotFound,
        other => RepoError::Query(other.to_string()),
    }
}

#[async_trait]
impl<'c, E, C, T, N, ID> BaseRepository<T, N, ID> for SeaRepository<'c, E, C>
where
    E: EntityTrait,
    C: ConnectionTrait + Send + Sync,
    E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + Sync,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = ID>,
    ID: Send + Sync + Into<sea_orm::Value> + Clone + Copy + 'static,
    T: From<E::Model> + Into<E::ActiveModel> + Send + Sync + 'static,
    N: Into<E::ActiveModel> + Send + 'static,
{
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError> {
        let result = E::find_by_id(id).one(self.db).await.map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn insert(&self, new: N) -> Result<T, RepoError> {
        let active_model: E::ActiveModel = new.into();
        let model = active_model.insert(self.db).await.map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn update(&self, entity: T) -> Result<T, RepoError> {
        let active_model: E::ActiveModel = entity.into();
        let model = active_model.update(self.db).await.map_err(map_db_err)?;

        Ok(model.into())
    }
}
