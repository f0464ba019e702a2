use async_trait::async_trait;
use contracts::domain::a001_student::aggregate::StudentDto;
use contracts::domain::a002_employee::aggregate::EmployeeDto;
use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};

use crate::domain::{a001_student, a002_employee};

/// Writes a validated batch, all or nothing
#[async_trait]
pub trait PersistenceGateway<R: Send + Sync>: Send + Sync {
    /// Returns the number of inserted records
    async fn insert_all(&self, records: &[R]) -> Result<u64, DbErr>;
}

/// Record type that can be inserted inside a transaction
#[async_trait]
pub trait PersistRecord: Send + Sync {
    async fn insert(&self, txn: &DatabaseTransaction) -> Result<(), DbErr>;
}

#[async_trait]
impl PersistRecord for StudentDto {
    async fn insert(&self, txn: &DatabaseTransaction) -> Result<(), DbErr> {
        a001_student::repository::insert(txn, self).await.map(|_| ())
    }
}

#[async_trait]
impl PersistRecord for EmployeeDto {
    async fn insert(&self, txn: &DatabaseTransaction) -> Result<(), DbErr> {
        a002_employee::repository::insert(txn, self).await.map(|_| ())
    }
}

/// Store backed by the application database
pub struct SeaOrmStore<'a> {
    pub(crate) conn: &'a DatabaseConnection,
}

impl<'a> SeaOrmStore<'a> {
    pub fn new(conn: &'a DatabaseConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<'a, R: PersistRecord> PersistenceGateway<R> for SeaOrmStore<'a> {
    async fn insert_all(&self, records: &[R]) -> Result<u64, DbErr> {
        let txn = self.conn.begin().await?;

        for (index, record) in records.iter().enumerate() {
            if let Err(e) = record.insert(&txn).await {
                tracing::warn!("Insert of staged record {} failed, rolling back", index + 1);
                txn.rollback().await?;
                return Err(e);
            }
        }

        txn.commit().await?;
        Ok(records.len() as u64)
    }
}
