use chrono::Utc;
use contracts::domain::a001_student::aggregate::StudentId;
use contracts::domain::a003_loan::aggregate::{Loan, LoanId};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "a003_loan")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub loan_id: i32,
    pub device_id: i32,
    pub student_id: i32,
    pub borrowed_at: chrono::DateTime<chrono::Utc>,
    pub returned_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Loan {
    fn from(m: Model) -> Self {
        Loan {
            id: LoanId(m.loan_id),
            device_id: m.device_id,
            student_id: StudentId(m.student_id),
            borrowed_at: m.borrowed_at,
            returned_at: m.returned_at,
        }
    }
}

/// Most recent loans first
pub async fn list_all<C: ConnectionTrait>(conn: &C) -> anyhow::Result<Vec<Loan>> {
    let items = Entity::find()
        .order_by_desc(Column::LoanId)
        .all(conn)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn open_loan_for_student<C: ConnectionTrait>(
    conn: &C,
    student_id: StudentId,
) -> anyhow::Result<Option<Loan>> {
    let result = Entity::find()
        .filter(Column::StudentId.eq(student_id.value()))
        .filter(Column::ReturnedAt.is_null())
        .one(conn)
        .await?;
    Ok(result.map(Into::into))
}

pub async fn open_loan_for_device<C: ConnectionTrait>(conn: &C, device_id: i32) -> anyhow::Result<Option<Loan>> {
    let result = Entity::find()
        .filter(Column::DeviceId.eq(device_id))
        .filter(Column::ReturnedAt.is_null())
        .one(conn)
        .await?;
    Ok(result.map(Into::into))
}

pub async fn insert<C: ConnectionTrait>(conn: &C, student_id: StudentId, device_id: i32) -> Result<LoanId, DbErr> {
    let active = ActiveModel {
        loan_id: sea_orm::ActiveValue::NotSet,
        device_id: Set(device_id),
        student_id: Set(student_id.value()),
        borrowed_at: Set(Utc::now()),
        returned_at: Set(None),
    };
    let model = active.insert(conn).await?;
    Ok(LoanId(model.loan_id))
}

/// Stamp the return time on an open loan
pub async fn close<C: ConnectionTrait>(conn: &C, id: LoanId) -> Result<bool, DbErr> {
    use sea_orm::sea_query::Expr;
    let result = Entity::update_many()
        .col_expr(Column::ReturnedAt, Expr::value(Utc::now()))
        .filter(Column::LoanId.eq(id.0))
        .filter(Column::ReturnedAt.is_null())
        .exec(conn)
        .await?;
    Ok(result.rows_affected > 0)
}
