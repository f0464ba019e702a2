use chrono::Utc;
use contracts::domain::a002_employee::aggregate::EmployeeId;
use contracts::domain::a004_assessment::aggregate::{Assessment, AssessmentDto, AssessmentId};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "a004_assessment")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub assessment_id: i32,
    pub employee_id: i32,
    pub technical: i32,
    pub communication: i32,
    pub teamwork: i32,
    pub comment: Option<String>,
    pub assessed_by: String,
    pub assessed_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Assessment {
    fn from(m: Model) -> Self {
        Assessment {
            id: AssessmentId(m.assessment_id),
            employee_id: EmployeeId(m.employee_id),
            technical: m.technical,
            communication: m.communication,
            teamwork: m.teamwork,
            comment: m.comment,
            assessed_by: m.assessed_by,
            assessed_at: m.assessed_at,
        }
    }
}

/// Newest first
pub async fn list_for_employee<C: ConnectionTrait>(
    conn: &C,
    employee_id: EmployeeId,
) -> anyhow::Result<Vec<Assessment>> {
    let items = Entity::find()
        .filter(Column::EmployeeId.eq(employee_id.value()))
        .order_by_desc(Column::AssessedAt)
        .order_by_desc(Column::AssessmentId)
        .all(conn)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn insert<C: ConnectionTrait>(
    conn: &C,
    employee_id: EmployeeId,
    dto: &AssessmentDto,
    assessed_by: &str,
) -> Result<AssessmentId, DbErr> {
    let comment = dto
        .comment
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let active = ActiveModel {
        assessment_id: sea_orm::ActiveValue::NotSet,
        employee_id: Set(employee_id.value()),
        technical: Set(dto.technical),
        communication: Set(dto.communication),
        teamwork: Set(dto.teamwork),
        comment: Set(comment),
        assessed_by: Set(assessed_by.to_string()),
        assessed_at: Set(Utc::now()),
    };
    let model = active.insert(conn).await?;
    Ok(AssessmentId(model.assessment_id))
}
