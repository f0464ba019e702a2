use contracts::domain::a002_employee::aggregate::{Employee, EmployeeDto, EmployeeId};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a002_employee")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub employee_id: i32,
    pub name: String,
    pub email: String,
    pub date_of_joining: chrono::NaiveDate,
    pub current_role: String,
    pub past_roles: Option<String>,
    pub skills: String,
    pub experience: f64,
    pub educational_background: String,
    pub skill_points: i32,
    pub achievement_badge: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Employee {
    fn from(m: Model) -> Self {
        Employee {
            id: EmployeeId(m.employee_id),
            name: m.name,
            email: m.email,
            date_of_joining: m.date_of_joining,
            current_role: m.current_role,
            past_roles: m.past_roles,
            skills: m.skills,
            experience: m.experience,
            educational_background: m.educational_background,
            skill_points: m.skill_points,
            achievement_badge: m.achievement_badge,
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub async fn list_all<C: ConnectionTrait>(conn: &C) -> anyhow::Result<Vec<Employee>> {
    let items = Entity::find()
        .order_by_asc(Column::Name)
        .all(conn)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id<C: ConnectionTrait>(conn: &C, id: EmployeeId) -> anyhow::Result<Option<Employee>> {
    let result = Entity::find_by_id(id.value()).one(conn).await?;
    Ok(result.map(Into::into))
}

pub async fn insert<C: ConnectionTrait>(conn: &C, dto: &EmployeeDto) -> Result<EmployeeId, DbErr> {
    let active = ActiveModel {
        employee_id: sea_orm::ActiveValue::NotSet,
        name: Set(dto.name.trim().to_string()),
        email: Set(dto.email.trim().to_string()),
        date_of_joining: Set(dto.date_of_joining),
        current_role: Set(dto.current_role.trim().to_string()),
        past_roles: Set(non_blank(&dto.past_roles)),
        skills: Set(dto.skills.trim().to_string()),
        experience: Set(dto.experience),
        educational_background: Set(dto.educational_background.trim().to_string()),
        skill_points: Set(dto.skill_points),
        achievement_badge: Set(non_blank(&dto.achievement_badge)),
    };
    let model = active.insert(conn).await?;
    Ok(EmployeeId(model.employee_id))
}

pub async fn email_exists<C: ConnectionTrait>(conn: &C, email: &str) -> Result<bool, DbErr> {
    let count = Entity::find()
        .filter(Column::Email.eq(email))
        .count(conn)
        .await?;
    Ok(count > 0)
}

/// Atomic `skill_points = skill_points + points`
pub async fn add_skill_points<C: ConnectionTrait>(conn: &C, id: EmployeeId, points: i32) -> Result<bool, DbErr> {
    let result = Entity::update_many()
        .col_expr(Column::SkillPoints, Expr::col(Column::SkillPoints).add(points))
        .filter(Column::EmployeeId.eq(id.value()))
        .exec(conn)
        .await?;
    Ok(result.rows_affected > 0)
}
