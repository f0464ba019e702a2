use chrono::Utc;
use contracts::domain::a001_student::aggregate::{Student, StudentDto, StudentId};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "a001_student")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub student_id: i32,
    pub username: String,
    pub email: String,
    pub firstname: Option<String>,
    pub lastname: String,
    pub active: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Student {
    fn from(m: Model) -> Self {
        Student {
            id: StudentId(m.student_id),
            username: m.username,
            email: m.email,
            firstname: m.firstname,
            lastname: m.lastname,
            active: m.active,
            created_at: m.created_at,
        }
    }
}

pub async fn list_all<C: ConnectionTrait>(conn: &C) -> anyhow::Result<Vec<Student>> {
    let items = Entity::find()
        .order_by_asc(Column::Lastname)
        .order_by_asc(Column::Username)
        .all(conn)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id<C: ConnectionTrait>(conn: &C, id: StudentId) -> anyhow::Result<Option<Student>> {
    let result = Entity::find_by_id(id.value()).one(conn).await?;
    Ok(result.map(Into::into))
}

/// Insert a new active student; empty firstname is stored as NULL
pub async fn insert<C: ConnectionTrait>(conn: &C, dto: &StudentDto) -> Result<StudentId, DbErr> {
    let firstname = dto
        .firstname
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let active = ActiveModel {
        student_id: sea_orm::ActiveValue::NotSet,
        username: Set(dto.username.trim().to_string()),
        email: Set(dto.email.trim().to_string()),
        firstname: Set(firstname),
        lastname: Set(dto.lastname.trim().to_string()),
        active: Set(true),
        created_at: Set(Some(Utc::now())),
    };
    let model = active.insert(conn).await?;
    Ok(StudentId(model.student_id))
}

pub async fn set_active<C: ConnectionTrait>(conn: &C, id: StudentId, active: bool) -> anyhow::Result<bool> {
    use sea_orm::sea_query::Expr;
    let result = Entity::update_many()
        .col_expr(Column::Active, Expr::value(active))
        .filter(Column::StudentId.eq(id.value()))
        .exec(conn)
        .await?;
    Ok(result.rows_affected > 0)
}

pub async fn username_exists<C: ConnectionTrait>(conn: &C, username: &str) -> Result<bool, DbErr> {
    let count = Entity::find()
        .filter(Column::Username.eq(username))
        .count(conn)
        .await?;
    Ok(count > 0)
}

pub async fn email_exists<C: ConnectionTrait>(conn: &C, email: &str) -> Result<bool, DbErr> {
    let count = Entity::find()
        .filter(Column::Email.eq(email))
        .count(conn)
        .await?;
    Ok(count > 0)
}
