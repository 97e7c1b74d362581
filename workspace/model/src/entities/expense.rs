use chrono::NaiveDate;
use sea_orm::entity::prelude::*;

use super::user;

/// A single spending record.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Calendar date of the expense. No time-of-day is stored.
    pub date: NaiveDate,
    /// Amount in whole rupiah. Never negative; the API layer rejects
    /// negative values before they reach storage.
    pub amount: i64,
    pub description: String,
    /// The user owning this record.
    pub user_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "user::Entity",
        from = "Column::UserId",
        to = "user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
