use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "player")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_type = "String(StringLen::N(12))")]
    pub name: String,
    #[sea_orm(column_type = "String(StringLen::N(30))")]
    pub title: String,
    #[sea_orm(column_type = "String(StringLen::N(16))")]
    pub race: String,
    #[sea_orm(column_type = "String(StringLen::N(16))")]
    pub profession: String,
    /// Epoch milliseconds.
    pub birthday: i64,
    pub banned: bool,
    pub experience: i32,
    pub level: i32,
    pub until_next_level: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
