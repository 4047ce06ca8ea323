//! `evaluations` table: one row per finalized match

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "evaluations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub match_id: String,
    pub match_kind: String,
    pub match_name: String,
    pub match_date: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
    pub deadline: DateTimeWithTimeZone,
    #[sea_orm(column_type = "JsonBinary")]
    pub assignments: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub completed: Json,
    pub participation_rate: f64,
    pub update_triggered: bool,
    pub status: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub team_a: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub team_b: Json,
    pub ratings_updated_at: Option<DateTimeWithTimeZone>,
    pub expired_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
