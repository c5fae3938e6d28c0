//! `SeaORM` Entity for student table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::UserSex;

#[derive(Copy, Clone, Default, Debug, DeriveEntity)]
pub struct Entity;

impl EntityName for Entity {
    fn table_name(&self) -> &str {
        "student"
    }
}

#[derive(Clone, Debug, PartialEq, DeriveModel, DeriveActiveModel, Eq, Serialize, Deserialize)]
pub struct Model {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub surname: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: String,
    pub img: Option<String>,
    pub blood_type: String,
    pub sex: UserSex,
    pub birthday: DateTime,
    pub parent_id: Uuid,
    pub class_id: i32,
    pub grade_id: i32,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveColumn)]
pub enum Column {
    Id,
    Username,
    Name,
    Surname,
    Email,
    Phone,
    Address,
    Img,
    BloodType,
    Sex,
    Birthday,
    ParentId,
    ClassId,
    GradeId,
    CreatedAt,
}

#[derive(Copy, Clone, Debug, EnumIter, DerivePrimaryKey)]
pub enum PrimaryKey {
    Id,
}

impl PrimaryKeyTrait for PrimaryKey {
    type ValueType = Uuid;
    fn auto_increment() -> bool {
        false
    }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Parent,
    Class,
    Grade,
}

impl ColumnTrait for Column {
    type EntityName = Entity;
    fn def(&self) -> ColumnDef {
        match self {
            Self::Id => ColumnType::Uuid.def(),
            Self::Username => ColumnType::String(StringLen::None).def().unique(),
            Self::Name => ColumnType::String(StringLen::None).def(),
            Self::Surname => ColumnType::String(StringLen::None).def(),
            Self::Email => ColumnType::String(StringLen::None).def().null().unique(),
            Self::Phone => ColumnType::String(StringLen::None).def().null().unique(),
            Self::Address => ColumnType::String(StringLen::None).def(),
            Self::Img => ColumnType::String(StringLen::None).def().null(),
            Self::BloodType => ColumnType::String(StringLen::None).def(),
            Self::Sex => UserSex::db_type(),
            Self::Birthday => ColumnType::DateTime.def(),
            Self::ParentId => ColumnType::Uuid.def(),
            Self::ClassId => ColumnType::Integer.def(),
            Self::GradeId => ColumnType::Integer.def(),
            Self::CreatedAt => ColumnType::DateTime.def(),
        }
    }
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::Parent => Entity::belongs_to(super::parent::Entity)
                .from(Column::ParentId)
                .to(super::parent::Column::Id)
                .into(),
            Self::Class => Entity::belongs_to(super::class::Entity)
                .from(Column::ClassId)
                .to(super::class::Column::Id)
                .into(),
            Self::Grade => Entity::belongs_to(super::grade::Entity)
                .from(Column::GradeId)
                .to(super::grade::Column::Id)
                .into(),
        }
    }
}

impl Related<super::parent::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Parent.def()
    }
}

impl Related<super::class::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl Related<super::grade::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grade.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
