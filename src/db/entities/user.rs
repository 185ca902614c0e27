use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity(created_at = "date_joined")]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(unique)]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub profile_picture: Option<String>,
    pub user_type: String,
    #[sea_orm(default_value = true)]
    pub is_active: bool,
    #[sea_orm(default_value = false)]
    pub is_staff: bool,
    #[sea_orm(default_value = false)]
    pub is_superuser: bool,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub last_login: Option<DateTimeWithTimeZone>,
    #[sea_orm(has_many)]
    pub addresses: HasMany<super::address::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
