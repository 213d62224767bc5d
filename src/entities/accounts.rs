use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    /// UUID assigned on creation; never reused across delete + recreate.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub user_name: String,

    #[sea_orm(unique)]
    pub email: String,

    /// Upper-cased email, used for lookups.
    #[sea_orm(unique)]
    pub normalized_email: String,

    pub display_name: String,

    pub first_name: String,

    pub last_name: String,

    pub profile_url: Option<String>,

    pub email_confirmed: bool,

    /// Argon2id password hash
    pub password_hash: String,

    pub security_stamp: String,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::account_roles::Entity")]
    AccountRoles,
}

impl Related<super::account_roles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountRoles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
