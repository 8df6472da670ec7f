use sea_orm::{DatabaseConnection, DbErr, EntityTrait, PaginatorTrait};
use tracing::{info, warn};
use util::config;

use crate::models::user::{self, Model as UserModel, NewUser, Role};

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Creates the initial administrator when the users table is empty.
///
/// Returns the created account, or `None` when staff already exist.
pub async fn ensure_default_admin(db: &DatabaseConnection) -> Result<Option<UserModel>, DbErr> {
    if user::Entity::find().count(db).await? > 0 {
        return Ok(None);
    }

    let admin = UserModel::create(
        db,
        NewUser {
            username: DEFAULT_ADMIN_USERNAME.into(),
            email: "admin@service-center.local".into(),
            password: config::default_admin_password(),
            full_name: "Administrator".into(),
            phone: None,
            role: Role::Admin,
            specialization: None,
        },
    )
    .await?;

    info!(user_id = admin.id, "Created default administrator account");
    warn!("Default administrator password is in use; change it after first login");
    Ok(Some(admin))
}
