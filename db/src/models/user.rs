use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use sea_orm::entity::prelude::*;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::assignment_entry;

/// Represents a staff member in the `users` table.
///
/// Technicians ("masters") are users whose role is [`Role::Master`]; the
/// workload columns are only meaningful for them.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Primary key ID (auto-incremented).
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique login name.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Salted argon2 hash. Never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: Role,
    /// Inactive users cannot log in.
    pub is_active: bool,
    pub specialization: Option<String>,
    pub max_concurrent_tickets: i32,
    pub is_available: bool,
    /// Denormalized count of non-archived, unfinished tickets assigned to this user.
    pub active_ticket_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Staff roles. Access control is a flat allow-list over these values.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    #[sea_orm(string_value = "admin")]
    Admin,

    #[sea_orm(string_value = "director")]
    Director,

    #[sea_orm(string_value = "manager")]
    Manager,

    #[sea_orm(string_value = "master")]
    Master,
}

impl Role {
    /// Every staff role.
    pub const STAFF: &'static [Role] = &[Role::Admin, Role::Director, Role::Manager, Role::Master];
    /// Roles allowed to manage tickets and clients.
    pub const MANAGEMENT: &'static [Role] = &[Role::Admin, Role::Director, Role::Manager];
    /// Roles allowed to manage staff.
    pub const ADMINS: &'static [Role] = &[Role::Admin, Role::Director];
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::technician_skill::Entity")]
    Skills,
}

impl Related<super::technician_skill::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Skills.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Input for [`Model::create`].
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub specialization: Option<String>,
}

/// Partial update applied by [`Model::update_profile`]. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    pub specialization: Option<String>,
    pub password: Option<String>,
}

/// Filter for [`Model::list`].
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    pub query: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserDeletion {
    Deleted,
    NotFound,
    /// The user has worked tickets; the assignment ledger still points at them.
    HasAssignmentHistory,
}

impl Model {
    pub fn hash_password(password: &str) -> Result<String, DbErr> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DbErr::Custom(format!("password hashing failed: {e}")))
    }

    pub fn verify_password(&self, password: &str) -> bool {
        match PasswordHash::new(&self.password_hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    pub async fn create<C: ConnectionTrait>(db: &C, new: NewUser) -> Result<Model, DbErr> {
        let now = Utc::now();
        let active_model = ActiveModel {
            username: Set(new.username.trim().to_owned()),
            email: Set(new.email.trim().to_owned()),
            password_hash: Set(Self::hash_password(&new.password)?),
            full_name: Set(new.full_name.trim().to_owned()),
            phone: Set(new.phone),
            role: Set(new.role),
            is_active: Set(true),
            specialization: Set(new.specialization),
            max_concurrent_tickets: Set(5),
            is_available: Set(true),
            active_ticket_count: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            last_login: Set(None),
            ..Default::default()
        };

        active_model.insert(db).await
    }

    pub async fn get_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn get_by_username(
        db: &DatabaseConnection,
        username: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::Username.eq(username))
            .one(db)
            .await
    }

    /// Checks a username/password pair. Returns `None` for unknown, inactive
    /// or mismatching accounts; records `last_login` on success.
    pub async fn verify_credentials(
        db: &DatabaseConnection,
        username: &str,
        password: &str,
    ) -> Result<Option<Model>, DbErr> {
        let user = match Self::get_by_username(db, username).await? {
            Some(u) if u.is_active => u,
            _ => return Ok(None),
        };

        if !user.verify_password(password) {
            return Ok(None);
        }

        let mut active: ActiveModel = user.into();
        active.last_login = Set(Some(Utc::now()));
        active.update(db).await.map(Some)
    }

    pub async fn username_taken(db: &DatabaseConnection, username: &str) -> Result<bool, DbErr> {
        Ok(Entity::find()
            .filter(Column::Username.eq(username))
            .count(db)
            .await?
            > 0)
    }

    pub async fn email_taken(
        db: &DatabaseConnection,
        email: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, DbErr> {
        let mut query = Entity::find().filter(Column::Email.eq(email));
        if let Some(id) = exclude_id {
            query = query.filter(Column::Id.ne(id));
        }
        Ok(query.count(db).await? > 0)
    }

    pub async fn list(db: &DatabaseConnection, filter: UserFilter) -> Result<Vec<Model>, DbErr> {
        let mut condition = Condition::all();

        if let Some(role) = filter.role {
            condition = condition.add(Column::Role.eq(role));
        }
        if let Some(active) = filter.is_active {
            condition = condition.add(Column::IsActive.eq(active));
        }
        if let Some(query) = filter.query.filter(|q| !q.trim().is_empty()) {
            let pattern = format!("%{}%", query.trim());
            condition = condition.add(
                Condition::any()
                    .add(Column::Username.like(&pattern))
                    .add(Column::FullName.like(&pattern))
                    .add(Column::Email.like(&pattern)),
            );
        }

        Entity::find()
            .filter(condition)
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(db)
            .await
    }

    pub async fn update_profile(
        db: &DatabaseConnection,
        id: i64,
        changes: UserChanges,
    ) -> Result<Model, DbErr> {
        let user = Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("User {id} not found")))?;

        let mut active: ActiveModel = user.into();

        if let Some(email) = changes.email {
            active.email = Set(email.trim().to_owned());
        }
        if let Some(full_name) = changes.full_name {
            active.full_name = Set(full_name.trim().to_owned());
        }
        if let Some(phone) = changes.phone {
            active.phone = Set(Some(phone.trim().to_owned()).filter(|p| !p.is_empty()));
        }
        if let Some(role) = changes.role {
            active.role = Set(role);
        }
        if let Some(is_active) = changes.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(specialization) = changes.specialization {
            active.specialization = Set(Some(specialization).filter(|s| !s.trim().is_empty()));
        }
        if let Some(password) = changes.password {
            active.password_hash = Set(Self::hash_password(&password)?);
        }

        active.updated_at = Set(Utc::now());
        active.update(db).await
    }

    pub async fn set_active(db: &DatabaseConnection, id: i64, is_active: bool) -> Result<Model, DbErr> {
        Self::update_profile(
            db,
            id,
            UserChanges {
                is_active: Some(is_active),
                ..Default::default()
            },
        )
        .await
    }

    /// Updates the technician scheduling knobs.
    pub async fn set_availability(
        db: &DatabaseConnection,
        id: i64,
        is_available: Option<bool>,
        max_concurrent_tickets: Option<i32>,
    ) -> Result<Model, DbErr> {
        let user = Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("User {id} not found")))?;

        let mut active: ActiveModel = user.into();
        if let Some(available) = is_available {
            active.is_available = Set(available);
        }
        if let Some(max) = max_concurrent_tickets {
            active.max_concurrent_tickets = Set(max);
        }
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }

    /// Deletes a user who never appeared in the assignment ledger.
    ///
    /// Technicians with assignment history are kept; deactivate them instead.
    pub async fn delete_by_id(db: &DatabaseConnection, id: i64) -> Result<UserDeletion, DbErr> {
        let txn = db.begin().await?;

        let history = assignment_entry::Entity::find()
            .filter(assignment_entry::Column::TechnicianId.eq(id))
            .count(&txn)
            .await?;
        if history > 0 {
            return Ok(UserDeletion::HasAssignmentHistory);
        }

        let result = Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        Ok(if result.rows_affected == 1 {
            UserDeletion::Deleted
        } else {
            UserDeletion::NotFound
        })
    }

    /// Number of active users holding any of the given roles.
    pub async fn count_active_with_roles(
        db: &DatabaseConnection,
        roles: &[Role],
    ) -> Result<u64, DbErr> {
        Entity::find()
            .filter(Column::Role.is_in(roles.iter().copied()))
            .filter(Column::IsActive.eq(true))
            .count(db)
            .await
    }

    /// Active technicians flagged as available, least loaded first.
    pub async fn available_technicians(db: &DatabaseConnection) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::Role.eq(Role::Master))
            .filter(Column::IsActive.eq(true))
            .filter(Column::IsAvailable.eq(true))
            .order_by_asc(Column::ActiveTicketCount)
            .order_by_asc(Column::FullName)
            .all(db)
            .await
    }

    pub fn is_technician(&self) -> bool {
        self.role == Role::Master
    }

    pub fn has_capacity(&self) -> bool {
        self.is_available && self.active_ticket_count < self.max_concurrent_tickets
    }

    pub fn logged_in_since(&self, window: Duration) -> bool {
        self.last_login
            .map(|t| t >= Utc::now() - window)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    fn new_user(username: &str, role: Role) -> NewUser {
        NewUser {
            username: username.into(),
            email: format!("{username}@rocketpc.test"),
            password: "secret-pass".into(),
            full_name: format!("{username} full"),
            phone: None,
            role,
            specialization: None,
        }
    }

    #[tokio::test]
    async fn password_is_hashed_and_verifiable() {
        let db = setup_test_db().await;
        let user = Model::create(&db, new_user("alice", Role::Manager))
            .await
            .unwrap();

        assert_ne!(user.password_hash, "secret-pass");
        assert!(user.password_hash.starts_with("$argon2"));
        assert!(user.verify_password("secret-pass"));
        assert!(!user.verify_password("wrong"));
    }

    #[tokio::test]
    async fn verify_credentials_records_login_and_rejects_inactive() {
        let db = setup_test_db().await;
        let user = Model::create(&db, new_user("bob", Role::Master)).await.unwrap();
        assert!(user.last_login.is_none());

        let ok = Model::verify_credentials(&db, "bob", "secret-pass")
            .await
            .unwrap()
            .expect("credentials should match");
        assert!(ok.last_login.is_some());

        assert!(
            Model::verify_credentials(&db, "bob", "nope")
                .await
                .unwrap()
                .is_none()
        );

        Model::set_active(&db, user.id, false).await.unwrap();
        assert!(
            Model::verify_credentials(&db, "bob", "secret-pass")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn available_technicians_only_lists_active_available_masters() {
        let db = setup_test_db().await;
        let m1 = Model::create(&db, new_user("m1", Role::Master)).await.unwrap();
        let m2 = Model::create(&db, new_user("m2", Role::Master)).await.unwrap();
        Model::create(&db, new_user("boss", Role::Director)).await.unwrap();
        Model::set_availability(&db, m2.id, Some(false), None)
            .await
            .unwrap();

        let available = Model::available_technicians(&db).await.unwrap();
        let ids: Vec<i64> = available.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![m1.id]);
    }

    #[tokio::test]
    async fn delete_keeps_technicians_with_assignment_history() {
        use crate::models::repair_ticket::TicketPriority;
        use crate::workflow::{self, ClientRef, NewTicket};

        let db = setup_test_db().await;
        let manager = Model::create(&db, new_user("manager", Role::Manager)).await.unwrap();
        let t1 = Model::create(&db, new_user("t1", Role::Master)).await.unwrap();
        let t2 = Model::create(&db, new_user("t2", Role::Master)).await.unwrap();
        let ticket = workflow::create_ticket(
            &db,
            NewTicket {
                client: ClientRef::Contact {
                    full_name: "Ivan".into(),
                    phone: "+100".into(),
                    email: None,
                },
                device_type: "Laptop".into(),
                brand: None,
                model: None,
                serial_number: None,
                problem_description: "Cracked screen".into(),
                priority: TicketPriority::Normal,
                estimated_cost: None,
                estimated_completion: None,
                warranty_days: None,
                notes: None,
            },
            None,
        )
        .await
        .unwrap();

        workflow::assign(&db, ticket.id, t1.id, manager.id).await.unwrap();
        workflow::assign(&db, ticket.id, t2.id, manager.id).await.unwrap();

        assert_eq!(
            Model::delete_by_id(&db, t2.id).await.unwrap(),
            UserDeletion::HasAssignmentHistory
        );
        assert_eq!(
            Model::delete_by_id(&db, t1.id).await.unwrap(),
            UserDeletion::HasAssignmentHistory
        );
        assert_eq!(assignment_entry::Entity::find().count(&db).await.unwrap(), 2);

        let current = assignment_entry::Model::current(&db, ticket.id).await.unwrap().unwrap();
        assert_eq!(current.technician_id, t2.id);

        let idle = Model::create(&db, new_user("idle", Role::Master)).await.unwrap();
        assert_eq!(Model::delete_by_id(&db, idle.id).await.unwrap(), UserDeletion::Deleted);
        assert_eq!(Model::delete_by_id(&db, idle.id).await.unwrap(), UserDeletion::NotFound);
    }

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("MASTER".parse::<Role>().unwrap(), Role::Master);
        assert_eq!(Role::Director.to_string(), "director");
        assert!("owner".parse::<Role>().is_err());
    }
}
