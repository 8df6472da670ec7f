use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, Set, TransactionTrait};
use serde::Serialize;

/// A named competence of a technician, rated 1 to 5.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "technician_skills")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub level: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub const MIN_LEVEL: i32 = 1;
pub const MAX_LEVEL: i32 = 5;

impl Model {
    pub async fn for_user<C: ConnectionTrait>(db: &C, user_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_desc(Column::Level)
            .order_by_asc(Column::Name)
            .all(db)
            .await
    }

    /// Replaces the whole skill set of a user in one transaction.
    ///
    /// Duplicate names keep the last level given.
    pub async fn replace_for_user(
        db: &DatabaseConnection,
        user_id: i64,
        skills: Vec<(String, i32)>,
    ) -> Result<Vec<Model>, DbErr> {
        if let Some((name, level)) = skills
            .iter()
            .find(|(_, level)| !(MIN_LEVEL..=MAX_LEVEL).contains(level))
        {
            return Err(DbErr::Custom(format!(
                "Skill '{name}' has level {level}; expected {MIN_LEVEL}-{MAX_LEVEL}"
            )));
        }

        let mut deduped: Vec<(String, i32)> = Vec::new();
        for (name, level) in skills {
            let name = name.trim().to_owned();
            if name.is_empty() {
                continue;
            }
            match deduped.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(&name)) {
                Some(existing) => existing.1 = level,
                None => deduped.push((name, level)),
            }
        }

        let txn = db.begin().await?;

        Entity::delete_many()
            .filter(Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;

        let now = Utc::now();
        for (name, level) in deduped {
            ActiveModel {
                user_id: Set(user_id),
                name: Set(name),
                level: Set(level),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        let saved = Self::for_user(&txn, user_id).await?;
        txn.commit().await?;
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::{Model as UserModel, NewUser, Role};
    use crate::test_utils::setup_test_db;

    async fn technician(db: &DatabaseConnection) -> UserModel {
        UserModel::create(
            db,
            NewUser {
                username: "tech".into(),
                email: "tech@rocketpc.test".into(),
                password: "password".into(),
                full_name: "Tech Person".into(),
                phone: None,
                role: Role::Master,
                specialization: Some("Laptops".into()),
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn replace_overwrites_previous_set() {
        let db = setup_test_db().await;
        let tech = technician(&db).await;

        Model::replace_for_user(&db, tech.id, vec![("Soldering".into(), 3)])
            .await
            .unwrap();
        let skills = Model::replace_for_user(
            &db,
            tech.id,
            vec![
                ("Diagnostics".into(), 4),
                ("BGA rework".into(), 5),
                ("diagnostics".into(), 2),
            ],
        )
        .await
        .unwrap();

        let names: Vec<(&str, i32)> = skills.iter().map(|s| (s.name.as_str(), s.level)).collect();
        assert_eq!(names, vec![("BGA rework", 5), ("Diagnostics", 2)]);
    }

    #[tokio::test]
    async fn out_of_range_level_is_rejected() {
        let db = setup_test_db().await;
        let tech = technician(&db).await;

        let err = Model::replace_for_user(&db, tech.id, vec![("Soldering".into(), 6)])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("expected 1-5"));
        assert!(Model::for_user(&db, tech.id).await.unwrap().is_empty());
    }
}
