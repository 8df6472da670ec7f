use crate::seed::Seeder;
use db::bootstrap::ensure_default_admin;
use db::models::technician_skill::Model as SkillModel;
use db::models::user::{Model as UserModel, NewUser, Role};
use fake::{Fake, faker::name::en::Name};
use sea_orm::{DatabaseConnection, DbErr};

pub struct StaffSeeder;

const SKILLS: &[&str] = &["Laptops", "Phones", "Tablets", "Soldering", "Displays", "Data recovery"];
const SPECIALIZATIONS: &[&str] = &["Laptops", "Phones", "Consoles", "Desktop PCs"];

async fn create_if_missing(
    db: &DatabaseConnection,
    username: &str,
    role: Role,
    specialization: Option<&str>,
) -> Result<Option<UserModel>, DbErr> {
    if UserModel::username_taken(db, username).await? {
        return Ok(None);
    }

    UserModel::create(
        db,
        NewUser {
            username: username.to_string(),
            email: format!("{username}@service-center.local"),
            password: "password123".to_string(),
            full_name: Name().fake(),
            phone: None,
            role,
            specialization: specialization.map(str::to_string),
        },
    )
    .await
    .map(Some)
}

#[async_trait::async_trait]
impl Seeder for StaffSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        ensure_default_admin(db).await?;

        // Fixed accounts, one per role
        create_if_missing(db, "director", Role::Director, None).await?;
        create_if_missing(db, "manager", Role::Manager, None).await?;

        for i in 1..=4 {
            let specialization = SPECIALIZATIONS[(i - 1) % SPECIALIZATIONS.len()];
            let Some(master) =
                create_if_missing(db, &format!("master{i}"), Role::Master, Some(specialization))
                    .await?
            else {
                continue;
            };

            let skills = (0..3)
                .map(|_| {
                    (
                        SKILLS[fastrand::usize(..SKILLS.len())].to_string(),
                        fastrand::i32(1..=5),
                    )
                })
                .collect();
            SkillModel::replace_for_user(db, master.id, skills).await?;
        }

        Ok(())
    }
}
