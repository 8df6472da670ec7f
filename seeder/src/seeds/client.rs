use crate::seed::Seeder;
use db::models::client::{Model as ClientModel, NewClient};
use fake::{
    Fake,
    faker::{address::en::StreetName, internet::en::SafeEmail, name::en::Name},
};
use sea_orm::{DatabaseConnection, DbErr};

pub struct ClientSeeder;

#[async_trait::async_trait]
impl Seeder for ClientSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        for _ in 0..25 {
            let phone = format!("+37529{:07}", fastrand::u32(..10_000_000));
            if ClientModel::get_by_phone(db, &phone).await?.is_some() {
                continue;
            }

            let street: String = StreetName().fake();
            ClientModel::create(
                db,
                NewClient {
                    full_name: Name().fake(),
                    phone,
                    email: fastrand::bool().then(|| SafeEmail().fake()),
                    address: Some(format!("{} {street}", fastrand::u8(1..120))),
                    is_vip: fastrand::u8(..10) == 0,
                    notes: None,
                },
            )
            .await?;
        }
        Ok(())
    }
}
