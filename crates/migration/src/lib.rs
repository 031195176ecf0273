pub use sea_orm_migration::prelude::*;

mod m20260410_090000_users;
mod m20260410_100000_accounts;
mod m20260411_090000_vouchers;
mod m20260411_100000_cashboxes;
mod m20260412_090000_outbox;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260410_090000_users::Migration),
            Box::new(m20260410_100000_accounts::Migration),
            Box::new(m20260411_090000_vouchers::Migration),
            Box::new(m20260411_100000_cashboxes::Migration),
            Box::new(m20260412_090000_outbox::Migration),
        ]
    }
}
