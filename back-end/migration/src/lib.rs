pub use sea_orm_migration::prelude::*;

mod m20250301_090000_create_user;
mod m20250301_090100_create_post_and_tag;
mod m20250301_090200_create_comment;
mod m20250301_090300_create_file;
mod m20250301_090400_create_config;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_090000_create_user::Migration),
            Box::new(m20250301_090100_create_post_and_tag::Migration),
            Box::new(m20250301_090200_create_comment::Migration),
            Box::new(m20250301_090300_create_file::Migration),
            Box::new(m20250301_090400_create_config::Migration),
        ]
    }
}
