use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_alerts_table::Migration),
            Box::new(m20250301_000002_create_preparation_items_table::Migration),
            Box::new(m20250301_000003_create_supply_claims_table::Migration),
        ]
    }
}

// Migration implementations

mod m20250301_000001_create_alerts_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000001_create_alerts_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Create alerts table aligned with entities::alert Model
            manager
                .create_table(
                    Table::create()
                        .table(Alerts::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Alerts::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Alerts::Title).string().not_null())
                        .col(ColumnDef::new(Alerts::Description).text())
                        .col(ColumnDef::new(Alerts::Severity).string().not_null())
                        .col(ColumnDef::new(Alerts::CreatedBy).uuid().not_null())
                        .col(
                            ColumnDef::new(Alerts::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Alerts::UpdatedAt).timestamp_with_time_zone())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Alerts::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Alerts {
        Table,
        Id,
        Title,
        Description,
        Severity,
        CreatedBy,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250301_000002_create_preparation_items_table {

    use sea_orm_migration::prelude::*;

    use super::m20250301_000001_create_alerts_table::Alerts;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000002_create_preparation_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PreparationItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PreparationItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PreparationItems::AlertId).uuid().not_null())
                        .col(ColumnDef::new(PreparationItems::Name).string().not_null())
                        .col(
                            ColumnDef::new(PreparationItems::TotalQuantity)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PreparationItems::Unit).string())
                        .col(
                            ColumnDef::new(PreparationItems::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PreparationItems::UpdatedAt)
                                .timestamp_with_time_zone(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_preparation_items_alert")
                                .from(PreparationItems::Table, PreparationItems::AlertId)
                                .to(Alerts::Table, Alerts::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_preparation_items_alert_id")
                        .table(PreparationItems::Table)
                        .col(PreparationItems::AlertId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PreparationItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum PreparationItems {
        Table,
        Id,
        AlertId,
        Name,
        TotalQuantity,
        Unit,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250301_000003_create_supply_claims_table {

    use sea_orm_migration::prelude::*;

    use super::m20250301_000002_create_preparation_items_table::PreparationItems;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000003_create_supply_claims_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(SupplyClaims::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SupplyClaims::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SupplyClaims::PreparationItemId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SupplyClaims::UserId).uuid().not_null())
                        .col(ColumnDef::new(SupplyClaims::Quantity).integer().not_null())
                        .col(
                            ColumnDef::new(SupplyClaims::ClaimedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_supply_claims_preparation_item")
                                .from(SupplyClaims::Table, SupplyClaims::PreparationItemId)
                                .to(PreparationItems::Table, PreparationItems::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // One claim row per item. Concurrent claim attempts on the same
            // item are serialized by this index, not by application code.
            manager
                .create_index(
                    Index::create()
                        .name("idx_supply_claims_item_unique")
                        .table(SupplyClaims::Table)
                        .col(SupplyClaims::PreparationItemId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_supply_claims_user_id")
                        .table(SupplyClaims::Table)
                        .col(SupplyClaims::UserId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(SupplyClaims::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum SupplyClaims {
        Table,
        Id,
        PreparationItemId,
        UserId,
        Quantity,
        ClaimedAt,
    }
}
