use sea_orm_migration::prelude::*;

pub struct Migrator;

impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20241127_000001_create_sales_table::Migration)]
    }
}

mod m20241127_000001_create_sales_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20241127_000001_create_sales_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Create sales table aligned with entities::sale Model
            manager
                .create_table(
                    Table::create()
                        .table(Sales::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Sales::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Sales::ProductName)
                                .string_len(255)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Sales::Quantity)
                                .integer()
                                .not_null()
                                .check(Expr::col(Sales::Quantity).gt(0)),
                        )
                        .col(
                            ColumnDef::new(Sales::Price)
                                .decimal_len(10, 2)
                                .not_null()
                                .check(Expr::col(Sales::Price).gte(0)),
                        )
                        .col(ColumnDef::new(Sales::SaleDate).date().not_null())
                        .col(
                            ColumnDef::new(Sales::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Sales::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            // Useful indexes for filtered queries
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_sales_product_name")
                        .table(Sales::Table)
                        .col(Sales::ProductName)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_sales_sale_date")
                        .table(Sales::Table)
                        .col(Sales::SaleDate)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_sales_sale_date_product_name")
                        .table(Sales::Table)
                        .col(Sales::SaleDate)
                        .col(Sales::ProductName)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Sales::Table).if_exists().to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Sales {
        Table,
        Id,
        ProductName,
        Quantity,
        Price,
        SaleDate,
        CreatedAt,
        UpdatedAt,
    }
}
