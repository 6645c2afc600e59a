use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub enum Countries {
    Table,
    Code,
    Name,
    CurrencyCode,
    CurrencySymbol,
    IsActive,
}

#[derive(Iden)]
pub enum Banks {
    Table,
    Id,
    Name,
    Code,
    CountryCode,
    IsActive,
}

#[derive(Iden)]
pub enum WalletOperators {
    Table,
    Id,
    Name,
    Code,
    CountryCode,
    IsActive,
}

#[derive(Iden)]
pub enum Staff {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    IsActive,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Countries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Countries::Code)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Countries::Name).string().not_null())
                    .col(ColumnDef::new(Countries::CurrencyCode).string().not_null())
                    .col(ColumnDef::new(Countries::CurrencySymbol).string())
                    .col(
                        ColumnDef::new(Countries::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Banks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Banks::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Banks::Name).string().not_null())
                    .col(ColumnDef::new(Banks::Code).string())
                    .col(ColumnDef::new(Banks::CountryCode).string())
                    .col(
                        ColumnDef::new(Banks::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-banks-country_code")
                            .from(Banks::Table, Banks::CountryCode)
                            .to(Countries::Table, Countries::Code),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WalletOperators::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WalletOperators::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WalletOperators::Name).string().not_null())
                    .col(ColumnDef::new(WalletOperators::Code).string())
                    .col(ColumnDef::new(WalletOperators::CountryCode).string())
                    .col(
                        ColumnDef::new(WalletOperators::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-wallet_operators-country_code")
                            .from(WalletOperators::Table, WalletOperators::CountryCode)
                            .to(Countries::Table, Countries::Code),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Staff::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Staff::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Staff::FirstName).string().not_null())
                    .col(ColumnDef::new(Staff::LastName).string())
                    .col(ColumnDef::new(Staff::Email).string())
                    .col(
                        ColumnDef::new(Staff::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Staff::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WalletOperators::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Banks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Countries::Table).to_owned())
            .await?;
        Ok(())
    }
}
