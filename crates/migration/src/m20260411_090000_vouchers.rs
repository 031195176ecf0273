use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Vouchers {
    Table,
    Id,
    TransId,
    Kind,
    ProjectId,
    Currency,
    Description,
    PostedAt,
    CreatedBy,
    OriginId,
    CorrectedAt,
    CorrectedBy,
}

#[derive(Iden)]
enum VoucherRows {
    Table,
    Id,
    VoucherId,
    Line,
    AccountId,
    DebitMinor,
    CreditMinor,
    Description,
    EntityId,
    ReferenceId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Vouchers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Vouchers::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Vouchers::TransId).big_integer().not_null())
                    .col(ColumnDef::new(Vouchers::Kind).string().not_null())
                    .col(ColumnDef::new(Vouchers::ProjectId).big_integer().not_null())
                    .col(ColumnDef::new(Vouchers::Currency).string().not_null())
                    .col(ColumnDef::new(Vouchers::Description).string().not_null())
                    .col(ColumnDef::new(Vouchers::PostedAt).timestamp().not_null())
                    .col(ColumnDef::new(Vouchers::CreatedBy).string().not_null())
                    .col(ColumnDef::new(Vouchers::OriginId).string())
                    .col(ColumnDef::new(Vouchers::CorrectedAt).timestamp())
                    .col(ColumnDef::new(Vouchers::CorrectedBy).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uidx-vouchers-trans_id")
                    .table(Vouchers::Table)
                    .col(Vouchers::TransId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-vouchers-origin_id")
                    .table(Vouchers::Table)
                    .col(Vouchers::OriginId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(VoucherRows::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VoucherRows::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(VoucherRows::VoucherId).string().not_null())
                    .col(ColumnDef::new(VoucherRows::Line).integer().not_null())
                    .col(
                        ColumnDef::new(VoucherRows::AccountId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VoucherRows::DebitMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VoucherRows::CreditMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(VoucherRows::Description).string())
                    .col(ColumnDef::new(VoucherRows::EntityId).string())
                    .col(ColumnDef::new(VoucherRows::ReferenceId).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-voucher_rows-voucher_id")
                            .from(VoucherRows::Table, VoucherRows::VoucherId)
                            .to(Vouchers::Table, Vouchers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-voucher_rows-voucher_id")
                    .table(VoucherRows::Table)
                    .col(VoucherRows::VoucherId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VoucherRows::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vouchers::Table).to_owned())
            .await?;
        Ok(())
    }
}
