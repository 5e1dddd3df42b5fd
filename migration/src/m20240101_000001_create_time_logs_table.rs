use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 time_logs 表 - 存储用户的时间记录
        manager
            .create_table(
                Table::create()
                    .table(TimeLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TimeLogs::Uuid)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TimeLogs::UserId).string().not_null())
                    // UTC ISO-8601 字符串，按字典序排序即按时间排序
                    .col(ColumnDef::new(TimeLogs::Timestamp).string().not_null())
                    .col(ColumnDef::new(TimeLogs::Activity).text().not_null())
                    .col(ColumnDef::new(TimeLogs::Tag).text())
                    .to_owned(),
            )
            .await?;

        // 创建索引
        manager
            .create_index(
                Index::create()
                    .name("idx_time_logs_user_id")
                    .table(TimeLogs::Table)
                    .col(TimeLogs::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_time_logs_timestamp")
                    .table(TimeLogs::Table)
                    .col(TimeLogs::Timestamp)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_time_logs_tag")
                    .table(TimeLogs::Table)
                    .col(TimeLogs::Tag)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TimeLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TimeLogs {
    Table,
    Uuid,
    UserId,
    Timestamp,
    Activity,
    Tag,
}
