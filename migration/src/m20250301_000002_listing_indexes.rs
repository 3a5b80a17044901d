use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        // Catalog listing sorts featured first, newest first.
        conn.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_shoes_listing ON shoes (is_available, is_featured DESC, created_at DESC)",
        )
        .await
        .ok();

        // Cleanup task scans unpaid orders by age.
        conn.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_orders_paid_created ON orders (paid, created_at)",
        )
        .await
        .ok();

        // Order history per customer, newest first.
        conn.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_orders_user_created ON orders (user_id, created_at DESC)",
        )
        .await
        .ok();

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        conn.execute_unprepared("DROP INDEX IF EXISTS idx_orders_user_created")
            .await
            .ok();
        conn.execute_unprepared("DROP INDEX IF EXISTS idx_orders_paid_created")
            .await
            .ok();
        conn.execute_unprepared("DROP INDEX IF EXISTS idx_shoes_listing")
            .await
            .ok();

        Ok(())
    }
}
