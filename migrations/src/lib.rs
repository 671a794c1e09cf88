pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_registers_table;
mod m20240101_000002_create_shifts_table;
mod m20240101_000003_create_openings_table;
mod m20240101_000004_create_cash_counts_table;
mod m20240101_000005_create_vendor_payments_table;
mod m20240101_000006_create_transfers_table;
mod m20240101_000007_create_receptions_table;
mod m20240101_000008_create_parameters_table;
mod m20240101_000009_create_document_sequences_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_registers_table::Migration),
            Box::new(m20240101_000002_create_shifts_table::Migration),
            Box::new(m20240101_000003_create_openings_table::Migration),
            Box::new(m20240101_000004_create_cash_counts_table::Migration),
            Box::new(m20240101_000005_create_vendor_payments_table::Migration),
            Box::new(m20240101_000006_create_transfers_table::Migration),
            Box::new(m20240101_000007_create_receptions_table::Migration),
            Box::new(m20240101_000008_create_parameters_table::Migration),
            Box::new(m20240101_000009_create_document_sequences_table::Migration),
        ]
    }
}
