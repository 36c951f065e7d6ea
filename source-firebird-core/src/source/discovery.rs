//! Schema discovery.
//!
//! Enumerates user relations through the system catalog and describes
//! each one's columns. A relation whose column query fails is skipped
//! with a warning; discovery of the remaining relations continues.

use super::FirebirdSource;
use crate::Result;
use crate::adapters::firebird::TypeMapping;
use crate::adapters::{SourceConfig, SourceConnection};
use crate::models::{ColumnDescriptor, StreamCatalog, TableDescriptor};

impl FirebirdSource {
    /// Builds the stream catalog for every user relation.
    ///
    /// Columns keep source metadata order; relation order follows the
    /// system catalog and is not guaranteed.
    ///
    /// # Errors
    /// Returns error if the connection cannot be established or the
    /// relation list cannot be read. Failures describing a single relation
    /// are recorded in [`StreamCatalog::warnings`] instead.
    pub fn discover(&self, config: &SourceConfig) -> Result<StreamCatalog> {
        let start_time = std::time::Instant::now();
        tracing::info!("Starting schema discovery on {}", config.connection);

        let mut conn = self.connector.connect(config)?;

        let table_names = conn.list_tables()?;
        tracing::debug!("Found {} user relations", table_names.len());

        let mut catalog = StreamCatalog::default();
        for table_name in table_names {
            match describe_table(&mut *conn, &table_name, &config.type_mapping) {
                Ok(table) => {
                    tracing::debug!(
                        "Described {} with {} columns",
                        table.name,
                        table.columns.len()
                    );
                    catalog.tables.push(table);
                }
                Err(e) => {
                    let warning = format!("Skipped table {table_name}: {e}");
                    tracing::warn!("{}", warning);
                    catalog.warnings.push(warning);
                }
            }
        }

        tracing::info!(
            "Schema discovery completed in {:.2}s - {} streams, {} skipped",
            start_time.elapsed().as_secs_f64(),
            catalog.len(),
            catalog.warnings.len()
        );

        Ok(catalog)
    }
}

/// Describes one relation, mapping each column's vendor type code.
///
/// # Errors
/// Returns error if the column query fails
pub fn describe_table(
    conn: &mut dyn SourceConnection,
    table_name: &str,
    type_mapping: &TypeMapping,
) -> Result<TableDescriptor> {
    let columns = conn
        .list_columns(table_name)?
        .into_iter()
        .map(|column| ColumnDescriptor {
            portable_type: type_mapping.map_type(column.vendor_type_code),
            name: column.name,
            vendor_type_code: column.vendor_type_code,
        })
        .collect();

    Ok(TableDescriptor::new(table_name, columns))
}
