//! Queries for the four organization tables and the assembled tree.

use posture_core::errors::StorageError;
use posture_core::types::collections::FxHashMap;
use posture_core::types::{CapabilityCentreNode, FrameworkNode, ProductNode, SystemNode};
use rusqlite::{params, Connection};

use super::sqlite_err;

pub fn insert_capability_centre(conn: &Connection, name: &str) -> Result<i64, StorageError> {
    conn.execute(
        "INSERT INTO capability_centres (name) VALUES (?1)",
        params![name],
    )
    .map_err(sqlite_err)?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_framework(
    conn: &Connection,
    capability_centre_id: i64,
    name: &str,
) -> Result<i64, StorageError> {
    conn.execute(
        "INSERT INTO frameworks (capability_centre_id, name) VALUES (?1, ?2)",
        params![capability_centre_id, name],
    )
    .map_err(sqlite_err)?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_product(
    conn: &Connection,
    framework_id: i64,
    name: &str,
) -> Result<i64, StorageError> {
    conn.execute(
        "INSERT INTO products (framework_id, name) VALUES (?1, ?2)",
        params![framework_id, name],
    )
    .map_err(sqlite_err)?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_system(
    conn: &Connection,
    product_id: i64,
    name: &str,
) -> Result<i64, StorageError> {
    conn.execute(
        "INSERT INTO systems (product_id, name) VALUES (?1, ?2)",
        params![product_id, name],
    )
    .map_err(sqlite_err)?;
    Ok(conn.last_insert_rowid())
}

/// Delete a system. Its assessments cascade away with it.
pub fn delete_system(conn: &Connection, system_id: i64) -> Result<bool, StorageError> {
    let affected = conn
        .execute("DELETE FROM systems WHERE system_id = ?1", params![system_id])
        .map_err(sqlite_err)?;
    Ok(affected > 0)
}

/// Load and assemble the full containment tree, ordered by id at every
/// level.
pub fn query_tree(conn: &Connection) -> Result<Vec<CapabilityCentreNode>, StorageError> {
    let mut systems_by_product: FxHashMap<i64, Vec<SystemNode>> = FxHashMap::default();
    {
        let mut stmt = conn
            .prepare_cached(
                "SELECT system_id, product_id, name FROM systems ORDER BY system_id",
            )
            .map_err(sqlite_err)?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(1)?,
                    SystemNode {
                        system_id: row.get(0)?,
                        name: row.get(2)?,
                    },
                ))
            })
            .map_err(sqlite_err)?;
        for row in rows {
            let (product_id, node) = row.map_err(sqlite_err)?;
            systems_by_product.entry(product_id).or_default().push(node);
        }
    }

    let mut products_by_framework: FxHashMap<i64, Vec<ProductNode>> = FxHashMap::default();
    {
        let mut stmt = conn
            .prepare_cached(
                "SELECT product_id, framework_id, name FROM products ORDER BY product_id",
            )
            .map_err(sqlite_err)?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, i64>(1)?, row.get::<_, i64>(0)?, row.get::<_, String>(2)?))
            })
            .map_err(sqlite_err)?;
        for row in rows {
            let (framework_id, product_id, name) = row.map_err(sqlite_err)?;
            products_by_framework
                .entry(framework_id)
                .or_default()
                .push(ProductNode {
                    product_id,
                    name,
                    systems: systems_by_product.remove(&product_id).unwrap_or_default(),
                });
        }
    }

    let mut frameworks_by_centre: FxHashMap<i64, Vec<FrameworkNode>> = FxHashMap::default();
    {
        let mut stmt = conn
            .prepare_cached(
                "SELECT framework_id, capability_centre_id, name
                 FROM frameworks ORDER BY framework_id",
            )
            .map_err(sqlite_err)?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, i64>(1)?, row.get::<_, i64>(0)?, row.get::<_, String>(2)?))
            })
            .map_err(sqlite_err)?;
        for row in rows {
            let (centre_id, framework_id, name) = row.map_err(sqlite_err)?;
            frameworks_by_centre
                .entry(centre_id)
                .or_default()
                .push(FrameworkNode {
                    framework_id,
                    name,
                    products: products_by_framework
                        .remove(&framework_id)
                        .unwrap_or_default(),
                });
        }
    }

    let mut stmt = conn
        .prepare_cached(
            "SELECT capability_centre_id, name
             FROM capability_centres ORDER BY capability_centre_id",
        )
        .map_err(sqlite_err)?;
    let rows = stmt
        .query_map([], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })
        .map_err(sqlite_err)?;

    let mut tree = Vec::new();
    for row in rows {
        let (capability_centre_id, name) = row.map_err(sqlite_err)?;
        tree.push(CapabilityCentreNode {
            capability_centre_id,
            name,
            frameworks: frameworks_by_centre
                .remove(&capability_centre_id)
                .unwrap_or_default(),
        });
    }
    Ok(tree)
}
