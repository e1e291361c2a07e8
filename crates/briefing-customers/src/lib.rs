//! Customer intake records for the briefing service.
//!
//! Implements the one entity the system stores: a customer's project
//! briefing, submitted through the intake form and read back by the listing
//! endpoint. Records are insert-only (there is no update or delete path),
//! so this crate exposes exactly two operations against a live connection.
//!
//! Field names on the wire (and in the `clientes` table) follow the
//! Portuguese form contract; the Rust struct keeps English names and maps
//! them with serde renames.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during customer operations.
#[derive(Debug, Error)]
pub enum CustomerError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// A stored customer intake record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    /// Row id, assigned by SQLite and never reused.
    pub id: i64,
    /// Customer name.
    #[serde(rename = "nome")]
    pub name: String,
    /// Kind of project the customer is asking about.
    #[serde(rename = "tipo_projeto")]
    pub project_type: Option<String>,
    /// How urgent the customer says the project is.
    #[serde(rename = "urgencia")]
    pub urgency: Option<String>,
    /// Contact email. Stored as submitted, no format validation.
    pub email: String,
    /// Free-form project description.
    #[serde(rename = "descricao")]
    pub description: String,
    /// Stored filename of the attached reference file, if one was uploaded.
    #[serde(rename = "referencia")]
    pub reference: Option<String>,
}

/// Field values for a record about to be inserted.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub project_type: Option<String>,
    pub urgency: Option<String>,
    pub email: String,
    pub description: String,
    pub reference: Option<String>,
}

/// Inserts a new customer record and returns its assigned id.
pub fn insert_customer(conn: &Connection, new: &NewCustomer) -> Result<i64, CustomerError> {
    conn.execute(
        "INSERT INTO clientes (nome, tipo_projeto, urgencia, email, descricao, referencia)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            new.name,
            new.project_type,
            new.urgency,
            new.email,
            new.description,
            new.reference,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Lists all customer records, most recently created first.
pub fn list_customers(conn: &Connection) -> Result<Vec<Customer>, CustomerError> {
    let mut stmt = conn.prepare(
        "SELECT id, nome, tipo_projeto, urgencia, email, descricao, referencia
         FROM clientes ORDER BY id DESC",
    )?;

    let rows = stmt.query_map([], map_row_to_customer)?;
    let mut customers = Vec::new();
    for row in rows {
        customers.push(row?);
    }
    Ok(customers)
}

fn map_row_to_customer(row: &Row) -> rusqlite::Result<Customer> {
    Ok(Customer {
        id: row.get(0)?,
        name: row.get(1)?,
        project_type: row.get(2)?,
        urgency: row.get(3)?,
        email: row.get(4)?,
        description: row.get(5)?,
        reference: row.get(6)?,
    })
}
