//! Row → domain struct mapping for the entity, relationship, and
//! inheritance tables.

use rusqlite::types::Type;
use rusqlite::Row;

use crate::types::{Entity, EntityKind, InheritanceEdge, Language, Relationship, RelationshipType};

/// Column list matching [`row_to_entity`]; use it in every `SELECT` that
/// feeds the converter.
pub const ENTITY_COLUMNS: &str =
    "id, project_id, language, symbol, type, filename, start_line, end_line, source";

pub const RELATIONSHIP_COLUMNS: &str = "id, caller_id, callee_id, callee_symbol, line, comment";

pub const INHERITANCE_COLUMNS: &str =
    "id, child_entity_id, parent_entity_id, parent_symbol, relationship_type";

fn conversion_error(column: usize, what: &str, value: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        column,
        Type::Text,
        format!("unknown {what} '{value}'").into(),
    )
}

/// Map a row selected with [`ENTITY_COLUMNS`] to an [`Entity`].
pub fn row_to_entity(row: &Row<'_>) -> rusqlite::Result<Entity> {
    let language: String = row.get(2)?;
    let kind: String = row.get(4)?;
    Ok(Entity {
        id: row.get(0)?,
        project_id: row.get(1)?,
        language: Language::from_str_loose(&language)
            .ok_or_else(|| conversion_error(2, "language", &language))?,
        symbol: row.get(3)?,
        kind: EntityKind::from_str_loose(&kind)
            .ok_or_else(|| conversion_error(4, "entity type", &kind))?,
        filename: row.get(5)?,
        start_line: row.get(6)?,
        end_line: row.get(7)?,
        source: row.get(8)?,
    })
}

/// Map a row selected with [`RELATIONSHIP_COLUMNS`] to a [`Relationship`].
pub fn row_to_relationship(row: &Row<'_>) -> rusqlite::Result<Relationship> {
    Ok(Relationship {
        id: row.get(0)?,
        caller_id: row.get(1)?,
        callee_id: row.get(2)?,
        callee_symbol: row.get(3)?,
        line: row.get(4)?,
        comment: row.get(5)?,
    })
}

/// Map a row selected with [`INHERITANCE_COLUMNS`] to an [`InheritanceEdge`].
pub fn row_to_inheritance_edge(row: &Row<'_>) -> rusqlite::Result<InheritanceEdge> {
    let rel: String = row.get(4)?;
    Ok(InheritanceEdge {
        id: row.get(0)?,
        child_entity_id: row.get(1)?,
        parent_entity_id: row.get(2)?,
        parent_symbol: row.get(3)?,
        relationship_type: RelationshipType::from_str_loose(&rel)
            .ok_or_else(|| conversion_error(4, "relationship type", &rel))?,
    })
}
