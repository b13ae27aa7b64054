//! Fixed catalog queries

/// Every database with its state and whether the login may connect to it.
/// Filtering happens in [`super::listable_databases`].
pub const DATABASES: &str = r#"
SELECT
    d.name,
    d.state_desc,
    CAST(ISNULL(HAS_PERMS_BY_NAME(d.name, 'DATABASE', 'CONNECT'), 0) AS INT) AS can_connect
FROM sys.databases d
ORDER BY d.name
"#;

pub const TABLES: &str = r#"
SELECT
    s.name AS schema_name,
    t.name AS table_name
FROM sys.tables t
INNER JOIN sys.schemas s ON t.schema_id = s.schema_id
ORDER BY s.name, t.name
"#;

/// Columns of one table, resolved by its fully-qualified name in @P1
pub const COLUMNS: &str = r#"
SELECT
    c.name AS column_name,
    t.name AS data_type,
    c.max_length,
    c.precision,
    c.scale,
    c.is_nullable,
    CAST(CASE WHEN pk.column_id IS NOT NULL THEN 1 ELSE 0 END AS BIT) AS is_primary_key,
    c.is_identity,
    ISNULL(dc.definition, N'') AS default_value,
    ISNULL(CAST(ep.value AS NVARCHAR(4000)), N'') AS description
FROM sys.columns c
INNER JOIN sys.types t ON c.user_type_id = t.user_type_id
LEFT JOIN (
    SELECT ic.object_id, ic.column_id
    FROM sys.index_columns ic
    INNER JOIN sys.indexes i ON ic.object_id = i.object_id AND ic.index_id = i.index_id
    WHERE i.is_primary_key = 1
) pk ON c.object_id = pk.object_id AND c.column_id = pk.column_id
LEFT JOIN sys.default_constraints dc
    ON c.object_id = dc.parent_object_id AND c.column_id = dc.parent_column_id
LEFT JOIN sys.extended_properties ep
    ON c.object_id = ep.major_id AND c.column_id = ep.minor_id AND ep.class = 1 AND ep.name = 'MS_Description'
WHERE c.object_id = OBJECT_ID(@P1)
ORDER BY c.column_id
"#;
