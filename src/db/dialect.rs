//! Dialect-specific catalog SQL.
//!
//! Every catalog query returns the same column labels on every database, so
//! the row conversions in `models::schema` never branch on dialect:
//!
//! - list tables: `name`
//! - describe table: `name, type, notnull, dflt_value, pk`
//! - table connections: `table_name, column_name, referenced_table_name,
//!   referenced_column_name, constraint_name`, ordered by `table_name, column_name`

use crate::models::DatabaseType;

/// SQL text plus its positional string parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub sql: String,
    pub params: Vec<String>,
}

impl CatalogQuery {
    fn new(sql: impl Into<String>, params: Vec<String>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

mod queries {
    pub mod mysql {
        pub const LIST_TABLES: &str = r#"
            SELECT CONVERT(TABLE_NAME USING utf8) AS name
            FROM information_schema.TABLES
            WHERE TABLE_SCHEMA = DATABASE()
            AND TABLE_TYPE = 'BASE TABLE'
            ORDER BY TABLE_NAME
            "#;

        pub const DESCRIBE_TABLE: &str = r#"
            SELECT
                CONVERT(COLUMN_NAME USING utf8) AS name,
                CONVERT(COLUMN_TYPE USING utf8) AS type,
                IS_NULLABLE = 'NO' AS notnull,
                CONVERT(COLUMN_DEFAULT USING utf8) AS dflt_value,
                COLUMN_KEY = 'PRI' AS pk
            FROM information_schema.COLUMNS
            WHERE TABLE_SCHEMA = DATABASE()
            AND TABLE_NAME = ?
            ORDER BY ORDINAL_POSITION
            "#;

        /// `{tables}` is replaced with the placeholder list, twice.
        pub const TABLE_CONNECTIONS: &str = r#"
            SELECT
                CONVERT(TABLE_NAME USING utf8) AS table_name,
                CONVERT(COLUMN_NAME USING utf8) AS column_name,
                CONVERT(REFERENCED_TABLE_NAME USING utf8) AS referenced_table_name,
                CONVERT(REFERENCED_COLUMN_NAME USING utf8) AS referenced_column_name,
                CONVERT(CONSTRAINT_NAME USING utf8) AS constraint_name
            FROM information_schema.KEY_COLUMN_USAGE
            WHERE TABLE_SCHEMA = DATABASE()
            AND REFERENCED_TABLE_NAME IS NOT NULL
            AND (TABLE_NAME IN ({left}) OR REFERENCED_TABLE_NAME IN ({right}))
            ORDER BY TABLE_NAME, COLUMN_NAME
            "#;
    }

    pub mod postgres {
        pub const LIST_TABLES: &str = r#"
            SELECT table_name::text AS name
            FROM information_schema.tables
            WHERE table_schema = current_schema()
            AND table_type = 'BASE TABLE'
            ORDER BY table_name
            "#;

        // NOTNULL is a reserved word in PostgreSQL, hence the quoted label.
        pub const DESCRIBE_TABLE: &str = r#"
            SELECT
                c.column_name::text AS name,
                c.data_type::text AS type,
                (c.is_nullable = 'NO') AS "notnull",
                c.column_default::text AS dflt_value,
                EXISTS (
                    SELECT 1
                    FROM information_schema.table_constraints tc
                    JOIN information_schema.key_column_usage kcu
                        ON tc.constraint_name = kcu.constraint_name
                        AND tc.table_schema = kcu.table_schema
                        AND tc.table_name = kcu.table_name
                    WHERE tc.constraint_type = 'PRIMARY KEY'
                    AND tc.table_schema = c.table_schema
                    AND tc.table_name = c.table_name
                    AND kcu.column_name = c.column_name
                ) AS pk
            FROM information_schema.columns c
            WHERE c.table_schema = current_schema()
            AND c.table_name::text = $1
            ORDER BY c.ordinal_position
            "#;

        // One row per (local, referenced) column pair of each constraint.
        // Constraint names are unique per table only; never join on them.
        pub const TABLE_CONNECTIONS: &str = r#"
            SELECT
                src.relname::text AS table_name,
                sa.attname::text AS column_name,
                dst.relname::text AS referenced_table_name,
                da.attname::text AS referenced_column_name,
                con.conname::text AS constraint_name
            FROM pg_constraint con
            JOIN pg_class src ON src.oid = con.conrelid
            JOIN pg_class dst ON dst.oid = con.confrelid
            JOIN pg_namespace ns ON ns.oid = src.relnamespace
            CROSS JOIN LATERAL unnest(con.conkey, con.confkey) AS k(src_attnum, dst_attnum)
            JOIN pg_attribute sa ON sa.attrelid = con.conrelid AND sa.attnum = k.src_attnum
            JOIN pg_attribute da ON da.attrelid = con.confrelid AND da.attnum = k.dst_attnum
            WHERE con.contype = 'f'
            AND ns.nspname = current_schema()
            AND (src.relname::text IN ({left}) OR dst.relname::text IN ({right}))
            ORDER BY src.relname, sa.attname
            "#;
    }

    pub mod sqlite {
        pub const LIST_TABLES: &str = r#"
            SELECT name FROM sqlite_master
            WHERE type = 'table'
            AND substr(name, 1, 7) <> 'sqlite_'
            ORDER BY name
            "#;

        pub const DESCRIBE_TABLE: &str = r#"
            SELECT name, type, "notnull", dflt_value, pk
            FROM pragma_table_info(?)
            ORDER BY cid
            "#;

        // A foreign key declared without a column list targets the parent's
        // primary key; `to` is NULL in that case, so resolve it from the parent.
        pub const TABLE_CONNECTIONS: &str = r#"
            SELECT
                m.name AS table_name,
                p."from" AS column_name,
                p."table" AS referenced_table_name,
                COALESCE(
                    p."to",
                    (SELECT ti.name FROM pragma_table_info(p."table") ti WHERE ti.pk = p.seq + 1),
                    ''
                ) AS referenced_column_name,
                'fk_' || m.name || '_' || p.id AS constraint_name
            FROM sqlite_master m
            JOIN pragma_foreign_key_list(m.name) p
            WHERE m.type = 'table'
            AND substr(m.name, 1, 7) <> 'sqlite_'
            AND (m.name IN ({left}) OR p."table" IN ({right}))
            ORDER BY m.name, p."from"
            "#;
    }
}

impl DatabaseType {
    /// Query listing every base table in the current schema, ordered by name.
    pub fn list_tables_query(&self) -> CatalogQuery {
        let sql = match self {
            Self::MySQL => queries::mysql::LIST_TABLES,
            Self::PostgreSQL => queries::postgres::LIST_TABLES,
            Self::SQLite => queries::sqlite::LIST_TABLES,
        };
        CatalogQuery::new(sql, Vec::new())
    }

    /// Query describing the columns of `table_name`, in declaration order.
    pub fn describe_table_query(&self, table_name: &str) -> CatalogQuery {
        let sql = match self {
            Self::MySQL => queries::mysql::DESCRIBE_TABLE,
            Self::PostgreSQL => queries::postgres::DESCRIBE_TABLE,
            Self::SQLite => queries::sqlite::DESCRIBE_TABLE,
        };
        CatalogQuery::new(sql, vec![table_name.to_string()])
    }

    /// Query returning every foreign-key edge with at least one endpoint in `tables`.
    ///
    /// The parameters are `tables` repeated twice: once for the declaring side,
    /// once for the referenced side.
    pub fn table_connections_query(&self, tables: &[String]) -> CatalogQuery {
        let n = tables.len();
        let template = match self {
            Self::MySQL => queries::mysql::TABLE_CONNECTIONS,
            Self::PostgreSQL => queries::postgres::TABLE_CONNECTIONS,
            Self::SQLite => queries::sqlite::TABLE_CONNECTIONS,
        };
        let sql = template
            .replace("{left}", &self.placeholders(1, n))
            .replace("{right}", &self.placeholders(n + 1, n));

        let mut params = Vec::with_capacity(n * 2);
        params.extend_from_slice(tables);
        params.extend_from_slice(tables);
        CatalogQuery::new(sql, params)
    }

    /// Quote an identifier for direct embedding in a statement.
    pub fn quote_identifier(&self, name: &str) -> String {
        match self {
            Self::MySQL => format!("`{}`", name.replace('`', "``")),
            Self::PostgreSQL | Self::SQLite => format!("\"{}\"", name.replace('"', "\"\"")),
        }
    }

    /// Comma-separated positional placeholders, numbered from `start` where the
    /// dialect numbers them.
    fn placeholders(&self, start: usize, count: usize) -> String {
        (start..start + count)
            .map(|i| match self {
                Self::PostgreSQL => format!("${}", i),
                Self::MySQL | Self::SQLite => "?".to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}
