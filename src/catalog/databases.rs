use crate::catalog::FileMatcher;
use crate::stack::Language;

pub struct DatabaseSpec {
    pub name: &'static str,
    /// `(language, regex)`. A `None` language marks a pattern valid in any file,
    /// such as a connection URL scheme.
    pub patterns: &'static [(Option<Language>, &'static str)],
}

use FileMatcher::{Name, Suffix};

pub const DATABASE_MARKERS: &[(&str, &[FileMatcher])] = &[
    ("postgresql", &[Name("postgresql.conf"), Name("pg_hba.conf")]),
    ("mysql", &[Name("my.cnf"), Name("my.ini")]),
    ("mongodb", &[Name("mongod.conf")]),
    ("redis", &[Name("redis.conf")]),
    ("sqlite", &[Suffix(".db"), Suffix(".sqlite"), Suffix(".sqlite3")]),
];

/// Non-source files scanned for connection URLs only.
pub const DATABASE_CONFIG_EXTENSIONS: &[&str] = &[".yml", ".yaml", ".properties", ".ini", ".cfg", ".toml"];

const PY: Option<Language> = Some(Language::Python);
const TS: Option<Language> = Some(Language::TypeScript);
const JAVA: Option<Language> = Some(Language::Java);
const GO: Option<Language> = Some(Language::Go);
const ANY: Option<Language> = None;

pub const DATABASE_PATTERNS: &[DatabaseSpec] = &[
    DatabaseSpec {
        name: "postgresql",
        patterns: &[
            (PY, r"import psycopg2"),
            (PY, r"from psycopg2"),
            (TS, r#"require\(['"]pg['"]\)"#),
            (TS, r#"import .* from ['"]pg['"]"#),
            (TS, r"pg\.connect"),
            (GO, r#"xorm\.NewEngine\(['"]postgres"#),
            (GO, r"database/sql.*postgres"),
            (GO, r"github\.com/lib/pq"),
            (JAVA, r"jdbc:postgresql"),
            (ANY, r"postgres(ql)?://"),
        ],
    },
    DatabaseSpec {
        name: "mysql",
        patterns: &[
            (PY, r"import pymysql"),
            (PY, r"import mysqldb"),
            (PY, r"from pymysql"),
            (TS, r#"require\(['"]mysql2?['"]\)"#),
            (TS, r"mysql\.createConnection"),
            (GO, r"github\.com/go-sql-driver/mysql"),
            (GO, r#"xorm\.NewEngine\(['"]mysql"#),
            (GO, r"database/sql.*mysql"),
            (JAVA, r"jdbc:mysql"),
            (ANY, r"mysql://"),
        ],
    },
    DatabaseSpec {
        name: "mongodb",
        patterns: &[
            (PY, r"import pymongo"),
            (PY, r"from pymongo"),
            (TS, r#"require\(['"]mongodb['"]\)"#),
            (TS, r#"require\(['"]mongoose['"]\)"#),
            (TS, r"import.*mongoose"),
            (TS, r"mongoose\.connect"),
            (GO, r"go\.mongodb\.org/mongo-driver"),
            (JAVA, r"com\.mongodb"),
            (ANY, r"mongodb(\+srv)?://"),
        ],
    },
    DatabaseSpec {
        name: "redis",
        patterns: &[
            (PY, r"import redis"),
            (PY, r"from redis"),
            (TS, r#"require\(['"]redis['"]\)"#),
            (TS, r"redis\.createClient"),
            (GO, r"redis\.NewClient"),
            (GO, r"github\.com/go-redis/redis"),
            (GO, r"github\.com/redis/go-redis"),
            (JAVA, r"redis\.clients\.jedis"),
            (ANY, r"redis://"),
        ],
    },
    DatabaseSpec {
        name: "sqlite",
        patterns: &[
            (PY, r"import sqlite3"),
            (PY, r"from sqlite3"),
            (PY, r"sqlite3\.connect"),
            (GO, r"github\.com/mattn/go-sqlite3"),
            (GO, r#"xorm\.NewEngine\(['"]sqlite3"#),
            (GO, r"database/sql.*sqlite"),
            (ANY, r#"\.sqlite3?['"]"#),
        ],
    },
    DatabaseSpec {
        name: "cassandra",
        patterns: &[
            (PY, r"from cassandra"),
            (PY, r"import cassandra"),
            (PY, r"cassandra\.cluster"),
            (JAVA, r"com\.datastax"),
        ],
    },
    DatabaseSpec {
        name: "elasticsearch",
        patterns: &[
            (PY, r"from elasticsearch"),
            (PY, r"import elasticsearch"),
            (PY, r"Elasticsearch\(\)"),
            (TS, r#"require\(['"]@elastic/elasticsearch['"]\)"#),
            (TS, r#"from ['"]@elastic/elasticsearch['"]"#),
            (GO, r"github\.com/elastic/go-elasticsearch"),
        ],
    },
    DatabaseSpec {
        name: "oracle",
        patterns: &[
            (PY, r"import cx_Oracle"),
            (PY, r"from cx_Oracle"),
            (TS, r#"require\(['"]oracledb['"]\)"#),
            (ANY, r"oracle\.connect"),
        ],
    },
    DatabaseSpec {
        name: "sqlserver",
        patterns: &[
            (PY, r"import pymssql"),
            (PY, r"from pymssql"),
            (GO, r"github\.com/microsoft/go-mssqldb"),
            (GO, r#"xorm\.NewEngine\(['"]mssql"#),
            (ANY, r"mssql://"),
            (ANY, r"sqlserver://"),
        ],
    },
];
