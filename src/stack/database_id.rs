crate::define_id_enum! {
    /// Database engine identifier, keyed the same way as the database catalog
    DatabaseId {
        Postgres => "postgres" : "PostgreSQL" | "postgresql",
        MySql => "mysql" : "MySQL" | "mariadb",
        MongoDb => "mongodb" : "MongoDB" | "mongo",
    }
}
