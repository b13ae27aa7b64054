//! Interpretation of raw catalog rows

/// Databases never offered for documentation
pub const SYSTEM_DATABASES: [&str; 4] = ["master", "tempdb", "model", "msdb"];

const ONLINE: &str = "ONLINE";

/// One row of `sys.databases` with the login's CONNECT permission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseEntry {
    pub name: String,
    /// `state_desc`, e.g. ONLINE, OFFLINE, RESTORING
    pub state: String,
    pub can_connect: bool,
}

impl DatabaseEntry {
    fn is_listable(&self) -> bool {
        !is_system_database(&self.name)
            && self.can_connect
            && self.state.eq_ignore_ascii_case(ONLINE)
    }
}

fn is_system_database(name: &str) -> bool {
    SYSTEM_DATABASES
        .iter()
        .any(|system| system.eq_ignore_ascii_case(name))
}

/// Names of the databases worth listing, ordered by name.
///
/// Drops the four system databases whatever their state, anything not online,
/// and anything the login lacks CONNECT permission on.
pub fn listable_databases(entries: impl IntoIterator<Item = DatabaseEntry>) -> Vec<String> {
    let mut names: Vec<String> = entries
        .into_iter()
        .filter(DatabaseEntry::is_listable)
        .map(|entry| entry.name)
        .collect();
    names.sort_by_cached_key(|name| name.to_lowercase());
    names
}

/// Encode a column's length or precision the way the data dictionary shows it.
///
/// - `char`/`varchar`: byte length, or `MAX` for -1
/// - `nchar`/`nvarchar`: byte length halved (two bytes per character), or `MAX`
/// - `decimal`/`numeric`: `precision,scale`
/// - anything else: empty
pub fn encode_length(type_name: &str, max_length: i16, precision: u8, scale: u8) -> String {
    match type_name.to_ascii_lowercase().as_str() {
        "char" | "varchar" | "nchar" | "nvarchar" if max_length == -1 => "MAX".to_string(),
        "nchar" | "nvarchar" => (max_length / 2).to_string(),
        "char" | "varchar" => max_length.to_string(),
        "decimal" | "numeric" => format!("{},{}", precision, scale),
        _ => String::new(),
    }
}
