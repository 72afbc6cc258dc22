//! Built-in command table

use bytes::Bytes;
use std::collections::HashMap;

/// Query text that prints the generated command listing
pub const HELP_COMMAND: &str = "show help;";

const HELP_HEADER: &str = "Available queries:";

#[derive(Debug, Clone)]
struct Entry {
    command: String,
    payload: Bytes,
    listed: bool,
}

/// Immutable map from lowercased query text to a canned payload
///
/// Lookups lowercase the incoming text and require an exact match; no
/// trimming or other normalization is applied. The `show help;` entry is
/// always present and lists every listed command in insertion order.
#[derive(Debug, Clone)]
pub struct CommandTable {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl CommandTable {
    /// Start an empty table
    pub fn builder() -> CommandTableBuilder {
        CommandTableBuilder {
            entries: Vec::new(),
        }
    }

    /// Resolve a query to its built-in payload
    pub fn lookup(&self, query: &str) -> Option<&Bytes> {
        self.index
            .get(&query.to_lowercase())
            .map(|&i| &self.entries[i].payload)
    }

    /// Commands shown by `show help;`, in insertion order
    pub fn listed(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| e.listed)
            .map(|e| e.command.as_str())
    }

    /// Number of entries, including `show help;`
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false, the help entry is always present
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::builder()
            .command("show docs;", "https://materialize.com/docs")
            .command("show demos;", "https://materialize.com/demos")
            .command(
                "show sources;",
                "https://materialize.com/docs/sql/create-source/",
            )
            .command(
                "show github;",
                "https://github.com/MaterializeInc/materialize",
            )
            .hidden("welcome;", "welcome!")
            .build()
    }
}

/// Builder for [`CommandTable`]
///
/// # Examples
///
/// ```
/// use pg_fortune::console::CommandTable;
///
/// let table = CommandTable::builder()
///     .command("show docs;", "https://example.com/docs")
///     .hidden("ping;", "pong")
///     .build();
///
/// assert_eq!(&table.lookup("SHOW DOCS;").unwrap()[..], b"https://example.com/docs");
/// assert_eq!(&table.lookup("ping;").unwrap()[..], b"pong");
/// ```
#[derive(Debug, Clone)]
pub struct CommandTableBuilder {
    entries: Vec<Entry>,
}

impl CommandTableBuilder {
    /// Add a command that appears in the help listing
    pub fn command(self, command: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        self.push(command.into(), payload.into(), true)
    }

    /// Add a command that is answered but not listed
    pub fn hidden(self, command: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        self.push(command.into(), payload.into(), false)
    }

    fn push(mut self, command: String, payload: Bytes, listed: bool) -> Self {
        let command = command.to_lowercase();
        // A later definition replaces an earlier one in place.
        match self.entries.iter_mut().find(|e| e.command == command) {
            Some(entry) => {
                entry.payload = payload;
                entry.listed = listed;
            }
            None => self.entries.push(Entry {
                command,
                payload,
                listed,
            }),
        }
        self
    }

    /// Build the table, generating the `show help;` entry
    pub fn build(self) -> CommandTable {
        let mut entries: Vec<Entry> = self
            .entries
            .into_iter()
            .filter(|e| e.command != HELP_COMMAND)
            .collect();

        let mut help = String::from(HELP_HEADER);
        for entry in entries.iter().filter(|e| e.listed) {
            help.push_str("\n- ");
            help.push_str(&entry.command.to_uppercase());
        }
        entries.push(Entry {
            command: HELP_COMMAND.to_string(),
            payload: Bytes::from(help),
            listed: false,
        });

        let index = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.command.clone(), i))
            .collect();

        CommandTable { entries, index }
    }
}
