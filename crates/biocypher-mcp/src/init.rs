//! `biocypher-mcp init`: register this server with the agent clients found on PATH.
//!
//! The registration carries `--resources-dir` when one was given, so the
//! client launches the server against the same framework guide.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use toml_edit::{DocumentMut, InlineTable, Item, Table};

const SERVER_KEY: &str = "biocypher";

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("neither `claude` nor `codex` found in PATH; install Claude Code or Codex, then re-run `biocypher-mcp init`")]
    NoClients,
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: refusing to overwrite, {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> InitError + '_ {
    move |source| InitError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// How a client should launch this server.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerEntry {
    pub command: String,
    pub args: Vec<String>,
}

impl ServerEntry {
    pub fn new(command: impl Into<String>, resources_dir: Option<&Path>) -> Self {
        let args = match resources_dir {
            Some(dir) => vec!["--resources-dir".to_string(), dir.to_string_lossy().into_owned()],
            None => Vec::new(),
        };
        Self {
            command: command.into(),
            args,
        }
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "stdio",
            "command": self.command,
            "args": self.args,
        })
    }

    fn to_inline_table(&self) -> InlineTable {
        let mut table = InlineTable::new();
        table.insert("command", self.command.as_str().into());
        table.insert(
            "args",
            toml_edit::Value::Array(self.args.iter().map(String::as_str).collect()),
        );
        table
    }
}

/// Agent clients that read a project-scoped MCP config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Client {
    ClaudeCode,
    Codex,
}

impl Client {
    pub const ALL: [Client; 2] = [Client::ClaudeCode, Client::Codex];

    pub fn executable(self) -> &'static str {
        match self {
            Client::ClaudeCode => "claude",
            Client::Codex => "codex",
        }
    }

    pub fn config_path(self, cwd: &Path) -> PathBuf {
        match self {
            Client::ClaudeCode => cwd.join(".mcp.json"),
            Client::Codex => cwd.join(".codex").join("config.toml"),
        }
    }

    /// Merge `entry` into the client's config text, keeping other servers.
    fn merge(self, existing: Option<&str>, entry: &ServerEntry) -> Result<String, String> {
        match self {
            Client::ClaudeCode => merge_mcp_json(existing, entry),
            Client::Codex => merge_codex_toml(existing, entry),
        }
    }
}

fn merge_mcp_json(existing: Option<&str>, entry: &ServerEntry) -> Result<String, String> {
    let mut root: serde_json::Value = match existing {
        Some(text) if !text.trim().is_empty() => {
            serde_json::from_str(text).map_err(|e| format!("invalid JSON: {}", e))?
        }
        _ => serde_json::json!({}),
    };
    let Some(object) = root.as_object_mut() else {
        return Err("top level is not an object".into());
    };
    let servers = object
        .entry("mcpServers")
        .or_insert_with(|| serde_json::json!({}));
    let Some(servers) = servers.as_object_mut() else {
        return Err("`mcpServers` is not an object".into());
    };
    servers.insert(SERVER_KEY.to_string(), entry.to_json());
    serde_json::to_string_pretty(&root).map_err(|e| e.to_string())
}

fn merge_codex_toml(existing: Option<&str>, entry: &ServerEntry) -> Result<String, String> {
    let mut doc: DocumentMut = match existing {
        Some(text) => text.parse().map_err(|e| format!("invalid TOML: {}", e))?,
        None => DocumentMut::new(),
    };
    let servers = doc.entry("mcp_servers").or_insert_with(|| {
        let mut table = Table::new();
        table.set_implicit(true);
        Item::Table(table)
    });
    match servers {
        Item::Table(table) => {
            table.insert(SERVER_KEY, Item::Table(entry.to_inline_table().into_table()));
        }
        Item::Value(toml_edit::Value::InlineTable(table)) => {
            table.insert(SERVER_KEY, toml_edit::Value::InlineTable(entry.to_inline_table()));
        }
        _ => return Err("`mcp_servers` is not a table".into()),
    }
    Ok(doc.to_string())
}

/// First executable named `name` (or `name.exe`) in a PATH-style list.
pub fn find_on_path(name: &str, path_var: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(path_var)
        .flat_map(|dir| [dir.join(name), dir.join(format!("{name}.exe"))])
        .find(|candidate| candidate.is_file())
}

/// Write the config for each client in `clients`. Returns the files written.
pub fn register(
    cwd: &Path,
    entry: &ServerEntry,
    clients: &[Client],
) -> Result<Vec<PathBuf>, InitError> {
    if clients.is_empty() {
        return Err(InitError::NoClients);
    }

    let mut written = Vec::with_capacity(clients.len());
    for &client in clients {
        let path = client.config_path(cwd);
        let existing = match std::fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(io_error(&path)(e)),
        };
        let merged = client
            .merge(existing.as_deref(), entry)
            .map_err(|reason| InitError::Malformed {
                path: path.clone(),
                reason,
            })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error(parent))?;
        }
        std::fs::write(&path, merged).map_err(io_error(&path))?;
        tracing::info!(client = ?client, path = %path.display(), "registered biocypher-mcp");
        written.push(path);
    }
    Ok(written)
}

/// Register the running binary in `cwd` for every client installed on PATH.
pub fn init_project(cwd: &Path, resources_dir: Option<&Path>) -> Result<Vec<PathBuf>, InitError> {
    let exe = std::env::current_exe().map_err(io_error(Path::new("biocypher-mcp")))?;
    let binary = exe.canonicalize().map_err(io_error(&exe))?;

    // the client may start the server from another directory
    let resources_dir = resources_dir
        .map(|dir| dir.canonicalize().map_err(io_error(dir)))
        .transpose()?;

    let path_var = std::env::var_os("PATH").unwrap_or_default();
    let clients: Vec<Client> = Client::ALL
        .into_iter()
        .filter(|c| find_on_path(c.executable(), &path_var).is_some())
        .collect();

    let entry = ServerEntry::new(binary.to_string_lossy(), resources_dir.as_deref());
    register(cwd, &entry, &clients)
}
