use std::path::{Path, PathBuf};

use serde::Serialize;

pub const TEMPLATE_URL: &str = "https://github.com/biocypher/biocypher-cookiecutter-template";

const INSTRUCTION_IF_NOT_EXISTS: &str = "If no BioCypher project exists at this path, you MUST \
    create one with the BioCypher cookiecutter template before writing any adapter code. Do not \
    create the project structure by hand. Call get_cookiecutter_instructions for the exact steps.";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExpectedStructure {
    pub root: &'static str,
    pub directories: &'static [&'static str],
    pub files: &'static [&'static str],
}

pub const EXPECTED_STRUCTURE: ExpectedStructure = ExpectedStructure {
    root: "Project root containing create_knowledge_graph.py and pyproject.toml",
    directories: &["config/", "src/"],
    files: &[
        "create_knowledge_graph.py",
        "config/biocypher_config.yaml",
        "config/schema_config.yaml",
        "pyproject.toml",
    ],
};

/// Result of inspecting a directory for a BioCypher project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectCheck {
    pub project_path: String,
    /// Every expected directory and file is present.
    pub exists: bool,
    pub present: Vec<&'static str>,
    pub missing: Vec<&'static str>,
    pub expected_structure: ExpectedStructure,
    pub instruction_if_not_exists: &'static str,
    pub cookiecutter_template_url: &'static str,
}

/// Inspect `path` for the expected BioCypher project layout.
///
/// The expected structure and instructions are returned whether or not the
/// project exists. Unreadable entries count as missing.
pub fn check_project(path: &Path) -> ProjectCheck {
    let root = resolve(path);
    let (present, missing): (Vec<&'static str>, Vec<&'static str>) = EXPECTED_STRUCTURE
        .directories
        .iter()
        .chain(EXPECTED_STRUCTURE.files)
        .copied()
        .partition(|entry| {
            let target = root.join(entry.trim_end_matches('/'));
            if entry.ends_with('/') {
                target.is_dir()
            } else {
                target.is_file()
            }
        });
    tracing::debug!(path = %root.display(), missing = missing.len(), "checked project");
    ProjectCheck {
        project_path: root.to_string_lossy().to_string(),
        exists: missing.is_empty(),
        present,
        missing,
        expected_structure: EXPECTED_STRUCTURE,
        instruction_if_not_exists: INSTRUCTION_IF_NOT_EXISTS,
        cookiecutter_template_url: TEMPLATE_URL,
    }
}

/// Canonical path when it exists, absolute path otherwise.
fn resolve(path: &Path) -> PathBuf {
    path.canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

// --- Cookiecutter ---

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InstallMethod {
    pub method: &'static str,
    pub command: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Installation {
    pub methods: &'static [InstallMethod],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Usage {
    pub command: &'static str,
    pub prompts: &'static [&'static str],
    pub note: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CookiecutterInstructions {
    pub template_url: &'static str,
    pub installation: Installation,
    pub usage: Usage,
    pub expected_output: ExpectedStructure,
    pub important_notes: &'static [&'static str],
}

static COOKIECUTTER: CookiecutterInstructions = CookiecutterInstructions {
    template_url: TEMPLATE_URL,
    installation: Installation {
        methods: &[
            InstallMethod {
                method: "pip",
                command: "pip install cookiecutter",
            },
            InstallMethod {
                method: "pipx",
                command: "pipx install cookiecutter",
            },
            InstallMethod {
                method: "conda",
                command: "conda install -c conda-forge cookiecutter",
            },
        ],
    },
    usage: Usage {
        command: "cookiecutter https://github.com/biocypher/biocypher-cookiecutter-template",
        prompts: &[
            "project_name",
            "project_slug",
            "package_name",
            "full_name",
            "email",
            "github_username",
        ],
        note: "Run the command in the parent directory; the template creates the project \
            directory itself.",
    },
    expected_output: EXPECTED_STRUCTURE,
    important_notes: &[
        "Always generate new projects from the template; do not copy an existing project.",
        "Install the generated project (for example with `poetry install` or `uv sync`) before \
         running create_knowledge_graph.py.",
        "Put adapters under src/<package_name>/adapters/ and register them in \
         create_knowledge_graph.py.",
        "Run check_project_exists on the new directory to confirm the layout.",
    ],
};

pub fn cookiecutter_instructions() -> &'static CookiecutterInstructions {
    &COOKIECUTTER
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scaffold(root: &Path) {
        fs::write(root.join("create_knowledge_graph.py"), "# kg").unwrap();
        fs::create_dir(root.join("config")).unwrap();
        fs::write(root.join("config/biocypher_config.yaml"), "biocypher: {}").unwrap();
        fs::write(root.join("config/schema_config.yaml"), "protein: {}").unwrap();
        fs::write(root.join("pyproject.toml"), "[project]\nname = 'kg'").unwrap();
        fs::create_dir(root.join("src")).unwrap();
    }

    #[test]
    fn test_empty_directory_is_not_a_project() {
        let dir = tempfile::tempdir().unwrap();
        let check = check_project(dir.path());

        assert!(!check.exists);
        assert!(check.present.is_empty());
        assert_eq!(check.missing.len(), 6);
        assert_eq!(
            check.project_path,
            dir.path().canonicalize().unwrap().to_string_lossy()
        );
        assert!(check.instruction_if_not_exists.contains("MUST"));
        assert!(check.instruction_if_not_exists.to_lowercase().contains("cookiecutter"));
    }

    #[test]
    fn test_scaffolded_directory_is_a_project() {
        let dir = tempfile::tempdir().unwrap();
        scaffold(dir.path());
        let check = check_project(dir.path());

        assert!(check.exists, "missing: {:?}", check.missing);
        assert!(check.missing.is_empty());
        assert_eq!(check.cookiecutter_template_url, TEMPLATE_URL);
    }

    #[test]
    fn test_partial_project_reports_missing_entries() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("pyproject.toml"), "").unwrap();
        // A file where a directory is expected does not count.
        fs::write(dir.path().join("src"), "").unwrap();

        let check = check_project(dir.path());
        assert!(!check.exists);
        assert_eq!(check.present, vec!["pyproject.toml"]);
        assert!(check.missing.contains(&"src/"));
        assert!(check.missing.contains(&"config/biocypher_config.yaml"));
    }

    #[test]
    fn test_missing_path_still_returns_structure() {
        let dir = tempfile::tempdir().unwrap();
        let check = check_project(&dir.path().join("does-not-exist"));
        assert!(!check.exists);
        assert!(Path::new(&check.project_path).is_absolute());
        assert!(check.expected_structure.directories.contains(&"config/"));
        assert!(check
            .expected_structure
            .files
            .contains(&"config/biocypher_config.yaml"));
    }

    #[test]
    fn test_cookiecutter_instructions() {
        let c = cookiecutter_instructions();
        assert!(c.template_url.contains("biocypher-cookiecutter-template"));
        assert_eq!(c.installation.methods[0].method, "pip");
        assert!(c.installation.methods[0].command.contains("cookiecutter"));
        assert!(c.usage.command.contains("cookiecutter"));
        assert!(!c.important_notes.is_empty());
    }
}
