//! Optimization recipe texts and the catalog that orders them.

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, SplatError};

fn catalog_error(code: &str, message: impl Into<String>) -> SplatError {
    SplatError::Catalog(ErrorInfo::new(code, message.into()))
}

/// Validated script text sent verbatim to the external synthesis tool.
///
/// An empty script is a legal value only for the `initialize`/`finalize`
/// hooks, where it means "skip this hook".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScriptText(String);

impl ScriptText {
    /// Creates a script body, rejecting empty or malformed text.
    pub fn new(text: impl Into<String>) -> Result<Self, SplatError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(catalog_error(
                "splat_core.empty_script",
                "script body must contain at least one command",
            ));
        }
        if text.contains('\0') {
            return Err(catalog_error(
                "splat_core.malformed_script",
                "script body contains a NUL byte",
            ));
        }
        Ok(Self(text))
    }

    /// The empty script, meaning "skip" when used as a hook.
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Returns true for the skip-hook sentinel.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the raw command text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the semicolon-separated commands of the script, trimmed.
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.0
            .split(';')
            .map(str::trim)
            .filter(|cmd| !cmd.is_empty())
    }
}

/// Quotes a path for safe interpolation into a script or constraint file.
///
/// The external tools accept double-quoted arguments; embedded quotes and
/// backslashes are escaped rather than concatenated raw.
pub fn quote_path(path: &std::path::Path) -> String {
    let raw = path.display().to_string();
    if raw.chars().all(|c| c.is_ascii_alphanumeric() || "._-/".contains(c)) {
        return raw;
    }
    let mut quoted = String::with_capacity(raw.len() + 2);
    quoted.push('"');
    for c in raw.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Fixed mapping from recipe name to script text, plus the two hook scripts.
///
/// Loaded once at orchestrator construction, immutable thereafter, shared
/// read-only across all sweep iterations. Iteration order is declaration
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptCatalog {
    entries: Vec<(String, ScriptText)>,
    initialize: ScriptText,
    finalize: ScriptText,
}

impl ScriptCatalog {
    /// Builds a catalog from `(name, script)` pairs and the two hooks.
    ///
    /// Duplicate names are rejected; either hook may be
    /// [`ScriptText::empty`] to skip it.
    pub fn new(
        entries: Vec<(String, ScriptText)>,
        initialize: ScriptText,
        finalize: ScriptText,
    ) -> Result<Self, SplatError> {
        for (idx, (name, script)) in entries.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(catalog_error(
                    "splat_core.unnamed_script",
                    "catalog entries must be named",
                ));
            }
            if script.is_empty() {
                return Err(SplatError::Catalog(
                    ErrorInfo::new(
                        "splat_core.empty_script",
                        "catalog entries may not use the empty script",
                    )
                    .with_context("script", name.clone()),
                ));
            }
            if entries[..idx].iter().any(|(prior, _)| prior == name) {
                return Err(SplatError::Catalog(
                    ErrorInfo::new("splat_core.duplicate_script", "script name already present")
                        .with_context("script", name.clone()),
                ));
            }
        }
        Ok(Self {
            entries,
            initialize,
            finalize,
        })
    }

    /// The stock scatter catalog: three area recipes, three delay recipes,
    /// and two plain mapping recipes, with the stock hooks.
    ///
    /// The recipes live in the tool's newer AIG namespace, so `initialize`
    /// moves into it up front and every recipe moves back out; `finalize`
    /// buffers and sizes the mapped network so the timing report sees a
    /// realistic netlist without persisting that into the checkpoint.
    pub fn standard() -> Self {
        let script = |text: &str| ScriptText::new(text).expect("stock scripts are non-empty");
        let entries = vec![
            ("area1".to_string(), script("&get;&st;&dch;&nf;&put")),
            ("area2".to_string(), script("&get;&st;&synch2;&nf;&put")),
            ("area3".to_string(), script("&get;&st;&syn2;&synch2;&nf;&put")),
            ("delay1".to_string(), script("&get;&st;&if -g -K 6;&dch;&nf;&put")),
            ("delay2".to_string(), script("&get;&st;&if -g -K 6;&synch2;&nf;&put")),
            (
                "delay3".to_string(),
                script("&get;&st;&syn2;&if -g -K 6;&synch2;&nf;&put"),
            ),
            ("simple".to_string(), script("strash;dch;map -B 0.9")),
            ("oldarea".to_string(), script("strash;dch;amap")),
        ];
        let initialize = script("&get;&st;&dch -x;&nf;&put");
        let finalize = script("buffer -c;topo;stime -c;upsize -c;dnsize -c");
        Self {
            entries,
            initialize,
            finalize,
        }
    }

    /// Returns the named recipes in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &ScriptText)> {
        self.entries
            .iter()
            .map(|(name, script)| (name.as_str(), script))
    }

    /// Looks up a recipe by name.
    pub fn get(&self, name: &str) -> Option<&ScriptText> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, script)| script)
    }

    /// Number of named recipes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the catalog holds no recipes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `initialize` hook; empty means skip.
    pub fn initialize(&self) -> &ScriptText {
        &self.initialize
    }

    /// The `finalize` hook; empty means skip.
    pub fn finalize(&self) -> &ScriptText {
        &self.finalize
    }

    /// Renders the fully expanded command sequence a sweep would execute for
    /// `script` over `iterations` iterations, one command per line, for
    /// operator inspection.
    pub fn flatten(&self, script: &str, iterations: u32) -> Result<String, SplatError> {
        let body = self.get(script).ok_or_else(|| {
            SplatError::Catalog(
                ErrorInfo::new("splat_core.unknown_script", "script not in catalog")
                    .with_context("script", script.to_string()),
            )
        })?;
        let mut lines: Vec<&str> = self.initialize.commands().collect();
        for _ in 0..iterations {
            lines.extend(body.commands());
        }
        lines.extend(self.finalize.commands());
        Ok(lines.join("\n"))
    }
}
