//! Contract between the sweep engine and the external synthesis tool.
//!
//! The tool is an opaque collaborator driven by text commands. Instead of
//! synthesising one wrapper per tool verb at runtime, the verb vocabulary is
//! a static table of typed descriptors built once at startup; anything not in
//! the table goes through the generic [`ToolSession::invoke`] escape hatch.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::catalog::ScriptText;
use crate::errors::{ErrorInfo, SplatError};

/// Captured outcome of one tool command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolReply {
    /// Tool status; zero means success.
    pub status: i32,
    /// Captured free-form output text.
    pub output: String,
}

impl ToolReply {
    /// Convenience constructor for a successful reply.
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            status: 0,
            output: output.into(),
        }
    }

    /// Returns true when the tool reported success.
    pub fn is_ok(&self) -> bool {
        self.status == 0
    }
}

/// Argument shape a tool verb accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandArity {
    /// No arguments.
    None,
    /// Exactly one filesystem path.
    Path,
    /// Free-form option text, possibly empty.
    Options,
}

/// What a tool verb does to the in-tool design state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateEffect {
    /// Replaces the live design with file contents.
    LoadsState,
    /// Persists the live design to a file.
    SavesState,
    /// Rewrites the live design in place.
    Transforms,
    /// Produces a report without touching the design.
    Reports,
}

/// Typed invocation descriptor for one external-tool verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    /// Verb name as spelled on the tool command line.
    pub name: &'static str,
    /// Argument shape the verb accepts.
    pub arity: CommandArity,
    /// Effect on the live design state.
    pub effect: StateEffect,
}

/// Static mapping from verb name to its invocation descriptor.
#[derive(Debug)]
pub struct CommandTable {
    verbs: BTreeMap<&'static str, CommandDescriptor>,
}

impl CommandTable {
    fn from_descriptors(descriptors: &[CommandDescriptor]) -> Self {
        let mut verbs = BTreeMap::new();
        for descriptor in descriptors {
            verbs.insert(descriptor.name, *descriptor);
        }
        Self { verbs }
    }

    /// The built-in verb vocabulary, constructed once per process.
    pub fn builtin() -> &'static CommandTable {
        static TABLE: OnceLock<CommandTable> = OnceLock::new();
        TABLE.get_or_init(|| {
            use CommandArity::{None as NoArgs, Options, Path as PathArg};
            use StateEffect::{LoadsState, Reports, SavesState, Transforms};
            CommandTable::from_descriptors(&[
                CommandDescriptor { name: "read_blif", arity: PathArg, effect: LoadsState },
                CommandDescriptor { name: "read_verilog", arity: PathArg, effect: LoadsState },
                CommandDescriptor { name: "read_aiger", arity: PathArg, effect: LoadsState },
                CommandDescriptor { name: "read_rtlil", arity: PathArg, effect: LoadsState },
                CommandDescriptor { name: "read_lib", arity: PathArg, effect: LoadsState },
                CommandDescriptor { name: "write_blif", arity: PathArg, effect: SavesState },
                CommandDescriptor { name: "write_verilog", arity: PathArg, effect: SavesState },
                CommandDescriptor { name: "write_aiger", arity: PathArg, effect: SavesState },
                CommandDescriptor { name: "write_rtlil", arity: PathArg, effect: SavesState },
                CommandDescriptor { name: "strash", arity: NoArgs, effect: Transforms },
                CommandDescriptor { name: "dch", arity: Options, effect: Transforms },
                CommandDescriptor { name: "map", arity: Options, effect: Transforms },
                CommandDescriptor { name: "amap", arity: Options, effect: Transforms },
                CommandDescriptor { name: "buffer", arity: Options, effect: Transforms },
                CommandDescriptor { name: "topo", arity: NoArgs, effect: Transforms },
                CommandDescriptor { name: "upsize", arity: Options, effect: Transforms },
                CommandDescriptor { name: "dnsize", arity: Options, effect: Transforms },
                CommandDescriptor { name: "stime", arity: Options, effect: Reports },
                CommandDescriptor { name: "print_stats", arity: Options, effect: Reports },
            ])
        })
    }

    /// Looks up a verb descriptor.
    pub fn get(&self, verb: &str) -> Option<&CommandDescriptor> {
        self.verbs.get(verb)
    }

    /// Validates a `(verb, args)` pair against the table, returning the
    /// descriptor on success.
    pub fn validate(&self, verb: &str, args: &str) -> Result<CommandDescriptor, SplatError> {
        let descriptor = self.get(verb).ok_or_else(|| {
            SplatError::Tool(
                ErrorInfo::new("splat_core.unknown_verb", "verb not in command table")
                    .with_context("verb", verb.to_string())
                    .with_hint("use ToolSession::run_script for unwrapped commands"),
            )
        })?;
        match descriptor.arity {
            CommandArity::None if !args.trim().is_empty() => Err(SplatError::Tool(
                ErrorInfo::new("splat_core.unexpected_args", "verb takes no arguments")
                    .with_context("verb", verb.to_string())
                    .with_context("args", args.to_string()),
            )),
            CommandArity::Path if args.trim().is_empty() => Err(SplatError::Tool(
                ErrorInfo::new("splat_core.missing_path", "verb requires a path argument")
                    .with_context("verb", verb.to_string()),
            )),
            _ => Ok(*descriptor),
        }
    }

    /// Number of verbs in the table.
    pub fn len(&self) -> usize {
        self.verbs.len()
    }

    /// Returns true when the table is empty.
    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }
}

/// Maps a netlist file extension to the tool verb that loads it.
pub fn load_verb(path: &Path) -> Result<&'static str, SplatError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("blif") => Ok("read_blif"),
        Some("v") => Ok("read_verilog"),
        Some("aig") | Some("aiger") => Ok("read_aiger"),
        Some("rtlil") | Some("il") => Ok("read_rtlil"),
        _ => Err(SplatError::MissingFile(
            ErrorInfo::new("splat_core.unknown_format", "unsupported netlist extension")
                .with_context("path", path.display().to_string()),
        )),
    }
}

/// Maps a netlist file extension to the tool verb that saves it.
pub fn save_verb(path: &Path) -> Result<&'static str, SplatError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("blif") => Ok("write_blif"),
        Some("v") => Ok("write_verilog"),
        Some("aig") | Some("aiger") => Ok("write_aiger"),
        Some("rtlil") | Some("il") => Ok("write_rtlil"),
        _ => Err(SplatError::MissingFile(
            ErrorInfo::new("splat_core.unknown_format", "unsupported netlist extension")
                .with_context("path", path.display().to_string()),
        )),
    }
}

/// Live session against the external synthesis tool.
///
/// Implementations own one stateful tool handle; callers must sequence
/// operations strictly (the handle is a process-wide resource, see the
/// concurrency notes in the crate docs).
pub trait ToolSession {
    /// Discards any live design state.
    fn reset(&mut self) -> Result<(), SplatError>;

    /// Loads a netlist from `path` into the live state.
    fn load(&mut self, path: &Path) -> Result<ToolReply, SplatError>;

    /// Saves the live state to `path`.
    fn save(&mut self, path: &Path) -> Result<ToolReply, SplatError>;

    /// Runs an optimization recipe against the live state.
    fn run_script(&mut self, script: &ScriptText) -> Result<ToolReply, SplatError>;

    /// Asks the tool for its one-line area/timing self-report.
    fn timing_report(&mut self) -> Result<ToolReply, SplatError>;

    /// Generic escape hatch: runs a single verb after validating it against
    /// the built-in [`CommandTable`].
    fn invoke(&mut self, verb: &str, args: &str) -> Result<ToolReply, SplatError>;
}
