use std::{collections::BTreeMap, fs::File, io::BufReader, path::Path};

use anyhow::Context as _;

use crate::{
    foundation::{
        core::Rgba8,
        error::{MdlError, MdlResult},
    },
    program::{
        opcode::{Opcode, RefRole},
        symbols::{SymbolKind, SymbolRef, SymbolStore, SymbolValue},
    },
    render::settings::RenderSettings,
};

/// Serialized form of a program, with symbols referenced by name.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Script {
    /// Render settings embedded in the script; callers may override them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<RenderSettings>,
    /// Named drawing constants, referenced by the `material` field of drawing opcodes.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub constants: BTreeMap<String, [u8; 3]>,
    pub ops: Vec<Opcode<String>>,
}

/// An opcode sequence bound to the symbol store it references.
///
/// The store held here is the initial state; every run works on its own clone.
#[derive(Clone, Debug)]
pub struct Program {
    ops: Vec<Opcode>,
    symbols: SymbolStore,
    settings: Option<RenderSettings>,
}

impl Program {
    /// Assemble a program from already-bound parts.
    ///
    /// Every reference in `ops` must have been issued by `symbols`.
    pub fn new(ops: Vec<Opcode>, symbols: SymbolStore) -> Self {
        Self {
            ops,
            symbols,
            settings: None,
        }
    }

    /// Bind every name in `script` to a symbol.
    ///
    /// Knob names declare value symbols (initially `0.0`), frame names declare coordinate systems,
    /// and material names must refer to an entry of `script.constants`.
    pub fn bind(script: Script) -> MdlResult<Self> {
        let mut symbols = SymbolStore::new();
        for (name, rgb) in &script.constants {
            symbols.declare(name, SymbolValue::Constants(Rgba8::from(*rgb)))?;
        }

        let mut ops = Vec::with_capacity(script.ops.len());
        for op in script.ops {
            ops.push(op.try_map_refs(|role, name| bind_ref(&mut symbols, role, &name))?);
        }

        Ok(Self {
            ops,
            symbols,
            settings: script.settings,
        })
    }

    pub fn from_json_str(json: &str) -> MdlResult<Self> {
        let script: Script = serde_json::from_str(json)
            .map_err(|e| MdlError::validation(format!("malformed script: {e}")))?;
        Self::bind(script)
    }

    pub fn from_path(path: &Path) -> MdlResult<Self> {
        let f = File::open(path).with_context(|| format!("open script '{}'", path.display()))?;
        let script: Script = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| MdlError::validation(format!("malformed script: {e}")))?;
        Self::bind(script)
    }

    pub fn ops(&self) -> &[Opcode] {
        &self.ops
    }

    pub fn symbols(&self) -> &SymbolStore {
        &self.symbols
    }

    pub fn settings(&self) -> Option<&RenderSettings> {
        self.settings.as_ref()
    }

    /// Whether any opcode writes symbols in a way that carries state from one frame to the next.
    pub(crate) fn mutates_symbols(&self) -> bool {
        self.ops
            .iter()
            .any(|op| matches!(op, Opcode::Set { .. } | Opcode::SetKnobs { .. }))
    }
}

fn bind_ref(symbols: &mut SymbolStore, role: RefRole, name: &str) -> MdlResult<SymbolRef> {
    match role {
        RefRole::Knob => symbols.declare(name, SymbolValue::Value(0.0)),
        RefRole::CoordSystem => symbols.declare(name, SymbolValue::CoordSystem(None)),
        RefRole::Material => {
            let sym = symbols
                .lookup(name)
                .map_err(|_| MdlError::not_found(format!("material '{name}' has no constants")))?;
            let found = symbols.kind(sym)?;
            if found != SymbolKind::Constants {
                return Err(MdlError::SymbolKind {
                    name: name.to_string(),
                    expected: SymbolKind::Constants.name(),
                    found: found.name(),
                });
            }
            Ok(sym)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/program/load.rs"]
mod tests;
