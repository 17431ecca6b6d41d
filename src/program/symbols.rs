use std::collections::HashMap;

use glam::DMat4;

use crate::foundation::{
    core::Rgba8,
    error::{MdlError, MdlResult},
};

/// Stable handle to an entry in a [`SymbolStore`].
///
/// Handles are only meaningful for the store that issued them (or a clone of it).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct SymbolRef(u32);

impl SymbolRef {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Kind of a named entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    /// Numeric value; knobs are value symbols.
    Value,
    /// Saved coordinate system (a 4x4 transform).
    CoordSystem,
    /// Drawing constants; only the stroke color is used.
    Constants,
}

impl SymbolKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::CoordSystem => "coordinate system",
            Self::Constants => "constants",
        }
    }
}

/// Payload held by a symbol.
#[derive(Clone, Debug, PartialEq)]
pub enum SymbolValue {
    Value(f64),
    /// `None` until a `save_coord_system` stores the current transform.
    CoordSystem(Option<DMat4>),
    Constants(Rgba8),
}

impl SymbolValue {
    pub fn kind(&self) -> SymbolKind {
        match self {
            Self::Value(_) => SymbolKind::Value,
            Self::CoordSystem(_) => SymbolKind::CoordSystem,
            Self::Constants(_) => SymbolKind::Constants,
        }
    }
}

#[derive(Clone, Debug)]
struct Entry {
    name: String,
    value: SymbolValue,
}

/// Named-value storage shared by every opcode of a program.
///
/// Entries keep their declaration order; lookups by name go through a hash index.
#[derive(Clone, Debug, Default)]
pub struct SymbolStore {
    entries: Vec<Entry>,
    index: HashMap<String, SymbolRef>,
}

impl SymbolStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Declare `name` with an initial payload, or return the existing handle if a symbol of the
    /// same kind is already declared (its payload is left untouched).
    pub fn declare(&mut self, name: &str, initial: SymbolValue) -> MdlResult<SymbolRef> {
        if let Some(&sym) = self.index.get(name) {
            let found = self.entries[sym.index()].value.kind();
            if found != initial.kind() {
                return Err(MdlError::SymbolKind {
                    name: name.to_string(),
                    expected: initial.kind().name(),
                    found: found.name(),
                });
            }
            return Ok(sym);
        }

        let id = u32::try_from(self.entries.len())
            .map_err(|_| MdlError::validation("symbol table is full"))?;
        let sym = SymbolRef(id);
        self.entries.push(Entry {
            name: name.to_string(),
            value: initial,
        });
        self.index.insert(name.to_string(), sym);
        Ok(sym)
    }

    pub fn lookup(&self, name: &str) -> MdlResult<SymbolRef> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| MdlError::not_found(format!("'{name}'")))
    }

    pub fn name(&self, sym: SymbolRef) -> MdlResult<&str> {
        Ok(&self.entry(sym)?.name)
    }

    pub fn kind(&self, sym: SymbolRef) -> MdlResult<SymbolKind> {
        Ok(self.entry(sym)?.value.kind())
    }

    pub fn get(&self, sym: SymbolRef) -> MdlResult<f64> {
        let entry = self.entry(sym)?;
        match entry.value {
            SymbolValue::Value(v) => Ok(v),
            ref other => Err(kind_mismatch(&entry.name, SymbolKind::Value, other)),
        }
    }

    pub fn set(&mut self, sym: SymbolRef, value: f64) -> MdlResult<()> {
        let entry = self.entry_mut(sym)?;
        match &mut entry.value {
            SymbolValue::Value(v) => {
                *v = value;
                Ok(())
            }
            other => Err(kind_mismatch(&entry.name, SymbolKind::Value, other)),
        }
    }

    /// Handles of every value-typed symbol, in declaration order.
    pub fn value_refs(&self) -> impl Iterator<Item = SymbolRef> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| matches!(e.value, SymbolValue::Value(_)))
            .map(|(i, _)| SymbolRef(i as u32))
    }

    /// Overwrite every value-typed symbol with `value`.
    pub fn set_all_values(&mut self, value: f64) {
        let refs: Vec<SymbolRef> = self.value_refs().collect();
        for sym in refs {
            self.entries[sym.index()].value = SymbolValue::Value(value);
        }
    }

    /// Transform saved under a coordinate-system symbol.
    ///
    /// Fails with [`MdlError::NotFound`] if nothing was saved under it yet.
    pub fn coord_system(&self, sym: SymbolRef) -> MdlResult<DMat4> {
        let entry = self.entry(sym)?;
        match entry.value {
            SymbolValue::CoordSystem(Some(m)) => Ok(m),
            SymbolValue::CoordSystem(None) => Err(MdlError::not_found(format!(
                "coordinate system '{}' was referenced before being saved",
                entry.name
            ))),
            ref other => Err(kind_mismatch(&entry.name, SymbolKind::CoordSystem, other)),
        }
    }

    pub fn save_coord_system(&mut self, sym: SymbolRef, transform: DMat4) -> MdlResult<()> {
        let entry = self.entry_mut(sym)?;
        match &mut entry.value {
            SymbolValue::CoordSystem(slot) => {
                *slot = Some(transform);
                Ok(())
            }
            other => Err(kind_mismatch(&entry.name, SymbolKind::CoordSystem, other)),
        }
    }

    pub fn constants(&self, sym: SymbolRef) -> MdlResult<Rgba8> {
        let entry = self.entry(sym)?;
        match entry.value {
            SymbolValue::Constants(color) => Ok(color),
            ref other => Err(kind_mismatch(&entry.name, SymbolKind::Constants, other)),
        }
    }

    /// `(name, value)` rows for every value symbol, in declaration order.
    pub fn knob_report(&self) -> Vec<(String, f64)> {
        self.entries
            .iter()
            .filter_map(|e| match e.value {
                SymbolValue::Value(v) => Some((e.name.clone(), v)),
                _ => None,
            })
            .collect()
    }

    fn entry(&self, sym: SymbolRef) -> MdlResult<&Entry> {
        self.entries
            .get(sym.index())
            .ok_or_else(|| MdlError::not_found(format!("symbol #{}", sym.0)))
    }

    fn entry_mut(&mut self, sym: SymbolRef) -> MdlResult<&mut Entry> {
        self.entries
            .get_mut(sym.index())
            .ok_or_else(|| MdlError::not_found(format!("symbol #{}", sym.0)))
    }
}

fn kind_mismatch(name: &str, expected: SymbolKind, found: &SymbolValue) -> MdlError {
    MdlError::SymbolKind {
        name: name.to_string(),
        expected: expected.name(),
        found: found.kind().name(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/program/symbols.rs"]
mod tests;
