//! Flat, insertion-ordered symbol table.
//!
//! The reference grows a fixed-size array by doubling its capacity by hand
//! (`symbol_table.c`); `Vec`'s own amortized growth already gives the same
//! behavior, so there is nothing to hand-roll here.

use std::collections::HashMap;
use std::fmt;

/// Names are bounded to 64 bytes and datatype tags to 16 bytes in the
/// reference's fixed `SymbolEntry` struct. The lexer already truncates
/// identifiers to this length, so the bound is documented rather than
/// re-enforced here.
pub const MAX_NAME_LEN: usize = 64;
pub const MAX_DATATYPE_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemType {
    Int,
    Char,
    Unknown,
}

impl SemType {
    pub fn tag(self) -> &'static str {
        match self {
            SemType::Int => "ENTEGER",
            SemType::Char => "CHAROT",
            SemType::Unknown => "KUAN",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SymbolEntry {
    pub name: String,
    pub datatype: SemType,
    pub initialized: bool,
    /// Most recently known constant value, in textual form; empty when the
    /// value isn't statically known.
    pub value: String,
}

/// Flat, insertion-ordered symbol store. `find` is by name; `add` appends
/// unconditionally and does not itself detect redeclaration — that check
/// belongs to the semantic analyzer, exactly as in the reference.
#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: Vec<SymbolEntry>,
    index: HashMap<String, usize>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    pub fn find(&self, name: &str) -> Option<&SymbolEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut SymbolEntry> {
        let idx = *self.index.get(name)?;
        Some(&mut self.entries[idx])
    }

    pub fn add(&mut self, name: &str, datatype: SemType, initialized: bool, value: String) -> usize {
        let idx = self.entries.len();
        self.entries.push(SymbolEntry {
            name: name.to_string(),
            datatype,
            initialized,
            value,
        });
        self.index.insert(name.to_string(), idx);
        idx
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymbolEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{:<20}{:<12}{:<12}{}", "NAME", "TYPE", "INIT", "VALUE")?;
        for e in &self.entries {
            writeln!(
                f,
                "{:<20}{:<12}{:<12}{}",
                e.name,
                e.datatype.tag(),
                e.initialized,
                e.value
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_find_round_trips() {
        let mut table = SymbolTable::new();
        table.add("a", SemType::Int, true, "5".to_string());
        let entry = table.find("a").unwrap();
        assert_eq!(entry.datatype, SemType::Int);
        assert_eq!(entry.value, "5");
        assert!(table.find("b").is_none());
    }

    #[test]
    fn add_does_not_detect_redeclaration() {
        let mut table = SymbolTable::new();
        table.add("a", SemType::Int, true, "1".to_string());
        table.add("a", SemType::Int, true, "2".to_string());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn clear_empties_the_table() {
        let mut table = SymbolTable::new();
        table.add("a", SemType::Int, true, "1".to_string());
        table.clear();
        assert!(table.is_empty());
        assert!(table.find("a").is_none());
    }
}
