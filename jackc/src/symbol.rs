//! Scoped symbol tables.
use std::{collections::BTreeMap, fmt};

use log::warn;
use smol_str::SmolStr;

use crate::vm::Segment;

/// Storage class of a declared name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Kind {
    /// Class variable shared by all instances.
    Static = 0,
    /// Instance variable.
    Field = 1,
    /// Subroutine parameter.
    Argument = 2,
    /// Subroutine local variable.
    Local = 3,
}

impl Kind {
    const COUNT: usize = 4;

    /// Memory segment the variables of this kind live in.
    #[rustfmt::skip]
    pub fn segment(&self) -> Segment {
        match self {
            Self::Static   => Segment::Static,
            Self::Field    => Segment::This,
            Self::Argument => Segment::Argument,
            Self::Local    => Segment::Local,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Static => write!(f, "static"),
            Self::Field => write!(f, "field"),
            Self::Argument => write!(f, "argument"),
            Self::Local => write!(f, "local"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRow {
    pub name: SmolStr,
    /// Declared type, a primitive or a class name.
    pub ty: SmolStr,
    pub kind: Kind,
    /// Slot within the kind's segment.
    pub index: u16,
}

/// Most rows a single kind can hold, so every index fits a `u16`.
pub const MAX_PER_KIND: u16 = u16::MAX;

/// Mapping of names to their declared attributes.
///
/// Indices are assigned per kind in definition order, starting
/// at 0. Each kind's indices are dense: they always run from 0 to
/// its row count minus one.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: BTreeMap<SmolStr, SymbolRow>,
    /// Number of rows, per kind.
    counts: [u16; Kind::COUNT],
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a name, assigning it the next index of its kind.
    ///
    /// A previous definition of the same name is replaced. Rows of
    /// the replaced kind with a higher index move down one slot to
    /// close the gap, so redefinitions must happen before any index
    /// is handed out to generated code.
    ///
    /// Returns `None` and leaves the table untouched when the kind
    /// already holds [`MAX_PER_KIND`] rows.
    pub fn define(&mut self, name: &str, ty: &str, kind: Kind) -> Option<&SymbolRow> {
        let replaces_own_kind = self.kind_of(name) == Some(kind);
        if self.count_of(kind) == MAX_PER_KIND && !replaces_own_kind {
            return None;
        }

        if let Some(prev) = self.symbols.remove(name) {
            warn!("'{}' redefined, previously {} {}", prev.name, prev.kind, prev.index);

            self.counts[prev.kind as usize] -= 1;
            for row in self.symbols.values_mut() {
                if row.kind == prev.kind && row.index > prev.index {
                    row.index -= 1;
                }
            }
        }

        let index = self.counts[kind as usize];
        self.counts[kind as usize] += 1;

        let row = SymbolRow {
            name: SmolStr::from(name),
            ty: SmolStr::from(ty),
            kind,
            index,
        };
        self.symbols.insert(row.name.clone(), row);

        self.symbols.get(name)
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&SymbolRow> {
        self.symbols.get(name)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    #[inline]
    pub fn kind_of(&self, name: &str) -> Option<Kind> {
        self.get(name).map(|row| row.kind)
    }

    #[inline]
    pub fn type_of(&self, name: &str) -> Option<&str> {
        self.get(name).map(|row| row.ty.as_str())
    }

    #[inline]
    pub fn index_of(&self, name: &str) -> Option<u16> {
        self.get(name).map(|row| row.index)
    }

    /// Number of rows of the given kind.
    #[inline]
    pub fn count_of(&self, kind: Kind) -> u16 {
        self.counts[kind as usize]
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Drop all rows and restart every kind's index at 0.
    pub fn reset(&mut self) {
        self.symbols.clear();
        self.counts = Default::default();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_indices_per_kind() {
        let mut table = SymbolTable::new();
        table.define("a", "int", Kind::Argument);
        table.define("x", "int", Kind::Local);
        table.define("b", "Point", Kind::Argument);
        table.define("y", "boolean", Kind::Local);

        assert_eq!(table.index_of("a"), Some(0));
        assert_eq!(table.index_of("b"), Some(1));
        assert_eq!(table.index_of("x"), Some(0));
        assert_eq!(table.index_of("y"), Some(1));
        assert_eq!(table.count_of(Kind::Argument), 2);
        assert_eq!(table.count_of(Kind::Local), 2);
        assert_eq!(table.count_of(Kind::Field), 0);
        assert_eq!(table.type_of("b"), Some("Point"));
        assert_eq!(table.kind_of("y"), Some(Kind::Local));
    }

    #[test]
    fn test_undefined_lookup() {
        let table = SymbolTable::new();
        assert_eq!(table.kind_of("nope"), None);
        assert_eq!(table.type_of("nope"), None);
        assert_eq!(table.index_of("nope"), None);
        assert!(table.is_empty());
    }

    #[test]
    fn test_reset() {
        let mut table = SymbolTable::new();
        table.define("i", "int", Kind::Local);
        table.define("j", "int", Kind::Local);
        table.reset();

        assert!(!table.contains("i"));
        assert_eq!(table.count_of(Kind::Local), 0);
        assert_eq!(table.define("k", "int", Kind::Local).map(|row| row.index), Some(0));
    }

    #[test]
    fn test_redefinition_replaces_row() {
        let mut table = SymbolTable::new();
        table.define("x", "int", Kind::Local);
        table.define("x", "char", Kind::Argument);

        assert_eq!(table.len(), 1);
        assert_eq!(table.kind_of("x"), Some(Kind::Argument));
        assert_eq!(table.type_of("x"), Some("char"));
        assert_eq!(table.index_of("x"), Some(0));
    }

    #[test]
    fn test_redefinition_across_kinds_keeps_counts() {
        let mut table = SymbolTable::new();
        table.define("x", "int", Kind::Local);
        table.define("x", "int", Kind::Argument);
        table.define("y", "int", Kind::Local);

        assert_eq!(table.count_of(Kind::Local), 1);
        assert_eq!(table.count_of(Kind::Argument), 1);
        assert_eq!(table.index_of("y"), Some(0));
        assert_eq!(table.index_of("x"), Some(0));
    }

    #[test]
    fn test_redefinition_closes_gap() {
        let mut table = SymbolTable::new();
        table.define("a", "int", Kind::Local);
        table.define("b", "int", Kind::Local);
        table.define("c", "int", Kind::Local);
        table.define("b", "boolean", Kind::Local);

        assert_eq!(table.count_of(Kind::Local), 3);
        assert_eq!(table.index_of("a"), Some(0));
        assert_eq!(table.index_of("c"), Some(1));
        assert_eq!(table.index_of("b"), Some(2));
    }

    #[test]
    fn test_kind_capacity() {
        let mut table = SymbolTable::new();
        for i in 0..MAX_PER_KIND {
            assert!(table.define(&format!("v{i}"), "int", Kind::Field).is_some());
        }
        assert_eq!(table.count_of(Kind::Field), MAX_PER_KIND);

        assert!(table.define("extra", "int", Kind::Field).is_none());
        assert!(!table.contains("extra"));
        assert_eq!(table.count_of(Kind::Field), MAX_PER_KIND);

        // Other kinds and redefinitions within the full kind still fit.
        assert!(table.define("s", "int", Kind::Static).is_some());
        let row = table.define("v0", "char", Kind::Field).unwrap();
        assert_eq!(row.index, MAX_PER_KIND - 1);
    }

    #[test]
    fn test_kind_segments() {
        assert_eq!(Kind::Static.segment(), Segment::Static);
        assert_eq!(Kind::Field.segment(), Segment::This);
        assert_eq!(Kind::Argument.segment(), Segment::Argument);
        assert_eq!(Kind::Local.segment(), Segment::Local);
    }
}
