//! Interned symbolic identifiers used for node type tags, symbol children and
//! property names.
//!
//! Every distinct spelling is stored once for the lifetime of the process, so
//! cloning a [`Symbol`] is a reference-count bump and equality is usually a
//! pointer comparison.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rustc_hash::FxHashSet;

static INTERNER: Lazy<Mutex<FxHashSet<Arc<str>>>> = Lazy::new(|| Mutex::new(FxHashSet::default()));

/// An interned, immutable identifier such as `def`, `arglist` or `$foo`.
#[derive(Clone)]
pub struct Symbol(Arc<str>);

impl Symbol {
    /// Returns the canonical symbol for `name`, interning it on first use.
    pub fn intern(name: &str) -> Self {
        let mut table = INTERNER.lock();
        if let Some(existing) = table.get(name) {
            return Symbol(Arc::clone(existing));
        }
        let interned: Arc<str> = Arc::from(name);
        table.insert(Arc::clone(&interned));
        Symbol(interned)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the symbol can be written as `:name` without quoting.
    pub fn is_plain(&self) -> bool {
        let mut chars = self.0.chars();
        let first = match chars.next() {
            Some(c) => c,
            None => return false,
        };
        let body_start = match first {
            '$' | '@' => match chars.next() {
                Some(c) => c,
                None => return false,
            },
            c => c,
        };
        if !(body_start.is_ascii_alphabetic() || body_start == '_') {
            return false;
        }
        let rest: Vec<char> = chars.collect();
        let (last, body) = match rest.split_last() {
            Some((last, body)) => (Some(*last), body),
            None => (None, &rest[..]),
        };
        body.iter().all(|c| c.is_ascii_alphanumeric() || *c == '_')
            && last.is_none_or(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '?' | '!' | '='))
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for Symbol {}

impl PartialEq<str> for Symbol {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Symbol {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol::intern(name)
    }
}

impl From<String> for Symbol {
    fn from(name: String) -> Self {
        Symbol::intern(&name)
    }
}

impl From<&Symbol> for Symbol {
    fn from(symbol: &Symbol) -> Self {
        symbol.clone()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_plain() {
            write!(f, ":{}", self.0)
        } else {
            write!(f, ":{}", super::sexp::quote_str(&self.0))
        }
    }
}
