/*!
Substitutions: ordered, idempotent (once composed and applied) finite maps
from type-variable names to types.

Backed by a vector of `(VarName, Type)` pairs plus a companion index map from
name to position, chosen so composition order (insertion order) is preserved
for deterministic `Display` output while lookup stays `O(1)`.
*/

use std::collections::HashMap;
use std::fmt;

use crate::structures::sort::{has_sort, SortMap};
use crate::types::{BaseType, Type, UAtom, VarKind, VarName};

/// An ordered finite map from unification-variable names to types.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Substitution {
    bindings: Vec<(VarName, Type)>,
    index: HashMap<VarName, usize>,
}

impl Substitution {
    pub fn empty() -> Self {
        Substitution::default()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn get(&self, name: VarName) -> Option<&Type> {
        self.index.get(&name).map(|i| &self.bindings[*i].1)
    }

    pub fn contains_key(&self, name: VarName) -> bool {
        self.index.contains_key(&name)
    }

    /// Insert or overwrite a single binding. Substitution never fails; a
    /// binding that would violate a recorded sort is detected by the caller
    /// via [Substitution::sort_violation], not here.
    pub fn insert(&mut self, name: VarName, ty: Type) {
        match self.index.get(&name) {
            Some(i) => self.bindings[*i].1 = ty,
            None => {
                self.index.insert(name, self.bindings.len());
                self.bindings.push((name, ty));
            }
        }
    }

    pub fn singleton(name: VarName, ty: Type) -> Self {
        let mut s = Substitution::empty();
        s.insert(name, ty);
        s
    }

    pub fn iter(&self) -> impl Iterator<Item = (VarName, &Type)> {
        self.bindings.iter().map(|(k, v)| (*k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = VarName> + '_ {
        self.bindings.iter().map(|(k, _)| *k)
    }

    /// Rewrite `ty` by this substitution, recursively.
    pub fn apply(&self, ty: &Type) -> Type {
        match ty {
            Type::Atom(UAtom::Var(v)) if matches!(v.kind, VarKind::Unif) => {
                match self.get(v.name) {
                    Some(replacement) => replacement.clone(),
                    None => ty.clone(),
                }
            }
            Type::Atom(_) => ty.clone(),
            Type::Con(con, args) => {
                Type::Con(*con, args.iter().map(|a| self.apply(a)).collect())
            }
            Type::Syn(name) => Type::Syn(name.clone()),
        }
    }

    /// `σ₂ ∘ σ₁`: apply `sigma2` to the range of `sigma1`, then merge in
    /// `sigma2`'s own bindings — keys present in `sigma1` keep the value
    /// computed from `sigma1`'s (now-rewritten) binding rather than
    /// `sigma2`'s, since `sigma1` already reflects the most specific
    /// available information for that key.
    pub fn compose(sigma2: &Substitution, sigma1: &Substitution) -> Substitution {
        let mut result = Substitution::empty();
        for (k, t) in sigma1.iter() {
            result.insert(k, sigma2.apply(t));
        }
        for (k, t) in sigma2.iter() {
            if !result.contains_key(k) {
                result.insert(k, t.clone());
            }
        }
        result
    }

    /// Keep only bindings whose key is in `keep`.
    pub fn restrict(&self, keep: &std::collections::HashSet<VarName>) -> Substitution {
        let mut out = Substitution::empty();
        for (k, t) in self.iter() {
            if keep.contains(&k) {
                out.insert(k, t.clone());
            }
        }
        out
    }

    /// The first binding `v ↦ Base(b)` in this substitution whose sort (per
    /// `sort_map`) `b` does not satisfy, if any.
    pub fn sort_violation(&self, sort_map: &SortMap) -> Option<(VarName, BaseType)> {
        for (k, t) in self.iter() {
            if let Type::Atom(UAtom::Base(b)) = t {
                if let Some(s) = sort_map.get(&k) {
                    if !has_sort(*b, s) {
                        return Some((k, *b));
                    }
                }
            }
        }
        None
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (k, t)) in self.bindings.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{k} ↦ {t}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BaseType;

    #[test]
    fn compose_prefers_sigma1_on_conflict() {
        let mut sigma1 = Substitution::empty();
        sigma1.insert(VarName(0), Type::base(BaseType::Nat));

        let mut sigma2 = Substitution::empty();
        sigma2.insert(VarName(0), Type::base(BaseType::Int));
        sigma2.insert(VarName(1), Type::base(BaseType::Bool));

        let composed = Substitution::compose(&sigma2, &sigma1);
        assert_eq!(composed.get(VarName(0)), Some(&Type::base(BaseType::Nat)));
        assert_eq!(composed.get(VarName(1)), Some(&Type::base(BaseType::Bool)));
    }

    #[test]
    fn compose_applies_sigma2_to_sigma1_range() {
        let mut sigma1 = Substitution::empty();
        sigma1.insert(VarName(0), Type::unif(VarName(1)));

        let mut sigma2 = Substitution::empty();
        sigma2.insert(VarName(1), Type::base(BaseType::Real));

        let composed = Substitution::compose(&sigma2, &sigma1);
        assert_eq!(composed.get(VarName(0)), Some(&Type::base(BaseType::Real)));
    }
}
