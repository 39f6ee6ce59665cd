use std::fmt;

use crate::derivation::Derivation;
use crate::rules::Symbol;

/// A rendered parse tree. Branch and leaf symbols are span-decorated, so
/// two uses of the same rule in one parse stay distinguishable.
#[derive(Debug, Clone, PartialEq)]
pub enum SynTree {
  Branch(Symbol, Vec<SynTree>),
  Leaf(Symbol),
}

impl SynTree {
  pub fn is_leaf(&self) -> bool {
    match self {
      Self::Leaf(_) => true,
      _ => false,
    }
  }

  pub fn is_branch(&self) -> bool {
    match self {
      Self::Branch(_, _) => true,
      _ => false,
    }
  }

  /// Assembles the tree described by a pre-order derivation: each node's
  /// children come from the first rule whose lhs matches that node. Spans
  /// that never occur as an lhs are the leaves. Returns `None` for an
  /// empty derivation.
  pub fn from_derivation(derivation: &Derivation) -> Option<Self> {
    let root = &derivation.first()?.lhs;
    Some(Self::expand(root, derivation))
  }

  fn expand(symbol: &Symbol, derivation: &Derivation) -> Self {
    match derivation.iter().find(|r| r.lhs == *symbol) {
      Some(rule) => Self::Branch(
        symbol.clone(),
        rule.rhs.iter().map(|s| Self::expand(s, derivation)).collect(),
      ),
      None => Self::Leaf(symbol.clone()),
    }
  }

  /// The leaf symbols in left-to-right order.
  pub fn leaves(&self) -> Vec<&Symbol> {
    match self {
      Self::Leaf(s) => vec![s],
      Self::Branch(_, children) => children.iter().flat_map(|c| c.leaves()).collect(),
    }
  }
}

impl fmt::Display for SynTree {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Leaf(s) => write!(f, "{}", s),
      Self::Branch(s, children) => {
        write!(f, "({}", s)?;
        if children.len() == 1 {
          write!(f, " {})", children[0])
        } else {
          for child in children.iter() {
            // TODO: is there a nice way to do this that doesn't allocate a String?
            let fmt = format!("{}", child);
            for line in fmt.lines() {
              write!(f, "\n  {}", line)?;
            }
          }
          write!(f, ")")
        }
      }
    }
  }
}
