use std::fmt;

/// A grammar atom. `Span` decorates another symbol with the half-open
/// token interval `[start, end)` it was recognized over; spans only show
/// up in derivations, never in the grammar itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Symbol {
  Terminal(String),
  Nonterminal(String),
  Span(Box<Symbol>, usize, usize),
}

impl Symbol {
  pub fn terminal(word: String) -> Self {
    Self::Terminal(word)
  }

  pub fn nonterminal(label: String) -> Self {
    Self::Nonterminal(label)
  }

  pub fn span(symbol: Symbol, start: usize, end: usize) -> Self {
    Self::Span(Box::new(symbol), start, end)
  }

  pub fn is_terminal(&self) -> bool {
    match self {
      Self::Terminal(_) => true,
      Self::Nonterminal(_) => false,
      Self::Span(inner, _, _) => inner.is_terminal(),
    }
  }

  pub fn is_nonterminal(&self) -> bool {
    match self {
      Self::Terminal(_) => false,
      Self::Nonterminal(_) => true,
      Self::Span(inner, _, _) => inner.is_nonterminal(),
    }
  }

  /// The symbol with any span decoration stripped.
  pub fn root(&self) -> &Symbol {
    match self {
      Self::Span(inner, _, _) => inner.root(),
      _ => self,
    }
  }
}

impl fmt::Display for Symbol {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Terminal(w) => write!(f, "'{}'", w),
      Self::Nonterminal(l) => write!(f, "[{}]", l),
      // terminal spans print bare, the offsets carry no information there
      Self::Span(inner, start, end) => {
        if inner.is_terminal() {
          write!(f, "{}", inner)
        } else {
          write!(f, "{}:{}-{}", inner, start, end)
        }
      }
    }
  }
}

/// A production `lhs -> rhs` with a probability. `prob` is `None` only for
/// rule instances created while reconstructing a derivation, where the
/// probability is not tracked.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
  pub lhs: Symbol,
  pub rhs: Vec<Symbol>,
  pub prob: Option<f64>,
}

impl Rule {
  pub fn new(lhs: Symbol, rhs: Vec<Symbol>, prob: f64) -> Self {
    Self {
      lhs,
      rhs,
      prob: Some(prob),
    }
  }

  pub fn unscored(lhs: Symbol, rhs: Vec<Symbol>) -> Self {
    Self {
      lhs,
      rhs,
      prob: None,
    }
  }

  pub fn len(&self) -> usize {
    self.rhs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// A unary rule rewriting to a single terminal, e.g. `[N] -> 'elephant'`.
  pub fn is_lexical(&self) -> bool {
    self.rhs.len() == 1 && self.rhs[0].is_terminal()
  }

  /// A binary rule over two nonterminals, e.g. `[S] -> [NP] [VP]`.
  pub fn is_binary(&self) -> bool {
    self.rhs.len() == 2
  }
}

impl fmt::Display for Rule {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ->", self.lhs)?;
    for s in self.rhs.iter() {
      write!(f, " {}", s)?;
    }
    if let Some(p) = self.prob {
      write!(f, " # {}", p)?;
    }
    Ok(())
  }
}

#[test]
fn test_symbol_identity() {
  let t = Symbol::terminal("fall".to_string());
  let nt = Symbol::nonterminal("fall".to_string());

  // the variant tag is part of identity
  assert_ne!(t, nt);
  assert_eq!(t, Symbol::terminal("fall".to_string()));

  assert!(t.is_terminal() && !t.is_nonterminal());
  assert!(nt.is_nonterminal() && !nt.is_terminal());
}

#[test]
fn test_span_delegates_classification() {
  let sp = Symbol::span(Symbol::nonterminal("NP".to_string()), 2, 4);
  assert!(sp.is_nonterminal());
  assert_eq!(sp.root(), &Symbol::nonterminal("NP".to_string()));
  assert_eq!(format!("{}", sp), "[NP]:2-4");

  let sp = Symbol::span(Symbol::terminal("the".to_string()), 0, 1);
  assert!(sp.is_terminal());
  assert_eq!(format!("{}", sp), "'the'");
}

#[test]
fn test_span_equality_includes_bounds() {
  let a = Symbol::span(Symbol::nonterminal("NP".to_string()), 0, 1);
  let b = Symbol::span(Symbol::nonterminal("NP".to_string()), 1, 2);
  assert_ne!(a, b);
  assert_eq!(a, Symbol::span(Symbol::nonterminal("NP".to_string()), 0, 1));
}

#[test]
fn test_rule_classification() {
  let lexical = Rule::new(
    Symbol::nonterminal("N".to_string()),
    vec![Symbol::terminal("elephant".to_string())],
    0.5,
  );
  assert!(lexical.is_lexical());
  assert!(!lexical.is_binary());

  let binary = Rule::new(
    Symbol::nonterminal("S".to_string()),
    vec![
      Symbol::nonterminal("NP".to_string()),
      Symbol::nonterminal("VP".to_string()),
    ],
    1.0,
  );
  assert!(binary.is_binary());
  assert!(!binary.is_lexical());
  assert_eq!(format!("{}", binary), "[S] -> [NP] [VP] # 1");
}
