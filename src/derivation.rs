use std::error::Error;
use std::fmt;

use crate::cky::{Chart, NtIndex};
use crate::rules::{Rule, Symbol};

/// A parse as an ordered list of span-typed rule instances, in pre-order:
/// each rule precedes the rules derived from its children.
pub type Derivation = Vec<Rule>;

/// Failures while recovering a derivation from the chart. A missing
/// backpointer where the score is nonzero means the two tables are
/// inconsistent, so these are fatal rather than recoverable.
#[derive(Debug, Clone, PartialEq)]
pub enum DerivationError {
  /// The root chart entry has zero probability: the sentence has no
  /// derivation under the grammar.
  NoDerivation { root: Symbol, num_words: usize },
  /// A cell expected to hold a split choice was never set.
  MissingBackpointer {
    symbol: Symbol,
    start: usize,
    end: usize,
  },
  /// A symbol was looked up that the nonterminal index does not cover.
  UnknownNonterminal { symbol: Symbol },
}

impl fmt::Display for DerivationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::NoDerivation { root, num_words } => {
        write!(f, "no derivation of {} over {} words", root, num_words)
      }
      Self::MissingBackpointer { symbol, start, end } => write!(
        f,
        "no backpointer for {} over {}..{}",
        symbol, start, end
      ),
      Self::UnknownNonterminal { symbol } => {
        write!(f, "{} is not in the nonterminal index", symbol)
      }
    }
  }
}

impl Error for DerivationError {}

/// Walks the backpointer table top-down from `root` over `[start, end)`,
/// emitting the best derivation as span-typed rules with no probability.
///
/// Must only be called when the chart recorded a nonzero score for the
/// root entry; a span whose backpointer is missing is an inconsistency
/// between the score and backpointer tables and is reported as an error,
/// never papered over with a partial tree.
pub fn build_tree(
  chart: &Chart,
  sentence: &[&str],
  start: usize,
  end: usize,
  root: &Symbol,
  index: &NtIndex,
) -> Result<Derivation, DerivationError> {
  let mut derivation = Vec::new();

  if end - start == 1 {
    // leaf: the terminal comes straight from the sentence, not the chart
    let word = Symbol::terminal(sentence[start].to_string());
    derivation.push(Rule::unscored(
      Symbol::span(root.clone(), start, end),
      vec![Symbol::span(word, start, end)],
    ));
  } else {
    let nt = index
      .get(root)
      .ok_or_else(|| DerivationError::UnknownNonterminal {
        symbol: root.clone(),
      })?;
    let bp = chart
      .backpointer(nt, start, end)
      .ok_or_else(|| DerivationError::MissingBackpointer {
        symbol: root.clone(),
        start,
        end,
      })?
      .clone();

    derivation.push(Rule::unscored(
      Symbol::span(root.clone(), start, end),
      vec![
        Symbol::span(bp.left.clone(), start, bp.split),
        Symbol::span(bp.right.clone(), bp.split, end),
      ],
    ));

    // left child fully expanded before the right one, keeping pre-order
    derivation.extend(build_tree(chart, sentence, start, bp.split, &bp.left, index)?);
    derivation.extend(build_tree(chart, sentence, bp.split, end, &bp.right, index)?);
  }

  Ok(derivation)
}
