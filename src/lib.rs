#[macro_use]
extern crate lazy_static;

pub mod cky;
pub mod derivation;
pub mod grammar;
pub mod parse_grammar;
pub mod rules;
pub mod syntree;
pub mod utils;

use crate::cky::{parse_chart, Chart, NtIndex};
use crate::derivation::{build_tree, Derivation, DerivationError};
pub use crate::grammar::Grammar;
use crate::rules::Symbol;
use crate::syntree::SynTree;
pub use crate::utils::Err;

/// The single best parse of a sentence: its probability and the pre-order
/// derivation that achieved it.
#[derive(Debug, Clone, PartialEq)]
pub struct ViterbiParse {
  pub prob: f64,
  pub derivation: Derivation,
}

impl ViterbiParse {
  pub fn tree(&self) -> SynTree {
    SynTree::from_derivation(&self.derivation).expect("derivation is never empty")
  }
}

impl Grammar {
  /// Runs the CKY chart for `input`, returning the chart together with
  /// the nonterminal index it was addressed by.
  pub fn parse_chart(&self, input: &[&str]) -> (Chart, NtIndex) {
    let index = NtIndex::from_grammar(self);
    let chart = parse_chart(self, input, &index);
    (chart, index)
  }

  /// Finds the most probable parse of `input` rooted at the grammar's
  /// start symbol.
  pub fn parse(&self, input: &[&str]) -> Result<ViterbiParse, Err> {
    let root = self
      .start()
      .ok_or("cannot parse with an empty grammar")?
      .clone();
    self.parse_with_root(input, &root)
  }

  /// Finds the most probable parse of `input` rooted at `root`. A zero
  /// root score means the sentence has no derivation, reported as
  /// [`DerivationError::NoDerivation`] without touching the backpointers.
  pub fn parse_with_root(&self, input: &[&str], root: &Symbol) -> Result<ViterbiParse, Err> {
    let (chart, index) = self.parse_chart(input);

    let nt = index
      .get(root)
      .ok_or_else(|| DerivationError::UnknownNonterminal {
        symbol: root.clone(),
      })?;
    let prob = chart.score(nt, 0, input.len());
    if prob == 0.0 {
      return Err(
        DerivationError::NoDerivation {
          root: root.clone(),
          num_words: input.len(),
        }
        .into(),
      );
    }

    let derivation = build_tree(&chart, input, 0, input.len(), root, &index)?;
    Ok(ViterbiParse { prob, derivation })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::rules::Symbol;

  fn nt(l: &str) -> Symbol {
    Symbol::nonterminal(l.to_string())
  }

  fn sp(s: Symbol, start: usize, end: usize) -> Symbol {
    Symbol::span(s, start, end)
  }

  const GROUCHO: &str = r#"
    [S] ||| [NP] [VP] ||| 1.0
    [NP] ||| [Det] [N] ||| 0.4
    [NP] ||| [NP] [PP] ||| 0.2
    [NP] ||| i ||| 0.1
    [VP] ||| [V] [NP] ||| 0.6
    [VP] ||| [VP] [PP] ||| 0.4
    [PP] ||| [P] [NP] ||| 1.0
    [Det] ||| an ||| 0.5
    [Det] ||| my ||| 0.5
    [N] ||| elephant ||| 0.5
    [N] ||| pajamas ||| 0.5
    [V] ||| shot ||| 1.0
    [P] ||| in ||| 1.0
  "#;

  #[test]
  fn test_simple_parse() {
    let g: Grammar = r#"
      [S] ||| [NP] [VP] ||| 1.0
      [NP] ||| i ||| 1.0
      [VP] ||| sleeps ||| 1.0
    "#
    .parse()
    .unwrap();

    let parse = g.parse(&["i", "sleeps"]).unwrap();
    assert_eq!(parse.prob, 1.0);
    assert_eq!(parse.derivation.len(), 3);
    assert_eq!(parse.derivation[0].lhs, sp(nt("S"), 0, 2));
  }

  #[test]
  fn test_no_parse_is_a_typed_error() {
    let g: Grammar = r#"
      [S] ||| [NP] [VP] ||| 1.0
      [NP] ||| i ||| 1.0
      [VP] ||| sleeps ||| 1.0
    "#
    .parse()
    .unwrap();

    let err = g.parse(&["sleeps", "i"]).unwrap_err();
    assert_eq!(
      err.downcast_ref::<crate::derivation::DerivationError>(),
      Some(&crate::derivation::DerivationError::NoDerivation {
        root: nt("S"),
        num_words: 2,
      })
    );
  }

  #[test]
  fn test_pp_attachment_picks_higher_probability() {
    let g: Grammar = GROUCHO.parse().unwrap();
    let input = "i shot an elephant in my pajamas"
      .split(' ')
      .collect::<Vec<_>>();

    let parse = g.parse(&input).unwrap();

    // verb attachment wins: VP:1-7 -> VP:1-4 PP:4-7 scores
    // 0.4 * 0.06 * 0.1 = 0.0024, beating the noun attachment's
    // 0.6 * 1.0 * 0.002 = 0.0012; the root is 1.0 * 0.1 * 0.0024
    assert!((parse.prob - 0.00024).abs() < 1e-12, "prob = {}", parse.prob);

    let vp = parse
      .derivation
      .iter()
      .find(|r| r.lhs == sp(nt("VP"), 1, 7))
      .unwrap();
    assert_eq!(vp.rhs, vec![sp(nt("VP"), 1, 4), sp(nt("PP"), 4, 7)]);
  }

  #[test]
  fn test_tree_leaves_round_trip_the_sentence() {
    let g: Grammar = GROUCHO.parse().unwrap();
    let input = "i shot an elephant in my pajamas"
      .split(' ')
      .collect::<Vec<_>>();

    let tree = g.parse(&input).unwrap().tree();

    let words = tree
      .leaves()
      .into_iter()
      .map(|leaf| match leaf.root() {
        Symbol::Terminal(w) => w.as_str(),
        other => panic!("non-terminal leaf {}", other),
      })
      .collect::<Vec<_>>();
    assert_eq!(words, input);
  }

  #[test]
  fn test_parse_with_explicit_root() {
    let g: Grammar = GROUCHO.parse().unwrap();

    let parse = g
      .parse_with_root(&["an", "elephant"], &nt("NP"))
      .unwrap();
    assert!((parse.prob - 0.1).abs() < 1e-12);

    // an unknown root is a lookup failure, not a silent no-parse
    assert!(g.parse_with_root(&["an", "elephant"], &nt("X")).is_err());
  }
}
